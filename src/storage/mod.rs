//! Almacenamiento relacional (SQLite).
//!
//! - `schema`: tablas, índices y sembrado de maestros cerrados
//! - `repository`: contrato de lectura (`CourseRepository`)
//! - `writer`: contrato de escritura (`CatalogWriter`)
//! - `loader`: carga transaccional e idempotente

pub mod loader;
pub mod repository;
pub mod schema;
pub mod writer;

pub use loader::{LoadSummary, TableTally, import_bulletin, load_converted, load_extracted, table_counts};
pub use repository::{CourseRepository, SqliteRepository};
pub use schema::{open_database, open_in_memory, open_read_only};
pub use writer::CatalogWriter;
