// Biblioteca raíz del crate `jikanwari`.
// Importa el boletín académico (CSV) a una base relacional normalizada y
// arma, para un semestre y un par de menciones, la grilla semanal con sus
// conflictos y créditos.
pub mod algorithm;
pub mod api_json;
pub mod bulletin;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod reports;
pub mod server;
pub mod storage;

pub use error::{Error, Result};

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
