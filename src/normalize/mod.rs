//! Normalizador de entidades.
//!
//! Flujo: filas crudas -> `extract` (hechos atómicos con claves de texto) ->
//! `convert` (claves enteras) -> `files` (CSV intermedios) -> storage.
//! `vocabulary` mantiene los maestros nombre <-> id de crecimiento monótono.

pub mod convert;
pub mod extract;
pub mod files;
pub mod vocabulary;

pub use convert::{ConvertedDataset, convert_dataset};
pub use extract::{ExtractStats, ExtractedDataset, extract_dataset};
pub use vocabulary::{Vocabulary, match_key};
