// Configuración desde variables de entorno (con `.env` opcional).
use std::env;
use std::path::PathBuf;

use crate::models::Language;

pub const DEFAULT_DB_PATH: &str = "data/timetable.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_REPORT_DIR: &str = "data/conflict_reports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub bind: String,
    pub report_dir: PathBuf,
    pub lang: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind: DEFAULT_BIND.to_string(),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            lang: Language::default(),
        }
    }
}

impl Settings {
    /// Lee JIKANWARI_DB_PATH, JIKANWARI_BIND, JIKANWARI_REPORT_DIR y JIKANWARI_LANG.
    pub fn from_env() -> Settings {
        let _ = dotenv::dotenv();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectada.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Settings {
            db_path: lookup("JIKANWARI_DB_PATH").map(|p| db_path_from(&p)).unwrap_or(defaults.db_path),
            bind: lookup("JIKANWARI_BIND").filter(|b| !b.trim().is_empty()).unwrap_or(defaults.bind),
            report_dir: lookup("JIKANWARI_REPORT_DIR").map(PathBuf::from).unwrap_or(defaults.report_dir),
            lang: lookup("JIKANWARI_LANG").and_then(|l| Language::from_code(&l)).unwrap_or(defaults.lang),
        }
    }
}

/// Acepta rutas simples y URLs `sqlite://` / `file://`.
pub fn db_path_from(value: &str) -> PathBuf {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix("sqlite://") {
        PathBuf::from(rest)
    } else if let Some(rest) = value.strip_prefix("file://") {
        PathBuf::from(rest)
    } else {
        PathBuf::from(value)
    }
}
