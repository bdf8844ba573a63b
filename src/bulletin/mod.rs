//! Lectura del boletín anual exportado en CSV (una fila por par sección/mención).
//!
//! Submódulos:
//! - `compact`: decodifica los campos multi-valor compactados (días, períodos,
//!   grados, menciones, salas) a tuplas atómicas.

pub mod compact;

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Una fila del boletín tal como viene en el CSV. Es transitoria: la consume
/// el normalizador y nunca se persiste.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSectionRecord {
    #[serde(rename = "時間割コード")]
    pub timetable_code: String,
    #[serde(rename = "シラバスURL")]
    pub syllabus_url: String,
    #[serde(rename = "開講科目名")]
    pub course_title: String,
    #[serde(rename = "単位数")]
    pub credits: String,
    #[serde(rename = "開講区分ID")]
    pub offering_category: String,
    #[serde(rename = "授業形態ID")]
    pub class_format: String,
    #[serde(rename = "授業種別ID")]
    pub course_type: String,
    #[serde(rename = "主担当教員ID")]
    pub main_instructor: String,
    #[serde(rename = "曜日")]
    pub days: String,
    #[serde(rename = "時限")]
    pub periods: String,
    #[serde(rename = "学年")]
    pub grades: String,
    #[serde(rename = "メジャー")]
    pub majors: String,
    #[serde(rename = "履修区分ID")]
    pub course_category: String,
    #[serde(rename = "教室名")]
    pub classrooms: String,
}

impl RawSectionRecord {
    /// Créditos como entero: vacío -> 0, no numérico -> 0 con aviso.
    pub fn credit_count(&self) -> i64 {
        let raw = self.credits.trim();
        if raw.is_empty() {
            return 0;
        }
        match raw.parse::<i64>() {
            Ok(c) => c,
            Err(_) => {
                warn!(code = %self.timetable_code, credits = raw, "credit count is not numeric, using 0");
                0
            }
        }
    }
}

/// Lee el CSV del boletín (UTF-8 con BOM) desde disco.
pub fn read_bulletin_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawSectionRecord>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let records = parse_bulletin(&content)?;
    info!(path = %path.display(), rows = records.len(), "bulletin loaded");
    Ok(records)
}

/// Parsea el contenido del boletín. Las filas sin código de horario se
/// descartan en silencio; las filas ilegibles se descartan con aviso.
pub fn parse_bulletin(content: &str) -> Result<Vec<RawSectionRecord>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    // Trim::All también limpia encabezados como "学年 " (con espacio final)
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut out = Vec::new();
    for (idx, result) in reader.deserialize::<RawSectionRecord>().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(row = idx + 1, error = %e, "skipping unreadable bulletin row");
                continue;
            }
        };
        if record.timetable_code.is_empty() {
            debug!(row = idx + 1, "skipping bulletin row without timetable code");
            continue;
        }
        out.push(record);
    }
    Ok(out)
}
