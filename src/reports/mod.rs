//! Reporte JSON de conflictos por combinación (semestre, mención 1, mención 2).
//!
//! Es un artefacto de depuración/auditoría: el motor no lo vuelve a leer.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::algorithm::{ConflictGroup, PlanHeader};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub conflict_cells: usize,
    /// Cursos distintos (por código) que aparecen en algún conflicto
    pub conflicting_courses: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport<'a> {
    pub semester: u8,
    pub semester_name: &'a str,
    pub major1_id: i64,
    pub major1_name: &'a str,
    pub major2_id: i64,
    pub major2_name: &'a str,
    pub generated_at: String,
    pub summary: ConflictSummary,
    pub conflicts: &'a [ConflictGroup],
}

pub fn summarize(conflicts: &[ConflictGroup]) -> ConflictSummary {
    let mut codes: Vec<&str> = conflicts
        .iter()
        .flat_map(|g| g.courses.iter().map(|c| c.timetable_code.as_str()))
        .collect();
    codes.sort_unstable();
    codes.dedup();
    ConflictSummary { conflict_cells: conflicts.len(), conflicting_courses: codes.len() }
}

pub fn report_file_name(semester: u8, major1_id: i64, major2_id: i64) -> String {
    format!("conflicts_s{}_m{}_m{}.json", semester, major1_id, major2_id)
}

/// Escribe (o reemplaza) el reporte y devuelve su ruta.
pub fn write_conflict_report<P: AsRef<Path>>(dir: P, header: &PlanHeader, conflicts: &[ConflictGroup]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(header.semester, header.major1_id, header.major2_id));

    let report = ConflictReport {
        semester: header.semester,
        semester_name: &header.semester_name,
        major1_id: header.major1_id,
        major1_name: &header.major1_name,
        major2_id: header.major2_id,
        major2_name: &header.major2_name,
        generated_at: Utc::now().to_rfc3339(),
        summary: summarize(conflicts),
        conflicts,
    };
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, &report)?;
    info!(path = %path.display(), cells = report.summary.conflict_cells, "conflict report saved");
    Ok(path)
}
