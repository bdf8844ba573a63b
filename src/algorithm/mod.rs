// Motor de consultas: semestre -> recuperación -> grilla -> conflictos -> créditos.
// Declarar submódulos (archivos en la carpeta `src/algorithm`)
pub mod conflict;
pub mod credits;
pub mod retrieval;
pub mod semester;
pub mod timetable;

pub use conflict::{ConflictCourse, ConflictGroup, apply_priority_choices, conflict_key, detect_conflicts, parse_conflict_key};
pub use credits::{BucketCredits, CreditSummary, aggregate_credits};
pub use retrieval::{courses_for, get_courses_by_semester_and_major};
pub use semester::{course_semesters, semester_set};
pub use timetable::{AssemblyParams, GridEntry, IntensiveEntry, PriorityBucket, Timetable, assemble_timetable};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::algorithm::semester::SEMESTER_COUNT;
use crate::error::{Error, Result};
use crate::models::{KnownMajor, Language, semester_name};
use crate::storage::CourseRepository;

/// Pedido de horario: semestre, par de menciones, idioma y elecciones de
/// prioridad (`conflict_{day}_{period}` -> código) de una ronda anterior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableRequest {
    pub semester: u8,
    pub major1_id: i64,
    pub major2_id: i64,
    #[serde(default)]
    pub lang: Language,
    #[serde(default)]
    pub choices: HashMap<String, String>,
}

/// Encabezado común de la vista y del reporte de conflictos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanHeader {
    pub semester: u8,
    pub semester_name: String,
    pub major1_id: i64,
    pub major1_name: String,
    pub major2_id: i64,
    pub major2_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimetableView {
    #[serde(flatten)]
    pub header: PlanHeader,
    pub timetable: Timetable,
    pub credits: CreditSummary,
    /// Conflictos detectados antes de aplicar elecciones
    pub detected_conflicts: usize,
    /// Conflictos que siguen presentes tras aplicar elecciones
    pub conflicts: Vec<ConflictGroup>,
}

#[derive(Debug, Clone)]
pub enum TimetableOutcome {
    /// Hay conflictos y el pedido no trae elecciones: se devuelven para elegir
    NeedsResolution { header: PlanHeader, conflicts: Vec<ConflictGroup> },
    Ready(TimetableView),
}

/// Nombre de una mención: fijo para las sembradas, el de `major_master` para el resto.
pub fn major_display_name<R>(repo: &R, major_id: i64, lang: Language) -> Result<String>
where
    R: CourseRepository + ?Sized,
{
    if let Some(known) = KnownMajor::from_id(major_id) {
        return Ok(known.name(lang).to_string());
    }
    repo.majors()?
        .into_iter()
        .find(|m| m.id == major_id)
        .map(|m| m.name)
        .ok_or_else(|| Error::NotFound(format!("major {}", major_id)))
}

pub fn plan_header<R>(repo: &R, req: &TimetableRequest) -> Result<PlanHeader>
where
    R: CourseRepository + ?Sized,
{
    if !(1..=SEMESTER_COUNT).contains(&req.semester) {
        return Err(Error::InvalidInput(format!(
            "semester must be between 1 and {}, got {}",
            SEMESTER_COUNT, req.semester
        )));
    }
    Ok(PlanHeader {
        semester: req.semester,
        semester_name: semester_name(req.semester, req.lang),
        major1_id: req.major1_id,
        major1_name: major_display_name(repo, req.major1_id, req.lang)?,
        major2_id: req.major2_id,
        major2_name: major_display_name(repo, req.major2_id, req.lang)?,
    })
}

/// Orquesta el pedido completo. Sin elecciones y con conflictos se corta
/// antes de armar la vista; con elecciones se aplican y se calcula todo.
pub fn plan_timetable<R>(repo: &R, req: &TimetableRequest) -> Result<TimetableOutcome>
where
    R: CourseRepository + ?Sized,
{
    let header = plan_header(repo, req)?;
    let params = AssemblyParams {
        semester: req.semester,
        major1_id: req.major1_id,
        major2_id: req.major2_id,
        lang: req.lang,
    };

    let mut timetable = assemble_timetable(repo, &params)?;
    let detected = detect_conflicts(&timetable);
    if !detected.is_empty() && req.choices.is_empty() {
        info!(conflicts = detected.len(), "conflicts need a priority choice");
        return Ok(TimetableOutcome::NeedsResolution { header, conflicts: detected });
    }

    let resolved = if req.choices.is_empty() { 0 } else { apply_priority_choices(&mut timetable, &req.choices) };
    let conflicts = detect_conflicts(&timetable);
    let credits = aggregate_credits(&timetable);
    info!(
        detected = detected.len(),
        resolved,
        remaining = conflicts.len(),
        total_credits = credits.total,
        "timetable ready"
    );
    Ok(TimetableOutcome::Ready(TimetableView {
        header,
        timetable,
        credits,
        detected_conflicts: detected.len(),
        conflicts,
    }))
}
