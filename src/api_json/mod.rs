use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::algorithm::{ConflictGroup, GridEntry, PlanHeader, TimetableRequest, TimetableView, conflict_key};
use crate::models::{Course, Language, MasterRow, Period, Weekday};

/// Cuerpo de `POST /timetable`.
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "semester": 3,
///   "major1_id": 1,
///   "major2_id": 2,
///   "lang": "ja",
///   "choices": { "conflict_1_2": "T1234" }
/// }
/// ```
///
/// - `lang`: `ja` (por defecto) o `en`
/// - `choices`: opcional; una elección de código por celda en conflicto,
///   devuelta por una llamada anterior con `status = "needs_resolution"`
pub fn parse_json_input(json_str: &str) -> Result<TimetableRequest, serde_json::Error> {
    serde_json::from_str::<TimetableRequest>(json_str)
}

/// Parámetros de `GET /courses`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursesQuery {
    pub semester: u8,
    #[serde(default)]
    pub major_id: Option<i64>,
    #[serde(default)]
    pub lang: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDto {
    pub timetable_code: String,
    pub course_title: String,
    pub credits: i64,
    pub syllabus_url: Option<String>,
    pub offering_category: Option<String>,
    pub class_format: Option<String>,
    pub course_type: Option<String>,
}

pub fn course_to_dto(c: &Course, lang: Language) -> CourseDto {
    CourseDto {
        timetable_code: c.timetable_code.clone(),
        course_title: c.course_title.clone(),
        credits: c.credits,
        syllabus_url: c.syllabus_url.clone(),
        offering_category: c.offering_category().map(|o| o.name(lang).to_string()),
        class_format: c.class_format().map(|f| f.name(lang).to_string()),
        course_type: c.course_type().map(|t| t.name(lang).to_string()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridCellDto<'a> {
    pub period: u8,
    pub key: String,
    pub courses: &'a [GridEntry],
}

#[derive(Debug, Clone, Serialize)]
pub struct GridDayDto<'a> {
    pub day_id: i64,
    pub day_name: &'static str,
    pub periods: Vec<GridCellDto<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictGroupDto<'a> {
    #[serde(flatten)]
    pub group: &'a ConflictGroup,
    pub day_name: &'static str,
}

pub fn conflicts_to_dto(conflicts: &[ConflictGroup], lang: Language) -> Vec<ConflictGroupDto<'_>> {
    conflicts.iter().map(|g| ConflictGroupDto { group: g, day_name: g.day_name(lang) }).collect()
}

/// Grilla por día (Lun..Vie), cada uno con sus seis períodos.
pub fn grid_to_dto(view: &TimetableView, lang: Language) -> Vec<GridDayDto<'_>> {
    Weekday::ALL
        .iter()
        .map(|d| GridDayDto {
            day_id: d.day().id(),
            day_name: d.day().name(lang),
            periods: Period::all()
                .map(|p| GridCellDto {
                    period: p.number(),
                    key: conflict_key(*d, p),
                    courses: view.timetable.cell(*d, p),
                })
                .collect(),
        })
        .collect()
}

pub fn needs_resolution_response(header: &PlanHeader, conflicts: &[ConflictGroup], lang: Language) -> Value {
    json!({
        "status": "needs_resolution",
        "header": header,
        "conflicts": conflicts_to_dto(conflicts, lang),
    })
}

pub fn ready_response(view: &TimetableView, lang: Language) -> Value {
    json!({
        "status": "ready",
        "header": view.header,
        "grid": grid_to_dto(view, lang),
        "intensive": view.timetable.intensive,
        "credits": view.credits,
        "detected_conflicts": view.detected_conflicts,
        "conflicts": conflicts_to_dto(&view.conflicts, lang),
    })
}

pub fn majors_response(majors: &[MasterRow], lang: Language) -> Value {
    let rows: Vec<Value> = majors
        .iter()
        .map(|m| {
            let name = crate::models::KnownMajor::from_id(m.id).map(|k| k.name(lang).to_string()).unwrap_or_else(|| m.name.clone());
            json!({"id": m.id, "name": name})
        })
        .collect();
    json!({ "majors": rows })
}
