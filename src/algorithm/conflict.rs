// Funciones para detectar conflictos de cuartos en la grilla y aplicar la
// elección de prioridad del usuario por celda.
use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::algorithm::timetable::{GridEntry, PriorityBucket, Timetable};
use crate::models::{Language, OfferingCategory, Period, Weekday};

/// Curso involucrado en un conflicto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictCourse {
    pub timetable_code: String,
    pub course_title: String,
    pub instructor: Option<String>,
    pub bucket: PriorityBucket,
    pub credits: i64,
    pub offering_category: Option<OfferingCategory>,
    pub offering_category_name: Option<String>,
}

impl From<&GridEntry> for ConflictCourse {
    fn from(e: &GridEntry) -> Self {
        ConflictCourse {
            timetable_code: e.timetable_code.clone(),
            course_title: e.course_title.clone(),
            instructor: e.instructor.clone(),
            bucket: e.bucket,
            credits: e.credits,
            offering_category: e.offering_category,
            offering_category_name: e.offering_category_name.clone(),
        }
    }
}

/// Celda con dos o más cursos cuyos cuartos se solapan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictGroup {
    /// Clave para la elección de prioridad: `conflict_{day_id}_{period}`
    pub key: String,
    pub day: Weekday,
    pub day_id: i64,
    pub period: u8,
    pub courses: Vec<ConflictCourse>,
}

impl ConflictGroup {
    pub fn day_name(&self, lang: Language) -> &'static str {
        self.day.day().name(lang)
    }
}

/// true si ambos cursos se dictan en algún cuarto común. Sin categoría no hay solape.
pub fn quarters_overlap(a: Option<OfferingCategory>, b: Option<OfferingCategory>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.overlaps(b),
        _ => false,
    }
}

pub fn conflict_key(day: Weekday, period: Period) -> String {
    format!("conflict_{}_{}", day.day().id(), period.number())
}

/// Inversa de `conflict_key`. Claves mal formadas o fuera de Lun..Vie / 1..6 -> None.
pub fn parse_conflict_key(key: &str) -> Option<(Weekday, Period)> {
    let rest = key.trim().strip_prefix("conflict_")?;
    let (day, period) = rest.split_once('_')?;
    let day = crate::models::Day::from_id(day.parse().ok()?)?;
    let weekday = Weekday::from_day(day)?;
    let period = Period::new(period.parse().ok()?)?;
    Some((weekday, period))
}

/// Índices de la celda que participan en algún par solapado.
fn conflicting_indexes(cell: &[GridEntry]) -> BTreeSet<usize> {
    let mut involved = BTreeSet::new();
    if cell.len() < 2 {
        return involved;
    }
    for i in 0..cell.len() {
        for j in (i + 1)..cell.len() {
            if quarters_overlap(cell[i].offering_category, cell[j].offering_category) {
                involved.insert(i);
                involved.insert(j);
            }
        }
    }
    involved
}

/// Grupos de conflicto en orden día, período. Sin conflictos -> lista vacía.
pub fn detect_conflicts(timetable: &Timetable) -> Vec<ConflictGroup> {
    let mut groups = Vec::new();
    for (day, period, cell) in timetable.cells() {
        let involved = conflicting_indexes(cell);
        if involved.len() < 2 {
            continue;
        }
        groups.push(ConflictGroup {
            key: conflict_key(day, period),
            day,
            day_id: day.day().id(),
            period: period.number(),
            courses: involved.iter().map(|i| ConflictCourse::from(&cell[*i])).collect(),
        });
    }
    debug!(groups = groups.len(), "conflict detection done");
    groups
}

/// Aplica `{ "conflict_{day}_{period}": código }`: en cada celda en conflicto
/// con elección se quitan los cursos distintos del elegido. Celdas sin
/// conflicto o sin elección quedan igual. Devuelve las celdas resueltas.
pub fn apply_priority_choices(timetable: &mut Timetable, choices: &HashMap<String, String>) -> usize {
    let conflicted: HashSet<String> = detect_conflicts(timetable).into_iter().map(|g| g.key).collect();
    let mut resolved = 0;

    for (key, chosen) in choices {
        let Some((day, period)) = parse_conflict_key(key) else {
            warn!(key = %key, "ignoring malformed conflict choice key");
            continue;
        };
        if !conflicted.contains(&conflict_key(day, period)) {
            debug!(key = %key, "choice for a cell without conflict, ignored");
            continue;
        }
        let chosen = chosen.trim();
        let cell = timetable.cell_mut(day, period);
        if !cell.iter().any(|e| e.timetable_code == chosen) {
            warn!(key = %key, code = chosen, "chosen course is not in the cell, leaving it untouched");
            continue;
        }
        cell.retain(|e| e.timetable_code == chosen);
        resolved += 1;
    }
    resolved
}
