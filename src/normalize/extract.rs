// Extracción: filas crudas del boletín -> conjuntos de hechos atómicos por
// entidad, todavía con claves de texto (legibles).
use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bulletin::RawSectionRecord;
use crate::bulletin::compact::{Pairing, parse_classrooms, parse_day_periods, parse_grades, parse_majors};
use crate::models::MasterRow;
use crate::normalize::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCourse {
    #[serde(rename = "時間割コード")]
    pub timetable_code: String,
    #[serde(rename = "シラバスURL")]
    pub syllabus_url: String,
    #[serde(rename = "開講科目名")]
    pub course_title: String,
    #[serde(rename = "単位数")]
    pub credits: i64,
    #[serde(rename = "開講区分ID")]
    pub offering_category: String,
    #[serde(rename = "授業形態ID")]
    pub class_format: String,
    #[serde(rename = "授業種別ID")]
    pub course_type: String,
    #[serde(rename = "主担当教員ID")]
    pub main_instructor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtractedSchedule {
    #[serde(rename = "時間割コード")]
    pub timetable_code: String,
    #[serde(rename = "曜日")]
    pub day: String,
    #[serde(rename = "時限")]
    pub period: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtractedGrade {
    #[serde(rename = "時間割コード")]
    pub timetable_code: String,
    #[serde(rename = "学年名")]
    pub grade_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedAffiliation {
    #[serde(rename = "時間割コード")]
    pub timetable_code: String,
    #[serde(rename = "メジャー")]
    pub major: String,
    #[serde(rename = "履修区分ID")]
    pub course_category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtractedCourseClassroom {
    #[serde(rename = "時間割コード")]
    pub timetable_code: String,
    #[serde(rename = "教室名")]
    pub classroom: String,
}

/// Resultado de la extracción. Un curso por código (primera fila gana para
/// los escalares); las relaciones de conjunto acumulan todas las filas.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDataset {
    pub courses: Vec<ExtractedCourse>,
    pub schedules: Vec<ExtractedSchedule>,
    pub grades: Vec<ExtractedGrade>,
    pub affiliations: Vec<ExtractedAffiliation>,
    pub course_classrooms: Vec<ExtractedCourseClassroom>,
    pub instructors: Vec<MasterRow>,
    pub classrooms: Vec<MasterRow>,
}

/// Contadores informativos de la extracción.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub rows: usize,
    pub unscheduled_rows: usize,
    pub cross_product_rows: usize,
}

pub fn extract_dataset(records: &[RawSectionRecord]) -> (ExtractedDataset, ExtractStats) {
    let mut stats = ExtractStats { rows: records.len(), ..Default::default() };

    let mut courses: BTreeMap<String, ExtractedCourse> = BTreeMap::new();
    let mut schedules: BTreeSet<ExtractedSchedule> = BTreeSet::new();
    let mut grades: BTreeSet<ExtractedGrade> = BTreeSet::new();
    let mut affiliations: Vec<ExtractedAffiliation> = Vec::new();
    let mut seen_affiliations: HashSet<ExtractedAffiliation> = HashSet::new();
    let mut course_classrooms: BTreeSet<ExtractedCourseClassroom> = BTreeSet::new();
    let mut instructor_names: BTreeSet<String> = BTreeSet::new();
    let mut classroom_names: BTreeSet<String> = BTreeSet::new();

    for row in records {
        let code = row.timetable_code.trim();
        if code.is_empty() {
            continue;
        }

        if courses.contains_key(code) {
            debug!(code, "timetable code already seen, keeping first row's scalar fields");
        } else {
            courses.insert(
                code.to_string(),
                ExtractedCourse {
                    timetable_code: code.to_string(),
                    syllabus_url: row.syllabus_url.trim().to_string(),
                    course_title: row.course_title.trim().to_string(),
                    credits: row.credit_count(),
                    offering_category: row.offering_category.trim().to_string(),
                    class_format: row.class_format.trim().to_string(),
                    course_type: row.course_type.trim().to_string(),
                    main_instructor: row.main_instructor.trim().to_string(),
                },
            );
        }

        let parsed = parse_day_periods(&row.days, &row.periods);
        match parsed.pairing {
            Pairing::Unscheduled => stats.unscheduled_rows += 1,
            Pairing::CrossProduct => {
                stats.cross_product_rows += 1;
                warn!(
                    code,
                    days = row.days.trim(),
                    periods = row.periods.trim(),
                    slots = parsed.slots.len(),
                    "ambiguous day/period strings, falling back to full cross product"
                );
            }
            _ => {}
        }
        for (day, period) in parsed.slots {
            schedules.insert(ExtractedSchedule { timetable_code: code.to_string(), day: day.to_string(), period });
        }

        for grade_name in parse_grades(&row.grades) {
            grades.insert(ExtractedGrade { timetable_code: code.to_string(), grade_name });
        }

        for major in parse_majors(&row.majors, &row.course_title) {
            let aff = ExtractedAffiliation {
                timetable_code: code.to_string(),
                major,
                course_category: row.course_category.trim().to_string(),
            };
            if seen_affiliations.insert(aff.clone()) {
                affiliations.push(aff);
            }
        }

        let instructor = row.main_instructor.trim();
        if !instructor.is_empty() {
            instructor_names.insert(instructor.to_string());
        }

        for classroom in parse_classrooms(&row.classrooms) {
            classroom_names.insert(classroom.clone());
            course_classrooms.insert(ExtractedCourseClassroom { timetable_code: code.to_string(), classroom });
        }
    }

    // Orden estable por (código, mención): ante categorías distintas para el
    // mismo par, la de la primera fila queda primero.
    affiliations.sort_by(|a, b| (&a.timetable_code, &a.major).cmp(&(&b.timetable_code, &b.major)));

    let dataset = ExtractedDataset {
        courses: courses.into_values().collect(),
        schedules: schedules.into_iter().collect(),
        grades: grades.into_iter().collect(),
        affiliations,
        course_classrooms: course_classrooms.into_iter().collect(),
        instructors: number_sorted(instructor_names),
        classrooms: number_sorted(classroom_names),
    };

    info!(
        rows = stats.rows,
        courses = dataset.courses.len(),
        schedules = dataset.schedules.len(),
        grades = dataset.grades.len(),
        affiliations = dataset.affiliations.len(),
        course_classrooms = dataset.course_classrooms.len(),
        instructors = dataset.instructors.len(),
        classrooms = dataset.classrooms.len(),
        "bulletin extracted"
    );
    (dataset, stats)
}

// Ids 1..n en orden alfabético de nombre
fn number_sorted(names: BTreeSet<String>) -> Vec<MasterRow> {
    let mut vocab = Vocabulary::new();
    for name in &names {
        vocab.get_or_create(name);
    }
    vocab.rows().to_vec()
}
