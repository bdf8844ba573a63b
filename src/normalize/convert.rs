// Conversión de los CSV extraídos (texto) a ids enteros listos para cargar.
// Un código desconocido queda como NULL en lugar de abortar la fila.
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::models::{
    AffiliatedMajor, ClassFormat, Course, CourseCategory, CourseClassroom, CourseType, Day, GradeYear,
    KnownMajor, MasterRow, OfferingCategory, Period,
};
use crate::normalize::extract::ExtractedDataset;
use crate::normalize::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedCourse {
    pub timetable_code: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub syllabus_url: Option<String>,
    pub course_title: String,
    #[serde(default, deserialize_with = "lenient_credits")]
    pub credits: i64,
    #[serde(default, deserialize_with = "lenient_id")]
    pub offering_category_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub class_format_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub course_type_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub main_instructor_id: Option<i64>,
}

impl From<ConvertedCourse> for Course {
    fn from(c: ConvertedCourse) -> Course {
        Course {
            timetable_code: c.timetable_code,
            syllabus_url: c.syllabus_url,
            course_title: c.course_title,
            credits: c.credits,
            offering_category_id: c.offering_category_id,
            class_format_id: c.class_format_id,
            course_type_id: c.course_type_id,
            main_instructor_id: c.main_instructor_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConvertedSchedule {
    pub timetable_code: String,
    pub day_id: i64,
    pub period: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedAffiliation {
    pub timetable_code: String,
    pub major_id: i64,
    #[serde(default, deserialize_with = "lenient_id")]
    pub course_category_id: Option<i64>,
}

impl From<ConvertedAffiliation> for AffiliatedMajor {
    fn from(a: ConvertedAffiliation) -> AffiliatedMajor {
        AffiliatedMajor {
            timetable_code: a.timetable_code,
            major_id: a.major_id,
            course_category_id: a.course_category_id,
        }
    }
}

/// Conjunto convertido, mismo contenido que el extraído pero con claves numéricas.
#[derive(Debug, Clone, Default)]
pub struct ConvertedDataset {
    pub instructors: Vec<MasterRow>,
    pub classrooms: Vec<MasterRow>,
    pub courses: Vec<ConvertedCourse>,
    pub schedules: Vec<ConvertedSchedule>,
    pub grades: Vec<GradeYear>,
    pub affiliations: Vec<ConvertedAffiliation>,
    pub course_classrooms: Vec<CourseClassroom>,
}

/// Convierte usando los maestros cerrados (enums) y los maestros de
/// docentes/salas incluidos en el propio conjunto extraído.
pub fn convert_dataset(extracted: &ExtractedDataset) -> ConvertedDataset {
    let instructors = Vocabulary::from_rows(extracted.instructors.iter().cloned());
    let classrooms = Vocabulary::from_rows(extracted.classrooms.iter().cloned());

    let courses: Vec<ConvertedCourse> = extracted
        .courses
        .iter()
        .map(|c| ConvertedCourse {
            timetable_code: c.timetable_code.clone(),
            syllabus_url: non_empty(&c.syllabus_url),
            course_title: c.course_title.clone(),
            credits: c.credits,
            offering_category_id: lookup_or_null(&c.timetable_code, "offering category", &c.offering_category, |n| {
                OfferingCategory::from_name(n).map(OfferingCategory::id)
            }),
            class_format_id: lookup_or_null(&c.timetable_code, "class format", &c.class_format, |n| {
                ClassFormat::from_name(n).map(ClassFormat::id)
            }),
            course_type_id: lookup_or_null(&c.timetable_code, "course type", &c.course_type, |n| {
                CourseType::from_name(n).map(CourseType::id)
            }),
            main_instructor_id: lookup_or_null(&c.timetable_code, "instructor", &c.main_instructor, |n| {
                instructors.lookup(n)
            }),
        })
        .collect();

    let mut schedules = Vec::new();
    for s in &extracted.schedules {
        let day = s.day.chars().next().filter(|_| s.day.chars().count() == 1).and_then(Day::from_char);
        match (day.filter(|d| d.is_schedulable()), Period::new(s.period)) {
            (Some(day), Some(period)) => schedules.push(ConvertedSchedule {
                timetable_code: s.timetable_code.clone(),
                day_id: day.id(),
                period: period.number(),
            }),
            _ => warn!(
                code = %s.timetable_code,
                day = %s.day,
                period = s.period,
                "dropping schedule slot outside Mon..Sat / periods 1..6"
            ),
        }
    }

    let grades = extracted
        .grades
        .iter()
        .map(|g| GradeYear { timetable_code: g.timetable_code.clone(), grade_name: g.grade_name.clone() })
        .collect();

    let mut affiliations = Vec::new();
    for a in &extracted.affiliations {
        // La mención es parte de la clave natural: sin id no hay fila
        let Some(major) = KnownMajor::from_name(&a.major) else {
            warn!(code = %a.timetable_code, major = %a.major, "unknown major code, dropping affiliation");
            continue;
        };
        affiliations.push(ConvertedAffiliation {
            timetable_code: a.timetable_code.clone(),
            major_id: major.id(),
            course_category_id: lookup_or_null(&a.timetable_code, "course category", &a.course_category, |n| {
                CourseCategory::from_name(n).map(CourseCategory::id)
            }),
        });
    }

    let mut course_classrooms = Vec::new();
    for cc in &extracted.course_classrooms {
        match classrooms.lookup(&cc.classroom) {
            Some(classroom_id) => course_classrooms.push(CourseClassroom {
                timetable_code: cc.timetable_code.clone(),
                classroom_id,
            }),
            None => warn!(code = %cc.timetable_code, classroom = %cc.classroom, "classroom not in master, dropping"),
        }
    }

    let converted = ConvertedDataset {
        instructors: instructors.rows().to_vec(),
        classrooms: classrooms.rows().to_vec(),
        courses,
        schedules,
        grades,
        affiliations,
        course_classrooms,
    };
    info!(
        courses = converted.courses.len(),
        schedules = converted.schedules.len(),
        affiliations = converted.affiliations.len(),
        course_classrooms = converted.course_classrooms.len(),
        "extracted data converted to ids"
    );
    converted
}

/// Código de maestro cerrado -> id; vacío o desconocido -> None (con aviso).
pub(crate) fn lookup_or_null<F>(code: &str, what: &str, value: &str, lookup: F) -> Option<i64>
where
    F: FnOnce(&str) -> Option<i64>,
{
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let id = lookup(value);
    if id.is_none() {
        warn!(code, what, value, "unknown master value, storing NULL");
    }
    id
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

// Ids maestros mal formados ("", "abc", "1.5") -> NULL
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<i64>().ok()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(non_empty))
}

fn lenient_credits<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0))
}
