// Estructuras de datos principales
pub mod masters;

pub use masters::{
    ClassFormat, CourseCategory, CourseType, Day, KnownMajor, Language, OfferingCategory,
    classroom_undecided, semester_name,
};

use serde::{Deserialize, Serialize};

/// Curso normalizado. La clave es el código de horario (時間割コード);
/// se inserta una sola vez y no se modifica en importaciones posteriores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub timetable_code: String,
    pub syllabus_url: Option<String>,
    pub course_title: String,
    pub credits: i64,
    pub offering_category_id: Option<i64>,
    pub class_format_id: Option<i64>,
    pub course_type_id: Option<i64>,
    pub main_instructor_id: Option<i64>,
}

impl Course {
    pub fn offering_category(&self) -> Option<OfferingCategory> {
        self.offering_category_id.and_then(OfferingCategory::from_id)
    }

    pub fn class_format(&self) -> Option<ClassFormat> {
        self.class_format_id.and_then(ClassFormat::from_id)
    }

    pub fn course_type(&self) -> Option<CourseType> {
        self.course_type_id.and_then(CourseType::from_id)
    }
}

// Igualdad por código de horario
impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.timetable_code == other.timetable_code
    }
}

impl Eq for Course {}

impl std::hash::Hash for Course {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.timetable_code.hash(state);
    }
}

/// Un bloque semanal (curso, día, período).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseSchedule {
    pub timetable_code: String,
    pub day: Day,
    pub period: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradeYear {
    pub timetable_code: String,
    pub grade_name: String,
}

impl GradeYear {
    pub fn grade(&self) -> Option<u8> {
        self.grade_name.trim().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffiliatedMajor {
    pub timetable_code: String,
    pub major_id: i64,
    pub course_category_id: Option<i64>,
}

impl AffiliatedMajor {
    pub fn course_category(&self) -> Option<CourseCategory> {
        self.course_category_id.and_then(CourseCategory::from_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseClassroom {
    pub timetable_code: String,
    pub classroom_id: i64,
}

/// Fila de cualquier maestro nombre <-> id (教員, 教室, メジャー...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MasterRow {
    pub id: i64,
    pub name: String,
}

/// Día lectivo de la grilla (Lunes..Viernes). El sábado se guarda pero no se dibuja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn from_day(day: Day) -> Option<Weekday> {
        match day {
            Day::Monday => Some(Weekday::Monday),
            Day::Tuesday => Some(Weekday::Tuesday),
            Day::Wednesday => Some(Weekday::Wednesday),
            Day::Thursday => Some(Weekday::Thursday),
            Day::Friday => Some(Weekday::Friday),
            Day::Saturday | Day::Other => None,
        }
    }

    pub fn day(self) -> Day {
        match self {
            Weekday::Monday => Day::Monday,
            Weekday::Tuesday => Day::Tuesday,
            Weekday::Wednesday => Day::Wednesday,
            Weekday::Thursday => Day::Thursday,
            Weekday::Friday => Day::Friday,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Período lectivo 1..=6. El 0 ("otro") nunca llega a la grilla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Period(u8);

impl TryFrom<u8> for Period {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Period::new(n).ok_or_else(|| format!("period out of range: {}", n))
    }
}

impl From<Period> for u8 {
    fn from(p: Period) -> u8 {
        p.0
    }
}

impl Period {
    pub const COUNT: usize = 6;

    pub fn new(n: u8) -> Option<Period> {
        if (1..=6).contains(&n) { Some(Period(n)) } else { None }
    }

    pub fn all() -> impl Iterator<Item = Period> {
        (1..=6).map(Period)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}
