//! CSV intermedios por entidad (extraídos y convertidos).
//!
//! Ambos juegos usan los mismos nombres de archivo; se escriben en UTF-8 con
//! BOM para que las hojas de cálculo los abran sin romper el japonés.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::Result;
use crate::models::{CourseClassroom, GradeYear, MasterRow};
use crate::normalize::convert::{ConvertedAffiliation, ConvertedCourse, ConvertedDataset, ConvertedSchedule};
use crate::normalize::extract::ExtractedDataset;

pub const COURSE_CSV: &str = "course.csv";
pub const COURSE_SCHEDULE_CSV: &str = "course_schedule.csv";
pub const GRADE_YEAR_CSV: &str = "grade_year.csv";
pub const AFFILIATED_MAJOR_CSV: &str = "affiliated_major.csv";
pub const COURSE_CLASSROOM_CSV: &str = "course_classroom.csv";
pub const INSTRUCTOR_MASTER_CSV: &str = "instructor_master.csv";
pub const CLASSROOM_MASTER_CSV: &str = "classroom_master.csv";

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Fila de maestro en los CSV extraídos (encabezados en japonés).
#[derive(Debug, serde::Deserialize, Serialize)]
struct InstructorCsvRow {
    #[serde(rename = "教員ID")]
    id: i64,
    #[serde(rename = "教員名")]
    name: String,
}

#[derive(Debug, serde::Deserialize, Serialize)]
struct ClassroomCsvRow {
    #[serde(rename = "教室ID")]
    id: i64,
    #[serde(rename = "教室名")]
    name: String,
}

pub fn write_rows<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<usize> {
    let mut file = File::create(path.as_ref())?;
    file.write_all(BOM)?;
    let mut writer = WriterBuilder::new().from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

pub fn read_rows<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let bytes = fs::read(path.as_ref())?;
    let content = String::from_utf8_lossy(&bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(content.as_bytes());
    let mut out = Vec::new();
    for row in reader.deserialize() {
        out.push(row?);
    }
    Ok(out)
}

impl ExtractedDataset {
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        write_rows(dir.join(COURSE_CSV), &self.courses)?;
        write_rows(dir.join(COURSE_SCHEDULE_CSV), &self.schedules)?;
        write_rows(dir.join(GRADE_YEAR_CSV), &self.grades)?;
        write_rows(dir.join(AFFILIATED_MAJOR_CSV), &self.affiliations)?;
        write_rows(dir.join(COURSE_CLASSROOM_CSV), &self.course_classrooms)?;
        let instructors: Vec<InstructorCsvRow> =
            self.instructors.iter().map(|r| InstructorCsvRow { id: r.id, name: r.name.clone() }).collect();
        write_rows(dir.join(INSTRUCTOR_MASTER_CSV), &instructors)?;
        let classrooms: Vec<ClassroomCsvRow> =
            self.classrooms.iter().map(|r| ClassroomCsvRow { id: r.id, name: r.name.clone() }).collect();
        write_rows(dir.join(CLASSROOM_MASTER_CSV), &classrooms)?;
        info!(dir = %dir.display(), courses = self.courses.len(), "extracted CSVs written");
        Ok(())
    }

    pub fn read_from_dir<P: AsRef<Path>>(dir: P) -> Result<ExtractedDataset> {
        let dir = dir.as_ref();
        let instructors: Vec<InstructorCsvRow> = read_rows(dir.join(INSTRUCTOR_MASTER_CSV))?;
        let classrooms: Vec<ClassroomCsvRow> = read_rows(dir.join(CLASSROOM_MASTER_CSV))?;
        Ok(ExtractedDataset {
            courses: read_rows(dir.join(COURSE_CSV))?,
            schedules: read_rows(dir.join(COURSE_SCHEDULE_CSV))?,
            grades: read_rows(dir.join(GRADE_YEAR_CSV))?,
            affiliations: read_rows(dir.join(AFFILIATED_MAJOR_CSV))?,
            course_classrooms: read_rows(dir.join(COURSE_CLASSROOM_CSV))?,
            instructors: instructors.into_iter().map(|r| MasterRow { id: r.id, name: r.name }).collect(),
            classrooms: classrooms.into_iter().map(|r| MasterRow { id: r.id, name: r.name }).collect(),
        })
    }
}

impl ConvertedDataset {
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        write_rows(dir.join(INSTRUCTOR_MASTER_CSV), &self.instructors)?;
        write_rows(dir.join(CLASSROOM_MASTER_CSV), &self.classrooms)?;
        write_rows(dir.join(COURSE_CSV), &self.courses)?;
        write_rows(dir.join(COURSE_SCHEDULE_CSV), &self.schedules)?;
        write_rows(dir.join(GRADE_YEAR_CSV), &self.grades)?;
        write_rows(dir.join(AFFILIATED_MAJOR_CSV), &self.affiliations)?;
        write_rows(dir.join(COURSE_CLASSROOM_CSV), &self.course_classrooms)?;
        info!(dir = %dir.display(), courses = self.courses.len(), "converted CSVs written");
        Ok(())
    }

    pub fn read_from_dir<P: AsRef<Path>>(dir: P) -> Result<ConvertedDataset> {
        let dir = dir.as_ref();
        let courses: Vec<ConvertedCourse> = read_rows(dir.join(COURSE_CSV))?;
        let schedules: Vec<ConvertedSchedule> = read_rows(dir.join(COURSE_SCHEDULE_CSV))?;
        let grades: Vec<GradeYear> = read_rows(dir.join(GRADE_YEAR_CSV))?;
        let affiliations: Vec<ConvertedAffiliation> = read_rows(dir.join(AFFILIATED_MAJOR_CSV))?;
        let course_classrooms: Vec<CourseClassroom> = read_rows(dir.join(COURSE_CLASSROOM_CSV))?;
        Ok(ConvertedDataset {
            instructors: read_rows(dir.join(INSTRUCTOR_MASTER_CSV))?,
            classrooms: read_rows(dir.join(CLASSROOM_MASTER_CSV))?,
            courses,
            schedules,
            grades,
            affiliations,
            course_classrooms,
        })
    }
}
