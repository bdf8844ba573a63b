// Cargador relacional: una transacción por ejecución, en orden
// maestros -> course -> relaciones. Si algo falla la transacción se descarta
// sin commit (rollback) y el error sube al llamador.
use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bulletin::RawSectionRecord;
use crate::error::Result;
use crate::models::{
    AffiliatedMajor, ClassFormat, Course, CourseCategory, CourseType, Day, OfferingCategory, Period,
};
use crate::normalize::convert::{ConvertedDataset, lookup_or_null};
use crate::normalize::extract::{ExtractStats, ExtractedDataset, extract_dataset};
use crate::storage::schema::TABLES;
use crate::storage::writer::CatalogWriter;

/// Filas insertadas / omitidas (ya existían) para una tabla.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableTally {
    pub inserted: usize,
    pub skipped: usize,
}

impl TableTally {
    fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.skipped += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub new_instructors: usize,
    pub new_classrooms: usize,
    pub new_majors: usize,
    pub courses: TableTally,
    pub schedules: TableTally,
    pub grades: TableTally,
    pub affiliations: TableTally,
    pub course_classrooms: TableTally,
    /// Filas descartadas por valores que no se pudieron resolver
    pub dropped: usize,
}

impl LoadSummary {
    pub fn inserted_total(&self) -> usize {
        self.courses.inserted
            + self.schedules.inserted
            + self.grades.inserted
            + self.affiliations.inserted
            + self.course_classrooms.inserted
    }
}

/// Importación directa: boletín crudo -> extracción en memoria -> base.
pub fn import_bulletin(conn: &mut Connection, records: &[RawSectionRecord]) -> Result<(ExtractStats, LoadSummary)> {
    let (dataset, stats) = extract_dataset(records);
    let summary = load_extracted(conn, &dataset)?;
    Ok((stats, summary))
}

/// Carga un conjunto extraído (claves de texto) resolviendo maestros con get-or-create.
pub fn load_extracted(conn: &mut Connection, data: &ExtractedDataset) -> Result<LoadSummary> {
    let tx = conn.transaction()?;
    let summary = write_extracted(&tx, data)?;
    tx.commit()?;
    info!(
        courses_inserted = summary.courses.inserted,
        courses_skipped = summary.courses.skipped,
        rows_inserted = summary.inserted_total(),
        "extracted dataset committed"
    );
    Ok(summary)
}

/// Carga un conjunto convertido (claves enteras). Los ids de docentes y salas
/// del CSV se traducen por nombre a los ids de la base.
pub fn load_converted(conn: &mut Connection, data: &ConvertedDataset) -> Result<LoadSummary> {
    let tx = conn.transaction()?;
    let summary = write_converted(&tx, data)?;
    tx.commit()?;
    info!(
        courses_inserted = summary.courses.inserted,
        courses_skipped = summary.courses.skipped,
        rows_inserted = summary.inserted_total(),
        "converted dataset committed"
    );
    Ok(summary)
}

fn write_extracted(conn: &Connection, data: &ExtractedDataset) -> Result<LoadSummary> {
    let before = MasterCounts::read(conn)?;
    let mut summary = LoadSummary::default();

    for row in &data.instructors {
        conn.get_or_create_instructor(&row.name)?;
    }
    for row in &data.classrooms {
        conn.get_or_create_classroom(&row.name)?;
    }

    for c in &data.courses {
        let course = Course {
            timetable_code: c.timetable_code.clone(),
            syllabus_url: Some(c.syllabus_url.trim().to_string()).filter(|s| !s.is_empty()),
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
            main_instructor_id: conn.get_or_create_instructor(&c.main_instructor)?,
        };
        summary.courses.record(conn.upsert_course(&course)?);
    }

    for s in &data.schedules {
        let mut chars = s.day.chars();
        let day = match (chars.next(), chars.next()) {
            (Some(c), None) => Day::from_char(c).filter(|d| d.is_schedulable()),
            _ => None,
        };
        match (day, Period::new(s.period)) {
            (Some(day), Some(period)) => summary.schedules.record(conn.upsert_schedule(&s.timetable_code, day, period)?),
            _ => {
                summary.dropped += 1;
                warn!(code = %s.timetable_code, day = %s.day, period = s.period, "schedule slot not storable, skipped");
            }
        }
    }

    for g in &data.grades {
        summary.grades.record(conn.upsert_grade(&g.timetable_code, &g.grade_name)?);
    }

    for a in &data.affiliations {
        let Some(major_id) = conn.get_or_create_major(&a.major)? else {
            summary.dropped += 1;
            continue;
        };
        let affiliation = AffiliatedMajor {
            timetable_code: a.timetable_code.clone(),
            major_id,
            course_category_id: lookup_or_null(&a.timetable_code, "course category", &a.course_category, |n| {
                CourseCategory::from_name(n).map(CourseCategory::id)
            }),
        };
        summary.affiliations.record(conn.upsert_affiliation(&affiliation)?);
    }

    for cc in &data.course_classrooms {
        match conn.get_or_create_classroom(&cc.classroom)? {
            Some(classroom_id) => {
                summary.course_classrooms.record(conn.upsert_course_classroom(&cc.timetable_code, classroom_id)?)
            }
            None => summary.dropped += 1,
        }
    }

    MasterCounts::read(conn)?.fill_growth(&before, &mut summary);
    Ok(summary)
}

fn write_converted(conn: &Connection, data: &ConvertedDataset) -> Result<LoadSummary> {
    let before = MasterCounts::read(conn)?;
    let mut summary = LoadSummary::default();

    let mut instructor_ids: HashMap<i64, i64> = HashMap::new();
    for row in &data.instructors {
        if let Some(id) = conn.get_or_create_instructor(&row.name)? {
            instructor_ids.insert(row.id, id);
        }
    }
    let mut classroom_ids: HashMap<i64, i64> = HashMap::new();
    for row in &data.classrooms {
        if let Some(id) = conn.get_or_create_classroom(&row.name)? {
            classroom_ids.insert(row.id, id);
        }
    }

    for c in &data.courses {
        let mut course = Course::from(c.clone());
        course.offering_category_id = course.offering_category().map(OfferingCategory::id);
        course.class_format_id = course.class_format().map(ClassFormat::id);
        course.course_type_id = course.course_type().map(CourseType::id);
        course.main_instructor_id = course.main_instructor_id.and_then(|id| {
            let mapped = instructor_ids.get(&id).copied();
            if mapped.is_none() {
                warn!(code = %course.timetable_code, instructor_id = id, "instructor id not in master, storing NULL");
            }
            mapped
        });
        summary.courses.record(conn.upsert_course(&course)?);
    }

    for s in &data.schedules {
        let day = Day::from_id(s.day_id).filter(|d| d.is_schedulable());
        match (day, Period::new(s.period)) {
            (Some(day), Some(period)) => summary.schedules.record(conn.upsert_schedule(&s.timetable_code, day, period)?),
            _ => {
                summary.dropped += 1;
                warn!(code = %s.timetable_code, day_id = s.day_id, period = s.period, "schedule slot not storable, skipped");
            }
        }
    }

    for g in &data.grades {
        summary.grades.record(conn.upsert_grade(&g.timetable_code, &g.grade_name)?);
    }

    for a in &data.affiliations {
        if !major_exists(conn, a.major_id)? {
            summary.dropped += 1;
            warn!(code = %a.timetable_code, major_id = a.major_id, "major id not in master, affiliation skipped");
            continue;
        }
        let mut affiliation = AffiliatedMajor::from(a.clone());
        affiliation.course_category_id = affiliation.course_category().map(CourseCategory::id);
        summary.affiliations.record(conn.upsert_affiliation(&affiliation)?);
    }

    for cc in &data.course_classrooms {
        match classroom_ids.get(&cc.classroom_id) {
            Some(classroom_id) => {
                summary.course_classrooms.record(conn.upsert_course_classroom(&cc.timetable_code, *classroom_id)?)
            }
            None => {
                summary.dropped += 1;
                warn!(code = %cc.timetable_code, classroom_id = cc.classroom_id, "classroom id not in master, skipped");
            }
        }
    }

    MasterCounts::read(conn)?.fill_growth(&before, &mut summary);
    Ok(summary)
}

/// Cantidad de filas por tabla, en orden de dependencia.
pub fn table_counts(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut out = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        out.push((table.to_string(), count_rows(conn, table)?));
    }
    Ok(out)
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

fn major_exists(conn: &Connection, major_id: i64) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM major_master WHERE id = ?1", params![major_id], |row| row.get::<_, i64>(0))
        .optional()?;
    Ok(found.is_some())
}

struct MasterCounts {
    instructors: i64,
    classrooms: i64,
    majors: i64,
}

impl MasterCounts {
    fn read(conn: &Connection) -> Result<MasterCounts> {
        Ok(MasterCounts {
            instructors: count_rows(conn, "instructor_master")?,
            classrooms: count_rows(conn, "classroom_master")?,
            majors: count_rows(conn, "major_master")?,
        })
    }

    fn fill_growth(&self, before: &MasterCounts, summary: &mut LoadSummary) {
        summary.new_instructors = (self.instructors - before.instructors).max(0) as usize;
        summary.new_classrooms = (self.classrooms - before.classrooms).max(0) as usize;
        summary.new_majors = (self.majors - before.majors).max(0) as usize;
        debug!(
            instructors = summary.new_instructors,
            classrooms = summary.new_classrooms,
            majors = summary.new_majors,
            "master rows created"
        );
    }
}
