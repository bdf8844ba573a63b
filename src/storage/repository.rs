// Contrato de lectura usado por el motor de consultas. El núcleo nunca arma
// SQL: sólo depende de estos métodos y de colecciones ya materializadas.
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::warn;

use crate::error::Result;
use crate::models::{AffiliatedMajor, Course, CourseSchedule, Day, GradeYear, MasterRow};

pub trait CourseRepository {
    fn course_by_code(&self, code: &str) -> Result<Option<Course>>;
    fn all_courses(&self) -> Result<Vec<Course>>;
    fn courses_in_major(&self, major_id: i64) -> Result<Vec<Course>>;
    fn schedules_of(&self, code: &str) -> Result<Vec<CourseSchedule>>;
    fn grades_of(&self, code: &str) -> Result<Vec<GradeYear>>;
    fn affiliations_of(&self, code: &str) -> Result<Vec<AffiliatedMajor>>;
    /// Nombres de sala del curso, en orden alfabético.
    fn classrooms_of(&self, code: &str) -> Result<Vec<String>>;
    fn instructor_name(&self, instructor_id: i64) -> Result<Option<String>>;
    fn majors(&self) -> Result<Vec<MasterRow>>;
}

/// Implementación sobre una conexión SQLite prestada (también sirve una transacción).
pub struct SqliteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteRepository { conn }
    }
}

const COURSE_COLUMNS: &str = "c.timetable_code, c.syllabus_url, c.course_title, c.credits,
    c.offering_category_id, c.class_format_id, c.course_type_id, c.main_instructor_id";

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        timetable_code: row.get(0)?,
        syllabus_url: row.get(1)?,
        course_title: row.get(2)?,
        credits: row.get(3)?,
        offering_category_id: row.get(4)?,
        class_format_id: row.get(5)?,
        course_type_id: row.get(6)?,
        main_instructor_id: row.get(7)?,
    })
}

impl CourseRepository for SqliteRepository<'_> {
    fn course_by_code(&self, code: &str) -> Result<Option<Course>> {
        let sql = format!("SELECT {} FROM course c WHERE c.timetable_code = ?1", COURSE_COLUMNS);
        let course = self.conn.query_row(&sql, params![code], course_from_row).optional()?;
        Ok(course)
    }

    fn all_courses(&self) -> Result<Vec<Course>> {
        let sql = format!("SELECT {} FROM course c ORDER BY c.timetable_code", COURSE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], course_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn courses_in_major(&self, major_id: i64) -> Result<Vec<Course>> {
        let sql = format!(
            "SELECT {} FROM course c
             JOIN affiliated_major am ON am.timetable_code = c.timetable_code
             WHERE am.major_id = ?1
             ORDER BY c.timetable_code",
            COURSE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![major_id], course_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn schedules_of(&self, code: &str) -> Result<Vec<CourseSchedule>> {
        let mut stmt = self.conn.prepare(
            "SELECT day_id, period FROM course_schedule WHERE timetable_code = ?1 ORDER BY day_id, period",
        )?;
        let rows = stmt.query_map(params![code], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
        let mut out = Vec::new();
        for r in rows {
            let (day_id, period) = r?;
            match (Day::from_id(day_id), u8::try_from(period)) {
                (Some(day), Ok(period)) => {
                    out.push(CourseSchedule { timetable_code: code.to_string(), day, period })
                }
                _ => warn!(code, day_id, period, "ignoring stored schedule with unknown day/period"),
            }
        }
        Ok(out)
    }

    fn grades_of(&self, code: &str) -> Result<Vec<GradeYear>> {
        let mut stmt = self
            .conn
            .prepare("SELECT grade_name FROM grade_year WHERE timetable_code = ?1 ORDER BY grade_name")?;
        let rows = stmt.query_map(params![code], |row| {
            Ok(GradeYear { timetable_code: code.to_string(), grade_name: row.get(0)? })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn affiliations_of(&self, code: &str) -> Result<Vec<AffiliatedMajor>> {
        let mut stmt = self.conn.prepare(
            "SELECT major_id, course_category_id FROM affiliated_major
             WHERE timetable_code = ?1 ORDER BY major_id",
        )?;
        let rows = stmt.query_map(params![code], |row| {
            Ok(AffiliatedMajor {
                timetable_code: code.to_string(),
                major_id: row.get(0)?,
                course_category_id: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn classrooms_of(&self, code: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT cm.name FROM course_classroom cc
             JOIN classroom_master cm ON cm.id = cc.classroom_id
             WHERE cc.timetable_code = ?1 ORDER BY cm.name",
        )?;
        let rows = stmt.query_map(params![code], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn instructor_name(&self, instructor_id: i64) -> Result<Option<String>> {
        let name = self
            .conn
            .query_row("SELECT name FROM instructor_master WHERE id = ?1", params![instructor_id], |row| row.get(0))
            .optional()?;
        Ok(name)
    }

    fn majors(&self) -> Result<Vec<MasterRow>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM major_master ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok(MasterRow { id: row.get(0)?, name: row.get(1)? }))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
