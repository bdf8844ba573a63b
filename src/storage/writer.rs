// Contrato de escritura: get-or-create para maestros abiertos y
// insert-or-skip por clave natural para curso y relaciones. Quien llama
// maneja la transacción (se implementa sobre `Connection`, por lo que
// `&Transaction` sirve vía deref).
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;
use crate::models::{AffiliatedMajor, Course, Day, Period};

pub trait CatalogWriter {
    /// Id del docente con ese nombre (recortado, sin distinguir mayúsculas),
    /// creándolo si no existe. Nombre vacío -> None.
    fn get_or_create_instructor(&self, name: &str) -> Result<Option<i64>>;
    fn get_or_create_classroom(&self, name: &str) -> Result<Option<i64>>;
    fn get_or_create_major(&self, name: &str) -> Result<Option<i64>>;

    /// true si se insertó, false si el código ya existía (el curso no se modifica).
    fn upsert_course(&self, course: &Course) -> Result<bool>;
    fn upsert_schedule(&self, timetable_code: &str, day: Day, period: Period) -> Result<bool>;
    fn upsert_grade(&self, timetable_code: &str, grade_name: &str) -> Result<bool>;
    fn upsert_affiliation(&self, affiliation: &AffiliatedMajor) -> Result<bool>;
    fn upsert_course_classroom(&self, timetable_code: &str, classroom_id: i64) -> Result<bool>;
}

fn get_or_create(conn: &Connection, table: &str, name: &str) -> Result<Option<i64>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    let select = format!("SELECT id FROM {} WHERE name = ?1", table);
    if let Some(id) = conn.query_row(&select, params![name], |row| row.get::<_, i64>(0)).optional()? {
        return Ok(Some(id));
    }
    let insert = format!("INSERT INTO {} (name) VALUES (?1)", table);
    conn.execute(&insert, params![name])?;
    Ok(Some(conn.last_insert_rowid()))
}

impl CatalogWriter for Connection {
    fn get_or_create_instructor(&self, name: &str) -> Result<Option<i64>> {
        get_or_create(self, "instructor_master", name)
    }

    fn get_or_create_classroom(&self, name: &str) -> Result<Option<i64>> {
        get_or_create(self, "classroom_master", name)
    }

    fn get_or_create_major(&self, name: &str) -> Result<Option<i64>> {
        get_or_create(self, "major_master", name)
    }

    fn upsert_course(&self, course: &Course) -> Result<bool> {
        let n = self.execute(
            "INSERT OR IGNORE INTO course (
                timetable_code, syllabus_url, course_title, credits,
                offering_category_id, class_format_id, course_type_id, main_instructor_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                course.timetable_code,
                course.syllabus_url,
                course.course_title,
                course.credits,
                course.offering_category_id,
                course.class_format_id,
                course.course_type_id,
                course.main_instructor_id,
            ],
        )?;
        Ok(n > 0)
    }

    fn upsert_schedule(&self, timetable_code: &str, day: Day, period: Period) -> Result<bool> {
        let n = self.execute(
            "INSERT OR IGNORE INTO course_schedule (timetable_code, day_id, period) VALUES (?1, ?2, ?3)",
            params![timetable_code, day.id(), period.number()],
        )?;
        Ok(n > 0)
    }

    fn upsert_grade(&self, timetable_code: &str, grade_name: &str) -> Result<bool> {
        let n = self.execute(
            "INSERT OR IGNORE INTO grade_year (timetable_code, grade_name) VALUES (?1, ?2)",
            params![timetable_code, grade_name.trim()],
        )?;
        Ok(n > 0)
    }

    fn upsert_affiliation(&self, affiliation: &AffiliatedMajor) -> Result<bool> {
        let n = self.execute(
            "INSERT OR IGNORE INTO affiliated_major (timetable_code, major_id, course_category_id)
             VALUES (?1, ?2, ?3)",
            params![affiliation.timetable_code, affiliation.major_id, affiliation.course_category_id],
        )?;
        Ok(n > 0)
    }

    fn upsert_course_classroom(&self, timetable_code: &str, classroom_id: i64) -> Result<bool> {
        let n = self.execute(
            "INSERT OR IGNORE INTO course_classroom (timetable_code, classroom_id) VALUES (?1, ?2)",
            params![timetable_code, classroom_id],
        )?;
        Ok(n > 0)
    }
}
