// Recuperación de cursos por (semestre, mención).
use tracing::debug;

use crate::algorithm::semester::{SEMESTER_COUNT, course_semesters};
use crate::error::{Error, Result};
use crate::models::Course;
use crate::storage::CourseRepository;

/// Cursos cuyo conjunto de semestres contiene `semester`. Con `major_id`
/// sólo se consideran los afiliados a esa mención. Orden: código de horario.
pub fn courses_for<R>(repo: &R, semester: u8, major_id: Option<i64>) -> Result<Vec<Course>>
where
    R: CourseRepository + ?Sized,
{
    if !(1..=SEMESTER_COUNT).contains(&semester) {
        return Err(Error::InvalidInput(format!(
            "semester must be between 1 and {}, got {}",
            SEMESTER_COUNT, semester
        )));
    }

    let candidates = match major_id {
        Some(id) => repo.courses_in_major(id)?,
        None => repo.all_courses()?,
    };
    let total = candidates.len();

    let mut out = Vec::new();
    for course in candidates {
        let grades = repo.grades_of(&course.timetable_code)?;
        if course_semesters(&grades, course.offering_category()).contains(&semester) {
            out.push(course);
        }
    }
    debug!(semester, ?major_id, candidates = total, matched = out.len(), "courses retrieved");
    Ok(out)
}

/// Nombre expuesto a la capa de presentación.
pub fn get_courses_by_semester_and_major<R>(repo: &R, semester: u8, major_id: Option<i64>) -> Result<Vec<Course>>
where
    R: CourseRepository + ?Sized,
{
    courses_for(repo, semester, major_id)
}
