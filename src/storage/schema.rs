// Esquema SQLite del catálogo y sembrado de los maestros cerrados.
use std::fs;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{ClassFormat, CourseCategory, CourseType, Day, KnownMajor, Language, OfferingCategory};

/// Tablas en orden de dependencia (maestros -> course -> relaciones).
pub const TABLES: &[&str] = &[
    "day_master",
    "offering_category_master",
    "course_category_master",
    "class_format_master",
    "course_type_master",
    "major_master",
    "instructor_master",
    "classroom_master",
    "course",
    "course_schedule",
    "grade_year",
    "affiliated_major",
    "course_classroom",
];

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS day_master (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS offering_category_master (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS course_category_master (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS class_format_master (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS course_type_master (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS major_master (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);
CREATE TABLE IF NOT EXISTS instructor_master (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);
CREATE TABLE IF NOT EXISTS classroom_master (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);
CREATE TABLE IF NOT EXISTS course (
    timetable_code TEXT PRIMARY KEY,
    syllabus_url TEXT,
    course_title TEXT NOT NULL,
    credits INTEGER NOT NULL DEFAULT 0,
    offering_category_id INTEGER REFERENCES offering_category_master(id),
    class_format_id INTEGER REFERENCES class_format_master(id),
    course_type_id INTEGER REFERENCES course_type_master(id),
    main_instructor_id INTEGER REFERENCES instructor_master(id)
);
CREATE TABLE IF NOT EXISTS course_schedule (
    timetable_code TEXT NOT NULL REFERENCES course(timetable_code),
    day_id INTEGER NOT NULL REFERENCES day_master(id) CHECK (day_id BETWEEN 1 AND 6),
    period INTEGER NOT NULL CHECK (period BETWEEN 1 AND 6),
    PRIMARY KEY (timetable_code, day_id, period)
);
CREATE TABLE IF NOT EXISTS grade_year (
    timetable_code TEXT NOT NULL REFERENCES course(timetable_code),
    grade_name TEXT NOT NULL,
    PRIMARY KEY (timetable_code, grade_name)
);
CREATE TABLE IF NOT EXISTS affiliated_major (
    timetable_code TEXT NOT NULL REFERENCES course(timetable_code),
    major_id INTEGER NOT NULL REFERENCES major_master(id),
    course_category_id INTEGER REFERENCES course_category_master(id),
    PRIMARY KEY (timetable_code, major_id)
);
CREATE TABLE IF NOT EXISTS course_classroom (
    timetable_code TEXT NOT NULL REFERENCES course(timetable_code),
    classroom_id INTEGER NOT NULL REFERENCES classroom_master(id),
    PRIMARY KEY (timetable_code, classroom_id)
);
CREATE INDEX IF NOT EXISTS idx_affiliated_major_major ON affiliated_major(major_id);
";

/// Abre (o crea) la base en disco, con el esquema y los maestros listos.
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    prepare(&conn)?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}

/// Conexión de sólo lectura a una base ya preparada con `open_database`.
///
/// No crea el archivo ni toca el esquema; para el servidor de consultas.
pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI;
    Ok(Connection::open_with_flags(path, flags)?)
}

/// Base en memoria con el mismo esquema; útil para pruebas y ejecuciones de un solo uso.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    init_schema(conn)?;
    seed_masters(conn)?;
    Ok(())
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Inserta las filas de los maestros cerrados. Repetirlo no cambia nada.
pub fn seed_masters(conn: &Connection) -> Result<usize> {
    let lang = Language::Ja;
    let mut inserted = 0;
    inserted += seed_table(conn, "day_master", Day::ALL.iter().map(|d| (d.id(), d.name(lang))))?;
    inserted += seed_table(
        conn,
        "offering_category_master",
        OfferingCategory::ALL.iter().map(|o| (o.id(), o.name(lang))),
    )?;
    inserted += seed_table(
        conn,
        "course_category_master",
        CourseCategory::ALL.iter().map(|c| (c.id(), c.name(lang))),
    )?;
    inserted += seed_table(conn, "class_format_master", ClassFormat::ALL.iter().map(|c| (c.id(), c.name(lang))))?;
    inserted += seed_table(conn, "course_type_master", CourseType::ALL.iter().map(|c| (c.id(), c.name(lang))))?;
    inserted += seed_table(conn, "major_master", KnownMajor::ALL.iter().map(|m| (m.id(), m.name(lang))))?;
    if inserted > 0 {
        info!(rows = inserted, "master tables seeded");
    }
    Ok(inserted)
}

fn seed_table<I>(conn: &Connection, table: &str, rows: I) -> Result<usize>
where
    I: Iterator<Item = (i64, &'static str)>,
{
    let sql = format!("INSERT OR IGNORE INTO {} (id, name) VALUES (?1, ?2)", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut inserted = 0;
    for (id, name) in rows {
        inserted += stmt.execute(params![id, name])?;
    }
    Ok(inserted)
}
