// Armado de la grilla semanal (Lun..Vie x períodos 1..6) más la lista de
// cursos intensivos, para un semestre y un par de menciones.
use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::algorithm::retrieval::courses_for;
use crate::error::Result;
use crate::models::{
    ClassFormat, Course, CourseCategory, CourseType, KnownMajor, Language, OfferingCategory, Period, Weekday,
    classroom_undecided,
};
use crate::storage::CourseRepository;

/// Cubeta de prioridad de un curso respecto del par de menciones pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBucket {
    Major1,
    /// Presente en ambas menciones pedidas
    Shared,
    Major2,
    Other,
    InformationApplication,
}

impl PriorityBucket {
    pub const ALL: [PriorityBucket; 5] = [
        PriorityBucket::Major1,
        PriorityBucket::Shared,
        PriorityBucket::Major2,
        PriorityBucket::Other,
        PriorityBucket::InformationApplication,
    ];

    /// Mención cuya afiliación define el 履修区分 de la cubeta. La compartida usa la primera.
    pub fn category_major(self, major1_id: i64, major2_id: i64) -> i64 {
        match self {
            PriorityBucket::Major1 | PriorityBucket::Shared => major1_id,
            PriorityBucket::Major2 => major2_id,
            PriorityBucket::Other => KnownMajor::Other.id(),
            PriorityBucket::InformationApplication => KnownMajor::InformationApplication.id(),
        }
    }
}

/// Un curso colocado en una celda de la grilla.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridEntry {
    pub timetable_code: String,
    pub course_title: String,
    pub instructor: Option<String>,
    pub bucket: PriorityBucket,
    pub offering_category: Option<OfferingCategory>,
    pub offering_category_name: Option<String>,
    pub course_category: Option<CourseCategory>,
    pub credits: i64,
    /// Salas unidas con ", " o el texto de "sin sala"
    pub classroom: String,
    pub syllabus_url: Option<String>,
}

/// Curso sin bloque semanal en la grilla (intensivo / concentrado).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntensiveEntry {
    #[serde(flatten)]
    pub course: GridEntry,
    pub class_format_name: Option<String>,
    pub course_type_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Timetable {
    cells: [[Vec<GridEntry>; Period::COUNT]; 5],
    pub intensive: Vec<IntensiveEntry>,
}

impl Timetable {
    pub fn new() -> Self {
        Timetable::default()
    }

    pub fn cell(&self, day: Weekday, period: Period) -> &[GridEntry] {
        &self.cells[day.index()][period.index()]
    }

    pub fn cell_mut(&mut self, day: Weekday, period: Period) -> &mut Vec<GridEntry> {
        &mut self.cells[day.index()][period.index()]
    }

    /// Recorre todas las celdas (vacías incluidas) en orden día, período.
    pub fn cells(&self) -> impl Iterator<Item = (Weekday, Period, &[GridEntry])> + '_ {
        Weekday::ALL
            .into_iter()
            .flat_map(|d| Period::all().map(move |p| (d, p)))
            .map(move |(d, p)| (d, p, self.cell(d, p)))
    }

    /// Coloca el curso salvo que la celda ya tenga uno con el mismo título.
    pub fn place(&mut self, day: Weekday, period: Period, entry: GridEntry) -> bool {
        let cell = self.cell_mut(day, period);
        if cell.iter().any(|e| e.course_title == entry.course_title) {
            return false;
        }
        cell.push(entry);
        true
    }

    pub fn placed_count(&self) -> usize {
        self.cells().map(|(_, _, c)| c.len()).sum()
    }

    /// Entradas distintas por código entre grilla e intensivos.
    pub fn distinct_courses(&self) -> Vec<&GridEntry> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let grid = self.cells().flat_map(|(_, _, c)| c.iter());
        let intensive = self.intensive.iter().map(|i| &i.course);
        for entry in grid.chain(intensive) {
            if seen.insert(entry.timetable_code.as_str()) {
                out.push(entry);
            }
        }
        out
    }
}

/// Parámetros explícitos del armado; el núcleo no lee estado global.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyParams {
    pub semester: u8,
    pub major1_id: i64,
    pub major2_id: i64,
    pub lang: Language,
}

pub fn assemble_timetable<R>(repo: &R, params: &AssemblyParams) -> Result<Timetable>
where
    R: CourseRepository + ?Sized,
{
    let major1 = courses_for(repo, params.semester, Some(params.major1_id))?;
    let major2 = courses_for(repo, params.semester, Some(params.major2_id))?;
    let other = courses_for(repo, params.semester, Some(KnownMajor::Other.id()))?;
    let info_app = courses_for(repo, params.semester, Some(KnownMajor::InformationApplication.id()))?;

    let major1_codes: HashSet<&str> = major1.iter().map(|c| c.timetable_code.as_str()).collect();
    let major2_codes: HashSet<&str> = major2.iter().map(|c| c.timetable_code.as_str()).collect();

    let ordered = [
        (PriorityBucket::Major1, &major1),
        (PriorityBucket::Major2, &major2),
        (PriorityBucket::Other, &other),
        (PriorityBucket::InformationApplication, &info_app),
    ];

    let mut timetable = Timetable::new();
    let mut processed: HashSet<&str> = HashSet::new();
    for (precedence, courses) in ordered {
        for course in courses.iter() {
            let code = course.timetable_code.as_str();
            if !processed.insert(code) {
                continue;
            }
            let bucket = if major1_codes.contains(code) && major2_codes.contains(code) {
                PriorityBucket::Shared
            } else {
                precedence
            };
            place_course(repo, params, &mut timetable, course, bucket)?;
        }
    }

    info!(
        semester = params.semester,
        major1 = params.major1_id,
        major2 = params.major2_id,
        courses = processed.len(),
        placed = timetable.placed_count(),
        intensive = timetable.intensive.len(),
        "timetable assembled"
    );
    Ok(timetable)
}

fn place_course<R>(
    repo: &R,
    params: &AssemblyParams,
    timetable: &mut Timetable,
    course: &Course,
    bucket: PriorityBucket,
) -> Result<()>
where
    R: CourseRepository + ?Sized,
{
    let code = course.timetable_code.as_str();
    let entry = build_entry(repo, params, course, bucket)?;

    let mut gridable = 0;
    let mut placed = 0;
    for slot in repo.schedules_of(code)? {
        let (Some(day), Some(period)) = (Weekday::from_day(slot.day), Period::new(slot.period)) else {
            continue;
        };
        gridable += 1;
        if timetable.place(day, period, entry.clone()) {
            placed += 1;
        } else {
            debug!(code, ?day, period = period.number(), "same title already in cell, not placed");
        }
    }

    // Sólo es intensivo si no tiene ningún bloque Lun..Vie; si todos sus
    // bloques chocaron con un homónimo ya está representado en la grilla.
    if gridable == 0 {
        timetable.intensive.push(IntensiveEntry {
            course: entry,
            class_format_name: course.class_format().map(|f| ClassFormat::name(f, params.lang).to_string()),
            course_type_name: course.course_type().map(|t| CourseType::name(t, params.lang).to_string()),
        });
    } else if placed == 0 {
        debug!(code, "all slots taken by same-title courses");
    }
    Ok(())
}

fn build_entry<R>(repo: &R, params: &AssemblyParams, course: &Course, bucket: PriorityBucket) -> Result<GridEntry>
where
    R: CourseRepository + ?Sized,
{
    let code = course.timetable_code.as_str();
    let instructor = match course.main_instructor_id {
        Some(id) => repo.instructor_name(id)?,
        None => None,
    };
    let classrooms = repo.classrooms_of(code)?;
    let classroom = if classrooms.is_empty() {
        classroom_undecided(params.lang).to_string()
    } else {
        classrooms.join(", ")
    };
    let category_major = bucket.category_major(params.major1_id, params.major2_id);
    let course_category = repo
        .affiliations_of(code)?
        .into_iter()
        .find(|a| a.major_id == category_major)
        .and_then(|a| a.course_category());
    let offering = course.offering_category();

    Ok(GridEntry {
        timetable_code: course.timetable_code.clone(),
        course_title: course.course_title.clone(),
        instructor,
        bucket,
        offering_category: offering,
        offering_category_name: offering.map(|o| o.name(params.lang).to_string()),
        course_category,
        credits: course.credits,
        classroom,
        syllabus_url: course.syllabus_url.clone(),
    })
}
