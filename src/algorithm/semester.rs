// Cálculo del semestre ordinal (1..=8) al que pertenece un curso.
use std::collections::BTreeSet;

use crate::models::{GradeYear, OfferingCategory};

pub const SEMESTER_COUNT: u8 = 8;

/// Semestres de un curso según su grado mínimo y su período de dictado.
///
/// Con `base = (min_grade - 1) * 2`:
/// - 通年 -> {base+1, base+2}
/// - 1Q, 2Q, 前期 -> {base+1}
/// - 3Q, 4Q, 後期 -> {base+2}
/// - sin categoría -> vacío
/// - grado que desborda el ordinal -> vacío
///
/// `semester_set(2, Some(FirstSemester)) == {3}`
pub fn semester_set(min_grade: u8, offering: Option<OfferingCategory>) -> BTreeSet<u8> {
    let mut out = BTreeSet::new();
    if min_grade == 0 {
        return out;
    }
    // aritmética en u16: un grado absurdo (p.ej. 200 desde un CSV) no cabe en u8
    let base = (u16::from(min_grade) - 1) * 2;
    let (Ok(first), Ok(second)) = (u8::try_from(base + 1), u8::try_from(base + 2)) else {
        return out;
    };
    match offering {
        Some(OfferingCategory::FullYear) => {
            out.insert(first);
            out.insert(second);
        }
        Some(OfferingCategory::FirstQuarter | OfferingCategory::SecondQuarter | OfferingCategory::FirstSemester) => {
            out.insert(first);
        }
        Some(OfferingCategory::ThirdQuarter | OfferingCategory::FourthQuarter | OfferingCategory::SecondSemester) => {
            out.insert(second);
        }
        None => {}
    }
    out
}

/// Grado mínimo entre los hechos de grado legibles. Sin grados -> None.
pub fn min_grade(grades: &[GradeYear]) -> Option<u8> {
    grades.iter().filter_map(GradeYear::grade).filter(|g| *g > 0).min()
}

/// Semestres de un curso a partir de sus grados; vacío si no tiene ninguno.
pub fn course_semesters(grades: &[GradeYear], offering: Option<OfferingCategory>) -> BTreeSet<u8> {
    match min_grade(grades) {
        Some(g) => semester_set(g, offering),
        None => BTreeSet::new(),
    }
}
