// Decodificación de los campos compactados del boletín.
//
// Ejemplos de entrada:
//   曜日 "水金" + 時限 "11"  -> (水,1) (金,1)
//   学年 "234"               -> "2" "3" "4"
//   メジャー "ISNCXD"         -> IS NC XD
//   教室名 "A101 B203"        -> A101 B203
use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

/// Valor literal que marca días/períodos no regulares y la mención genérica.
pub const OTHER_SENTINEL: &str = "その他";

/// Subcadena del título que reclasifica "その他" como curso de información aplicada.
pub const INFO_APP_MARKER: &str = "情報応用";

/// Nombre de la mención a la que se reclasifica.
pub const INFO_APP_MAJOR: &str = "情報応用科目";

/// Cómo se emparejaron días y períodos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pairing {
    /// Mismo largo: día[i] con período[i]
    Zip,
    /// Un día con todos los períodos
    SingleDay,
    /// Todos los días con un período
    SinglePeriod,
    /// Caso ambiguo: producto cartesiano completo
    CrossProduct,
    /// "その他" o campo vacío: curso intensivo, fuera de la grilla
    Unscheduled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPeriodSlots {
    pub slots: Vec<(char, u8)>,
    pub pairing: Pairing,
}

impl DayPeriodSlots {
    fn unscheduled() -> Self {
        DayPeriodSlots { slots: Vec::new(), pairing: Pairing::Unscheduled }
    }
}

/// Empareja el string de días (un carácter por día) con el de períodos (un
/// dígito por período). Prioridad: largo igual, un solo día, un solo período
/// y por último producto cartesiano.
pub fn parse_day_periods(days: &str, periods: &str) -> DayPeriodSlots {
    let days = days.trim();
    let periods = periods.trim();
    if days == OTHER_SENTINEL || periods == OTHER_SENTINEL || days.is_empty() || periods.is_empty() {
        return DayPeriodSlots::unscheduled();
    }

    let day_chars: Vec<char> = days.chars().filter(|c| !c.is_whitespace()).collect();
    let period_nums: Vec<u8> = periods.chars().filter_map(ascii_digit).collect();

    let (pairs, pairing): (Vec<(char, u8)>, Pairing) = if day_chars.len() == period_nums.len() {
        (day_chars.iter().copied().zip(period_nums.iter().copied()).collect(), Pairing::Zip)
    } else if day_chars.len() == 1 {
        (period_nums.iter().map(|p| (day_chars[0], *p)).collect(), Pairing::SingleDay)
    } else if period_nums.len() == 1 {
        (day_chars.iter().map(|d| (*d, period_nums[0])).collect(), Pairing::SinglePeriod)
    } else {
        let mut all = Vec::with_capacity(day_chars.len() * period_nums.len());
        for d in &day_chars {
            for p in &period_nums {
                all.push((*d, *p));
            }
        }
        (all, Pairing::CrossProduct)
    };

    DayPeriodSlots { slots: dedup_preserving_order(pairs), pairing }
}

/// "234" -> ["2", "3", "4"]. Cada dígito es un hecho independiente.
pub fn parse_grades(grades: &str) -> Vec<String> {
    let digits = grades
        .chars()
        .filter_map(ascii_digit)
        .map(|d| d.to_string());
    dedup_preserving_order(digits)
}

/// Divide en tokens de 2 caracteres ("ISNC" -> IS, NC). "その他" no se divide:
/// se reclasifica a información aplicada si el título lo indica. Un carácter
/// sobrante al final se emite solo.
pub fn parse_majors(majors: &str, course_title: &str) -> Vec<String> {
    let majors = majors.trim();
    if majors.is_empty() {
        return Vec::new();
    }
    if majors == OTHER_SENTINEL {
        let bucket = if course_title.contains(INFO_APP_MARKER) { INFO_APP_MAJOR } else { OTHER_SENTINEL };
        return vec![bucket.to_string()];
    }

    let chars: Vec<char> = majors.chars().filter(|c| !c.is_whitespace()).collect();
    let tokens = chars.chunks(2).map(|chunk| chunk.iter().collect::<String>());
    dedup_preserving_order(tokens)
}

/// Salas separadas por espacios (incluye el espacio ideográfico).
pub fn parse_classrooms(classrooms: &str) -> Vec<String> {
    dedup_preserving_order(classrooms.split_whitespace().map(str::to_string))
}

// Acepta dígitos ASCII y de ancho completo (１..９)
fn ascii_digit(c: char) -> Option<u8> {
    if let Some(d) = c.to_digit(10) {
        return Some(d as u8);
    }
    match c {
        '０'..='９' => Some((c as u32 - '０' as u32) as u8),
        _ => None,
    }
}

fn dedup_preserving_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
