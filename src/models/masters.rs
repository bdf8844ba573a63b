// Maestros cerrados: cada variante tiene un id numérico estable (contrato de
// almacenamiento) y una tabla de nombres ja/en para la capa de presentación.
use serde::{Deserialize, Serialize};

/// Idioma de los nombres a mostrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ja" => Some(Language::Ja),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    fn pick(self, ja: &'static str, en: &'static str) -> &'static str {
        match self {
            Language::Ja => ja,
            Language::En => en,
        }
    }
}

macro_rules! master_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident = $id:literal, $ja:literal, $en:literal; )+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            pub fn id(self) -> i64 {
                match self {
                    $( $name::$variant => $id, )+
                }
            }

            pub fn from_id(id: i64) -> Option<$name> {
                match id {
                    $( $id => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Busca por el nombre tal como aparece en el boletín (japonés).
            pub fn from_name(name: &str) -> Option<$name> {
                match name.trim() {
                    $( $ja => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn name(self, lang: Language) -> &'static str {
                match self {
                    $( $name::$variant => lang.pick($ja, $en), )+
                }
            }
        }
    };
}

master_enum! {
    /// 曜日マスタ. `Other` (他) marca cursos sin día fijo.
    Day {
        Other = 0, "他", "Other";
        Monday = 1, "月", "Monday";
        Tuesday = 2, "火", "Tuesday";
        Wednesday = 3, "水", "Wednesday";
        Thursday = 4, "木", "Thursday";
        Friday = 5, "金", "Friday";
        Saturday = 6, "土", "Saturday";
    }
}

impl Day {
    /// Convierte un carácter del campo compacto de días (p.ej. '水').
    pub fn from_char(c: char) -> Option<Day> {
        let mut buf = [0u8; 4];
        Day::from_name(c.encode_utf8(&mut buf))
    }

    /// Solo Lunes..Sábado pueden almacenarse en `course_schedule`.
    pub fn is_schedulable(self) -> bool {
        self != Day::Other
    }
}

master_enum! {
    /// 開講区分マスタ: qué parte del año académico ocupa el curso.
    OfferingCategory {
        FullYear = 0, "通年", "Full Year";
        FirstQuarter = 1, "1Q", "1st Quarter";
        SecondQuarter = 2, "2Q", "2nd Quarter";
        ThirdQuarter = 3, "3Q", "3rd Quarter";
        FourthQuarter = 4, "4Q", "4th Quarter";
        FirstSemester = 5, "前期", "First Semester";
        SecondSemester = 6, "後期", "Second Semester";
    }
}

impl OfferingCategory {
    /// Cuartos (1..=4) durante los que se dicta el curso.
    pub fn quarters(self) -> &'static [u8] {
        match self {
            OfferingCategory::FirstQuarter => &[1],
            OfferingCategory::SecondQuarter => &[2],
            OfferingCategory::ThirdQuarter => &[3],
            OfferingCategory::FourthQuarter => &[4],
            OfferingCategory::FirstSemester => &[1, 2],
            OfferingCategory::SecondSemester => &[3, 4],
            OfferingCategory::FullYear => &[1, 2, 3, 4],
        }
    }

    pub fn overlaps(self, other: OfferingCategory) -> bool {
        self.quarters().iter().any(|q| other.quarters().contains(q))
    }
}

master_enum! {
    /// 履修区分マスタ. Es relativo a la mención: el mismo curso puede ser
    /// obligatorio para una y electivo para otra.
    CourseCategory {
        Required = 1, "必修", "Required";
        RequiredElective = 2, "選択必修", "Required Elective";
        Elective = 3, "選択", "Elective";
        Mandatory = 4, "必履修", "Mandatory";
    }
}

impl CourseCategory {
    pub fn counts_as_required(self) -> bool {
        matches!(self, CourseCategory::Required | CourseCategory::Mandatory)
    }

    pub fn counts_as_elective(self) -> bool {
        matches!(self, CourseCategory::Elective | CourseCategory::RequiredElective)
    }
}

master_enum! {
    /// 授業形態マスタ
    ClassFormat {
        Lecture = 1, "講義", "Lecture";
        Seminar = 2, "演習", "Seminar";
        Experiment = 3, "実験", "Experiment";
        LectureSeminar = 4, "講義・演習", "Lecture & Seminar";
    }
}

master_enum! {
    /// 授業種別マスタ
    CourseType {
        Regular = 1, "普通", "Regular";
        Intensive = 2, "集中", "Intensive";
        ExperimentPractice = 3, "実験・実習", "Experiment & Practice";
    }
}

master_enum! {
    /// Menciones sembradas en `major_master`. La tabla puede crecer con
    /// códigos nuevos del boletín; estas cinco tienen id fijo.
    KnownMajor {
        Is = 1, "IS", "IS";
        Nc = 2, "NC", "NC";
        Xd = 3, "XD", "XD";
        Other = 4, "その他", "Other";
        InformationApplication = 5, "情報応用科目", "Information Application";
    }
}

/// Nombre de un semestre ordinal (1..=8): grado `(n+1)/2`, mitad según paridad.
pub fn semester_name(semester: u8, lang: Language) -> String {
    if !(1..=8).contains(&semester) {
        return semester.to_string();
    }
    let grade = (semester + 1) / 2;
    let first_half = semester % 2 == 1;
    match lang {
        Language::Ja => format!("{}年{}", grade, if first_half { "前期" } else { "後期" }),
        Language::En => format!(
            "{} Year {} Semester",
            ordinal(grade),
            if first_half { "1st" } else { "2nd" }
        ),
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Texto cuando un curso no tiene sala asignada.
pub fn classroom_undecided(lang: Language) -> &'static str {
    lang.pick("未定", "TBD")
}
