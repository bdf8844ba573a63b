mod common;

use std::collections::HashMap;

use jikanwari::Error;
use jikanwari::algorithm::{
    AssemblyParams, BucketCredits, PriorityBucket, Timetable, TimetableOutcome, TimetableRequest,
    aggregate_credits, apply_priority_choices, assemble_timetable, detect_conflicts, parse_conflict_key,
    plan_timetable,
};
use jikanwari::models::{ClassFormat, CourseCategory, KnownMajor, Language, OfferingCategory, Period, Weekday};
use jikanwari::storage::SqliteRepository;

fn period(n: u8) -> Period {
    Period::new(n).expect("valid period")
}

fn params(lang: Language) -> AssemblyParams {
    AssemblyParams { semester: 3, major1_id: KnownMajor::Is.id(), major2_id: KnownMajor::Nc.id(), lang }
}

fn request(choices: &[(&str, &str)]) -> TimetableRequest {
    TimetableRequest {
        semester: 3,
        major1_id: KnownMajor::Is.id(),
        major2_id: KnownMajor::Nc.id(),
        lang: Language::Ja,
        choices: choices.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    }
}

fn cell_codes(t: &Timetable, day: Weekday, p: u8) -> Vec<String> {
    t.cell(day, period(p)).iter().map(|e| e.timetable_code.clone()).collect()
}

#[test]
fn test_assembly_places_courses_with_buckets() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    let t = assemble_timetable(&repo, &params(Language::Ja)).expect("assemble");

    assert_eq!(cell_codes(&t, Weekday::Monday, 1), vec!["A001", "A002"]);
    let monday = t.cell(Weekday::Monday, period(1));
    assert_eq!(monday[0].bucket, PriorityBucket::Major1);
    assert_eq!(monday[1].bucket, PriorityBucket::Major2);
    assert_eq!(monday[0].instructor.as_deref(), Some("Tanaka"));
    assert_eq!(monday[0].course_category, Some(CourseCategory::Required));

    let shared = t.cell(Weekday::Tuesday, period(2));
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].bucket, PriorityBucket::Shared);
    assert_eq!(shared[0].classroom, "C301, C302");

    let info = t.cell(Weekday::Wednesday, period(3));
    assert_eq!(info[0].bucket, PriorityBucket::InformationApplication);
    assert_eq!(info[0].classroom, "未定");

    let other = t.cell(Weekday::Thursday, period(4));
    assert_eq!(other[0].bucket, PriorityBucket::Other);
    assert_eq!(other[0].offering_category, Some(OfferingCategory::FullYear));

    // A003 es de 後期 (semestre 4): no aparece
    assert_eq!(t.placed_count(), 5);
}

#[test]
fn test_unscheduled_course_goes_to_intensive_list() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    let t = assemble_timetable(&repo, &params(Language::En)).expect("assemble");

    assert_eq!(t.intensive.len(), 1);
    let lab = &t.intensive[0];
    assert_eq!(lab.course.timetable_code, "A005");
    assert_eq!(lab.course.bucket, PriorityBucket::Major1);
    assert_eq!(lab.class_format_name.as_deref(), Some(ClassFormat::Experiment.name(Language::En)));
    assert_eq!(lab.course_type_name.as_deref(), Some("Intensive"));
    assert_eq!(lab.course.classroom, "TBD");
}

#[test]
fn test_same_title_is_placed_once_per_cell() {
    let mut t = Timetable::new();
    let first = common::entry("S1", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1);
    let mut twin = common::entry("S2", Some(OfferingCategory::FirstSemester), PriorityBucket::Major2);
    twin.course_title = first.course_title.clone();

    assert!(t.place(Weekday::Friday, period(6), first));
    assert!(!t.place(Weekday::Friday, period(6), twin));
    assert_eq!(t.cell(Weekday::Friday, period(6)).len(), 1);
}

#[test]
fn test_overlapping_quarters_conflict() {
    let mut t = Timetable::new();
    t.place(Weekday::Monday, period(2), common::entry("X", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1));
    t.place(Weekday::Monday, period(2), common::entry("Y", Some(OfferingCategory::FirstSemester), PriorityBucket::Major2));

    let groups = detect_conflicts(&t);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "conflict_1_2");
    assert_eq!(groups[0].day, Weekday::Monday);
    assert_eq!(groups[0].period, 2);
    let codes: Vec<&str> = groups[0].courses.iter().map(|c| c.timetable_code.as_str()).collect();
    assert_eq!(codes, vec!["X", "Y"]);
}

#[test]
fn test_disjoint_quarters_do_not_conflict() {
    let mut t = Timetable::new();
    t.place(Weekday::Monday, period(2), common::entry("X", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1));
    t.place(Weekday::Monday, period(2), common::entry("Z", Some(OfferingCategory::SecondSemester), PriorityBucket::Major2));
    t.place(Weekday::Tuesday, period(1), common::entry("Q1", Some(OfferingCategory::FirstQuarter), PriorityBucket::Major1));
    t.place(Weekday::Tuesday, period(1), common::entry("Q2", Some(OfferingCategory::SecondQuarter), PriorityBucket::Major1));

    assert!(detect_conflicts(&t).is_empty());
}

#[test]
fn test_conflict_set_accumulates_across_pairs() {
    let mut t = Timetable::new();
    t.place(Weekday::Wednesday, period(4), common::entry("FY", Some(OfferingCategory::FullYear), PriorityBucket::Major1));
    t.place(Weekday::Wednesday, period(4), common::entry("Q1", Some(OfferingCategory::FirstQuarter), PriorityBucket::Major2));
    t.place(Weekday::Wednesday, period(4), common::entry("Q4", Some(OfferingCategory::FourthQuarter), PriorityBucket::Other));

    let groups = detect_conflicts(&t);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].courses.len(), 3);
}

#[test]
fn test_choice_keeps_only_selected_course() {
    let mut t = Timetable::new();
    t.place(Weekday::Monday, period(2), common::entry("X", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1));
    t.place(Weekday::Monday, period(2), common::entry("Y", Some(OfferingCategory::FirstSemester), PriorityBucket::Major2));
    // celda sin conflicto: la elección no la toca
    t.place(Weekday::Friday, period(1), common::entry("A", Some(OfferingCategory::FirstQuarter), PriorityBucket::Major1));
    t.place(Weekday::Friday, period(1), common::entry("B", Some(OfferingCategory::ThirdQuarter), PriorityBucket::Major1));

    let choices: HashMap<String, String> = [
        ("conflict_1_2".to_string(), "X".to_string()),
        ("conflict_5_1".to_string(), "A".to_string()),
        ("garbage".to_string(), "Y".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(apply_priority_choices(&mut t, &choices), 1);

    assert_eq!(cell_codes(&t, Weekday::Monday, 2), vec!["X"]);
    assert_eq!(cell_codes(&t, Weekday::Friday, 1), vec!["A", "B"]);
    assert!(detect_conflicts(&t).is_empty());
}

#[test]
fn test_choice_with_absent_code_leaves_cell() {
    let mut t = Timetable::new();
    t.place(Weekday::Monday, period(2), common::entry("X", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1));
    t.place(Weekday::Monday, period(2), common::entry("Y", Some(OfferingCategory::FirstSemester), PriorityBucket::Major2));

    let choices: HashMap<String, String> = [("conflict_1_2".to_string(), "NOPE".to_string())].into_iter().collect();
    assert_eq!(apply_priority_choices(&mut t, &choices), 0);
    assert_eq!(cell_codes(&t, Weekday::Monday, 2), vec!["X", "Y"]);
}

#[test]
fn test_conflict_key_parsing() {
    assert_eq!(parse_conflict_key("conflict_3_4"), Some((Weekday::Wednesday, period(4))));
    assert_eq!(parse_conflict_key("conflict_6_1"), None);
    assert_eq!(parse_conflict_key("conflict_1_7"), None);
    assert_eq!(parse_conflict_key("conflict_1"), None);
    assert_eq!(parse_conflict_key("slot_1_1"), None);
}

#[test]
fn test_credits_split_required_and_elective() {
    let mut t = Timetable::new();
    let required = common::entry("R", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1);
    let mut elective = common::entry("E", Some(OfferingCategory::FirstSemester), PriorityBucket::Major1);
    elective.course_category = Some(CourseCategory::Elective);
    elective.credits = 1;
    t.place(Weekday::Monday, period(1), required.clone());
    // el mismo curso en dos celdas cuenta una vez
    t.place(Weekday::Thursday, period(1), required);
    t.place(Weekday::Tuesday, period(3), elective);

    let credits = aggregate_credits(&t);
    assert_eq!(credits.major1, BucketCredits { required: 2, elective: 1 });
    assert_eq!(credits.shared, BucketCredits::default());
    assert_eq!(credits.total, 3);
}

#[test]
fn test_plan_without_choices_needs_resolution() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    match plan_timetable(&repo, &request(&[])).expect("plan") {
        TimetableOutcome::NeedsResolution { header, conflicts } => {
            assert_eq!(header.semester_name, "2年前期");
            assert_eq!(header.major1_name, "IS");
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].key, "conflict_1_1");
            let codes: Vec<&str> = conflicts[0].courses.iter().map(|c| c.timetable_code.as_str()).collect();
            assert_eq!(codes, vec!["A001", "A002"]);
        }
        TimetableOutcome::Ready(_) => panic!("expected conflicts to be reported first"),
    }
}

#[test]
fn test_plan_with_choice_resolves_and_sums_credits() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    let view = match plan_timetable(&repo, &request(&[("conflict_1_1", "A001")])).expect("plan") {
        TimetableOutcome::Ready(view) => view,
        TimetableOutcome::NeedsResolution { .. } => panic!("choices were supplied"),
    };

    assert_eq!(cell_codes(&view.timetable, Weekday::Monday, 1), vec!["A001"]);
    assert_eq!(view.detected_conflicts, 1);
    assert!(view.conflicts.is_empty());

    let c = &view.credits;
    assert_eq!(c.major1, BucketCredits { required: 4, elective: 0 });
    assert_eq!(c.shared, BucketCredits { required: 0, elective: 1 });
    assert_eq!(c.major2, BucketCredits::default());
    assert_eq!(c.other, BucketCredits { required: 2, elective: 0 });
    assert_eq!(c.information_application, BucketCredits { required: 0, elective: 1 });
    assert_eq!(c.total, 8);
}

#[test]
fn test_plan_with_unmatched_choice_keeps_conflict() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    match plan_timetable(&repo, &request(&[("conflict_1_1", "ZZZ")])).expect("plan") {
        TimetableOutcome::Ready(view) => {
            assert_eq!(view.conflicts.len(), 1);
            assert_eq!(cell_codes(&view.timetable, Weekday::Monday, 1), vec!["A001", "A002"]);
            assert_eq!(view.credits.major2, BucketCredits { required: 2, elective: 0 });
        }
        TimetableOutcome::NeedsResolution { .. } => panic!("choices were supplied"),
    }
}

const SPLIT_CATEGORY_BULLETIN: &str = "時間割コード,開講科目名,単位数,開講区分ID,主担当教員ID,曜日,時限,学年,メジャー,履修区分ID
S001,Split Course,2,前期,Mori,月,2,2,IS,必修
S001,Split Course,2,前期,Mori,月,2,2,NC,選択
S002,NC Core,3,前期,Abe,火,3,2,NC,必修
S002,NC Core,3,前期,Abe,火,3,2,XD,選択
S003,NC Option,1,前期,Abe,水,4,2,NC,選択
S003,NC Option,1,前期,Abe,水,4,2,XD,必修
";

fn split_category_plan(major1: KnownMajor, major2: KnownMajor) -> jikanwari::algorithm::TimetableView {
    let records = jikanwari::bulletin::parse_bulletin(SPLIT_CATEGORY_BULLETIN).expect("parses");
    let mut conn = jikanwari::storage::open_in_memory().expect("db");
    jikanwari::storage::import_bulletin(&mut conn, &records).expect("import");
    let repo = SqliteRepository::new(&conn);
    let req = TimetableRequest {
        semester: 3,
        major1_id: major1.id(),
        major2_id: major2.id(),
        lang: Language::Ja,
        choices: HashMap::new(),
    };
    match plan_timetable(&repo, &req).expect("plan") {
        TimetableOutcome::Ready(view) => view,
        TimetableOutcome::NeedsResolution { .. } => panic!("no slot is shared by two courses"),
    }
}

#[test]
fn test_shared_course_takes_category_of_first_major() {
    let view = split_category_plan(KnownMajor::Is, KnownMajor::Nc);
    let shared = view.timetable.cell(Weekday::Monday, period(2));
    assert_eq!(shared[0].bucket, PriorityBucket::Shared);
    assert_eq!(shared[0].course_category, Some(CourseCategory::Required));
    assert_eq!(view.credits.shared, BucketCredits { required: 2, elective: 0 });

    let view = split_category_plan(KnownMajor::Nc, KnownMajor::Is);
    let shared = view.timetable.cell(Weekday::Monday, period(2));
    assert_eq!(shared[0].bucket, PriorityBucket::Shared);
    assert_eq!(shared[0].course_category, Some(CourseCategory::Elective));
    assert_eq!(view.credits.shared, BucketCredits { required: 0, elective: 2 });
}

#[test]
fn test_second_major_bucket_uses_second_major_category() {
    // S002 y S003 también pertenecen a XD, con el 履修区分 invertido
    let view = split_category_plan(KnownMajor::Is, KnownMajor::Nc);
    let core = view.timetable.cell(Weekday::Tuesday, period(3));
    assert_eq!(core[0].bucket, PriorityBucket::Major2);
    assert_eq!(core[0].course_category, Some(CourseCategory::Required));
    let option = view.timetable.cell(Weekday::Wednesday, period(4));
    assert_eq!(option[0].bucket, PriorityBucket::Major2);
    assert_eq!(option[0].course_category, Some(CourseCategory::Elective));
    assert_eq!(view.credits.major2, BucketCredits { required: 3, elective: 1 });

    let view = split_category_plan(KnownMajor::Is, KnownMajor::Xd);
    assert_eq!(view.credits.major2, BucketCredits { required: 1, elective: 3 });
    assert_eq!(view.credits.major1, BucketCredits { required: 2, elective: 0 });
}

#[test]
fn test_plan_rejects_bad_input() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    let mut req = request(&[]);
    req.semester = 12;
    assert!(matches!(plan_timetable(&repo, &req), Err(Error::InvalidInput(_))));

    let mut req = request(&[]);
    req.major2_id = 404;
    assert!(matches!(plan_timetable(&repo, &req), Err(Error::NotFound(_))));
}
