mod common;

use std::collections::BTreeSet;

use jikanwari::Error;
use jikanwari::algorithm::semester::min_grade;
use jikanwari::algorithm::{course_semesters, courses_for, get_courses_by_semester_and_major, semester_set};
use jikanwari::models::{GradeYear, KnownMajor, OfferingCategory};
use jikanwari::normalize::{convert_dataset, extract_dataset};
use jikanwari::storage::{SqliteRepository, load_converted, open_in_memory};

fn set(values: &[u8]) -> BTreeSet<u8> {
    values.iter().copied().collect()
}

fn codes(courses: Vec<jikanwari::models::Course>) -> Vec<String> {
    courses.into_iter().map(|c| c.timetable_code).collect()
}

#[test]
fn test_semester_set_rules() {
    assert_eq!(semester_set(2, Some(OfferingCategory::FirstSemester)), set(&[3]));
    assert_eq!(semester_set(3, Some(OfferingCategory::FullYear)), set(&[5, 6]));
    assert_eq!(semester_set(1, Some(OfferingCategory::SecondQuarter)), set(&[1]));
    assert_eq!(semester_set(4, Some(OfferingCategory::ThirdQuarter)), set(&[8]));
    assert_eq!(semester_set(2, Some(OfferingCategory::SecondSemester)), set(&[4]));
    assert!(semester_set(2, None).is_empty());
    assert!(semester_set(0, Some(OfferingCategory::FullYear)).is_empty());
}

#[test]
fn test_semester_set_out_of_range_grade_is_empty() {
    assert!(semester_set(200, Some(OfferingCategory::FullYear)).is_empty());
    assert!(semester_set(u8::MAX, Some(OfferingCategory::SecondSemester)).is_empty());
    assert_eq!(semester_set(4, Some(OfferingCategory::FullYear)), set(&[7, 8]));
}

#[test]
fn test_absurd_grade_in_converted_data_does_not_break_queries() {
    let (data, _) = extract_dataset(&common::sample_records());
    let mut converted = convert_dataset(&data);
    converted.grades.retain(|g| g.timetable_code != "A007");
    converted.grades.push(GradeYear { timetable_code: "A007".into(), grade_name: "200".into() });

    let mut conn = open_in_memory().expect("db");
    load_converted(&mut conn, &converted).expect("load");
    let repo = SqliteRepository::new(&conn);

    for semester in 1..=8 {
        let found = codes(courses_for(&repo, semester, None).expect("query"));
        assert!(!found.contains(&"A007".to_string()), "semester {}", semester);
    }
    assert_eq!(codes(courses_for(&repo, 3, None).expect("query")), vec!["A001", "A002", "A004", "A005", "A006"]);
}

#[test]
fn test_min_grade_drives_semesters() {
    let grades = vec![
        GradeYear { timetable_code: "X".into(), grade_name: "3".into() },
        GradeYear { timetable_code: "X".into(), grade_name: "2".into() },
    ];
    assert_eq!(min_grade(&grades), Some(2));
    assert_eq!(course_semesters(&grades, Some(OfferingCategory::FirstQuarter)), set(&[3]));
    assert!(course_semesters(&[], Some(OfferingCategory::FullYear)).is_empty());
}

#[test]
fn test_courses_for_major_and_semester() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);

    let is_sem3 = codes(courses_for(&repo, 3, Some(KnownMajor::Is.id())).expect("query"));
    assert_eq!(is_sem3, vec!["A001", "A004", "A005"]);

    let is_sem4 = codes(courses_for(&repo, 4, Some(KnownMajor::Is.id())).expect("query"));
    assert_eq!(is_sem4, vec!["A003"]);

    let other_sem4 = codes(courses_for(&repo, 4, Some(KnownMajor::Other.id())).expect("query"));
    assert_eq!(other_sem4, vec!["A007"]);
}

#[test]
fn test_courses_without_major_filter() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    let all_sem3 = codes(get_courses_by_semester_and_major(&repo, 3, None).expect("query"));
    assert_eq!(all_sem3, vec!["A001", "A002", "A004", "A005", "A006", "A007"]);
}

#[test]
fn test_out_of_range_semester_is_invalid_input() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    assert!(matches!(courses_for(&repo, 0, None), Err(Error::InvalidInput(_))));
    assert!(matches!(courses_for(&repo, 9, Some(1)), Err(Error::InvalidInput(_))));
}

#[test]
fn test_unknown_major_yields_empty_set() {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    assert!(courses_for(&repo, 3, Some(999)).expect("query").is_empty());
}
