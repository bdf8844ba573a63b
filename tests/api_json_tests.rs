mod common;

use std::collections::HashMap;

use jikanwari::algorithm::{TimetableOutcome, TimetableRequest, plan_timetable};
use jikanwari::api_json::{majors_response, needs_resolution_response, parse_json_input, ready_response};
use jikanwari::models::{KnownMajor, Language};
use jikanwari::storage::{CourseRepository, SqliteRepository};

fn plan(choices: &[(&str, &str)], lang: Language) -> TimetableOutcome {
    let conn = common::loaded_db();
    let repo = SqliteRepository::new(&conn);
    let req = TimetableRequest {
        semester: 3,
        major1_id: KnownMajor::Is.id(),
        major2_id: KnownMajor::Nc.id(),
        lang,
        choices: choices.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
    };
    plan_timetable(&repo, &req).expect("plan")
}

#[test]
fn test_parse_timetable_request_json() {
    let req = parse_json_input(
        r#"{"semester": 3, "major1_id": 1, "major2_id": 2, "lang": "en", "choices": {"conflict_1_1": "A001"}}"#,
    )
    .expect("Debe parsear el pedido");
    assert_eq!(req.semester, 3);
    assert_eq!(req.lang, Language::En);
    assert_eq!(req.choices.get("conflict_1_1").map(String::as_str), Some("A001"));

    let minimal = parse_json_input(r#"{"semester": 1, "major1_id": 1, "major2_id": 3}"#).expect("minimal");
    assert_eq!(minimal.lang, Language::Ja);
    assert!(minimal.choices.is_empty());

    assert!(parse_json_input(r#"{"semester": "x"}"#).is_err());
}

#[test]
fn test_needs_resolution_response_shape() {
    let TimetableOutcome::NeedsResolution { header, conflicts } = plan(&[], Language::En) else {
        panic!("sample data has a conflict");
    };
    let body = needs_resolution_response(&header, &conflicts, Language::En);
    assert_eq!(body["status"], "needs_resolution");
    assert_eq!(body["header"]["semester_name"], "2nd Year 1st Semester");
    assert_eq!(body["conflicts"][0]["day_name"], "Monday");
    assert_eq!(body["conflicts"][0]["courses"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_ready_response_grid_layout() {
    let TimetableOutcome::Ready(view) = plan(&[("conflict_1_1", "A002")], Language::Ja) else {
        panic!("choices were supplied");
    };
    let body = ready_response(&view, Language::Ja);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["grid"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["grid"][0]["day_name"], "月");
    assert_eq!(body["grid"][0]["periods"][0]["key"], "conflict_1_1");
    assert_eq!(body["grid"][0]["periods"][0]["courses"][0]["timetable_code"], "A002");
    assert_eq!(body["intensive"][0]["timetable_code"], "A005");
    assert_eq!(body["credits"]["major2"]["required"], 2);
}

#[test]
fn test_majors_response_uses_display_names() {
    let conn = common::loaded_db();
    let majors = SqliteRepository::new(&conn).majors().expect("majors");
    let body = majors_response(&majors, Language::En);
    assert_eq!(body["majors"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["majors"][4]["name"], "Information Application");
}
