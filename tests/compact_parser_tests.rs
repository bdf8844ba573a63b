use jikanwari::bulletin::compact::{
    INFO_APP_MAJOR, OTHER_SENTINEL, Pairing, parse_classrooms, parse_day_periods, parse_grades, parse_majors,
};

#[test]
fn test_days_and_periods_zip_when_same_length() {
    let parsed = parse_day_periods("水金", "11");
    assert_eq!(parsed.pairing, Pairing::Zip);
    assert_eq!(parsed.slots, vec![('水', 1), ('金', 1)]);
}

#[test]
fn test_single_day_takes_every_period() {
    let parsed = parse_day_periods("火", "34");
    assert_eq!(parsed.pairing, Pairing::SingleDay);
    assert_eq!(parsed.slots, vec![('火', 3), ('火', 4)]);
}

#[test]
fn test_single_period_applies_to_every_day() {
    let parsed = parse_day_periods("月水", "1");
    assert_eq!(parsed.pairing, Pairing::SinglePeriod);
    assert_eq!(parsed.slots, vec![('月', 1), ('水', 1)]);
}

#[test]
fn test_mismatched_lengths_fall_back_to_cross_product() {
    let parsed = parse_day_periods("月水金", "12");
    assert_eq!(parsed.pairing, Pairing::CrossProduct);
    assert_eq!(parsed.slots.len(), 6);
    assert!(parsed.slots.contains(&('金', 2)));
}

#[test]
fn test_other_and_empty_are_unscheduled() {
    for (days, periods) in [(OTHER_SENTINEL, OTHER_SENTINEL), ("月", OTHER_SENTINEL), ("", ""), ("火", "")] {
        let parsed = parse_day_periods(days, periods);
        assert_eq!(parsed.pairing, Pairing::Unscheduled, "days={:?} periods={:?}", days, periods);
        assert!(parsed.slots.is_empty());
    }
}

#[test]
fn test_full_width_period_digits_are_accepted() {
    let parsed = parse_day_periods("木", "２");
    assert_eq!(parsed.slots, vec![('木', 2)]);
}

#[test]
fn test_duplicate_slots_collapse() {
    let parsed = parse_day_periods("月月", "11");
    assert_eq!(parsed.slots, vec![('月', 1)]);
}

#[test]
fn test_grades_split_per_digit() {
    assert_eq!(parse_grades("234"), vec!["2", "3", "4"]);
    assert_eq!(parse_grades("22"), vec!["2"]);
    assert!(parse_grades("").is_empty());
}

#[test]
fn test_majors_split_in_pairs() {
    assert_eq!(parse_majors("ISNC", "Any"), vec!["IS", "NC"]);
    assert_eq!(parse_majors("ISNCXD", "Any"), vec!["IS", "NC", "XD"]);
    assert_eq!(parse_majors("ISN", "Any"), vec!["IS", "N"]);
}

#[test]
fn test_other_major_is_reclassified_by_title() {
    assert_eq!(parse_majors(OTHER_SENTINEL, "情報応用演習"), vec![INFO_APP_MAJOR]);
    assert_eq!(parse_majors(OTHER_SENTINEL, "General Ethics"), vec![OTHER_SENTINEL]);
    assert_ne!(INFO_APP_MAJOR, OTHER_SENTINEL);
}

#[test]
fn test_classrooms_split_on_whitespace() {
    assert_eq!(parse_classrooms("A101 B203"), vec!["A101", "B203"]);
    assert_eq!(parse_classrooms("A101\u{3000}A101  C1"), vec!["A101", "C1"]);
    assert!(parse_classrooms("  ").is_empty());
}
