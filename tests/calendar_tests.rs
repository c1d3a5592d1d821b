use chrono::NaiveDate;

use leave_report_server::report::calendar::{
    compute_duration, format_hijri_arabic, gregorian_month_name_ar, gregorian_to_hijri,
    gregorian_to_hijri_checked, hijri_to_gregorian, process_dates, HijriDate, FALLBACK_HIJRI_DATE,
};
use leave_report_server::report::{FieldKey, Record};

#[test]
fn test_round_trip_every_day_1900_to_2100() {
    let mut day = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
    let last = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap();

    while day <= last {
        let gregorian = day.format("%d-%m-%Y").to_string();
        assert!(gregorian_to_hijri_checked(&gregorian).is_ok(), "{gregorian} fell back");
        let hijri = gregorian_to_hijri(&gregorian);
        assert_eq!(hijri_to_gregorian(&hijri).as_deref(), Some(gregorian.as_str()));
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn test_hijri_is_monotonic() {
    let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut previous = HijriDate::from_gregorian(day);
    for _ in 0..800 {
        day = day.succ_opt().unwrap();
        let current = HijriDate::from_gregorian(day);
        assert!(current > previous, "{current} not after {previous}");
        previous = current;
    }
}

#[test]
fn test_known_conversions() {
    assert_eq!(gregorian_to_hijri("20-09-2025"), "27-03-1447");
    assert_eq!(gregorian_to_hijri("21-09-2025"), "28-03-1447");
    assert_eq!(gregorian_to_hijri("12-05-2025"), "14-11-1446");
    assert_eq!(gregorian_to_hijri("2025-09-20"), "27-03-1447");
    assert_eq!(gregorian_to_hijri("Admitted on 20/09/2025"), "27-03-1447");
    // 1 Muharram 1446 coincides with the fallback text.
    assert_eq!(gregorian_to_hijri("08-07-2024"), FALLBACK_HIJRI_DATE);
    assert!(gregorian_to_hijri_checked("08-07-2024").is_ok());
}

#[test]
fn test_fallback_on_bad_input() {
    for input in ["", "yesterday", "31-02-2025", "20-09-1800", "40-01-2025"] {
        assert_eq!(gregorian_to_hijri(input), FALLBACK_HIJRI_DATE, "{input:?}");
    }
}

#[test]
fn test_format_hijri_arabic() {
    assert_eq!(format_hijri_arabic("27-03-1447"), "27 ربيع الأول 1447هـ");
    assert_eq!(format_hijri_arabic("01-09-1446"), "1 رمضان 1446هـ");
    assert_eq!(format_hijri_arabic("01-13-1446"), "01-13-1446");
    assert_eq!(format_hijri_arabic("garbage"), "garbage");
}

#[test]
fn test_gregorian_month_names() {
    assert_eq!(gregorian_month_name_ar(1), Some("يناير"));
    assert_eq!(gregorian_month_name_ar(12), Some("ديسمبر"));
    assert_eq!(gregorian_month_name_ar(0), None);
    assert_eq!(gregorian_month_name_ar(13), None);
}

#[test]
fn test_duration_is_inclusive_and_floored() {
    assert_eq!(compute_duration("20-09-2025", "21-09-2025"), 2);
    assert_eq!(compute_duration("20-09-2025", "20-09-2025"), 1);
    assert_eq!(compute_duration("21-09-2025", "20-09-2025"), 1);
    assert_eq!(compute_duration("??", "20-09-2025"), 1);
    assert_eq!(compute_duration("28-02-2024", "01-03-2024"), 3);
}

#[test]
fn test_process_dates_example() {
    let dates = process_dates("20-09-2025", "21-09-2025");
    assert_eq!(dates.admission_date_hijri, "27-03-1447");
    assert_eq!(dates.discharge_date_hijri, "28-03-1447");
    assert_eq!(dates.issue_date_gregorian, "21-09-2025");

    let record = Record::new().with(FieldKey::PatientNameEn, "Abdullah");
    let enriched = dates.merge_into(&record);
    assert_eq!(enriched.get(FieldKey::PatientNameEn), "Abdullah");
    assert_eq!(enriched.get(FieldKey::IssueDateGregorian), "21-09-2025");
    assert!(!record.contains(FieldKey::IssueDateGregorian));
}
