use leave_report_server::report::identifier::{generate_id, is_valid_id};
use leave_report_server::report::parser::{
    is_structured_message, message_template, parse_message, validate_data, LABELS,
    MIN_RECOGNIZED_LABELS,
};
use leave_report_server::report::{FieldKey, Record};

const SAMPLE_MESSAGE: &str = "\
👤 اسم المريض (عربي): عبدالله محمد علي
👤 اسم المريض (إنجليزي): Abdullah Mohammed Ali
🆔 رقم الهوية: 828287654
🌍 الجنسية (عربي): السعودية
🌍 الجنسية (إنجليزي): Saudi Arabia
🏢 جهة العمل (عربي): طالب جامعي
🏢 جهة العمل (إنجليزي): University Student
👨‍⚕️ اسم الطبيب (عربي): المقبني
👨‍⚕️ اسم الطبيب (إنجليزي): Almakbany
💼 المسمى الوظيفي (عربي): طبيب عام
💼 المسمى الوظيفي (إنجليزي): General
📅 تاريخ الدخول (ميلادي): 20-09-2025
📅 تاريخ الخروج (ميلادي): 21-09-2025
🏥 اسم المنشأة (عربي): مستشفى الملك فيصل التخصصي
🏥 اسم المنشأة (إنجليزي): King Faisal Specialist Hospital
⏰ الوقت: 10:20 AM";

#[test]
fn test_sample_message_is_structured() {
    assert!(is_structured_message(SAMPLE_MESSAGE));
    assert!(is_structured_message(&message_template()));
}

#[test]
fn test_detection_threshold() {
    let lines: Vec<&str> = SAMPLE_MESSAGE.lines().collect();
    let enough = lines[..MIN_RECOGNIZED_LABELS].join("\n");
    let too_few = lines[..MIN_RECOGNIZED_LABELS - 1].join("\n");

    assert!(is_structured_message(&enough));
    assert!(!is_structured_message(&too_few));
    assert!(!is_structured_message(""));
    assert!(!is_structured_message("السلام عليكم، أحتاج تقرير"));
}

#[test]
fn test_parse_sample_message() {
    let record = parse_message(SAMPLE_MESSAGE);

    assert_eq!(record.len(), LABELS.len());
    assert_eq!(record.get(FieldKey::PatientNameAr), "عبدالله محمد علي");
    assert_eq!(record.get(FieldKey::IdNumber), "828287654");
    assert_eq!(record.get(FieldKey::DoctorNameEn), "Almakbany");
    assert_eq!(record.get(FieldKey::AdmissionDateGregorian), "20-09-2025");
    assert_eq!(record.get(FieldKey::Time), "10:20 AM");
}

#[test]
fn test_parse_is_order_independent() {
    let reversed: Vec<&str> = SAMPLE_MESSAGE.lines().rev().collect();
    assert_eq!(parse_message(&reversed.join("\n")), parse_message(SAMPLE_MESSAGE));
}

#[test]
fn test_fullwidth_colon_and_leading_noise() {
    let text = "Please issue the report\n🆔 رقم الهوية： 1122923749";
    let record = parse_message(text);
    assert_eq!(record.get(FieldKey::IdNumber), "1122923749");
    assert_eq!(record.len(), 1);
}

#[test]
fn test_last_occurrence_wins() {
    let text = "🆔 رقم الهوية: 111\n🆔 رقم الهوية: 222";
    assert_eq!(parse_message(text).get(FieldKey::IdNumber), "222");
}

#[test]
fn test_validate_data_is_idempotent() {
    let inputs = [
        Record::new(),
        parse_message(SAMPLE_MESSAGE),
        Record::new()
            .with(FieldKey::PatientNameEn, "  lots   of\tspace  ")
            .with(FieldKey::CustomLogo, " /tmp/logo.png "),
    ];

    for record in inputs {
        let once = validate_data(record);
        assert_eq!(validate_data(once.clone()), once);
    }
}

#[test]
fn test_message_to_leave_id() {
    let record = validate_data(parse_message(SAMPLE_MESSAGE));
    let id = generate_id(
        record.get(FieldKey::IdNumber),
        record.get(FieldKey::AdmissionDateGregorian),
        record.get(FieldKey::DischargeDateGregorian),
    );
    assert_eq!(id, "PSL76540252025");
    assert!(is_valid_id(&id));
}

#[test]
fn test_leave_id_shape_for_digit_ids() {
    for national_id in ["1", "12345", "1122923749", "999999999999999"] {
        let id = generate_id(national_id, "01-01-2025", "31-12-2025");
        assert!(is_valid_id(&id), "{id}");
    }
}
