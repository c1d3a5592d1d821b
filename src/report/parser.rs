//! Structured chat message parsing.
//!
//! A structured message has one `label: value` pair per line. The label
//! table below is the only definition of the labels: the template shown to
//! users and the parser are both derived from it.

use super::record::{FieldKey, Record};

/// One recognised line label.
#[derive(Debug, Clone, Copy)]
pub struct LabelSpec {
    pub label: &'static str,
    pub key: FieldKey,
    pub example: &'static str,
}

pub const LABELS: [LabelSpec; 16] = [
    LabelSpec { label: "👤 اسم المريض (عربي)", key: FieldKey::PatientNameAr, example: "عبدالله محمد علي" },
    LabelSpec { label: "👤 اسم المريض (إنجليزي)", key: FieldKey::PatientNameEn, example: "Abdullah Mohammed Ali" },
    LabelSpec { label: "🆔 رقم الهوية", key: FieldKey::IdNumber, example: "828287654" },
    LabelSpec { label: "🌍 الجنسية (عربي)", key: FieldKey::NationalityAr, example: "السعودية" },
    LabelSpec { label: "🌍 الجنسية (إنجليزي)", key: FieldKey::NationalityEn, example: "Saudi Arabia" },
    LabelSpec { label: "🏢 جهة العمل (عربي)", key: FieldKey::EmployerAr, example: "طالب جامعي" },
    LabelSpec { label: "🏢 جهة العمل (إنجليزي)", key: FieldKey::EmployerEn, example: "University Student" },
    LabelSpec { label: "👨‍⚕️ اسم الطبيب (عربي)", key: FieldKey::DoctorNameAr, example: "المقبني" },
    LabelSpec { label: "👨‍⚕️ اسم الطبيب (إنجليزي)", key: FieldKey::DoctorNameEn, example: "Almakbany" },
    LabelSpec { label: "💼 المسمى الوظيفي (عربي)", key: FieldKey::PositionAr, example: "طبيب عام" },
    LabelSpec { label: "💼 المسمى الوظيفي (إنجليزي)", key: FieldKey::PositionEn, example: "General" },
    LabelSpec { label: "📅 تاريخ الدخول (ميلادي)", key: FieldKey::AdmissionDateGregorian, example: "20-09-2025" },
    LabelSpec { label: "📅 تاريخ الخروج (ميلادي)", key: FieldKey::DischargeDateGregorian, example: "21-09-2025" },
    LabelSpec { label: "🏥 اسم المنشأة (عربي)", key: FieldKey::HospitalNameAr, example: "مستشفى الملك فيصل التخصصي" },
    LabelSpec { label: "🏥 اسم المنشأة (إنجليزي)", key: FieldKey::HospitalNameEn, example: "King Faisal Specialist Hospital" },
    LabelSpec { label: "⏰ الوقت", key: FieldKey::Time, example: "10:20 AM" },
];

/// Half of the label table must be present for a message to count as structured.
pub const MIN_RECOGNIZED_LABELS: usize = LABELS.len() / 2;

pub const DEFAULT_GREGORIAN_DATE: &str = "01-01-2025";
pub const DEFAULT_HIJRI_DATE: &str = "01-01-1446";
pub const DEFAULT_HOSPITAL_NAME_AR: &str = "مجمع عائلتي الطبي";
pub const DEFAULT_HOSPITAL_NAME_EN: &str = "My Family Medical Center";
pub const DEFAULT_TIME: &str = "6:23 AM";

/// Placeholder for each schema field when the message omits it.
/// `custom_logo` is optional and has no placeholder.
pub fn default_value(key: FieldKey) -> Option<&'static str> {
    match key {
        FieldKey::AdmissionDateGregorian
        | FieldKey::DischargeDateGregorian
        | FieldKey::IssueDateGregorian => Some(DEFAULT_GREGORIAN_DATE),
        FieldKey::AdmissionDateHijri | FieldKey::DischargeDateHijri => Some(DEFAULT_HIJRI_DATE),
        FieldKey::HospitalNameAr => Some(DEFAULT_HOSPITAL_NAME_AR),
        FieldKey::HospitalNameEn => Some(DEFAULT_HOSPITAL_NAME_EN),
        FieldKey::Time => Some(DEFAULT_TIME),
        FieldKey::CustomLogo => None,
        _ => Some(""),
    }
}

// Chat clients routinely drop the emoji variation selector.
fn normalize(text: &str) -> String {
    text.chars().filter(|c| *c != '\u{FE0F}').collect()
}

fn is_colon(c: char) -> bool {
    c == ':' || c == '：'
}

/// Strip `label` and the colon after it from the start of `line`.
fn value_after_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(label)?.trim_start();
    let mut chars = rest.chars();
    let first = chars.next()?;
    if is_colon(first) {
        Some(chars.as_str())
    } else {
        None
    }
}

fn match_label(line: &str) -> Option<(FieldKey, String)> {
    let line = normalize(line.trim());
    LABELS.iter().find_map(|entry| {
        let label = normalize(entry.label);
        value_after_label(&line, &label).map(|value| (entry.key, value.trim().to_string()))
    })
}

/// True when enough distinct labels appear, each followed by a colon.
pub fn is_structured_message(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    let normalized = normalize(text);

    let recognized = LABELS
        .iter()
        .filter(|entry| {
            let label = normalize(entry.label);
            normalized
                .match_indices(label.as_str())
                .any(|(start, _)| {
                    normalized[start + label.len()..]
                        .trim_start()
                        .starts_with(is_colon)
                })
        })
        .count();

    log::debug!("structured message check: {} labels recognised", recognized);
    recognized >= MIN_RECOGNIZED_LABELS
}

/// Extract every labelled value from the message.
///
/// A line without a label directly after a labelled line is treated as a
/// wrapped continuation of that value. Lines before the first label are
/// ignored. When a label repeats, the last value wins.
pub fn parse_message(text: &str) -> Record {
    let mut record = Record::new();
    let mut current: Option<FieldKey> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            current = None;
            continue;
        }

        if let Some((key, value)) = match_label(trimmed) {
            record.insert(key, value);
            current = Some(key);
        } else if let Some(key) = current {
            let joined = format!("{} {}", record.get(key), trimmed);
            record.insert(key, joined.trim().to_string());
        }
    }

    record
}

/// Fill placeholders for missing fields and normalise whitespace.
///
/// Date fields stay raw text for the calendar converter. Idempotent.
pub fn validate_data(record: Record) -> Record {
    let mut validated = Record::new();

    for key in FieldKey::ALL {
        let value = record.get_non_empty(key);
        match (key, value) {
            (FieldKey::CustomLogo, Some(path)) => validated.insert(key, path.trim()),
            (FieldKey::CustomLogo, None) => {}
            (_, Some(value)) => {
                validated.insert(key, value.split_whitespace().collect::<Vec<_>>().join(" "))
            }
            (_, None) => {
                if let Some(default) = default_value(key) {
                    validated.insert(key, default);
                }
            }
        }
    }

    validated
}

/// The message template users copy and fill in.
pub fn message_template() -> String {
    LABELS
        .iter()
        .map(|entry| format!("{}: {}", entry.label, entry.example))
        .collect::<Vec<_>>()
        .join("\n")
}
