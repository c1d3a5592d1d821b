//! Diagnostics for fields that were silently replaced by defaults.
//!
//! The report is always produced, but callers get a list of the inputs that
//! did not survive so the defaults never go unnoticed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use utoipa::ToSchema;

use super::assets::resolve_upload;
use super::calendar::{gregorian_to_hijri_checked, FALLBACK_HIJRI_DATE};
use super::record::{FieldKey, Record};

/// One input that fell back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DegradedField {
    /// Field key, e.g. `admission_date_gregorian`
    pub field: String,
    /// The input exactly as received
    pub value: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl DegradedField {
    pub fn new(field: FieldKey, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Date that could not be converted and was printed as the fallback.
    pub fn unparsable_date(field: FieldKey, value: &str) -> Self {
        Self::new(
            field,
            value,
            format!("date '{value}' could not be converted, Hijri shown as {FALLBACK_HIJRI_DATE}"),
        )
        .with_suggestion("use DD-MM-YYYY, e.g. 20-09-2025")
    }

    /// Uploaded file that was ignored in favour of the default.
    pub fn rejected_upload(field: FieldKey, value: &str, reason: impl fmt::Display) -> Self {
        Self::new(field, value, format!("{reason}, default used"))
            .with_suggestion("upload the file again")
    }
}

impl fmt::Display for DegradedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

/// Collection of degraded fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DegradedFields {
    fields: Vec<DegradedField>,
}

impl DegradedFields {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add(&mut self, field: DegradedField) {
        self.fields.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.iter().any(|f| f.field == key.as_str())
    }

    pub fn into_vec(self) -> Vec<DegradedField> {
        self.fields
    }

    /// Single log line summarising every entry.
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Check the admission and discharge dates of `record` before enrichment.
pub fn check_dates(record: &Record, errors: &mut DegradedFields) {
    for key in [FieldKey::AdmissionDateGregorian, FieldKey::DischargeDateGregorian] {
        let value = record.get(key);
        if let Err(e) = gregorian_to_hijri_checked(value) {
            log::debug!("{} degraded: {}", key, e);
            errors.add(DegradedField::unparsable_date(key, value));
        }
    }
}

/// Drop a custom logo that does not resolve inside `uploads_dir`.
pub fn check_custom_logo(record: &mut Record, uploads_dir: &Path, errors: &mut DegradedFields) {
    let Some(raw) = record.get_non_empty(FieldKey::CustomLogo) else {
        return;
    };
    if let Err(e) = resolve_upload(uploads_dir, raw) {
        log::warn!("Custom logo ignored: {}", e);
        errors.add(DegradedField::rejected_upload(FieldKey::CustomLogo, raw, &e));
        record.remove(FieldKey::CustomLogo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates_are_not_degraded() {
        let record = Record::new()
            .with(FieldKey::AdmissionDateGregorian, "20-09-2025")
            .with(FieldKey::DischargeDateGregorian, "2025-09-21");
        let mut degraded = DegradedFields::new();
        check_dates(&record, &mut degraded);
        assert!(degraded.is_empty());
    }

    #[test]
    fn test_bad_dates_are_reported() {
        let record = Record::new()
            .with(FieldKey::AdmissionDateGregorian, "yesterday")
            .with(FieldKey::DischargeDateGregorian, "31-02-2025");
        let mut degraded = DegradedFields::new();
        check_dates(&record, &mut degraded);

        assert_eq!(degraded.len(), 2);
        assert!(degraded.contains(FieldKey::AdmissionDateGregorian));
        assert!(degraded.contains(FieldKey::DischargeDateGregorian));
        assert!(degraded.summary().contains("yesterday"));
    }

    #[test]
    fn test_custom_logo_outside_uploads_is_dropped() {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        std::fs::create_dir(&uploads).unwrap();
        std::fs::write(uploads.join("logo.png"), b"x").unwrap();
        std::fs::write(root.path().join("secret.png"), b"x").unwrap();

        let mut kept = Record::new().with(FieldKey::CustomLogo, "logo.png");
        let mut degraded = DegradedFields::new();
        check_custom_logo(&mut kept, &uploads, &mut degraded);
        assert!(degraded.is_empty());
        assert_eq!(kept.get(FieldKey::CustomLogo), "logo.png");

        let secret = root.path().join("secret.png");
        let mut dropped = Record::new().with(FieldKey::CustomLogo, secret.to_str().unwrap());
        check_custom_logo(&mut dropped, &uploads, &mut degraded);
        assert!(degraded.contains(FieldKey::CustomLogo));
        assert!(!dropped.contains(FieldKey::CustomLogo));
    }
}
