//! Flat key/value record holding every field printed on a leave report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed schema of a leave report record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    PatientNameAr,
    PatientNameEn,
    IdNumber,
    NationalityAr,
    NationalityEn,
    EmployerAr,
    EmployerEn,
    DoctorNameAr,
    DoctorNameEn,
    PositionAr,
    PositionEn,
    AdmissionDateGregorian,
    AdmissionDateHijri,
    DischargeDateGregorian,
    DischargeDateHijri,
    IssueDateGregorian,
    HospitalNameAr,
    HospitalNameEn,
    Time,
    CustomLogo,
}

impl FieldKey {
    pub const ALL: [FieldKey; 20] = [
        FieldKey::PatientNameAr,
        FieldKey::PatientNameEn,
        FieldKey::IdNumber,
        FieldKey::NationalityAr,
        FieldKey::NationalityEn,
        FieldKey::EmployerAr,
        FieldKey::EmployerEn,
        FieldKey::DoctorNameAr,
        FieldKey::DoctorNameEn,
        FieldKey::PositionAr,
        FieldKey::PositionEn,
        FieldKey::AdmissionDateGregorian,
        FieldKey::AdmissionDateHijri,
        FieldKey::DischargeDateGregorian,
        FieldKey::DischargeDateHijri,
        FieldKey::IssueDateGregorian,
        FieldKey::HospitalNameAr,
        FieldKey::HospitalNameEn,
        FieldKey::Time,
        FieldKey::CustomLogo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientNameAr => "patient_name_ar",
            Self::PatientNameEn => "patient_name_en",
            Self::IdNumber => "id_number",
            Self::NationalityAr => "nationality_ar",
            Self::NationalityEn => "nationality_en",
            Self::EmployerAr => "employer_ar",
            Self::EmployerEn => "employer_en",
            Self::DoctorNameAr => "doctor_name_ar",
            Self::DoctorNameEn => "doctor_name_en",
            Self::PositionAr => "position_ar",
            Self::PositionEn => "position_en",
            Self::AdmissionDateGregorian => "admission_date_gregorian",
            Self::AdmissionDateHijri => "admission_date_hijri",
            Self::DischargeDateGregorian => "discharge_date_gregorian",
            Self::DischargeDateHijri => "discharge_date_hijri",
            Self::IssueDateGregorian => "issue_date_gregorian",
            Self::HospitalNameAr => "hospital_name_ar",
            Self::HospitalNameEn => "hospital_name_en",
            Self::Time => "time",
            Self::CustomLogo => "custom_logo",
        }
    }

    /// Parse a snake_case key name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }

    /// True for the Arabic-script half of a bilingual pair.
    pub fn is_arabic(&self) -> bool {
        self.as_str().ends_with("_ar")
    }

    /// True for Gregorian date inputs that the calendar converter parses.
    pub fn is_gregorian_date(&self) -> bool {
        matches!(
            self,
            Self::AdmissionDateGregorian | Self::DischargeDateGregorian | Self::IssueDateGregorian
        )
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leave report record. Missing keys read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<FieldKey, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, or `""` when absent.
    pub fn get(&self, key: FieldKey) -> &str {
        self.fields.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Value for `key` only when present and non-blank.
    pub fn get_non_empty(&self, key: FieldKey) -> Option<&str> {
        self.fields
            .get(&key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) {
        self.fields.insert(key, value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<String> {
        self.fields.remove(&key)
    }

    /// Returns a new record where every field of `other` overrides `self`.
    pub fn merged(&self, other: &Record) -> Record {
        let mut fields = self.fields.clone();
        for (key, value) in &other.fields {
            fields.insert(*key, value.clone());
        }
        Record { fields }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(FieldKey, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}
