use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::report::validation::DegradedField;
use crate::report::Record;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct LabelInfo {
    pub label: String,
    pub key: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TemplateResponse {
    /// Message template to copy and fill in
    pub template: String,
    pub labels: Vec<LabelInfo>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ParseRequest {
    pub message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ParseResponse {
    pub structured: bool,
    /// Record after defaults and date enrichment
    #[schema(value_type = Object)]
    pub record: Record,
    pub leave_id: String,
    pub degraded: Vec<DegradedField>,
}

/// Either `message` or `record` must be given.
#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
pub struct GenerateRequest {
    pub message: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub record: Option<Record>,
    /// Shown in server logs only
    pub requester: Option<String>,
}

/// Generated PDF with metadata and base64-encoded data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ReportFile {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub created_at: String,
    pub data: String,
}

impl ReportFile {
    pub fn pdf(filename: impl Into<String>, data: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            mime_type: "application/pdf".to_string(),
            size_bytes: data.len(),
            created_at: Utc::now().to_rfc3339(),
            data: BASE64.encode(data),
        }
    }

    /// Decode base64 data back to bytes.
    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GenerateResponse {
    pub leave_id: String,
    pub issue_date: String,
    pub degraded: Vec<DegradedField>,
    pub file: ReportFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file_round_trip() {
        let file = ReportFile::pdf("Sick Leave1_01012025.pdf", b"%PDF-1.3");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size_bytes, 8);
        assert_eq!(file.decode_data().unwrap(), b"%PDF-1.3");
    }

    #[test]
    fn test_generate_request_accepts_record() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"record": {"id_number": "828287654", "time": "9:00 AM"}}"#,
        )
        .unwrap();
        assert!(request.message.is_none());
        let record = request.record.unwrap();
        assert_eq!(record.get(crate::report::FieldKey::IdNumber), "828287654");
    }
}
