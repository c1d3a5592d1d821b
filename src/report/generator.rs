//! End-to-end report generation: message or record in, PDF out.

use serde::Serialize;
use std::path::PathBuf;

use super::calendar::process_dates;
use super::identifier::generate_id;
use super::parser::{is_structured_message, parse_message, validate_data};
use super::record::{FieldKey, Record};
use super::renderer::ReportRenderer;
use super::traits::{Generator, Validator};
use super::validation::{check_custom_logo, check_dates, DegradedField, DegradedFields};
use super::ReportError;
use crate::config::AppConfig;

/// What to build a report from.
#[derive(Debug, Clone)]
pub enum ReportRequest {
    /// A structured chat message.
    Message { text: String, requester: String },
    /// An already structured record.
    Record { record: Record, requester: String },
}

impl Validator for ReportRequest {
    fn validate(&self) -> Result<(), ReportError> {
        match self {
            Self::Message { text, .. } if !is_structured_message(text) => {
                Err(ReportError::NotStructured)
            }
            _ => Ok(()),
        }
    }
}

/// A record ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedRecord {
    pub record: Record,
    pub leave_id: String,
    pub degraded: Vec<DegradedField>,
}

/// Fill defaults, derive dates and the leave ID.
pub fn prepare_record(record: Record) -> PreparedRecord {
    let validated = validate_data(record);

    let mut degraded = DegradedFields::new();
    check_dates(&validated, &mut degraded);
    if !degraded.is_empty() {
        log::warn!("Record degraded: {}", degraded.summary());
    }

    let dates = process_dates(
        validated.get(FieldKey::AdmissionDateGregorian),
        validated.get(FieldKey::DischargeDateGregorian),
    );
    let enriched = dates.merge_into(&validated);
    let leave_id = generate_id(
        enriched.get(FieldKey::IdNumber),
        enriched.get(FieldKey::AdmissionDateGregorian),
        enriched.get(FieldKey::DischargeDateGregorian),
    );

    PreparedRecord {
        record: enriched,
        leave_id,
        degraded: degraded.into_vec(),
    }
}

/// Result of a successful report generation.
#[derive(Debug)]
pub struct GeneratedReport {
    pub filename: String,
    pub path: PathBuf,
    pub pdf: Vec<u8>,
    pub leave_id: String,
    pub issue_date: String,
    pub degraded: Vec<DegradedField>,
}

#[derive(Debug, Clone)]
pub struct ReportGenerator {
    renderer: ReportRenderer,
}

impl ReportGenerator {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            renderer: ReportRenderer::new(config),
        }
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// `prepare_record` plus the checks that depend on configured paths.
    pub fn prepare(&self, record: Record) -> PreparedRecord {
        let mut prepared = prepare_record(record);
        let mut degraded = DegradedFields::new();
        check_custom_logo(&mut prepared.record, self.renderer.uploads_dir(), &mut degraded);
        prepared.degraded.extend(degraded.into_vec());
        prepared
    }

    pub fn generate_from_message(
        &self,
        text: &str,
        requester: &str,
    ) -> Result<GeneratedReport, ReportError> {
        Generator::generate(
            self,
            ReportRequest::Message {
                text: text.to_string(),
                requester: requester.to_string(),
            },
        )
    }

    pub fn generate_from_record(
        &self,
        record: Record,
        requester: &str,
    ) -> Result<GeneratedReport, ReportError> {
        Generator::generate(
            self,
            ReportRequest::Record {
                record,
                requester: requester.to_string(),
            },
        )
    }

    fn render_prepared(
        &self,
        prepared: PreparedRecord,
        requester: &str,
    ) -> Result<GeneratedReport, ReportError> {
        let rendered = self
            .renderer
            .render(&prepared.record, &prepared.leave_id, requester)?;

        Ok(GeneratedReport {
            filename: rendered.filename,
            path: rendered.path,
            pdf: rendered.pdf,
            issue_date: prepared.record.get(FieldKey::IssueDateGregorian).to_string(),
            leave_id: prepared.leave_id,
            degraded: prepared.degraded,
        })
    }
}

impl Generator<ReportRequest> for ReportGenerator {
    type Output = GeneratedReport;

    fn generate(&self, request: ReportRequest) -> Result<GeneratedReport, ReportError> {
        request.validate()?;

        let (record, requester) = match request {
            ReportRequest::Message { text, requester } => (parse_message(&text), requester),
            ReportRequest::Record { record, requester } => (record, requester),
        };
        log::info!("Generating leave report for {}", requester);

        let prepared = self.prepare(record);
        self.render_prepared(prepared, &requester)
    }
}
