use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::api::models::{
    GenerateRequest, GenerateResponse, HealthResponse, LabelInfo, ParseRequest, ParseResponse,
    ReportFile, TemplateResponse,
};
use crate::api::AppState;
use crate::report::parser::{is_structured_message, message_template, parse_message, LABELS};
use crate::report::{Generator, ReportError, ReportRequest};
use crate::ErrorResponse;

const RETRY_MESSAGE: &str = "The document could not be generated, please retry";

#[utoipa::path(
    get,
    path = "/health",
    tag = "Leave Reports",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Leave Reports",
    get,
    path = "/reports/template",
    responses(
        (status = 200, description = "Structured message template", body = TemplateResponse)
    )
)]
pub async fn get_template() -> impl Responder {
    let labels = LABELS
        .iter()
        .map(|entry| LabelInfo {
            label: entry.label.to_string(),
            key: entry.key.to_string(),
        })
        .collect();

    HttpResponse::Ok().json(TemplateResponse {
        template: message_template(),
        labels,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Leave Reports",
    post,
    path = "/reports/parse",
    request_body = ParseRequest,
    responses(
        (status = 200, description = "Parsed and enriched record", body = ParseResponse)
    )
)]
pub async fn parse_report(
    state: web::Data<AppState>,
    item: web::Json<ParseRequest>,
) -> impl Responder {
    let structured = is_structured_message(&item.message);
    let prepared = state.generator.prepare(parse_message(&item.message));

    HttpResponse::Ok().json(ParseResponse {
        structured,
        record: prepared.record,
        leave_id: prepared.leave_id,
        degraded: prepared.degraded,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Leave Reports",
    post,
    path = "/reports",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Report generated", body = GenerateResponse),
        (status = 400, description = "Neither or both of message and record given", body = ErrorResponse),
        (status = 422, description = "Message is not a structured report", body = ErrorResponse),
        (status = 500, description = "Report could not be generated", body = ErrorResponse)
    )
)]
pub async fn generate_report(
    state: web::Data<AppState>,
    item: web::Json<GenerateRequest>,
) -> impl Responder {
    let GenerateRequest {
        message,
        record,
        requester,
    } = item.into_inner();
    let requester = requester.unwrap_or_else(|| format!("api-{}", Uuid::new_v4()));

    let request = match (message, record) {
        (Some(text), None) => ReportRequest::Message { text, requester },
        (None, Some(record)) => ReportRequest::Record { record, requester },
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
                "Provide exactly one of 'message' or 'record'",
            ))
        }
    };

    let generator = state.generator.clone();
    let result = web::block(move || generator.generate(request))
        .await
        .map_err(|e| ReportError::Blocking(e.to_string()))
        .and_then(|inner| inner);

    match result {
        Ok(report) => HttpResponse::Ok().json(GenerateResponse {
            file: ReportFile::pdf(&report.filename, &report.pdf),
            leave_id: report.leave_id,
            issue_date: report.issue_date,
            degraded: report.degraded,
        }),
        Err(ReportError::NotStructured) => HttpResponse::UnprocessableEntity().json(
            ErrorResponse::unprocessable(
                "Message is not a structured leave report, use the template",
            ),
        ),
        Err(e) => {
            log::error!("Report generation failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(RETRY_MESSAGE))
        }
    }
}

/// Configure report routes under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/reports").route(web::post().to(generate_report)))
        .service(web::resource("/reports/template").route(web::get().to(get_template)))
        .service(web::resource("/reports/parse").route(web::post().to(parse_report)));
}
