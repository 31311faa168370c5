// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP surface.
//
//   GET  /         upload form
//   POST /         multipart upload (part `file`), answered with the form
//                  and the outcome of that upload
//   GET  /healthz  liveness
//
// Every upload response carries `x-printdrop-outcome` with a stable code so
// scripts can tell the outcomes apart without scraping the page.

use axum::Router;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use printdrop_core::human_errors::{HumanMessage, Severity};
use printdrop_core::types::UploadRequest;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::pages::upload::{self, PageView};
use crate::services::app_services::{AppServices, UploadOutcome};

/// Response header naming the upload outcome.
pub const OUTCOME_HEADER: &str = "x-printdrop-outcome";

/// Multipart part that carries the document.
pub const FILE_FIELD: &str = "file";

pub fn router(services: AppServices) -> Router {
    let body_limit = services.config().max_upload_bytes;
    Router::new()
        .route("/", get(index).post(upload))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(services)
}

async fn index(State(services): State<AppServices>) -> Html<String> {
    Html(upload::render(&PageView::new(services.config())))
}

async fn healthz(State(services): State<AppServices>) -> String {
    format!("ok ({})\n", services.dispatcher().platform_name())
}

async fn upload(
    State(services): State<AppServices>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let view = PageView::new(services.config());

    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "upload is not a multipart form");
            return malformed(&services, view, rejection.status());
        }
    };

    let request = match read_upload(multipart).await {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "unreadable upload body");
            return malformed(&services, view, e.status());
        }
    };

    let outcome = services.upload_and_print(request).await;
    let mut view = view.with_status(outcome.human(&services.config().printer_match));
    view.stored_as = outcome.stored_name().map(str::to_owned);
    page(status_for(&outcome), outcome.code(), &view)
}

/// Answer a body that could not be read as a multipart form.
fn malformed(services: &AppServices, view: PageView, status: StatusCode) -> Response {
    let message = HumanMessage {
        message: "The upload didn't arrive in one piece.".into(),
        suggestion: format!(
            "Try again from the upload page. Files larger than {} MB can't be uploaded.",
            services.config().max_upload_bytes / (1024 * 1024)
        ),
        severity: Severity::ActionRequired,
    };
    page(status, "malformed-upload", &view.with_status(message))
}

/// Pull the `file` part out of the form.
///
/// A browser submitting the form with no file chosen still sends the part,
/// with an empty filename and no content; that counts as no file.
async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadRequest>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_owned();
        let content = field.bytes().await?;
        if filename.is_empty() && content.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadRequest::new(filename, content.to_vec())));
    }
    Ok(None)
}

fn status_for(outcome: &UploadOutcome) -> StatusCode {
    match outcome {
        UploadOutcome::NotStored(err) if err.is_rejection() => StatusCode::BAD_REQUEST,
        UploadOutcome::NotStored(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ if outcome.succeeded() => StatusCode::OK,
        UploadOutcome::Dispatched { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn page(status: StatusCode, code: &'static str, view: &PageView) -> Response {
    (status, [(OUTCOME_HEADER, code)], Html(upload::render(view))).into_response()
}
