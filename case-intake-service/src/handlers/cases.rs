use crate::dtos::{CaseSubmission, SaveCaseFailure, SaveCaseResponse};
use crate::models::CaseRecord;
use crate::services::metrics::{record_case_failure, record_case_saved};
use crate::services::CaseSession;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveStage {
    Connect,
    Map,
    Insert,
}

impl SaveStage {
    fn as_str(self) -> &'static str {
        match self {
            SaveStage::Connect => "connect",
            SaveStage::Map => "map",
            SaveStage::Insert => "insert",
        }
    }
}

/// `POST /api/save-case`
///
/// Opens a store session for this request only, writes one case record and
/// closes the session before replying. Every failure collapses into the same
/// 500 body; the cause is logged. That includes bodies the extractor refuses,
/// such as ones over the request size limit.
pub async fn save_case(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let session = match state.store.connect().await {
        Ok(session) => session,
        Err(e) => return failed(SaveStage::Connect, e),
    };
    tracing::info!("Connected to case store");

    let outcome = match body {
        Ok(body) => insert_submission(session.as_ref(), &body).await,
        Err(rejection) => Err((
            SaveStage::Map,
            AppError::BadRequest(anyhow::anyhow!("unreadable request body: {}", rejection)),
        )),
    };

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "Failed to close case store connection");
    } else {
        tracing::info!("Case store connection closed");
    }

    match outcome {
        Ok(saved) => {
            record_case_saved();
            (StatusCode::CREATED, Json(saved)).into_response()
        }
        Err((stage, e)) => failed(stage, e),
    }
}

async fn insert_submission(
    session: &dyn CaseSession,
    body: &[u8],
) -> Result<SaveCaseResponse, (SaveStage, AppError)> {
    let submission = CaseSubmission::from_body(body).map_err(|e| (SaveStage::Map, e))?;
    tracing::info!(case_id = ?submission.case_id, "Received case submission");

    let record = CaseRecord::from_submission(submission);
    let document = record.to_document().map_err(|e| (SaveStage::Map, e))?;

    let database_id = session
        .insert_case(document)
        .await
        .map_err(|e| (SaveStage::Insert, e))?;
    tracing::info!(database_id = %database_id, "Inserted case record");

    Ok(SaveCaseResponse::saved(record.case_id, database_id))
}

fn failed(stage: SaveStage, error: AppError) -> Response {
    tracing::error!(stage = stage.as_str(), error = %error, "Failed to save case");
    record_case_failure(stage.as_str());

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SaveCaseFailure::default()),
    )
        .into_response()
}
