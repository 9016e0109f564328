use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use service_core::error::AppError;

pub const CASE_SAVED_MESSAGE: &str = "Case saved successfully!";
pub const CASE_SAVE_FAILED_MESSAGE: &str = "Error saving case to database";

/// Inbound intake payload. Nothing here is validated: every field is an opaque
/// JSON value and unknown fields are dropped.
///
/// `None` means the field was absent; an explicit `null` is `Some(Value::Null)`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSubmission {
    #[serde(default, deserialize_with = "present")]
    pub case_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub summary: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub history: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub files: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CaseSubmission {
    /// Parses a raw request body. An empty body or a JSON array is an empty
    /// submission; anything else must be a JSON object.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, AppError> {
        if value.is_array() {
            return Ok(Self::default());
        }

        if !value.is_object() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "case submission must be a JSON object"
            )));
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCaseResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Value>,
    pub database_id: String,
}

impl SaveCaseResponse {
    pub fn saved(case_id: Option<Value>, database_id: String) -> Self {
        Self {
            message: CASE_SAVED_MESSAGE.to_string(),
            case_id,
            database_id,
        }
    }
}

/// Body of every failed save. The cause is only logged.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveCaseFailure {
    pub message: String,
}

impl Default for SaveCaseFailure {
    fn default() -> Self {
        Self {
            message: CASE_SAVE_FAILED_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_is_an_empty_submission() {
        let submission = CaseSubmission::from_body(b"").unwrap();
        assert!(submission.case_id.is_none());

        let submission = CaseSubmission::from_body(b" \n\t").unwrap();
        assert!(submission.summary.is_none());
    }

    #[test]
    fn parses_known_fields_and_ignores_the_rest() {
        let submission = CaseSubmission::from_body(
            br#"{"caseId":"C-1","summary":"theft claim","history":[],"files":[],"extra":true}"#,
        )
        .unwrap();

        assert_eq!(submission.case_id, Some(json!("C-1")));
        assert_eq!(submission.summary, Some(json!("theft claim")));
        assert_eq!(submission.history, Some(json!([])));
        assert_eq!(submission.files, Some(json!([])));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(CaseSubmission::from_body(b"{\"caseId\":").is_err());
    }

    #[test]
    fn scalar_json_is_rejected() {
        assert!(CaseSubmission::from_body(b"\"C-1\"").is_err());
        assert!(CaseSubmission::from_body(b"42").is_err());
        assert!(CaseSubmission::from_body(b"null").is_err());
    }

    #[test]
    fn array_body_is_an_empty_submission() {
        let submission = CaseSubmission::from_body(b"[\"C-1\", \"summary\"]").unwrap();

        assert!(submission.case_id.is_none());
        assert!(submission.summary.is_none());
        assert!(submission.history.is_none());
        assert!(submission.files.is_none());
    }

    #[test]
    fn explicit_null_is_kept_apart_from_absent() {
        let submission = CaseSubmission::from_body(br#"{"caseId":null}"#).unwrap();

        assert_eq!(submission.case_id, Some(Value::Null));
        assert!(submission.summary.is_none());
    }

    #[test]
    fn saved_response_echoes_null_case_id() {
        let body =
            serde_json::to_value(SaveCaseResponse::saved(Some(Value::Null), "abc".to_string()))
                .unwrap();

        assert_eq!(
            body,
            json!({ "message": CASE_SAVED_MESSAGE, "caseId": null, "databaseId": "abc" })
        );
    }

    #[test]
    fn saved_response_omits_missing_case_id() {
        let body = serde_json::to_value(SaveCaseResponse::saved(None, "abc".to_string())).unwrap();

        assert_eq!(body, json!({ "message": CASE_SAVED_MESSAGE, "databaseId": "abc" }));
    }

    #[test]
    fn failure_body_is_generic() {
        let body = serde_json::to_value(SaveCaseFailure::default()).unwrap();
        assert_eq!(body, json!({ "message": "Error saving case to database" }));
    }
}
