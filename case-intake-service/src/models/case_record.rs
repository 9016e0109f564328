use crate::dtos::CaseSubmission;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;

/// A case as persisted in the `cases` collection.
///
/// The pass-through fields are opaque JSON; whatever the caller sent is stored
/// as-is, and anything absent is stored as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub case_id: Option<Value>,
    pub case_summary: Option<Value>,
    pub chat_history: Option<Value>,
    pub attached_files: Option<Value>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl CaseRecord {
    /// Stamps the submission with the server's clock. Client-supplied timestamps
    /// never reach this struct.
    pub fn from_submission(submission: CaseSubmission) -> Self {
        Self {
            id: None,
            case_id: submission.case_id,
            case_summary: submission.summary,
            chat_history: submission.history,
            attached_files: submission.files,
            created_at: Utc::now(),
        }
    }

    pub fn to_document(&self) -> Result<Document, AppError> {
        Ok(bson::to_document(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;
    use serde_json::json;

    fn submission(body: Value) -> CaseSubmission {
        CaseSubmission::from_value(body).unwrap()
    }

    #[test]
    fn maps_submission_fields_to_record_names() {
        let record = CaseRecord::from_submission(submission(json!({
            "caseId": "C-1",
            "summary": "theft claim",
            "history": [{"role": "user", "text": "my bike was stolen"}],
            "files": [{"name": "receipt.pdf"}]
        })));

        let doc = record.to_document().unwrap();
        assert_eq!(doc.get_str("caseId").unwrap(), "C-1");
        assert_eq!(doc.get_str("caseSummary").unwrap(), "theft claim");
        assert_eq!(doc.get_array("chatHistory").unwrap().len(), 1);
        assert_eq!(
            doc.get_array("attachedFiles").unwrap()[0]
                .as_document()
                .unwrap()
                .get_str("name")
                .unwrap(),
            "receipt.pdf"
        );
        assert!(doc.get_datetime("createdAt").is_ok());
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn absent_fields_are_stored_as_null() {
        let doc = CaseRecord::from_submission(submission(json!({})))
            .to_document()
            .unwrap();

        for key in ["caseId", "caseSummary", "chatHistory", "attachedFiles"] {
            assert_eq!(doc.get(key), Some(&Bson::Null), "{key} should be null");
        }
    }

    #[test]
    fn client_created_at_is_ignored() {
        let before = Utc::now();
        let record = CaseRecord::from_submission(submission(json!({
            "caseId": "C-2",
            "createdAt": "1999-01-01T00:00:00Z"
        })));
        let after = Utc::now();

        assert!(record.created_at >= before && record.created_at <= after);
    }

    #[test]
    fn non_string_case_id_is_preserved() {
        let doc = CaseRecord::from_submission(submission(json!({ "caseId": 42 })))
            .to_document()
            .unwrap();

        assert_eq!(doc.get("caseId"), Some(&Bson::Int64(42)));
    }

    #[test]
    fn integers_beyond_i64_cannot_be_mapped() {
        let record = CaseRecord::from_submission(submission(json!({
            "caseId": "C-3",
            "history": [u64::MAX]
        })));

        assert!(matches!(record.to_document(), Err(AppError::BadRequest(_))));
    }
}
