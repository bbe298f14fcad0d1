use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acknowledgment of an archive write.
///
/// `inserted_ids` are ObjectId hex strings in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub inserted_count: u64,
    pub inserted_ids: Vec<String>,
}

/// One recorded post search.
///
/// Append-only ledger entry: `result` is the number of posts the search
/// returned, `document_ids` the archive ids generated for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub term: String,
    pub created_at: DateTime<Utc>,
    pub result: u64,
    pub document_ids: Vec<String>,
}

/// Body of `DELETE /reddit/search/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDeleteRequest {
    pub history_options: HistoryOptions,
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOptions {
    pub drop: bool,
}

/// Acknowledgment of a history deletion, reflecting which path executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub dropped: bool,
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_delete_request_wire_shape() {
        let json = r#"{ "historyOptions": { "drop": false }, "ids": ["a", "b"] }"#;
        let request: HistoryDeleteRequest = serde_json::from_str(json).unwrap();
        assert!(!request.history_options.drop);
        assert_eq!(request.ids, vec!["a", "b"]);
    }

    #[test]
    fn history_delete_request_ids_default_empty() {
        let json = r#"{ "historyOptions": { "drop": true } }"#;
        let request: HistoryDeleteRequest = serde_json::from_str(json).unwrap();
        assert!(request.history_options.drop);
        assert!(request.ids.is_empty());
    }

    #[test]
    fn insert_ack_serializes_camel_case() {
        let ack = InsertAck {
            inserted_count: 2,
            inserted_ids: vec!["one".to_string(), "two".to_string()],
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["insertedCount"], 2);
        assert_eq!(json["insertedIds"][1], "two");
    }
}
