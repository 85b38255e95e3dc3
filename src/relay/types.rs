//! Relay data types.
//!
//! The relay returns either the latest payload for a workspace or a batch of
//! recent payloads. Payload selection is pure so the cursor can be persisted
//! by the caller.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Timestamp (ms since the epoch) of the last payload processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(pub Option<i64>);

impl Cursor {
    /// Value to send as `since`; an unset cursor asks for everything.
    pub fn since(self) -> i64 {
        self.0.unwrap_or(0)
    }

    /// The cursor as a wall-clock time, when representable.
    pub fn as_datetime(self) -> Option<DateTime<Utc>> {
        self.0.and_then(DateTime::from_timestamp_millis)
    }
}

/// One stored payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    /// The request document, as a JSON string or inline value.
    #[serde(default)]
    pub json: Option<Value>,
    /// When the web app sent it.
    #[serde(default)]
    pub sent_at: Option<i64>,
}

/// Body of a payload response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    /// Batch form.
    #[serde(default)]
    pub payloads: Option<Vec<RelayPayload>>,
    /// Single form: the latest document.
    #[serde(default)]
    pub json: Option<Value>,
    /// Single form: when it was sent.
    #[serde(default)]
    pub sent_at: Option<i64>,
    /// Error message on failure responses.
    #[serde(default)]
    pub error: Option<String>,
}

/// Request document text for a payload value.
fn document(json: &Value) -> String {
    match json {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pick the documents to process from a response and advance the cursor.
///
/// Batches yield every non-null payload and move the cursor to the newest
/// `sentAt`. A single payload is yielded when fetched by hand, when it has
/// no timestamp, or when its timestamp differs from the cursor.
pub fn select_payloads(response: &RelayResponse, cursor: Cursor, manual: bool) -> Result<(Vec<String>, Cursor)> {
    if let Some(batch) = &response.payloads {
        let mut latest = cursor;
        let mut docs = Vec::new();
        for payload in batch {
            let Some(json) = &payload.json else { continue };
            latest = Cursor(Some(latest.since().max(payload.sent_at.unwrap_or(0))));
            docs.push(document(json));
        }
        return Ok((docs, latest));
    }

    let Some(json) = &response.json else {
        if manual {
            return Err(Error::Validation(
                "No payload for this workspace yet. Send from the web app first.".to_string(),
            ));
        }
        return Ok((Vec::new(), cursor));
    };

    if manual || response.sent_at.is_none() || response.sent_at != cursor.0 {
        Ok((vec![document(json)], Cursor(response.sent_at)))
    } else {
        Ok((Vec::new(), cursor))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn response(json: &str) -> RelayResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn single_payload_is_processed_once() {
        let resp = response(r#"{"json": "{\"slides\":[]}", "sentAt": 1700000000000}"#);
        let (docs, cursor) = select_payloads(&resp, Cursor::default(), false).unwrap();
        assert_eq!(docs, vec![r#"{"slides":[]}"#.to_string()]);
        assert_eq!(cursor, Cursor(Some(1_700_000_000_000)));

        let (again, same) = select_payloads(&resp, cursor, false).unwrap();
        assert!(again.is_empty());
        assert_eq!(same, cursor);
    }

    #[test]
    fn manual_fetch_always_processes() {
        let resp = response(r#"{"json": "{}", "sentAt": 5}"#);
        let (docs, _) = select_payloads(&resp, Cursor(Some(5)), true).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn missing_timestamp_always_processes() {
        let resp = response(r#"{"json": {"slides": []}, "sentAt": null}"#);
        let (docs, cursor) = select_payloads(&resp, Cursor(Some(5)), false).unwrap();
        assert_eq!(docs, vec![r#"{"slides":[]}"#.to_string()]);
        assert_eq!(cursor, Cursor(None));
    }

    #[test]
    fn empty_slot_is_only_an_error_by_hand() {
        let resp = response(r#"{"json": null, "sentAt": null}"#);
        let (docs, cursor) = select_payloads(&resp, Cursor(Some(9)), false).unwrap();
        assert!(docs.is_empty());
        assert_eq!(cursor, Cursor(Some(9)));
        assert!(select_payloads(&resp, Cursor(Some(9)), true).is_err());
    }

    #[test]
    fn batch_skips_nulls_and_keeps_the_newest_timestamp() {
        let resp = response(
            r#"{"payloads": [
                {"json": "a", "sentAt": 30},
                {"json": null, "sentAt": 99},
                {"json": "b", "sentAt": 20}
            ]}"#,
        );
        let (docs, cursor) = select_payloads(&resp, Cursor(Some(10)), false).unwrap();
        assert_eq!(docs, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cursor, Cursor(Some(30)));
    }

    #[test]
    fn cursor_converts_to_time() {
        let t = Cursor(Some(0)).as_datetime().unwrap();
        assert_eq!(t.timestamp(), 0);
        assert!(Cursor(None).as_datetime().is_none());
    }
}
