//! # Ticket Claims
//!
//! The textual QR payload is a JSON object:
//!
//! ```json
//! {"ticketId":"0xabc","platform":"TadaaLah","network":"testnet",
//!  "packageId":"0x...","timestamp":1733011200000}
//! ```
//!
//! Only `ticketId` is required. Unknown fields are kept in `extra` and
//! otherwise ignored. A payload that is not JSON at all is read as a bare
//! ticket id, which is how plain-text QR stickers are handled.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::verdict::ClaimRejection;

/// Decoded content of a scanned QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrClaim {
    /// Claimed ticket object id.
    pub ticket_id: String,
    /// Issuing platform name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Network the ticket lives on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Marketplace package that issued the claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    /// Encode time, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Timestamp of the claim this one was re-issued from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<u64>,
    /// Everything else the encoder put in.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QrClaim {
    /// A claim carrying nothing but the ticket id.
    pub fn bare(ticket_id: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            platform: None,
            network: None,
            package_id: None,
            timestamp: None,
            original_timestamp: None,
            extra: Map::new(),
        }
    }

    /// The timestamp the claim was first issued at.
    pub fn issued_at(&self) -> Option<u64> {
        self.original_timestamp.or(self.timestamp)
    }
}

/// Decode a scanned payload.
///
/// JSON objects must carry a non-empty string `ticketId`. Text that is not
/// JSON is taken verbatim as a bare ticket id. Known fields of the wrong
/// type are kept in `extra` and empty strings count as absent, so only a
/// missing ticket id rejects the payload.
pub fn decode_claim(payload: &str) -> Result<QrClaim, ClaimRejection> {
    let no_ticket_id =
        || ClaimRejection::InvalidPayload("Invalid QR code: No ticket ID found".to_string());

    if payload.trim().is_empty() {
        return Err(no_ticket_id());
    }

    let mut fields = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Err(no_ticket_id()),
        Err(_) => return Ok(QrClaim::bare(payload)),
    };

    let ticket_id = match fields.remove("ticketId") {
        Some(Value::String(id)) if !id.trim().is_empty() => id,
        _ => return Err(no_ticket_id()),
    };

    let mut claim = QrClaim::bare(ticket_id);
    claim.platform = take_string(&mut fields, "platform");
    claim.network = take_string(&mut fields, "network");
    claim.package_id = take_string(&mut fields, "packageId");
    claim.timestamp = take_millis(&mut fields, "timestamp");
    claim.original_timestamp = take_millis(&mut fields, "originalTimestamp");
    claim.extra = fields;
    Ok(claim)
}

/// Non-empty string field. Other values stay in `fields`.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !fields.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Whole-millisecond timestamp field. Other values stay in `fields`.
fn take_millis(fields: &mut Map<String, Value>, key: &str) -> Option<u64> {
    let millis = fields.get(key).and_then(Value::as_u64)?;
    fields.remove(key);
    Some(millis)
}

/// Build the payload object. `context` entries are applied last and win
/// over the base fields.
pub(crate) fn build_payload(
    ticket_id: &str,
    platform: &str,
    network: &str,
    package_id: &str,
    timestamp: u64,
    context: &Map<String, Value>,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("ticketId".to_string(), Value::from(ticket_id));
    payload.insert("platform".to_string(), Value::from(platform));
    payload.insert("network".to_string(), Value::from(network));
    payload.insert("packageId".to_string(), Value::from(package_id));
    payload.insert("timestamp".to_string(), Value::from(timestamp));
    for (key, value) in context {
        payload.insert(key.clone(), value.clone());
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_payload() {
        let claim = decode_claim(
            r#"{"ticketId":"0xabc","platform":"TadaaLah","network":"testnet",
                "packageId":"0xpkg","timestamp":1733011200000,"seat":"A12"}"#,
        )
        .unwrap();
        assert_eq!(claim.ticket_id, "0xabc");
        assert_eq!(claim.platform.as_deref(), Some("TadaaLah"));
        assert_eq!(claim.network.as_deref(), Some("testnet"));
        assert_eq!(claim.package_id.as_deref(), Some("0xpkg"));
        assert_eq!(claim.timestamp, Some(1_733_011_200_000));
        assert_eq!(claim.extra.get("seat"), Some(&json!("A12")));
        assert!(!claim.extra.contains_key("ticketId"));
        assert!(!claim.extra.contains_key("platform"));
    }

    #[test]
    fn test_mistyped_fields_keep_ticket_id() {
        let claim =
            decode_claim(r#"{"ticketId":"0xabc","timestamp":"2025-12-01T10:00:00Z"}"#).unwrap();
        assert_eq!(claim.ticket_id, "0xabc");
        assert_eq!(claim.timestamp, None);
        assert_eq!(claim.extra.get("timestamp"), Some(&json!("2025-12-01T10:00:00Z")));

        let claim = decode_claim(r#"{"ticketId":"0xabc","timestamp":1733011200000.5}"#).unwrap();
        assert_eq!(claim.timestamp, None);
        assert_eq!(claim.issued_at(), None);

        let claim = decode_claim(r#"{"ticketId":"0xabc","platform":7,"network":null}"#).unwrap();
        assert_eq!(claim.platform, None);
        assert_eq!(claim.network, None);
        assert_eq!(claim.extra.get("platform"), Some(&json!(7)));

        let claim =
            decode_claim(r#"{"ticketId":"0xabc","originalTimestamp":12,"timestamp":-4}"#).unwrap();
        assert_eq!(claim.original_timestamp, Some(12));
        assert_eq!(claim.timestamp, None);
        assert_eq!(claim.issued_at(), Some(12));
    }

    #[test]
    fn test_empty_deployment_fields_are_absent() {
        let claim = decode_claim(r#"{"ticketId":"0xabc","network":"","packageId":""}"#).unwrap();
        assert_eq!(claim.network, None);
        assert_eq!(claim.package_id, None);
        assert!(claim.extra.is_empty());
    }

    #[test]
    fn test_bare_id_fallback() {
        let claim = decode_claim("not-json-at-all").unwrap();
        assert_eq!(claim.ticket_id, "not-json-at-all");
        assert!(claim.network.is_none());
    }

    #[test]
    fn test_missing_ticket_id() {
        let payloads = [
            "",
            "   ",
            r#"{"platform":"TadaaLah"}"#,
            r#"{"ticketId":""}"#,
            r#"{"ticketId":42}"#,
            "42",
        ];
        for payload in payloads {
            assert!(
                matches!(decode_claim(payload), Err(ClaimRejection::InvalidPayload(_))),
                "{}",
                payload
            );
        }
    }

    #[test]
    fn test_context_overrides_base_fields() {
        let context = json!({ "platform": "Partner", "eventName": "Concert" });
        let payload = build_payload(
            "0x1",
            "TadaaLah",
            "testnet",
            "0xpkg",
            5,
            context.as_object().unwrap(),
        );
        assert_eq!(payload["platform"], json!("Partner"));
        assert_eq!(payload["eventName"], json!("Concert"));
        assert_eq!(payload["ticketId"], json!("0x1"));
    }

    #[test]
    fn test_issued_at_prefers_original() {
        let mut claim = QrClaim::bare("0x1");
        claim.timestamp = Some(10);
        assert_eq!(claim.issued_at(), Some(10));
        claim.original_timestamp = Some(3);
        assert_eq!(claim.issued_at(), Some(3));
    }

    proptest! {
        #[test]
        fn prop_encoded_ticket_id_survives(id in "\\PC{1,64}", ts in any::<u64>()) {
            prop_assume!(!id.trim().is_empty());
            let payload = build_payload(&id, "TadaaLah", "testnet", "0xpkg", ts, &Map::new());
            let text = serde_json::to_string(&payload).unwrap();
            prop_assert_eq!(decode_claim(&text).unwrap().ticket_id, id);
        }

        #[test]
        fn prop_decode_never_panics(payload in "\\PC*") {
            let _ = decode_claim(&payload);
        }
    }
}
