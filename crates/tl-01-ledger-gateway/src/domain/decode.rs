//! # Decoders
//!
//! Raw object fields into typed records, and execution responses into
//! `TransactionResult`.
//!
//! The node is inconsistent about scalar encodings: strings may arrive as
//! UTF-8 byte arrays, u64 values as decimal strings, ids as `{ "id": .. }`
//! wrappers. The field helpers below accept every observed form.

use super::errors::GatewayError;
use super::raw::RawObject;
use serde_json::{Map, Value};
use shared_types::{
    Address, CreatedObject, Escrow, EscrowStatus, Listing, ObjectId, SellerProfile, Ticket,
    TransactionResult,
};

// =============================================================================
// FIELD HELPERS
// =============================================================================

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value, GatewayError> {
    fields
        .get(name)
        .ok_or_else(|| GatewayError::field(name, "missing"))
}

fn string_value(name: &str, value: &Value) -> Result<String, GatewayError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Array(items) => {
            let bytes = items
                .iter()
                .map(|b| {
                    b.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| GatewayError::field(name, "byte array holds a non-byte"))
                })
                .collect::<Result<Vec<u8>, _>>()?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        other => Err(GatewayError::field(name, format!("expected string, got {}", other))),
    }
}

fn u64_value(name: &str, value: &Value) -> Result<u64, GatewayError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| GatewayError::field(name, format!("not a u64: {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| GatewayError::field(name, format!("not a u64: {}", s))),
        other => Err(GatewayError::field(name, format!("expected u64, got {}", other))),
    }
}

fn id_value(name: &str, value: &Value) -> Result<String, GatewayError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(obj) => obj
            .get("id")
            .map(|inner| id_value(name, inner))
            .unwrap_or_else(|| Err(GatewayError::field(name, "id wrapper without 'id'"))),
        other => Err(GatewayError::field(name, format!("expected id, got {}", other))),
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String, GatewayError> {
    string_value(name, field(fields, name)?)
}

fn u64_field(fields: &Map<String, Value>, name: &str) -> Result<u64, GatewayError> {
    u64_value(name, field(fields, name)?)
}

fn bool_field(fields: &Map<String, Value>, name: &str) -> Result<bool, GatewayError> {
    field(fields, name)?
        .as_bool()
        .ok_or_else(|| GatewayError::field(name, "expected bool"))
}

fn address_field(fields: &Map<String, Value>, name: &str) -> Result<Address, GatewayError> {
    id_value(name, field(fields, name)?).map(Address::new)
}

fn object_id_field(fields: &Map<String, Value>, name: &str) -> Result<ObjectId, GatewayError> {
    id_value(name, field(fields, name)?).map(ObjectId::new)
}

fn expect_type(raw: &RawObject, module_and_name: &str) -> Result<(), GatewayError> {
    if raw.is_type(module_and_name) {
        Ok(())
    } else {
        Err(GatewayError::UnexpectedType {
            expected: module_and_name.to_string(),
            found: raw.object_type.clone(),
        })
    }
}

// =============================================================================
// TYPED DECODERS
// =============================================================================

/// Decode a `ticket::Ticket`.
pub fn decode_ticket(raw: &RawObject) -> Result<Ticket, GatewayError> {
    expect_type(raw, "ticket::Ticket")?;
    let f = &raw.fields;
    Ok(Ticket {
        id: raw.object_id.clone(),
        event_name: string_field(f, "event_name")?,
        event_date: string_field(f, "event_date")?,
        artifact_ref: string_field(f, "ipfs_cid")?,
        original_issuer_verified: bool_field(f, "original_issuer_verified")?,
        owner: raw.owner.address().cloned(),
    })
}

/// Decode a `ticket::SellerProfile`.
pub fn decode_seller_profile(raw: &RawObject) -> Result<SellerProfile, GatewayError> {
    expect_type(raw, "ticket::SellerProfile")?;
    let f = &raw.fields;
    Ok(SellerProfile {
        id: raw.object_id.clone(),
        seller_address: address_field(f, "seller_address")?,
        verified_badge: bool_field(f, "verified_badge")?,
    })
}

/// Decode a `ticket::Listing`.
pub fn decode_listing(raw: &RawObject) -> Result<Listing, GatewayError> {
    expect_type(raw, "ticket::Listing")?;
    let f = &raw.fields;
    Ok(Listing {
        id: raw.object_id.clone(),
        ticket_id: object_id_field(f, "ticket_id")?,
        seller_address: address_field(f, "seller_address")?,
        price: u64_field(f, "price")?,
    })
}

/// Decode a `ticket_escrow::Escrow`.
///
/// The held amount lives in the payment balance (`payment.fields.balance`,
/// or `value` for a coin); older objects carry a plain `amount`.
pub fn decode_escrow(raw: &RawObject) -> Result<Escrow, GatewayError> {
    expect_type(raw, "ticket_escrow::Escrow")?;
    let f = &raw.fields;
    Ok(Escrow {
        id: raw.object_id.clone(),
        seller: address_field(f, "seller")?,
        buyer: address_field(f, "buyer")?,
        ticket_id: object_id_field(f, "ticket_id")?,
        status: escrow_status(field(f, "status")?)?,
        amount: escrow_amount(f)?,
    })
}

fn escrow_amount(fields: &Map<String, Value>) -> Result<u64, GatewayError> {
    if let Some(payment) = fields.get("payment") {
        let inner = payment.get("fields");
        if let Some(balance) = inner.and_then(|p| p.get("balance")) {
            return u64_value("payment.balance", balance);
        }
        if let Some(value) = inner.and_then(|p| p.get("value")) {
            return u64_value("payment.value", value);
        }
        if payment.is_number() || payment.is_string() {
            return u64_value("payment", payment);
        }
    }
    u64_field(fields, "amount")
}

fn escrow_status(value: &Value) -> Result<EscrowStatus, GatewayError> {
    let decoded = match value {
        Value::Number(n) => n.as_u64().and_then(EscrowStatus::from_code),
        Value::String(s) => s
            .parse::<u64>()
            .ok()
            .and_then(EscrowStatus::from_code)
            .or_else(|| EscrowStatus::from_name(s)),
        Value::Object(obj) => obj
            .get("variant")
            .and_then(Value::as_str)
            .and_then(EscrowStatus::from_name),
        _ => None,
    };
    decoded.ok_or_else(|| GatewayError::field("status", format!("unknown escrow status {}", value)))
}

// =============================================================================
// EXECUTION RESPONSES
// =============================================================================

/// Decode an execution response into a `TransactionResult`.
///
/// Non-success execution status becomes `ExecutionFailed` carrying the
/// ledger's error text. Created objects come from `objectChanges` when
/// present, else from `effects.created` (which carries no type).
pub fn decode_transaction_response(response: &Value) -> Result<TransactionResult, GatewayError> {
    let digest = response
        .get("digest")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::field("digest", "missing"))?
        .to_string();

    if let Some(status) = response.get("effects").and_then(|e| e.get("status")) {
        let outcome = status.get("status").and_then(Value::as_str).unwrap_or("");
        if outcome != "success" {
            let error = status
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("execution did not succeed");
            return Err(GatewayError::ExecutionFailed(error.to_string()));
        }
    }

    let created = match response.get("objectChanges").and_then(Value::as_array) {
        Some(changes) => changes
            .iter()
            .filter(|c| c.get("type").and_then(Value::as_str) == Some("created"))
            .map(created_from_change)
            .collect::<Result<Vec<_>, _>>()?,
        None => response
            .get("effects")
            .and_then(|e| e.get("created"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(created_from_effects)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default(),
    };

    Ok(TransactionResult { digest, created })
}

fn created_from_change(change: &Value) -> Result<CreatedObject, GatewayError> {
    let object_id = change
        .get("objectId")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::field("objectChanges.objectId", "missing"))?;
    Ok(CreatedObject {
        object_id: ObjectId::new(object_id),
        object_type: change
            .get("objectType")
            .and_then(Value::as_str)
            .map(str::to_string),
        owner: owner_address(change.get("owner")),
    })
}

fn created_from_effects(entry: &Value) -> Result<CreatedObject, GatewayError> {
    let object_id = entry
        .get("reference")
        .and_then(|r| r.get("objectId"))
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::field("effects.created.reference.objectId", "missing"))?;
    Ok(CreatedObject {
        object_id: ObjectId::new(object_id),
        object_type: entry
            .get("objectType")
            .and_then(Value::as_str)
            .map(str::to_string),
        owner: owner_address(entry.get("owner")),
    })
}

fn owner_address(owner: Option<&Value>) -> Option<Address> {
    owner
        .and_then(|o| o.get("AddressOwner"))
        .and_then(Value::as_str)
        .map(Address::new)
}
