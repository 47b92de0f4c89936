//! # Raw Objects
//!
//! Ledger objects as returned by the node, before typed decoding. Only the
//! envelope (id, version, type, owner) is interpreted here; struct fields
//! stay as JSON until a decoder in `decode.rs` claims them.

use super::errors::GatewayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::{Address, ObjectId};

/// Who holds an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectOwner {
    /// Owned by an account.
    Address(Address),
    /// Shared object, usable by anyone.
    Shared,
    /// Frozen object.
    Immutable,
    /// Child of another object.
    Object(ObjectId),
}

impl ObjectOwner {
    /// Owning address, if address-owned.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::Address(addr) => Some(addr),
            _ => None,
        }
    }

    /// Decode the node's owner encoding:
    /// `{"AddressOwner": "0x.."}`, `{"Shared": {..}}`, `"Immutable"`,
    /// `{"ObjectOwner": "0x.."}`.
    pub fn from_rpc(value: &Value) -> Result<Self, GatewayError> {
        if let Some(s) = value.as_str() {
            return match s {
                "Immutable" => Ok(Self::Immutable),
                "Shared" => Ok(Self::Shared),
                other => Err(GatewayError::field("owner", format!("unknown owner '{}'", other))),
            };
        }
        let obj = value
            .as_object()
            .ok_or_else(|| GatewayError::field("owner", "expected object or string"))?;
        if let Some(addr) = obj.get("AddressOwner").and_then(Value::as_str) {
            return Ok(Self::Address(Address::new(addr)));
        }
        if let Some(parent) = obj.get("ObjectOwner").and_then(Value::as_str) {
            return Ok(Self::Object(ObjectId::new(parent)));
        }
        if obj.contains_key("Shared") {
            return Ok(Self::Shared);
        }
        Err(GatewayError::field("owner", "unrecognized owner encoding"))
    }

    /// Encode in the node's owner format.
    pub fn to_rpc(&self) -> Value {
        match self {
            Self::Address(addr) => serde_json::json!({ "AddressOwner": addr.as_str() }),
            Self::Shared => serde_json::json!({ "Shared": { "initial_shared_version": 1 } }),
            Self::Immutable => Value::String("Immutable".to_string()),
            Self::Object(parent) => serde_json::json!({ "ObjectOwner": parent.as_str() }),
        }
    }
}

/// An undecoded ledger object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    /// Object id.
    pub object_id: ObjectId,
    /// Object version (bumped on every mutation).
    pub version: u64,
    /// Fully qualified struct type.
    pub object_type: String,
    /// Current owner.
    pub owner: ObjectOwner,
    /// Struct fields as JSON.
    pub fields: Map<String, Value>,
}

impl RawObject {
    /// Struct type without generic parameters.
    fn base_type(&self) -> &str {
        self.object_type
            .split('<')
            .next()
            .unwrap_or(&self.object_type)
    }

    /// True when the struct type ends with `::{module}::{name}` (generics ignored).
    pub fn is_type(&self, module_and_name: &str) -> bool {
        self.base_type()
            .ends_with(&format!("::{}", module_and_name))
    }

    /// True when the struct type is exactly `full_type`, package included
    /// (generics ignored).
    pub fn has_type(&self, full_type: &str) -> bool {
        self.base_type() == full_type
    }

    /// `UnexpectedType` unless the object is exactly `full_type`.
    pub fn require_type(&self, full_type: &str) -> Result<(), GatewayError> {
        if self.has_type(full_type) {
            Ok(())
        } else {
            Err(GatewayError::UnexpectedType {
                expected: full_type.to_string(),
                found: self.object_type.clone(),
            })
        }
    }

    /// Decode the `data` member of a `sui_getObject` response (or a page
    /// entry). Returns `Ok(None)` when the node reports the object missing
    /// or deleted.
    pub fn from_rpc_response(response: &Value) -> Result<Option<Self>, GatewayError> {
        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
            return match code {
                "notExists" | "deleted" => Ok(None),
                other => Err(GatewayError::Decode(format!(
                    "object read error '{}': {}",
                    other, error
                ))),
            };
        }
        match response.get("data") {
            Some(data) if !data.is_null() => Self::from_rpc_data(data).map(Some),
            _ => Ok(None),
        }
    }

    /// Decode an object `data` block.
    pub fn from_rpc_data(data: &Value) -> Result<Self, GatewayError> {
        let object_id = data
            .get("objectId")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::field("objectId", "missing"))?;

        let version = match data.get("version") {
            Some(Value::String(s)) => s
                .parse()
                .map_err(|_| GatewayError::field("version", format!("not a number: {}", s)))?,
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| GatewayError::field("version", "not a u64"))?,
            _ => 0,
        };

        let content = data.get("content");
        let object_type = data
            .get("type")
            .and_then(Value::as_str)
            .or_else(|| content.and_then(|c| c.get("type")).and_then(Value::as_str))
            .ok_or_else(|| GatewayError::field("type", "missing (request showType/showContent)"))?;

        let owner = match data.get("owner") {
            Some(owner) => ObjectOwner::from_rpc(owner)?,
            None => return Err(GatewayError::field("owner", "missing (request showOwner)")),
        };

        let fields = content
            .and_then(|c| c.get("fields"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| GatewayError::field("content.fields", "missing (request showContent)"))?;

        Ok(Self {
            object_id: ObjectId::new(object_id),
            version,
            object_type: object_type.to_string(),
            owner,
            fields,
        })
    }

    /// Encode as a node `data` block.
    pub fn to_rpc_data(&self) -> Value {
        serde_json::json!({
            "objectId": self.object_id.as_str(),
            "version": self.version.to_string(),
            "type": self.object_type,
            "owner": self.owner.to_rpc(),
            "content": {
                "dataType": "moveObject",
                "type": self.object_type,
                "fields": Value::Object(self.fields.clone()),
            }
        })
    }
}
