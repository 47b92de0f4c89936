//! Created-object extraction.

use crate::error::CodecError;
use shared_types::{ObjectId, TransactionResult};
use tracing::warn;

/// Id of the object a transaction created.
///
/// With a type filter, the first created object whose type contains the
/// filter wins. When nothing matches (or the ledger reported no types) the
/// first created object is returned and a warning logged.
pub fn extract_created_id(
    result: &TransactionResult,
    type_filter: Option<&str>,
) -> Result<ObjectId, CodecError> {
    let first = result.created.first().ok_or(CodecError::NoCreatedObjects)?;

    let Some(filter) = type_filter else {
        return Ok(first.object_id.clone());
    };

    let matched = result.created.iter().find(|created| {
        created
            .object_type
            .as_deref()
            .is_some_and(|t| t.contains(filter))
    });

    match matched {
        Some(created) => Ok(created.object_id.clone()),
        None => {
            warn!(
                "[tl-02] No created object of type '{}' in {}, using first created object {}",
                filter, result.digest, first.object_id
            );
            Ok(first.object_id.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CreatedObject;

    fn created(id: &str, object_type: Option<&str>) -> CreatedObject {
        CreatedObject {
            object_id: ObjectId::new(id),
            object_type: object_type.map(str::to_string),
            owner: None,
        }
    }

    fn result(created: Vec<CreatedObject>) -> TransactionResult {
        TransactionResult {
            digest: "D".to_string(),
            created,
        }
    }

    #[test]
    fn test_no_created_objects() {
        assert_eq!(
            extract_created_id(&result(vec![]), None),
            Err(CodecError::NoCreatedObjects)
        );
        assert_eq!(
            extract_created_id(&result(vec![]), Some("Listing")),
            Err(CodecError::NoCreatedObjects)
        );
    }

    #[test]
    fn test_filter_picks_matching_type() {
        let r = result(vec![
            created("0xcoin", Some("0x2::coin::Coin<0x2::sui::SUI>")),
            created("0xlisting", Some("0xpkg::ticket::Listing")),
        ]);
        assert_eq!(
            extract_created_id(&r, Some("::ticket::Listing")).unwrap(),
            ObjectId::new("0xlisting")
        );
        assert_eq!(extract_created_id(&r, None).unwrap(), ObjectId::new("0xcoin"));
    }

    #[test]
    fn test_filter_without_match_falls_back_to_first() {
        let r = result(vec![created("0xa", None), created("0xb", Some("0xpkg::x::Y"))]);
        assert_eq!(
            extract_created_id(&r, Some("Escrow")).unwrap(),
            ObjectId::new("0xa")
        );
    }
}
