//! SHA-256 address derivation.

use sha2::{Digest, Sha256};
use shared_types::Address;

use crate::domain::{IdentityClaims, SessionError};
use crate::ports::AddressDeriver;

/// Derives `0x` + hex(SHA-256(iss, aud, sub, salt)).
///
/// Stands in for the proving service's address derivation; the salt plays
/// the role of the user salt held by the salt service.
#[derive(Debug, Clone)]
pub struct SaltedDigestDeriver {
    salt: String,
}

impl SaltedDigestDeriver {
    /// Deriver with a fixed salt.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

impl AddressDeriver for SaltedDigestDeriver {
    fn derive(&self, claims: &IdentityClaims) -> Result<Address, SessionError> {
        if claims.sub.is_empty() || claims.iss.is_empty() {
            return Err(SessionError::Derivation(
                "issuer and subject are required".to_string(),
            ));
        }
        let mut hasher = Sha256::new();
        for part in [&claims.iss, &claims.aud, &claims.sub, &self.salt] {
            // Length prefix keeps ("ab","c") distinct from ("a","bc").
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }
        Ok(Address::new(format!("0x{}", hex::encode(hasher.finalize()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> IdentityClaims {
        IdentityClaims {
            iss: "https://accounts.google.com".to_string(),
            aud: "client".to_string(),
            sub: sub.to_string(),
            email: None,
            name: None,
            picture: None,
        }
    }

    #[test]
    fn test_stable_and_distinct() {
        let deriver = SaltedDigestDeriver::new("salt");
        let a = deriver.derive(&claims("1")).unwrap();
        assert_eq!(a, deriver.derive(&claims("1")).unwrap());
        assert_ne!(a, deriver.derive(&claims("2")).unwrap());
        assert_ne!(a, SaltedDigestDeriver::new("pepper").derive(&claims("1")).unwrap());
        assert!(a.as_str().starts_with("0x"));
        assert_eq!(a.as_str().len(), 66);
    }

    #[test]
    fn test_requires_subject() {
        let deriver = SaltedDigestDeriver::new("salt");
        assert!(matches!(
            deriver.derive(&claims("")),
            Err(SessionError::Derivation(_))
        ));
    }
}
