//! # Identity Assertions
//!
//! A JWT issued by the social-login provider. Only the payload segment is
//! read; the provider and the proving service are responsible for the
//! signature.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use super::errors::SessionError;

/// `aud` may be a single string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    iss: String,
    aud: Audience,
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Claims used for address derivation and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Issuer URL.
    pub iss: String,
    /// OAuth client id the token was issued to.
    pub aud: String,
    /// Stable subject id at the issuer.
    pub sub: String,
    /// Email, if the scope allowed it.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
}

/// A parsed identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    token: String,
    claims: IdentityClaims,
}

impl IdentityAssertion {
    /// Decode the payload segment of `jwt`.
    pub fn parse(jwt: &str) -> Result<Self, SessionError> {
        let token = jwt.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next()) {
            (Some(_header), Some(payload)) if !payload.is_empty() => payload,
            _ => {
                return Err(SessionError::MalformedToken(
                    "expected header.payload.signature".to_string(),
                ))
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| SessionError::MalformedToken(format!("payload is not base64url: {}", e)))?;
        let raw: RawClaims = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::MalformedToken(format!("payload claims: {}", e)))?;

        let aud = match raw.aud {
            Audience::One(aud) => aud,
            Audience::Many(list) => list.into_iter().next().ok_or_else(|| {
                SessionError::MalformedToken("empty audience list".to_string())
            })?,
        };
        if raw.sub.is_empty() {
            return Err(SessionError::MalformedToken("empty subject".to_string()));
        }

        Ok(Self {
            token: token.to_string(),
            claims: IdentityClaims {
                iss: raw.iss,
                aud,
                sub: raw.sub,
                email: raw.email,
                name: raw.name,
                picture: raw.picture,
            },
        })
    }

    /// The original token text.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Decoded claims.
    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    /// Short provider name derived from the issuer.
    pub fn provider(&self) -> String {
        let host = self
            .claims
            .iss
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .split('/')
            .next()
            .unwrap_or_default();
        match host {
            "accounts.google.com" => "google".to_string(),
            "www.facebook.com" | "facebook.com" => "facebook".to_string(),
            "appleid.apple.com" => "apple".to_string(),
            other => other.to_string(),
        }
    }
}

/// Build an unsigned JWT for tests and fixtures.
#[cfg(test)]
pub(crate) fn unsigned_jwt(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_google_token() {
        let jwt = unsigned_jwt(&json!({
            "iss": "https://accounts.google.com",
            "aud": "client-1",
            "sub": "1100",
            "email": "ana@example.com",
            "name": "Ana",
        }));
        let assertion = IdentityAssertion::parse(&jwt).unwrap();
        assert_eq!(assertion.claims().sub, "1100");
        assert_eq!(assertion.claims().aud, "client-1");
        assert_eq!(assertion.claims().email.as_deref(), Some("ana@example.com"));
        assert!(assertion.claims().picture.is_none());
        assert_eq!(assertion.provider(), "google");
        assert_eq!(assertion.token(), jwt);
    }

    #[test]
    fn test_audience_list() {
        let jwt = unsigned_jwt(&json!({
            "iss": "https://issuer.example/oauth",
            "aud": ["first", "second"],
            "sub": "s",
        }));
        let assertion = IdentityAssertion::parse(&jwt).unwrap();
        assert_eq!(assertion.claims().aud, "first");
        assert_eq!(assertion.provider(), "issuer.example");
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(IdentityAssertion::parse("  "), Err(SessionError::EmptyToken));
        for bad in ["abc", "a.", "a.!!!.c", "a.e30.c"] {
            assert!(
                matches!(IdentityAssertion::parse(bad), Err(SessionError::MalformedToken(_))),
                "{}",
                bad
            );
        }
    }
}
