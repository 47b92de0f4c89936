//! Signing in yields the address that owns minted tickets.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;
    use shared_types::MockTimeSource;
    use tl_03_ticket_lifecycle::TicketLifecycleApi;
    use tl_06_identity_session::{
        FileSessionStore, IdentitySessionManager, SaltedDigestDeriver, UserProfile, SESSION_TTL_MS,
    };

    use crate::fixtures::Marketplace;

    const NOW: u64 = 1_733_011_200_000;

    fn google_token(sub: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            json!({
                "iss": "https://accounts.google.com",
                "aud": "tadaalah-web",
                "sub": sub,
                "email": "fan@example.com",
                "name": "Gate Fan",
            })
            .to_string(),
        );
        format!("{}.{}.sig", header, payload)
    }

    #[tokio::test]
    async fn test_session_address_owns_minted_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(MockTimeSource::new(NOW));
        let sessions = IdentitySessionManager::new(
            FileSessionStore::new(dir.path().join("session.json")),
            SaltedDigestDeriver::new("app-salt"),
            clock.clone(),
        );

        let session = sessions
            .login(&google_token("1234567890"), UserProfile::default())
            .unwrap();
        assert_eq!(session.provider, "google");
        assert_eq!(session.profile.name.as_deref(), Some("Gate Fan"));
        assert_eq!(session.expires_at, NOW + SESSION_TTL_MS);

        let m = Marketplace::new();
        let wallet = Marketplace::funded(&m.ledger, session.address.clone());
        let ticket = m
            .lifecycle
            .mint("Concert", "2025-12-01", "cidABC", &wallet)
            .await
            .unwrap();
        assert_eq!(ticket.owner, Some(session.address.clone()));

        let purchases = m
            .lifecycle
            .fetch_user_purchases(&session.address)
            .await
            .unwrap();
        assert_eq!(purchases.len(), 1);
        assert!(purchases[0].escrow.is_none());

        // Same identity, same address, across restarts.
        let restored = sessions.restore().unwrap().unwrap();
        assert_eq!(restored.address, session.address);

        clock.advance(SESSION_TTL_MS);
        assert!(sessions.restore().unwrap().is_none());
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_distinct_subjects_get_distinct_addresses() {
        let clock = Arc::new(MockTimeSource::new(NOW));
        let sessions = IdentitySessionManager::new(
            tl_06_identity_session::InMemorySessionStore::new(),
            SaltedDigestDeriver::new("app-salt"),
            clock,
        );
        let a = sessions.login(&google_token("a"), UserProfile::default()).unwrap();
        let b = sessions.login(&google_token("b"), UserProfile::default()).unwrap();
        assert_ne!(a.address, b.address);
        assert_eq!(sessions.restore().unwrap().unwrap().address, b.address);
    }
}
