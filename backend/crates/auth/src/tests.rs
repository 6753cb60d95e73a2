//! Scenario tests for the auth crate (in-memory adapters)

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use crate::application::config::AuthConfig;
    use crate::application::session_registry::SessionRegistry;
    use crate::application::{Authenticator, CredentialStore, SignUpInput, SignUpUseCase};
    use crate::infra::memory::{MemorySessionStore, MemoryUserRepository};

    pub struct Harness {
        pub config: Arc<AuthConfig>,
        pub users: Arc<MemoryUserRepository>,
        pub sessions: Arc<MemorySessionStore>,
        pub registry: SessionRegistry<MemorySessionStore>,
    }

    impl Harness {
        pub fn new(config: AuthConfig) -> Self {
            let sessions = Arc::new(MemorySessionStore::new());
            let registry = SessionRegistry::new(sessions.clone(), &config);
            Self {
                config: Arc::new(config),
                users: Arc::new(MemoryUserRepository::new()),
                sessions,
                registry,
            }
        }

        pub fn development() -> Self {
            Self::new(AuthConfig::development())
        }

        pub fn authenticator(&self) -> Authenticator<MemoryUserRepository> {
            Authenticator::new(
                self.users.clone(),
                CredentialStore::new(self.config.pepper()),
            )
        }

        pub async fn sign_up(&self, name: &str, email: &str, password: &str) {
            SignUpUseCase::new(self.users.clone(), self.config.clone())
                .execute(SignUpInput {
                    user_name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .unwrap();
        }
    }
}

#[cfg(test)]
mod authentication_tests {
    use super::fixtures::Harness;
    use crate::application::config::AuthConfig;
    use crate::application::{
        Authenticator, CredentialStore, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    };
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_alice_sign_up_then_authenticate() {
        let h = Harness::development();
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let user = h
            .authenticator()
            .authenticate("alice@example.com", "secret123".to_string())
            .await
            .unwrap();
        assert_eq!(user.user_name.as_str(), "alice");

        let wrong = h
            .authenticator()
            .authenticate("alice@example.com", "wrong".to_string())
            .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_email_lookup_is_normalized() {
        let h = Harness::development();
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let user = h
            .authenticator()
            .authenticate("  ALICE@Example.com ", "secret123".to_string())
            .await;
        assert!(user.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let h = Harness::development();
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let wrong_password = h
            .authenticator()
            .authenticate("alice@example.com", "not-the-password".to_string())
            .await
            .unwrap_err();
        let unknown_email = h
            .authenticator()
            .authenticate("nobody@example.com", "secret123".to_string())
            .await
            .unwrap_err();
        let malformed_email = h
            .authenticator()
            .authenticate("not an email", "secret123".to_string())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert!(matches!(malformed_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status_code(), unknown_email.status_code());
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_password() {
        let h = Harness::development();
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let credentials = CredentialStore::new(h.config.pepper());
        let authenticator = Authenticator::new(h.users.clone(), credentials.clone());

        let result = authenticator
            .authenticate("nobody@example.com", "secret123".to_string())
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(credentials.verification_count(), 1);

        let result = authenticator
            .authenticate("not an email", "secret123".to_string())
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(credentials.verification_count(), 2);

        let result = authenticator
            .authenticate("alice@example.com", "wrong".to_string())
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(credentials.verification_count(), 3);
    }

    #[tokio::test]
    async fn test_inactive_account_only_revealed_with_correct_password() {
        let h = Harness::new(AuthConfig {
            activate_on_sign_up: false,
            ..AuthConfig::development()
        });
        h.sign_up("carol", "carol@example.com", "secret123").await;

        let wrong = h
            .authenticator()
            .authenticate("carol@example.com", "wrong".to_string())
            .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        let right = h
            .authenticator()
            .authenticate("carol@example.com", "secret123".to_string())
            .await;
        assert!(matches!(right, Err(AuthError::AccountNotActive)));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let h = Harness::development();
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let result = SignUpUseCase::new(h.users.clone(), h.config.clone())
            .execute(SignUpInput {
                user_name: "alice two".to_string(),
                email: "Alice@Example.com".to_string(),
                password: "another-secret".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_pepper_mismatch_fails_login() {
        let h = Harness::new(AuthConfig {
            password_pepper: Some(b"pepper-one".to_vec()),
            ..AuthConfig::development()
        });
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let other = crate::application::Authenticator::new(
            h.users.clone(),
            crate::application::CredentialStore::new(Some(b"pepper-two".as_slice())),
        );
        let result = other
            .authenticate("alice@example.com", "secret123".to_string())
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_renews_existing_session() {
        let h = Harness::development();
        h.sign_up("alice", "alice@example.com", "secret123").await;

        let anonymous = h
            .registry
            .create(kernel::id::UserId::new(), "guest")
            .await
            .unwrap();

        let output = SignInUseCase::new(h.users.clone(), h.registry.clone(), &h.config)
            .execute(
                SignInInput {
                    email: "alice@example.com".to_string(),
                    password: "secret123".to_string(),
                },
                Some(anonymous.as_str()),
            )
            .await
            .unwrap();

        assert_ne!(output.session_token, anonymous);
        assert!(h.registry.identity(&anonymous).await.unwrap().is_none());
        let identity = h
            .registry
            .identity(&output.session_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.user_id, output.user_id);
        assert_eq!(h.sessions.len(), 1);
    }
}

#[cfg(test)]
mod session_tests {
    use super::fixtures::Harness;
    use crate::error::AuthError;
    use kernel::id::UserId;
    use serde_json::Value;

    #[tokio::test]
    async fn test_create_get_destroy() {
        let h = Harness::development();
        let user_id = UserId::new();

        let token = h.registry.create(user_id, "alice").await.unwrap();
        assert_eq!(
            h.registry.get(&token, "userId").await.unwrap(),
            Some(Value::String(user_id.to_string()))
        );

        h.registry.destroy(&token).await.unwrap();
        assert_eq!(h.registry.get(&token, "userId").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_forged_and_truncated_tokens_are_absent() {
        let h = Harness::development();
        let token = h.registry.create(UserId::new(), "alice").await.unwrap();

        let (id, tag) = token.split_once('.').unwrap();
        let forged_id = format!("{}.{}", UserId::new(), tag);
        let truncated = &token[..token.len() - 2];

        for bad in [
            forged_id.as_str(),
            truncated,
            id,
            "",
            "....",
            "not-a-token",
        ] {
            assert_eq!(h.registry.get(bad, "userId").await.unwrap(), None, "{bad}");
        }

        // The genuine token still works and destroying garbage is a no-op
        h.registry.destroy(truncated).await.unwrap();
        assert!(h.registry.get(&token, "userId").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_renew_invalidates_old_token_and_carries_values() {
        let h = Harness::development();
        let user_id = UserId::new();
        let token = h.registry.create(user_id, "alice").await.unwrap();
        h.registry
            .put(&token, "flash", Value::from("account created!"))
            .await
            .unwrap();

        let renewed = h.registry.renew(&token).await.unwrap();

        assert_ne!(renewed, token);
        assert_eq!(h.registry.get(&token, "userId").await.unwrap(), None);
        assert_eq!(
            h.registry.get(&renewed, "userId").await.unwrap(),
            Some(Value::String(user_id.to_string()))
        );
        assert_eq!(
            h.registry.get(&renewed, "flash").await.unwrap(),
            Some(Value::from("account created!"))
        );

        assert!(matches!(
            h.registry.renew(&token).await,
            Err(AuthError::SessionInvalid)
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::fixtures::Harness;
    use crate::presentation::router::auth_router_generic;

    fn app(h: &Harness) -> Router {
        auth_router_generic(h.users.clone(), h.registry.clone(), (*h.config).clone())
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_status_sign_out() {
        let h = Harness::development();

        let response = app(&h)
            .oneshot(json_post(
                "/signup",
                r#"{"userName":"alice","email":"alice@example.com","password":"secret123"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app(&h)
            .oneshot(json_post(
                "/signin",
                r#"{"email":"alice@example.com","password":"secret123"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        let cookie = set_cookie.split(';').next().unwrap().to_string();

        let response = app(&h)
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["authenticated"], true);
        assert_eq!(json["userName"], "alice");

        let response = app(&h)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(h.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_with_bad_credentials_is_unauthorized() {
        let h = Harness::development();

        let response = app(&h)
            .oneshot(json_post(
                "/signin",
                r#"{"email":"ghost@example.com","password":"whatever1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_status_without_cookie() {
        let h = Harness::development();

        let response = app(&h)
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["authenticated"], false);
        assert!(json["userId"].is_null());
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::SessionInvalid, StatusCode::UNAUTHORIZED),
            (AuthError::AccountNotActive, StatusCode::FORBIDDEN),
            (AuthError::DuplicateEmail, StatusCode::CONFLICT),
            (
                AuthError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Hashing("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Verification("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Storage("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            assert_eq!(error.kind().status_code(), expected_status.as_u16());
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_server_errors_do_not_leak_details() {
        let app_error = AuthError::Verification("argon2 params: m_cost".into()).to_app_error();
        assert_eq!(app_error.kind(), ErrorKind::InternalServerError);
        assert!(!app_error.message().contains("argon2"));
    }

    #[test]
    fn test_password_hash_error_conversion() {
        use platform::password::PasswordHashError;

        assert!(matches!(
            AuthError::from(PasswordHashError::HashingFailed("x".into())),
            AuthError::Hashing(_)
        ));
        assert!(matches!(
            AuthError::from(PasswordHashError::InvalidHashFormat),
            AuthError::Verification(_)
        ));
    }
}
