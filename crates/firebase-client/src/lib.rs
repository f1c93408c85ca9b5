//! Firebase identity toolkit and realtime database client.
//!
//! Implements the registration backend traits over the REST APIs, so a
//! registration form can run against a real Firebase project.

mod auth;
mod backend;
mod database;
mod error;
mod types;

pub use auth::{FirebaseAuth, DEFAULT_AUTH_URL};
pub use backend::firebase_backend;
pub use database::{RealtimeDatabase, UserCollection};
pub use error::{auth_error, FirebaseError};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use registration_form::{
        Account, BackendError, FormField, IdentityProvider, Profile, RegistrationForm, UserRecord,
        UserStore,
    };
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_auth(mock_server: &MockServer) -> FirebaseAuth {
        FirebaseAuth::new("test-api-key", mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn create_test_users(mock_server: &MockServer) -> UserCollection {
        RealtimeDatabase::new(mock_server.uri(), Duration::from_secs(5))
            .unwrap()
            .collection("users")
    }

    fn sign_up_body(uid: &str, email: &str) -> serde_json::Value {
        serde_json::json!({
            "kind": "identitytoolkit#SignupNewUserResponse",
            "idToken": "id-token-1",
            "email": email,
            "refreshToken": "refresh-token-1",
            "expiresIn": "3600",
            "localId": uid
        })
    }

    fn auth_error_body(message: &str) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": 400,
                "message": message,
                "errors": [{"message": message, "domain": "global", "reason": "invalid"}]
            }
        })
    }

    #[tokio::test]
    async fn test_sign_up_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .and(query_param("key", "test-api-key"))
            .and(body_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "abcdef",
                "returnSecureToken": true
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(sign_up_body("uid-1", "ada@example.com")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = create_test_auth(&mock_server);
        let account = auth.create_account("ada@example.com", "abcdef").await.unwrap();

        assert_eq!(account.uid, "uid-1");
        assert_eq!(account.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_sign_up_email_exists() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(auth_error_body("EMAIL_EXISTS")))
            .mount(&mock_server)
            .await;

        let auth = create_test_auth(&mock_server);

        let result = auth.sign_up("ada@example.com", "abcdef").await;
        assert!(matches!(
            result,
            Err(FirebaseError::Auth { ref code, .. }) if code == "EMAIL_EXISTS"
        ));

        let result = auth.create_account("ada@example.com", "abcdef").await;
        assert_eq!(
            result.unwrap_err(),
            BackendError::Rejected("The email address is already in use by another account.".into())
        );
    }

    #[tokio::test]
    async fn test_unexpected_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&mock_server)
            .await;

        let auth = create_test_auth(&mock_server);
        let result = auth.sign_up("ada@example.com", "abcdef").await;

        assert!(matches!(
            result,
            Err(FirebaseError::Api { status: 503, ref message }) if message == "upstream unavailable"
        ));
    }

    #[tokio::test]
    async fn test_update_profile_sends_id_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts:update"))
            .and(query_param("key", "test-api-key"))
            .and(body_json(serde_json::json!({
                "idToken": "id-token-1",
                "displayName": "ada",
                "photoUrl": "http://gravatar.com/avatar/abc?d=identicon",
                "returnSecureToken": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-1",
                "email": "ada@example.com",
                "displayName": "ada",
                "photoUrl": "http://gravatar.com/avatar/abc?d=identicon"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = create_test_auth(&mock_server);
        let account = Account::new("uid-1", "ada@example.com", "id-token-1");
        let profile = Profile {
            display_name: "ada".into(),
            photo_url: "http://gravatar.com/avatar/abc?d=identicon".into(),
        };

        auth.update_profile(&account, &profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_account() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts:delete"))
            .and(body_json(serde_json::json!({ "idToken": "id-token-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "identitytoolkit#DeleteAccountResponse"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = create_test_auth(&mock_server);
        let account = Account::new("uid-1", "ada@example.com", "id-token-1");

        auth.delete_account(&account).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_user_writes_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/users/uid-1.json"))
            .and(query_param("auth", "id-token-1"))
            .and(body_json(serde_json::json!({
                "name": "ada",
                "avatar": "http://gravatar.com/avatar/abc?d=identicon"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "ada",
                "avatar": "http://gravatar.com/avatar/abc?d=identicon"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let users = create_test_users(&mock_server);
        let account = Account::new("uid-1", "ada@example.com", "id-token-1");
        let record = UserRecord {
            name: Some("ada".into()),
            avatar: Some("http://gravatar.com/avatar/abc?d=identicon".into()),
        };

        users.save_user(&account, &record).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_user_permission_denied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/users/uid-1.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "error": "Permission denied" })),
            )
            .mount(&mock_server)
            .await;

        let users = create_test_users(&mock_server);
        let account = Account::new("uid-1", "ada@example.com", "id-token-1");
        let record = UserRecord {
            name: None,
            avatar: None,
        };

        let result = users.save_user(&account, &record).await;
        assert_eq!(
            result.unwrap_err(),
            BackendError::Rejected("Permission denied".into())
        );
    }

    #[tokio::test]
    async fn test_get_missing_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/uid-2.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock_server)
            .await;

        let users = create_test_users(&mock_server);
        let record: Option<UserRecord> = users.get("uid-2", "id-token-1").await.unwrap();

        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_remove_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/users/uid-1.json"))
            .and(query_param("auth", "id-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let users = create_test_users(&mock_server);
        users.remove("uid-1", "id-token-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_record_permission_denied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/users/uid-1.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "error": "Permission denied" })),
            )
            .mount(&mock_server)
            .await;

        let users = create_test_users(&mock_server);
        let result = users.remove("uid-1", "id-token-1").await;

        assert!(matches!(
            result,
            Err(FirebaseError::Api { status: 401, ref message }) if message == "Permission denied"
        ));
    }

    #[test]
    fn test_collection_path_encodes_uid() {
        let db = RealtimeDatabase::new("https://devchat.firebaseio.com/", Duration::from_secs(5))
            .unwrap();
        let users = db.collection("users");

        assert_eq!(users.name(), "users");
        assert_eq!(users.path("abc/def"), "users/abc%2Fdef");
    }

    #[tokio::test]
    async fn test_registration_form_against_firebase() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(sign_up_body("uid-1", "ada@example.com")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts:update"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/users/uid-1.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "error": "Permission denied" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts:delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = firebase_backend(create_test_auth(&mock_server), create_test_users(&mock_server));
        let mut form = RegistrationForm::new(backend);
        form.handle_change(FormField::Username, "ada");
        form.handle_change(FormField::Email, "ada@example.com");
        form.handle_change(FormField::Password, "abcdef");
        form.handle_change(FormField::PasswordConfirm, "abcdef");

        assert!(form.handle_submit().await.is_err());
        assert_eq!(form.errors()[0].message, "Permission denied");
        assert!(!form.is_loading());
    }
}
