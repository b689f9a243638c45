use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::database::models::{Admin, AdminToken, ProfileUpdate};
use crate::database::Store;
use crate::error::ApiError;
use crate::validation::{self, FieldErrors};

/// Name recorded on every issued token
pub const TOKEN_NAME: &str = "auth_token";

/// Raw login fields as received; validation happens in `AuthService::login`
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A freshly issued bearer token. The plaintext only ever lives here.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub admin: Admin,
}

/// Credential checks plus the opaque bearer token lifecycle
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    token_length: usize,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, security: &SecurityConfig) -> Self {
        Self {
            store,
            token_length: security.token_length,
        }
    }

    /// Verify credentials and issue a token, revoking every earlier token of the admin
    pub async fn login(&self, input: LoginInput) -> Result<IssuedToken, ApiError> {
        let mut errors = FieldErrors::new();
        let username = validation::required(&mut errors, "username", input.username);
        let password = validation::required(&mut errors, "password", input.password);
        errors.into_result()?;
        let (Some(username), Some(password)) = (username, password) else {
            return Err(ApiError::invalid_credentials());
        };

        let Some(admin) = self.store.find_admin_by_username(&username).await? else {
            warn!("Login failed for unknown username '{}'", username);
            return Err(ApiError::invalid_credentials());
        };

        if !verify_password(password, admin.password_hash.clone()).await? {
            warn!("Login failed for '{}': wrong password", username);
            return Err(ApiError::invalid_credentials());
        }

        let token = self.issue(&admin).await?;
        info!("Admin '{}' logged in", admin.username);
        Ok(IssuedToken { token, admin })
    }

    /// Generate a new token for `admin`, replacing any it already holds
    pub async fn issue(&self, admin: &Admin) -> Result<String, ApiError> {
        let token = generate_token(self.token_length);
        let record = AdminToken::new(admin.id, TOKEN_NAME, hash_token(&token));
        self.store.replace_tokens(record).await?;
        Ok(token)
    }

    /// Resolve a presented bearer token to its admin
    pub async fn validate(&self, token: &str) -> Result<Admin, ApiError> {
        self.store
            .find_admin_by_token(&hash_token(token))
            .await?
            .ok_or_else(ApiError::unauthenticated)
    }

    /// Delete the token with this digest. Revoking an unknown token is not an error.
    pub async fn revoke(&self, token_hash: &str) -> Result<(), ApiError> {
        if self.store.delete_token(token_hash).await? {
            info!("Revoked bearer token");
        }
        Ok(())
    }

    /// Replace name, phone and email of `admin`
    pub async fn update_profile(&self, admin: &Admin, input: ProfileInput) -> Result<Admin, ApiError> {
        let mut errors = FieldErrors::new();

        let name = validation::required(&mut errors, "name", input.name);
        if let Some(name) = &name {
            validation::max_chars(&mut errors, "name", name, 255);
        }

        let phone = validation::required(&mut errors, "phone", input.phone);
        if let Some(phone) = &phone {
            validation::max_chars(&mut errors, "phone", phone, 20);
        }

        let email = validation::required(&mut errors, "email", input.email);
        if let Some(email) = &email {
            if validation::email(&mut errors, "email", email)
                && validation::max_chars(&mut errors, "email", email, 255)
                && self.store.email_taken(email, admin.id).await?
            {
                errors.add("email", "The email has already been taken.");
            }
        }

        errors.into_result()?;
        let (Some(name), Some(phone), Some(email)) = (name, phone, email) else {
            return Err(ApiError::internal("profile validation passed with missing fields"));
        };

        let updated = self
            .store
            .update_admin_profile(admin.id, ProfileUpdate { name, phone, email })
            .await?;
        info!("Admin '{}' updated profile", updated.username);
        Ok(updated)
    }
}

/// Random alphanumeric token from the thread-local CSPRNG
pub fn generate_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Lowercase hex SHA-256 of the token, the only form that is persisted
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    // bcrypt is CPU bound; keep it off the async workers
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("password check task failed: {}", e)))?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewAdmin;
    use crate::database::MemoryStore;
    use axum::http::StatusCode;

    async fn service_with_admin() -> (AuthService, Admin) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let admin = store
            .insert_admin(NewAdmin {
                name: "Administrator".into(),
                username: "admin".into(),
                email: "admin@aksamedia.com".into(),
                phone: "081234567890".into(),
                password_hash: bcrypt::hash("pastibisa", 4).unwrap(),
            })
            .await
            .unwrap();
        let security = crate::config::AppConfig::development().security;
        (AuthService::new(store, &security), admin)
    }

    fn credentials(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn tokens_are_alphanumeric_and_hash_to_hex() {
        let token = generate_token(40);
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        let digest = hash_token(&token);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token(&token));
        assert_ne!(digest, hash_token("something else"));
    }

    #[tokio::test]
    async fn second_login_invalidates_first_token() {
        let (auth, admin) = service_with_admin().await;

        let first = auth.login(credentials("admin", "pastibisa")).await.unwrap();
        let second = auth.login(credentials("admin", "pastibisa")).await.unwrap();

        assert!(auth.validate(&first.token).await.is_err());
        assert_eq!(auth.validate(&second.token).await.unwrap().id, admin.id);
    }

    #[tokio::test]
    async fn wrong_password_issues_no_token() {
        let (auth, _) = service_with_admin().await;
        let good = auth.login(credentials("admin", "pastibisa")).await.unwrap();

        let err = auth.login(credentials("admin", "wrong")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials(_)));
        let err = auth.login(credentials("nobody", "pastibisa")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials(_)));

        // the earlier session is untouched
        assert!(auth.validate(&good.token).await.is_ok());
    }

    #[tokio::test]
    async fn missing_credentials_fail_validation() {
        let (auth, _) = service_with_admin().await;
        let err = auth.login(LoginInput::default()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let ApiError::Validation { errors, .. } = err else { panic!("expected validation error") };
        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let (auth, _) = service_with_admin().await;
        let issued = auth.login(credentials("admin", "pastibisa")).await.unwrap();
        let digest = hash_token(&issued.token);

        auth.revoke(&digest).await.unwrap();
        auth.revoke(&digest).await.unwrap();
        assert!(auth.validate(&issued.token).await.is_err());
    }

    #[tokio::test]
    async fn profile_update_validates_fields() {
        let (auth, admin) = service_with_admin().await;
        let input = ProfileInput {
            name: Some("".into()),
            phone: Some("1".repeat(21)),
            email: Some("not-an-email".into()),
        };
        let ApiError::Validation { errors, .. } = auth.update_profile(&admin, input).await.unwrap_err() else {
            panic!("expected validation error")
        };
        assert!(errors.has("name"));
        assert!(errors.has("phone"));
        assert!(errors.has("email"));

        let input = ProfileInput {
            name: Some("Admin Baru".into()),
            phone: Some("089999".into()),
            // own email does not count as taken
            email: Some("admin@aksamedia.com".into()),
        };
        let updated = auth.update_profile(&admin, input).await.unwrap();
        assert_eq!(updated.name, "Admin Baru");
        assert_eq!(updated.username, "admin");
    }
}
