use std::env;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{decode as decode_doc, DocumentStore};
use crate::keys::{self, UserId};
use crate::models::{Claims, User};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| "dev_jwt_secret_change_me".to_string())
}

/// Accounts on top of the document store: bcrypt password hashes in the
/// `users` collection, JWT bearer tokens for session state. Stands in for
/// the hosted identity provider the front-end originally talked to.
pub struct AuthService {
    store: Arc<dyn DocumentStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        AuthService { store }
    }

    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> ServiceResult<(User, String)> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(ServiceError::InvalidInput("invalid email address".to_string()));
        }
        if password.len() < 6 {
            return Err(ServiceError::InvalidInput(
                "password must be at least 6 characters".to_string(),
            ));
        }
        if full_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("name is required".to_string()));
        }

        if self.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::InvalidInput(
                "an account with this email already exists".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::Backend(format!("password hashing failed: {}", e)))?;
        let now = Utc::now().to_rfc3339();
        let user = User {
            uid: Uuid::new_v4().to_string(),
            email,
            full_name: full_name.trim().to_string(),
            password_hash,
            created_at: now.clone(),
            updated_at: now,
        };

        let path = keys::user_doc(&UserId::new(user.uid.clone()));
        self.store
            .set(&path, serde_json::to_value(&user).map_err(|e| ServiceError::Backend(e.to_string()))?)
            .await?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<(User, String)> {
        let email = email.trim().to_lowercase();
        // A missing account and a wrong password look the same to the caller.
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| ServiceError::Backend(format!("password verification failed: {}", e)))?;
        if !valid {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn user(&self, user_id: &UserId) -> ServiceResult<User> {
        let doc = self
            .store
            .get(&keys::user_doc(user_id))
            .await?
            .ok_or(ServiceError::NotFound("user"))?;
        Ok(decode_doc(doc)?)
    }

    /// Profile display-name update. The original front-end required a first
    /// and last name; kept here so certificates never carry a bare handle.
    pub async fn update_full_name(&self, user_id: &UserId, full_name: &str) -> ServiceResult<()> {
        let parts: Vec<&str> = full_name.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(ServiceError::InvalidInput(
                "please provide your full name (first and last name)".to_string(),
            ));
        }

        self.store
            .update(
                &keys::user_doc(user_id),
                json!({
                    "fullName": full_name.trim(),
                    "updatedAt": Utc::now().to_rfc3339(),
                }),
            )
            .await
            .map_err(|e| match e {
                crate::gateway::StoreError::NotFound(_) => ServiceError::NotFound("user"),
                other => other.into(),
            })
    }

    /// Records the reset request and logs the dispatch; actual mail delivery
    /// belongs to the hosted identity provider.
    pub async fn request_password_reset(&self, email: &str) -> ServiceResult<()> {
        let email = email.trim().to_lowercase();
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        let path = keys::password_resets().doc(&user.uid);
        self.store
            .set(
                &path,
                json!({
                    "userId": user.uid,
                    "email": email,
                    "requestedAt": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        info!("password reset email queued for {}", email);
        Ok(())
    }

    pub fn issue_token(&self, user: &User) -> ServiceResult<String> {
        let claims = Claims {
            user_id: user.uid.clone(),
            email: user.email.clone(),
            exp: (Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt_secret().as_ref()),
        )
        .map_err(|e| ServiceError::Backend(format!("token signing failed: {}", e)))
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let docs = self.store.list(&keys::users()).await?;
        for (_, doc) in docs {
            let user: User = decode_doc(doc)?;
            if user.email == email {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}

pub fn verify_token(token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_ref()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Actions gated behind the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ManageCourses,
    ManageCertificates,
    ManageInstructors,
    UploadContent,
}

/// Authorization capability injected into admin-only operations, decoupled
/// from any particular identity attribute.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, principal: &Claims, action: AdminAction) -> bool;
}

/// Email allow-list authorizer: every listed address may perform every admin
/// action. Configured through `ADMIN_EMAILS` (comma separated).
pub struct EmailListAuthorizer {
    emails: Vec<String>,
}

impl EmailListAuthorizer {
    pub fn new(emails: Vec<String>) -> Self {
        let emails: Vec<String> = emails
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if emails.is_empty() {
            warn!("no admin emails configured; every admin route will be denied");
        }
        EmailListAuthorizer { emails }
    }

    pub fn from_env() -> Self {
        let raw = env::var("ADMIN_EMAILS").unwrap_or_default();
        Self::new(raw.split(',').map(String::from).collect())
    }
}

impl Authorizer for EmailListAuthorizer {
    fn is_authorized(&self, principal: &Claims, _action: AdminAction) -> bool {
        self.emails.contains(&principal.email.trim().to_lowercase())
    }
}
