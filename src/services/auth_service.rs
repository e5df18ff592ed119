//! Credentials and sessions.
//!
//! Passwords are stored as Argon2 hashes. A session is a signed token whose
//! SHA-256 digest is stored at login and deleted at logout; a token is only
//! accepted while its digest is present.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::metrics::MetricsRecorder;
use crate::models::{NewUser, Role, RoleAssignment, UpdateUser, UserProfile};
use crate::policy::{Principal, UserGrant};
use crate::repositories::{SessionRepository, UserRepository};
use crate::utils::password::{hash_password_async, verify_password_async};
use crate::utils::session_token::{SessionClaims, decode_token, issue_token, token_signature};

/// Message for every credential or token failure, so callers cannot tell which part was wrong.
const UNKNOWN_USER: &str = "unknown user";

/// Plain-text account details; the password is hashed before storage.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Fields a user may change on their own account.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A freshly opened session.
#[derive(Debug, Clone)]
pub struct SessionTicket {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: SessionRepository,
    metrics: Arc<dyn MetricsRecorder>,
    secret: Arc<str>,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        sessions: SessionRepository,
        metrics: Arc<dyn MetricsRecorder>,
        secret: &str,
    ) -> Self {
        Self {
            users,
            sessions,
            metrics,
            secret: Arc::from(secret),
        }
    }

    /// Hashes the password and stores the user with `roles`.
    ///
    /// # Errors
    /// `AppError::Duplicate` when the email is already registered.
    pub async fn add_user(&self, account: NewAccount, roles: &[RoleAssignment]) -> AppResult<UserProfile> {
        let password = hash_password_async(account.password).await?;
        let profile = self
            .users
            .create(
                NewUser {
                    name: account.name,
                    email: account.email,
                    password,
                },
                roles,
            )
            .await?;
        tracing::info!(user_id = profile.id, "User registered");
        Ok(profile)
    }

    /// Creates a diner account and logs it in.
    pub async fn register(&self, account: NewAccount) -> AppResult<SessionTicket> {
        let user = self
            .add_user(account, &[RoleAssignment::platform(Role::Diner)])
            .await?;
        self.open_session(user).await
    }

    /// Verifies credentials and opens a new session. Earlier sessions stay valid.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionTicket> {
        let user = match self.check_credentials(email, password).await {
            Ok(user) => user,
            Err(e) => {
                self.metrics.auth_attempt(false);
                return Err(e);
            }
        };
        self.open_session(user).await
    }

    /// Revokes a token. Returns whether the session existed; revoking twice is not an error.
    pub async fn logout(&self, token: &str) -> AppResult<bool> {
        let revoked = self.sessions.delete(&token_signature(token)).await?;
        if revoked {
            self.metrics.session_closed();
        }
        Ok(revoked)
    }

    pub async fn is_logged_in(&self, token: &str) -> AppResult<bool> {
        self.sessions.exists(&token_signature(token)).await
    }

    /// Resolves a bearer token to the caller, reloading roles from storage.
    ///
    /// # Errors
    /// `AppError::Unauthorized` for a revoked, forged or orphaned token;
    /// storage failures propagate unchanged.
    pub async fn authenticate(&self, token: &str) -> AppResult<Principal> {
        let claims = decode_token(token, &self.secret)?;
        if !self.is_logged_in(token).await? {
            return Err(AppError::unauthorized("unauthorized"));
        }
        let profile = self
            .users
            .profile(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("unauthorized"))?;
        Ok(Principal::new(profile))
    }

    /// Updates the granted account. Only provided fields change.
    pub async fn update_user(&self, grant: &UserGrant, changes: AccountChanges) -> AppResult<UserProfile> {
        let password = match changes.password {
            Some(password) => Some(hash_password_async(password).await?),
            None => None,
        };
        let user = self
            .users
            .update(
                grant,
                UpdateUser {
                    name: changes.name,
                    email: changes.email,
                    password,
                    updated_at: jiff::Timestamp::now()
                        .to_zoned(jiff::tz::TimeZone::UTC)
                        .datetime()
                        .into(),
                },
            )
            .await?;
        let roles = self.users.roles_for(user.id).await?;
        tracing::info!(user_id = user.id, "User updated");
        Ok(UserProfile::new(&user, roles))
    }

    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(UNKNOWN_USER))?;
        if !verify_password_async(password.to_string(), user.password.clone()).await? {
            return Err(AppError::unauthorized(UNKNOWN_USER));
        }
        let roles = self.users.roles_for(user.id).await?;
        Ok(UserProfile::new(&user, roles))
    }

    async fn open_session(&self, user: UserProfile) -> AppResult<SessionTicket> {
        let token = issue_token(&SessionClaims::for_user(&user), &self.secret)?;
        self.sessions.insert(&token_signature(&token), user.id).await?;
        self.metrics.auth_attempt(true);
        self.metrics.session_opened();
        tracing::debug!(user_id = user.id, "Session opened");
        Ok(SessionTicket { user, token })
    }
}
