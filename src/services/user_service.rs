//! User lookup, deletion and the bootstrap admin.

use std::sync::Arc;

use crate::config::BootstrapConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::MetricsRecorder;
use crate::models::{Role, RoleAssignment, UserProfile};
use crate::policy::Principal;
use crate::repositories::UserRepository;
use crate::services::auth_service::{AuthService, NewAccount};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    auth: AuthService,
    metrics: Arc<dyn MetricsRecorder>,
}

impl UserService {
    pub fn new(repo: UserRepository, auth: AuthService, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { repo, auth, metrics }
    }

    /// Gets a user with roles, or `NotFound`.
    pub async fn get_user(&self, id: i32) -> AppResult<UserProfile> {
        self.repo
            .profile(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    /// Deletes a user account. Only the user themselves or a platform Admin may do this.
    pub async fn delete_user(&self, principal: &Principal, id: i32) -> AppResult<()> {
        let grant = principal.authorize_user(id)?;
        let revoked = self.repo.delete(&grant).await?;
        for _ in 0..revoked {
            self.metrics.session_closed();
        }
        tracing::info!(user_id = id, actor_id = principal.id(), revoked, "User deleted");
        Ok(())
    }

    /// Does the user hold `role`? `scope` of `None` asks about the platform-wide assignment.
    pub async fn holds_role(&self, user_id: i32, role: Role, scope: Option<i32>) -> AppResult<bool> {
        self.repo.holds_role(user_id, role, scope).await
    }

    /// Creates the configured platform Admin when no account uses its email yet.
    ///
    /// Returns the new profile, or `None` when nothing had to be created.
    pub async fn ensure_bootstrap_admin(&self, config: &BootstrapConfig) -> AppResult<Option<UserProfile>> {
        if !config.enabled {
            return Ok(None);
        }
        if self.repo.find_by_email(&config.admin_email).await?.is_some() {
            tracing::debug!(email = %config.admin_email, "Bootstrap admin already present");
            return Ok(None);
        }

        let account = NewAccount {
            name: config.admin_name.clone(),
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
        };
        match self
            .auth
            .add_user(account, &[RoleAssignment::platform(Role::Admin)])
            .await
        {
            Ok(profile) => {
                tracing::info!(user_id = profile.id, "Bootstrap admin created");
                Ok(Some(profile))
            }
            // Another instance created it first.
            Err(AppError::Duplicate { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
