//! Authorization policy.
//!
//! [`decide`] is a pure function over a [`Principal`] and a [`Capability`].
//! Mutating repository operations take a grant ([`AdminGrant`],
//! [`FranchiseGrant`], [`UserGrant`]) as their first argument. Grants can only
//! be minted by a successful check on a `Principal`, and a `Principal` can only
//! be built by the session layer after authentication.

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{Role, RoleAssignment, UserProfile};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    id: i32,
    name: String,
    email: String,
    roles: Vec<RoleAssignment>,
}

/// What an operation requires of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AdminAnywhere,
    AdminOfFranchise(i32),
    IsSelf(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Platform Admin satisfies every capability.
pub fn decide(principal: &Principal, capability: &Capability) -> Decision {
    if principal.is_admin() {
        return Decision::Allow;
    }
    let allowed = match *capability {
        Capability::AdminAnywhere => false,
        Capability::AdminOfFranchise(franchise_id) => principal.roles.iter().any(|assignment| {
            assignment.role == Role::Franchisee && assignment.object_id == Some(franchise_id)
        }),
        Capability::IsSelf(user_id) => principal.id == user_id,
    };
    if allowed { Decision::Allow } else { Decision::Deny }
}

/// Proof that the caller is a platform Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGrant {
    actor_id: i32,
}

impl AdminGrant {
    pub fn actor_id(&self) -> i32 {
        self.actor_id
    }
}

/// Proof that the caller may manage one franchise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FranchiseGrant {
    franchise_id: i32,
}

impl FranchiseGrant {
    pub fn franchise_id(&self) -> i32 {
        self.franchise_id
    }
}

/// Proof that the caller may act on one user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserGrant {
    user_id: i32,
}

impl UserGrant {
    pub fn user_id(&self) -> i32 {
        self.user_id
    }
}

impl Principal {
    pub(crate) fn new(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            roles: profile.roles,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &[RoleAssignment] {
        &self.roles
    }

    pub fn is_admin(&self) -> bool {
        self.roles
            .iter()
            .any(|assignment| assignment.role == Role::Admin && assignment.object_id.is_none())
    }

    pub fn can(&self, capability: Capability) -> bool {
        decide(self, &capability) == Decision::Allow
    }

    pub fn authorize_admin(&self) -> AppResult<AdminGrant> {
        self.check(Capability::AdminAnywhere)?;
        Ok(AdminGrant { actor_id: self.id })
    }

    pub fn authorize_franchise(&self, franchise_id: i32) -> AppResult<FranchiseGrant> {
        self.check(Capability::AdminOfFranchise(franchise_id))?;
        Ok(FranchiseGrant { franchise_id })
    }

    pub fn authorize_user(&self, user_id: i32) -> AppResult<UserGrant> {
        self.check(Capability::IsSelf(user_id))?;
        Ok(UserGrant { user_id })
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }

    fn check(&self, capability: Capability) -> AppResult<()> {
        match decide(self, &capability) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                tracing::debug!(user_id = self.id, ?capability, "Authorization denied");
                Err(AppError::forbidden("unauthorized"))
            }
        }
    }
}
