use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role held by a user, optionally scoped to a franchise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::UserRoleKind")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Diner,
    Franchisee,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Diner => write!(f, "diner"),
            Role::Franchisee => write!(f, "franchisee"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// User row as stored.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Insert form; `password` must already be hashed.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial update. `updated_at` is always written so the changeset is never empty.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRole {
    pub id: i32,
    pub user_id: i32,
    pub role: Role,
    pub object_id: i32,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::user_roles)]
pub struct NewUserRole {
    pub user_id: i32,
    pub role: Role,
    pub object_id: i32,
}

/// A role assignment. `object_id` of `None` means platform-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i32>,
}

impl RoleAssignment {
    pub fn platform(role: Role) -> Self {
        Self { role, object_id: None }
    }

    pub fn scoped(role: Role, object_id: i32) -> Self {
        Self {
            role,
            object_id: Some(object_id),
        }
    }

    pub(crate) fn into_row(self, user_id: i32) -> NewUserRole {
        NewUserRole {
            user_id,
            role: self.role,
            object_id: self.object_id.unwrap_or(0),
        }
    }
}

impl From<&UserRole> for RoleAssignment {
    fn from(row: &UserRole) -> Self {
        Self {
            role: row.role,
            object_id: (row.object_id != 0).then_some(row.object_id),
        }
    }
}

/// User as exposed to callers: never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub roles: Vec<RoleAssignment>,
}

impl UserProfile {
    pub fn new(user: &User, roles: Vec<RoleAssignment>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            roles,
        }
    }
}
