//! Authentication and account DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::UserProfile;
use crate::services::{AccountChanges, NewAccount, SessionTicket};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    #[schema(example = "pizza diner")]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    #[schema(example = "d@jwt.com", format = "email")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "diner", format = "password")]
    pub password: String,
}

impl From<RegisterRequest> for NewAccount {
    fn from(request: RegisterRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email is invalid"))]
    #[schema(example = "d@jwt.com", format = "email")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "diner", format = "password")]
    pub password: String,
}

/// Every field is optional; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for AccountChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Issued on register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub token: String,
}

impl From<SessionTicket> for AuthResponse {
    fn from(ticket: SessionTicket) -> Self {
        Self {
            user: ticket.user,
            token: ticket.token,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "logout successful")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
