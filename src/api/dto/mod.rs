//! Data Transfer Objects for API requests and responses.
//!
//! Response bodies that are plain domain views (`UserProfile`,
//! `FranchisePage`, `OrderReceipt`, ...) are serialized from `crate::models`
//! directly; this module holds request bodies and HTTP-only shapes.

mod auth;
mod error;
mod franchise;
mod health;
mod order;
mod pagination;

pub use auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateUserRequest};
pub use error::ErrorResponse;
pub use franchise::{AdminRef, CreateFranchiseRequest, CreateStoreRequest};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use order::{AddMenuItemRequest, OrderLineRequest, PlaceOrderRequest};
pub use pagination::{FranchiseListParams, PageParams};
