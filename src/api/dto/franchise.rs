use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::CreateFranchise;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdminRef {
    #[validate(email(message = "admin email is invalid"))]
    #[schema(example = "f@jwt.com", format = "email")]
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateFranchiseRequest {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    #[schema(example = "pizzaPocket")]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub admins: Vec<AdminRef>,
}

impl From<CreateFranchiseRequest> for CreateFranchise {
    fn from(request: CreateFranchiseRequest) -> Self {
        Self {
            name: request.name,
            admin_emails: request.admins.into_iter().map(|admin| admin.email).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStoreRequest {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    #[schema(example = "SLC")]
    pub name: String,
}
