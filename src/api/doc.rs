use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const USER_TAG: &str = "User";
pub const ORDER_TAG: &str = "Order";
pub const FRANCHISE_TAG: &str = "Franchise";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pizza Service",
        description = "Ordering platform API: diners, franchises, stores, menu and orders",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::models::Role,
            crate::models::Verification,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Registration, login and sessions"),
        (name = USER_TAG, description = "Current user and account removal"),
        (name = ORDER_TAG, description = "Menu and orders"),
        (name = FRANCHISE_TAG, description = "Franchises and stores"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from register or login"))
                        .build(),
                ),
            )
        }
    }
}
