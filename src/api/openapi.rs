//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::register_handler;
use crate::domain::{Field, Identity, RegistrationInput, Rule, UserResponse};

/// OpenAPI documentation for the account registrar
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account Registrar",
        version = "0.1.0",
        description = "User registration: field validation, account creation and identity issuance",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        register_handler::show_form,
        register_handler::register,
        register_handler::validate,
    ),
    components(
        schemas(
            // Domain types
            Field,
            Rule,
            RegistrationInput,
            UserResponse,
            Identity,
            // Handler types
            register_handler::FormField,
            register_handler::RegistrationForm,
            register_handler::RegisteredResponse,
            register_handler::ValidationReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Registration", description = "Account registration and live validation")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer identities
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Identity token returned by POST /register; authenticated callers are redirected home",
                        ))
                        .build(),
                ),
            );
        }
    }
}
