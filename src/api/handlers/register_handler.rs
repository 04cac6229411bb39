//! Registration handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::{JsonBody, MaybeAuthenticated};
use crate::api::AppState;
use crate::config::REGISTER_COMPONENT;
use crate::domain::{Field, Identity, RegistrationInput, Rule, UserResponse, ValidationErrorSet};
use crate::errors::{AppError, AppResult};
use crate::services::RegistrationOutcome;

/// One input of the registration form
#[derive(Debug, Serialize, ToSchema)]
pub struct FormField {
    /// Wire name of the input
    #[schema(example = "email")]
    pub name: String,
    /// Rules applied to the input, in evaluation order
    pub rules: Vec<Rule>,
}

/// Description of the registration form
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationForm {
    /// Component identifier
    #[schema(example = "auth.register")]
    pub component: String,
    pub fields: Vec<FormField>,
}

impl RegistrationForm {
    fn describe() -> Self {
        let mut fields: Vec<FormField> = Field::ALL
            .iter()
            .map(|field| FormField {
                name: field.as_str().to_string(),
                rules: field.rules().to_vec(),
            })
            .collect();
        fields.push(FormField {
            name: "passwordConfirmation".to_string(),
            rules: Vec::new(),
        });

        Self {
            component: REGISTER_COMPONENT.to_string(),
            fields,
        }
    }
}

/// Successful registration
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredResponse {
    pub user: UserResponse,
    pub identity: Identity,
    /// Where the client should go next
    #[schema(example = "/home")]
    pub redirect_to: String,
}

/// Live validation query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateParams {
    /// Restrict validation to one field (`name`, `email` or `password`)
    pub field: Option<String>,
}

/// Live validation result
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationReport {
    /// True when no rule was violated
    pub valid: bool,
    /// Violated rules keyed by field
    #[schema(value_type = Object, example = json!({"email": ["unique"]}))]
    pub errors: ValidationErrorSet,
}

/// Create registration routes
pub fn register_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(show_form).post(register))
        .route("/register/validate", post(validate))
}

/// Describe the registration form
#[utoipa::path(
    get,
    path = "/register",
    tag = "Registration",
    responses(
        (status = 200, description = "Registration form", body = RegistrationForm),
        (status = 303, description = "Already authenticated, redirected home")
    )
)]
pub async fn show_form(
    State(state): State<AppState>,
    MaybeAuthenticated(current): MaybeAuthenticated,
) -> Response {
    if current.is_some() {
        return Redirect::to(&state.home_path).into_response();
    }

    Json(RegistrationForm::describe()).into_response()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Registration",
    request_body = RegistrationInput,
    responses(
        (status = 201, description = "Account created", body = RegisteredResponse),
        (status = 303, description = "Already authenticated, redirected home"),
        (status = 400, description = "Malformed body"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    MaybeAuthenticated(current): MaybeAuthenticated,
    body: Result<JsonBody<RegistrationInput>, AppError>,
) -> AppResult<Response> {
    // Signed-in callers are sent home whatever they posted
    if current.is_some() {
        return Ok(Redirect::to(&state.home_path).into_response());
    }
    let JsonBody(input) = body?;

    match state.registrar.register(current, input).await? {
        RegistrationOutcome::AlreadyAuthenticated => {
            Ok(Redirect::to(&state.home_path).into_response())
        }
        RegistrationOutcome::Registered { user, identity } => {
            let body = RegisteredResponse {
                user: UserResponse::from(user),
                identity,
                redirect_to: state.home_path.clone(),
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
    }
}

/// Validate a (possibly partial) form without registering
#[utoipa::path(
    post,
    path = "/register/validate",
    tag = "Registration",
    params(ValidateParams),
    request_body = RegistrationInput,
    responses(
        (status = 200, description = "Validation result", body = ValidationReport),
        (status = 400, description = "Malformed body or unknown field")
    )
)]
pub async fn validate(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
    JsonBody(input): JsonBody<RegistrationInput>,
) -> AppResult<Json<ValidationReport>> {
    let errors = match params.field {
        Some(field) => {
            let field: Field = field.parse().map_err(AppError::bad_request)?;
            state.validator.validate_only(&input, field).await?
        }
        None => state.validator.errors(&input).await?,
    };

    Ok(Json(ValidationReport {
        valid: errors.is_empty(),
        errors,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_lists_every_input() {
        let form = RegistrationForm::describe();
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(form.component, "auth.register");
        assert_eq!(names, vec!["name", "email", "password", "passwordConfirmation"]);
        assert_eq!(form.fields[1].rules, vec![Rule::Required, Rule::Email, Rule::Unique]);
    }
}
