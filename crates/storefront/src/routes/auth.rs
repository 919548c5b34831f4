//! Authentication route handlers.
//!
//! Login and registration delegate credential checks to the backend; the
//! handlers here only validate form shape before the round trip, then write
//! the returned identity into the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use ekart_core::{Email, UserType};

use crate::backend::{LoginRequest, RegisterRequest, TokenResponse};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::models::{CurrentUser, session::store_current_user};
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
}

/// Pre-flight validation of the registration form.
///
/// Failures here never reach the backend; the form re-renders with the
/// message and the entered values (minus passwords).
fn validate_registration(form: &RegisterForm) -> Option<String> {
    if Email::parse(&form.email).is_err() {
        return Some("Please enter a valid email address".to_string());
    }
    if form.password.len() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if form.password != form.confirm_password {
        return Some("Passwords do not match".to_string());
    }
    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        return Some("Please enter your first and last name".to_string());
    }
    None
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub seller_selected: bool,
}

impl RegisterTemplate {
    fn blank() -> Self {
        Self {
            error: None,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            seller_selected: false,
        }
    }

    fn with_error(form: &RegisterForm, error: String) -> Self {
        Self {
            error: Some(error),
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            seller_selected: form.user_type == UserType::Seller,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login form.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        error: None,
        email: String::new(),
    }
}

/// Submit the login form.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let request = LoginRequest {
        email: form.email.clone(),
        password: form.password,
    };

    match state.backend().login(&request).await {
        Ok(token) => establish_session(&session, token).await,
        Err(e) => {
            tracing::info!(email = %form.email, "Login rejected");
            Ok(LoginTemplate {
                error: Some(e.user_message()),
                email: form.email,
            }
            .into_response())
        }
    }
}

/// Display the registration form.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate::blank()
}

/// Submit the registration form.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if let Some(message) = validate_registration(&form) {
        return Ok(RegisterTemplate::with_error(&form, message).into_response());
    }

    let request = RegisterRequest {
        email: form.email.clone(),
        password: form.password.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        phone: form.phone.clone().filter(|p| !p.trim().is_empty()),
        user_type: form.user_type,
    };

    match state.backend().register(&request).await {
        Ok(token) => establish_session(&session, token).await,
        Err(e) => {
            tracing::info!(email = %form.email, "Registration rejected");
            Ok(RegisterTemplate::with_error(&form, e.user_message()).into_response())
        }
    }
}

/// Log out and destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    crate::models::session::clear_current_user(&session)
        .await
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
    clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}

/// Persist a successful token response and route by account type.
async fn establish_session(session: &Session, token: TokenResponse) -> Result<Response> {
    let user = CurrentUser {
        token: token.access_token,
        user_id: token.user_id,
        email: token.email,
        user_type: token.user_type,
    };

    store_current_user(session, &user)
        .await
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
    set_sentry_user(&user.user_id, Some(&user.email));

    let destination = if user.is_seller() {
        "/seller/dashboard"
    } else {
        "/products"
    };
    Ok(Redirect::to(destination).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            email: "jo@example.com".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            user_type: UserType::Customer,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_registration(&form()).is_none());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut f = form();
        f.password = "short".to_string();
        f.confirm_password = "short".to_string();
        assert_eq!(
            validate_registration(&f).unwrap(),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_mismatched_passwords_rejected() {
        let mut f = form();
        f.confirm_password = "different1".to_string();
        assert_eq!(validate_registration(&f).unwrap(), "Passwords do not match");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut f = form();
        f.email = "not-an-email".to_string();
        assert_eq!(
            validate_registration(&f).unwrap(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut f = form();
        f.first_name = "  ".to_string();
        assert!(validate_registration(&f).unwrap().contains("name"));
    }
}
