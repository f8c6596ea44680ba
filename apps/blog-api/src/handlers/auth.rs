//! Account handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value;
use std::sync::Arc;

use blog_core::domain::NewUser;
use blog_core::error::{RepoError, ValidationErrors};
use blog_core::ports::{AuthError, PasswordService, TokenService};
use blog_core::validation::{expect_object, text_field};
use blog_shared::ApiResponse;
use blog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::{parse_json, render};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_USERNAME_LENGTH: usize = 150;
const MIN_PASSWORD_LENGTH: usize = 8;

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

fn signup_request(body: &Value) -> Result<RegisterUserRequest, ValidationErrors> {
    let object = expect_object(body)?;
    let mut errors = ValidationErrors::new();

    let username = text_field(object, "username", &mut errors);
    let email = text_field(object, "email", &mut errors);
    let password = text_field(object, "password", &mut errors);

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) => errors.into_result(RegisterUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(errors),
    }
}

fn login_request(body: &Value) -> Result<LoginRequest, ValidationErrors> {
    let object = expect_object(body)?;
    let mut errors = ValidationErrors::new();

    let email = text_field(object, "email", &mut errors);
    let password = text_field(object, "password", &mut errors);

    match (email, password) {
        (Some(email), Some(password)) => errors.into_result(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Shape checks that need no store access. Presence is already checked.
fn validate_signup(req: &RegisterUserRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let username = req.username.trim();
    if username.chars().count() > MAX_USERNAME_LENGTH {
        errors.add(
            "username",
            format!("Ensure this field has no more than {MAX_USERNAME_LENGTH} characters."),
        );
    } else if !username.chars().all(is_username_char) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if !is_plausible_email(req.email.trim()) {
        errors.add("email", "Enter a valid email address.");
    }

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }

    errors
}

/// POST /auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req = signup_request(&parse_json(&body)?)?;

    let mut errors = validate_signup(&req);
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();

    if !errors.contains("username") && state.users.find_by_username(&username).await?.is_some() {
        errors.add("username", "A user with that username already exists.");
    }
    if !errors.contains("email") && state.users.find_by_email(&email).await?.is_some() {
        errors.add("email", "Email has already been used.");
    }
    errors.into_result(())?;

    let password_hash = password_service.hash(&req.password)?;

    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent signup.
            RepoError::Constraint(_) => AppError::Validation(ValidationErrors::single(
                ValidationErrors::NON_FIELD,
                "A user with that username or email already exists.",
            )),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        render::user(user),
        "User created successfully",
    )))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req = login_request(&parse_json(&body)?)?;

    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = token_service.generate_token(user.id, &user.username)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    }))
}
