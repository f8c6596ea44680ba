#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;

use blog_api::configure_app;
use blog_api::state::AppState;
use blog_core::domain::{NewUser, User};
use blog_core::pagination::PageNumberPagination;
use blog_core::ports::{PasswordService, TokenService};
use blog_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

/// In-process application over fresh in-memory repositories.
pub struct TestContext {
    pub state: AppState,
    pub token_service: Arc<dyn TokenService>,
    pub password_service: Arc<dyn PasswordService>,
}

impl TestContext {
    pub fn new() -> Self {
        let token_service = JwtTokenService::new(JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "blog-api-tests".to_string(),
        });

        Self {
            state: AppState::in_memory(PageNumberPagination::default()),
            token_service: Arc::new(token_service),
            password_service: Arc::new(Argon2PasswordService::new()),
        }
    }

    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) {
        configure_app(
            self.state.clone(),
            self.token_service.clone(),
            self.password_service.clone(),
        )
    }

    /// Store a user directly and mint a bearer token for it.
    ///
    /// The password hash is a placeholder; these users never log in.
    pub async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .state
            .users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "unused".to_string(),
            })
            .await
            .expect("create user");
        let token = self
            .token_service
            .generate_token(user.id, &user.username)
            .expect("mint token");

        (user, token)
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
