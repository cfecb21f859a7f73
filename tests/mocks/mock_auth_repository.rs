use super::CallCounts;
use async_trait::async_trait;
use ecclesia_mcp_server::error::{ApiError, ApiResult};
use ecclesia_mcp_server::models::{LoginRequest, Token, User};
use ecclesia_mcp_server::repositories::AuthRepository;
use std::sync::{Arc, Mutex};

/// Mock auth repository accepting a single email/password pair.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockAuthRepository {
    email: String,
    password: String,
    user: User,
    me_error: Arc<Mutex<Option<ApiError>>>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockAuthRepository {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            user: User {
                id: 1,
                name: "Secretaria".to_string(),
                email: email.to_string(),
                active: true,
                ..Default::default()
            },
            me_error: Arc::new(Mutex::new(None)),
            calls: CallCounts::default(),
        }
    }

    /// Make the next `/me` call fail with `error`.
    pub fn fail_me_with(&self, error: ApiError) {
        *self.me_error.lock().unwrap() = Some(error);
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }
}

#[async_trait]
impl AuthRepository for MockAuthRepository {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Token> {
        self.calls.track("login");
        if request.email == self.email && request.password == self.password {
            Ok(Token {
                access_token: "token-123".to_string(),
                token_type: "bearer".to_string(),
            })
        } else {
            Err(ApiError::Unauthorized("Email ou senha incorretos".to_string()))
        }
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.calls.track("current_user");
        match self.me_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.user.clone()),
        }
    }
}
