//! Authenticated user and login payloads.

use serde::{Deserialize, Serialize};

/// Role of a system user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Operador,
}

/// A user of the parish management system (API: `/api/auth/me`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    pub email: String,

    #[serde(default)]
    pub role: Role,

    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,

    #[serde(
        rename = "criado_em",
        alias = "created_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,

    #[serde(
        rename = "atualizado_em",
        alias = "updated_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn default_true() -> bool {
    true
}

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,

    #[serde(rename = "senha")]
    pub password: String,
}

/// Bearer token issued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
