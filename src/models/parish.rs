//! Parish (paróquia) and community (comunidade) models.
//!
//! A parish groups communities; every tither and contribution belongs to a
//! community.

use serde::{Deserialize, Serialize};

/// A parish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Parish {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(
        rename = "criado_em",
        alias = "created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,

    #[serde(
        rename = "atualizado_em",
        alias = "updated_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

/// Payload for creating a parish.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewParish {
    #[serde(rename = "nome")]
    pub name: String,
}

/// Partial update for a parish (PATCH).
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ParishUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A community inside a parish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Community {
    pub id: i64,

    #[serde(rename = "paroquia_id")]
    pub parish_id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(
        rename = "criado_em",
        alias = "created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,

    #[serde(
        rename = "atualizado_em",
        alias = "updated_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

/// Payload for creating a community.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCommunity {
    #[serde(rename = "paroquia_id")]
    pub parish_id: i64,

    #[serde(rename = "nome")]
    pub name: String,
}

/// Partial update for a community (PATCH).
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct CommunityUpdate {
    #[serde(rename = "paroquia_id", skip_serializing_if = "Option::is_none")]
    pub parish_id: Option<i64>,

    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
