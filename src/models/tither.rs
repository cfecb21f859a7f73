//! Tither (dizimista) model: a parishioner who contributes regularly.

use crate::domain::{format_cpf, format_phone};
use crate::models::PageRequest;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tither as returned by `/api/dizimistas`.
///
/// `cpf` and `phone` hold whatever the backend stored, normally canonical
/// digits; use [`Tither::display_cpf`] and [`Tither::display_phone`] for
/// presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tither {
    pub id: i64,

    #[serde(rename = "comunidade_id")]
    pub community_id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,

    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "data_nascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,

    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

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

fn default_active() -> bool {
    true
}

impl Tither {
    /// CPF in `XXX.XXX.XXX-XX` form, or empty when unknown.
    pub fn display_cpf(&self) -> String {
        self.cpf.as_deref().map(format_cpf).unwrap_or_default()
    }

    /// Phone in `(XX) XXXXX-XXXX` form, or empty when unknown.
    pub fn display_phone(&self) -> String {
        self.phone.as_deref().map(format_phone).unwrap_or_default()
    }
}

/// Payload for creating a tither. Document fields must already be canonical.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTither {
    #[serde(rename = "comunidade_id")]
    pub community_id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,

    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "data_nascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a tither (PATCH).
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct TitherUpdate {
    #[serde(rename = "comunidade_id", skip_serializing_if = "Option::is_none")]
    pub community_id: Option<i64>,

    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,

    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "data_nascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(rename = "ativo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filters for listing tithers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitherFilters {
    pub page: PageRequest,
    /// Matches name, phone or email on the server.
    pub search: Option<String>,
    pub community_id: Option<i64>,
    pub active: Option<bool>,
}

impl TitherFilters {
    /// Query string parameters in backend naming.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.query_pairs();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(id) = self.community_id {
            pairs.push(("comunidade_id", id.to_string()));
        }
        if let Some(active) = self.active {
            pairs.push(("ativo", active.to_string()));
        }
        pairs
    }
}
