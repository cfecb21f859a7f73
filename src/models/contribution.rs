//! Contribution (contribuição) model: a recorded tithe or offering.

use crate::domain::ReferenceMonth;
use crate::models::PageRequest;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContributionKind {
    /// Tithe from a registered tither
    Dizimo,
    /// Offering, possibly anonymous
    Oferta,
}

impl ContributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Dizimo => "DIZIMO",
            ContributionKind::Oferta => "OFERTA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContributionKind::Dizimo => "Dízimo",
            ContributionKind::Oferta => "Oferta",
        }
    }
}

impl fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DIZIMO" | "DÍZIMO" => Ok(ContributionKind::Dizimo),
            "OFERTA" => Ok(ContributionKind::Oferta),
            other => Err(format!("Unknown contribution kind: {}", other)),
        }
    }
}

/// How a contribution was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Dinheiro,
    Pix,
    Cartao,
    Transferencia,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "DINHEIRO",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cartao => "CARTAO",
            PaymentMethod::Transferencia => "TRANSFERENCIA",
            PaymentMethod::Cheque => "CHEQUE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cartao => "Cartão",
            PaymentMethod::Transferencia => "Transferência",
            PaymentMethod::Cheque => "Cheque",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DINHEIRO" => Ok(PaymentMethod::Dinheiro),
            "PIX" => Ok(PaymentMethod::Pix),
            "CARTAO" | "CARTÃO" => Ok(PaymentMethod::Cartao),
            "TRANSFERENCIA" | "TRANSFERÊNCIA" => Ok(PaymentMethod::Transferencia),
            "CHEQUE" => Ok(PaymentMethod::Cheque),
            other => Err(format!("Unknown payment method: {}", other)),
        }
    }
}

/// A contribution as returned by `/api/contribuicoes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contribution {
    pub id: i64,

    #[serde(rename = "dizimista_id", default, skip_serializing_if = "Option::is_none")]
    pub tither_id: Option<i64>,

    #[serde(rename = "comunidade_id")]
    pub community_id: i64,

    #[serde(rename = "tipo")]
    pub kind: ContributionKind,

    #[serde(rename = "valor")]
    pub amount: Decimal,

    #[serde(rename = "data_contribuicao")]
    pub date: NaiveDate,

    #[serde(rename = "forma_pagamento", default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    #[serde(rename = "referencia_mes", default, skip_serializing_if = "Option::is_none")]
    pub reference_month: Option<ReferenceMonth>,

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

/// Payload for registering a contribution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewContribution {
    #[serde(rename = "dizimista_id", skip_serializing_if = "Option::is_none")]
    pub tither_id: Option<i64>,

    #[serde(rename = "comunidade_id")]
    pub community_id: i64,

    #[serde(rename = "tipo")]
    pub kind: ContributionKind,

    #[serde(rename = "valor")]
    pub amount: Decimal,

    #[serde(rename = "data_contribuicao")]
    pub date: NaiveDate,

    #[serde(rename = "forma_pagamento", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    #[serde(rename = "referencia_mes", skip_serializing_if = "Option::is_none")]
    pub reference_month: Option<ReferenceMonth>,

    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a contribution (PATCH).
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ContributionUpdate {
    #[serde(rename = "dizimista_id", skip_serializing_if = "Option::is_none")]
    pub tither_id: Option<i64>,

    #[serde(rename = "comunidade_id", skip_serializing_if = "Option::is_none")]
    pub community_id: Option<i64>,

    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContributionKind>,

    #[serde(rename = "valor", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(rename = "data_contribuicao", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(rename = "forma_pagamento", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    #[serde(rename = "referencia_mes", skip_serializing_if = "Option::is_none")]
    pub reference_month: Option<ReferenceMonth>,

    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filters for listing contributions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionFilters {
    pub page: PageRequest,
    pub tither_id: Option<i64>,
    pub community_id: Option<i64>,
    pub kind: Option<ContributionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContributionFilters {
    /// Query string parameters in backend naming.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.query_pairs();
        if let Some(id) = self.tither_id {
            pairs.push(("dizimista_id", id.to_string()));
        }
        if let Some(id) = self.community_id {
            pairs.push(("comunidade_id", id.to_string()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("tipo", kind.as_str().to_string()));
        }
        if let Some(date) = self.start_date {
            pairs.push(("start_date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            pairs.push(("end_date", date.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_contribution_deserialization_with_string_amount() {
        let json = r#"{
            "id": 10,
            "dizimista_id": 7,
            "comunidade_id": 2,
            "tipo": "DIZIMO",
            "valor": "150.00",
            "data_contribuicao": "2024-06-05",
            "forma_pagamento": "PIX",
            "referencia_mes": "2024-06"
        }"#;
        let contribution: Contribution = serde_json::from_str(json).unwrap();
        assert_eq!(contribution.amount, dec!(150));
        assert_eq!(contribution.kind, ContributionKind::Dizimo);
        assert_eq!(contribution.payment_method, Some(PaymentMethod::Pix));
        assert_eq!(
            contribution.reference_month.map(|m| m.to_string()),
            Some("2024-06".to_string())
        );
    }

    #[test]
    fn test_contribution_deserialization_with_numeric_amount() {
        let json = r#"{
            "id": 11,
            "comunidade_id": 2,
            "tipo": "OFERTA",
            "valor": 25.5,
            "data_contribuicao": "2024-06-09"
        }"#;
        let contribution: Contribution = serde_json::from_str(json).unwrap();
        assert_eq!(contribution.amount, dec!(25.5));
        assert!(contribution.tither_id.is_none());
    }

    #[test]
    fn test_kind_and_method_parsing() {
        assert_eq!("dizimo".parse::<ContributionKind>(), Ok(ContributionKind::Dizimo));
        assert_eq!("Oferta".parse::<ContributionKind>(), Ok(ContributionKind::Oferta));
        assert!("doacao".parse::<ContributionKind>().is_err());

        assert_eq!("cartão".parse::<PaymentMethod>(), Ok(PaymentMethod::Cartao));
        assert_eq!("pix".parse::<PaymentMethod>(), Ok(PaymentMethod::Pix));
        assert!("boleto".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_filters_query_pairs() {
        let filters = ContributionFilters {
            kind: Some(ContributionKind::Oferta),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let pairs = filters.query_pairs();
        assert!(pairs.contains(&("tipo", "OFERTA".to_string())));
        assert!(pairs.contains(&("start_date", "2024-01-01".to_string())));
        assert!(pairs.contains(&("end_date", "2024-01-31".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "dizimista_id"));
    }
}
