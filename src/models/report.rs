//! Report models: birthdays and contribution totals.

use crate::domain::{calculate_age, days_until_birthday};
use crate::models::{Contribution, ContributionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window for the birthday report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BirthdayPeriod {
    /// Birthdays today
    Today,
    /// Birthdays in the next seven days (inclusive of today)
    NextSevenDays,
    /// Birthdays in the current month
    #[default]
    Month,
}

impl BirthdayPeriod {
    /// Query value understood by the backend.
    pub fn as_query(&self) -> &'static str {
        match self {
            BirthdayPeriod::Today => "hoje",
            BirthdayPeriod::NextSevenDays => "7dias",
            BirthdayPeriod::Month => "mes",
        }
    }
}

impl fmt::Display for BirthdayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for BirthdayPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hoje" | "today" => Ok(BirthdayPeriod::Today),
            "7dias" | "week" | "7days" => Ok(BirthdayPeriod::NextSevenDays),
            "mes" | "mês" | "month" => Ok(BirthdayPeriod::Month),
            other => Err(format!("Unknown birthday period: {}", other)),
        }
    }
}

/// A tither with a birthday in the requested window.
///
/// `age` and `days_until` are not sent by the backend; they are filled in by
/// [`Birthday::with_today`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Birthday {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "data_nascimento")]
    pub birth_date: NaiveDate,

    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "comunidade_id")]
    pub community_id: i64,

    #[serde(rename = "comunidade_nome", default)]
    pub community_name: String,

    /// Age the tither turns on the upcoming birthday
    #[serde(rename = "idade_completa", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    #[serde(rename = "dias_ate_aniversario", default, skip_serializing_if = "Option::is_none")]
    pub days_until: Option<i64>,
}

impl Birthday {
    /// Compute `age` and `days_until` relative to `today`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        let days_until = days_until_birthday(self.birth_date, today);
        self.days_until = days_until;
        self.age = days_until.map(|days| {
            let current = calculate_age(self.birth_date, today);
            // On any day but the birthday itself the tither is about to turn one more
            if days == 0 {
                current
            } else {
                current + 1
            }
        });
        self
    }
}

/// Date range (and optional community) for the totals reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub community_id: Option<i64>,
}

impl ReportRange {
    pub fn is_valid(&self) -> bool {
        self.start_date <= self.end_date
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(id) = self.community_id {
            pairs.push(("comunidade_id", id.to_string()));
        }
        pairs
    }
}

/// Sum of contributions in a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodTotal {
    pub total: Decimal,

    #[serde(rename = "quantidade", default)]
    pub count: u64,

    #[serde(rename = "data_inicio", alias = "start_date")]
    pub start_date: NaiveDate,

    #[serde(rename = "data_fim", alias = "end_date")]
    pub end_date: NaiveDate,

    #[serde(rename = "comunidade_id", default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<i64>,
}

/// Sum of contributions of one kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KindTotal {
    #[serde(rename = "tipo")]
    pub kind: ContributionKind,

    pub total: Decimal,

    #[serde(rename = "quantidade", default)]
    pub count: u64,
}

/// Totals per contribution kind in a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KindTotals {
    #[serde(rename = "data_inicio", alias = "start_date")]
    pub start_date: NaiveDate,

    #[serde(rename = "data_fim", alias = "end_date")]
    pub end_date: NaiveDate,

    #[serde(rename = "comunidade_id", default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<i64>,

    #[serde(rename = "totais", default)]
    pub totals: Vec<KindTotal>,
}

impl KindTotals {
    /// Total for one kind, zero when the kind had no contributions.
    pub fn total_for(&self, kind: ContributionKind) -> Decimal {
        self.totals
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.total)
            .sum()
    }

    pub fn grand_total(&self) -> Decimal {
        self.totals.iter().map(|t| t.total).sum()
    }
}

/// Contribution history of one tither.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitherHistory {
    #[serde(rename = "dizimista_id")]
    pub tither_id: i64,

    #[serde(rename = "dizimista_nome")]
    pub tither_name: String,

    #[serde(rename = "total_geral")]
    pub total: Decimal,

    #[serde(rename = "quantidade_total", default)]
    pub count: u64,

    #[serde(rename = "contribuicoes", default)]
    pub contributions: Vec<Contribution>,
}
