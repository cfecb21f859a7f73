//! Contribution service layer.
//!
//! Business rules for registering dízimos and ofertas: amounts must be
//! positive, the reference month must be `YYYY-MM`, and a tither is optional
//! (anonymous offerings).

use crate::domain::{parse_date, ReferenceMonth};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Contribution, ContributionFilters, ContributionKind, ContributionUpdate, NewContribution,
    Page, PaymentMethod,
};
use crate::repositories::ContributionRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Raw input for registering a contribution.
#[derive(Debug, Clone)]
pub struct ContributionForm {
    pub tither_id: Option<i64>,
    pub community_id: i64,
    pub kind: ContributionKind,
    pub amount: Decimal,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`
    pub date: String,
    pub payment_method: Option<PaymentMethod>,
    /// `YYYY-MM`; blank means none
    pub reference_month: Option<String>,
    pub notes: Option<String>,
}

/// Raw input for updating a contribution. `None` and blank strings leave a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContributionPatch {
    pub tither_id: Option<i64>,
    pub community_id: Option<i64>,
    pub kind: Option<ContributionKind>,
    pub amount: Option<Decimal>,
    pub date: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub reference_month: Option<String>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait ContributionService: Send + Sync {
    async fn list(&self, filters: ContributionFilters) -> ApiResult<Page<Contribution>>;

    async fn get(&self, id: i64) -> ApiResult<Contribution>;

    async fn register(&self, form: ContributionForm) -> ApiResult<Contribution>;

    async fn update(&self, id: i64, patch: ContributionPatch) -> ApiResult<Contribution>;

    async fn delete(&self, id: i64) -> ApiResult<()>;
}

/// Default implementation of ContributionService.
pub struct ContributionServiceImpl {
    repository: Arc<dyn ContributionRepository>,
}

/// Validation helper functions.
impl ContributionServiceImpl {
    fn validate_id(id: i64) -> ApiResult<()> {
        if id <= 0 {
            return Err(ApiError::Validation(format!(
                "Invalid contribution id: {}",
                id
            )));
        }
        Ok(())
    }

    fn validate_amount(amount: Decimal) -> ApiResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(ApiError::Validation(format!(
                "Amount must be greater than zero, got {}",
                amount
            )));
        }
        Ok(amount)
    }

    fn validate_date(raw: &str) -> ApiResult<NaiveDate> {
        parse_date(raw).ok_or_else(|| {
            ApiError::Validation(format!(
                "Invalid contribution date (expected YYYY-MM-DD or DD/MM/YYYY): {}",
                raw
            ))
        })
    }

    fn validate_reference_month(raw: Option<&str>) -> ApiResult<Option<ReferenceMonth>> {
        match raw.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => Ok(Some(ReferenceMonth::new(raw)?)),
            None => Ok(None),
        }
    }

    fn validate_filters(filters: &ContributionFilters) -> ApiResult<()> {
        if let (Some(start), Some(end)) = (filters.start_date, filters.end_date) {
            if start > end {
                return Err(ApiError::Validation(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn build_new(form: ContributionForm) -> ApiResult<NewContribution> {
        if form.community_id <= 0 {
            return Err(ApiError::Validation("A community is required".to_string()));
        }
        Ok(NewContribution {
            tither_id: form.tither_id.filter(|id| *id > 0),
            community_id: form.community_id,
            kind: form.kind,
            amount: Self::validate_amount(form.amount)?,
            date: Self::validate_date(&form.date)?,
            payment_method: form.payment_method,
            reference_month: Self::validate_reference_month(form.reference_month.as_deref())?,
            notes: form
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }

    fn build_update(patch: ContributionPatch) -> ApiResult<ContributionUpdate> {
        let date = match patch.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Some(Self::validate_date(raw)?),
            None => None,
        };
        Ok(ContributionUpdate {
            tither_id: patch.tither_id,
            community_id: patch.community_id,
            kind: patch.kind,
            amount: patch.amount.map(Self::validate_amount).transpose()?,
            date,
            payment_method: patch.payment_method,
            reference_month: Self::validate_reference_month(patch.reference_month.as_deref())?,
            notes: patch
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }
}

impl ContributionServiceImpl {
    pub fn new(repository: Arc<dyn ContributionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ContributionService for ContributionServiceImpl {
    async fn list(&self, filters: ContributionFilters) -> ApiResult<Page<Contribution>> {
        Self::validate_filters(&filters)?;
        self.repository.list(&filters).await
    }

    async fn get(&self, id: i64) -> ApiResult<Contribution> {
        Self::validate_id(id)?;
        self.repository.get(id).await
    }

    async fn register(&self, form: ContributionForm) -> ApiResult<Contribution> {
        let payload = Self::build_new(form)?;
        let contribution = self.repository.create(&payload).await?;
        tracing::info!(
            "Registered {} of {} (id {})",
            contribution.kind,
            contribution.amount,
            contribution.id
        );
        Ok(contribution)
    }

    async fn update(&self, id: i64, patch: ContributionPatch) -> ApiResult<Contribution> {
        Self::validate_id(id)?;
        let payload = Self::build_update(patch)?;
        self.repository.update(id, &payload).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        Self::validate_id(id)?;
        self.repository.delete(id).await
    }
}
