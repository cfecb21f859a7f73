//! Report service layer.
//!
//! Birthday lists are enriched client-side with age and days-until. The
//! financial summary and the dashboard fetch their figures concurrently.

use crate::domain::{today, ReferenceMonth};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Birthday, BirthdayPeriod, ContributionFilters, KindTotals, PageRequest, PeriodTotal,
    ReportRange, TitherFilters, TitherHistory,
};
use crate::repositories::{ContributionRepository, ReportRepository, TitherRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Period total plus its per-kind breakdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinancialSummary {
    pub period: PeriodTotal,
    pub by_kind: KindTotals,
}

/// Overview figures: active tithers, contributions on record, this month's
/// total and today's birthdays.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub active_tithers: u64,
    pub contributions: u64,
    pub month_total: PeriodTotal,
    pub birthdays_today: Vec<Birthday>,
}

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Birthdays in `period`, soonest first.
    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>>;

    async fn total_by_period(&self, range: ReportRange) -> ApiResult<PeriodTotal>;

    async fn totals_by_kind(&self, range: ReportRange) -> ApiResult<KindTotals>;

    async fn financial_summary(&self, range: ReportRange) -> ApiResult<FinancialSummary>;

    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory>;

    async fn dashboard(&self) -> ApiResult<Dashboard>;
}

/// Default implementation of ReportService.
pub struct ReportServiceImpl {
    repository: Arc<dyn ReportRepository>,
    tithers: Arc<dyn TitherRepository>,
    contributions: Arc<dyn ContributionRepository>,
    fixed_today: Option<NaiveDate>,
}

/// Validation helper functions.
impl ReportServiceImpl {
    fn validate_range(range: &ReportRange) -> ApiResult<()> {
        if !range.is_valid() {
            return Err(ApiError::Validation(format!(
                "start_date ({}) must not be after end_date ({})",
                range.start_date, range.end_date
            )));
        }
        Ok(())
    }
}

impl ReportServiceImpl {
    /// The dashboard counts come from the tither and contribution listings.
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        tithers: Arc<dyn TitherRepository>,
        contributions: Arc<dyn ContributionRepository>,
    ) -> Self {
        Self {
            repository,
            tithers,
            contributions,
            fixed_today: None,
        }
    }

    /// Compute birthday ages and countdowns relative to `date` instead of the local date.
    pub fn with_today(mut self, date: NaiveDate) -> Self {
        self.fixed_today = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(today)
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>> {
        let today = self.today();
        let mut birthdays: Vec<Birthday> = self
            .repository
            .birthdays(period, community_id)
            .await?
            .into_iter()
            .map(|b| b.with_today(today))
            .collect();

        birthdays.sort_by(|a, b| {
            a.days_until
                .unwrap_or(i64::MAX)
                .cmp(&b.days_until.unwrap_or(i64::MAX))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(birthdays)
    }

    async fn total_by_period(&self, range: ReportRange) -> ApiResult<PeriodTotal> {
        Self::validate_range(&range)?;
        self.repository.total_by_period(&range).await
    }

    async fn totals_by_kind(&self, range: ReportRange) -> ApiResult<KindTotals> {
        Self::validate_range(&range)?;
        self.repository.totals_by_kind(&range).await
    }

    async fn financial_summary(&self, range: ReportRange) -> ApiResult<FinancialSummary> {
        Self::validate_range(&range)?;
        let (period, by_kind) = futures::try_join!(
            self.repository.total_by_period(&range),
            self.repository.totals_by_kind(&range)
        )?;
        Ok(FinancialSummary { period, by_kind })
    }

    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory> {
        if tither_id <= 0 {
            return Err(ApiError::Validation(format!(
                "Invalid tither id: {}",
                tither_id
            )));
        }
        self.repository.tither_history(tither_id).await
    }

    async fn dashboard(&self) -> ApiResult<Dashboard> {
        let month = ReferenceMonth::from_date(self.today());
        let (start_date, end_date) = month
            .first_day()
            .zip(month.last_day())
            .ok_or_else(|| ApiError::Other(format!("No calendar bounds for {}", month)))?;
        let month_range = ReportRange {
            start_date,
            end_date,
            community_id: None,
        };
        // A one-row page is enough to read the totals
        let active = TitherFilters {
            page: PageRequest::new(1, 1),
            active: Some(true),
            ..Default::default()
        };
        let all = ContributionFilters {
            page: PageRequest::new(1, 1),
            ..Default::default()
        };

        let (tithers, contributions, month_total, birthdays_today) = futures::try_join!(
            self.tithers.list(&active),
            self.contributions.list(&all),
            self.repository.total_by_period(&month_range),
            self.birthdays(BirthdayPeriod::Today, None)
        )?;

        Ok(Dashboard {
            active_tithers: tithers.total,
            contributions: contributions.total,
            month_total,
            birthdays_today,
        })
    }
}
