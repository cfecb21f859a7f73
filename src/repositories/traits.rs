use crate::error::ApiResult;
use crate::models::*;
use async_trait::async_trait;

/// Login and identity lookups.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Exchange credentials for a token.
    async fn login(&self, request: &LoginRequest) -> ApiResult<Token>;

    /// The user owning the current session token.
    async fn current_user(&self) -> ApiResult<User>;
}

/// Repository for tithers (dizimistas).
///
/// Abstracts storage so services can run against the API client or an
/// in-memory mock.
#[async_trait]
pub trait TitherRepository: Send + Sync {
    async fn list(&self, filters: &TitherFilters) -> ApiResult<Page<Tither>>;

    async fn get(&self, id: i64) -> ApiResult<Tither>;

    async fn create(&self, tither: &NewTither) -> ApiResult<Tither>;

    async fn update(&self, id: i64, update: &TitherUpdate) -> ApiResult<Tither>;

    /// Soft delete (marks the tither inactive).
    async fn delete(&self, id: i64) -> ApiResult<()>;
}

/// Repository for contributions.
#[async_trait]
pub trait ContributionRepository: Send + Sync {
    async fn list(&self, filters: &ContributionFilters) -> ApiResult<Page<Contribution>>;

    async fn get(&self, id: i64) -> ApiResult<Contribution>;

    async fn create(&self, contribution: &NewContribution) -> ApiResult<Contribution>;

    async fn update(&self, id: i64, update: &ContributionUpdate) -> ApiResult<Contribution>;

    async fn delete(&self, id: i64) -> ApiResult<()>;
}

/// Repository for parishes.
#[async_trait]
pub trait ParishRepository: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<Parish>>;

    async fn get(&self, id: i64) -> ApiResult<Parish>;

    async fn create(&self, parish: &NewParish) -> ApiResult<Parish>;

    async fn update(&self, id: i64, update: &ParishUpdate) -> ApiResult<Parish>;

    async fn delete(&self, id: i64) -> ApiResult<()>;
}

/// Repository for communities.
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// List communities, optionally restricted to one parish.
    async fn list(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>>;

    async fn get(&self, id: i64) -> ApiResult<Community>;

    async fn create(&self, community: &NewCommunity) -> ApiResult<Community>;

    async fn update(&self, id: i64, update: &CommunityUpdate) -> ApiResult<Community>;

    async fn delete(&self, id: i64) -> ApiResult<()>;
}

/// Read-only report queries.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>>;

    async fn total_by_period(&self, range: &ReportRange) -> ApiResult<PeriodTotal>;

    async fn totals_by_kind(&self, range: &ReportRange) -> ApiResult<KindTotals>;

    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory>;
}
