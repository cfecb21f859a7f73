//! Async wrapper around the synchronous EcclesiaClient.
//!
//! Every call runs on tokio's blocking thread pool through
//! `tokio::task::spawn_blocking`, so HTTP I/O never stalls the async runtime.

use crate::client::EcclesiaClient;
use crate::error::{ApiError, ApiResult};
use crate::models::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Async interface to the Ecclesia API.
#[async_trait]
pub trait AsyncEcclesiaClient: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Token>;
    async fn me(&self) -> ApiResult<User>;

    async fn list_parishes(&self) -> ApiResult<Vec<Parish>>;
    async fn get_parish(&self, id: i64) -> ApiResult<Parish>;
    async fn create_parish(&self, parish: &NewParish) -> ApiResult<Parish>;
    async fn update_parish(&self, id: i64, update: &ParishUpdate) -> ApiResult<Parish>;
    async fn delete_parish(&self, id: i64) -> ApiResult<()>;

    async fn list_communities(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>>;
    async fn get_community(&self, id: i64) -> ApiResult<Community>;
    async fn create_community(&self, community: &NewCommunity) -> ApiResult<Community>;
    async fn update_community(&self, id: i64, update: &CommunityUpdate) -> ApiResult<Community>;
    async fn delete_community(&self, id: i64) -> ApiResult<()>;

    async fn list_tithers(&self, filters: &TitherFilters) -> ApiResult<Page<Tither>>;
    async fn get_tither(&self, id: i64) -> ApiResult<Tither>;
    async fn create_tither(&self, tither: &NewTither) -> ApiResult<Tither>;
    async fn update_tither(&self, id: i64, update: &TitherUpdate) -> ApiResult<Tither>;
    async fn delete_tither(&self, id: i64) -> ApiResult<()>;

    async fn list_contributions(
        &self,
        filters: &ContributionFilters,
    ) -> ApiResult<Page<Contribution>>;
    async fn get_contribution(&self, id: i64) -> ApiResult<Contribution>;
    async fn create_contribution(&self, contribution: &NewContribution)
        -> ApiResult<Contribution>;
    async fn update_contribution(
        &self,
        id: i64,
        update: &ContributionUpdate,
    ) -> ApiResult<Contribution>;
    async fn delete_contribution(&self, id: i64) -> ApiResult<()>;

    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>>;
    async fn total_by_period(&self, range: &ReportRange) -> ApiResult<PeriodTotal>;
    async fn totals_by_kind(&self, range: &ReportRange) -> ApiResult<KindTotals>;
    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory>;
}

/// [`AsyncEcclesiaClient`] backed by a shared [`EcclesiaClient`].
#[derive(Clone)]
pub struct AsyncEcclesiaClientImpl {
    client: Arc<EcclesiaClient>,
}

impl AsyncEcclesiaClientImpl {
    pub fn new(client: EcclesiaClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn inner(&self) -> &EcclesiaClient {
        &self.client
    }

    async fn blocking<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&EcclesiaClient) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| ApiError::HttpError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl AsyncEcclesiaClient for AsyncEcclesiaClientImpl {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Token> {
        let request = request.clone();
        self.blocking(move |c| c.login(&request)).await
    }

    async fn me(&self) -> ApiResult<User> {
        self.blocking(|c| c.me()).await
    }

    async fn list_parishes(&self) -> ApiResult<Vec<Parish>> {
        self.blocking(|c| c.list_parishes()).await
    }

    async fn get_parish(&self, id: i64) -> ApiResult<Parish> {
        self.blocking(move |c| c.get_parish(id)).await
    }

    async fn create_parish(&self, parish: &NewParish) -> ApiResult<Parish> {
        let parish = parish.clone();
        self.blocking(move |c| c.create_parish(&parish)).await
    }

    async fn update_parish(&self, id: i64, update: &ParishUpdate) -> ApiResult<Parish> {
        let update = update.clone();
        self.blocking(move |c| c.update_parish(id, &update)).await
    }

    async fn delete_parish(&self, id: i64) -> ApiResult<()> {
        self.blocking(move |c| c.delete_parish(id)).await
    }

    async fn list_communities(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>> {
        self.blocking(move |c| c.list_communities(parish_id)).await
    }

    async fn get_community(&self, id: i64) -> ApiResult<Community> {
        self.blocking(move |c| c.get_community(id)).await
    }

    async fn create_community(&self, community: &NewCommunity) -> ApiResult<Community> {
        let community = community.clone();
        self.blocking(move |c| c.create_community(&community)).await
    }

    async fn update_community(&self, id: i64, update: &CommunityUpdate) -> ApiResult<Community> {
        let update = update.clone();
        self.blocking(move |c| c.update_community(id, &update)).await
    }

    async fn delete_community(&self, id: i64) -> ApiResult<()> {
        self.blocking(move |c| c.delete_community(id)).await
    }

    async fn list_tithers(&self, filters: &TitherFilters) -> ApiResult<Page<Tither>> {
        let filters = filters.clone();
        self.blocking(move |c| c.list_tithers(&filters)).await
    }

    async fn get_tither(&self, id: i64) -> ApiResult<Tither> {
        self.blocking(move |c| c.get_tither(id)).await
    }

    async fn create_tither(&self, tither: &NewTither) -> ApiResult<Tither> {
        let tither = tither.clone();
        self.blocking(move |c| c.create_tither(&tither)).await
    }

    async fn update_tither(&self, id: i64, update: &TitherUpdate) -> ApiResult<Tither> {
        let update = update.clone();
        self.blocking(move |c| c.update_tither(id, &update)).await
    }

    async fn delete_tither(&self, id: i64) -> ApiResult<()> {
        self.blocking(move |c| c.delete_tither(id)).await
    }

    async fn list_contributions(
        &self,
        filters: &ContributionFilters,
    ) -> ApiResult<Page<Contribution>> {
        let filters = filters.clone();
        self.blocking(move |c| c.list_contributions(&filters)).await
    }

    async fn get_contribution(&self, id: i64) -> ApiResult<Contribution> {
        self.blocking(move |c| c.get_contribution(id)).await
    }

    async fn create_contribution(
        &self,
        contribution: &NewContribution,
    ) -> ApiResult<Contribution> {
        let contribution = contribution.clone();
        self.blocking(move |c| c.create_contribution(&contribution))
            .await
    }

    async fn update_contribution(
        &self,
        id: i64,
        update: &ContributionUpdate,
    ) -> ApiResult<Contribution> {
        let update = update.clone();
        self.blocking(move |c| c.update_contribution(id, &update))
            .await
    }

    async fn delete_contribution(&self, id: i64) -> ApiResult<()> {
        self.blocking(move |c| c.delete_contribution(id)).await
    }

    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>> {
        self.blocking(move |c| c.birthdays(period, community_id))
            .await
    }

    async fn total_by_period(&self, range: &ReportRange) -> ApiResult<PeriodTotal> {
        let range = *range;
        self.blocking(move |c| c.total_by_period(&range)).await
    }

    async fn totals_by_kind(&self, range: &ReportRange) -> ApiResult<KindTotals> {
        let range = *range;
        self.blocking(move |c| c.totals_by_kind(&range)).await
    }

    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory> {
        self.blocking(move |c| c.tither_history(tither_id)).await
    }
}
