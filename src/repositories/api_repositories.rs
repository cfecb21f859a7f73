//! Repository implementations backed by the Ecclesia API client.
//!
//! Each repository delegates to [`AsyncEcclesiaClient`]; they exist so that
//! services depend on narrow traits rather than the whole client.

use crate::client::AsyncEcclesiaClient;
use crate::error::ApiResult;
use crate::models::*;
use crate::repositories::traits::{
    AuthRepository, CommunityRepository, ContributionRepository, ParishRepository,
    ReportRepository, TitherRepository,
};
use async_trait::async_trait;
use std::sync::Arc;

macro_rules! api_repository {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name {
            client: Arc<dyn AsyncEcclesiaClient>,
        }

        impl $name {
            pub fn new(client: Arc<dyn AsyncEcclesiaClient>) -> Self {
                Self { client }
            }
        }
    };
}

api_repository!(
    /// Auth endpoints (`/api/auth`).
    ApiAuthRepository
);
api_repository!(
    /// Tither endpoints (`/api/dizimistas`).
    ApiTitherRepository
);
api_repository!(
    /// Contribution endpoints (`/api/contribuicoes`).
    ApiContributionRepository
);
api_repository!(
    /// Parish endpoints (`/api/paroquias`).
    ApiParishRepository
);
api_repository!(
    /// Community endpoints (`/api/comunidades`).
    ApiCommunityRepository
);
api_repository!(
    /// Report endpoints (`/api/reports`).
    ApiReportRepository
);

#[async_trait]
impl AuthRepository for ApiAuthRepository {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Token> {
        self.client.login(request).await
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.client.me().await
    }
}

#[async_trait]
impl TitherRepository for ApiTitherRepository {
    async fn list(&self, filters: &TitherFilters) -> ApiResult<Page<Tither>> {
        self.client.list_tithers(filters).await
    }

    async fn get(&self, id: i64) -> ApiResult<Tither> {
        self.client.get_tither(id).await
    }

    async fn create(&self, tither: &NewTither) -> ApiResult<Tither> {
        self.client.create_tither(tither).await
    }

    async fn update(&self, id: i64, update: &TitherUpdate) -> ApiResult<Tither> {
        self.client.update_tither(id, update).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete_tither(id).await
    }
}

#[async_trait]
impl ContributionRepository for ApiContributionRepository {
    async fn list(&self, filters: &ContributionFilters) -> ApiResult<Page<Contribution>> {
        self.client.list_contributions(filters).await
    }

    async fn get(&self, id: i64) -> ApiResult<Contribution> {
        self.client.get_contribution(id).await
    }

    async fn create(&self, contribution: &NewContribution) -> ApiResult<Contribution> {
        self.client.create_contribution(contribution).await
    }

    async fn update(&self, id: i64, update: &ContributionUpdate) -> ApiResult<Contribution> {
        self.client.update_contribution(id, update).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete_contribution(id).await
    }
}

#[async_trait]
impl ParishRepository for ApiParishRepository {
    async fn list(&self) -> ApiResult<Vec<Parish>> {
        self.client.list_parishes().await
    }

    async fn get(&self, id: i64) -> ApiResult<Parish> {
        self.client.get_parish(id).await
    }

    async fn create(&self, parish: &NewParish) -> ApiResult<Parish> {
        self.client.create_parish(parish).await
    }

    async fn update(&self, id: i64, update: &ParishUpdate) -> ApiResult<Parish> {
        self.client.update_parish(id, update).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete_parish(id).await
    }
}

#[async_trait]
impl CommunityRepository for ApiCommunityRepository {
    async fn list(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>> {
        self.client.list_communities(parish_id).await
    }

    async fn get(&self, id: i64) -> ApiResult<Community> {
        self.client.get_community(id).await
    }

    async fn create(&self, community: &NewCommunity) -> ApiResult<Community> {
        self.client.create_community(community).await
    }

    async fn update(&self, id: i64, update: &CommunityUpdate) -> ApiResult<Community> {
        self.client.update_community(id, update).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete_community(id).await
    }
}

#[async_trait]
impl ReportRepository for ApiReportRepository {
    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>> {
        self.client.birthdays(period, community_id).await
    }

    async fn total_by_period(&self, range: &ReportRange) -> ApiResult<PeriodTotal> {
        self.client.total_by_period(range).await
    }

    async fn totals_by_kind(&self, range: &ReportRange) -> ApiResult<KindTotals> {
        self.client.totals_by_kind(range).await
    }

    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory> {
        self.client.tither_history(tither_id).await
    }
}
