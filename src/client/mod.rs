//! HTTP client for the Ecclesia parish management REST API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client attaches the session's bearer token,
//! maps HTTP failures to [`ApiError`], and records request metrics.

mod async_wrapper;
pub use async_wrapper::{AsyncEcclesiaClient, AsyncEcclesiaClientImpl};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{Entity, HttpTimer, Metrics};
use crate::models::{
    Birthday, BirthdayPeriod, Community, CommunityUpdate, Contribution, ContributionFilters,
    ContributionUpdate, KindTotals, LoginRequest, NewCommunity, NewContribution, NewParish,
    NewTither, Page, Parish, ParishUpdate, PeriodTotal, ReportRange, Tither, TitherFilters,
    TitherHistory, TitherUpdate, Token, User,
};
use crate::session::Session;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

type Query = [(&'static str, String)];

/// HTTP client for the Ecclesia API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct EcclesiaClient {
    /// Base URL without trailing slash, e.g. `http://localhost:8000`
    base_url: String,

    /// Source of the bearer token
    session: Arc<Session>,

    agent: Arc<ureq::Agent>,

    metrics: Metrics,
}

impl EcclesiaClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config, session: Arc<Session>) -> Self {
        Self::build(
            config.api_base_url.clone(),
            session,
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, session: Arc<Session>) -> Self {
        Self::build(base_url, session, Duration::from_secs(10))
    }

    fn build(base_url: String, session: Arc<Session>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Build a full URL from a path and query parameters.
    fn build_url(&self, path: &str, query: &Query) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Execute a request and return the raw response body.
    fn send(
        &self,
        method: &str,
        path: &str,
        query: &Query,
        body: Option<serde_json::Value>,
    ) -> ApiResult<String> {
        let url = self.build_url(path, query);
        let token = self.session.token();

        let mut request = self
            .agent
            .request(method, &url)
            .set("Accept", "application/json");
        if let Some(token) = &token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        tracing::debug!("{} {}", method, url);
        let timer = HttpTimer::new(self.metrics.clone());
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                timer.complete();
                response
                    .into_string()
                    .map_err(|e| ApiError::HttpError(e.to_string()))
            }
            Err(e) => {
                timer.complete_with_error();
                let err = self.map_error(e);
                tracing::warn!("{} {} failed: {}", method, url, err);
                if matches!(err, ApiError::Unauthorized(_)) && token.is_some() {
                    self.metrics.record_auth_failure();
                    // The backend rejected our token; drop it so callers must log in again
                    if let Err(e) = self.session.clear() {
                        tracing::warn!("Failed to clear rejected session: {}", e);
                    }
                }
                Err(err)
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ApiResult<T> {
        let body = self.send("GET", path, query, None)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> ApiResult<T> {
        let body = self.send("POST", path, &[], Some(serde_json::to_value(payload)?))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> ApiResult<T> {
        let body = self.send("PATCH", path, &[], Some(serde_json::to_value(payload)?))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn delete(&self, path: &str) -> ApiResult<()> {
        self.send("DELETE", path, &[], None)?;
        Ok(())
    }

    /// Map a ureq error to an ApiError.
    fn map_error(&self, error: ureq::Error) -> ApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                let message = extract_detail(&body).unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        format!("HTTP {}", code)
                    } else {
                        body
                    }
                });

                match code {
                    400 | 422 => ApiError::InvalidRequest(message),
                    401 => ApiError::Unauthorized(message),
                    403 => ApiError::Forbidden(message),
                    404 => ApiError::NotFound(message),
                    429 => ApiError::RateLimitExceeded,
                    _ => ApiError::Status {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => {
                    ApiError::HttpError(format!("Connection failed: {}", transport))
                }
                ureq::ErrorKind::Io => ApiError::Timeout,
                _ => ApiError::HttpError(transport.to_string()),
            },
        }
    }

    // ========================= Auth =========================

    /// Exchange credentials for a bearer token. Does not touch the session.
    pub fn login(&self, request: &LoginRequest) -> ApiResult<Token> {
        self.post_json("/api/auth/login", request)
    }

    /// The user the current token belongs to.
    pub fn me(&self) -> ApiResult<User> {
        self.get_json("/api/auth/me", &[])
    }

    // ========================= Parishes =========================

    pub fn list_parishes(&self) -> ApiResult<Vec<Parish>> {
        let parishes: Vec<Parish> = self.get_json("/api/paroquias", &[])?;
        self.metrics.record_fetched(Entity::Parish, parishes.len());
        Ok(parishes)
    }

    pub fn get_parish(&self, id: i64) -> ApiResult<Parish> {
        self.get_json(&format!("/api/paroquias/{}", id), &[])
    }

    pub fn create_parish(&self, parish: &NewParish) -> ApiResult<Parish> {
        self.post_json("/api/paroquias", parish)
    }

    pub fn update_parish(&self, id: i64, update: &ParishUpdate) -> ApiResult<Parish> {
        self.patch_json(&format!("/api/paroquias/{}", id), update)
    }

    pub fn delete_parish(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/paroquias/{}", id))
    }

    // ========================= Communities =========================

    /// List communities, optionally only those of one parish.
    pub fn list_communities(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>> {
        let query: Vec<_> = parish_id
            .map(|id| ("paroquia_id", id.to_string()))
            .into_iter()
            .collect();
        let communities: Vec<Community> = self.get_json("/api/comunidades", &query)?;
        self.metrics
            .record_fetched(Entity::Community, communities.len());
        Ok(communities)
    }

    pub fn get_community(&self, id: i64) -> ApiResult<Community> {
        self.get_json(&format!("/api/comunidades/{}", id), &[])
    }

    pub fn create_community(&self, community: &NewCommunity) -> ApiResult<Community> {
        self.post_json("/api/comunidades", community)
    }

    pub fn update_community(&self, id: i64, update: &CommunityUpdate) -> ApiResult<Community> {
        self.patch_json(&format!("/api/comunidades/{}", id), update)
    }

    pub fn delete_community(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/comunidades/{}", id))
    }

    // ========================= Tithers =========================

    pub fn list_tithers(&self, filters: &TitherFilters) -> ApiResult<Page<Tither>> {
        let page: Page<Tither> = self.get_json("/api/dizimistas", &filters.query_pairs())?;
        self.metrics.record_fetched(Entity::Tither, page.items.len());
        Ok(page)
    }

    pub fn get_tither(&self, id: i64) -> ApiResult<Tither> {
        let tither = self.get_json(&format!("/api/dizimistas/{}", id), &[])?;
        self.metrics.record_fetched(Entity::Tither, 1);
        Ok(tither)
    }

    pub fn create_tither(&self, tither: &NewTither) -> ApiResult<Tither> {
        self.post_json("/api/dizimistas", tither)
    }

    pub fn update_tither(&self, id: i64, update: &TitherUpdate) -> ApiResult<Tither> {
        self.patch_json(&format!("/api/dizimistas/{}", id), update)
    }

    /// Soft delete: the backend marks the tither inactive.
    pub fn delete_tither(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/dizimistas/{}", id))
    }

    // ========================= Contributions =========================

    pub fn list_contributions(
        &self,
        filters: &ContributionFilters,
    ) -> ApiResult<Page<Contribution>> {
        let page: Page<Contribution> =
            self.get_json("/api/contribuicoes", &filters.query_pairs())?;
        self.metrics
            .record_fetched(Entity::Contribution, page.items.len());
        Ok(page)
    }

    pub fn get_contribution(&self, id: i64) -> ApiResult<Contribution> {
        let contribution = self.get_json(&format!("/api/contribuicoes/{}", id), &[])?;
        self.metrics.record_fetched(Entity::Contribution, 1);
        Ok(contribution)
    }

    pub fn create_contribution(&self, contribution: &NewContribution) -> ApiResult<Contribution> {
        self.post_json("/api/contribuicoes", contribution)
    }

    pub fn update_contribution(
        &self,
        id: i64,
        update: &ContributionUpdate,
    ) -> ApiResult<Contribution> {
        self.patch_json(&format!("/api/contribuicoes/{}", id), update)
    }

    pub fn delete_contribution(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/contribuicoes/{}", id))
    }

    // ========================= Reports =========================

    pub fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>> {
        let mut query = vec![("periodo", period.as_query().to_string())];
        if let Some(id) = community_id {
            query.push(("comunidade_id", id.to_string()));
        }
        let birthdays: Vec<Birthday> = self.get_json("/api/reports/aniversariantes", &query)?;
        self.metrics
            .record_fetched(Entity::ReportRow, birthdays.len());
        Ok(birthdays)
    }

    pub fn total_by_period(&self, range: &ReportRange) -> ApiResult<PeriodTotal> {
        self.get_json("/api/reports/total-periodo", &range.query_pairs())
    }

    pub fn totals_by_kind(&self, range: &ReportRange) -> ApiResult<KindTotals> {
        let totals: KindTotals = self.get_json("/api/reports/total-tipo", &range.query_pairs())?;
        self.metrics
            .record_fetched(Entity::ReportRow, totals.totals.len());
        Ok(totals)
    }

    pub fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory> {
        let history: TitherHistory = self.get_json(
            &format!("/api/reports/dizimista/{}/historico", tither_id),
            &[],
        )?;
        self.metrics
            .record_fetched(Entity::Contribution, history.contributions.len());
        Ok(history)
    }
}

/// Pull a readable message out of a FastAPI error body.
///
/// `detail` is either a string or, for 422, a list of `{loc, msg}` objects.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .and_then(|f| f.as_str());
                    Some(match field {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}
