//! MCP tool handlers for the Ecclesia server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::client::AsyncEcclesiaClient;
use crate::domain::{
    calculate_age, format_cpf, format_currency, format_date, format_date_for_input,
    format_phone, is_valid_cpf, parse_currency, parse_date, today, unformat_cpf,
};
use crate::error::ApiError;
use crate::models::{
    BirthdayPeriod, ContributionFilters, ContributionKind, PageRequest, PaymentMethod,
    ReportRange, TitherFilters, DEFAULT_PAGE_SIZE,
};
use crate::repositories::{
    ApiAuthRepository, ApiCommunityRepository, ApiContributionRepository, ApiParishRepository,
    ApiReportRepository, ApiTitherRepository,
};
use crate::server::views;
use crate::services::{
    AuthService, AuthServiceImpl, CommunityService, CommunityServiceImpl, ContributionForm,
    ContributionService, ContributionServiceImpl, ParishService, ParishServiceImpl,
    ReportService, ReportServiceImpl, TitherForm, TitherPatch, TitherService,
    TitherServiceImpl,
};
use crate::session::Session;
use chrono::NaiveDate;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// Services the tool handlers delegate to.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub tithers: Arc<dyn TitherService>,
    pub contributions: Arc<dyn ContributionService>,
    pub parishes: Arc<dyn ParishService>,
    pub communities: Arc<dyn CommunityService>,
    pub reports: Arc<dyn ReportService>,
}

impl Services {
    /// Wire every service to API-backed repositories.
    pub fn from_client(client: Arc<dyn AsyncEcclesiaClient>, session: Arc<Session>) -> Self {
        Self {
            auth: Arc::new(AuthServiceImpl::new(
                Arc::new(ApiAuthRepository::new(client.clone())),
                session,
            )),
            tithers: Arc::new(TitherServiceImpl::new(Arc::new(ApiTitherRepository::new(
                client.clone(),
            )))),
            contributions: Arc::new(ContributionServiceImpl::new(Arc::new(
                ApiContributionRepository::new(client.clone()),
            ))),
            parishes: Arc::new(ParishServiceImpl::new(Arc::new(ApiParishRepository::new(
                client.clone(),
            )))),
            communities: Arc::new(CommunityServiceImpl::new(Arc::new(
                ApiCommunityRepository::new(client.clone()),
            ))),
            reports: Arc::new(ReportServiceImpl::new(
                Arc::new(ApiReportRepository::new(client.clone())),
                Arc::new(ApiTitherRepository::new(client.clone())),
                Arc::new(ApiContributionRepository::new(client)),
            )),
        }
    }
}

/// The Ecclesia MCP server that exposes parish management tools.
#[derive(Clone)]
pub struct EcclesiaMcpServer {
    services: Services,
    default_page_size: u32,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for EcclesiaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "ecclesia-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for the Ecclesia parish management system - manages tithers (dizimistas), contributions, parishes and communities, and produces birthday and financial reports. Call `login` first unless the server was started with credentials.".into()),
        }
    }
}

/// How list tools render their results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    /// Aligned text table with display formatting
    #[default]
    Table,
    /// Raw JSON as returned by the API
    Json,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LoginParams {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListTithersParams {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
    /// Matches name, phone or email
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    community_id: Option<i64>,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchTithersParams {
    query: String,
    #[serde(default)]
    community_id: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TitherIdParams {
    tither_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateTitherParams {
    community_id: i64,
    name: String,
    /// Any formatting; stored as 11 digits
    #[serde(default)]
    cpf: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    /// YYYY-MM-DD or DD/MM/YYYY
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateTitherParams {
    tither_id: i64,
    #[serde(default)]
    community_id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cpf: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    active: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListContributionsParams {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    tither_id: Option<i64>,
    #[serde(default)]
    community_id: Option<i64>,
    /// DIZIMO or OFERTA
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RegisterContributionParams {
    community_id: i64,
    /// DIZIMO or OFERTA
    kind: String,
    /// `150.00`, `150,00`, `R$ 1.500` or `R$ 1.234,50`
    amount: String,
    /// Defaults to today
    #[serde(default)]
    date: Option<String>,
    /// Omit for an anonymous offering
    #[serde(default)]
    tither_id: Option<i64>,
    /// DINHEIRO, PIX, CARTAO, TRANSFERENCIA or CHEQUE
    #[serde(default)]
    payment_method: Option<String>,
    /// YYYY-MM
    #[serde(default)]
    reference_month: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContributionIdParams {
    contribution_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FormatOnlyParams {
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NameParams {
    name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListCommunitiesParams {
    #[serde(default)]
    parish_id: Option<i64>,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateCommunityParams {
    parish_id: i64,
    name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BirthdayReportParams {
    /// hoje, 7dias or mes (default mes)
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    community_id: Option<i64>,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FinancialSummaryParams {
    start_date: String,
    end_date: String,
    #[serde(default)]
    community_id: Option<i64>,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TitherHistoryParams {
    tither_id: i64,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ValidateCpfParams {
    cpf: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FormatValuesParams {
    #[serde(default)]
    cpf: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    date: Option<String>,
    /// Also reports the age today
    #[serde(default)]
    birth_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct FormattedValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    cpf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpf_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<i32>,
}

fn to_mcp_error(e: ApiError) -> McpError {
    let code = if e.is_client_input() {
        ErrorCode::INVALID_PARAMS
    } else {
        ErrorCode::INTERNAL_ERROR
    };
    let message = match e {
        ApiError::Unauthorized(_) => format!("{} (call the login tool first)", e),
        other => other.to_string(),
    };
    McpError {
        code,
        message: Cow::from(message),
        data: None,
    }
}

fn internal_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params(message: impl Into<String>) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(message.into()),
        data: None,
    }
}

fn parse_date_param(field: &str, value: &str) -> Result<NaiveDate, McpError> {
    parse_date(value).ok_or_else(|| {
        invalid_params(format!(
            "{} must be YYYY-MM-DD or DD/MM/YYYY, got: {}",
            field, value
        ))
    })
}

fn optional_date_param(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, McpError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_date_param(field, value).map(Some),
        None => Ok(None),
    }
}

fn text(body: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(body)]))
}

fn json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    text(serde_json::to_string_pretty(value).map_err(internal_error)?)
}

#[tool_router]
impl EcclesiaMcpServer {
    /// Create a new server around the given services.
    pub fn new(services: Services) -> Self {
        Self {
            services,
            default_page_size: DEFAULT_PAGE_SIZE,
            tool_router: Self::tool_router(),
        }
    }

    /// Page size used when a list tool is called without one.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    fn page_request(&self, page: Option<u32>, page_size: Option<u32>) -> PageRequest {
        PageRequest::new(
            page.unwrap_or(1),
            page_size.unwrap_or(self.default_page_size),
        )
    }

    // ========================= Session =========================

    #[tool(description = "Log in to the Ecclesia API with email and password. The session is kept for later calls.")]
    async fn login(&self, params: Parameters<LoginParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let user = self
            .services
            .auth
            .login(&params.email, &params.password)
            .await
            .map_err(to_mcp_error)?;
        json(&serde_json::json!({ "logged_in": true, "user": user }))
    }

    #[tool(description = "Log out and forget the stored session token")]
    async fn logout(&self) -> Result<CallToolResult, McpError> {
        self.services.auth.logout().await.map_err(to_mcp_error)?;
        json(&serde_json::json!({ "logged_in": false }))
    }

    #[tool(description = "Show the currently authenticated user, re-validating the session token")]
    async fn whoami(&self) -> Result<CallToolResult, McpError> {
        let user = self.services.auth.check_auth().await.map_err(to_mcp_error)?;
        json(&serde_json::json!({
            "authenticated": user.is_some(),
            "user": user,
        }))
    }

    // ========================= Tithers =========================

    #[tool(description = "List tithers (dizimistas) with pagination and optional search, community and active filters")]
    async fn list_tithers(
        &self,
        params: Parameters<ListTithersParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let filters = TitherFilters {
            page: self.page_request(params.page, params.page_size),
            search: params.search,
            community_id: params.community_id,
            active: params.active,
        };
        let page = self
            .services
            .tithers
            .list(filters)
            .await
            .map_err(to_mcp_error)?;

        match params.format {
            OutputFormat::Json => json(&page),
            OutputFormat::Table => text(views::render_page(&views::tither_table(), &page)),
        }
    }

    #[tool(description = "Quick search of active tithers by name, phone or email (at least 2 characters, up to 10 results)")]
    async fn search_tithers(
        &self,
        params: Parameters<SearchTithersParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let tithers = self
            .services
            .tithers
            .search(&params.query, params.community_id)
            .await
            .map_err(to_mcp_error)?;
        text(views::tither_table().render(&tithers))
    }

    #[tool(description = "Get one tither by ID, with formatted CPF, phone and age")]
    async fn get_tither(
        &self,
        params: Parameters<TitherIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let tither = self
            .services
            .tithers
            .get(params.0.tither_id)
            .await
            .map_err(to_mcp_error)?;
        let age = tither.birth_date.map(|b| calculate_age(b, today()));
        json(&serde_json::json!({
            "tither": tither,
            "display": {
                "cpf": tither.display_cpf(),
                "phone": tither.display_phone(),
                "birth_date": tither.birth_date.map(format_date),
                "age": age,
            }
        }))
    }

    #[tool(description = "Register a new tither. CPF and phone may be typed with any punctuation; an invalid CPF is rejected.")]
    async fn create_tither(
        &self,
        params: Parameters<CreateTitherParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let form = TitherForm {
            community_id: p.community_id,
            name: p.name,
            cpf: p.cpf,
            phone: p.phone,
            email: p.email,
            birth_date: p.birth_date,
            address: p.address,
            notes: p.notes,
        };
        let tither = self
            .services
            .tithers
            .create(form)
            .await
            .map_err(to_mcp_error)?;
        json(&tither)
    }

    #[tool(description = "Update fields of an existing tither; omitted fields are left unchanged")]
    async fn update_tither(
        &self,
        params: Parameters<UpdateTitherParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let patch = TitherPatch {
            community_id: p.community_id,
            name: p.name,
            cpf: p.cpf,
            phone: p.phone,
            email: p.email,
            birth_date: p.birth_date,
            address: p.address,
            notes: p.notes,
            active: p.active,
        };
        let tither = self
            .services
            .tithers
            .update(p.tither_id, patch)
            .await
            .map_err(to_mcp_error)?;
        json(&tither)
    }

    #[tool(description = "Deactivate a tither (soft delete; contribution history is kept)")]
    async fn deactivate_tither(
        &self,
        params: Parameters<TitherIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.tither_id;
        self.services
            .tithers
            .deactivate(id)
            .await
            .map_err(to_mcp_error)?;
        json(&serde_json::json!({ "tither_id": id, "active": false }))
    }

    // ========================= Contributions =========================

    #[tool(description = "List contributions with pagination and optional tither, community, kind and date range filters")]
    async fn list_contributions(
        &self,
        params: Parameters<ListContributionsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = p
            .kind
            .as_deref()
            .map(str::parse::<ContributionKind>)
            .transpose()
            .map_err(invalid_params)?;
        let filters = ContributionFilters {
            page: self.page_request(p.page, p.page_size),
            tither_id: p.tither_id,
            community_id: p.community_id,
            kind,
            start_date: optional_date_param("start_date", p.start_date.as_deref())?,
            end_date: optional_date_param("end_date", p.end_date.as_deref())?,
        };
        let page = self
            .services
            .contributions
            .list(filters)
            .await
            .map_err(to_mcp_error)?;

        match p.format {
            OutputFormat::Json => json(&page),
            OutputFormat::Table => text(views::render_page(&views::contribution_table(), &page)),
        }
    }

    #[tool(description = "Register a dízimo or oferta. Amount must be positive; reference month is YYYY-MM.")]
    async fn register_contribution(
        &self,
        params: Parameters<RegisterContributionParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind: ContributionKind = p.kind.parse().map_err(invalid_params)?;
        let amount = parse_currency(&p.amount)
            .ok_or_else(|| invalid_params(format!("amount is not a number: {}", p.amount)))?;
        let payment_method = p
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .map_err(invalid_params)?;
        let date = p
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format_date_for_input(today()));

        let form = ContributionForm {
            tither_id: p.tither_id,
            community_id: p.community_id,
            kind,
            amount,
            date,
            payment_method,
            reference_month: p.reference_month,
            notes: p.notes,
        };
        let contribution = self
            .services
            .contributions
            .register(form)
            .await
            .map_err(to_mcp_error)?;
        json(&serde_json::json!({
            "contribution": contribution,
            "display_amount": format_currency(contribution.amount),
        }))
    }

    #[tool(description = "Delete a contribution by ID")]
    async fn delete_contribution(
        &self,
        params: Parameters<ContributionIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.contribution_id;
        self.services
            .contributions
            .delete(id)
            .await
            .map_err(to_mcp_error)?;
        json(&serde_json::json!({ "contribution_id": id, "deleted": true }))
    }

    // ========================= Parishes & communities =========================

    #[tool(description = "List all parishes")]
    async fn list_parishes(
        &self,
        params: Parameters<FormatOnlyParams>,
    ) -> Result<CallToolResult, McpError> {
        let parishes = self
            .services
            .parishes
            .list()
            .await
            .map_err(to_mcp_error)?;
        match params.0.format {
            OutputFormat::Json => json(&parishes),
            OutputFormat::Table => text(views::parish_table().render(&parishes)),
        }
    }

    #[tool(description = "Create a parish (administrators only)")]
    async fn create_parish(
        &self,
        params: Parameters<NameParams>,
    ) -> Result<CallToolResult, McpError> {
        let parish = self
            .services
            .parishes
            .create(&params.0.name)
            .await
            .map_err(to_mcp_error)?;
        json(&parish)
    }

    #[tool(description = "List communities, optionally only those of one parish")]
    async fn list_communities(
        &self,
        params: Parameters<ListCommunitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let communities = self
            .services
            .communities
            .list(p.parish_id)
            .await
            .map_err(to_mcp_error)?;
        match p.format {
            OutputFormat::Json => json(&communities),
            OutputFormat::Table => text(views::community_table().render(&communities)),
        }
    }

    #[tool(description = "Create a community inside a parish (administrators only)")]
    async fn create_community(
        &self,
        params: Parameters<CreateCommunityParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let community = self
            .services
            .communities
            .create(p.parish_id, &p.name)
            .await
            .map_err(to_mcp_error)?;
        json(&community)
    }

    // ========================= Reports =========================

    #[tool(description = "Tithers with birthdays today (hoje), in the next 7 days (7dias) or this month (mes), soonest first")]
    async fn birthday_report(
        &self,
        params: Parameters<BirthdayReportParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let period = match p.period.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<BirthdayPeriod>().map_err(invalid_params)?,
            None => BirthdayPeriod::default(),
        };
        let birthdays = self
            .services
            .reports
            .birthdays(period, p.community_id)
            .await
            .map_err(to_mcp_error)?;
        match p.format {
            OutputFormat::Json => json(&birthdays),
            OutputFormat::Table => text(views::birthday_table().render(&birthdays)),
        }
    }

    #[tool(description = "Total contributions in a date range, with the breakdown by kind (dízimo / oferta)")]
    async fn financial_summary(
        &self,
        params: Parameters<FinancialSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let range = ReportRange {
            start_date: parse_date_param("start_date", &p.start_date)?,
            end_date: parse_date_param("end_date", &p.end_date)?,
            community_id: p.community_id,
        };
        let summary = self
            .services
            .reports
            .financial_summary(range)
            .await
            .map_err(to_mcp_error)?;
        match p.format {
            OutputFormat::Json => json(&summary),
            OutputFormat::Table => text(views::render_financial_summary(
                &summary.period,
                &summary.by_kind,
            )),
        }
    }

    #[tool(description = "Overview: active tithers, contributions on record, this month's total and today's birthdays")]
    async fn dashboard(
        &self,
        params: Parameters<FormatOnlyParams>,
    ) -> Result<CallToolResult, McpError> {
        let dashboard = self
            .services
            .reports
            .dashboard()
            .await
            .map_err(to_mcp_error)?;
        match params.0.format {
            OutputFormat::Json => json(&dashboard),
            OutputFormat::Table => text(views::render_dashboard(&dashboard)),
        }
    }

    #[tool(description = "Full contribution history and grand total for one tither")]
    async fn tither_history(
        &self,
        params: Parameters<TitherHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let history = self
            .services
            .reports
            .tither_history(p.tither_id)
            .await
            .map_err(to_mcp_error)?;
        match p.format {
            OutputFormat::Json => json(&history),
            OutputFormat::Table => text(format!(
                "{} (ID {})\nTotal: {} em {} contribuições\n{}",
                history.tither_name,
                history.tither_id,
                format_currency(history.total),
                history.count,
                views::contribution_table().render(&history.contributions)
            )),
        }
    }

    // ========================= Offline helpers =========================

    #[tool(description = "Check a CPF's check digits and return its canonical and formatted forms. Works without login.")]
    async fn validate_cpf(
        &self,
        params: Parameters<ValidateCpfParams>,
    ) -> Result<CallToolResult, McpError> {
        let raw = params.0.cpf;
        json(&serde_json::json!({
            "input": raw,
            "valid": is_valid_cpf(&raw),
            "canonical": unformat_cpf(&raw),
            "formatted": format_cpf(&raw),
        }))
    }

    #[tool(description = "Format CPF, phone, amount (BRL) and dates the way the parish office displays them. Works without login.")]
    async fn format_values(
        &self,
        params: Parameters<FormatValuesParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let amount = match p.amount.as_deref() {
            Some(raw) => Some(format_currency(parse_currency(raw).ok_or_else(|| {
                invalid_params(format!("amount is not a number: {}", raw))
            })?)),
            None => None,
        };
        let date = optional_date_param("date", p.date.as_deref())?;
        let birth_date = optional_date_param("birth_date", p.birth_date.as_deref())?;

        json(&FormattedValues {
            cpf_valid: p.cpf.as_deref().map(is_valid_cpf),
            cpf: p.cpf.as_deref().map(format_cpf),
            phone: p.phone.as_deref().map(format_phone),
            amount,
            date: date.map(format_date),
            birth_date: birth_date.map(format_date),
            age: birth_date.map(|b| calculate_age(b, today())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AsyncEcclesiaClientImpl, EcclesiaClient};
    use chrono::Months;
    use mockito::{Matcher, Server};

    fn server_at(url: String, session: Arc<Session>) -> EcclesiaMcpServer {
        let client = Arc::new(AsyncEcclesiaClientImpl::new(EcclesiaClient::with_base_url(
            url,
            session.clone(),
        ))) as Arc<dyn AsyncEcclesiaClient>;
        EcclesiaMcpServer::new(Services::from_client(client, session))
    }

    fn logged_in() -> Arc<Session> {
        let session = Session::in_memory();
        session.set_token("tool-token").unwrap();
        Arc::new(session)
    }

    fn offline() -> EcclesiaMcpServer {
        server_at("http://localhost:9".to_string(), Arc::new(Session::in_memory()))
    }

    fn body(result: &CallToolResult) -> String {
        result.content[0].as_text().unwrap().text.clone()
    }

    fn body_json(result: &CallToolResult) -> serde_json::Value {
        serde_json::from_str(&body(result)).unwrap()
    }

    fn format_only(format: OutputFormat) -> Parameters<FormatOnlyParams> {
        Parameters(FormatOnlyParams { format })
    }

    #[test]
    fn test_error_codes() {
        let err = to_mcp_error(ApiError::Validation("bad cpf".to_string()));
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = to_mcp_error(ApiError::Timeout);
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);

        let err = to_mcp_error(ApiError::Unauthorized("Not authenticated".to_string()));
        assert!(err.message.contains("login"));
    }

    #[test]
    fn test_output_format_default_and_parse() {
        let params: FormatOnlyParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.format, OutputFormat::Table);
        let params: FormatOnlyParams = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(params.format, OutputFormat::Json);
    }

    #[test]
    fn test_optional_date_param() {
        assert_eq!(optional_date_param("d", None).unwrap(), None);
        assert_eq!(optional_date_param("d", Some(" ")).unwrap(), None);
        assert_eq!(
            optional_date_param("d", Some("31/12/2024")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert!(optional_date_param("d", Some("2024-13-01")).is_err());
    }

    #[tokio::test]
    async fn test_validate_cpf_tool_reports_all_forms() {
        let server = offline();
        let result = server
            .validate_cpf(Parameters(ValidateCpfParams {
                cpf: "111.444.777-35".to_string(),
            }))
            .await
            .unwrap();

        let value = body_json(&result);
        assert_eq!(value["input"], "111.444.777-35");
        assert_eq!(value["valid"], true);
        assert_eq!(value["canonical"], "11144477735");
        assert_eq!(value["formatted"], "111.444.777-35");

        let result = server
            .validate_cpf(Parameters(ValidateCpfParams {
                cpf: "111.111.111-11".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(body_json(&result)["valid"], false);
    }

    #[tokio::test]
    async fn test_format_values_tool() {
        let birth = today().checked_sub_months(Months::new(12 * 30)).unwrap();
        let result = offline()
            .format_values(Parameters(FormatValuesParams {
                cpf: Some("11144477735".to_string()),
                phone: Some("11987654321".to_string()),
                amount: Some("R$ 1.500".to_string()),
                date: Some("2024-06-15".to_string()),
                birth_date: Some(format_date_for_input(birth)),
            }))
            .await
            .unwrap();

        let value = body_json(&result);
        assert_eq!(value["cpf"], "111.444.777-35");
        assert_eq!(value["cpf_valid"], true);
        assert_eq!(value["phone"], "(11) 98765-4321");
        assert_eq!(value["amount"], "R$ 1.500,00");
        assert_eq!(value["date"], "15/06/2024");
        assert_eq!(value["age"], 30);
    }

    #[tokio::test]
    async fn test_format_values_rejects_bad_amount() {
        let err = offline()
            .format_values(Parameters(FormatValuesParams {
                cpf: None,
                phone: None,
                amount: Some("cento e cinquenta".to_string()),
                date: None,
                birth_date: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("cento e cinquenta"));
    }

    #[tokio::test]
    async fn test_register_contribution_parses_input_and_defaults_date() {
        let mut backend = Server::new_async().await;
        let mock = backend
            .mock("POST", "/api/contribuicoes")
            .match_header("authorization", "Bearer tool-token")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "comunidade_id": 1,
                "tipo": "DIZIMO",
                "valor": "1500",
                "forma_pagamento": "PIX",
                "data_contribuicao": format_date_for_input(today()),
            })))
            .with_status(201)
            .with_body(format!(
                r#"{{"id": 31, "comunidade_id": 1, "tipo": "DIZIMO", "valor": "1500.00",
                    "data_contribuicao": "{}", "forma_pagamento": "PIX"}}"#,
                format_date_for_input(today())
            ))
            .create_async()
            .await;

        let server = server_at(backend.url(), logged_in());
        let result = server
            .register_contribution(Parameters(RegisterContributionParams {
                community_id: 1,
                kind: "dizimo".to_string(),
                amount: "R$ 1.500".to_string(),
                date: None,
                tither_id: None,
                payment_method: Some("pix".to_string()),
                reference_month: None,
                notes: None,
            }))
            .await
            .unwrap();

        mock.assert_async().await;
        let value = body_json(&result);
        assert_eq!(value["display_amount"], "R$ 1.500,00");
        assert_eq!(value["contribution"]["id"], 31);
    }

    #[tokio::test]
    async fn test_register_contribution_rejects_unknown_payment_method() {
        let err = server_at("http://localhost:9".to_string(), logged_in())
            .register_contribution(Parameters(RegisterContributionParams {
                community_id: 1,
                kind: "OFERTA".to_string(),
                amount: "20,00".to_string(),
                date: None,
                tither_id: None,
                payment_method: Some("BOLETO".to_string()),
                reference_month: None,
                notes: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_list_parishes_table_or_json() {
        let mut backend = Server::new_async().await;
        let mock = backend
            .mock("GET", "/api/paroquias")
            .with_status(200)
            .with_body(r#"[{"id": 2, "nome": "São Pedro"}, {"id": 1, "nome": "Matriz"}]"#)
            .expect(2)
            .create_async()
            .await;
        let server = server_at(backend.url(), logged_in());

        let table = body(
            &server
                .list_parishes(format_only(OutputFormat::Table))
                .await
                .unwrap(),
        );
        assert!(table.contains("│ Nome"));
        assert!(table.contains("São Pedro"));
        assert!(serde_json::from_str::<serde_json::Value>(&table).is_err());

        let value = body_json(
            &server
                .list_parishes(format_only(OutputFormat::Json))
                .await
                .unwrap(),
        );
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["nome"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"São Pedro"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_whoami_revalidates_cached_user() {
        let mut backend = Server::new_async().await;
        let mock = backend
            .mock("GET", "/api/auth/me")
            .match_header("authorization", "Bearer tool-token")
            .with_status(200)
            .with_body(r#"{"id": 1, "nome": "Secretaria Nova", "email": "s@paroquia.org"}"#)
            .create_async()
            .await;
        let session = logged_in();
        let cached = r#"{"id": 1, "nome": "Secretaria", "email": "s@paroquia.org"}"#;
        session.set_user(serde_json::from_str(cached).unwrap()).unwrap();

        let result = server_at(backend.url(), session.clone()).whoami().await.unwrap();

        mock.assert_async().await;
        let value = body_json(&result);
        assert_eq!(value["authenticated"], true);
        assert_eq!(value["user"]["nome"], "Secretaria Nova");
        assert_eq!(session.user().unwrap().name, "Secretaria Nova");
    }

    #[tokio::test]
    async fn test_dashboard_tool_renders_overview() {
        let mut backend = Server::new_async().await;
        let tithers = backend
            .mock("GET", "/api/dizimistas")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("ativo".into(), "true".into()),
                Matcher::UrlEncoded("page_size".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"items": [], "total": 42, "page": 1, "page_size": 1, "total_pages": 42}"#,
            )
            .create_async()
            .await;
        let contributions = backend
            .mock("GET", "/api/contribuicoes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"items": [], "total": 310, "page": 1, "page_size": 1, "total_pages": 310}"#,
            )
            .create_async()
            .await;
        let month = backend
            .mock("GET", "/api/reports/total-periodo")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"total": "5120.00", "quantidade": 18,
                    "data_inicio": "2024-06-01", "data_fim": "2024-06-30"}"#,
            )
            .create_async()
            .await;
        let birthdays = backend
            .mock("GET", "/api/reports/aniversariantes")
            .match_query(Matcher::UrlEncoded("periodo".into(), "hoje".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = server_at(backend.url(), logged_in())
            .dashboard(format_only(OutputFormat::Table))
            .await
            .unwrap();

        tithers.assert_async().await;
        contributions.assert_async().await;
        month.assert_async().await;
        birthdays.assert_async().await;
        let text = body(&result);
        assert!(text.contains("Dizimistas ativos: 42"));
        assert!(text.contains("Contribuições registradas: 310"));
        assert!(text.contains("R$ 5.120,00"));
        assert!(text.contains("Nenhum aniversariante hoje."));
    }
}
