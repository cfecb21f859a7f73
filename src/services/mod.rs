//! Application service layer.
//!
//! Services hold the form rules (canonicalize, validate, then submit) and sit
//! between the MCP handlers and the repositories.

mod auth_service;
mod contribution_service;
mod parish_service;
mod report_service;
mod tither_service;

pub use auth_service::{AuthService, AuthServiceImpl};
pub use contribution_service::{
    ContributionForm, ContributionPatch, ContributionService, ContributionServiceImpl,
};
pub use parish_service::{
    CommunityService, CommunityServiceImpl, ParishService, ParishServiceImpl,
};
pub use report_service::{Dashboard, FinancialSummary, ReportService, ReportServiceImpl};
pub use tither_service::{
    TitherForm, TitherPatch, TitherService, TitherServiceImpl, SEARCH_MIN_CHARS,
    SEARCH_PAGE_SIZE,
};
