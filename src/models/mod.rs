//! Data models for the Ecclesia parish management API.
//!
//! Rust field names are English; serde renames map them to the backend's
//! Portuguese JSON fields.

pub mod contribution;
pub mod pagination;
pub mod parish;
pub mod report;
pub mod tither;
pub mod user;

pub use contribution::{
    Contribution, ContributionFilters, ContributionKind, ContributionUpdate, NewContribution,
    PaymentMethod,
};
pub use pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use parish::{Community, CommunityUpdate, NewCommunity, NewParish, Parish, ParishUpdate};
pub use report::{
    Birthday, BirthdayPeriod, KindTotal, KindTotals, PeriodTotal, ReportRange, TitherHistory,
};
pub use tither::{NewTither, Tither, TitherFilters, TitherUpdate};
pub use user::{LoginRequest, Role, Token, User};
