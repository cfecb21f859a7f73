//! Ecclesia MCP Server - a Model Context Protocol server for the Ecclesia parish
//! tithe management system.
//!
//! The server lets AI assistants manage tithers (dizimistas), record dízimos and
//! ofertas, browse parishes and communities, and pull birthday and financial reports
//! from an Ecclesia backend, while applying the same Brazilian formatting and
//! validation rules (CPF, phone, BRL currency, dates) the parish office uses.
//!
//! # Architecture
//!
//! - **domain**: CPF, phone, email, currency and date helpers plus value objects
//! - **models**: API entities (users, parishes, communities, tithers, contributions, reports)
//! - **error**: Error types for API, configuration and session failures
//! - **config**: Configuration from environment variables
//! - **session**: Bearer token and current user, optionally persisted to disk
//! - **client**: HTTP client for the Ecclesia REST API and its async wrapper
//! - **repositories**: Data access traits over the client
//! - **services**: Form rules (canonicalize, validate, submit) and report assembly
//! - **table**: Plain-text table rendering for tool output
//! - **server**: MCP protocol server and tool handlers

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod session;
pub mod table;

pub use client::{AsyncEcclesiaClient, AsyncEcclesiaClientImpl, EcclesiaClient};
pub use config::{Config, Credentials};
pub use error::{ApiError, ApiResult, ConfigError, SessionError};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{
    Birthday, BirthdayPeriod, Community, Contribution, ContributionKind, Page, Parish,
    PaymentMethod, Tither, User,
};
pub use server::{EcclesiaMcpServer, Services};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
