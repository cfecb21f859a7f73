//! Tither service layer.
//!
//! Canonicalizes and validates form input before it reaches the backend:
//! documents are stripped to digits, CPF checksums are verified, and dates
//! accept either `YYYY-MM-DD` or `DD/MM/YYYY`.

use crate::domain::{parse_date, unformat_phone, Cpf, EmailAddress};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewTither, Page, PageRequest, Tither, TitherFilters, TitherUpdate};
use crate::repositories::TitherRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Autocomplete returns at most this many tithers.
pub const SEARCH_PAGE_SIZE: u32 = 10;

/// Autocomplete ignores queries shorter than this.
pub const SEARCH_MIN_CHARS: usize = 2;

const MAX_NAME_LEN: usize = 255;

/// Raw input for creating a tither, as typed by a user.
#[derive(Debug, Clone, Default)]
pub struct TitherForm {
    pub community_id: i64,
    pub name: String,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Raw input for updating a tither. `None` and blank strings leave a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TitherPatch {
    pub community_id: Option<i64>,
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

#[async_trait]
pub trait TitherService: Send + Sync {
    async fn list(&self, filters: TitherFilters) -> ApiResult<Page<Tither>>;

    /// Active tithers matching `query`, for autocomplete.
    async fn search(&self, query: &str, community_id: Option<i64>) -> ApiResult<Vec<Tither>>;

    async fn get(&self, id: i64) -> ApiResult<Tither>;

    async fn create(&self, form: TitherForm) -> ApiResult<Tither>;

    async fn update(&self, id: i64, patch: TitherPatch) -> ApiResult<Tither>;

    /// Soft delete.
    async fn deactivate(&self, id: i64) -> ApiResult<()>;
}

/// Default implementation of TitherService.
pub struct TitherServiceImpl {
    repository: Arc<dyn TitherRepository>,
}

/// Validation helper functions.
impl TitherServiceImpl {
    fn validate_id(id: i64) -> ApiResult<()> {
        if id <= 0 {
            return Err(ApiError::Validation(format!("Invalid tither id: {}", id)));
        }
        Ok(())
    }

    fn validate_name(name: &str) -> ApiResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ApiError::Validation(format!(
                "Name too long (max {} characters)",
                MAX_NAME_LEN
            )));
        }
        Ok(name.to_string())
    }

    /// Canonical CPF digits, rejecting a bad checksum.
    fn canonical_cpf(raw: Option<&str>) -> ApiResult<Option<String>> {
        match non_blank(raw) {
            Some(raw) => Ok(Some(Cpf::new(raw)?.into_inner())),
            None => Ok(None),
        }
    }

    fn canonical_phone(raw: Option<&str>) -> ApiResult<Option<String>> {
        match non_blank(raw) {
            Some(raw) => {
                let digits = unformat_phone(raw);
                if digits.is_empty() {
                    return Err(ApiError::Validation(format!(
                        "Phone number has no digits: {}",
                        raw
                    )));
                }
                Ok(Some(digits))
            }
            None => Ok(None),
        }
    }

    fn canonical_email(raw: Option<&str>) -> ApiResult<Option<String>> {
        match non_blank(raw) {
            Some(raw) => Ok(Some(EmailAddress::new(raw)?.into_inner())),
            None => Ok(None),
        }
    }

    fn canonical_birth_date(raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
        match non_blank(raw) {
            Some(raw) => parse_date(raw).map(Some).ok_or_else(|| {
                ApiError::Validation(format!(
                    "Invalid birth date (expected YYYY-MM-DD or DD/MM/YYYY): {}",
                    raw
                ))
            }),
            None => Ok(None),
        }
    }

    fn build_new(form: TitherForm) -> ApiResult<NewTither> {
        if form.community_id <= 0 {
            return Err(ApiError::Validation("A community is required".to_string()));
        }
        Ok(NewTither {
            community_id: form.community_id,
            name: Self::validate_name(&form.name)?,
            cpf: Self::canonical_cpf(form.cpf.as_deref())?,
            phone: Self::canonical_phone(form.phone.as_deref())?,
            email: Self::canonical_email(form.email.as_deref())?,
            birth_date: Self::canonical_birth_date(form.birth_date.as_deref())?,
            address: non_blank(form.address.as_deref()).map(str::to_string),
            notes: non_blank(form.notes.as_deref()).map(str::to_string),
        })
    }

    fn build_update(patch: TitherPatch) -> ApiResult<TitherUpdate> {
        let name = match non_blank(patch.name.as_deref()) {
            Some(name) => Some(Self::validate_name(name)?),
            None => None,
        };
        Ok(TitherUpdate {
            community_id: patch.community_id,
            name,
            cpf: Self::canonical_cpf(patch.cpf.as_deref())?,
            phone: Self::canonical_phone(patch.phone.as_deref())?,
            email: Self::canonical_email(patch.email.as_deref())?,
            birth_date: Self::canonical_birth_date(patch.birth_date.as_deref())?,
            address: non_blank(patch.address.as_deref()).map(str::to_string),
            active: patch.active,
            notes: non_blank(patch.notes.as_deref()).map(str::to_string),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl TitherServiceImpl {
    pub fn new(repository: Arc<dyn TitherRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TitherService for TitherServiceImpl {
    async fn list(&self, filters: TitherFilters) -> ApiResult<Page<Tither>> {
        self.repository.list(&filters).await
    }

    async fn search(&self, query: &str, community_id: Option<i64>) -> ApiResult<Vec<Tither>> {
        let query = query.trim();
        if query.chars().count() < SEARCH_MIN_CHARS {
            return Ok(Vec::new());
        }

        let filters = TitherFilters {
            page: PageRequest::new(1, SEARCH_PAGE_SIZE),
            search: Some(query.to_string()),
            community_id,
            active: Some(true),
        };
        Ok(self.repository.list(&filters).await?.items)
    }

    async fn get(&self, id: i64) -> ApiResult<Tither> {
        Self::validate_id(id)?;
        self.repository.get(id).await
    }

    async fn create(&self, form: TitherForm) -> ApiResult<Tither> {
        let payload = Self::build_new(form)?;
        let tither = self.repository.create(&payload).await?;
        tracing::info!("Created tither {} ({})", tither.id, tither.name);
        Ok(tither)
    }

    async fn update(&self, id: i64, patch: TitherPatch) -> ApiResult<Tither> {
        Self::validate_id(id)?;
        let payload = Self::build_update(patch)?;
        self.repository.update(id, &payload).await
    }

    async fn deactivate(&self, id: i64) -> ApiResult<()> {
        Self::validate_id(id)?;
        self.repository.delete(id).await?;
        tracing::info!("Deactivated tither {}", id);
        Ok(())
    }
}
