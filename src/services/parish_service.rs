//! Parish and community service layer.

use crate::error::{ApiError, ApiResult};
use crate::models::{Community, CommunityUpdate, NewCommunity, NewParish, Parish, ParishUpdate};
use crate::repositories::{CommunityRepository, ParishRepository};
use async_trait::async_trait;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 255;

fn validate_name(kind: &str, name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation(format!("{} name cannot be empty", kind)));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::Validation(format!(
            "{} name too long (max {} characters)",
            kind, MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_id(kind: &str, id: i64) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::Validation(format!("Invalid {} id: {}", kind, id)));
    }
    Ok(())
}

#[async_trait]
pub trait ParishService: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<Parish>>;
    async fn get(&self, id: i64) -> ApiResult<Parish>;
    async fn create(&self, name: &str) -> ApiResult<Parish>;
    async fn rename(&self, id: i64, name: &str) -> ApiResult<Parish>;
    async fn delete(&self, id: i64) -> ApiResult<()>;
}

pub struct ParishServiceImpl {
    repository: Arc<dyn ParishRepository>,
}

impl ParishServiceImpl {
    pub fn new(repository: Arc<dyn ParishRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ParishService for ParishServiceImpl {
    async fn list(&self) -> ApiResult<Vec<Parish>> {
        let mut parishes = self.repository.list().await?;
        parishes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parishes)
    }

    async fn get(&self, id: i64) -> ApiResult<Parish> {
        validate_id("parish", id)?;
        self.repository.get(id).await
    }

    async fn create(&self, name: &str) -> ApiResult<Parish> {
        let name = validate_name("Parish", name)?;
        self.repository.create(&NewParish { name }).await
    }

    async fn rename(&self, id: i64, name: &str) -> ApiResult<Parish> {
        validate_id("parish", id)?;
        let name = validate_name("Parish", name)?;
        self.repository
            .update(id, &ParishUpdate { name: Some(name) })
            .await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        validate_id("parish", id)?;
        self.repository.delete(id).await
    }
}

#[async_trait]
pub trait CommunityService: Send + Sync {
    async fn list(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>>;
    async fn get(&self, id: i64) -> ApiResult<Community>;
    async fn create(&self, parish_id: i64, name: &str) -> ApiResult<Community>;
    async fn update(&self, id: i64, update: CommunityUpdate) -> ApiResult<Community>;
    async fn delete(&self, id: i64) -> ApiResult<()>;
}

pub struct CommunityServiceImpl {
    repository: Arc<dyn CommunityRepository>,
}

impl CommunityServiceImpl {
    pub fn new(repository: Arc<dyn CommunityRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommunityService for CommunityServiceImpl {
    async fn list(&self, parish_id: Option<i64>) -> ApiResult<Vec<Community>> {
        if let Some(id) = parish_id {
            validate_id("parish", id)?;
        }
        let mut communities = self.repository.list(parish_id).await?;
        communities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(communities)
    }

    async fn get(&self, id: i64) -> ApiResult<Community> {
        validate_id("community", id)?;
        self.repository.get(id).await
    }

    async fn create(&self, parish_id: i64, name: &str) -> ApiResult<Community> {
        validate_id("parish", parish_id)?;
        let name = validate_name("Community", name)?;
        self.repository
            .create(&NewCommunity { parish_id, name })
            .await
    }

    async fn update(&self, id: i64, update: CommunityUpdate) -> ApiResult<Community> {
        validate_id("community", id)?;
        let name = update
            .name
            .as_deref()
            .map(|n| validate_name("Community", n))
            .transpose()?;
        if let Some(parish_id) = update.parish_id {
            validate_id("parish", parish_id)?;
        }
        self.repository
            .update(
                id,
                &CommunityUpdate {
                    parish_id: update.parish_id,
                    name,
                },
            )
            .await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        validate_id("community", id)?;
        self.repository.delete(id).await
    }
}
