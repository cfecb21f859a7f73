use super::CallCounts;
use async_trait::async_trait;
use ecclesia_mcp_server::error::{ApiError, ApiResult};
use ecclesia_mcp_server::models::{
    Contribution, ContributionFilters, ContributionUpdate, NewContribution, Page,
};
use ecclesia_mcp_server::repositories::ContributionRepository;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Mock contribution repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockContributionRepository {
    contributions: Arc<Mutex<BTreeMap<i64, Contribution>>>,
    last_created: Arc<Mutex<Option<NewContribution>>>,
    last_update: Arc<Mutex<Option<ContributionUpdate>>>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockContributionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_contribution(&self, contribution: Contribution) {
        self.contributions
            .lock()
            .unwrap()
            .insert(contribution.id, contribution);
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }

    pub fn last_created(&self) -> Option<NewContribution> {
        self.last_created.lock().unwrap().clone()
    }

    pub fn last_update(&self) -> Option<ContributionUpdate> {
        self.last_update.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.contributions.lock().unwrap().len()
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::NotFound(format!("Contribuição {} não encontrada", id))
    }
}

#[async_trait]
impl ContributionRepository for MockContributionRepository {
    async fn list(&self, filters: &ContributionFilters) -> ApiResult<Page<Contribution>> {
        self.calls.track("list");

        // Newest first, as the backend orders them
        let mut matching: Vec<Contribution> = self
            .contributions
            .lock()
            .unwrap()
            .values()
            .filter(|c| filters.tither_id.map_or(true, |id| c.tither_id == Some(id)))
            .filter(|c| filters.community_id.map_or(true, |id| c.community_id == id))
            .filter(|c| filters.kind.map_or(true, |kind| c.kind == kind))
            .filter(|c| filters.start_date.map_or(true, |d| c.date >= d))
            .filter(|c| filters.end_date.map_or(true, |d| c.date <= d))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        let page_size = filters.page.page_size();
        let page = filters.page.page();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .collect();
        Ok(Page {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size as u64) as u32,
        })
    }

    async fn get(&self, id: i64) -> ApiResult<Contribution> {
        self.calls.track("get");
        self.contributions
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, contribution: &NewContribution) -> ApiResult<Contribution> {
        self.calls.track("create");
        *self.last_created.lock().unwrap() = Some(contribution.clone());

        let mut contributions = self.contributions.lock().unwrap();
        let id = contributions.keys().next_back().copied().unwrap_or(0) + 1;
        let created = Contribution {
            id,
            tither_id: contribution.tither_id,
            community_id: contribution.community_id,
            kind: contribution.kind,
            amount: contribution.amount,
            date: contribution.date,
            payment_method: contribution.payment_method,
            reference_month: contribution.reference_month,
            notes: contribution.notes.clone(),
            created_at: None,
            updated_at: None,
        };
        contributions.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, update: &ContributionUpdate) -> ApiResult<Contribution> {
        self.calls.track("update");
        *self.last_update.lock().unwrap() = Some(update.clone());

        let mut contributions = self.contributions.lock().unwrap();
        let contribution = contributions.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        if let Some(amount) = update.amount {
            contribution.amount = amount;
        }
        if let Some(kind) = update.kind {
            contribution.kind = kind;
        }
        if let Some(date) = update.date {
            contribution.date = date;
        }
        if update.reference_month.is_some() {
            contribution.reference_month = update.reference_month;
        }
        Ok(contribution.clone())
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.calls.track("delete");
        self.contributions
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}
