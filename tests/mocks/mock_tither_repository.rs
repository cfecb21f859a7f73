use super::CallCounts;
use async_trait::async_trait;
use ecclesia_mcp_server::error::{ApiError, ApiResult};
use ecclesia_mcp_server::models::{NewTither, Page, Tither, TitherFilters, TitherUpdate};
use ecclesia_mcp_server::repositories::TitherRepository;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Mock tither repository for testing.
///
/// Keeps tithers in memory, applies the same filters the backend does, and
/// records the last filters and payloads it received.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockTitherRepository {
    tithers: Arc<Mutex<BTreeMap<i64, Tither>>>,
    last_filters: Arc<Mutex<Option<TitherFilters>>>,
    last_created: Arc<Mutex<Option<NewTither>>>,
    last_update: Arc<Mutex<Option<TitherUpdate>>>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockTitherRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tither(&self, tither: Tither) {
        self.tithers.lock().unwrap().insert(tither.id, tither);
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }

    pub fn last_filters(&self) -> Option<TitherFilters> {
        self.last_filters.lock().unwrap().clone()
    }

    pub fn last_created(&self) -> Option<NewTither> {
        self.last_created.lock().unwrap().clone()
    }

    pub fn last_update(&self) -> Option<TitherUpdate> {
        self.last_update.lock().unwrap().clone()
    }

    pub fn stored(&self, id: i64) -> Option<Tither> {
        self.tithers.lock().unwrap().get(&id).cloned()
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::NotFound(format!("Dizimista {} não encontrado", id))
    }
}

#[async_trait]
impl TitherRepository for MockTitherRepository {
    async fn list(&self, filters: &TitherFilters) -> ApiResult<Page<Tither>> {
        self.calls.track("list");
        *self.last_filters.lock().unwrap() = Some(filters.clone());

        let search = filters.search.as_deref().map(str::to_lowercase);
        let matching: Vec<Tither> = self
            .tithers
            .lock()
            .unwrap()
            .values()
            .filter(|t| filters.community_id.map_or(true, |id| t.community_id == id))
            .filter(|t| filters.active.map_or(true, |active| t.active == active))
            .filter(|t| {
                search.as_deref().map_or(true, |s| {
                    t.name.to_lowercase().contains(s)
                        || t.phone.as_deref().is_some_and(|p| p.contains(s))
                        || t.email.as_deref().is_some_and(|e| e.to_lowercase().contains(s))
                })
            })
            .cloned()
            .collect();

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

    async fn get(&self, id: i64) -> ApiResult<Tither> {
        self.calls.track("get");
        self.tithers
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, tither: &NewTither) -> ApiResult<Tither> {
        self.calls.track("create");
        *self.last_created.lock().unwrap() = Some(tither.clone());

        let mut tithers = self.tithers.lock().unwrap();
        if let Some(cpf) = &tither.cpf {
            if tithers.values().any(|t| t.cpf.as_ref() == Some(cpf)) {
                return Err(ApiError::InvalidRequest("CPF já cadastrado".to_string()));
            }
        }
        let id = tithers.keys().next_back().copied().unwrap_or(0) + 1;
        let created = Tither {
            id,
            community_id: tither.community_id,
            name: tither.name.clone(),
            cpf: tither.cpf.clone(),
            phone: tither.phone.clone(),
            email: tither.email.clone(),
            birth_date: tither.birth_date,
            address: tither.address.clone(),
            active: true,
            notes: tither.notes.clone(),
            created_at: None,
            updated_at: None,
        };
        tithers.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, update: &TitherUpdate) -> ApiResult<Tither> {
        self.calls.track("update");
        *self.last_update.lock().unwrap() = Some(update.clone());

        let mut tithers = self.tithers.lock().unwrap();
        let tither = tithers.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        if let Some(name) = &update.name {
            tither.name = name.clone();
        }
        if let Some(community_id) = update.community_id {
            tither.community_id = community_id;
        }
        if update.cpf.is_some() {
            tither.cpf = update.cpf.clone();
        }
        if update.phone.is_some() {
            tither.phone = update.phone.clone();
        }
        if update.email.is_some() {
            tither.email = update.email.clone();
        }
        if update.birth_date.is_some() {
            tither.birth_date = update.birth_date;
        }
        if let Some(active) = update.active {
            tither.active = active;
        }
        Ok(tither.clone())
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.calls.track("delete");
        let mut tithers = self.tithers.lock().unwrap();
        let tither = tithers.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        tither.active = false;
        Ok(())
    }
}
