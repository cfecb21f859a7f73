use super::CallCounts;
use async_trait::async_trait;
use ecclesia_mcp_server::error::{ApiError, ApiResult};
use ecclesia_mcp_server::models::{
    Birthday, BirthdayPeriod, Contribution, ContributionKind, KindTotal, KindTotals,
    PeriodTotal, ReportRange, TitherHistory,
};
use ecclesia_mcp_server::repositories::ReportRepository;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock report repository that aggregates an in-memory contribution ledger.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockReportRepository {
    birthdays: Arc<Mutex<Vec<Birthday>>>,
    contributions: Arc<Mutex<Vec<Contribution>>>,
    tither_names: Arc<Mutex<HashMap<i64, String>>>,
    last_period: Arc<Mutex<Option<BirthdayPeriod>>>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_birthday(&self, birthday: Birthday) {
        self.birthdays.lock().unwrap().push(birthday);
    }

    pub fn add_contribution(&self, contribution: Contribution) {
        self.contributions.lock().unwrap().push(contribution);
    }

    pub fn add_tither(&self, id: i64, name: &str) {
        self.tither_names.lock().unwrap().insert(id, name.to_string());
    }

    pub fn last_period(&self) -> Option<BirthdayPeriod> {
        *self.last_period.lock().unwrap()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }

    fn in_range(&self, range: &ReportRange) -> Vec<Contribution> {
        self.contributions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.date >= range.start_date && c.date <= range.end_date)
            .filter(|c| range.community_id.map_or(true, |id| c.community_id == id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReportRepository for MockReportRepository {
    async fn birthdays(
        &self,
        period: BirthdayPeriod,
        community_id: Option<i64>,
    ) -> ApiResult<Vec<Birthday>> {
        self.calls.track("birthdays");
        *self.last_period.lock().unwrap() = Some(period);
        Ok(self
            .birthdays
            .lock()
            .unwrap()
            .iter()
            .filter(|b| community_id.map_or(true, |id| b.community_id == id))
            .cloned()
            .collect())
    }

    async fn total_by_period(&self, range: &ReportRange) -> ApiResult<PeriodTotal> {
        self.calls.track("total_by_period");
        let rows = self.in_range(range);
        Ok(PeriodTotal {
            total: rows.iter().map(|c| c.amount).sum(),
            count: rows.len() as u64,
            start_date: range.start_date,
            end_date: range.end_date,
            community_id: range.community_id,
        })
    }

    async fn totals_by_kind(&self, range: &ReportRange) -> ApiResult<KindTotals> {
        self.calls.track("totals_by_kind");
        let rows = self.in_range(range);
        let totals = [ContributionKind::Dizimo, ContributionKind::Oferta]
            .into_iter()
            .filter_map(|kind| {
                let of_kind: Vec<&Contribution> = rows.iter().filter(|c| c.kind == kind).collect();
                if of_kind.is_empty() {
                    return None;
                }
                Some(KindTotal {
                    kind,
                    total: of_kind.iter().map(|c| c.amount).sum::<Decimal>(),
                    count: of_kind.len() as u64,
                })
            })
            .collect();
        Ok(KindTotals {
            start_date: range.start_date,
            end_date: range.end_date,
            community_id: range.community_id,
            totals,
        })
    }

    async fn tither_history(&self, tither_id: i64) -> ApiResult<TitherHistory> {
        self.calls.track("tither_history");
        let name = self
            .tither_names
            .lock()
            .unwrap()
            .get(&tither_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Dizimista {} não encontrado", tither_id)))?;
        let contributions: Vec<Contribution> = self
            .contributions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.tither_id == Some(tither_id))
            .cloned()
            .collect();
        Ok(TitherHistory {
            tither_id,
            tither_name: name,
            total: contributions.iter().map(|c| c.amount).sum(),
            count: contributions.len() as u64,
            contributions,
        })
    }
}
