//! In-memory repository doubles shared by the integration tests.

mod mock_auth_repository;
mod mock_contribution_repository;
mod mock_report_repository;
mod mock_tither_repository;

#[allow(unused_imports)]
pub use mock_auth_repository::MockAuthRepository;
#[allow(unused_imports)]
pub use mock_contribution_repository::MockContributionRepository;
#[allow(unused_imports)]
pub use mock_report_repository::MockReportRepository;
#[allow(unused_imports)]
pub use mock_tither_repository::MockTitherRepository;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-method call counter.
#[derive(Clone, Default)]
pub struct CallCounts(Arc<Mutex<HashMap<String, usize>>>);

#[allow(dead_code)]
impl CallCounts {
    pub fn track(&self, method: &str) {
        let mut counts = self.0.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, method: &str) -> usize {
        *self.0.lock().unwrap().get(method).unwrap_or(&0)
    }

    pub fn reset(&self) {
        self.0.lock().unwrap().clear();
    }
}
