//! Result aggregation
//!
//! The only mutable state shared between in-flight validation jobs. Append
//! is serialized through a tokio mutex; the final snapshot is sorted so a
//! run always reports in (category, address, protocol) order no matter
//! which attempts finished first.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::validation::results::ValidationResult;

#[derive(Debug, Default, Clone)]
pub struct ResultAggregator {
    results: Arc<Mutex<Vec<ValidationResult>>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed attempt. Safe to call from any worker.
    pub async fn record(&self, result: ValidationResult) {
        self.results.lock().await.push(result);
    }

    pub async fn len(&self) -> usize {
        self.results.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.results.lock().await.is_empty()
    }

    /// Take the final snapshot, sorted for stable reporting
    pub async fn into_results(self) -> Vec<ValidationResult> {
        let mut results = {
            let mut guard = self.results.lock().await;
            std::mem::take(&mut *guard)
        };
        results.sort_by(|a, b| {
            (a.category, &a.address, a.protocol).cmp(&(b.category, &b.address, b.protocol))
        });
        results
    }
}
