use anyhow::{bail, Result};
use uplift_core::{PackageStore, UpgradeCandidate};

use crate::executor::{upgrade_candidate, UpgradeFailure};

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub index: usize,
    pub name: String,
    pub result: Result<(), UpgradeFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .count()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .map(|outcome| outcome.name.as_str())
            .collect()
    }
}

pub fn run_batch(
    store: &mut dyn PackageStore,
    candidates: &[UpgradeCandidate],
    indices: &[usize],
) -> Result<BatchReport> {
    run_batch_with_observer(store, candidates, indices, |_| {})
}

/// Drive the executor over the committed indices in ascending order.
///
/// Index validation happens up front, before any external mutation. After
/// that, one candidate is fully resolved (success or failure) before the
/// next begins, and a per-item failure never stops the remaining items —
/// a batch of N selections always attempts all N. The observer sees each
/// outcome as it lands.
pub fn run_batch_with_observer<F>(
    store: &mut dyn PackageStore,
    candidates: &[UpgradeCandidate],
    indices: &[usize],
    mut observe: F,
) -> Result<BatchReport>
where
    F: FnMut(&BatchOutcome),
{
    for &index in indices {
        if index >= candidates.len() {
            bail!(
                "selection-index-out-of-range: index {} with {} candidates",
                index,
                candidates.len()
            );
        }
    }

    let mut outcomes = Vec::with_capacity(indices.len());
    for &index in indices {
        let candidate = &candidates[index];
        let result = upgrade_candidate(store, candidate);
        let outcome = BatchOutcome {
            index,
            name: candidate.name().to_string(),
            result,
        };
        observe(&outcome);
        outcomes.push(outcome);
    }

    Ok(BatchReport { outcomes })
}
