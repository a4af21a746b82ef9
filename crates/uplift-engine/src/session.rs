use anyhow::{bail, Result};
use uplift_core::UpgradeCandidate;

/// A multi-select list over one resolution pass's candidates.
///
/// Indices are stable for the session lifetime: candidates are never
/// inserted, removed, or reordered, only their selected bit toggles.
/// Every candidate starts selected; the operator deselects to exclude.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    candidates: Vec<UpgradeCandidate>,
    selected: Vec<bool>,
}

impl SelectionSession {
    pub fn new(candidates: Vec<UpgradeCandidate>) -> Self {
        let selected = vec![true; candidates.len()];
        Self {
            candidates,
            selected,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[UpgradeCandidate] {
        &self.candidates
    }

    pub fn candidate(&self, index: usize) -> Option<&UpgradeCandidate> {
        self.candidates.get(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.set(index, true)
    }

    pub fn unselect(&mut self, index: usize) -> Result<()> {
        self.set(index, false)
    }

    pub fn toggle(&mut self, index: usize) -> Result<()> {
        let current = self.is_selected(index);
        self.set(index, !current)
    }

    pub fn select_all(&mut self) {
        self.selected.fill(true);
    }

    pub fn unselect_all(&mut self) {
        self.selected.fill(false);
    }

    /// Selected indices in ascending order; this is the commit order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(index, &selected)| selected.then_some(index))
            .collect()
    }

    /// Nothing selected means "nothing to do", not an error.
    pub fn is_selection_empty(&self) -> bool {
        !self.selected.iter().any(|&selected| selected)
    }

    fn set(&mut self, index: usize, value: bool) -> Result<()> {
        if index >= self.candidates.len() {
            bail!(
                "selection-index-out-of-range: index {} with {} candidates",
                index,
                self.candidates.len()
            );
        }
        self.selected[index] = value;
        Ok(())
    }
}
