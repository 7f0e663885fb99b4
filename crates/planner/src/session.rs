//! Per-session state: the unified catalog currently loaded and the
//! plan being built on top of it. One explicit struct owned by the
//! caller — no ambient globals — so the whole flow is testable without
//! any UI attached.

use crate::plan::Plan;
use mediaplan_core::types::{CostUnit, InventoryItem, PlanItem, PlanKey};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub catalog: Vec<InventoryItem>,
    pub plan: Plan,
}

impl SessionState {
    pub fn new(catalog: Vec<InventoryItem>) -> Self {
        Self {
            catalog,
            plan: Plan::new(),
        }
    }

    /// Select catalog rows (by index into the current catalog) into the
    /// plan. The pricing unit and its current value are frozen on the
    /// plan line at this moment; later re-unification of the catalog
    /// does not touch them. Out-of-range indices are skipped.
    ///
    /// Returns how many lines the plan grew by (duplicates of existing
    /// lines count zero).
    pub fn add_selection(
        &mut self,
        indices: &[usize],
        unit: Option<CostUnit>,
        budget: f64,
    ) -> usize {
        let before = self.plan.len();

        let candidates: Vec<PlanItem> = indices
            .iter()
            .filter_map(|&idx| self.catalog.get(idx))
            .map(|item| {
                let resolved = unit.or_else(|| item.first_available_unit());
                let mut line = PlanItem::new(item.clone());
                line.selected_unit = resolved;
                line.selected_unit_cost = resolved.and_then(|u| item.unit_cost(u));
                line.budget = budget;
                line
            })
            .collect();

        self.plan.add(candidates);
        let added = self.plan.len() - before;
        debug!(added, plan_size = self.plan.len(), "selection added to plan");
        added
    }

    /// Drop every plan line with this key.
    pub fn remove(&mut self, key: &PlanKey) -> usize {
        self.plan.remove(key)
    }

    /// Update the budget of an existing plan line.
    pub fn set_budget(&mut self, key: &PlanKey, budget: f64) -> bool {
        self.plan.set_budget(key, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<InventoryItem> {
        vec![
            InventoryItem {
                vendor: "MedioX".into(),
                format: "300x250".into(),
                medium: "Display".into(),
                cpm: Some(6.0),
                cpc: Some(1.25),
                ..Default::default()
            },
            InventoryItem {
                vendor: "Canal A".into(),
                format: "Prime Time".into(),
                medium: "TV".into(),
                cost: Some(45_000.0),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_add_selection_freezes_unit_cost() {
        let mut session = SessionState::new(catalog());
        let added = session.add_selection(&[0], Some(CostUnit::Cpc), 2_000.0);
        assert_eq!(added, 1);

        let line = &session.plan.items()[0];
        assert_eq!(line.selected_unit, Some(CostUnit::Cpc));
        assert_eq!(line.selected_unit_cost, Some(1.25));

        // Catalog changes after selection do not reach the plan line.
        session.catalog[0].cpc = Some(99.0);
        assert_eq!(session.plan.items()[0].selected_unit_cost, Some(1.25));
    }

    #[test]
    fn test_add_selection_resolves_unit_when_unspecified() {
        let mut session = SessionState::new(catalog());
        session.add_selection(&[0, 1], None, 1_000.0);

        let lines = session.plan.items();
        assert_eq!(lines[0].selected_unit, Some(CostUnit::Cpm));
        // TV row has no unit costs at all.
        assert_eq!(lines[1].selected_unit, None);
        assert_eq!(lines[1].selected_unit_cost, None);
    }

    #[test]
    fn test_duplicate_selection_counts_zero() {
        let mut session = SessionState::new(catalog());
        assert_eq!(session.add_selection(&[0], None, 1_000.0), 1);
        assert_eq!(session.add_selection(&[0], None, 5_000.0), 0);
        // First budget kept.
        assert!((session.plan.items()[0].budget - 1_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_indices_skipped() {
        let mut session = SessionState::new(catalog());
        assert_eq!(session.add_selection(&[7, 1], None, 1_000.0), 1);
        assert_eq!(session.plan.items()[0].item.vendor, "Canal A");
    }

    #[test]
    fn test_remove_and_set_budget_roundtrip() {
        let mut session = SessionState::new(catalog());
        session.add_selection(&[0, 1], None, 1_000.0);
        let key = session.plan.items()[0].key();

        assert!(session.set_budget(&key, 4_000.0));
        assert!((session.plan.totals().total_budget - 5_000.0).abs() < f64::EPSILON);

        assert_eq!(session.remove(&key), 1);
        assert_eq!(session.plan.len(), 1);
    }
}
