//! The media plan: an ordered, deduplicated collection of selected
//! inventory lines with budgets, plus totals and group reporting.

use crate::projector::estimate_impressions;
use mediaplan_core::types::{MediumType, PlanItem, PlanKey};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Ordered plan. The dedup invariant — one line per
/// `(vendor, format, medium, start, end)` — holds after every
/// mutation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    items: Vec<PlanItem>,
}

/// Item count and summed budget.
#[derive(Debug, Clone, Serialize)]
pub struct PlanTotals {
    pub item_count: usize,
    pub total_budget: f64,
}

/// Grouping dimension for plan reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Medium,
    Vendor,
    Format,
    MediumType,
}

/// Aggregates for one group of plan lines.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub item_count: usize,
    pub total_budget: f64,
    pub total_impressions: f64,
    pub avg_rating: Option<f64>,
    pub avg_score: f64,
    /// `total_budget / total_impressions × 1000`; `None` when no
    /// impressions could be estimated.
    pub blended_cpm: Option<f64>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Append candidates, keeping the first occurrence of every key.
    /// Re-adding an existing line is a no-op: the original budget and
    /// frozen unit cost stay.
    pub fn add(&mut self, candidates: impl IntoIterator<Item = PlanItem>) {
        let mut seen: HashSet<PlanKey> = self.items.iter().map(PlanItem::key).collect();
        for candidate in candidates {
            let key = candidate.key();
            if seen.insert(key) {
                self.items.push(candidate);
            } else {
                debug!(vendor = %candidate.item.vendor, format = %candidate.item.format,
                       "duplicate plan line ignored");
            }
        }
    }

    /// Remove every line matching the key. Returns how many were
    /// dropped.
    pub fn remove(&mut self, key: &PlanKey) -> usize {
        let before = self.items.len();
        self.items.retain(|i| &i.key() != key);
        before - self.items.len()
    }

    /// Set the budget on an existing line; `false` if no line matches.
    pub fn set_budget(&mut self, key: &PlanKey, budget: f64) -> bool {
        let mut found = false;
        for item in self.items.iter_mut().filter(|i| &i.key() == key) {
            item.budget = budget;
            found = true;
        }
        found
    }

    /// Summed budgets (missing treated as zero — budgets are plain
    /// `f64`, so this is just the sum).
    pub fn totals(&self) -> PlanTotals {
        PlanTotals {
            item_count: self.items.len(),
            total_budget: self.items.iter().map(|i| i.budget).sum(),
        }
    }

    /// Budget/impression sums and rating/score averages per group,
    /// with a blended CPM per group. Groups appear in first-seen
    /// order.
    pub fn group_summary(&self, group_by: GroupBy) -> Vec<GroupSummary> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: Vec<Vec<&PlanItem>> = Vec::new();

        for item in &self.items {
            let key = group_key(item, group_by);
            match order.iter().position(|k| *k == key) {
                Some(idx) => groups[idx].push(item),
                None => {
                    order.push(key);
                    groups.push(vec![item]);
                }
            }
        }

        order
            .into_iter()
            .zip(groups)
            .map(|(key, members)| summarize_group(key, &members))
            .collect()
    }
}

fn group_key(item: &PlanItem, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::Medium => item.item.medium.clone(),
        GroupBy::Vendor => item.item.vendor.clone(),
        GroupBy::Format => item.item.format.clone(),
        GroupBy::MediumType => item.item.medium_type.to_string(),
    }
}

fn summarize_group(key: String, members: &[&PlanItem]) -> GroupSummary {
    let total_budget: f64 = members.iter().map(|i| i.budget).sum();
    let total_impressions: f64 = members
        .iter()
        .filter_map(|i| estimate_impressions(i, i.budget))
        .sum();

    let ratings: Vec<f64> = members.iter().filter_map(|i| i.item.rating).collect();
    let avg_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };
    let avg_score = members.iter().map(|i| i.item.score).sum::<f64>() / members.len() as f64;

    let blended_cpm = if total_impressions > 0.0 {
        Some(total_budget / total_impressions * 1000.0)
    } else {
        None
    };

    GroupSummary {
        key,
        item_count: members.len(),
        total_budget,
        total_impressions,
        avg_rating,
        avg_score,
        blended_cpm,
    }
}

/// ON/OFF budget split of the plan, as fractions of the total. `None`
/// when the plan has no budget at all.
pub fn mix_on_off(plan: &Plan) -> Option<(f64, f64)> {
    let total: f64 = plan.items().iter().map(|i| i.budget).sum();
    if total <= 0.0 {
        return None;
    }
    let on: f64 = plan
        .items()
        .iter()
        .filter(|i| i.item.medium_type == MediumType::On)
        .map(|i| i.budget)
        .sum();
    Some((on / total, (total - on) / total))
}
