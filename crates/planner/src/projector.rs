//! Budget-to-impressions projection.
//!
//! Every estimate starts from the line's pricing unit and walks the
//! funnel back to impressions through click-through (`ctr`) and
//! conversion (`cvr`) benchmarks. When a required unit cost or
//! benchmark is missing the answer is `None` — never a fabricated
//! number.

use mediaplan_core::types::{CostUnit, PlanItem};

/// Click-through and conversion benchmarks for one channel.
#[derive(Debug, Clone, Copy)]
pub struct Benchmarks {
    pub ctr: f64,
    pub cvr: f64,
}

/// Default benchmarks per channel, matched by substring on the channel
/// label. Demo heuristics, not market data.
const CHANNEL_BENCHMARKS: &[(&str, Benchmarks)] = &[
    ("Display", Benchmarks { ctr: 0.008, cvr: 0.03 }),
    ("Video", Benchmarks { ctr: 0.003, cvr: 0.02 }),
    ("Social", Benchmarks { ctr: 0.015, cvr: 0.04 }),
    ("Search", Benchmarks { ctr: 0.03, cvr: 0.05 }),
    ("TV", Benchmarks { ctr: 0.0005, cvr: 0.005 }),
    ("Radio", Benchmarks { ctr: 0.0002, cvr: 0.003 }),
    ("OOH", Benchmarks { ctr: 0.0001, cvr: 0.002 }),
    ("Print", Benchmarks { ctr: 0.0002, cvr: 0.002 }),
];

const FALLBACK: Benchmarks = Benchmarks { ctr: 0.01, cvr: 0.03 };

/// Benchmarks for a channel label, falling back to the generic pair
/// when no channel key matches.
pub fn benchmarks_for(medium: &str) -> Benchmarks {
    let m = medium.trim().to_lowercase();
    CHANNEL_BENCHMARKS
        .iter()
        .find(|(key, _)| m.contains(&key.to_lowercase()))
        .map(|(_, b)| *b)
        .unwrap_or(FALLBACK)
}

/// The unit a plan line is priced by: the explicit selection when set,
/// otherwise the first of CPM, CPC, CPL, CPA with a positive value.
pub fn selected_unit(item: &PlanItem) -> Option<CostUnit> {
    item.selected_unit.or_else(|| item.item.first_available_unit())
}

/// The unit cost shown to the user for a plan line: the frozen
/// selection-time cost when present, else the first positive of
/// CPM/CPC/CPL/CPA, else the raw row cost, else 0.0.
pub fn visible_unit_cost(item: &PlanItem) -> f64 {
    let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);
    positive(item.selected_unit_cost)
        .or_else(|| {
            CostUnit::ALL
                .into_iter()
                .find_map(|u| positive(item.item.unit_cost(u)))
        })
        .or_else(|| positive(item.item.cost))
        .unwrap_or(0.0)
}

/// Estimate impressions delivered by `budget` on this plan line.
///
/// - CPM: `budget / CPM × 1000`
/// - CPC: `budget / CPC` clicks, divided by `ctr`
/// - CPL: leads → clicks via `cvr`, then clicks → impressions via `ctr`
/// - CPA: actions → leads → clicks, reusing `cvr` for both hops (the
///   model assumes uniform conversion at every funnel stage), then
///   `ctr`
///
/// Item-level benchmarks win over channel defaults. `None` when the
/// needed unit cost or benchmark is missing or non-positive.
pub fn estimate_impressions(item: &PlanItem, budget: f64) -> Option<f64> {
    let unit = selected_unit(item)?;
    let unit_cost = item.item.unit_cost(unit).filter(|v| *v > 0.0)?;

    let defaults = benchmarks_for(&item.item.medium);
    let ctr = item.item.ctr.filter(|v| *v > 0.0).unwrap_or(defaults.ctr);
    let cvr = item.item.cvr.filter(|v| *v > 0.0).unwrap_or(defaults.cvr);

    match unit {
        CostUnit::Cpm => Some(budget / unit_cost * 1000.0),
        CostUnit::Cpc => {
            if ctr <= 0.0 {
                return None;
            }
            let clicks = budget / unit_cost;
            Some(clicks / ctr)
        }
        CostUnit::Cpl => {
            if ctr <= 0.0 || cvr <= 0.0 {
                return None;
            }
            let leads = budget / unit_cost;
            let clicks = leads / cvr;
            Some(clicks / ctr)
        }
        CostUnit::Cpa => {
            if ctr <= 0.0 || cvr <= 0.0 {
                return None;
            }
            let actions = budget / unit_cost;
            let leads = actions / cvr;
            let clicks = leads / cvr;
            Some(clicks / ctr)
        }
    }
}
