//! Composite ranking score.
//!
//! The score is batch-relative: medians and deviations are taken over
//! the rows being scored, so re-scoring a different subset changes
//! every value. That is the intended semantics — the score ranks rows
//! against the catalog currently on screen, it is not an absolute
//! scale.

use mediaplan_core::types::InventoryItem;

const WEIGHT_RATING: f64 = 0.4;
const WEIGHT_REACH: f64 = 0.4;
const WEIGHT_ECON: f64 = 0.2;

/// Impression-equivalence weights for the non-impression volume
/// signals (heuristic, not calibrated).
const GRP_WEIGHT: f64 = 10_000.0;
const CLICK_WEIGHT: f64 = 50.0;
const LEAD_WEIGHT: f64 = 100.0;
const ACTION_WEIGHT: f64 = 150.0;

/// Score every row in the batch:
/// `0.4·z(rating) + 0.4·z(reach_proxy) − 0.2·z(cheapest unit cost)`.
///
/// Missing ratings and unit costs are imputed to the batch median;
/// z-scores use `(x − median) / stddev` with a stddev of 1.0 when the
/// batch deviation is zero or undefined.
pub fn score_batch(items: &mut [InventoryItem]) {
    if items.is_empty() {
        return;
    }

    let rating_med = median_of(items.iter().filter_map(|i| i.rating)).unwrap_or(0.0);
    let ratings: Vec<f64> = items
        .iter()
        .map(|i| i.rating.unwrap_or(rating_med))
        .collect();

    let reaches: Vec<f64> = items.iter().map(reach_proxy).collect();

    let econ_med = median_of(items.iter().filter_map(cheapest_unit_cost)).unwrap_or(0.0);
    let econs: Vec<f64> = items
        .iter()
        .map(|i| cheapest_unit_cost(i).unwrap_or(econ_med))
        .collect();

    let rating_z = zscores(&ratings);
    let reach_z = zscores(&reaches);
    let econ_z = zscores(&econs);

    for (i, item) in items.iter_mut().enumerate() {
        // Lower cost is better, hence the negated economy term.
        item.score =
            WEIGHT_RATING * rating_z[i] + WEIGHT_REACH * reach_z[i] - WEIGHT_ECON * econ_z[i];
    }
}

/// All volume signals converted to one impression-equivalent number,
/// with missing terms treated as zero.
fn reach_proxy(item: &InventoryItem) -> f64 {
    item.impressions.unwrap_or(0.0)
        + GRP_WEIGHT * item.grps.unwrap_or(0.0)
        + CLICK_WEIGHT * item.clicks.unwrap_or(0.0)
        + LEAD_WEIGHT * item.leads.unwrap_or(0.0)
        + ACTION_WEIGHT * item.actions.unwrap_or(0.0)
}

/// Cheapest available unit cost of the row, if any.
fn cheapest_unit_cost(item: &InventoryItem) -> Option<f64> {
    [item.cpm, item.cpc, item.cpl, item.cpa]
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.min(v)))
        })
}

fn median_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut v: Vec<f64> = values.collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

/// `(x − median) / stddev` per value, population stddev, with a
/// fallback deviation of 1.0 so a uniform batch (or a batch of one)
/// yields zeros instead of dividing by zero.
fn zscores(values: &[f64]) -> Vec<f64> {
    let med = median_of(values.iter().copied()).unwrap_or(0.0);
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let mut sd = var.sqrt();
    if !sd.is_finite() || sd == 0.0 {
        sd = 1.0;
    }
    values.iter().map(|v| (v - med) / sd).collect()
}
