//! Schema unification: raw untyped rows in, validated `InventoryItem`s
//! out. The pipeline is strictly two-stage — headers are mapped and
//! every field coerced once, after which nothing downstream ever looks
//! at a raw column again.

use crate::columns::map_columns;
use crate::loader::RawRow;
use crate::numeric::{parse_date, parse_number};
use crate::score::score_batch;
use mediaplan_core::types::{InventoryItem, MediumType};
use tracing::debug;

/// Channels priced as traditional media. Membership of `medium` here
/// classifies a row OFF when the input carries no explicit type.
const OFFLINE_CHANNELS: &[&str] = &[
    "TV",
    "Radio",
    "Vía Pública",
    "Via Pública",
    "OOH",
    "Cines",
    "Print",
];

/// Unify a batch of raw rows into the canonical schema.
///
/// Column synonyms are applied, every canonical field is coerced
/// (invalid numbers and dates become `None`, never errors), ON/OFF is
/// resolved, unit costs are derived where the denominator allows, and
/// the whole batch is scored.
///
/// `default_medium_type` is used for rows with no explicit type column
/// before falling back to offline-channel inference.
pub fn unify(rows: &[RawRow], default_medium_type: Option<MediumType>) -> Vec<InventoryItem> {
    let mut items: Vec<InventoryItem> = rows
        .iter()
        .map(|row| unify_row(row, default_medium_type))
        .collect();

    score_batch(&mut items);
    debug!(rows = items.len(), "catalog unified");
    items
}

fn unify_row(row: &RawRow, default_medium_type: Option<MediumType>) -> InventoryItem {
    let cols = map_columns(row);

    let text = |key: &str| -> Option<String> {
        cols.get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let num = |key: &str| -> Option<f64> { cols.get(key).and_then(|s| parse_number(s)) };
    let date = |key: &str| -> Option<chrono::NaiveDate> {
        cols.get(key).and_then(|s| parse_date(s))
    };

    let medium = text("medium").unwrap_or_default();

    let medium_type = match text("medium_type") {
        Some(explicit) => MediumType::from_catalog_value(&explicit),
        None => default_medium_type.unwrap_or_else(|| infer_medium_type(&medium)),
    };

    let impressions = num("impressions");
    let clicks = num("clicks");
    let leads = num("leads");
    let actions = num("actions");
    let cost = num("cost");

    // Unit costs already present in the input are trusted as-is; only
    // missing ones are derived. This keeps re-unification of an
    // already-unified table from touching any value.
    let cpm = derive_unit_cost(num("cpm"), impressions, cost, true);
    let mut cpc = derive_unit_cost(num("cpc"), clicks, cost, false);
    let mut cpl = derive_unit_cost(num("cpl"), leads, cost, false);
    let mut cpa = derive_unit_cost(num("cpa"), actions, cost, false);

    // OFF inventory is priced by reach equivalence only; per-click and
    // per-conversion units do not apply regardless of what the input
    // volumes would allow.
    if medium_type == MediumType::Off {
        cpc = None;
        cpl = None;
        cpa = None;
    }

    InventoryItem {
        medium,
        vendor: text("vendor").unwrap_or_default(),
        format: text("format").unwrap_or_default(),
        audience: text("audience"),
        medium_type,
        impressions,
        grps: num("grps"),
        clicks,
        views: num("views"),
        leads,
        actions,
        cost,
        rating: num("rating"),
        start: date("start"),
        end: date("end"),
        cpm,
        cpc,
        cpl,
        cpa,
        ctr: num("ctr"),
        cvr: num("cvr"),
        score: 0.0,
    }
}

fn infer_medium_type(medium: &str) -> MediumType {
    let m = medium.trim();
    if OFFLINE_CHANNELS
        .iter()
        .any(|off| off.eq_ignore_ascii_case(m))
    {
        MediumType::Off
    } else {
        MediumType::On
    }
}

/// `cost / volume` (per-mille for CPM) when the volume is positive and
/// the cost known, rounded to 2 decimals. A unit cost carried by the
/// input wins over derivation.
fn derive_unit_cost(
    existing: Option<f64>,
    volume: Option<f64>,
    cost: Option<f64>,
    per_mille: bool,
) -> Option<f64> {
    if existing.is_some() {
        return existing;
    }
    let volume = volume.filter(|v| *v > 0.0)?;
    let cost = cost?;
    let unit = if per_mille {
        cost / (volume / 1000.0)
    } else {
        cost / volume
    };
    Some(round2(unit))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
