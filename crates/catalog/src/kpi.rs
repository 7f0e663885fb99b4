//! Aggregate KPIs over a unified catalog slice, bucketed total/ON/OFF.

use mediaplan_core::types::{InventoryItem, MediumType};
use serde::Serialize;

/// Sums and averages for one bucket of rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KpiBucket {
    pub items: usize,
    pub cost: f64,
    pub impressions: f64,
    pub grps: f64,
    pub clicks: f64,
    pub leads: f64,
    pub actions: f64,
    /// Average over rows that carry a rating; `None` when none do.
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub total: KpiBucket,
    pub on: KpiBucket,
    pub off: KpiBucket,
}

/// Summarize a catalog slice. Missing metrics contribute nothing to
/// the sums (they are skipped, not zeroed into averages).
pub fn kpi_summary(items: &[InventoryItem]) -> KpiSummary {
    KpiSummary {
        total: bucket(items.iter()),
        on: bucket(items.iter().filter(|i| i.medium_type == MediumType::On)),
        off: bucket(items.iter().filter(|i| i.medium_type == MediumType::Off)),
    }
}

fn bucket<'a>(items: impl Iterator<Item = &'a InventoryItem>) -> KpiBucket {
    let mut out = KpiBucket::default();
    let mut rating_sum = 0.0;
    let mut rated = 0usize;

    for item in items {
        out.items += 1;
        out.cost += item.cost.unwrap_or(0.0);
        out.impressions += item.impressions.unwrap_or(0.0);
        out.grps += item.grps.unwrap_or(0.0);
        out.clicks += item.clicks.unwrap_or(0.0);
        out.leads += item.leads.unwrap_or(0.0);
        out.actions += item.actions.unwrap_or(0.0);
        if let Some(r) = item.rating {
            rating_sum += r;
            rated += 1;
        }
    }

    if rated > 0 {
        out.avg_rating = Some(rating_sum / rated as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(mt: MediumType, cost: f64, impressions: Option<f64>, rating: Option<f64>) -> InventoryItem {
        InventoryItem {
            medium_type: mt,
            cost: Some(cost),
            impressions,
            rating,
            ..Default::default()
        }
    }

    #[test]
    fn test_buckets_split_on_off() {
        let items = vec![
            item(MediumType::On, 1_500.0, Some(250_000.0), Some(4.2)),
            item(MediumType::On, 3_000.0, Some(400_000.0), None),
            item(MediumType::Off, 45_000.0, None, Some(4.0)),
        ];
        let s = kpi_summary(&items);

        assert_eq!(s.total.items, 3);
        assert!((s.total.cost - 49_500.0).abs() < f64::EPSILON);
        assert_eq!(s.on.items, 2);
        assert!((s.on.impressions - 650_000.0).abs() < f64::EPSILON);
        assert_eq!(s.off.items, 1);
        assert!((s.off.impressions).abs() < f64::EPSILON);
    }

    #[test]
    fn test_avg_rating_skips_missing() {
        let items = vec![
            item(MediumType::On, 0.0, None, Some(4.0)),
            item(MediumType::On, 0.0, None, None),
            item(MediumType::On, 0.0, None, Some(5.0)),
        ];
        let s = kpi_summary(&items);
        assert_eq!(s.total.avg_rating, Some(4.5));
        assert_eq!(s.off.avg_rating, None);
    }
}
