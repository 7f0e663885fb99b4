//! Catalog filtering for the marketplace view: medium type, channel,
//! vendor and format facets, plus the set of pricing units usable on
//! the visible subset.

use mediaplan_core::types::{CostUnit, InventoryItem, MediumType};

/// Facet filter over the unified catalog. Empty facets pass everything.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub medium_types: Vec<MediumType>,
    pub mediums: Vec<String>,
    pub vendors: Vec<String>,
    pub formats: Vec<String>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.medium_types.is_empty()
            && self.mediums.is_empty()
            && self.vendors.is_empty()
            && self.formats.is_empty()
    }

    pub fn matches(&self, item: &InventoryItem) -> bool {
        let facet = |selected: &[String], value: &str| {
            selected.is_empty() || selected.iter().any(|s| s.eq_ignore_ascii_case(value))
        };
        (self.medium_types.is_empty() || self.medium_types.contains(&item.medium_type))
            && facet(&self.mediums, &item.medium)
            && facet(&self.vendors, &item.vendor)
            && facet(&self.formats, &item.format)
    }

    /// The visible subset, original order preserved.
    pub fn apply(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        items
            .iter()
            .filter(|i| self.matches(i))
            .cloned()
            .collect()
    }
}

/// Units with at least one positive value in the subset, in CPM-first
/// order. Always non-empty: a subset with no priced rows still offers
/// CPM so the caller has a unit to display.
pub fn units_present(items: &[InventoryItem]) -> Vec<CostUnit> {
    let present: Vec<CostUnit> = CostUnit::ALL
        .into_iter()
        .filter(|u| {
            items
                .iter()
                .any(|i| i.unit_cost(*u).is_some_and(|v| v > 0.0))
        })
        .collect();
    if present.is_empty() {
        vec![CostUnit::Cpm]
    } else {
        present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(medium: &str, vendor: &str, mt: MediumType) -> InventoryItem {
        InventoryItem {
            medium: medium.to_string(),
            vendor: vendor.to_string(),
            format: "fmt".to_string(),
            medium_type: mt,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filter_passes_all() {
        let items = vec![
            item("Display", "MedioX", MediumType::On),
            item("TV", "Canal A", MediumType::Off),
        ];
        let filter = CatalogFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&items).len(), 2);
    }

    #[test]
    fn test_facets_combine_with_and() {
        let items = vec![
            item("Display", "MedioX", MediumType::On),
            item("Display", "MedioY", MediumType::On),
            item("TV", "Canal A", MediumType::Off),
        ];
        let filter = CatalogFilter {
            medium_types: vec![MediumType::On],
            vendors: vec!["medioy".to_string()],
            ..Default::default()
        };
        let visible = filter.apply(&items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].vendor, "MedioY");
    }

    #[test]
    fn test_units_present_cpm_first_order() {
        let mut a = item("Display", "MedioX", MediumType::On);
        a.cpc = Some(1.2);
        let mut b = item("Social", "Meta Ads", MediumType::On);
        b.cpm = Some(7.5);
        b.cpa = Some(60.0);
        assert_eq!(
            units_present(&[a, b]),
            vec![CostUnit::Cpm, CostUnit::Cpc, CostUnit::Cpa]
        );
    }

    #[test]
    fn test_units_present_falls_back_to_cpm() {
        let items = vec![item("OOH", "Vía Pública", MediumType::Off)];
        assert_eq!(units_present(&items), vec![CostUnit::Cpm]);
    }
}
