//! Quote export: the plan reconstructed as a delimited file with the
//! human-readable column names the sales side expects.

use crate::projector::{estimate_impressions, selected_unit, visible_unit_cost};
use crate::Plan;
use chrono::NaiveDate;
use mediaplan_core::types::{CostUnit, PlanItem};
use mediaplan_core::PlanResult;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One quote line. Serde names double as CSV headers.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRow {
    #[serde(rename = "Medio")]
    pub medio: String,
    #[serde(rename = "Formato")]
    pub formato: String,
    #[serde(rename = "Canal")]
    pub canal: String,
    #[serde(rename = "Inicio")]
    pub inicio: String,
    #[serde(rename = "Fin")]
    pub fin: String,
    #[serde(rename = "Unidad")]
    pub unidad: String,
    #[serde(rename = "CostoUnit")]
    pub costo_unit: f64,
    #[serde(rename = "budget")]
    pub budget: f64,
    #[serde(rename = "est_impressions")]
    pub est_impressions: Option<f64>,
    #[serde(rename = "TotalLinea")]
    pub total_linea: f64,
}

/// Totals over the quote.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteTotals {
    pub items: usize,
    pub subtotal: f64,
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn quote_row(item: &PlanItem) -> QuoteRow {
    QuoteRow {
        medio: item.item.vendor.clone(),
        formato: item.item.format.clone(),
        canal: item.item.medium.clone(),
        inicio: fmt_date(item.item.start),
        fin: fmt_date(item.item.end),
        unidad: selected_unit(item).unwrap_or(CostUnit::Cpm).to_string(),
        costo_unit: visible_unit_cost(item),
        budget: item.budget,
        est_impressions: estimate_impressions(item, item.budget),
        total_linea: item.budget,
    }
}

/// Build the quote rows for the current plan.
pub fn build_quote(plan: &Plan) -> Vec<QuoteRow> {
    plan.items().iter().map(quote_row).collect()
}

/// Item count and budget subtotal of the quote.
pub fn quote_totals(plan: &Plan) -> QuoteTotals {
    let rows = build_quote(plan);
    QuoteTotals {
        items: rows.len(),
        subtotal: rows.iter().map(|r| r.total_linea).sum(),
    }
}

/// Write the quote as a comma-delimited file.
pub fn write_quote_csv(path: impl AsRef<Path>, plan: &Plan) -> PlanResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in build_quote(plan) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), "quote exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaplan_core::types::InventoryItem;

    fn sample_plan() -> Plan {
        let mut display = PlanItem::new(InventoryItem {
            vendor: "MedioX".into(),
            format: "300x250".into(),
            medium: "Display".into(),
            cpm: Some(6.0),
            start: NaiveDate::from_ymd_opt(2025, 3, 1),
            end: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..Default::default()
        });
        display.selected_unit = Some(CostUnit::Cpm);
        display.selected_unit_cost = Some(6.0);
        display.budget = 3_000.0;

        let mut tv = PlanItem::new(InventoryItem {
            vendor: "Canal A".into(),
            format: "Prime Time".into(),
            medium: "TV".into(),
            grps: Some(120.0),
            cost: Some(45_000.0),
            ..Default::default()
        });
        tv.budget = 9_000.0;

        let mut plan = Plan::new();
        plan.add([display, tv]);
        plan
    }

    #[test]
    fn test_quote_rows() {
        let rows = build_quote(&sample_plan());
        assert_eq!(rows.len(), 2);

        let d = &rows[0];
        assert_eq!(d.medio, "MedioX");
        assert_eq!(d.canal, "Display");
        assert_eq!(d.inicio, "2025-03-01");
        assert_eq!(d.unidad, "CPM");
        assert!((d.costo_unit - 6.0).abs() < f64::EPSILON);
        assert!((d.est_impressions.unwrap() - 500_000.0).abs() < 1e-9);
        assert!((d.total_linea - 3_000.0).abs() < f64::EPSILON);

        // TV line has no unit cost: no estimate, dates empty.
        let t = &rows[1];
        assert_eq!(t.inicio, "");
        assert_eq!(t.est_impressions, None);
    }

    #[test]
    fn test_quote_totals() {
        let totals = quote_totals(&sample_plan());
        assert_eq!(totals.items, 2);
        assert!((totals.subtotal - 12_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_write_quote_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cotizacion_plan.csv");
        write_quote_csv(&path, &sample_plan()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Medio,Formato,Canal,Inicio,Fin,Unidad,CostoUnit,budget,est_impressions,TotalLinea"
        );
        assert_eq!(lines.count(), 2);
        // The TV line's missing estimate is an empty field, not a zero.
        assert!(contents.contains("Canal A,Prime Time,TV,,,CPM,45000.0,9000.0,,9000.0"));
    }
}
