//! Full catalog-to-quote flow over a mixed ON/OFF catalog.

use mediaplan_analytics::EventLogger;
use mediaplan_catalog::{load_raw_rows, unify};
use mediaplan_core::types::CostUnit;
use mediaplan_planner::{
    build_quote, estimate_impressions, quote_totals, write_quote_csv, SessionState,
};
use std::io::Write;

const CATALOG_CSV: &str = "\
medio,proveedor,soporte,impresiones,GRP,costo,calificacion
Display,MedioX,300x250,250000,,1500,\"4,2\"
TV,Canal A,Prime Time,,120,45000,4
";

#[test]
fn test_catalog_to_quote_flow() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("inventario.csv");
    let mut f = std::fs::File::create(&csv_path).unwrap();
    f.write_all(CATALOG_CSV.as_bytes()).unwrap();

    // Load + unify.
    let rows = load_raw_rows(&csv_path).unwrap();
    assert_eq!(rows.len(), 2);
    let catalog = unify(&rows, None);

    let display = catalog.iter().position(|i| i.medium == "Display").unwrap();
    let tv = catalog.iter().position(|i| i.medium == "TV").unwrap();

    // Display: 1500 / (250000/1000) = 6.00 CPM.
    assert_eq!(catalog[display].cpm, Some(6.0));
    // TV carries GRPs but no impressions: CPM stays null, and the
    // OFF row never gets click/conversion units.
    assert_eq!(catalog[tv].cpm, None);
    assert_eq!(catalog[tv].cpc, None);

    // Select both into a plan with budgets {Display: 3000, TV: 9000}.
    let mut session = SessionState::new(catalog);
    assert_eq!(session.add_selection(&[display], Some(CostUnit::Cpm), 3_000.0), 1);
    assert_eq!(session.add_selection(&[tv], None, 9_000.0), 1);

    let totals = session.plan.totals();
    assert_eq!(totals.item_count, 2);
    assert!((totals.total_budget - 12_000.0).abs() < f64::EPSILON);

    // Projections: 3000 / 6 * 1000 = 500_000 for Display; TV has no
    // usable unit, so no fabricated number.
    let lines = session.plan.items();
    let display_line = lines.iter().find(|l| l.item.medium == "Display").unwrap();
    let tv_line = lines.iter().find(|l| l.item.medium == "TV").unwrap();
    let imp = estimate_impressions(display_line, display_line.budget).unwrap();
    assert!((imp - 500_000.0).abs() < 1e-9);
    assert_eq!(estimate_impressions(tv_line, tv_line.budget), None);

    // Quote export.
    let quote = build_quote(&session.plan);
    assert_eq!(quote.len(), 2);
    let qt = quote_totals(&session.plan);
    assert!((qt.subtotal - 12_000.0).abs() < f64::EPSILON);

    let quote_path = dir.path().join("cotizacion_plan.csv");
    write_quote_csv(&quote_path, &session.plan).unwrap();
    let exported = std::fs::read_to_string(&quote_path).unwrap();
    assert!(exported.starts_with("Medio,Formato,Canal,"));
    assert_eq!(exported.lines().count(), 3);

    // Confirm: one event appended, plan math untouched by logging.
    let logger = EventLogger::new(dir.path().join("events_log.jsonl"));
    logger
        .log(
            "quote_budget",
            &serde_json::json!({
                "items": qt.items,
                "subtotal": qt.subtotal,
                "detail": quote,
            }),
        )
        .unwrap();
    let log = std::fs::read_to_string(logger.path()).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("\"event_kind\":\"quote_budget\""));
}
