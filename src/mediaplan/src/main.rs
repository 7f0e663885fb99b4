//! mediaplan — demo dashboard for a unified ON/OFF media marketplace.
//!
//! Command-line stand-in for the UI layer: browses the unified
//! catalog, builds a budgeted plan, exports a quote and records every
//! confirmation in the append-only event log.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mediaplan_analytics::EventLogger;
use mediaplan_catalog::{kpi_summary, load_raw_rows, unify, units_present, CatalogFilter};
use mediaplan_core::types::{CostUnit, InventoryItem, MediumType};
use mediaplan_core::AppConfig;
use mediaplan_planner::{
    build_quote, mix_on_off, quote_totals, visible_unit_cost, write_quote_csv, GroupBy,
    SessionState,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "mediaplan")]
#[command(about = "Unified ON/OFF media marketplace — plan, quote, reserve")]
#[command(version)]
struct Cli {
    /// Catalog CSV files (overrides config)
    #[arg(long = "file", global = true)]
    files: Vec<String>,

    /// Event log path (overrides config)
    #[arg(long, global = true, env = "MEDIAPLAN__EVENT_LOG")]
    event_log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the unified catalog, best-scored rows first
    Catalog {
        /// Only ON or OFF inventory
        #[arg(long)]
        medium_type: Option<String>,
        /// Channel filter (repeatable)
        #[arg(long)]
        medium: Vec<String>,
        /// Vendor filter (repeatable)
        #[arg(long)]
        vendor: Vec<String>,
        /// Format filter (repeatable)
        #[arg(long)]
        format: Vec<String>,
        /// Rows to show
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Build a plan from catalog rows, export the quote, log the event
    Quote {
        /// Catalog row indices to select (repeatable)
        #[arg(long)]
        select: Vec<usize>,
        /// Budget per selected row, in order; missing entries use the
        /// configured default
        #[arg(long)]
        budget: Vec<f64>,
        /// Pricing unit to pay by (CPM/CPC/CPL/CPA); resolved per row
        /// when omitted
        #[arg(long)]
        unit: Option<CostUnit>,
        /// Grouping dimension for the summary (medium/vendor/format/type)
        #[arg(long, default_value = "medium")]
        group_by: String,
        /// Quote CSV destination
        #[arg(long, default_value = "cotizacion_plan.csv")]
        output: PathBuf,
        /// Record a reservation instead of a quote
        #[arg(long, default_value_t = false)]
        reserve: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediaplan=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if !cli.files.is_empty() {
        config.catalog_files = cli.files.clone();
    }
    if let Some(event_log) = &cli.event_log {
        config.event_log = event_log.clone();
    }

    match cli.command {
        Command::Catalog {
            medium_type,
            medium,
            vendor,
            format,
            top,
        } => {
            let catalog = load_unified_catalog(&config)?;
            let filter = CatalogFilter {
                medium_types: medium_type.as_deref().map(parse_medium_type).transpose()?
                    .into_iter()
                    .collect(),
                mediums: medium,
                vendors: vendor,
                formats: format,
            };
            show_catalog(&catalog, &filter, top);
        }
        Command::Quote {
            select,
            budget,
            unit,
            group_by,
            output,
            reserve,
        } => {
            let catalog = load_unified_catalog(&config)?;
            let group_by = parse_group_by(&group_by)?;
            run_quote(&config, catalog, &select, &budget, unit, group_by, &output, reserve)?;
        }
    }

    Ok(())
}

fn load_unified_catalog(config: &AppConfig) -> anyhow::Result<Vec<InventoryItem>> {
    let mut rows = Vec::new();
    for file in &config.catalog_files {
        let mut part = load_raw_rows(file)
            .with_context(|| format!("failed to read catalog file {file}"))?;
        rows.append(&mut part);
    }
    if rows.is_empty() {
        bail!(
            "no catalog rows found in {:?}; nothing to show",
            config.catalog_files
        );
    }
    Ok(unify(&rows, None))
}

fn parse_medium_type(raw: &str) -> anyhow::Result<MediumType> {
    match raw.to_ascii_uppercase().as_str() {
        "ON" => Ok(MediumType::On),
        "OFF" => Ok(MediumType::Off),
        other => bail!("unknown medium type: {other} (expected ON or OFF)"),
    }
}

fn parse_group_by(raw: &str) -> anyhow::Result<GroupBy> {
    match raw.to_ascii_lowercase().as_str() {
        "medium" | "canal" => Ok(GroupBy::Medium),
        "vendor" | "medio" => Ok(GroupBy::Vendor),
        "format" | "formato" => Ok(GroupBy::Format),
        "type" | "tipo" => Ok(GroupBy::MediumType),
        other => bail!("unknown group dimension: {other}"),
    }
}

fn show_catalog(catalog: &[InventoryItem], filter: &CatalogFilter, top: usize) {
    let mut visible: Vec<(usize, &InventoryItem)> = catalog
        .iter()
        .enumerate()
        .filter(|&(_, item)| filter.matches(item))
        .collect();
    visible.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
    let filtered: Vec<InventoryItem> = visible.iter().map(|(_, i)| (*i).clone()).collect();

    // Pricing units usable on the visible subset.
    let units: Vec<String> = units_present(&filtered)
        .iter()
        .map(CostUnit::to_string)
        .collect();
    println!("Units available: {}", units.join(", "));
    println!(
        "{:>4}  {:4}  {:<20} {:<20} {:<16} {:>9} {:>8}  {}",
        "ID", "Tipo", "Medio", "Formato", "Canal", "CPM", "Score", "Calificación"
    );
    for (idx, item) in visible.iter().take(top) {
        println!(
            "{:>4}  {:4}  {:<20} {:<20} {:<16} {:>9} {:>8.3}  {}",
            idx,
            item.medium_type.to_string(),
            item.vendor,
            item.format,
            item.medium,
            item.cpm.map(|v| format!("{v:.2}")).unwrap_or_else(|| "—".into()),
            item.score,
            stars(item.rating),
        );
    }

    let kpis = kpi_summary(&filtered);
    println!(
        "\nVisible: {} rows | cost {:.0} | impressions {:.0} | GRPs {:.1} | avg rating {}",
        kpis.total.items,
        kpis.total.cost,
        kpis.total.impressions,
        kpis.total.grps,
        kpis.total
            .avg_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "—".into()),
    );
    println!(
        "ON: {} rows / cost {:.0} — OFF: {} rows / cost {:.0}",
        kpis.on.items, kpis.on.cost, kpis.off.items, kpis.off.cost
    );
}

#[allow(clippy::too_many_arguments)]
fn run_quote(
    config: &AppConfig,
    catalog: Vec<InventoryItem>,
    select: &[usize],
    budgets: &[f64],
    unit: Option<CostUnit>,
    group_by: GroupBy,
    output: &std::path::Path,
    reserve: bool,
) -> anyhow::Result<()> {
    if select.is_empty() {
        bail!("nothing selected; pass --select at least once");
    }

    let mut session = SessionState::new(catalog);
    for (i, idx) in select.iter().enumerate() {
        let budget = budgets.get(i).copied().unwrap_or(config.default_budget);
        let added = session.add_selection(&[*idx], unit, budget);
        if added == 0 {
            warn!(index = idx, "selection skipped (out of range or duplicate)");
        }
    }
    if session.plan.is_empty() {
        bail!("no valid selections; plan is empty");
    }

    println!("Plan:");
    for line in session.plan.items() {
        let est = mediaplan_planner::estimate_impressions(line, line.budget);
        println!(
            "  {} / {} / {} — {} {:.2} | budget {:.0} | est. impressions {}",
            line.item.vendor,
            line.item.format,
            line.item.medium,
            line.selected_unit.map(|u| u.to_string()).unwrap_or_else(|| "—".into()),
            visible_unit_cost(line),
            line.budget,
            est.map(|v| format!("{v:.0}"))
                .unwrap_or_else(|| "not estimable".into()),
        );
    }

    let totals = session.plan.totals();
    println!(
        "\nItems: {} | Total budget: {:.0}",
        totals.item_count, totals.total_budget
    );
    if let Some((on, off)) = mix_on_off(&session.plan) {
        println!("Mix: ON {:.0}% / OFF {:.0}%", on * 100.0, off * 100.0);
    }

    println!("\nGroup summary:");
    for g in session.plan.group_summary(group_by) {
        println!(
            "  {:<20} budget {:>10.0} | impressions {:>12.0} | blended CPM {}",
            g.key,
            g.total_budget,
            g.total_impressions,
            g.blended_cpm
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "—".into()),
        );
    }

    write_quote_csv(output, &session.plan)?;
    println!("\nQuote written to {}", output.display());

    let quote = build_quote(&session.plan);
    let qt = quote_totals(&session.plan);
    let (event_kind, mode) = if reserve {
        ("reserve_budget", "reservar")
    } else {
        ("quote_budget", "cotizar")
    };
    let logger = EventLogger::new(&config.event_log);
    let event = logger.log(
        event_kind,
        &serde_json::json!({
            "items": qt.items,
            "subtotal": qt.subtotal,
            "detalle": quote,
            "modo": mode,
        }),
    )?;
    info!(event_id = %event.event_id, event_kind, "confirmation recorded");

    Ok(())
}

fn stars(rating: Option<f64>) -> String {
    let Some(v) = rating else {
        return String::new();
    };
    let v = v.clamp(0.0, 5.0);
    let full = v.floor() as usize;
    "★".repeat(full) + &"☆".repeat(5 - full)
}
