//! Media planning on top of the unified catalog — budget-to-impression
//! projection, the deduplicated plan, group reporting, quote export and
//! the per-session state container.

pub mod export;
pub mod plan;
pub mod projector;
pub mod session;

pub use export::{build_quote, quote_totals, write_quote_csv, QuoteRow, QuoteTotals};
pub use plan::{mix_on_off, GroupBy, GroupSummary, Plan, PlanTotals};
pub use projector::{
    benchmarks_for, estimate_impressions, selected_unit, visible_unit_cost, Benchmarks,
};
pub use session::SessionState;
