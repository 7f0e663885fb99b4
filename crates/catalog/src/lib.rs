//! Catalog ingestion and normalization — turns heterogeneous CSV rows
//! into the unified ON/OFF inventory schema with derived unit costs and
//! a batch-relative ranking score.

pub mod columns;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod numeric;
pub mod score;
pub mod unify;

pub use filter::{units_present, CatalogFilter};
pub use kpi::{kpi_summary, KpiBucket, KpiSummary};
pub use loader::{load_raw_rows, RawRow};
pub use numeric::{parse_date, parse_number};
pub use score::score_batch;
pub use unify::unify;
