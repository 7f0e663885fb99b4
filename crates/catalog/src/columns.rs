//! Canonical column set and the synonym table used to map arbitrary
//! vendor headers onto it.

use crate::loader::RawRow;
use std::collections::HashMap;

/// Canonical column names of the unified schema. Matching is
/// case-insensitive, so unit costs are listed lowercase here.
pub const CANONICAL: &[&str] = &[
    "medium",
    "vendor",
    "format",
    "audience",
    "impressions",
    "grps",
    "clicks",
    "views",
    "leads",
    "actions",
    "rating",
    "cost",
    "start",
    "end",
    "medium_type",
    "cpm",
    "cpc",
    "cpl",
    "cpa",
    "ctr",
    "cvr",
];

/// Header synonyms seen across vendor files, lowercase. Applied in
/// order; a synonym never overwrites a canonical column that the input
/// already carries.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("medio", "medium"),
    ("proveedor", "vendor"),
    ("medios", "vendor"),
    ("soporte", "format"),
    ("canal", "format"),
    ("formato", "format"),
    ("audiencia", "audience"),
    ("impresiones", "impressions"),
    ("grp", "grps"),
    ("clics", "clicks"),
    ("vistas", "views"),
    ("acciones", "actions"),
    ("costo", "cost"),
    ("calificacion", "rating"),
    ("calificación", "rating"),
    ("reseñas", "rating"),
    ("inicio", "start"),
    ("fin", "end"),
    ("tipo", "medium_type"),
];

/// Map one raw row onto canonical column names.
///
/// Canonical headers present in the input (any casing) win; synonyms
/// only fill canonical names that are still absent. Columns that map
/// to nothing are dropped.
pub fn map_columns(row: &RawRow) -> HashMap<&'static str, String> {
    // Lowercased view of the raw row, first occurrence wins.
    let mut lowered: HashMap<String, &String> = HashMap::new();
    for (k, v) in row {
        lowered.entry(k.trim().to_lowercase()).or_insert(v);
    }

    let mut out: HashMap<&'static str, String> = HashMap::new();

    for canon in CANONICAL {
        if let Some(v) = lowered.get(*canon) {
            out.insert(*canon, (*v).clone());
        }
    }
    for (syn, canon) in SYNONYMS {
        if !out.contains_key(*canon) {
            if let Some(v) = lowered.get(*syn) {
                out.insert(*canon, (*v).clone());
            }
        }
    }

    out
}
