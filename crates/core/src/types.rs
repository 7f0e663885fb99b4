use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// ON = digital/programmatic inventory, OFF = traditional inventory
/// (TV, radio, out-of-home, print).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediumType {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl MediumType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediumType::On => "ON",
            MediumType::Off => "OFF",
        }
    }

    /// Parse an explicit catalog value. Anything that is not "OFF"
    /// (case-insensitive) is treated as ON.
    pub fn from_catalog_value(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("OFF") {
            MediumType::Off
        } else {
            MediumType::On
        }
    }
}

impl fmt::Display for MediumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for MediumType {
    fn default() -> Self {
        MediumType::On
    }
}

/// Pricing unit for an inventory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostUnit {
    #[serde(rename = "CPM")]
    Cpm,
    #[serde(rename = "CPC")]
    Cpc,
    #[serde(rename = "CPL")]
    Cpl,
    #[serde(rename = "CPA")]
    Cpa,
}

impl CostUnit {
    /// Resolution order used everywhere a unit has to be picked
    /// implicitly: CPM first, CPA last.
    pub const ALL: [CostUnit; 4] = [CostUnit::Cpm, CostUnit::Cpc, CostUnit::Cpl, CostUnit::Cpa];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostUnit::Cpm => "CPM",
            CostUnit::Cpc => "CPC",
            CostUnit::Cpl => "CPL",
            CostUnit::Cpa => "CPA",
        }
    }
}

impl fmt::Display for CostUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CostUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CPM" => Ok(CostUnit::Cpm),
            "CPC" => Ok(CostUnit::Cpc),
            "CPL" => Ok(CostUnit::Cpl),
            "CPA" => Ok(CostUnit::Cpa),
            other => Err(format!("unknown cost unit: {other}")),
        }
    }
}

/// One row of the unified ON/OFF catalog.
///
/// Volume metrics and unit costs are `Option<f64>` on purpose: `None`
/// means "unknown/inapplicable" and is never collapsed to zero (zero is
/// a valid cost).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryItem {
    pub medium: String,
    pub vendor: String,
    pub format: String,
    pub audience: Option<String>,
    pub medium_type: MediumType,

    pub impressions: Option<f64>,
    pub grps: Option<f64>,
    pub clicks: Option<f64>,
    pub views: Option<f64>,
    pub leads: Option<f64>,
    pub actions: Option<f64>,

    pub cost: Option<f64>,
    /// Qualitative score in 0..=5.
    pub rating: Option<f64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,

    /// Derived unit costs, rounded to 2 decimals. For OFF rows only CPM
    /// is ever populated.
    #[serde(rename = "CPM")]
    pub cpm: Option<f64>,
    #[serde(rename = "CPC")]
    pub cpc: Option<f64>,
    #[serde(rename = "CPL")]
    pub cpl: Option<f64>,
    #[serde(rename = "CPA")]
    pub cpa: Option<f64>,

    /// Optional click-through / conversion benchmarks carried by the
    /// catalog itself. When absent the projector falls back to channel
    /// defaults.
    pub ctr: Option<f64>,
    pub cvr: Option<f64>,

    /// Composite batch-relative ranking score.
    pub score: f64,
}

impl InventoryItem {
    /// Value of one unit cost field.
    pub fn unit_cost(&self, unit: CostUnit) -> Option<f64> {
        match unit {
            CostUnit::Cpm => self.cpm,
            CostUnit::Cpc => self.cpc,
            CostUnit::Cpl => self.cpl,
            CostUnit::Cpa => self.cpa,
        }
    }

    /// First unit (in CPM,CPC,CPL,CPA order) with a positive value.
    pub fn first_available_unit(&self) -> Option<CostUnit> {
        CostUnit::ALL
            .into_iter()
            .find(|u| self.unit_cost(*u).is_some_and(|v| v > 0.0))
    }
}

/// Identity of a plan line. Two plan items with the same key are the
/// same line; dates and missing fields compare as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanKey {
    pub vendor: String,
    pub format: String,
    pub medium: String,
    pub start: String,
    pub end: String,
}

fn date_key(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// An inventory line selected into a plan, with the planning overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(flatten)]
    pub item: InventoryItem,
    /// Unit the user is paying by. `None` means "whatever is available",
    /// resolved by the projector at estimation time.
    pub selected_unit: Option<CostUnit>,
    /// Unit cost frozen at selection time; never recomputed from the
    /// catalog after the item joins the plan.
    pub selected_unit_cost: Option<f64>,
    /// Money allocated to this line.
    pub budget: f64,
}

impl PlanItem {
    pub fn new(item: InventoryItem) -> Self {
        Self {
            item,
            selected_unit: None,
            selected_unit_cost: None,
            budget: 0.0,
        }
    }

    pub fn key(&self) -> PlanKey {
        PlanKey {
            vendor: self.item.vendor.clone(),
            format: self.item.format.clone(),
            medium: self.item.medium.clone(),
            start: date_key(self.item.start),
            end: date_key(self.item.end),
        }
    }
}

/// One append-only analytics record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub ts: DateTime<Utc>,
    pub event_kind: String,
    pub payload: serde_json::Value,
}
