use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row of the form-response sheet exactly as the CSV export delivers it.
///
/// Every field is optional: respondents skip questions and the export pads
/// short rows, so nothing can be assumed present until cleaning.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "country")]
    pub country: Option<String>,
    #[serde(rename = "speciality")]
    pub speciality: Option<String>,
    #[serde(rename = "r_stamina")]
    pub r_stamina: Option<String>,
    #[serde(rename = "r_tenacity")]
    pub r_tenacity: Option<String>,
    #[serde(rename = "r_precision")]
    pub r_precision: Option<String>,
    #[serde(rename = "r_reaction")]
    pub r_reaction: Option<String>,
    #[serde(rename = "r_accuracy")]
    pub r_accuracy: Option<String>,
    #[serde(rename = "r_agility")]
    pub r_agility: Option<String>,
    #[serde(rename = "first_collab")]
    pub first_collab: Option<String>,
    #[serde(rename = "error")]
    pub error: Option<String>,
    #[serde(rename = "error_reason")]
    pub error_reason: Option<String>,
}

/// A cleaned response. Text fields are trimmed with empty strings collapsed
/// to `None`; the snapshot these live in is replaced wholesale on refresh.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: Option<NaiveDateTime>,
    pub country: Option<String>,
    pub speciality: Option<String>,
    pub stamina: Option<String>,
    pub tenacity: Option<String>,
    pub precision: Option<String>,
    pub reaction: Option<String>,
    pub accuracy: Option<String>,
    pub agility: Option<String>,
    pub first_collab: Option<String>,
    pub error: bool,
    pub error_reason: Option<String>,
}

impl Record {
    /// Grade letter the respondent gave for one rating dimension.
    pub fn rating(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::Stamina => &self.stamina,
            Dimension::Tenacity => &self.tenacity,
            Dimension::Precision => &self.precision,
            Dimension::Reaction => &self.reaction,
            Dimension::Accuracy => &self.accuracy,
            Dimension::Agility => &self.agility,
        };
        value.as_deref()
    }
}

/// Rating dimensions in the order they appear on the form and in the rating
/// table's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Stamina,
    Tenacity,
    Precision,
    Reaction,
    Accuracy,
    Agility,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Stamina,
        Dimension::Tenacity,
        Dimension::Precision,
        Dimension::Reaction,
        Dimension::Accuracy,
        Dimension::Agility,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Dimension::Stamina => "stamina",
            Dimension::Tenacity => "tenacity",
            Dimension::Precision => "precision",
            Dimension::Reaction => "reaction",
            Dimension::Accuracy => "accuracy",
            Dimension::Agility => "agility",
        }
    }

    pub fn from_id(id: &str) -> Option<Dimension> {
        Dimension::ALL.into_iter().find(|d| d.id() == id)
    }
}

/// Grade axis of the rating table. Fixed regardless of which grades the
/// snapshot actually contains.
pub const GRADES: [&str; 5] = ["S", "A", "B", "C", "D"];

/// One line of a frequency summary. `percentage` keeps full precision; the
/// one-decimal rounding happens only at the display edge.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AggregateRow {
    #[tabled(rename = "Category")]
    pub label: String,
    #[tabled(rename = "Frequency")]
    pub frequency: u64,
    #[tabled(rename = "Percentage", display_with = "crate::util::display_pct")]
    pub percentage: f64,
}

/// One grade line of the rating table, with a count column per dimension.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RatingMatrixRow {
    #[serde(rename = "Rating")]
    #[tabled(rename = "Rating")]
    pub rating: String,
    pub stamina: u64,
    pub tenacity: u64,
    pub precision: u64,
    pub reaction: u64,
    pub accuracy: u64,
    pub agility: u64,
}

impl RatingMatrixRow {
    pub fn count(&self, dimension: Dimension) -> u64 {
        match dimension {
            Dimension::Stamina => self.stamina,
            Dimension::Tenacity => self.tenacity,
            Dimension::Precision => self.precision,
            Dimension::Reaction => self.reaction,
            Dimension::Accuracy => self.accuracy,
            Dimension::Agility => self.agility,
        }
    }
}

/// Headline numbers shown at the top of the overview page.
#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    pub total_responses: u64,
    pub completion_pct: f64,
    pub total_issues: u64,
}

/// Daily response counts over the observed date range, gap days included.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeSeries {
    pub days: Vec<chrono::NaiveDate>,
    pub daily: Vec<u64>,
    pub cumulative: Vec<u64>,
}

/// Display metadata for one table column, handed to the renderer alongside
/// the rows. Numeric columns may carry a fixed-decimal formatting hint.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
}

impl ColumnSpec {
    pub fn text(name: &str, id: &str) -> Self {
        ColumnSpec {
            name: name.to_string(),
            id: id.to_string(),
            kind: None,
            precision: None,
        }
    }

    pub fn numeric(name: &str, id: &str, precision: Option<u8>) -> Self {
        ColumnSpec {
            name: name.to_string(),
            id: id.to_string(),
            kind: Some("numeric".to_string()),
            precision,
        }
    }
}
