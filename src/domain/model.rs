use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Catalog identifier. TheDogAPI uses integers, but string ids are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreedId {
    Number(u64),
    Text(String),
}

impl fmt::Display for BreedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreedId::Number(n) => write!(f, "{}", n),
            BreedId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(default, deserialize_with = "lenient")]
    pub imperial: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub metric: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreedImage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// One catalog entry as returned by the breed API. Unknown fields are ignored;
/// a known field holding a value of the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreedRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<BreedId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub breed_group: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperament: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub life_span: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub weight: Option<Measure>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<Measure>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<BreedImage>,
}

// 型別不符 (例如數字、字串當物件) 視為缺值，不丟掉整筆資料
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = lenient(deserializer)?;
    Ok(value.unwrap_or_default())
}

impl BreedRecord {
    pub fn metric_weight(&self) -> Option<&str> {
        self.weight.as_ref().and_then(|m| m.metric.as_deref())
    }

    pub fn metric_height(&self) -> Option<&str> {
        self.height.as_ref().and_then(|m| m.metric.as_deref())
    }

    /// Breed group with blank values folded into "no group".
    pub fn group(&self) -> Option<&str> {
        self.breed_group
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Name used in warnings and logs; falls back to the id.
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if let Some(id) = &self.id {
            format!("#{}", id)
        } else {
            "<unnamed>".to_string()
        }
    }
}

/// Per-sex and unisex averages of one measurement (weight in kg, height in cm).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MeasurementStats {
    pub male_avg: Option<f64>,
    pub female_avg: Option<f64>,
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedBreed {
    pub id: Option<BreedId>,
    pub name: String,
    pub breed_group: Option<String>,
    pub origin: Option<String>,
    pub image_url: Option<String>,
    pub life_min: Option<f64>,
    pub life_max: Option<f64>,
    pub life_avg: Option<f64>,
    pub weight: MeasurementStats,
    pub height: MeasurementStats,
    pub traits: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldWarning {
    pub breed: String,
    pub field: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub breed_group: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub breed_group: String,
    pub count: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSexMeans {
    pub breed_group: String,
    pub count: usize,
    pub male_avg: Option<f64>,
    pub female_avg: Option<f64>,
}

/// Five-number summary backing a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBox {
    pub breed_group: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub breed_group: Option<String>,
    pub weight_kg: f64,
    pub life_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitShare {
    pub breed_group: String,
    pub breeds: usize,
    pub matches: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitPrevalence {
    pub trait_name: String,
    pub groups: Vec<TraitShare>,
}

/// Everything derived from one batch of raw records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedTables {
    pub breeds: Vec<NormalizedBreed>,
    pub count_by_group: Vec<GroupCount>,
    pub life_by_group: Vec<GroupMean>,
    pub weight_by_group: Vec<GroupSexMeans>,
    pub height_by_group: Vec<GroupSexMeans>,
    pub life_box_by_group: Vec<GroupBox>,
    pub weight_life_points: Vec<ScatterPoint>,
    pub trait_prevalence: Option<TraitPrevalence>,
    pub traits: Vec<String>,
    pub warnings: Vec<FieldWarning>,
}

impl BreedTables {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}
