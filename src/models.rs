//! Data models for collection exports and reports.
//!
//! This module contains the point records read from batch exports, the
//! payload container used to inspect them, and the structured report
//! produced by the aggregator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Identifier of a point. Qdrant uses unsigned integers or UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Text(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{}", n),
            PointId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A scalar payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Scalar {
    /// Label used when the scalar is counted as a category.
    pub fn label(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// A payload value. Absence is expressed by `Option<&PayloadValue>`.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Null,
    Scalar(Scalar),
    List(Vec<PayloadValue>),
    Object(Payload),
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PayloadValue::Null,
            Value::Bool(b) => PayloadValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => PayloadValue::Scalar(Scalar::Number(n)),
            Value::String(s) => PayloadValue::Scalar(Scalar::Text(s)),
            Value::Array(items) => {
                PayloadValue::List(items.into_iter().map(PayloadValue::from).collect())
            }
            Value::Object(map) => PayloadValue::Object(Payload::from(map)),
        }
    }
}

impl From<&PayloadValue> for Value {
    fn from(value: &PayloadValue) -> Self {
        match value {
            PayloadValue::Null => Value::Null,
            PayloadValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            PayloadValue::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            PayloadValue::Scalar(Scalar::Text(s)) => Value::String(s.clone()),
            PayloadValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            PayloadValue::Object(payload) => Value::Object(
                payload
                    .entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl PayloadValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PayloadValue::Null)
    }

    pub fn as_list(&self) -> Option<&[PayloadValue]> {
        match self {
            PayloadValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Payload> {
        match self {
            PayloadValue::Object(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Scalar(Scalar::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Label used when the value is counted as a category.
    ///
    /// Scalars render as their plain text; lists and objects as compact JSON.
    pub fn label(&self) -> String {
        match self {
            PayloadValue::Scalar(scalar) => scalar.label(),
            other => Value::from(other).to_string(),
        }
    }
}

/// The free-form key/value map attached to a point, in document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Payload {
    entries: Vec<(String, PayloadValue)>,
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, PayloadValue::from(v)))
                .collect(),
        }
    }
}

impl Payload {
    /// Look up a key. Returns `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Resolve a logical field through its alias list.
    ///
    /// The first alias present with a non-null value wins.
    pub fn field(&self, field: LogicalField) -> Option<&PayloadValue> {
        field
            .aliases()
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|value| !value.is_null())
    }

    pub fn has(&self, field: LogicalField) -> bool {
        self.field(field).is_some()
    }

    /// Key names in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Semantic payload fields that may appear under several spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    SourceFile,
    Categories,
    IntelligenceType,
    EnrichmentLevel,
    ConvergenceChains,
}

/// Candidate keys per logical field, in priority order.
const FIELD_ALIASES: &[(LogicalField, &[&str])] = &[
    (LogicalField::SourceFile, &["sourceFile", "file"]),
    (LogicalField::Categories, &["categories"]),
    (
        LogicalField::IntelligenceType,
        &["intelligence_type", "intelligenceType"],
    ),
    (
        LogicalField::EnrichmentLevel,
        &["enrichment_level", "enrichmentLevel"],
    ),
    (LogicalField::ConvergenceChains, &["convergenceChains"]),
];

impl LogicalField {
    pub fn aliases(self) -> &'static [&'static str] {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

/// A single point from a collection export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointRecord {
    pub id: PointId,
    #[serde(default)]
    pub payload: Payload,
}

impl PointRecord {
    /// Convergence chains carried by this point, if any.
    pub fn convergence_chains(&self) -> Vec<ConvergenceChain<'_>> {
        self.payload
            .field(LogicalField::ConvergenceChains)
            .and_then(PayloadValue::as_list)
            .map(|chains| {
                chains
                    .iter()
                    .filter_map(PayloadValue::as_object)
                    .map(ConvergenceChain)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The entry at index 0 of `convergenceChains`, when it is an object.
    pub fn first_convergence_chain(&self) -> Option<ConvergenceChain<'_>> {
        self.payload
            .field(LogicalField::ConvergenceChains)
            .and_then(PayloadValue::as_list)
            .and_then(<[PayloadValue]>::first)
            .and_then(PayloadValue::as_object)
            .map(ConvergenceChain)
    }
}

/// View over one object inside `convergenceChains`.
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceChain<'a>(&'a Payload);

impl<'a> ConvergenceChain<'a> {
    pub fn participants(&self) -> Option<&'a [PayloadValue]> {
        self.0.get("participants").and_then(PayloadValue::as_list)
    }

    pub fn score(&self) -> Option<f64> {
        self.0.get("convergenceScore").and_then(PayloadValue::as_f64)
    }
}

/// One exported scroll page: `{"result": {"points": [...]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDocument {
    pub result: BatchResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchResult {
    pub points: Vec<PointRecord>,
}

/// A label with its count and share of all points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Numeric summary over a non-empty list of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation; needs at least two values.
    pub std_dev: Option<f64>,
}

/// Scores that fell into one fixed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub label: String,
    pub count: usize,
    pub mean: f64,
}

/// Details of the first point in the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePoint {
    pub id: String,
    pub keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_size: Option<usize>,
    /// Configured number of leading participants to show.
    pub participants_shown: usize,
    /// Leading participants of the first chain, as compact JSON values.
    pub first_participants: Vec<String>,
}

/// How many points carry a given field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessEntry {
    pub label: String,
    pub count: usize,
    pub total: usize,
    pub percentage: f64,
}

/// One section of the report, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    ConnectionStatus {
        title: String,
        server_url: String,
        collection: String,
        total_points: usize,
        vector_size: usize,
        embedding_model: String,
        status: String,
    },
    DataOverview {
        unique_files: usize,
        payload_fields: Vec<String>,
    },
    Sample {
        sample: Option<SamplePoint>,
    },
    Files {
        total: usize,
        listed: Vec<String>,
        remaining: usize,
    },
    Categories {
        entries: Vec<DistributionEntry>,
    },
    IntelligenceTypes {
        entries: Vec<DistributionEntry>,
    },
    ConvergenceChains {
        summary: Option<NumericSummary>,
        /// (participants, chains) ordered by size.
        size_distribution: Vec<(usize, usize)>,
    },
    ConvergenceScores {
        summary: Option<NumericSummary>,
        buckets: Vec<BucketSummary>,
    },
    EnrichmentLevels {
        entries: Vec<DistributionEntry>,
    },
    DataQuality {
        entries: Vec<CompletenessEntry>,
    },
    Insights {
        items: Vec<String>,
    },
    Commands {
        blocks: Vec<CommandBlock>,
    },
}

/// A titled shell snippet in the verification section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandBlock {
    pub title: String,
    pub lines: Vec<String>,
}

/// The complete collection report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(value: Value) -> PointRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_point_id_variants() {
        let numeric = point(json!({"id": 42, "payload": {}}));
        assert_eq!(numeric.id, PointId::Num(42));
        assert_eq!(numeric.id.to_string(), "42");

        let uuid = point(json!({"id": "5c56c793-69f3-4fbf-87e6-c4bf54c28c26"}));
        assert_eq!(uuid.id.to_string(), "5c56c793-69f3-4fbf-87e6-c4bf54c28c26");
        assert_eq!(uuid.payload.keys().count(), 0);
    }

    #[test]
    fn test_payload_keeps_document_order() {
        let p = point(json!({"id": 1, "payload": {"zeta": 1, "alpha": 2, "mid": 3}}));
        let keys: Vec<&str> = p.payload.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_field_alias_priority() {
        let both = point(json!({"id": 1, "payload": {"file": "b.md", "sourceFile": "a.md"}}));
        assert_eq!(
            both.payload.field(LogicalField::SourceFile).map(PayloadValue::label),
            Some("a.md".to_string())
        );

        let fallback = point(json!({"id": 2, "payload": {"intelligenceType": "tech"}}));
        assert_eq!(
            fallback
                .payload
                .field(LogicalField::IntelligenceType)
                .map(PayloadValue::label),
            Some("tech".to_string())
        );
    }

    #[test]
    fn test_null_counts_as_absent() {
        let p = point(json!({"id": 1, "payload": {"sourceFile": null, "file": "x.md"}}));
        assert_eq!(
            p.payload.field(LogicalField::SourceFile).map(PayloadValue::label),
            Some("x.md".to_string())
        );

        let none = point(json!({"id": 2, "payload": {"enrichment_level": null}}));
        assert!(!none.payload.has(LogicalField::EnrichmentLevel));
    }

    #[test]
    fn test_labels() {
        assert_eq!(PayloadValue::from(json!("ai")).label(), "ai");
        assert_eq!(PayloadValue::from(json!(3)).label(), "3");
        assert_eq!(PayloadValue::from(json!(true)).label(), "true");
        assert_eq!(PayloadValue::from(json!(["a", 1])).label(), r#"["a",1]"#);
    }

    #[test]
    fn test_convergence_chains_view() {
        let p = point(json!({
            "id": 1,
            "payload": {
                "convergenceChains": [
                    {"participants": ["a", "b", "c"], "convergenceScore": 12.5},
                    {"convergenceScore": "not a number"},
                    "not an object"
                ]
            }
        }));

        let chains = p.convergence_chains();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].participants().map(<[_]>::len), Some(3));
        assert_eq!(chains[0].score(), Some(12.5));
        assert!(chains[1].participants().is_none());
        assert!(chains[1].score().is_none());
    }

    #[test]
    fn test_first_chain_is_index_zero() {
        let p = point(json!({
            "id": 1,
            "payload": {"convergenceChains": ["junk", {"participants": ["x", "y"]}]}
        }));
        assert!(p.first_convergence_chain().is_none());
        assert_eq!(p.convergence_chains().len(), 1);

        let p = point(json!({
            "id": 2,
            "payload": {"convergenceChains": [{"participants": ["x"]}, "junk"]}
        }));
        let first = p.first_convergence_chain().unwrap();
        assert_eq!(first.participants().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_chains_must_be_a_list() {
        let p = point(json!({"id": 1, "payload": {"convergenceChains": {"participants": []}}}));
        assert!(p.convergence_chains().is_empty());
    }

    #[test]
    fn test_every_logical_field_has_aliases() {
        for field in [
            LogicalField::SourceFile,
            LogicalField::Categories,
            LogicalField::IntelligenceType,
            LogicalField::EnrichmentLevel,
            LogicalField::ConvergenceChains,
        ] {
            assert!(!field.aliases().is_empty());
        }
    }
}
