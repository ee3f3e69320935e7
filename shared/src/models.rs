use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// How the backend should process an uploaded batch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Run every available face and background model.
    Comparison,
    /// Run one chosen face model and one chosen background model.
    QuickAnalysis,
}

/// Opaque job identifier issued by `/submit_images`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::From)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub face_models: Vec<String>,
    #[serde(default)]
    pub bg_models: Vec<String>,
}

impl ModelCatalog {
    /// First face model and first background model, when the lists are non-empty.
    pub fn default_choice(&self) -> (Option<String>, Option<String>) {
        (self.face_models.first().cloned(), self.bg_models.first().cloned())
    }
}

/// Body of `POST /start_analysis/{jobId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartAnalysisRequest {
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub face_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bg_model: Option<String>,
}

impl StartAnalysisRequest {
    pub fn comparison() -> Self {
        Self {
            mode: Mode::Comparison,
            face_model: None,
            bg_model: None,
        }
    }

    pub fn quick_analysis(face_model: impl Into<String>, bg_model: impl Into<String>) -> Self {
        Self {
            mode: Mode::QuickAnalysis,
            face_model: Some(face_model.into()),
            bg_model: Some(bg_model.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Missing or unrecognised; treated as still running.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Body of `GET /status/{jobId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Option<ResultsBundle>,
}

/// String-keyed map that keeps the order keys arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Per-model output of a completed job, keyed by model name.
pub type ResultsBundle = OrderedMap<ModelResult>;

/// Group label -> ordered member lists, each an ordered list of filenames.
pub type Groups = OrderedMap<Vec<Vec<String>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimilarityScores {
    pub cosine: f64,
    pub pearson: f64,
}

impl SimilarityScores {
    /// Missing, `null` or non-numeric scores read as 0.
    fn from_value(value: &Value) -> Self {
        Self {
            cosine: lenient_f64(value.get("cosine")),
            pearson: lenient_f64(value.get("pearson")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceModelResult {
    pub image_count: u64,
    pub processing_time: f64,
    pub face_groups: Groups,
    pub avg_face_scores: HashMap<String, SimilarityScores>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundModelResult {
    pub image_count: u64,
    pub processing_time: f64,
    pub background_groups: Groups,
    pub avg_background_scores: HashMap<String, SimilarityScores>,
}

/// One model's record, told apart by which group key the backend sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelResult {
    Face(FaceModelResult),
    Background(BackgroundModelResult),
    Unrecognized(Value),
}

impl<'de> Deserialize<'de> for ModelResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ModelResult::from_value)
    }
}

fn lenient_f64(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

fn lenient_count(value: Option<&Value>) -> u64 {
    value
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)))
        .unwrap_or(0)
}

fn lenient_groups(value: &Value) -> Groups {
    let Some(groups) = value.as_object() else {
        return Groups::new();
    };
    groups
        .iter()
        .map(|(label, lists)| {
            let lists = Vec::<Vec<String>>::deserialize(lists).unwrap_or_else(|e| {
                log::warn!("Unreadable member lists in group {}: {}", label, e);
                Vec::new()
            });
            (label.as_str(), lists)
        })
        .collect()
}

fn lenient_scores(value: Option<&Value>) -> HashMap<String, SimilarityScores> {
    value
        .and_then(Value::as_object)
        .map(|scores| {
            scores
                .iter()
                .map(|(key, score)| (key.clone(), SimilarityScores::from_value(score)))
                .collect()
        })
        .unwrap_or_default()
}

impl ModelResult {
    /// The group key alone decides the kind; every other field is read
    /// leniently so one odd value does not hide the whole record.
    pub fn from_value(value: Value) -> Self {
        let fields = match value {
            Value::Object(fields) => fields,
            other => return ModelResult::Unrecognized(other),
        };

        if let Some(groups) = fields.get("face_groups") {
            ModelResult::Face(FaceModelResult {
                image_count: lenient_count(fields.get("image_count")),
                processing_time: lenient_f64(fields.get("processing_time")),
                face_groups: lenient_groups(groups),
                avg_face_scores: lenient_scores(fields.get("avg_face_scores")),
            })
        } else if let Some(groups) = fields.get("background_groups") {
            ModelResult::Background(BackgroundModelResult {
                image_count: lenient_count(fields.get("image_count")),
                processing_time: lenient_f64(fields.get("processing_time")),
                background_groups: lenient_groups(groups),
                avg_background_scores: lenient_scores(fields.get("avg_background_scores")),
            })
        } else {
            ModelResult::Unrecognized(Value::Object(fields))
        }
    }

    pub fn image_count(&self) -> Option<u64> {
        match self {
            ModelResult::Face(r) => Some(r.image_count),
            ModelResult::Background(r) => Some(r.image_count),
            ModelResult::Unrecognized(_) => None,
        }
    }

    pub fn processing_time(&self) -> Option<f64> {
        match self {
            ModelResult::Face(r) => Some(r.processing_time),
            ModelResult::Background(r) => Some(r.processing_time),
            ModelResult::Unrecognized(_) => None,
        }
    }

    /// Group map and score map, whichever kind of record this is.
    pub fn groups_and_scores(&self) -> Option<(&Groups, &HashMap<String, SimilarityScores>)> {
        match self {
            ModelResult::Face(r) => Some((&r.face_groups, &r.avg_face_scores)),
            ModelResult::Background(r) => Some((&r.background_groups, &r.avg_background_scores)),
            ModelResult::Unrecognized(_) => None,
        }
    }
}
