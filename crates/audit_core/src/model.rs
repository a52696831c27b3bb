use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::page::null_as_empty;
use crate::{PageRecord, ShapeError, WorkflowKind};

/// Cluster identifier, always held as text.
///
/// The service may send numeric ids in one place and string ids in another,
/// so both decode to the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClusterId(String);

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClusterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClusterId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl<'de> Deserialize<'de> for ClusterId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawClusterId::deserialize(deserializer)? {
            RawClusterId::Text(text) => text,
            RawClusterId::Signed(n) => n.to_string(),
            RawClusterId::Unsigned(n) => n.to_string(),
            RawClusterId::Float(n) => n.to_string(),
        };
        Ok(ClusterId(id))
    }
}

/// Mapping keyed by cluster id that keeps the order the service sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMap<V> {
    entries: Vec<(ClusterId, V)>,
}

impl<V> Default for ClusterMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> ClusterMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `id`, keeping the position of an existing entry.
    pub fn insert(&mut self, id: ClusterId, value: V) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((id, value)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == id)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClusterId, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ClusterId> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(ClusterId, V)> for ClusterMap<V> {
    fn from_iter<I: IntoIterator<Item = (ClusterId, V)>>(iter: I) -> Self {
        let mut map = ClusterMap::new();
        for (id, value) in iter {
            map.insert(id, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for ClusterMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ClusterMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for ClusterMapVisitor<V> {
    type Value = ClusterMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map keyed by cluster id")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ClusterMap::new();
        while let Some((key, value)) = access.next_entry::<ClusterId, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for ClusterMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ClusterMapVisitor(PhantomData))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteredPage {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    pub cluster: ClusterId,
}

impl ClusteredPage {
    pub fn page(&self) -> PageRecord {
        PageRecord::new(&self.url, &self.lang, &self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterResult {
    pub clusters: ClusterMap<Vec<String>>,
    #[serde(default)]
    pub cluster_keywords: ClusterMap<Vec<String>>,
    pub clustered_pages: Vec<ClusteredPage>,
}

impl ClusterResult {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.clustered_pages.is_empty()
    }

    /// Checks that clusters and clustered pages describe the same
    /// membership: every page is listed under the cluster it declares, every
    /// listing has a page behind it, and keywords only name known clusters.
    ///
    /// Pages are matched on (url, cluster), so a url the batch holds twice may
    /// sit in two clusters as long as a page declares each of them.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let mut listed: HashSet<(&str, &str)> = HashSet::new();
        let mut first_listing: HashMap<&str, &ClusterId> = HashMap::new();
        let mut position: HashMap<&str, usize> = HashMap::new();
        for (index, (id, urls)) in self.clusters.iter().enumerate() {
            position.insert(id.as_str(), index);
            for url in urls {
                listed.insert((url.as_str(), id.as_str()));
                first_listing.entry(url.as_str()).or_insert(id);
            }
        }

        let mut declared: HashSet<(&str, &str)> = HashSet::new();
        let mut declared_by_url: HashMap<&str, &ClusterId> = HashMap::new();
        for page in &self.clustered_pages {
            let key = (page.url.as_str(), page.cluster.as_str());
            if !listed.contains(&key) {
                return Err(match first_listing.get(page.url.as_str()) {
                    None => ShapeError::UnlistedPage {
                        url: page.url.clone(),
                    },
                    Some(listing) => ShapeError::MembershipMismatch {
                        url: page.url.clone(),
                        declared: page.cluster.to_string(),
                        listed: listing.to_string(),
                    },
                });
            }
            declared.insert(key);
            declared_by_url.entry(page.url.as_str()).or_insert(&page.cluster);
        }

        for (id, urls) in self.clusters.iter() {
            for url in urls {
                if declared.contains(&(url.as_str(), id.as_str())) {
                    continue;
                }
                return Err(match declared_by_url.get(url.as_str()) {
                    None => ShapeError::UnknownMember {
                        cluster: id.to_string(),
                        url: url.clone(),
                    },
                    Some(other) => {
                        let rank = |cluster: &ClusterId| position.get(cluster.as_str()).copied();
                        let (first, second) = if rank(*other) <= rank(id) {
                            (other.to_string(), id.to_string())
                        } else {
                            (id.to_string(), other.to_string())
                        };
                        ShapeError::DuplicateMembership {
                            url: url.clone(),
                            first,
                            second,
                        }
                    }
                });
            }
        }

        if let Some(id) = self
            .cluster_keywords
            .keys()
            .find(|id| !self.clusters.contains(id.as_str()))
        {
            return Err(ShapeError::UnknownKeywordCluster {
                cluster: id.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSuggestion {
    pub source_url: String,
    pub target_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub anchor_text: String,
    pub similarity: f64,
    #[serde(default)]
    pub same_language: bool,
}

/// Service-side knobs for link suggestion; capping is not redone locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequestParams {
    pub max_links_per_page: u32,
    pub same_language_only: bool,
}

impl Default for LinkRequestParams {
    fn default() -> Self {
        Self {
            max_links_per_page: 3,
            same_language_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizationPair {
    pub original: String,
    pub translation: String,
}

impl LocalizationPair {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.original.trim().is_empty() && !self.translation.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationRequest {
    pub originals: Vec<String>,
    pub translations: Vec<String>,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub original: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translation: String,
    pub similarity: f64,
}

/// A localization result joined to the pair it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedLocalization {
    pub index: usize,
    pub pair: LocalizationPair,
    pub result: LocalizationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiReadinessResult {
    pub url: String,
    pub score: f64,
    #[serde(default)]
    pub summary_similarity: Option<f64>,
    #[serde(default)]
    pub missing_headers: Vec<String>,
    #[serde(default)]
    pub llm_summary: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// A readiness result tagged with the index of the page it scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPage {
    pub index: usize,
    pub result: AiReadinessResult,
}

/// Decoded response of an analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Clusters(ClusterResult),
    Links(Vec<LinkSuggestion>),
    Localization(Vec<LocalizationResult>),
    Readiness(Vec<AiReadinessResult>),
}

impl AnalysisOutcome {
    pub fn workflow(&self) -> WorkflowKind {
        match self {
            AnalysisOutcome::Clusters(_) => WorkflowKind::Clustering,
            AnalysisOutcome::Links(_) => WorkflowKind::InternalLinks,
            AnalysisOutcome::Localization(_) => WorkflowKind::Localization,
            AnalysisOutcome::Readiness(_) => WorkflowKind::AiReadiness,
        }
    }

    pub(crate) fn mismatch(&self, expected: WorkflowKind) -> ShapeError {
        ShapeError::WrongOutcome {
            workflow: expected.to_string(),
            received: self.workflow().to_string(),
        }
    }
}

/// Tags each result with its position after checking that exactly one
/// result came back per submitted item.
pub(crate) fn align_by_position<R>(
    expected: usize,
    results: Vec<R>,
) -> Result<Vec<(usize, R)>, ShapeError> {
    if results.len() != expected {
        return Err(ShapeError::Misaligned {
            expected,
            actual: results.len(),
        });
    }
    Ok(results.into_iter().enumerate().collect())
}
