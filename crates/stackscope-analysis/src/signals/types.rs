//! Signal identities and the aggregated signal index.

use std::fmt;

use serde::{Deserialize, Serialize};
use stackscope_core::errors::InputError;
use stackscope_core::types::collections::{BTreeMap, BTreeSet};
use stackscope_core::{Dimension, PlatformLabel};

/// A normalized signal: one dimension plus a normalized name.
///
/// Displays as `dimension:name` (`header:x-powered-by`), which is also the key
/// used in emitted correlation maps and its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignalKey {
    pub dimension: Dimension,
    pub name: String,
}

impl SignalKey {
    pub fn new(dimension: Dimension, name: impl Into<String>) -> Self {
        Self {
            dimension,
            name: name.into(),
        }
    }

    pub fn header(name: &str) -> Self {
        Self::new(Dimension::Header, name)
    }

    pub fn meta(name: &str) -> Self {
        Self::new(Dimension::Meta, name)
    }

    pub fn script(name: &str) -> Self {
        Self::new(Dimension::Script, name)
    }

    /// The `dimension:name` string form.
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// Parse the `dimension:name` form. The name may itself contain colons.
    pub fn parse(id: &str) -> Option<Self> {
        let (dimension, name) = id.split_once(':')?;
        let dimension = Dimension::from_name(dimension)?;
        if name.is_empty() {
            return None;
        }
        Some(Self::new(dimension, name))
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dimension, self.name)
    }
}

impl TryFrom<String> for SignalKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid signal id {value:?}"))
    }
}

impl From<SignalKey> for String {
    fn from(value: SignalKey) -> Self {
        value.id()
    }
}

/// The set of sites a signal was observed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalOccurrence {
    pub key: SignalKey,
    pub sites: BTreeSet<String>,
}

impl SignalOccurrence {
    pub fn new(key: SignalKey) -> Self {
        Self {
            key,
            sites: BTreeSet::new(),
        }
    }

    /// Number of distinct sites carrying the signal.
    pub fn occurrences(&self) -> usize {
        self.sites.len()
    }
}

/// Output of the aggregator: every signal's site set plus each site's label.
///
/// A site appears at most once in any occurrence set, and every site in an
/// occurrence set has an entry in `site_labels`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalIndex {
    pub total_sites: usize,
    pub site_labels: BTreeMap<String, PlatformLabel>,
    pub occurrences: BTreeMap<SignalKey, SignalOccurrence>,
    #[serde(skip)]
    pub issues: Vec<InputError>,
}

impl SignalIndex {
    pub fn is_empty(&self) -> bool {
        self.total_sites == 0
    }

    pub fn signal_count(&self) -> usize {
        self.occurrences.len()
    }

    pub fn get(&self, key: &SignalKey) -> Option<&SignalOccurrence> {
        self.occurrences.get(key)
    }

    /// Look a signal up by its `dimension:name` id.
    pub fn get_by_id(&self, id: &str) -> Option<&SignalOccurrence> {
        SignalKey::parse(id).and_then(|key| self.occurrences.get(&key))
    }

    /// Label of a site. Sites not in the index are `Unknown`.
    pub fn label_of(&self, site: &str) -> PlatformLabel {
        self.site_labels
            .get(site)
            .cloned()
            .unwrap_or(PlatformLabel::Unknown)
    }

    /// Number of sites per label, over the whole dataset.
    pub fn label_counts(&self) -> BTreeMap<PlatformLabel, usize> {
        let mut counts = BTreeMap::new();
        for label in self.site_labels.values() {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of sites per label, restricted to `sites`.
    pub fn label_counts_for<'a, I>(&self, sites: I) -> BTreeMap<PlatformLabel, usize>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut counts = BTreeMap::new();
        for site in sites {
            *counts.entry(self.label_of(site)).or_insert(0) += 1;
        }
        counts
    }

    /// Signals occurring on at least `min_occurrences` sites, in key order.
    pub fn signals_with_min_occurrences(
        &self,
        min_occurrences: usize,
    ) -> impl Iterator<Item = &SignalOccurrence> {
        self.occurrences
            .values()
            .filter(move |occ| occ.occurrences() >= min_occurrences)
    }
}
