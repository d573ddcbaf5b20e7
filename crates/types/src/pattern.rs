use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How strictly an offer's item list must follow a pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every term satisfied and every offer item accounted for by some term.
    #[default]
    Exact,

    /// Every term satisfied; unrelated extra items are tolerated.
    Superset,
}

/// One term of an item pattern.
///
/// Serialized untagged: a bare string is a required id, an array is a group
/// of interchangeable ids of which exactly one must appear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemTerm {
    Required(String),
    ExactlyOneOf(BTreeSet<String>),
}

impl ItemTerm {
    pub fn required(id: impl Into<String>) -> Self {
        Self::Required(id.into())
    }

    pub fn one_of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExactlyOneOf(ids.into_iter().map(Into::into).collect())
    }

    fn is_satisfied_by(&self, item_ids: &[String]) -> bool {
        match self {
            Self::Required(id) => item_ids.iter().any(|item| item == id),
            // two interchangeable items where one was authorized must not pass
            Self::ExactlyOneOf(alternatives) => {
                item_ids
                    .iter()
                    .filter(|item| alternatives.contains(item.as_str()))
                    .count()
                    == 1
            }
        }
    }

    fn references(&self, item_id: &str) -> bool {
        match self {
            Self::Required(id) => id == item_id,
            Self::ExactlyOneOf(alternatives) => alternatives.contains(item_id),
        }
    }
}

/// Expected item set of a trade, as a sequence of terms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPattern(Vec<ItemTerm>);

impl ItemPattern {
    pub fn new(terms: Vec<ItemTerm>) -> Self {
        Self(terms)
    }

    /// Pattern made only of required ids.
    pub fn exact<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(ItemTerm::required).collect())
    }

    pub fn terms(&self) -> &[ItemTerm] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check an offer's items against this pattern.
    ///
    /// An empty pattern never matches.
    pub fn matches(&self, item_ids: &[String], mode: MatchMode) -> bool {
        if self.0.is_empty() {
            return false;
        }

        if !self.0.iter().all(|term| term.is_satisfied_by(item_ids)) {
            return false;
        }

        match mode {
            MatchMode::Superset => true,
            MatchMode::Exact => item_ids
                .iter()
                .all(|item| self.0.iter().any(|term| term.references(item))),
        }
    }
}

impl From<Vec<ItemTerm>> for ItemPattern {
    fn from(terms: Vec<ItemTerm>) -> Self {
        Self(terms)
    }
}

impl FromIterator<ItemTerm> for ItemPattern {
    fn from_iter<T: IntoIterator<Item = ItemTerm>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
