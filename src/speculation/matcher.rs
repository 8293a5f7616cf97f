//! Document rule matchers.
//!
//! Serialized in the browser's speculation rules format:
//!
//! ```json
//! {"and": [{"href_matches": "/*"}, {"not": {"selector_matches": ".no-prerender"}}]}
//! ```

use serde::Serialize;

use crate::core::PathPattern;

/// One or several URL patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PatternList {
    Single(PathPattern),
    List(Vec<PathPattern>),
}

impl PatternList {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPattern> {
        match self {
            Self::Single(p) => std::slice::from_ref(p).iter(),
            Self::List(list) => list.iter(),
        }
    }
}

/// Boolean matcher over the links of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherNode {
    HrefMatches(PatternList),
    SelectorMatches(String),
    And(Vec<MatcherNode>),
    Not(Box<MatcherNode>),
}

impl MatcherNode {
    pub fn href(pattern: PathPattern) -> Self {
        Self::HrefMatches(PatternList::Single(pattern))
    }

    pub fn hrefs(patterns: Vec<PathPattern>) -> Self {
        Self::HrefMatches(PatternList::List(patterns))
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        Self::SelectorMatches(selector.into())
    }

    pub fn negate(node: MatcherNode) -> Self {
        Self::Not(Box::new(node))
    }
}
