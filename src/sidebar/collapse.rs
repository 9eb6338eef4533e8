use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Key of a collapsible sidebar section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollapseKey {
    /// The "popular" pseudo-category.
    Popularity,
    /// The "all feeds" pseudo-category.
    All,
    /// A tag category, by tag id.
    Category(i64),
}

impl fmt::Display for CollapseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Popularity => f.write_str("__popularity"),
            Self::All => f.write_str("__all"),
            Self::Category(id) => write!(f, "{}", id),
        }
    }
}

impl std::str::FromStr for CollapseKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "__popularity" => Ok(Self::Popularity),
            "__all" => Ok(Self::All),
            other => other.parse().map(Self::Category),
        }
    }
}

impl Serialize for CollapseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-section collapse flags.
///
/// The two pseudo-categories start collapsed. Categories are added once, as
/// expanded, when first seen; later data refreshes never touch existing
/// entries. Only [`toggle`](Self::toggle) changes an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CollapseState {
    entries: BTreeMap<CollapseKey, bool>,
}

impl Default for CollapseState {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(CollapseKey::Popularity, true);
        entries.insert(CollapseKey::All, true);
        Self { entries }
    }
}

impl CollapseState {
    pub fn get(&self, key: CollapseKey) -> Option<bool> {
        self.entries.get(&key).copied()
    }

    /// Add entries for categories not seen before. Returns how many were added.
    pub fn discover(&mut self, ids: impl IntoIterator<Item = i64>) -> usize {
        let mut added = 0;
        for id in ids {
            if let std::collections::btree_map::Entry::Vacant(entry) =
                self.entries.entry(CollapseKey::Category(id))
            {
                entry.insert(false);
                added += 1;
            }
        }
        added
    }

    /// Flip a section. Unknown keys start from collapsed. Returns the new flag.
    pub fn toggle(&mut self, key: CollapseKey) -> bool {
        let flag = self.entries.entry(key).or_insert(true);
        *flag = !*flag;
        *flag
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CollapseKey, bool)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}
