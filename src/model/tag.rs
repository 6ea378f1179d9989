// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// Closed set of tags a request record can carry.
///
/// `Unlabeled` is never sourced from a tag file; it is computed once at load
/// for every record that ends up with no other tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Wip,
    Easy,
    Conflict,
    Link,
    Unlabeled,
}

impl Tag {
    /// All tags, in display/fetch order.
    pub const ALL: [Tag; 5] = [Tag::Unlabeled, Tag::Wip, Tag::Easy, Tag::Conflict, Tag::Link];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wip => "wip",
            Self::Easy => "easy",
            Self::Conflict => "conflict",
            Self::Link => "link",
            Self::Unlabeled => "unlabeled",
        }
    }

    /// Human-facing label used when a tag source carries no metadata.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Wip => "WIP",
            Self::Easy => "Easy",
            Self::Conflict => "Conflict",
            Self::Link => "Link",
            Self::Unlabeled => "Unlabeled",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wip" => Ok(Self::Wip),
            "easy" => Ok(Self::Easy),
            "conflict" => Ok(Self::Conflict),
            "link" => Ok(Self::Link),
            "unlabeled" => Ok(Self::Unlabeled),
            other => Err(ParseTagError { value: other.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
    value: String,
}

impl ParseTagError {
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag '{}'", self.value)
    }
}

impl std::error::Error for ParseTagError {}

/// Small ordered set of tags.
///
/// A record carries at most [`Tag::ALL`] tags, so this stays inline and keeps
/// a deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: SmallVec<[Tag; 4]>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag, returning whether it was newly added.
    pub fn insert(&mut self, tag: Tag) -> bool {
        match self.tags.binary_search(&tag) {
            Ok(_) => false,
            Err(index) => {
                self.tags.insert(index, tag);
                true
            }
        }
    }

    pub fn remove(&mut self, tag: Tag) -> bool {
        match self.tags.binary_search(&tag) {
            Ok(index) => {
                self.tags.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tags.binary_search(&tag).is_ok()
    }

    /// AND semantics: every tag in `other` is present in `self`.
    pub fn contains_all(&self, other: &TagSet) -> bool {
        other.iter().all(|tag| self.contains(tag))
    }

    pub fn union(&self, other: &TagSet) -> TagSet {
        let mut merged = self.clone();
        for tag in other.iter() {
            merged.insert(tag);
        }
        merged
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tags.iter().copied()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}
