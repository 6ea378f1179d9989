// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use super::tag::TagSet;

/// Sort order applied as the last pipeline stage.
///
/// `Random` never persists a stable order: every pipeline recomputation
/// reshuffles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    RequestsDesc,
    RequestsAsc,
    InstallsDesc,
    InstallsAsc,
    LastRequestedDesc,
    LastRequestedAsc,
    NameAsc,
    NameDesc,
    Random,
}

impl SortKey {
    pub const ALL: [SortKey; 9] = [
        SortKey::RequestsDesc,
        SortKey::RequestsAsc,
        SortKey::InstallsDesc,
        SortKey::InstallsAsc,
        SortKey::LastRequestedDesc,
        SortKey::LastRequestedAsc,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::Random,
    ];

    /// Persisted value, shared with the URL-state codec.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestsDesc => "req-desc",
            Self::RequestsAsc => "req-asc",
            Self::InstallsDesc => "install-desc",
            Self::InstallsAsc => "install-asc",
            Self::LastRequestedDesc => "time-desc",
            Self::LastRequestedAsc => "time-asc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Random => "rand",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RequestsDesc => "Requests ↓",
            Self::RequestsAsc => "Requests ↑",
            Self::InstallsDesc => "Installs ↓",
            Self::InstallsAsc => "Installs ↑",
            Self::LastRequestedDesc => "Last requested ↓",
            Self::LastRequestedAsc => "Last requested ↑",
            Self::NameAsc => "Name A–Z",
            Self::NameDesc => "Name Z–A",
            Self::Random => "Random",
        }
    }

    /// The next key in [`SortKey::ALL`], wrapping; used by the TUI cycle key.
    pub fn next(self) -> SortKey {
        let index = Self::ALL.iter().position(|key| *key == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseSortKeyError { value: s.to_owned() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortKeyError {
    value: String,
}

impl fmt::Display for ParseSortKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort key '{}'", self.value)
    }
}

impl std::error::Error for ParseSortKeyError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }

    pub fn toggled(self) -> ViewMode {
        match self {
            Self::List => Self::Grid,
            Self::Grid => Self::List,
        }
    }
}

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "grid" => Ok(Self::Grid),
            other => Err(ParseViewModeError { value: other.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseViewModeError {
    value: String,
}

impl fmt::Display for ParseViewModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view mode '{}'", self.value)
    }
}

impl std::error::Error for ParseViewModeError {}

/// Everything the pipeline needs to turn the catalog into the displayed
/// order. Mutated only through the dashboard dispatch, one event at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub active_filters: TagSet,
    pub sort: SortKey,
    pub regex_mode: bool,
    pub view: ViewMode,
}

impl ViewState {
    pub fn is_default(&self) -> bool {
        *self == ViewState::default()
    }
}
