// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! View-state ⇄ query-string codec.
//!
//! The persisted form stays minimal: every field equal to its default is
//! omitted, so `decode(encode(s))` reproduces exactly the non-default fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::model::{SortKey, Tag, TagSet, ViewMode, ViewState};

pub const KEY_SEARCH: &str = "q";
pub const KEY_VIEW: &str = "view";
pub const KEY_SORT: &str = "sort";
pub const KEY_REGEX: &str = "regex";
pub const KEY_FILTERS: &str = "filters";

/// Default file name for the on-disk store inside a data directory.
pub const VIEW_STATE_FILENAME: &str = "view-state.json";

/// External key-value store the view state is persisted through (e.g. the
/// page URL). One direction per event: the dashboard only ever writes after
/// a state change and only ever reads once at startup.
pub trait StateStore {
    fn read(&self) -> Vec<(String, String)>;
    fn replace(&mut self, pairs: &[(String, String)]);
}

/// [`StateStore`] backed by a small JSON object on disk.
///
/// Reads fail soft: a missing or malformed file is an empty store. Writes
/// are best-effort; a failed write leaves the previous file in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn read(&self) -> Vec<(String, String)> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(map) => map
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(value) => Some((key, value)),
                    _ => None,
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn replace(&mut self, pairs: &[(String, String)]) {
        let map: Map<String, Value> = pairs
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        if let Ok(body) = serde_json::to_string_pretty(&Value::Object(map)) {
            let _ = fs::write(&self.path, body);
        }
    }
}

/// Encodes the non-default fields of a view state.
pub fn encode(view: &ViewState) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if !view.search.is_empty() {
        pairs.push((KEY_SEARCH.to_owned(), view.search.clone()));
    }
    if view.view != ViewMode::default() {
        pairs.push((KEY_VIEW.to_owned(), view.view.as_str().to_owned()));
    }
    if view.sort != SortKey::default() {
        pairs.push((KEY_SORT.to_owned(), view.sort.as_str().to_owned()));
    }
    if view.regex_mode {
        pairs.push((KEY_REGEX.to_owned(), "1".to_owned()));
    }
    if !view.active_filters.is_empty() {
        let mut names: Vec<&str> = view.active_filters.iter().map(Tag::as_str).collect();
        names.sort_unstable();
        pairs.push((KEY_FILTERS.to_owned(), names.join(",")));
    }
    pairs
}

/// Applies persisted pairs over the default view state.
///
/// Unknown keys, sort keys, view modes and tag names are ignored; the
/// presence of the regex key enables regex mode regardless of its value.
pub fn decode<'a, I>(pairs: I) -> ViewState
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut view = ViewState::default();
    for (key, value) in pairs {
        match key {
            KEY_SEARCH => view.search = value.to_owned(),
            KEY_VIEW => {
                if let Ok(mode) = value.parse::<ViewMode>() {
                    view.view = mode;
                }
            }
            KEY_SORT => {
                if let Ok(sort) = value.parse::<SortKey>() {
                    view.sort = sort;
                }
            }
            KEY_REGEX => view.regex_mode = true,
            KEY_FILTERS => {
                view.active_filters = value
                    .split(',')
                    .filter_map(|raw| raw.parse::<Tag>().ok())
                    .collect::<TagSet>();
            }
            _ => {}
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::model::{SortKey, Tag, TagSet, ViewMode, ViewState};

    use super::{decode, encode, FileStore, StateStore, VIEW_STATE_FILENAME};

    fn round_trip(view: &ViewState) -> ViewState {
        let pairs = encode(view);
        decode(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    #[test]
    fn default_state_encodes_to_nothing() {
        assert!(encode(&ViewState::default()).is_empty());
    }

    #[test]
    fn non_default_fields_round_trip_exactly() {
        let view = ViewState {
            search: "is:wip maps".to_owned(),
            active_filters: [Tag::Easy, Tag::Link].into_iter().collect(),
            sort: SortKey::NameAsc,
            regex_mode: true,
            view: ViewMode::Grid,
        };
        assert_eq!(round_trip(&view), view);
    }

    #[rstest]
    #[case(ViewState { search: "bank".to_owned(), ..ViewState::default() })]
    #[case(ViewState { sort: SortKey::Random, ..ViewState::default() })]
    #[case(ViewState { regex_mode: true, ..ViewState::default() })]
    #[case(ViewState { view: ViewMode::Grid, ..ViewState::default() })]
    #[case(ViewState { active_filters: [Tag::Wip].into_iter().collect(), ..ViewState::default() })]
    fn single_field_round_trips(#[case] view: ViewState) {
        assert_eq!(round_trip(&view), view);
    }

    #[test]
    fn filters_encode_sorted_and_comma_joined() {
        let view = ViewState {
            active_filters: [Tag::Link, Tag::Wip].into_iter().collect(),
            ..ViewState::default()
        };
        let pairs = encode(&view);
        assert_eq!(pairs, vec![("filters".to_owned(), "link,wip".to_owned())]);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let view = decode(vec![
            ("sort", "popularity"),
            ("view", "table"),
            ("filters", "wip,urgent"),
            ("bogus", "1"),
        ]);
        assert_eq!(view.sort, SortKey::default());
        assert_eq!(view.view, ViewMode::default());
        assert_eq!(view.active_filters, [Tag::Wip].into_iter().collect::<TagSet>());
    }

    #[test]
    fn regex_key_presence_enables_regex_mode() {
        assert!(decode(vec![("regex", "")]).regex_mode);
        assert!(decode(vec![("regex", "true")]).regex_mode);
        assert!(!decode(Vec::<(&str, &str)>::new()).regex_mode);
    }

    #[test]
    fn file_store_round_trips_encoded_pairs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileStore::new(dir.path().join(VIEW_STATE_FILENAME));

        let view = ViewState {
            search: "is:wip maps".to_owned(),
            sort: SortKey::NameAsc,
            ..ViewState::default()
        };
        store.replace(&encode(&view));

        let pairs = store.read();
        let restored = decode(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        assert_eq!(restored, view);
    }

    #[test]
    fn file_store_reads_missing_file_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().join(VIEW_STATE_FILENAME));
        assert!(store.read().is_empty());
    }

    #[test]
    fn file_store_reads_malformed_file_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(VIEW_STATE_FILENAME);
        std::fs::write(&path, "not json").expect("write file");
        assert!(FileStore::new(&path).read().is_empty());

        std::fs::write(&path, r#"{"q": 42}"#).expect("write file");
        assert!(FileStore::new(&path).read().is_empty());
    }
}
