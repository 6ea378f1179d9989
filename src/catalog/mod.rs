// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Catalog store and tag index construction.
//!
//! Both are built exactly once at load: the store gives O(1) lookup by
//! component id, the index merges every tag source and then computes the
//! `unlabeled` tag in a final pass.

use std::collections::HashMap;

use crate::model::{ComponentId, RequestRecord, Tag, TagSet};

/// Immutable record list plus an id → record index.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Vec<RequestRecord>,
    index: HashMap<ComponentId, usize>,
}

impl CatalogStore {
    /// Builds the store. A duplicate id keeps the first record seen, matching
    /// the first-wins behavior of an id-keyed map.
    pub fn from_records(records: Vec<RequestRecord>) -> Self {
        let mut deduped: Vec<RequestRecord> = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            if index.contains_key(record.component_id()) {
                continue;
            }
            index.insert(record.component_id().clone(), deduped.len());
            deduped.push(record);
        }
        Self { records: deduped, index }
    }

    pub fn get(&self, id: &ComponentId) -> Option<&RequestRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[RequestRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-record tag sets merged from the auxiliary tag sources.
///
/// After construction every catalog record has an entry, and a record carries
/// [`Tag::Unlabeled`] iff its other-tag set is empty.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: HashMap<ComponentId, TagSet>,
}

impl TagIndex {
    /// Merges `(tag, ids)` contributions and runs the `unlabeled` pass over
    /// the catalog. Source ordering does not matter: `unlabeled` is computed
    /// only after all contributions are in.
    pub fn build<I>(catalog: &CatalogStore, sources: I) -> Self
    where
        I: IntoIterator<Item = (Tag, Vec<ComponentId>)>,
    {
        let mut tags: HashMap<ComponentId, TagSet> = HashMap::with_capacity(catalog.len());

        for (tag, ids) in sources {
            // Unlabeled is computed, never sourced.
            if tag == Tag::Unlabeled {
                continue;
            }
            for id in ids {
                tags.entry(id).or_default().insert(tag);
            }
        }

        for record in catalog.records() {
            let entry = tags.entry(record.component_id().clone()).or_default();
            if entry.is_empty() {
                entry.insert(Tag::Unlabeled);
            }
        }

        Self { tags }
    }

    pub fn tags_for(&self, id: &ComponentId) -> TagSet {
        self.tags.get(id).cloned().unwrap_or_default()
    }

    pub fn has_tag(&self, id: &ComponentId, tag: Tag) -> bool {
        self.tags.get(id).is_some_and(|set| set.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ComponentId, RequestRecord, Tag};

    use super::{CatalogStore, TagIndex};

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s).expect("component id")
    }

    fn record(s: &str) -> RequestRecord {
        RequestRecord::new(id(s), s.to_owned(), 1, "drawable")
    }

    fn fixture_catalog() -> CatalogStore {
        CatalogStore::from_records(vec![record("com.a/.A"), record("com.b/.B"), record("com.c/.C")])
    }

    #[test]
    fn store_indexes_by_id() {
        let catalog = fixture_catalog();
        assert_eq!(catalog.len(), 3);
        let found = catalog.get(&id("com.b/.B")).expect("record");
        assert_eq!(found.component_id().as_str(), "com.b/.B");
        assert!(catalog.get(&id("com.x/.X")).is_none());
    }

    #[test]
    fn duplicate_ids_keep_the_first_record() {
        let mut first = record("com.a/.A");
        first.set_installs(Some("5+".to_owned()));
        let catalog = CatalogStore::from_records(vec![first, record("com.a/.A")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&id("com.a/.A")).expect("record").installs(), Some("5+"));
    }

    #[test]
    fn unlabeled_iff_no_other_tag() {
        let catalog = fixture_catalog();
        let index = TagIndex::build(
            &catalog,
            vec![(Tag::Wip, vec![id("com.a/.A")]), (Tag::Easy, vec![id("com.a/.A")])],
        );

        let tagged = index.tags_for(&id("com.a/.A"));
        assert!(tagged.contains(Tag::Wip));
        assert!(tagged.contains(Tag::Easy));
        assert!(!tagged.contains(Tag::Unlabeled));

        for plain in ["com.b/.B", "com.c/.C"] {
            let tags = index.tags_for(&id(plain));
            assert_eq!(tags.len(), 1);
            assert!(tags.contains(Tag::Unlabeled));
        }
    }

    #[test]
    fn unlabeled_pass_is_order_independent() {
        let catalog = fixture_catalog();
        let forward = TagIndex::build(
            &catalog,
            vec![(Tag::Wip, vec![id("com.a/.A")]), (Tag::Link, vec![id("com.b/.B")])],
        );
        let reversed = TagIndex::build(
            &catalog,
            vec![(Tag::Link, vec![id("com.b/.B")]), (Tag::Wip, vec![id("com.a/.A")])],
        );

        for key in ["com.a/.A", "com.b/.B", "com.c/.C"] {
            assert_eq!(forward.tags_for(&id(key)), reversed.tags_for(&id(key)));
        }
    }

    #[test]
    fn sourced_unlabeled_contributions_are_ignored() {
        let catalog = fixture_catalog();
        let index = TagIndex::build(
            &catalog,
            vec![(Tag::Unlabeled, vec![id("com.a/.A")]), (Tag::Wip, vec![id("com.a/.A")])],
        );
        assert!(!index.has_tag(&id("com.a/.A"), Tag::Unlabeled));
        assert!(index.has_tag(&id("com.a/.A"), Tag::Wip));
    }
}
