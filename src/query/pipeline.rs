// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

use std::cmp::{Ordering, Reverse};

use rand::seq::SliceRandom;
use rand::Rng;
use regex::RegexBuilder;

use crate::catalog::{CatalogStore, TagIndex};
use crate::model::{ComponentId, RequestRecord, SortKey, ViewState};

use super::parse::parse_query;

/// Computes the displayed order for the current view state.
///
/// Stages run in fixed order: tag filter (AND semantics over active filters
/// plus tags parsed from the search text), text filter (substring or regex
/// over label and id; an invalid regex yields an empty result), then sort
/// over a copy. Deterministic for every sort key except [`SortKey::Random`],
/// which reshuffles on every call.
pub fn run_pipeline<R: Rng>(
    catalog: &CatalogStore,
    tags: &TagIndex,
    view: &ViewState,
    rng: &mut R,
) -> Vec<ComponentId> {
    let parsed = parse_query(&view.search);
    let effective_tags = view.active_filters.union(&parsed.tags);

    let mut result: Vec<&RequestRecord> = catalog
        .records()
        .iter()
        .filter(|record| {
            effective_tags.is_empty()
                || tags.tags_for(record.component_id()).contains_all(&effective_tags)
        })
        .collect();

    if !parsed.text.is_empty() {
        if view.regex_mode {
            match RegexBuilder::new(&parsed.text).case_insensitive(true).build() {
                Ok(regex) => result.retain(|record| {
                    regex.is_match(record.label()) || regex.is_match(record.component_id().as_str())
                }),
                // Fail-soft: a pattern the user is still typing empties the
                // view instead of erroring out of the pipeline.
                Err(_) => result.clear(),
            }
        } else {
            let needle = parsed.text.to_lowercase();
            result.retain(|record| {
                record.label().to_lowercase().contains(&needle)
                    || record.component_id().as_str().to_lowercase().contains(&needle)
            });
        }
    }

    match view.sort {
        SortKey::Random => result.shuffle(rng),
        // Name keys are lowercased strings; cache them once per record
        // instead of allocating inside the comparator.
        SortKey::NameAsc => result.sort_by_cached_key(|record| name_key(record)),
        SortKey::NameDesc => result.sort_by_cached_key(|record| Reverse(name_key(record))),
        key => result.sort_by(comparator(key)),
    }

    result.into_iter().map(|record| record.component_id().clone()).collect()
}

fn comparator(key: SortKey) -> fn(&&RequestRecord, &&RequestRecord) -> Ordering {
    match key {
        SortKey::RequestsDesc => |a, b| b.request_count().cmp(&a.request_count()),
        SortKey::RequestsAsc => |a, b| a.request_count().cmp(&b.request_count()),
        // `Option` ordering puts absent counts below every known count.
        SortKey::InstallsDesc => |a, b| b.install_count().cmp(&a.install_count()),
        SortKey::InstallsAsc => |a, b| a.install_count().cmp(&b.install_count()),
        SortKey::LastRequestedDesc => |a, b| b.last_requested().cmp(&a.last_requested()),
        SortKey::LastRequestedAsc => |a, b| a.last_requested().cmp(&b.last_requested()),
        // Name and random sorts never reach the comparator.
        SortKey::NameAsc | SortKey::NameDesc | SortKey::Random => |_, _| Ordering::Equal,
    }
}

fn name_key(record: &RequestRecord) -> (String, String) {
    (record.label().to_lowercase(), record.label().to_owned())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::catalog::{CatalogStore, TagIndex};
    use crate::model::{ComponentId, RequestRecord, SortKey, Tag, ViewState};

    use super::run_pipeline;

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s).expect("component id")
    }

    fn fixture() -> (CatalogStore, TagIndex) {
        let mut maps = RequestRecord::new(id("com.maps/.Maps"), "Maps", 50, "maps");
        maps.set_installs(Some("10,000,000+".to_owned()));
        maps.set_last_requested(Some(300));

        let mut mail = RequestRecord::new(id("com.mail/.Mail"), "mail", 10, "mail");
        mail.set_last_requested(Some(100));

        let mut bank = RequestRecord::new(id("com.bank/.Bank"), "Bank", 30, "bank");
        bank.set_installs(Some("500+".to_owned()));
        bank.set_last_requested(Some(200));

        let catalog = CatalogStore::from_records(vec![maps, mail, bank]);
        let tags = TagIndex::build(
            &catalog,
            vec![
                (Tag::Wip, vec![id("com.maps/.Maps"), id("com.bank/.Bank")]),
                (Tag::Easy, vec![id("com.maps/.Maps")]),
            ],
        );
        (catalog, tags)
    }

    fn ids(result: &[ComponentId]) -> Vec<&str> {
        result.iter().map(|id| id.as_str()).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn default_sort_is_request_count_desc() {
        let (catalog, tags) = fixture();
        let result = run_pipeline(&catalog, &tags, &ViewState::default(), &mut rng());
        assert_eq!(ids(&result), vec!["com.maps/.Maps", "com.bank/.Bank", "com.mail/.Mail"]);
    }

    #[test]
    fn pipeline_is_deterministic_for_non_random_sorts() {
        let (catalog, tags) = fixture();
        for sort in SortKey::ALL {
            if sort == SortKey::Random {
                continue;
            }
            let view = ViewState { sort, ..ViewState::default() };
            let first = run_pipeline(&catalog, &tags, &view, &mut rng());
            let second = run_pipeline(&catalog, &tags, &view, &mut rng());
            assert_eq!(first, second, "sort {sort:?} must be deterministic");
        }
    }

    #[test]
    fn tag_filters_use_and_semantics() {
        let (catalog, tags) = fixture();
        let view = ViewState {
            active_filters: [Tag::Wip, Tag::Easy].into_iter().collect(),
            ..ViewState::default()
        };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert_eq!(ids(&result), vec!["com.maps/.Maps"]);
    }

    #[test]
    fn search_tags_combine_with_active_filters() {
        let (catalog, tags) = fixture();
        let view = ViewState {
            search: "is:easy".to_owned(),
            active_filters: [Tag::Wip].into_iter().collect(),
            ..ViewState::default()
        };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert_eq!(ids(&result), vec!["com.maps/.Maps"]);
    }

    #[test]
    fn plain_text_matches_label_or_id_case_insensitively() {
        let (catalog, tags) = fixture();
        let view = ViewState { search: "MAIL".to_owned(), ..ViewState::default() };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert_eq!(ids(&result), vec!["com.mail/.Mail"]);

        let view = ViewState { search: "com.bank".to_owned(), ..ViewState::default() };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert_eq!(ids(&result), vec!["com.bank/.Bank"]);
    }

    #[test]
    fn regex_mode_matches_label_or_id() {
        let (catalog, tags) = fixture();
        let view = ViewState {
            search: "^ma".to_owned(),
            regex_mode: true,
            ..ViewState::default()
        };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert_eq!(ids(&result), vec!["com.maps/.Maps", "com.mail/.Mail"]);
    }

    #[test]
    fn invalid_regex_yields_empty_result_not_an_error() {
        let (catalog, tags) = fixture();
        let view = ViewState {
            search: "[unclosed".to_owned(),
            regex_mode: true,
            ..ViewState::default()
        };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert!(result.is_empty());
    }

    #[test]
    fn missing_install_counts_sort_lowest() {
        let (catalog, tags) = fixture();
        let view = ViewState { sort: SortKey::InstallsAsc, ..ViewState::default() };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        // mail has no install count and must come first ascending.
        assert_eq!(ids(&result), vec!["com.mail/.Mail", "com.bank/.Bank", "com.maps/.Maps"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let (catalog, tags) = fixture();
        let view = ViewState { sort: SortKey::NameAsc, ..ViewState::default() };
        let result = run_pipeline(&catalog, &tags, &view, &mut rng());
        assert_eq!(ids(&result), vec!["com.bank/.Bank", "com.mail/.Mail", "com.maps/.Maps"]);
    }

    #[test]
    fn name_sorts_are_exact_reverses_of_each_other() {
        let (catalog, tags) = fixture();
        let asc = ViewState { sort: SortKey::NameAsc, ..ViewState::default() };
        let desc = ViewState { sort: SortKey::NameDesc, ..ViewState::default() };
        let mut forward = run_pipeline(&catalog, &tags, &asc, &mut rng());
        let backward = run_pipeline(&catalog, &tags, &desc, &mut rng());
        forward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn random_sort_reshuffles_but_keeps_the_same_members() {
        let (catalog, tags) = fixture();
        let view = ViewState { sort: SortKey::Random, ..ViewState::default() };
        let mut rng = rng();
        let first = run_pipeline(&catalog, &tags, &view, &mut rng);
        let mut orders = std::collections::HashSet::new();
        orders.insert(first.clone());
        for _ in 0..16 {
            let next = run_pipeline(&catalog, &tags, &view, &mut rng);
            let mut sorted_next = next.clone();
            sorted_next.sort();
            let mut sorted_first = first.clone();
            sorted_first.sort();
            assert_eq!(sorted_next, sorted_first);
            orders.insert(next);
        }
        assert!(orders.len() > 1, "random sort must produce varying orders");
    }

    #[test]
    fn catalog_order_is_never_mutated() {
        let (catalog, tags) = fixture();
        let before: Vec<_> =
            catalog.records().iter().map(|r| r.component_id().clone()).collect();
        let view = ViewState { sort: SortKey::NameDesc, ..ViewState::default() };
        let _ = run_pipeline(&catalog, &tags, &view, &mut rng());
        let after: Vec<_> =
            catalog.records().iter().map(|r| r.component_id().clone()).collect();
        assert_eq!(before, after);
    }
}
