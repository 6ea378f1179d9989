// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Dashboard controller.
//!
//! All state transitions funnel through [`Dashboard::dispatch`], which decides
//! between a full refresh (pipeline rerun plus surface reset) and a targeted
//! selection patch. Front-ends stay dumb: they translate input into
//! [`Action`]s and draw whatever their [`Surface`] was handed.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::{CatalogStore, TagIndex};
use crate::model::{ComponentId, SortKey, Tag, ViewMode, ViewState};
use crate::query::run_pipeline;
use crate::render::{IncrementalRenderer, Surface};
use crate::select::{HeaderCheckState, SelectionModel};
use crate::urlstate;

/// Every state transition a front-end can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetSearch(String),
    ToggleRegex,
    SetSort(SortKey),
    SetView(ViewMode),
    ToggleFilter(Tag),
    ToggleSelection { id: ComponentId, range: bool },
    SelectAllVisible,
    ClearVisibleSelection,
    Scroll,
}

pub struct Dashboard {
    catalog: CatalogStore,
    tags: TagIndex,
    view: ViewState,
    selection: SelectionModel,
    result: Vec<ComponentId>,
    renderer: IncrementalRenderer,
    rng: StdRng,
}

impl Dashboard {
    pub fn new(catalog: CatalogStore, tags: TagIndex) -> Self {
        Self::with_rng(catalog, tags, StdRng::from_entropy())
    }

    /// Seeded constructor so random sort is reproducible in tests.
    pub fn with_rng(catalog: CatalogStore, tags: TagIndex, rng: StdRng) -> Self {
        Self {
            catalog,
            tags,
            view: ViewState::default(),
            selection: SelectionModel::new(),
            result: Vec::new(),
            renderer: IncrementalRenderer::default(),
            rng,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Current pipeline output, in display order.
    pub fn result(&self) -> &[ComponentId] {
        &self.result
    }

    pub fn rendered(&self) -> usize {
        self.renderer.rendered()
    }

    pub fn header_state(&self) -> HeaderCheckState {
        self.selection.header_state(&self.result)
    }

    /// Non-default view state as persistable key-value pairs.
    pub fn encode_url_state(&self) -> Vec<(String, String)> {
        urlstate::encode(&self.view)
    }

    /// Replaces the view state wholesale (startup restore) and refreshes.
    pub fn restore_view<S: Surface>(&mut self, view: ViewState, surface: &mut S) {
        self.view = view;
        self.refresh(surface);
    }

    /// Seeds the view state before any surface exists; the first refresh
    /// picks it up.
    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    /// Runs the pipeline for the current view and resets the surface.
    pub fn refresh<S: Surface>(&mut self, surface: &mut S) {
        self.result = run_pipeline(&self.catalog, &self.tags, &self.view, &mut self.rng);
        self.renderer.reset(&self.result, &self.catalog, &self.tags, &self.selection, surface);
    }

    pub fn dispatch<S: Surface>(&mut self, action: Action, surface: &mut S) {
        match action {
            Action::SetSearch(search) => {
                if self.view.search != search {
                    self.view.search = search;
                    self.refresh(surface);
                }
            }
            Action::ToggleRegex => {
                self.view.regex_mode = !self.view.regex_mode;
                self.refresh(surface);
            }
            Action::SetSort(sort) => {
                // Random re-dispatches to reshuffle; other keys are idempotent.
                if self.view.sort != sort || sort == SortKey::Random {
                    self.view.sort = sort;
                    self.refresh(surface);
                }
            }
            Action::SetView(view) => {
                if self.view.view != view {
                    self.view.view = view;
                    self.refresh(surface);
                }
            }
            Action::ToggleFilter(tag) => {
                self.toggle_filter(tag);
                self.refresh(surface);
            }
            Action::ToggleSelection { id, range } => {
                for changed in self.selection.toggle(&id, range, &self.result) {
                    let selected = self.selection.is_selected(&changed);
                    self.renderer.patch_selection(surface, &changed, selected);
                }
            }
            Action::SelectAllVisible => {
                self.selection.select_all(&self.result);
                self.refresh(surface);
            }
            Action::ClearVisibleSelection => {
                self.selection.deselect_all(&self.result);
                self.refresh(surface);
            }
            Action::Scroll => {
                self.renderer.grow(
                    &self.result,
                    &self.catalog,
                    &self.tags,
                    &self.selection,
                    surface,
                );
            }
        }
    }

    /// The unlabeled filter is mutually exclusive with every labeled filter:
    /// activating it clears the others, activating any other clears it.
    fn toggle_filter(&mut self, tag: Tag) {
        if self.view.active_filters.contains(tag) {
            self.view.active_filters.remove(tag);
            return;
        }
        match tag {
            Tag::Unlabeled => self.view.active_filters.clear(),
            _ => {
                self.view.active_filters.remove(Tag::Unlabeled);
            }
        }
        self.view.active_filters.insert(tag);
    }
}
