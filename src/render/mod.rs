// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Batch-incremental rendering.
//!
//! The renderer owns only a cursor into the current result and talks to the
//! display through the [`Surface`] capability, so the growth/patch logic is
//! testable without any real display surface.

use crate::catalog::{CatalogStore, TagIndex};
use crate::model::{ComponentId, RequestRecord, TagSet};
use crate::select::SelectionModel;

/// Items materialized per Grow step. Bounds the cost of a single step so a
/// scroll-triggered Grow never blocks the event loop.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// One row handed to the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    pub record: &'a RequestRecord,
    pub tags: TagSet,
    pub selected: bool,
}

/// Display capability consumed by the renderer.
///
/// `patch_selection` must update every rendered node for the id (list and
/// grid rendering may duplicate nodes) without touching anything else.
pub trait Surface {
    fn clear(&mut self);
    fn append_batch(&mut self, rows: &[RowView<'_>]);
    fn patch_selection(&mut self, id: &ComponentId, selected: bool);
    fn show_empty_state(&mut self);
    fn set_sentinel_active(&mut self, active: bool);
}

/// Outcome of a Grow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowOutcome {
    /// How many rows this step appended.
    pub appended: usize,
    /// Whether items remain beyond the new cursor.
    pub more: bool,
}

/// Cursor-based renderer over the current pipeline result.
#[derive(Debug, Clone)]
pub struct IncrementalRenderer {
    cursor: usize,
    batch_size: usize,
}

impl IncrementalRenderer {
    pub fn new(batch_size: usize) -> Self {
        Self { cursor: 0, batch_size: batch_size.max(1) }
    }

    /// How many items of the current result are materialized.
    pub fn rendered(&self) -> usize {
        self.cursor
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Clears the surface and renders the first batch of a fresh result.
    ///
    /// Must be called whenever the pipeline recomputes; an empty result shows
    /// the placeholder and deactivates the sentinel instead of a batch.
    pub fn reset<S: Surface>(
        &mut self,
        result: &[ComponentId],
        catalog: &CatalogStore,
        tags: &TagIndex,
        selection: &SelectionModel,
        surface: &mut S,
    ) {
        surface.clear();
        self.cursor = 0;
        if result.is_empty() {
            surface.show_empty_state();
            surface.set_sentinel_active(false);
            return;
        }
        self.grow(result, catalog, tags, selection, surface);
    }

    /// Appends up to one batch starting at the cursor.
    ///
    /// Idempotent at the end of the result: growing with nothing left is a
    /// no-op reporting `more: false`, so rapid repeated sentinel triggers are
    /// harmless.
    pub fn grow<S: Surface>(
        &mut self,
        result: &[ComponentId],
        catalog: &CatalogStore,
        tags: &TagIndex,
        selection: &SelectionModel,
        surface: &mut S,
    ) -> GrowOutcome {
        if self.cursor >= result.len() {
            surface.set_sentinel_active(false);
            return GrowOutcome { appended: 0, more: false };
        }

        let end = (self.cursor + self.batch_size).min(result.len());
        let rows: Vec<RowView<'_>> = result[self.cursor..end]
            .iter()
            .filter_map(|id| {
                catalog.get(id).map(|record| RowView {
                    record,
                    tags: tags.tags_for(id),
                    selected: selection.is_selected(id),
                })
            })
            .collect();
        surface.append_batch(&rows);

        self.cursor = end;
        let more = self.cursor < result.len();
        surface.set_sentinel_active(more);
        GrowOutcome { appended: rows.len(), more }
    }

    /// Flips the selected visual of every rendered node for `id`. Never
    /// triggers a reset.
    pub fn patch_selection<S: Surface>(
        &self,
        surface: &mut S,
        id: &ComponentId,
        selected: bool,
    ) {
        surface.patch_selection(id, selected);
    }
}

impl Default for IncrementalRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
