// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Selection state.
//!
//! Selection is independent of filtering: an id only leaves the set through
//! an explicit action, never because it fell out of the visible result.

use std::collections::BTreeSet;

use crate::model::ComponentId;

/// State of the header "select all" checkbox, a pure function of the
/// intersection between the selection and the current result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckState {
    Unchecked,
    Checked,
    Indeterminate,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: BTreeSet<ComponentId>,
    anchor: Option<ComponentId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &ComponentId) -> bool {
        self.selected.contains(id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<&ComponentId> {
        self.anchor.as_ref()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.selected.iter()
    }

    /// Toggles `id`, or range-selects from the anchor when `range` is set.
    ///
    /// A range toggle adds every id between the anchor's and `id`'s position
    /// in `current_order` (inclusive) and leaves the anchor in place; prior
    /// selections outside the span are untouched. When no usable anchor
    /// exists the call degrades to a plain toggle, which flips membership and
    /// moves the anchor to `id`.
    ///
    /// Returns the ids whose selected state changed, for targeted patching.
    pub fn toggle(
        &mut self,
        id: &ComponentId,
        range: bool,
        current_order: &[ComponentId],
    ) -> Vec<ComponentId> {
        if range {
            if let Some(anchor) = self.anchor.clone() {
                let anchor_pos = current_order.iter().position(|entry| *entry == anchor);
                let target_pos = current_order.iter().position(|entry| entry == id);
                if let (Some(a), Some(b)) = (anchor_pos, target_pos) {
                    let (start, end) = if a <= b { (a, b) } else { (b, a) };
                    let mut changed = Vec::new();
                    for entry in &current_order[start..=end] {
                        if self.selected.insert(entry.clone()) {
                            changed.push(entry.clone());
                        }
                    }
                    return changed;
                }
            }
        }

        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        self.anchor = Some(id.clone());
        vec![id.clone()]
    }

    /// Selects every id in the current result; ids outside it are untouched.
    pub fn select_all<'a, I>(&mut self, current_result: I)
    where
        I: IntoIterator<Item = &'a ComponentId>,
    {
        for id in current_result {
            self.selected.insert(id.clone());
        }
    }

    /// Deselects every id in the current result; ids outside it stay selected.
    pub fn deselect_all<'a, I>(&mut self, current_result: I)
    where
        I: IntoIterator<Item = &'a ComponentId>,
    {
        for id in current_result {
            self.selected.remove(id);
        }
    }

    pub fn intersection_count(&self, current_result: &[ComponentId]) -> usize {
        current_result.iter().filter(|id| self.selected.contains(*id)).count()
    }

    pub fn header_state(&self, current_result: &[ComponentId]) -> HeaderCheckState {
        if current_result.is_empty() {
            return HeaderCheckState::Unchecked;
        }
        match self.intersection_count(current_result) {
            0 => HeaderCheckState::Unchecked,
            n if n == current_result.len() => HeaderCheckState::Checked,
            _ => HeaderCheckState::Indeterminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::ComponentId;

    use super::{HeaderCheckState, SelectionModel};

    fn order(n: usize) -> Vec<ComponentId> {
        (0..n)
            .map(|i| ComponentId::new(format!("com.app{i}/.Main")).expect("component id"))
            .collect()
    }

    #[test]
    fn toggle_is_an_involution() {
        let order = order(3);
        let mut selection = SelectionModel::new();

        selection.toggle(&order[1], false, &order);
        assert!(selection.is_selected(&order[1]));

        selection.toggle(&order[1], false, &order);
        assert!(!selection.is_selected(&order[1]));
        assert_eq!(selection.count(), 0);
    }

    #[test]
    fn plain_toggle_moves_the_anchor() {
        let order = order(3);
        let mut selection = SelectionModel::new();
        selection.toggle(&order[0], false, &order);
        assert_eq!(selection.anchor(), Some(&order[0]));
        selection.toggle(&order[2], false, &order);
        assert_eq!(selection.anchor(), Some(&order[2]));
    }

    #[test]
    fn range_select_covers_the_inclusive_span_only() {
        let order = order(10);
        let mut selection = SelectionModel::new();

        // Pre-existing selections outside the span must be untouched.
        selection.toggle(&order[0], false, &order);
        selection.toggle(&order[9], false, &order);

        selection.toggle(&order[2], false, &order);
        let changed = selection.toggle(&order[7], true, &order);

        for i in 2..=7 {
            assert!(selection.is_selected(&order[i]), "position {i} must be selected");
        }
        assert!(selection.is_selected(&order[0]));
        assert!(!selection.is_selected(&order[1]));
        assert!(!selection.is_selected(&order[8]));
        assert!(selection.is_selected(&order[9]));
        // Position 2 was already selected as the anchor, so 3..=7 changed.
        assert_eq!(changed.len(), 5);
        // Range selection keeps the anchor in place.
        assert_eq!(selection.anchor(), Some(&order[2]));
    }

    #[test]
    fn range_select_works_backwards() {
        let order = order(6);
        let mut selection = SelectionModel::new();
        selection.toggle(&order[4], false, &order);
        selection.toggle(&order[1], true, &order);
        for i in 1..=4 {
            assert!(selection.is_selected(&order[i]));
        }
        assert!(!selection.is_selected(&order[0]));
        assert!(!selection.is_selected(&order[5]));
    }

    #[test]
    fn range_without_anchor_degrades_to_plain_toggle() {
        let order = order(4);
        let mut selection = SelectionModel::new();
        let changed = selection.toggle(&order[2], true, &order);
        assert_eq!(changed, vec![order[2].clone()]);
        assert!(selection.is_selected(&order[2]));
        assert_eq!(selection.anchor(), Some(&order[2]));
    }

    #[test]
    fn range_with_anchor_outside_current_order_degrades_to_plain_toggle() {
        let order = order(4);
        let mut selection = SelectionModel::new();
        selection.toggle(&order[1], false, &order);

        // A narrower order no longer contains the anchor.
        let narrowed = vec![order[2].clone(), order[3].clone()];
        selection.toggle(&order[3], true, &narrowed);
        assert!(selection.is_selected(&order[3]));
        assert!(!selection.is_selected(&order[2]));
    }

    #[test]
    fn filtering_never_drops_selected_ids() {
        let order = order(4);
        let mut selection = SelectionModel::new();
        selection.toggle(&order[0], false, &order);

        let filtered = vec![order[2].clone(), order[3].clone()];
        // Deselect-all over a filtered result leaves the hidden id selected.
        selection.deselect_all(&filtered);
        assert!(selection.is_selected(&order[0]));
    }

    #[test]
    fn select_all_and_deselect_all_touch_only_the_result() {
        let order = order(5);
        let visible = vec![order[1].clone(), order[2].clone()];
        let mut selection = SelectionModel::new();
        selection.toggle(&order[4], false, &order);

        selection.select_all(&visible);
        assert_eq!(selection.count(), 3);

        selection.deselect_all(&visible);
        assert_eq!(selection.count(), 1);
        assert!(selection.is_selected(&order[4]));
    }

    #[test]
    fn header_state_tracks_the_intersection() {
        let order = order(3);
        let mut selection = SelectionModel::new();
        assert_eq!(selection.header_state(&order), HeaderCheckState::Unchecked);
        assert_eq!(selection.header_state(&[]), HeaderCheckState::Unchecked);

        selection.toggle(&order[0], false, &order);
        assert_eq!(selection.header_state(&order), HeaderCheckState::Indeterminate);

        selection.select_all(&order);
        assert_eq!(selection.header_state(&order), HeaderCheckState::Checked);
    }
}
