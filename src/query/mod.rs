// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Search parsing and the filter/sort pipeline.
//!
//! The pipeline is a pure function from (catalog, tag index, view state) to a
//! displayed order; recomputation happens on every view-state change.

pub mod parse;
pub mod pipeline;

pub use parse::{parse_query, ParsedQuery};
pub use pipeline::run_pipeline;
