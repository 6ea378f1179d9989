// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Iconboard: a request-tracking dashboard for a crowd-sourced icon pack.
//!
//! The crate is layered bottom-up: [`model`] holds the typed domain,
//! [`catalog`] and [`source`] load and index the data, [`query`] computes the
//! visible result, [`select`] and [`render`] track selection and materialize
//! rows incrementally, [`urlstate`] persists the view, [`export`] emits
//! contribution artifacts, and [`app`] ties it together for the [`tui`]
//! front-end.

pub mod app;
pub mod catalog;
pub mod export;
pub mod model;
pub mod query;
pub mod render;
pub mod select;
pub mod source;
pub mod tui;
pub mod urlstate;
