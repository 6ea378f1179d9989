// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! Records are immutable once loaded; tags and sort/view settings are closed
//! enumerations so unknown values are rejected at the data-source boundary.

pub mod ids;
pub mod record;
pub mod tag;
pub mod view;

pub use ids::{ComponentId, ComponentIdError};
pub use record::{CatalogDoc, RawRecord, RequestRecord};
pub use tag::{ParseTagError, Tag, TagSet};
pub use view::{ParseSortKeyError, ParseViewModeError, SortKey, ViewMode, ViewState};
