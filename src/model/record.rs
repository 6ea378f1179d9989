// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

use serde::Deserialize;

use super::ids::ComponentId;

/// One icon request as tracked by the dashboard.
///
/// Records are built once at load from the catalog document and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    component_id: ComponentId,
    label: String,
    request_count: u64,
    last_requested: Option<i64>,
    first_seen: Option<i64>,
    installs: Option<String>,
    drawable: String,
}

impl RequestRecord {
    pub fn new(
        component_id: ComponentId,
        label: impl Into<String>,
        request_count: u64,
        drawable: impl Into<String>,
    ) -> Self {
        Self {
            component_id,
            label: label.into(),
            request_count,
            last_requested: None,
            first_seen: None,
            installs: None,
            drawable: drawable.into(),
        }
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Unix seconds of the most recent request, if known.
    pub fn last_requested(&self) -> Option<i64> {
        self.last_requested
    }

    /// Unix seconds of the first appearance in the catalog, if known.
    pub fn first_seen(&self) -> Option<i64> {
        self.first_seen
    }

    /// Raw Play-Store style install string, e.g. `"10,000,000+"`.
    pub fn installs(&self) -> Option<&str> {
        self.installs.as_deref()
    }

    /// Parsed install count. Absent or unparsable counts sort below all known
    /// counts, which `Option` ordering gives for free.
    pub fn install_count(&self) -> Option<u64> {
        parse_install_count(self.installs.as_deref()?)
    }

    /// Asset key used to build the icon URL/path.
    pub fn drawable(&self) -> &str {
        &self.drawable
    }

    pub fn set_last_requested(&mut self, unix_seconds: Option<i64>) {
        self.last_requested = unix_seconds;
    }

    pub fn set_first_seen(&mut self, unix_seconds: Option<i64>) {
        self.first_seen = unix_seconds;
    }

    pub fn set_installs(&mut self, installs: Option<String>) {
        self.installs = installs;
    }
}

fn parse_install_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '+').collect();
    cleaned.trim().parse().ok()
}

/// Wire shape of the catalog document (`requests.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDoc {
    pub apps: Vec<RawRecord>,
}

/// Wire shape of one catalog entry, validated into a [`RequestRecord`] during
/// catalog construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub component_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub request_count: u64,
    #[serde(default)]
    pub last_requested: Option<i64>,
    #[serde(default)]
    pub first_appearance: Option<i64>,
    #[serde(default)]
    pub installs: Option<String>,
    #[serde(default)]
    pub drawable: String,
}

impl RawRecord {
    pub fn into_record(self) -> Result<RequestRecord, super::ids::ComponentIdError> {
        let component_id = ComponentId::new(self.component_name)?;
        let mut record =
            RequestRecord::new(component_id, self.label, self.request_count, self.drawable);
        record.set_last_requested(self.last_requested);
        record.set_first_seen(self.first_appearance);
        record.set_installs(self.installs);
        Ok(record)
    }
}
