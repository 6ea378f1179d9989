// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Data sources and initial load.
//!
//! The catalog and one document per tag are fetched independently; all of
//! them complete (or degrade to zero contribution) before the first pipeline
//! run. Only a missing or malformed catalog is fatal.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::{CatalogStore, TagIndex};
use crate::model::{CatalogDoc, ComponentId, Tag};

pub const CATALOG_FILENAME: &str = "requests.json";
pub const FILTER_DIR: &str = "filters";
pub const ICON_DIR: &str = "extracted_png";
pub const ICON_EXTENSION: &str = ".png";

/// Capability to fetch the raw dashboard documents and icon assets.
///
/// Implementations decide where the bytes come from; the loader only cares
/// about the document shapes.
pub trait RequestSource {
    fn fetch_catalog(&self) -> impl std::future::Future<Output = io::Result<Vec<u8>>>;

    fn fetch_tag_source(&self, tag: Tag)
        -> impl std::future::Future<Output = io::Result<Vec<u8>>>;

    fn fetch_icon(&self, drawable: &str) -> impl std::future::Future<Output = io::Result<Vec<u8>>>;
}

/// Filesystem-backed source rooted at a dashboard data directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn icon_path(&self, drawable: &str) -> PathBuf {
        self.root.join(ICON_DIR).join(format!("{drawable}{ICON_EXTENSION}"))
    }
}

impl RequestSource for FsSource {
    async fn fetch_catalog(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(CATALOG_FILENAME)).await
    }

    async fn fetch_tag_source(&self, tag: Tag) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(FILTER_DIR).join(format!("{}.json", tag.as_str()))).await
    }

    async fn fetch_icon(&self, drawable: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.icon_path(drawable)).await
    }
}

/// Everything the dashboard needs after a successful load.
#[derive(Debug)]
pub struct LoadedData {
    pub catalog: CatalogStore,
    pub tags: TagIndex,
    /// Non-fatal degradations (unreachable tag sources, skipped entries).
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub enum LoadError {
    Catalog(io::Error),
    CatalogFormat(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "catalog unavailable: {err}"),
            Self::CatalogFormat(err) => write!(f, "catalog is malformed: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::CatalogFormat(err) => Some(err),
        }
    }
}

/// Fetches the catalog plus every tag source and builds the in-memory model.
pub async fn load<S: RequestSource>(source: &S) -> Result<LoadedData, LoadError> {
    let catalog_bytes = source.fetch_catalog().await.map_err(LoadError::Catalog)?;
    let doc: CatalogDoc =
        serde_json::from_slice(&catalog_bytes).map_err(LoadError::CatalogFormat)?;

    let mut warnings = Vec::new();
    let mut records = Vec::with_capacity(doc.apps.len());
    for raw in doc.apps {
        let name = raw.component_name.clone();
        match raw.into_record() {
            Ok(record) => records.push(record),
            Err(err) => warnings.push(format!("skipping catalog entry '{name}': {err}")),
        }
    }
    let catalog = CatalogStore::from_records(records);

    let mut contributions = Vec::new();
    for tag in Tag::ALL {
        // Unlabeled is computed from the others, there is nothing to fetch.
        if tag == Tag::Unlabeled {
            continue;
        }
        match source.fetch_tag_source(tag).await {
            Ok(bytes) => match parse_tag_source(tag, &bytes) {
                Ok(ids) => contributions.push((tag, ids)),
                Err(err) => {
                    warnings.push(format!("tag source '{tag}' is malformed ({err}), ignoring it"));
                }
            },
            Err(err) => {
                warnings.push(format!("tag source '{tag}' unavailable ({err}), ignoring it"));
            }
        }
    }

    let tags = TagIndex::build(&catalog, contributions);
    Ok(LoadedData { catalog, tags, warnings })
}

/// Extracts the id array keyed by the tag name from a tag-source document.
///
/// A present document without the expected array contributes zero tags;
/// entries that are not valid component ids are skipped.
fn parse_tag_source(tag: Tag, bytes: &[u8]) -> Result<Vec<ComponentId>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let Some(entries) = value.get(tag.as_str()).and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| entry.as_str())
        .filter_map(|raw| ComponentId::new(raw).ok())
        .collect())
}
