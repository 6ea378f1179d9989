// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Export formats for the current selection.
//!
//! Text exports (appfilter XML lines, icontool commands, selection JSON) are
//! pure; the icon archive export fetches each asset independently and
//! fail-soft, reporting a success/partial/failure outcome.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::PathBuf;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::RequestRecord;
use crate::source::{RequestSource, ICON_EXTENSION};

/// Fallback drawable name for an empty label.
const UNKNOWN_DRAWABLE: &str = "unknown";
/// Fallback when sanitization strips a non-empty label down to nothing.
const EMPTY_DRAWABLE: &str = "icon";

pub const PR_TEMPLATE: &str = r#"## Icons
<!-- Please specify in the sections below which apps and packages you have worked on.
     Unnecessary sections can be deleted. -->

### Added
<!--  Apps for which you add icons. -->
App name (`com.package.app`)
App name (`com.package.app`)

### Linked
<!--  New app components for existing icons. -->
App name (`com.package.app` → `drawable.svg`)
App name (`com.package.app` → `drawable.svg`)

### Updated
<!--  Outdated icons that you've updated. -->
App name (`com.package.app`)
App name (`com.package.app`)"#;

/// Derives a drawable resource name from a display label.
///
/// NFD-normalizes and strips diacritics, lowercases, collapses runs of
/// non-alphanumeric characters into a single underscore, trims underscores,
/// and prefixes an underscore when the result starts with a digit.
pub fn sanitize_drawable_name(label: &str) -> String {
    if label.is_empty() {
        return UNKNOWN_DRAWABLE.to_owned();
    }

    let stripped: String = label.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut name = String::with_capacity(stripped.len());
    let mut pending_separator = false;
    for c in stripped.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !name.is_empty() {
                name.push('_');
            }
            pending_separator = false;
            name.push(c);
        } else {
            pending_separator = true;
        }
    }

    if name.is_empty() {
        return EMPTY_DRAWABLE.to_owned();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// One appfilter XML line for a record.
pub fn appfilter_entry(record: &RequestRecord) -> String {
    format!(
        r#"<item component="ComponentInfo{{{}}}" drawable="{}" name="{}" />"#,
        record.component_id(),
        sanitize_drawable_name(record.label()),
        record.label()
    )
}

pub fn appfilter_entries<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    records.into_iter().map(appfilter_entry).collect::<Vec<_>>().join("\n")
}

/// One icontool invocation for a record. `svg_path` is the directory the
/// drawable is expected in; a trailing slash is added when missing.
pub fn icontool_command(record: &RequestRecord, svg_path: &str) -> String {
    let mut path = svg_path.trim().to_owned();
    if !path.is_empty() && !path.ends_with('/') {
        path.push('/');
    }
    let escaped_label = record.label().replace('"', "\\\"");
    format!(
        r#"python3 ./icontool.py add "{path}{}.svg" {} "{escaped_label}""#,
        sanitize_drawable_name(record.label()),
        record.component_id(),
    )
}

pub fn icontool_commands<'a, I>(records: I, svg_path: &str) -> String
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    records
        .into_iter()
        .map(|record| icontool_command(record, svg_path))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON document mapping a user-supplied group label to the selected ids.
pub fn selection_json<'a, I>(label: &str, ids: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = &'a crate::model::ComponentId>,
{
    let values: Vec<&str> = ids.into_iter().map(|id| id.as_str()).collect();
    let mut doc = serde_json::Map::new();
    doc.insert(label.to_owned(), serde_json::Value::from(values));
    serde_json::to_string_pretty(&serde_json::Value::Object(doc))
}

/// Assigns each record a unique archive filename.
///
/// Collisions among sanitized names resolve deterministically by appending
/// `_2`, `_3`, … in input order.
pub fn archive_file_names<'a>(records: &[&'a RequestRecord]) -> Vec<(String, &'a RequestRecord)> {
    let mut used: HashSet<String> = HashSet::with_capacity(records.len());
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let mut stem = sanitize_drawable_name(record.label());
        if used.contains(&stem) {
            let mut n = 2;
            while used.contains(&format!("{stem}_{n}")) {
                n += 1;
            }
            stem = format!("{stem}_{n}");
        }
        used.insert(stem.clone());
        entries.push((format!("{stem}{ICON_EXTENSION}"), *record));
    }
    entries
}

/// Destination for the bulk archive; the zip container itself is assembled by
/// an external service consuming (name, bytes) pairs.
pub trait ArchiveSink {
    fn add_file(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Sink writing each entry as a plain file into a directory.
#[derive(Debug)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl ArchiveSink for DirSink {
    fn add_file(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(self.dir.join(name), bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Success,
    Partial,
    Failure,
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Partial => f.write_str("partial"),
            Self::Failure => f.write_str("failure"),
        }
    }
}

/// Final outcome of an archive export, distinct from in-progress states.
#[derive(Debug)]
pub struct ExportReport {
    pub written: usize,
    pub failed: Vec<String>,
}

impl ExportReport {
    pub fn status(&self) -> ExportStatus {
        if self.failed.is_empty() {
            ExportStatus::Success
        } else if self.written > 0 {
            ExportStatus::Partial
        } else {
            ExportStatus::Failure
        }
    }
}

/// Fetches every selected icon and feeds it to the sink.
///
/// Each asset fetch is independent: a failure is recorded and excluded, the
/// rest of the archive still assembles. There is no cancellation or timeout;
/// fetches complete or fail on their own.
pub async fn export_icons<S, A>(
    source: &S,
    sink: &mut A,
    records: &[&RequestRecord],
) -> ExportReport
where
    S: RequestSource,
    A: ArchiveSink,
{
    let mut report = ExportReport { written: 0, failed: Vec::new() };
    for (name, record) in archive_file_names(records) {
        match source.fetch_icon(record.drawable()).await {
            Ok(bytes) => match sink.add_file(&name, &bytes) {
                Ok(()) => report.written += 1,
                Err(err) => report.failed.push(format!("{name}: {err}")),
            },
            Err(err) => report.failed.push(format!("{}: {err}", record.drawable())),
        }
    }
    report
}
