// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Iconboard CLI entrypoint.
//!
//! By default this loads the dashboard data from the given directory (the
//! current working directory when omitted) and runs the interactive TUI.
//!
//! With `--export` it runs headless instead: the filter/search/sort pipeline
//! computes the visible result from the given flags and the export for every
//! visible record is written to stdout (icon archives go to `--icons-out`).

use std::error::Error;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use iconboard::export::{self, DirSink, ExportStatus};
use iconboard::model::{RequestRecord, SortKey, Tag, TagSet, ViewMode, ViewState};
use iconboard::query::run_pipeline;
use iconboard::source::{load, FsSource};
use iconboard::urlstate::{self, FileStore, StateStore};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<data-dir>]\n  {program} [<data-dir>] --export <appfilter|icontool|json|icons> [options]\n\nOptions:\n  --query <text>       search text, including is:/tag:/in: directives\n  --filter <tag>       activate a tag filter (repeatable)\n  --sort <key>         req-desc (default), req-asc, install-desc, install-asc,\n                       time-desc, time-asc, name-asc, name-desc, rand\n  --regex              treat the search text as a regular expression\n  --view <list|grid>   view mode (affects the TUI only)\n  --label <name>       group label for the json export (default: selection)\n  --path <dir>         svg directory prefix for icontool commands\n  --icons-out <dir>    output directory for the icons export\n\nIf data-dir is omitted, the current working directory is used. It must\ncontain requests.json, a filters/ directory and (for the icons export) the\nextracted_png/ assets."
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportKind {
    Appfilter,
    Icontool,
    Json,
    Icons,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    data_dir: Option<String>,
    query: Option<String>,
    filters: Vec<Tag>,
    sort: Option<SortKey>,
    regex: bool,
    view: Option<ViewMode>,
    export: Option<ExportKind>,
    label: Option<String>,
    svg_path: Option<String>,
    icons_out: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--query" => {
                if options.query.is_some() {
                    return Err(());
                }
                options.query = Some(args.next().ok_or(())?);
            }
            "--filter" => {
                let raw = args.next().ok_or(())?;
                let tag: Tag = raw.parse().map_err(|_| ())?;
                if options.filters.contains(&tag) {
                    return Err(());
                }
                options.filters.push(tag);
            }
            "--sort" => {
                if options.sort.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.sort = Some(raw.parse().map_err(|_| ())?);
            }
            "--regex" => {
                if options.regex {
                    return Err(());
                }
                options.regex = true;
            }
            "--view" => {
                if options.view.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.view = Some(raw.parse().map_err(|_| ())?);
            }
            "--export" => {
                if options.export.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.export = Some(match raw.as_str() {
                    "appfilter" => ExportKind::Appfilter,
                    "icontool" => ExportKind::Icontool,
                    "json" => ExportKind::Json,
                    "icons" => ExportKind::Icons,
                    _ => return Err(()),
                });
            }
            "--label" => {
                if options.label.is_some() {
                    return Err(());
                }
                options.label = Some(args.next().ok_or(())?);
            }
            "--path" => {
                if options.svg_path.is_some() {
                    return Err(());
                }
                options.svg_path = Some(args.next().ok_or(())?);
            }
            "--icons-out" => {
                if options.icons_out.is_some() {
                    return Err(());
                }
                options.icons_out = Some(args.next().ok_or(())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                options.data_dir = Some(arg);
            }
        }
    }

    if options.label.is_some() && options.export != Some(ExportKind::Json) {
        return Err(());
    }
    if options.svg_path.is_some() && options.export != Some(ExportKind::Icontool) {
        return Err(());
    }
    if options.icons_out.is_some() && options.export != Some(ExportKind::Icons) {
        return Err(());
    }
    if options.export == Some(ExportKind::Icons) && options.icons_out.is_none() {
        return Err(());
    }

    Ok(options)
}

/// Applies the given flags over a base view state; fields without a flag
/// keep whatever the base holds.
fn view_state(options: &CliOptions, mut view: ViewState) -> ViewState {
    if let Some(query) = &options.query {
        view.search = query.clone();
    }
    if !options.filters.is_empty() {
        view.active_filters = options.filters.iter().copied().collect::<TagSet>();
    }
    if let Some(sort) = options.sort {
        view.sort = sort;
    }
    if options.regex {
        view.regex_mode = true;
    }
    if let Some(mode) = options.view {
        view.view = mode;
    }
    view
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "iconboard".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let dir = options.data_dir.clone().unwrap_or_else(|| ".".to_owned());
        let source = FsSource::new(&dir);
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let loaded = runtime.block_on(load(&source))?;

        if let Some(kind) = options.export {
            for warning in &loaded.warnings {
                eprintln!("{program}: warning: {warning}");
            }
            // Exports stay reproducible from the flags alone.
            let view = view_state(&options, ViewState::default());
            let mut rng = StdRng::from_entropy();
            let result = run_pipeline(&loaded.catalog, &loaded.tags, &view, &mut rng);
            let records: Vec<&RequestRecord> =
                result.iter().filter_map(|id| loaded.catalog.get(id)).collect();

            match kind {
                ExportKind::Appfilter => {
                    println!("{}", export::appfilter_entries(records.iter().copied()));
                }
                ExportKind::Icontool => {
                    let path = options.svg_path.as_deref().unwrap_or("");
                    println!("{}", export::icontool_commands(records.iter().copied(), path));
                }
                ExportKind::Json => {
                    let label = options.label.as_deref().unwrap_or("selection");
                    println!("{}", export::selection_json(label, result.iter())?);
                }
                ExportKind::Icons => {
                    let out = options.icons_out.as_deref().unwrap_or_default();
                    let mut sink = DirSink::create(out)?;
                    let report =
                        runtime.block_on(export::export_icons(&source, &mut sink, &records));
                    for failure in &report.failed {
                        eprintln!("{program}: warning: {failure}");
                    }
                    eprintln!(
                        "{program}: wrote {} icon(s) to {out} ({})",
                        report.written,
                        report.status()
                    );
                    if report.status() == ExportStatus::Failure && !records.is_empty() {
                        std::process::exit(1);
                    }
                }
            }
            return Ok(());
        }

        let store = FileStore::new(Path::new(&dir).join(urlstate::VIEW_STATE_FILENAME));
        let pairs = store.read();
        let stored = urlstate::decode(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let mut dashboard = iconboard::app::Dashboard::new(loaded.catalog, loaded.tags);
        dashboard.set_view_state(view_state(&options, stored));
        iconboard::tui::run(dashboard, loaded.warnings, Some(Box::new(store)))?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("iconboard: {err}");
        std::process::exit(1);
    }
}
