//! Load orchestration
//!
//! Owns the dataset selector state and applies finished loads to the
//! shared viewer context. Installing a dataset is atomic from the views'
//! perspective: dataset, schema, choices, colors and selection all change
//! in one pass on the UI thread, and a failed or empty load leaves every
//! view in an explicit disabled state instead of showing stale data.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use bl_core::data::DataSource;
use bl_core::events::events::{DatasetLoaded, DatasetLoadFailed};
use bl_data::{CsvSource, DatasetLoader, LoadOutcome, SchemaInferencer};
use bl_views::plots::utils::colors::ColorAssignment;
use bl_views::{AttributeChoices, ViewerContext};

use crate::demo::SampleDataSource;

/// One entry in the dataset selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetEntry {
    Sample,
    Csv(PathBuf),
}

impl DatasetEntry {
    pub fn label(&self) -> String {
        match self {
            DatasetEntry::Sample => SampleDataSource::NAME.to_string(),
            DatasetEntry::Csv(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown.csv")
                .to_string(),
        }
    }

    fn source(&self) -> Arc<dyn DataSource> {
        match self {
            DatasetEntry::Sample => Arc::new(SampleDataSource),
            DatasetEntry::Csv(path) => Arc::new(CsvSource::new(path.clone())),
        }
    }
}

pub struct DashboardController {
    loader: Arc<DatasetLoader>,
    inferencer: SchemaInferencer,
    pub entries: Vec<DatasetEntry>,
    pub current: DatasetEntry,
}

impl DashboardController {
    pub fn new() -> Self {
        let mut entries = vec![DatasetEntry::Sample];
        entries.extend(discover_csv_files("data"));
        Self {
            loader: Arc::new(DatasetLoader::new()),
            inferencer: SchemaInferencer::new(),
            current: entries[0].clone(),
            entries,
        }
    }

    pub fn loading(&self) -> bool {
        self.loader.in_flight()
    }

    /// Kick off a load for `entry`. Any in-flight load is superseded; its
    /// late result will be ignored.
    pub fn request_load(&mut self, entry: DatasetEntry, ctx: &ViewerContext) {
        info!(dataset = %entry.label(), "requesting dataset load");
        self.current = entry.clone();
        self.loader.spawn(&ctx.runtime_handle, entry.source());
    }

    /// Add a user-picked CSV to the selector and load it.
    pub fn open_csv(&mut self, path: PathBuf, ctx: &ViewerContext) {
        let entry = DatasetEntry::Csv(path);
        if !self.entries.contains(&entry) {
            self.entries.push(entry.clone());
        }
        self.request_load(entry, ctx);
    }

    /// Poll for a finished load and install it. Returns true when anything
    /// changed so the caller can request a repaint.
    pub fn poll(&mut self, ctx: &ViewerContext) -> bool {
        let Some(outcome) = self.loader.take_ready() else {
            return false;
        };
        self.install(outcome, ctx);
        true
    }

    fn install(&mut self, outcome: LoadOutcome, ctx: &ViewerContext) {
        match outcome.result {
            Ok(dataset) if !dataset.is_empty() => {
                let schema = self.inferencer.infer(&dataset);
                // Fresh start gets defaults; an established session keeps
                // whatever choices still make sense under the new schema.
                let mut choices = ctx.choices.read().clone();
                if choices == AttributeChoices::default() {
                    choices = AttributeChoices::defaults_for(&schema);
                } else {
                    choices.revalidate(&schema);
                }
                let colors = choices
                    .color
                    .as_deref()
                    .map(|attr| ColorAssignment::from_column(&dataset, attr))
                    .unwrap_or_default();

                if choices.x.is_none() || choices.y.is_none() {
                    warn!(source = %outcome.source_name, "no numeric attributes to plot");
                }

                ctx.events.emit(&DatasetLoaded {
                    source_name: outcome.source_name,
                    row_count: dataset.len(),
                    column_count: dataset.columns().len(),
                });

                *ctx.schema.write() = schema;
                *ctx.choices.write() = choices;
                *ctx.colors.write() = colors;
                ctx.selection.write().clear();
                *ctx.dataset.write() = Some(Arc::new(dataset));
            }
            Ok(_) => {
                warn!(source = %outcome.source_name, "dataset is empty");
                self.clear_all(ctx);
                ctx.events.emit(&DatasetLoadFailed {
                    source_name: outcome.source_name,
                    error: "dataset is empty".to_string(),
                });
            }
            Err(err) => {
                error!(source = %outcome.source_name, error = %err, "dataset load failed");
                self.clear_all(ctx);
                ctx.events.emit(&DatasetLoadFailed {
                    source_name: outcome.source_name,
                    error: err.to_string(),
                });
            }
        }
    }

    /// Failure and empty loads are treated identically: everything derived
    /// from the old dataset is discarded.
    fn clear_all(&self, ctx: &ViewerContext) {
        *ctx.dataset.write() = None;
        *ctx.schema.write() = Default::default();
        *ctx.choices.write() = AttributeChoices::default();
        *ctx.colors.write() = ColorAssignment::default();
        ctx.selection.write().clear();
    }

    /// Rebuild colors after the color/group attribute changed.
    pub fn refresh_colors(&self, ctx: &ViewerContext) {
        let dataset = ctx.dataset.read().clone();
        let color_attr = ctx.choices.read().color.clone();
        *ctx.colors.write() = match (dataset, color_attr) {
            (Some(dataset), Some(attr)) => ColorAssignment::from_column(&dataset, &attr),
            _ => ColorAssignment::default(),
        };
    }
}

fn discover_csv_files(dir: &str) -> Vec<DatasetEntry> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "csv"))
        .collect();
    files.sort();
    files.into_iter().map(DatasetEntry::Csv).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::events::EventBus;

    fn context(runtime: &tokio::runtime::Runtime) -> ViewerContext {
        ViewerContext::new(Arc::new(EventBus::new()), runtime.handle().clone())
    }

    #[test]
    fn installing_the_sample_populates_all_derived_state() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = context(&runtime);
        let mut controller = DashboardController::new();

        controller.request_load(DatasetEntry::Sample, &ctx);
        // The sample source resolves immediately; poll until installed.
        for _ in 0..100 {
            if controller.poll(&ctx) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        assert!(ctx.dataset.read().is_some());
        assert!(!ctx.schema.read().is_empty());
        assert!(ctx.choices.read().x.is_some());
        assert!(!ctx.colors.read().is_empty());
        assert!(!ctx.selection.read().state().brushed);
    }

    #[test]
    fn failed_load_clears_everything() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = context(&runtime);
        let mut controller = DashboardController::new();

        controller.request_load(DatasetEntry::Sample, &ctx);
        for _ in 0..100 {
            if controller.poll(&ctx) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(ctx.dataset.read().is_some());

        controller.request_load(
            DatasetEntry::Csv(PathBuf::from("does/not/exist.csv")),
            &ctx,
        );
        for _ in 0..100 {
            if controller.poll(&ctx) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        assert!(ctx.dataset.read().is_none());
        assert!(ctx.schema.read().is_empty());
        assert_eq!(*ctx.choices.read(), AttributeChoices::default());
        assert!(ctx.colors.read().is_empty());
    }
}
