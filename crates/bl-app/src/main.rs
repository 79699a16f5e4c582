//! Main application entry point

use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Ui};
use tracing::{info, warn};

use bl_core::events::events::{
    AttributeChanged, DatasetLoadFailed, DatasetLoaded, PlotModeChanged, SelectionChanged,
};
use bl_core::events::{Event, EventBus, EventHandler};
use bl_views::{DistributionView, PlotKind, ScatterPlotView, SpaceView, ViewerContext};

mod controller;
mod demo;

use controller::{DashboardController, DatasetEntry};

/// Logs every system event through tracing.
struct EventLogger;

impl EventHandler for EventLogger {
    fn handle(&mut self, event: &dyn Event) {
        let any = event.as_any();
        if let Some(e) = any.downcast_ref::<DatasetLoaded>() {
            info!(source = %e.source_name, rows = e.row_count, columns = e.column_count, "dataset loaded");
        } else if let Some(e) = any.downcast_ref::<DatasetLoadFailed>() {
            warn!(source = %e.source_name, error = %e.error, "dataset load failed");
        } else if let Some(e) = any.downcast_ref::<SelectionChanged>() {
            info!(selected = e.selected_count, "selection changed");
        } else if let Some(e) = any.downcast_ref::<AttributeChanged>() {
            info!(role = e.role, attribute = ?e.attribute, "attribute changed");
        } else if let Some(e) = any.downcast_ref::<PlotModeChanged>() {
            info!(mode = e.mode, "plot mode changed");
        }
    }
}

/// Main application state
struct DashboardApp {
    ctx: ViewerContext,
    controller: DashboardController,
    scatter: ScatterPlotView,
    distribution: DistributionView,
    _runtime: tokio::runtime::Runtime,
}

impl DashboardApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");

        let events = Arc::new(EventBus::new());
        events.subscribe::<DatasetLoaded>(Box::new(EventLogger));
        events.subscribe::<DatasetLoadFailed>(Box::new(EventLogger));
        events.subscribe::<SelectionChanged>(Box::new(EventLogger));
        events.subscribe::<AttributeChanged>(Box::new(EventLogger));
        events.subscribe::<PlotModeChanged>(Box::new(EventLogger));

        let ctx = ViewerContext::new(events, runtime.handle().clone());

        let mut controller = DashboardController::new();
        let initial = controller.current.clone();
        controller.request_load(initial, &ctx);

        Self {
            ctx,
            controller,
            scatter: ScatterPlotView::new(uuid::Uuid::new_v4(), "Scatter".to_string()),
            distribution: DistributionView::new(uuid::Uuid::new_v4(), "Distribution".to_string()),
            _runtime: runtime,
        }
    }

    fn dataset_selector(&mut self, ui: &mut Ui) {
        let mut picked: Option<DatasetEntry> = None;
        egui::ComboBox::from_label("Dataset")
            .selected_text(self.controller.current.label())
            .show_ui(ui, |ui| {
                for entry in &self.controller.entries {
                    if ui
                        .selectable_label(*entry == self.controller.current, entry.label())
                        .clicked()
                    {
                        picked = Some(entry.clone());
                    }
                }
            });
        if let Some(entry) = picked {
            if entry != self.controller.current {
                self.controller.request_load(entry, &self.ctx);
            }
        }

        if ui.button("Open CSV…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("CSV files", &["csv"])
                .pick_file()
            {
                self.controller.open_csv(path, &self.ctx);
            }
        }

        if self.controller.loading() {
            ui.spinner();
        }
    }

    /// One attribute dropdown. Returns the new choice when it changed.
    fn attribute_selector(
        ui: &mut Ui,
        label: &str,
        current: &Option<String>,
        options: &[String],
    ) -> Option<Option<String>> {
        let mut changed = None;
        ui.add_enabled_ui(!options.is_empty(), |ui| {
            egui::ComboBox::from_label(label)
                .selected_text(current.as_deref().unwrap_or("No valid options"))
                .show_ui(ui, |ui| {
                    for option in options {
                        let selected = current.as_deref() == Some(option.as_str());
                        if ui.selectable_label(selected, option).clicked() && !selected {
                            changed = Some(Some(option.clone()));
                        }
                    }
                });
        });
        changed
    }

    fn attribute_selectors(&mut self, ui: &mut Ui) {
        let schema = self.ctx.schema.read().clone();
        let numeric: Vec<String> = schema.numeric().map(|s| s.to_string()).collect();
        let categorical: Vec<String> = schema.categorical().map(|s| s.to_string()).collect();
        let choices = self.ctx.choices.read().clone();

        if let Some(x) = Self::attribute_selector(ui, "X", &choices.x, &numeric) {
            self.ctx.choices.write().x = x.clone();
            self.ctx.events.emit(&AttributeChanged { role: "x", attribute: x });
        }
        if let Some(y) = Self::attribute_selector(ui, "Y", &choices.y, &numeric) {
            self.ctx.choices.write().y = y.clone();
            self.ctx.events.emit(&AttributeChanged { role: "y", attribute: y });
        }
        if let Some(target) = Self::attribute_selector(ui, "Measure", &choices.target, &numeric) {
            self.ctx.choices.write().target = target.clone();
            self.ctx.events.emit(&AttributeChanged {
                role: "target",
                attribute: target,
            });
        }
        if let Some(color) = Self::attribute_selector(ui, "Color", &choices.color, &categorical) {
            self.ctx.choices.write().color = color.clone();
            self.controller.refresh_colors(&self.ctx);
            self.ctx.events.emit(&AttributeChanged {
                role: "color",
                attribute: color,
            });
        }
    }

    fn plot_mode_toggle(&mut self, ui: &mut Ui) {
        let mode = *self.ctx.plot_mode.read();
        let next = mode.toggled();
        if ui.button(format!("Switch to {}", next.label())).clicked() {
            *self.ctx.plot_mode.write() = next;
            self.ctx.events.emit(&PlotModeChanged { mode: next.label() });
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, egui_ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.controller.poll(&self.ctx) {
            egui_ctx.request_repaint();
        }
        if self.controller.loading() {
            // Keep polling while a load is in flight.
            egui_ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("controls").show(egui_ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                self.dataset_selector(ui);
                ui.separator();
                self.attribute_selectors(ui);
                ui.separator();
                self.plot_mode_toggle(ui);

                let selection = self.ctx.selection.read();
                if selection.state().brushed {
                    let len = selection.state().len();
                    drop(selection);
                    ui.separator();
                    ui.label(format!("{len} selected"));
                    if ui.button("Clear selection").clicked() {
                        self.ctx.selection.write().clear();
                    }
                }
            });
        });

        egui::CentralPanel::default().show(egui_ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].heading(self.scatter.title());
                self.scatter.ui(&self.ctx, &mut columns[0]);
                columns[1].heading(self.distribution.title());
                self.distribution.ui(&self.ctx, &mut columns[1]);
            });
        });
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting linked-selection dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([800.0, 500.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Brushlink",
        options,
        Box::new(|cc| Box::new(DashboardApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
