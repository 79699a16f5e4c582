//! Distribution plot: box plot, violin plot, or raw points for tiny
//! selections
//!
//! Consumes the brushed selection only. An empty selection (and the
//! initial "nothing brushed yet" state) renders an explicit placeholder
//! rather than falling back to the full dataset.

use egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, Polygon};
use serde_json::{json, Value};

use super::utils::stats::{DensityCurve, GroupStats, GroupedValues, POINT_FALLBACK_THRESHOLD};
use super::PlotKind;
use crate::{SpaceView, SpaceViewId, ViewerContext};

/// Configuration for the distribution view
#[derive(Debug, Clone)]
pub struct DistributionConfig {
    /// Box width in category units
    pub box_width: f64,

    /// Violin width in category units
    pub violin_width: f64,

    /// Whether to show outlier markers
    pub show_outliers: bool,

    /// Whether to show the legend
    pub show_legend: bool,

    /// Whether to show the grid
    pub show_grid: bool,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            box_width: 0.5,
            violin_width: 0.8,
            show_outliers: true,
            show_legend: true,
            show_grid: true,
        }
    }
}

/// Distribution view
pub struct DistributionView {
    id: SpaceViewId,
    title: String,
    pub config: DistributionConfig,
}

impl DistributionView {
    pub fn new(id: SpaceViewId, title: String) -> Self {
        Self {
            id,
            title,
            config: DistributionConfig::default(),
        }
    }

    fn draw_box(&self, plot_ui: &mut egui_plot::PlotUi, x: f64, stats: &GroupStats, color: Color32) {
        let half_width = self.config.box_width / 2.0;

        // Box (q1 to q3)
        let box_points = vec![
            [x - half_width, stats.q1],
            [x + half_width, stats.q1],
            [x + half_width, stats.q3],
            [x - half_width, stats.q3],
        ];
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(box_points))
                .fill_color(color.linear_multiply(0.3))
                .stroke(Stroke::new(2.0, color)),
        );

        // Median line
        plot_ui.line(
            Line::new(vec![[x - half_width, stats.median], [x + half_width, stats.median]])
                .color(color)
                .width(3.0),
        );

        // Whiskers to the clamped bounds
        plot_ui.line(
            Line::new(vec![[x, stats.q3], [x, stats.upper_whisker]])
                .color(color)
                .width(1.5),
        );
        plot_ui.line(
            Line::new(vec![[x, stats.q1], [x, stats.lower_whisker]])
                .color(color)
                .width(1.5),
        );

        // Whisker caps
        let cap_width = half_width * 0.5;
        plot_ui.line(
            Line::new(vec![
                [x - cap_width, stats.upper_whisker],
                [x + cap_width, stats.upper_whisker],
            ])
            .color(color)
            .width(1.5),
        );
        plot_ui.line(
            Line::new(vec![
                [x - cap_width, stats.lower_whisker],
                [x + cap_width, stats.lower_whisker],
            ])
            .color(color)
            .width(1.5),
        );

        if self.config.show_outliers && !stats.outliers.is_empty() {
            let outlier_points: Vec<[f64; 2]> =
                stats.outliers.iter().map(|&y| [x, y]).collect();
            plot_ui.points(
                Points::new(outlier_points)
                    .color(color.linear_multiply(0.7))
                    .radius(3.0)
                    .shape(egui_plot::MarkerShape::Circle),
            );
        }
    }

    fn draw_violin(
        &self,
        plot_ui: &mut egui_plot::PlotUi,
        x: f64,
        curve: &DensityCurve,
        max_density: f64,
        color: Color32,
    ) {
        if max_density <= 0.0 || curve.points.len() < 2 {
            return;
        }

        let half_width = self.config.violin_width / 2.0;
        let mut outline = Vec::with_capacity(curve.points.len() * 2);

        // Right side up, left side back down. Widths are normalized by the
        // max density across all groups so shapes stay comparable.
        for &(value, density) in &curve.points {
            outline.push([x + (density / max_density) * half_width, value]);
        }
        for &(value, density) in curve.points.iter().rev() {
            outline.push([x - (density / max_density) * half_width, value]);
        }

        plot_ui.polygon(
            Polygon::new(PlotPoints::new(outline))
                .fill_color(color.linear_multiply(0.3))
                .stroke(Stroke::new(2.0, color)),
        );
    }

    /// Raw points per category, used when the filtered selection is too
    /// small for meaningful box statistics.
    fn draw_point_fallback(
        &self,
        plot_ui: &mut egui_plot::PlotUi,
        grouped: &GroupedValues,
        colors: &super::utils::colors::ColorAssignment,
    ) {
        for (i, (category, values)) in grouped.iter().enumerate() {
            let pts: Vec<[f64; 2]> = values.iter().map(|&v| [i as f64, v]).collect();
            plot_ui.points(
                Points::new(pts)
                    .color(colors.color(category))
                    .radius(4.0)
                    .shape(egui_plot::MarkerShape::Circle)
                    .name(display_key(category)),
            );
        }
    }

    fn placeholder(ui: &mut Ui, text: &str) {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(text).weak());
        });
    }
}

fn display_key(key: &str) -> String {
    if key.is_empty() {
        "(empty)".to_string()
    } else {
        key.to_string()
    }
}

impl SpaceView for DistributionView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "DistributionView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let dataset = ctx.dataset.read().clone();
        let choices = ctx.choices.read().clone();

        let (Some(dataset), Some(target), Some(group)) =
            (dataset, choices.target.as_deref(), choices.color.as_deref())
        else {
            Self::placeholder(ui, "No data to display");
            return;
        };

        let selection = ctx.selection.read();
        if !selection.state().brushed || selection.state().is_empty() {
            Self::placeholder(ui, "No data selected");
            return;
        }
        let selected = selection.state().selected.clone();
        drop(selection);

        // Pure function of (selection, target, group); recomputed per frame.
        let grouped = GroupedValues::collect(&dataset, &selected, target, group);
        if grouped.is_empty() {
            Self::placeholder(ui, "No numeric values in selection");
            return;
        }

        let mode = *ctx.plot_mode.read();
        let point_fallback = grouped.total_len() <= POINT_FALLBACK_THRESHOLD;

        let mut plot = Plot::new(format!("{:?}", self.id))
            .show_grid(self.config.show_grid)
            .allow_zoom(true)
            .allow_drag(true)
            .allow_boxed_zoom(true)
            .include_x(-0.5)
            .include_x(grouped.iter().count() as f64 - 0.5);
        if self.config.show_legend {
            plot = plot.legend(Legend::default());
        }

        let colors = ctx.colors.read().clone();

        plot.show(ui, |plot_ui| {
            if point_fallback {
                self.draw_point_fallback(plot_ui, &grouped, &colors);
                return;
            }

            match mode {
                PlotKind::Box => {
                    for (i, stats) in grouped.box_stats().iter().enumerate() {
                        let color = colors.color(&stats.key);
                        self.draw_box(plot_ui, i as f64, stats, color);

                        // Hidden point to get the category into the legend.
                        plot_ui.points(
                            Points::new(vec![[i as f64, stats.median]])
                                .color(color)
                                .radius(0.0)
                                .name(display_key(&stats.key)),
                        );
                    }
                }
                PlotKind::Violin => {
                    let curves = grouped.density_curves();
                    let max_density = curves
                        .iter()
                        .flat_map(|c| c.points.iter().map(|&(_, d)| d))
                        .fold(0.0, f64::max);

                    for (i, curve) in curves.iter().enumerate() {
                        let color = colors.color(&curve.key);
                        self.draw_violin(plot_ui, i as f64, curve, max_density, color);

                        if let Some(&(value, _)) = curve.points.first() {
                            plot_ui.points(
                                Points::new(vec![[i as f64, value]])
                                    .color(color)
                                    .radius(0.0)
                                    .name(display_key(&curve.key)),
                            );
                        }
                    }
                }
            }
        });
    }

    fn save_config(&self) -> Value {
        json!({
            "box_width": self.config.box_width,
            "violin_width": self.config.violin_width,
            "show_outliers": self.config.show_outliers,
            "show_legend": self.config.show_legend,
            "show_grid": self.config.show_grid,
        })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(width) = config.get("box_width").and_then(|v| v.as_f64()) {
            self.config.box_width = width;
        }
        if let Some(width) = config.get("violin_width").and_then(|v| v.as_f64()) {
            self.config.violin_width = width;
        }
        if let Some(show) = config.get("show_outliers").and_then(|v| v.as_bool()) {
            self.config.show_outliers = show;
        }
        if let Some(show) = config.get("show_legend").and_then(|v| v.as_bool()) {
            self.config.show_legend = show;
        }
        if let Some(show) = config.get("show_grid").and_then(|v| v.as_bool()) {
            self.config.show_grid = show;
        }
    }
}
