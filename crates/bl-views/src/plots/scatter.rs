//! Scatter plot with brush selection
//!
//! Points are projected through explicit linear scales into the panel rect
//! every frame, so the projection always reflects the current attribute
//! choices, window size and dataset. The brush gesture feeds the selection
//! controller; the resolved selection is read back for highlighting.

use egui::{pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui};
use serde_json::{json, Value};

use bl_core::data::Dataset;
use bl_core::scale::{extent, LinearScale};

use crate::{SpaceView, SpaceViewId, ViewerContext};

const MARGIN_LEFT: f32 = 52.0;
const MARGIN_BOTTOM: f32 = 28.0;
const MARGIN_TOP: f32 = 10.0;
const LEGEND_WIDTH: f32 = 120.0;
const TICK_COUNT: usize = 5;

/// Configuration for the scatter plot view
#[derive(Debug, Clone)]
pub struct ScatterPlotConfig {
    /// Base point radius
    pub point_radius: f32,

    /// Whether to show the category legend
    pub show_legend: bool,
}

impl Default for ScatterPlotConfig {
    fn default() -> Self {
        Self {
            point_radius: 4.0,
            show_legend: true,
        }
    }
}

/// Scatter plot view
pub struct ScatterPlotView {
    id: SpaceViewId,
    title: String,
    pub config: ScatterPlotConfig,
}

impl ScatterPlotView {
    pub fn new(id: SpaceViewId, title: String) -> Self {
        Self {
            id,
            title,
            config: ScatterPlotConfig::default(),
        }
    }

    /// Screen position of every record under the current scales. `None`
    /// for records missing a numeric value on either axis. Recomputed per
    /// frame, never cached.
    fn project_all(
        dataset: &Dataset,
        x_col: usize,
        y_col: usize,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
    ) -> Vec<Option<Pos2>> {
        (0..dataset.len())
            .map(|id| {
                let x = dataset.numeric_value(id, x_col)?;
                let y = dataset.numeric_value(id, y_col)?;
                Some(pos2(x_scale.project(x), y_scale.project(y)))
            })
            .collect()
    }

    fn draw_axes(
        &self,
        painter: &egui::Painter,
        plot_rect: Rect,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
        text_color: Color32,
    ) {
        let stroke = Stroke::new(1.0, text_color.gamma_multiply(0.6));
        let font = FontId::proportional(10.0);

        painter.line_segment(
            [plot_rect.left_bottom(), plot_rect.right_bottom()],
            stroke,
        );
        painter.line_segment([plot_rect.left_top(), plot_rect.left_bottom()], stroke);

        let (x0, x1) = x_scale.domain();
        let (y0, y1) = y_scale.domain();
        for i in 0..=TICK_COUNT {
            let t = i as f64 / TICK_COUNT as f64;

            let xv = x0 + (x1 - x0) * t;
            let xp = x_scale.project(xv);
            painter.line_segment(
                [
                    pos2(xp, plot_rect.bottom()),
                    pos2(xp, plot_rect.bottom() + 4.0),
                ],
                stroke,
            );
            painter.text(
                pos2(xp, plot_rect.bottom() + 6.0),
                Align2::CENTER_TOP,
                format_tick(xv),
                font.clone(),
                text_color,
            );

            let yv = y0 + (y1 - y0) * t;
            let yp = y_scale.project(yv);
            painter.line_segment(
                [
                    pos2(plot_rect.left() - 4.0, yp),
                    pos2(plot_rect.left(), yp),
                ],
                stroke,
            );
            painter.text(
                pos2(plot_rect.left() - 6.0, yp),
                Align2::RIGHT_CENTER,
                format_tick(yv),
                font.clone(),
                text_color,
            );
        }
    }

    fn draw_legend(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        colors: &super::utils::colors::ColorAssignment,
        text_color: Color32,
    ) {
        let font = FontId::proportional(11.0);
        let mut y = rect.top() + 4.0;
        for (category, color) in colors.iter() {
            if y + 14.0 > rect.bottom() {
                break;
            }
            let swatch = Rect::from_min_size(pos2(rect.left(), y), vec2(10.0, 10.0));
            painter.rect_filled(swatch, 2.0, color);
            let label = if category.is_empty() { "(empty)" } else { category };
            painter.text(
                pos2(rect.left() + 16.0, y + 5.0),
                Align2::LEFT_CENTER,
                label,
                font.clone(),
                text_color,
            );
            y += 16.0;
        }
    }
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 1000.0 || (v != 0.0 && v.abs() < 0.01) {
        format!("{v:.1e}")
    } else {
        format!("{v:.1}")
    }
}

impl SpaceView for ScatterPlotView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ScatterPlotView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let dataset = ctx.dataset.read().clone();
        let choices = ctx.choices.read().clone();

        let (Some(dataset), Some(x_attr), Some(y_attr)) =
            (dataset, choices.x.as_deref(), choices.y.as_deref())
        else {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("No data to display").weak());
            });
            return;
        };

        let (Some(x_col), Some(y_col)) = (
            dataset.column_index(x_attr),
            dataset.column_index(y_attr),
        ) else {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("Selected attributes not in dataset").weak());
            });
            return;
        };

        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();

        let legend_w = if self.config.show_legend { LEGEND_WIDTH } else { 0.0 };
        let plot_rect = Rect::from_min_max(
            pos2(rect.left() + MARGIN_LEFT, rect.top() + MARGIN_TOP),
            pos2(rect.right() - legend_w - 8.0, rect.bottom() - MARGIN_BOTTOM),
        );

        let xs = (0..dataset.len()).filter_map(|id| dataset.numeric_value(id, x_col));
        let ys = (0..dataset.len()).filter_map(|id| dataset.numeric_value(id, y_col));
        let (Some(x_extent), Some(y_extent)) = (extent(xs), extent(ys)) else {
            ui.allocate_ui_at_rect(plot_rect, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new("No numeric values to plot").weak());
                });
            });
            return;
        };

        // Domain padded by one unit on each side, matching the axis
        // headroom the distribution plot leaves as well.
        let x_scale = LinearScale::new(
            (x_extent.0 - 1.0, x_extent.1 + 1.0),
            (plot_rect.left(), plot_rect.right()),
        );
        let y_scale = LinearScale::new(
            (y_extent.0 - 1.0, y_extent.1 + 1.0),
            (plot_rect.bottom(), plot_rect.top()),
        );

        let projected = Self::project_all(&dataset, x_col, y_col, &x_scale, &y_scale);

        self.draw_axes(&painter, plot_rect, &x_scale, &y_scale, text_color);

        // Brush gesture -> selection controller transitions.
        {
            let mut selection = ctx.selection.write();
            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    selection.begin_drag(pos);
                }
            } else if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    selection.move_drag(pos);
                }
            }
            if response.drag_released() {
                selection.end_drag(&projected);
            }
            // A click is a drag that never moved: a point rectangle, which
            // selects whatever sits exactly under it (usually nothing).
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    selection.begin_drag(pos);
                    selection.end_drag(&projected);
                }
            }
        }

        let selection = ctx.selection.read();
        let selected: ahash::AHashSet<usize> =
            selection.state().selected.iter().copied().collect();
        let brushed = selection.state().brushed;

        let colors = ctx.colors.read();
        let color_col = choices.color.as_deref().and_then(|c| dataset.column_index(c));

        for (id, pos) in projected.iter().enumerate() {
            let Some(pos) = pos else { continue };
            let category = color_col
                .and_then(|c| dataset.value(id, c))
                .unwrap_or_default();
            let mut fill = colors.color(category);
            let stroke = if selected.contains(&id) {
                Stroke::new(2.0, Color32::from_rgb(255, 165, 0))
            } else {
                if brushed {
                    // Fade unselected points while a brush is active.
                    fill = fill.gamma_multiply(0.35);
                }
                Stroke::new(1.0, Color32::BLACK)
            };
            painter.circle(*pos, self.config.point_radius, fill, stroke);
        }

        // Live brush rectangle.
        if let Some(brush) = selection.drag().rect() {
            painter.rect_filled(brush, 0.0, Color32::from_rgba_unmultiplied(30, 144, 255, 40));
            painter.rect_stroke(brush, 0.0, Stroke::new(1.5, Color32::from_rgb(30, 144, 255)));
        }
        drop(selection);

        if self.config.show_legend {
            let legend_rect = Rect::from_min_max(
                pos2(plot_rect.right() + 16.0, plot_rect.top()),
                pos2(rect.right(), plot_rect.bottom()),
            );
            self.draw_legend(&painter, legend_rect, &colors, text_color);
        }

        // Axis captions.
        painter.text(
            pos2(plot_rect.center().x, rect.bottom() - 2.0),
            Align2::CENTER_BOTTOM,
            x_attr,
            FontId::proportional(11.0),
            text_color,
        );
    }

    fn save_config(&self) -> Value {
        json!({
            "point_radius": self.config.point_radius,
            "show_legend": self.config.show_legend,
        })
    }

    fn load_config(&mut self, config: Value) {
        if let Some(radius) = config.get("point_radius").and_then(|v| v.as_f64()) {
            self.config.point_radius = radius as f32;
        }
        if let Some(show) = config.get("show_legend").and_then(|v| v.as_bool()) {
            self.config.show_legend = show;
        }
    }
}
