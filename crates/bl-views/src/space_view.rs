//! Space view abstraction - base trait for the dashboard's views

use egui::Ui;
use serde_json::Value;
use uuid::Uuid;

use crate::ViewerContext;

/// Unique identifier for a space view
pub type SpaceViewId = Uuid;

/// Base trait for all space views
pub trait SpaceView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> SpaceViewId;

    /// Get the title of this view
    fn title(&self) -> &str;

    /// Get the view type (for serialization)
    fn view_type(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);

    /// Save configuration
    fn save_config(&self) -> Value;

    /// Load configuration
    fn load_config(&mut self, config: Value);
}
