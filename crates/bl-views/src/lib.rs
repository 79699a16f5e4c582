//! View system for the linked-selection dashboard

mod space_view;
pub mod plots;

pub use plots::{DistributionView, DistributionConfig, PlotKind, ScatterPlotView, ScatterPlotConfig};
pub use space_view::{SpaceView, SpaceViewId};

use std::sync::Arc;

use parking_lot::RwLock;

use bl_core::data::{AttributeKind, Dataset};
use bl_core::events::EventBus;
use bl_core::selection::SelectionController;
use bl_data::schema::AttributeSchema;
use plots::utils::colors::ColorAssignment;

/// The four attribute selections driving both plots.
///
/// x/y/target must be numeric attributes, color doubles as the grouping
/// attribute and must be categorical. A choice survives attribute-selector
/// changes but is revalidated against every freshly inferred schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeChoices {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub target: Option<String>,
}

impl AttributeChoices {
    /// Default choices for a fresh dataset: first numeric attributes for
    /// x/y/target (y prefers the second one), first categorical for color.
    pub fn defaults_for(schema: &AttributeSchema) -> Self {
        let numeric: Vec<&str> = schema.numeric().collect();
        Self {
            x: numeric.first().map(|s| s.to_string()),
            y: numeric.get(1).or_else(|| numeric.first()).map(|s| s.to_string()),
            target: numeric.first().map(|s| s.to_string()),
            color: schema.categorical().next().map(|s| s.to_string()),
        }
    }

    /// Drop or replace choices that no longer exist in `schema` with the
    /// first valid option of the right kind; `None` when there is none.
    pub fn revalidate(&mut self, schema: &AttributeSchema) {
        let fix = |choice: &mut Option<String>, kind: AttributeKind| {
            let valid = choice
                .as_deref()
                .map_or(false, |name| schema.kind_of(name) == Some(kind));
            if !valid {
                *choice = match kind {
                    AttributeKind::Numeric => schema.numeric().next().map(|s| s.to_string()),
                    AttributeKind::Categorical => {
                        schema.categorical().next().map(|s| s.to_string())
                    }
                };
            }
        };
        fix(&mut self.x, AttributeKind::Numeric);
        fix(&mut self.y, AttributeKind::Numeric);
        fix(&mut self.target, AttributeKind::Numeric);
        fix(&mut self.color, AttributeKind::Categorical);
    }
}

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Current dataset, replaced wholesale on reload
    pub dataset: Arc<RwLock<Option<Arc<Dataset>>>>,

    /// Schema inferred from the current dataset
    pub schema: Arc<RwLock<AttributeSchema>>,

    /// Current attribute selections
    pub choices: Arc<RwLock<AttributeChoices>>,

    /// Category colors for the current color/group attribute
    pub colors: Arc<RwLock<ColorAssignment>>,

    /// Brush selection state and drag machine
    pub selection: Arc<RwLock<SelectionController>>,

    /// Distribution plot mode
    pub plot_mode: Arc<RwLock<PlotKind>>,

    /// Event bus
    pub events: Arc<EventBus>,

    /// Tokio runtime handle
    pub runtime_handle: tokio::runtime::Handle,
}

impl ViewerContext {
    pub fn new(events: Arc<EventBus>, runtime_handle: tokio::runtime::Handle) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(None)),
            schema: Arc::new(RwLock::new(AttributeSchema::default())),
            choices: Arc::new(RwLock::new(AttributeChoices::default())),
            colors: Arc::new(RwLock::new(ColorAssignment::default())),
            selection: Arc::new(RwLock::new(SelectionController::new(events.clone()))),
            plot_mode: Arc::new(RwLock::new(PlotKind::Box)),
            events,
            runtime_handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::data::{Dataset, Record};
    use bl_data::schema::SchemaInferencer;

    fn schema() -> AttributeSchema {
        let ds = Dataset::new(
            vec!["w".into(), "h".into(), "species".into()],
            vec![Record::new(vec!["1".into(), "2".into(), "a".into()])],
        );
        SchemaInferencer::new().infer(&ds)
    }

    #[test]
    fn defaults_pick_first_numeric_and_categorical() {
        let choices = AttributeChoices::defaults_for(&schema());
        assert_eq!(choices.x.as_deref(), Some("w"));
        assert_eq!(choices.y.as_deref(), Some("h"));
        assert_eq!(choices.target.as_deref(), Some("w"));
        assert_eq!(choices.color.as_deref(), Some("species"));
    }

    #[test]
    fn revalidate_replaces_vanished_attributes() {
        let mut choices = AttributeChoices {
            x: Some("gone".into()),
            y: Some("h".into()),
            color: Some("species".into()),
            target: Some("species".into()), // wrong kind now
        };
        choices.revalidate(&schema());

        assert_eq!(choices.x.as_deref(), Some("w"));
        assert_eq!(choices.y.as_deref(), Some("h"));
        assert_eq!(choices.color.as_deref(), Some("species"));
        assert_eq!(choices.target.as_deref(), Some("w"));
    }

    #[test]
    fn revalidate_against_empty_schema_clears_everything() {
        let mut choices = AttributeChoices::defaults_for(&schema());
        choices.revalidate(&AttributeSchema::default());
        assert_eq!(choices, AttributeChoices::default());
    }
}
