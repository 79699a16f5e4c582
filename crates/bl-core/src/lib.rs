//! Core functionality for the linked-selection dashboard
//!
//! This crate provides the data model, event bus, selection state machine
//! and screen-space projection used by the rest of the system.

pub mod data;
pub mod events;
pub mod scale;
pub mod selection;

// Re-export commonly used types
pub use data::{Attribute, AttributeKind, DataSource, Dataset, Record, RecordId};
pub use events::EventBus;
pub use scale::LinearScale;
pub use selection::{hit_test, DragState, SelectionController, SelectionState};
