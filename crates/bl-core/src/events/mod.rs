use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// System-wide event bus
#[derive(Default)]
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events of type `E`.
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(std::any::TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    /// Dispatch an event to every handler registered for its type.
    pub fn emit<E: Event>(&self, event: &E) {
        let mut handlers = self.handlers.lock();
        if let Some(list) = handlers.get_mut(&std::any::TypeId::of::<E>()) {
            for handler in list.iter_mut() {
                handler.handle(event);
            }
        }
    }
}

/// Common system events
pub mod events {
    use super::Event;

    /// A dataset finished loading and was installed
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub row_count: usize,
        pub column_count: usize,
    }

    /// A dataset load failed or produced an empty table
    #[derive(Debug, Clone)]
    pub struct DatasetLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// The brushed selection changed
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub selected_count: usize,
    }

    /// An attribute selector changed
    #[derive(Debug, Clone)]
    pub struct AttributeChanged {
        pub role: &'static str,
        pub attribute: Option<String>,
    }

    /// The distribution plot mode was toggled
    #[derive(Debug, Clone)]
    pub struct PlotModeChanged {
        pub mode: &'static str,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DatasetLoadFailed,
        SelectionChanged,
        AttributeChanged,
        PlotModeChanged
    );
}
