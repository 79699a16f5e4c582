//! Plot implementations

pub mod utils;

mod distribution;
mod scatter;

pub use distribution::{DistributionConfig, DistributionView};
pub use scatter::{ScatterPlotConfig, ScatterPlotView};

/// Distribution plot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Box,
    Violin,
}

impl PlotKind {
    pub fn toggled(self) -> Self {
        match self {
            PlotKind::Box => PlotKind::Violin,
            PlotKind::Violin => PlotKind::Box,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlotKind::Box => "box",
            PlotKind::Violin => "violin",
        }
    }
}
