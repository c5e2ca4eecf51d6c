// src/telemetry/mod.rs
pub mod chart;
pub mod diagnostics;
pub mod error;
pub mod label;
pub mod plot;
pub mod recommendations;
pub mod source;
pub mod window;
pub use chart::{ChartConfig, ChartFrame, ChartSurface};
pub use diagnostics::{DiagnosticSink, LogSink};
pub use error::PollError;
pub use label::format_label;
pub use plot::{render_window_png, PlotStyle};
pub use recommendations::RecommendationStore;
pub use source::{HttpSource, SampleSource, SimulatedSource};
pub use window::{SensorWindow, WindowManager, DEFAULT_CAPACITY};
