// Library interface for lapchart
// This allows integration tests and benchmarks to access the pipeline without the UI

pub mod chart;
pub mod config;
pub mod errors;
pub mod laps;
pub mod pipeline;
pub mod session;
pub mod writer;

// Re-export commonly used types
pub use chart::{ChartSeries, LapChart};
pub use errors::LapchartError;
pub use laps::{DriverSelection, LapTimeSeriesPoint};
pub use pipeline::{ChartView, LoadedSession, RenderResult, run_pipeline};
pub use session::{LapRecord, SessionKind, SessionLoader, SessionRequest};
