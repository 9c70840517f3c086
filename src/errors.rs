// Error types for lapchart

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum LapchartError {
    // Errors talking to the telemetry provider
    #[snafu(display("Request to {url} failed: {source}"))]
    ProviderRequest { url: String, source: reqwest::Error },
    #[snafu(display("Provider returned HTTP {status} for {url}"))]
    ProviderStatus { url: String, status: u16 },
    #[snafu(display("Could not decode provider response from {url}: {source}"))]
    ProviderDecode {
        url: String,
        source: serde_json::Error,
    },
    #[snafu(display("No {kind} session found for '{race}' in {year}"))]
    RaceNotFound {
        year: i32,
        race: String,
        kind: String,
    },

    #[snafu(display("{message}"))]
    SessionLoadFailed { message: String },

    // Provider disk cache errors
    #[snafu(display("Error accessing cache directory {path}: {source}"))]
    CacheIO { path: String, source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Errors for the lap export writer
    #[snafu(display("Error writing lap export"))]
    WriterError { source: io::Error },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}
