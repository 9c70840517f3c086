// The load -> project -> filter -> render pipeline, usable without any UI

use std::sync::Arc;

use log::{info, warn};

use crate::chart::{LapChart, render};
use crate::laps::{
    DriverSelection, DriverSummary, LapTimeSeriesPoint, default_selection, distinct_drivers,
    filter_drivers, project, summarize,
};
use crate::session::{LapRecord, LoadOutcome, SessionLoader, SessionRequest};

#[derive(Clone, Debug, PartialEq)]
pub enum ChartView {
    /// The session has drivers but none are selected
    NoSelection,
    Chart(LapChart),
}

/// A successfully loaded session and the chart for the current driver selection.
#[derive(Clone, Debug)]
pub struct LoadedSession {
    pub request: SessionRequest,
    /// Raw lap records as returned by the provider
    pub laps: Arc<[LapRecord]>,
    /// All complete lap times of the session
    pub points: Vec<LapTimeSeriesPoint>,
    /// Drivers in order of first appearance
    pub drivers: Vec<String>,
    pub selection: DriverSelection,
    pub selected_points: Vec<LapTimeSeriesPoint>,
    pub summaries: Vec<DriverSummary>,
    pub view: ChartView,
}

impl LoadedSession {
    fn new(
        request: SessionRequest,
        laps: Arc<[LapRecord]>,
        selection: Option<DriverSelection>,
    ) -> Self {
        let points = project(&laps[..]);
        let drivers = distinct_drivers(&points);
        let selection = selection.unwrap_or_else(|| default_selection(&points));

        let mut session = Self {
            request,
            laps,
            points,
            drivers,
            selection: DriverSelection::empty(),
            selected_points: Vec::new(),
            summaries: Vec::new(),
            view: ChartView::NoSelection,
        };
        session.select(selection);
        session
    }

    /// Re-runs the filter and chart stages for a new selection. Drivers that
    /// are not part of the session are ignored.
    pub fn select(&mut self, selection: DriverSelection) {
        let selection = selection.restrict_to(&self.drivers);
        self.selected_points = filter_drivers(&self.points, &selection);
        self.summaries = summarize(&self.selected_points);
        self.view = if selection.is_empty() && !self.drivers.is_empty() {
            warn!("No drivers selected for {}, skipping chart", self.request);
            ChartView::NoSelection
        } else {
            ChartView::Chart(render(&self.selected_points))
        };
        self.selection = selection;
    }
}

#[derive(Clone, Debug)]
pub enum RenderResult {
    /// The provider could not load the session
    Failed {
        request: SessionRequest,
        message: String,
    },
    /// The session loaded but has no laps
    Empty { request: SessionRequest },
    Loaded(Box<LoadedSession>),
}

impl RenderResult {
    pub fn request(&self) -> &SessionRequest {
        match self {
            Self::Failed { request, .. } | Self::Empty { request } => request,
            Self::Loaded(session) => &session.request,
        }
    }
}

/// Runs one load action end to end. `selection` defaults to the first drivers
/// to appear in the session when `None`.
pub fn run_pipeline(
    request: &SessionRequest,
    selection: Option<DriverSelection>,
    loader: &SessionLoader,
) -> RenderResult {
    match loader.load(request) {
        LoadOutcome::Failed { message } => RenderResult::Failed {
            request: request.clone(),
            message,
        },
        LoadOutcome::Empty => {
            warn!("Session {} returned no laps", request);
            RenderResult::Empty {
                request: request.clone(),
            }
        }
        LoadOutcome::Laps(laps) => {
            let session = LoadedSession::new(request.clone(), laps, selection);
            info!(
                "Loaded {}: {} laps, {} lap times, {} drivers",
                request,
                session.laps.len(),
                session.points.len(),
                session.drivers.len()
            );
            RenderResult::Loaded(Box::new(session))
        }
    }
}
