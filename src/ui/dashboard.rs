use std::sync::{
    Arc,
    mpsc::{self, Receiver, TryRecvError},
};
use std::thread;

use egui::{Color32, ComboBox, RichText, ScrollArea, Slider, Ui};
use egui_dropdown::DropDownBox;
use log::{error, info};

use lapchart::{
    ChartView, DriverSelection, LoadedSession, RenderResult, SessionKind, SessionLoader,
    SessionRequest,
    config::AppConfig,
    laps::format_lap_time,
    run_pipeline,
    session::{MAX_YEAR, MIN_YEAR},
};

use super::{chart_view::show_lap_chart, dashboard_visuals, lap_table::show_lap_table};

/// Suggestions for the race field. Any other text is still sent to the provider.
const KNOWN_RACES: [&str; 24] = [
    "Sakhir",
    "Jeddah",
    "Melbourne",
    "Suzuka",
    "Shanghai",
    "Miami",
    "Imola",
    "Monaco",
    "Montréal",
    "Barcelona",
    "Spielberg",
    "Silverstone",
    "Budapest",
    "Spa-Francorchamps",
    "Zandvoort",
    "Monza",
    "Baku",
    "Singapore",
    "Austin",
    "Mexico City",
    "São Paulo",
    "Las Vegas",
    "Lusail",
    "Yas Marina",
];

enum UiState {
    Idle,
    Loading { request: SessionRequest },
    Done(RenderResult),
}

/// Dashboard window: session inputs on the left, results in the central panel.
///
/// Loads run on a worker thread and report back over a channel, so the UI
/// keeps repainting the spinner while the provider is queried.
pub(crate) struct DashboardApp {
    loader: Arc<SessionLoader>,
    app_config: AppConfig,
    request: SessionRequest,
    ui_state: UiState,
    result_receiver: Option<Receiver<RenderResult>>,
}

impl DashboardApp {
    pub(crate) fn new(
        loader: Arc<SessionLoader>,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        cc.egui_ctx.set_visuals(dashboard_visuals());

        Self {
            loader,
            request: app_config.last_request.clone(),
            app_config,
            ui_state: UiState::Idle,
            result_receiver: None,
        }
    }

    fn is_loading(&self) -> bool {
        matches!(self.ui_state, UiState::Loading { .. })
    }

    fn start_load(&mut self, ctx: &egui::Context) {
        let request = self.request.clone();
        let loader = self.loader.clone();
        let repaint_ctx = ctx.clone();
        let (result_tx, result_rx) = mpsc::channel::<RenderResult>();

        info!("Loading {}", request);
        self.ui_state = UiState::Loading {
            request: request.clone(),
        };
        self.result_receiver = Some(result_rx);

        thread::spawn(move || {
            let result = run_pipeline(&request, None, &loader);
            if result_tx.send(result).is_err() {
                error!("Dashboard closed before {} finished loading", request);
            }
            repaint_ctx.request_repaint();
        });
    }

    fn poll_result(&mut self) {
        let Some(receiver) = &self.result_receiver else {
            return;
        };
        match receiver.try_recv() {
            Ok(result) => {
                self.ui_state = UiState::Done(result);
                self.result_receiver = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                let request = self.request.clone();
                self.ui_state = UiState::Done(RenderResult::Failed {
                    message: format!("Loading {} stopped unexpectedly", request),
                    request,
                });
                self.result_receiver = None;
            }
        }
    }

    fn show_inputs(&mut self, ui: &mut Ui) {
        ui.heading(RichText::new("Session").color(Color32::WHITE));
        ui.add_space(5.0);

        ui.add(Slider::new(&mut self.request.year, MIN_YEAR..=MAX_YEAR).text("Year"));

        ui.label("Race");
        ui.add(DropDownBox::from_iter(
            KNOWN_RACES,
            "race_dropbox",
            &mut self.request.race,
            |ui, text| ui.selectable_label(false, text),
        ));

        ComboBox::from_label("Session type")
            .selected_text(self.request.kind.label())
            .show_ui(ui, |ui| {
                for kind in SessionKind::ALL {
                    ui.selectable_value(&mut self.request.kind, kind, kind.label());
                }
            });

        ui.add_space(10.0);
        let loading = self.is_loading();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!loading, egui::Button::new("Load session"))
                .clicked()
            {
                self.start_load(ui.ctx());
            }
            if ui
                .add_enabled(!loading, egui::Button::new("Reload"))
                .on_hover_text(
                    "Drop this session from the in-memory cache and load again. Provider responses saved in the cache directory are reused.",
                )
                .clicked()
            {
                self.loader.invalidate(&self.request);
                self.start_load(ui.ctx());
            }
        });
        if ui
            .add_enabled(!loading, egui::Button::new("Clear cache"))
            .clicked()
        {
            info!("Clearing session cache");
            self.loader.clear_cache();
        }

        if let UiState::Done(RenderResult::Loaded(session)) = &mut self.ui_state {
            ui.separator();
            show_driver_selector(ui, session);
        }
    }

    fn show_results(&self, ui: &mut Ui) {
        match &self.ui_state {
            UiState::Idle => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label("Pick a year, race and session type, then press Load session.");
                });
            }
            UiState::Loading { request } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.spinner();
                    ui.label(format!("Loading {}...", request));
                });
            }
            UiState::Done(RenderResult::Failed { message, .. }) => {
                ui.colored_label(Color32::RED, message.as_str());
            }
            UiState::Done(RenderResult::Empty { request }) => {
                ui.colored_label(
                    Color32::YELLOW,
                    format!("{} loaded, but it has no lap data.", request),
                );
            }
            UiState::Done(RenderResult::Loaded(session)) => {
                show_session(ui, session);
            }
        }
    }
}

fn show_driver_selector(ui: &mut Ui, session: &mut LoadedSession) {
    ui.label(RichText::new("Drivers").color(Color32::WHITE));
    let mut selection = session.selection.clone();
    ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
        for driver in &session.drivers {
            let mut checked = selection.contains(driver);
            if ui.checkbox(&mut checked, driver.as_str()).changed() {
                selection.set(driver, checked);
            }
        }
    });
    ui.horizontal(|ui| {
        if ui.small_button("All").clicked() {
            selection = session.drivers.iter().cloned().collect();
        }
        if ui.small_button("None").clicked() {
            selection = DriverSelection::empty();
        }
    });
    if selection != session.selection {
        session.select(selection);
    }
}

fn show_session(ui: &mut Ui, session: &LoadedSession) {
    ui.label(
        RichText::new(format!(
            "{}: {} laps, {} drivers",
            session.request,
            session.laps.len(),
            session.drivers.len()
        ))
        .color(Color32::WHITE),
    );

    match &session.view {
        ChartView::NoSelection => {
            ui.colored_label(
                Color32::YELLOW,
                "No drivers selected. Pick at least one driver to draw the chart.",
            );
        }
        ChartView::Chart(chart) => {
            show_lap_chart(ui, chart);
            egui::Grid::new("driver_summary")
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("Driver");
                    ui.strong("Laps");
                    ui.strong("Best lap");
                    ui.strong("Mean lap");
                    ui.end_row();
                    for summary in &session.summaries {
                        ui.label(summary.driver.as_str());
                        ui.label(summary.laps.to_string());
                        ui.label(format!(
                            "{} (lap {})",
                            format_lap_time(summary.best_lap_seconds),
                            summary.best_lap_number
                        ));
                        ui.label(format_lap_time(summary.mean_lap_seconds));
                        ui.end_row();
                    }
                });
        }
    }

    ui.separator();
    egui::CollapsingHeader::new("Raw lap data")
        .default_open(false)
        .show(ui, |ui| {
            show_lap_table(ui, &session.laps);
        });
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_config.last_request = self.request.clone();
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_result();

        egui::SidePanel::left("SessionInputs")
            .resizable(false)
            .min_width(220.0)
            .show(ctx, |ui| {
                self.show_inputs(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                self.show_results(ui);
            });
        });
    }
}
