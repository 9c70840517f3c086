mod ui;

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use egui::Vec2;
use log::{LevelFilter, error, info, warn};

use lapchart::{
    ChartView, DriverSelection, LapchartError, RenderResult, SessionKind, SessionLoader,
    SessionRequest,
    config::{AppConfig, ensure_cache_dir},
    laps::format_lap_time,
    run_pipeline,
    session::{DEFAULT_RACE, DEFAULT_YEAR, MemoryLapCache, OpenF1Provider},
    writer::write_points,
};
use ui::dashboard::DashboardApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Directory for the provider's response cache
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the lap-time dashboard
    Dashboard {
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        race: Option<String>,

        #[arg(short, long)]
        session: Option<SessionKind>,
    },
    /// Load a session and write the selected lap times as JSON lines
    Laps {
        #[arg(short, long, default_value_t = DEFAULT_YEAR)]
        year: i32,

        #[arg(short, long, default_value = DEFAULT_RACE)]
        race: String,

        #[arg(short, long, default_value = "Race")]
        session: SessionKind,

        /// Comma separated driver abbreviations, defaults to the first five drivers
        #[arg(short, long, value_delimiter = ',')]
        drivers: Vec<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn build_loader(config: &AppConfig) -> Result<SessionLoader, LapchartError> {
    let cache_dir = ensure_cache_dir(&config.cache_dir)?;
    let provider = OpenF1Provider::new(
        &config.provider_url,
        config.request_timeout(),
        Some(&cache_dir),
    )?;
    Ok(SessionLoader::new(provider, Arc::new(MemoryLapCache::new())))
}

fn dashboard(mut config: AppConfig, overrides: SessionOverrides) -> Result<(), LapchartError> {
    let request = &mut config.last_request;
    if let Some(year) = overrides.year {
        request.year = year;
    }
    if let Some(race) = overrides.race {
        request.race = race;
    }
    if let Some(kind) = overrides.kind {
        request.kind = kind;
    }

    let loader = Arc::new(build_loader(&config)?);

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(1200., 800.))
        .with_title("Lapchart");

    if let Err(e) = eframe::run_native(
        "Lapchart",
        native_options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(loader, config, cc)))),
    ) {
        error!("Could not start dashboard: {}", e);
    }
    Ok(())
}

struct SessionOverrides {
    year: Option<i32>,
    race: Option<String>,
    kind: Option<SessionKind>,
}

fn laps(
    config: &AppConfig,
    request: SessionRequest,
    drivers: Vec<String>,
    output: Option<PathBuf>,
) -> Result<(), LapchartError> {
    request.validate()?;
    let loader = build_loader(config)?;
    let selection =
        (!drivers.is_empty()).then(|| drivers.into_iter().collect::<DriverSelection>());

    match run_pipeline(&request, selection, &loader) {
        RenderResult::Failed { message, .. } => {
            return Err(LapchartError::SessionLoadFailed { message });
        }
        RenderResult::Empty { request } => {
            warn!("{} loaded, but it has no lap data", request);
        }
        RenderResult::Loaded(session) => match &session.view {
            ChartView::NoSelection => {
                warn!(
                    "None of the selected drivers took part in {}. Available: {}",
                    session.request,
                    session.drivers.join(", ")
                );
            }
            ChartView::Chart(_) => {
                for summary in &session.summaries {
                    info!(
                        "{}: {} laps, best {} (lap {}), mean {}",
                        summary.driver,
                        summary.laps,
                        format_lap_time(summary.best_lap_seconds),
                        summary.best_lap_number,
                        format_lap_time(summary.mean_lap_seconds)
                    );
                }
                write_points(output.as_deref(), &session.selected_points)?;
            }
        },
    }
    Ok(())
}

fn main() {
    let mut log_builder = colog::default_builder();
    #[cfg(debug_assertions)]
    log_builder.filter_level(LevelFilter::Debug);
    #[cfg(not(debug_assertions))]
    log_builder.filter_level(LevelFilter::Info);
    log_builder.init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let mut config = AppConfig::from_local_file().unwrap_or_default();
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }

    let result = match cli.command {
        Commands::Dashboard {
            year,
            race,
            session,
        } => dashboard(
            config,
            SessionOverrides {
                year,
                race,
                kind: session,
            },
        ),
        Commands::Laps {
            year,
            race,
            session,
            drivers,
            output,
        } => laps(
            &config,
            SessionRequest::new(year, race, session),
            drivers,
            output,
        ),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
