use std::time::Duration;

use egui::Ui;
use egui_extras::{Column, TableBuilder};

use lapchart::{LapRecord, laps::format_lap_time};

const ROW_HEIGHT: f32 = 18.0;
const HEADERS: [&str; 7] = ["Driver", "Lap", "Lap time", "S1", "S2", "S3", "Pit out"];

fn format_duration(duration: Option<Duration>) -> String {
    duration
        .map(|d| format_lap_time(d.as_secs_f64()))
        .unwrap_or_else(|| "-".to_string())
}

/// Raw lap records exactly as the provider returned them, missing values shown as `-`
pub(crate) fn show_lap_table(ui: &mut Ui, laps: &[LapRecord]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(50.0), HEADERS.len() - 2)
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, laps.len(), |mut row| {
                let lap = &laps[row.index()];
                row.col(|ui| {
                    ui.label(lap.driver.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(
                        lap.lap_number
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    );
                });
                row.col(|ui| {
                    ui.label(format_duration(lap.lap_time));
                });
                for sector in lap.sector_times {
                    row.col(|ui| {
                        ui.label(format_duration(sector));
                    });
                }
                row.col(|ui| {
                    ui.label(match lap.is_pit_out_lap {
                        Some(true) => "yes",
                        Some(false) => "no",
                        None => "-",
                    });
                });
            });
        });
}
