use egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use lapchart::LapChart;

use super::driver_color;

const POINT_RADIUS: f32 = 2.5;

pub(crate) fn show_lap_chart(ui: &mut Ui, chart: &LapChart) {
    Plot::new("lap_times")
        .legend(Legend::default())
        .show_background(false)
        .x_axis_label("Lap")
        .y_axis_label("Lap time (s)")
        .height(ui.available_height() * 0.6)
        .show(ui, |plot_ui| {
            for (idx, series) in chart.series.iter().enumerate() {
                let color = driver_color(idx);
                // every segment shares the driver's name so the legend groups them
                for segment in series.segments() {
                    plot_ui.line(
                        Line::new(series.driver.as_str(), PlotPoints::new(segment.to_vec()))
                            .color(color),
                    );
                    plot_ui.points(
                        Points::new(series.driver.as_str(), PlotPoints::new(segment.to_vec()))
                            .color(color)
                            .radius(POINT_RADIUS),
                    );
                }
            }
        });
}
