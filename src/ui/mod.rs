use egui::{Color32, Visuals, style::Widgets};

pub(crate) mod chart_view;
pub(crate) mod dashboard;
pub(crate) mod lap_table;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

const DRIVER_COLORS: [Color32; 10] = [
    PALETTE_ORANGE,
    Color32::from_rgb(54, 113, 198),
    Color32::from_rgb(39, 244, 210),
    Color32::from_rgb(255, 215, 0),
    Color32::from_rgb(34, 153, 113),
    Color32::from_rgb(232, 0, 32),
    Color32::from_rgb(182, 186, 189),
    Color32::from_rgb(255, 135, 0),
    Color32::from_rgb(100, 196, 255),
    Color32::from_rgb(200, 120, 220),
];

/// Line color for the `index`th series, cycling once the palette runs out
pub(crate) fn driver_color(index: usize) -> Color32 {
    DRIVER_COLORS[index % DRIVER_COLORS.len()]
}

pub(crate) fn dashboard_visuals() -> Visuals {
    Visuals {
        dark_mode: true,
        hyperlink_color: PALETTE_MAROON,
        faint_bg_color: PALETTE_BLACK,
        extreme_bg_color: PALETTE_BROWN,
        panel_fill: PALETTE_BLACK,
        button_frame: true,
        widgets: Widgets::dark(),
        striped: true,
        ..Default::default()
    }
}
