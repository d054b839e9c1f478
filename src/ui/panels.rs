use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::data::filter::{TimeFilter, ANY_TIME_SENTINEL};
use crate::data::loader;
use crate::state::AppState;

/// Colors handed to locally opened lane files, cycled in load order. Remote
/// sources carry their own fixed colors.
const LOCAL_LANE_COLORS: [[u8; 3]; 4] = [[255, 0, 0], [0, 0, 255], [0, 150, 90], [170, 0, 170]];

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open station catalog…").clicked() {
                open_stations_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open trip table…").clicked() {
                open_trips_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open bike lanes…").clicked() {
                open_lanes_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Fetch remote datasets").clicked() {
                fetch_remote_datasets(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} stations · {} trips · {} lane layers",
            state.stations.len(),
            state.trips.len(),
            state.lanes.len()
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Side panel – legend and layers
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Legend");
    ui.separator();

    for (label, color) in state.palette.legend_entries() {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("⬤").color(color));
            ui.label(label);
        });
    }
    ui.label(RichText::new("Circle area scales with trips in the window.").weak());

    ui.add_space(8.0);
    ui.heading("Layers");
    ui.separator();

    if state.lanes.is_empty() {
        ui.label("No lane overlays loaded.");
    }
    for layer in &mut state.lanes {
        let [r, g, b] = layer.color;
        let text = RichText::new(&layer.label).color(Color32::from_rgb(r, g, b));
        ui.checkbox(&mut layer.visible, text);
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – time-of-day slider
// ---------------------------------------------------------------------------

/// The slider runs `-1..=1439`: the leftmost stop is the "any time"
/// sentinel, everything else selects a minute of day. Any change feeds
/// straight into [`AppState::set_filter`], which recomputes the aggregates.
pub fn time_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Time of day");

        let mut value = state.filter.slider_value();
        ui.add(
            Slider::new(&mut value, ANY_TIME_SENTINEL..=1439)
                .show_value(false)
                .trailing_fill(true),
        );
        state.set_filter(TimeFilter::from_slider(value));

        if state.filter.is_any_time() {
            ui.label(RichText::new("(any time)").weak().italics());
        } else {
            ui.label(RichText::new(state.filter.label()).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// Loading: file dialogs and remote fetch
// ---------------------------------------------------------------------------

fn open_stations_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open station catalog")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match loader::load_stations(&path) {
            Ok(stations) => state.set_stations(stations),
            Err(e) => state.report_error("station catalog", &e),
        }
    }
}

fn open_trips_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open trip table")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match loader::load_trips(&path) {
            Ok(trips) => state.set_trips(trips),
            Err(e) => state.report_error("trip table", &e),
        }
    }
}

fn open_lanes_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bike-lane GeoJSON")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("bike lanes")
            .to_string();
        let color = LOCAL_LANE_COLORS[state.lanes.len() % LOCAL_LANE_COLORS.len()];

        state.loading = true;
        match loader::load_lanes(&path, &label, color) {
            Ok(layer) => state.add_lane_layer(layer),
            Err(e) => state.report_error(&label, &e),
        }
    }
}

/// Fetch every built-in remote dataset. Each source is loaded independently;
/// one failing feed leaves the others usable.
pub fn fetch_remote_datasets(state: &mut AppState) {
    state.loading = true;

    match loader::fetch_stations(loader::STATION_CATALOG_URL) {
        Ok(stations) => state.set_stations(stations),
        Err(e) => state.report_error("station catalog", &e),
    }
    match loader::fetch_trips(loader::TRIP_TABLE_URL) {
        Ok(trips) => state.set_trips(trips),
        Err(e) => state.report_error("trip table", &e),
    }
    for (label, url, color) in loader::LANE_SOURCES {
        match loader::fetch_lanes(url, label, color) {
            Ok(layer) => state.add_lane_layer(layer),
            Err(e) => state.report_error(label, &e),
        }
    }
}
