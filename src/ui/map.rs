use eframe::egui::{Color32, Pos2, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotTransform, Points};

use crate::projection::{Projection, WebMercator};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Traffic map (central panel)
// ---------------------------------------------------------------------------

/// Initial view center (Boston / Cambridge line), kept in view until the
/// loaded data defines its own extent.
pub const MAP_CENTER: [f64; 2] = [-71.09415, 42.36027];

/// Lane paint: shared by every overlay, only the hue differs per layer.
const LANE_WIDTH: f32 = 3.0;
const LANE_OPACITY: u8 = 102; // 0.4

/// Hit radius for hover text on stations the scale has shrunk to (near) zero.
const MIN_HOVER_RADIUS: f32 = 4.0;

fn lane_stroke([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, LANE_OPACITY)
}

/// Render the interactive map: lane polylines underneath, one circle per
/// station on top, sized by total traffic and colored by departure share.
///
/// Geographic coordinates go through the [`Projection`] capability on every
/// frame, so pan and zoom (the plot's own viewport handling) never leave a
/// circle behind.
pub fn traffic_map(ui: &mut Ui, state: &AppState) {
    if state.stations.is_empty() && state.lanes.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load datasets to see the map  (File → Fetch remote datasets)");
        });
        return;
    }

    let projection = WebMercator;
    let [center_x, center_y] = projection.project(MAP_CENTER[0], MAP_CENTER[1]);

    let response = Plot::new("traffic_map")
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .include_x(center_x)
        .include_y(center_y)
        .label_formatter(|_, _| String::new())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // ---- Lane overlays ----
            for layer in state.lanes.iter().filter(|l| l.visible) {
                let stroke = lane_stroke(layer.color);
                for polyline in &layer.polylines {
                    let points: Vec<[f64; 2]> = polyline
                        .iter()
                        .map(|&[lon, lat]| projection.project(lon, lat))
                        .collect();
                    plot_ui.line(Line::new(points).color(stroke).width(LANE_WIDTH));
                }
            }

            // ---- Station circles ----
            for st in &state.traffic {
                let radius = state.radius_scale.apply(f64::from(st.total_traffic));
                if radius <= 0.0 {
                    continue;
                }
                let bucket = state.flow_scale.apply(st.flow_ratio());
                let color = state.palette.color_for(bucket);
                let pos = projection.project(st.station.lon, st.station.lat);

                plot_ui.points(
                    Points::new(vec![pos])
                        .shape(MarkerShape::Circle)
                        .radius(radius as f32)
                        .filled(true)
                        .color(color.gamma_multiply(0.75)),
                );
            }

            let transform = *plot_ui.transform();
            plot_ui.pointer_coordinate().and_then(|pointer| {
                let cursor = transform.position_from_point(&pointer);
                hovered_station_text(state, &projection, &transform, cursor)
            })
        });

    if let Some(text) = response.inner {
        response.response.on_hover_text(text);
    }
}

/// Hover text for the station under the pointer, if any. Hit-testing happens
/// in screen space because circle radii are in screen points, not map units.
fn hovered_station_text(
    state: &AppState,
    projection: &dyn Projection,
    transform: &PlotTransform,
    cursor: Pos2,
) -> Option<String> {
    state
        .traffic
        .iter()
        .filter_map(|st| {
            let [x, y] = projection.project(st.station.lon, st.station.lat);
            let center = transform.position_from_point(&PlotPoint::new(x, y));
            let radius = state.radius_scale.apply(f64::from(st.total_traffic)) as f32;
            let distance = center.distance(cursor);
            (distance <= radius.max(MIN_HOVER_RADIUS)).then_some((distance, st))
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, st)| {
            let title = match &st.station.name {
                Some(name) => format!("{name} ({})", st.station.short_name),
                None => st.station.short_name.clone(),
            };
            format!(
                "{title}\n{} trips ({} departures, {} arrivals)",
                st.total_traffic, st.departures, st.arrivals
            )
        })
}
