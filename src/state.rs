use crate::color::FlowPalette;
use crate::data::filter::TimeFilter;
use crate::data::model::{LaneLayer, Station, StationTraffic, Trip};
use crate::data::traffic::{aggregate, max_total_traffic};
use crate::scale::{QuantizeScale, SqrtScale, MAX_STATION_RADIUS};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `stations`, `trips` and `lanes` are the loaded base data; `traffic` and
/// `radius_scale` are derived from them and rebuilt as one unit by
/// [`AppState::recompute`]. Nothing outside `recompute` writes the derived
/// fields, so they can never disagree with the active filter.
pub struct AppState {
    /// Station catalog (loaded once, never mutated by aggregation).
    pub stations: Vec<Station>,

    /// Trip table.
    pub trips: Vec<Trip>,

    /// Bike-lane overlays, in load order.
    pub lanes: Vec<LaneLayer>,

    /// Active time-of-day filter.
    pub filter: TimeFilter,

    /// Per-station aggregates for the active filter (derived).
    pub traffic: Vec<StationTraffic>,

    /// Traffic → circle radius, domain set to the current maximum (derived).
    pub radius_scale: SqrtScale,

    /// Departure ratio → bucket.
    pub flow_scale: QuantizeScale,

    /// Bucket → fill color.
    pub palette: FlowPalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            stations: Vec::new(),
            trips: Vec::new(),
            lanes: Vec::new(),
            filter: TimeFilter::AnyTime,
            traffic: Vec::new(),
            radius_scale: SqrtScale::new(0.0, MAX_STATION_RADIUS),
            flow_scale: QuantizeScale::thirds(),
            palette: FlowPalette::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded station catalog and re-derive everything.
    pub fn set_stations(&mut self, stations: Vec<Station>) {
        log::info!("Loaded {} stations", stations.len());
        self.stations = stations;
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Ingest a newly loaded trip table and re-derive everything.
    pub fn set_trips(&mut self, trips: Vec<Trip>) {
        log::info!("Loaded {} trips", trips.len());
        self.trips = trips;
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Add a lane overlay, replacing any earlier layer with the same label
    /// so re-fetching a source doesn't stack duplicates.
    pub fn add_lane_layer(&mut self, layer: LaneLayer) {
        log::info!(
            "Loaded lane layer '{}' ({} polylines, {} vertices)",
            layer.label,
            layer.polylines.len(),
            layer.vertex_count()
        );
        self.lanes.retain(|l| l.label != layer.label);
        self.lanes.push(layer);
        self.status_message = None;
        self.loading = false;
    }

    /// Apply a filter transition. Recomputes only on an actual change; the
    /// slider reports its value every frame, not just on edits.
    pub fn set_filter(&mut self, filter: TimeFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.recompute();
        }
    }

    /// Rebuild the derived station aggregates and the radius scale.
    pub fn recompute(&mut self) {
        self.traffic = aggregate(&self.stations, &self.trips, self.filter);
        let max_total = max_total_traffic(&self.traffic);
        self.radius_scale = SqrtScale::new(f64::from(max_total), MAX_STATION_RADIUS);
    }

    /// Record a failed load: the message lands in the UI, the app keeps
    /// running on whatever data it already has.
    pub fn report_error(&mut self, what: &str, err: &anyhow::Error) {
        log::error!("Failed to load {what}: {err:#}");
        self.status_message = Some(format!("Error loading {what}: {err:#}"));
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn populated_state() -> AppState {
        let mut state = AppState::default();
        state.set_stations(vec![Station {
            short_name: "A".into(),
            name: None,
            lon: -71.09,
            lat: 42.36,
        }]);
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        state.set_trips(vec![Trip {
            start_station_id: "A".into(),
            end_station_id: "A".into(),
            started_at: day.and_hms_opt(8, 0, 0).unwrap(),
            ended_at: day.and_hms_opt(8, 5, 0).unwrap(),
        }]);
        state
    }

    #[test]
    fn derived_fields_follow_the_filter() {
        let mut state = populated_state();
        assert_eq!(state.traffic[0].total_traffic, 2);
        assert_eq!(state.radius_scale.apply(2.0), MAX_STATION_RADIUS);

        // 10:00 is 120 minutes from both endpoints: everything drops to zero
        state.set_filter(TimeFilter::Minute(600));
        assert_eq!(state.traffic[0].total_traffic, 0);
        assert_eq!(state.radius_scale.apply(2.0), 0.0);

        // back through the sentinel restores the unfiltered view
        state.set_filter(TimeFilter::from_slider(-1));
        assert_eq!(state.filter, TimeFilter::AnyTime);
        assert_eq!(state.traffic[0].total_traffic, 2);
    }

    #[test]
    fn aggregation_never_mutates_the_catalog() {
        let mut state = populated_state();
        let lon_before = state.stations[0].lon;
        state.set_filter(TimeFilter::Minute(480));
        state.set_filter(TimeFilter::AnyTime);
        assert_eq!(state.stations.len(), 1);
        assert_eq!(state.stations[0].lon, lon_before);
    }

    #[test]
    fn same_label_lane_layer_replaces() {
        let mut state = AppState::default();
        let layer = |n: usize| LaneLayer {
            label: "Boston bike lanes".into(),
            color: [255, 0, 0],
            polylines: vec![vec![[0.0, 0.0], [1.0, 1.0]]; n],
            visible: true,
        };
        state.add_lane_layer(layer(1));
        state.add_lane_layer(layer(3));
        assert_eq!(state.lanes.len(), 1);
        assert_eq!(state.lanes[0].polylines.len(), 3);
    }
}
