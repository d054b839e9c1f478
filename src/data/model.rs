use chrono::{NaiveDateTime, Timelike};

// ---------------------------------------------------------------------------
// Station – one dock from the station catalog
// ---------------------------------------------------------------------------

/// A fixed-location bike-share dock.
///
/// `short_name` is the join key against trip records. It is an opaque string
/// (codes like `"A32000"` or `"M32-1"`), never parsed as a number.
#[derive(Debug, Clone)]
pub struct Station {
    pub short_name: String,
    /// Human-readable dock name, used for hover text.
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

// ---------------------------------------------------------------------------
// Trip – one rental event
// ---------------------------------------------------------------------------

/// A single trip, immutable once loaded. Instants are parsed from the raw
/// trip table exactly once; everything downstream works in minutes-of-day.
#[derive(Debug, Clone)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

/// Minutes since midnight (0–1439) of an instant. The calendar day is
/// deliberately ignored: the time slider aggregates across all days.
pub fn minute_of_day(t: NaiveDateTime) -> u16 {
    (t.time().num_seconds_from_midnight() / 60) as u16
}

impl Trip {
    pub fn start_minute(&self) -> u16 {
        minute_of_day(self.started_at)
    }

    pub fn end_minute(&self) -> u16 {
        minute_of_day(self.ended_at)
    }
}

// ---------------------------------------------------------------------------
// StationTraffic – per-station aggregate for the active filter
// ---------------------------------------------------------------------------

/// Aggregated counts for one station under the active time filter.
///
/// Holds its own copy of the station record: the base catalog is never
/// mutated, a fresh `Vec<StationTraffic>` is produced on every recompute.
#[derive(Debug, Clone)]
pub struct StationTraffic {
    pub station: Station,
    pub arrivals: u32,
    pub departures: u32,
    /// Always `arrivals + departures`; the three fields are only ever
    /// written together.
    pub total_traffic: u32,
}

impl StationTraffic {
    /// Share of traffic that departs from this station, in `[0, 1]`.
    /// A station with no traffic at all reports 0.0 rather than NaN.
    pub fn flow_ratio(&self) -> f64 {
        if self.total_traffic == 0 {
            0.0
        } else {
            f64::from(self.departures) / f64::from(self.total_traffic)
        }
    }
}

// ---------------------------------------------------------------------------
// LaneLayer – one bike-lane overlay
// ---------------------------------------------------------------------------

/// A static polyline overlay (e.g. one municipality's bike network).
#[derive(Debug, Clone)]
pub struct LaneLayer {
    pub label: String,
    /// Line color as sRGB; width and opacity are shared paint constants.
    pub color: [u8; 3],
    /// Each polyline is a list of `[lon, lat]` vertices.
    pub polylines: Vec<Vec<[f64; 2]>>,
    /// Toggled from the side panel.
    pub visible: bool,
}

impl LaneLayer {
    /// Total vertex count across all polylines, for the status line.
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }
}
