use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use super::model::{LaneLayer, Station, Trip};

// ---------------------------------------------------------------------------
// Built-in remote datasets (Boston-area deployment)
// ---------------------------------------------------------------------------

/// GBFS station information: `{ "data": { "stations": [...] } }`.
pub const STATION_CATALOG_URL: &str =
    "https://gbfs.bluebikes.com/gbfs/en/station_information.json";

/// Prepared one-month trip table (CSV).
pub const TRIP_TABLE_URL: &str =
    "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";

/// Bike-lane overlays: `(label, url, line color)`.
pub const LANE_SOURCES: [(&str, &str, [u8; 3]); 2] = [
    (
        "Boston bike lanes",
        "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson",
        [255, 0, 0],
    ),
    (
        "Cambridge bike lanes",
        "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson",
        [0, 0, 255],
    ),
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unrecognized timestamp '{0}'")]
    BadTimestamp(String),
    #[error("station catalog holds no usable stations")]
    EmptyCatalog,
}

/// Fetch a remote dataset as text. Blocking: datasets are a few MB at most
/// and the app loads them once per session.
pub fn fetch_text(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;
    response.text().context("reading response body")
}

// ---------------------------------------------------------------------------
// Station catalog (nested JSON)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StationCatalog {
    data: CatalogData,
}

#[derive(Deserialize)]
struct CatalogData {
    stations: Vec<RawStation>,
}

#[derive(Deserialize)]
struct RawStation {
    short_name: Option<String>,
    name: Option<String>,
    lon: f64,
    lat: f64,
}

/// Parse a station catalog.
///
/// Live feeds occasionally carry stations without a short code; those can
/// never join against the trip table, so they are skipped (with a log line)
/// rather than failing the whole load.
pub fn parse_stations(text: &str) -> Result<Vec<Station>> {
    let catalog: StationCatalog =
        serde_json::from_str(text).context("parsing station catalog JSON")?;

    let raw_count = catalog.data.stations.len();
    let stations: Vec<Station> = catalog
        .data
        .stations
        .into_iter()
        .filter_map(|raw| {
            Some(Station {
                short_name: raw.short_name?,
                name: raw.name,
                lon: raw.lon,
                lat: raw.lat,
            })
        })
        .collect();

    if stations.len() < raw_count {
        log::warn!(
            "Skipped {} station(s) without a short code",
            raw_count - stations.len()
        );
    }
    if stations.is_empty() {
        return Err(DatasetError::EmptyCatalog.into());
    }
    Ok(stations)
}

pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let text = std::fs::read_to_string(path).context("reading station catalog")?;
    parse_stations(&text)
}

pub fn fetch_stations(url: &str) -> Result<Vec<Station>> {
    parse_stations(&fetch_text(url)?)
}

// ---------------------------------------------------------------------------
// Trip table (CSV)
// ---------------------------------------------------------------------------

/// One CSV row as shipped in the trip table. Extra columns (ride id, member
/// type, ...) are ignored by the deserializer.
#[derive(Deserialize)]
struct RawTrip {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

/// Parse a trip timestamp. The published tables use `2024-03-01 08:02:13`;
/// some exports use an ISO-8601 `T` separator, optionally with fractional
/// seconds. Anything else is rejected so no invalid instant enters the model.
fn parse_instant(text: &str) -> Result<NaiveDateTime, DatasetError> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
        .ok_or_else(|| DatasetError::BadTimestamp(text.to_string()))
}

/// Read trips from CSV with a header row. Each record needs the four columns
/// `start_station_id`, `end_station_id`, `started_at`, `ended_at`.
pub fn read_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut trips = Vec::new();

    for (row_no, result) in csv_reader.deserialize::<RawTrip>().enumerate() {
        let raw = result.with_context(|| format!("trip table row {row_no}"))?;
        let started_at = parse_instant(&raw.started_at)
            .with_context(|| format!("trip table row {row_no}: started_at"))?;
        let ended_at = parse_instant(&raw.ended_at)
            .with_context(|| format!("trip table row {row_no}: ended_at"))?;

        trips.push(Trip {
            start_station_id: raw.start_station_id,
            end_station_id: raw.end_station_id,
            started_at,
            ended_at,
        });
    }
    Ok(trips)
}

pub fn load_trips(path: &Path) -> Result<Vec<Trip>> {
    let file = std::fs::File::open(path).context("opening trip table")?;
    read_trips(file)
}

pub fn fetch_trips(url: &str) -> Result<Vec<Trip>> {
    read_trips(fetch_text(url)?.as_bytes())
}

// ---------------------------------------------------------------------------
// Bike-lane overlays (GeoJSON)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

/// Only line geometries are drawn; points, polygons and anything newer fall
/// into `Other` and are skipped.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString {
        coordinates: Vec<Vec<f64>>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    #[serde(other)]
    Other,
}

/// Positions may carry an altitude as a third element; only lon/lat are kept.
fn to_polyline(coordinates: Vec<Vec<f64>>) -> Vec<[f64; 2]> {
    coordinates
        .into_iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| [pos[0], pos[1]])
        .collect()
}

pub fn parse_lanes(text: &str, label: &str, color: [u8; 3]) -> Result<LaneLayer> {
    let collection: FeatureCollection =
        serde_json::from_str(text).with_context(|| format!("parsing {label} GeoJSON"))?;

    let mut polylines = Vec::new();
    for feature in collection.features {
        match feature.geometry {
            Some(Geometry::LineString { coordinates }) => {
                polylines.push(to_polyline(coordinates));
            }
            Some(Geometry::MultiLineString { coordinates }) => {
                polylines.extend(coordinates.into_iter().map(to_polyline));
            }
            Some(Geometry::Other) | None => {}
        }
    }
    polylines.retain(|line| line.len() >= 2);

    Ok(LaneLayer {
        label: label.to_string(),
        color,
        polylines,
        visible: true,
    })
}

pub fn load_lanes(path: &Path, label: &str, color: [u8; 3]) -> Result<LaneLayer> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {label}"))?;
    parse_lanes(&text, label, color)
}

pub fn fetch_lanes(url: &str, label: &str, color: [u8; 3]) -> Result<LaneLayer> {
    parse_lanes(&fetch_text(url)?, label, color)
}
