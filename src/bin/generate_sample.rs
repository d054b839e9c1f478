use chrono::NaiveDate;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_usize(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const CENTER: [f64; 2] = [-71.09415, 42.36027];
const GRID: usize = 5;
const GRID_STEP_DEG: f64 = 0.008;
const TRIPS: usize = 3000;
/// Stations 0..HUBS act as the downtown cluster commutes flow into.
const HUBS: usize = 6;

fn main() {
    let mut rng = SimpleRng::new(42);

    // ---- Stations: jittered grid around the map center ----
    let mut stations = Vec::new();
    for row in 0..GRID {
        for col in 0..GRID {
            let idx = row * GRID + col;
            let lon = CENTER[0] + (col as f64 - (GRID - 1) as f64 / 2.0) * GRID_STEP_DEG
                + rng.gauss(0.0, 0.001);
            let lat = CENTER[1] + (row as f64 - (GRID - 1) as f64 / 2.0) * GRID_STEP_DEG
                + rng.gauss(0.0, 0.001);
            stations.push((format!("S{idx:03}"), format!("Dock {}-{}", row + 1, col + 1), lon, lat));
        }
    }

    let catalog = json!({
        "data": {
            "stations": stations.iter().map(|(code, name, lon, lat)| json!({
                "short_name": code,
                "name": name,
                "lon": lon,
                "lat": lat,
            })).collect::<Vec<_>>()
        }
    });
    std::fs::write(
        "sample_stations.json",
        serde_json::to_string_pretty(&catalog).expect("serializing catalog"),
    )
    .expect("writing sample_stations.json");

    // ---- Trips: two commute peaks over one week ----
    let mut writer = csv::Writer::from_path("sample_trips.csv").expect("creating sample_trips.csv");
    writer
        .write_record(["ride_id", "started_at", "ended_at", "start_station_id", "end_station_id"])
        .expect("writing header");

    for ride in 0..TRIPS {
        let morning = rng.next_f64() < 0.5;
        let peak = if morning { 510.0 } else { 1050.0 };
        let start_minute = rng.gauss(peak, 45.0).clamp(0.0, 1430.0) as u32;
        let duration = rng.gauss(14.0, 6.0).clamp(2.0, 120.0) as u32;

        // commute shape: mornings drain into the hub cluster, evenings out of it
        let (start_idx, end_idx) = if morning && rng.next_f64() < 0.6 {
            (rng.next_usize(stations.len()), rng.next_usize(HUBS))
        } else if !morning && rng.next_f64() < 0.6 {
            (rng.next_usize(HUBS), rng.next_usize(stations.len()))
        } else {
            (rng.next_usize(stations.len()), rng.next_usize(stations.len()))
        };

        let day = NaiveDate::from_ymd_opt(2024, 3, 1 + (ride % 7) as u32).expect("valid date");
        let started_at = day
            .and_hms_opt(start_minute / 60, start_minute % 60, 0)
            .expect("valid start time");
        let ended_at = started_at + chrono::Duration::minutes(i64::from(duration));

        writer
            .write_record([
                format!("R{ride:05}"),
                started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ended_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                stations[start_idx].0.clone(),
                stations[end_idx].0.clone(),
            ])
            .expect("writing trip row");
    }
    writer.flush().expect("flushing sample_trips.csv");

    // ---- Lanes: one polyline along each grid row ----
    let features: Vec<_> = (0..GRID)
        .map(|row| {
            let coordinates: Vec<_> = (0..GRID)
                .map(|col| {
                    let (_, _, lon, lat) = &stations[row * GRID + col];
                    json!([lon, lat])
                })
                .collect();
            json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates }
            })
        })
        .collect();
    let lanes = json!({ "type": "FeatureCollection", "features": features });
    std::fs::write(
        "sample_lanes.geojson",
        serde_json::to_string_pretty(&lanes).expect("serializing lanes"),
    )
    .expect("writing sample_lanes.geojson");

    println!(
        "Wrote {} stations, {TRIPS} trips, {GRID} lane polylines",
        stations.len()
    );
}
