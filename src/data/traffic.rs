use std::collections::HashMap;

use super::filter::TimeFilter;
use super::model::{Station, StationTraffic, Trip};

// ---------------------------------------------------------------------------
// Traffic aggregation
// ---------------------------------------------------------------------------

/// Aggregate trips into per-station arrival/departure counts under a filter.
///
/// Pure function of its inputs: every call produces fresh [`StationTraffic`]
/// copies of the catalog entries, so the base station list is never aliased
/// by derived counts. Trips that reference an id missing from the catalog
/// contribute nothing (a join miss is zero traffic, not an error).
pub fn aggregate(stations: &[Station], trips: &[Trip], filter: TimeFilter) -> Vec<StationTraffic> {
    let mut departures: HashMap<&str, u32> = HashMap::new();
    let mut arrivals: HashMap<&str, u32> = HashMap::new();

    for trip in trips.iter().filter(|t| filter.matches(t)) {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    stations
        .iter()
        .map(|station| {
            let dep = departures
                .get(station.short_name.as_str())
                .copied()
                .unwrap_or(0);
            let arr = arrivals
                .get(station.short_name.as_str())
                .copied()
                .unwrap_or(0);
            StationTraffic {
                station: station.clone(),
                arrivals: arr,
                departures: dep,
                total_traffic: arr + dep,
            }
        })
        .collect()
}

/// Largest `total_traffic` in an aggregated set, 0 when empty. This is the
/// radius-scale domain maximum, so it is recomputed whenever the set is.
pub fn max_total_traffic(traffic: &[StationTraffic]) -> u32 {
    traffic.iter().map(|t| t.total_traffic).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn station(id: &str) -> Station {
        Station {
            short_name: id.to_string(),
            name: None,
            lon: -71.09,
            lat: 42.36,
        }
    }

    fn at(minute: u16) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(u32::from(minute) / 60, u32::from(minute) % 60, 0)
            .unwrap()
    }

    fn trip(start: &str, end: &str, start_min: u16, end_min: u16) -> Trip {
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: at(start_min),
            ended_at: at(end_min),
        }
    }

    fn by_id<'a>(traffic: &'a [StationTraffic], id: &str) -> &'a StationTraffic {
        traffic
            .iter()
            .find(|t| t.station.short_name == id)
            .unwrap()
    }

    #[test]
    fn round_trip_counts_both_endpoints() {
        // one 08:00 → 08:05 loop at station A
        let stations = [station("A")];
        let trips = [trip("A", "A", 480, 485)];

        let out = aggregate(&stations, &trips, TimeFilter::AnyTime);
        let a = by_id(&out, "A");
        assert_eq!(a.departures, 1);
        assert_eq!(a.arrivals, 1);
        assert_eq!(a.total_traffic, 2);
    }

    #[test]
    fn filter_window_includes_and_excludes() {
        let stations = [station("A")];
        let trips = [trip("A", "A", 480, 485)];

        // 08:00 filter: trip starts exactly at the selected minute
        let at_0800 = aggregate(&stations, &trips, TimeFilter::Minute(480));
        assert_eq!(by_id(&at_0800, "A").total_traffic, 2);

        // 10:00 filter: both endpoints are ~120 minutes away
        let at_1000 = aggregate(&stations, &trips, TimeFilter::Minute(600));
        assert_eq!(by_id(&at_1000, "A").total_traffic, 0);
    }

    #[test]
    fn boundary_minute_is_inclusive() {
        let stations = [station("A")];
        let included = [trip("A", "A", 420, 420)]; // 60 min before 08:00
        let excluded = [trip("A", "A", 419, 419)]; // 61 min before

        let f = TimeFilter::Minute(480);
        assert_eq!(by_id(&aggregate(&stations, &included, f), "A").total_traffic, 2);
        assert_eq!(by_id(&aggregate(&stations, &excluded, f), "A").total_traffic, 0);
    }

    #[test]
    fn unknown_station_ids_are_dropped() {
        let stations = [station("A")];
        let trips = [trip("GHOST", "A", 480, 490), trip("A", "GHOST", 500, 510)];

        let out = aggregate(&stations, &trips, TimeFilter::AnyTime);
        let a = by_id(&out, "A");
        assert_eq!(a.arrivals, 1);
        assert_eq!(a.departures, 1);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn filtered_total_never_exceeds_unfiltered() {
        let stations = [station("A"), station("B")];
        let trips = [
            trip("A", "B", 100, 130),
            trip("B", "A", 480, 500),
            trip("A", "A", 900, 910),
            trip("B", "B", 1380, 1400),
        ];

        let sum = |out: &[StationTraffic]| -> u32 { out.iter().map(|t| t.total_traffic).sum() };
        let unfiltered = sum(&aggregate(&stations, &trips, TimeFilter::AnyTime));
        for minute in [0u16, 120, 480, 900, 1439] {
            let filtered = sum(&aggregate(&stations, &trips, TimeFilter::Minute(minute)));
            assert!(filtered <= unfiltered, "minute {minute}");
        }
    }

    #[test]
    fn filter_covering_all_trips_equals_unfiltered() {
        // every endpoint within ±60 of 08:00
        let stations = [station("A"), station("B")];
        let trips = [
            trip("A", "B", 430, 450),
            trip("B", "A", 480, 500),
            trip("A", "A", 530, 540),
        ];

        let unfiltered = aggregate(&stations, &trips, TimeFilter::AnyTime);
        let filtered = aggregate(&stations, &trips, TimeFilter::Minute(480));
        for (u, f) in unfiltered.iter().zip(filtered.iter()) {
            assert_eq!(u.station.short_name, f.station.short_name);
            assert_eq!(u.arrivals, f.arrivals);
            assert_eq!(u.departures, f.departures);
            assert_eq!(u.total_traffic, f.total_traffic);
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let stations = [station("A"), station("B")];
        let trips = [trip("A", "B", 450, 470), trip("B", "A", 510, 520)];

        let first = aggregate(&stations, &trips, TimeFilter::Minute(480));
        let second = aggregate(&stations, &trips, TimeFilter::Minute(480));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.arrivals, b.arrivals);
            assert_eq!(a.departures, b.departures);
            assert_eq!(a.total_traffic, b.total_traffic);
        }
    }

    #[test]
    fn max_total_handles_empty_set() {
        assert_eq!(max_total_traffic(&[]), 0);

        let stations = [station("A"), station("B")];
        let trips = [trip("A", "B", 450, 470), trip("A", "B", 455, 475)];
        let out = aggregate(&stations, &trips, TimeFilter::AnyTime);
        assert_eq!(max_total_traffic(&out), 2);
    }
}
