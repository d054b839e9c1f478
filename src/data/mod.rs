/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  stations .json / trips .csv / lanes .geojson   (file or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → Vec<Station>, Vec<Trip>, LaneLayer
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  TimeFilter: any time | ±60 min around a minute-of-day
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  traffic  │  group by station id → Vec<StationTraffic>
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod traffic;
