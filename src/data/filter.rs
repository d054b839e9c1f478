use super::model::Trip;

// ---------------------------------------------------------------------------
// Time-of-day filter
// ---------------------------------------------------------------------------

/// Half-width of the filter band, in minutes. A trip matches when either of
/// its endpoints is at most this many minutes from the selected time
/// (inclusive on both sides).
pub const WINDOW_MINUTES: i32 = 60;

/// Slider value that means "any time". The slider runs `-1..=1439`.
pub const ANY_TIME_SENTINEL: i32 = -1;

/// The filter the slider drives.
///
/// Two states only: `AnyTime` (initial, slider at the sentinel) and
/// `Minute(m)` with `m` in `0..=1439`. Every transition between them
/// triggers a full recompute of the aggregated station set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    AnyTime,
    Minute(u16),
}

impl TimeFilter {
    /// Map a raw slider value onto a filter state. Values at or below the
    /// sentinel mean unfiltered; everything else is clamped into a day.
    pub fn from_slider(value: i32) -> Self {
        if value <= ANY_TIME_SENTINEL {
            TimeFilter::AnyTime
        } else {
            TimeFilter::Minute(value.min(1439) as u16)
        }
    }

    /// The slider position representing this filter.
    pub fn slider_value(&self) -> i32 {
        match self {
            TimeFilter::AnyTime => ANY_TIME_SENTINEL,
            TimeFilter::Minute(m) => i32::from(*m),
        }
    }

    pub fn is_any_time(&self) -> bool {
        matches!(self, TimeFilter::AnyTime)
    }

    /// Whether a trip is counted under this filter: unfiltered counts
    /// everything, otherwise either endpoint must fall inside the ±60-minute
    /// band. No midnight wraparound: a filter at 00:10 does not reach back
    /// to 23:50, matching the plain minute-distance the overlay always used.
    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            TimeFilter::AnyTime => true,
            TimeFilter::Minute(target) => {
                within_window(trip.start_minute(), *target)
                    || within_window(trip.end_minute(), *target)
            }
        }
    }

    /// `"HH:MM"` for a set filter, `"any time"` otherwise.
    pub fn label(&self) -> String {
        match self {
            TimeFilter::AnyTime => "any time".to_string(),
            TimeFilter::Minute(m) => format!("{:02}:{:02}", m / 60, m % 60),
        }
    }
}

fn within_window(minute: u16, target: u16) -> bool {
    (i32::from(minute) - i32::from(target)).abs() <= WINDOW_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start_min: u16, end_min: u16) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let at = |m: u16| {
            day.and_hms_opt(u32::from(m) / 60, u32::from(m) % 60, 0)
                .unwrap()
        };
        Trip {
            start_station_id: "A32000".into(),
            end_station_id: "B32001".into(),
            started_at: at(start_min),
            ended_at: at(end_min),
        }
    }

    #[test]
    fn sentinel_maps_to_any_time() {
        assert_eq!(TimeFilter::from_slider(-1), TimeFilter::AnyTime);
        assert_eq!(TimeFilter::from_slider(0), TimeFilter::Minute(0));
        assert_eq!(TimeFilter::from_slider(1439), TimeFilter::Minute(1439));
    }

    #[test]
    fn any_time_matches_everything() {
        assert!(TimeFilter::AnyTime.matches(&trip(0, 1439)));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let f = TimeFilter::Minute(480);
        // exactly 60 minutes away on the start endpoint
        assert!(f.matches(&trip(420, 425)));
        assert!(f.matches(&trip(540, 545)));
        // 61 minutes away on both endpoints
        assert!(!f.matches(&trip(419, 419)));
        assert!(!f.matches(&trip(541, 541)));
    }

    #[test]
    fn either_endpoint_is_enough() {
        let f = TimeFilter::Minute(600);
        // starts far outside the band but ends inside it
        assert!(f.matches(&trip(400, 560)));
        // both endpoints outside
        assert!(!f.matches(&trip(400, 430)));
    }

    #[test]
    fn labels() {
        assert_eq!(TimeFilter::AnyTime.label(), "any time");
        assert_eq!(TimeFilter::Minute(0).label(), "00:00");
        assert_eq!(TimeFilter::Minute(485).label(), "08:05");
        assert_eq!(TimeFilter::Minute(1439).label(), "23:59");
    }
}
