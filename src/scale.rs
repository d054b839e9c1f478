// ---------------------------------------------------------------------------
// Visual scales: traffic counts → circle radius, flow ratio → bucket
// ---------------------------------------------------------------------------

/// Largest circle radius, in plot points, for the busiest station.
pub const MAX_STATION_RADIUS: f64 = 20.0;

/// Square-root scale from `[0, domain_max]` onto `[0, range_max]`.
///
/// Circle *area* then grows linearly with traffic, which is what makes the
/// overlay readable. Rebuilt on every recompute because the domain maximum
/// changes with the filter.
#[derive(Debug, Clone, Copy)]
pub struct SqrtScale {
    domain_max: f64,
    range_max: f64,
}

impl SqrtScale {
    pub fn new(domain_max: f64, range_max: f64) -> Self {
        Self {
            domain_max,
            range_max,
        }
    }

    /// A degenerate domain (`max <= 0`, e.g. no trips pass the filter) maps
    /// everything to 0 instead of dividing by it.
    pub fn apply(&self, value: f64) -> f64 {
        if self.domain_max <= 0.0 {
            return 0.0;
        }
        let t = (value / self.domain_max).clamp(0.0, 1.0);
        t.sqrt() * self.range_max
    }
}

/// Uniform quantize scale over `[0, 1]`, like `d3.scaleQuantize`: the unit
/// interval is split into as many equal slices as there are range values,
/// and each input is snapped to its slice's value. The top end (t = 1) lands
/// in the last slice.
#[derive(Debug, Clone)]
pub struct QuantizeScale {
    range: Vec<f64>,
}

impl QuantizeScale {
    pub fn new(range: Vec<f64>) -> Self {
        debug_assert!(!range.is_empty());
        Self { range }
    }

    /// The three-bucket flow scale: departures-heavy, balanced, arrivals-heavy.
    pub fn thirds() -> Self {
        Self::new(vec![0.0, 0.5, 1.0])
    }

    pub fn apply(&self, t: f64) -> f64 {
        let n = self.range.len();
        let idx = ((t.clamp(0.0, 1.0) * n as f64) as usize).min(n - 1);
        self.range[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_scale_endpoints() {
        let scale = SqrtScale::new(100.0, MAX_STATION_RADIUS);
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(100.0), MAX_STATION_RADIUS);
        // quarter of the domain → half the radius
        assert!((scale.apply(25.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn sqrt_scale_degenerate_domain() {
        let scale = SqrtScale::new(0.0, MAX_STATION_RADIUS);
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(17.0), 0.0);
    }

    #[test]
    fn sqrt_scale_clamps_above_domain() {
        let scale = SqrtScale::new(10.0, 20.0);
        assert_eq!(scale.apply(40.0), 20.0);
    }

    #[test]
    fn quantize_thirds_buckets() {
        let scale = QuantizeScale::thirds();
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(0.32), 0.0);
        assert_eq!(scale.apply(0.34), 0.5);
        assert_eq!(scale.apply(0.65), 0.5);
        assert_eq!(scale.apply(0.67), 1.0);
        assert_eq!(scale.apply(1.0), 1.0);
    }

    #[test]
    fn quantize_clamps_out_of_domain_input() {
        let scale = QuantizeScale::thirds();
        assert_eq!(scale.apply(-0.5), 0.0);
        assert_eq!(scale.apply(1.5), 1.0);
    }
}
