//! Linear scales for projecting attribute values to screen coordinates

/// Affine mapping from a data domain to a screen range.
///
/// Projection is a pure function of the current domain and range; callers
/// rebuild scales every frame so attribute changes, resizes and reloads are
/// always reflected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Map a domain value into the range. A degenerate domain maps
    /// everything to the middle of the range.
    pub fn project(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let t = ((value - d0) / (d1 - d0)) as f32;
        r0 + t * (r1 - r0)
    }
}

/// Min/max of an iterator of values, `None` when it yields nothing.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut iter = values.into_iter();
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for v in iter {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_domain_endpoints_to_range_endpoints() {
        let scale = LinearScale::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(scale.project(0.0), 100.0);
        assert_eq!(scale.project(10.0), 200.0);
        assert_eq!(scale.project(5.0), 150.0);
    }

    #[test]
    fn inverted_range_flips_direction() {
        // Screen y grows downwards, so y scales use an inverted range.
        let scale = LinearScale::new((0.0, 1.0), (300.0, 20.0));
        assert_eq!(scale.project(0.0), 300.0);
        assert_eq!(scale.project(1.0), 20.0);
    }

    #[test]
    fn degenerate_domain_centers_values() {
        let scale = LinearScale::new((4.0, 4.0), (0.0, 100.0));
        assert_eq!(scale.project(4.0), 50.0);
    }

    #[test]
    fn extent_of_values() {
        assert_eq!(extent([3.0, -1.0, 7.0]), Some((-1.0, 7.0)));
        assert_eq!(extent([]), None);
    }
}
