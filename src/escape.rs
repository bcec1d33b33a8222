use crate::complex::*;

/// Orbits with a magnitude above this radius are considered divergent.
pub const BAILOUT_RADIUS: f64 = 2.0;

/// Number of iterations of `z = z^2 + c`, starting from `z = 0`, until the
/// orbit leaves the bailout disk. Returns `max_iter` if it never does.
///
/// The bailout test is inclusive: an orbit sitting exactly on `|z| = 2`
/// keeps iterating.
pub fn escape_time(c: ComplexPoint, max_iter: u32) -> u32 {
    let mut z = cr(0.0);
    let mut n = 0;
    while z.norm() <= BAILOUT_RADIUS && n < max_iter {
        z = (z * z) + c;
        n += 1;
    }
    n
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EscapeTime {
    pub max_iter: u32,
}

impl EscapeTime {
    pub fn new(max_iter: u32) -> Self {
        Self { max_iter }
    }

    pub fn evaluate(&self, c: ComplexPoint) -> u32 {
        escape_time(c, self.max_iter)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_outside_disk_escapes_after_one_step() {
        for p in [c(2.5, 0.0), c(0.0, -3.0), c(-1.5, 1.5), c(100.0, 100.0)] {
            assert_eq!(escape_time(p, 1), 1);
            assert_eq!(escape_time(p, 1000), 1);
        }
    }

    #[test]
    fn test_origin_never_escapes() {
        for m in [0, 1, 2, 17, 1000] {
            assert_eq!(escape_time(cr(0.0), m), m);
        }
    }

    #[test]
    fn test_zero_budget() {
        assert_eq!(escape_time(c(5.0, 5.0), 0), 0);
        assert_eq!(escape_time(c(-0.5, 0.0), 0), 0);
    }

    #[test]
    fn test_bailout_is_inclusive() {
        // z: 0 -> -2 -> 2 -> 2 ..., |z| stays at exactly 2
        assert_eq!(escape_time(cr(-2.0), 10), 10);
        // z: 0 -> 2 -> 6
        assert_eq!(escape_time(cr(2.0), 10), 2);
        // z: 0 -> 1 -> 2 -> 5
        assert_eq!(escape_time(cr(1.0), 10), 3);
    }

    #[test]
    fn test_periodic_orbits_stay_bounded() {
        assert_eq!(escape_time(cr(-1.0), 500), 500);
        assert_eq!(escape_time(ci(1.0), 500), 500);
    }

    #[test]
    fn test_result_within_budget() {
        let points = [c(0.3, 0.5), c(-0.75, 0.1), c(0.26, 0.0), c(-1.8, 0.01)];
        for p in points {
            for m in [0, 1, 5, 50, 200] {
                let n = escape_time(p, m);
                assert!(n <= m);
            }
        }
    }

    #[test]
    fn test_budget_monotonic() {
        let points = [c(0.3, 0.5), c(0.26, 0.0), c(-0.75, 0.1), c(1.0, 0.0)];
        for p in points {
            let mut last = 0;
            for m in 0..300 {
                let n = escape_time(p, m);
                assert!(n >= last);
                if n < m {
                    // escaped: a larger budget changes nothing
                    assert_eq!(escape_time(p, m + 100), n);
                }
                last = n;
            }
        }
    }

    #[test]
    fn test_evaluator_uses_budget() {
        let e = EscapeTime::new(42);
        assert_eq!(e.evaluate(cr(0.0)), 42);
        assert_eq!(e.evaluate(cr(3.0)), 1);
        assert_eq!(e.evaluate(cr(-2.0)), escape_time(cr(-2.0), 42));
    }
}
