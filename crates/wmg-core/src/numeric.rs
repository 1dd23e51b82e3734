/// Floating point type used for every coordinate and distance.
pub type Real = f64;

/// Integer ceiling division; `divisor` must be non-zero.
pub fn ceil_div(value: usize, divisor: usize) -> usize {
    value.div_ceil(divisor)
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
///
/// Values are computed as `start + i * step` rather than accumulated, so the
/// endpoints are hit exactly.
pub fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + i as Real * step
                    }
                })
                .collect()
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_monotonic(start in -100.0_f64..100.0, width in 0.001_f64..50.0, n in 2_usize..200) {
            let v = linspace(start, start + width, n);
            prop_assert_eq!(v.len(), n);
            prop_assert!(v.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn ceil_div_bounds(value in 1_usize..10_000, divisor in 1_usize..50) {
            let q = ceil_div(value, divisor);
            prop_assert!(q * divisor >= value);
            prop_assert!((q - 1) * divisor < value);
        }
    }
}
