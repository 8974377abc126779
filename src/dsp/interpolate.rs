#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Table Interpolation
===================

Reading a table at a fractional position. With `i = floor(index)` and
`delta = index - i`, each mode blends a different number of neighbours, all
looked up modulo the table length:

  None        x[i]
  Linear      x[i] + delta * (x[i+1] - x[i])
  Lagrange2   h0 x[i] + h1 x[i+1] + h2 x[i+2]
                h0 = (d-1)(d-2)/2    h1 = -d(d-2)    h2 = d(d-1)/2
  Lagrange3   h0 x[i] + h1 x[i+1] + h2 x[i+2] + h3 x[i+3]
                h0 = -(d-1)(d-2)(d-3)/6    h1 = d(d-2)(d-3)/2
                h2 = -d(d-1)(d-3)/2        h3 = d(d-1)(d-2)/6

Every basis evaluates to exactly x[i] at delta = 0, so integer positions read
back the table unchanged in all modes.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    None,
    Linear,
    Lagrange2,
    #[default]
    Lagrange3,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator {
    mode: InterpolationMode,
}

impl Interpolator {
    pub fn new(mode: InterpolationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InterpolationMode) {
        self.mode = mode;
    }

    /// Read `table` at the fractional position `index`.
    ///
    /// The table length is the wrap size; pass a sub-slice to interpolate over
    /// a prefix. Any finite `index` wraps, negative ones included.
    pub fn interpolate(&self, table: &[f32], index: f64) -> f32 {
        let size = table.len();
        if size == 0 {
            return 0.0;
        }

        let base = index.floor();
        let delta = index - base;
        let i = base.rem_euclid(size as f64) as usize;
        let at = |offset: usize| table[(i + offset) % size] as f64;

        let x0 = at(0);
        let output = match self.mode {
            InterpolationMode::None => x0,
            InterpolationMode::Linear => x0 + delta * (at(1) - x0),
            InterpolationMode::Lagrange2 => {
                let h0 = (delta - 1.0) * (delta - 2.0) / 2.0;
                let h1 = -delta * (delta - 2.0);
                let h2 = delta * (delta - 1.0) / 2.0;
                h0 * x0 + h1 * at(1) + h2 * at(2)
            }
            InterpolationMode::Lagrange3 => {
                let h0 = -(delta - 1.0) * (delta - 2.0) * (delta - 3.0) / 6.0;
                let h1 = delta * (delta - 2.0) * (delta - 3.0) / 2.0;
                let h2 = -delta * (delta - 1.0) * (delta - 3.0) / 2.0;
                let h3 = delta * (delta - 1.0) * (delta - 2.0) / 6.0;
                h0 * x0 + h1 * at(1) + h2 * at(2) + h3 * at(3)
            }
        };

        output as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [InterpolationMode; 4] = [
        InterpolationMode::None,
        InterpolationMode::Linear,
        InterpolationMode::Lagrange2,
        InterpolationMode::Lagrange3,
    ];

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    #[test]
    fn none_ignores_fraction() {
        let table = [0.3, -0.8, 0.25, 0.9, -0.1];
        let interp = Interpolator::new(InterpolationMode::None);

        for (i, &expected) in table.iter().enumerate() {
            for fraction in [0.0, 0.25, 0.5, 0.999] {
                let value = interp.interpolate(&table, i as f64 + fraction);
                assert_eq!(value, expected, "index {i} + {fraction}");
            }
        }
    }

    #[test]
    fn integer_positions_are_exact_in_every_mode() {
        let table = [0.5, -0.25, 1.0, 0.0, -1.0, 0.75];
        for mode in ALL_MODES {
            let interp = Interpolator::new(mode);
            for (i, &expected) in table.iter().enumerate() {
                let value = interp.interpolate(&table, i as f64);
                assert!(
                    (value - expected).abs() < 1e-6,
                    "{mode:?} at {i}: {value} != {expected}"
                );
            }
        }
    }

    #[test]
    fn linear_blends_neighbours() {
        let table = [0.0, 1.0, 0.0, -1.0];
        let interp = Interpolator::new(InterpolationMode::Linear);

        assert!((interp.interpolate(&table, 0.5) - 0.5).abs() < 1e-6);
        assert!((interp.interpolate(&table, 2.25) + 0.25).abs() < 1e-6);
    }

    #[test]
    fn lagrange_reproduces_polynomials_of_its_order() {
        // Away from the wrap point, a ramp is reproduced by every mode above None
        let table = ramp(16);
        for mode in [
            InterpolationMode::Linear,
            InterpolationMode::Lagrange2,
            InterpolationMode::Lagrange3,
        ] {
            let interp = Interpolator::new(mode);
            let value = interp.interpolate(&table, 4.4);
            assert!((value - 4.4).abs() < 1e-5, "{mode:?} gave {value}");
        }

        // Lagrange3 is exact for cubics
        let cubic: Vec<f32> = (0..16).map(|i| (i as f32).powi(3) * 0.001).collect();
        let interp = Interpolator::new(InterpolationMode::Lagrange3);
        let expected = 5.5f32.powi(3) * 0.001;
        assert!((interp.interpolate(&cubic, 5.5) - expected).abs() < 1e-4);
    }

    #[test]
    fn neighbours_wrap_around_table_end() {
        let table = [1.0, 0.0, 0.0, 3.0];
        let interp = Interpolator::new(InterpolationMode::Linear);

        // Between the last sample (3.0) and the first (1.0)
        let value = interp.interpolate(&table, 3.5);
        assert!((value - 2.0).abs() < 1e-6);

        for mode in ALL_MODES {
            let value = Interpolator::new(mode).interpolate(&table, 3.75);
            assert!(value.is_finite(), "{mode:?} should wrap without panicking");
        }
    }

    #[test]
    fn negative_and_large_indices_wrap() {
        let table = [1.0, 0.0, 0.0, 3.0];
        let linear = Interpolator::new(InterpolationMode::Linear);
        let none = Interpolator::new(InterpolationMode::None);

        // -0.5 sits halfway between the last sample and the first
        assert!((linear.interpolate(&table, -0.5) - 2.0).abs() < 1e-6);
        assert_eq!(none.interpolate(&table, -4.0), 1.0);
        assert_eq!(none.interpolate(&table, -1.25), 0.0);
        assert_eq!(none.interpolate(&table, 4.0 * 1000.0 + 3.5), 3.0);
    }

    #[test]
    fn empty_table_reads_silence() {
        let interp = Interpolator::default();
        assert_eq!(interp.mode(), InterpolationMode::Lagrange3);
        assert_eq!(interp.interpolate(&[], 1.5), 0.0);
    }
}
