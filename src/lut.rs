//! Normalization lookup tables.
//!
//! XInput reports triggers as `0..=255` and thumbsticks as `i16`. Hosts want
//! floats, so each raw domain gets a precomputed table and the hot polling
//! path is a single indexed read:
//!
//! - [`TRIGGER_LUT`]: `[0, 255]` mapped linearly to `[0.0, 1.0]`
//! - [`STICK_LUT`]: `[-32768, 32767]` mapped linearly to `[-1.0, 1.0]`
//!
//! Both tables divide by the full domain width (`max - min`), so the stick
//! table has no exact zero: raw `0` and raw `-1` straddle the midpoint by
//! half a table step.
//!
//! Lookups outside a table's declared domain return `0.0` (neutral), never a
//! clamped edge value.

use std::sync::LazyLock;

/// Unsigned 8-bit domain mapped to `[0.0, 1.0]` (trigger axes).
pub static TRIGGER_LUT: LazyLock<FloatLut> =
    LazyLock::new(|| FloatLut::new(u8::MIN as i64, u8::MAX as i64, false));

/// Signed 16-bit domain mapped to `[-1.0, 1.0]` (stick axes).
pub static STICK_LUT: LazyLock<FloatLut> =
    LazyLock::new(|| FloatLut::new(i16::MIN as i64, i16::MAX as i64, true));

/// A precomputed `raw integer -> f32` table over `[min, max]`.
#[derive(Clone, Debug)]
pub struct FloatLut {
    min: i64,
    values: Box<[f32]>,
}

impl FloatLut {
    /// Build a table over `[min, max]`.
    ///
    /// Each entry is `(i - min) / (max - min)`; when `centered` the result is
    /// remapped from `[0, 1]` to `[-1, 1]` via `(v - 0.5) * 2`. Arithmetic is
    /// done in `f64` and stored as `f32`.
    ///
    /// `max` must be greater than `min`.
    pub fn new(min: i64, max: i64, centered: bool) -> Self {
        debug_assert!(max > min, "empty lookup domain [{min}, {max}]");

        let width = (max - min) as f64;
        let values = (0..=(max - min))
            .map(|i| {
                let v = i as f64 / width;
                let v = if centered { (v - 0.5) * 2.0 } else { v };
                v as f32
            })
            .collect();

        Self { min, values }
    }

    /// Smallest raw value covered by the table.
    #[inline]
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest raw value covered by the table.
    #[inline]
    pub fn max(&self) -> i64 {
        self.min + self.values.len() as i64 - 1
    }

    /// Number of entries (`max - min + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Normalized value for `raw`, or `0.0` when `raw` is outside `[min, max]`.
    #[inline]
    pub fn get(&self, raw: i64) -> f32 {
        raw.checked_sub(self.min)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|idx| self.values.get(idx))
            .copied()
            .unwrap_or(0.0)
    }

    /// Distance between two adjacent entries.
    #[inline]
    pub fn step(&self) -> f32 {
        match self.values.len() {
            0 | 1 => 0.0,
            n => (self.values[n - 1] - self.values[0]) / (n - 1) as f32,
        }
    }
}

/// Normalize a raw trigger byte into `[0.0, 1.0]`.
#[inline]
pub fn trigger(raw: u8) -> f32 {
    TRIGGER_LUT.get(raw.into())
}

/// Normalize a raw thumbstick word into `[-1.0, 1.0]`.
#[inline]
pub fn stick(raw: i16) -> f32 {
    STICK_LUT.get(raw.into())
}

/// Build both tables now so the first poll doesn't pay for it.
pub fn warm() {
    LazyLock::force(&TRIGGER_LUT);
    LazyLock::force(&STICK_LUT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trigger_table_endpoints() {
        assert_eq!(trigger(0), 0.0);
        assert_eq!(trigger(255), 1.0);
        assert_eq!(TRIGGER_LUT.len(), 256);
        assert_eq!(TRIGGER_LUT.min(), 0);
        assert_eq!(TRIGGER_LUT.max(), 255);
    }

    #[test]
    fn trigger_table_is_monotonic_and_bounded() {
        let mut prev = f32::NEG_INFINITY;
        for raw in u8::MIN..=u8::MAX {
            let v = trigger(raw);
            assert!((0.0..=1.0).contains(&v), "trigger({raw}) = {v}");
            assert!(v >= prev, "trigger({raw}) = {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn stick_table_endpoints() {
        assert_eq!(stick(i16::MIN), -1.0);
        assert_eq!(stick(i16::MAX), 1.0);
        assert_eq!(STICK_LUT.len(), 65536);
        assert_eq!(STICK_LUT.min(), -32768);
        assert_eq!(STICK_LUT.max(), 32767);
    }

    #[test]
    fn stick_table_is_monotonic_and_bounded() {
        let mut prev = f32::NEG_INFINITY;
        for raw in i16::MIN..=i16::MAX {
            let v = stick(raw);
            assert!((-1.0..=1.0).contains(&v), "stick({raw}) = {v}");
            assert!(v >= prev, "stick({raw}) = {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn stick_table_is_centered_within_one_step() {
        let step = STICK_LUT.step();
        assert!(step > 0.0);
        assert!(stick(0).abs() <= step, "stick(0) = {}", stick(0));
        assert!(stick(-1).abs() <= step, "stick(-1) = {}", stick(-1));
        // The midpoint sits between -1 and 0.
        assert!(stick(-1) < 0.0 && stick(0) > 0.0);
        assert!((stick(0) + stick(-1)).abs() <= f32::EPSILON);
    }

    #[test]
    fn out_of_domain_lookups_are_neutral() {
        assert_eq!(TRIGGER_LUT.get(256), 0.0);
        assert_eq!(TRIGGER_LUT.get(-1), 0.0);
        assert_eq!(TRIGGER_LUT.get(i64::MAX), 0.0);
        assert_eq!(TRIGGER_LUT.get(i64::MIN), 0.0);

        assert_eq!(STICK_LUT.get(32768), 0.0);
        assert_eq!(STICK_LUT.get(-32769), 0.0);
        assert_eq!(STICK_LUT.get(i64::MIN), 0.0);
    }

    #[test]
    fn out_of_domain_is_zero_not_clamped() {
        let lut = FloatLut::new(10, 20, false);
        assert_eq!(lut.get(10), 0.0);
        assert_eq!(lut.get(20), 1.0);
        assert_eq!(lut.get(21), 0.0);
        assert_eq!(lut.get(9), 0.0);
        assert_eq!(lut.get(15), 0.5);
    }

    #[test]
    fn centered_small_table() {
        let lut = FloatLut::new(0, 4, true);
        assert_eq!(lut.get(0), -1.0);
        assert_eq!(lut.get(2), 0.0);
        assert_eq!(lut.get(4), 1.0);
        assert_eq!(lut.step(), 0.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn prop_stick_matches_linear_formula(raw in any::<i16>()) {
            let expected = ((raw as f64 + 32768.0) / 65535.0 - 0.5) * 2.0;
            let got = stick(raw) as f64;
            prop_assert!((got - expected).abs() <= 1e-6,
                "stick({raw}) = {got}, expected {expected}");
        }

        #[test]
        fn prop_trigger_ordering(a in any::<u8>(), b in any::<u8>()) {
            if a <= b {
                prop_assert!(trigger(a) <= trigger(b));
            } else {
                prop_assert!(trigger(a) >= trigger(b));
            }
        }

        #[test]
        fn prop_outside_stick_domain_is_zero(raw in prop_oneof![
            i64::MIN..-32768i64,
            32768i64..i64::MAX,
        ]) {
            prop_assert_eq!(STICK_LUT.get(raw), 0.0);
        }
    }
}
