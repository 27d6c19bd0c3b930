//! The in-memory container the codec produces and consumes.
//!
//! `BlobData` itself is plain data; the interesting indirection is
//! [`DaySpeeds`], the small capability the encoder iterates over per day.
//! It lets a caller hand the encoder a dense array (the common case, and
//! what `BlobData` stores internally) or a callable that synthesizes speeds
//! on the fly, without the encoder caring which.

use crate::error::{PspError, Result};
use crate::header::{DaysPresent, DAY_COUNT};

/// A day's worth of speeds, accessed by bin index.
///
/// A day is "absent" exactly when there's no implementor of this trait for
/// it *or* when [`DaySpeeds::bin_count`] returns 0 — both collapse to the
/// same absence state in the days-present bitset (see `design notes` in
/// `spec.md` §9).
pub trait DaySpeeds {
    /// Number of time bins this day provides.
    fn bin_count(&self) -> usize;
    /// The speed (km/h) at `bin`. Only called for `bin < self.bin_count()`.
    fn speed_at(&self, bin: usize) -> f64;
}

impl DaySpeeds for [f64] {
    fn bin_count(&self) -> usize {
        self.len()
    }
    fn speed_at(&self, bin: usize) -> f64 {
        self[bin]
    }
}

impl DaySpeeds for Vec<f64> {
    fn bin_count(&self) -> usize {
        self.len()
    }
    fn speed_at(&self, bin: usize) -> f64 {
        self[bin]
    }
}

/// A caller-supplied callable adapter: speeds are computed on demand rather
/// than stored, for sources that don't already hold a dense array.
pub struct FnDaySpeeds<F: Fn(usize) -> f64> {
    count: usize,
    f: F,
}

impl<F: Fn(usize) -> f64> FnDaySpeeds<F> {
    pub fn new(count: usize, f: F) -> Self {
        Self { count, f }
    }
}

impl<F: Fn(usize) -> f64> DaySpeeds for FnDaySpeeds<F> {
    fn bin_count(&self) -> usize {
        self.count
    }
    fn speed_at(&self, bin: usize) -> f64 {
        (self.f)(bin)
    }
}

/// The decoded or to-be-encoded contents of a PSP blob.
///
/// Day 0 is Sunday, day 6 is Saturday (see `spec.md` §6 — this differs from
/// ISO-8601 weekday numbering, and translating at the caller boundary is the
/// caller's responsibility).
#[derive(Debug, Clone, PartialEq)]
pub struct BlobData {
    week_day_speed: u8,
    weekend_speed: u8,
    time_resolution_minutes: u16,
    day_speeds: [Option<Vec<f64>>; DAY_COUNT],
}

impl BlobData {
    /// Builds a `BlobData` with only the two mean speeds — no daily profiles.
    pub fn means_only(week_day_speed: u8, weekend_speed: u8) -> Self {
        Self {
            week_day_speed,
            weekend_speed,
            time_resolution_minutes: 0,
            day_speeds: Default::default(),
        }
    }

    /// Builds a `BlobData` with daily profiles for some subset of days,
    /// given as dense rows.
    ///
    /// `time_resolution_minutes` must divide 1440 and be in `[1, 1440]`.
    /// Every present day's sequence must have exactly `1440 /
    /// time_resolution_minutes` entries, each in `[0, 255]`.
    ///
    /// This is a thin wrapper over [`BlobData::with_day_accessors`] for the
    /// common case where speeds already live in a `Vec<f64>` per day; a
    /// caller that wants to synthesize speeds on demand (via
    /// [`FnDaySpeeds`]) or supply some other [`DaySpeeds`] implementor
    /// should call `with_day_accessors` directly.
    pub fn with_profiles(
        week_day_speed: u8,
        weekend_speed: u8,
        time_resolution_minutes: u16,
        day_speeds: [Option<Vec<f64>>; DAY_COUNT],
    ) -> Result<Self> {
        let accessors: [Option<&dyn DaySpeeds>; DAY_COUNT] =
            std::array::from_fn(|d| day_speeds[d].as_ref().map(|v| v as &dyn DaySpeeds));
        Self::with_day_accessors(
            week_day_speed,
            weekend_speed,
            time_resolution_minutes,
            accessors,
        )
    }

    /// Builds a `BlobData` with daily profiles, each day supplied as any
    /// [`DaySpeeds`] implementor — a dense row, a [`FnDaySpeeds`] callable,
    /// or a caller's own type. This is the capability-polymorphic entry
    /// point the encoder is built around (see the module docs): every
    /// present day is read through `bin_count`/`speed_at` and materialized
    /// into this `BlobData`'s internal storage.
    ///
    /// A day with no accessor, or whose `bin_count()` is 0, is absent — the
    /// same collapsing rule `with_profiles` uses. If no day ends up
    /// present, `time_resolution_minutes` must be 0 (the spec's "zero iff
    /// no daily profiles" invariant); otherwise it must divide 1440 and
    /// every present day's bin count must match `1440 /
    /// time_resolution_minutes`.
    pub fn with_day_accessors(
        week_day_speed: u8,
        weekend_speed: u8,
        time_resolution_minutes: u16,
        day_speeds: [Option<&dyn DaySpeeds>; DAY_COUNT],
    ) -> Result<Self> {
        let any_present = day_speeds
            .iter()
            .any(|d| d.as_ref().is_some_and(|a| a.bin_count() > 0));

        if !any_present {
            if time_resolution_minutes != 0 {
                return Err(PspError::new(format!(
                    "time resolution {time_resolution_minutes} given but no day has a profile"
                )));
            }
            return Ok(Self {
                week_day_speed,
                weekend_speed,
                time_resolution_minutes: 0,
                day_speeds: Default::default(),
            });
        }

        if time_resolution_minutes == 0
            || time_resolution_minutes > 1440
            || 1440 % time_resolution_minutes != 0
        {
            return Err(PspError::new(format!(
                "time resolution {time_resolution_minutes} must divide 1440"
            )));
        }
        let expected_bins = (1440 / time_resolution_minutes) as usize;

        let mut materialized: [Option<Vec<f64>>; DAY_COUNT] = Default::default();
        for (d, day) in day_speeds.iter().enumerate() {
            let Some(accessor) = day else { continue };
            let bins = accessor.bin_count();
            if bins == 0 {
                // A present-but-empty day collapses to absent; nothing to validate.
                continue;
            }
            if bins != expected_bins {
                return Err(PspError::new(format!(
                    "day {d} has {bins} bins, expected {expected_bins}"
                )));
            }
            let mut speeds = Vec::with_capacity(bins);
            for bin in 0..bins {
                let s = accessor.speed_at(bin);
                if !(0.0..=255.0).contains(&s) {
                    return Err(PspError::new(format!(
                        "day {d} bin {bin} has speed {s}, outside [0, 255]"
                    )));
                }
                speeds.push(s);
            }
            materialized[d] = Some(speeds);
        }

        Ok(Self {
            week_day_speed,
            weekend_speed,
            time_resolution_minutes,
            day_speeds: materialized,
        })
    }

    /// Constructs a `BlobData` straight from already-validated decoded
    /// parts, skipping the range checks `with_profiles` performs. Used only
    /// by the decoder, whose inputs are derived from flex-float decoding and
    /// therefore already within range.
    pub(crate) fn from_decoded_parts(
        week_day_speed: u8,
        weekend_speed: u8,
        time_resolution_minutes: u16,
        day_speeds: [Option<Vec<f64>>; DAY_COUNT],
    ) -> Self {
        Self {
            week_day_speed,
            weekend_speed,
            time_resolution_minutes,
            day_speeds,
        }
    }

    pub fn week_day_speed(&self) -> u8 {
        self.week_day_speed
    }

    pub fn weekend_speed(&self) -> u8 {
        self.weekend_speed
    }

    /// Bin width in minutes; `0` iff there are no daily profiles.
    pub fn time_resolution_minutes(&self) -> u16 {
        self.time_resolution_minutes
    }

    pub fn has_daily_speeds(&self) -> bool {
        self.time_resolution_minutes != 0
    }

    /// The speeds for day `d` (0 = Sunday .. 6 = Saturday), if present.
    pub fn day(&self, d: usize) -> Option<&[f64]> {
        self.day_speeds.get(d).and_then(|o| o.as_deref())
    }

    /// The days-present bitset, derived from which day slots are non-empty.
    pub fn days_present(&self) -> DaysPresent {
        let mut present = [false; DAY_COUNT];
        for (d, day) in self.day_speeds.iter().enumerate() {
            present[d] = day.as_ref().is_some_and(|speeds| !speeds.is_empty());
        }
        DaysPresent::from_days(present)
    }

    /// The accessor for day `d`, honoring the absent-iff-empty-or-missing rule.
    pub(crate) fn day_accessor(&self, d: usize) -> Option<&dyn DaySpeeds> {
        match self.day_speeds.get(d).and_then(|o| o.as_ref()) {
            Some(speeds) if !speeds.is_empty() => Some(speeds as &dyn DaySpeeds),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_only_has_no_daily_speeds() {
        let b = BlobData::means_only(81, 87);
        assert!(!b.has_daily_speeds());
        assert_eq!(b.time_resolution_minutes(), 0);
        assert_eq!(b.days_present().to_byte(), 0);
    }

    #[test]
    fn with_profiles_rejects_bad_resolution() {
        let mut days: [Option<Vec<f64>>; 7] = Default::default();
        days[0] = Some(vec![10.0; 100]);
        assert!(BlobData::with_profiles(10, 20, 100, days).is_err());
    }

    #[test]
    fn with_profiles_rejects_bin_count_mismatch() {
        let mut days: [Option<Vec<f64>>; 7] = Default::default();
        days[0] = Some(vec![10.0; 5]); // 240-minute resolution expects 6 bins
        assert!(BlobData::with_profiles(10, 20, 240, days).is_err());
    }

    #[test]
    fn with_profiles_rejects_out_of_range_speed() {
        let mut days: [Option<Vec<f64>>; 7] = Default::default();
        days[0] = Some(vec![10.0, 300.0, 10.0, 10.0, 10.0, 10.0]);
        assert!(BlobData::with_profiles(10, 20, 240, days).is_err());
    }

    #[test]
    fn empty_day_counts_as_absent() {
        let mut days: [Option<Vec<f64>>; 7] = Default::default();
        days[0] = Some(vec![]);
        days[1] = Some(vec![10.0; 6]);
        let b = BlobData::with_profiles(10, 20, 240, days).unwrap();
        assert!(!b.days_present().contains(0));
        assert!(b.days_present().contains(1));
        assert!(b.day_accessor(0).is_none());
    }

    #[test]
    fn fn_day_speeds_computes_on_demand() {
        let accessor = FnDaySpeeds::new(4, |bin| bin as f64 * 2.0);
        assert_eq!(accessor.bin_count(), 4);
        assert_eq!(accessor.speed_at(2), 4.0);
    }

    #[test]
    fn resolution_with_no_present_days_is_rejected() {
        let days: [Option<Vec<f64>>; 7] = Default::default();
        let err = BlobData::with_profiles(10, 20, 240, days).unwrap_err();
        assert!(err.message().contains("no day has a profile"));

        let mut all_empty: [Option<Vec<f64>>; 7] = Default::default();
        all_empty[0] = Some(vec![]);
        let err = BlobData::with_profiles(10, 20, 240, all_empty).unwrap_err();
        assert!(err.message().contains("no day has a profile"));
    }

    #[test]
    fn with_day_accessors_drives_a_caller_supplied_callable() {
        let sunday = FnDaySpeeds::new(6, |bin| 10.0 + bin as f64);
        let monday = vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0];

        let mut accessors: [Option<&dyn DaySpeeds>; 7] = Default::default();
        accessors[0] = Some(&sunday);
        accessors[1] = Some(&monday);

        let data = BlobData::with_day_accessors(10, 20, 240, accessors).unwrap();
        assert_eq!(data.day(0).unwrap(), &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        assert_eq!(data.day(1).unwrap(), &monday[..]);
        assert!(data.day(2).is_none());
        assert!(data.days_present().contains(0));
        assert!(data.days_present().contains(1));
    }

    #[test]
    fn with_day_accessors_rejects_an_out_of_range_callable_speed() {
        let bad = FnDaySpeeds::new(6, |bin| if bin == 3 { 400.0 } else { 10.0 });
        let mut accessors: [Option<&dyn DaySpeeds>; 7] = Default::default();
        accessors[0] = Some(&bad);

        let err = BlobData::with_day_accessors(10, 20, 240, accessors).unwrap_err();
        assert!(err.message().contains("day 0"));
        assert!(err.message().contains("bin 3"));
    }
}
