//! The orchestrator: composes flex-float quantization, delta coding,
//! zig-zag mapping, varint framing, and zlib compression into the full PSP
//! blob wire format, and back.
//!
//! Blob layout (bytes, in order):
//!
//! | offset | name         | width | meaning                               |
//! |--------|--------------|-------|----------------------------------------|
//! | 0      | version      | 1     | current = [`BlobCodec::VERSION`]       |
//! | 1      | weekDaySpeed | 1     | mean working-day speed, km/h           |
//! | 2      | weekendSpeed | 1     | mean weekend-day speed, km/h           |
//! | 3      | outRes       | 1     | present iff profiles exist             |
//! | 4      | daysBitSet   | 1     | present iff profiles exist             |
//! | 5..    | payload      | ≥11   | zlib(payloadPlain) when compression on |

use crate::data::BlobData;
use crate::deflate;
use crate::error::{PspError, Result};
use crate::flex_float;
use crate::header::{self, DaysPresent, DAY_COUNT};
use crate::varint;
use crate::zigzag;

/// The current wire-format version. Decoders accept any `version <=
/// VERSION` (backward compatibility) and reject anything newer.
pub const VERSION: u8 = 1;

/// Smallest non-zero input that survives flex-float encoding.
pub const MIN_NON_ZERO_INPUT: f64 = flex_float::MIN_NON_ZERO_INPUT;

/// Smallest non-zero representable flex-float output.
pub const MIN_NON_ZERO_OUTPUT: f64 = flex_float::MIN_NON_ZERO_OUTPUT;

/// Minutes per day; profile resolutions must evenly divide this.
const MINUTES_PER_DAY: u16 = 1440;

/// Stateless namespace for the blob codec's public operations.
///
/// There is no instance state: every call is a pure transformation on its
/// arguments, so `BlobCodec` is a unit struct in the same spirit as a
/// free-function module, kept as a type purely for call-site grouping
/// (`BlobCodec::encode(...)`, `BlobCodec::decode(...)`, ...).
pub struct BlobCodec;

impl BlobCodec {
    /// Encodes `data` into a wire blob. Compression is always on; the
    /// uncompressed variant exists only for this crate's own tests.
    pub fn encode(data: &BlobData) -> Result<Vec<u8>> {
        Self::encode_impl(data, true)
    }

    /// Decodes a wire blob produced by [`BlobCodec::encode`] (or any
    /// interoperable encoder sharing this wire format).
    pub fn decode(bytes: &[u8]) -> Result<BlobData> {
        Self::decode_impl(bytes, true)
    }

    /// Whether `bytes` carries a version this decoder understands.
    ///
    /// Returns `false` (rather than erroring) if `bytes` is empty — there's
    /// no version byte to examine.
    pub fn has_supported_version(bytes: &[u8]) -> bool {
        matches!(bytes.first(), Some(&v) if v <= VERSION)
    }

    /// Overwrites only the mean-speed bytes (offsets 1 and 2) of an
    /// already-encoded blob, in place.
    ///
    /// This two-byte write is not atomic; callers must not run it
    /// concurrently with another reader of the same buffer, and callers
    /// needing atomicity must copy the buffer first.
    pub fn set_mean_speeds(bytes: &mut [u8], week_day_speed: u8, weekend_speed: u8) -> Result<()> {
        let version = Self::version_byte(bytes)?;
        if version > VERSION {
            return Err(PspError::new(format!(
                "unsupported version {version} (expected <= {VERSION})"
            )));
        }
        if bytes.len() < 3 {
            return Err(PspError::new(
                "blob is too short to hold mean-speed bytes",
            ));
        }
        bytes[1] = week_day_speed;
        bytes[2] = weekend_speed;
        Ok(())
    }

    /// Convenience: the speed `s` actually becomes after a round trip
    /// through flex-float quantization.
    pub fn as_encoded(s: f64) -> f64 {
        flex_float::as_encoded(s)
    }

    /// Renders a speed without a trailing `.0` for integral results.
    pub fn to_text(value: f64) -> String {
        flex_float::to_text(value)
    }

    fn version_byte(bytes: &[u8]) -> Result<u8> {
        bytes
            .first()
            .copied()
            .ok_or_else(|| PspError::new("blob is empty, expected a version byte"))
    }

    /// The full encoder, with the compression stage made optional for this
    /// crate's own round-trip tests against the uncompressed payload.
    fn encode_impl(data: &BlobData, compress: bool) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(5);
        out.push(VERSION);
        out.push(data.week_day_speed());
        out.push(data.weekend_speed());

        let days = data.days_present();
        if days.to_byte() == 0 {
            // No profiles: exactly 3 bytes, regardless of any stored resolution.
            return Ok(out);
        }

        let resolution = data.time_resolution_minutes();
        let out_res = header::encode_resolution(resolution)?;
        out.push(out_res);
        out.push(days.to_byte());

        let bins_per_day = (MINUTES_PER_DAY / resolution) as usize;
        let mut payload_plain = Vec::with_capacity(estimated_payload_capacity(bins_per_day));
        let mut prev: i16 = 0;

        for d in days.iter() {
            let accessor = data
                .day_accessor(d)
                .expect("day marked present in the bitset must have an accessor");
            if accessor.bin_count() != bins_per_day {
                return Err(PspError::new(format!(
                    "day {d} has {} bins, expected {bins_per_day} at resolution {resolution}",
                    accessor.bin_count()
                )));
            }
            for bin in 0..bins_per_day {
                let s = accessor.speed_at(bin);
                if !(0.0..=255.0).contains(&s) {
                    return Err(PspError::new(format!(
                        "day {d} bin {bin} has speed {s}, outside [0, 255]"
                    )));
                }
                let curr = i16::try_from(flex_float::encode(s)).expect("flex-float code fits in i16");
                let delta = curr.wrapping_sub(prev);
                varint::write(zigzag::encode(delta), &mut payload_plain);
                prev = curr;
            }
        }

        let payload = if compress {
            deflate::compress(&payload_plain)?
        } else {
            payload_plain
        };
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// The full decoder, mirroring [`Self::encode_impl`]'s compression toggle.
    fn decode_impl(bytes: &[u8], compressed: bool) -> Result<BlobData> {
        let version = Self::version_byte(bytes)?;
        if version > VERSION {
            return Err(PspError::new(format!(
                "unsupported version {version} (expected <= {VERSION})"
            )));
        }

        let week_day_speed = *bytes
            .get(1)
            .ok_or_else(|| PspError::new("blob truncated before the week-day mean speed byte"))?;
        let weekend_speed = *bytes
            .get(2)
            .ok_or_else(|| PspError::new("blob truncated before the weekend mean speed byte"))?;

        if bytes.len() == 3 {
            return Ok(BlobData::means_only(week_day_speed, weekend_speed));
        }

        let out_res = *bytes
            .get(3)
            .ok_or_else(|| PspError::new("blob truncated before the resolution byte"))?;
        let days_byte = *bytes
            .get(4)
            .ok_or_else(|| PspError::new("blob truncated before the days-present byte"))?;

        let days = DaysPresent::from_byte(days_byte);
        let resolution = header::decode_resolution(out_res);
        if resolution == 0 || MINUTES_PER_DAY % resolution != 0 {
            return Err(PspError::new(format!(
                "resolution byte decodes to {resolution}, which does not divide {MINUTES_PER_DAY}"
            )));
        }
        let bins_per_day = (MINUTES_PER_DAY / resolution) as usize;

        let payload_bytes = &bytes[5..];
        let payload_plain = if compressed {
            deflate::decompress(payload_bytes)?
        } else {
            payload_bytes.to_vec()
        };

        let mut day_speeds: [Option<Vec<f64>>; DAY_COUNT] = Default::default();
        let mut pos = 0usize;
        let mut prev: i16 = 0;

        for d in days.iter() {
            let mut speeds = Vec::with_capacity(bins_per_day);
            for _ in 0..bins_per_day {
                let zz = varint::read(&payload_plain, &mut pos)?;
                let delta = zigzag::decode(zz);
                prev = prev.wrapping_add(delta);
                speeds.push(flex_float::decode(prev as u16));
            }
            day_speeds[d] = Some(speeds);
        }

        Ok(BlobData::from_decoded_parts(
            week_day_speed,
            weekend_speed,
            resolution,
            day_speeds,
        ))
    }
}

/// Non-normative allocation hint: the worst-case uncompressed payload length
/// for a day of `bins_per_day` bins is `bins_per_day * 7 * 2` bytes (3 bytes
/// per value is possible only for the very first value; deltas thereafter
/// are usually small). Rounded up to the next power of two, floored at 128.
fn estimated_payload_capacity(bins_per_day: usize) -> usize {
    let worst_case = bins_per_day * DAY_COUNT * 2;
    let mut cap = 128usize;
    while cap < worst_case {
        cap *= 2;
    }
    cap
}
