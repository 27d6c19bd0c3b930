//! # psp-blob-codec
//!
//! A codec for Premium Speed-Profile (PSP) blobs: compact binary records
//! describing the speed a vehicle can expect to travel along a road
//! segment. Every blob carries two mandatory mean speeds (weekday and
//! weekend, km/h); it may additionally carry a 24-hour speed profile for any
//! subset of the seven days of the week, sampled at a configurable
//! resolution that evenly divides a day.
//!
//! ## Pipeline
//!
//! Encoding layers four independent transforms, each in its own module:
//!
//! 1. [`flex_float`] — quantizes a speed (km/h, `f64`) to a 10-bit
//!    floating-point code, trading precision for range the way audio codecs
//!    trade precision for loudness.
//! 2. Delta coding (inline in [`codec`]) — each profile is a sequence of
//!    codes that tend to be close to their neighbor, so only the first is
//!    stored in full; the rest are differences. The running difference is
//!    never reset between days — the whole week is one contiguous delta
//!    chain.
//! 3. [`zigzag`] — maps the signed deltas to unsigned integers so that
//!    small deltas of either sign stay numerically small.
//! 4. [`varint`] — packs those small unsigned integers into 1–3 bytes each,
//!    base-128, instead of a fixed 2 bytes.
//! 5. [`deflate`] — the assembled byte stream is zlib-compressed as a final
//!    pass, catching the redundancy the earlier stages don't model.
//!
//! [`header`] frames the two bytes that describe a profile's shape (time
//! resolution and which days are present), and [`data`] holds the
//! in-memory [`BlobData`] these stages produce and consume. [`codec`]
//! orchestrates all of it behind [`BlobCodec`], the only type most callers
//! need.
//!
//! ## Example
//!
//! ```rust
//! use psp_blob_codec::{BlobCodec, BlobData};
//!
//! // Means only: two bytes for the mean speeds, nothing else.
//! let means_only = BlobData::means_only(81, 87);
//! let bytes = BlobCodec::encode(&means_only).unwrap();
//! assert_eq!(bytes, vec![1, 81, 87]);
//!
//! // A single day's profile at 4-hour resolution (6 bins/day).
//! let mut days: [Option<Vec<f64>>; 7] = Default::default();
//! days[0] = Some(vec![60.0, 40.0, 45.0, 50.0, 45.0, 50.0]); // Sunday
//! let with_profile = BlobData::with_profiles(81, 87, 240, days).unwrap();
//!
//! let bytes = BlobCodec::encode(&with_profile).unwrap();
//! let decoded = BlobCodec::decode(&bytes).unwrap();
//! assert_eq!(decoded.week_day_speed(), 81);
//! assert!(decoded.day(0).is_some());
//! assert!(decoded.day(1).is_none());
//! ```
//!
//! ## Lossy quantization
//!
//! Profile speeds round-trip through [`flex_float`], not bit-for-bit. Use
//! [`BlobCodec::as_encoded`] to see what a given input speed becomes once
//! stored, before committing it to a blob.
//!
//! ```rust
//! # use psp_blob_codec::BlobCodec;
//! assert_eq!(BlobCodec::as_encoded(2.0), 2.0);
//! assert!((BlobCodec::as_encoded(100.3) - 100.0).abs() < 1.0);
//! ```
//!
//! ## Computing speeds on demand
//!
//! [`BlobData::with_profiles`] wants each day as an already-built
//! `Vec<f64>`. A caller whose speeds come from something else — a formula,
//! a lazily-loaded row — can implement [`DaySpeeds`] directly, or wrap a
//! closure in [`FnDaySpeeds`], and hand that to
//! [`BlobData::with_day_accessors`] instead.
//!
//! ```rust
//! use psp_blob_codec::{BlobCodec, BlobData, DaySpeeds, FnDaySpeeds};
//!
//! let sunday = FnDaySpeeds::new(6, |bin| 30.0 + bin as f64 * 5.0);
//! let mut days: [Option<&dyn DaySpeeds>; 7] = Default::default();
//! days[0] = Some(&sunday);
//!
//! let data = BlobData::with_day_accessors(70, 65, 240, days).unwrap();
//! let bytes = BlobCodec::encode(&data).unwrap();
//! assert!(BlobCodec::decode(&bytes).unwrap().day(0).is_some());
//! ```

pub mod codec;
pub mod data;
pub mod deflate;
pub mod error;
pub mod flex_float;
pub mod header;
pub mod varint;
pub mod zigzag;

pub use codec::BlobCodec;
pub use data::{BlobData, DaySpeeds, FnDaySpeeds};
pub use error::{PspError, Result};
pub use header::DaysPresent;
