//! Conversion of osu!standard beatmaps into osu!mania beatmaps.
//!
//! Every hit object becomes a note (hit circles) or a hold (sliders, spinners, and
//! optionally hit circles) on a lane picked by cycling through the lanes, one object after the other.
//! Everything else in the `.osu` file is kept as is, except for the few fields
//! that make it an osu!mania beatmap.

pub mod config;
pub mod convert;
pub mod errors;
pub mod file;
pub mod lanes;
pub mod reassemble;
pub mod timing;
pub mod transform;
mod utils;

pub use config::ConvertConfig;
pub use convert::convert;
pub use errors::*;

pub type Timestamp = f64;
