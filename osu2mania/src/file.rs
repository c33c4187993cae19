//! Reading the parts of a `.osu` document that take part in the conversion.

pub mod hit_object;
pub mod section;
pub mod timing_point;
