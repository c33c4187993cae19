use std::num::{ParseFloatError, ParseIntError};

use crate::config::ConfigError;
use crate::file::hit_object::HitObjectParseError;
use crate::file::timing_point::TimingPointParseError;

/// Reasons a beatmap couldn't be converted.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
	#[error(transparent)]
	MalformedDocument(#[from] MalformedDocumentError),

	/// The beatmap is not an osu!standard beatmap. Not a failure: the beatmap is skipped.
	#[error("Beatmap mode is {0}, only osu!standard (0) beatmaps are converted")]
	UnsupportedMode(u8),

	#[error("Couldn't convert hit object #{index} at line {line:?}")]
	MalformedHitObject {
		index: usize,
		line: String,
		#[source]
		kind: HitObjectParseError,
	},

	#[error("Invalid conversion settings")]
	InvalidConfig(
		#[from]
		#[source]
		ConfigError,
	),
}

impl ConversionError {
	/// Whether the beatmap was skipped rather than rejected.
	#[must_use]
	pub const fn is_skip(&self) -> bool {
		matches!(self, Self::UnsupportedMode(_))
	}
}

#[derive(Debug, thiserror::Error)]
#[error("Malformed beatmap in section [{section}]")]
pub struct MalformedDocumentError {
	pub section: &'static str,
	#[source]
	pub kind: MalformedDocumentErrorKind,
}

impl MalformedDocumentError {
	#[must_use]
	pub fn new(section: &'static str, kind: impl Into<MalformedDocumentErrorKind>) -> Self {
		Self {
			section,
			kind: kind.into(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum MalformedDocumentErrorKind {
	#[error("Section is missing")]
	MissingSection,

	#[error("Field {0} unspecified")]
	MissingField(&'static str),

	#[error(transparent)]
	FieldValueParse(#[from] FieldValueParseError),

	#[error("Could not parse timing point at line {line:?}")]
	TimingPointParse {
		line: String,
		#[source]
		kind: TimingPointParseError,
	},

	#[error("Inherited timing point at {time}ms has no slider velocity (beat length {beat_length})")]
	InvalidSliderVelocity { time: f64, beat_length: f64 },

	#[error("No uninherited timing point")]
	NoUninheritedTimingPoint,

	#[error("Slider multiplier must be positive, got {0}")]
	NonPositiveSliderMultiplier(f64),
}

pub(crate) fn section_err<T: Into<MalformedDocumentErrorKind>>(
	section: &'static str,
) -> impl FnOnce(T) -> MalformedDocumentError {
	move |kind| MalformedDocumentError::new(section, kind)
}

#[derive(Debug, thiserror::Error)]
#[error("Couldn't parse value of field [{field:?}] (value: {value:?})")]
pub struct FieldValueParseError {
	pub field: &'static str,
	pub value: String,
	#[source]
	pub kind: FieldValueParseErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum FieldValueParseErrorKind {
	#[error("Invalid int")]
	InvalidInt(
		#[from]
		#[source]
		ParseIntError,
	),

	#[error("Invalid float")]
	InvalidFloat(
		#[from]
		#[source]
		ParseFloatError,
	),
}
