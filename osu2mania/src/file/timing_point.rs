use std::num::{ParseFloatError, ParseIntError};

use crate::errors::{MalformedDocumentError, MalformedDocumentErrorKind};
use crate::file::section::Section;
use crate::Timestamp;

/// Value given to the trailing fields a timing point line leaves out.
const PADDING_VALUE: &str = "1";

/// Stored value of an inherited timing point that doesn't change the slider velocity.
pub const DEFAULT_INHERITED_BEAT_LENGTH: f64 = -100.;

/// Timing and control points
#[derive(Clone, Debug, PartialEq)]
pub struct TimingPoint {
	/// Start time of the timing section, in milliseconds from the beginning of the beatmap's audio.
	/// The end of the timing section is the next timing point's time (or never, if this is the last timing point).
	pub time: Timestamp,
	/// This property has two meanings:
	/// - For uninherited timing points, the duration of a beat, in milliseconds.
	/// - For inherited timing points, a negative inverse slider velocity multiplier, as a percentage.
	///   For example, `-50` would make all sliders in this timing section twice as fast as `SliderMultiplier`.
	pub beat_length: f64,
	/// Amount of beats in a measure. Inherited timing points ignore this property.
	pub meter: i32,
	/// Default sample set for hit objects (0 = beatmap default, 1 = normal, 2 = soft, 3 = drum).
	pub sample_set: u8,
	/// Custom sample index for hit objects. `0` indicates osu!'s default hitsounds.
	pub sample_index: u32,
	/// Volume percentage for hit objects.
	pub volume: u8,
	/// Whether or not the timing point is uninherited.
	pub uninherited: bool,
	/// Bit flags that give the timing point extra effects.
	pub effects: u32,
}

impl TimingPoint {
	/// Slider velocity multiplier carried by an inherited timing point.
	///
	/// `None` for uninherited timing points, which carry a beat duration instead.
	#[must_use]
	pub fn slider_velocity_multiplier(&self) -> Option<f64> {
		(!self.uninherited).then(|| -100. / self.beat_length)
	}

	#[must_use]
	pub fn to_osu_string(&self) -> String {
		let Self {
			time,
			beat_length,
			meter,
			sample_set,
			sample_index,
			volume,
			uninherited,
			effects,
		} = self;

		format!(
			"{time},{beat_length},{meter},{sample_set},{sample_index},{volume},{},{effects}",
			u8::from(*uninherited)
		)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum TimingPointParseError {
	#[error("Timing point has less than 2 values ({0})")]
	LessThan2Values(usize),

	#[error("Timing point has more than 8 values ({0})")]
	MoreThan8Values(usize),

	#[error("{0} is not a finite number")]
	NonFinite(f64),

	#[error("Invalid float")]
	InvalidFloat(
		#[from]
		#[source]
		ParseFloatError,
	),

	#[error("Invalid int")]
	InvalidInt(
		#[from]
		#[source]
		ParseIntError,
	),
}

/// Parse a timing point line. Missing trailing fields default to `1`.
///
/// # Errors
///
/// Fails if the line doesn't have between 2 and 8 fields, if a field isn't a number,
/// or if the time or beat length isn't finite.
pub fn parse_timing_point(line: &str) -> Result<TimingPoint, TimingPointParseError> {
	let values: Vec<_> = line.split(',').map(str::trim).collect();

	if values.len() < 2 {
		return Err(TimingPointParseError::LessThan2Values(values.len()));
	}
	if values.len() > 8 {
		return Err(TimingPointParseError::MoreThan8Values(values.len()));
	}

	let mut fields = [PADDING_VALUE; 8];
	for (field, value) in fields.iter_mut().zip(values) {
		*field = value;
	}

	let [time, beat_length, meter, sample_set, sample_index, volume, uninherited, effects] = fields;

	let time: Timestamp = time.parse()?;
	let beat_length: f64 = beat_length.parse()?;
	if let Some(value) = [time, beat_length].into_iter().find(|value| !value.is_finite()) {
		return Err(TimingPointParseError::NonFinite(value));
	}

	Ok(TimingPoint {
		time,
		beat_length,
		meter: meter.parse()?,
		sample_set: sample_set.parse()?,
		sample_index: sample_index.parse()?,
		volume: volume.parse()?,
		uninherited: uninherited.parse::<u8>()? != 0,
		effects: effects.parse()?,
	})
}

/// Parse every timing point of a `[TimingPoints]` section, in document order.
///
/// # Errors
///
/// Fails on the first line that isn't a valid timing point.
pub fn parse_timing_points_section(section: &Section<'_>) -> Result<Vec<TimingPoint>, MalformedDocumentError> {
	section
		.entries()
		.map(|line| {
			parse_timing_point(line).map_err(|kind| {
				MalformedDocumentError::new(
					section.name,
					MalformedDocumentErrorKind::TimingPointParse {
						line: line.to_owned(),
						kind,
					},
				)
			})
		})
		.collect()
}
