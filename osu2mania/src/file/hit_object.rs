use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use crate::Timestamp;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct HitSound(u8);

impl fmt::Display for HitSound {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for HitSound {
	type Err = ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(u8::from_str(s)?))
	}
}

/// Extra parameters specific to the object's type.
///
/// Only what the conversion needs is kept: the slider curve and edge sounds are dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum HitObjectKind {
	HitCircle,
	Slider {
		/// Amount of times the player has to follow the slider's curve back-and-forth before
		/// the slider is complete. It can also be interpreted as the repeat count plus one.
		slides: u32,
		/// Visual length in osu! pixels of the slider.
		length: f64,
	},
	/// Note: `x` and `y` do not affect spinners. They default to the center of the playfield, `256,192`.
	Spinner {
		/// End time of the spinner, in milliseconds from the beginning of the beatmap's audio.
		end_time: Timestamp,
	},
}

impl fmt::Display for HitObjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Self::HitCircle => "hitcircle",
			Self::Slider { .. } => "slider",
			Self::Spinner { .. } => "spinner",
		};
		write!(f, "{s}")
	}
}

/// osu!standard hit object
#[derive(Clone, Debug, PartialEq)]
pub struct HitObject {
	/// Horizontal position in osu! pixels of the object.
	pub x: i32,
	/// Vertical position in osu! pixels of the object.
	pub y: i32,
	/// Time when the object is to be hit, in milliseconds from the beginning of the beatmap's audio.
	pub time: Timestamp,
	/// Bit flags indicating the type of the object, as written in the file.
	pub raw_type: u8,
	/// Bit flags indicating the hitsound applied to the object.
	pub hit_sound: HitSound,
	pub kind: HitObjectKind,
	/// Information about which samples are played when the object is hit, left as written.
	/// `None` for sliders, whose samples are not carried over.
	pub hit_sample: Option<String>,
}

impl HitObject {
	/// Position of the bit that signifies whether a hit object is a hit circle in its `type` bit flags.
	pub const RAW_TYPE_HIT_CIRCLE: u8 = 0;
	/// Position of the bit that signifies whether a hit object is a slider in its `type` bit flags.
	pub const RAW_TYPE_SLIDER: u8 = 1;
	/// Position of the bit that signifies whether a hit object is a spinner in its `type` bit flags.
	pub const RAW_TYPE_SPINNER: u8 = 3;
	/// Position of the bit that signifies whether a hit object is an osu!mania hold in its `type` bit flags.
	pub const RAW_TYPE_OSU_MANIA_HOLD: u8 = 7;

	const fn raw_is_base_type(raw_object_type: u8, base_type: u8) -> bool {
		raw_object_type & (1 << base_type) > 0
	}

	#[must_use]
	pub const fn raw_is_hit_circle(raw_object_type: u8) -> bool {
		Self::raw_is_base_type(raw_object_type, Self::RAW_TYPE_HIT_CIRCLE)
	}

	#[must_use]
	pub const fn raw_is_slider(raw_object_type: u8) -> bool {
		Self::raw_is_base_type(raw_object_type, Self::RAW_TYPE_SLIDER)
	}

	#[must_use]
	pub const fn raw_is_spinner(raw_object_type: u8) -> bool {
		Self::raw_is_base_type(raw_object_type, Self::RAW_TYPE_SPINNER)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum HitObjectParseError {
	#[error("Not enough arguments ({0})")]
	NotEnoughArguments(usize),

	#[error("Type {0:#010b} is not exactly one of hit circle, slider or spinner")]
	InvalidObjectType(u8),

	#[error("Wrong number of slider parameters ({0})")]
	WrongSliderParameterCount(usize),

	#[error("Wrong number of spinner parameters ({0})")]
	WrongSpinnerParameterCount(usize),

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

fn finite(value: f64) -> Result<f64, HitObjectParseError> {
	if value.is_finite() {
		Ok(value)
	} else {
		Err(HitObjectParseError::NonFinite(value))
	}
}

/// Parse a hit object line.
///
/// # Errors
///
/// Fails if the line doesn't follow the osu! hit object format,
/// if one of its times or its slider length isn't finite,
/// or if its type is not exactly one of hit circle, slider or spinner.
pub fn parse_hit_object(line: &str) -> Result<HitObject, HitObjectParseError> {
	let args = line.trim().split(',').collect::<Vec<_>>();
	let [x, y, time, object_type, hit_sound, object_params @ ..] = &args[..] else {
		return Err(HitObjectParseError::NotEnoughArguments(args.len()));
	};

	let x = x.parse()?;
	let y = y.parse()?;
	let time = finite(time.parse()?)?;
	let raw_type: u8 = object_type.parse()?;
	let hit_sound = hit_sound.parse()?;

	let kind_bits = (
		HitObject::raw_is_hit_circle(raw_type),
		HitObject::raw_is_slider(raw_type),
		HitObject::raw_is_spinner(raw_type),
	);

	let (kind, hit_sample) = match kind_bits {
		(true, false, false) => {
			let hit_sample = (!object_params.is_empty()).then(|| object_params.join(","));
			(HitObjectKind::HitCircle, hit_sample)
		}
		(false, true, false) => {
			let [_curve_points, slides, length, ..] = object_params else {
				return Err(HitObjectParseError::WrongSliderParameterCount(object_params.len()));
			};

			let kind = HitObjectKind::Slider {
				slides: slides.parse()?,
				length: finite(length.parse()?)?,
			};
			(kind, None)
		}
		(false, false, true) => {
			let [end_time, leftover @ ..] = object_params else {
				return Err(HitObjectParseError::WrongSpinnerParameterCount(object_params.len()));
			};

			let kind = HitObjectKind::Spinner {
				end_time: finite(end_time.parse()?)?,
			};
			(kind, leftover.first().map(|hit_sample| (*hit_sample).to_owned()))
		}
		_ => return Err(HitObjectParseError::InvalidObjectType(raw_type)),
	};

	Ok(HitObject {
		x,
		y,
		time,
		raw_type,
		hit_sound,
		kind,
		hit_sample,
	})
}
