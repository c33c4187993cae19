use crate::config::ConvertConfig;
use crate::errors::ConversionError;
use crate::file::hit_object::{parse_hit_object, HitObject, HitObjectKind, HitSound};
use crate::lanes::lane_center_x;
use crate::timing::TimingModel;
use crate::Timestamp;

/// Type bit flags of an osu!mania hold.
pub const MANIA_HOLD_TYPE: u8 = 1 << HitObject::RAW_TYPE_OSU_MANIA_HOLD;

/// Hit sample written on holds that have none.
pub const DEFAULT_HIT_SAMPLE: &str = "0:0:0:0:";

/// osu!mania note or hold.
#[derive(Clone, Debug, PartialEq)]
pub struct ManiaNote {
	/// Lane of the note, in `[0, lane_count)`.
	pub lane: u32,
	/// Horizontal position osu!mania reads the lane from.
	pub x: i32,
	/// Vertical position, ignored by osu!mania.
	pub y: i32,
	pub start_time: Timestamp,
	/// End of the hold. `None` for normal notes.
	pub end_time: Option<Timestamp>,
	/// Type bit flags. Normal notes keep the ones of the hit circle they come from.
	pub raw_type: u8,
	pub hit_sound: HitSound,
	pub hit_sample: Option<String>,
}

impl ManiaNote {
	#[must_use]
	pub const fn is_hold(&self) -> bool {
		self.end_time.is_some()
	}

	/// Hit object line of the note.
	///
	/// Hold end times are rounded to the millisecond.
	#[must_use]
	pub fn to_osu_string(&self) -> String {
		let Self {
			x,
			y,
			start_time,
			raw_type,
			hit_sound,
			..
		} = self;

		let head = format!("{x},{y},{start_time},{raw_type},{hit_sound}");
		match (self.end_time, &self.hit_sample) {
			(Some(end_time), hit_sample) => {
				let hit_sample = hit_sample.as_deref().unwrap_or(DEFAULT_HIT_SAMPLE);
				format!("{head},{}:{hit_sample}", end_time.round())
			}
			(None, Some(hit_sample)) => format!("{head},{hit_sample}"),
			(None, None) => head,
		}
	}
}

/// Converts the hit object at position `ordinal` into an osu!mania note.
///
/// - hit circles stay normal notes, or become holds of `hold_length_beats` beats;
/// - sliders become holds lasting as long as the slider;
/// - spinners become holds ending with the spinner.
///
/// Slider edge sounds and samples are not carried over to the hold.
#[must_use]
pub fn transform_hit_object(
	ordinal: usize,
	hit_object: &HitObject,
	base_velocity: f64,
	timing: &TimingModel,
	config: &ConvertConfig,
) -> ManiaNote {
	let time = hit_object.time;
	let beat_length = timing.beat_length_at(time);

	let (end_time, raw_type, hit_sample) = match hit_object.kind {
		HitObjectKind::HitCircle if config.hold_length_beats == 0. => {
			(None, hit_object.raw_type, hit_object.hit_sample.clone())
		}
		HitObjectKind::HitCircle => {
			let end_time = time + beat_length * config.hold_length_beats;
			(Some(end_time), MANIA_HOLD_TYPE, hit_object.hit_sample.clone())
		}
		HitObjectKind::Slider { slides, length } => {
			let slider_velocity = base_velocity * timing.multiplier_at(time);
			let end_time = time + beat_length * f64::from(slides) * length / (100. * slider_velocity);
			(Some(end_time), MANIA_HOLD_TYPE, None)
		}
		HitObjectKind::Spinner { end_time } => (Some(end_time), MANIA_HOLD_TYPE, hit_object.hit_sample.clone()),
	};

	let lane = config.lane_of(ordinal);

	ManiaNote {
		lane,
		x: lane_center_x(lane, config.lane_count),
		y: hit_object.y,
		start_time: time,
		end_time,
		raw_type,
		hit_sound: hit_object.hit_sound,
		hit_sample,
	}
}

/// Parses the hit object line at position `ordinal` and converts it into an osu!mania note.
///
/// # Errors
///
/// Fails with `MalformedHitObject` if the line is not a valid hit circle, slider or spinner.
pub fn transform(
	ordinal: usize,
	line: &str,
	base_velocity: f64,
	timing: &TimingModel,
	config: &ConvertConfig,
) -> Result<ManiaNote, ConversionError> {
	let hit_object = parse_hit_object(line).map_err(|kind| ConversionError::MalformedHitObject {
		index: ordinal,
		line: line.to_owned(),
		kind,
	})?;

	let note = transform_hit_object(ordinal, &hit_object, base_velocity, timing, config);
	tracing::trace!(
		"{} at {}ms -> lane {} (end: {:?})",
		hit_object.kind,
		hit_object.time,
		note.lane,
		note.end_time
	);

	Ok(note)
}
