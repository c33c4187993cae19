use crate::lanes::lane_index;

/// Most lanes an osu!mania beatmap can have.
pub const MAX_LANE_COUNT: u32 = 18;

/// Settings of a conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertConfig {
	/// Amount of lanes (keys) of the converted beatmap.
	pub lane_count: u32,
	/// Length in beats of the holds hit circles are turned into. `0` keeps hit circles as normal notes.
	pub hold_length_beats: f64,
	/// Lane of the first hit object, counted from 1.
	pub starting_lane: u32,
	/// Whether successive hit objects move to the right (or to the left) of the previous one.
	pub left_to_right: bool,
	/// Whether to reset every slider velocity change to x1.00.
	///
	/// Hold durations already account for the slider velocity,
	/// keeping the changes would only make the scroll speed jump around.
	pub equalize_velocity: bool,
}

impl Default for ConvertConfig {
	fn default() -> Self {
		Self {
			lane_count: 4,
			hold_length_beats: 0.,
			starting_lane: 1,
			left_to_right: true,
			equalize_velocity: true,
		}
	}
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
	#[error("Lane count must be at least 1")]
	NoLanes,

	#[error("Lane count {0} is above the osu!mania maximum of {max}", max = MAX_LANE_COUNT)]
	TooManyLanes(u32),

	#[error("Starting lane {starting_lane} is not between 1 and {lane_count}")]
	StartingLaneOutOfRange { starting_lane: u32, lane_count: u32 },

	#[error("Hold length must be a non-negative number of beats, got {0}")]
	InvalidHoldLength(f64),
}

impl ConvertConfig {
	/// Checks that the settings describe a playable conversion.
	///
	/// # Errors
	///
	/// Fails if there are no lanes or too many, if the starting lane doesn't exist or if the hold length is negative or not finite.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.lane_count == 0 {
			return Err(ConfigError::NoLanes);
		}

		if self.lane_count > MAX_LANE_COUNT {
			return Err(ConfigError::TooManyLanes(self.lane_count));
		}

		if !(1..=self.lane_count).contains(&self.starting_lane) {
			return Err(ConfigError::StartingLaneOutOfRange {
				starting_lane: self.starting_lane,
				lane_count: self.lane_count,
			});
		}

		if !self.hold_length_beats.is_finite() || self.hold_length_beats < 0. {
			return Err(ConfigError::InvalidHoldLength(self.hold_length_beats));
		}

		Ok(())
	}

	/// Lane of the hit object at position `ordinal` in the beatmap.
	#[must_use]
	pub fn lane_of(&self, ordinal: usize) -> u32 {
		lane_index(ordinal, self.lane_count, self.starting_lane, self.left_to_right)
	}
}
