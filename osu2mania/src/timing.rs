use std::iter;

use crate::errors::{section_err, MalformedDocumentError, MalformedDocumentErrorKind};
use crate::file::section::Section;
use crate::file::timing_point::{parse_timing_points_section, TimingPoint};
use crate::Timestamp;

/// Value of the virtual point scanned before the first real one.
const LEADING_VALUE: f64 = 1.;
/// Time of the virtual point scanned after the last real one.
const TERMINAL_TIME: Timestamp = -1.;

/// Piecewise-constant function of time.
///
/// Each `(time, value)` point holds its value on `[time, next point's time)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseFunction {
	points: Vec<(Timestamp, f64)>,
}

impl PiecewiseFunction {
	/// Creates a function from points in chronological order. `None` if there are no points.
	#[must_use]
	pub fn new(points: Vec<(Timestamp, f64)>) -> Option<Self> {
		(!points.is_empty()).then_some(Self { points })
	}

	/// A function that has the same value everywhere.
	#[must_use]
	pub fn constant(value: f64) -> Self {
		Self { points: vec![(0., value)] }
	}

	#[must_use]
	pub fn points(&self) -> &[(Timestamp, f64)] {
		&self.points
	}

	/// Value active at `time`.
	///
	/// Scans every point along with its successor's time, starting from a virtual
	/// point of value `1` and ending on a virtual successor at `-1ms`.
	/// The first value whose successor starts strictly after `time` wins, so a point
	/// stamped exactly at `time` is active. Past the last point, the last value holds.
	#[must_use]
	pub fn value_at(&self, time: Timestamp) -> f64 {
		let values = iter::once(LEADING_VALUE).chain(self.points.iter().map(|&(_, value)| value));
		let next_times = self.points.iter().map(|&(time, _)| time).chain(iter::once(TERMINAL_TIME));

		values
			.zip(next_times)
			.find_map(|(value, next_time)| (next_time > time).then_some(value))
			.unwrap_or_else(|| self.last_value())
	}

	fn last_value(&self) -> f64 {
		self.points.last().map_or(LEADING_VALUE, |&(_, value)| value)
	}
}

/// Beat durations and slider velocity multipliers of a beatmap over time.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingModel {
	timing_points: Vec<TimingPoint>,
	beat_lengths: PiecewiseFunction,
	slider_multipliers: PiecewiseFunction,
}

impl TimingModel {
	/// Parses a `[TimingPoints]` section and builds its model.
	///
	/// # Errors
	///
	/// Fails if a line isn't a valid timing point, or for the same reasons as [`TimingModel::new`].
	pub fn from_section(section: &Section<'_>) -> Result<Self, MalformedDocumentError> {
		let timing_points = parse_timing_points_section(section)?;
		Self::new(timing_points).map_err(section_err(section.name))
	}

	/// Splits timing points into tempo changes (uninherited) and slider velocity changes (inherited).
	///
	/// # Errors
	///
	/// Fails if there is no uninherited timing point, or if an inherited one has no finite multiplier.
	pub fn new(timing_points: Vec<TimingPoint>) -> Result<Self, MalformedDocumentErrorKind> {
		let mut beat_lengths = Vec::new();
		let mut slider_multipliers = Vec::new();

		if timing_points.windows(2).any(|pair| pair[1].time < pair[0].time) {
			tracing::warn!("Timing points are not in chronological order, they are looked up in document order");
		}

		for timing_point in &timing_points {
			match timing_point.slider_velocity_multiplier() {
				None => beat_lengths.push((timing_point.time, timing_point.beat_length)),
				Some(multiplier) if multiplier.is_finite() => slider_multipliers.push((timing_point.time, multiplier)),
				Some(_) => {
					return Err(MalformedDocumentErrorKind::InvalidSliderVelocity {
						time: timing_point.time,
						beat_length: timing_point.beat_length,
					});
				}
			}
		}

		let beat_lengths =
			PiecewiseFunction::new(beat_lengths).ok_or(MalformedDocumentErrorKind::NoUninheritedTimingPoint)?;

		// No inherited points means the velocity never changes
		let slider_multipliers = PiecewiseFunction::new(slider_multipliers).unwrap_or_else(|| PiecewiseFunction::constant(1.));

		Ok(Self {
			timing_points,
			beat_lengths,
			slider_multipliers,
		})
	}

	/// Duration of a beat at `time`, in milliseconds.
	#[must_use]
	pub fn beat_length_at(&self, time: Timestamp) -> f64 {
		self.beat_lengths.value_at(time)
	}

	/// Slider velocity multiplier at `time`.
	#[must_use]
	pub fn multiplier_at(&self, time: Timestamp) -> f64 {
		self.slider_multipliers.value_at(time)
	}

	/// Timing points the model was built from, in document order.
	#[must_use]
	pub fn timing_points(&self) -> &[TimingPoint] {
		&self.timing_points
	}

	#[must_use]
	pub const fn beat_lengths(&self) -> &PiecewiseFunction {
		&self.beat_lengths
	}

	#[must_use]
	pub const fn slider_multipliers(&self) -> &PiecewiseFunction {
		&self.slider_multipliers
	}
}
