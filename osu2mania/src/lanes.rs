/// Width in osu! pixels of the playfield. osu!mania splits it evenly between lanes.
pub const PLAYFIELD_WIDTH: u32 = 512;

/// Lane of the hit object at position `ordinal`, cycling through every lane one after the other.
///
/// `starting_lane` is counted from 1, the returned lane from 0.
///
/// # Panics
///
/// Panics if `lane_count` is 0.
#[must_use]
pub fn lane_index(ordinal: usize, lane_count: u32, starting_lane: u32, left_to_right: bool) -> u32 {
	let lane_count = i64::from(lane_count);
	let start = i64::from(starting_lane) - 1;

	// Reduce first, ordinals can be way bigger than lane counts
	let step = i64::try_from(ordinal as u64 % lane_count as u64).unwrap_or_default();

	let lane = if left_to_right { start + step } else { start - step };
	lane.rem_euclid(lane_count) as u32
}

/// x coordinate osu!mania reads back as `lane`: `ceil(512 * lane / lane_count)`.
///
/// # Panics
///
/// Panics if `lane_count` is 0.
#[must_use]
pub fn lane_center_x(lane: u32, lane_count: u32) -> i32 {
	let x = (u64::from(PLAYFIELD_WIDTH) * u64::from(lane)).div_ceil(u64::from(lane_count));
	i32::try_from(x).unwrap_or(i32::MAX)
}
