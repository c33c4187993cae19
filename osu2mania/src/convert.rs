use crate::config::ConvertConfig;
use crate::errors::{section_err, ConversionError, MalformedDocumentError, MalformedDocumentErrorKind};
use crate::file::section::{
	extract_section, find_section, SECTION_DIFFICULTY, SECTION_GENERAL, SECTION_HIT_OBJECTS, SECTION_TIMING_POINTS,
};
use crate::reassemble::reassemble;
use crate::timing::TimingModel;
use crate::transform::{transform, ManiaNote};

/// Game mode identifier of osu!standard, the only mode that gets converted.
pub const STANDARD_MODE: u8 = 0;

/// Game mode declared by a document. Beatmaps without a `Mode` field are osu!standard beatmaps.
///
/// # Errors
///
/// Fails if the `Mode` field isn't a number.
pub fn find_mode(document: &str) -> Result<u8, MalformedDocumentError> {
	let Some(general) = find_section(document, SECTION_GENERAL) else {
		return Ok(STANDARD_MODE);
	};

	general.find_field("Mode").map_or(Ok(STANDARD_MODE), |mode| mode.parse())
}

/// Global slider velocity of a document, in hundreds of osu! pixels per beat.
///
/// # Errors
///
/// Fails if `SliderMultiplier` is missing, isn't a number or isn't positive.
pub fn find_base_velocity(document: &str) -> Result<f64, MalformedDocumentError> {
	let difficulty = extract_section(document, SECTION_DIFFICULTY)?;
	let base_velocity: f64 = difficulty.require_field("SliderMultiplier")?.parse()?;

	if base_velocity > 0. && base_velocity.is_finite() {
		Ok(base_velocity)
	} else {
		Err(section_err(SECTION_DIFFICULTY)(
			MalformedDocumentErrorKind::NonPositiveSliderMultiplier(base_velocity),
		))
	}
}

/// Converts an osu!standard beatmap into an osu!mania beatmap.
///
/// The whole document is parsed and transformed before anything is written,
/// so on error no partial beatmap comes out.
///
/// # Errors
///
/// - `UnsupportedMode` if the beatmap isn't an osu!standard beatmap (it should just be skipped);
/// - `MalformedDocument` if a section or field the conversion needs is missing or invalid;
/// - `MalformedHitObject` if a hit object is not a valid hit circle, slider or spinner;
/// - `InvalidConfig` if the settings can't be applied.
pub fn convert(document: &str, config: &ConvertConfig) -> Result<String, ConversionError> {
	config.validate()?;

	let mode = find_mode(document)?;
	if mode != STANDARD_MODE {
		return Err(ConversionError::UnsupportedMode(mode));
	}

	let timing_section = extract_section(document, SECTION_TIMING_POINTS)?;
	let hit_objects_section = extract_section(document, SECTION_HIT_OBJECTS)?;
	let base_velocity = find_base_velocity(document)?;

	let timing = TimingModel::from_section(&timing_section)?;

	let notes = hit_objects_section
		.entries()
		.enumerate()
		.map(|(ordinal, line)| transform(ordinal, line, base_velocity, &timing, config))
		.collect::<Result<Vec<ManiaNote>, _>>()?;

	tracing::debug!(
		"Converted {} hit objects ({} holds) over {} timing points",
		notes.len(),
		notes.iter().filter(|note| note.is_hold()).count(),
		timing.timing_points().len()
	);

	Ok(reassemble(document, &notes, timing.timing_points(), config)?)
}
