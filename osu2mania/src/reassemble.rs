use std::ops::Range;

use crate::config::ConvertConfig;
use crate::errors::MalformedDocumentError;
use crate::file::section::{
	extract_section, Section, SECTION_DIFFICULTY, SECTION_GENERAL, SECTION_HIT_OBJECTS, SECTION_METADATA,
	SECTION_TIMING_POINTS,
};
use crate::file::timing_point::{TimingPoint, DEFAULT_INHERITED_BEAT_LENGTH};
use crate::transform::ManiaNote;
use crate::utils::newline_of;

/// Game mode identifier of osu!mania.
pub const MANIA_MODE: u8 = 3;

/// Appended to the difficulty name of converted beatmaps.
pub const VERSION_MARKER: &str = " (mania)";

/// Replacement of a span of the original document.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Splice {
	span: Range<usize>,
	replacement: String,
}

/// Rewrites parts of a document while leaving everything else byte for byte as it was.
///
/// Every span refers to the original document and splices must not overlap.
#[derive(Debug)]
pub struct Reassembler<'a> {
	document: &'a str,
	newline: &'static str,
	splices: Vec<Splice>,
}

impl<'a> Reassembler<'a> {
	#[must_use]
	pub fn new(document: &'a str) -> Self {
		Self {
			document,
			newline: newline_of(document),
			splices: Vec::new(),
		}
	}

	fn splice(&mut self, span: Range<usize>, replacement: String) {
		self.splices.push(Splice { span, replacement });
	}

	/// Replaces the content of a section with the given lines.
	///
	/// A blank line separates the section from the next one, if any.
	pub fn replace_section_content<I>(&mut self, section: &Section<'a>, lines: I)
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		let newline = self.newline;
		let mut content = String::new();

		// The header is the very last line of the document
		if section.content_span.start == section.header_span.end {
			content.push_str(newline);
		}

		for line in lines {
			content.push_str(line.as_ref());
			content.push_str(newline);
		}

		if section.content_span.end < self.document.len() {
			content.push_str(newline);
		}

		self.splice(section.content_span.clone(), content);
	}

	/// Replaces the value of a `key: value` field of a section, or inserts the field right after the section header.
	pub fn set_field(&mut self, section: &Section<'a>, key: &'static str, value: &str) {
		if let Some(field) = section.find_field(key) {
			self.splice(field.value_span, value.to_owned());
		} else {
			self.insert_field(section, key, value);
		}
	}

	/// Replaces the value of a `key: value` field of a section.
	///
	/// # Errors
	///
	/// Fails with a `MissingField` error if the section doesn't specify the field.
	pub fn replace_field(&mut self, section: &Section<'a>, key: &'static str, value: &str) -> Result<(), MalformedDocumentError> {
		let field = section.require_field(key)?;
		self.splice(field.value_span, value.to_owned());
		Ok(())
	}

	/// Appends text to the value of a `key: value` field of a section.
	///
	/// # Errors
	///
	/// Fails with a `MissingField` error if the section doesn't specify the field.
	pub fn append_to_field(&mut self, section: &Section<'a>, key: &'static str, suffix: &str) -> Result<(), MalformedDocumentError> {
		let field = section.require_field(key)?;
		self.splice(field.value_span.end..field.value_span.end, suffix.to_owned());
		Ok(())
	}

	fn insert_field(&mut self, section: &Section<'a>, key: &'static str, value: &str) {
		let newline = self.newline;
		let at = section.content_span.start;

		let line = if at == section.header_span.end {
			format!("{newline}{key}: {value}")
		} else {
			format!("{key}: {value}{newline}")
		};

		self.splice(at..at, line);
	}

	/// Applies every splice to the original document.
	///
	/// Splices must not overlap. Debug builds panic on overlaps, release builds skip the overlapping text.
	#[must_use]
	pub fn finish(mut self) -> String {
		self.splices.sort_by_key(|splice| (splice.span.start, splice.span.end));

		let mut output = String::with_capacity(self.document.len());
		let mut cursor = 0;
		for Splice { span, replacement } in self.splices {
			debug_assert!(span.start >= cursor, "overlapping splices at byte {}", span.start);

			let start = span.start.max(cursor);
			output.push_str(&self.document[cursor..start]);
			output.push_str(&replacement);
			cursor = span.end.max(start);
		}
		output.push_str(&self.document[cursor..]);

		output
	}
}

/// Resets the slider velocity of every inherited timing point to x1.00.
#[must_use]
pub fn equalize_slider_velocities(timing_points: &[TimingPoint]) -> Vec<TimingPoint> {
	timing_points
		.iter()
		.map(|timing_point| {
			if timing_point.uninherited {
				timing_point.clone()
			} else {
				TimingPoint {
					beat_length: DEFAULT_INHERITED_BEAT_LENGTH,
					..timing_point.clone()
				}
			}
		})
		.collect()
}

/// Writes converted notes and osu!mania metadata back into the original document.
///
/// - `[HitObjects]` gets one line per note, in order;
/// - `Mode` becomes osu!mania, inserted after the `[General]` header if it isn't there;
/// - `CircleSize` becomes the lane count;
/// - `Version` gets the ` (mania)` marker;
/// - with `equalize_velocity`, inherited timing points all go back to x1.00.
///
/// # Errors
///
/// Fails if a section or field to rewrite is missing. Nothing is produced in that case.
pub fn reassemble(
	document: &str,
	notes: &[ManiaNote],
	timing_points: &[TimingPoint],
	config: &ConvertConfig,
) -> Result<String, MalformedDocumentError> {
	let general = extract_section(document, SECTION_GENERAL)?;
	let metadata = extract_section(document, SECTION_METADATA)?;
	let difficulty = extract_section(document, SECTION_DIFFICULTY)?;
	let hit_objects = extract_section(document, SECTION_HIT_OBJECTS)?;

	let mut reassembler = Reassembler::new(document);

	reassembler.set_field(&general, "Mode", &MANIA_MODE.to_string());
	reassembler.append_to_field(&metadata, "Version", VERSION_MARKER)?;
	reassembler.replace_field(&difficulty, "CircleSize", &config.lane_count.to_string())?;

	if config.equalize_velocity {
		let timing = extract_section(document, SECTION_TIMING_POINTS)?;
		let timing_points = equalize_slider_velocities(timing_points);
		reassembler.replace_section_content(&timing, timing_points.iter().map(TimingPoint::to_osu_string));
	}

	reassembler.replace_section_content(&hit_objects, notes.iter().map(ManiaNote::to_osu_string));

	Ok(reassembler.finish())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::errors::MalformedDocumentErrorKind;
	use crate::file::timing_point::parse_timing_point;

	#[test]
	fn splices_leave_the_rest_untouched() {
		let document = "[General]\r\nMode: 0\r\n\r\n[HitObjects]\r\n1,2,3,1,0\r\n";
		let general = extract_section(document, SECTION_GENERAL).unwrap();
		let hit_objects = extract_section(document, SECTION_HIT_OBJECTS).unwrap();

		let mut reassembler = Reassembler::new(document);
		reassembler.set_field(&general, "Mode", "3");
		reassembler.replace_section_content(&hit_objects, ["0,2,3,1,0", "128,2,4,1,0"]);

		assert_eq!(reassembler.finish(), "[General]\r\nMode: 3\r\n\r\n[HitObjects]\r\n0,2,3,1,0\r\n128,2,4,1,0\r\n");
	}

	#[test]
	fn missing_mode_is_inserted_after_the_header() {
		let document = "[General]\nAudioFilename: audio.mp3\n";
		let general = extract_section(document, SECTION_GENERAL).unwrap();

		let mut reassembler = Reassembler::new(document);
		reassembler.set_field(&general, "Mode", "3");

		assert_eq!(reassembler.finish(), "[General]\nMode: 3\nAudioFilename: audio.mp3\n");
	}

	#[test]
	fn field_inserted_after_a_header_ending_the_document() {
		let document = "[General]";
		let general = extract_section(document, SECTION_GENERAL).unwrap();

		let mut reassembler = Reassembler::new(document);
		reassembler.set_field(&general, "Mode", "3");

		assert_eq!(reassembler.finish(), "[General]\nMode: 3");
	}

	#[test]
	fn section_followed_by_another_gets_a_blank_line() {
		let document = "[TimingPoints]\n0,500,4,2,0,100,1,0\n[HitObjects]\n";
		let timing = extract_section(document, SECTION_TIMING_POINTS).unwrap();

		let mut reassembler = Reassembler::new(document);
		reassembler.replace_section_content(&timing, ["0,500,4,2,0,100,1,0"]);

		assert_eq!(reassembler.finish(), "[TimingPoints]\n0,500,4,2,0,100,1,0\n\n[HitObjects]\n");
	}

	#[test]
	fn version_keeps_its_separator() {
		let document = "[Metadata]\nVersion:Insane\n";
		let metadata = extract_section(document, SECTION_METADATA).unwrap();

		let mut reassembler = Reassembler::new(document);
		reassembler.append_to_field(&metadata, "Version", VERSION_MARKER).unwrap();

		assert_eq!(reassembler.finish(), "[Metadata]\nVersion:Insane (mania)\n");
	}

	#[test]
	fn missing_circle_size() {
		let document = "[Difficulty]\nSliderMultiplier:1.4\n";
		let difficulty = extract_section(document, SECTION_DIFFICULTY).unwrap();

		let mut reassembler = Reassembler::new(document);
		let err = reassembler.replace_field(&difficulty, "CircleSize", "4").unwrap_err();

		assert!(matches!(err.kind, MalformedDocumentErrorKind::MissingField("CircleSize")));
	}

	#[test]
	#[cfg(debug_assertions)]
	#[should_panic(expected = "overlapping splices")]
	fn overlapping_splices() {
		let document = "[General]\nMode: 0\n";
		let general = extract_section(document, SECTION_GENERAL).unwrap();

		let mut reassembler = Reassembler::new(document);
		reassembler.replace_section_content(&general, ["Mode: 3"]);
		reassembler.set_field(&general, "Mode", "3");
		let _ = reassembler.finish();
	}

	#[test]
	fn velocities_are_equalized() {
		let timing_points = vec![
			parse_timing_point("0,500,4,2,0,100,1,0").unwrap(),
			parse_timing_point("1000,-50,4,2,0,80,0,1").unwrap(),
		];

		let equalized = equalize_slider_velocities(&timing_points);

		assert_eq!(equalized[0], timing_points[0]);
		assert_eq!(equalized[1].to_osu_string(), "1000,-100,4,2,0,80,0,1");
		assert_eq!(equalized[1].slider_velocity_multiplier(), Some(1.));
	}
}
