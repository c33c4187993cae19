use std::ops::Range;
use std::str::FromStr;

use crate::errors::{
	section_err, FieldValueParseError, FieldValueParseErrorKind, MalformedDocumentError, MalformedDocumentErrorKind,
};
use crate::utils::{is_ignored_line, lines_with_spans, split_field};

pub const SECTION_GENERAL: &str = "General";
pub const SECTION_METADATA: &str = "Metadata";
pub const SECTION_DIFFICULTY: &str = "Difficulty";
pub const SECTION_TIMING_POINTS: &str = "TimingPoints";
pub const SECTION_HIT_OBJECTS: &str = "HitObjects";

/// A bracketed section of a `.osu` document, borrowed from the document text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<'a> {
	/// Name of the section, without brackets.
	pub name: &'static str,
	/// Everything between the header line and the next header (or the end of the document).
	pub content: &'a str,
	/// Span of the `[Name]` line, terminator excluded.
	pub header_span: Range<usize>,
	/// Span of `content` in the document.
	pub content_span: Range<usize>,
}

/// A `Key: value` line of a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field<'a> {
	pub section: &'static str,
	pub key: &'static str,
	/// Trimmed value.
	pub value: &'a str,
	/// Span of the whole line in the document, terminator excluded.
	pub line_span: Range<usize>,
	/// Span of `value` in the document.
	pub value_span: Range<usize>,
}

fn header_name(line: &str) -> Option<&str> {
	line.trim().strip_prefix('[')?.strip_suffix(']')
}

/// Locates the `[name]` section of a document.
///
/// # Errors
///
/// Fails with a `MissingSection` error if the document has no such header.
pub fn extract_section<'a>(document: &'a str, name: &'static str) -> Result<Section<'a>, MalformedDocumentError> {
	find_section(document, name).ok_or_else(|| MalformedDocumentError::new(name, MalformedDocumentErrorKind::MissingSection))
}

/// Locates the `[name]` section of a document, if there is one.
#[must_use]
pub fn find_section<'a>(document: &'a str, name: &'static str) -> Option<Section<'a>> {
	let mut lines = lines_with_spans(document);

	let (header_span, _) = lines.by_ref().find(|(_, line)| header_name(line) == Some(name))?;

	let content_start = document[header_span.end..]
		.find('\n')
		.map_or(document.len(), |i| header_span.end + i + 1);

	// We stop once we encounter a new section
	let content_end = lines
		.find(|(_, line)| header_name(line).is_some())
		.map_or(document.len(), |(span, _)| span.start);

	Some(Section {
		name,
		content: &document[content_start..content_end],
		header_span,
		content_span: content_start..content_end,
	})
}

impl<'a> Section<'a> {
	/// Lines of the section with their span in the document.
	pub fn lines(&self) -> impl Iterator<Item = (Range<usize>, &'a str)> {
		let offset = self.content_span.start;
		lines_with_spans(self.content).map(move |(span, line)| (span.start + offset..span.end + offset, line))
	}

	/// Lines of the section that carry data, skipping comments and empty lines.
	pub fn entries(&self) -> impl Iterator<Item = &'a str> {
		self.lines().map(|(_, line)| line).filter(|line| !is_ignored_line(line))
	}

	/// Finds the first `key: value` line of the section.
	#[must_use]
	pub fn find_field(&self, key: &'static str) -> Option<Field<'a>> {
		let section = self.name;

		self.lines().filter(|(_, line)| !is_ignored_line(line)).find_map(|(line_span, line)| {
			let (field, value_range) = split_field(line)?;
			if field != key {
				return None;
			}

			let value = &line[value_range.clone()];
			let value_span = line_span.start + value_range.start..line_span.start + value_range.end;

			Some(Field {
				section,
				key,
				value,
				line_span,
				value_span,
			})
		})
	}

	/// Finds the first `key: value` line of the section.
	///
	/// # Errors
	///
	/// Fails with a `MissingField` error if the section doesn't specify the field.
	pub fn require_field(&self, key: &'static str) -> Result<Field<'a>, MalformedDocumentError> {
		self.find_field(key)
			.ok_or_else(|| MalformedDocumentError::new(self.name, MalformedDocumentErrorKind::MissingField(key)))
	}
}

impl Field<'_> {
	/// Parses the value of the field.
	///
	/// # Errors
	///
	/// Fails if the value is not a valid `T`.
	pub fn parse<T>(&self) -> Result<T, MalformedDocumentError>
	where
		T: FromStr,
		T::Err: Into<FieldValueParseErrorKind>,
	{
		self.value.parse::<T>().map_err(|e| {
			section_err(self.section)(FieldValueParseError {
				field: self.key,
				value: self.value.to_owned(),
				kind: e.into(),
			})
		})
	}
}
