use std::ops::Range;

/// Iterate over the lines of a text along with their byte span.
///
/// The span excludes the line terminator (`\n` or `\r\n`).
pub(crate) fn lines_with_spans(text: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
	let mut offset = 0;
	text.split_inclusive('\n').map(move |raw_line| {
		let start = offset;
		offset += raw_line.len();

		let line = raw_line.strip_suffix('\n').unwrap_or(raw_line);
		let line = line.strip_suffix('\r').unwrap_or(line);
		(start..start + line.len(), line)
	})
}

/// Comments and empty lines carry no data.
#[must_use]
pub(crate) fn is_ignored_line(line: &str) -> bool {
	let l = line.trim();
	l.is_empty() || l.starts_with("//")
}

/// Split a `field:value` line (arbitrary spaces allowed).
///
/// Returns the trimmed field name and the span of the trimmed value inside the line.
pub(crate) fn split_field(line: &str) -> Option<(&str, Range<usize>)> {
	let colon = line.find(':')?;
	let field = line[..colon].trim();

	let raw_value = &line[colon + 1..];
	let value_start = colon + 1 + (raw_value.len() - raw_value.trim_start().len());
	let value_end = colon + 1 + raw_value.trim_end().len();

	Some((field, value_start..value_end.max(value_start)))
}

/// Line terminator used by a document. osu! writes `\r\n`, but hand-edited files often don't.
#[must_use]
pub(crate) fn newline_of(text: &str) -> &'static str {
	if text.contains("\r\n") {
		"\r\n"
	} else {
		"\n"
	}
}

#[cfg(test)]
#[must_use]
pub(crate) fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
	(a - b).abs() <= tolerance
}
