use osu2mania::file::section::{extract_section, SECTION_HIT_OBJECTS, SECTION_TIMING_POINTS};
use osu2mania::config::ConfigError;
use osu2mania::file::timing_point::TimingPointParseError;
use osu2mania::{convert, ConversionError, ConvertConfig, MalformedDocumentErrorKind};

const BEATMAP: &str = "osu file format v14\r
\r
[General]\r
AudioFilename: audio.mp3\r
AudioLeadIn: 0\r
PreviewTime: 12000\r
Countdown: 0\r
SampleSet: Soft\r
StackLeniency: 0.7\r
Mode: 0\r
LetterboxInBreaks: 0\r
WidescreenStoryboard: 1\r
\r
[Editor]\r
DistanceSpacing: 1.2\r
BeatDivisor: 4\r
GridSize: 32\r
\r
[Metadata]\r
Title:Example Song\r
Artist:Example Artist\r
Creator:Speykious\r
Version:Insane\r
Source:\r
Tags:test\r
\r
[Difficulty]\r
HPDrainRate:5\r
CircleSize:4\r
OverallDifficulty:8\r
ApproachRate:9\r
SliderMultiplier:1\r
SliderTickRate:1\r
\r
[Events]\r
//Background and Video events\r
0,0,\"bg.jpg\",0,0\r
\r
[TimingPoints]\r
0,500,4,2,0,60,1,0\r
2000,-50,4,2,0,60,0,0\r
\r
\r
[Colours]\r
Combo1 : 255,128,0\r
\r
[HitObjects]\r
256,192,1000,5,0,0:0:0:0:\r
100,100,1500,2,2,L|200:100,2,100,2|0|8,0:0|0:0|0:0,0:0:0:0:\r
300,300,2000,6,0,B|350:350|400:300,1,200\r
256,192,3000,12,4,4500,1:0:0:0:\r
64,64,5000,1,8,0:0:0:0:\r
";

fn hit_object_lines(document: &str) -> Vec<&str> {
	extract_section(document, SECTION_HIT_OBJECTS)
		.unwrap()
		.entries()
		.collect()
}

#[test]
fn converts_to_mania() {
	let converted = convert(BEATMAP, &ConvertConfig::default()).unwrap();

	assert!(converted.contains("\r\nMode: 3\r\n"));
	assert!(converted.contains("\r\nCircleSize:4\r\n"));
	assert!(converted.contains("\r\nVersion:Insane (mania)\r\n"));

	assert_eq!(hit_object_lines(&converted), vec![
		"0,192,1000,5,0,0:0:0:0:",
		// 500 * 2 * 100 / (100 * 1)
		"128,100,1500,128,2,2500:0:0:0:0:",
		// x2 velocity from 2000ms: 500 * 1 * 200 / (100 * 2)
		"256,300,2000,128,0,2500:0:0:0:0:",
		"384,192,3000,128,4,4500:1:0:0:0:",
		"0,64,5000,1,8,0:0:0:0:",
	]);
}

#[test]
fn everything_else_is_untouched() {
	let converted = convert(BEATMAP, &ConvertConfig::default()).unwrap();

	for kept in [
		"osu file format v14\r\n\r\n[General]\r\nAudioFilename: audio.mp3\r\n",
		"[Editor]\r\nDistanceSpacing: 1.2\r\nBeatDivisor: 4\r\nGridSize: 32\r\n\r\n",
		"[Events]\r\n//Background and Video events\r\n0,0,\"bg.jpg\",0,0\r\n\r\n",
		"[Colours]\r\nCombo1 : 255,128,0\r\n\r\n[HitObjects]\r\n",
	] {
		assert!(converted.contains(kept), "{kept:?} is missing from the converted beatmap");
	}
}

#[test]
fn lane_count_is_configurable() {
	let config = ConvertConfig {
		lane_count: 7,
		starting_lane: 7,
		left_to_right: false,
		..ConvertConfig::default()
	};
	let converted = convert(BEATMAP, &config).unwrap();

	assert!(converted.contains("\r\nCircleSize:7\r\n"));

	let xs: Vec<_> = hit_object_lines(&converted)
		.into_iter()
		.map(|line| line.split(',').next().unwrap().to_owned())
		.collect();
	assert_eq!(xs, vec!["439", "366", "293", "220", "147"]);
}

#[test]
fn slider_velocities_are_equalized() {
	let converted = convert(BEATMAP, &ConvertConfig::default()).unwrap();
	let timing_points: Vec<_> = extract_section(&converted, SECTION_TIMING_POINTS)
		.unwrap()
		.entries()
		.collect();

	assert_eq!(timing_points, vec!["0,500,4,2,0,60,1,0", "2000,-100,4,2,0,60,0,0"]);

	// Hold durations still account for the original velocity
	assert!(converted.contains("256,300,2000,128,0,2500:0:0:0:0:"));
}

#[test]
fn slider_velocities_can_be_kept() {
	let config = ConvertConfig {
		equalize_velocity: false,
		..ConvertConfig::default()
	};
	let converted = convert(BEATMAP, &config).unwrap();

	assert!(converted.contains("[TimingPoints]\r\n0,500,4,2,0,60,1,0\r\n2000,-50,4,2,0,60,0,0\r\n\r\n\r\n[Colours]"));
}

#[test]
fn circles_can_become_holds() {
	let config = ConvertConfig {
		hold_length_beats: 0.5,
		..ConvertConfig::default()
	};
	let converted = convert(BEATMAP, &config).unwrap();
	let lines = hit_object_lines(&converted);

	assert_eq!(lines[0], "0,192,1000,128,0,1250:0:0:0:0:");
	assert_eq!(lines[4], "0,64,5000,128,8,5250:0:0:0:0:");
}

#[test]
fn pure_circles_only_change_lanes() {
	let beatmap = "osu file format v14\n\n[General]\nMode: 0\n\n[Metadata]\nVersion:Easy\n\n[Difficulty]\nCircleSize:4\nSliderMultiplier:1.4\n\n[TimingPoints]\n0,400,4,1,0,100,1,0\n\n[HitObjects]\n10,20,100,1,0,0:0:0:0:\n30,40,200,5,2,0:0:0:0:\n50,60,300,1,0\n70,80,400,1,8,0:0:0:0:\n90,100,500,1,0,0:0:0:0:\n";
	let converted = convert(beatmap, &ConvertConfig::default()).unwrap();

	let originals = hit_object_lines(beatmap);
	let converted = hit_object_lines(&converted);
	assert_eq!(originals.len(), converted.len());

	for (original, converted) in originals.iter().zip(&converted) {
		let (_, original_rest) = original.split_once(',').unwrap();
		let (_, converted_rest) = converted.split_once(',').unwrap();
		assert_eq!(original_rest, converted_rest);
	}

	assert_eq!(converted[0], "0,20,100,1,0,0:0:0:0:");
	assert_eq!(converted[4], "0,100,500,1,0,0:0:0:0:");
}

#[test]
fn unix_line_endings_are_kept() {
	let beatmap = BEATMAP.replace("\r\n", "\n");
	let converted = convert(&beatmap, &ConvertConfig::default()).unwrap();

	assert!(!converted.contains('\r'));
	assert!(converted.ends_with("0,64,5000,1,8,0:0:0:0:\n"));
}

#[test]
fn mode_is_inserted_when_missing() {
	let beatmap = BEATMAP.replace("Mode: 0\r\n", "");
	let converted = convert(&beatmap, &ConvertConfig::default()).unwrap();

	assert!(converted.contains("[General]\r\nMode: 3\r\nAudioFilename: audio.mp3\r\n"));
}

#[test]
fn other_modes_are_skipped() {
	let beatmap = BEATMAP.replace("Mode: 0", "Mode: 1");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(matches!(err, ConversionError::UnsupportedMode(1)));
	assert!(err.is_skip());
}

#[test]
fn missing_hit_objects() {
	let beatmap = BEATMAP.replace("[HitObjects]", "[Nothing]");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(!err.is_skip());
	assert!(matches!(
		err,
		ConversionError::MalformedDocument(ref e)
			if e.section == SECTION_HIT_OBJECTS && matches!(e.kind, MalformedDocumentErrorKind::MissingSection)
	));
}

#[test]
fn missing_timing_points() {
	let beatmap = BEATMAP.replace("[TimingPoints]", "[Nothing]");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(matches!(
		err,
		ConversionError::MalformedDocument(ref e) if e.section == SECTION_TIMING_POINTS
	));
}

#[test]
fn missing_version() {
	let beatmap = BEATMAP.replace("Version:Insane\r\n", "");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(matches!(
		err,
		ConversionError::MalformedDocument(ref e) if matches!(e.kind, MalformedDocumentErrorKind::MissingField("Version"))
	));
}

#[test]
fn malformed_hit_object() {
	let beatmap = BEATMAP.replace("64,64,5000,1,8", "64,64,5000,0,8");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(matches!(err, ConversionError::MalformedHitObject { index: 4, .. }));
}

#[test]
fn lane_count_above_the_maximum() {
	let config = ConvertConfig {
		lane_count: 10_000_000,
		starting_lane: 9_000_000,
		..ConvertConfig::default()
	};
	let err = convert(BEATMAP, &config).unwrap_err();

	assert!(matches!(
		err,
		ConversionError::InvalidConfig(ConfigError::TooManyLanes(10_000_000))
	));
}

#[test]
fn non_finite_beat_length() {
	let beatmap = BEATMAP.replace("0,500,4,2,0,60,1,0", "0,NaN,4,2,0,60,1,0");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(matches!(
		err,
		ConversionError::MalformedDocument(ref e) if matches!(
			e.kind,
			MalformedDocumentErrorKind::TimingPointParse {
				kind: TimingPointParseError::NonFinite(_),
				..
			}
		)
	));
}

#[test]
fn non_finite_hit_object_time() {
	let beatmap = BEATMAP.replace("64,64,5000,1,8", "64,64,inf,1,8");
	let err = convert(&beatmap, &ConvertConfig::default()).unwrap_err();

	assert!(matches!(err, ConversionError::MalformedHitObject { index: 4, .. }));
}
