use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use error_stack::{IntoReport, ResultExt};
use osu2mania::{convert, ConvertConfig};
use tracing::Level;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short = 'd',
        long = "dir",
        num_args = 1..,
        help = "Folders to search for .osu files, recursively (defaults to the current folder)."
    )]
    dirs: Vec<PathBuf>,

    #[arg(
        short = 'f',
        long = "file",
        num_args = 1..,
        help = "Beatmap files to convert. Along with --dir, names of the files to convert in those folders."
    )]
    files: Vec<PathBuf>,

    #[arg(short, long, default_value_t = 4, help = "Amount of lanes of the converted beatmaps (1 to 18).")]
    keys: u32,

    #[arg(
        long,
        default_value_t = 0.,
        help = "Length in beats of the holds hit circles are turned into (0 keeps them as normal notes)."
    )]
    hold_length: f64,

    #[arg(long, default_value_t = 1, help = "Lane of the first note, counted from 1.")]
    starting_lane: u32,

    #[arg(long, help = "Cycle through lanes from right to left.")]
    right_to_left: bool,

    #[arg(long, help = "Keep slider velocity changes instead of resetting them to x1.00.")]
    keep_sv: bool,

    #[arg(short, long, help = "Log debug information.")]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ConvertConfig {
        ConvertConfig {
            lane_count: self.keys,
            hold_length_beats: self.hold_length,
            starting_lane: self.starting_lane,
            left_to_right: !self.right_to_left,
            equalize_velocity: !self.keep_sv,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ConvertFileError {
    #[error("Could not read beatmap")]
    Read,

    #[error("Could not convert beatmap")]
    Conversion,

    #[error("Could not write converted beatmap")]
    Write,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct BatchSummary {
    converted: usize,
    skipped: usize,
    failed: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let config = cli.config();
    config.validate()?;

    let beatmaps = collect_beatmaps(&cli.dirs, &cli.files);
    if beatmaps.is_empty() {
        tracing::info!("Nothing to convert");
        return Ok(());
    }

    let summary = convert_beatmaps(&beatmaps, &config);
    tracing::info!(
        "{} converted, {} skipped, {} failed",
        summary.converted,
        summary.skipped,
        summary.failed
    );

    Ok(())
}

fn is_beatmap_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("osu"))
}

/// Every `.osu` file under `dir`, optionally restricted to some file names.
fn walk_beatmaps(dir: &Path, allowed_names: &[PathBuf]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::error!("No such directory: {}", dir.display());
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|err| tracing::warn!("Couldn't read directory entry: {err}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            if !is_beatmap_file(path) {
                tracing::debug!("{} is not a .osu file", path.display());
                return false;
            }

            allowed_names.is_empty()
                || path
                    .file_name()
                    .is_some_and(|name| allowed_names.iter().any(|allowed| allowed.as_os_str() == name))
        })
        .collect()
}

/// Beatmap files selected by the command line.
///
/// - no folder and no file: every `.osu` file under the current folder;
/// - folders only: every `.osu` file under them;
/// - files only: exactly these files;
/// - folders and files: the `.osu` files under the folders that have one of the file names.
fn collect_beatmaps(dirs: &[PathBuf], files: &[PathBuf]) -> Vec<PathBuf> {
    match (dirs, files) {
        ([], []) => walk_beatmaps(Path::new("."), &[]),
        ([], files) => files.to_vec(),
        (dirs, files) => dirs.iter().flat_map(|dir| walk_beatmaps(dir, files)).collect(),
    }
}

/// Where the converted version of a beatmap is written: `name.osu` becomes `name[mania].osu`.
fn mania_output_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_stem().unwrap_or_default().to_os_string();
    file_name.push("[mania]");
    if let Some(extension) = path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }

    path.with_file_name(file_name)
}

/// Converts one beatmap file and writes the result next to it.
///
/// Returns where the result was written, or `None` if the beatmap isn't an osu!standard beatmap.
fn convert_beatmap_file(
    path: &Path,
    config: &ConvertConfig,
) -> error_stack::Result<Option<PathBuf>, ConvertFileError> {
    let document = fs::read_to_string(path)
        .report()
        .change_context(ConvertFileError::Read)
        .attach_printable_lazy(|| format!("Path: {}", path.display()))?;

    let converted = match convert(&document, config) {
        Err(err) if err.is_skip() => {
            tracing::info!("Skipping {}: {err}", path.display());
            return Ok(None);
        }
        result => result
            .report()
            .change_context(ConvertFileError::Conversion)
            .attach_printable_lazy(|| format!("Path: {}", path.display()))?,
    };

    let out_path = mania_output_path(path);
    fs::write(&out_path, converted)
        .report()
        .change_context(ConvertFileError::Write)
        .attach_printable_lazy(|| format!("Path: {}", out_path.display()))?;

    Ok(Some(out_path))
}

fn convert_beatmaps(paths: &[PathBuf], config: &ConvertConfig) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for path in paths {
        tracing::info!("Processing {}...", path.display());
        match convert_beatmap_file(path, config) {
            Ok(Some(out_path)) => {
                tracing::info!("Wrote {}", out_path.display());
                summary.converted += 1;
            }
            Ok(None) => summary.skipped += 1,
            Err(err) => {
                tracing::error!("\n{err:?}");
                summary.failed += 1;
            }
        }
    }

    summary
}
