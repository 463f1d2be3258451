//! File, time, and identifier helpers shared across the backend

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

/// The characters used for generated document ids.
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz1234567890";

/// Return the current UTC time with the sub-millisecond digits zeroed.
///
/// Stored documents carry millisecond-precision datetimes, so timestamps are
/// truncated up front to survive a database round-trip unchanged.
pub fn timestamp() -> DateTime<Utc> {
    let now = Utc::now();

    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Generate a random lowercase alphanumeric string of `length` characters.
///
/// Candidates found in `excluded` are rejected and regenerated.
pub fn random_alphanumeric(length: usize, excluded: &[&str]) -> String {
    let mut rng = rand::thread_rng();

    loop {
        let candidate: String = (0..length)
            .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
            .collect();

        if !excluded.contains(&candidate.as_str()) {
            return candidate;
        }
    }
}

/// Remove the file at `path`.
///
/// Directories are only removed when `recursive` is set; otherwise an
/// [`CoreError::IsADirectory`] error is returned.
pub fn rm(path: &Path, recursive: bool) -> Result<bool> {
    if path.is_dir() {
        if recursive {
            std::fs::remove_dir_all(path)?;
            return Ok(true);
        }

        return Err(CoreError::IsADirectory(path.to_owned()));
    }

    std::fs::remove_file(path)?;

    Ok(true)
}

/// The size and last modification time of a file.
#[derive(Debug, Clone)]
pub struct FileStats {
    pub size: u64,
    pub modify: DateTime<Utc>,
}

/// Return the size and last modification time for the file at `path`.
pub fn file_stats(path: &Path) -> Result<FileStats> {
    let metadata = std::fs::metadata(path)?;
    let modify = DateTime::from(metadata.modified()?);

    Ok(FileStats {
        size: metadata.len(),
        modify,
    })
}

/// Count the lines in the file at `path` without loading it into memory.
pub async fn file_length(path: &Path) -> Result<u64> {
    let path = path.to_owned();

    tokio::task::spawn_blocking(move || {
        let reader = BufReader::new(File::open(path)?);

        let mut length = 0;

        for line in reader.lines() {
            line?;
            length += 1;
        }

        Ok(length)
    })
    .await
    .map_err(|err| CoreError::Io(std::io::Error::other(err)))?
}

/// Check whether the file at `path` starts with the gzip magic bytes.
pub fn is_gzipped(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];

    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == [0x1f, 0x8b]),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Decide whether pigz should be used for gzip work.
///
/// pigz only pays off when more than one process is allowed and the binary
/// is actually installed.
pub fn should_use_pigz(processes: u32) -> bool {
    processes > 1 && pigz_in_path()
}

fn pigz_in_path() -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join("pigz").is_file()))
        .unwrap_or(false)
}

/// Compress the file at `path` to a gzipped file at `target`.
///
/// pigz is used when `processes` allows it, otherwise an in-process gzip
/// stream.
pub fn compress_file(path: &Path, target: &Path, processes: u32) -> Result<()> {
    if should_use_pigz(processes) {
        compress_file_with_pigz(path, target, processes)
    } else {
        compress_file_with_gzip(path, target)
    }
}

/// Compress `path` to `target` with an in-process gzip stream at level 6.
pub fn compress_file_with_gzip(path: &Path, target: &Path) -> Result<()> {
    let mut reader = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(target)?, Compression::new(6));

    std::io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    Ok(())
}

/// Compress `path` to `target` by shelling out to pigz.
pub fn compress_file_with_pigz(path: &Path, target: &Path, processes: u32) -> Result<()> {
    run_pigz(
        &["-p", &processes.to_string(), "-k", "--stdout"],
        path,
        target,
    )
}

/// Decompress the gzip-compressed file at `path` to `target`.
pub fn decompress_file(path: &Path, target: &Path, processes: u32) -> Result<()> {
    if should_use_pigz(processes) {
        decompress_file_with_pigz(path, target, processes)
    } else {
        decompress_file_with_gzip(path, target)
    }
}

/// Decompress `path` to `target` with an in-process gzip stream.
pub fn decompress_file_with_gzip(path: &Path, target: &Path) -> Result<()> {
    let mut decoder = GzDecoder::new(File::open(path)?);
    let mut writer = File::create(target)?;

    std::io::copy(&mut decoder, &mut writer)?;

    Ok(())
}

/// Decompress `path` to `target` by shelling out to pigz.
pub fn decompress_file_with_pigz(path: &Path, target: &Path, processes: u32) -> Result<()> {
    run_pigz(
        &["-p", &processes.to_string(), "-d", "-k", "--stdout"],
        path,
        target,
    )
}

fn run_pigz(args: &[&str], path: &Path, target: &Path) -> Result<()> {
    let output = File::create(target)?;

    let status = Command::new("pigz")
        .args(args)
        .arg(path)
        .stdout(Stdio::from(output))
        .status()?;

    if !status.success() {
        return Err(CoreError::PigzFailed(status));
    }

    Ok(())
}
