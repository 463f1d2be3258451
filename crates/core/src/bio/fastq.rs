//! FASTQ parsing
//!
//! Records stream through a bounded channel fed by a blocking reader task,
//! so a slow consumer applies backpressure instead of growing memory.

use crate::error::{CoreError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the channel between the reader task and the consumer.
const CHANNEL_CAPACITY: usize = 64;

/// One FASTQ record: header, sequence, and quality line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub header: String,
    pub sequence: String,
    pub quality: String,
}

/// A lazy reader over the records of a FASTQ file.
///
/// Created by [`read_fastq`]. Dropping the reader stops the underlying file
/// task at its next send.
pub struct FastqReader {
    rx: mpsc::Receiver<Result<FastqRecord>>,
    handle: Option<JoinHandle<()>>,
}

impl FastqReader {
    /// Return the next record, or `None` once the file is exhausted.
    pub async fn next(&mut self) -> Option<Result<FastqRecord>> {
        match self.rx.recv().await {
            Some(item) => Some(item),
            None => {
                if let Some(handle) = self.handle.take() {
                    if let Err(err) = handle.await {
                        return Some(Err(CoreError::Io(std::io::Error::other(err))));
                    }
                }

                None
            }
        }
    }
}

/// Read the FASTQ file at `path` as a lazy sequence of records.
pub fn read_fastq(path: &Path) -> FastqReader {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let path = path.to_owned();

    let handle = tokio::task::spawn_blocking(move || {
        if let Err(err) = read_records(&path, &tx) {
            let _ = tx.blocking_send(Err(err));
        }
    });

    FastqReader {
        rx,
        handle: Some(handle),
    }
}

fn read_records(path: &Path, tx: &mpsc::Sender<Result<FastqRecord>>) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);

    let mut had_plus = false;
    let mut header = String::new();
    let mut sequence = String::new();

    for line in reader.lines() {
        let line = line?;

        if line == "+" {
            had_plus = true;
            continue;
        }

        if !had_plus {
            if line.starts_with('@') {
                header = line.trim_end().to_string();
            } else {
                sequence = line.trim_end().to_string();
            }

            continue;
        }

        let record = FastqRecord {
            header: std::mem::take(&mut header),
            sequence: std::mem::take(&mut sequence),
            quality: line.trim_end().to_string(),
        };

        if tx.blocking_send(Ok(record)).is_err() {
            // The consumer dropped the reader.
            return Ok(());
        }

        had_plus = false;
    }

    Ok(())
}

/// Return the headers of the FASTQ file at `path`.
///
/// Only uncompressed input is accepted.
pub async fn read_fastq_headers(path: &Path) -> Result<Vec<String>> {
    let path = path.to_owned();

    tokio::task::spawn_blocking(move || {
        let reader = BufReader::new(File::open(path)?);

        let mut had_plus = false;
        let mut headers = Vec::new();

        for line in reader.lines() {
            let line = line?;

            if line == "+" {
                had_plus = true;
                continue;
            }

            if !had_plus && line.starts_with('@') {
                headers.push(line.trim_end().to_string());
                continue;
            }

            if had_plus {
                had_plus = false;
            }
        }

        Ok(headers)
    })
    .await
    .map_err(|err| CoreError::Io(std::io::Error::other(err)))?
}
