//! FASTA parsing

use crate::error::{CoreError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse the FASTA file at `path` into `(header, sequence)` pairs.
///
/// The path must end in `.fa`. A header line starts with `>`; every `>` in
/// the line is stripped from the returned header. Sequence lines are
/// concatenated until the next header. A sequence line appearing before any
/// header fails with the offending line in the error.
pub fn read_fasta(path: &Path) -> Result<Vec<(String, String)>> {
    if !path.to_string_lossy().ends_with(".fa") {
        return Err(CoreError::InvalidFastaFile);
    }

    let reader = BufReader::new(File::open(path)?);

    let mut data = Vec::new();

    let mut header: Option<String> = None;
    let mut seq = String::new();

    for line in reader.lines() {
        let line = line?;

        if line.starts_with('>') {
            if let Some(header) = header.take() {
                data.push((header, std::mem::take(&mut seq)));
            }

            header = Some(line.trim_end().replace('>', ""));
            continue;
        }

        if header.is_some() {
            seq.push_str(line.trim_end());
            continue;
        }

        return Err(CoreError::IllegalFastaLine(line));
    }

    if let Some(header) = header {
        data.push((header, seq));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONTENT: &str = ">test_1\n\
        ATAGAGTACATATCTACTTCTATCATTTATATATTATAAAAACCTC\n\
        >test_2\n\
        CCTCTGACTGACTATGGGCTCTCGACTATTTACGATCAGCATCGTT\n";

    fn write_fasta(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_fasta() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fasta(&dir, "test.fa", CONTENT);

        assert_eq!(
            read_fasta(&path).unwrap(),
            vec![
                (
                    "test_1".to_string(),
                    "ATAGAGTACATATCTACTTCTATCATTTATATATTATAAAAACCTC".to_string()
                ),
                (
                    "test_2".to_string(),
                    "CCTCTGACTGACTATGGGCTCTCGACTATTTACGATCAGCATCGTT".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_read_fasta_illegal_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fasta(&dir, "test.fa", &format!("ATTAGATAC\n{CONTENT}"));

        let err = read_fasta(&path).unwrap_err();

        assert!(err.to_string().contains("Illegal FASTA line: ATTAGATAC"));
    }

    #[test]
    fn test_read_fasta_requires_fa_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fasta(&dir, "test.fasta", CONTENT);

        assert!(matches!(
            read_fasta(&path),
            Err(CoreError::InvalidFastaFile)
        ));
    }

    #[test]
    fn test_read_fasta_multiline_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fasta(&dir, "test.fa", ">multi\nATAGAG\nTACATA\n");

        assert_eq!(
            read_fasta(&path).unwrap(),
            vec![("multi".to_string(), "ATAGAGTACATA".to_string())]
        );
    }
}
