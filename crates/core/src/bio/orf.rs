//! Reverse complement, codon translation, and open reading frame scanning

use serde::{Deserialize, Serialize};

/// The shortest nucleotide sequence scanned for ORFs.
const MIN_SEQUENCE_LENGTH: usize = 300;

/// The shortest protein segment reported as an ORF, in residues.
const MIN_ORF_LENGTH: usize = 100;

/// An open reading frame found by [`find_orfs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orf {
    /// The translated protein segment, stop codon excluded.
    pub protein: String,
    /// The strand-local nucleotide slice at `position`.
    pub nucleotide: String,
    /// The reading frame offset (0, 1, or 2).
    pub frame: usize,
    /// `+1` for the forward strand, `-1` for the reverse complement.
    pub strand: i8,
    /// Start and end in forward-strand coordinates, end-exclusive,
    /// regardless of which strand the ORF was found on.
    pub position: (usize, usize),
}

/// Map one base to its complement. Unknown bases degrade to `N`.
fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        'N' => 'N',
        _ => 'N',
    }
}

/// Calculate the reverse complement of `sequence`.
///
/// Input case is ignored; the output is uppercase.
pub fn reverse_complement(sequence: &str) -> String {
    sequence
        .chars()
        .rev()
        .map(|c| complement(c.to_ascii_uppercase()))
        .collect()
}

/// Translate one codon, resolving the ambiguity rows of the table.
///
/// Codons the table does not cover translate to the sentinel `X`.
fn translate_codon(codon: &[u8]) -> char {
    match codon {
        b"TTT" | b"TTC" => 'F',
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" | b"CTN" => 'L',
        b"ATT" | b"ATC" | b"ATA" => 'I',
        b"ATG" => 'M',
        b"GTT" | b"GTC" | b"GTA" | b"GTG" | b"GTN" => 'V',
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"TCN" | b"AGT" | b"AGC" => 'S',
        b"CCT" | b"CCC" | b"CCA" | b"CCG" | b"CCN" => 'P',
        b"ACT" | b"ACC" | b"ACA" | b"ACG" | b"ACN" => 'T',
        b"GCT" | b"GCC" | b"GCA" | b"GCG" | b"GCN" => 'A',
        b"TAT" | b"TAC" => 'Y',
        b"TAA" | b"TAG" | b"TGA" => '*',
        b"CAT" | b"CAC" => 'H',
        b"CAA" | b"CAG" => 'Q',
        b"AAT" | b"AAC" => 'N',
        b"AAA" | b"AAG" => 'K',
        b"GAT" | b"GAC" => 'D',
        b"GAA" | b"GAG" => 'E',
        b"TGT" | b"TGC" => 'C',
        b"TGG" => 'W',
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"CGN" | b"AGA" | b"AGG" => 'R',
        b"GGT" | b"GGC" | b"GGA" | b"GGG" | b"GGN" => 'G',
        _ => 'X',
    }
}

/// Translate `sequence` to protein.
///
/// The sequence splits into non-overlapping triplets; a trailing partial
/// codon is dropped. Stop codons translate to `*` and codons outside the
/// table to `X`; irregular input never errors.
pub fn translate(sequence: &str) -> String {
    let sequence = sequence.to_ascii_uppercase();
    let bytes = sequence.as_bytes();

    (0..bytes.len() / 3)
        .map(|i| translate_codon(&bytes[i * 3..(i + 1) * 3]))
        .collect()
}

/// Return all ORFs for the nucleotide `sequence`.
///
/// Sequences of 300 bases or fewer yield nothing. Both strands are scanned
/// in all three frames, forward strand first; within a frame, ORFs are
/// emitted left to right along the translation. Only stop-delimited
/// segments of 100 residues or more qualify; a trailing segment that runs
/// off the end of the translation without a stop is still a candidate.
pub fn find_orfs(sequence: &str) -> Vec<Orf> {
    let mut orfs = Vec::new();

    let sequence_length = sequence.len();

    if sequence_length <= MIN_SEQUENCE_LENGTH {
        return orfs;
    }

    let reverse = reverse_complement(sequence);

    for (strand, nuc) in [(1i8, sequence), (-1i8, reverse.as_str())] {
        for frame in 0..3 {
            let translation = translate(&nuc[frame..]);
            let translation: Vec<char> = translation.chars().collect();
            let translation_length = translation.len();

            let mut aa_start = 0;

            while aa_start < translation_length {
                let aa_end = translation[aa_start..]
                    .iter()
                    .position(|&c| c == '*')
                    .map(|offset| aa_start + offset)
                    .unwrap_or(translation_length);

                if aa_end - aa_start >= MIN_ORF_LENGTH {
                    let (start, end) = if strand == 1 {
                        (
                            frame + aa_start * 3,
                            usize::min(sequence_length, frame + aa_end * 3 + 3),
                        )
                    } else {
                        // An open trailing segment overshoots the origin by
                        // the leftover partial codon, mirroring the forward
                        // strand's end overshoot; clamp it the same way.
                        (
                            (sequence_length - frame).saturating_sub(aa_end * 3 + 3),
                            sequence_length - frame - aa_start * 3,
                        )
                    };

                    orfs.push(Orf {
                        protein: translation[aa_start..aa_end].iter().collect(),
                        nucleotide: nuc[start..end].to_string(),
                        frame,
                        strand,
                        position: (start, end),
                    });
                }

                aa_start = aa_end + 1;
            }
        }
    }

    orfs
}
