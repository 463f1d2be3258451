//! Nucleotide sequence parsing and scanning

pub mod fasta;
pub mod fastq;
pub mod orf;

pub use fasta::read_fasta;
pub use fastq::{read_fastq, read_fastq_headers, FastqReader, FastqRecord};
pub use orf::{find_orfs, reverse_complement, translate, Orf};
