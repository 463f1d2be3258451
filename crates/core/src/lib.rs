//! Virion Core Library
//!
//! Shared data models and bioinformatics utilities for the virology analysis
//! backend. Persistence-layer wrappers live in the `virion-storage` crate.

pub mod bio;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;

// Main re-exports
pub use bio::{find_orfs, read_fasta, read_fastq, read_fastq_headers, reverse_complement, translate, FastqRecord, Orf};
pub use error::{CoreError, Result};
pub use logging::init_logging;
pub use utils::{random_alphanumeric, timestamp};
