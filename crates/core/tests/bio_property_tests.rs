//! Property tests for the sequence routines

use proptest::prelude::*;

use virion_core::bio::{find_orfs, reverse_complement, translate};

const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY*X";

proptest! {
    #[test]
    fn translate_length_and_alphabet(sequence in "[ACGTN]{0,240}") {
        let protein = translate(&sequence);

        prop_assert_eq!(protein.len(), sequence.len() / 3);
        prop_assert!(protein.chars().all(|c| AMINO_ACIDS.contains(c)));
    }

    #[test]
    fn reverse_complement_involution(sequence in "[ACGTNacgtn]{0,240}") {
        let twice = reverse_complement(&reverse_complement(&sequence));

        prop_assert_eq!(twice, sequence.to_uppercase());
    }

    #[test]
    fn find_orfs_ignores_short_sequences(sequence in "[ACGTN]{0,300}") {
        prop_assert!(find_orfs(&sequence).is_empty());
    }

    #[test]
    fn find_orfs_respects_minimum_protein_length(sequence in "[ACGT]{301,450}") {
        for orf in find_orfs(&sequence) {
            prop_assert!(orf.protein.len() >= 100);
            prop_assert!(!orf.protein.contains('*'));

            let (start, end) = orf.position;
            prop_assert!(start <= end);
            prop_assert!(end <= sequence.len());
            prop_assert_eq!(orf.nucleotide.len(), end - start);
        }
    }
}
