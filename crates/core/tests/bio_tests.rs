//! Integration tests for FASTA/FASTQ parsing and ORF scanning

use std::fs;

use virion_core::bio::{find_orfs, read_fasta, read_fastq, read_fastq_headers};

const FASTQ_CONTENT: &str = "\
@HWI-ST1410:82:C2VAGACXX:7:1101:1531:1859 1:N:0:AGTCAA
NTGAGTATCTATTCTACAAATTCATTGATGTTTAGATGAATCGATATACATATTCATTAATAGTCTAGATCATGATATATACTTATCCCTCTAGGTGTCTG
+
#1=DDDFFHHHHHJJJJJJJJJJJJJJIJJJJJJJHJJIIGJIHJHIIJJJJJJJIJJIIIJJIJJJJJJJJJJIGGIJIJJJJJIJJHHHHGFFDDFEEE
@HWI-ST1410:82:C2VAGACXX:7:1101:1648:1927 1:N:0:AGTCAA
NTTGGCGGAATCAGCGGGGAAAGAAGACCCTGTTGAGCTTGACTCTAGTCCGACTTTGTGAAATGACTTGAGAGGTGTAGGATAAGTGGGAGCCGGAAACG
+
#4=DFFFFHHHHHJJJJJJIJIJJJJJJJHHHHFFFFFFEEEEEEDDDEDDDDDDDDDDDDEDDDDDDDDCDBDDDACDDDDDDDDCDDDBDDDDDDDDDD
@HWI-ST1410:82:C2VAGACXX:7:1101:2306:1918 1:N:0:AGTCAA
NCTCGCGGTACTTGTTTGCTATCGGTCTCTCGCCCGTATTTAGCCTTGGACGGAATTTACCGCCCGATTGGGGCTGCATTCCCAAACAACCCGACTCGCCG
+
#4=DFFFFHHHHHJJJJJJJJJJJJIIJJJJJJJJJFHJJJJIJJIJJIJJHHFFFEEEEEDDDDDDDDDDDDDDBDDDEDEDDDDDDDDDDDDDDDDDD<
@HWI-ST1410:82:C2VAGACXX:7:1101:2582:1955 1:N:0:AGTCAA
NATCGGAAGAGCACACGTCTGAACTCCAGTCACAGTCAACAATCTCGTATGCCGTCTTCTGCTTGAAAAAAAAAAAAAAAAACAAAAAAAAGAACATAATA
+
#1=DFFFFHHHGHJJJJGHJJJJJJJJJJHIJJJJIIIJJJJGCHGHGIIGIJGFHHIJGJJIGFHHHFFD##############################
";

const FASTQ_HEADERS: [&str; 4] = [
    "@HWI-ST1410:82:C2VAGACXX:7:1101:1531:1859 1:N:0:AGTCAA",
    "@HWI-ST1410:82:C2VAGACXX:7:1101:1648:1927 1:N:0:AGTCAA",
    "@HWI-ST1410:82:C2VAGACXX:7:1101:2306:1918 1:N:0:AGTCAA",
    "@HWI-ST1410:82:C2VAGACXX:7:1101:2582:1955 1:N:0:AGTCAA",
];

#[tokio::test]
async fn test_read_fastq_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.fq");
    fs::write(&path, FASTQ_CONTENT).unwrap();

    let mut reader = read_fastq(&path);
    let mut records = Vec::new();

    while let Some(record) = reader.next().await {
        records.push(record.unwrap());
    }

    assert_eq!(records.len(), 4);

    for (record, header) in records.iter().zip(FASTQ_HEADERS) {
        assert_eq!(record.header, header);
        assert_eq!(record.sequence.len(), 101);
        assert_eq!(record.quality.len(), 101);
    }

    assert!(records[0].sequence.starts_with("NTGAGTATC"));
    assert!(records[0].quality.starts_with("#1=DDDFFHH"));
    assert!(records[3].sequence.ends_with("GAACATAATA"));
    assert!(records[3].quality.ends_with("##########"));
}

#[tokio::test]
async fn test_read_fastq_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut reader = read_fastq(&dir.path().join("absent.fq"));
    let first = reader.next().await;

    assert!(matches!(first, Some(Err(_))));
    assert!(reader.next().await.is_none());
}

#[tokio::test]
async fn test_read_fastq_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.fq");
    fs::write(&path, FASTQ_CONTENT).unwrap();

    let headers = read_fastq_headers(&path).await.unwrap();

    assert_eq!(headers, FASTQ_HEADERS);
}

#[test]
fn test_find_orfs_stop_free_frames() {
    // One start codon, 132 glycine codons, one stop. Every frame on both
    // strands stays open long enough to qualify.
    let sequence = format!("ATG{}TAA", "GGA".repeat(132));
    assert_eq!(sequence.len(), 402);

    let reverse = format!("TTA{}CAT", "TCC".repeat(132));

    let orfs = find_orfs(&sequence);

    assert_eq!(orfs.len(), 6);

    let expected = [
        (1, 0, (0, 402), format!("M{}", "G".repeat(132)), sequence[0..402].to_string()),
        (1, 1, (1, 402), format!("W{}D", "E".repeat(131)), sequence[1..402].to_string()),
        (1, 2, (2, 402), format!("G{}I", "R".repeat(131)), sequence[2..402].to_string()),
        (-1, 0, (0, 402), format!("L{}H", "S".repeat(132)), reverse[0..402].to_string()),
        (-1, 1, (0, 401), format!("Y{}", "P".repeat(132)), reverse[0..401].to_string()),
        (-1, 2, (0, 400), format!("I{}P", "L".repeat(131)), reverse[0..400].to_string()),
    ];

    for (orf, (strand, frame, position, protein, nucleotide)) in orfs.iter().zip(&expected) {
        assert_eq!(orf.strand, *strand);
        assert_eq!(orf.frame, *frame);
        assert_eq!(orf.position, *position);
        assert_eq!(orf.protein, *protein);
        assert_eq!(orf.nucleotide, *nucleotide);
    }
}

#[test]
fn test_find_orfs_internal_start() {
    // The reverse strand reads CCC TAG ATG (GCA x 120) TAA GGG: a stop
    // before the start codon, then a stop-terminated 121-residue frame.
    let reverse = format!("CCCTAGATG{}TAAGGG", "GCA".repeat(120));
    let sequence = format!("CCCTTA{}CATCTAGGG", "TGC".repeat(120));
    assert_eq!(sequence.len(), 375);

    let orfs = find_orfs(&sequence);

    assert_eq!(orfs.len(), 6);

    let minus_frame_0 = &orfs[3];

    assert_eq!(minus_frame_0.strand, -1);
    assert_eq!(minus_frame_0.frame, 0);
    assert_eq!(minus_frame_0.position, (3, 369));
    assert_eq!(minus_frame_0.protein, format!("M{}", "A".repeat(120)));

    // The nucleotide slice indexes the reverse strand with forward-strand
    // coordinates, so it lands on the mirror segment of the ORF.
    assert_eq!(minus_frame_0.nucleotide, reverse[3..369]);
    assert!(minus_frame_0.nucleotide.starts_with("TAGATG"));

    // The other five frames never hit a stop early enough to split.
    let summaries: Vec<(i8, usize, (usize, usize), usize)> = orfs
        .iter()
        .map(|orf| (orf.strand, orf.frame, orf.position, orf.protein.len()))
        .collect();

    assert_eq!(
        summaries,
        vec![
            (1, 0, (0, 375), 125),
            (1, 1, (1, 373), 123),
            (1, 2, (2, 375), 124),
            (-1, 0, (3, 369), 121),
            (-1, 1, (0, 374), 124),
            (-1, 2, (0, 373), 124),
        ]
    );
}

#[test]
fn test_find_orfs_from_fasta() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("has_orfs.fa");

    let sequence = format!("ATG{}TAA", "GGA".repeat(132));
    fs::write(&path, format!(">contig_1\n{sequence}\n")).unwrap();

    let records = read_fasta(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, "contig_1");

    let orfs = find_orfs(&records[0].1);
    assert_eq!(orfs.len(), 6);
}
