//! End-to-end scenarios across the packer, both codecs and the base mapping.

use strandcode::{
    bases_to_bits, bits_to_bases, pack_bits, rs_decode, rs_encode, unpack_bits, ErrorCorrection,
    FountainCodec, FountainConfig, FountainError, RsBitCodec, RsError, ValidityScreen,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn four_blocks() -> Vec<Vec<u8>> {
    vec![
        vec![0, 1, 1, 0, 1, 0, 0, 1, 1, 1, 0, 0, 1, 0, 1, 0],
        vec![1, 1, 1, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 1],
        vec![0, 0, 1, 1, 0, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 0],
        vec![1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    ]
}

#[test]
fn test_four_blocks_reed_solomon_scenario() {
    init_tracing();
    let blocks = four_blocks();
    for block in &blocks {
        let packed = pack_bits(block).unwrap();
        assert_eq!(packed.padding, 0);
        let codeword = rs_encode(&packed.bytes, 2).unwrap();
        assert_eq!(codeword.len(), 4);

        let clean = rs_decode(&codeword, 2, &[]).unwrap();
        assert_eq!(&unpack_bits(&clean, packed.padding).unwrap(), block);

        let mut one_flip = codeword.clone();
        one_flip[0] ^= 0b0000_0100;
        let repaired = rs_decode(&one_flip, 2, &[]).unwrap();
        assert_eq!(&unpack_bits(&repaired, packed.padding).unwrap(), block);

        let mut over_capacity = codeword.clone();
        over_capacity[1] ^= 0b0010_0000;
        over_capacity[3] ^= 0b0010_0000;
        let err = rs_decode(&over_capacity, 2, &[]).unwrap_err();
        assert!(matches!(
            err,
            RsError::UncorrectableAfterRepair | RsError::LocatorNotFound { .. }
        ));
    }
}

#[test]
fn test_reed_solomon_then_fountain_pipeline() {
    init_tracing();
    let rs = RsBitCodec::try_from(2).unwrap();
    let inserted = rs.insert(&four_blocks()).unwrap();
    assert_eq!(inserted.added_bits, 16);

    let codec = FountainCodec::new(FountainConfig {
        redundancy: 3.0,
        ..FountainConfig::default()
    })
    .unwrap();
    let screen = ValidityScreen::default();
    let mut decoded_runs = 0;
    for state in [0x55u64, 0x1234, 0xBEEF, 0x7777, 0x31337, 0xC0FFEE, 0xABCDE, 0x2468] {
        let codec = FountainCodec::new(FountainConfig {
            lfsr_state: state,
            ..codec.config().clone()
        })
        .unwrap();
        let sequences = codec.encode(&inserted.segments, |s| screen.check(s)).unwrap();
        assert_eq!(sequences.len(), 16);
        let verified = match codec.decode(&sequences, inserted.segments.len()) {
            Ok(verified) => verified,
            Err(FountainError::Undecodable { .. }) => continue,
            Err(err) => panic!("unexpected error: {err}"),
        };
        let received: Vec<Option<Vec<u8>>> = verified.into_iter().map(Some).collect();
        let report = rs.remove(&received, inserted.original_len);
        assert!(report.error_indices.is_empty());
        assert_eq!(report.segments, four_blocks());
        decoded_runs += 1;
    }
    assert!(decoded_runs >= 6, "only {decoded_runs} of 8 decoded");
}

#[test]
fn test_fountain_survives_lost_sequences() {
    init_tracing();
    let blocks: Vec<Vec<u8>> = (0..40u32)
        .map(|i| (0..24).map(|b| (i.wrapping_mul(2_654_435_761) >> b) as u8 & 1).collect())
        .collect();
    let mut decoded_runs = 0;
    for state in 1..=10u64 {
        let codec = FountainCodec::new(FountainConfig {
            redundancy: 2.0,
            lfsr_state: state * 104_729,
            ..FountainConfig::default()
        })
        .unwrap();
        let sequences = codec.encode(&blocks, |_| true).unwrap();
        // Drop every fourth sequence.
        let survivors: Vec<_> = sequences
            .into_iter()
            .enumerate()
            .filter(|(i, _)| i % 4 != 3)
            .map(|(_, s)| s)
            .collect();
        match codec.decode(&survivors, blocks.len()) {
            Ok(decoded) => {
                assert_eq!(decoded, blocks);
                decoded_runs += 1;
            }
            Err(err) => assert!(matches!(err, FountainError::Undecodable { .. })),
        }
    }
    assert!(decoded_runs >= 8, "only {decoded_runs} of 10 decoded");
}

#[test]
fn test_self_check_is_opt_in() {
    let blocks = four_blocks();
    let checked = FountainCodec::new(FountainConfig {
        redundancy: 0.0,
        verify_decodable: true,
        ..FountainConfig::default()
    })
    .unwrap();
    let unchecked = FountainCodec::new(FountainConfig {
        redundancy: 0.0,
        ..FountainConfig::default()
    })
    .unwrap();
    let sequences = unchecked.encode(&blocks, |_| true).unwrap();
    assert_eq!(sequences.len(), 4);
    match unchecked.decode(&sequences, blocks.len()) {
        Ok(_) => assert_eq!(checked.encode(&blocks, |_| true).unwrap(), sequences),
        Err(err) => assert_eq!(checked.encode(&blocks, |_| true).unwrap_err(), err),
    }
}

#[test]
fn test_sequences_map_back_to_bits() {
    let bits = vec![1, 0, 0, 1, 1, 1, 0, 0];
    let bases = bits_to_bases(&bits).unwrap();
    assert_eq!(strandcode::format_sequence(&bases), "GCTA");
    assert_eq!(bases_to_bits(&bases), bits);
}
