use strandcode::{
    format_sequence, pack_bits, ErrorCorrection, FountainCodec, FountainConfig, RsBitCodec,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let message = b"strands of ACGT survive where bytes do not";
    let bits: Vec<u8> = message
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .collect();
    let blocks: Vec<Vec<u8>> = bits
        .chunks(32)
        .map(|c| {
            let mut block = c.to_vec();
            block.resize(32, 0);
            block
        })
        .collect();

    let rs = match RsBitCodec::try_from(4) {
        Ok(rs) => rs,
        Err(err) => {
            eprintln!("bad codec parameters: {err}");
            std::process::exit(1);
        }
    };
    let inserted = match rs.insert(&blocks) {
        Ok(inserted) => inserted,
        Err(err) => {
            eprintln!("error correction failed: {err}");
            std::process::exit(1);
        }
    };

    let codec = match FountainCodec::new(FountainConfig {
        redundancy: 1.0,
        ..FountainConfig::default()
    }) {
        Ok(codec) => codec,
        Err(err) => {
            eprintln!("bad fountain parameters: {err}");
            std::process::exit(1);
        }
    };
    let sequences = match codec.encode_screened(&inserted.segments) {
        Ok(sequences) => sequences,
        Err(err) => {
            eprintln!("fountain encode failed: {err}");
            std::process::exit(1);
        }
    };
    println!("{} blocks -> {} sequences", blocks.len(), sequences.len());
    for seq in sequences.iter().take(3) {
        println!("  {}", format_sequence(seq));
    }

    // Lose every third sequence.
    let survivors: Vec<_> = sequences
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 2)
        .map(|(_, s)| s.clone())
        .collect();
    let verified = match codec.decode(&survivors, inserted.segments.len()) {
        Ok(verified) => verified,
        Err(err) => {
            eprintln!("fountain decode failed: {err}");
            std::process::exit(1);
        }
    };
    let received: Vec<Option<Vec<u8>>> = verified.into_iter().map(Some).collect();
    let report = rs.remove(&received, inserted.original_len);
    let recovered: Vec<u8> = report.segments.concat();
    match recovered.get(..bits.len()).map(pack_bits) {
        Some(Ok(packed)) if packed.bytes == message => {
            println!("Recovered: {}", String::from_utf8_lossy(&packed.bytes));
        }
        _ => {
            eprintln!("recovered payload differs from the input");
            std::process::exit(1);
        }
    }
}
