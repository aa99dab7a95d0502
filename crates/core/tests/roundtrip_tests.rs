//! Tests de roundtrip encodage → décodage
//!
//! Vérifient que le décodage restitue la charge utile octet pour octet,
//! pour différentes tailles, avec et sans primer, et pour les deux largeurs
//! de symboles du code externe.

use arcadn_core::{CodecParams, Decoder, Encoder};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

fn roundtrip(payload: &[u8], params: CodecParams) {
    let mut encoder = Encoder::new(params.clone()).unwrap();
    let text = encoder.encode_to_text(payload).unwrap();

    let mut decoder = Decoder::new(params).unwrap();
    let decoded = decoder.decode(&text).unwrap();
    assert_eq!(decoded, payload, "charge utile altérée au roundtrip");
    assert!(!decoder.stats().error);
    assert_eq!(decoder.stats().corrections.outer, 0);
    assert_eq!(decoder.stats().corrections.segments_lost, 0);
}

#[test]
fn test_roundtrip_small_sizes() {
    for len in [0usize, 1, 16, 1024] {
        roundtrip(&random_payload(len, len as u64), CodecParams::default());
    }
}

#[test]
fn test_roundtrip_64k() {
    roundtrip(&random_payload(65536, 99), CodecParams::default());
}

#[test]
fn test_roundtrip_with_package_id() {
    let params = CodecParams::with_package_id("urn:aip:2024:demo");
    roundtrip(&random_payload(2048, 7), params);
}

#[test]
fn test_roundtrip_mo8() {
    let params = CodecParams {
        mo: 8,
        ..CodecParams::default()
    };
    roundtrip(&random_payload(2048, 11), params);
}

#[test]
fn test_roundtrip_mo8_multi_block() {
    // assez de colonnes pour forcer plusieurs blocs avec mo=8
    let params = CodecParams {
        mo: 8,
        ..CodecParams::default()
    };
    roundtrip(&random_payload(40_000, 13), params);
}

#[test]
fn test_roundtrip_text_payload() {
    let payload = "Garder longtemps, lire rarement: l'ADN comme support d'archivage.\n"
        .repeat(40)
        .into_bytes();
    roundtrip(&payload, CodecParams::default());
}

#[test]
fn test_single_column_exact_fit() {
    // sans conteneur, une charge utile de (dK−dI)/4 octets remplit
    // exactement une colonne: pas de bourrage, roundtrip exact
    let params = CodecParams {
        auto_zip: false,
        primer_length: 0,
        ..CodecParams::default()
    };
    assert_eq!(params.message_rows() % 4, 0);
    let payload = random_payload(params.message_rows() / 4, 3);

    let mut encoder = Encoder::new(params.clone()).unwrap();
    let text = encoder.encode_to_text(&payload).unwrap();
    let mut decoder = Decoder::new(params).unwrap();
    assert_eq!(decoder.decode(&text).unwrap(), payload);
}

#[test]
fn test_raw_mode_returns_payload_prefix() {
    // sans conteneur, le bourrage de la dernière colonne suit la charge
    // utile; le préfixe doit rester intact
    let params = CodecParams {
        auto_zip: false,
        primer_length: 0,
        ..CodecParams::default()
    };
    let payload = random_payload(777, 5);

    let mut encoder = Encoder::new(params.clone()).unwrap();
    let text = encoder.encode_to_text(&payload).unwrap();
    let mut decoder = Decoder::new(params).unwrap();
    let decoded = decoder.decode(&text).unwrap();
    assert!(decoded.len() >= payload.len());
    assert_eq!(&decoded[..payload.len()], &payload[..]);
}

#[test]
fn test_segment_count_at_block_boundaries() {
    // des charges utiles calibrées pour tomber juste avant, sur, et juste
    // après une frontière de bloc (mo=8, blocs de 336 colonnes de message)
    let params = CodecParams {
        mo: 8,
        auto_zip: false,
        primer_length: 0,
        ..CodecParams::default()
    };
    let column_bytes = params.message_rows() / 4;
    for columns in [335usize, 336, 337, 1020, 1021] {
        let payload = random_payload(columns * column_bytes, columns as u64);
        let mut encoder = Encoder::new(params.clone()).unwrap();
        let text = encoder.encode_to_text(&payload).unwrap();
        let mut decoder = Decoder::new(params.clone()).unwrap();
        let decoded = decoder.decode(&text).unwrap();
        assert_eq!(&decoded[..payload.len()], &payload[..], "colonnes: {columns}");
    }
}

#[test]
fn test_stats_consistency_between_sides() {
    let params = CodecParams::default();
    let payload = random_payload(4096, 17);

    let mut encoder = Encoder::new(params.clone()).unwrap();
    let text = encoder.encode_to_text(&payload).unwrap();
    let mut decoder = Decoder::new(params).unwrap();
    decoder.decode(&text).unwrap();

    let enc = encoder.stats();
    let dec = decoder.stats();
    assert_eq!(enc.parameters.necso, dec.parameters.necso);
    assert_eq!(enc.parameters.numblocks, dec.parameters.numblocks);
    assert_eq!(enc.parameters.dblocksize, dec.parameters.dblocksize);
    assert_eq!(enc.segments.count, dec.segments.count);
}
