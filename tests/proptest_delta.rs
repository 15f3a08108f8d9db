use proptest::prelude::*;
use rdiffcore::{generate_signature_with_block_size, Encoder, SignatureIndex, DEFAULT_BLOCK_SIZE};
use std::io::Cursor;

fn roundtrip(original: &[u8], modified: &[u8], block_size: u32) -> Vec<u8> {
    let sig = generate_signature_with_block_size(original, block_size).unwrap();
    let index = SignatureIndex::from_signature(&sig);
    let mut delta = Vec::new();
    Encoder::new().encode(&index, modified, &mut delta).unwrap();

    let mut reconstructed = Vec::new();
    rdiffcore::apply(Cursor::new(original), &delta[..], &mut reconstructed).unwrap();
    reconstructed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn roundtrip_identical(data in prop::collection::vec(any::<u8>(), 0..20_000)) {
        let result = roundtrip(&data, &data, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&data, &result);
    }

    #[test]
    fn roundtrip_different(
        original in prop::collection::vec(any::<u8>(), 0..10_000),
        modified in prop::collection::vec(any::<u8>(), 0..10_000),
    ) {
        let result = roundtrip(&original, &modified, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&modified, &result);
    }

    #[test]
    fn roundtrip_varied_block_size(
        original in prop::collection::vec(any::<u8>(), 0..40_000),
        modified in prop::collection::vec(any::<u8>(), 0..40_000),
        block_size in (1u32..32).prop_map(|x| x * 256),
    ) {
        let result = roundtrip(&original, &modified, block_size);
        prop_assert_eq!(&modified, &result);
    }

    #[test]
    fn partial_modification(
        base in prop::collection::vec(any::<u8>(), 1000..20_000),
        modify_start in 0usize..1000,
        modify_len in 1usize..500,
        new_bytes in prop::collection::vec(any::<u8>(), 1..500),
    ) {
        let modify_start = modify_start % base.len();
        let modify_end = (modify_start + modify_len).min(base.len());

        let mut modified = base.clone();
        modified.splice(modify_start..modify_end, new_bytes);

        let result = roundtrip(&base, &modified, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&modified, &result);
    }

    #[test]
    fn append_data(
        base in prop::collection::vec(any::<u8>(), 100..5_000),
        append in prop::collection::vec(any::<u8>(), 1..2_000),
    ) {
        let mut modified = base.clone();
        modified.extend(&append);
        let result = roundtrip(&base, &modified, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&modified, &result);
    }

    #[test]
    fn prepend_data(
        base in prop::collection::vec(any::<u8>(), 100..5_000),
        prepend in prop::collection::vec(any::<u8>(), 1..2_000),
    ) {
        let mut modified = prepend.clone();
        modified.extend(&base);
        let result = roundtrip(&base, &modified, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&modified, &result);
    }

    #[test]
    fn truncate_data(
        base in prop::collection::vec(any::<u8>(), 100..20_000),
        keep_ratio in 0.1f64..0.9,
    ) {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let keep_len = ((base.len() as f64) * keep_ratio) as usize;
        let modified: Vec<u8> = base[..keep_len].to_vec();
        let result = roundtrip(&base, &modified, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&modified, &result);
    }
}

// Larger dataset tests; run with --release for reasonable wall-clock time.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn large_files(
        original in prop::collection::vec(any::<u8>(), 200_000..400_000),
        modified in prop::collection::vec(any::<u8>(), 200_000..400_000),
    ) {
        let result = roundtrip(&original, &modified, DEFAULT_BLOCK_SIZE);
        prop_assert_eq!(&modified, &result);
    }

    #[test]
    fn large_similar_files(
        base in prop::collection::vec(any::<u8>(), 200_000..400_000),
        modifications in prop::collection::vec((0usize..200_000, any::<u8>()), 10..100),
    ) {
        let mut modified = base.clone();
        for (pos, byte) in modifications {
            let idx = pos % modified.len();
            modified[idx] = byte;
        }

        let sig = generate_signature_with_block_size(&base[..], DEFAULT_BLOCK_SIZE).unwrap();
        let index = SignatureIndex::from_signature(&sig);
        let mut delta = Vec::new();
        let stats = Encoder::new().encode(&index, &modified[..], &mut delta).unwrap();

        prop_assert!(stats.copy_bytes > 0, "expected some Copy coverage for similar files");
        prop_assert!((delta.len() as u64) < modified.len() as u64, "delta should be smaller than the full modified file");

        let mut reconstructed = Vec::new();
        rdiffcore::apply(Cursor::new(&base), &delta[..], &mut reconstructed).unwrap();
        prop_assert_eq!(&modified, &reconstructed);
    }
}
