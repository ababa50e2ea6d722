//! Property-based tests for buffer management
//!
//! However a caller mixes single draws and batches, the values delivered
//! must be the generator's one underlying sequence.

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use universal_rng_core::{PortableGenerator, RngConfig, ScalarGenerator, UniversalRng};

    fn reference(seed: u64, lanes: usize, count: usize) -> Vec<u64> {
        let mut streams: Vec<ScalarGenerator> = (0..lanes)
            .map(|lane| ScalarGenerator::new(seed.wrapping_add(lane as u64)))
            .collect();
        (0..count).map(|k| streams[k % lanes].next_u64()).collect()
    }

    proptest! {
        // Property: any interleaving of draws and batches reproduces the sequence
        #[test]
        fn prop_facade_mixed_draws_match_sequence(
            seed in any::<u64>(),
            warmup in 0usize..20,
            chunks in prop::collection::vec(0usize..70, 1..12)
        ) {
            let mut rng = UniversalRng::with_config(&RngConfig::new(seed)).unwrap();
            let total = warmup + chunks.iter().sum::<usize>();
            let expected = reference(seed, rng.lanes(), total);

            let mut got = Vec::with_capacity(total);
            for _ in 0..warmup {
                got.push(rng.next_u64());
            }
            for &chunk in &chunks {
                let mut out = vec![0u64; chunk];
                rng.next_batch(&mut out, chunk);
                got.extend_from_slice(&out);
            }
            prop_assert_eq!(got, expected);
        }

        // Property: portable widths follow the same lane layout
        #[test]
        fn prop_portable_batches_match_sequence(
            seed in any::<u64>(),
            warmup in 0usize..10,
            chunk in 0usize..100
        ) {
            let mut wide = PortableGenerator::<4>::try_new(seed).unwrap();
            let expected = reference(seed, 4, warmup + chunk);

            let mut got: Vec<u64> = (0..warmup).map(|_| wide.next_u64()).collect();
            let mut out = vec![0u64; chunk];
            wide.next_batch(&mut out, chunk);
            got.extend_from_slice(&out);
            prop_assert_eq!(got, expected);
        }

        // Property: doubles stay in [0, 1) for any seed
        #[test]
        fn prop_doubles_in_unit_interval(seed in any::<u64>()) {
            let mut rng = UniversalRng::new(seed).unwrap();
            for _ in 0..256 {
                let x = rng.next_double();
                prop_assert!((0.0..1.0).contains(&x));
                let f = rng.next_float();
                prop_assert!((0.0..1.0).contains(&f));
            }
        }

        // Property: buffered count stays within one refill
        #[test]
        fn prop_buffered_bounded_by_lanes(
            seed in any::<u64>(),
            draws in 0usize..50
        ) {
            let mut rng = UniversalRng::new(seed).unwrap();
            for _ in 0..draws {
                rng.next_u64();
                prop_assert!(rng.buffered() <= rng.lanes());
            }
        }
    }
}
