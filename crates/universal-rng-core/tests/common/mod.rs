//! Shared utilities for integration tests

#![allow(dead_code)]

use universal_rng_core::primitives::LaneVector;
use universal_rng_core::{
    CapabilityReport, LaneGenerator, PortableGenerator, RngConfig, ScalarGenerator, Tier,
    UniversalRng,
};

/// First five scalar outputs for seed 42
pub const SEED_42_SCALAR: [u64; 5] = [
    0x1798_5c1d_f11d_9a07,
    0x60ca_a2c7_1c39_15d0,
    0x0004_34ea_9cca_1669,
    0xa9e2_9942_bb64_c9dd,
    0xe4aa_7806_27cd_c444,
];

/// Common surface of every generator under test
pub trait TestRng {
    fn name(&self) -> String;
    fn lanes(&self) -> usize;
    fn next_u64(&mut self) -> u64;
    fn next_double(&mut self) -> f64;
    fn next_batch(&mut self, out: &mut [u64], count: usize);
    fn buffered(&self) -> usize;
}

impl<V: LaneVector> TestRng for LaneGenerator<V> {
    fn name(&self) -> String {
        format!("{}x{}", self.backend_name(), LaneGenerator::lanes(self))
    }

    fn lanes(&self) -> usize {
        LaneGenerator::lanes(self)
    }

    fn next_u64(&mut self) -> u64 {
        LaneGenerator::next_u64(self)
    }

    fn next_double(&mut self) -> f64 {
        LaneGenerator::next_double(self)
    }

    fn next_batch(&mut self, out: &mut [u64], count: usize) {
        LaneGenerator::next_batch(self, out, count)
    }

    fn buffered(&self) -> usize {
        LaneGenerator::buffered(self)
    }
}

impl TestRng for UniversalRng {
    fn name(&self) -> String {
        format!("facade({})", self.implementation_name())
    }

    fn lanes(&self) -> usize {
        UniversalRng::lanes(self)
    }

    fn next_u64(&mut self) -> u64 {
        UniversalRng::next_u64(self)
    }

    fn next_double(&mut self) -> f64 {
        UniversalRng::next_double(self)
    }

    fn next_batch(&mut self, out: &mut [u64], count: usize) {
        UniversalRng::next_batch(self, out, count)
    }

    fn buffered(&self) -> usize {
        UniversalRng::buffered(self)
    }
}

/// Hardware tiers this host and build can run, widest first
pub fn hardware_tiers() -> Vec<Tier> {
    let report = CapabilityReport::detect();
    Tier::WIDEST_FIRST
        .into_iter()
        .filter(|&tier| tier != Tier::Scalar && tier.is_compiled() && report.supports(tier))
        .collect()
}

/// One facade per runnable tier, each pinned to that tier
pub fn facade_per_tier(seed: u64) -> Vec<UniversalRng> {
    let mut tiers = hardware_tiers();
    tiers.push(Tier::Scalar);
    tiers
        .into_iter()
        .map(|tier| {
            let rng = UniversalRng::with_config(&RngConfig::new(seed).with_max_tier(tier))
                .expect("facade construction");
            assert_eq!(rng.tier(), tier, "cap {tier} bound {}", rng.tier());
            rng
        })
        .collect()
}

/// Scalar, portable widths 2/4/8, and every runnable hardware tier
pub fn every_generator(seed: u64) -> Vec<Box<dyn TestRng>> {
    let mut rngs: Vec<Box<dyn TestRng>> = vec![
        Box::new(ScalarGenerator::new(seed)),
        Box::new(PortableGenerator::<2>::try_new(seed).unwrap()),
        Box::new(PortableGenerator::<4>::try_new(seed).unwrap()),
        Box::new(PortableGenerator::<8>::try_new(seed).unwrap()),
    ];
    for rng in facade_per_tier(seed) {
        rngs.push(Box::new(rng));
    }
    rngs
}

/// Expected output of a width-`lanes` generator, built from scalar streams
pub fn lane_reference(seed: u64, lanes: usize, count: usize) -> Vec<u64> {
    let mut streams: Vec<ScalarGenerator> = (0..lanes)
        .map(|lane| ScalarGenerator::new(seed.wrapping_add(lane as u64)))
        .collect();
    (0..count).map(|k| streams[k % lanes].next_u64()).collect()
}

/// Fraction of set bits at each position over `draws` values
pub fn bit_balance(rng: &mut dyn TestRng, draws: usize) -> [f64; 64] {
    const CHUNK: usize = 4096;
    let mut counts = [0u64; 64];
    let mut buf = vec![0u64; CHUNK];
    let mut remaining = draws;
    while remaining > 0 {
        let n = remaining.min(CHUNK);
        rng.next_batch(&mut buf, n);
        for &value in &buf[..n] {
            let mut bits = value;
            while bits != 0 {
                counts[bits.trailing_zeros() as usize] += 1;
                bits &= bits - 1;
            }
        }
        remaining -= n;
    }
    counts.map(|c| c as f64 / draws as f64)
}
