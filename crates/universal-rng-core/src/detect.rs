//! Runtime capability detection
//!
//! Reports which vector tiers the running processor *and* operating
//! system can execute. Every query reads CPUID/XCR0 afresh; nothing is
//! cached here. Callers that want a cached answer keep their own
//! [`CapabilityReport`].
//!
//! The gating order mirrors what the hardware requires:
//!
//! ```text
//! Tier     Lanes  Requirement
//! ───────  ─────  ──────────────────────────────────────────────────
//! avx512   8      OSXSAVE, AVX512F (leaf 7 EBX.16), XCR0 & 0xE6
//! avx2     4      OSXSAVE, AVX (leaf 1 ECX.28), AVX2 (leaf 7 EBX.5), XCR0 & 0x6
//! sse2     2      baseline on x86_64, CPUID leaf 1 EDX.26 on x86
//! scalar   1      always
//! ```
//!
//! OSXSAVE gates every AVX check: when it is clear, leaf 7 and XCR0 are
//! never read.

use crate::error::Error;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A vector-width capability level the generators can target
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// No vector extension, one lane
    Scalar,
    /// 128-bit registers, two lanes
    Sse2,
    /// 256-bit registers, four lanes
    Avx2,
    /// 512-bit registers, eight lanes
    Avx512,
}

impl Tier {
    /// Probe order used by the facade
    pub const WIDEST_FIRST: [Tier; 4] = [Tier::Avx512, Tier::Avx2, Tier::Sse2, Tier::Scalar];

    /// Number of 64-bit lanes processed per recurrence step
    pub const fn lanes(self) -> usize {
        match self {
            Tier::Scalar => 1,
            Tier::Sse2 => 2,
            Tier::Avx2 => 4,
            Tier::Avx512 => 8,
        }
    }

    /// Canonical lowercase name, also the Cargo feature name
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Scalar => "scalar",
            Tier::Sse2 => "sse2",
            Tier::Avx2 => "avx2",
            Tier::Avx512 => "avx512",
        }
    }

    /// Width-based label (`tier-1`, `tier-2`, ...)
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Scalar => "tier-1",
            Tier::Sse2 => "tier-2",
            Tier::Avx2 => "tier-4",
            Tier::Avx512 => "tier-8",
        }
    }

    /// Whether the tier's backend is part of this build
    pub const fn is_compiled(self) -> bool {
        match self {
            Tier::Scalar => true,
            Tier::Sse2 => cfg!(all(target_arch = "x86_64", feature = "sse2")),
            Tier::Avx2 => cfg!(all(target_arch = "x86_64", feature = "avx2")),
            Tier::Avx512 => cfg!(all(target_arch = "x86_64", feature = "avx512")),
        }
    }

    const fn flag(self) -> TierSet {
        match self {
            Tier::Scalar => TierSet::SCALAR,
            Tier::Sse2 => TierSet::SSE2,
            Tier::Avx2 => TierSet::AVX2,
            Tier::Avx512 => TierSet::AVX512,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "tier-1" => Ok(Tier::Scalar),
            "sse2" | "tier-2" => Ok(Tier::Sse2),
            "avx2" | "tier-4" => Ok(Tier::Avx2),
            "avx512" | "tier-8" => Ok(Tier::Avx512),
            other => Err(Error::unknown_tier(other)),
        }
    }
}

bitflags! {
    /// Set of tiers usable on a host
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TierSet: u8 {
        const SCALAR = 1 << 0;
        const SSE2 = 1 << 1;
        const AVX2 = 1 << 2;
        const AVX512 = 1 << 3;
    }
}

/// Snapshot of which tiers the host supports
///
/// Scalar is always present. The three vector flags are independent:
/// a host may report AVX2 without AVX-512, or (under an OS that does not
/// save YMM state) SSE2 alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapabilityReport {
    tiers: TierSet,
}

impl CapabilityReport {
    /// Query the running host
    pub fn detect() -> Self {
        Self::detect_with(&HostCpuid)
    }

    /// Query through an arbitrary CPUID source
    pub fn detect_with<S: CpuidSource>(source: &S) -> Self {
        let mut tiers = TierSet::SCALAR;
        for tier in [Tier::Sse2, Tier::Avx2, Tier::Avx512] {
            if detect_with(source, tier) {
                tiers |= tier.flag();
            }
        }
        Self { tiers }
    }

    /// Build a report from explicit flags, e.g. to force a fallback path
    pub fn from_flags(avx512: bool, avx2: bool, sse2: bool) -> Self {
        let mut tiers = TierSet::SCALAR;
        tiers.set(TierSet::AVX512, avx512);
        tiers.set(TierSet::AVX2, avx2);
        tiers.set(TierSet::SSE2, sse2);
        Self { tiers }
    }

    /// Report that only the scalar tier is usable
    pub fn scalar_only() -> Self {
        Self { tiers: TierSet::SCALAR }
    }

    pub fn supports(&self, tier: Tier) -> bool {
        self.tiers.contains(tier.flag())
    }

    pub fn avx512(&self) -> bool {
        self.supports(Tier::Avx512)
    }

    pub fn avx2(&self) -> bool {
        self.supports(Tier::Avx2)
    }

    pub fn sse2(&self) -> bool {
        self.supports(Tier::Sse2)
    }

    /// Widest supported tier
    pub fn best(&self) -> Tier {
        Tier::WIDEST_FIRST
            .into_iter()
            .find(|&tier| self.supports(tier))
            .unwrap_or(Tier::Scalar)
    }

    pub fn tiers(&self) -> TierSet {
        self.tiers
    }
}

impl fmt::Display for CapabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        write!(
            f,
            "sse2: {}, avx2: {}, avx512: {}",
            yes_no(self.sse2()),
            yes_no(self.avx2()),
            yes_no(self.avx512())
        )
    }
}

/// Register values returned by one CPUID query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuidLeaf {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

/// Source of raw CPUID and XCR0 values
///
/// `xcr0` is only called after leaf 1 reported OSXSAVE, which is the
/// condition under which XGETBV is a legal instruction.
pub trait CpuidSource {
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidLeaf;
    fn xcr0(&self) -> u64;
}

/// Reads the running processor
#[derive(Clone, Copy, Debug, Default)]
pub struct HostCpuid;

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
impl CpuidSource for HostCpuid {
    #[allow(unused_unsafe)]
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidLeaf {
        #[cfg(target_arch = "x86")]
        use std::arch::x86::__cpuid_count;
        #[cfg(target_arch = "x86_64")]
        use std::arch::x86_64::__cpuid_count;

        // Safety: CPUID is available on every x86_64 processor and on every
        // x86 processor Rust targets.
        let r = unsafe { __cpuid_count(leaf, subleaf) };
        CpuidLeaf {
            eax: r.eax,
            ebx: r.ebx,
            ecx: r.ecx,
            edx: r.edx,
        }
    }

    fn xcr0(&self) -> u64 {
        // Safety: only reached after OSXSAVE was observed set.
        unsafe { read_xcr0() }
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "xsave")]
unsafe fn read_xcr0() -> u64 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::_xgetbv;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::_xgetbv;

    _xgetbv(0)
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
impl CpuidSource for HostCpuid {
    fn cpuid(&self, _leaf: u32, _subleaf: u32) -> CpuidLeaf {
        CpuidLeaf::default()
    }

    fn xcr0(&self) -> u64 {
        0
    }
}

const LEAF1_ECX_OSXSAVE: u32 = 1 << 27;
const LEAF1_ECX_AVX: u32 = 1 << 28;
const LEAF1_EDX_SSE2: u32 = 1 << 26;
const LEAF7_EBX_AVX2: u32 = 1 << 5;
const LEAF7_EBX_AVX512F: u32 = 1 << 16;

/// XMM | YMM state
const XCR0_AVX_STATE: u64 = 0x6;
/// XMM | YMM | opmask | ZMM_Hi256 | Hi16_ZMM state
const XCR0_AVX512_STATE: u64 = 0xE6;

/// Check a tier on the running host
pub fn detect(tier: Tier) -> bool {
    detect_with(&HostCpuid, tier)
}

/// Check a tier through an arbitrary CPUID source
pub fn detect_with<S: CpuidSource>(source: &S, tier: Tier) -> bool {
    match tier {
        Tier::Scalar => true,
        Tier::Sse2 => detect_sse2(source),
        Tier::Avx2 => detect_avx2(source),
        Tier::Avx512 => detect_avx512(source),
    }
}

fn detect_sse2<S: CpuidSource>(source: &S) -> bool {
    if cfg!(target_arch = "x86_64") {
        return true;
    }
    if cfg!(target_arch = "x86") {
        return source.cpuid(1, 0).edx & LEAF1_EDX_SSE2 != 0;
    }
    false
}

fn detect_avx2<S: CpuidSource>(source: &S) -> bool {
    if !cfg!(any(target_arch = "x86_64", target_arch = "x86")) {
        return false;
    }
    let leaf1 = source.cpuid(1, 0);
    if leaf1.ecx & LEAF1_ECX_OSXSAVE == 0 || leaf1.ecx & LEAF1_ECX_AVX == 0 {
        return false;
    }
    if max_leaf(source) < 7 || source.cpuid(7, 0).ebx & LEAF7_EBX_AVX2 == 0 {
        return false;
    }
    source.xcr0() & XCR0_AVX_STATE == XCR0_AVX_STATE
}

fn detect_avx512<S: CpuidSource>(source: &S) -> bool {
    if !cfg!(any(target_arch = "x86_64", target_arch = "x86")) {
        return false;
    }
    if source.cpuid(1, 0).ecx & LEAF1_ECX_OSXSAVE == 0 {
        return false;
    }
    if max_leaf(source) < 7 || source.cpuid(7, 0).ebx & LEAF7_EBX_AVX512F == 0 {
        return false;
    }
    source.xcr0() & XCR0_AVX512_STATE == XCR0_AVX512_STATE
}

fn max_leaf<S: CpuidSource>(source: &S) -> u32 {
    source.cpuid(0, 0).eax
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scripted CPUID values that record every query
    struct FakeCpuid {
        max_leaf: u32,
        leaf1_ecx: u32,
        leaf7_ebx: u32,
        xcr0: u64,
        reads: RefCell<Vec<&'static str>>,
    }

    impl FakeCpuid {
        fn new(leaf1_ecx: u32, leaf7_ebx: u32, xcr0: u64) -> Self {
            Self {
                max_leaf: 0xd,
                leaf1_ecx,
                leaf7_ebx,
                xcr0,
                reads: RefCell::new(Vec::new()),
            }
        }

        fn full() -> Self {
            Self::new(
                LEAF1_ECX_OSXSAVE | LEAF1_ECX_AVX,
                LEAF7_EBX_AVX2 | LEAF7_EBX_AVX512F,
                0xE7,
            )
        }
    }

    impl CpuidSource for FakeCpuid {
        fn cpuid(&self, leaf: u32, _subleaf: u32) -> CpuidLeaf {
            match leaf {
                0 => {
                    self.reads.borrow_mut().push("leaf0");
                    CpuidLeaf { eax: self.max_leaf, ..Default::default() }
                }
                1 => {
                    self.reads.borrow_mut().push("leaf1");
                    CpuidLeaf { ecx: self.leaf1_ecx, edx: LEAF1_EDX_SSE2, ..Default::default() }
                }
                7 => {
                    self.reads.borrow_mut().push("leaf7");
                    CpuidLeaf { ebx: self.leaf7_ebx, ..Default::default() }
                }
                _ => CpuidLeaf::default(),
            }
        }

        fn xcr0(&self) -> u64 {
            self.reads.borrow_mut().push("xcr0");
            self.xcr0
        }
    }

    #[test]
    fn test_tier_metadata() {
        assert_eq!(Tier::Scalar.lanes(), 1);
        assert_eq!(Tier::Sse2.lanes(), 2);
        assert_eq!(Tier::Avx2.lanes(), 4);
        assert_eq!(Tier::Avx512.lanes(), 8);
        assert_eq!(Tier::Avx512.label(), "tier-8");
        assert!(Tier::Scalar.is_compiled());
        let widths: Vec<_> = Tier::WIDEST_FIRST.iter().map(|t| t.lanes()).collect();
        assert_eq!(widths, vec![8, 4, 2, 1]);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("avx2".parse::<Tier>().unwrap(), Tier::Avx2);
        assert_eq!(" AVX512 ".parse::<Tier>().unwrap(), Tier::Avx512);
        assert_eq!("tier-2".parse::<Tier>().unwrap(), Tier::Sse2);
        assert_eq!("tier-1".parse::<Tier>().unwrap(), Tier::Scalar);
        assert!("neon".parse::<Tier>().is_err());
        for tier in Tier::WIDEST_FIRST {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    #[test]
    fn test_osxsave_gates_deeper_reads() {
        let fake = FakeCpuid::new(LEAF1_ECX_AVX, LEAF7_EBX_AVX2 | LEAF7_EBX_AVX512F, 0xE7);

        assert!(!detect_with(&fake, Tier::Avx512));
        assert!(!detect_with(&fake, Tier::Avx2));
        let reads = fake.reads.borrow();
        assert!(!reads.contains(&"leaf7"), "leaf 7 read without OSXSAVE: {reads:?}");
        assert!(!reads.contains(&"xcr0"), "XCR0 read without OSXSAVE: {reads:?}");
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    #[test]
    fn test_full_support() {
        let report = CapabilityReport::detect_with(&FakeCpuid::full());
        assert!(report.avx512());
        assert!(report.avx2());
        assert!(report.supports(Tier::Scalar));
        assert_eq!(report.best(), Tier::Avx512);
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    #[test]
    fn test_os_state_mask_required() {
        // ZMM state not enabled by the OS: AVX-512 off, AVX2 still on
        let fake = FakeCpuid::new(
            LEAF1_ECX_OSXSAVE | LEAF1_ECX_AVX,
            LEAF7_EBX_AVX2 | LEAF7_EBX_AVX512F,
            0x7,
        );
        assert!(!detect_with(&fake, Tier::Avx512));
        assert!(detect_with(&fake, Tier::Avx2));

        // YMM state disabled: both off
        let fake = FakeCpuid::new(
            LEAF1_ECX_OSXSAVE | LEAF1_ECX_AVX,
            LEAF7_EBX_AVX2 | LEAF7_EBX_AVX512F,
            0x3,
        );
        assert!(!detect_with(&fake, Tier::Avx512));
        assert!(!detect_with(&fake, Tier::Avx2));
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    #[test]
    fn test_feature_bits_required() {
        let fake = FakeCpuid::new(LEAF1_ECX_OSXSAVE | LEAF1_ECX_AVX, LEAF7_EBX_AVX2, 0xE7);
        assert!(!detect_with(&fake, Tier::Avx512));
        assert!(detect_with(&fake, Tier::Avx2));

        // AVX2 bit without the AVX bit is not usable
        let fake = FakeCpuid::new(LEAF1_ECX_OSXSAVE, LEAF7_EBX_AVX2, 0xE7);
        assert!(!detect_with(&fake, Tier::Avx2));
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    #[test]
    fn test_low_max_leaf_skips_leaf7() {
        let mut fake = FakeCpuid::full();
        fake.max_leaf = 5;
        assert!(!detect_with(&fake, Tier::Avx2));
        assert!(!detect_with(&fake, Tier::Avx512));
        assert!(!fake.reads.borrow().contains(&"leaf7"));
    }

    #[test]
    fn test_report_from_flags() {
        let report = CapabilityReport::from_flags(false, true, true);
        assert!(!report.avx512());
        assert!(report.avx2());
        assert_eq!(report.best(), Tier::Avx2);
        assert_eq!(report.to_string(), "sse2: yes, avx2: yes, avx512: no");

        let report = CapabilityReport::scalar_only();
        assert_eq!(report.best(), Tier::Scalar);
        assert_eq!(report.tiers(), TierSet::SCALAR);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_host_detection_agrees_with_std() {
        let report = CapabilityReport::detect();
        assert!(report.sse2());
        if report.avx2() {
            assert!(is_x86_feature_detected!("avx2"));
        }
        if report.avx512() {
            assert!(is_x86_feature_detected!("avx512f"));
        }
        // Repeated queries give the same answer
        assert_eq!(report, CapabilityReport::detect());
    }
}
