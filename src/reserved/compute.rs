//! Computation of the kubeReserved.cpu field.

use tracing::debug;

use super::quantity::MilliCpu;
use crate::document::KubeletConfig;
use crate::error::Result;

/// GKE sets kubeReserved.cpu to 1060m (.94 allocatable CPU) for several
/// small machine types (e2-medium, e2-small, ...) instead of computing it.
pub const GKE_CUSTOM_RESERVED_CPU: &str = "1060m";

/// Basis points (hundredths of a percent) in one core.
const BASIS_POINTS_PER_CPU: u64 = 10_000;

/// ReservationTier reserves a fixed share of every core whose index falls in
/// `[min_cpu, max_cpu)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationTier {
    /// Share of each core, in basis points.
    pub basis_points: u64,
    pub min_cpu: u64,
    /// `None` extends the tier to the last core.
    pub max_cpu: Option<u64>,
}

impl ReservationTier {
    /// Returns how many of the cores `[0, cpus)` this tier covers.
    pub fn cores(&self, cpus: u64) -> u64 {
        let end = self.max_cpu.map_or(cpus, |max| max.min(cpus));
        end.saturating_sub(self.min_cpu)
    }
}

/// GKE's CPU reservation: 6% of the first core, 1% of the second, 0.5% of
/// the next two and 0.25% of every core after that.
pub const GKE_RESERVATION_TIERS: [ReservationTier; 4] = [
    ReservationTier {
        basis_points: 600,
        min_cpu: 0,
        max_cpu: Some(1),
    },
    ReservationTier {
        basis_points: 100,
        min_cpu: 1,
        max_cpu: Some(2),
    },
    ReservationTier {
        basis_points: 50,
        min_cpu: 2,
        max_cpu: Some(4),
    },
    ReservationTier {
        basis_points: 25,
        min_cpu: 4,
        max_cpu: None,
    },
];

/// Returns the CPU GKE reserves on a node with `cpus` logical CPUs.
///
/// Shares are summed across all cores first and truncated to whole
/// milli-units once.
pub fn reserved_milli_cpus(cpus: u64) -> MilliCpu {
    let basis_points: u128 = GKE_RESERVATION_TIERS
        .iter()
        .map(|tier| u128::from(tier.cores(cpus)) * u128::from(tier.basis_points))
        .sum();
    let millis = basis_points * u128::from(MilliCpu::from_cores(1).as_millis())
        / u128::from(BASIS_POINTS_PER_CPU);
    MilliCpu(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Returns the value for the kubeReserved.cpu field of `config` on a node
/// with `cpus` logical CPUs.
///
/// For two CPUs or fewer the current field is read first: if GKE already
/// set it to [`GKE_CUSTOM_RESERVED_CPU`] that value is kept. A missing or
/// non-string field is an error in that case.
pub fn compute_reserved_cpu(config: &KubeletConfig, cpus: u64) -> Result<String> {
    if cpus <= 2 {
        let current = config.get_reserved_cpu()?;
        if current == GKE_CUSTOM_RESERVED_CPU {
            debug!(cpus, reserved = current, "keeping GKE custom reserved CPU");
            return Ok(current.to_string());
        }
    }

    let reserved = reserved_milli_cpus(cpus);
    debug!(cpus, %reserved, "computed reserved CPU");
    Ok(reserved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_cores() {
        let [first, second, third, rest] = GKE_RESERVATION_TIERS;
        assert_eq!(first.cores(0), 0);
        assert_eq!(first.cores(1), 1);
        assert_eq!(first.cores(64), 1);
        assert_eq!(second.cores(1), 0);
        assert_eq!(second.cores(2), 1);
        assert_eq!(third.cores(3), 1);
        assert_eq!(third.cores(16), 2);
        assert_eq!(rest.cores(4), 0);
        assert_eq!(rest.cores(16), 12);
    }

    #[test]
    fn test_reserved_milli_cpus() {
        assert_eq!(reserved_milli_cpus(0), MilliCpu(0));
        assert_eq!(reserved_milli_cpus(1), MilliCpu(60));
        assert_eq!(reserved_milli_cpus(2), MilliCpu(70));
        assert_eq!(reserved_milli_cpus(4), MilliCpu(80));
        assert_eq!(reserved_milli_cpus(8), MilliCpu(90));
        assert_eq!(reserved_milli_cpus(16), MilliCpu(110));
        assert_eq!(reserved_milli_cpus(32), MilliCpu(150));
        assert_eq!(reserved_milli_cpus(64), MilliCpu(230));
    }

    #[test]
    fn test_truncates_aggregate_once() {
        // 80m + 2.5m per extra core: the half milli-unit is dropped only
        // after summing.
        assert_eq!(reserved_milli_cpus(5), MilliCpu(82));
        assert_eq!(reserved_milli_cpus(6), MilliCpu(85));
        assert_eq!(reserved_milli_cpus(7), MilliCpu(87));
    }

    #[test]
    fn test_huge_cpu_count_saturates() {
        assert_eq!(reserved_milli_cpus(u64::MAX), MilliCpu(u64::MAX));
    }
}
