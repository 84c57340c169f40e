//! CPU quantities in milli-units.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Milli-units per logical CPU.
pub const MILLIS_PER_CPU: u64 = 1000;

/// MilliCpu is an amount of CPU in thousandths of a logical core, written
/// as `<n>m` in kubelet configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MilliCpu(pub u64);

impl MilliCpu {
    /// Returns the quantity covering `cpus` whole cores.
    pub fn from_cores(cpus: u64) -> Self {
        MilliCpu(cpus.saturating_mul(MILLIS_PER_CPU))
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn checked_sub(self, other: MilliCpu) -> Option<MilliCpu> {
        self.0.checked_sub(other.0).map(MilliCpu)
    }
}

impl fmt::Display for MilliCpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// QuantityError is returned for CPU quantities this crate cannot read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CPU quantity {0:?}")]
pub struct QuantityError(pub String);

impl FromStr for MilliCpu {
    type Err = QuantityError;

    /// Parses `<n>m` (milli-units) or `<n>` (whole cores).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuantityError(s.to_string());
        match s.strip_suffix('m') {
            Some(millis) => millis.parse().map(MilliCpu).map_err(|_| invalid()),
            None => s
                .parse::<u64>()
                .ok()
                .and_then(|cpus| cpus.checked_mul(MILLIS_PER_CPU))
                .map(MilliCpu)
                .ok_or_else(invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(MilliCpu(1060).to_string(), "1060m");
        assert_eq!(MilliCpu::default().to_string(), "0m");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1060m".parse::<MilliCpu>(), Ok(MilliCpu(1060)));
        assert_eq!("0m".parse::<MilliCpu>(), Ok(MilliCpu(0)));
        assert_eq!("2".parse::<MilliCpu>(), Ok(MilliCpu(2000)));

        assert!("".parse::<MilliCpu>().is_err());
        assert!("m".parse::<MilliCpu>().is_err());
        assert!("1.5".parse::<MilliCpu>().is_err());
        assert!("-10m".parse::<MilliCpu>().is_err());
        assert_eq!(
            "100Mi".parse::<MilliCpu>(),
            Err(QuantityError("100Mi".to_string()))
        );
    }

    #[test]
    fn test_allocatable() {
        let total = MilliCpu::from_cores(2);
        assert_eq!(total.checked_sub(MilliCpu(1060)), Some(MilliCpu(940)));
        assert_eq!(MilliCpu(10).checked_sub(MilliCpu(20)), None);
    }
}
