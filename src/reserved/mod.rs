//! Reserved module - GKE's kubeReserved.cpu allocation policy.
//!
//! See: https://cloud.google.com/kubernetes-engine/docs/concepts/cluster-architecture#memory_cpu

mod compute;
mod quantity;

pub use compute::*;
pub use quantity::*;
