//! # Kubelet CPU Reserve
//!
//! Rewrites the `kubeReserved.cpu` field of a GKE kubelet-config.yaml file to
//! the value GKE's node allocation policy gives for a CPU count.
//!
//! ## Modules
//!
//! - [`node`] - Untyped in-memory YAML tree and its codec
//! - [`document`] - Path-based get/set over a kubelet-config.yaml, with trailer handling
//! - [`reserved`] - GKE's reserved CPU formula and milli-CPU quantities
//!
//! ## Example
//!
//! ```
//! let input = b"kubeReserved:\n  cpu: 0m\nKUBE_SCHEDULER_CONFIG\n";
//! let output = kubelet_cpu_reserve::update_reserved_cpu(input, 16).unwrap();
//! assert_eq!(output, b"kubeReserved:\n  cpu: 110m\nKUBE_SCHEDULER_CONFIG\n");
//! ```

pub mod document;
mod error;
pub mod node;
pub mod reserved;

pub use document::{update_reserved_cpu, KubeletConfig, Path};
pub use error::{Error, ParseError, PathError, Result, SerializeError, TypeError};
pub use node::{Mapping, Node, Scalar};
pub use reserved::{compute_reserved_cpu, MilliCpu};
