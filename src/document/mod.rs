//! Document module - Path-based access to a kubelet configuration file.
//!
//! This module wraps the untyped [`crate::node`] tree with the trailer
//! handling GKE's kubelet-config.yaml requires, and exposes generic get/set
//! by [`Path`].

mod kubeconfig;
mod path;


pub use kubeconfig::*;
pub use path::*;
