//! The kubelet configuration document wrapper.

use indexmap::map::Entry;
use tracing::debug;

use super::path::Path;
use crate::error::{ParseError, PathError, Result, SerializeError, TypeError};
use crate::node::{self, Mapping, Node, Scalar};
use crate::reserved;

/// Trailer line that GKE appends to kubelet-config.yaml files. It is not
/// YAML content and must be written back byte for byte.
pub const KUBECONFIG_SUFFIX: &str = "KUBE_SCHEDULER_CONFIG\n";

pub const KUBE_RESERVED_FIELD: &str = "kubeReserved";
pub const CPU_FIELD: &str = "cpu";

/// Returns the path of the `kubeReserved.cpu` field.
pub fn reserved_cpu_path() -> Path {
    Path::from([KUBE_RESERVED_FIELD, CPU_FIELD])
}

/// KubeletConfig holds a parsed kubelet-config.yaml as an untyped tree.
///
/// The root is always a mapping. Fields are addressed by [`Path`]; reads are
/// strict while writes create missing intermediate mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeletConfig {
    root: Mapping,
}

impl KubeletConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        KubeletConfig {
            root: Mapping::new(),
        }
    }

    /// Parses the contents of a kubelet-config.yaml file. The trailer line
    /// is stripped first when present.
    pub fn deserialize(data: &[u8]) -> Result<Self, ParseError> {
        let data = data
            .strip_suffix(KUBECONFIG_SUFFIX.as_bytes())
            .unwrap_or(data);
        match node::from_yaml(data)? {
            Node::Mapping(root) => Ok(KubeletConfig { root }),
            // Empty or comment-only files.
            Node::Scalar(Scalar::Null) => Ok(KubeletConfig::new()),
            other => Err(ParseError::NotAMapping {
                found: other.kind(),
            }),
        }
    }

    /// Renders the configuration for writing back to kubelet-config.yaml,
    /// trailer line included.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let mut out = node::to_yaml(&self.root)?.into_bytes();
        out.extend_from_slice(KUBECONFIG_SUFFIX.as_bytes());
        Ok(out)
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Returns the node at `path`. Fails if any key along the way is absent
    /// or holds something other than a mapping.
    pub fn get_path(&self, path: &Path) -> Result<&Node, PathError> {
        let (last, parents) = path.split_last().ok_or(PathError::Empty)?;

        let mut mapping = &self.root;
        for (depth, key) in parents.iter().enumerate() {
            mapping = match mapping.get(key) {
                Some(Node::Mapping(child)) => child,
                Some(other) => {
                    return Err(PathError::NotAMapping {
                        path: path.prefix(depth + 1),
                        found: other.kind(),
                    })
                }
                None => {
                    return Err(PathError::Missing {
                        path: path.prefix(depth + 1),
                    })
                }
            };
        }

        mapping.get(last).ok_or_else(|| PathError::Missing { path: path.clone() })
    }

    /// Writes `value` at `path`, replacing any existing value.
    ///
    /// Missing intermediate keys are created as empty mappings. An existing
    /// intermediate key that is not a mapping is an error, and nothing is
    /// written in that case.
    pub fn set_path(&mut self, path: &Path, value: impl Into<Node>) -> Result<(), PathError> {
        let (last, parents) = path.split_last().ok_or(PathError::Empty)?;

        let mut mapping = &mut self.root;
        for (depth, key) in parents.iter().enumerate() {
            let child = match mapping.entry(key.as_str()) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => {
                    debug!(field = %path.prefix(depth + 1), "creating missing mapping");
                    slot.insert(Node::Mapping(Mapping::new()))
                }
            };
            mapping = match child {
                Node::Mapping(child) => child,
                other => {
                    return Err(PathError::NotAMapping {
                        path: path.prefix(depth + 1),
                        found: other.kind(),
                    })
                }
            };
        }

        mapping.insert(last.clone(), value.into());
        Ok(())
    }

    /// Returns the string held at `path`.
    pub fn get_as_string(&self, path: &Path) -> Result<&str> {
        match self.get_path(path)? {
            Node::Scalar(Scalar::String(s)) => Ok(s),
            other => Err(TypeError {
                path: path.clone(),
                expected: "string",
                found: other.kind(),
            }
            .into()),
        }
    }

    /// Returns the `kubeReserved.cpu` field.
    pub fn get_reserved_cpu(&self) -> Result<&str> {
        self.get_as_string(&reserved_cpu_path())
    }

    /// Sets the `kubeReserved.cpu` field.
    pub fn set_reserved_cpu(&mut self, reserved: &str) -> Result<(), PathError> {
        self.set_path(&reserved_cpu_path(), reserved)
    }

    /// Returns the `kubeReserved.cpu` value GKE would use for a node with
    /// `cpus` logical CPUs. See [`reserved::compute_reserved_cpu`].
    pub fn compute_reserved_cpu(&self, cpus: u64) -> Result<String> {
        reserved::compute_reserved_cpu(self, cpus)
    }
}

/// Rewrites the `kubeReserved.cpu` field of a kubelet-config.yaml file for a
/// node with `cpus` logical CPUs and returns the new file contents.
pub fn update_reserved_cpu(data: &[u8], cpus: u64) -> Result<Vec<u8>> {
    let mut config = KubeletConfig::deserialize(data)?;
    let reserved = config.compute_reserved_cpu(cpus)?;
    config.set_reserved_cpu(&reserved)?;
    Ok(config.serialize()?)
}
