//! Field paths into a document tree.

use std::fmt;

/// Path is an ordered list of mapping keys leading to a nested field,
/// e.g. `kubeReserved` then `cpu`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: Vec<String>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path { keys: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Appends a key.
    pub fn push(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// Returns the final key and the keys leading up to it.
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.keys.split_last()
    }

    /// Returns the path made of the first `len` keys.
    pub fn prefix(&self, len: usize) -> Path {
        Path {
            keys: self.keys[..len.min(self.keys.len())].to_vec(),
        }
    }

    /// Creates a new path with the given key appended.
    pub fn with(&self, key: impl Into<String>) -> Self {
        let mut new_path = self.clone();
        new_path.push(key);
        new_path
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        keys.iter().map(|k| k.to_string()).collect()
    }
}

impl From<&[&str]> for Path {
    fn from(keys: &[&str]) -> Self {
        keys.iter().map(|k| k.to_string()).collect()
    }
}

impl FromIterator<String> for Path {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Path {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.keys {
            write!(f, ".{}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_operations() {
        let mut path = Path::new();
        assert!(path.is_empty());

        path.push("kubeReserved");
        path.push("cpu");
        assert_eq!(path.len(), 2);
        assert_eq!(path.iter().collect::<Vec<_>>(), vec!["kubeReserved", "cpu"]);

        let (last, parents) = path.split_last().unwrap();
        assert_eq!(last, "cpu");
        assert_eq!(parents, ["kubeReserved".to_string()]);

        assert!(Path::new().split_last().is_none());
    }

    #[test]
    fn test_path_prefix() {
        let path = Path::from(["a", "b", "c"]);
        assert_eq!(path.prefix(0), Path::new());
        assert_eq!(path.prefix(2), Path::from(["a", "b"]));
        assert_eq!(path.prefix(10), path);
        assert_eq!(path.prefix(2).with("c"), path);
    }

    #[test]
    fn test_path_display() {
        assert_eq!(Path::from(["kubeReserved", "cpu"]).to_string(), ".kubeReserved.cpu");
        assert_eq!(Path::new().to_string(), "");
    }
}
