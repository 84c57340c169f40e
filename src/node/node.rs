//! Core node types and the YAML codec.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ParseError, SerializeError};

/// Scalar is a leaf value. Scalars are also the keys of a [`Mapping`].
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
}

impl Eq for Scalar {}

/// Node is a single position in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

/// Mapping is a key-value map that remembers the order keys were read or
/// inserted in, so an untouched document renders in its original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: IndexMap<Scalar, Node>,
}

impl Scalar {
    /// Returns a short name of the scalar kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Node {
    /// Returns a short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(s) => s.kind(),
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => s.as_str(),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::Mapping(m)
    }
}

impl Mapping {
    pub fn new() -> Self {
        Mapping {
            entries: IndexMap::new(),
        }
    }

    /// Looks up a value by string key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(&Scalar::String(key.to_string()))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(&Scalar::String(key.to_string()))
    }

    /// Returns the slot for a string key, occupied or not.
    pub fn entry(&mut self, key: impl Into<String>) -> Entry<'_, Scalar, Node> {
        self.entries.entry(Scalar::String(key.into()))
    }

    /// Inserts a value under a string key. An existing key keeps its
    /// position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        self.entries.insert(Scalar::String(key.into()), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&Scalar::String(key.to_string()))
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(&Scalar::String(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Node)> {
        self.entries.iter()
    }
}

impl TryFrom<serde_yaml::Value> for Scalar {
    type Error = ParseError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, ParseError> {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Ok(Scalar::Null),
            Yaml::Bool(b) => Ok(Scalar::Bool(b)),
            Yaml::Number(n) => Ok(Scalar::Number(n)),
            Yaml::String(s) => Ok(Scalar::String(s)),
            Yaml::Tagged(tagged) => Err(ParseError::UnsupportedTag {
                tag: tagged.tag.to_string(),
            }),
            Yaml::Sequence(_) | Yaml::Mapping(_) => Err(ParseError::NonScalarKey),
        }
    }
}

impl TryFrom<serde_yaml::Value> for Node {
    type Error = ParseError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, ParseError> {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Sequence(items) => Ok(Node::Sequence(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Yaml::Mapping(m) => {
                let mut entries = IndexMap::with_capacity(m.len());
                for (k, v) in m {
                    entries.insert(Scalar::try_from(k)?, Node::try_from(v)?);
                }
                Ok(Node::Mapping(Mapping { entries }))
            }
            scalar => Scalar::try_from(scalar).map(Node::Scalar),
        }
    }
}

impl From<&Scalar> for serde_yaml::Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Null => serde_yaml::Value::Null,
            Scalar::Bool(b) => serde_yaml::Value::Bool(*b),
            Scalar::Number(n) => serde_yaml::Value::Number(n.clone()),
            Scalar::String(s) => serde_yaml::Value::String(s.clone()),
        }
    }
}

impl From<&Mapping> for serde_yaml::Value {
    fn from(mapping: &Mapping) -> Self {
        let mut out = serde_yaml::Mapping::with_capacity(mapping.len());
        for (k, v) in mapping.iter() {
            out.insert(k.into(), v.into());
        }
        serde_yaml::Value::Mapping(out)
    }
}

impl From<&Node> for serde_yaml::Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Scalar(s) => s.into(),
            Node::Sequence(items) => {
                serde_yaml::Value::Sequence(items.iter().map(Into::into).collect())
            }
            Node::Mapping(m) => m.into(),
        }
    }
}

/// Parses a single YAML document into a node. Empty or comment-only input
/// parses as a null scalar.
pub fn from_yaml(data: &[u8]) -> Result<Node, ParseError> {
    let mut documents = serde_yaml::Deserializer::from_slice(data);
    let value = match documents.next() {
        Some(document) => serde_yaml::Value::deserialize(document)?,
        None => serde_yaml::Value::Null,
    };
    if documents.next().is_some() {
        return Err(ParseError::MultipleDocuments);
    }
    Node::try_from(value)
}

/// Renders a node (or a bare mapping) as a YAML document.
pub fn to_yaml(node: impl Into<serde_yaml::Value>) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(&node.into())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(mapping: &Mapping) -> Vec<&str> {
        mapping.iter().filter_map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_node_kinds() {
        assert_eq!(Node::from("x").kind(), "string");
        assert_eq!(Node::Scalar(Scalar::Null).kind(), "null");
        assert_eq!(Node::Scalar(Scalar::Bool(true)).kind(), "bool");
        assert_eq!(Node::Sequence(vec![]).kind(), "sequence");
        assert_eq!(Node::Mapping(Mapping::new()).kind(), "mapping");
        assert!(Node::Mapping(Mapping::new()).is_mapping());
        assert!(Node::Sequence(vec![]).is_sequence());
        assert!(Node::from("x").is_scalar());
    }

    #[test]
    fn test_mapping_operations() {
        let mut map = Mapping::new();
        assert!(map.is_empty());

        map.insert("b", Node::from("1"));
        map.insert("a", Node::from("2"));
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("a"));
        assert_eq!(map.get("b").and_then(Node::as_str), Some("1"));

        // Overwriting keeps the original position.
        map.insert("b", Node::from("3"));
        assert_eq!(keys(&map), vec!["b", "a"]);
        assert_eq!(map.get("b").and_then(Node::as_str), Some("3"));

        assert!(map.remove("b").is_some());
        assert!(!map.contains_key("b"));
        assert_eq!(keys(&map), vec!["a"]);
    }

    #[test]
    fn test_from_yaml_keeps_key_order() {
        let node = from_yaml(b"zeta: 1\nalpha: two\nmid: [a, b]\n").unwrap();
        let map = node.as_mapping().unwrap();
        assert_eq!(keys(map), vec!["zeta", "alpha", "mid"]);
        assert!(map.get("zeta").unwrap().is_scalar());
        assert_eq!(map.get("mid").unwrap().as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_from_yaml_non_string_keys() {
        let node = from_yaml(b"1: one\ntrue: other\n").unwrap();
        let map = node.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.iter().all(|(k, _)| k.as_str().is_none()));
        assert_eq!(to_yaml(&node).unwrap(), "1: one\ntrue: other\n");
    }

    #[test]
    fn test_from_yaml_empty_is_null() {
        assert_eq!(from_yaml(b"").unwrap(), Node::Scalar(Scalar::Null));
        assert_eq!(
            from_yaml(b"# only a comment\n").unwrap(),
            Node::Scalar(Scalar::Null)
        );
    }

    #[test]
    fn test_numeric_scalars_roundtrip() {
        let yaml = "readOnlyPort: 10255\n1.5: half\n-3: negative\nratio: 0.25\n";
        let node = from_yaml(yaml.as_bytes()).unwrap();
        let map = node.as_mapping().unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(
            map.get("readOnlyPort"),
            Some(&Node::Scalar(Scalar::Number(10255.into())))
        );
        let key = Scalar::Number(serde_yaml::Number::from(-3));
        assert!(map.iter().any(|(k, v)| k == &key && v.as_str() == Some("negative")));
        assert_eq!(to_yaml(&node).unwrap(), yaml);
        assert_eq!(from_yaml(yaml.as_bytes()).unwrap(), node);
    }

    #[test]
    fn test_from_yaml_rejects_bad_input() {
        assert!(matches!(
            from_yaml(b"a: [unclosed\n"),
            Err(ParseError::Syntax(_))
        ));
        assert!(matches!(
            from_yaml(b"value: !custom 3\n"),
            Err(ParseError::UnsupportedTag { .. })
        ));
        assert!(matches!(
            from_yaml(b"? [a, b]\n: c\n"),
            Err(ParseError::NonScalarKey)
        ));
        assert!(matches!(
            from_yaml(b"a: 1\n---\nb: 2\n"),
            Err(ParseError::MultipleDocuments)
        ));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = "clusterDNS:\n- 10.3.240.10\nevictionHard:\n  memory.available: 100Mi\n  nodefs.available: 10%\nreadOnlyPort: 10255\nserverTLSBootstrap: true\n";
        let node = from_yaml(yaml.as_bytes()).unwrap();
        assert_eq!(to_yaml(&node).unwrap(), yaml);
    }
}
