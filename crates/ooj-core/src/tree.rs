//! # Tree Containers
//!
//! A small recursive representation of nested key/value documents:
//! [`Entry`] leaves and keyed [`Tree`] branches under a [`RootTree`].
//!
//! Trees convert to and from plain [`SerializedForm`] mappings, and both
//! [`RootTree`] and [`Tree`] implement [`Serializable`], so the serializer
//! walks them like any other object: subtrees are object-like, entry values
//! are copied as-is.
//!
//! When two nodes share a key, the later one wins in the mapping while the
//! key keeps the position of its first occurrence.

use std::fmt;

use serde_json::Value;

use crate::form::SerializedForm;
use crate::record::{FieldValue, Fields, Serializable};

/// A single key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: String,
    value: Value,
}

impl Entry {
    /// A new entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The entry's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The entry's value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The entry as a one-key mapping.
    pub fn to_mapping(&self) -> SerializedForm {
        let mut map = SerializedForm::new();
        map.insert(self.key.clone(), self.value.clone());
        map
    }
}

/// A node of a tree: a leaf entry or a keyed subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A key/value leaf.
    Entry(Entry),
    /// A keyed subtree.
    Tree(Tree),
}

impl Node {
    /// The node's key.
    pub fn key(&self) -> &str {
        match self {
            Node::Entry(entry) => entry.key(),
            Node::Tree(tree) => tree.key(),
        }
    }
}

impl From<Entry> for Node {
    fn from(entry: Entry) -> Self {
        Node::Entry(entry)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Tree(tree)
    }
}

fn nodes_to_mapping(nodes: &[Node]) -> SerializedForm {
    let mut map = SerializedForm::new();
    for node in nodes {
        match node {
            Node::Entry(entry) => {
                map.insert(entry.key.clone(), entry.value.clone());
            }
            Node::Tree(tree) => {
                map.insert(tree.key.clone(), Value::Object(tree.to_mapping()));
            }
        }
    }
    map
}

fn nodes_from_mapping(map: &SerializedForm) -> Vec<Node> {
    map.iter()
        .map(|(key, value)| match value {
            Value::Object(nested) => Node::Tree(Tree::from_mapping(key.clone(), nested)),
            other => Node::Entry(Entry::new(key.clone(), other.clone())),
        })
        .collect()
}

fn node_fields(nodes: &[Node]) -> Fields<'_> {
    let mut fields = Fields::new();
    for node in nodes {
        match node {
            Node::Entry(entry) => fields.push(entry.key.as_str(), &entry.value),
            Node::Tree(tree) => fields.push(tree.key.as_str(), FieldValue::object(tree)),
        }
    }
    fields
}

/// A keyed subtree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    key: String,
    nodes: Vec<Node>,
}

impl Tree {
    /// An empty subtree under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nodes: Vec::new(),
        }
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.add(node);
        self
    }

    /// Build a subtree from a mapping; nested mappings become subtrees.
    pub fn from_mapping(key: impl Into<String>, map: &SerializedForm) -> Self {
        Self {
            key: key.into(),
            nodes: nodes_from_mapping(map),
        }
    }

    /// The subtree's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Child nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Append a node.
    pub fn add(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Remove every child node with the given key. Returns how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.key() != key);
        before - self.nodes.len()
    }

    /// The last child node with the given key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().rev().find(|node| node.key() == key)
    }

    /// Number of child nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no child nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The subtree's children as a mapping (the key itself is not included).
    pub fn to_mapping(&self) -> SerializedForm {
        nodes_to_mapping(&self.nodes)
    }
}

/// The unkeyed top of a tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootTree {
    nodes: Vec<Node>,
}

impl RootTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.add(node);
        self
    }

    /// Build a tree from a mapping; nested mappings become subtrees.
    pub fn from_mapping(map: &SerializedForm) -> Self {
        Self {
            nodes: nodes_from_mapping(map),
        }
    }

    /// Top-level nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Append a node.
    pub fn add(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Remove every top-level node with the given key. Returns how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.key() != key);
        before - self.nodes.len()
    }

    /// The last top-level node with the given key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().rev().find(|node| node.key() == key)
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The tree as a plain mapping.
    pub fn to_mapping(&self) -> SerializedForm {
        nodes_to_mapping(&self.nodes)
    }
}

impl From<RootTree> for Value {
    fn from(tree: RootTree) -> Self {
        Value::Object(tree.to_mapping())
    }
}

impl fmt::Display for RootTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.to_mapping()))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.to_mapping()))
    }
}

impl Serializable for RootTree {
    fn fields(&self) -> Fields<'_> {
        node_fields(&self.nodes)
    }

    fn type_name(&self) -> &'static str {
        "RootTree"
    }
}

impl Serializable for Tree {
    fn fields(&self) -> Fields<'_> {
        node_fields(&self.nodes)
    }

    fn type_name(&self) -> &'static str {
        "Tree"
    }
}
