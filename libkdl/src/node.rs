//! Document tree: nodes and the documents that hold them.

use std::collections::HashMap;

use crate::value::{Identifier, Value};

/// A named unit with arguments, properties and children.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub type_hint: Option<Identifier>,
    pub name: Identifier,
    pub args: Vec<Value>,
    pub properties: HashMap<Identifier, Value>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::named(Identifier::new(name.into()))
    }

    pub(crate) fn named(name: Identifier) -> Self {
        Self {
            type_hint: None,
            name,
            args: Vec::new(),
            properties: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_hint(&self) -> Option<&Identifier> {
        self.type_hint.as_ref()
    }

    /// Positional arguments, in source order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &HashMap<Identifier, Value> {
        &self.properties
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn push_arg(&mut self, value: Value) {
        self.args.push(value);
    }

    /// Set a property. A later write to the same key replaces the earlier one.
    pub fn insert_property(&mut self, key: Identifier, value: Value) {
        self.properties.insert(key, value);
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

/// An ordered sequence of top-level nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// First top-level node with the given name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl IntoIterator for Document {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
