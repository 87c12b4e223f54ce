//! Trie nodes.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// The shared, type-erased payload of a value node. The `Any` vtable
/// carries the concrete type, so a lookup can check that the stored
/// type matches the requested one.
pub(crate) type Payload = Arc<dyn Any + Send + Sync>;

/// A single trie node.
///
/// Nodes are immutable after construction and shared between trie
/// versions via `Arc`; mutation always goes through a fresh copy of the
/// path from the root. A node is a *value node* iff it carries a
/// payload - there is no separate node type, just the tag.
pub(crate) struct TrieNode {
    /// Outgoing edges, one per key byte.
    pub(crate) children: HashMap<u8, Arc<TrieNode>>,
    /// The stored value, if this node terminates a key.
    pub(crate) value: Option<Payload>,
}

impl TrieNode {
    /// A plain internal node with the given children and no value.
    pub(crate) fn internal(children: HashMap<u8, Arc<TrieNode>>) -> Self {
        Self {
            children,
            value: None,
        }
    }

    /// A value node with the given children.
    pub(crate) fn with_value(children: HashMap<u8, Arc<TrieNode>>, value: Payload) -> Self {
        Self {
            children,
            value: Some(value),
        }
    }

    /// Whether this node terminates a key.
    pub(crate) fn is_value_node(&self) -> bool {
        self.value.is_some()
    }

    /// Copy of this node sharing all children (and the payload, if
    /// any). This is the per-node step of path copying.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            value: self.value.clone(),
        }
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::internal(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_tag() {
        let node = TrieNode::default();
        assert!(!node.is_value_node());

        let node = TrieNode::with_value(HashMap::new(), Arc::new(7u32));
        assert!(node.is_value_node());
    }

    #[test]
    fn test_shallow_clone_shares_children() {
        let child = Arc::new(TrieNode::default());
        let mut children = HashMap::new();
        children.insert(b'a', Arc::clone(&child));

        let node = TrieNode::internal(children);
        let copy = node.shallow_clone();

        assert!(Arc::ptr_eq(&node.children[&b'a'], &copy.children[&b'a']));
    }
}
