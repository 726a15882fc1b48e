//! Prefix-sharing set of visited strings
//!
//! A radix tree over the key bytes. Keys sharing a prefix (same scheme, host and
//! listing path) share the nodes for that prefix; an edge is split only where two
//! keys diverge, so inserting a URL that differs from a stored one only in its
//! query string stores just that suffix.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    /// A key ends at this node
    terminal: bool,

    /// Outgoing edges keyed by the first byte of their label
    children: BTreeMap<u8, Edge>,
}

#[derive(Debug)]
struct Edge {
    /// Never empty
    label: Vec<u8>,
    node: Node,
}

/// Set of strings backed by a compressed prefix tree
///
/// Only membership tests and insertion are supported; entries live as long as the set.
#[derive(Debug, Default)]
pub struct PrefixVisitedSet {
    root: Node,
    len: usize,
}

impl PrefixVisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` was inserted before
    pub fn contains(&self, key: &str) -> bool {
        let mut node = &self.root;
        let mut rest = key.as_bytes();

        loop {
            let Some(first) = rest.first() else {
                return node.terminal;
            };

            match node.children.get(first) {
                Some(edge) if rest.starts_with(&edge.label) => {
                    rest = &rest[edge.label.len()..];
                    node = &edge.node;
                }
                _ => return false,
            }
        }
    }

    /// Inserts `key`, returning true if it was not present yet
    ///
    /// Inserting the same key again leaves the set unchanged.
    pub fn insert(&mut self, key: &str) -> bool {
        let mut node = &mut self.root;
        let mut rest = key.as_bytes();

        loop {
            let Some(&first) = rest.first() else {
                let added = !node.terminal;
                node.terminal = true;
                if added {
                    self.len += 1;
                }
                return added;
            };

            match node.children.entry(first) {
                Entry::Vacant(slot) => {
                    slot.insert(Edge {
                        label: rest.to_vec(),
                        node: Node {
                            terminal: true,
                            children: BTreeMap::new(),
                        },
                    });
                    self.len += 1;
                    return true;
                }
                Entry::Occupied(slot) => {
                    let edge = slot.into_mut();
                    let shared = common_prefix_len(&edge.label, rest);

                    if shared < edge.label.len() {
                        // Split the edge: the shared part stays, the remainder moves below
                        let tail = edge.label.split_off(shared);
                        let below = std::mem::take(&mut edge.node);
                        edge.node.children.insert(
                            tail[0],
                            Edge {
                                label: tail,
                                node: below,
                            },
                        );
                    }

                    rest = &rest[shared..];
                    node = &mut edge.node;
                }
            }
        }
    }

    /// Number of distinct keys stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<S: AsRef<str>> Extend<S> for PrefixVisitedSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key.as_ref());
        }
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
