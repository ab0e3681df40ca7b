//! Node storage and read handles.
//!
//! Nodes live in an arena owned by the list. Forward links are slot indices,
//! so unlinking a node never leaves a dangling pointer behind, and caller
//! handles ([`NodeId`]) carry a generation that is bumped whenever a slot is
//! freed.

use std::fmt;
use std::iter::FusedIterator;

/// Forward link: the slot index of the next node, or `None` past the end.
pub(crate) type Link = Option<usize>;

/// Stable handle to a node.
///
/// A handle stays valid until its node is deleted. After that, lookups with
/// it return `None` even if the slot has been reused by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// A score/value pair detached from the list by a delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    pub score: f64,
    pub value: V,
}

#[derive(Debug)]
pub(crate) struct NodeData<V> {
    pub(crate) score: f64,
    pub(crate) value: V,
    /// One link per level the node participates in; the length is its height.
    pub(crate) forward: Vec<Link>,
}

#[derive(Debug)]
struct Slot<V> {
    generation: u32,
    node: Option<NodeData<V>>,
}

#[derive(Debug)]
pub(crate) struct Arena<V> {
    slots: Vec<Slot<V>>,
    free: Vec<usize>,
}

impl<V> Arena<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self, node: NodeData<V>) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    /// Vacate a slot, invalidating every outstanding handle to it.
    pub(crate) fn release(&mut self, index: usize) -> NodeData<V> {
        let slot = &mut self.slots[index];
        let Some(node) = slot.node.take() else {
            unreachable!("released vacant slot {index}");
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        node
    }

    /// Vacate every occupied slot.
    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
    }

    pub(crate) fn get(&self, index: usize) -> &NodeData<V> {
        match &self.slots[index].node {
            Some(node) => node,
            None => unreachable!("link to vacant slot {index}"),
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut NodeData<V> {
        match &mut self.slots[index].node {
            Some(node) => node,
            None => unreachable!("link to vacant slot {index}"),
        }
    }

    pub(crate) fn id(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Resolve a caller handle, rejecting stale generations.
    pub(crate) fn resolve(&self, id: NodeId) -> Option<usize> {
        let slot = self.slots.get(id.index)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }
}

/// Read handle to a node in a list.
///
/// Borrowing the list keeps the handle valid: the list cannot be mutated
/// while a `Node` is alive.
pub struct Node<'a, V> {
    arena: &'a Arena<V>,
    index: usize,
}

impl<'a, V> Node<'a, V> {
    pub(crate) fn new(arena: &'a Arena<V>, index: usize) -> Self {
        Self { arena, index }
    }

    fn data(&self) -> &'a NodeData<V> {
        self.arena.get(self.index)
    }

    /// Handle that outlives this borrow.
    pub fn id(&self) -> NodeId {
        self.arena.id(self.index)
    }

    pub fn score(&self) -> f64 {
        self.data().score
    }

    pub fn value(&self) -> &'a V {
        &self.data().value
    }

    /// Number of levels this node is linked into.
    pub fn height(&self) -> usize {
        self.data().forward.len()
    }

    /// The successor in score order, or `None` for the last node.
    pub fn next(&self) -> Option<Node<'a, V>> {
        self.data().forward[0].map(|index| Node::new(self.arena, index))
    }
}

impl<V> Clone for Node<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Node<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for Node<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("score", &self.score())
            .field("value", self.value())
            .field("height", &self.height())
            .finish()
    }
}

/// Ascending `(score, &value)` iterator over a list.
pub struct Iter<'a, V> {
    arena: &'a Arena<V>,
    next: Link,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(arena: &'a Arena<V>, first: Link, len: usize) -> Self {
        Self {
            arena,
            next: first,
            remaining: len,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (f64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?);
        self.next = node.forward[0];
        self.remaining -= 1;
        Some((node.score, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}
