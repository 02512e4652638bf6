//! Octree arena and the reduction heap over its nodes

use crate::color::Color;
use crate::error::{Error, Result};

/// Bits of each channel the tree discriminates on
const LEVELS: u8 = 8;

const NODE_CHUNK: usize = 2048;
const HEAP_CHUNK: usize = 1024;

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    r: u64,
    g: u64,
    b: u64,
    count: u64,
    parent: Option<u32>,
    kids: [Option<u32>; 8],
    n_kids: u8,
    kid_idx: u8,
    depth: u8,
    /// Position in the heap, 0 when not queued
    heap_idx: u32,
}

#[inline]
fn kid_index(color: Color, bit: u8) -> usize {
    (usize::from(color.r() & bit != 0) << 2)
        | (usize::from(color.g() & bit != 0) << 1)
        | usize::from(color.b() & bit != 0)
}

/// Color octree with nodes in a flat arena, addressed by index
pub(super) struct Octree {
    nodes: Vec<Node>,
}

impl Octree {
    const ROOT: u32 = 0;

    pub(super) fn new() -> Result<Self> {
        let mut tree = Self { nodes: Vec::new() };
        tree.alloc(None, 0, 0)?;
        Ok(tree)
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, parent: Option<u32>, kid_idx: u8, depth: u8) -> Result<u32> {
        if self.nodes.len() == self.nodes.capacity() {
            self.nodes.try_reserve(NODE_CHUNK).map_err(|_| Error::OutOfMemory {
                bytes: NODE_CHUNK * std::mem::size_of::<Node>(),
            })?;
        }
        let id = self.nodes.len() as u32;
        self.nodes.push(Node {
            parent,
            kid_idx,
            depth,
            ..Node::default()
        });
        if let Some(p) = parent {
            self.nodes[p as usize].n_kids += 1;
        }
        Ok(id)
    }

    /// Add one pixel, returning the leaf it was counted in
    pub(super) fn insert(&mut self, color: Color) -> Result<u32> {
        let mut node = Self::ROOT;
        for level in 0..LEVELS {
            let i = kid_index(color, 0x80 >> level);
            node = match self.nodes[node as usize].kids[i] {
                Some(kid) => kid,
                None => {
                    let kid = self.alloc(Some(node), i as u8, level + 1)?;
                    self.nodes[node as usize].kids[i] = Some(kid);
                    kid
                }
            };
        }
        let leaf = &mut self.nodes[node as usize];
        leaf.r += u64::from(color.r());
        leaf.g += u64::from(color.g());
        leaf.b += u64::from(color.b());
        leaf.count += 1;
        Ok(node)
    }

    /// Merge a childless node into its parent and return the parent
    ///
    /// `None` for the root or a node that still has children.
    pub(super) fn fold(&mut self, id: u32) -> Option<u32> {
        let node = self.nodes[id as usize];
        if node.n_kids != 0 {
            return None;
        }
        let parent = node.parent?;
        let p = &mut self.nodes[parent as usize];
        p.r += node.r;
        p.g += node.g;
        p.b += node.b;
        p.count += node.count;
        p.n_kids -= 1;
        p.kids[node.kid_idx as usize] = None;
        Some(parent)
    }

    /// Turn a node's channel sums into their rounded mean
    pub(super) fn average(&mut self, id: u32) {
        let n = &mut self.nodes[id as usize];
        if n.count == 0 {
            return;
        }
        let half = n.count;
        let div = 2 * n.count;
        n.r = (2 * n.r + half) / div;
        n.g = (2 * n.g + half) / div;
        n.b = (2 * n.b + half) / div;
    }

    /// Palette color for `color`: the deepest node left on its path
    pub(super) fn lookup(&self, color: Color) -> Color {
        let mut node = &self.nodes[Self::ROOT as usize];
        for level in 0..LEVELS {
            match node.kids[kid_index(color, 0x80 >> level)] {
                Some(kid) => node = &self.nodes[kid as usize],
                None => break,
            }
        }
        let channel = |v: u64| v.min(255) as u8;
        Color::rgb(channel(node.r), channel(node.g), channel(node.b))
    }

    /// Reduction order: fewest children first, then smallest depth-scaled count
    #[inline]
    fn key(&self, id: u32) -> (u8, u64) {
        let n = &self.nodes[id as usize];
        (n.n_kids, n.count >> n.depth)
    }
}

/// Indexed binary min-heap of octree nodes, 1-based
///
/// Every node records its own slot so a queued node whose key changed can be
/// moved in place instead of queued twice.
pub(super) struct NodeHeap {
    buf: Vec<u32>,
}

impl NodeHeap {
    pub(super) fn new() -> Self {
        Self { buf: vec![0] }
    }

    pub(super) fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub(super) fn entries(&self) -> impl Iterator<Item = u32> + '_ {
        self.buf[1..].iter().copied()
    }

    /// Queue a node, or restore heap order around it when already queued
    pub(super) fn add(&mut self, tree: &mut Octree, id: u32) -> Result<()> {
        if tree.nodes[id as usize].heap_idx != 0 {
            self.down(tree, id);
            self.up(tree, id);
            return Ok(());
        }
        if self.buf.len() == self.buf.capacity() {
            self.buf.try_reserve(HEAP_CHUNK).map_err(|_| Error::OutOfMemory {
                bytes: HEAP_CHUNK * std::mem::size_of::<u32>(),
            })?;
        }
        tree.nodes[id as usize].heap_idx = self.buf.len() as u32;
        self.buf.push(id);
        self.up(tree, id);
        Ok(())
    }

    pub(super) fn pop(&mut self, tree: &mut Octree) -> Option<u32> {
        if self.buf.len() <= 1 {
            return None;
        }
        let top = self.buf[1];
        let last = self.buf.pop()?;
        tree.nodes[top as usize].heap_idx = 0;
        if self.buf.len() > 1 {
            self.buf[1] = last;
            tree.nodes[last as usize].heap_idx = 1;
            self.down(tree, last);
        }
        Some(top)
    }

    fn down(&mut self, tree: &mut Octree, id: u32) {
        let key = tree.key(id);
        let mut n = tree.nodes[id as usize].heap_idx as usize;
        loop {
            let mut m = n * 2;
            if m >= self.buf.len() {
                break;
            }
            if m + 1 < self.buf.len() && tree.key(self.buf[m]) > tree.key(self.buf[m + 1]) {
                m += 1;
            }
            if key <= tree.key(self.buf[m]) {
                break;
            }
            self.buf[n] = self.buf[m];
            tree.nodes[self.buf[n] as usize].heap_idx = n as u32;
            n = m;
        }
        self.buf[n] = id;
        tree.nodes[id as usize].heap_idx = n as u32;
    }

    fn up(&mut self, tree: &mut Octree, id: u32) {
        let key = tree.key(id);
        let mut n = tree.nodes[id as usize].heap_idx as usize;
        while n > 1 {
            let prev = self.buf[n / 2];
            if key >= tree.key(prev) {
                break;
            }
            self.buf[n] = prev;
            tree.nodes[prev as usize].heap_idx = n as u32;
            n /= 2;
        }
        self.buf[n] = id;
        tree.nodes[id as usize].heap_idx = n as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_shares_leaves() {
        let mut tree = Octree::new().unwrap();
        let a = tree.insert(Color::rgb(10, 20, 30)).unwrap();
        let b = tree.insert(Color::rgba(10, 20, 30, 7)).unwrap();
        let c = tree.insert(Color::rgb(10, 20, 31)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        // root, 7 shared levels, two leaves
        assert_eq!(tree.len(), 1 + 7 + 2);
    }

    #[test]
    fn test_fold_moves_sums_to_parent() {
        let mut tree = Octree::new().unwrap();
        let leaf = tree.insert(Color::rgb(10, 10, 10)).unwrap();
        let other = tree.insert(Color::rgb(11, 11, 11)).unwrap();
        let parent = tree.fold(leaf).unwrap();
        assert_eq!(tree.fold(parent), None);
        assert_eq!(tree.fold(other), Some(parent));
        tree.average(parent);
        assert_eq!(tree.lookup(Color::rgb(10, 10, 10)), Color::rgb(11, 11, 11));
        assert_eq!(tree.fold(0), None);
    }

    #[test]
    fn test_heap_pops_leaves_before_parents() {
        let mut tree = Octree::new().unwrap();
        let mut heap = NodeHeap::new();
        for c in [Color::RED, Color::BLUE, Color::RED, Color::WHITE] {
            let leaf = tree.insert(c).unwrap();
            heap.add(&mut tree, leaf).unwrap();
        }
        assert_eq!(heap.len(), 3);
        let red = tree.insert(Color::RED).unwrap();
        let parent = tree.nodes[red as usize].parent.unwrap();
        heap.add(&mut tree, parent).unwrap();
        // re-adding a queued node only moves it
        heap.add(&mut tree, red).unwrap();
        assert_eq!(heap.len(), 4);

        let mut popped = Vec::new();
        while let Some(id) = heap.pop(&mut tree) {
            assert_eq!(tree.nodes[id as usize].heap_idx, 0);
            popped.push(id);
        }
        assert_eq!(popped.len(), 4);
        assert_eq!(popped.last(), Some(&parent));
    }
}
