use std::{cmp::Ordering, fmt};

use crate::{
    dataset::Record,
    entry::{Entry, RecordId, SearchIndex},
};

type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

struct Node<'a> {
    entry: Entry<'a>,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node<'_> {
    #[inline]
    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Broken red-black rule found by [`RedBlackTree::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    RedRoot,
    RedRedEdge { parent: String, child: String },
    BlackHeightMismatch { at: String, left: usize, right: usize },
    OutOfOrder { parent: String, child: String },
    BrokenParentLink { node: String },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => f.write_str("root is red"),
            Self::RedRedEdge { parent, child } => {
                write!(f, "red node {child:?} has red parent {parent:?}")
            }
            Self::BlackHeightMismatch { at, left, right } => write!(
                f,
                "black height differs below {at:?}: left {left}, right {right}"
            ),
            Self::OutOfOrder { parent, child } => {
                write!(f, "key {child:?} is on the wrong side of {parent:?}")
            }
            Self::BrokenParentLink { node } => write!(f, "parent link of {node:?} is wrong"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Red-black tree keyed by string, one node per unique key.
///
/// Nodes sit in an arena and refer to parent and children by index, so a
/// rotation is a handful of index writes. Inserting a key that already
/// exists only appends to its payload and never recolors or rotates.
#[derive(Default)]
pub struct RedBlackTree<'a> {
    nodes: Vec<Node<'a>>,
    root: Option<NodeId>,
}

impl<'a> RedBlackTree<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unique keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id as usize]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<'a> {
        &mut self.nodes[id as usize]
    }

    #[inline]
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.node(id).color == Color::Red)
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Which side of its parent `id` hangs on; `None` for the root.
    #[inline]
    fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.parent(id)?;
        if self.node(parent).left == Some(id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Points whatever referenced `old` (its parent or the root) at `new`.
    fn replace_in_parent(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        match (parent, self.side_of(old)) {
            (Some(p), Some(side)) => *self.node_mut(p).child_mut(side) = Some(new),
            _ => self.root = Some(new),
        }
        self.node_mut(new).parent = parent;
    }

    /// Rotates `x` down towards `dir`; its child on the other side takes
    /// its place.
    fn rotate(&mut self, x: NodeId, dir: Side) {
        let up = dir.opposite();
        let y = self
            .node(x)
            .child(up)
            .expect("rotation pivot has no child on the rising side");
        let inner = self.node(y).child(dir);
        *self.node_mut(x).child_mut(up) = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }
        self.replace_in_parent(x, y);
        *self.node_mut(y).child_mut(dir) = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    #[inline]
    fn rotate_left(&mut self, x: NodeId) {
        self.rotate(x, Side::Left);
    }

    #[inline]
    fn rotate_right(&mut self, x: NodeId) {
        self.rotate(x, Side::Right);
    }

    fn alloc(&mut self, key: &'a str, first: RecordId, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::try_from(self.nodes.len()).expect("too many nodes in red-black tree");
        self.nodes.push(Node {
            entry: Entry::new(key, first),
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        id
    }

    pub fn insert_key(&mut self, id: RecordId, key: &'a str) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(n) = cur {
            let node = self.node_mut(n);
            side = match key.cmp(node.entry.key) {
                Ordering::Equal => {
                    node.entry.payload.push(id);
                    return;
                }
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            parent = Some(n);
            cur = node.child(side);
        }

        let z = self.alloc(key, id, parent);
        match parent {
            Some(p) => *self.node_mut(p).child_mut(side) = Some(z),
            None => self.root = Some(z),
        }
        self.fix_insert(z);
    }

    fn fix_insert(&mut self, mut z: NodeId) {
        while let Some(p) = self.parent(z).filter(|&p| self.is_red(Some(p))) {
            // A red node is never the root, so `p` has a parent.
            let Some(g) = self.parent(p) else {
                break;
            };
            let p_side = if self.node(g).left == Some(p) {
                Side::Left
            } else {
                Side::Right
            };
            let uncle = self.node(g).child(p_side.opposite());

            if let Some(u) = uncle.filter(|&u| self.is_red(Some(u))) {
                self.set_color(p, Color::Black);
                self.set_color(u, Color::Black);
                self.set_color(g, Color::Red);
                z = g;
                continue;
            }

            let mut p = p;
            if self.node(p).child(p_side.opposite()) == Some(z) {
                // zig-zag: straighten into a line first
                z = p;
                match p_side {
                    Side::Left => self.rotate_left(z),
                    Side::Right => self.rotate_right(z),
                }
                p = self.parent(z).unwrap_or(z);
            }
            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            match p_side {
                Side::Left => self.rotate_right(g),
                Side::Right => self.rotate_left(g),
            }
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry<'a>> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            cur = match key.cmp(node.entry.key) {
                Ordering::Equal => return Some(&node.entry),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|r| self.node(r).color)
    }

    /// Longest root-to-leaf path in nodes; 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let node = self.node(id);
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        max
    }

    /// Verifies ordering, parent links and the red-black coloring rules.
    /// Returns the black height of the whole tree (null links count as 1).
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.root else {
            return Ok(1);
        };
        if self.node(root).color == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }
        if self.node(root).parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink {
                node: self.node(root).entry.key.to_owned(),
            });
        }
        self.check_subtree(root, None, None)
    }

    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&str>,
        upper: Option<&str>,
    ) -> Result<usize, InvariantViolation> {
        let node = self.node(id);
        let key = node.entry.key;
        let mut heights = [1usize; 2];
        for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            let Some(child_id) = node.child(side) else {
                continue;
            };
            let child = self.node(child_id);
            if child.parent != Some(id) {
                return Err(InvariantViolation::BrokenParentLink {
                    node: child.entry.key.to_owned(),
                });
            }
            let ordered = match side {
                Side::Left => child.entry.key < key,
                Side::Right => child.entry.key > key,
            };
            let in_bounds = lower.map_or(true, |lo| child.entry.key > lo)
                && upper.map_or(true, |hi| child.entry.key < hi);
            if !ordered || !in_bounds {
                return Err(InvariantViolation::OutOfOrder {
                    parent: key.to_owned(),
                    child: child.entry.key.to_owned(),
                });
            }
            if node.color == Color::Red && child.color == Color::Red {
                return Err(InvariantViolation::RedRedEdge {
                    parent: key.to_owned(),
                    child: child.entry.key.to_owned(),
                });
            }
            heights[slot] = match side {
                Side::Left => self.check_subtree(child_id, lower, Some(key))?,
                Side::Right => self.check_subtree(child_id, Some(key), upper)?,
            };
        }
        if heights[0] != heights[1] {
            return Err(InvariantViolation::BlackHeightMismatch {
                at: key.to_owned(),
                left: heights[0],
                right: heights[1],
            });
        }
        Ok(heights[0] + usize::from(node.color == Color::Black))
    }
}

impl<'a> SearchIndex<'a> for RedBlackTree<'a> {
    #[inline]
    fn insert(&mut self, id: RecordId, record: &'a Record) {
        self.insert_key(id, &record.key);
    }

    fn search(&self, key: &str) -> &[RecordId] {
        self.get(key).map_or(&[], |entry| entry.payload.as_slice())
    }
}
