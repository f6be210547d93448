use std::cmp::Ordering;

use crate::{
    dataset::Record,
    entry::{Entry, RecordId, SearchIndex},
};

type NodeId = u32;

struct Node<'a> {
    entry: Entry<'a>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Unbalanced binary search tree, one node per unique key.
///
/// Nodes live in a flat arena and link to each other by index, so dropping
/// the tree frees them in one pass no matter how deep it grew.
#[derive(Default)]
pub struct SearchTree<'a> {
    nodes: Vec<Node<'a>>,
    root: Option<NodeId>,
}

impl<'a> SearchTree<'a> {
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

    fn alloc(&mut self, key: &'a str, first: RecordId) -> NodeId {
        let id = NodeId::try_from(self.nodes.len()).expect("too many nodes in search tree");
        self.nodes.push(Node {
            entry: Entry::new(key, first),
            left: None,
            right: None,
        });
        id
    }

    pub fn insert_key(&mut self, id: RecordId, key: &'a str) {
        let Some(mut cur) = self.root else {
            self.root = Some(self.alloc(key, id));
            return;
        };
        loop {
            let node = &mut self.nodes[cur as usize];
            let order = key.cmp(node.entry.key);
            let next = match order {
                Ordering::Equal => {
                    node.entry.payload.push(id);
                    return;
                }
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            match next {
                Some(child) => cur = child,
                None => {
                    let leaf = self.alloc(key, id);
                    let parent = &mut self.nodes[cur as usize];
                    if order == Ordering::Less {
                        parent.left = Some(leaf);
                    } else {
                        parent.right = Some(leaf);
                    }
                    return;
                }
            }
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
}

impl<'a> SearchIndex<'a> for SearchTree<'a> {
    #[inline]
    fn insert(&mut self, id: RecordId, record: &'a Record) {
        self.insert_key(id, &record.key);
    }

    fn search(&self, key: &str) -> &[RecordId] {
        self.get(key).map_or(&[], |entry| entry.payload.as_slice())
    }
}
