//! Self-balancing search tree engine.
//!
//! [`SearchTree`] maintains a keyed binary search tree with a selectable
//! balancing discipline ([`TreeKind`]): plain BST (no rebalancing), AVL
//! (height rebalancing through the four rotation cases), or Red-Black
//! (recoloring and rotation fix-up, including the canonical double-black
//! fix-up after deletion).
//!
//! Nodes live in a [`slotmap`] arena and reference each other by
//! [`NodeKey`]. Parent links are plain back-reference keys, not ownership
//! edges, so rotations transfer subtrees by re-pointing keys and reference
//! cycles cannot leak or dangle.
//!
//! Every mutating operation rewrites the engine's [`OperationLog`] with a
//! narration of what happened (descent direction, rotation cases, fix-up
//! cases) for the presentation layer to display.

use crate::core::log::OperationLog;
use rand::Rng;
use rand::distr::uniform::SampleUniform;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;
use std::fmt::{Debug, Display};
use thiserror::Error;

new_key_type! {
    /// Arena key of a tree node.
    pub struct NodeKey;
}

/// Bound alias for tree keys: totally ordered, copyable, printable (the
/// operation log narrates keys by value).
pub trait TreeKey: Ord + Copy + Debug + Display {}
impl<T: Ord + Copy + Debug + Display> TreeKey for T {}

/// Balancing discipline of a [`SearchTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeKind {
    /// Plain binary search tree; no automatic rebalancing.
    Bst,
    /// Height-balanced: `|balance factor| ≤ 1` at every node after every
    /// completed operation.
    Avl,
    /// Color-balanced: black root, no red-red edge, equal black-heights.
    RedBlack,
}

impl Display for TreeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bst => write!(f, "BST"),
            Self::Avl => write!(f, "AVL"),
            Self::RedBlack => write!(f, "RED-BLACK"),
        }
    }
}

/// Node color for the Red-Black discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Red node: must not have a red parent.
    Red,
    /// Black node: counts toward black-height.
    Black,
}

/// A tree node. `color` is `None` outside the Red-Black discipline; absent
/// colors count as black.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node<K> {
    /// The node's key.
    pub value: K,
    /// Left child, if any.
    pub left: Option<NodeKey>,
    /// Right child, if any.
    pub right: Option<NodeKey>,
    /// Non-owning back-reference to the parent; `None` at the root.
    pub parent: Option<NodeKey>,
    /// Height of the subtree rooted here (leaf = 1).
    pub height: u32,
    /// Left subtree height minus right subtree height.
    pub balance_factor: i32,
    /// Red-Black color; `None` for BST/AVL nodes.
    pub color: Option<Color>,
}

impl<K> Node<K> {
    fn new(value: K, kind: TreeKind) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent: None,
            height: 1,
            balance_factor: 0,
            color: match kind {
                TreeKind::RedBlack => Some(Color::Red),
                _ => None,
            },
        }
    }

    /// True at the root (no parent back-reference).
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True for red nodes.
    #[must_use]
    pub fn is_red(&self) -> bool {
        self.color == Some(Color::Red)
    }

    /// True for black nodes; an absent color counts as black.
    #[must_use]
    pub fn is_black(&self) -> bool {
        !self.is_red()
    }
}

/// A violated structural invariant, reported by [`SearchTree::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Keys are out of search-tree order somewhere under the named key.
    #[error("search-tree order violated near {value}")]
    OutOfOrder {
        /// Key at the offending node.
        value: String,
    },
    /// An AVL node's recomputed balance factor left the legal range.
    #[error("balance factor {balance_factor} out of range at {value}")]
    Unbalanced {
        /// Key at the offending node.
        value: String,
        /// The recomputed balance factor.
        balance_factor: i64,
    },
    /// A red node has a red parent.
    #[error("red node {value} has a red parent")]
    RedRed {
        /// Key at the offending node.
        value: String,
    },
    /// The two subtrees of a node disagree on black-height.
    #[error("black-height mismatch at {value}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Key at the offending node.
        value: String,
        /// Black-height through the left child.
        left: u32,
        /// Black-height through the right child.
        right: u32,
    },
    /// The root is red.
    #[error("root is not black")]
    RedRoot,
    /// The stored node count does not match the number of reachable nodes.
    #[error("stored node count {stored} does not match reachable count {actual}")]
    CountMismatch {
        /// The engine's bookkeeping count.
        stored: usize,
        /// Nodes actually reachable from the root.
        actual: usize,
    },
}

/// Statistics bundle describing the tree's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats<K> {
    /// Number of nodes in the tree.
    pub node_count: usize,
    /// Root height (0 for an empty tree).
    pub height: u32,
    /// Independently recomputed height-balance check (does not trust cached
    /// balance factors).
    pub is_balanced: bool,
    /// Rotations performed since creation (monotone).
    pub rotation_count: u64,
    /// The balancing discipline.
    pub kind: TreeKind,
    /// The root's key, if any.
    pub root_value: Option<K>,
}

/// A binary search tree with selectable balancing discipline.
///
/// # Example
///
/// ```rust
/// use algovis::core::tree::{SearchTree, TreeKind};
///
/// let mut tree: SearchTree<i64> = SearchTree::new(TreeKind::RedBlack);
/// for key in [10, 20, 30, 15, 25, 5] {
///     tree.insert(key);
/// }
/// assert_eq!(tree.inorder(), vec![5, 10, 15, 20, 25, 30]);
/// assert!(tree.delete(20));
/// assert!(!tree.delete(20)); // already gone
/// assert!(tree.validate().is_ok());
/// ```
#[derive(Debug)]
pub struct SearchTree<K> {
    kind: TreeKind,
    nodes: SlotMap<NodeKey, Node<K>>,
    root: Option<NodeKey>,
    node_count: usize,
    rotation_count: u64,
    traversal_path: Vec<NodeKey>,
    log: OperationLog,
}

impl<K: TreeKey> SearchTree<K> {
    /// Creates an empty tree with the given balancing discipline.
    #[must_use]
    pub fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            nodes: SlotMap::with_key(),
            root: None,
            node_count: 0,
            rotation_count: 0,
            traversal_path: Vec::new(),
            log: OperationLog::new(),
        }
    }

    // =========================================================================
    // BASIC OPERATIONS
    // =========================================================================

    /// Inserts a key. Returns the new node's key, or `None` (tree unchanged)
    /// if the key is already present.
    pub fn insert(&mut self, value: K) -> Option<NodeKey> {
        self.log.begin(format!("insert {value}"));

        let Some(mut current) = self.root else {
            let key = self.nodes.insert(Node::new(value, self.kind));
            if self.kind == TreeKind::RedBlack {
                // The root is always black.
                self.nodes[key].color = Some(Color::Black);
            }
            self.root = Some(key);
            self.node_count = 1;
            self.log.push(format!("created root {value}"));
            return Some(key);
        };

        let key = loop {
            let node_value = self.nodes[current].value;
            match value.cmp(&node_value) {
                std::cmp::Ordering::Less => {
                    self.log.push(format!("{value} < {node_value} → descend left"));
                    match self.nodes[current].left {
                        Some(left) => current = left,
                        None => {
                            let key = self.nodes.insert(Node::new(value, self.kind));
                            self.nodes[key].parent = Some(current);
                            self.nodes[current].left = Some(key);
                            self.log
                                .push(format!("inserted {value} as left child of {node_value}"));
                            break key;
                        }
                    }
                }
                std::cmp::Ordering::Greater => {
                    self.log.push(format!("{value} > {node_value} → descend right"));
                    match self.nodes[current].right {
                        Some(right) => current = right,
                        None => {
                            let key = self.nodes.insert(Node::new(value, self.kind));
                            self.nodes[key].parent = Some(current);
                            self.nodes[current].right = Some(key);
                            self.log
                                .push(format!("inserted {value} as right child of {node_value}"));
                            break key;
                        }
                    }
                }
                std::cmp::Ordering::Equal => {
                    self.log.push(format!("{value} already present → rejected"));
                    return None;
                }
            }
        };

        self.node_count += 1;
        self.update_upward(Some(key));
        match self.kind {
            TreeKind::Bst => {}
            TreeKind::Avl => self.rebalance_avl(Some(key)),
            TreeKind::RedBlack => self.fix_insert(key),
        }
        self.log
            .push(format!("insert complete; {} nodes", self.node_count));
        Some(key)
    }

    /// Deletes a key. Returns `false` (tree unchanged) if the key is absent.
    pub fn delete(&mut self, value: K) -> bool {
        self.log.begin(format!("delete {value}"));
        let Some(node) = self.find(value) else {
            self.log.push(format!("{value} not found"));
            return false;
        };
        self.delete_node(node);
        self.log
            .push(format!("delete complete; {} nodes", self.node_count));
        true
    }

    /// Searches for a key, recording the descent in the traversal path.
    pub fn search(&mut self, value: K) -> Option<NodeKey> {
        self.log.begin(format!("search {value}"));
        self.traversal_path.clear();
        let mut current = self.root;
        while let Some(key) = current {
            self.traversal_path.push(key);
            let node_value = self.nodes[key].value;
            match value.cmp(&node_value) {
                std::cmp::Ordering::Equal => {
                    self.log.push(format!("{value} found"));
                    return Some(key);
                }
                std::cmp::Ordering::Less => {
                    self.log.push(format!("{value} < {node_value} → descend left"));
                    current = self.nodes[key].left;
                }
                std::cmp::Ordering::Greater => {
                    self.log.push(format!("{value} > {node_value} → descend right"));
                    current = self.nodes[key].right;
                }
            }
        }
        self.log.push(format!("{value} not found"));
        None
    }

    /// True when the key is present. Does not disturb the traversal path or
    /// the operation log.
    #[must_use]
    pub fn contains(&self, value: K) -> bool {
        self.find(value).is_some()
    }

    /// Silent lookup used internally.
    fn find(&self, value: K) -> Option<NodeKey> {
        let mut current = self.root;
        while let Some(key) = current {
            match value.cmp(&self.nodes[key].value) {
                std::cmp::Ordering::Equal => return Some(key),
                std::cmp::Ordering::Less => current = self.nodes[key].left,
                std::cmp::Ordering::Greater => current = self.nodes[key].right,
            }
        }
        None
    }

    // =========================================================================
    // STRUCTURAL DELETE
    // =========================================================================

    fn delete_node(&mut self, node: NodeKey) {
        let left = self.nodes[node].left;
        let right = self.nodes[node].right;

        if let (Some(_), Some(right)) = (left, right) {
            // Two children: move the in-order successor's value here, then
            // delete the successor (which has at most one child).
            let successor = self.min_from(right);
            let successor_value = self.nodes[successor].value;
            self.nodes[node].value = successor_value;
            self.log.push(format!(
                "two children → replace with in-order successor {successor_value}"
            ));
            self.delete_node(successor);
            return;
        }

        // At most one child: splice it into this node's place.
        let child = left.or(right);
        let parent = self.nodes[node].parent;
        let removed_black = self.nodes[node].is_black();
        let value = self.nodes[node].value;
        match child {
            Some(_) => self.log.push(format!("{value} has one child → splice")),
            None => self.log.push(format!("{value} is a leaf → unlink")),
        }
        self.replace_node(node, child);
        self.nodes.remove(node);
        self.node_count -= 1;
        self.update_upward(parent);

        match self.kind {
            TreeKind::Bst => {}
            TreeKind::Avl => self.rebalance_avl(parent),
            TreeKind::RedBlack => {
                if removed_black {
                    self.fix_double_black(child, parent);
                }
                if let Some(root) = self.root {
                    self.nodes[root].color = Some(Color::Black);
                }
            }
        }
    }

    /// Splices `new` (possibly `None`) into `old`'s position under `old`'s
    /// parent. Does not touch `old`'s own child links.
    fn replace_node(&mut self, old: NodeKey, new: Option<NodeKey>) {
        let parent = self.nodes[old].parent;
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.nodes[p].left == Some(old) {
                    self.nodes[p].left = new;
                } else {
                    self.nodes[p].right = new;
                }
            }
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }

    // =========================================================================
    // HEIGHTS AND ROTATIONS
    // =========================================================================

    fn height_of(&self, node: Option<NodeKey>) -> u32 {
        node.map_or(0, |key| self.nodes[key].height)
    }

    fn balance_of(&self, node: Option<NodeKey>) -> i32 {
        node.map_or(0, |key| self.nodes[key].balance_factor)
    }

    /// Recomputes one node's height and balance factor from its children.
    fn update_node(&mut self, key: NodeKey) {
        let left = self.height_of(self.nodes[key].left);
        let right = self.height_of(self.nodes[key].right);
        let node = &mut self.nodes[key];
        node.height = left.max(right) + 1;
        #[allow(clippy::cast_possible_wrap)]
        {
            node.balance_factor = left as i32 - right as i32;
        }
    }

    /// Recomputes heights along the ancestor chain starting at `from`.
    fn update_upward(&mut self, from: Option<NodeKey>) {
        let mut current = from;
        while let Some(key) = current {
            self.update_node(key);
            current = self.nodes[key].parent;
        }
    }

    /// Right rotation at `y`: `y`'s left child takes its place. Returns the
    /// new subtree root (or `y` unchanged if it has no left child).
    fn rotate_right(&mut self, y: NodeKey) -> NodeKey {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        self.rotation_count += 1;
        self.log
            .push(format!("right rotation at {}", self.nodes[y].value));

        let t2 = self.nodes[x].right;
        self.nodes[x].right = Some(y);
        self.nodes[y].left = t2;

        let parent = self.nodes[y].parent;
        self.nodes[x].parent = parent;
        self.nodes[y].parent = Some(x);
        if let Some(t2) = t2 {
            self.nodes[t2].parent = Some(y);
        }
        match parent {
            None => self.root = Some(x),
            Some(p) => {
                if self.nodes[p].left == Some(y) {
                    self.nodes[p].left = Some(x);
                } else {
                    self.nodes[p].right = Some(x);
                }
            }
        }

        self.update_node(y);
        self.update_node(x);
        // A rotation can change the subtree height; keep ancestor caches
        // exact.
        self.update_upward(self.nodes[x].parent);
        x
    }

    /// Left rotation at `x`: `x`'s right child takes its place. Returns the
    /// new subtree root (or `x` unchanged if it has no right child).
    fn rotate_left(&mut self, x: NodeKey) -> NodeKey {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        self.rotation_count += 1;
        self.log
            .push(format!("left rotation at {}", self.nodes[x].value));

        let t2 = self.nodes[y].left;
        self.nodes[y].left = Some(x);
        self.nodes[x].right = t2;

        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.nodes[x].parent = Some(y);
        if let Some(t2) = t2 {
            self.nodes[t2].parent = Some(x);
        }
        match parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.nodes[p].left == Some(x) {
                    self.nodes[p].left = Some(y);
                } else {
                    self.nodes[p].right = Some(y);
                }
            }
        }

        self.update_node(x);
        self.update_node(y);
        self.update_upward(self.nodes[y].parent);
        y
    }

    // =========================================================================
    // AVL REBALANCING
    // =========================================================================

    /// Walks from `from` to the root, recomputing balance factors and
    /// applying the four rotation cases wherever `|balance factor| > 1`.
    /// Continues upward after a rotation, since rotations change subtree
    /// heights.
    fn rebalance_avl(&mut self, from: Option<NodeKey>) {
        let mut current = from;
        while let Some(key) = current {
            self.update_node(key);
            let balance = self.nodes[key].balance_factor;
            let mut subtree_root = key;
            if balance > 1 {
                let left_balance = self.balance_of(self.nodes[key].left);
                if left_balance >= 0 {
                    self.log.push("left-left case → right rotation".to_owned());
                    subtree_root = self.rotate_right(key);
                } else {
                    self.log
                        .push("left-right case → left-right double rotation".to_owned());
                    if let Some(left) = self.nodes[key].left {
                        self.rotate_left(left);
                    }
                    subtree_root = self.rotate_right(key);
                }
            } else if balance < -1 {
                let right_balance = self.balance_of(self.nodes[key].right);
                if right_balance <= 0 {
                    self.log.push("right-right case → left rotation".to_owned());
                    subtree_root = self.rotate_left(key);
                } else {
                    self.log
                        .push("right-left case → right-left double rotation".to_owned());
                    if let Some(right) = self.nodes[key].right {
                        self.rotate_right(right);
                    }
                    subtree_root = self.rotate_left(key);
                }
            }
            current = self.nodes[subtree_root].parent;
        }
    }

    // =========================================================================
    // RED-BLACK FIX-UP
    // =========================================================================

    fn is_red(&self, node: Option<NodeKey>) -> bool {
        node.is_some_and(|key| self.nodes[key].is_red())
    }

    fn set_color(&mut self, node: Option<NodeKey>, color: Color) {
        if let Some(key) = node {
            self.nodes[key].color = Some(color);
        }
    }

    /// Standard three-case insert fix-up, mirrored for left/right symmetry:
    /// red uncle → recolor and move up; inner grandchild → rotate toward the
    /// outer side; then recolor parent/grandparent and rotate at the
    /// grandparent. Terminates by forcing the root black.
    fn fix_insert(&mut self, inserted: NodeKey) {
        let mut node = inserted;
        while let Some(parent) = self.nodes[node].parent {
            if !self.nodes[parent].is_red() {
                break;
            }
            let Some(grand) = self.nodes[parent].parent else {
                break;
            };
            if Some(parent) == self.nodes[grand].left {
                let uncle = self.nodes[grand].right;
                if self.is_red(uncle) {
                    self.log.push("red uncle → recolor and ascend".to_owned());
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grand), Color::Red);
                    node = grand;
                } else {
                    let mut node_now = node;
                    if Some(node) == self.nodes[parent].right {
                        self.log
                            .push("inner grandchild → left rotation at parent".to_owned());
                        node_now = parent;
                        self.rotate_left(node_now);
                    }
                    // After the optional rotation, re-read the chain.
                    if let Some(p) = self.nodes[node_now].parent {
                        self.set_color(Some(p), Color::Black);
                        if let Some(g) = self.nodes[p].parent {
                            self.log
                                .push("recolor and right rotation at grandparent".to_owned());
                            self.set_color(Some(g), Color::Red);
                            self.rotate_right(g);
                        }
                    }
                    node = node_now;
                }
            } else {
                let uncle = self.nodes[grand].left;
                if self.is_red(uncle) {
                    self.log.push("red uncle → recolor and ascend".to_owned());
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grand), Color::Red);
                    node = grand;
                } else {
                    let mut node_now = node;
                    if Some(node) == self.nodes[parent].left {
                        self.log
                            .push("inner grandchild → right rotation at parent".to_owned());
                        node_now = parent;
                        self.rotate_right(node_now);
                    }
                    if let Some(p) = self.nodes[node_now].parent {
                        self.set_color(Some(p), Color::Black);
                        if let Some(g) = self.nodes[p].parent {
                            self.log
                                .push("recolor and left rotation at grandparent".to_owned());
                            self.set_color(Some(g), Color::Red);
                            self.rotate_left(g);
                        }
                    }
                    node = node_now;
                }
            }
        }
        if let Some(root) = self.root {
            self.nodes[root].color = Some(Color::Black);
        }
    }

    /// Canonical double-black fix-up after removing a black node: resolves
    /// the missing black through the sibling cases (red sibling rotation,
    /// all-black recolor-and-ascend, near-nephew rotation, far-nephew
    /// recolor-and-rotate), mirrored for symmetry.
    ///
    /// `node` is the spliced-in child (possibly `None` for a removed leaf);
    /// `parent` anchors the position when `node` is `None`.
    fn fix_double_black(&mut self, node: Option<NodeKey>, parent: Option<NodeKey>) {
        let mut node = node;
        let mut parent = parent;
        while node != self.root && !self.is_red(node) {
            let Some(p) = parent else {
                break;
            };
            if node == self.nodes[p].left {
                let mut sibling = self.nodes[p].right;
                if self.is_red(sibling) {
                    self.log
                        .push("red sibling → recolor and left rotation".to_owned());
                    self.set_color(sibling, Color::Black);
                    self.set_color(Some(p), Color::Red);
                    self.rotate_left(p);
                    sibling = self.nodes[p].right;
                }
                let Some(s) = sibling else {
                    // No sibling to borrow from: push the deficit upward.
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                };
                let near = self.nodes[s].left;
                let far = self.nodes[s].right;
                if !self.is_red(near) && !self.is_red(far) {
                    self.log.push("black sibling family → recolor and ascend".to_owned());
                    self.set_color(Some(s), Color::Red);
                    node = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(far) {
                        self.log
                            .push("near nephew red → right rotation at sibling".to_owned());
                        self.set_color(near, Color::Black);
                        self.set_color(Some(s), Color::Red);
                        self.rotate_right(s);
                    }
                    self.log
                        .push("far nephew red → recolor and left rotation".to_owned());
                    if let Some(s) = self.nodes[p].right {
                        let parent_color = self.nodes[p].color;
                        self.nodes[s].color = parent_color;
                        let far = self.nodes[s].right;
                        self.set_color(far, Color::Black);
                    }
                    self.set_color(Some(p), Color::Black);
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self.nodes[p].left;
                if self.is_red(sibling) {
                    self.log
                        .push("red sibling → recolor and right rotation".to_owned());
                    self.set_color(sibling, Color::Black);
                    self.set_color(Some(p), Color::Red);
                    self.rotate_right(p);
                    sibling = self.nodes[p].left;
                }
                let Some(s) = sibling else {
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                };
                let near = self.nodes[s].right;
                let far = self.nodes[s].left;
                if !self.is_red(near) && !self.is_red(far) {
                    self.log.push("black sibling family → recolor and ascend".to_owned());
                    self.set_color(Some(s), Color::Red);
                    node = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(far) {
                        self.log
                            .push("near nephew red → left rotation at sibling".to_owned());
                        self.set_color(near, Color::Black);
                        self.set_color(Some(s), Color::Red);
                        self.rotate_left(s);
                    }
                    self.log
                        .push("far nephew red → recolor and right rotation".to_owned());
                    if let Some(s) = self.nodes[p].left {
                        let parent_color = self.nodes[p].color;
                        self.nodes[s].color = parent_color;
                        let far = self.nodes[s].left;
                        self.set_color(far, Color::Black);
                    }
                    self.set_color(Some(p), Color::Black);
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }
        self.set_color(node, Color::Black);
    }

    // =========================================================================
    // TRAVERSALS
    // =========================================================================

    /// Keys in ascending order (left, self, right).
    #[must_use]
    pub fn inorder(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.node_count);
        self.inorder_walk(self.root, &mut out);
        out
    }

    fn inorder_walk(&self, node: Option<NodeKey>, out: &mut Vec<K>) {
        if let Some(key) = node {
            self.inorder_walk(self.nodes[key].left, out);
            out.push(self.nodes[key].value);
            self.inorder_walk(self.nodes[key].right, out);
        }
    }

    /// Keys in root-first order (self, left, right).
    #[must_use]
    pub fn preorder(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.node_count);
        self.preorder_walk(self.root, &mut out);
        out
    }

    fn preorder_walk(&self, node: Option<NodeKey>, out: &mut Vec<K>) {
        if let Some(key) = node {
            out.push(self.nodes[key].value);
            self.preorder_walk(self.nodes[key].left, out);
            self.preorder_walk(self.nodes[key].right, out);
        }
    }

    /// Keys in children-first order (left, right, self).
    #[must_use]
    pub fn postorder(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.node_count);
        self.postorder_walk(self.root, &mut out);
        out
    }

    fn postorder_walk(&self, node: Option<NodeKey>, out: &mut Vec<K>) {
        if let Some(key) = node {
            self.postorder_walk(self.nodes[key].left, out);
            self.postorder_walk(self.nodes[key].right, out);
            out.push(self.nodes[key].value);
        }
    }

    /// Keys level by level, top to bottom, left to right (FIFO breadth-first
    /// walk).
    #[must_use]
    pub fn levelorder(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.node_count);
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back(root);
        }
        while let Some(key) = queue.pop_front() {
            out.push(self.nodes[key].value);
            if let Some(left) = self.nodes[key].left {
                queue.push_back(left);
            }
            if let Some(right) = self.nodes[key].right {
                queue.push_back(right);
            }
        }
        out
    }

    // =========================================================================
    // MANUAL REBALANCE AND BULK OPERATIONS
    // =========================================================================

    /// For a plain BST: rebuilds the tree to minimum height by recursively
    /// rooting each subrange at its middle element of the sorted key
    /// sequence. A no-op for AVL and Red-Black trees, which are balanced by
    /// construction.
    pub fn balance_tree(&mut self) {
        self.log.begin("balance tree");
        match self.kind {
            TreeKind::Bst => {
                let values = self.inorder();
                self.nodes.clear();
                self.root = None;
                self.traversal_path.clear();
                self.root = self.build_balanced(&values, None);
                self.node_count = values.len();
                self.log
                    .push(format!("rebuilt as minimum-height tree of {} keys", values.len()));
            }
            TreeKind::Avl => {
                self.log.push("AVL tree is balanced by construction".to_owned());
            }
            TreeKind::RedBlack => {
                self.log
                    .push("Red-Black tree is balanced by construction".to_owned());
            }
        }
    }

    fn build_balanced(&mut self, values: &[K], parent: Option<NodeKey>) -> Option<NodeKey> {
        if values.is_empty() {
            return None;
        }
        let mid = (values.len() - 1) / 2;
        let key = self.nodes.insert(Node::new(values[mid], self.kind));
        self.nodes[key].parent = parent;
        let left = self.build_balanced(&values[..mid], Some(key));
        let right = self.build_balanced(&values[mid + 1..], Some(key));
        self.nodes[key].left = left;
        self.nodes[key].right = right;
        self.update_node(key);
        Some(key)
    }

    /// Removes every node; the rotation counter is reset too.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.node_count = 0;
        self.rotation_count = 0;
        self.traversal_path.clear();
        self.log.begin("cleared tree");
    }

    // =========================================================================
    // ACCESSORS AND DIAGNOSTICS
    // =========================================================================

    /// The balancing discipline.
    #[must_use]
    pub const fn kind(&self) -> TreeKind {
        self.kind
    }

    /// The root node's key, if any.
    #[must_use]
    pub const fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Looks up a node by arena key.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node<K>> {
        self.nodes.get(key)
    }

    /// Iterates over all nodes (arena order, not key order); rendering
    /// layers walk child/parent keys from here.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node<K>)> {
        self.nodes.iter()
    }

    /// The smallest key, if any.
    #[must_use]
    pub fn min(&self) -> Option<K> {
        self.root.map(|root| self.nodes[self.min_from(root)].value)
    }

    /// The largest key, if any.
    #[must_use]
    pub fn max(&self) -> Option<K> {
        let mut current = self.root?;
        while let Some(right) = self.nodes[current].right {
            current = right;
        }
        Some(self.nodes[current].value)
    }

    fn min_from(&self, start: NodeKey) -> NodeKey {
        let mut current = start;
        while let Some(left) = self.nodes[current].left {
            current = left;
        }
        current
    }

    /// The nodes visited by the most recent [`SearchTree::search`], in
    /// descent order.
    #[must_use]
    pub fn traversal_path(&self) -> &[NodeKey] {
        &self.traversal_path
    }

    /// Narration of the most recent mutating call.
    #[must_use]
    pub const fn log(&self) -> &OperationLog {
        &self.log
    }

    /// The current statistics bundle. The balance flag is recomputed
    /// recursively and does not trust cached balance factors.
    #[must_use]
    pub fn stats(&self) -> TreeStats<K> {
        TreeStats {
            node_count: self.node_count,
            height: self.height_of(self.root),
            is_balanced: self.check_balance(self.root).0,
            rotation_count: self.rotation_count,
            kind: self.kind,
            root_value: self.root.map(|root| self.nodes[root].value),
        }
    }

    fn check_balance(&self, node: Option<NodeKey>) -> (bool, u32) {
        match node {
            None => (true, 0),
            Some(key) => {
                let (left_ok, left_height) = self.check_balance(self.nodes[key].left);
                let (right_ok, right_height) = self.check_balance(self.nodes[key].right);
                (
                    left_ok && right_ok && left_height.abs_diff(right_height) <= 1,
                    left_height.max(right_height) + 1,
                )
            }
        }
    }

    /// Verifies the structural invariants of the active discipline: search
    /// order always; `|balance factor| ≤ 1` per node for AVL; black root,
    /// no red-red edge, and equal black-heights for Red-Black; and the node
    /// count bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let actual = self.check_invariants(self.root, None, None)?.0;
        if actual != self.node_count {
            return Err(InvariantViolation::CountMismatch {
                stored: self.node_count,
                actual,
            });
        }
        if self.kind == TreeKind::RedBlack
            && let Some(root) = self.root
            && self.nodes[root].is_red()
        {
            return Err(InvariantViolation::RedRoot);
        }
        Ok(())
    }

    /// Recursive walk: returns (reachable count, height, black-height).
    fn check_invariants(
        &self,
        node: Option<NodeKey>,
        lower: Option<K>,
        upper: Option<K>,
    ) -> Result<(usize, u32, u32), InvariantViolation> {
        let Some(key) = node else {
            return Ok((0, 0, 1));
        };
        let value = self.nodes[key].value;
        if lower.is_some_and(|l| value <= l) || upper.is_some_and(|u| value >= u) {
            return Err(InvariantViolation::OutOfOrder {
                value: value.to_string(),
            });
        }

        let (left_count, left_height, left_black) =
            self.check_invariants(self.nodes[key].left, lower, Some(value))?;
        let (right_count, right_height, right_black) =
            self.check_invariants(self.nodes[key].right, Some(value), upper)?;

        if self.kind == TreeKind::Avl {
            let diff = i64::from(left_height) - i64::from(right_height);
            if diff.abs() > 1 {
                return Err(InvariantViolation::Unbalanced {
                    value: value.to_string(),
                    balance_factor: diff,
                });
            }
        }

        let mut black = left_black;
        if self.kind == TreeKind::RedBlack {
            if left_black != right_black {
                return Err(InvariantViolation::BlackHeightMismatch {
                    value: value.to_string(),
                    left: left_black,
                    right: right_black,
                });
            }
            if self.nodes[key].is_red() && self.is_red(self.nodes[key].parent) {
                return Err(InvariantViolation::RedRed {
                    value: value.to_string(),
                });
            }
            if self.nodes[key].is_black() {
                black += 1;
            }
        }

        Ok((
            left_count + right_count + 1,
            left_height.max(right_height) + 1,
            black,
        ))
    }
}

impl<K: TreeKey + SampleUniform> SearchTree<K> {
    /// Clears the tree and inserts `count` distinct uniformly random keys
    /// drawn from `min..=max`, in generation order.
    ///
    /// Generation stops early if the range cannot supply enough distinct
    /// keys within a bounded number of draws.
    pub fn generate_random(&mut self, count: usize, min: K, max: K) {
        self.clear();
        let mut rng = rand::rng();
        let mut values: Vec<K> = Vec::with_capacity(count);
        let mut attempts = 0usize;
        while values.len() < count && attempts < count.saturating_mul(64).max(64) {
            let value = rng.random_range(min..=max);
            if !values.contains(&value) {
                values.push(value);
            }
            attempts += 1;
        }
        for value in values {
            self.insert(value);
        }
        self.log
            .push(format!("generated random tree of {} keys", self.node_count));
    }
}
