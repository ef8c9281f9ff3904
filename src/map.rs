use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use log::{debug, trace};

use crate::error::{Error, Result};

/// An ordered map implemented with an AVL tree.
///
/// The tree is rebalanced on every insertion, so lookups descend at most
/// `O(log n)` levels. Keys cannot be removed once inserted.
///
/// ```
/// use avl_search_tree::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(10, "ten");
/// map.insert(20, "twenty");
/// map.insert(30, "thirty");
/// assert_eq!(map.find(&20), Ok(&"twenty"));
/// assert_eq!(map.pre_order(), vec![20, 10, 30]);
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

/// Where an insertion ended up relative to a subtree root.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Step {
    /// The key was already present, nothing changed.
    Existing,
    /// The subtree was empty and is now a new leaf.
    Leaf,
    Left,
    Right,
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

/// An iterator over the entries of a map, in ascending key order.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the root node, or `None` for an empty map.
    /// A single leaf has height 0.
    pub fn height(&self) -> Option<usize> {
        self.root.as_ref().map(|root| root.height)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.num_nodes);
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns true if the map contains a value for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node_mut(key).map(|node| &mut node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|node| (&node.key, &node.value))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// Fails with [`Error::ElementNotFound`] if the key is not in the map.
    pub fn find<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::ElementNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// so the value can be updated in place.
    ///
    /// Fails with [`Error::ElementNotFound`] if the key is not in the map.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(Error::ElementNotFound)
    }

    /// Inserts a key-value pair into the map.
    /// Returns whether the key was newly inserted. If the key was already
    /// present the map is left unchanged, including the stored value.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (root, step) = Self::insert_node(self.root.take(), key, value);
        self.root = Some(root);
        if step == Step::Existing {
            trace!("key already present, insert ignored");
            return false;
        }
        self.num_nodes += 1;
        true
    }

    /// Returns an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.num_nodes)
    }

    /// Visits all entries breadth first, starting at the root.
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut queue: VecDeque<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            f(&node.key, &node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
    }

    /// Asserts that ordering, heights, balance and node count are consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        let mut previous: Option<&K> = None;
        self.traverse(
            |node| {
                // Check ordering of direct children
                if let Some(left) = node.left.as_deref() {
                    assert!(left.key < node.key);
                }
                if let Some(right) = node.right.as_deref() {
                    assert!(right.key > node.key);
                }

                // Check height
                let left_height = node.left_height();
                let right_height = node.right_height();
                assert_eq!(node.height, cmp::max(left_height, right_height));

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            },
            |node| {
                // Check ordering across subtrees
                if let Some(key) = previous {
                    assert!(*key < node.key);
                }
                previous = Some(&node.key);
            },
            |_| {},
        );

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
    }

    fn find_node<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            }
        }
        current
    }

    fn find_node_mut<Q>(&mut self, key: &Q) -> Option<&mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    /// Inserts below the given subtree and returns its new root, together with
    /// the direction the descent took at that root.
    fn insert_node(link: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, Step) {
        let mut node = match link {
            None => return (Node::create(key, value), Step::Leaf),
            Some(node) => node,
        };

        let (step, below) = match key.cmp(&node.key) {
            Ordering::Equal => return (node, Step::Existing),
            Ordering::Less => {
                let (left, below) = Self::insert_node(node.left.take(), key, value);
                node.left = Some(left);
                (Step::Left, below)
            }
            Ordering::Greater => {
                let (right, below) = Self::insert_node(node.right.take(), key, value);
                node.right = Some(right);
                (Step::Right, below)
            }
        };
        if below == Step::Existing {
            return (node, Step::Existing);
        }

        // Node is an ancestor of the new leaf
        node.adjust_height();
        (Self::rebalance_node(node, below), step)
    }

    /// Restores AVL condition (balance) at given node if necessary.
    /// `below` is the direction the insertion took at the child on the heavy
    /// side, which selects between a single and a double rotation.
    fn rebalance_node(node: Box<Node<K, V>>, below: Step) -> Box<Node<K, V>> {
        let balance = node.balance();
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            if below == Step::Left {
                trace!("left-left case, rotating right");
                Self::rotate_right(node)
            } else {
                trace!("left-right case, rotating left then right");
                Self::rotate_left_right(node)
            }
        } else if balance < -1 {
            if below == Step::Right {
                trace!("right-right case, rotating left");
                Self::rotate_left(node)
            } else {
                trace!("right-left case, rotating right then left");
                Self::rotate_right_left(node)
            }
        } else {
            node
        }
    }

    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut left) = node.left.take() else {
            return node;
        };
        node.left = left.right.take();
        node.adjust_height();
        left.right = Some(node);
        left.adjust_height();
        left
    }

    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut right) = node.right.take() else {
            return node;
        };
        node.right = right.left.take();
        node.adjust_height();
        right.left = Some(node);
        right.adjust_height();
        right
    }

    fn rotate_left_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut left) = node.left.take() else {
            return node;
        };
        let Some(mut pivot) = left.right.take() else {
            node.left = Some(left);
            return Self::rotate_right(node);
        };
        left.right = pivot.left.take();
        node.left = pivot.right.take();
        node.adjust_height();
        left.adjust_height();
        pivot.left = Some(left);
        pivot.right = Some(node);
        pivot.adjust_height();
        pivot
    }

    fn rotate_right_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut right) = node.right.take() else {
            return node;
        };
        let Some(mut pivot) = right.left.take() else {
            node.right = Some(right);
            return Self::rotate_left(node);
        };
        right.left = pivot.right.take();
        node.right = pivot.left.take();
        node.adjust_height();
        right.adjust_height();
        pivot.left = Some(node);
        pivot.right = Some(right);
        pivot.adjust_height();
        pivot
    }

    fn traverse<'a, Pre, In, Post>(&'a self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(&'a Node<K, V>),
        In: FnMut(&'a Node<K, V>),
        Post: FnMut(&'a Node<K, V>),
    {
        let mut stack: Vec<(&'a Node<K, V>, Direction)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, Direction::FromParent));
        }
        while let Some((node, dir)) = stack.pop() {
            match dir {
                Direction::FromParent => {
                    preorder(node);
                    stack.push((node, Direction::FromLeft));
                    if let Some(left) = node.left.as_deref() {
                        stack.push((left, Direction::FromParent));
                    }
                }
                Direction::FromLeft => {
                    inorder(node);
                    stack.push((node, Direction::FromRight));
                    if let Some(right) = node.right.as_deref() {
                        stack.push((right, Direction::FromParent));
                    }
                }
                Direction::FromRight => postorder(node),
            }
        }
    }
}

impl<K: Ord + Clone, V> AvlTreeMap<K, V> {
    /// Returns the keys in ascending order.
    pub fn in_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|_| {}, |node| keys.push(node.key.clone()), |_| {});
        keys
    }

    /// Returns the keys with every node before its left and right subtrees.
    pub fn pre_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|node| keys.push(node.key.clone()), |_| {}, |_| {});
        keys
    }

    /// Returns the keys with every node after its left and right subtrees.
    pub fn post_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|_| {}, |_| {}, |node| keys.push(node.key.clone()));
        keys
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_edge(root);
        iter
    }

    fn push_left_edge(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_edge(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Node<K, V> {
    /// Creates a leaf. Its height is 0 and stays so until it gains a child.
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    // Subtree heights are shifted by one so that an absent child counts as 0.
    fn left_height(&self) -> usize {
        match &self.left {
            None => 0,
            Some(left) => left.height + 1,
        }
    }

    fn right_height(&self) -> usize {
        match &self.right {
            None => 0,
            Some(right) => right.height + 1,
        }
    }

    fn balance(&self) -> isize {
        self.left_height() as isize - self.right_height() as isize
    }

    fn adjust_height(&mut self) {
        self.height = cmp::max(self.left_height(), self.right_height());
    }
}
