use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::compare::NaturalOrder;
use crate::error::Error;

type Link<T> = Option<Box<Node<T>>>;

/// A node of an [`AvlTree`].
///
/// Nodes are only reachable through [`AvlTree::root`] and the child
/// accessors; every node exclusively owns its two subtrees.
#[derive(Clone, Debug)]
pub struct Node<T> {
    value: T,
    height: usize,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn leaf(value: T) -> Self {
        Self {
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// The value stored in this node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The left subtree, holding values ordered before this one.
    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    /// The right subtree, holding values ordered after this one.
    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    /// Height of the subtree rooted here. A leaf has height 1.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `height(left) - height(right)`. Always in `-1..=1` for a node reachable
    /// from a tree.
    pub fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// The smallest value in this subtree.
    pub fn min(&self) -> &T {
        let mut node = self;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        &node.value
    }

    /// The largest value in this subtree.
    pub fn max(&self) -> &T {
        let mut node = self;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        &node.value
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Splits the node into its value and the subtree that replaces it.
    fn detach(mut self: Box<Self>) -> (T, Link<T>) {
        let replacement = match (self.left.take(), self.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let (mut successor, rest) = take_min(right);
                successor.left = Some(left);
                successor.right = rest;
                let mut subtree = Some(successor);
                rebalance(&mut subtree);
                subtree
            }
        };
        (self.value, replacement)
    }
}

#[inline]
fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_left<T>(link: &mut Link<T>) {
    let Some(mut root) = link.take() else {
        return;
    };
    let Some(mut pivot) = root.right.take() else {
        *link = Some(root);
        return;
    };

    root.right = pivot.left.take();
    root.update_height();
    pivot.left = Some(root);
    pivot.update_height();

    tracing::trace!(height = pivot.height, "rotated left");
    *link = Some(pivot);
}

fn rotate_right<T>(link: &mut Link<T>) {
    let Some(mut root) = link.take() else {
        return;
    };
    let Some(mut pivot) = root.left.take() else {
        *link = Some(root);
        return;
    };

    root.left = pivot.right.take();
    root.update_height();
    pivot.right = Some(root);
    pivot.update_height();

    tracing::trace!(height = pivot.height, "rotated right");
    *link = Some(pivot);
}

/// Restores height and balance of the subtree at `link`, assuming both of its
/// children are valid AVL trees whose heights differ by at most two.
fn rebalance<T>(link: &mut Link<T>) {
    let Some(node) = link.as_mut() else {
        return;
    };
    node.update_height();

    let balance = node.balance();
    if balance > 1 {
        // Left-right: straighten the heavy child first.
        if node.left.as_ref().is_some_and(|left| left.balance() < 0) {
            rotate_left(&mut node.left);
        }
        rotate_right(link);
    } else if balance < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance() > 0) {
            rotate_right(&mut node.right);
        }
        rotate_left(link);
    }
}

fn insert_node<T, C>(link: &mut Link<T>, value: T, cmp: &C) -> bool
where
    C: Fn(&T, &T) -> Ordering,
{
    let node = match link {
        Some(node) => node,
        None => {
            *link = Some(Box::new(Node::leaf(value)));
            return true;
        }
    };

    let inserted = match cmp(&value, &node.value) {
        Ordering::Less => insert_node(&mut node.left, value, cmp),
        Ordering::Greater => insert_node(&mut node.right, value, cmp),
        Ordering::Equal => false,
    };

    if inserted {
        rebalance(link);
    }
    inserted
}

fn remove_node<T, C>(link: &mut Link<T>, value: &T, cmp: &C) -> Option<T>
where
    C: Fn(&T, &T) -> Ordering,
{
    let node = link.as_mut()?;

    let removed = match cmp(value, &node.value) {
        Ordering::Less => remove_node(&mut node.left, value, cmp),
        Ordering::Greater => remove_node(&mut node.right, value, cmp),
        Ordering::Equal => {
            let node = link.take()?;
            let (removed, replacement) = node.detach();
            *link = replacement;
            Some(removed)
        }
    };

    if removed.is_some() {
        rebalance(link);
    }
    removed
}

/// Detaches the leftmost node of a subtree. Returns that node, with both
/// children cleared, and what is left of the subtree.
fn take_min<T>(mut node: Box<Node<T>>) -> (Box<Node<T>>, Link<T>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = take_min(left);
            node.left = rest;
            let mut subtree = Some(node);
            rebalance(&mut subtree);
            (min, subtree)
        }
    }
}

/// A self-balancing binary search tree.
///
/// Values are ordered by a comparator `C: Fn(&T, &T) -> Ordering`: when
/// `cmp(a, b)` is `Less`, `a` is stored to the left of `b`. Values that
/// compare `Equal` are duplicates; the tree keeps the first one inserted.
///
/// After every insert and remove, the heights of any node's two subtrees
/// differ by at most one, so lookups, inserts and removals take
/// `O(log n)` comparisons.
///
/// # Examples
///
/// ```rust
/// # use basic_containers::AvlTree;
/// #
/// let mut tree = AvlTree::new();
/// for value in [5, 3, 8, 1, 4] {
///     tree.insert(value);
/// }
///
/// assert!(tree.contains(&4));
/// assert_eq!(tree.min(), Some(&1));
/// assert_eq!(tree.max(), Some(&8));
///
/// let mut visited = Vec::new();
/// tree.pre_order(|v| visited.push(*v));
/// assert_eq!(visited, [5, 3, 1, 4, 8]);
/// ```
#[derive(Clone)]
pub struct AvlTree<T, C = NaturalOrder<T>> {
    root: Link<T>,
    len: usize,
    cmp: C,
}

impl<T, C> Debug for AvlTree<T, C>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    /// Creates an empty tree ordered by `T`'s `Ord` implementation.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    pub fn new() -> Self {
        Self::with_comparator(crate::compare::natural)
    }
}

impl<T> Default for AvlTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty tree ordered by `cmp`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized. Use [`try_with_comparator`] to get an
    /// [`Error`] instead.
    ///
    /// [`try_with_comparator`]: AvlTree::try_with_comparator
    ///
    /// ```rust
    /// # use basic_containers::AvlTree;
    /// # use basic_containers::compare::reverse;
    /// #
    /// let mut tree = AvlTree::with_comparator(reverse::<u32>);
    /// tree.extend([1, 3, 2]);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        match Self::try_with_comparator(cmp) {
            Ok(tree) => tree,
            Err(error) => panic!("{error}"),
        }
    }

    /// Creates an empty tree ordered by `cmp`, rejecting zero-sized element
    /// types.
    ///
    /// ```rust
    /// # use basic_containers::AvlTree;
    /// # use basic_containers::Error;
    /// # use basic_containers::compare::natural;
    /// #
    /// let tree = AvlTree::<(), _>::try_with_comparator(natural::<()>);
    /// assert_eq!(tree.unwrap_err(), Error::ZeroSizedElement);
    /// ```
    pub fn try_with_comparator(cmp: C) -> Result<Self, Error> {
        if size_of::<T>() == 0 {
            return Err(Error::ZeroSizedElement);
        }

        Ok(Self {
            root: None,
            len: 0,
            cmp,
        })
    }

    /// Inserts a value, returning `false` if an equal value was already
    /// present. In that case the tree is unchanged and `value` is dropped.
    ///
    /// ```rust
    /// # use basic_containers::AvlTree;
    /// #
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(10));
    /// assert!(tree.insert(20));
    /// assert!(tree.insert(30));
    /// assert!(!tree.insert(20));
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.value(), &20);
    /// assert_eq!(root.left().map(|n| *n.value()), Some(10));
    /// assert_eq!(root.right().map(|n| *n.value()), Some(30));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let inserted = insert_node(&mut self.root, value, &self.cmp);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Returns `true` if the tree holds a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match (self.cmp)(value, &node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Removes the value equal to `value` and returns it, or `None` if no
    /// such value is present.
    ///
    /// A node with two children is replaced by its in-order successor.
    ///
    /// ```rust
    /// # use basic_containers::AvlTree;
    /// #
    /// let mut tree: AvlTree<i32> = [5, 3, 8, 1, 4].into_iter().collect();
    /// assert_eq!(tree.remove(&3), Some(3));
    /// assert_eq!(tree.remove(&3), None);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 4, 5, 8]);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let removed = remove_node(&mut self.root, value, &self.cmp);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }
}

impl<T, C> AvlTree<T, C> {
    /// Number of values in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// The smallest value, or `None` when the tree is empty.
    pub fn min(&self) -> Option<&T> {
        self.root().map(Node::min)
    }

    /// The largest value, or `None` when the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.root().map(Node::max)
    }

    /// Drops every value. The comparator is kept.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Calls `visit` on every value in ascending order.
    pub fn in_order(&self, mut visit: impl FnMut(&T)) {
        self.iter().for_each(|value| visit(value));
    }

    /// Calls `visit` on every node before its left subtree, and on the left
    /// subtree before the right one.
    pub fn pre_order(&self, mut visit: impl FnMut(&T)) {
        self.pre_order_iter().for_each(|value| visit(value));
    }

    /// Calls `visit` on the left subtree, then the right subtree, then the
    /// node itself.
    ///
    /// ```rust
    /// # use basic_containers::AvlTree;
    /// #
    /// let tree: AvlTree<i32> = [5, 3, 8, 1, 4].into_iter().collect();
    /// let mut visited = Vec::new();
    /// tree.post_order(|v| visited.push(*v));
    /// assert_eq!(visited, [1, 4, 3, 8, 5]);
    /// ```
    pub fn post_order(&self, mut visit: impl FnMut(&T)) {
        self.post_order_iter().for_each(|value| visit(value));
    }

    /// Returns an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Returns an iterator over the values in pre-order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_, T> {
        PreOrderIter {
            stack: self.root.as_deref().into_iter().collect(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the values in post-order.
    pub fn post_order_iter(&self) -> PostOrderIter<'_, T> {
        PostOrderIter {
            stack: self
                .root
                .as_deref()
                .map(|node| (node, false))
                .into_iter()
                .collect(),
            remaining: self.len,
        }
    }

    /// Consumes the tree and returns its values in ascending order.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        let mut stack: Vec<Box<Node<T>>> = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(mut node) = current {
                current = node.left.take();
                stack.push(node);
            }
            let Some(mut node) = stack.pop() else {
                break;
            };
            current = node.right.take();
            values.push(node.value);
        }

        values
    }
}

impl<T, C> Extend<T> for AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for AvlTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over the values of an [`AvlTree`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// A pre-order iterator over the values of an [`AvlTree`].
pub struct PreOrderIter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for PreOrderIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right first so the left subtree is popped next.
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PreOrderIter<'_, T> {}
impl<T> FusedIterator for PreOrderIter<'_, T> {}

/// A post-order iterator over the values of an [`AvlTree`].
pub struct PostOrderIter<'a, T> {
    /// Nodes paired with whether their children have been expanded.
    stack: Vec<(&'a Node<T>, bool)>,
    remaining: usize,
}

impl<'a, T> Iterator for PostOrderIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                self.remaining -= 1;
                return Some(&node.value);
            }
            self.stack.push((node, true));
            self.stack.extend(node.right.as_deref().map(|n| (n, false)));
            self.stack.extend(node.left.as_deref().map(|n| (n, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PostOrderIter<'_, T> {}
impl<T> FusedIterator for PostOrderIter<'_, T> {}
