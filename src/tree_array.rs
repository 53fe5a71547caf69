use std::error::Error;
use std::fmt;

/// Error returned when an index-based operation is outside the current bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} out of bounds for length {}",
            self.index, self.len
        )
    }
}

impl Error for IndexError {}

/// Convenience alias for results produced by [`TreeArray`] operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Stable handle to an element of a [`TreeArray`].
///
/// A handle keeps addressing the same element while other elements are
/// inserted, removed or moved around it. Once its element is removed the
/// handle is dead for good, even if the underlying slot gets reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    slot: usize,
    tag: u32,
}

/// Balanced binary tree that exposes a vector-like index and stable handles.
///
/// Nodes live in an arena and link to their parent, so besides the usual
/// `O(log n)` access, insertion and removal by index the tree can answer
/// "where is this element now" in `O(log n)` as well.
pub struct TreeArray<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    root: Option<usize>,
}

impl<T> Default for TreeArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArray<T> {
    /// Creates an empty [`TreeArray`].
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }

    /// Returns the number of elements stored in the tree.
    pub fn len(&self) -> usize {
        self.size_of(self.root)
    }

    /// Returns `true` when no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` while `id` addresses a stored element.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.slot)
            .map_or(false, |slot| slot.tag == id.tag && slot.node.is_some())
    }

    /// Inserts `value` at `index`, shifting the following elements.
    /// An `index` past the end appends.
    pub fn insert(&mut self, index: usize, value: T) -> NodeId {
        let slot = self.allocate(value);
        let index = index.min(self.len());
        self.link(index, slot);
        self.id_of(slot)
    }

    /// Appends `value` to the end of the tree and returns its handle.
    pub fn append(&mut self, value: T) -> NodeId {
        let slot = self.allocate(value);
        let len = self.len();
        self.link(len, slot);
        self.id_of(slot)
    }

    /// Removes the element addressed by `id` and returns it.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.unlink(id.slot);
        self.release(id.slot)
    }

    /// Moves the element addressed by `id` so that it ends up at `index`.
    ///
    /// `index` is interpreted after the element has been taken out, so it must
    /// be at most `len() - 1`. The handle stays valid.
    pub fn move_to(&mut self, id: NodeId, index: usize) -> IndexResult<()> {
        let len = self.len();
        if !self.contains(id) || index >= len {
            return Err(IndexError { index, len });
        }
        self.unlink(id.slot);
        self.link(index, id.slot);
        Ok(())
    }

    /// Borrows the element addressed by `id`.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.slot].node.as_ref().map(|node| &node.value)
    }

    /// Mutably borrows the element addressed by `id`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.slot].node.as_mut().map(|node| &mut node.value)
    }

    /// Returns the handle of the element currently at `index`.
    pub fn id_at(&self, mut index: usize) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(n) = current {
            let node = self.node(n);
            let left_size = self.size_of(node.left);
            if index < left_size {
                current = node.left;
            } else if index == left_size {
                return Some(self.id_of(n));
            } else {
                index -= left_size + 1;
                current = node.right;
            }
        }
        None
    }

    /// Returns the current index of the element addressed by `id`.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        let mut current = id.slot;
        let mut position = self.size_of(self.node(current).left);
        while let Some(parent) = self.node(current).parent {
            let node = self.node(parent);
            if node.right == Some(current) {
                position += self.size_of(node.left) + 1;
            }
            current = parent;
        }
        Some(position)
    }

    /// Returns the handle following `id` in index order.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        let mut current = id.slot;
        if let Some(mut n) = self.node(current).right {
            while let Some(left) = self.node(n).left {
                n = left;
            }
            return Some(self.id_of(n));
        }
        while let Some(parent) = self.node(current).parent {
            if self.node(parent).left == Some(current) {
                return Some(self.id_of(parent));
            }
            current = parent;
        }
        None
    }

    /// Returns the handle preceding `id` in index order.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        let mut current = id.slot;
        if let Some(mut n) = self.node(current).left {
            while let Some(right) = self.node(n).right {
                n = right;
            }
            return Some(self.id_of(n));
        }
        while let Some(parent) = self.node(current).parent {
            if self.node(parent).right == Some(current) {
                return Some(self.id_of(parent));
            }
            current = parent;
        }
        None
    }

    /// Returns every handle in index order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Re-links the stored elements so they appear in `order`.
    ///
    /// `order` must contain every live handle exactly once. Handles stay valid.
    pub fn rebuild(&mut self, order: &[NodeId]) -> IndexResult<()> {
        let len = self.len();
        let mut seen = vec![false; self.slots.len()];
        let complete = order.len() == len
            && order
                .iter()
                .all(|id| self.contains(*id) && !std::mem::replace(&mut seen[id.slot], true));
        if !complete {
            return Err(IndexError {
                index: order.len(),
                len,
            });
        }
        let slots: Vec<usize> = order.iter().map(|id| id.slot).collect();
        let root = self.build(&slots);
        self.set_root(root);
        Ok(())
    }

    /// Creates an iterator that yields handles and elements in order.
    pub fn iter(&self) -> TreeArrayIter<'_, T> {
        TreeArrayIter::new(self)
    }
}

impl<T: Clone> TreeArray<T> {
    /// Returns a vector containing the elements in index order.
    pub fn in_order(&self) -> Vec<T> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for TreeArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeArray")
            .field("len", &self.len())
            .field("values", &self.in_order())
            .finish()
    }
}

impl<T> TreeArray<T> {
    fn node(&self, slot: usize) -> &Node<T> {
        self.slots[slot].node.as_ref().expect("linked slot holds a node")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<T> {
        self.slots[slot].node.as_mut().expect("linked slot holds a node")
    }

    fn id_of(&self, slot: usize) -> NodeId {
        NodeId {
            slot,
            tag: self.slots[slot].tag,
        }
    }

    fn size_of(&self, slot: Option<usize>) -> usize {
        slot.map_or(0, |n| self.node(n).size)
    }

    fn height_of(&self, slot: Option<usize>) -> usize {
        slot.map_or(0, |n| self.node(n).height)
    }

    fn allocate(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot].node = Some(Node::new(value));
                slot
            }
            None => {
                self.slots.push(Slot {
                    tag: 0,
                    node: Some(Node::new(value)),
                });
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> Option<T> {
        let entry = &mut self.slots[slot];
        let node = entry.node.take()?;
        entry.tag = entry.tag.wrapping_add(1);
        self.free.push(slot);
        Some(node.value)
    }

    fn link(&mut self, index: usize, slot: usize) {
        self.node_mut(slot).detach();
        let root = self.insert_node(self.root, index, slot);
        self.set_root(Some(root));
    }

    fn unlink(&mut self, slot: usize) {
        let index = self
            .position(self.id_of(slot))
            .expect("unlinked slot is live");
        let root = self.root.expect("non-empty tree has a root");
        let root = self.delete_node(root, index);
        self.set_root(root);
        self.node_mut(slot).detach();
    }

    fn set_root(&mut self, root: Option<usize>) {
        self.root = root;
        if let Some(root) = root {
            self.node_mut(root).parent = None;
        }
    }

    fn set_left(&mut self, parent: usize, child: Option<usize>) {
        self.node_mut(parent).left = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    fn set_right(&mut self, parent: usize, child: Option<usize>) {
        self.node_mut(parent).right = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    fn update(&mut self, slot: usize) {
        let node = self.node(slot);
        let (left, right) = (node.left, node.right);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let size = 1 + self.size_of(left) + self.size_of(right);
        let node = self.node_mut(slot);
        node.height = height;
        node.size = size;
    }

    fn balance_factor(&self, slot: usize) -> isize {
        let node = self.node(slot);
        self.height_of(node.left) as isize - self.height_of(node.right) as isize
    }

    fn insert_node(&mut self, node: Option<usize>, index: usize, slot: usize) -> usize {
        let n = match node {
            Some(n) => n,
            None => return slot,
        };
        let left = self.node(n).left;
        let left_size = self.size_of(left);
        if index <= left_size {
            let child = self.insert_node(left, index, slot);
            self.set_left(n, Some(child));
        } else {
            let right = self.node(n).right;
            let child = self.insert_node(right, index - left_size - 1, slot);
            self.set_right(n, Some(child));
        }
        self.balance(n)
    }

    fn delete_node(&mut self, n: usize, index: usize) -> Option<usize> {
        let (left, right) = (self.node(n).left, self.node(n).right);
        let left_size = self.size_of(left);
        if index < left_size {
            let child = self.delete_node(left.expect("left child expected"), index);
            self.set_left(n, child);
        } else if index > left_size {
            let child = self.delete_node(
                right.expect("right child expected"),
                index - left_size - 1,
            );
            self.set_right(n, child);
        } else {
            return match (left, right) {
                (None, _) => right,
                (_, None) => left,
                (Some(left), Some(right)) => {
                    let (min, rest) = self.take_min(right);
                    self.set_left(min, Some(left));
                    self.set_right(min, rest);
                    Some(self.balance(min))
                }
            };
        }
        Some(self.balance(n))
    }

    fn take_min(&mut self, n: usize) -> (usize, Option<usize>) {
        match self.node(n).left {
            None => (n, self.node(n).right),
            Some(left) => {
                let (min, rest) = self.take_min(left);
                self.set_left(n, rest);
                (min, Some(self.balance(n)))
            }
        }
    }

    fn rotate_left(&mut self, n: usize) -> usize {
        let right = self.node(n).right.expect("right child expected");
        let inner = self.node(right).left;
        self.set_right(n, inner);
        self.update(n);
        self.set_left(right, Some(n));
        self.update(right);
        right
    }

    fn rotate_right(&mut self, n: usize) -> usize {
        let left = self.node(n).left.expect("left child expected");
        let inner = self.node(left).right;
        self.set_left(n, inner);
        self.update(n);
        self.set_right(left, Some(n));
        self.update(left);
        left
    }

    fn balance(&mut self, n: usize) -> usize {
        self.update(n);
        let balance = self.balance_factor(n);
        if balance > 1 {
            let left = self.node(n).left.expect("left child expected");
            if self.balance_factor(left) < 0 {
                let rotated = self.rotate_left(left);
                self.set_left(n, Some(rotated));
            }
            return self.rotate_right(n);
        }
        if balance < -1 {
            let right = self.node(n).right.expect("right child expected");
            if self.balance_factor(right) > 0 {
                let rotated = self.rotate_right(right);
                self.set_right(n, Some(rotated));
            }
            return self.rotate_left(n);
        }
        n
    }

    fn build(&mut self, slots: &[usize]) -> Option<usize> {
        if slots.is_empty() {
            return None;
        }
        let mid = slots.len() / 2;
        let n = slots[mid];
        let left = self.build(&slots[..mid]);
        let right = self.build(&slots[mid + 1..]);
        self.node_mut(n).detach();
        self.set_left(n, left);
        self.set_right(n, right);
        self.update(n);
        Some(n)
    }
}

struct Slot<T> {
    tag: u32,
    node: Option<Node<T>>,
}

struct Node<T> {
    value: T,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
    height: usize,
    size: usize,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            left: None,
            right: None,
            height: 1,
            size: 1,
        }
    }

    fn detach(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.height = 1;
        self.size = 1;
    }
}

/// Iterator that yields handles and references in ascending index order.
pub struct TreeArrayIter<'a, T> {
    tree: &'a TreeArray<T>,
    stack: Vec<usize>,
}

impl<'a, T> TreeArrayIter<'a, T> {
    fn new(tree: &'a TreeArray<T>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left(tree.root);
        iter
    }

    fn push_left(&mut self, mut node: Option<usize>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = self.tree.node(n).left;
        }
    }
}

impl<'a, T> Iterator for TreeArrayIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(slot);
        self.push_left(node.right);
        Some((tree.id_of(slot), &node.value))
    }
}

impl<'a, T> IntoIterator for &'a TreeArray<T> {
    type Item = (NodeId, &'a T);
    type IntoIter = TreeArrayIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_links<T>(tree: &TreeArray<T>) {
        fn walk<T>(tree: &TreeArray<T>, slot: usize, parent: Option<usize>) -> (usize, usize) {
            let node = tree.node(slot);
            assert_eq!(node.parent, parent, "parent link of slot {}", slot);
            let (lh, ls) = node.left.map_or((0, 0), |l| walk(tree, l, Some(slot)));
            let (rh, rs) = node.right.map_or((0, 0), |r| walk(tree, r, Some(slot)));
            assert!((lh as isize - rh as isize).abs() <= 1, "unbalanced at {}", slot);
            assert_eq!(node.size, 1 + ls + rs);
            assert_eq!(node.height, 1 + lh.max(rh));
            (node.height, node.size)
        }
        if let Some(root) = tree.root {
            walk(tree, root, None);
        }
    }

    #[test]
    fn handles_track_positions() {
        let mut tree = TreeArray::new();
        let ids: Vec<NodeId> = (0..64).map(|v| tree.append(v)).collect();
        check_links(&tree);
        for (index, id) in ids.iter().enumerate() {
            assert_eq!(tree.position(*id), Some(index));
        }

        let front = tree.insert(0, -1);
        assert_eq!(tree.position(front), Some(0));
        assert_eq!(tree.position(ids[10]), Some(11));

        assert_eq!(tree.remove(ids[5]), Some(5));
        check_links(&tree);
        assert_eq!(tree.position(ids[10]), Some(10));
        assert!(!tree.contains(ids[5]));
    }

    #[test]
    fn reused_slots_do_not_revive_handles() {
        let mut tree = TreeArray::new();
        let first = tree.append('a');
        tree.remove(first);
        let second = tree.append('b');
        assert!(!tree.contains(first));
        assert_eq!(tree.get(first), None);
        assert_eq!(tree.get(second), Some(&'b'));
    }

    #[test]
    fn next_and_prev_walk_in_order() {
        let mut tree = TreeArray::new();
        for value in 0..20 {
            tree.append(value);
        }
        let mut cursor = tree.id_at(0);
        let mut seen = Vec::new();
        while let Some(id) = cursor {
            seen.push(*tree.get(id).unwrap());
            cursor = tree.next(id);
        }
        assert_eq!(seen, (0..20).collect::<Vec<_>>());

        let last = tree.id_at(19).unwrap();
        assert_eq!(tree.prev(last).and_then(|id| tree.get(id)), Some(&18));
        assert_eq!(tree.prev(tree.id_at(0).unwrap()), None);
    }

    #[test]
    fn move_and_rebuild_keep_handles() {
        let mut tree = TreeArray::new();
        let ids: Vec<NodeId> = (0..10).map(|v| tree.append(v)).collect();

        tree.move_to(ids[0], 9).unwrap();
        check_links(&tree);
        assert_eq!(tree.position(ids[0]), Some(9));
        assert_eq!(tree.position(ids[1]), Some(0));

        let reversed: Vec<NodeId> = ids.iter().rev().copied().collect();
        tree.rebuild(&reversed).unwrap();
        check_links(&tree);
        assert_eq!(tree.in_order(), (0..10).rev().collect::<Vec<_>>());
        assert_eq!(tree.position(ids[9]), Some(0));

        assert!(tree.rebuild(&reversed[1..]).is_err());
    }

    #[test]
    fn insert_past_the_end_appends() {
        let mut tree = TreeArray::new();
        tree.append(1);
        let late = tree.insert(99, 2);
        check_links(&tree);
        assert_eq!(tree.position(late), Some(1));
        assert_eq!(tree.in_order(), vec![1, 2]);
    }
}
