//! Persistent ordered sets.
//!
//! An [`OrderedSet`] is an immutable sorted list of reference-counted nodes.
//! Every operation returns a new set and shares whatever tail of its input it
//! did not have to rebuild, so cloning a set, or keeping old versions around
//! while deriving new ones, is cheap.
//!
//! Elements are kept in ascending order at all times. Binary operations walk
//! both inputs in step, so they run in time proportional to the sizes of the
//! sets involved.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

type Link<T> = Option<Rc<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// An immutable, structurally shared, sorted set.
///
/// `T`'s [`Ord`] provides the ordering and its [`Eq`] the duplicate check;
/// the two must agree.
pub struct OrderedSet<T> {
    head: Link<T>,
    len: usize,
}

impl<T> OrderedSet<T> {
    /// The empty set.
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of elements.
    pub fn cardinality(&self) -> usize {
        self.len
    }

    /// The smallest element.
    pub fn first(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// The set without its smallest element. Shares all remaining nodes.
    pub fn rest(&self) -> Self {
        match &self.head {
            Some(node) => Self {
                head: node.next.clone(),
                len: self.len - 1,
            },
            None => Self::new(),
        }
    }

    /// Ascending iteration.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cursor: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Builds a set whose first elements are `prefix` (ascending, all smaller
    /// than anything in `tail`) followed by the shared `tail`.
    fn from_parts(prefix: Vec<T>, tail: Link<T>, tail_len: usize) -> Self {
        let len = prefix.len() + tail_len;
        let head = prefix
            .into_iter()
            .rev()
            .fold(tail, |next, value| Some(Rc::new(Node { value, next })));
        Self { head, len }
    }

    fn link_len(link: &Link<T>) -> usize {
        let mut len = 0;
        let mut cursor = link.as_deref();
        while let Some(node) = cursor {
            len += 1;
            cursor = node.next.as_deref();
        }
        len
    }
}

impl<T: Ord + Clone> OrderedSet<T> {
    /// The set with `value` added. Returns the same structure if `value` is
    /// already present.
    pub fn adjoin(&self, value: T) -> Self {
        let mut prefix = Vec::new();
        let mut cursor = &self.head;
        while let Some(node) = cursor {
            match node.value.cmp(&value) {
                Ordering::Less => {
                    prefix.push(node.value.clone());
                    cursor = &node.next;
                }
                Ordering::Equal => return self.clone(),
                Ordering::Greater => break,
            }
        }
        let tail_len = self.len - prefix.len();
        let tail = Some(Rc::new(Node {
            value,
            next: cursor.clone(),
        }));
        Self::from_parts(prefix, tail, tail_len + 1)
    }

    /// The set without `value`. Returns the same structure if `value` is
    /// absent.
    pub fn remove(&self, value: &T) -> Self {
        let mut prefix = Vec::new();
        let mut cursor = &self.head;
        while let Some(node) = cursor {
            match node.value.cmp(value) {
                Ordering::Less => {
                    prefix.push(node.value.clone());
                    cursor = &node.next;
                }
                Ordering::Equal => {
                    let tail_len = self.len - prefix.len() - 1;
                    return Self::from_parts(prefix, node.next.clone(), tail_len);
                }
                Ordering::Greater => break,
            }
        }
        self.clone()
    }

    pub fn member(&self, value: &T) -> bool {
        for element in self {
            match element.cmp(value) {
                Ordering::Less => continue,
                Ordering::Equal => return true,
                Ordering::Greater => return false,
            }
        }
        false
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut merged = Vec::new();
        let mut a = &self.head;
        let mut b = &other.head;
        loop {
            match (a, b) {
                (Some(x), Some(y)) => match x.value.cmp(&y.value) {
                    Ordering::Less => {
                        merged.push(x.value.clone());
                        a = &x.next;
                    }
                    Ordering::Greater => {
                        merged.push(y.value.clone());
                        b = &y.next;
                    }
                    Ordering::Equal => {
                        merged.push(x.value.clone());
                        a = &x.next;
                        b = &y.next;
                    }
                },
                // One side is exhausted: the other side's tail is shared as is.
                (Some(_), None) => {
                    let tail_len = Self::link_len(a);
                    return Self::from_parts(merged, a.clone(), tail_len);
                }
                (None, _) => {
                    let tail_len = Self::link_len(b);
                    return Self::from_parts(merged, b.clone(), tail_len);
                }
            }
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut common = Vec::new();
        let mut a = &self.head;
        let mut b = &other.head;
        while let (Some(x), Some(y)) = (a, b) {
            match x.value.cmp(&y.value) {
                Ordering::Less => a = &x.next,
                Ordering::Greater => b = &y.next,
                Ordering::Equal => {
                    common.push(x.value.clone());
                    a = &x.next;
                    b = &y.next;
                }
            }
        }
        Self::from_parts(common, None, 0)
    }

    /// Elements of `self` that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        let mut kept = Vec::new();
        let mut a = &self.head;
        let mut b = &other.head;
        loop {
            match (a, b) {
                (Some(x), Some(y)) => match x.value.cmp(&y.value) {
                    Ordering::Less => {
                        kept.push(x.value.clone());
                        a = &x.next;
                    }
                    Ordering::Greater => b = &y.next,
                    Ordering::Equal => {
                        a = &x.next;
                        b = &y.next;
                    }
                },
                (Some(_), None) => {
                    let tail_len = Self::link_len(a);
                    return Self::from_parts(kept, a.clone(), tail_len);
                }
                (None, _) => return Self::from_parts(kept, None, 0),
            }
        }
    }

    /// Whether every element of `self` is in `other` and the two differ.
    pub fn proper_subset(&self, other: &Self) -> bool {
        if self.len >= other.len {
            return false;
        }
        let mut theirs = other.iter();
        'outer: for mine in self {
            for candidate in theirs.by_ref() {
                match candidate.cmp(mine) {
                    Ordering::Less => {}
                    Ordering::Equal => continue 'outer,
                    Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }
}

impl<T> Clone for OrderedSet<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlinks nodes one at a time; the derived recursive drop would blow the
// stack on long lists.
impl<T> Drop for OrderedSet<T> {
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(node) = link {
            match Rc::try_unwrap(node) {
                Ok(mut node) => link = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: Ord + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut values: Vec<T> = iter.into_iter().collect();
        values.sort();
        values.dedup();
        Self::from_parts(values, None, 0)
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

/// Lexicographic over the ascending elements; a proper prefix sorts first.
impl<T: Ord> Ord for OrderedSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Ord> PartialOrd for OrderedSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Hash> Hash for OrderedSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Ascending iterator over an [`OrderedSet`].
pub struct Iter<'a, T> {
    cursor: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.map(|node| {
            self.cursor = node.next.as_deref();
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
