//! Counting trie over byte tokens.
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to their children by
//! [`NodeId`]. Each node keeps a sparse, sorted child list, so a node only pays
//! for the symbols that were actually extended. Dropping the trie drops the
//! arena, which releases every node exactly once.

use smallvec::SmallVec;

use crate::alphabet::Alphabet;
use crate::error::TrieError;

// =============================================================================
// Configuration
// =============================================================================

/// Children stored inline before a child list spills to the heap.
const INLINE_CHILDREN: usize = 4;

// =============================================================================
// Node handles
// =============================================================================

/// Index of a node in the arena. The root is always index 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    #[inline]
    fn from_index(index: usize) -> Result<Self, TrieError> {
        u32::try_from(index)
            .map(NodeId)
            .map_err(|_| TrieError::AllocationFailed)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Default)]
struct Node {
    /// Insertions that ended exactly at this node.
    count: u64,
    /// Sorted by symbol.
    children: SmallVec<[(u8, NodeId); INLINE_CHILDREN]>,
}

impl Node {
    /// Position of `symbol` in the child list, or where it would be inserted.
    #[inline]
    fn child_slot(&self, symbol: u8) -> Result<NodeId, usize> {
        self.children
            .binary_search_by_key(&symbol, |&(s, _)| s)
            .map(|i| self.children[i].1)
    }

    #[inline]
    fn child(&self, symbol: u8) -> Option<NodeId> {
        self.child_slot(symbol).ok()
    }
}

// =============================================================================
// CountingTrie
// =============================================================================

/// Counts how many times each exact token was inserted.
///
/// A query on a prefix of an inserted token returns the prefix's own count,
/// not the sum over its descendants.
///
/// ```rust
/// use header_tally::CountingTrie;
///
/// let mut trie = CountingTrie::new();
/// trie.insert("GET").unwrap();
/// trie.insert("POST").unwrap();
/// trie.insert("GET").unwrap();
///
/// assert_eq!(trie.query("GET").unwrap(), 2);
/// assert_eq!(trie.query("GE").unwrap(), 0);
/// assert_eq!(trie.query("PUT").unwrap(), 0);
/// ```
#[derive(Clone)]
pub struct CountingTrie {
    nodes: Vec<Node>,
    alphabet: Alphabet,
    /// Tokens with a non-zero count.
    distinct: usize,
    /// Successful insertions.
    total: u64,
}

impl CountingTrie {
    pub fn new() -> Self {
        Self::with_alphabet(Alphabet::default())
    }

    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self::with_capacity(alphabet, 1)
    }

    /// Creates a trie with room for `nodes` nodes (including the root).
    pub fn with_capacity(alphabet: Alphabet, nodes: usize) -> Self {
        let mut arena = Vec::with_capacity(nodes.max(1));
        arena.push(Node::default());
        Self {
            nodes: arena,
            alphabet,
            distinct: 0,
            total: 0,
        }
    }

    #[inline]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Number of distinct tokens inserted at least once.
    #[inline]
    pub fn len(&self) -> usize {
        self.distinct
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Number of successful insertions.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of nodes, including the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn memory_usage(&self) -> usize {
        let spilled: usize = self
            .nodes
            .iter()
            .filter(|n| n.children.spilled())
            .map(|n| n.children.capacity() * std::mem::size_of::<(u8, NodeId)>())
            .sum();
        self.nodes.capacity() * std::mem::size_of::<Node>() + spilled
    }

    pub fn shrink_to_fit(&mut self) {
        let before = log::log_enabled!(log::Level::Debug).then(|| self.memory_usage());
        self.nodes.shrink_to_fit();
        for node in &mut self.nodes {
            node.children.shrink_to_fit();
        }
        if let Some(before) = before {
            log::debug!(
                "trie shrunk from {} to {} bytes ({} nodes)",
                before,
                self.memory_usage(),
                self.nodes.len()
            );
        }
    }

    /// Records one occurrence of `token` and returns its new count.
    ///
    /// The token is checked against the alphabet before anything is touched,
    /// so a rejected token leaves the trie unchanged.
    pub fn insert(&mut self, token: impl AsRef<[u8]>) -> Result<u64, TrieError> {
        let token = token.as_ref();
        self.alphabet.check(token)?;

        // Reserve for the worst case up front so a long token cannot run out
        // of arena space halfway down its path.
        self.nodes
            .try_reserve(token.len())
            .map_err(|_| TrieError::AllocationFailed)?;

        let mut current = NodeId::ROOT;
        for &symbol in token {
            current = match self.nodes[current.index()].child_slot(symbol) {
                Ok(child) => child,
                Err(slot) => self.add_child(current, slot, symbol)?,
            };
        }

        let node = &mut self.nodes[current.index()];
        let count = node.count.checked_add(1).ok_or(TrieError::CountOverflow)?;
        node.count = count;
        if count == 1 {
            self.distinct += 1;
        }
        self.total = self.total.saturating_add(1);
        Ok(count)
    }

    /// Returns how many times `token` was inserted, 0 if never.
    pub fn query(&self, token: impl AsRef<[u8]>) -> Result<u64, TrieError> {
        let token = token.as_ref();
        self.alphabet.check(token)?;
        Ok(self
            .find(token)
            .map_or(0, |id| self.nodes[id.index()].count))
    }

    /// Iterates over every counted token in byte order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            trie: self,
            stack: vec![(NodeId::ROOT, Vec::new())],
        }
    }

    fn find(&self, token: &[u8]) -> Option<NodeId> {
        token
            .iter()
            .try_fold(NodeId::ROOT, |id, &symbol| self.nodes[id.index()].child(symbol))
    }

    /// Appends a fresh node and links it under `parent` at `slot`.
    ///
    /// Both allocations happen before either structure is modified, and the
    /// parent link is written only once the child is in the arena.
    fn add_child(&mut self, parent: NodeId, slot: usize, symbol: u8) -> Result<NodeId, TrieError> {
        let id = NodeId::from_index(self.nodes.len())?;
        self.nodes
            .try_reserve(1)
            .map_err(|_| TrieError::AllocationFailed)?;
        self.nodes[parent.index()]
            .children
            .try_reserve(1)
            .map_err(|_| TrieError::AllocationFailed)?;

        self.nodes.push(Node::default());
        self.nodes[parent.index()]
            .children
            .insert(slot, (symbol, id));
        Ok(id)
    }
}

impl Default for CountingTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CountingTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)),
            )
            .finish()
    }
}

pub struct Iter<'a> {
    trie: &'a CountingTrie,
    stack: Vec<(NodeId, Vec<u8>)>,
}

impl Iterator for Iter<'_> {
    type Item = (Vec<u8>, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, key)) = self.stack.pop() {
            let node = &self.trie.nodes[id.index()];
            for &(symbol, child) in node.children.iter().rev() {
                let mut child_key = Vec::with_capacity(key.len() + 1);
                child_key.extend_from_slice(&key);
                child_key.push(symbol);
                self.stack.push((child, child_key));
            }
            if node.count > 0 {
                return Some((key, node.count));
            }
        }
        None
    }
}
