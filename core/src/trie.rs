//! Prefix trie used as the lexicon index.
//!
//! Every dictionary word is stored as a root-to-node path of characters,
//! with a terminal flag marking complete words. The probe used during DAG
//! construction is [`TrieNode::match_range`], which reports whether a span
//! is a known word, the prefix of a longer one, both, or neither.
//!
//! Child storage is mixed: a node keeps its children in a sorted array
//! looked up by binary search while it has at most three of them, and
//! migrates them into a hash map when a fourth distinct child is inserted.
//! The migration is one-way. Most nodes of a CJK lexicon stay in array
//! form, which is smaller and faster to scan than a map.

use std::collections::HashMap;

/// Maximum number of children kept in the sorted-array representation.
const ARRAY_LIMIT: usize = 3;

const HIT_MATCH: u8 = 0b01;
const HIT_PREFIX: u8 = 0b10;

/// Result of probing the trie with a `(buffer, begin, len)` span.
///
/// `matched` and `prefix` are not exclusive: a span can be a complete word
/// and the prefix of a longer one at the same time. On a failed walk,
/// `end` is the index of the last character that was examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub begin: usize,
    pub end: usize,
    state: u8,
}

impl Hit {
    fn new(begin: usize) -> Self {
        Self {
            begin,
            end: begin,
            state: 0,
        }
    }

    /// The walked span is a complete dictionary word.
    pub fn is_match(&self) -> bool {
        self.state & HIT_MATCH != 0
    }

    /// The walked span is a proper prefix of at least one longer word.
    pub fn is_prefix(&self) -> bool {
        self.state & HIT_PREFIX != 0
    }

    /// Neither a word nor a prefix.
    pub fn is_unmatch(&self) -> bool {
        self.state == 0
    }

    fn set_match(&mut self) {
        self.state |= HIT_MATCH;
    }

    fn set_prefix(&mut self) {
        self.state |= HIT_PREFIX;
    }
}

/// Children of a trie node, in exactly one physical representation.
#[derive(Debug)]
enum Children {
    /// Sorted ascending by node character; holds at most `ARRAY_LIMIT`.
    Array(Vec<TrieNode>),
    /// Keyed form after promotion. A promoted node never goes back.
    Map(HashMap<char, TrieNode>),
}

/// A single trie node.
///
/// The root carries `'\0'` and is never terminal; words containing `'\0'`
/// are rejected before they reach the trie (see `WordDict`).
#[derive(Debug)]
pub struct TrieNode {
    ch: char,
    terminal: bool,
    children: Children,
}

impl TrieNode {
    /// Create an empty root node.
    pub fn new() -> Self {
        Self::with_char('\0')
    }

    fn with_char(ch: char) -> Self {
        Self {
            ch,
            terminal: false,
            children: Children::Array(Vec::new()),
        }
    }

    /// Character this node represents (`'\0'` for the root).
    pub fn node_char(&self) -> char {
        self.ch
    }

    fn has_children(&self) -> bool {
        match &self.children {
            Children::Array(v) => !v.is_empty(),
            Children::Map(m) => !m.is_empty(),
        }
    }

    fn child(&self, ch: char) -> Option<&TrieNode> {
        match &self.children {
            Children::Array(v) => v.binary_search_by_key(&ch, |n| n.ch).ok().map(|i| &v[i]),
            Children::Map(m) => m.get(&ch),
        }
    }

    /// Find or create the child for `ch`, promoting the storage to map form
    /// when a fourth distinct child appears.
    fn child_or_insert(&mut self, ch: char) -> &mut TrieNode {
        // decide on promotion first, so the storage match below can hand
        // its borrow straight back out
        let full = matches!(&self.children, Children::Array(v)
            if v.len() == ARRAY_LIMIT && v.binary_search_by_key(&ch, |n| n.ch).is_err());
        if full {
            // fourth distinct child: migrate everything to a map
            let old = std::mem::replace(&mut self.children, Children::Map(HashMap::new()));
            if let (Children::Array(nodes), Children::Map(map)) = (old, &mut self.children) {
                for node in nodes {
                    map.insert(node.ch, node);
                }
            }
        }

        match &mut self.children {
            Children::Array(v) => match v.binary_search_by_key(&ch, |n| n.ch) {
                Ok(i) => &mut v[i],
                Err(i) => {
                    v.insert(i, TrieNode::with_char(ch));
                    &mut v[i]
                }
            },
            Children::Map(m) => m.entry(ch).or_insert_with(|| TrieNode::with_char(ch)),
        }
    }

    /// Insert a word. Repeated insertion of the same word is a no-op.
    ///
    /// # Example
    /// ```
    /// use libhanseg_core::trie::TrieNode;
    ///
    /// let mut trie = TrieNode::new();
    /// trie.insert("北京");
    /// let buf: Vec<char> = "北京".chars().collect();
    /// assert!(trie.match_range(&buf, 0, 2).is_match());
    /// assert!(trie.match_range(&buf, 0, 1).is_prefix());
    /// ```
    pub fn insert(&mut self, word: &str) {
        let mut node = self;
        for ch in word.chars() {
            node = node.child_or_insert(ch);
        }
        node.terminal = true;
    }

    /// Probe the trie with `len` characters of `buf` starting at `begin`.
    ///
    /// The returned [`Hit`] has `begin` equal to the input `begin`. When the
    /// whole span is walked, `end` is `begin + len - 1` and the match and
    /// prefix flags describe the final node; when a child is missing along
    /// the way, the hit is unmatched and `end` is the position where the
    /// walk stopped.
    pub fn match_range(&self, buf: &[char], begin: usize, len: usize) -> Hit {
        let mut hit = Hit::new(begin);
        let mut node = self;
        for depth in 0..len {
            let pos = begin + depth;
            hit.end = pos;
            match node.child(buf[pos]) {
                Some(next) => {
                    if depth + 1 == len {
                        if next.terminal {
                            hit.set_match();
                        }
                        if next.has_children() {
                            hit.set_prefix();
                        }
                    } else {
                        node = next;
                    }
                }
                None => return hit,
            }
        }
        hit
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn root_reserves_nul() {
        let trie = TrieNode::new();
        assert_eq!(trie.node_char(), '\0');
        assert!(!trie.has_children());
    }

    #[test]
    fn match_states() {
        let mut trie = TrieNode::new();
        trie.insert("北京");
        trie.insert("北京大学");

        let buf = chars("北京大学");

        // "北" is only a prefix
        let hit = trie.match_range(&buf, 0, 1);
        assert!(!hit.is_match());
        assert!(hit.is_prefix());
        assert_eq!((hit.begin, hit.end), (0, 0));

        // "北京" is a word and a prefix of "北京大学"
        let hit = trie.match_range(&buf, 0, 2);
        assert!(hit.is_match());
        assert!(hit.is_prefix());
        assert_eq!((hit.begin, hit.end), (0, 1));

        // "北京大学" is a word with nothing below it
        let hit = trie.match_range(&buf, 0, 4);
        assert!(hit.is_match());
        assert!(!hit.is_prefix());
        assert_eq!((hit.begin, hit.end), (0, 3));

        // "京大" is neither
        let hit = trie.match_range(&buf, 1, 2);
        assert!(hit.is_unmatch());
    }

    #[test]
    fn unmatch_reports_last_examined_position() {
        let mut trie = TrieNode::new();
        trie.insert("中国人");

        let buf = chars("中国土");
        let hit = trie.match_range(&buf, 0, 3);
        assert!(hit.is_unmatch());
        assert_eq!(hit.begin, 0);
        // walk got through 中 and 国, failed on 土
        assert_eq!(hit.end, 2);
    }

    #[test]
    fn repeated_insert_is_idempotent() {
        let mut trie = TrieNode::new();
        trie.insert("你好");
        trie.insert("你好");
        let buf = chars("你好");
        assert!(trie.match_range(&buf, 0, 2).is_match());
        assert!(!trie.match_range(&buf, 0, 1).is_match());
    }

    #[test]
    fn promotion_to_map_preserves_matches() {
        let mut trie = TrieNode::new();
        // five distinct children under the root force the promotion path
        for w in ["安", "波", "次", "德", "俄"] {
            trie.insert(w);
        }
        for w in ["安", "波", "次", "德", "俄"] {
            let buf = chars(w);
            assert!(trie.match_range(&buf, 0, 1).is_match(), "lost {}", w);
        }
        let buf = chars("法");
        assert!(trie.match_range(&buf, 0, 1).is_unmatch());
    }

    #[test]
    fn promotion_happens_below_the_root_too() {
        let mut trie = TrieNode::new();
        for w in ["中一", "中二", "中三", "中四", "中五"] {
            trie.insert(w);
        }
        for w in ["中一", "中二", "中三", "中四", "中五"] {
            let buf = chars(w);
            assert!(trie.match_range(&buf, 0, 2).is_match());
        }
        // the interior node is still a prefix holder
        let buf = chars("中");
        let hit = trie.match_range(&buf, 0, 1);
        assert!(hit.is_prefix());
        assert!(!hit.is_match());
    }

    #[test]
    fn mid_buffer_begin() {
        let mut trie = TrieNode::new();
        trie.insert("大学");
        let buf = chars("北京大学");
        assert!(trie.match_range(&buf, 2, 2).is_match());
    }
}
