use crate::archiver::ArchiveError;
use crate::bitqueue::BitQueue;
use crate::vocabulary::Vocabulary;

/// A node of the Huffman tree. Internal nodes always own exactly two
/// children; a tree built from k distinct symbols has k leaves and k-1
/// internal nodes. Depth is bounded by the 256-symbol alphabet, so
/// recursive traversal needs no explicit stack.
#[derive(Debug, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        frequency: u32,
        symbol: u8,
    },
    Internal {
        frequency: u32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn frequency(&self) -> u32 {
        match self {
            Self::Leaf { frequency, .. } | Self::Internal { frequency, .. } => *frequency,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// Bit path from the root to one leaf; first bit = edge taken out of the
/// root, `true` = left, `false` = right.
pub type Code = Vec<bool>;

/// A Huffman tree with its derived symbol-to-code table.
///
/// Construction and the codebook are fixed by the vocabulary alone, so an
/// encoder and a decoder that start from equal vocabularies agree on
/// every code.
pub struct HuffTree {
    root: Option<TreeNode>,
    codes: [Code; 256],
}

impl HuffTree {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let root = Self::build(vocabulary);
        let mut codes: [Code; 256] = core::array::from_fn(|_| Vec::new());
        if let Some(root) = &root {
            let mut path = Vec::new();
            Self::collect_codes(root, &mut path, &mut codes);
        }
        Self { root, codes }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// The code assigned to `symbol`; empty when the symbol is not in the
    /// vocabulary (such a symbol never appears on the encode pass).
    pub fn code(&self, symbol: u8) -> &[bool] {
        &self.codes[symbol as usize]
    }

    pub fn cursor(&self) -> DecodeCursor<'_> {
        DecodeCursor {
            root: self.root.as_ref(),
            node: self.root.as_ref(),
        }
    }

    /// Bottom-up construction: repeatedly merge the two minimum-frequency
    /// nodes until one tree remains. Minimum selection is a linear scan
    /// under strict less-than, so ties go to the earliest-inserted node;
    /// the same rule runs on both the encode and decode paths. O(k^2)
    /// over at most 256 symbols, which is plenty.
    fn build(vocabulary: &Vocabulary) -> Option<TreeNode> {
        let mut nodes: Vec<TreeNode> = vocabulary
            .entries()
            .map(|(symbol, frequency)| TreeNode::Leaf { frequency, symbol })
            .collect();

        while nodes.len() >= 2 {
            let left = nodes.remove(Self::find_min(&nodes));
            let right = nodes.remove(Self::find_min(&nodes));
            nodes.push(TreeNode::Internal {
                frequency: left.frequency() + right.frequency(),
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        nodes.pop()
    }

    fn find_min(nodes: &[TreeNode]) -> usize {
        let mut min = 0;
        for (i, node) in nodes.iter().enumerate() {
            if node.frequency() < nodes[min].frequency() {
                min = i;
            }
        }
        min
    }

    fn collect_codes(node: &TreeNode, path: &mut Code, codes: &mut [Code; 256]) {
        match node {
            TreeNode::Leaf { symbol, .. } => {
                // A lone leaf root has an empty path, which would be
                // ambiguous in the bitstream; its code is the single bit 1.
                if path.is_empty() {
                    codes[*symbol as usize] = vec![true];
                } else {
                    codes[*symbol as usize] = path.clone();
                }
            }
            TreeNode::Internal { left, right, .. } => {
                path.push(true);
                Self::collect_codes(left, path, codes);
                path.pop();
                path.push(false);
                Self::collect_codes(right, path, codes);
                path.pop();
            }
        }
    }
}

/// Resumable bit-by-bit walk over an already-built tree.
///
/// One `advance` call emits at most one symbol; when the queue runs dry
/// mid-walk the cursor stays parked on its current node and picks up from
/// there on the next call.
pub struct DecodeCursor<'tree> {
    root: Option<&'tree TreeNode>,
    node: Option<&'tree TreeNode>,
}

impl DecodeCursor<'_> {
    /// Consumes bits from `queue` until a symbol is produced (`Some`), the
    /// queue is exhausted (`None`), or the walk leaves the tree
    /// (`CorruptStream`).
    pub fn advance(&mut self, queue: &mut BitQueue) -> Result<Option<u8>, ArchiveError> {
        if let (Some(root), Some(node)) = (self.root, self.node) {
            if std::ptr::eq(root, node) && node.is_leaf() {
                // Single-symbol tree: every emitted symbol is one padding
                // bit in the stream, value irrelevant.
                if queue.pop().is_none() {
                    return Ok(None);
                }
                if let TreeNode::Leaf { symbol, .. } = node {
                    return Ok(Some(*symbol));
                }
            }
        }

        while let Some(TreeNode::Internal { left, right, .. }) = self.node {
            let Some(bit) = queue.pop() else {
                return Ok(None);
            };
            self.node = Some(if bit { &**left } else { &**right });
        }

        match self.node {
            None => Err(ArchiveError::CorruptStream),
            Some(TreeNode::Leaf { symbol, .. }) => {
                let symbol = *symbol;
                self.node = self.root;
                Ok(Some(symbol))
            }
            Some(TreeNode::Internal { .. }) => unreachable!("descent loop only stops on a leaf or an empty queue"),
        }
    }
}
