//! huffpress Core - Tree-header Huffman Compression
//!
//! A lossless byte-stream compressor built on a static Huffman code.
//!
//! # Architecture
//!
//! Compression makes two passes over the input:
//!
//! - **Frequency counting**: one weight per byte value, plus a forced weight
//!   of 1 for the end-of-stream sentinel
//! - **Tree building**: repeated minimum-weight merging with deterministic tie-breaking
//! - **Code generation**: the root-to-leaf path of every symbol
//! - **Tree codec**: the tree itself is written into the stream header
//!
//! after which the input is rewound and every byte is replaced by its code.
//! Decompression reads the tree back and walks it bit by bit until it meets
//! the sentinel.
//!
//! ```
//! use huffpress_core::HuffProcessor;
//!
//! let processor = HuffProcessor::default();
//! let (compressed, _) = processor.compress_bytes(b"abracadabra")?;
//! let (restored, _) = processor.decompress_bytes(&compressed)?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), huffpress_core::HuffError>(())
//! ```

pub mod bitstream;
pub mod huffman;
pub mod processor;

mod error;
mod types;

pub use error::{HuffError, Result};
pub use processor::{HuffProcessor, ProcessorConfig};
pub use types::*;

/// huffpress version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format constants
pub mod config {
    /// Bits per input symbol
    pub const BITS_PER_WORD: u32 = 8;

    /// Bits in the magic header
    pub const BITS_PER_INT: u32 = 32;

    /// Number of distinct byte values
    pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;

    /// End-of-stream sentinel symbol
    pub const PSEUDO_EOF: u16 = ALPH_SIZE as u16;

    /// Base magic number of the format family
    pub const HUFF_NUMBER: u32 = 0xface_8200;

    /// Magic number of streams whose header is a pre-order tree
    pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

    /// Width of a serialized leaf value, wide enough for the sentinel
    pub const LEAF_VALUE_BITS: u32 = BITS_PER_WORD + 1;

    /// Deepest tree a 257-symbol alphabet can produce
    pub const MAX_TREE_DEPTH: usize = ALPH_SIZE;

    /// Default I/O buffer size (64KB)
    pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
}
