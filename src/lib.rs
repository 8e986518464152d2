//! # Neardup-RS: SimHash Near-Duplicate Detection
//!
//! Batch near-duplicate detection for tokenized text. Every document is
//! reduced to a 128-bit SimHash fingerprint, fingerprints are bucketed by
//! LSH bands, and queries count the documents within a Hamming distance
//! threshold by measuring only band-sharing candidates.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       API Layer                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  Core          │  Detectors (simhash)    │  I/O          │
//! │ • Config       │ • Token cache / hasher  │ • Workload    │
//! │ • Errors       │ • Fingerprint generator │ • Answers     │
//! │                │ • Band index            │               │
//! │                │ • Distance oracle       │               │
//! │                │ • Query engine          │               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use neardup_rs::{NearDuplicateEngine, NeardupConfig, Query};
//!
//! # fn main() -> neardup_rs::Result<()> {
//! let mut engine = NearDuplicateEngine::new(NeardupConfig::default())?;
//! let docs = vec![
//!     vec!["a", "b", "c"],
//!     vec!["a", "b", "c"],
//!     vec!["x", "y", "z"],
//! ];
//! engine.index_corpus(&docs)?;
//!
//! assert_eq!(engine.answer(&[Query::new(0, 0)])?, vec![1]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Memory allocator selection (mutually exclusive)
#[cfg(all(feature = "mimalloc", not(feature = "jemalloc")))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(all(feature = "jemalloc", not(feature = "mimalloc")))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

// Configuration and error types
pub mod core {
    //! Configuration and error handling.

    pub mod config;
    pub mod errors;
}

// Detection algorithms
pub mod detectors {
    //! Fingerprinting and candidate detection.

    pub mod simhash;
}

// Workload input and answer output
pub mod io {
    //! Reading workloads and writing answers.

    pub mod answers;
    pub mod workload;
}

// Public API and engine interface
pub mod api {
    //! High-level engine interface.

    pub mod engine;
}

// Re-export primary types for convenience
pub use api::engine::NearDuplicateEngine;
pub use core::config::NeardupConfig;
pub use core::errors::{NeardupError, Result, ResultExt};
pub use detectors::simhash::{Fingerprint, Query};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build-time feature detection
pub mod features {
    //! Runtime feature detection.

    /// Check if parallel processing is enabled
    pub const fn has_parallel() -> bool {
        cfg!(feature = "parallel")
    }
}
