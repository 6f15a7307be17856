//! # Offchain Node Test Suite
//!
//! Cross-crate scenarios run against the in-memory chain, inference and
//! signer doubles.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared builders (configs, signer, tx decoding)
//! └── integration/
//!     ├── cycle_flow.rs     # Watch → fetch → submit → confirm end to end
//!     ├── sequencing.rs     # Account sequence across concurrent topics
//!     └── supervision.rs    # Isolation, restart, shutdown
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p oc-tests
//! cargo test -p oc-tests integration::supervision
//! ```

pub mod fixtures;
pub mod integration;
