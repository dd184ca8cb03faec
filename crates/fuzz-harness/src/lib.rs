//! Relay Network Fuzz Harness
//!
//! Property-based testing infrastructure for the relay network: heap
//! workloads, random weighted graphs, random antenna networks and a
//! configurable runner.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn keys_are_small(keys in heap_keys(32)) {
//!         prop_assert!(keys.iter().all(|k| k.abs() <= 50));
//!     }
//! }
//! ```

pub mod generators;
pub mod reference;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::reference::*;
    pub use crate::runner::FuzzConfig;
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
