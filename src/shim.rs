//! Shim module to abstract over std and loom primitives.
//!
//! The ring only touches shared state through these re-exports, so building with
//! `--features loom` lets the model checker explore every interleaving of the
//! head, tail and release-index accesses.

#[cfg(not(feature = "loom"))]
pub mod atomic {
    pub use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
}

#[cfg(feature = "loom")]
pub mod atomic {
    pub use loom::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
}


#[cfg(all(test, feature = "loom"))]
pub mod sync {
    pub use loom::sync::Arc;
}
