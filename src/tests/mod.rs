//! In-crate ring tests
//!
//! 环形缓冲区的 crate 内测试


#[cfg(feature = "loom")]
mod loom;
