//! Error types
//!
//! 错误类型
//!
//! Only allocation can fail. Enqueue and dequeue report zero progress as a count
//! of zero (or `None`), which is indistinguishable from a momentarily full or
//! empty ring.
//!
//! 只有分配会失败。入队和出队以零计数（或 `None`）表示没有进展，
//! 这与暂时已满或为空的环形缓冲区无法区分。

use thiserror::Error;

/// Reasons a ring could not be allocated
///
/// 环形缓冲区分配失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// Requested element count was zero
    ///
    /// 请求的元素数量为零
    #[error("ring capacity must be non-zero")]
    ZeroCapacity,

    /// Requested element count rounds up past `2^31`
    ///
    /// 请求的元素数量向上取整后超过 `2^31`
    #[error("ring capacity {requested} rounds up beyond the 2^31 limit")]
    CapacityTooLarge { requested: u32 },

    /// Flag word carries bits outside the recognized set
    ///
    /// 标志字包含无法识别的位
    #[error("unsupported ring flags {bits:#x}")]
    UnsupportedFlags { bits: u32 },

    /// Slot storage could not be reserved
    ///
    /// 无法预留槽位存储
    #[error("out of memory reserving {slots} ring slots")]
    OutOfMemory { slots: usize },
}

/// A step of the self-test sequence did not produce the expected outcome
///
/// 自检序列中某一步未产生预期结果
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("self-test failed for flags {flags:#x} at step `{step}`")]
pub struct SelfTestError {
    /// Raw flag word the ring was allocated with
    pub flags: u32,
    /// Description of the failing check
    pub step: &'static str,
}
