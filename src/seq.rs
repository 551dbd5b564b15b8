//! Serial-number arithmetic over ring counters
//!
//! 环形计数器上的序列号算术
//!
//! Head, tail and release indices are free-running `u32` counters that are never
//! reset. They are compared by signed difference, which stays correct across
//! wraparound as long as two compared values are never more than `2^31` apart.
//! Bounding the ring capacity to `2^31` guarantees this for every comparison the
//! ring performs.
//!
//! Head、tail 和 release 索引都是从不重置的 `u32` 自由递增计数器。
//! 它们通过有符号差值进行比较，只要两个被比较的值相差不超过 `2^31`，
//! 在回绕时依然正确。容量上限 `2^31` 保证了环形缓冲区中的所有比较都满足这一点。

use crate::shim::atomic::{AtomicU32, Ordering};

/// True if `a` precedes `b` in serial-number order (`a < b`)
///
/// 在序列号顺序中 `a` 是否先于 `b`（`a < b`）
#[inline]
pub fn before(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) < 0
}

/// True if `a` follows `b` in serial-number order (`a > b`)
///
/// 在序列号顺序中 `a` 是否晚于 `b`（`a > b`）
#[inline]
pub fn after(a: u32, b: u32) -> bool {
    before(b, a)
}

/// Number of steps from `from` forward to `to`, modulo `2^32`
///
/// 从 `from` 向前到 `to` 的步数（模 `2^32`）
///
/// Unsigned, so a full ring of `2^31` slots (`tail - head == 2^31`) is told
/// apart from an empty one. Only meaningful when `from` does not follow `to`.
#[inline]
pub fn distance(from: u32, to: u32) -> u32 {
    to.wrapping_sub(from)
}

/// Advance `loc` to `neu` unless it already holds a later value.
///
/// Returns the value `loc` holds afterwards. Concurrent callers can only move the
/// counter forward; a caller with an older discovery gets the newer value back.
///
/// 将 `loc` 推进到 `neu`，除非它已经持有更晚的值。返回之后 `loc` 中的值。
pub fn cond_update(loc: &AtomicU32, neu: u32) -> u32 {
    let mut old = loc.load(Ordering::Acquire);
    loop {
        if before(neu, old) {
            return old;
        }
        match loc.compare_exchange_weak(old, neu, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return neu,
            Err(current) => old = current,
        }
    }
}
