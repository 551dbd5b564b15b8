//! Slot storage - fixed arena of ring cells
//!
//! 槽位存储 - 固定大小的环形单元区
//!
//! Every slot holds a handle word and the absolute sequence number it was last
//! published at. The arena is allocated once with a power-of-two length and
//! addressed by `position & mask`.
//!
//! 每个槽位保存一个句柄字和它最近一次发布时的绝对序号。
//! 存储区以 2 的幂次长度一次性分配，并通过 `position & mask` 寻址。

use crate::error::AllocError;
use crate::shim::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Largest capacity a ring may have
///
/// 环形缓冲区允许的最大容量
///
/// Keeps any two live counters within half the `u32` range of each other so
/// serial-number comparisons stay unambiguous.
pub const MAX_CAPACITY: u32 = 1 << 31;

/// One ring cell
///
/// 一个环形单元
pub(crate) struct Slot {
    /// Handle bits, see [`crate::Handle`]
    ///
    /// 句柄位
    payload: AtomicUsize,

    /// Absolute sequence number most recently published into this slot
    ///
    /// 最近一次发布到此槽位的绝对序号
    release: AtomicU32,
}

impl Slot {
    fn new(release: u32) -> Self {
        Self {
            payload: AtomicUsize::new(0),
            release: AtomicU32::new(release),
        }
    }

    /// Store a handle ahead of publishing it
    #[inline]
    pub(crate) fn write(&self, bits: usize) {
        self.payload.store(bits, Ordering::Relaxed);
    }

    /// Load the handle bits
    ///
    /// Ordered by the head/tail (or release-index) acquire that preceded it.
    #[inline]
    pub(crate) fn read(&self) -> usize {
        self.payload.load(Ordering::Relaxed)
    }

    /// Publish this slot as holding sequence number `pos`
    #[inline]
    pub(crate) fn release(&self, pos: u32) {
        self.release.store(pos, Ordering::Release);
    }

    /// Sequence number this slot was last published at
    #[inline]
    pub(crate) fn released_at(&self) -> u32 {
        self.release.load(Ordering::Acquire)
    }
}

/// Fixed-capacity slot arena
///
/// 固定容量的槽位存储区
pub(crate) struct SlotArena {
    slots: Box<[Slot]>,
    mask: u32,
}

impl SlotArena {
    /// Allocate `size` slots, `size` being a power of two no larger than
    /// [`MAX_CAPACITY`]
    ///
    /// 分配 `size` 个槽位
    ///
    /// Each slot's release index starts at `position - size`, which is before
    /// any sequence number that can legitimately land there, so an untouched
    /// slot never looks freshly published.
    ///
    /// 每个槽位的 release 索引初始为 `position - size`，早于任何可能落在该位置的合法序号。
    pub(crate) fn new(size: u32) -> Result<Self, AllocError> {
        debug_assert!(size.is_power_of_two() && size <= MAX_CAPACITY);

        let len = size as usize;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|_| AllocError::OutOfMemory { slots: len })?;
        slots.extend((0..size).map(|i| Slot::new(i.wrapping_sub(size))));

        Ok(Self {
            slots: slots.into_boxed_slice(),
            mask: size - 1,
        })
    }

    /// Number of slots
    #[inline]
    pub(crate) fn size(&self) -> u32 {
        self.mask.wrapping_add(1)
    }

    /// Mask for fast modulo (`size - 1`)
    #[inline]
    pub(crate) fn mask(&self) -> u32 {
        self.mask
    }

    /// Slot that absolute position `pos` maps to
    #[inline]
    pub(crate) fn at(&self, pos: u32) -> &Slot {
        &self.slots[(pos & self.mask) as usize]
    }
}

/// Round a requested capacity up to the next power of two
///
/// 将请求的容量向上取整到下一个 2 的幂次
///
/// # Returns
/// `None` for zero or when the result would exceed [`MAX_CAPACITY`]
///
/// # 返回值
/// 为零或结果超过 [`MAX_CAPACITY`] 时返回 `None`
#[inline]
pub fn round_to_power_of_two(capacity: u32) -> Option<u32> {
    if capacity == 0 {
        return None;
    }
    capacity
        .checked_next_power_of_two()
        .filter(|&size| size <= MAX_CAPACITY)
}
