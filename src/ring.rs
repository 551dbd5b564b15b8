//! Lock-free ring of opaque handles
//!
//! 不透明句柄的无锁环形缓冲区
//!
//! Producers reserve a run of slots from `tail`, consumers claim a run from
//! `head`. Both counters are free-running `u32` sequence numbers compared with
//! serial-number arithmetic, and each sits on its own cache line.
//!
//! 生产者从 `tail` 预留一段槽位，消费者从 `head` 认领一段槽位。
//! 两个计数器都是自由递增的 `u32` 序号，使用序列号算术比较，且各自独占一条缓存行。
//!
//! # Ordering
//!
//! - Producer: payload stores, then a release store of each slot's release
//!   index, then one release store of `tail` for the whole batch.
//! - Consumer: acquire loads of `head` and `tail` (or of a release index during
//!   tail recovery) before the payload loads, then a release store or CAS of
//!   `head` which hands the slots back to the producer.

use crossbeam_utils::CachePadded;

use crate::config::{ConsumerMode, ProducerMode, RingConfig, RingFlags};
use crate::error::AllocError;
use crate::handle::Handle;
use crate::seq;
use crate::shim::atomic::{AtomicU32, Ordering};
use crate::slot::SlotArena;
use std::fmt;
use std::marker::PhantomData;

/// A run of handles claimed by one dequeue
///
/// 一次出队认领的一段句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Batch {
    /// Number of handles written to the output buffer (always ≥ 1)
    ///
    /// 写入输出缓冲区的句柄数量（总是 ≥ 1）
    pub len: usize,

    /// Absolute sequence number of the first handle
    ///
    /// 第一个句柄的绝对序号
    ///
    /// Handle `i` of the batch was the `start + i`-th handle ever enqueued
    /// (modulo `2^32`).
    pub start: u32,
}

impl Batch {
    /// Sequence numbers covered by this batch
    ///
    /// 此批次覆盖的序号
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len as u32).map(move |i| self.start.wrapping_add(i))
    }
}

/// Fixed-capacity lock-free ring buffer
///
/// 固定容量的无锁环形缓冲区
///
/// # Type Parameters
/// - `T`: Handle type moved through the ring, see [`Handle`]
///
/// # 类型参数
/// - `T`: 在环形缓冲区中传递的句柄类型，见 [`Handle`]
///
/// # Cardinality
///
/// The ring is shared by reference (usually through an `Arc`) and all
/// operations take `&self`. The cardinality chosen at allocation is a contract
/// with the callers:
///
/// - Enqueue is only implemented for [`ProducerMode::Single`]; exactly one
///   thread may call [`enqueue`](Self::enqueue) at a time. On a
///   [`ProducerMode::Multi`] ring enqueue always returns `0`.
/// - With [`ConsumerMode::Single`] exactly one thread may call
///   [`dequeue`](Self::dequeue); with [`ConsumerMode::Multi`] any number may.
///
/// Breaking the contract scrambles the queue contents but is not memory
/// unsafe: every shared word is an atomic.
///
/// # 基数
///
/// 环形缓冲区通过引用共享（通常借助 `Arc`），所有操作都只需 `&self`。
/// 分配时选定的基数是与调用者之间的约定；违反约定会打乱队列内容，但不会造成内存不安全。
///
/// # Examples
///
/// ```rust
/// use lfring::{LfRing, RingFlags};
///
/// let ring = LfRing::<usize>::new(4, RingFlags::SP | RingFlags::SC).unwrap();
///
/// assert_eq!(ring.enqueue(&[10, 20, 30]), 3);
///
/// let mut out = [0usize; 2];
/// let batch = ring.dequeue(&mut out).unwrap();
/// assert_eq!((batch.len, batch.start), (2, 0));
/// assert_eq!(out, [10, 20]);
/// ```
pub struct LfRing<T: Handle> {
    /// Sequence number of the next slot to consume
    ///
    /// 下一个待消费槽位的序号
    head: CachePadded<AtomicU32>,

    /// Sequence number of the next slot to produce into
    ///
    /// 下一个待生产槽位的序号
    tail: CachePadded<AtomicU32>,

    slots: SlotArena,
    flags: RingFlags,
    _marker: PhantomData<T>,
}

impl<T: Handle> LfRing<T> {
    /// Allocate a ring from a raw flag word
    ///
    /// 由原始标志字分配环形缓冲区
    ///
    /// `n_elems` is rounded up to the next power of two.
    ///
    /// # Errors
    /// - [`AllocError::ZeroCapacity`] if `n_elems == 0`
    /// - [`AllocError::CapacityTooLarge`] if `n_elems` rounds up past `2^31`
    /// - [`AllocError::UnsupportedFlags`] if `flags` has bits outside `SP | SC`
    /// - [`AllocError::OutOfMemory`] if slot storage cannot be reserved
    pub fn new(n_elems: u32, flags: u32) -> Result<Self, AllocError> {
        let config = RingConfig::from_flags(n_elems, flags).inspect_err(|err| {
            log::debug!("rejecting ring allocation of {n_elems} elements: {err}");
        })?;
        Self::with_config(config)
    }

    /// Allocate a ring from a typed configuration
    ///
    /// 由类型化配置分配环形缓冲区
    pub fn with_config(config: RingConfig) -> Result<Self, AllocError> {
        let size = config.validate().inspect_err(|err| {
            log::debug!("rejecting ring allocation {config:?}: {err}");
        })?;
        let slots = SlotArena::new(size).inspect_err(|err| {
            log::debug!("ring slot storage unavailable: {err}");
        })?;
        let flags = config.flags();

        log::trace!(
            "allocated ring: capacity={size} requested={} flags={:#x}",
            config.capacity,
            flags.bits()
        );

        Ok(Self {
            head: CachePadded::new(AtomicU32::new(0)),
            tail: CachePadded::new(AtomicU32::new(0)),
            slots,
            flags,
            _marker: PhantomData,
        })
    }

    /// Release the ring
    ///
    /// 释放环形缓冲区
    ///
    /// Taking `self` by value means no other thread can still be using it.
    /// Handles left in the ring are not touched; whatever they refer to stays
    /// owned by the caller.
    pub fn free(self) {
        drop(self);
    }

    /// Enqueue handles from `elems`, returning how many were taken
    ///
    /// 从 `elems` 入队句柄，返回实际入队的数量
    ///
    /// Takes the longest prefix of `elems` that fits; a full ring takes none.
    /// The whole run becomes visible to consumers at once when `tail` is
    /// published.
    ///
    /// Always returns `0` on a [`ProducerMode::Multi`] ring, where enqueue is
    /// not implemented.
    pub fn enqueue(&self, elems: &[T]) -> usize {
        if self.flags.producer() == ProducerMode::Multi {
            return 0;
        }

        let size = self.slots.size();
        // Only this producer writes tail
        let mut tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        let free = size.saturating_sub(seq::distance(head, tail)) as usize;
        let actual = elems.len().min(free);
        if actual == 0 {
            return 0;
        }

        for &elem in &elems[..actual] {
            let slot = self.slots.at(tail);
            slot.write(elem.into_bits());
            slot.release(tail);
            tail = tail.wrapping_add(1);
        }
        self.tail.store(tail, Ordering::Release);
        actual
    }

    /// Dequeue up to `out.len()` handles into `out`
    ///
    /// 向 `out` 出队最多 `out.len()` 个句柄
    ///
    /// Returns `None` if nothing was claimed. Otherwise the first `batch.len`
    /// entries of `out` hold the handles and `batch.start` is the sequence
    /// number of the first one.
    ///
    /// With [`ConsumerMode::Multi`] a consumer that loses the race for `head`
    /// retries from scratch and may come back with fewer handles or none.
    /// Retries are unbounded under continuous contention.
    pub fn dequeue(&self, out: &mut [T]) -> Option<Batch> {
        if out.is_empty() {
            return None;
        }
        let want = out.len();

        loop {
            let head = self.head.load(Ordering::Acquire);
            let mut tail = self.tail.load(Ordering::Acquire);

            if !seq::before(head, tail) {
                // Looks empty, look for published slots tail hasn't caught up with
                tail = self.find_tail(head, tail);
                if !seq::before(head, tail) {
                    return None;
                }
            }
            let avail = (seq::distance(head, tail) as usize).min(self.capacity());
            let actual = want.min(avail);

            for (i, dst) in out[..actual].iter_mut().enumerate() {
                let pos = head.wrapping_add(i as u32);
                *dst = T::from_bits(self.slots.at(pos).read());
            }
            let next = head.wrapping_add(actual as u32);

            match self.flags.consumer() {
                ConsumerMode::Single => {
                    self.head.store(next, Ordering::Release);
                }
                ConsumerMode::Multi => {
                    if self
                        .head
                        .compare_exchange(head, next, Ordering::AcqRel, Ordering::Relaxed)
                        .is_err()
                    {
                        continue;
                    }
                }
            }

            return Some(Batch {
                len: actual,
                start: head,
            });
        }
    }

    /// Discover slots published past a stale `tail`
    ///
    /// 发现在过期 `tail` 之后已发布的槽位
    ///
    /// Walks forward while the slot at `tail` carries release index `tail`,
    /// never past `head + capacity`, then pushes the shared tail forward
    /// without ever moving it back. A slot holding a release index from an
    /// earlier lap stops the walk.
    fn find_tail(&self, head: u32, mut tail: u32) -> u32 {
        if self.flags.producer() == ProducerMode::Single {
            // The producer's tail store already covers everything it released
            return self.tail.load(Ordering::Acquire);
        }

        let limit = head.wrapping_add(self.slots.size());
        while seq::before(tail, limit) && self.slots.at(tail).released_at() == tail {
            tail = tail.wrapping_add(1);
        }
        seq::cond_update(&self.tail, tail)
    }

    /// Publish handles into slots without advancing `tail`, the state a
    /// producer is in halfway through a batch.
    #[cfg(test)]
    pub(crate) fn publish_without_tail(&self, first: u32, elems: &[T]) {
        for (i, &elem) in elems.iter().enumerate() {
            let pos = first.wrapping_add(i as u32);
            let slot = self.slots.at(pos);
            slot.write(elem.into_bits());
            slot.release(pos);
        }
    }

    /// Move an empty ring's counters to `start`, re-seeding the sentinels so
    /// counter wraparound can be exercised without `2^32` operations.
    #[cfg(all(test, not(feature = "loom")))]
    pub(crate) fn rebase(&mut self, start: u32) {
        let size = self.slots.size();
        for pos in (0..size).map(|j| start.wrapping_add(j)) {
            self.slots.at(pos).release(pos.wrapping_sub(size));
        }
        self.head.store(start, Ordering::Relaxed);
        self.tail.store(start, Ordering::Relaxed);
    }

    /// Get the capacity of the ring (a power of two)
    ///
    /// 获取容量（2 的幂次）
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.size() as usize
    }

    /// Mask used to map sequence numbers to slots (`capacity - 1`)
    ///
    /// 将序号映射到槽位的掩码
    #[inline]
    pub fn mask(&self) -> u32 {
        self.slots.mask()
    }

    /// Flag word the ring was allocated with
    #[inline]
    pub fn flags(&self) -> RingFlags {
        self.flags
    }

    /// Producer cardinality
    #[inline]
    pub fn producer(&self) -> ProducerMode {
        self.flags.producer()
    }

    /// Consumer cardinality
    #[inline]
    pub fn consumer(&self) -> ConsumerMode {
        self.flags.consumer()
    }

    /// Snapshot of the head counter
    ///
    /// head 计数器的快照
    #[inline]
    pub fn head(&self) -> u32 {
        self.head.load(Ordering::Acquire)
    }

    /// Snapshot of the tail counter
    ///
    /// tail 计数器的快照
    #[inline]
    pub fn tail(&self) -> u32 {
        self.tail.load(Ordering::Acquire)
    }

    /// Number of handles in the ring
    ///
    /// 环形缓冲区中的句柄数量
    ///
    /// A snapshot; it may be stale by the time it is returned if other threads
    /// are active.
    ///
    /// 这是一个快照；若有其他线程活动，返回时可能已过期。
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if seq::before(head, tail) {
            (seq::distance(head, tail) as usize).min(self.capacity())
        } else {
            0
        }
    }

    /// Check if the ring is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the ring is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Number of free slots
    ///
    /// 空闲槽位数量
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }
}

impl<T: Handle> fmt::Debug for LfRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfRing")
            .field("capacity", &self.capacity())
            .field("producer", &self.producer())
            .field("consumer", &self.consumer())
            .field("head", &self.head())
            .field("tail", &self.tail())
            .finish()
    }
}

impl<T: Handle> Drop for LfRing<T> {
    fn drop(&mut self) {
        log::trace!(
            "freeing ring: capacity={} live={}",
            self.capacity(),
            self.len()
        );
    }
}

// SAFETY: all shared state is atomic; handles only ever cross threads as
// `usize` bits, and `T: Send` lets the decoded value live on the consumer.
unsafe impl<T: Handle> Send for LfRing<T> {}
unsafe impl<T: Handle> Sync for LfRing<T> {}
