//! Producer/consumer cardinality and ring configuration
//!
//! 生产者/消费者基数与环形缓冲区配置
//!
//! Cardinality is chosen once, at allocation, and cannot change afterwards. The
//! raw [`RingFlags`] word keeps the bit encoding hosts pass across FFI-style
//! boundaries; [`RingConfig`] is the typed way to build a ring from Rust.
//!
//! 基数在分配时一次性确定，之后不可更改。

use crate::error::AllocError;
use crate::slot::round_to_power_of_two;

/// How many threads may enqueue concurrently
///
/// 允许并发入队的线程数量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProducerMode {
    /// Exactly one producer thread
    ///
    /// 仅一个生产者线程
    #[default]
    Single,

    /// Several producer threads.
    ///
    /// Accepted at allocation but enqueue is not implemented for it: every
    /// enqueue on such a ring returns `0`.
    ///
    /// 多个生产者线程。分配时接受，但未实现入队：此类环形缓冲区上的每次入队都返回 `0`。
    Multi,
}

/// How many threads may dequeue concurrently
///
/// 允许并发出队的线程数量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsumerMode {
    /// Exactly one consumer thread; head advances with a plain store
    ///
    /// 仅一个消费者线程；head 通过普通存储推进
    Single,

    /// Any number of consumer threads; head advances by compare-and-swap
    ///
    /// 任意数量的消费者线程；head 通过 CAS 推进
    #[default]
    Multi,
}

/// Raw flag word selecting producer and consumer cardinality
///
/// 选择生产者和消费者基数的原始标志字
///
/// The multi variants are encoded as the absence of the single bit, so `0`
/// means multi-producer/multi-consumer.
///
/// 多生产者/多消费者编码为对应单一位的缺失，因此 `0` 表示多生产者/多消费者。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RingFlags(u32);

impl RingFlags {
    /// Multiple producers
    pub const MP: u32 = 0x0000;
    /// Single producer
    pub const SP: u32 = 0x0001;
    /// Multiple consumers
    pub const MC: u32 = 0x0000;
    /// Single consumer
    pub const SC: u32 = 0x0002;

    const SUPPORTED: u32 = Self::SP | Self::MP | Self::SC | Self::MC;

    /// Validate a raw flag word
    ///
    /// 校验原始标志字
    ///
    /// # Errors
    /// [`AllocError::UnsupportedFlags`] if any bit outside `SP | SC` is set.
    pub fn from_bits(bits: u32) -> Result<Self, AllocError> {
        if bits & !Self::SUPPORTED != 0 {
            return Err(AllocError::UnsupportedFlags { bits });
        }
        Ok(Self(bits))
    }

    /// Build the flag word for a pair of modes
    ///
    /// 由一对模式构造标志字
    pub fn new(producer: ProducerMode, consumer: ConsumerMode) -> Self {
        let mut bits = 0;
        if producer == ProducerMode::Single {
            bits |= Self::SP;
        }
        if consumer == ConsumerMode::Single {
            bits |= Self::SC;
        }
        Self(bits)
    }

    /// The raw bits
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Producer cardinality encoded in the flags
    #[inline]
    pub fn producer(self) -> ProducerMode {
        if self.0 & Self::SP != 0 {
            ProducerMode::Single
        } else {
            ProducerMode::Multi
        }
    }

    /// Consumer cardinality encoded in the flags
    #[inline]
    pub fn consumer(self) -> ConsumerMode {
        if self.0 & Self::SC != 0 {
            ConsumerMode::Single
        } else {
            ConsumerMode::Multi
        }
    }
}

impl From<(ProducerMode, ConsumerMode)> for RingFlags {
    fn from((producer, consumer): (ProducerMode, ConsumerMode)) -> Self {
        Self::new(producer, consumer)
    }
}

/// Typed description of a ring to allocate
///
/// 待分配环形缓冲区的类型化描述
///
/// # Examples
///
/// ```rust
/// use lfring::{ConsumerMode, LfRing, RingConfig};
///
/// let config = RingConfig::new(100).consumer(ConsumerMode::Single);
/// let ring = LfRing::<usize>::with_config(config).unwrap();
/// assert_eq!(ring.capacity(), 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingConfig {
    /// Requested element count, rounded up to a power of two on allocation
    ///
    /// 请求的元素数量，分配时向上取整到 2 的幂次
    pub capacity: u32,

    /// Producer cardinality
    pub producer: ProducerMode,

    /// Consumer cardinality
    pub consumer: ConsumerMode,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            producer: ProducerMode::Single,
            consumer: ConsumerMode::Multi,
        }
    }
}

impl RingConfig {
    /// Default modes with the given capacity
    ///
    /// 使用给定容量和默认模式
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Build a config from a raw flag word
    ///
    /// 由原始标志字构造配置
    pub fn from_flags(capacity: u32, flags: u32) -> Result<Self, AllocError> {
        let flags = RingFlags::from_bits(flags)?;
        Ok(Self {
            capacity,
            producer: flags.producer(),
            consumer: flags.consumer(),
        })
    }

    /// Set the requested capacity
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the producer cardinality
    pub fn producer(mut self, producer: ProducerMode) -> Self {
        self.producer = producer;
        self
    }

    /// Set the consumer cardinality
    pub fn consumer(mut self, consumer: ConsumerMode) -> Self {
        self.consumer = consumer;
        self
    }

    /// Flag word equivalent of the configured modes
    pub fn flags(&self) -> RingFlags {
        RingFlags::new(self.producer, self.consumer)
    }

    /// Check the requested capacity and return the rounded one
    ///
    /// 检查请求的容量并返回取整后的容量
    ///
    /// # Errors
    /// - [`AllocError::ZeroCapacity`] if `capacity == 0`
    /// - [`AllocError::CapacityTooLarge`] if it rounds up past `2^31`
    pub fn validate(&self) -> Result<u32, AllocError> {
        if self.capacity == 0 {
            return Err(AllocError::ZeroCapacity);
        }
        round_to_power_of_two(self.capacity).ok_or(AllocError::CapacityTooLarge {
            requested: self.capacity,
        })
    }
}
