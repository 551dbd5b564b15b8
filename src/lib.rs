//! # Lock-Free Ring Buffer of Opaque Handles
//!
//! 不透明句柄的无锁环形缓冲区
//!
//! `lfring` is a fixed-capacity lock-free ring buffer for handing batches of
//! handles (integers or raw pointers) between threads. Producers publish a
//! batch with a single tail update, consumers claim batches by advancing a
//! shared head counter, and every dequeued batch carries the absolute sequence
//! number of its first element.
//!
//! `lfring` 是一个固定容量的无锁环形缓冲区，用于在线程之间批量传递句柄（整数或裸指针）。
//! 生产者通过一次 tail 更新发布一个批次，消费者通过推进共享 head 计数器认领批次，
//! 每个出队批次都带有其第一个元素的绝对序号。
//!
//! ## Features
//!
//! 特性
//!
//! - **Lock-Free** - Atomic loads, stores and compare-and-swap only; no call ever waits
//! - **Batching** - Enqueue and dequeue move whole slices
//! - **Sequence Numbers** - Dequeued batches report where they sit in the stream
//! - **Single or Multi Consumer** - Chosen at allocation, CAS only where needed
//! - **Pass-Through** - The ring never dereferences or frees what handles point to
//!
//! - **无锁** - 仅使用原子 load、store 和 CAS；任何调用都不会等待
//! - **批量** - 入队和出队都以切片为单位
//! - **序号** - 出队批次报告其在数据流中的位置
//! - **单/多消费者** - 分配时选择，仅在需要时使用 CAS
//! - **透传** - 从不解引用或释放句柄所指向的内容
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! use lfring::{LfRing, RingFlags};
//!
//! // Capacity 2 rounds to 2; single producer, multi consumer
//! // 容量 2；单生产者，多消费者
//! let ring = LfRing::<usize>::new(2, RingFlags::SP | RingFlags::MC).unwrap();
//! let mut out = [0usize; 4];
//!
//! assert!(ring.dequeue(&mut out).is_none());
//! assert_eq!(ring.enqueue(&[1]), 1);
//!
//! let batch = ring.dequeue(&mut out[..1]).unwrap();
//! assert_eq!((batch.len, batch.start, out[0]), (1, 0, 1));
//!
//! // Only two free slots
//! // 只有两个空闲槽位
//! assert_eq!(ring.enqueue(&[2, 3, 4]), 2);
//!
//! let batch = ring.dequeue(&mut out[..1]).unwrap();
//! assert_eq!((batch.start, out[0]), (1, 2));
//! let batch = ring.dequeue(&mut out).unwrap();
//! assert_eq!((batch.len, batch.start, out[0]), (1, 2, 3));
//! ```
//!
//! ## Multi-threaded Usage
//!
//! 多线程使用
//!
//! ```rust
//! use lfring::{LfRing, RingConfig};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let ring = Arc::new(LfRing::<usize>::with_config(RingConfig::new(64)).unwrap());
//!
//! let consumers: Vec<_> = (0..2)
//!     .map(|_| {
//!         let ring = Arc::clone(&ring);
//!         thread::spawn(move || {
//!             let mut got = Vec::new();
//!             let mut buf = [0usize; 8];
//!             loop {
//!                 match ring.dequeue(&mut buf) {
//!                     Some(batch) => got.extend(batch.indices()),
//!                     None if ring.tail() == 100 && ring.is_empty() => break,
//!                     None => thread::yield_now(),
//!                 }
//!             }
//!             got
//!         })
//!     })
//!     .collect();
//!
//! let data: Vec<usize> = (0..100).collect();
//! let mut sent = 0;
//! while sent < data.len() {
//!     sent += ring.enqueue(&data[sent..]);
//!     thread::yield_now();
//! }
//!
//! let mut seen: Vec<u32> = consumers
//!     .into_iter()
//!     .flat_map(|h| h.join().unwrap())
//!     .collect();
//! seen.sort_unstable();
//! assert_eq!(seen, (0..100).collect::<Vec<u32>>());
//! ```
//!
//! ## Notes
//!
//! 注意事项
//!
//! - Capacity is rounded up to a power of two and may not exceed `2^31`
//! - Enqueue is single-producer; a multi-producer ring accepts no handles
//! - Counters are `u32` and wrap; sequence numbers are meaningful modulo `2^32`
//! - Blocking, timeouts and retry limits are left to the caller
//!
//! - 容量向上取整到 2 的幂次，且不超过 `2^31`
//! - 入队仅支持单生产者；多生产者环形缓冲区不接受任何句柄
//! - 计数器为 `u32` 且会回绕；序号在模 `2^32` 意义下有效
//! - 阻塞、超时和重试上限由调用者负责

mod shim;

pub mod config;
pub mod error;
pub mod handle;
pub mod ring;
pub mod selftest;
pub mod seq;
mod slot;

#[cfg(test)]
mod tests;

pub use config::{ConsumerMode, ProducerMode, RingConfig, RingFlags};
pub use error::{AllocError, SelfTestError};
pub use handle::{Handle, RawHandle};
pub use ring::{Batch, LfRing};
pub use slot::{MAX_CAPACITY, round_to_power_of_two};
