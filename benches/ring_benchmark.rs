/// LfRing performance benchmark
///
/// 对比 LfRing 与 rtrb 的性能
///
/// 重点测试：
/// 1. 单线程批量入队/出队吞吐
/// 2. SPSC 跨线程吞吐
/// 3. SPMC 多消费者争用下的吞吐

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lfring::{LfRing, RingFlags};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SPSC: u32 = RingFlags::SP | RingFlags::SC;
const SPMC: u32 = RingFlags::SP | RingFlags::MC;

/// Benchmark: Single-threaded batch throughput
///
/// 单线程批量吞吐量测试
fn benchmark_single_thread_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfring_single_thread");
    let operations = 10_000usize;
    group.throughput(Throughput::Elements(operations as u64));

    for batch in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("lfring_spsc", batch), &batch, |b, &batch| {
            let ring = LfRing::<usize>::new(64, SPSC).unwrap();
            let data: Vec<usize> = (0..batch).collect();
            let mut out = vec![0usize; batch];
            b.iter(|| {
                for _ in 0..operations / batch {
                    ring.enqueue(black_box(&data));
                    black_box(ring.dequeue(&mut out));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("lfring_spmc", batch), &batch, |b, &batch| {
            let ring = LfRing::<usize>::new(64, SPMC).unwrap();
            let data: Vec<usize> = (0..batch).collect();
            let mut out = vec![0usize; batch];
            b.iter(|| {
                for _ in 0..operations / batch {
                    ring.enqueue(black_box(&data));
                    black_box(ring.dequeue(&mut out));
                }
            });
        });

        // rtrb chunks for comparison
        group.bench_with_input(BenchmarkId::new("rtrb", batch), &batch, |b, &batch| {
            let (mut producer, mut consumer) = rtrb::RingBuffer::<usize>::new(64);
            b.iter(|| {
                for _ in 0..operations / batch {
                    if let Ok(chunk) = producer.write_chunk_uninit(batch) {
                        chunk.fill_from_iter(0..batch);
                    }
                    if let Ok(chunk) = consumer.read_chunk(batch) {
                        black_box(chunk.into_iter().count());
                    }
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: One producer thread, one consumer thread
///
/// 单生产者线程、单消费者线程
fn benchmark_spsc_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfring_spsc_concurrent");
    group.measurement_time(Duration::from_secs(10));

    let messages = 100_000usize;
    group.throughput(Throughput::Elements(messages as u64));

    group.bench_function("lfring", |b| {
        b.iter(|| {
            let ring = Arc::new(LfRing::<usize>::new(128, SPSC).unwrap());

            let producer = {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    let data: Vec<usize> = (0..16).collect();
                    let mut sent = 0;
                    while sent < messages {
                        let want = (messages - sent).min(data.len());
                        let n = ring.enqueue(&data[..want]);
                        if n == 0 {
                            std::hint::spin_loop();
                        }
                        sent += n;
                    }
                })
            };

            let mut out = [0usize; 16];
            let mut received = 0;
            while received < messages {
                match ring.dequeue(&mut out) {
                    Some(batch) => received += batch.len,
                    None => std::hint::spin_loop(),
                }
            }
            producer.join().unwrap();
        });
    });

    group.bench_function("rtrb", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = rtrb::RingBuffer::<usize>::new(128);

            let producer_handle = thread::spawn(move || {
                for i in 0..messages {
                    while producer.push(black_box(i)).is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            let mut received = 0;
            while received < messages {
                if consumer.pop().is_ok() {
                    received += 1;
                } else {
                    std::hint::spin_loop();
                }
            }
            producer_handle.join().unwrap();
        });
    });

    group.finish();
}

/// Benchmark: One producer, several consumers racing on head
///
/// 单生产者、多个消费者争用 head
fn benchmark_spmc_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfring_spmc_contention");
    group.measurement_time(Duration::from_secs(10));

    let messages = 100_000usize;
    group.throughput(Throughput::Elements(messages as u64));

    for consumers in [2usize, 4] {
        group.bench_with_input(
            BenchmarkId::new("lfring", consumers),
            &consumers,
            |b, &consumers| {
                b.iter(|| {
                    let ring = Arc::new(LfRing::<usize>::new(256, SPMC).unwrap());

                    let handles: Vec<_> = (0..consumers)
                        .map(|_| {
                            let ring = Arc::clone(&ring);
                            thread::spawn(move || {
                                let mut out = [0usize; 8];
                                let mut count = 0usize;
                                loop {
                                    match ring.dequeue(&mut out) {
                                        Some(batch) => count += batch.len,
                                        None if ring.tail() as usize == messages
                                            && ring.is_empty() =>
                                        {
                                            break;
                                        }
                                        None => std::hint::spin_loop(),
                                    }
                                }
                                count
                            })
                        })
                        .collect();

                    let data: Vec<usize> = (0..32).collect();
                    let mut sent = 0;
                    while sent < messages {
                        let want = (messages - sent).min(data.len());
                        sent += ring.enqueue(&data[..want]);
                    }

                    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
                    assert_eq!(total, messages);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_thread_batches,
    benchmark_spsc_concurrent,
    benchmark_spmc_contention,
);

criterion_main!(benches);
