//! Loom models of tail recovery and the monotonic tail update
//!
//! tail 恢复与单调 tail 更新的 loom 模型

use crate::config::RingFlags;
use crate::ring::LfRing;
use crate::seq::cond_update;
use crate::shim::atomic::{AtomicU32, Ordering};
use crate::shim::sync::Arc;
use loom::thread;

const MPMC: u32 = RingFlags::MP | RingFlags::MC;

#[test]
fn test_cond_update_racing_writers_loom() {
    loom::model(|| {
        let loc = Arc::new(AtomicU32::new(0));
        let a = {
            let loc = Arc::clone(&loc);
            thread::spawn(move || cond_update(&loc, 3))
        };
        let b = {
            let loc = Arc::clone(&loc);
            thread::spawn(move || cond_update(&loc, 5))
        };

        let ra = a.join().unwrap();
        let rb = b.join().unwrap();
        assert!(ra == 3 || ra == 5);
        assert_eq!(rb, 5);
        assert_eq!(loc.load(Ordering::Relaxed), 5);
    });
}

#[test]
fn test_find_tail_two_consumers_loom() {
    loom::model(|| {
        let ring = Arc::new(LfRing::<usize>::new(2, MPMC).unwrap());
        ring.publish_without_tail(0, &[10, 11]);

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    let mut out = [0usize; 1];
                    ring.dequeue(&mut out).map(|b| (b.start, out[0]))
                })
            })
            .collect();

        let mut got: Vec<(u32, usize)> = consumers
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        got.sort_unstable();

        // Each consumer claims one of the two published slots
        assert_eq!(got, vec![(0, 10), (1, 11)]);
        assert_eq!(ring.tail(), 2);
        assert_eq!(ring.head(), 2);
    });
}

#[test]
fn test_find_tail_sees_release_before_tail_loom() {
    loom::model(|| {
        let ring = Arc::new(LfRing::<usize>::new(2, MPMC).unwrap());

        let publisher = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.publish_without_tail(0, &[42]))
        };

        let consumer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let mut out = [0usize; 2];
                loop {
                    if let Some(batch) = ring.dequeue(&mut out) {
                        return (batch, out[0]);
                    }
                    thread::yield_now();
                }
            })
        };

        publisher.join().unwrap();
        let (batch, value) = consumer.join().unwrap();
        assert_eq!((batch.len, batch.start), (1, 0));
        // The release-index acquire makes the payload visible
        assert_eq!(value, 42);
    });
}
