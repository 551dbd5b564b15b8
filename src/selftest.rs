//! Built-in self-test sequence
//!
//! 内置自检序列
//!
//! Hosts that own a ring (a device shim, a service bootstrap) run this once at
//! startup to check the ring behaves on the current target before handing it to
//! producers and consumers.
//!
//! 持有环形缓冲区的宿主在启动时运行一次，以在交给生产者和消费者之前检查其在当前目标上的行为。

use crate::config::RingFlags;
use crate::error::SelfTestError;
use crate::ring::{Batch, LfRing};

macro_rules! expect {
    ($flags:expr, $cond:expr, $step:literal) => {
        if !$cond {
            return Err(SelfTestError {
                flags: $flags,
                step: $step,
            });
        }
    };
}

/// Run the capacity-2 enqueue/dequeue scenario against a fresh ring
///
/// 在新分配的环形缓冲区上运行容量为 2 的入队/出队场景
///
/// Only single-producer flag words are meaningful; a multi-producer ring fails
/// at the first enqueue.
///
/// # Errors
/// The first check that did not hold.
pub fn run(flags: u32) -> Result<(), SelfTestError> {
    let ring = LfRing::<usize>::new(2, flags).map_err(|_| SelfTestError {
        flags,
        step: "allocate",
    })?;
    let mut vec = [0usize; 4];

    expect!(flags, ring.dequeue(&mut vec[..1]).is_none(), "dequeue fresh ring");
    expect!(flags, ring.enqueue(&[1]) == 1, "enqueue one");

    let got = ring.dequeue(&mut vec[..1]);
    expect!(flags, got == Some(Batch { len: 1, start: 0 }), "dequeue one");
    expect!(flags, vec[0] == 1, "dequeued value");

    expect!(flags, ring.dequeue(&mut vec[..1]).is_none(), "dequeue drained ring");
    expect!(flags, ring.enqueue(&[2, 3, 4]) == 2, "enqueue into partial space");

    let got = ring.dequeue(&mut vec[..1]);
    expect!(flags, got == Some(Batch { len: 1, start: 1 }), "dequeue first of two");
    expect!(flags, vec[0] == 2, "first of two value");

    let got = ring.dequeue(&mut vec);
    expect!(flags, got == Some(Batch { len: 1, start: 2 }), "dequeue remainder");
    expect!(flags, vec[0] == 3, "remainder value");

    ring.free();
    Ok(())
}

/// Run the sequence for every supported configuration
///
/// 对每种受支持的配置运行自检序列
///
/// # Errors
/// The first failing configuration.
pub fn run_all() -> Result<(), SelfTestError> {
    let configs = [
        ("SPMC", RingFlags::SP | RingFlags::MC),
        ("SPSC", RingFlags::SP | RingFlags::SC),
    ];

    for (name, flags) in configs {
        log::info!("testing {name} lock-free ring");
        run(flags).inspect_err(|err| {
            log::error!("failed to pass the {name} ring test: {err}");
        })?;
    }

    log::info!("ring self-test passed");
    Ok(())
}
