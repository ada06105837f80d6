//! Stress test - many dispatch calls against one pool
//!
//! Issues dispatch calls from several caller threads in a loop and reports
//! dispatch throughput. Exercises barrier isolation between calls: each
//! call's checksum must come out exact.

use rangepool::{ExecutionContext, Kernel, PoolConfig};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("=== rangepool stress test ===\n");

    let dispatches: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000);
    let callers: usize = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);
    let iterations: i64 = 10_000;

    let config = PoolConfig::from_env();
    println!(
        "{} dispatches of {} iterations from {} caller threads, {} workers",
        dispatches, iterations, callers, config.num_workers
    );

    let ctx = Arc::new(ExecutionContext::new(config).unwrap_or_else(|e| {
        eprintln!("context setup failed: {}", e);
        std::process::exit(1);
    }));

    let expected: i64 = iterations * (iterations - 1) / 2;
    let start = Instant::now();

    let mut handles = Vec::new();
    for caller_id in 0..callers {
        let ctx = Arc::clone(&ctx);
        handles.push(thread::spawn(move || {
            let per_caller = dispatches / callers;
            for call in 0..per_caller {
                let sum = Arc::new(AtomicI64::new(0));
                let s = Arc::clone(&sum);
                let kernel: Arc<dyn Kernel> = Arc::new(move |lo: i64, hi: i64| -> i32 {
                    let mut local = 0;
                    for i in lo..hi {
                        local += i;
                    }
                    s.fetch_add(local, Ordering::Relaxed);
                    0
                });
                if let Err(e) = ctx.schedule_arc(kernel, iterations) {
                    eprintln!("caller {} call {}: dispatch failed: {}", caller_id, call, e);
                    std::process::exit(1);
                }
                let got = sum.load(Ordering::Relaxed);
                if got != expected {
                    eprintln!(
                        "caller {} call {}: checksum {} != {} (cross-call interference?)",
                        caller_id, call, got, expected
                    );
                    std::process::exit(1);
                }
            }
        }));
    }

    for h in handles {
        h.join().expect("caller thread panicked");
    }

    let elapsed = start.elapsed();
    let total = (dispatches / callers) * callers;
    println!("\nCompleted {} dispatches in {:?}", total, elapsed);
    println!(
        "Dispatch rate: {:.0} calls/sec",
        total as f64 / elapsed.as_secs_f64()
    );
}
