//! Smoke test - one segmented map with coverage verification
//!
//! Doubles every element of a shared block, one disjoint range per worker,
//! then checks every element was written exactly once.

use rangepool::{ExecutionContext, PoolConfig};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

fn main() {
    println!("=== rangepool smoke test ===\n");

    let iterations: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);

    let config = PoolConfig::from_env();
    println!(
        "Mapping over {} elements with {} workers...",
        iterations, config.num_workers
    );

    let ctx = match ExecutionContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("context setup failed: {}", e);
            std::process::exit(1);
        }
    };

    let out: Arc<Vec<AtomicI64>> = Arc::new((0..iterations).map(|_| AtomicI64::new(0)).collect());
    let out_ref = Arc::clone(&out);

    let result = ctx.schedule(
        move |start: i64, end: i64| -> i32 {
            for i in start..end {
                out_ref[i as usize].store(i * 2, Ordering::Relaxed);
            }
            0
        },
        iterations as i64,
    );

    if let Err(e) = result {
        eprintln!("dispatch failed: {}", e);
        std::process::exit(1);
    }

    // Verify coverage
    let mut bad = 0usize;
    for (i, v) in out.iter().enumerate() {
        if v.load(Ordering::Relaxed) != i as i64 * 2 {
            bad += 1;
        }
    }

    if bad == 0 {
        println!("OK: all {} elements mapped exactly once", iterations);
    } else {
        println!("FAILED: {} elements wrong", bad);
        std::process::exit(1);
    }
}
