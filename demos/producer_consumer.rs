//! Multi-producer multi-consumer example
//!
//! Demonstrates shared queue usage, bounded backpressure, graceful shutdown,
//! and per-consumer statistics.
//!
//! Run with: cargo run --example producer_consumer

use std::sync::Arc;
use std::thread;
use std::time::Instant;
use workqueue::prelude::*;

const PRODUCERS: usize = 3;
const CONSUMERS: usize = 2;
const ITEMS_PER_PRODUCER: usize = 5000;

fn main() {
    env_logger::init();

    println!("=== Work Queue - Producer/Consumer Example ===\n");

    let queue: Arc<BlockingQueue<u64>> = Arc::new(BlockingQueue::bounded(128));
    println!("1. Created queue: {}", queue.capabilities().describe());

    let start = Instant::now();

    println!(
        "\n2. Starting {} producers ({} items each) and {} consumers",
        PRODUCERS, ITEMS_PER_PRODUCER, CONSUMERS
    );

    let mut producers = Vec::new();
    for p in 0..PRODUCERS {
        let queue = Arc::clone(&queue);
        producers.push(thread::spawn(move || {
            for i in 0..ITEMS_PER_PRODUCER {
                let item = (p * ITEMS_PER_PRODUCER + i) as u64;
                if let Err(err) = queue.push(item) {
                    println!("  Producer {} stopping: {}", p, err);
                    return;
                }
            }
        }));
    }

    let mut consumers = Vec::new();
    for c in 0..CONSUMERS {
        let queue = Arc::clone(&queue);
        consumers.push(thread::spawn(move || {
            let mut processed = 0usize;
            let mut checksum = 0u64;
            while let Some(item) = queue.pop() {
                processed += 1;
                checksum = checksum.wrapping_add(item);
            }
            (c, processed, checksum)
        }));
    }

    for handle in producers {
        handle.join().expect("producer panicked");
    }
    println!("\n3. Producers finished, requesting shutdown");
    queue.shutdown();

    println!("\n4. Consumer statistics:");
    let mut total = 0usize;
    for handle in consumers {
        let (c, processed, checksum) = handle.join().expect("consumer panicked");
        println!(
            "   Consumer {}: {} items, checksum {:#x}",
            c, processed, checksum
        );
        total += processed;
    }

    println!("\n5. Results:");
    println!("   Total items delivered: {}", total);
    println!("   Expected: {}", PRODUCERS * ITEMS_PER_PRODUCER);
    println!("   Elapsed: {:?}", start.elapsed());

    assert_eq!(total, PRODUCERS * ITEMS_PER_PRODUCER);

    // Shutdown is permanent; further pushes hand the item back.
    match queue.push(0) {
        Err(QueueError::Closed(item)) => {
            println!("\n6. Push after shutdown rejected, item {} returned", item)
        }
        other => println!("\n6. Unexpected result: {:?}", other),
    }

    println!("\nDone. (Try RUST_LOG=debug to see shutdown logging.)");
}
