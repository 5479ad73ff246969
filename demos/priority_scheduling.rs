//! Priority scheduling example
//!
//! Demonstrates priority-ordered delivery with FIFO ordering among items of
//! the same priority, and the factory's capability-based selection.
//!
//! Run with: cargo run --example priority_scheduling

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use workqueue::prelude::*;

fn main() {
    env_logger::init();

    println!("=== Work Queue - Priority Scheduling Example ===\n");

    let queue: Arc<PriorityQueue<Prioritized<&'static str>>> = Arc::new(PriorityQueue::new());
    println!("1. Created queue: {}", queue.capabilities().describe());

    println!("\n2. Submitting mixed-priority work:");
    let work = [
        (Priority::Low, "compact logs"),
        (Priority::Normal, "send newsletter"),
        (Priority::Normal, "rebuild index"),
        (Priority::Critical, "page on-call"),
        (Priority::Low, "prune cache"),
        (Priority::High, "retry payment"),
        (Priority::Normal, "sync mirrors"),
    ];
    for (priority, task) in work {
        println!("   queued [{:?}] {}", priority, task);
        queue.push(Prioritized::new(priority, task)).unwrap();
    }

    println!("\n3. Processing in priority order:");
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            while let Some(item) = queue.pop() {
                println!("   processing [{:?}] {}", item.priority, item.value);
                thread::sleep(Duration::from_millis(10));
            }
            println!("   consumer: queue drained, exiting");
        })
    };

    thread::sleep(Duration::from_millis(150));
    queue.shutdown();
    consumer.join().expect("consumer panicked");

    println!("\n4. Factory selection:");
    let requirements = QueueRequirements::new().with_priority();
    println!("   {:?} -> {}", requirements, QueueFactory::describe(&requirements));
    let factory_queue = QueueFactory::create_priority::<u32>(requirements).unwrap();
    assert!(factory_queue.supports(CapabilityFlags::PRIORITY));
    println!("   created queue supports PRIORITY");

    println!("\nDone.");
}
