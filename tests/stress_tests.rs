//! Stress tests for concurrent logging and live reconfiguration
//!
//! These tests verify:
//! - Every line reaches the sink intact under concurrent writers
//! - Per-thread ordering is preserved within one appender
//! - Swapping configurations while logging never mixes layouts and sinks
//! - Concurrent logger acquisition yields one registry entry per name

use log_bridge::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const EVENTS_PER_THREAD: usize = 500;

fn file_properties(path: &Path, pattern: &str) -> Properties {
    Properties::new()
        .with("appender.file.type", "File")
        .with("appender.file.fileName", path.display().to_string())
        .with("appender.file.layout.pattern", pattern)
        .with("rootLogger", "info, file")
        .with("status", "off")
}

/// Every event written by concurrent threads arrives exactly once and intact
#[test]
fn test_concurrent_writers_lose_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let context = Arc::new(
        LoggerContext::from_properties(&file_properties(&log_file, "%c|%m%n"))
            .expect("valid configuration"),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                let logger = context.get_logger(&format!("worker.{}", t));
                for i in 0..EVENTS_PER_THREAD {
                    logger.info("event {} of {}", &[i.into(), EVENTS_PER_THREAD.into()]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * EVENTS_PER_THREAD);
    assert_eq!(
        context.metrics().total_logged(),
        (THREADS * EVENTS_PER_THREAD) as u64
    );

    // Lines of one thread appear in call order
    let mut next: HashMap<&str, usize> = HashMap::new();
    for line in lines {
        let (category, message) = line.split_once('|').expect("intact line");
        let expected = next.entry(category).or_insert(0);
        assert_eq!(
            message,
            format!("event {} of {}", expected, EVENTS_PER_THREAD),
            "out of order or torn line for {}",
            category
        );
        *expected += 1;
    }
    assert_eq!(next.len(), THREADS);
}

/// A line formatted with one snapshot's layout only ever lands in that
/// snapshot's sink, however often the configuration is swapped.
#[test]
fn test_swap_never_mixes_layout_and_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let left = temp_dir.path().join("left.log");
    let right = temp_dir.path().join("right.log");
    let left_props = file_properties(&left, "LEFT|%m%n");
    let right_props = file_properties(&right, "RIGHT|%m%n");

    let context = Arc::new(
        LoggerContext::from_properties(&left_props).expect("valid configuration"),
    );
    let running = Arc::new(AtomicBool::new(true));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let context = Arc::clone(&context);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let logger = context.get_logger("swap.test");
                let mut written = 0u64;
                while running.load(Ordering::Relaxed) {
                    logger.info("writer {} event {}", &[t.into(), written.into()]);
                    written += 1;
                }
                written
            })
        })
        .collect();

    for round in 0..40 {
        let props = if round % 2 == 0 { &right_props } else { &left_props };
        context.apply(props).expect("valid configuration");
        thread::yield_now();
    }
    running.store(false, Ordering::Relaxed);

    let written: u64 = writers
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .sum();
    context.shutdown();

    let left_content = fs::read_to_string(&left).expect("Failed to read left log");
    let right_content = fs::read_to_string(&right).expect("Failed to read right log");

    assert!(left_content.lines().all(|l| l.starts_with("LEFT|writer ")));
    assert!(right_content.lines().all(|l| l.starts_with("RIGHT|writer ")));

    let total = (left_content.lines().count() + right_content.lines().count()) as u64;
    assert_eq!(total + context.metrics().dropped_count(), written);
    assert_eq!(context.generation(), 42);
}

/// Level changes published concurrently are observed as whole snapshots
#[test]
fn test_levels_switch_atomically() {
    let context = Arc::new(LoggerContext::new());
    let quiet = Properties::new()
        .with("rootLogger.level", "off")
        .with("status", "off");
    let verbose = Properties::new()
        .with("rootLogger.level", "trace")
        .with("logger.x.name", "mixed")
        .with("logger.x.level", "off")
        .with("status", "off");
    context.apply(&quiet).expect("valid configuration");

    let running = Arc::new(AtomicBool::new(true));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let context = Arc::clone(&context);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mixed = context.get_logger("mixed");
                while running.load(Ordering::Relaxed) {
                    // "mixed" is off in both snapshots
                    assert!(!mixed.is_fatal_enabled());
                }
            })
        })
        .collect();

    for round in 0..100 {
        let props = if round % 2 == 0 { &verbose } else { &quiet };
        context.apply(props).expect("valid configuration");
    }
    running.store(false, Ordering::Relaxed);

    for reader in readers {
        reader.join().expect("Reader observed a partial snapshot");
    }
}

/// Concurrent acquisition of the same names yields shared entries
#[test]
fn test_concurrent_get_logger() {
    let context = Arc::new(LoggerContext::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                (0..50)
                    .map(|i| context.get_logger(&format!("pool.{}", i % 10)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let loggers: Vec<Logger> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("Thread panicked"))
        .collect();

    assert_eq!(context.logger_count(), 10);
    for logger in &loggers {
        let reference = context.get_logger(logger.name());
        assert!(logger.same_entry(&reference));
    }
}
