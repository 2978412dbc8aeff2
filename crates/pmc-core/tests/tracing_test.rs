//! Tests for the tracing setup.

use std::sync::Mutex;

use pmc_core::tracing::setup::init_tracing;

/// Serializes tests that manipulate `PMC_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_pmc_log_debug() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("PMC_LOG", "debug");
    init_tracing();
    std::env::remove_var("PMC_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_pmc_log_fallback() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("PMC_LOG", "this_is_garbage_not_a_valid_filter=");
    init_tracing();
    std::env::remove_var("PMC_LOG");
}
