//! Object pool and lease behaviour

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tinypool_mem::{Error, ObjectPool};

fn addr<T>(value: &Box<T>) -> *const T {
    &**value as *const T
}

#[test]
fn test_new_pool_is_empty() {
    let pool = ObjectPool::new(|| Box::new(0u64));
    assert_eq!(pool.stored_count(), 0);

    let bounded = ObjectPool::bounded(|| Box::new(0u64), 3).expect("bounded pool");
    assert_eq!(bounded.stored_count(), 0);
    assert_eq!(bounded.capacity(), Some(3));
}

#[test]
fn test_zero_capacity_rejected() {
    let result = ObjectPool::bounded(|| Box::new(0u64), 0);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_empty_pool_builds_from_factory() {
    let pool = ObjectPool::new(|| Box::new(99u64));
    let lease = pool.get_object();

    assert_eq!(**lease.value().expect("live lease"), 99);
    assert_eq!(pool.stats().created, 1);
}

#[test]
fn test_released_object_is_reused_by_identity() {
    let pool = ObjectPool::new(|| Box::new(0u64));

    let lease = pool.get_object();
    let first = addr(lease.value().expect("live lease"));
    drop(lease);
    assert_eq!(pool.stored_count(), 1);

    let lease = pool.get_object();
    assert_eq!(addr(lease.value().expect("live lease")), first);
    assert_eq!(pool.stored_count(), 0);

    let stats = pool.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.reused, 1);
}

#[test]
fn test_capacity_caps_stored_count() {
    let capacity = 2;
    let pool = ObjectPool::bounded(|| Box::new(0u64), capacity).expect("bounded pool");

    let leases: Vec<_> = (0..5).map(|_| pool.get_object()).collect();
    drop(leases);

    assert_eq!(pool.stored_count(), capacity);
    assert_eq!(pool.stats().discarded, 3);
    assert_eq!(pool.stats().peak_stored, capacity);
}

#[test]
fn test_overflow_keeps_existing_idle_objects() {
    let pool = ObjectPool::bounded(|| Box::new(0u64), 1).expect("bounded pool");

    let mut kept = pool.get_object();
    let extra = pool.get_object();
    let kept_addr = addr(kept.value().expect("live lease"));

    kept.release();
    drop(extra);

    let lease = pool.get_object();
    assert_eq!(addr(lease.value().expect("live lease")), kept_addr);
}

#[test]
fn test_value_after_release_fails() {
    let pool = ObjectPool::new(|| Box::new(0u64));
    let mut lease = pool.get_object();
    lease.release();

    assert!(matches!(lease.value(), Err(Error::InvalidState(_))));
    assert!(matches!(
        lease.with(|v| **v += 1),
        Err(Error::InvalidState(_))
    ));
}

#[test]
fn test_double_release_is_noop() {
    let pool = ObjectPool::new(|| Box::new(0u64));
    let mut lease = pool.get_object();

    lease.release();
    lease.release();
    assert_eq!(pool.stored_count(), 1);

    // Drop after explicit release must not return it again either.
    drop(lease);
    assert_eq!(pool.stored_count(), 1);
    assert_eq!(pool.stats().returned, 1);
}

#[test]
fn test_scope_exit_releases() {
    let pool = ObjectPool::new(String::new);
    {
        let mut lease = pool.get_object();
        lease.with(|s| s.push_str("hello")).expect("live lease");
        assert_eq!(pool.stored_count(), 0);
    }
    assert_eq!(pool.stored_count(), 1);
    assert_eq!(pool.get_object().value().expect("live lease"), "hello");
}

#[test]
fn test_factory_never_called_for_reuse() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pool = ObjectPool::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::new(0u64)
    });

    for _ in 0..10 {
        drop(pool.get_object());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_panic_leaves_pool_usable() {
    let fail = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&fail);
    let pool = ObjectPool::new(move || {
        if flag.swap(false, Ordering::SeqCst) {
            panic!("factory failure");
        }
        Box::new(1u64)
    });

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let _lease = pool.get_object();
    }));
    assert!(result.is_err());

    let lease = pool.get_object();
    assert_eq!(**lease.value().expect("live lease"), 1);
}
