//! Shared fixtures for runtime tests.

use std::sync::Arc;

use fori_dtype::DType;
use fori_ir::{Builder, Computation, Shape};

// Serializes tests that observe the global executable cache.
// parking_lot::Mutex does not poison when a test panics.
pub static CACHE_TEST_MUTEX: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

/// Acquire the cache mutex and start from an empty executable cache.
pub fn test_setup() -> parking_lot::MutexGuard<'static, ()> {
    let guard = CACHE_TEST_MUTEX.lock();
    crate::executable_cache::clear_all();
    guard
}

pub fn s32_1() -> Shape {
    Shape::array(DType::Int32, [1])
}

/// `(i, n) -> i < n` as `pred[]`.
pub fn less_than(name: &str) -> Computation {
    let b = Builder::new(name);
    let i = b.parameter(0, s32_1(), "i").unwrap();
    let n = b.parameter(1, s32_1(), "n").unwrap();
    b.build(&i.lt(&n).unwrap().index(0).unwrap()).unwrap()
}

/// `(i, n) -> (i + 1, n)`.
pub fn increment(name: &str) -> Computation {
    let b = Builder::new(name);
    let i = b.parameter(0, s32_1(), "i").unwrap();
    let n = b.parameter(1, s32_1(), "n").unwrap();
    let one = b.constant_r1(&[1i32]).unwrap();
    b.build_tuple(&[i.add(&one).unwrap(), n.copy().unwrap()]).unwrap()
}

/// Top-level `while i < n { i += 1 }` over two `s32[1]` parameters.
pub fn counting_loop(name: &str) -> Computation {
    loop_over(name, less_than("cond"), increment("body"))
}

pub fn loop_over(name: &str, condition: Computation, body: Computation) -> Computation {
    let b = Builder::new(name);
    let p0 = b.parameter(0, s32_1(), "p0").unwrap();
    let p1 = b.parameter(1, s32_1(), "p1").unwrap();
    let init = b.tuple(&[p0, p1]).unwrap();
    let w = b.while_loop(Arc::new(condition), Arc::new(body), &init).unwrap();
    b.build(&w).unwrap()
}
