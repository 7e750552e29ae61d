//! Byte stream generation.
//!
//! [`StreamGenerator`] is an explicit generator object. For callers that
//! just want bytes, [`fill`] uses a lazily created generator per thread, so
//! each thread seeds its own state and no lock is ever taken.

mod stream;

pub use stream::{GeneratorStats, StreamGenerator, BLOCK_OUTPUT};

use std::cell::RefCell;

thread_local! {
    static THREAD_GENERATOR: RefCell<StreamGenerator> = RefCell::new(StreamGenerator::default());
}

/// Fills `buf` with bytes from the calling thread's generator.
///
/// Never fails. The first call on a thread seeds that thread's generator
/// from `/dev/urandom`, falling back to a weak seed if the device cannot be
/// read.
pub fn fill(buf: &mut [u8]) {
    THREAD_GENERATOR.with(|gen| gen.borrow_mut().fill(buf));
}

/// Runs `f` with the calling thread's generator.
///
/// # Panics
///
/// Panics if `f` calls [`fill`] or `with_generator` re-entrantly.
pub fn with_generator<R>(f: impl FnOnce(&mut StreamGenerator) -> R) -> R {
    THREAD_GENERATOR.with(|gen| f(&mut gen.borrow_mut()))
}
