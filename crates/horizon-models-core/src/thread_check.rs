//! Main-thread verification for model operations.
//!
//! Models and their adapters are single-owner objects: every read, every
//! mutation and every change notification happens on one logical owner thread
//! (the UI main thread). There is no locking because there is no concurrent
//! access. This module records which thread that is and provides assertions
//! that catch a model being driven from anywhere else.
//!
//! # Usage
//!
//! The embedding runtime calls [`set_main_thread`] once at startup. Model code
//! then guards its entry points:
//!
//! ```
//! use horizon_models_core::debug_assert_main_thread;
//!
//! fn notify_rows_added(index: usize, count: usize) {
//!     debug_assert_main_thread!();
//!     // ... deliver to peers ...
//! #   let _ = (index, count);
//! }
//! # notify_rows_added(0, 1);
//! ```
//!
//! Until [`set_main_thread`] has been called, every thread is accepted. This
//! keeps unit tests and early initialization working without setup.
//!
//! The checks can be switched off at runtime with
//! [`set_thread_checks_enabled`]. They are on by default in debug builds and
//! off in release builds.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Global storage for the main thread ID.
static MAIN_THREAD_ID: OnceLock<ThreadId> = OnceLock::new();

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Record the calling thread as the main thread.
///
/// Calling it again from the same thread is a no-op.
///
/// # Panics
///
/// Panics if a different thread was already recorded.
pub fn set_main_thread() {
    let current = std::thread::current().id();
    if MAIN_THREAD_ID.set(current).is_err() && MAIN_THREAD_ID.get() != Some(&current) {
        panic!(
            "set_main_thread() called from a different thread than the first call. \
             The model owner thread can only be set once."
        );
    }
}

/// Get the main thread ID if it has been set.
#[inline]
pub fn main_thread_id() -> Option<ThreadId> {
    MAIN_THREAD_ID.get().copied()
}

/// Check if the current thread may operate on models.
///
/// Returns `false` only if the main thread has been set, thread checks are
/// enabled, and the current thread is a different one.
#[inline]
pub fn is_main_thread() -> bool {
    if !are_thread_checks_enabled() {
        return true;
    }
    match MAIN_THREAD_ID.get() {
        Some(&main_id) => std::thread::current().id() == main_id,
        None => true,
    }
}

/// Enable or disable runtime thread checks.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check if runtime thread checks are currently enabled.
#[inline]
pub fn are_thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Panics if the current thread is not the model owner thread.
///
/// Active in both debug and release builds. Use
/// [`debug_assert_main_thread!`](crate::debug_assert_main_thread) for
/// checks that should compile away in release builds.
#[macro_export]
macro_rules! assert_main_thread {
    () => {
        $crate::assert_main_thread!("model notified off its owner thread")
    };
    ($msg:expr) => {
        if !$crate::thread_check::is_main_thread() {
            $crate::thread_check::panic_not_main_thread($msg, file!(), line!());
        }
    };
}

/// [`assert_main_thread!`](crate::assert_main_thread) in debug builds, nothing
/// in release builds.
#[macro_export]
macro_rules! debug_assert_main_thread {
    () => {
        #[cfg(debug_assertions)]
        $crate::assert_main_thread!()
    };
}

#[cold]
#[inline(never)]
#[doc(hidden)]
pub fn panic_not_main_thread(msg: &str, file: &str, line: u32) -> ! {
    let current = std::thread::current();
    let current_name = current.name().unwrap_or("<unnamed>");
    let current_id = current.id();

    let main_info = match main_thread_id() {
        Some(id) => format!("main thread ID: {id:?}"),
        None => "main thread not yet registered".to_string(),
    };

    panic!(
        "\n\
        THREAD SAFETY VIOLATION\n\
        \n\
        {msg}\n\
        \n\
        Location: {file}:{line}\n\
        Current thread: \"{current_name}\" (ID: {current_id:?})\n\
        {main_info}\n\
        \n\
        Models, their adapters and their change notifications are owned by\n\
        the main thread. Send the new data to the main thread and apply the\n\
        mutation there."
    )
}
