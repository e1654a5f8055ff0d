//! Exclusive section over the shared display and read buffer
//!
//! The storage watcher performs mount, open, read, close and a full
//! redraw as one unit. Those calls block inside an external storage
//! layer, so instead of a lock per resource the whole sequence runs in
//! one exclusive section:
//!
//! - The section body is a synchronous closure. On a cooperative
//!   executor no other task advances until it returns, which is the
//!   "suspend everything" guarantee the display task relies on.
//! - The resources live behind a blocking mutex, so on a preemptive
//!   host (tests) the same guarantee holds between threads.
//! - A single global token makes the section non-reentrant.
//!
//! Cost: the display loop is stalled for the whole body. Keep bodies
//! bounded; the firmware measures each one against a configured budget.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::buffer::ReadBuffer;

/// Errors from the exclusive section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SectionError {
    /// `enter` called while a section is already held
    Held,
    /// Resources are borrowed by an enclosing access on this context
    Busy,
}

/// Resources shared between the watcher and the display task
pub struct Shared<G, const N: usize> {
    /// Display surface
    pub gui: G,
    /// Most recently read file contents
    pub buffer: ReadBuffer<N>,
}

impl<G, const N: usize> Shared<G, N> {
    /// Wrap a display surface with an empty read buffer
    pub const fn new(gui: G) -> Self {
        Self {
            gui,
            buffer: ReadBuffer::new(),
        }
    }
}

/// Global exclusive section token plus the resources it guards
pub struct ExclusiveSection<M: RawMutex, T> {
    resources: Mutex<M, RefCell<T>>,
    held: AtomicBool,
    entries: AtomicU32,
}

/// Clears the held token when dropped, also on unwind
struct HeldToken<'a>(&'a AtomicBool);

impl Drop for HeldToken<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<M: RawMutex, T> ExclusiveSection<M, T> {
    /// Create a section around `resources`
    ///
    /// The raw mutex decides what "exclusive" means on the target:
    /// `ThreadModeRawMutex` on a single cooperative executor,
    /// `CriticalSectionRawMutex` where other threads must be shut out.
    pub const fn new(raw: M, resources: T) -> Self {
        Self {
            resources: Mutex::const_new(raw, RefCell::new(resources)),
            held: AtomicBool::new(false),
            entries: AtomicU32::new(0),
        }
    }

    /// Run `body` as the one exclusive section
    ///
    /// Fails without running `body` if a section is already held.
    pub fn enter<R>(&self, body: impl FnOnce(&mut T) -> R) -> Result<R, SectionError> {
        if self.held.swap(true, Ordering::AcqRel) {
            return Err(SectionError::Held);
        }
        let _token = HeldToken(&self.held);

        let result = self.with_resources(body);
        if result.is_ok() {
            self.entries.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Short access for the display task's per-frame work
    ///
    /// Never interleaves with an exclusive section: either waits for it
    /// (other thread) or reports [`SectionError::Busy`] (same context).
    pub fn access<R>(&self, body: impl FnOnce(&mut T) -> R) -> Result<R, SectionError> {
        self.with_resources(body)
    }

    /// Check if an exclusive section is in progress
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Number of completed exclusive sections
    pub fn entries(&self) -> u32 {
        self.entries.load(Ordering::Relaxed)
    }

    fn with_resources<R>(&self, body: impl FnOnce(&mut T) -> R) -> Result<R, SectionError> {
        self.resources.lock(|cell| {
            let mut resources = cell.try_borrow_mut().map_err(|_| SectionError::Busy)?;
            Ok(body(&mut resources))
        })
    }
}
