//! Storage watcher
//!
//! One [`StorageWatcher::step`] is one iteration of the background task:
//!
//! 1. Pump the storage transport once and apply its notification.
//! 2. If the lifecycle is `Ready`, run the service sequence: mount, open,
//!    read, close and redraw inside the exclusive section, then unmount
//!    and return to `Idle`.
//!
//! The caller sleeps between steps. Nothing here blocks on time.

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use diskview_hal::{Filesystem, FsError, Indicator, OpenMode, StorageTransport, TransportEvent};

use crate::buffer::{Fill, ReadBuffer};
use crate::config::{FailurePolicy, StorageConfig};
use crate::exclusive::{ExclusiveSection, SectionError, Shared};
use crate::state::{AppState, Event, LifecycleCell};
use crate::traits::{Gui, GuiError};

/// Which step of the service sequence failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceError {
    Mount(FsError),
    Open(FsError),
    Read(FsError),
    Close(FsError),
    /// The exclusive section could not be entered
    Section(SectionError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Mount(e) => write!(f, "mount failed: {}", e.as_str()),
            ServiceError::Open(e) => write!(f, "open failed: {}", e.as_str()),
            ServiceError::Read(e) => write!(f, "read failed: {}", e.as_str()),
            ServiceError::Close(e) => write!(f, "close failed: {}", e.as_str()),
            ServiceError::Section(SectionError::Held) => f.write_str("section held"),
            ServiceError::Section(SectionError::Busy) => f.write_str("section busy"),
        }
    }
}

/// Outcome of one service sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceReport {
    /// Bytes read, or the step that failed
    pub outcome: Result<Fill, ServiceError>,
    /// Result of redrawing the display inside the section
    pub display: Result<(), GuiError>,
    /// Result of the unmount after the section
    pub unmount: Result<(), FsError>,
}

/// What happened during one watcher iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Notification produced by the transport pump, if any
    pub notification: Option<TransportEvent>,
    /// Lifecycle state at the end of the iteration
    pub state: AppState,
    /// Present when the service sequence ran
    pub service: Option<ServiceReport>,
}

/// Longest fault line shown on the display
const FAULT_LINE_LEN: usize = 48;

/// Background storage watcher
///
/// Owns the transport, the filesystem and both indicators. The lifecycle
/// cell is shared so other contexts can observe it.
pub struct StorageWatcher<'a, T, F, I> {
    transport: T,
    fs: F,
    serviced: I,
    fault: I,
    lifecycle: &'a LifecycleCell,
    config: StorageConfig,
}

impl<'a, T, F, I> StorageWatcher<'a, T, F, I>
where
    T: StorageTransport,
    F: Filesystem,
    I: Indicator,
{
    pub fn new(
        transport: T,
        fs: F,
        serviced: I,
        fault: I,
        lifecycle: &'a LifecycleCell,
        config: StorageConfig,
    ) -> Self {
        Self {
            transport,
            fs,
            serviced,
            fault,
            lifecycle,
            config,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AppState {
        self.lifecycle.load()
    }

    /// "Device serviced" indicator
    pub fn serviced(&self) -> &I {
        &self.serviced
    }

    /// "Fault" indicator
    pub fn fault(&self) -> &I {
        &self.fault
    }

    /// Active configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Run one watcher iteration
    pub fn step<M, G, const N: usize>(
        &mut self,
        section: &ExclusiveSection<M, Shared<G, N>>,
    ) -> StepReport
    where
        M: RawMutex,
        G: Gui,
    {
        let notification = self.transport.poll();
        if let Some(event) = notification {
            self.handle_notification(event);
        }

        let service = if self.lifecycle.load().needs_service() {
            Some(self.service(section))
        } else {
            None
        };

        StepReport {
            notification,
            state: self.lifecycle.load(),
            service,
        }
    }

    fn handle_notification(&mut self, event: TransportEvent) {
        self.lifecycle.notify(event.into());

        if event == TransportEvent::Disconnected {
            self.serviced.off();
            self.fault.off();
            // Idempotent; nothing to report if nothing was mounted
            let _ = self.fs.unmount(&self.config.volume);
        }
    }

    fn service<M, G, const N: usize>(
        &mut self,
        section: &ExclusiveSection<M, Shared<G, N>>,
    ) -> ServiceReport
    where
        M: RawMutex,
        G: Gui,
    {
        self.lifecycle.notify(Event::ServiceStarted);

        let Self {
            fs,
            serviced,
            fault,
            config,
            ..
        } = self;

        let (outcome, display) = match section.enter(|shared| {
            let outcome = read_file(fs, config, &mut shared.buffer);
            let display = present(config.policy, &outcome, shared, serviced, fault);
            (outcome, display)
        }) {
            Ok(result) => result,
            Err(e) => (Err(ServiceError::Section(e)), Ok(())),
        };

        let unmount = self.fs.unmount(&self.config.volume);
        self.lifecycle.notify(Event::ServiceFinished);

        ServiceReport {
            outcome,
            display,
            unmount,
        }
    }
}

/// Mount, open, read and close; the file is closed whenever it was opened
fn read_file<F: Filesystem, const N: usize>(
    fs: &mut F,
    config: &StorageConfig,
    buffer: &mut ReadBuffer<N>,
) -> Result<Fill, ServiceError> {
    fs.mount(&config.volume).map_err(ServiceError::Mount)?;
    let mut file = fs
        .open(&config.file, OpenMode::ReadOnly)
        .map_err(ServiceError::Open)?;

    let read = read_into(fs, &mut file, buffer);
    let closed = fs.close(file).map_err(ServiceError::Close);

    let fill = read?;
    closed?;
    Ok(fill)
}

/// Read until the buffer's limit or end of file
///
/// No single request is larger than the room left under the limit.
fn read_into<F: Filesystem, const N: usize>(
    fs: &mut F,
    file: &mut F::File,
    buffer: &mut ReadBuffer<N>,
) -> Result<Fill, ServiceError> {
    let fill = buffer
        .fill_with(|room| {
            let mut total = 0;
            while total < room.len() {
                let n = fs.read(file, &mut room[total..])?;
                if n == 0 {
                    break;
                }
                total += n.min(room.len() - total);
            }
            Ok(total)
        })
        .map_err(ServiceError::Read)?;

    if fill.written < buffer.read_limit() {
        return Ok(fill);
    }

    // Full buffer: one more byte tells whether the file was cut short
    let mut extra = [0u8; 1];
    let more = fs.read(file, &mut extra).map_err(ServiceError::Read)?;
    Ok(Fill {
        truncated: fill.truncated || more > 0,
        ..fill
    })
}

/// Apply the failure policy to the indicators and the display
fn present<G: Gui, I: Indicator, const N: usize>(
    policy: FailurePolicy,
    outcome: &Result<Fill, ServiceError>,
    shared: &mut Shared<G, N>,
    serviced: &mut I,
    fault: &mut I,
) -> Result<(), GuiError> {
    match (policy, outcome) {
        (FailurePolicy::Visible, Err(e)) => {
            serviced.off();
            fault.on();
            let mut line: String<FAULT_LINE_LEN> = String::new();
            // Overlong messages are cut at capacity
            let _ = write!(line, "{}", e);
            shared.gui.clear()?;
            shared.gui.print(&line)
        }
        _ => {
            fault.off();
            serviced.on();
            shared.gui.clear()?;
            shared.gui.print(shared.buffer.as_text())
        }
    }
}
