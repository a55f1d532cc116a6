//! On-target collaborators for the boot sequence: a `defmt` logging
//! facility, the RTT default backend, and the idle/fatal terminal.

use core::{
    convert::Infallible,
    sync::atomic::{AtomicBool, AtomicU32, Ordering},
};

use crate::boot::{BackendRegistry, InitError, Level, LogFacility, Terminal};

static FACILITY_CLAIMED: AtomicBool = AtomicBool::new(false);
static RTT_BACKEND_ENABLED: AtomicBool = AtomicBool::new(false);

static FATAL_RAISED: AtomicBool = AtomicBool::new(false);
static FATAL_CODE: AtomicU32 = AtomicU32::new(0);

/// Log facility that forwards records to `defmt`
///
/// Only one facility may be initialized per boot.
pub struct DefmtFacility {
    initialized: bool,
}

impl DefmtFacility {
    pub const fn new() -> Self {
        Self { initialized: false }
    }

    /// Records are forwarded only once this facility is initialized and
    /// a default backend is up; anything else is dropped
    pub fn accepts(&self) -> bool {
        self.initialized && RTT_BACKEND_ENABLED.load(Ordering::SeqCst)
    }
}

impl LogFacility for DefmtFacility {
    fn init(&mut self) -> Result<(), InitError> {
        FACILITY_CLAIMED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| InitError::AlreadyInitialized)?;

        self.initialized = true;
        Ok(())
    }

    fn log(&mut self, level: Level, message: &str) {
        if !self.accepts() {
            return;
        }

        match level {
            Level::Error => defmt::error!("{=str}", message),
            Level::Warn => defmt::warn!("{=str}", message),
            Level::Info => defmt::info!("{=str}", message),
            Level::Debug => defmt::debug!("{=str}", message),
            Level::Trace => defmt::trace!("{=str}", message),
        }
    }
}

/// The backends this board always has: the `defmt-rtt` up channel
pub struct RttBackends;

impl BackendRegistry for RttBackends {
    fn init_default_backends(&mut self) {
        RTT_BACKEND_ENABLED.store(true, Ordering::SeqCst);
    }
}

/// What the fatal path does after recording the error code
#[derive(Debug, Copy, Clone, PartialEq, Eq, defmt::Format)]
pub enum FatalAction {
    /// Hard fault, so `probe-run` prints a backtrace and exits non-zero
    Trap,

    /// Reset the core
    Reset,
}

/// Debug builds trap, release builds reset
pub fn fatal_action() -> FatalAction {
    if cfg!(debug_assertions) {
        FatalAction::Trap
    } else {
        FatalAction::Reset
    }
}

/// Terminal states on hardware. Neither arm returns.
pub struct Halt;

impl Terminal for Halt {
    type Output = Infallible;

    fn idle(self) -> Infallible {
        loop {
            cortex_m::asm::wfi();
        }
    }

    fn fatal(self, error: InitError) -> Infallible {
        FATAL_CODE.store(error.code(), Ordering::SeqCst);
        FATAL_RAISED.store(true, Ordering::SeqCst);

        // straight to the global logger, the facility never came up
        defmt::error!("logging init failed: {} (code {=u32})", error, error.code());

        match fatal_action() {
            // not `bkpt`: `probe-run` treats a breakpoint as a clean exit
            FatalAction::Trap => cortex_m::asm::udf(),
            FatalAction::Reset => cortex_m::peripheral::SCB::sys_reset(),
        }
    }
}

/// Error code of the fatal path, if it was taken during this boot
///
/// Not preserved across the reset performed by release builds.
pub fn last_fatal_code() -> Option<u32> {
    if FATAL_RAISED.load(Ordering::SeqCst) {
        Some(FATAL_CODE.load(Ordering::SeqCst))
    } else {
        None
    }
}

/// Whether the RTT backend has been brought up
pub fn rtt_backend_enabled() -> bool {
    RTT_BACKEND_ENABLED.load(Ordering::SeqCst)
}
