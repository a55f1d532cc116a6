//! Boot sequencing
//!
//! Brings the logging facility online, emits the startup marker, and
//! hands off to a terminal state. Each step consumes the previous state,
//! so the order `facility -> backends -> marker -> idle` cannot be
//! rearranged, and nothing can be logged before the facility is up or
//! after the marker has been written.

/// The message emitted once the logging facility is ready
pub const STARTUP_MESSAGE: &str = "Hello world";

/// Severity of a log record
#[derive(Debug, Copy, Clone, PartialEq, Eq, defmt::Format)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// The logging facility could not be brought up
#[derive(Debug, Copy, Clone, PartialEq, Eq, defmt::Format)]
pub enum InitError {
    /// The facility was already claimed earlier in this boot
    AlreadyInitialized,

    /// Any other implementation-defined failure code
    Internal(u32),
}

impl InitError {
    /// Numeric code, matching the nRF5 SDK `ret_code_t` values where one exists
    pub fn code(&self) -> u32 {
        match self {
            InitError::AlreadyInitialized => 8,
            InitError::Internal(code) => *code,
        }
    }
}

/// Tag for each non-terminal state of the boot sequence
#[derive(Debug, Copy, Clone, PartialEq, Eq, defmt::Format)]
pub enum BootState {
    Start,
    LoggingInitialized,
    BackendsReady,
    MessageEmitted,
}

/// Accepts leveled log records from application code
pub trait LogFacility {
    /// Bring the facility up with its default configuration
    fn init(&mut self) -> Result<(), InitError>;

    fn log(&mut self, level: Level, message: &str);
}

/// The set of transports the environment preconfigures
pub trait BackendRegistry {
    fn init_default_backends(&mut self);
}

/// Where control goes once booting is over
///
/// On hardware both arms diverge and `Output` is uninhabited.
pub trait Terminal {
    type Output;

    fn idle(self) -> Self::Output;
    fn fatal(self, error: InitError) -> Self::Output;
}

impl<T: LogFacility + ?Sized> LogFacility for &mut T {
    fn init(&mut self) -> Result<(), InitError> {
        (**self).init()
    }

    fn log(&mut self, level: Level, message: &str) {
        (**self).log(level, message)
    }
}

impl<T: BackendRegistry + ?Sized> BackendRegistry for &mut T {
    fn init_default_backends(&mut self) {
        (**self).init_default_backends()
    }
}

pub struct Start<F, B> {
    facility: F,
    backends: B,
}

pub struct LoggingInitialized<F, B> {
    facility: F,
    backends: B,
}

pub struct BackendsReady<F> {
    facility: F,
}

/// The startup marker has been written. No facility handle survives
/// past this point.
pub struct MessageEmitted {
    _priv: (),
}

impl<F: LogFacility, B: BackendRegistry> Start<F, B> {
    pub fn new(facility: F, backends: B) -> Self {
        Self { facility, backends }
    }

    pub fn state(&self) -> BootState {
        BootState::Start
    }

    pub fn init_logging(mut self) -> Result<LoggingInitialized<F, B>, InitError> {
        self.facility.init()?;

        Ok(LoggingInitialized {
            facility: self.facility,
            backends: self.backends,
        })
    }
}

impl<F: LogFacility, B: BackendRegistry> LoggingInitialized<F, B> {
    pub fn state(&self) -> BootState {
        BootState::LoggingInitialized
    }

    pub fn init_backends(mut self) -> BackendsReady<F> {
        self.backends.init_default_backends();

        BackendsReady {
            facility: self.facility,
        }
    }
}

impl<F: LogFacility> BackendsReady<F> {
    pub fn state(&self) -> BootState {
        BootState::BackendsReady
    }

    pub fn emit_startup(mut self) -> MessageEmitted {
        self.facility.log(Level::Info, STARTUP_MESSAGE);

        MessageEmitted { _priv: () }
    }
}

impl MessageEmitted {
    pub fn state(&self) -> BootState {
        BootState::MessageEmitted
    }

    pub fn idle<T: Terminal>(self, terminal: T) -> T::Output {
        terminal.idle()
    }
}

/// Run every step up to and including the startup marker
pub fn sequence<F, B>(facility: F, backends: B) -> Result<MessageEmitted, InitError>
where
    F: LogFacility,
    B: BackendRegistry,
{
    let emitted = Start::new(facility, backends)
        .init_logging()?
        .init_backends()
        .emit_startup();

    Ok(emitted)
}

/// Boot, then hand control to `terminal` for good
pub fn run<F, B, T>(facility: F, backends: B, terminal: T) -> T::Output
where
    F: LogFacility,
    B: BackendRegistry,
    T: Terminal,
{
    match sequence(facility, backends) {
        Ok(emitted) => emitted.idle(terminal),
        Err(e) => terminal.fatal(e),
    }
}
