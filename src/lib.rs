#![no_std]

use core::sync::atomic::{AtomicUsize, Ordering};

use defmt_rtt as _; // global logger
use nrf52840_hal as _; // memory layout

use panic_probe as _;

pub mod boot;
pub mod rtt;

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

static COUNT: AtomicUsize = AtomicUsize::new(0);
defmt::timestamp!("{=usize}", COUNT.fetch_add(1, Ordering::Relaxed));

/// Boot the board: bring up logging, say hello, then idle forever.
/// A logging init failure takes the fatal path instead.
pub fn run() -> ! {
    let outcome = boot::run(
        rtt::DefmtFacility::new(),
        rtt::RttBackends,
        rtt::Halt,
    );

    match outcome {}
}
