#![no_main]
#![no_std]

use nrf_hello as _; // global logger + panicking-behavior + memory layout

#[cortex_m_rt::entry]
fn main() -> ! {
    nrf_hello::run()
}
