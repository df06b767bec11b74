//! Quill - TTL keyboard terminal firmware
//!
//! Main firmware binary for RP2040-based boards. A serial keyboard behind
//! a USB-to-TTL adapter drives a command menu and a line-based text editor
//! on an SPI TFT panel.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::Builder;
use profont::PROFONT_12_POINT;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use quill_core::traits::display::DisplaySurface;

mod board;
mod channels;
mod storage;
mod surface;
mod tasks;

use crate::storage::FlashStore;
use crate::surface::{BoardSurface, GfxSurface};

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Pixel staging buffer for the mipidsi SPI interface
static SPI_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Quill firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut led = Output::new(p.PIN_25, Level::High);
    info!("Status LED on GPIO{}", board::LED_GPIO);

    // Keyboard UART: 8-N-1, no flow control. The keyboard only sends, but
    // the buffered driver wants both halves.
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::KEYBOARD_BAUD;

    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!(
        "Keyboard UART initialized (GPIO{} TX, GPIO{} RX, {} baud)",
        board::KEYBOARD_TX_GPIO,
        board::KEYBOARD_RX_GPIO,
        board::KEYBOARD_BAUD
    );

    // Panel on SPI0, write-only
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = board::PANEL_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);

    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_20, Level::Low);
    let rst = Output::new(p.PIN_15, Level::High);
    let backlight = Output::new(p.PIN_10, Level::Low);

    info!(
        "Panel SPI initialized (SCK GPIO{}, MOSI GPIO{}, CS GPIO{}, DC GPIO{}, RST GPIO{}, BL GPIO{})",
        board::PANEL_SCK_GPIO,
        board::PANEL_MOSI_GPIO,
        board::PANEL_CS_GPIO,
        board::PANEL_DC_GPIO,
        board::PANEL_RST_GPIO,
        board::PANEL_BACKLIGHT_GPIO
    );

    let Ok(spi_device) = ExclusiveDevice::new(spi, cs, Delay) else {
        fail_blink(&mut led).await
    };

    let spi_buf = SPI_BUF.init([0u8; 512]);
    let di = SpiInterface::new(spi_device, dc, spi_buf);

    let display = match Builder::new(ST7789, di)
        .display_size(board::PANEL_WIDTH, board::PANEL_HEIGHT)
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut Delay)
    {
        Ok(display) => display,
        Err(_) => {
            error!("Panel initialization failed");
            fail_blink(&mut led).await
        }
    };

    let mut panel: BoardSurface = GfxSurface::new(display, backlight, &PROFONT_12_POINT);
    panel.set_backlight(1.0);
    info!("Display initialized");

    let store = FlashStore::new(p.FLASH);

    spawner.spawn(tasks::keyboard_task(rx)).unwrap();
    spawner.spawn(tasks::ui_task(panel, store)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Halt in a visible blink loop after a fatal startup error
///
/// A half-initialized terminal must not pretend to run; the LED pattern
/// tells the operator bring-up failed.
async fn fail_blink(led: &mut Output<'static>) -> ! {
    error!("Fatal startup error, halting");
    loop {
        led.set_high();
        Timer::after_millis(100).await;
        led.set_low();
        Timer::after_millis(100).await;
    }
}
