//! Board wiring and bus parameters
//!
//! Pin assignments for the reference board: Raspberry Pi Pico with the
//! keyboard's USB-to-TTL adapter on UART1 and an ST7789 TFT on SPI0.
//! Numbers here name GPIOs for documentation; peripheral construction in
//! `main` binds the matching `PIN_x` singletons.

/// Keyboard UART baud rate (8-N-1)
pub const KEYBOARD_BAUD: u32 = 115_200;

/// Keyboard UART pins: UART1 TX/RX
pub const KEYBOARD_TX_GPIO: u8 = 8;
pub const KEYBOARD_RX_GPIO: u8 = 9;

/// Panel SPI clock frequency
pub const PANEL_SPI_HZ: u32 = 40_000_000;

/// Panel pins on SPI0
pub const PANEL_SCK_GPIO: u8 = 18;
pub const PANEL_MOSI_GPIO: u8 = 19;
pub const PANEL_CS_GPIO: u8 = 17;
pub const PANEL_DC_GPIO: u8 = 20;
pub const PANEL_RST_GPIO: u8 = 15;
pub const PANEL_BACKLIGHT_GPIO: u8 = 10;

/// Panel resolution (portrait)
pub const PANEL_WIDTH: u16 = 240;
pub const PANEL_HEIGHT: u16 = 320;

/// Onboard status LED
pub const LED_GPIO: u8 = 25;
