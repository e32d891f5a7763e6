pub const HOLD_TIME: u32 = 170; // Layer-tap from free to held (ms)

pub const BUFFER_LENGTH: usize = 50;
pub const BUFFER_CASE_LENGTH: usize = 12;

pub const TEMPO_UNICODE: u32 = 30;

// Milliseconds
pub const TIMER_SCAN_LOOP: u32 = 5;
pub const TIMER_USB_LOOP: u32 = 15;
pub const TIMER_POINTER_LOOP: u32 = 10;

pub const NB_LAYERS: usize = 4;

// OS switch feedback, counted in indicator refreshes
pub const NOTIFICATION_REFRESHES: u32 = 150;

// Pointer layer auto activation
pub const TRIGGER_THRESHOLD: i8 = 8;
pub const TRIGGER_TIMEOUT_MS: u32 = 1000;

// Trackball
pub const POINTER_DPI: [i16; 4] = [1, 2, 4, 8];
pub const POINTER_DPI_DEFAULT: usize = 1;
pub const SNIPING_DIVISORS: [i16; 3] = [2, 4, 8];
pub const SNIPING_DIVISOR_DEFAULT: usize = 1;
pub const DRAG_SCROLL_DIVISOR: i16 = 8;

pub const SERIAL_ON: bool = cfg!(feature = "serial");
