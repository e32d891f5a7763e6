pub mod flash;
pub mod gpios;
pub mod led;
pub mod serial;
#[cfg(feature = "trackball")]
pub mod trackball;
