use core::iter::repeat;
use smart_leds::{brightness, SmartLedsWrite};
use waveshare_rp2040_zero::hal::{
    gpio::{bank0::Gpio16, FunctionPio0, Pin, PullDown},
    pac::PIO0,
    pio::SM0,
    timer::CountDown,
};
use ws2812_pio::Ws2812;

use rusty_orbit::software::indicator::LedColor;

type Neopixel<'a> = Ws2812<PIO0, SM0, CountDown<'a>, Pin<Gpio16, FunctionPio0, PullDown>>;

/// Paints the whole chain with the indicator color.
/// The first pixel is the RP2040-Zero onboard one (GRB), the per-key strip is
/// daisy-chained behind it.
pub struct Led<'a> {
    neopixel: &'a mut Neopixel<'a>,
    nb_leds: usize,
    last: Option<LedColor>,
}

impl Led<'_> {
    pub fn new<'a>(neopixel: &'a mut Neopixel<'a>, nb_leds: usize) -> Led<'a> {
        Led {
            neopixel,
            nb_leds,
            last: None,
        }
    }

    pub fn show(&mut self, color: LedColor) {
        if self.last == Some(color) {
            return;
        }
        self.last = Some(color);

        let grb: [u8; 3] = match color {
            LedColor::Green   => [255,   0,   0],
            LedColor::Red     => [  0, 255,   0],
            LedColor::Blue    => [  0,   0, 255],
            LedColor::Orange  => [128, 255,   0],
            LedColor::Magenta => [  0, 255, 255],
            LedColor::None    => [  0,   0,   0],
        };

        self.neopixel
            .write(brightness(repeat(grb.into()).take(self.nb_leds), 3))
            .unwrap();
    }
}
