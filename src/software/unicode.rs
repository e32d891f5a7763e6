use usbd_human_interface_device::page::Keyboard;

use crate::options::TEMPO_UNICODE;

use super::{actions::OsMode, keys::Buffer};

/// Host side input convention used to type a code point.
/// Follows the OS mode: hex input with Option held on macOS, Ctrl-Shift-U on Linux.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnicodeMode {
    MacOs,
    Linux,
}

impl From<OsMode> for UnicodeMode {
    fn from(mode: OsMode) -> Self {
        match mode {
            OsMode::Mac => UnicodeMode::MacOs,
            OsMode::Pc => UnicodeMode::Linux,
        }
    }
}

pub struct Composer {
    mode: UnicodeMode,
}

impl Composer {
    pub fn new(mode: OsMode) -> Self {
        Composer { mode: mode.into() }
    }

    pub fn set_mode(&mut self, mode: OsMode) {
        self.mode = mode.into();
    }

    /// Queue the key sequence which types the code point on the host.
    /// Four hex digits cover the whole basic multilingual plane.
    pub fn compose(&self, code_point: u32, mut buffer: Buffer) -> Buffer {
        match self.mode {
            UnicodeMode::MacOs => {
                for nibble in nibbles(code_point) {
                    buffer = buffer.add(&[Keyboard::LeftAlt, hex_key(nibble)], TEMPO_UNICODE);
                    buffer = buffer.add(&[Keyboard::LeftAlt], TEMPO_UNICODE);
                }
            }
            UnicodeMode::Linux => {
                buffer = buffer.add(
                    &[Keyboard::LeftControl, Keyboard::LeftShift, Keyboard::U],
                    TEMPO_UNICODE,
                );
                for nibble in nibbles(code_point) {
                    buffer = buffer.add(&[hex_key(nibble)], TEMPO_UNICODE);
                    buffer = buffer.add(&[Keyboard::NoEventIndicated], TEMPO_UNICODE);
                }
                buffer = buffer.add(&[Keyboard::ReturnEnter], TEMPO_UNICODE);
            }
        }

        buffer.add(&[Keyboard::NoEventIndicated], 0)
    }
}

fn nibbles(code_point: u32) -> [u32; 4] {
    [
        (code_point >> 12) & 0xF,
        (code_point >> 8) & 0xF,
        (code_point >> 4) & 0xF,
        code_point & 0xF,
    ]
}

fn hex_key(nibble: u32) -> Keyboard {
    match nibble {
        0x0 => Keyboard::Keyboard0,
        0x1 => Keyboard::Keyboard1,
        0x2 => Keyboard::Keyboard2,
        0x3 => Keyboard::Keyboard3,
        0x4 => Keyboard::Keyboard4,
        0x5 => Keyboard::Keyboard5,
        0x6 => Keyboard::Keyboard6,
        0x7 => Keyboard::Keyboard7,
        0x8 => Keyboard::Keyboard8,
        0x9 => Keyboard::Keyboard9,
        0xA => Keyboard::A,
        0xB => Keyboard::B,
        0xC => Keyboard::C,
        0xD => Keyboard::D,
        0xE => Keyboard::E,
        _ => Keyboard::F,
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macos_sequence_holds_option_over_four_hex_digits() {
        let composer = Composer::new(OsMode::Mac);
        let buffer = composer.compose(0x00E4, Buffer::new());

        let reports: heapless::Vec<_, 16> = buffer.keys.iter().collect();
        assert_eq!(reports[0].key_code.as_slice(), &[Keyboard::LeftAlt, Keyboard::Keyboard0]);
        assert_eq!(reports[2].key_code.as_slice(), &[Keyboard::LeftAlt, Keyboard::Keyboard0]);
        assert_eq!(reports[4].key_code.as_slice(), &[Keyboard::LeftAlt, Keyboard::E]);
        assert_eq!(reports[6].key_code.as_slice(), &[Keyboard::LeftAlt, Keyboard::Keyboard4]);
        // Everything released at the end
        assert_eq!(
            reports.last().unwrap().key_code.as_slice(),
            &[Keyboard::NoEventIndicated]
        );
    }

    #[test]
    fn linux_sequence_opens_with_ctrl_shift_u_and_ends_with_enter() {
        let composer = Composer::new(OsMode::Pc);
        let buffer = composer.compose(0x00FC, Buffer::new());

        let reports: heapless::Vec<_, 16> = buffer.keys.iter().collect();
        assert_eq!(
            reports[0].key_code.as_slice(),
            &[Keyboard::LeftControl, Keyboard::LeftShift, Keyboard::U]
        );
        assert_eq!(
            reports[reports.len() - 2].key_code.as_slice(),
            &[Keyboard::ReturnEnter]
        );
    }

    #[test]
    fn composer_follows_the_os_mode() {
        let mut composer = Composer::new(OsMode::Mac);
        composer.set_mode(OsMode::Pc);
        let buffer = composer.compose(0x00E5, Buffer::new());
        assert_eq!(
            buffer.keys.front().unwrap().key_code.as_slice(),
            &[Keyboard::LeftControl, Keyboard::LeftShift, Keyboard::U]
        );
    }
}
