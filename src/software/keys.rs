#![cfg_attr(rustfmt, rustfmt_skip)]
use heapless::{Deque, Vec};
use usbd_human_interface_device::page::Keyboard;

use crate::options::{BUFFER_CASE_LENGTH, BUFFER_LENGTH};

use super::actions::Action;

// --------------------------------------------------------------------------------------
// Each entry is a full NKRO report followed by a tempo (a break can be mandatory,
// e.g. between the keys of a unicode composition).
// The buffer is filled here to be then emptied by the writing report.
#[derive(PartialEq, Clone, Default)]
pub struct BuffCase {
    pub key_code: Vec<Keyboard, BUFFER_CASE_LENGTH>,
    pub tempo: u32,
}

pub struct Buffer {
    pub keys: Deque<BuffCase, BUFFER_LENGTH>,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer { keys: Deque::new() }
    }

    pub(crate) fn add(mut self, keys: &[Keyboard], tempo: u32) -> Self {
        let mut key_code = Vec::new();
        key_code.extend(keys.iter().copied());

        self.keys.push_back(BuffCase { key_code, tempo }).ok();
        self
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Buffer::new()
    }
}

// --------------------------------------------------------------------------------------
/// The set of usb codes currently registered. Presses and releases mirror the key
/// events one to one, each change is snapshot into the buffer as a full report.
pub struct Held {
    keys: Vec<Keyboard, 24>,
    dirty: bool,
}

impl Held {
    pub fn new() -> Self {
        Held {
            keys: Vec::new(),
            dirty: false,
        }
    }

    pub fn press(&mut self, keys: &[Keyboard]) {
        for key in keys.iter() {
            if !self.keys.contains(key) {
                self.keys.push(*key).ok();
                self.dirty = true;
            }
        }
    }

    pub fn release(&mut self, keys: &[Keyboard]) {
        let before = self.keys.len();
        self.keys.retain(|k| !keys.contains(k));
        self.dirty |= self.keys.len() != before;
    }

    pub fn contains(&self, key: Keyboard) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Keyboard] {
        &self.keys
    }

    /// Push the current report if it changed since the last flush.
    pub fn flush(&mut self, buffer: Buffer) -> Buffer {
        if !self.dirty {
            return buffer;
        }
        self.dirty = false;

        if self.keys.is_empty() {
            buffer.add(&[Keyboard::NoEventIndicated], 0)
        } else {
            let keys = self.keys.clone();
            buffer.add(&keys, 0)
        }
    }
}

impl Default for Held {
    fn default() -> Self {
        Held::new()
    }
}

// --------------------------------------------------------------------------------------

#[rustfmt::skip]
#[allow(dead_code)]
#[repr(u16)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum KC {
    None = 0,
    Transparent = 1,

    A = 10,
    B = 11,
    C = 12,
    D = 13,
    E = 14,
    F = 15,
    G = 16,
    H = 17,
    I = 18,
    J = 19,
    K = 20,
    L = 21,
    M = 22,
    N = 23,
    O = 24,
    P = 25,
    Q = 26,
    R = 27,
    S = 28,
    T = 29,
    U = 30,
    V = 31,
    W = 32,
    X = 33,
    Y = 34,
    Z = 35,

    Enter = 500,
    Space = 501,
    Esc = 502,
    Del = 503,
    BackSpace = 504,
    Tab = 505,
    Home = 507,
    End = 508,
    PageUp = 509,
    PageDown = 510,
    Insert = 511,

    Left = 600,
    Down = 601,
    Up = 602,
    Right = 603,

    Num0 = 800,
    Num1 = 801,
    Num2 = 802,
    Num3 = 803,
    Num4 = 804,
    Num5 = 805,
    Num6 = 806,
    Num7 = 807,
    Num8 = 808,
    Num9 = 809,

    Minus = 1000,
    Equal = 1001,
    LeftBracket = 1002,
    RightBracket = 1003,
    Backslash = 1004,
    SemiColon = 1006,
    Quote = 1007,
    Grave = 1008,
    Comma = 1009,
    Dot = 1010,
    Slash = 1011,

    Tilde = 2000,
    Exclaim = 2001,
    At = 2002,
    Hash = 2003,
    Dollar = 2004,
    Percentage = 2005,
    Circumflex = 2006,
    Ampersand = 2007,
    Asterix = 2008,
    LeftParent = 2009,
    RightParent = 2010,
    Underscore = 2011,
    Plus = 2012,
    Colon = 2016,
    DoubleQuote = 2017,
    Question = 2020,

    F1  = 4000,
    F2  = 4001,
    F3  = 4002,
    F4  = 4003,
    F5  = 4004,
    F6  = 4005,
    F7  = 4006,
    F8  = 4007,
    F9  = 4008,
    F10 = 4009,
    F11 = 4010,
    F12 = 4011,

    Mute = 4500,
    VolUp = 4501,
    VolDown = 4502,

    Alt = 10000,
    Ctrl = 10002,
    Gui = 10003,
    Shift = 10004,
    RAlt = 10005,
    RCtrl = 10006,
    RGui = 10007,
    RShift = 10008,

    // Standard editing usages, remapped exactly like their Act counterparts
    Undo = 20000,
    Again = 20001,
    Cut = 20002,
    Copy = 20003,
    Paste = 20004,
    WwwBack = 20005,
    WwwForward = 20006,

    ToggleOs = 30000,
    Boot = 30001,
    ConfigClear = 30002,

    MouseBtLeft = 50000,
    MouseBtMiddle = 50001,
    MouseBtRight = 50002,
    DragScroll = 50010,
    Sniping = 50011,
    DpiMod = 50012,
    SnipeDpiMod = 50013,

    Layer(usize) = 60000,
    LayTap(usize, &'static KC) = 60001,

    Act(Action) = 61000,
}

impl KC {
    /// Usb codes registered while the key is held, empty for the keycodes which are
    /// handled before reaching the report.
    pub fn usb(&self) -> &'static [Keyboard] {
        match *self {
            KC::A => &[Keyboard::A],
            KC::B => &[Keyboard::B],
            KC::C => &[Keyboard::C],
            KC::D => &[Keyboard::D],
            KC::E => &[Keyboard::E],
            KC::F => &[Keyboard::F],
            KC::G => &[Keyboard::G],
            KC::H => &[Keyboard::H],
            KC::I => &[Keyboard::I],
            KC::J => &[Keyboard::J],
            KC::K => &[Keyboard::K],
            KC::L => &[Keyboard::L],
            KC::M => &[Keyboard::M],
            KC::N => &[Keyboard::N],
            KC::O => &[Keyboard::O],
            KC::P => &[Keyboard::P],
            KC::Q => &[Keyboard::Q],
            KC::R => &[Keyboard::R],
            KC::S => &[Keyboard::S],
            KC::T => &[Keyboard::T],
            KC::U => &[Keyboard::U],
            KC::V => &[Keyboard::V],
            KC::W => &[Keyboard::W],
            KC::X => &[Keyboard::X],
            KC::Y => &[Keyboard::Y],
            KC::Z => &[Keyboard::Z],

            KC::Enter     => &[Keyboard::ReturnEnter],
            KC::Space     => &[Keyboard::Space],
            KC::Esc       => &[Keyboard::Escape],
            KC::Del       => &[Keyboard::DeleteForward],
            KC::BackSpace => &[Keyboard::DeleteBackspace],
            KC::Tab       => &[Keyboard::Tab],
            KC::Home      => &[Keyboard::Home],
            KC::End       => &[Keyboard::End],
            KC::PageUp    => &[Keyboard::PageUp],
            KC::PageDown  => &[Keyboard::PageDown],
            KC::Insert    => &[Keyboard::Insert],

            KC::Left  => &[Keyboard::LeftArrow],
            KC::Down  => &[Keyboard::DownArrow],
            KC::Up    => &[Keyboard::UpArrow],
            KC::Right => &[Keyboard::RightArrow],

            KC::Num0 => &[Keyboard::Keyboard0],
            KC::Num1 => &[Keyboard::Keyboard1],
            KC::Num2 => &[Keyboard::Keyboard2],
            KC::Num3 => &[Keyboard::Keyboard3],
            KC::Num4 => &[Keyboard::Keyboard4],
            KC::Num5 => &[Keyboard::Keyboard5],
            KC::Num6 => &[Keyboard::Keyboard6],
            KC::Num7 => &[Keyboard::Keyboard7],
            KC::Num8 => &[Keyboard::Keyboard8],
            KC::Num9 => &[Keyboard::Keyboard9],

            KC::Minus        => &[Keyboard::Minus],
            KC::Equal        => &[Keyboard::Equal],
            KC::LeftBracket  => &[Keyboard::LeftBrace],
            KC::RightBracket => &[Keyboard::RightBrace],
            KC::Backslash    => &[Keyboard::Backslash],
            KC::SemiColon    => &[Keyboard::Semicolon],
            KC::Quote        => &[Keyboard::Apostrophe],
            KC::Grave        => &[Keyboard::Grave],
            KC::Comma        => &[Keyboard::Comma],
            KC::Dot          => &[Keyboard::Dot],
            KC::Slash        => &[Keyboard::ForwardSlash],

            KC::Tilde       => &[Keyboard::LeftShift, Keyboard::Grave],
            KC::Exclaim     => &[Keyboard::LeftShift, Keyboard::Keyboard1],
            KC::At          => &[Keyboard::LeftShift, Keyboard::Keyboard2],
            KC::Hash        => &[Keyboard::LeftShift, Keyboard::Keyboard3],
            KC::Dollar      => &[Keyboard::LeftShift, Keyboard::Keyboard4],
            KC::Percentage  => &[Keyboard::LeftShift, Keyboard::Keyboard5],
            KC::Circumflex  => &[Keyboard::LeftShift, Keyboard::Keyboard6],
            KC::Ampersand   => &[Keyboard::LeftShift, Keyboard::Keyboard7],
            KC::Asterix     => &[Keyboard::LeftShift, Keyboard::Keyboard8],
            KC::LeftParent  => &[Keyboard::LeftShift, Keyboard::Keyboard9],
            KC::RightParent => &[Keyboard::LeftShift, Keyboard::Keyboard0],
            KC::Underscore  => &[Keyboard::LeftShift, Keyboard::Minus],
            KC::Plus        => &[Keyboard::LeftShift, Keyboard::Equal],
            KC::Colon       => &[Keyboard::LeftShift, Keyboard::Semicolon],
            KC::DoubleQuote => &[Keyboard::LeftShift, Keyboard::Apostrophe],
            KC::Question    => &[Keyboard::LeftShift, Keyboard::ForwardSlash],

            KC::F1  => &[Keyboard::F1],
            KC::F2  => &[Keyboard::F2],
            KC::F3  => &[Keyboard::F3],
            KC::F4  => &[Keyboard::F4],
            KC::F5  => &[Keyboard::F5],
            KC::F6  => &[Keyboard::F6],
            KC::F7  => &[Keyboard::F7],
            KC::F8  => &[Keyboard::F8],
            KC::F9  => &[Keyboard::F9],
            KC::F10 => &[Keyboard::F10],
            KC::F11 => &[Keyboard::F11],
            KC::F12 => &[Keyboard::F12],

            KC::Mute    => &[Keyboard::Mute],
            KC::VolUp   => &[Keyboard::VolumeUp],
            KC::VolDown => &[Keyboard::VolumeDown],

            KC::Alt    => &[Keyboard::LeftAlt],
            KC::Ctrl   => &[Keyboard::LeftControl],
            KC::Gui    => &[Keyboard::LeftGUI],
            KC::Shift  => &[Keyboard::LeftShift],
            KC::RAlt   => &[Keyboard::RightAlt],
            KC::RCtrl  => &[Keyboard::RightControl],
            KC::RGui   => &[Keyboard::RightGUI],
            KC::RShift => &[Keyboard::RightShift],

            _ => &[],
        }
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_set_mirrors_press_and_release() {
        let mut held = Held::new();
        held.press(KC::A.usb());
        held.press(KC::Shift.usb());
        assert!(held.contains(Keyboard::A));
        assert!(held.contains(Keyboard::LeftShift));

        held.release(KC::A.usb());
        assert!(!held.contains(Keyboard::A));
        assert!(held.contains(Keyboard::LeftShift));
    }

    #[test]
    fn flush_reports_only_changes() {
        let mut held = Held::new();
        let mut buffer = Buffer::new();

        buffer = held.flush(buffer);
        assert!(buffer.keys.is_empty());

        held.press(KC::A.usb());
        buffer = held.flush(buffer);
        assert_eq!(buffer.keys.len(), 1);

        // Unchanged set, nothing new to report
        buffer = held.flush(buffer);
        assert_eq!(buffer.keys.len(), 1);

        held.release(KC::A.usb());
        buffer = held.flush(buffer);
        let last = buffer.keys.back().unwrap();
        assert_eq!(last.key_code.as_slice(), &[Keyboard::NoEventIndicated]);
    }
}
