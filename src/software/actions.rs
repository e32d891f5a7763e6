#![cfg_attr(rustfmt, rustfmt_skip)]
use heapless::Vec;
use usbd_human_interface_device::page::Keyboard;

/// Which OS convention the keyboard currently speaks.
/// Persisted as bit 0 of the raw user config word, Mac when the bit is clear.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OsMode {
    Mac,
    Pc,
}

impl OsMode {
    pub fn index(self) -> usize {
        match self {
            OsMode::Mac => 0,
            OsMode::Pc => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            OsMode::Mac => OsMode::Pc,
            OsMode::Pc => OsMode::Mac,
        }
    }
}

// --------------------------------------------------------------------------------------
const CTRL:  u8 = 0b0001;
const SHIFT: u8 = 0b0010;
const ALT:   u8 = 0b0100;
const GUI:   u8 = 0b1000;

/// A base key plus its modifier mask, registered/unregistered as one unit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Chord {
    mods: u8,
    key: Keyboard,
}

impl Chord {
    pub const fn plain(key: Keyboard) -> Self   { Chord { mods: 0,     key } }
    pub const fn ctrl(key: Keyboard) -> Self    { Chord { mods: CTRL,  key } }
    pub const fn shifted(key: Keyboard) -> Self { Chord { mods: SHIFT, key } }
    pub const fn alt(key: Keyboard) -> Self     { Chord { mods: ALT,   key } }
    pub const fn gui(key: Keyboard) -> Self     { Chord { mods: GUI,   key } }

    pub const fn with_shift(self) -> Self { Chord { mods: self.mods | SHIFT, key: self.key } }
    pub const fn with_gui(self) -> Self   { Chord { mods: self.mods | GUI,   key: self.key } }

    /// Modifiers first so a report never shows the base key unmodified.
    pub fn keys(&self) -> Vec<Keyboard, 5> {
        let mut output = Vec::new();
        if self.mods & CTRL  != 0 { output.push(Keyboard::LeftControl).ok(); }
        if self.mods & SHIFT != 0 { output.push(Keyboard::LeftShift).ok(); }
        if self.mods & ALT   != 0 { output.push(Keyboard::LeftAlt).ok(); }
        if self.mods & GUI   != 0 { output.push(Keyboard::LeftGUI).ok(); }
        output.push(self.key).ok();
        output
    }
}

/// What an action turns into once the OS is known.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Emit {
    Chord(Chord),
    Unicode(u32),
}

// --------------------------------------------------------------------------------------
/// OS independent editing intents. The set is closed: the per-OS table below is an
/// exhaustive match, so a variant without both chords cannot compile.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Action {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    WordPrev,
    WordNext,
    WordDeletePrev,
    WordDeleteNext,
    Back,
    Forward,
    TabNew,
    TabClose,
    TabPrev,
    TabNext,
    Save,
    Find,
    SelectAll,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    LockDesktop,
    UcADiaeresis,
    UcARing,
    UcODiaeresis,
    UcUDiaeresis,
}

impl Action {
    pub const ALL: [Action; 26] = [
        Action::Undo, Action::Redo, Action::Cut, Action::Copy, Action::Paste,
        Action::WordPrev, Action::WordNext, Action::WordDeletePrev, Action::WordDeleteNext,
        Action::Back, Action::Forward,
        Action::TabNew, Action::TabClose, Action::TabPrev, Action::TabNext,
        Action::Save, Action::Find, Action::SelectAll,
        Action::ZoomIn, Action::ZoomOut, Action::ZoomReset, Action::LockDesktop,
        Action::UcADiaeresis, Action::UcARing, Action::UcODiaeresis, Action::UcUDiaeresis,
    ];

    /// [0] = Mac, [1] = PC (Windows/Linux).
    pub const fn emits(self) -> [Emit; 2] {
        use Keyboard::*;
        match self {
            Action::Undo           => [Emit::Chord(Chord::gui(Z)),                  Emit::Chord(Chord::ctrl(Z))],
            Action::Redo           => [Emit::Chord(Chord::gui(Z).with_shift()),     Emit::Chord(Chord::ctrl(Y))],
            Action::Cut            => [Emit::Chord(Chord::gui(X)),                  Emit::Chord(Chord::shifted(DeleteForward))],
            Action::Copy           => [Emit::Chord(Chord::gui(C)),                  Emit::Chord(Chord::ctrl(Insert))],
            Action::Paste          => [Emit::Chord(Chord::gui(V)),                  Emit::Chord(Chord::shifted(Insert))],
            Action::WordPrev       => [Emit::Chord(Chord::alt(LeftArrow)),          Emit::Chord(Chord::ctrl(LeftArrow))],
            Action::WordNext       => [Emit::Chord(Chord::alt(RightArrow)),         Emit::Chord(Chord::ctrl(RightArrow))],
            Action::WordDeletePrev => [Emit::Chord(Chord::alt(DeleteBackspace)),    Emit::Chord(Chord::ctrl(DeleteBackspace))],
            Action::WordDeleteNext => [Emit::Chord(Chord::alt(DeleteForward)),      Emit::Chord(Chord::ctrl(DeleteForward))],
            Action::Back           => [Emit::Chord(Chord::gui(LeftArrow)),          Emit::Chord(Chord::alt(LeftArrow))],
            Action::Forward        => [Emit::Chord(Chord::gui(RightArrow)),         Emit::Chord(Chord::alt(RightArrow))],
            Action::TabNew         => [Emit::Chord(Chord::gui(T)),                  Emit::Chord(Chord::ctrl(T))],
            Action::TabClose       => [Emit::Chord(Chord::gui(W)),                  Emit::Chord(Chord::ctrl(W))],
            Action::TabPrev        => [Emit::Chord(Chord::ctrl(Tab).with_shift()),  Emit::Chord(Chord::ctrl(Tab).with_shift())],
            Action::TabNext        => [Emit::Chord(Chord::ctrl(Tab)),               Emit::Chord(Chord::ctrl(Tab))],
            Action::Save           => [Emit::Chord(Chord::gui(S)),                  Emit::Chord(Chord::ctrl(S))],
            Action::Find           => [Emit::Chord(Chord::gui(F)),                  Emit::Chord(Chord::ctrl(F))],
            Action::SelectAll      => [Emit::Chord(Chord::gui(A)),                  Emit::Chord(Chord::ctrl(A))],
            Action::ZoomIn         => [Emit::Chord(Chord::gui(Equal)),              Emit::Chord(Chord::ctrl(Equal))],
            Action::ZoomOut        => [Emit::Chord(Chord::gui(Minus)),              Emit::Chord(Chord::ctrl(Minus))],
            Action::ZoomReset      => [Emit::Chord(Chord::gui(Keyboard0)),          Emit::Chord(Chord::ctrl(Keyboard0))],
            Action::LockDesktop    => [Emit::Chord(Chord::ctrl(Q).with_gui()),      Emit::Chord(Chord::gui(L))],
            Action::UcADiaeresis   => [Emit::Unicode(0x00E4),                       Emit::Unicode(0x00E4)],
            Action::UcARing        => [Emit::Unicode(0x00E5),                       Emit::Unicode(0x00E5)],
            Action::UcODiaeresis   => [Emit::Unicode(0x00F6),                       Emit::Unicode(0x00F6)],
            Action::UcUDiaeresis   => [Emit::Unicode(0x00FC),                       Emit::Unicode(0x00FC)],
        }
    }

    pub fn resolve(self, mode: OsMode) -> Emit {
        self.emits()[mode.index()]
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_resolves_under_both_modes() {
        for action in Action::ALL {
            for mode in [OsMode::Mac, OsMode::Pc] {
                match action.resolve(mode) {
                    Emit::Chord(chord) => {
                        let keys = chord.keys();
                        assert!(!keys.is_empty(), "{:?} has an empty chord", action);
                        assert_ne!(*keys.last().unwrap(), Keyboard::NoEventIndicated);
                    }
                    Emit::Unicode(code_point) => {
                        assert!(code_point > 0, "{:?} has a null code point", action);
                    }
                }
            }
        }
    }

    #[test]
    fn copy_follows_the_active_mode() {
        assert_eq!(
            Action::Copy.resolve(OsMode::Mac),
            Emit::Chord(Chord::gui(Keyboard::C))
        );
        assert_eq!(
            Action::Copy.resolve(OsMode::Pc),
            Emit::Chord(Chord::ctrl(Keyboard::Insert))
        );
    }

    #[test]
    fn chord_reports_modifiers_before_the_base_key() {
        let keys = Chord::gui(Keyboard::Z).with_shift().keys();
        assert_eq!(
            keys.as_slice(),
            &[Keyboard::LeftShift, Keyboard::LeftGUI, Keyboard::Z]
        );
    }

    #[test]
    fn accented_inserts_are_identical_on_both_sides() {
        for action in [
            Action::UcADiaeresis,
            Action::UcARing,
            Action::UcODiaeresis,
            Action::UcUDiaeresis,
        ] {
            assert_eq!(action.resolve(OsMode::Mac), action.resolve(OsMode::Pc));
        }
    }
}
