use heapless::Vec;

use super::{
    actions::{Action, Chord, Emit, OsMode},
    keys::{Buffer, Held, KC},
    unicode::Composer,
};

/// Persisted word boundary. One read at startup, one write per change.
pub trait ConfigStore {
    fn read(&mut self) -> u32;
    fn write(&mut self, raw: u32);
}

/// Raw view of the persisted word, bit 0 selects the OS.
#[derive(Clone, Copy)]
pub struct UserConfig {
    raw: u32,
}

impl UserConfig {
    const OS_BIT: u32 = 1;

    pub fn from_raw(raw: u32) -> Self {
        UserConfig { raw }
    }

    pub fn raw(&self) -> u32 {
        self.raw
    }

    pub fn os_mode(&self) -> OsMode {
        if self.raw & Self::OS_BIT == 0 {
            OsMode::Mac
        } else {
            OsMode::Pc
        }
    }

    pub fn set_os_mode(&mut self, mode: OsMode) {
        match mode {
            OsMode::Mac => self.raw &= !Self::OS_BIT,
            OsMode::Pc => self.raw |= Self::OS_BIT,
        }
    }
}

/// Substitutes OS independent actions with the chord of the active OS.
///
/// The chord is resolved once, when the key goes down, and kept in flight until the
/// matching key up. Switching the OS between a press and its release therefore still
/// releases the chord which was registered, no modifier is left stuck.
pub struct Remapper {
    config: UserConfig,
    in_flight: Vec<(Action, Chord), 8>,
}

impl Remapper {
    pub fn new(store: &mut impl ConfigStore) -> Self {
        Remapper {
            config: UserConfig::from_raw(store.read()),
            in_flight: Vec::new(),
        }
    }

    pub fn os_mode(&self) -> OsMode {
        self.config.os_mode()
    }

    /// Runs first on every key event. Returns true when the event was an action
    /// (direct or through one of the standard editing usages) and is fully handled.
    pub fn process(
        &mut self,
        code: KC,
        is_press: bool,
        held: &mut Held,
        composer: &Composer,
        mut buffer: Buffer,
    ) -> (Buffer, bool) {
        let Some(action) = Self::action_of(code) else {
            return (buffer, false);
        };

        if is_press {
            match action.resolve(self.os_mode()) {
                Emit::Chord(chord) => {
                    held.press(&chord.keys());
                    self.in_flight.push((action, chord)).ok();
                }
                Emit::Unicode(code_point) => {
                    // Fire and forget, the release has nothing to undo
                    buffer = composer.compose(code_point, buffer);
                }
            }
        } else if let Some(position) = self
            .in_flight
            .iter()
            .rposition(|(flying, _)| *flying == action)
        {
            let (_, chord) = self.in_flight.swap_remove(position);
            held.release(&chord.keys());
        }

        (buffer, true)
    }

    /// Flip the OS, persist it right away. The caller realigns the composer and
    /// flashes the indicator with the returned mode.
    pub fn toggle(&mut self, store: &mut impl ConfigStore) -> OsMode {
        let mode = self.os_mode().other();
        self.config.set_os_mode(mode);
        store.write(self.config.raw());
        mode
    }

    /// Back to the defaults (Mac), persisted.
    pub fn reset(&mut self, store: &mut impl ConfigStore) {
        self.config = UserConfig::from_raw(0);
        store.write(self.config.raw());
    }

    fn action_of(code: KC) -> Option<Action> {
        match code {
            KC::Act(action) => Some(action),
            // Standard editing usages alias onto the same actions
            KC::Undo => Some(Action::Undo),
            KC::Again => Some(Action::Redo),
            KC::Cut => Some(Action::Cut),
            KC::Copy => Some(Action::Copy),
            KC::Paste => Some(Action::Paste),
            KC::WwwBack => Some(Action::Back),
            KC::WwwForward => Some(Action::Forward),
            _ => None,
        }
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
pub(crate) struct MemStore {
    pub raw: u32,
    pub writes: u32,
}

#[cfg(test)]
impl MemStore {
    pub fn new(raw: u32) -> Self {
        MemStore { raw, writes: 0 }
    }
}

#[cfg(test)]
impl ConfigStore for MemStore {
    fn read(&mut self) -> u32 {
        self.raw
    }

    fn write(&mut self, raw: u32) {
        self.raw = raw;
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usbd_human_interface_device::page::Keyboard;

    fn remapper(raw: u32) -> (Remapper, MemStore, Held, Composer, Buffer) {
        let mut store = MemStore::new(raw);
        let remap = Remapper::new(&mut store);
        let composer = Composer::new(remap.os_mode());
        (remap, store, Held::new(), composer, Buffer::new())
    }

    #[test]
    fn blank_storage_defaults_to_mac() {
        let (remap, ..) = remapper(0);
        assert_eq!(remap.os_mode(), OsMode::Mac);
    }

    #[test]
    fn toggle_twice_restores_mode_and_raw_word() {
        let (mut remap, mut store, ..) = remapper(0);

        assert_eq!(remap.toggle(&mut store), OsMode::Pc);
        assert_eq!(store.raw, 1);

        assert_eq!(remap.toggle(&mut store), OsMode::Mac);
        assert_eq!(store.raw, 0);

        // One synchronous write per flip
        assert_eq!(store.writes, 2);
    }

    #[test]
    fn copy_registers_the_chord_of_the_active_os() {
        let (mut remap, _, mut held, composer, buffer) = remapper(0);
        let (_, handled) =
            remap.process(KC::Act(Action::Copy), true, &mut held, &composer, buffer);

        assert!(handled);
        assert_eq!(held.keys(), &[Keyboard::LeftGUI, Keyboard::C]);

        let (mut remap, _, mut held, composer, buffer) = remapper(1);
        remap.process(KC::Act(Action::Copy), true, &mut held, &composer, buffer);
        assert_eq!(held.keys(), &[Keyboard::LeftControl, Keyboard::Insert]);
    }

    #[test]
    fn release_undoes_the_chord_resolved_at_press_time() {
        let (mut remap, mut store, mut held, composer, mut buffer) = remapper(0);

        let (b, _) = remap.process(KC::Act(Action::Copy), true, &mut held, &composer, buffer);
        buffer = b;
        assert!(held.contains(Keyboard::LeftGUI));

        // OS switched while the action is down
        remap.toggle(&mut store);

        let (_, handled) =
            remap.process(KC::Act(Action::Copy), false, &mut held, &composer, buffer);
        assert!(handled);
        // The Mac chord went up, nothing of the PC chord ever appeared
        assert!(held.is_empty());
    }

    #[test]
    fn aliases_resolve_like_their_actions() {
        let pairs = [
            (KC::Undo, KC::Act(Action::Undo)),
            (KC::Again, KC::Act(Action::Redo)),
            (KC::Cut, KC::Act(Action::Cut)),
            (KC::Copy, KC::Act(Action::Copy)),
            (KC::Paste, KC::Act(Action::Paste)),
            (KC::WwwBack, KC::Act(Action::Back)),
            (KC::WwwForward, KC::Act(Action::Forward)),
        ];

        for raw in [0, 1] {
            for (alias, direct) in pairs {
                let (mut remap, _, mut held_alias, composer, buffer) = remapper(raw);
                remap.process(alias, true, &mut held_alias, &composer, buffer);

                let (mut remap, _, mut held_direct, composer, buffer) = remapper(raw);
                remap.process(direct, true, &mut held_direct, &composer, buffer);

                assert_eq!(held_alias.keys(), held_direct.keys());
            }
        }
    }

    #[test]
    fn unrelated_keycodes_fall_through() {
        let (mut remap, _, mut held, composer, buffer) = remapper(0);
        let (_, handled) = remap.process(KC::A, true, &mut held, &composer, buffer);

        assert!(!handled);
        assert!(held.is_empty());
    }

    #[test]
    fn unicode_action_types_on_press_only() {
        let (mut remap, _, mut held, composer, buffer) = remapper(0);

        let (buffer, handled) = remap.process(
            KC::Act(Action::UcADiaeresis),
            true,
            &mut held,
            &composer,
            buffer,
        );
        assert!(handled);
        assert!(held.is_empty());
        let queued = buffer.keys.len();
        assert!(queued > 0);

        let (buffer, handled) = remap.process(
            KC::Act(Action::UcADiaeresis),
            false,
            &mut held,
            &composer,
            buffer,
        );
        assert!(handled);
        assert_eq!(buffer.keys.len(), queued);
    }

    #[test]
    fn reset_goes_back_to_mac_and_persists() {
        let (mut remap, mut store, ..) = remapper(1);
        assert_eq!(remap.os_mode(), OsMode::Pc);

        remap.reset(&mut store);
        assert_eq!(remap.os_mode(), OsMode::Mac);
        assert_eq!(store.raw, 0);
    }
}
