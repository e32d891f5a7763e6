use heapless::Vec;
use usbd_human_interface_device::device::mouse::WheelMouseReport;
use usbd_human_interface_device::page::Keyboard;

use crate::layouts::{LAYER_BASE, LAYER_POINTER};
use crate::options::{HOLD_TIME, NB_LAYERS};

use super::{
    actions::OsMode,
    indicator::{Indicator, LedColor, NotifColor},
    keys::{Buffer, Held, KC},
    matrix::Matrix,
    overrides,
    pointer::Pointer,
    remap::{ConfigStore, Remapper},
    unicode::Composer,
};

#[cfg(feature = "auto-pointer")]
use super::pointer::AutoPointer;

/// A key which went down, with everything needed to undo it later.
/// The emitted code is resolved at press time, layer or override changes in
/// between cannot desynchronise the release.
#[derive(Clone, Copy)]
struct PressedKey {
    index: usize,
    code: KC,
    emitted: KC,
    masked_shift: bool,
}

#[derive(Clone, Copy)]
struct PendingTap {
    index: usize,
    layer: usize,
    tap: KC,
    ticks: u32,
}

/// This is the core of this keyboard.
/// The run function turns the matrix evolutions into key events, hands each one to
/// the remapper first, then to the layer/pointer/override handling, and snapshots
/// the report changes into the key buffer.
pub struct Orbit<const NB_KEYS: usize> {
    layers: &'static [[KC; NB_KEYS]; NB_LAYERS],

    matrix: Matrix,
    remap: Remapper,
    composer: Composer,
    indicator: Indicator,
    pointer: Pointer,
    #[cfg(feature = "auto-pointer")]
    auto_pointer: AutoPointer,
    pointer_forced: bool,

    held: Held,
    pressed: Vec<PressedKey, NB_KEYS>,
    pending: Vec<PendingTap, 4>,
    layer_holds: Vec<(usize, usize), 4>,

    boot: bool,
    last_ticks: u32,
}

impl<const NB_KEYS: usize> Orbit<NB_KEYS> {
    pub fn new(
        layers: &'static [[KC; NB_KEYS]; NB_LAYERS],
        store: &mut impl ConfigStore,
        ticks: u32,
    ) -> Self {
        let remap = Remapper::new(store);
        let composer = Composer::new(remap.os_mode());

        Orbit {
            layers,

            matrix: Matrix::new(),
            remap,
            composer,
            indicator: Indicator::new(),
            pointer: Pointer::new(),
            #[cfg(feature = "auto-pointer")]
            auto_pointer: AutoPointer::new(),
            pointer_forced: false,

            held: Held::new(),
            pressed: Vec::new(),
            pending: Vec::new(),
            layer_holds: Vec::new(),

            boot: false,
            last_ticks: ticks,
        }
    }

    pub fn os_mode(&self) -> OsMode {
        self.remap.os_mode()
    }

    pub fn boot_requested(&self) -> bool {
        self.boot
    }

    pub fn update_matrix(&mut self, active_indexes: Vec<u8, 16>, ticks: u32) {
        self.matrix.update(active_indexes);

        let elapsed = match self.last_ticks <= ticks {
            true => ticks - self.last_ticks,
            false => ticks + (u32::MAX - self.last_ticks),
        };
        for pending in self.pending.iter_mut() {
            pending.ticks += elapsed;
        }

        self.last_ticks = ticks;
    }

    pub fn run<S: ConfigStore>(
        &mut self,
        store: &mut S,
        mut buffer: Buffer,
        mut mouse_report: WheelMouseReport,
        ticks: u32,
    ) -> (Buffer, WheelMouseReport, LedColor) {
        // Layer-taps ---------------------------------------------------------------
        // Held long enough they become their layer, released early they tap.
        let mut i = 0;
        while i < self.pending.len() {
            let pending = self.pending[i];
            if pending.ticks >= HOLD_TIME {
                self.layer_holds.push((pending.index, pending.layer)).ok();
                self.pending.swap_remove(i);
            } else if !self.matrix.is_active(pending.index) {
                self.pending.swap_remove(i);

                buffer =
                    self.dispatch_press(pending.index, pending.tap, store, buffer, &mut mouse_report);
                buffer = self.held.flush(buffer);
                if let Some(position) = self.pressed.iter().position(|k| k.index == pending.index)
                {
                    let key = self.pressed.swap_remove(position);
                    buffer = self.dispatch_release(key, buffer, &mut mouse_report);
                }
            } else {
                i += 1;
            }
        }

        // Releases -----------------------------------------------------------------
        let mut i = 0;
        while i < self.pressed.len() {
            if self.matrix.is_active(self.pressed[i].index) {
                i += 1;
            } else {
                let key = self.pressed.swap_remove(i);
                buffer = self.dispatch_release(key, buffer, &mut mouse_report);
            }
        }
        self.layer_holds.retain(|(index, _)| self.matrix.is_active(*index));

        // Presses ------------------------------------------------------------------
        for index in self.matrix.freshly_pressed() {
            match self.resolve(index) {
                KC::Layer(layer) => {
                    self.layer_holds.push((index, layer)).ok();
                }
                KC::LayTap(layer, tap) => {
                    self.pending
                        .push(PendingTap {
                            index,
                            layer,
                            tap: *tap,
                            ticks: 0,
                        })
                        .ok();
                }
                code => {
                    buffer = self.dispatch_press(index, code, store, buffer, &mut mouse_report);
                }
            }
        }

        // Pointer layer auto deactivation --------------------------------------------
        #[cfg(feature = "auto-pointer")]
        if self.auto_pointer.idle(ticks) {
            self.pointer_forced = false;
        }
        #[cfg(not(feature = "auto-pointer"))]
        let _ = ticks;

        // Sniping follows the pointer layer --
        let layer = self.highest_layer();
        self.pointer.set_auto_snipe(layer == LAYER_POINTER);

        buffer = self.held.flush(buffer);
        let color = self.indicator.refresh(layer);

        (buffer, mouse_report, color)
    }

    /// Trackball sample. Forces the pointer layer when the motion is large enough
    /// and the auto trigger is built in.
    pub fn pointer_motion(
        &mut self,
        x: i8,
        y: i8,
        mouse_report: &mut WheelMouseReport,
        ticks: u32,
    ) {
        #[cfg(feature = "auto-pointer")]
        if self.auto_pointer.sample(x, y, ticks) {
            self.pointer_forced = true;
        }
        #[cfg(not(feature = "auto-pointer"))]
        let _ = ticks;

        self.pointer.apply(x, y, mouse_report);
    }

    // ------------------------------------------------------------------------------
    fn layer_active(&self, layer: usize) -> bool {
        layer == LAYER_BASE
            || self.layer_holds.iter().any(|(_, l)| *l == layer)
            || (layer == LAYER_POINTER && self.pointer_forced)
    }

    fn highest_layer(&self) -> usize {
        (0..NB_LAYERS)
            .rev()
            .find(|layer| self.layer_active(*layer))
            .unwrap_or(LAYER_BASE)
    }

    fn resolve(&self, index: usize) -> KC {
        for layer in (0..NB_LAYERS).rev() {
            if !self.layer_active(layer) {
                continue;
            }
            let code = self.layers[layer][index];
            if code != KC::Transparent {
                return code;
            }
        }
        KC::None
    }

    fn shift_pressed(&self) -> bool {
        self.pressed
            .iter()
            .any(|key| matches!(key.code, KC::Shift | KC::RShift) && self.matrix.is_active(key.index))
    }

    fn dispatch_press<S: ConfigStore>(
        &mut self,
        index: usize,
        code: KC,
        store: &mut S,
        mut buffer: Buffer,
        mouse_report: &mut WheelMouseReport,
    ) -> Buffer {
        // The remapper intercepts first and short-circuits everything else --
        let (b, handled) = self
            .remap
            .process(code, true, &mut self.held, &self.composer, buffer);
        buffer = b;

        let mut emitted = code;
        let mut masked_shift = false;

        if !handled {
            match code {
                KC::ToggleOs => {
                    let mode = self.remap.toggle(store);
                    self.composer.set_mode(mode);
                    self.indicator.notify(match mode {
                        OsMode::Mac => NotifColor::Blue,
                        OsMode::Pc => NotifColor::Green,
                    });
                }
                KC::Boot => self.boot = true,
                KC::ConfigClear => self.remap.reset(store),

                KC::MouseBtLeft => mouse_report.buttons |= 0x1,
                KC::MouseBtRight => mouse_report.buttons |= 0x2,
                KC::MouseBtMiddle => mouse_report.buttons |= 0x4,

                KC::DragScroll => self.pointer.set_drag_scroll(true),
                KC::Sniping => self.pointer.set_manual_snipe(true),
                KC::DpiMod => self.pointer.dpi_cycle(),
                KC::SnipeDpiMod => self.pointer.snipe_dpi_cycle(),

                _ => {
                    let (replacement, masked) = overrides::resolve(code, self.shift_pressed());
                    if masked {
                        self.held
                            .release(&[Keyboard::LeftShift, Keyboard::RightShift]);
                    }
                    self.held.press(replacement.usb());
                    emitted = replacement;
                    masked_shift = masked;
                }
            }
        }

        self.pressed
            .push(PressedKey {
                index,
                code,
                emitted,
                masked_shift,
            })
            .ok();

        buffer
    }

    fn dispatch_release(
        &mut self,
        key: PressedKey,
        mut buffer: Buffer,
        mouse_report: &mut WheelMouseReport,
    ) -> Buffer {
        let (b, handled) =
            self.remap
                .process(key.code, false, &mut self.held, &self.composer, buffer);
        buffer = b;
        if handled {
            return buffer;
        }

        match key.code {
            // Press-only keycodes, the release phase is swallowed
            KC::ToggleOs | KC::Boot | KC::ConfigClear | KC::DpiMod | KC::SnipeDpiMod => {}

            KC::MouseBtLeft => mouse_report.buttons &= !0x1,
            KC::MouseBtRight => mouse_report.buttons &= !0x2,
            KC::MouseBtMiddle => mouse_report.buttons &= !0x4,

            KC::DragScroll => self.pointer.set_drag_scroll(false),
            KC::Sniping => self.pointer.set_manual_snipe(false),

            _ => {
                self.held.release(key.emitted.usb());
                if key.masked_shift && self.shift_pressed() {
                    self.held.press(&[Keyboard::LeftShift]);
                }
            }
        }

        buffer
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::LAYER_LOWER;
    use crate::software::actions::Action;
    use crate::software::remap::MemStore;

    const NB: usize = 8;

    #[rustfmt::skip]
    static TEST_LAYERS: [[KC; NB]; NB_LAYERS] = [
        // A       Shift      Slash      BackSpace      MO(Lower)          LT(Pointer, Z)                    ToggleOs         Act(Copy)
        [KC::A, KC::Shift, KC::Slash, KC::BackSpace, KC::Layer(LAYER_LOWER), KC::LayTap(LAYER_POINTER, &KC::Z), KC::ToggleOs, KC::Act(Action::Copy)],
        [KC::Num1, KC::Transparent, KC::None, KC::Transparent, KC::None, KC::Transparent, KC::Transparent, KC::Undo],
        [KC::None; NB],
        [KC::MouseBtLeft, KC::DragScroll, KC::None, KC::None, KC::None, KC::Transparent, KC::None, KC::DpiMod],
    ];

    fn orbit(raw: u32) -> (Orbit<NB>, MemStore) {
        let mut store = MemStore::new(raw);
        let orbit = Orbit::new(&TEST_LAYERS, &mut store, 0);
        (orbit, store)
    }

    fn scan(
        orbit: &mut Orbit<NB>,
        store: &mut MemStore,
        active: &[u8],
        ticks: u32,
    ) -> (Buffer, WheelMouseReport, LedColor) {
        let mut indexes: Vec<u8, 16> = Vec::new();
        indexes.extend(active.iter().copied());
        orbit.update_matrix(indexes, ticks);
        orbit.run(store, Buffer::new(), WheelMouseReport::default(), ticks)
    }

    fn last_report(buffer: &Buffer) -> heapless::Vec<Keyboard, 12> {
        buffer.keys.back().unwrap().key_code.clone()
    }

    #[test]
    fn base_key_goes_down_then_up() {
        let (mut orbit, mut store) = orbit(0);

        let (buffer, ..) = scan(&mut orbit, &mut store, &[0], 1);
        assert_eq!(last_report(&buffer).as_slice(), &[Keyboard::A]);

        let (buffer, ..) = scan(&mut orbit, &mut store, &[], 2);
        assert_eq!(
            last_report(&buffer).as_slice(),
            &[Keyboard::NoEventIndicated]
        );
    }

    #[test]
    fn momentary_layer_remaps_while_held() {
        let (mut orbit, mut store) = orbit(0);

        scan(&mut orbit, &mut store, &[4], 1);
        let (buffer, _, color) = scan(&mut orbit, &mut store, &[4, 0], 2);
        assert_eq!(last_report(&buffer).as_slice(), &[Keyboard::Keyboard1]);
        assert_eq!(color, LedColor::Red);

        // Layer released, base again
        scan(&mut orbit, &mut store, &[], 3);
        let (buffer, ..) = scan(&mut orbit, &mut store, &[0], 4);
        assert_eq!(last_report(&buffer).as_slice(), &[Keyboard::A]);
    }

    #[test]
    fn transparent_falls_through_to_base() {
        let (mut orbit, mut store) = orbit(0);

        scan(&mut orbit, &mut store, &[4], 1);
        let (buffer, ..) = scan(&mut orbit, &mut store, &[4, 1], 2);
        assert_eq!(last_report(&buffer).as_slice(), &[Keyboard::LeftShift]);
    }

    #[test]
    fn shift_backspace_sends_delete_with_shift_masked() {
        let (mut orbit, mut store) = orbit(0);

        scan(&mut orbit, &mut store, &[1], 1);
        let (buffer, ..) = scan(&mut orbit, &mut store, &[1, 3], 2);
        let report = last_report(&buffer);
        assert!(report.contains(&Keyboard::DeleteForward));
        assert!(!report.contains(&Keyboard::LeftShift));

        // Backspace released, the still held shift comes back
        let (buffer, ..) = scan(&mut orbit, &mut store, &[1], 3);
        assert_eq!(last_report(&buffer).as_slice(), &[Keyboard::LeftShift]);
    }

    #[test]
    fn bare_slash_types_a_question_mark() {
        let (mut orbit, mut store) = orbit(0);

        let (buffer, ..) = scan(&mut orbit, &mut store, &[2], 1);
        assert_eq!(
            last_report(&buffer).as_slice(),
            &[Keyboard::LeftShift, Keyboard::ForwardSlash]
        );
    }

    #[test]
    fn layer_tap_types_the_letter_on_a_quick_tap() {
        let (mut orbit, mut store) = orbit(0);

        let (buffer, ..) = scan(&mut orbit, &mut store, &[5], 1);
        assert!(buffer.keys.is_empty());

        let (buffer, ..) = scan(&mut orbit, &mut store, &[], 10);
        let reports: heapless::Vec<_, 8> = buffer.keys.iter().collect();
        assert_eq!(reports[0].key_code.as_slice(), &[Keyboard::Z]);
        assert_eq!(
            reports.last().unwrap().key_code.as_slice(),
            &[Keyboard::NoEventIndicated]
        );
    }

    #[test]
    fn layer_tap_held_activates_the_pointer_layer() {
        let (mut orbit, mut store) = orbit(0);

        scan(&mut orbit, &mut store, &[5], 1);
        let (_, _, color) = scan(&mut orbit, &mut store, &[5], HOLD_TIME + 2);
        assert_eq!(color, LedColor::Magenta);
        assert!(orbit.pointer.sniping());

        // Mouse button lives on the pointer layer
        let (_, mouse, _) = scan(&mut orbit, &mut store, &[5, 0], HOLD_TIME + 3);
        assert_eq!(mouse.buttons, 0x1);
    }

    #[test]
    fn os_toggle_swallows_its_release_and_notifies() {
        let (mut orbit, mut store) = orbit(0);

        let (buffer, _, color) = scan(&mut orbit, &mut store, &[6], 1);
        assert_eq!(orbit.os_mode(), OsMode::Pc);
        assert_eq!(store.raw, 1);
        assert_eq!(store.writes, 1);
        assert_eq!(color, LedColor::Green);
        assert!(buffer.keys.is_empty());

        // Release produces nothing
        let (buffer, ..) = scan(&mut orbit, &mut store, &[], 2);
        assert!(buffer.keys.is_empty());

        // Back to Mac, blue feedback
        let (_, _, color) = scan(&mut orbit, &mut store, &[6], 3);
        assert_eq!(orbit.os_mode(), OsMode::Mac);
        assert_eq!(store.raw, 0);
        assert_eq!(color, LedColor::Blue);
    }

    #[test]
    fn action_key_survives_an_os_switch_between_press_and_release() {
        let (mut orbit, mut store) = orbit(0);

        let (buffer, ..) = scan(&mut orbit, &mut store, &[7], 1);
        assert_eq!(
            last_report(&buffer).as_slice(),
            &[Keyboard::LeftGUI, Keyboard::C]
        );

        // Toggle while copy is held
        scan(&mut orbit, &mut store, &[7, 6], 2);
        assert_eq!(orbit.os_mode(), OsMode::Pc);

        // The Mac chord goes up, no PC leftovers
        let (buffer, ..) = scan(&mut orbit, &mut store, &[], 3);
        assert_eq!(
            last_report(&buffer).as_slice(),
            &[Keyboard::NoEventIndicated]
        );
    }

    #[test]
    fn alias_on_a_layer_resolves_through_the_remapper() {
        let (mut orbit, mut store) = orbit(0);

        scan(&mut orbit, &mut store, &[4], 1);
        let (buffer, ..) = scan(&mut orbit, &mut store, &[4, 7], 2);
        assert_eq!(
            last_report(&buffer).as_slice(),
            &[Keyboard::LeftGUI, Keyboard::Z]
        );
    }

    #[cfg(feature = "auto-pointer")]
    #[test]
    fn trackball_motion_forces_the_pointer_layer_until_idle() {
        use crate::options::{TRIGGER_THRESHOLD, TRIGGER_TIMEOUT_MS};

        let (mut orbit, mut store) = orbit(0);
        let mut mouse = WheelMouseReport::default();

        orbit.pointer_motion(TRIGGER_THRESHOLD + 1, 0, &mut mouse, 10);
        let (_, _, color) = scan(&mut orbit, &mut store, &[], 11);
        assert_eq!(color, LedColor::Magenta);

        // Still on while motion continues
        orbit.pointer_motion(TRIGGER_THRESHOLD + 1, 0, &mut mouse, 500);
        let (_, _, color) = scan(&mut orbit, &mut store, &[], TRIGGER_TIMEOUT_MS);
        assert_eq!(color, LedColor::Magenta);

        // Off after the idle timeout
        let (_, _, color) = scan(&mut orbit, &mut store, &[], 500 + TRIGGER_TIMEOUT_MS);
        assert_eq!(color, LedColor::None);
    }
}
