use usbd_human_interface_device::device::mouse::WheelMouseReport;

use crate::options::{
    DRAG_SCROLL_DIVISOR, POINTER_DPI, POINTER_DPI_DEFAULT, SNIPING_DIVISORS,
    SNIPING_DIVISOR_DEFAULT, TRIGGER_THRESHOLD, TRIGGER_TIMEOUT_MS,
};

/// Shapes the raw trackball deltas into the mouse report.
/// Sniping follows the pointer layer automatically, drag scroll and the manual
/// sniping key are momentary.
pub struct Pointer {
    dpi_index: usize,
    snipe_index: usize,
    auto_snipe: bool,
    manual_snipe: bool,
    drag_scroll: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Pointer {
            dpi_index: POINTER_DPI_DEFAULT,
            snipe_index: SNIPING_DIVISOR_DEFAULT,
            auto_snipe: false,
            manual_snipe: false,
            drag_scroll: false,
        }
    }

    pub fn dpi_cycle(&mut self) {
        self.dpi_index = (self.dpi_index + 1) % POINTER_DPI.len();
    }

    pub fn snipe_dpi_cycle(&mut self) {
        self.snipe_index = (self.snipe_index + 1) % SNIPING_DIVISORS.len();
    }

    pub fn set_auto_snipe(&mut self, active: bool) {
        self.auto_snipe = active;
    }

    pub fn set_manual_snipe(&mut self, active: bool) {
        self.manual_snipe = active;
    }

    pub fn set_drag_scroll(&mut self, active: bool) {
        self.drag_scroll = active;
    }

    pub fn sniping(&self) -> bool {
        self.auto_snipe || self.manual_snipe
    }

    pub fn apply(&self, x: i8, y: i8, report: &mut WheelMouseReport) {
        if self.drag_scroll {
            // Wheel ticks, vertical axis reversed
            let h = i16::from(x) / DRAG_SCROLL_DIVISOR;
            let v = -i16::from(y) / DRAG_SCROLL_DIVISOR;
            report.horizontal_wheel = clamp_i8(i16::from(report.horizontal_wheel) + h);
            report.vertical_wheel = clamp_i8(i16::from(report.vertical_wheel) + v);
        } else if self.sniping() {
            let divisor = SNIPING_DIVISORS[self.snipe_index];
            report.x = clamp_i8(i16::from(report.x) + i16::from(x) / divisor);
            report.y = clamp_i8(i16::from(report.y) + i16::from(y) / divisor);
        } else {
            let factor = POINTER_DPI[self.dpi_index];
            report.x = clamp_i8(i16::from(report.x) + i16::from(x) * factor);
            report.y = clamp_i8(i16::from(report.y) + i16::from(y) * factor);
        }
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Pointer::new()
    }
}

fn clamp_i8(value: i16) -> i8 {
    value.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
}

// --------------------------------------------------------------------------------------
/// Forces the pointer layer while the ball is moving.
///
/// {off} --(motion over threshold)--> {on, timer rearmed}
/// {on}  --(motion over threshold)--> {on, timer rearmed}
/// {on}  --(idle past the timeout)--> {off}
pub struct AutoPointer {
    armed: bool,
    last_motion: u32,
}

impl AutoPointer {
    pub fn new() -> Self {
        AutoPointer {
            armed: false,
            last_motion: 0,
        }
    }

    /// True when the layer has to turn on now.
    pub fn sample(&mut self, x: i8, y: i8, ticks: u32) -> bool {
        if x.saturating_abs() <= TRIGGER_THRESHOLD && y.saturating_abs() <= TRIGGER_THRESHOLD {
            return false;
        }

        let fresh = !self.armed;
        self.armed = true;
        self.last_motion = ticks;
        fresh
    }

    /// True when the layer has to turn off now.
    pub fn idle(&mut self, ticks: u32) -> bool {
        if self.armed && ticks.wrapping_sub(self.last_motion) >= TRIGGER_TIMEOUT_MS {
            self.armed = false;
            return true;
        }
        false
    }
}

impl Default for AutoPointer {
    fn default() -> Self {
        AutoPointer::new()
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_turns_on_at_threshold_crossing_only() {
        let mut auto_pointer = AutoPointer::new();
        assert!(!auto_pointer.sample(3, -3, 0));
        assert!(auto_pointer.sample(0, 12, 10));
        // Already on, keeps feeding the timer without retriggering
        assert!(!auto_pointer.sample(-20, 0, 20));
    }

    #[test]
    fn layer_stays_on_while_motion_continues() {
        let mut auto_pointer = AutoPointer::new();
        auto_pointer.sample(10, 0, 0);

        auto_pointer.sample(10, 0, TRIGGER_TIMEOUT_MS - 10);
        assert!(!auto_pointer.idle(TRIGGER_TIMEOUT_MS + 10));

        assert!(auto_pointer.idle(2 * TRIGGER_TIMEOUT_MS));
        // Off is off, no second notification
        assert!(!auto_pointer.idle(3 * TRIGGER_TIMEOUT_MS));
    }

    #[test]
    fn sniping_divides_and_dpi_multiplies() {
        let mut pointer = Pointer::new();
        let mut report = WheelMouseReport::default();

        pointer.apply(10, -10, &mut report);
        assert_eq!(
            (report.x, report.y),
            (10 * POINTER_DPI[POINTER_DPI_DEFAULT] as i8, -10 * POINTER_DPI[POINTER_DPI_DEFAULT] as i8)
        );

        report = WheelMouseReport::default();
        pointer.set_auto_snipe(true);
        pointer.apply(10, -10, &mut report);
        let divisor = SNIPING_DIVISORS[SNIPING_DIVISOR_DEFAULT];
        assert_eq!((report.x, report.y), (10 / divisor as i8, -10 / divisor as i8));
    }

    #[test]
    fn drag_scroll_turns_motion_into_wheel_with_reversed_y() {
        let mut pointer = Pointer::new();
        let mut report = WheelMouseReport::default();

        pointer.set_drag_scroll(true);
        pointer.apply(16, 16, &mut report);
        assert_eq!((report.x, report.y), (0, 0));
        assert_eq!(report.horizontal_wheel, 2);
        assert_eq!(report.vertical_wheel, -2);
    }
}
