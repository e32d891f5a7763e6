use crate::layouts::{LAYER_LOWER, LAYER_POINTER, LAYER_RAISE};
use crate::options::NOTIFICATION_REFRESHES;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LedColor {
    None,
    Red,
    Orange,
    Magenta,
    Blue,
    Green,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NotifColor {
    None,
    Blue,
    Green,
}

/// Transient feedback painted over the per layer colors.
/// A notification survives a fixed number of refreshes then the layers win again.
pub struct Indicator {
    notification: NotifColor,
    remaining: u32,
}

impl Indicator {
    pub fn new() -> Self {
        Indicator {
            notification: NotifColor::None,
            remaining: 0,
        }
    }

    pub fn notify(&mut self, color: NotifColor) {
        self.notification = color;
        self.remaining = NOTIFICATION_REFRESHES;
    }

    /// Called once per refresh, the notification decays here.
    pub fn refresh(&mut self, highest_layer: usize) -> LedColor {
        if self.remaining == 0 {
            self.notification = NotifColor::None;
        } else {
            self.remaining -= 1;
        }

        match self.notification {
            NotifColor::Blue => LedColor::Blue,
            NotifColor::Green => LedColor::Green,
            NotifColor::None => match highest_layer {
                LAYER_LOWER => LedColor::Red,
                LAYER_RAISE => LedColor::Orange,
                LAYER_POINTER => LedColor::Magenta,
                _ => LedColor::None,
            },
        }
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Indicator::new()
    }
}

// --------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::LAYER_BASE;

    #[test]
    fn layers_pick_the_color_without_notification() {
        let mut indicator = Indicator::new();
        assert_eq!(indicator.refresh(LAYER_BASE), LedColor::None);
        assert_eq!(indicator.refresh(LAYER_LOWER), LedColor::Red);
        assert_eq!(indicator.refresh(LAYER_RAISE), LedColor::Orange);
        assert_eq!(indicator.refresh(LAYER_POINTER), LedColor::Magenta);
    }

    #[test]
    fn notification_decays_after_the_exact_refresh_count() {
        let mut indicator = Indicator::new();
        indicator.notify(NotifColor::Green);

        for _ in 0..NOTIFICATION_REFRESHES {
            assert_eq!(indicator.refresh(LAYER_BASE), LedColor::Green);
        }
        assert_eq!(indicator.refresh(LAYER_BASE), LedColor::None);
    }

    #[test]
    fn notification_wins_over_the_layer_color() {
        let mut indicator = Indicator::new();
        indicator.notify(NotifColor::Blue);
        assert_eq!(indicator.refresh(LAYER_POINTER), LedColor::Blue);
    }
}
