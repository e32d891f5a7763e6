#![cfg_attr(rustfmt, rustfmt_skip)]
use crate::options::NB_LAYERS;
use crate::software::actions::Action;
use crate::software::keys::KC;

use super::{LAYER_LOWER, LAYER_POINTER, LAYER_RAISE};

/// 3x5 board, the layout indexes:
///
/// 00  01  02  03  04    |    05  06  07  08  09
/// 10  11  12  13  14    |    15  16  17  18  19
/// 20  21  22  23  24    |    25  26  27  28  29
///         30  31  32    |    33  34
pub const NB_KEYS: usize = 35;

pub static LAYERS: [[KC; NB_KEYS]; NB_LAYERS] = [
    // Base ----------------------------------------------------------------------------
    [
        KC::Q,                             KC::W, KC::E, KC::R, KC::T,         KC::Y, KC::U, KC::I,     KC::O,   KC::P,
        KC::A,                             KC::S, KC::D, KC::F, KC::G,         KC::H, KC::J, KC::K,     KC::L,   KC::SemiColon,
        KC::LayTap(LAYER_POINTER, &KC::Z), KC::X, KC::C, KC::V, KC::B,         KC::N, KC::M, KC::Comma, KC::Dot, KC::LayTap(LAYER_POINTER, &KC::Slash),
                        KC::Shift, KC::Space, KC::Layer(LAYER_LOWER),          KC::Layer(LAYER_RAISE), KC::Enter,
    ],
    // Lower ---------------------------------------------------------------------------
    [
        KC::Esc,               KC::Act(Action::TabPrev), KC::Act(Action::TabNew), KC::Act(Action::TabClose), KC::Act(Action::TabNext),      KC::Act(Action::Back),           KC::Act(Action::WordPrev), KC::Up,   KC::Act(Action::WordNext), KC::Act(Action::Forward),
        KC::Tab,               KC::Gui,                  KC::Alt,                 KC::Ctrl,                  KC::Shift,                     KC::Act(Action::WordDeletePrev), KC::Left,                  KC::Down, KC::Right,                 KC::Act(Action::WordDeleteNext),
        KC::Act(Action::Undo), KC::Act(Action::Cut),     KC::Act(Action::Copy),   KC::Act(Action::Paste),    KC::Act(Action::Redo),         KC::BackSpace,                   KC::Del,                   KC::Act(Action::Save), KC::Act(Action::Find), KC::Act(Action::SelectAll),
                                     KC::Transparent, KC::Transparent, KC::Transparent,                      KC::Transparent, KC::Transparent,
    ],
    // Raise ---------------------------------------------------------------------------
    [
        KC::Num1,                     KC::Num2,               KC::Num3,                  KC::Num4,               KC::Num5,          KC::Num6,  KC::Num7,  KC::Num8,        KC::Num9,         KC::Num0,
        KC::Act(Action::UcADiaeresis), KC::Act(Action::UcARing), KC::Act(Action::UcODiaeresis), KC::Act(Action::UcUDiaeresis), KC::None,   KC::Minus, KC::Equal, KC::LeftBracket, KC::RightBracket, KC::Backslash,
        KC::Act(Action::LockDesktop), KC::Act(Action::ZoomOut), KC::Act(Action::ZoomReset), KC::Act(Action::ZoomIn), KC::ToggleOs,    KC::Grave, KC::Quote, KC::Comma,       KC::Dot,          KC::Slash,
                                     KC::Transparent, KC::Transparent, KC::Transparent,            KC::Transparent, KC::Transparent,
    ],
    // Pointer -------------------------------------------------------------------------
    [
        KC::None,        KC::None,       KC::None,    KC::DpiMod,      KC::SnipeDpiMod,      KC::SnipeDpiMod, KC::DpiMod,      KC::None,    KC::None,       KC::None,
        KC::None,        KC::Gui,        KC::Alt,     KC::Ctrl,        KC::Shift,            KC::None,        KC::RShift,      KC::RCtrl,   KC::RAlt,       KC::RGui,
        KC::Transparent, KC::DragScroll, KC::Sniping, KC::ConfigClear, KC::Boot,             KC::Boot,        KC::ConfigClear, KC::Sniping, KC::DragScroll, KC::Transparent,
                          KC::MouseBtRight, KC::MouseBtLeft, KC::MouseBtMiddle,              KC::MouseBtLeft, KC::MouseBtRight,
    ],
];
