#![cfg_attr(rustfmt, rustfmt_skip)]
use crate::options::NB_LAYERS;
use crate::software::actions::Action;
use crate::software::keys::KC;

use super::{LAYER_LOWER, LAYER_POINTER, LAYER_RAISE};

/// 4x6 board, the layout indexes:
///
/// 00  01  02  03  04  05    |    06  07  08  09  10  11
/// 12  13  14  15  16  17    |    18  19  20  21  22  23
/// 24  25  26  27  28  29    |    30  31  32  33  34  35
/// 36  37  38  39  40  41    |    42  43  44  45  46  47
///              48  49  50   |    51  52
///                  53  54   |    55
pub const NB_KEYS: usize = 56;

pub static LAYERS: [[KC; NB_KEYS]; NB_LAYERS] = [
    // Base ----------------------------------------------------------------------------
    [
        KC::Esc,   KC::Num1,                          KC::Num2, KC::Num3,  KC::Num4,  KC::Num5,      KC::Num6, KC::Num7, KC::Num8,  KC::Num9, KC::Num0,                              KC::Minus,
        KC::Tab,   KC::Q,                             KC::W,    KC::E,     KC::R,     KC::T,         KC::Y,    KC::U,    KC::I,     KC::O,    KC::P,                                 KC::Backslash,
        KC::Shift, KC::A,                             KC::S,    KC::D,     KC::F,     KC::G,         KC::H,    KC::J,    KC::K,     KC::L,    KC::SemiColon,                         KC::Quote,
        KC::Ctrl,  KC::LayTap(LAYER_POINTER, &KC::Z), KC::X,    KC::C,     KC::V,     KC::B,         KC::N,    KC::M,    KC::Comma, KC::Dot,  KC::LayTap(LAYER_POINTER, &KC::Slash), KC::Alt,
                                                 KC::Gui, KC::Space, KC::Layer(LAYER_LOWER),         KC::Layer(LAYER_RAISE), KC::Enter,
                                                              KC::Alt, KC::BackSpace,                KC::Del,
    ],
    // Lower ---------------------------------------------------------------------------
    // The editing row uses the standard usages, the remapper aliases them
    [
        KC::Tilde, KC::Exclaim,        KC::At,          KC::Hash,          KC::Dollar,         KC::Percentage,      KC::Circumflex,  KC::Ampersand, KC::Asterix, KC::LeftParent, KC::RightParent,  KC::Underscore,
        KC::None,  KC::Act(Action::TabPrev), KC::Act(Action::TabNew), KC::Act(Action::TabClose), KC::Act(Action::TabNext), KC::None,  KC::LeftBracket, KC::Num7,      KC::Num8,    KC::Num9,       KC::RightBracket, KC::None,
        KC::None,  KC::Gui,            KC::Alt,         KC::Ctrl,          KC::Shift,          KC::None,            KC::Plus,        KC::Num4,      KC::Num5,    KC::Num6,       KC::Minus,        KC::Equal,
        KC::None,  KC::Undo,           KC::Cut,         KC::Copy,          KC::Paste,          KC::None,            KC::Asterix,     KC::Num1,      KC::Num2,    KC::Num3,       KC::Slash,        KC::Dot,
                                                              KC::None, KC::None, KC::Transparent,                  KC::None, KC::Transparent,
                                                                            KC::None, KC::None,                     KC::Num0,
    ],
    // Raise ---------------------------------------------------------------------------
    [
        KC::F12,      KC::F1,   KC::F2,     KC::F3,       KC::F4,    KC::F5,        KC::F6,   KC::F7,                   KC::F8,                   KC::F9,                          KC::F10,                         KC::F11,
        KC::Mute,     KC::None, KC::None,   KC::None,     KC::None,  KC::None,      KC::None, KC::Act(Action::WordPrev), KC::Act(Action::WordNext), KC::None,                       KC::None,                        KC::VolUp,
        KC::None,     KC::Left, KC::Up,     KC::Down,     KC::Right, KC::None,      KC::None, KC::RShift,               KC::RCtrl,                KC::RAlt,                        KC::RGui,                        KC::VolDown,
        KC::ToggleOs, KC::Home, KC::PageUp, KC::PageDown, KC::End,   KC::None,      KC::None, KC::Act(Action::Back),    KC::Act(Action::Forward), KC::Act(Action::WordDeletePrev), KC::Act(Action::WordDeleteNext), KC::None,
                                   KC::Transparent, KC::Transparent, KC::None,      KC::Transparent, KC::None,
                                           KC::Transparent, KC::Transparent,        KC::None,
    ],
    // Pointer -------------------------------------------------------------------------
    [
        KC::None, KC::None,        KC::None,       KC::None,    KC::None,        KC::None,             KC::None,        KC::None,        KC::None,    KC::None,       KC::None,        KC::None,
        KC::None, KC::None,        KC::None,       KC::None,    KC::DpiMod,      KC::SnipeDpiMod,      KC::SnipeDpiMod, KC::DpiMod,      KC::None,    KC::None,       KC::None,        KC::None,
        KC::None, KC::Gui,         KC::Alt,        KC::Ctrl,    KC::Shift,       KC::None,             KC::None,        KC::RShift,      KC::RCtrl,   KC::RAlt,       KC::RGui,        KC::None,
        KC::None, KC::Transparent, KC::DragScroll, KC::Sniping, KC::ConfigClear, KC::Boot,             KC::Boot,        KC::ConfigClear, KC::Sniping, KC::DragScroll, KC::Transparent, KC::None,
                                   KC::MouseBtRight, KC::MouseBtLeft, KC::MouseBtMiddle,               KC::MouseBtMiddle, KC::MouseBtLeft,
                                                         KC::None, KC::MouseBtRight,                   KC::MouseBtRight,
    ],
];
