//! Per-tick input snapshot and button-to-action mapping

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Hardware buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    A = 0,
    B,
    X,
    Y,
    L,
    R,
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Button; 12] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::L,
        Button::R,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Start,
        Button::Select,
    ];

    #[inline]
    const fn bit(self) -> u16 {
        1 << self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::L => "L",
            Button::R => "R",
            Button::Up => "Up",
            Button::Down => "Down",
            Button::Left => "Left",
            Button::Right => "Right",
            Button::Start => "Start",
            Button::Select => "Select",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

/// Set of buttons, one bit per button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSet(u16);

impl ButtonSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, button: Button) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Screen coordinates of a touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Input polled for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Buttons that went down this tick
    pub pressed: ButtonSet,
    /// Held buttons whose auto-repeat fired this tick
    pub repeat: ButtonSet,
    /// Touch that started this tick
    pub touch: Option<TouchPoint>,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn press(button: Button) -> Self {
        Self {
            pressed: ButtonSet::empty().with(button),
            ..Self::default()
        }
    }

    pub fn tap(x: i32, y: i32) -> Self {
        Self {
            touch: Some(TouchPoint::new(x, y)),
            ..Self::default()
        }
    }
}

/// Button-driven actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Back,
    ToggleViews,
    Accept,
    Cancel,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Parent,
}

impl Action {
    pub const APP_BACK: &'static str = "app.back";
    pub const APP_TOGGLE_VIEWS: &'static str = "app.toggle_views";
    pub const DIALOG_ACCEPT: &'static str = "dialog.accept";
    pub const DIALOG_CANCEL: &'static str = "dialog.cancel";
    pub const NAV_SCROLL_UP: &'static str = "nav.scroll_up";
    pub const NAV_SCROLL_DOWN: &'static str = "nav.scroll_down";
    pub const NAV_PAGE_UP: &'static str = "nav.page_up";
    pub const NAV_PAGE_DOWN: &'static str = "nav.page_down";
    pub const NAV_PARENT: &'static str = "nav.parent";

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            Self::APP_BACK => Some(Action::Back),
            Self::APP_TOGGLE_VIEWS => Some(Action::ToggleViews),
            Self::DIALOG_ACCEPT => Some(Action::Accept),
            Self::DIALOG_CANCEL => Some(Action::Cancel),
            Self::NAV_SCROLL_UP => Some(Action::ScrollUp),
            Self::NAV_SCROLL_DOWN => Some(Action::ScrollDown),
            Self::NAV_PAGE_UP => Some(Action::PageUp),
            Self::NAV_PAGE_DOWN => Some(Action::PageDown),
            Self::NAV_PARENT => Some(Action::Parent),
            _ => None,
        }
    }

    /// Fires again while the button is held
    pub fn repeats(self) -> bool {
        matches!(
            self,
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown
        )
    }
}

/// Maps buttons to actions using the configured keybindings
#[derive(Debug, Clone)]
pub struct InputMap {
    bindings: HashMap<Button, Action>,
}

impl InputMap {
    /// Create from bindings (action id -> button names)
    pub fn new(bindings: &HashMap<String, Vec<String>>) -> Self {
        // Invert the bindings map: action -> buttons becomes button -> action.
        // Ids go in sorted order; the first action bound to a button wins.
        let mut button_to_action = HashMap::new();
        let mut ids: Vec<&String> = bindings.keys().collect();
        ids.sort();

        for id in ids {
            let Some(action) = Action::from_id(id) else {
                tracing::warn!("Unknown action in keybindings: {}", id);
                continue;
            };
            for name in &bindings[id] {
                let Some(button) = Button::from_name(name) else {
                    tracing::warn!("Unknown button '{}' bound to {}", name, id);
                    continue;
                };
                match button_to_action.entry(button) {
                    Entry::Vacant(slot) => {
                        slot.insert(action);
                    }
                    Entry::Occupied(slot) => tracing::warn!(
                        "Button '{}' already bound to {:?}, ignoring {}",
                        name,
                        slot.get(),
                        id
                    ),
                }
            }
        }

        Self {
            bindings: button_to_action,
        }
    }

    pub fn action_for(&self, button: Button) -> Option<Action> {
        self.bindings.get(&button).copied()
    }

    /// Actions triggered by this tick's buttons, in button order
    pub fn actions(&self, input: &InputSnapshot) -> Vec<Action> {
        let mut actions = Vec::new();

        for button in input.pressed.union(input.repeat).iter() {
            let Some(action) = self.action_for(button) else {
                continue;
            };
            let fired = input.pressed.contains(button) || action.repeats();
            if fired && !actions.contains(&action) {
                actions.push(action);
            }
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppConfig;

    #[test]
    fn test_default_bindings() {
        let map = InputMap::new(&AppConfig::default().keybindings);
        assert_eq!(map.action_for(Button::B), Some(Action::Back));
        assert_eq!(map.action_for(Button::Select), Some(Action::ToggleViews));
        assert_eq!(map.action_for(Button::Y), None);
    }

    #[test]
    fn test_repeat_only_fires_repeatable_actions() {
        let map = InputMap::new(&AppConfig::default().keybindings);
        let input = InputSnapshot {
            pressed: ButtonSet::empty(),
            repeat: [Button::Down, Button::A].into_iter().collect(),
            touch: None,
        };
        assert_eq!(map.actions(&input), vec![Action::ScrollDown]);

        let input = InputSnapshot {
            pressed: ButtonSet::empty().with(Button::A),
            repeat: ButtonSet::empty().with(Button::A),
            touch: None,
        };
        assert_eq!(map.actions(&input), vec![Action::Accept]);
    }

    #[test]
    fn test_doubly_bound_button_keeps_first_sorted_action() {
        let mut bindings = HashMap::new();
        bindings.insert("nav.scroll_down".to_string(), vec!["A".to_string()]);
        bindings.insert("dialog.accept".to_string(), vec!["A".to_string()]);
        bindings.insert("nav.parent".to_string(), vec!["Left".to_string(), "A".to_string()]);

        let map = InputMap::new(&bindings);
        assert_eq!(map.action_for(Button::A), Some(Action::Accept));
        assert_eq!(map.action_for(Button::Left), Some(Action::Parent));
    }

    #[test]
    fn test_button_names_are_case_insensitive() {
        assert_eq!(Button::from_name("select"), Some(Button::Select));
        assert_eq!(Button::from_name("Touch"), None);
    }
}
