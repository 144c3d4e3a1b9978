//! Type-safe key bindings.
//!
//! A [`Binding`] groups the key presses that trigger one action together
//! with the help text shown for it. Component key maps are plain structs of
//! bindings that implement [`KeyMap`] so help views can list them.
//!
//! ```rust
//! use bubbletea_virtual_scroll::key::Binding;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let down = Binding::new(vec![KeyCode::Down, KeyCode::Char('j')]).with_help("↓/j", "down");
//! let half = Binding::new(vec!["d", "ctrl+d"]).with_help("d/ctrl+d", "½ page down");
//! let save = Binding::new(vec![(KeyCode::Char('s'), KeyModifiers::CONTROL)]);
//!
//! assert_eq!(down.help().key, "↓/j");
//! assert_eq!(half.keys().len(), 2);
//! assert!(save.enabled());
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifiers held while pressing it.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl From<&str> for KeyPress {
    /// Parses strings such as `"j"`, `"pgdown"`, `"ctrl+d"` or `"shift+g"`.
    ///
    /// Unknown names map to `KeyCode::Null`, which never matches real input.
    fn from(s: &str) -> Self {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s;
        loop {
            if let Some(r) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("shift+") {
                modifiers |= KeyModifiers::SHIFT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" => KeyCode::PageUp,
            "pgdown" => KeyCode::PageDown,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => KeyCode::Null,
                }
            }
        };

        Self { code, modifiers }
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short rendering of the keys, e.g. `"↑/k"`.
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

/// A set of key presses mapped to one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible into key presses.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding is active and has keys.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// The key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// The help text of this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Returns `true` if the key message triggers this binding.
    ///
    /// `SHIFT` is ignored for character keys since terminals already report
    /// the shifted character (`G` rather than `shift+g`).
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if !self.enabled() {
            return false;
        }
        self.keys.iter().any(|press| {
            if press.code != msg.key {
                return false;
            }
            match press.code {
                KeyCode::Char(_) => {
                    press.modifiers - KeyModifiers::SHIFT == msg.modifiers - KeyModifiers::SHIFT
                }
                _ => press.modifiers == msg.modifiers,
            }
        })
    }
}

/// Key maps that can describe themselves for help views.
pub trait KeyMap {
    /// Bindings shown in the compact, single-line help.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings grouped into columns for the expanded help.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Returns `true` if any of the bindings matches the key message.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|binding| binding.matches(msg))
}
