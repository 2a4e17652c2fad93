//! Keystroke dispatch for the launcher window.

use crate::config::Entry;

/// Name of the escape key as reported by the toolkit.
pub const ESCAPE: &str = "escape";

/// A keystroke stripped of toolkit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress<'a> {
    /// Key name, e.g. `"m"` or `"escape"`.
    pub key: &'a str,
    /// Text produced by the key, if any (`"M"` with shift held).
    pub text: Option<&'a str>,
    /// Control, alt or platform modifier held.
    pub modified: bool,
}

impl<'a> KeyPress<'a> {
    pub fn new(key: &'a str, text: Option<&'a str>) -> Self {
        Self {
            key,
            text,
            modified: false,
        }
    }

    pub fn escape() -> Self {
        Self::new(ESCAPE, None)
    }

    pub fn with_modifiers(mut self, modified: bool) -> Self {
        self.modified = modified;
        self
    }

    /// The single lower-cased character this press types, if any.
    fn trigger(&self) -> Option<char> {
        let text = match self.text {
            Some(text) if !text.is_empty() => text,
            _ => self.key,
        };
        let mut chars = text.chars();
        let c = chars.next()?;
        if chars.next().is_some() || c.is_control() {
            return None;
        }
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => Some(l),
            _ => Some(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherState {
    Open,
    Terminated,
}

/// What the window should do with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction<'a> {
    /// Close without launching anything.
    Cancel,
    /// Close and run the entry's command.
    Launch(&'a Entry),
    /// Not ours; let default handling see it.
    Ignore,
}

/// Two-state machine mapping keystrokes to actions. Single use: once a
/// terminal action has been produced every further key is ignored.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    entries: Vec<Entry>,
    state: LauncherState,
}

impl Dispatcher {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            state: LauncherState::Open,
        }
    }

    pub fn state(&self) -> LauncherState {
        self.state
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn dispatch(&mut self, press: KeyPress<'_>) -> KeyAction<'_> {
        if self.state == LauncherState::Terminated {
            return KeyAction::Ignore;
        }

        if press.key == ESCAPE {
            self.state = LauncherState::Terminated;
            return KeyAction::Cancel;
        }

        if press.modified {
            return KeyAction::Ignore;
        }

        let Some(trigger) = press.trigger() else {
            return KeyAction::Ignore;
        };

        match self.entries.iter().find(|entry| entry.key == trigger) {
            Some(entry) => {
                self.state = LauncherState::Terminated;
                KeyAction::Launch(entry)
            }
            None => KeyAction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::LaunchCommand;
    use std::path::PathBuf;

    fn entry(key: char, name: &str, argv: &[&str]) -> Entry {
        Entry {
            key,
            name: name.to_string(),
            icon: PathBuf::from(format!("{name}.png")),
            command: LaunchCommand::new(argv[0], argv[1..].iter().copied()),
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(vec![
            entry('m', "Messages", &["open", "-a", "Messages"]),
            entry('w', "WhatsApp", &["open", "-a", "WhatsApp"]),
        ])
    }

    #[test]
    fn test_uppercase_launches_folded_key() {
        let mut d = dispatcher();
        match d.dispatch(KeyPress::new("m", Some("M"))) {
            KeyAction::Launch(e) => {
                assert_eq!(e.key, 'm');
                assert_eq!(e.command, LaunchCommand::new("open", ["-a", "Messages"]));
            }
            other => panic!("expected launch, got {:?}", other),
        }
        assert_eq!(d.state(), LauncherState::Terminated);
    }

    #[test]
    fn test_unknown_key_stays_open() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(KeyPress::new("x", Some("x"))), KeyAction::Ignore);
        assert_eq!(d.dispatch(KeyPress::new("f1", None)), KeyAction::Ignore);
        assert_eq!(d.state(), LauncherState::Open);
    }

    #[test]
    fn test_escape_cancels() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(KeyPress::escape()), KeyAction::Cancel);
        assert_eq!(d.state(), LauncherState::Terminated);
    }

    #[test]
    fn test_escape_after_ignored_keys() {
        let mut d = dispatcher();
        d.dispatch(KeyPress::new("x", Some("x")));
        d.dispatch(KeyPress::new("w", Some("w")).with_modifiers(true));
        assert_eq!(d.state(), LauncherState::Open);
        assert_eq!(d.dispatch(KeyPress::escape()), KeyAction::Cancel);
    }

    #[test]
    fn test_escape_with_modifiers_cancels() {
        let mut d = dispatcher();
        assert_eq!(
            d.dispatch(KeyPress::escape().with_modifiers(true)),
            KeyAction::Cancel
        );
        assert_eq!(d.state(), LauncherState::Terminated);
    }

    #[test]
    fn test_terminated_ignores_everything() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(KeyPress::escape()), KeyAction::Cancel);
        assert_eq!(d.dispatch(KeyPress::new("m", Some("m"))), KeyAction::Ignore);
        assert_eq!(d.dispatch(KeyPress::escape()), KeyAction::Ignore);
    }

    #[test]
    fn test_key_name_without_text() {
        let mut d = dispatcher();
        assert!(matches!(
            d.dispatch(KeyPress::new("w", None)),
            KeyAction::Launch(e) if e.name == "WhatsApp"
        ));
    }
}
