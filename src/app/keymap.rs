use std::sync::LazyLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use super::input::KeyAction;

macro_rules! keymap_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/keymap/default.keymap.json"
        ))
    };
}

/// Which bindings apply: browsing the list, editing fields, or inside the
/// items grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeymapContext {
    Viewing,
    Editing,
    Grid,
}

impl KeymapContext {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "viewing" => Some(KeymapContext::Viewing),
            "editing" => Some(KeymapContext::Editing),
            "grid" => Some(KeymapContext::Grid),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Quit,
    PageStep { delta: i32 },
    Add,
    Edit,
    Delete,
    RowStep { delta: i32 },
    RowPage { delta: i32 },
    Dismiss,
    Save,
    Cancel,
    FieldStep { delta: i32 },
    OpenPopup,
    ToggleGrid,
    GridRow { delta: i32 },
    GridColumn { delta: i32 },
    GridActivate,
    GridAddRow,
    GridDeleteRow,
}

impl From<RawAction> for KeyAction {
    fn from(raw: RawAction) -> Self {
        match raw {
            RawAction::Quit => KeyAction::Quit,
            RawAction::PageStep { delta } => KeyAction::PageStep(delta),
            RawAction::Add => KeyAction::Add,
            RawAction::Edit => KeyAction::Edit,
            RawAction::Delete => KeyAction::Delete,
            RawAction::RowStep { delta } => KeyAction::RowStep(delta),
            RawAction::RowPage { delta } => KeyAction::RowPage(delta),
            RawAction::Dismiss => KeyAction::Dismiss,
            RawAction::Save => KeyAction::Save,
            RawAction::Cancel => KeyAction::Cancel,
            RawAction::FieldStep { delta } => KeyAction::FieldStep(delta),
            RawAction::OpenPopup => KeyAction::OpenPopup,
            RawAction::ToggleGrid => KeyAction::ToggleGrid,
            RawAction::GridRow { delta } => KeyAction::GridRow(delta),
            RawAction::GridColumn { delta } => KeyAction::GridColumn(delta),
            RawAction::GridActivate => KeyAction::GridActivate,
            RawAction::GridAddRow => KeyAction::GridAddRow,
            RawAction::GridDeleteRow => KeyAction::GridDeleteRow,
        }
    }
}

struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Result<Self, String> {
        let contexts = raw
            .contexts
            .iter()
            .map(|ctx| {
                KeymapContext::parse(ctx).ok_or_else(|| format!("{}: unknown context '{ctx}'", raw.id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if contexts.is_empty() {
            return Err(format!("{}: at least one context is required", raw.id));
        }
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo).map_err(|err| format!("{}: combo '{combo}': {err}", raw.id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if combos.is_empty() {
            return Err(format!("{}: at least one combo is required", raw.id));
        }
        let shown = combos
            .iter()
            .map(|pattern| pattern.display.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            action: raw.action.into(),
            contexts,
            snippet: format!("{shown} {}", raw.description),
            combos,
        })
    }

    fn matches(&self, context: KeymapContext, key: &KeyEvent) -> bool {
        self.contexts.contains(&context) && self.combos.iter().any(|pattern| pattern.matches(key))
    }
}

struct KeyPattern {
    matcher: CodeMatcher,
    required: KeyModifiers,
    allow_shift: bool,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self, String> {
        let display = spec.trim().to_string();
        let mut tokens = display
            .split('+')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>();
        let Some(key_token) = tokens.pop() else {
            return Err("combo must contain a key".into());
        };
        let matcher = CodeMatcher::from_token(key_token)?;
        let mut required = KeyModifiers::empty();
        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "shift" => required |= KeyModifiers::SHIFT,
                "alt" => required |= KeyModifiers::ALT,
                other => return Err(format!("unsupported modifier '{other}'")),
            }
        }
        let allow_shift = matcher.allows_extra_shift() && !required.contains(KeyModifiers::SHIFT);
        Ok(Self {
            matcher,
            required,
            allow_shift,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if !self.matcher.matches(&key.code) || !key.modifiers.contains(self.required) {
            return false;
        }
        let mut extra = key.modifiers - self.required;
        if self.allow_shift {
            extra -= KeyModifiers::SHIFT;
        }
        extra.is_empty()
    }
}

enum CodeMatcher {
    Literal(KeyCode),
    Alpha(char),
}

impl CodeMatcher {
    fn from_token(token: &str) -> Result<Self, String> {
        let normalized = token.to_lowercase();
        let matcher = match normalized.as_str() {
            "tab" => CodeMatcher::Literal(KeyCode::Tab),
            "backtab" => CodeMatcher::Literal(KeyCode::BackTab),
            "enter" => CodeMatcher::Literal(KeyCode::Enter),
            "esc" | "escape" => CodeMatcher::Literal(KeyCode::Esc),
            "left" => CodeMatcher::Literal(KeyCode::Left),
            "right" => CodeMatcher::Literal(KeyCode::Right),
            "up" => CodeMatcher::Literal(KeyCode::Up),
            "down" => CodeMatcher::Literal(KeyCode::Down),
            "pageup" => CodeMatcher::Literal(KeyCode::PageUp),
            "pagedown" => CodeMatcher::Literal(KeyCode::PageDown),
            "delete" | "del" => CodeMatcher::Literal(KeyCode::Delete),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => CodeMatcher::Alpha(ch),
                    _ => return Err(format!("unsupported key '{token}'")),
                }
            }
        };
        Ok(matcher)
    }

    fn matches(&self, code: &KeyCode) -> bool {
        match (self, code) {
            (CodeMatcher::Literal(expected), actual) => actual == expected,
            (CodeMatcher::Alpha(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == *expected
            }
            _ => false,
        }
    }

    fn allows_extra_shift(&self) -> bool {
        matches!(
            self,
            CodeMatcher::Alpha(_) | CodeMatcher::Literal(KeyCode::BackTab)
        )
    }
}

fn parse_keymap(source: &str) -> Result<Vec<KeyBinding>, String> {
    let entries: Vec<RawEntry> =
        serde_json::from_str(source).map_err(|err| format!("invalid keymap: {err}"))?;
    entries.into_iter().map(KeyBinding::from_raw).collect()
}

static KEYMAP: LazyLock<Vec<KeyBinding>> = LazyLock::new(|| match parse_keymap(keymap_source!()) {
    Ok(bindings) => bindings,
    Err(err) => panic!("keymap/default.keymap.json: {err}"),
});

pub(crate) fn classify(context: KeymapContext, key: &KeyEvent) -> Option<KeyAction> {
    KEYMAP
        .iter()
        .find(|binding| binding.matches(context, key))
        .map(|binding| binding.action)
}

pub(crate) fn help_text(context: KeymapContext) -> Option<String> {
    let snippets = KEYMAP
        .iter()
        .filter(|binding| binding.contexts.contains(&context))
        .map(|binding| binding.snippet.as_str())
        .collect::<Vec<_>>();
    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join(" • "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn embedded_keymap_parses() {
        assert!(parse_keymap(keymap_source!()).is_ok());
    }

    #[test]
    fn same_key_maps_per_context() {
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(classify(KeymapContext::Viewing, &enter), Some(KeyAction::Edit));
        assert_eq!(classify(KeymapContext::Editing, &enter), Some(KeyAction::OpenPopup));
        assert_eq!(classify(KeymapContext::Grid, &enter), Some(KeyAction::GridActivate));
    }

    #[test]
    fn down_in_grid_steps_rows() {
        let down = key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(classify(KeymapContext::Grid, &down), Some(KeyAction::GridRow(1)));
        assert_eq!(classify(KeymapContext::Editing, &down), Some(KeyAction::FieldStep(1)));
    }

    #[test]
    fn ctrl_combos_require_modifier() {
        let save = key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(classify(KeymapContext::Editing, &save), Some(KeyAction::Save));
        let plain = key(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(classify(KeymapContext::Editing, &plain), None);
    }

    #[test]
    fn typing_letters_while_editing_is_not_bound() {
        let letter = key(KeyCode::Char('a'), KeyModifiers::SHIFT);
        assert_eq!(classify(KeymapContext::Viewing, &letter), Some(KeyAction::Add));
        assert_eq!(classify(KeymapContext::Editing, &letter), None);
    }

    #[test]
    fn bad_entries_are_reported() {
        let raw = r#"[{"id":"x","description":"x","contexts":["nowhere"],"action":{"kind":"quit"},"combos":["q"]}]"#;
        assert!(parse_keymap(raw).is_err());
        let raw = r#"[{"id":"x","description":"x","contexts":["grid"],"action":{"kind":"quit"},"combos":["Hyper+q"]}]"#;
        assert!(parse_keymap(raw).is_err());
    }

    #[test]
    fn help_lists_context_bindings() {
        let help = help_text(KeymapContext::Grid).expect("help");
        assert!(help.contains("Ctrl+N Add row"));
        assert!(!help.contains("New record"));
    }
}
