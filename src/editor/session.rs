//! Placeholder edit sessions.
//!
//! While a session is open, keystrokes build a draft value outside the
//! buffer. Closing the session with `commit` swaps the slot syntax for the
//! draft and re-indexes the content.

use super::buffer::Buffer;
use super::placeholder::{Placeholder, PlaceholderIndex, PlaceholderKind, PlaceholderValue};

/// State of the placeholder edit overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Inactive,
    Editing {
        /// Index of the placeholder being edited.
        target: usize,
        /// Name of the target, checked again on commit.
        name: String,
        draft: String,
    },
}

impl EditSession {
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// The draft value while editing.
    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Inactive => None,
        }
    }

    /// Index of the placeholder being edited.
    pub const fn target(&self) -> Option<usize> {
        match self {
            Self::Editing { target, .. } => Some(*target),
            Self::Inactive => None,
        }
    }

    /// Start editing placeholder `index`.
    ///
    /// Only valid `text` placeholders can be edited; anything else leaves
    /// the session inactive. On success the placeholder becomes active and
    /// the cursor moves to the start of its span.
    pub fn enter(
        &mut self,
        index: usize,
        buffer: &mut Buffer,
        placeholders: &mut PlaceholderIndex,
    ) -> bool {
        if self.is_editing() {
            return false;
        }
        let Some(ph) = placeholders.get(index) else {
            return false;
        };
        if ph.kind != PlaceholderKind::Text || !ph.valid {
            tracing::debug!(name = %ph.name, kind = %ph.kind, "placeholder is not text-editable");
            return false;
        }

        let draft = match &ph.value {
            PlaceholderValue::Text(text) => text.clone(),
            PlaceholderValue::List(_) => String::new(),
        };
        let name = ph.name.clone();
        let start = ph.span.start;

        placeholders.activate(index);
        buffer.set_cursor_absolute(start);
        tracing::debug!(%name, index, "placeholder edit started");
        *self = Self::Editing {
            target: index,
            name,
            draft,
        };
        true
    }

    /// Add a code point to the draft. No-op when inactive.
    pub fn append(&mut self, ch: char) {
        if let Self::Editing { draft, .. } = self {
            draft.push(ch);
        }
    }

    /// Remove the last code point of the draft. No-op when inactive.
    pub fn backspace(&mut self) {
        if let Self::Editing { draft, .. } = self {
            draft.pop();
        }
    }

    /// Close the session.
    ///
    /// With `commit`, the placeholder's span is replaced by the draft, the
    /// index is refreshed and the consumed placeholder (carrying the
    /// committed value) is returned. Without it, the draft is dropped.
    pub fn exit(
        &mut self,
        commit: bool,
        buffer: &mut Buffer,
        placeholders: &mut PlaceholderIndex,
    ) -> Option<Placeholder> {
        let Self::Editing {
            target,
            name,
            draft,
        } = std::mem::take(self)
        else {
            return None;
        };

        if !commit {
            tracing::debug!(%name, "placeholder edit discarded");
            return None;
        }
        if placeholders.get(target).map(|ph| ph.name.as_str()) != Some(name.as_str()) {
            tracing::warn!(%name, target, "placeholder moved during edit, commit dropped");
            return None;
        }
        let committed = fill(target, PlaceholderValue::Text(draft), buffer, placeholders);
        tracing::debug!(%name, "placeholder edit committed");
        committed
    }
}

/// Replace the active `list` placeholder with a bullet list of `items`.
///
/// Returns the consumed placeholder, or `None` when no list placeholder is
/// active.
pub fn fill_list(
    items: Vec<String>,
    buffer: &mut Buffer,
    placeholders: &mut PlaceholderIndex,
) -> Option<Placeholder> {
    let target = placeholders.active_index()?;
    let ph = placeholders.get(target)?;
    if ph.kind != PlaceholderKind::List {
        return None;
    }
    tracing::debug!(name = %ph.name, items = items.len(), "list placeholder filled");
    fill(target, PlaceholderValue::List(items), buffer, placeholders)
}

/// Write `value` over the span of placeholder `target` and re-index.
fn fill(
    target: usize,
    value: PlaceholderValue,
    buffer: &mut Buffer,
    placeholders: &mut PlaceholderIndex,
) -> Option<Placeholder> {
    let mut consumed = placeholders.take(target)?;
    let rendered = value.render();
    buffer.replace_range(consumed.span.range(), &rendered);
    consumed.value = value;
    consumed.active = false;
    placeholders.refresh(&buffer.text());
    Some(consumed)
}
