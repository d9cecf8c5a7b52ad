//! Template slot detection, validation and lookup.
//!
//! A placeholder is written `{{kind:name}}` where both words match
//! `[A-Za-z0-9_]+`. Text that only resembles the pattern is ordinary
//! text. Kinds other than `text` and `list` are still indexed but marked
//! invalid so they can be reported.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+):([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid")
});

/// Half-open range `[start, end)` of absolute code-point offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `pos` lies inside the span (`start <= pos < end`).
    pub const fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// The kind word of a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PlaceholderKind {
    Text,
    List,
    /// A kind word that is neither `text` nor `list`.
    Other(String),
}

impl PlaceholderKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::List => "list",
            Self::Other(word) => word,
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for PlaceholderKind {
    fn from(word: &str) -> Self {
        match word {
            "text" => Self::Text,
            "list" => Self::List,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PlaceholderKind {
    fn from(word: String) -> Self {
        Self::from(word.as_str())
    }
}

impl From<PlaceholderKind> for String {
    fn from(kind: PlaceholderKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Committed value of a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderValue {
    Text(String),
    List(Vec<String>),
}

impl PlaceholderValue {
    fn empty_for(kind: &PlaceholderKind) -> Self {
        match kind {
            PlaceholderKind::List => Self::List(Vec::new()),
            _ => Self::Text(String::new()),
        }
    }

    /// The text that replaces the slot syntax when the value is filled in.
    ///
    /// Lists become a markdown bullet list, one `- item` per line.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A template slot found in the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub name: String,
    pub span: Span,
    pub value: PlaceholderValue,
    pub valid: bool,
    pub active: bool,
}

impl Placeholder {
    fn new(kind: PlaceholderKind, name: String, span: Span) -> Self {
        let valid = kind.is_known() && is_valid_name(&name);
        let value = PlaceholderValue::empty_for(&kind);
        Self {
            kind,
            name,
            span,
            value,
            valid,
            active: false,
        }
    }

    /// The literal slot syntax, e.g. `{{text:name}}`.
    pub fn syntax(&self) -> String {
        format!("{{{{{}:{}}}}}", self.kind, self.name)
    }
}

/// What a [`ValidationIssue`] complains about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DuplicateName,
    InvalidKind,
    InvalidName,
}

/// Advisory problem with a placeholder. Never blocks editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub span: Span,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at {}..{})",
            self.message, self.span.start, self.span.end
        )
    }
}

/// Ordered index of the placeholders in a document.
///
/// The list is rebuilt from scratch by [`refresh`](Self::refresh) after
/// every content change. Active state and committed values survive a
/// refresh for slots whose `(kind, name)` pair, counted in document order,
/// is still present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderIndex {
    placeholders: Vec<Placeholder>,
    issues: Vec<ValidationIssue>,
}

impl PlaceholderIndex {
    pub const fn new() -> Self {
        Self {
            placeholders: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Build an index for `content` in one step.
    pub fn from_content(content: &str) -> Self {
        let mut index = Self::new();
        index.refresh(content);
        index
    }

    /// Re-scan `content` and rebuild the placeholder list.
    pub fn refresh(&mut self, content: &str) -> &[Placeholder] {
        let _scope = crate::perf::scope("placeholders.refresh");
        let previous = std::mem::take(&mut self.placeholders);
        let mut fresh = scan(content);
        carry_over(&previous, &mut fresh);
        self.placeholders = fresh;
        self.issues = validate(&self.placeholders);
        tracing::trace!(
            placeholders = self.placeholders.len(),
            issues = self.issues.len(),
            "placeholder index refreshed"
        );
        &self.placeholders
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn get(&self, index: usize) -> Option<&Placeholder> {
        self.placeholders.get(index)
    }

    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Issues found by the last refresh.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Nearest placeholder starting strictly after `pos`.
    pub fn next(&self, pos: usize) -> Option<usize> {
        self.placeholders.iter().position(|ph| ph.span.start > pos)
    }

    /// Nearest placeholder starting strictly before `pos`.
    pub fn previous(&self, pos: usize) -> Option<usize> {
        self.placeholders.iter().rposition(|ph| ph.span.start < pos)
    }

    /// Placeholder whose span contains `pos`.
    pub fn at(&self, pos: usize) -> Option<usize> {
        self.placeholders.iter().position(|ph| ph.span.contains(pos))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.placeholders.iter().position(|ph| ph.active)
    }

    pub fn active(&self) -> Option<&Placeholder> {
        self.placeholders.iter().find(|ph| ph.active)
    }

    /// Make `index` the single active placeholder.
    ///
    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.placeholders.len() {
            return false;
        }
        for (i, ph) in self.placeholders.iter_mut().enumerate() {
            ph.active = i == index;
        }
        true
    }

    pub fn deactivate(&mut self) {
        for ph in &mut self.placeholders {
            ph.active = false;
        }
    }

    /// Take a placeholder out of the index ahead of replacing its span.
    ///
    /// The remaining spans are stale until the next refresh.
    pub(crate) fn take(&mut self, index: usize) -> Option<Placeholder> {
        (index < self.placeholders.len()).then(|| self.placeholders.remove(index))
    }
}

/// Check a placeholder list for duplicate names and malformed slots.
///
/// Every occurrence of a duplicated name among valid placeholders gets its
/// own issue. Issues are returned in document order.
pub fn validate(placeholders: &[Placeholder]) -> Vec<ValidationIssue> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for ph in placeholders.iter().filter(|ph| ph.valid) {
        *name_counts.entry(ph.name.as_str()).or_default() += 1;
    }

    let mut issues = Vec::new();
    for ph in placeholders {
        if ph.valid && name_counts.get(ph.name.as_str()).copied().unwrap_or(0) > 1 {
            issues.push(ValidationIssue {
                kind: IssueKind::DuplicateName,
                span: ph.span,
                message: format!("Duplicate placeholder name: {}", ph.name),
            });
        }
        if !ph.kind.is_known() {
            issues.push(ValidationIssue {
                kind: IssueKind::InvalidKind,
                span: ph.span,
                message: format!(
                    "Invalid placeholder type: {} (must be 'text' or 'list')",
                    ph.kind
                ),
            });
        }
        if !is_valid_name(&ph.name) {
            issues.push(ValidationIssue {
                kind: IssueKind::InvalidName,
                span: ph.span,
                message: format!(
                    "Invalid placeholder name: {} (must be alphanumeric and underscores only)",
                    ph.name
                ),
            });
        }
    }
    issues
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Find every slot in `content`, converting byte offsets to code points.
fn scan(content: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;

    for caps in PLACEHOLDER_PATTERN.captures_iter(content) {
        let (Some(whole), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let start = char_pos + content[byte_pos..whole.start()].chars().count();
        // The pattern only matches ASCII, so bytes equal code points here.
        let end = start + whole.len();
        byte_pos = whole.end();
        char_pos = end;

        placeholders.push(Placeholder::new(
            PlaceholderKind::from(kind.as_str()),
            name.as_str().to_string(),
            Span::new(start, end),
        ));
    }
    placeholders
}

/// Copy active flags and values from `previous` onto matching slots.
///
/// The n-th occurrence of a `(kind, name)` pair matches the n-th
/// occurrence of the same pair in the previous list.
fn carry_over(previous: &[Placeholder], fresh: &mut [Placeholder]) {
    if previous.is_empty() {
        return;
    }
    let mut by_key: HashMap<(&PlaceholderKind, &str), Vec<&Placeholder>> = HashMap::new();
    for ph in previous {
        by_key.entry((&ph.kind, ph.name.as_str())).or_default().push(ph);
    }

    let mut seen: HashMap<(PlaceholderKind, String), usize> = HashMap::new();
    for ph in fresh.iter_mut() {
        let ordinal = seen.entry((ph.kind.clone(), ph.name.clone())).or_default();
        if let Some(old) = by_key
            .get(&(&ph.kind, ph.name.as_str()))
            .and_then(|olds| olds.get(*ordinal))
        {
            ph.active = old.active;
            ph.value = old.value.clone();
        }
        *ordinal += 1;
    }
}
