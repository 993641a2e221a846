use std::sync::OnceLock;

use regex::Regex;

use crate::models::Level;

// ---------------------------------------------------------------------------
// Running state
// ---------------------------------------------------------------------------

/// The most recently seen section label. Threaded through the classifiers
/// as a value: each call takes the state and hands back the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionState {
    current: Option<String>,
}

impl SectionState {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn enter(label: &str) -> Self {
        Self {
            current: Some(label.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Code + name reports (balance sheet, profit & loss)
// ---------------------------------------------------------------------------

/// Fixed vocabulary of a code/name/amount export.
#[derive(Debug)]
pub struct AccountVocabulary {
    /// Column header text repeated in the data region.
    pub header_label: &'static str,
    /// Text in the code column that is not a real code.
    pub code_header: Option<&'static str>,
    /// Grand-total lines already captured at section level.
    pub skip_labels: &'static [&'static str],
    pub sections: &'static [&'static str],
    /// Decorative prefix marking a category row, stripped from the name.
    pub category_prefix: Option<&'static str>,
    /// Known uncoded labels and their level.
    pub named_levels: &'static [(&'static str, Level)],
    pub fallback: Level,
    /// Rows with a code but no name are dropped.
    pub require_name: bool,
}

/// One raw row of a code/name export after trimming.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountLine {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountClass {
    pub level: Level,
    pub parent_section: Option<String>,
    pub code: Option<String>,
    pub name: String,
}

pub fn classify_account(
    line: &AccountLine,
    state: SectionState,
    vocab: &AccountVocabulary,
) -> (SectionState, Option<AccountClass>) {
    let name = line.name.clone().unwrap_or_default();
    if name.is_empty() && line.code.is_none() {
        return (state, None);
    }
    if name == vocab.header_label || vocab.skip_labels.contains(&name.as_str()) {
        return (state, None);
    }
    if name.is_empty() && vocab.require_name {
        return (state, None);
    }

    if vocab.sections.contains(&name.as_str()) {
        let state = SectionState::enter(&name);
        let class = AccountClass {
            level: Level::Section,
            parent_section: state.current().map(str::to_string),
            code: None,
            name,
        };
        return (state, Some(class));
    }

    let code = line
        .code
        .clone()
        .filter(|c| !c.is_empty() && Some(c.as_str()) != vocab.code_header);

    let (level, name) = if code.is_some() {
        (Level::Account, name)
    } else if let Some(stripped) = vocab.category_prefix.and_then(|p| name.strip_prefix(p)) {
        (Level::Category, stripped.to_string())
    } else if let Some((_, level)) = vocab.named_levels.iter().find(|(n, _)| *n == name) {
        (*level, name)
    } else {
        (vocab.fallback, name)
    };

    let class = AccountClass {
        level,
        parent_section: state.current().map(str::to_string),
        code,
        name,
    };
    (state, Some(class))
}

// ---------------------------------------------------------------------------
// Numbered-line reports (VAT)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct LineVocabulary {
    /// Column-header marker found in the first numeric column.
    pub header_marker: &'static str,
    /// Section header label and the tag rows inherit.
    pub sections: &'static [(&'static str, &'static str)],
    pub total_lines: &'static [&'static str],
    pub subheader_lines: &'static [&'static str],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberedLine {
    pub label: Option<String>,
    /// Text of the first value column, used to spot blank and header rows.
    pub marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineClass {
    pub level: Level,
    pub parent_section: String,
    pub line_number: Option<String>,
    pub name: String,
}

fn line_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*\.?)\s*(.*)").expect("line number pattern"))
}

/// Split a leading line number off a label. The number always ends in a dot.
pub fn split_line_number(label: &str) -> (Option<String>, String) {
    match line_number_pattern().captures(label) {
        Some(caps) => {
            let mut number = caps[1].to_string();
            if !number.ends_with('.') {
                number.push('.');
            }
            (Some(number), caps[2].trim().to_string())
        }
        None => (None, label.to_string()),
    }
}

pub fn classify_line(
    line: &NumberedLine,
    state: SectionState,
    vocab: &LineVocabulary,
) -> (SectionState, Option<LineClass>) {
    let label = line.label.clone().unwrap_or_default();
    if label.is_empty() && line.marker.is_none() {
        return (state, None);
    }
    if label.is_empty() && line.marker.as_deref() == Some(vocab.header_marker) {
        return (state, None);
    }

    if let Some((_, tag)) = vocab.sections.iter().find(|(l, _)| *l == label) {
        let state = SectionState::enter(tag);
        let class = LineClass {
            level: Level::Section,
            parent_section: tag.to_string(),
            line_number: None,
            name: label,
        };
        return (state, Some(class));
    }

    // Nothing before the first section header is reportable.
    let Some(section) = state.current().map(str::to_string) else {
        return (state, None);
    };

    let (line_number, name) = split_line_number(&label);
    let level = match line_number.as_deref() {
        Some(n) if vocab.total_lines.contains(&n) => Level::Total,
        Some(n) if vocab.subheader_lines.contains(&n) => Level::Item,
        Some(n) if n.trim_end_matches('.').contains('.') => Level::Subitem,
        _ => Level::Item,
    };

    let class = LineClass {
        level,
        parent_section: section,
        line_number,
        name,
    };
    (state, Some(class))
}
