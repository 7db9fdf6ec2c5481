//! Text fitting for the card canvas
//!
//! Long titles get progressively smaller type so the rendered card never
//! overflows its fixed canvas. Each of the two text roles owns an ordered
//! breakpoint table, scanned from the tightest length bound to a catch-all
//! entry that also sets the truncation limit. Both entry points are total:
//! any input string maps to a valid style.

/// A raw string resolved to a concrete typographic style
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub font_size: f32,
    pub line_height: f32,
    pub letter_spacing: Option<f32>,
}

/// A length threshold paired with the style used below it
#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    max_chars: usize,
    font_size: f32,
    line_height: f32,
    letter_spacing: Option<f32>,
    truncate_chars: Option<usize>,
}

const TITLE_BREAKPOINTS: [Breakpoint; 5] = [
    Breakpoint {
        max_chars: 42,
        font_size: 72.0,
        line_height: 1.05,
        letter_spacing: Some(-1.2),
        truncate_chars: None,
    },
    Breakpoint {
        max_chars: 60,
        font_size: 64.0,
        line_height: 1.07,
        letter_spacing: Some(-1.1),
        truncate_chars: None,
    },
    Breakpoint {
        max_chars: 78,
        font_size: 58.0,
        line_height: 1.1,
        letter_spacing: Some(-1.0),
        truncate_chars: None,
    },
    Breakpoint {
        max_chars: 96,
        font_size: 52.0,
        line_height: 1.12,
        letter_spacing: Some(-0.9),
        truncate_chars: None,
    },
    Breakpoint {
        max_chars: usize::MAX,
        font_size: 46.0,
        line_height: 1.15,
        letter_spacing: Some(-0.8),
        truncate_chars: Some(112),
    },
];

const EXCERPT_BREAKPOINTS: [Breakpoint; 3] = [
    Breakpoint {
        max_chars: 160,
        font_size: 32.0,
        line_height: 1.42,
        letter_spacing: None,
        truncate_chars: None,
    },
    Breakpoint {
        max_chars: 220,
        font_size: 28.0,
        line_height: 1.46,
        letter_spacing: None,
        truncate_chars: None,
    },
    Breakpoint {
        max_chars: usize::MAX,
        font_size: 26.0,
        line_height: 1.5,
        letter_spacing: None,
        truncate_chars: Some(260),
    },
];

/// Fit a raw title string
pub fn fit_title(raw: &str) -> FittedText {
    fit(raw, &TITLE_BREAKPOINTS)
}

/// Fit a raw excerpt string
pub fn fit_excerpt(raw: &str) -> FittedText {
    fit(raw, &EXCERPT_BREAKPOINTS)
}

fn fit(raw: &str, table: &[Breakpoint]) -> FittedText {
    let cleaned = normalize_whitespace(raw);
    let len = cleaned.chars().count();

    // The catch-all entry has max_chars = usize::MAX, so find always succeeds
    let bp = table
        .iter()
        .find(|bp| len <= bp.max_chars)
        .unwrap_or(&table[table.len() - 1]);

    let text = match bp.truncate_chars {
        Some(limit) => truncate(&cleaned, limit),
        None => cleaned,
    };

    FittedText {
        text,
        font_size: bp.font_size,
        line_height: bp.line_height,
        letter_spacing: bp.letter_spacing,
    }
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `max_chars` characters plus an ellipsis
///
/// The cut prefers the nearest word boundary before the limit, but only if
/// the boundary keeps at least half the allowed length; a single unbroken
/// run of that size is cut at the hard limit instead. Counts characters,
/// not bytes, so multi-byte input never splits a scalar.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let last_space = chars[..max_chars]
        .iter()
        .rposition(|c| *c == ' ')
        .filter(|i| *i >= max_chars / 2);

    let cut = last_space.unwrap_or(max_chars);
    let mut shortened: String = chars[..cut].iter().collect();
    shortened.push('…');
    shortened
}
