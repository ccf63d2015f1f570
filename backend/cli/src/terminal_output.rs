//! Terminal output utilities: table rendering, ANSI formatting, notes.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Wrap `text` in an ANSI style when the terminal supports it.
pub fn paint(style: &str, text: &str) -> String {
    if supports_color() {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Status notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Note {
    Info,
    Success,
    Error,
}

impl Note {
    fn style(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Note::Info => (CYAN, "ℹ", "INFO"),
            Note::Success => (GREEN, "✓", "OK"),
            Note::Error => (RED, "✗", "ERROR"),
        }
    }
}

fn format_note(kind: Note, msg: &str, color: bool) -> String {
    let (code, symbol, label) = kind.style();
    if color {
        format!("{code}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{label}: {msg}")
    }
}

/// Informational line on stdout.
pub fn note_info(msg: &str) {
    println!("{}", format_note(Note::Info, msg, supports_color()));
}

/// Confirmation line on stdout.
pub fn note_success(msg: &str) {
    println!("{}", format_note(Note::Success, msg, supports_color()));
}

/// Failure line on stderr, so stdout stays usable for `eval`.
pub fn note_error(msg: &str) {
    eprintln!("{}", format_note(Note::Error, msg, supports_color()));
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Column alignment.
pub enum Align {
    Left,
    Right,
}

/// A table column definition.
pub struct Column {
    pub header: String,
    pub align: Align,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Left, max_width: None }
    }
    pub fn right(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Right, max_width: None }
    }
    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Render a table with given columns and rows.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let num_cols = columns.len();
    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| strip_ansi(&c.header).chars().count())
        .collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            let w = strip_ansi(cell).chars().count();
            let w = columns[i].max_width.map_or(w, |max| w.min(max));
            widths[i] = widths[i].max(w);
        }
    }

    let mut out = String::new();

    let header_cells: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| pad_cell(&col.header, widths[i], &col.align))
        .collect();
    out.push_str(&format!("  {}\n", paint(BOLD, &header_cells.join("  "))));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = (0..num_cols)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                pad_cell(&truncate(cell, columns[i].max_width), widths[i], &columns[i].align)
            })
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ").trim_end()));
    }

    out
}

fn truncate(s: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if strip_ansi(s).chars().count() > max => {
            let plain = strip_ansi(s);
            let mut cut: String = plain.chars().take(max.saturating_sub(1)).collect();
            cut.push('…');
            cut
        }
        _ => s.to_string(),
    }
}

fn pad_cell(s: &str, width: usize, align: &Align) -> String {
    let visible_len = strip_ansi(s).chars().count();
    let pad = width.saturating_sub(visible_len);
    match align {
        Align::Left => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
    }
}
