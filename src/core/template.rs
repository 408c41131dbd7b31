//! Message template rendering
//!
//! Templates use brace-delimited holes that are filled from positional
//! arguments:
//!
//! - `{name}` takes the next positional argument, in order of appearance
//! - `{0}` indexes the argument list directly, so `"{1} before {0}"` with
//!   `a, b` renders `b before a` (hosts that fill every hole in order of
//!   appearance would render `a before b`)
//! - `{@name}` expands a structured argument as key/value pairs (the default
//!   for structured values, the prefix is accepted for readability)
//! - `{$name}` forces the flat string form of the argument
//! - `{name,8}` / `{name,-8}` pads right- or left-aligned, up to
//!   [`MAX_ALIGNMENT`] columns; `{name:F2}` format specifiers are accepted and
//!   ignored
//! - `{{` and `}}` produce literal braces
//!
//! Rendering never fails. A hole without a matching argument is emitted
//! verbatim, extra arguments are ignored, and an unterminated `{` stays literal.
//!
//! # Example
//!
//! ```
//! use log_fanout::core::{LogValue, MessageTemplate};
//!
//! let template = MessageTemplate::parse("Calculation value is {calculation}");
//! assert_eq!(template.render(&[LogValue::from(50)]), "Calculation value is 50");
//! ```

use super::log_value::LogValue;

/// Widest padding a hole may request; wider holes are kept verbatim
pub const MAX_ALIGNMENT: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoleMode {
    Default,
    Destructure,
    Stringify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hole {
    name: String,
    index: usize,
    alignment: Option<i32>,
    mode: HoleMode,
    raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Hole(Hole),
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut next_positional = 0usize;
        let mut chars = template.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let rest = &template[start + 1..];
                    let close = rest.find('}');
                    let nested_open = rest.find('{');
                    let end = match (close, nested_open) {
                        (Some(close), Some(open)) if open < close => None,
                        (close, _) => close,
                    };

                    let Some(end) = end else {
                        literal.push('{');
                        continue;
                    };

                    let body = &rest[..end];
                    match parse_hole(body, &mut next_positional) {
                        Some(hole) => {
                            if !literal.is_empty() {
                                segments.push(Segment::Literal(std::mem::take(&mut literal)));
                            }
                            segments.push(Segment::Hole(hole));
                        }
                        None => {
                            literal.push('{');
                            literal.push_str(body);
                            literal.push('}');
                        }
                    }

                    // Skip the hole body and its closing brace
                    while let Some(&(idx, _)) = chars.peek() {
                        if idx > start + end + 1 {
                            break;
                        }
                        chars.next();
                    }
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Substitute `args` into the template
    pub fn render(&self, args: &[LogValue]) -> String {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Hole(hole) => match args.get(hole.index) {
                    Some(value) => {
                        let text = match hole.mode {
                            HoleMode::Stringify => value.render_stringified(),
                            HoleMode::Default | HoleMode::Destructure => value.render(),
                        };
                        push_aligned(&mut output, &text, hole.alignment);
                    }
                    None => {
                        output.push('{');
                        output.push_str(&hole.raw);
                        output.push('}');
                    }
                },
            }
        }

        output
    }

    /// Names of the holes, in order of appearance
    pub fn hole_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Hole(hole) => Some(hole.name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Parse and render in one step
pub fn render(template: &str, args: &[LogValue]) -> String {
    if args.is_empty() && !template.contains(['{', '}']) {
        return template.to_string();
    }
    MessageTemplate::parse(template).render(args)
}

fn parse_hole(body: &str, next_positional: &mut usize) -> Option<Hole> {
    let (mode, rest) = match body.chars().next() {
        Some('@') => (HoleMode::Destructure, &body[1..]),
        Some('$') => (HoleMode::Stringify, &body[1..]),
        _ => (HoleMode::Default, body),
    };

    let name_end = rest.find([',', ':']).unwrap_or(rest.len());
    let name = rest[..name_end].trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }

    let mut alignment = None;
    if rest[name_end..].starts_with(',') {
        let align_text = &rest[name_end + 1..];
        let align_end = align_text.find(':').unwrap_or(align_text.len());
        let width = align_text[..align_end].trim().parse::<i32>().ok()?;
        if width.unsigned_abs() > MAX_ALIGNMENT {
            return None;
        }
        alignment = Some(width);
    }

    let index = if name.bytes().all(|b| b.is_ascii_digit()) {
        name.parse::<usize>().ok()?
    } else {
        let index = *next_positional;
        *next_positional += 1;
        index
    };

    Some(Hole {
        name: name.to_string(),
        index,
        alignment,
        mode,
        raw: body.to_string(),
    })
}

fn push_aligned(output: &mut String, text: &str, alignment: Option<i32>) {
    let Some(alignment) = alignment else {
        output.push_str(text);
        return;
    };

    let width = alignment.unsigned_abs() as usize;
    let len = text.chars().count();
    let padding = " ".repeat(width.saturating_sub(len));

    if alignment < 0 {
        output.push_str(text);
        output.push_str(&padding);
    } else {
        output.push_str(&padding);
        output.push_str(text);
    }
}
