//! Greedy line breaking for fixed-width value cells.

use super::metrics::{FontFamily, FontStyle};

/// Break `text` into lines no wider than `max_width` points.
///
/// Lines break at the last space that fits; the space itself is dropped. A
/// word wider than the column is split between characters. `\n` forces a
/// break and a single trailing newline is ignored. Empty input yields one
/// empty line so the row still takes up space.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    family: FontFamily,
    style: FontStyle,
    size: f32,
) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let limit = max_width * 1000.0 / size;

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, limit, family, style, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    limit: f32,
    family: FontFamily,
    style: FontStyle,
    lines: &mut Vec<String>,
) {
    let chars: Vec<char> = paragraph.chars().collect();
    if chars.is_empty() {
        lines.push(String::new());
        return;
    }

    let mut start = 0;
    let mut last_space: Option<usize> = None;
    let mut width = 0.0f32;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == ' ' {
            last_space = Some(i);
        }
        width += f32::from(family.char_width(style, c));

        if width > limit {
            match last_space {
                Some(space) if space > start => {
                    lines.push(chars[start..space].iter().collect());
                    start = space + 1;
                }
                _ => {
                    // Always place at least one character per line.
                    let end = if i == start { i + 1 } else { i };
                    lines.push(chars[start..end].iter().collect());
                    start = end;
                }
            }
            last_space = None;
            width = 0.0;
            i = start;
            continue;
        }
        i += 1;
    }

    if start < chars.len() {
        lines.push(chars[start..].iter().collect());
    }
}
