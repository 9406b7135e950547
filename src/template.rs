//! Positional message templates.
//!
//! Templates use indexed placeholders: `"{0} with {1} '{2}' was not found."`.
//! `{{` and `}}` produce literal braces. A placeholder whose index has no
//! argument is kept as written, so a template can be resolved first and
//! rendered later without losing information. Anything else that looks like
//! a brace is plain text.

use smallvec::SmallVec;

/// One piece of a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder { index: usize, raw: &'a str },
}

/// Split a template into segments. Typical templates fit inline.
pub fn parse(template: &str) -> SmallVec<[Segment<'_>; 8]> {
    let mut segments = SmallVec::new();
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                push_literal(&mut segments, &template[literal_start..i + 1]);
                i += 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_literal(&mut segments, &template[literal_start..i + 1]);
                i += 2;
                literal_start = i;
            }
            b'{' => match placeholder_end(bytes, i) {
                Some(end) => {
                    push_literal(&mut segments, &template[literal_start..i]);
                    let raw = &template[i..=end];
                    // digits only, checked by placeholder_end
                    let index = raw[1..raw.len() - 1].parse().unwrap_or(usize::MAX);
                    segments.push(Segment::Placeholder { index, raw });
                    i = end + 1;
                    literal_start = i;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    push_literal(&mut segments, &template[literal_start..]);
    segments
}

/// Highest placeholder index used, if any.
pub fn max_placeholder(template: &str) -> Option<usize> {
    parse(template)
        .iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder { index, .. } => Some(*index),
            Segment::Literal(_) => None,
        })
        .max()
}

/// Interpolate `args` into `template`.
pub fn render<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.as_ref().len()).sum::<usize>());
    for segment in parse(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder { index, raw } => match args.get(index) {
                Some(arg) => out.push_str(arg.as_ref()),
                None => out.push_str(raw),
            },
        }
    }
    out
}

fn push_literal<'a>(segments: &mut SmallVec<[Segment<'a>; 8]>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Literal(text));
    }
}

/// Index of the closing brace of `{digits}` starting at `open`.
fn placeholder_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut j = open + 1;
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    (j > open + 1 && j - open - 1 <= 9 && bytes.get(j) == Some(&b'}')).then_some(j)
}
