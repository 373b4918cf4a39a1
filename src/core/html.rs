// src/core/html.rs
// Case-insensitive tag scanning over raw HTML strings.
// Only ASCII is lowercased, so byte offsets in the lowered copy line up with the original.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

fn is_name_end(b: Option<u8>) -> bool {
    matches!(b, None | Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'))
}

/// Position of the next `<tag` (whole tag name, so `<th` does not hit `<thead`).
fn find_open(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("<{tag}");
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(&pat) {
        let at = pos + rel;
        if is_name_end(lc.as_bytes().get(at + pat.len()).copied()) {
            return Some(at);
        }
        pos = at + pat.len();
    }
    None
}

fn find_close(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("</{tag}");
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(&pat) {
        let at = pos + rel;
        if is_name_end(lc.as_bytes().get(at + pat.len()).copied()) {
            return Some(at);
        }
        pos = at + pat.len();
    }
    None
}

/// End (exclusive) of the element opened at `start`, honouring nested tags of the same name.
fn match_close(lc: &str, tag: &str, start: usize) -> Option<usize> {
    let open_end = lc[start..].find('>')? + start + 1;
    let mut depth = 1usize;
    let mut pos = open_end;
    loop {
        let close = find_close(lc, tag, pos)?;
        match find_open(lc, tag, pos) {
            Some(nested) if nested < close => {
                depth += 1;
                pos = nested + 1;
            }
            _ => {
                let close_end = lc[close..].find('>').map_or(lc.len(), |i| close + i + 1);
                depth -= 1;
                if depth == 0 {
                    return Some(close_end);
                }
                pos = close_end;
            }
        }
    }
}

/// Next `<tag ...> ... </tag>` span at or after `from`; an unclosed element runs to the end.
fn block_in(lc: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let start = find_open(lc, tag, from)?;
    let end = match_close(lc, tag, start).unwrap_or(lc.len());
    Some((start, end))
}

/// All blocks of one tag, in document order, without descending into matches.
pub fn tag_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = block_in(&lc, &tag, pos) {
        out.push(&s[start..end]);
        pos = end;
    }
    out
}

/// Blocks of any of `tags`, in document order; whichever opens first wins at each step.
pub fn any_tag_blocks<'a>(s: &'a str, tags: &[&str]) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tags: Vec<String> = tags.iter().map(|t| to_lower(t)).collect();
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = tags
        .iter()
        .filter_map(|t| block_in(&lc, t, pos))
        .min_by_key(|&(start, _)| start)
    {
        out.push(&s[start..end]);
        pos = end;
    }
    out
}

/// Outermost blocks of any of `tags` whose opening tag satisfies `keep`, searching
/// nested elements too. A match inside an earlier match is not reported again.
pub fn blocks_where<'a, F>(s: &'a str, tags: &[&str], keep: F) -> Vec<&'a str>
where
    F: Fn(&str) -> bool,
{
    let lc = to_lower(s);
    let mut opens: Vec<(usize, String)> = Vec::new();
    for tag in tags {
        let tag = to_lower(tag);
        let mut pos = 0usize;
        while let Some(at) = find_open(&lc, &tag, pos) {
            opens.push((at, tag.clone()));
            pos = at + 1;
        }
    }
    opens.sort_unstable_by_key(|(at, _)| *at);

    let mut out = Vec::new();
    let mut covered_to = 0usize;
    for (start, tag) in opens {
        if start < covered_to || !keep(open_tag(&s[start..])) {
            continue;
        }
        let end = match_close(&lc, &tag, start).unwrap_or(s.len());
        out.push(&s[start..end]);
        covered_to = end;
    }
    out
}

/// The opening tag of a block, `<` through `>`.
pub fn open_tag(block: &str) -> &str {
    &block[..block.find('>').map_or(block.len(), |i| i + 1)]
}

/// Value of attribute `name` in an opening tag; quoted or bare.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let name = to_lower(name);
    let bytes = lc.as_bytes();
    let mut pos = 0usize;
    while let Some(rel) = lc[pos..].find(&name) {
        let at = pos + rel;
        pos = at + name.len();
        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        let Some(rest) = open_tag[pos..].trim_start().strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let value = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => rest[1..].split(q).next().unwrap_or(""),
            _ => rest
                .split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or(""),
        };
        return Some(s!(value));
    }
    None
}

/// Given `<td ...>INNER</td>`, return INNER (may still hold nested tags).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return &block[oe + 1..cs];
            }
        }
        return &block[oe + 1..];
    }
    ""
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of a cell block: tags stripped, entities decoded, whitespace collapsed.
pub fn cell_text(block: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(inner_after_open_tag(block))))
}
