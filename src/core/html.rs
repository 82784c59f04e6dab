// src/core/html.rs
//! Case-insensitive tag scanning over raw markup.
//!
//! Enough to walk a server-rendered table or pick a marker out of a login
//! page; not a general HTML parser. Offsets are byte offsets into the raw
//! document. Lowercasing is ASCII-only so offsets in the lowercased copy line
//! up with the original (non-ASCII text like column names stays untouched).
//! Comments and script bodies are blanked out of that copy, same length, so
//! commented-out cells are never seen by a scan.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Tags whose close tag may be omitted; a new sibling ends the previous one.
const OPTIONAL_CLOSE: &[&str] = &["tr", "td", "th"];

/// Spans scans must not look into: `(opener, closer)`.
const HIDDEN: &[(&str, &str)] = &[("<!--", "-->"), ("<script", "</script>")];

/// Overwrite every hidden span of a lowercased document with spaces.
/// Spans start at `<` and end after `>` (or at the end), so char
/// boundaries and byte offsets are preserved.
fn blank_hidden(lc: &mut String) {
    let mut pos = 0usize;
    loop {
        let next = HIDDEN
            .iter()
            .filter_map(|(open, close)| lc[pos..].find(open).map(|i| (i + pos, *open, *close)))
            .min_by_key(|(at, _, _)| *at);
        let Some((start, open, close)) = next else { break };

        let body = start + open.len();
        let end = lc[body..].find(close).map_or(lc.len(), |i| body + i + close.len());
        lc.replace_range(start..end, &" ".repeat(end - start));
        pos = end;
    }
}

/// One element: `<tag …>inner</tag>`.
/// `inner` is `open_end..inner_end`; the whole thing is `start..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub open_end: usize,
    pub inner_end: usize,
    pub end: usize,
}

/// A document plus its lowercased, comment-free copy. All scanning runs on
/// the copy; text and attributes are read from the raw document.
pub struct Markup<'a> {
    raw: &'a str,
    lc: String,
}

impl<'a> Markup<'a> {
    pub fn new(raw: &'a str) -> Self {
        let mut lc = to_lower(raw);
        blank_hidden(&mut lc);
        Self { raw, lc }
    }

    /// Opening tag text, e.g. `<table id="dataList" class="x">`.
    pub fn opener(&self, b: Block) -> &'a str {
        &self.raw[b.start..b.open_end]
    }

    pub fn inner(&self, b: Block) -> &'a str {
        &self.raw[b.open_end..b.inner_end]
    }

    /// Visible text of a block: tags stripped, entities decoded, whitespace collapsed.
    pub fn text(&self, b: Block) -> String {
        strip_tags(normalize_entities(self.inner(b)))
    }

    /// Offset of the next `<tag` opener in `from..to`, matching whole tag
    /// names only (`<th` never matches `<thead`).
    fn find_open(&self, tag: &str, from: usize, to: usize) -> Option<usize> {
        let pat = join!("<", &to_lower(tag));
        let hay = self.lc.get(..to)?;
        let mut pos = from;
        loop {
            let at = hay.get(pos..)?.find(&pat)? + pos;
            let after = at + pat.len();
            match hay.as_bytes().get(after) {
                Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(at),
                Some(_) => pos = after,
                None => return None,
            }
        }
    }

    /// Next `<tag …>…</tag>` block starting in `from..to`.
    ///
    /// Rows and cells may omit their close tag; such a block ends at the next
    /// sibling opener. Any other unclosed block runs to `to`.
    pub fn next_block(&self, tag: &str, from: usize, to: usize) -> Option<Block> {
        let to = to.min(self.raw.len());
        let start = self.find_open(tag, from, to)?;
        let open_end = self.lc[start..to].find('>')? + start + 1;

        // Self-closing opener: no inner content.
        if self.lc[start..open_end].ends_with("/>") {
            return Some(Block { start, open_end, inner_end: open_end, end: open_end });
        }

        let optional = OPTIONAL_CLOSE.iter().any(|t| t.eq_ignore_ascii_case(tag));
        let (close, sibling) = if optional {
            let close_pat = join!("</", &to_lower(tag));
            let close = self.lc[open_end..to].find(&close_pat).map(|i| i + open_end);
            (close, self.find_open(tag, open_end, to))
        } else {
            (self.matching_close(tag, open_end, to), None)
        };

        match (close, sibling) {
            (Some(c), Some(s)) if s < c => Some(Block { start, open_end, inner_end: s, end: s }),
            (Some(c), _) => {
                let end = self.lc[c..to].find('>').map(|i| c + i + 1).unwrap_or(to);
                Some(Block { start, open_end, inner_end: c, end })
            }
            (None, Some(s)) => Some(Block { start, open_end, inner_end: s, end: s }),
            (None, None) => Some(Block { start, open_end, inner_end: to, end: to }),
        }
    }

    /// Offset of the `</tag` that closes an opener ending at `open_end`,
    /// skipping over nested elements of the same tag.
    fn matching_close(&self, tag: &str, open_end: usize, to: usize) -> Option<usize> {
        let close_pat = join!("</", &to_lower(tag));
        let mut depth = 0usize;
        let mut pos = open_end;
        loop {
            let close = self.lc[pos..to].find(&close_pat)? + pos;
            match self.find_open(tag, pos, close) {
                Some(nested) => {
                    depth += 1;
                    pos = nested + 1;
                }
                None if depth == 0 => return Some(close),
                None => {
                    depth -= 1;
                    pos = close + close_pat.len();
                }
            }
        }
    }

    /// All `<tag>` blocks within `within` (or the whole document), in order.
    pub fn blocks(&self, tag: &str, within: Option<Block>) -> Vec<Block> {
        let (from, to) = match within {
            Some(b) => (b.open_end, b.inner_end),
            None => (0, self.raw.len()),
        };
        let mut out = Vec::new();
        let mut pos = from;
        while let Some(b) = self.next_block(tag, pos, to) {
            // A zero-width advance would spin forever.
            pos = b.end.max(b.open_end);
            out.push(b);
        }
        out
    }

    /// First `<tag>` whose opener has `attr` equal to `value` (case-sensitive value).
    pub fn find_by_attr(&self, tag: &str, attr: &str, value: &str) -> Option<Block> {
        let mut pos = 0usize;
        let to = self.raw.len();
        while let Some(b) = self.next_block(tag, pos, to) {
            if attr_value(self.opener(b), attr).as_deref() == Some(value) {
                return Some(b);
            }
            pos = b.open_end;
        }
        None
    }

    pub fn find_by_id(&self, tag: &str, id: &str) -> Option<Block> {
        self.find_by_attr(tag, "id", id)
    }

    /// First element, of any tag, whose `class` list contains `class`.
    pub fn find_class(&self, class: &str) -> Option<Block> {
        let len = self.raw.len();
        let mut pos = 0usize;
        while let Some(lt) = self.lc.get(pos..)?.find('<').map(|i| i + pos) {
            let gt = self.lc[lt..].find('>').map(|i| i + lt + 1)?;
            let has_class = attr_value(&self.raw[lt..gt], "class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class));
            if has_class {
                let name_end = self.lc[lt + 1..gt]
                    .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                    .map_or(gt, |i| lt + 1 + i);
                return self.next_block(&self.lc[lt + 1..name_end], lt, len);
            }
            pos = gt;
        }
        None
    }

    /// `<title>` text, if the document has one.
    pub fn title(&self) -> Option<String> {
        self.next_block("title", 0, self.raw.len()).map(|b| self.text(b))
    }
}

/// Value of `name` inside an opening tag. Handles double, single and unquoted values.
pub fn attr_value(opener: &str, name: &str) -> Option<String> {
    let lc = to_lower(opener);
    let name = to_lower(name);
    let bytes = lc.as_bytes();
    let mut pos = 0usize;
    while let Some(rel) = lc.get(pos..)?.find(name.as_str()) {
        let at = pos + rel;
        pos = at + name.len();

        // Must be a whole attribute name: preceded by whitespace, followed by '='.
        let before_ok = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let rest = lc[pos..].trim_start();
        if !before_ok || !rest.starts_with('=') {
            continue;
        }
        let val_start = opener.len() - rest.len() + 1;
        let val = opener[val_start..].trim_start();
        let (quote, body) = match val.as_bytes().first() {
            Some(b'"') => (Some('"'), &val[1..]),
            Some(b'\'') => (Some('\''), &val[1..]),
            _ => (None, val),
        };
        let end = match quote {
            Some(q) => body.find(q).unwrap_or(body.len()),
            None => body
                .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                .unwrap_or(body.len()),
        };
        return Some(body[..end].to_string());
    }
    None
}

/// Text outside tags and comments, whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let mut rest = s.as_ref();
    let mut out = String::with_capacity(rest.len());

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        rest = &rest[lt..];
        let close = if rest.starts_with("<!--") { "-->" } else { ">" };
        rest = rest.find(close).map_or("", |i| &rest[i + close.len()..]);
    }
    out.push_str(rest);
    normalize_ws(&out)
}
