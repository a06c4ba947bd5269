//! Keyword highlighting: partition a text into plain and keyword segments.

/// One contiguous span of the input text. Concatenating the `text()` of all
/// segments reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text outside any keyword match.
    Plain(String),
    /// A keyword match, carrying the matched span with its original casing
    /// and the index of the keyword in the caller-supplied list.
    Keyword { text: String, keyword_index: usize },
}

impl Segment {
    /// The underlying text of the segment, without any markup.
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) => text,
            Segment::Keyword { text, .. } => text,
        }
    }
}

/// Splits `text` into plain and keyword segments, scanning greedily from the
/// left and preferring the longest keyword at each position.
///
/// Matching is case-insensitive; the emitted keyword segments keep the
/// original casing of `text`. Among keywords of equal length the caller's
/// order decides. Keywords without any occurrence are reported in a single
/// warning and otherwise ignored; empty-string keywords are skipped. An empty
/// `text` yields an empty segment sequence.
pub fn highlight<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    report_missing(text, keywords);

    // Longest first; the sort is stable, so equal-length keywords keep the
    // caller's relative order. The original index travels with the keyword.
    let mut ranked: Vec<(usize, &str)> = keywords
        .iter()
        .map(|keyword| keyword.as_ref())
        .enumerate()
        .filter(|(_, keyword)| !keyword.is_empty())
        .collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    if ranked.is_empty() {
        return vec![Segment::Plain(text.to_string())];
    }

    let mut segments = Vec::new();
    let mut rest = text;
    loop {
        let earliest = ranked
            .iter()
            .filter_map(|&(keyword_index, keyword)| {
                find_case_insensitive(rest, keyword).map(|span| (keyword_index, span))
            })
            .min_by_key(|&(_, (start, _))| start);

        let Some((keyword_index, (start, end))) = earliest else {
            segments.push(Segment::Plain(rest.to_string()));
            break;
        };

        if start > 0 {
            segments.push(Segment::Plain(rest[..start].to_string()));
        }
        segments.push(Segment::Keyword {
            text: rest[start..end].to_string(),
            keyword_index,
        });
        rest = &rest[end..];
        if rest.is_empty() {
            break;
        }
    }
    segments
}

/// Advisory diagnostic for keywords that occur nowhere in the text. Output is
/// unaffected; this only catches caller mistakes.
fn report_missing<S: AsRef<str>>(text: &str, keywords: &[S]) {
    let missing: Vec<&str> = keywords
        .iter()
        .map(|keyword| keyword.as_ref())
        .filter(|keyword| !keyword.is_empty() && find_case_insensitive(text, keyword).is_none())
        .collect();
    if !missing.is_empty() {
        log::warn!("keywords not found in the text: {}", missing.join(", "));
    }
}

/// Earliest case-insensitive occurrence of `needle` in `haystack`, as a byte
/// span of `haystack`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    haystack.char_indices().find_map(|(start, _)| {
        match_len_at(&haystack[start..], needle).map(|len| (start, start + len))
    })
}

/// Byte length of a case-insensitive match of `needle` at the start of
/// `haystack`, if any.
///
/// Both sides are compared through their Unicode lowercase expansion, but the
/// returned length always lands on a char boundary of `haystack`, which keeps
/// segment slicing exact. A needle ending mid-expansion of a haystack char
/// does not match.
fn match_len_at(haystack: &str, needle: &str) -> Option<usize> {
    let mut needle_lower = needle.chars().flat_map(char::to_lowercase).peekable();
    let mut consumed = 0usize;
    for hay_char in haystack.chars() {
        if needle_lower.peek().is_none() {
            break;
        }
        for low in hay_char.to_lowercase() {
            match needle_lower.next() {
                Some(expected) if expected == low => {}
                _ => return None,
            }
        }
        consumed += hay_char.len_utf8();
    }
    if needle_lower.peek().is_none() {
        Some(consumed)
    } else {
        None
    }
}
