//! Title normalization and search-query construction for blog lookups.
//!
//! Exhibition titles as displayed are poor search queries: they carry
//! decorative brackets, generic type suffixes ("개인전" etc.) and long
//! subtitles. [`extract_search_title`] reduces a raw title to its most
//! searchable part and [`build_query`] turns that into a phrase-quoted
//! Naver query, splitting mixed Korean/Latin titles so that one script's
//! tokens do not corrupt phrase matching against the other.

/// Bracket and quote punctuation replaced with spaces before any other step.
const BRACKET_CHARS: &[char] = &[
    '《', '》', '〈', '〉', '<', '>', '≪', '≫', '〔', '〕', '【', '】', '『', '』', '「', '」',
    '(', ')',
];

/// Exhibition-type suffixes stripped when they trail the cleaned title.
const TYPE_SUFFIXES: &[&str] = &[
    "개인전", "단체전", "특별전", "기획전", "상설전", "소장품전", "회고전", "초대전", "귀국전",
];

/// Subtitle separators, tried in order on every reduction pass.
const SEPARATORS: &[&str] = &[" : ", ": ", ", ", " - "];

/// Minimum character count a split side must exceed to replace the title.
const MIN_SPLIT_CHARS: usize = 4;

/// Reduces a raw exhibition title to its most searchable part.
///
/// Brackets become spaces, whitespace is collapsed, a trailing type suffix
/// is dropped, and the title is then repeatedly split on subtitle
/// separators keeping the longer side, until no split yields a side longer
/// than [`MIN_SPLIT_CHARS`] characters. Idempotent: reducing an already
/// reduced title is a no-op.
pub fn extract_search_title(title: &str) -> String {
    let unbracketed: String = title
        .chars()
        .map(|c| if BRACKET_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    let collapsed = unbracketed.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut cleaned = strip_type_suffix(&collapsed).to_string();
    while let Some(reduced) = reduce_once(&cleaned) {
        cleaned = reduced;
    }
    cleaned
}

/// Builds the Naver blog-search query for a normalized title and a short
/// place name (see [`short_place`]).
///
/// Phrase quoting forces exact matching; mixed-script titles are split
/// into script-homogeneous segments quoted independently. The place is
/// appended unquoted so it narrows results without requiring an exact hit.
pub fn build_query(search_title: &str, short_place: &str) -> String {
    let has_latin = has_script_run(search_title, is_latin);
    let has_korean = has_script_run(search_title, is_hangul);

    let title_part = if has_latin && has_korean {
        script_segments(search_title)
            .into_iter()
            .map(|segment| format!("\"{segment}\""))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        format!("\"{search_title}\"")
    };

    if short_place.is_empty() {
        title_part
    } else {
        format!("{title_part} {short_place}")
    }
}

/// First whitespace-delimited token of a venue name, or empty.
pub fn short_place(place: &str) -> &str {
    place.split_whitespace().next().unwrap_or("")
}

fn strip_type_suffix(cleaned: &str) -> &str {
    for suffix in TYPE_SUFFIXES {
        if let Some(rest) = cleaned.strip_suffix(suffix) {
            if rest.ends_with(char::is_whitespace) {
                return rest.trim_end();
            }
        }
    }
    cleaned
}

/// One reduction pass: the first separator with a usable split wins.
/// Returns `None` when no separator occurs past position 0 or every
/// candidate side is too short.
fn reduce_once(cleaned: &str) -> Option<String> {
    for sep in SEPARATORS {
        let idx = match cleaned.find(sep) {
            Some(idx) if idx > 0 => idx,
            _ => continue,
        };
        let before = cleaned[..idx].trim();
        let after = cleaned[idx + sep.len()..].trim();
        // Ties favor the right side, which usually holds the subtitle.
        let candidate = if char_count(after) >= char_count(before) {
            after
        } else {
            before
        };
        if char_count(candidate) <= MIN_SPLIT_CHARS {
            continue;
        }
        return Some(candidate.to_string());
    }
    None
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

/// True when `s` contains two or more consecutive characters matching
/// `pred`, mirroring a `{2,}` run test.
fn has_script_run(s: &str, pred: fn(char) -> bool) -> bool {
    let mut run = 0usize;
    for c in s.chars() {
        if pred(c) {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Splits a mixed-script title at whitespace runs whose neighboring
/// characters switch between Latin and Hangul. Segments of one character
/// or fewer are discarded.
fn script_segments(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut segments = Vec::new();
    let mut start = 0usize;

    let mut i = 0usize;
    while i < chars.len() {
        let (pos, c) = chars[i];
        if !c.is_whitespace() || i == 0 {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        if j < chars.len() {
            let prev = chars[i - 1].1;
            let next = chars[j].1;
            let switches = (is_latin(prev) && is_hangul(next))
                || (is_hangul(prev) && is_latin(next));
            if switches {
                segments.push(s[start..pos].trim());
                start = chars[j].0;
            }
        }
        i = j;
    }
    segments.push(s[start..].trim());

    segments
        .into_iter()
        .filter(|segment| char_count(segment) > 1)
        .collect()
}
