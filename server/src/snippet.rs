use regex::RegexBuilder;

/// Characters kept on each side of the first match.
pub const SNIPPET_RADIUS: usize = 50;

/// Window of text around the first case-insensitive occurrence of any term,
/// tried in order. Falls back to the start of the document. Newlines are flattened.
pub fn snippet(text: &str, terms: &[String]) -> String {
    for term in terms {
        if term.trim().is_empty() { continue; }
        if let Some(idx) = find_case_insensitive(text, term) {
            let start = text[..idx].char_indices().rev().nth(SNIPPET_RADIUS - 1).map(|(i, _)| i).unwrap_or(0);
            let end = text[idx..].char_indices().nth(SNIPPET_RADIUS).map(|(i, _)| idx + i).unwrap_or(text.len());
            return flatten(&text[start..end]);
        }
    }
    flatten(&text.chars().take(SNIPPET_RADIUS * 2).collect::<String>())
}

/// Byte offset of the first case-insensitive match of `needle`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let pat = RegexBuilder::new(&regex::escape(needle)).case_insensitive(true).build().ok()?;
    pat.find(haystack).map(|m| m.start())
}

fn flatten(s: &str) -> String {
    s.trim().replace(['\r', '\n'], " ")
}

/// HTML-escape `snippet` and wrap every case-insensitive occurrence of any term
/// in `<em>` tags. The tags are the only markup in the output.
pub fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut escaped: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    // Longest first so "dogs" wins over "dog".
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    let pat = match RegexBuilder::new(&escaped.join("|")).case_insensitive(true).build() {
        Ok(pat) if !escaped.is_empty() => pat,
        _ => return escape_html(snippet),
    };
    let mut out = String::with_capacity(snippet.len() + 16);
    let mut last = 0;
    for m in pat.find_iter(snippet) {
        if m.as_str().is_empty() { continue; }
        out.push_str(&escape_html(&snippet[last..m.start()]));
        out.push_str("<em>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</em>");
        last = m.end();
    }
    out.push_str(&escape_html(&snippet[last..]));
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
