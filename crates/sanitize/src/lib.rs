//! Markup policy for imported feed content.
//!
//! Feed bodies arrive as untrusted HTML. `clean_html` reduces them to an
//! allowlisted subset before storage; `strip_tags` flattens titles to plain
//! text. Both are pure string filters with no notion of the surrounding
//! document.

/// Tags that survive `clean_html`
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "caption", "cite", "code", "del", "div", "em",
    "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "ins", "li",
    "ol", "p", "pre", "q", "s", "span", "strong", "sub", "sup", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "u", "ul",
];

/// Tags removed together with everything inside them
const DROP_WITH_CONTENT: &[&str] = &["script", "style", "iframe", "object", "embed", "form"];

/// Attributes that survive on allowed tags
const ALLOWED_ATTRS: &[&str] = &["alt", "height", "href", "src", "title", "width"];

/// Attributes whose values are URLs and need scheme vetting
const URL_ATTRS: &[&str] = &["href", "src"];

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Strip all markup from a string, leaving plain text.
///
/// `<script>`/`<style>` contents are dropped wholesale; every other tag is
/// removed with its inner text kept. The result is trimmed.
pub fn strip_tags(input: &str) -> String {
    let without_blocks = remove_blocks(input, &["script", "style"]);

    let mut out = String::with_capacity(without_blocks.len());
    let mut in_tag = false;
    for c in without_blocks.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Reduce untrusted HTML to the allowed subset.
///
/// - allowed tags keep only allowlisted attributes; `on*` handlers and
///   `javascript:`/`data:` URLs never survive
/// - `script`, `style`, `iframe`, `object`, `embed` and `form` are removed
///   together with their contents
/// - any other tag is dropped but its inner text kept
/// - comments and processing instructions are removed
/// - a `<` that does not open a tag is escaped
pub fn clean_html(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            let next = find_byte(bytes, b'<', pos).unwrap_or(bytes.len());
            out.push_str(&input[pos..next]);
            pos = next;
            continue;
        }

        if input[pos..].starts_with("<!--") {
            pos = match find_sub(bytes, b"-->", pos + 4) {
                Some(end) => end + 3,
                None => bytes.len(),
            };
        } else if matches!(bytes.get(pos + 1), Some(b'!') | Some(b'?')) {
            pos = match find_byte(bytes, b'>', pos + 1) {
                Some(end) => end + 1,
                None => bytes.len(),
            };
        } else if let Some(tag) = Tag::parse(input, pos) {
            if tag.closing {
                if is_allowed(&tag.name) {
                    out.push_str("</");
                    out.push_str(&tag.name);
                    out.push('>');
                }
                pos = tag.end;
            } else if DROP_WITH_CONTENT.contains(&tag.name.as_str()) {
                pos = skip_past_close(bytes, &tag);
            } else if is_allowed(&tag.name) {
                tag.render(&mut out);
                pos = tag.end;
            } else {
                // unknown tag: drop it, keep whatever it wrapped
                pos = tag.end;
            }
        } else {
            out.push_str("&lt;");
            pos += 1;
        }
    }

    out
}

fn is_allowed(name: &str) -> bool {
    ALLOWED_TAGS.contains(&name)
}

/// One parsed tag, opening or closing
struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    closing: bool,
    self_closing: bool,
    /// byte offset just past the terminating `>`
    end: usize,
}

impl Tag {
    /// Parse a tag starting at `pos` (which must point at `<`).
    ///
    /// Returns None when the text is not actually a tag (no name, or no
    /// terminating `>`); callers then treat the `<` as literal text.
    fn parse(input: &str, pos: usize) -> Option<Tag> {
        let bytes = input.as_bytes();
        let mut i = pos + 1;

        let closing = bytes.get(i) == Some(&b'/');
        if closing {
            i += 1;
        }

        let name_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
            i += 1;
        }
        if i == name_start {
            return None;
        }
        let name = input[name_start..i].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                None => return None,
                Some(b'>') => {
                    return Some(Tag {
                        name,
                        attrs,
                        closing,
                        self_closing,
                        end: i + 1,
                    })
                }
                Some(b'/') => {
                    self_closing = true;
                    i += 1;
                }
                Some(_) => {
                    let (attr, next) = parse_attr(input, i)?;
                    if let Some(attr) = attr {
                        attrs.push(attr);
                    }
                    i = next;
                }
            }
        }
    }

    /// Emit the tag with only the attributes the policy allows
    fn render(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            if name.starts_with("on") || !ALLOWED_ATTRS.contains(&name.as_str()) {
                continue;
            }
            if URL_ATTRS.contains(&name.as_str()) && has_blocked_scheme(value) {
                continue;
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
        if self.self_closing {
            out.push_str(" /");
        }
        out.push('>');
    }
}

/// Parse one `name` or `name=value` pair; returns the pair (if well-formed)
/// and the offset after it
fn parse_attr(input: &str, pos: usize) -> Option<(Option<(String, String)>, usize)> {
    let bytes = input.as_bytes();
    let mut i = pos;

    let name_start = i;
    while i < bytes.len() && is_attr_name_byte(bytes[i]) {
        i += 1;
    }
    if i == name_start {
        // not an attribute name; skip one byte so parsing always advances
        return Some((None, i + 1));
    }
    let name = input[name_start..i].to_ascii_lowercase();

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return Some((Some((name, String::new())), i));
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    match bytes.get(i) {
        Some(&q) if q == b'"' || q == b'\'' => {
            let value_start = i + 1;
            let close = find_byte(bytes, q, value_start)?;
            let value = input[value_start..close].to_string();
            Some((Some((name, value)), close + 1))
        }
        _ => {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
            }
            let value = input[value_start..i].to_string();
            Some((Some((name, value)), i))
        }
    }
}

fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Scheme check on a URL attribute value, ignoring embedded whitespace and
/// control bytes that attackers use to split the scheme
fn has_blocked_scheme(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}

/// Skip past the matching close tag of a drop-with-content element
fn skip_past_close(bytes: &[u8], tag: &Tag) -> usize {
    if tag.self_closing {
        return tag.end;
    }
    let needle = format!("</{}", tag.name);
    match find_sub_ci(bytes, needle.as_bytes(), tag.end) {
        Some(close) => match find_byte(bytes, b'>', close) {
            Some(end) => end + 1,
            None => bytes.len(),
        },
        None => bytes.len(),
    }
}

/// Remove `<tag>...</tag>` blocks, contents included
fn remove_blocks(input: &str, tags: &[&str]) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    'outer: while pos < bytes.len() {
        for tag in tags {
            let open = format!("<{}", tag);
            if starts_with_ci(&bytes[pos..], open.as_bytes())
                && is_tag_boundary(bytes.get(pos + open.len()))
            {
                let close = format!("</{}", tag);
                pos = match find_sub_ci(bytes, close.as_bytes(), pos + open.len()) {
                    Some(at) => match find_byte(bytes, b'>', at) {
                        Some(end) => end + 1,
                        None => bytes.len(),
                    },
                    None => bytes.len(),
                };
                continue 'outer;
            }
        }
        let next = find_byte(bytes, b'<', pos + 1).unwrap_or(bytes.len());
        out.push_str(&input[pos..next]);
        pos = next;
    }

    out
}

/// True when the byte after a tag name terminates the name
fn is_tag_boundary(b: Option<&u8>) -> bool {
    matches!(b, None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'>') | Some(b'/'))
}

fn starts_with_ci(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes.get(from..)?.iter().position(|&b| b == needle).map(|i| i + from)
}

fn find_sub(bytes: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn find_sub_ci(bytes: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_basic() {
        assert_eq!(strip_tags("<b>Hello</b> world"), "Hello world");
        assert_eq!(strip_tags("plain text"), "plain text");
        assert_eq!(strip_tags("  <p>trimmed</p>  "), "trimmed");
    }

    #[test]
    fn test_strip_tags_drops_script_contents() {
        assert_eq!(
            strip_tags("before<script>alert(1)</script>after"),
            "beforeafter"
        );
        assert_eq!(
            strip_tags("a<style type=\"text/css\">p { color: red }</style>b"),
            "ab"
        );
    }

    #[test]
    fn test_strip_tags_unclosed_script_drops_rest() {
        assert_eq!(strip_tags("keep<script>lost forever"), "keep");
    }

    #[test]
    fn test_clean_html_keeps_allowed_markup() {
        let input = r#"<p>Hello <a href="https://example.org" title="t">link</a></p>"#;
        assert_eq!(clean_html(input), input);
    }

    #[test]
    fn test_clean_html_drops_unknown_tags_keeps_text() {
        assert_eq!(clean_html("<article><p>kept</p></article>"), "<p>kept</p>");
        assert_eq!(clean_html("<marquee>still here</marquee>"), "still here");
    }

    #[test]
    fn test_clean_html_removes_script_with_contents() {
        assert_eq!(
            clean_html("<p>a</p><script>alert('x')</script><p>b</p>"),
            "<p>a</p><p>b</p>"
        );
        assert_eq!(
            clean_html("<p>a</p><IFRAME src=\"https://evil\">x</IFRAME>"),
            "<p>a</p>"
        );
    }

    #[test]
    fn test_clean_html_filters_attributes() {
        assert_eq!(
            clean_html(r#"<a href="https://x" onclick="alert(1)" style="color:red">y</a>"#),
            r#"<a href="https://x">y</a>"#
        );
        assert_eq!(
            clean_html(r#"<img src="pic.png" alt="a" data-track="1">"#),
            r#"<img src="pic.png" alt="a">"#
        );
    }

    #[test]
    fn test_clean_html_blocks_dangerous_url_schemes() {
        assert_eq!(
            clean_html(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(
            clean_html("<a href=\"java\nscript:alert(1)\">x</a>"),
            "<a>x</a>"
        );
        assert_eq!(
            clean_html(r#"<img src="data:text/html;base64,xxxx">"#),
            "<img>"
        );
    }

    #[test]
    fn test_clean_html_removes_comments() {
        assert_eq!(clean_html("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_clean_html_escapes_stray_angle_bracket() {
        assert_eq!(clean_html("5 < 6"), "5 &lt; 6");
    }

    #[test]
    fn test_clean_html_self_closing() {
        assert_eq!(clean_html("line<br/>break"), "line<br />break");
        assert_eq!(clean_html("line<br>break"), "line<br>break");
    }

    #[test]
    fn test_clean_html_plain_text_untouched() {
        assert_eq!(clean_html("no markup at all"), "no markup at all");
        assert_eq!(clean_html(""), "");
    }
}
