//! Just enough HTML scraping for the Hakuna pages we read.
//!
//! Hakuna is a server-rendered Rails app; the markup we depend on is stable
//! and shallow, so tags are matched with regexes instead of a full parser.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<form\b([^>]*)>(.*?)</form\s*>").unwrap());

static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<input\b([^>]*)>").unwrap());

static META_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\b([^>]*)>").unwrap());

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[a-z][a-z0-9]*\b([^>]*)>").unwrap());

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .unwrap()
});

static TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(?:\s|<[^>]*>)*([^<]*)").unwrap());

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap());

/// The first form on a page: where it posts and its prefilled inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub action: String,
    /// Input name and value; inputs without a value carry `None`.
    pub inputs: Vec<(String, Option<String>)>,
}

/// Extracts the first `<form>` on the page.
pub fn first_form(html: &str) -> Option<Form> {
    let caps = FORM_RE.captures(html)?;
    let action = attribute(&caps[1], "action").unwrap_or_default();
    let inputs = INPUT_RE
        .captures_iter(&caps[2])
        .filter_map(|input| {
            let name = attribute(&input[1], "name")?;
            Some((name, attribute(&input[1], "value")))
        })
        .collect();
    Some(Form { action, inputs })
}

/// Reads `<meta name="csrf-token" content="...">`.
pub fn csrf_token(html: &str) -> Option<String> {
    META_RE
        .captures_iter(html)
        .find(|meta| attribute(&meta[1], "name").as_deref() == Some("csrf-token"))
        .and_then(|meta| attribute(&meta[1], "content"))
}

/// Reads the start and end times of every `.timestamps` block, in page order.
///
/// Each block runs from its opening tag to the next block. Returns an error
/// message naming the block if either time is missing or not `HH:MM`.
pub fn timestamps(html: &str) -> Result<Vec<(NaiveTime, NaiveTime)>, String> {
    let tagged: Vec<_> = TAG_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let class = attribute(&caps[1], "class")?;
            Some((whole.start(), whole.end(), class))
        })
        .collect();

    let blocks: Vec<_> = tagged
        .iter()
        .filter(|(_, _, class)| has_class(class, "timestamps"))
        .map(|(start, _, _)| *start)
        .collect();

    let mut spans = Vec::with_capacity(blocks.len());
    for (index, &block_start) in blocks.iter().enumerate() {
        let block_end = blocks.get(index + 1).copied().unwrap_or(html.len());
        let block: Vec<_> = tagged
            .iter()
            .filter(|(start, _, _)| *start > block_start && *start < block_end)
            .collect();
        let start = time_in_block(html, &block, "start-time", index + 1)?;
        let end = time_in_block(html, &block, "end-time", index + 1)?;
        spans.push((start, end));
    }
    Ok(spans)
}

/// Parses the `HH:MM` text following the first tag carrying `class_name`.
fn time_in_block(
    html: &str,
    block: &[&(usize, usize, String)],
    class_name: &str,
    entry: usize,
) -> Result<NaiveTime, String> {
    let &&(_, tag_end, _) = block
        .iter()
        .find(|(_, _, class)| has_class(class, class_name))
        .ok_or_else(|| format!("entry {entry} has no {class_name}"))?;
    let text = TEXT_RE
        .captures(&html[tag_end..])
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();
    NaiveTime::parse_from_str(&text, "%H:%M")
        .map_err(|err| format!("entry {entry} has invalid {class_name} {text:?}: {err}"))
}

fn has_class(class_attr: &str, name: &str) -> bool {
    class_attr.split_whitespace().any(|class| class == name)
}

/// Looks up one attribute in the inside of a tag, decoding basic entities.
fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
        Some(unescape(value.as_str()))
    })
}

fn unescape(value: &str) -> String {
    let decoded = NUMERIC_ENTITY_RE.replace_all(value, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    });
    decoded
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Hakuna</title></head>
<body>
  <form class="new_user" id="new_user" action="/users/sign_in" accept-charset="UTF-8" method="post">
    <input name="utf8" type="hidden" value="&#x2713;" />
    <input type="hidden" name="authenticity_token" value="abc+def/ghi==" />
    <input type="text" name="username" id="user_username" />
    <input type="password" name="password" id="user_password" />
    <input type="checkbox" name="remember_me" value="1" />
    <input type="submit" value="Login" />
  </form>
</body>
</html>"#;

    const DAY_PAGE: &str = r#"<html>
<head>
  <meta name="csrf-param" content="authenticity_token" />
  <meta name="csrf-token" content="tok&amp;en==" />
</head>
<body>
  <div class="time-entry">
    <div class="timestamps">
      <span class="start-time">
        08:10
      </span>
      &ndash;
      <span class="end-time">12:00</span>
    </div>
  </div>
  <div class="time-entry">
    <div class="timestamps muted"><span class="start-time"><b>13:05</b></span> - <span class="end-time">17:30</span></div>
  </div>
</body>
</html>"#;

    #[test]
    fn first_form_reads_action_and_inputs() {
        let form = first_form(LOGIN_PAGE).unwrap();
        assert_eq!(form.action, "/users/sign_in");
        assert_eq!(
            form.inputs,
            vec![
                ("utf8".to_string(), Some("\u{2713}".to_string())),
                ("authenticity_token".to_string(), Some("abc+def/ghi==".to_string())),
                ("username".to_string(), None),
                ("password".to_string(), None),
                ("remember_me".to_string(), Some("1".to_string())),
            ]
        );
    }

    #[test]
    fn first_form_missing() {
        assert!(first_form("<html><body>no form</body></html>").is_none());
    }

    #[test]
    fn csrf_token_is_unescaped() {
        assert_eq!(csrf_token(DAY_PAGE).as_deref(), Some("tok&en=="));
        assert_eq!(csrf_token(LOGIN_PAGE), None);
    }

    #[test]
    fn timestamps_reads_every_block() {
        let spans = timestamps(DAY_PAGE).unwrap();
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(spans, vec![(t(8, 10), t(12, 0)), (t(13, 5), t(17, 30))]);
    }

    #[test]
    fn timestamps_empty_day() {
        assert_eq!(timestamps("<html><body></body></html>").unwrap(), vec![]);
    }

    #[test]
    fn timestamps_rejects_block_without_end() {
        let html = r#"<div class="timestamps"><span class="start-time">08:00</span></div>"#;
        let err = timestamps(html).unwrap_err();
        assert_eq!(err, "entry 1 has no end-time");
    }

    #[test]
    fn numeric_entities_are_decoded() {
        assert_eq!(unescape("&#x2713; &#39;a&#39; &amp;amp; &#xZZ;"), "\u{2713} 'a' &amp; &#xZZ;");
    }

    #[test]
    fn attribute_accepts_single_quotes_and_bare_values() {
        assert_eq!(attribute(" name='a' value=b", "value").as_deref(), Some("b"));
        assert_eq!(attribute(" name='a' value=b", "name").as_deref(), Some("a"));
    }
}
