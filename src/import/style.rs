//! Inline `style` attribute parsing.

use std::sync::LazyLock;

use regex_lite::Regex;

/// `300px`, `300.5px`
static PX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)px$").unwrap());

/// `45%`
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)%$").unwrap());

/// Declarations of one `style` attribute, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Split on top-level `;`, ignoring separators inside quotes or
    /// parentheses (data URIs carry `;` inside `url(…)`).
    pub fn parse(style: &str) -> Self {
        let mut declarations = Vec::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut start = 0;

        for (i, c) in style.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => depth = depth.saturating_sub(1),
                (None, ';') if depth == 0 => {
                    push_declaration(&mut declarations, &style[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        push_declaration(&mut declarations, &style[start..]);

        Self { declarations }
    }

    /// Value of a property; the last declaration wins.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// A whole-pixel length.
    pub fn px(&self, property: &str) -> Option<u32> {
        number(&PX_RE, self.get(property)?)
    }

    pub fn percent(&self, property: &str) -> Option<u32> {
        number(&PERCENT_RE, self.get(property)?)
    }

    /// Target of a `url(…)` value.
    pub fn url(&self, property: &str) -> Option<String> {
        css_url(self.get(property)?)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

fn push_declaration(declarations: &mut Vec<(String, String)>, raw: &str) {
    let Some((name, value)) = raw.split_once(':') else {
        return;
    };
    let name = name.trim().to_ascii_lowercase();
    let value = value.trim();
    if !name.is_empty() && !value.is_empty() {
        declarations.push((name, value.to_string()));
    }
}

fn number(re: &Regex, value: &str) -> Option<u32> {
    let caps = re.captures(value.trim())?;
    let n: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(n.round() as u32)
}

/// Extract the target of `url(…)` from a CSS value.
pub fn css_url(value: &str) -> Option<String> {
    let start = value.find("url(")? + "url(".len();
    let end = value.rfind(')')?;
    if end < start {
        return None;
    }
    let inner = value[start..end].trim();
    let inner = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(inner);
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Parse a plain integer attribute such as `width="560"`.
pub fn int_attr(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.parse::<f64>().ok().filter(|n| *n >= 0.0).map(|n| n.round() as u32)
}
