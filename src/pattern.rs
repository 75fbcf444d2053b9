use regex::Regex;

use std::{
    fmt::{self, Display},
    path::{Component, Path},
};

use crate::error::{Error, Result};

/// A compiled glob pattern, matched recursively against paths relative to a
/// data directory.
///
/// A path matches if its trailing components match the pattern, so `*.csv`
/// selects CSV files at any depth and `north/*.csv` selects CSV files
/// directly inside any directory named `north`.
///
/// # Examples
///
/// ```
/// # use std::path::Path;
/// # use sales_total::Pattern;
/// let pattern = Pattern::new("*.csv").unwrap();
/// assert!(pattern.is_match(Path::new("sales.csv")));
/// assert!(pattern.is_match(Path::new("north/region.csv")));
/// assert!(!pattern.is_match(Path::new("notes.txt")));
/// ```
#[derive(Clone, Debug)]
pub struct Pattern {
    glob: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `glob`.
    ///
    /// Supports `*`, `?`, character classes (`[a-z]`, `[!abc]`), and `**` as
    /// a whole component matching any number of directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `glob` is empty or contains a
    /// character class that cannot be compiled, such as `[z-a]`.
    pub fn new(glob: &str) -> Result<Self> {
        if glob.is_empty() {
            return Err(Error::InvalidPattern {
                pattern: glob.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }
        let source = format!("^(?:.*/)?{}$", translate(glob));
        let regex = Regex::new(&source).map_err(|e| Error::InvalidPattern {
            pattern: glob.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Reports whether `relative`, a path relative to the data directory,
    /// matches this pattern.
    #[must_use]
    pub fn is_match(&self, relative: &Path) -> bool {
        let joined = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        self.regex.is_match(&joined)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}

/// Translates glob syntax to an unanchored regular expression.
fn translate(glob: &str) -> String {
    let components: Vec<&str> = glob.split('/').filter(|c| !c.is_empty()).collect();
    let mut out = String::new();
    for (i, component) in components.iter().enumerate() {
        let last = i + 1 == components.len();
        if *component == "**" {
            out.push_str(if last { ".*" } else { "(?:[^/]*/)*" });
            continue;
        }
        out.push_str(&translate_component(component));
        if !last {
            out.push('/');
        }
    }
    out
}

fn translate_component(component: &str) -> String {
    let chars: Vec<char> = component.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                if let Some((class, next)) = translate_class(&chars, i) {
                    out.push_str(&class);
                    i = next;
                    continue;
                }
                out.push_str(r"\[");
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out
}

/// Translates the class opening at `chars[start]`, returning it and the index
/// just past its closing `]`, or `None` if the class is never closed.
fn translate_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start + 1;
    let negated = chars.get(i) == Some(&'!');
    if negated {
        i += 1;
    }
    // A `]` straight after the opening is a member, not the close.
    let body_start = i;
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() && chars[i] != ']' {
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }
    let body = &chars[body_start..i];

    // A negated class still stays within one component.
    let mut class = String::from(if negated { "[^/" } else { "[" });
    let mut j = 0;
    while j < body.len() {
        if j + 2 < body.len() && body[j + 1] == '-' {
            class.push_str(&escape_class_char(body[j]));
            class.push('-');
            class.push_str(&escape_class_char(body[j + 2]));
            j += 3;
        } else {
            class.push_str(&escape_class_char(body[j]));
            j += 1;
        }
    }
    class.push(']');
    Some((class, i + 1))
}

fn escape_class_char(c: char) -> String {
    match c {
        '\\' | '[' | ']' | '^' | '&' | '~' | '-' => format!("\\{c}"),
        _ => c.to_string(),
    }
}
