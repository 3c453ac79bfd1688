//! Include and ignore patterns for directory content rules.
//!
//! Connect descriptors store patterns in delimited form, for example
//! `/\.php$/` or `#^Model#i`. [`EntryPattern::parse`] removes the delimiters
//! once, while the descriptor is read, and keeps a compiled [`Regex`] from
//! then on. Matching uses search semantics: a pattern matches when it is
//! found anywhere in the entry name unless it anchors itself.

use crate::error::{PackagerError, Result};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// A compiled include or ignore pattern.
#[derive(Clone, Debug)]
pub struct EntryPattern {
    source: String,
    regex: Regex,
}

impl EntryPattern {
    /// Parse a pattern as stored in a connect descriptor.
    ///
    /// Returns `Ok(None)` for blank input. Delimited patterns
    /// (`/body/flags`) lose their delimiters and apply their flags: `i`, `m`,
    /// `s`, `x`, `U` and `u`. Any other input is compiled as a bare regular
    /// expression.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidPattern`] if the body is not a valid
    /// regular expression, and [`PackagerError::UnsupportedPatternFlag`] for
    /// any other modifier letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_packager::pattern::EntryPattern;
    ///
    /// let pattern = EntryPattern::parse(r"/\.php$/").unwrap().unwrap();
    /// assert!(pattern.is_match("Data.php"));
    /// assert!(!pattern.is_match("README.txt"));
    /// ```
    pub fn parse(stored: &str) -> Result<Option<Self>> {
        let trimmed = stored.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (body, flags) = split_delimited(trimmed);
        let mut builder = RegexBuilder::new(body);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'U' => builder.swap_greed(true),
                'u' => builder.unicode(true),
                _ => {
                    return Err(PackagerError::UnsupportedPatternFlag {
                        pattern: stored.to_owned(),
                        flag,
                    });
                }
            };
        }
        let regex = builder
            .build()
            .map_err(|source| PackagerError::InvalidPattern {
                pattern: stored.to_owned(),
                source,
            })?;

        Ok(Some(Self {
            source: trimmed.to_owned(),
            regex,
        }))
    }

    /// Return `true` if `name` matches this pattern.
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Return the pattern as written in the descriptor.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for EntryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Characters accepted as pattern delimiters.
const DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|', '`'];

/// Split `/body/flags` into the body and its modifier letters.
///
/// Input without a recognised delimiter pair, or with anything other than
/// ASCII letters after the closing delimiter, is returned unchanged.
fn split_delimited(pattern: &str) -> (&str, &str) {
    let mut chars = pattern.chars();
    let Some(delimiter) = chars.next().filter(|c| DELIMITERS.contains(c)) else {
        return (pattern, "");
    };

    let rest = chars.as_str();
    let Some(close) = rest.rfind(delimiter) else {
        return (pattern, "");
    };
    let (body, tail) = rest.split_at(close);
    let flags = tail.get(delimiter.len_utf8()..).unwrap_or_default();
    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return (pattern, "");
    }
    (body, flags)
}

/// Decide whether an entry called `name` is selected by a rule.
///
/// An entry is selected when `include` is present and matches, and `ignore`
/// is absent or does not match. A rule without an include pattern selects
/// nothing.
#[must_use]
pub fn is_selected(
    name: &str,
    include: Option<&EntryPattern>,
    ignore: Option<&EntryPattern>,
) -> bool {
    include.is_some_and(|pattern| pattern.is_match(name))
        && !ignore.is_some_and(|pattern| pattern.is_match(name))
}
