//! Compiled patterns and the match scanner.
//!
//! Patterns are compiled with `fancy_regex`, which runs plain expressions on
//! the linear-time `regex` engine and falls back to backtracking only for
//! constructs such as backreferences (`\2`) or look-around.

use std::fmt;
use std::ops::Range;

use fancy_regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use crate::error::{Error, Result};

/// Selects a capture group by 1-based position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupId<'a> {
    Index(usize),
    Name(&'a str),
}

impl<'a> GroupId<'a> {
    /// Interpret a user-supplied selector: all digits means a position,
    /// anything else a name.
    #[must_use]
    pub fn parse(selector: &'a str) -> Self {
        selector
            .parse::<usize>()
            .map_or(Self::Name(selector), Self::Index)
    }
}

impl From<usize> for GroupId<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for GroupId<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for GroupId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => write!(f, "<{n}>"),
        }
    }
}

/// Builder for [`Pattern`] with engine options.
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    source: String,
    backtrack_limit: Option<usize>,
}

impl PatternBuilder {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            backtrack_limit: None,
        }
    }

    /// Cap the work the backtracking engine may do on a single search.
    #[must_use]
    pub const fn backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<Pattern> {
        let mut builder = RegexBuilder::new(&self.source);
        if let Some(limit) = self.backtrack_limit {
            builder.backtrack_limit(limit);
        }

        let regex = builder.build().map_err(|e| Error::InvalidPattern {
            pattern: self.source.clone(),
            source: Box::new(e),
        })?;

        let names = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect::<Vec<_>>();

        debug!(
            "Compiled pattern {:?} ({} groups, {} named)",
            self.source,
            regex.captures_len().saturating_sub(1),
            names.len()
        );

        Ok(Pattern { regex, names })
    }
}

/// An immutable compiled pattern. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    names: Vec<String>,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        PatternBuilder::new(source).build()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of numbered groups, not counting the implicit group 0.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// Declared group names in the order they appear.
    #[must_use]
    pub fn group_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn has_group(&self, group: GroupId<'_>) -> bool {
        match group {
            GroupId::Index(i) => i <= self.group_count(),
            GroupId::Name(name) => self.names.iter().any(|n| n == name),
        }
    }

    pub fn is_match(&self, text: &str) -> Result<bool> {
        self.regex
            .is_match(text)
            .map_err(|e| Error::Backtrack(Box::new(e)))
    }

    /// Scan `text` left to right for non-overlapping matches.
    #[must_use]
    pub const fn matches<'p, 't>(&'p self, text: &'t str) -> Matches<'p, 't> {
        Matches {
            regex: &self.regex,
            text,
            pos: 0,
            last_empty: None,
            done: false,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One located occurrence of a pattern.
#[derive(Debug)]
pub struct Match<'t> {
    caps: Captures<'t>,
    start: usize,
    end: usize,
    text: &'t str,
}

impl<'t> Match<'t> {
    fn from_captures(caps: Captures<'t>) -> Self {
        let (start, end, text) = caps
            .get(0)
            .map_or((0, 0, ""), |m| (m.start(), m.end(), m.as_str()));
        Self {
            caps,
            start,
            end,
            text,
        }
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub const fn as_str(&self) -> &'t str {
        self.text
    }

    /// Numbered group; `None` when the group did not participate.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'t str> {
        self.caps.get(index).map(|m| m.as_str())
    }

    #[must_use]
    pub fn name(&self, name: &str) -> Option<&'t str> {
        self.caps.name(name).map(|m| m.as_str())
    }

    #[must_use]
    pub fn group(&self, group: GroupId<'_>) -> Option<&'t str> {
        match group {
            GroupId::Index(i) => self.get(i),
            GroupId::Name(n) => self.name(n),
        }
    }
}

/// Lazy iterator over the matches of a pattern. Stops after the first error.
///
/// Each search resumes where the previous match ended. An empty match is
/// reported even right after a non-empty one; only a second empty match at
/// the same position is skipped, by stepping one character forward.
pub struct Matches<'p, 't> {
    regex: &'p Regex,
    text: &'t str,
    pos: usize,
    last_empty: Option<usize>,
    done: bool,
}

impl Matches<'_, '_> {
    /// Byte offset of the character after `at`, or `None` at the end of text.
    fn step(&self, at: usize) -> Option<usize> {
        self.text[at..].chars().next().map(|c| at + c.len_utf8())
    }
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Result<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let caps = match self.regex.captures_from_pos(self.text, self.pos) {
                Ok(Some(caps)) => caps,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::Backtrack(Box::new(e))));
                }
            };

            let m = Match::from_captures(caps);
            if m.start == m.end && self.last_empty == Some(m.start) {
                match self.step(m.start) {
                    Some(next) => self.pos = next,
                    None => self.done = true,
                }
                continue;
            }

            self.pos = m.end;
            self.last_empty = (m.start == m.end).then_some(m.end);
            return Some(Ok(m));
        }
        None
    }
}

/// Every non-overlapping match of `pattern` in `text`, leftmost first.
#[must_use]
pub fn extract<'p, 't>(pattern: &'p Pattern, text: &'t str) -> Matches<'p, 't> {
    pattern.matches(text)
}

/// Collect one group from every match, skipping matches where the group
/// did not participate.
pub fn extract_values<'t>(
    pattern: &Pattern,
    text: &'t str,
    group: GroupId<'_>,
) -> Result<Vec<&'t str>> {
    if !pattern.has_group(group) {
        return Err(Error::UnknownGroup(group.to_string()));
    }

    let mut values = Vec::new();
    for m in pattern.matches(text) {
        if let Some(value) = m?.group(group) {
            values.push(value);
        }
    }

    debug!("Extracted {} values for group {group}", values.len());
    Ok(values)
}
