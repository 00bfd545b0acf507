//! Rewriting matches through backslash-style substitution templates.
//!
//! Template syntax:
//! - `\1` .. `\99` insert a numbered group (at most two digits are read)
//! - `\g<2>`, `\g<name>` insert a group by explicit number or name
//! - `\\` is a literal backslash, `\n` `\t` `\r` are control characters
//!
//! The whole match is `\g<0>`. A bare `\0` is rejected: in the classic
//! syntax it starts an octal escape, not a group reference.
//!
//! Any other escape is rejected when the template is parsed, as is a
//! reference to a group the pattern does not declare.

use tracing::debug;

use crate::error::{Error, Result};
use crate::pattern::{GroupId, Match, Pattern};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Index(usize),
    Name(String),
}

/// A parsed template, checked against the groups of one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl SubstitutionTemplate {
    pub fn parse(source: &str, pattern: &Pattern) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\\' {
                literal.push(c);
                continue;
            }

            let Some(escaped) = chars.next() else {
                return Err(Error::invalid_template(source, "dangling backslash"));
            };

            let group = match escaped {
                '\\' => {
                    literal.push('\\');
                    continue;
                }
                'n' => {
                    literal.push('\n');
                    continue;
                }
                't' => {
                    literal.push('\t');
                    continue;
                }
                'r' => {
                    literal.push('\r');
                    continue;
                }
                '0' => {
                    return Err(Error::invalid_template(
                        source,
                        "\\0 is not a group reference, use \\g<0> for the whole match",
                    ));
                }
                '1'..='9' => {
                    let mut index = escaped.to_digit(10).map_or(0, |d| d as usize);
                    if let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                        index = index * 10 + d as usize;
                        chars.next();
                    }
                    Piece::Index(index)
                }
                'g' => {
                    if chars.next() != Some('<') {
                        return Err(Error::invalid_template(source, "expected `<` after \\g"));
                    }
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '>' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed || name.is_empty() {
                        return Err(Error::invalid_template(source, "malformed \\g<...> reference"));
                    }
                    match GroupId::parse(&name) {
                        GroupId::Index(i) => Piece::Index(i),
                        GroupId::Name(_) => Piece::Name(name),
                    }
                }
                other => {
                    return Err(Error::invalid_template(
                        source,
                        format!("unknown escape \\{other}"),
                    ));
                }
            };

            check_declared(source, pattern, &group)?;

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(group);
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Append the expansion of this template for `m` to `out`.
    /// Groups that did not participate expand to nothing.
    pub fn expand(&self, m: &Match<'_>, out: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Index(i) => out.push_str(m.get(*i).unwrap_or_default()),
                Piece::Name(n) => out.push_str(m.name(n).unwrap_or_default()),
            }
        }
    }
}

fn check_declared(source: &str, pattern: &Pattern, piece: &Piece) -> Result<()> {
    let (declared, label) = match piece {
        Piece::Index(i) => (pattern.has_group(GroupId::Index(*i)), i.to_string()),
        Piece::Name(n) => (pattern.has_group(GroupId::Name(n.as_str())), n.clone()),
        Piece::Literal(_) => return Ok(()),
    };
    if declared {
        Ok(())
    } else {
        Err(Error::invalid_template(
            source,
            format!("reference to undeclared group {label}"),
        ))
    }
}

/// Replace every match of `pattern` in `text` with the expanded template.
pub fn substitute(pattern: &Pattern, template: &SubstitutionTemplate, text: &str) -> Result<String> {
    substitute_n(pattern, template, text, 0)
}

/// Like [`substitute`], replacing at most `limit` matches (`0` = all).
pub fn substitute_n(
    pattern: &Pattern,
    template: &SubstitutionTemplate,
    text: &str,
    limit: usize,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut replaced = 0;

    for m in pattern.matches(text) {
        if limit != 0 && replaced == limit {
            break;
        }
        let m = m?;
        out.push_str(&text[last..m.start()]);
        template.expand(&m, &mut out);
        last = m.end();
        replaced += 1;
    }

    if replaced == 0 {
        return Ok(text.to_string());
    }

    out.push_str(&text[last..]);
    debug!("Replaced {replaced} matches of {:?}", pattern.as_str());
    Ok(out)
}

/// Compile, parse and substitute in one call.
pub fn substitute_str(pattern: &str, template: &str, text: &str) -> Result<String> {
    let pattern = Pattern::new(pattern)?;
    let template = SubstitutionTemplate::parse(template, &pattern)?;
    substitute(&pattern, &template, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(template: &str, pattern: &str) -> Result<SubstitutionTemplate> {
        SubstitutionTemplate::parse(template, &Pattern::new(pattern).unwrap())
    }

    #[test]
    fn test_parse_pieces() {
        let t = parse(r"[\2-\1]", r"(a)(b)").unwrap();
        assert_eq!(
            t.pieces,
            [
                Piece::Literal("[".into()),
                Piece::Index(2),
                Piece::Literal("-".into()),
                Piece::Index(1),
                Piece::Literal("]".into()),
            ]
        );
    }

    #[test]
    fn test_parse_escapes() {
        let t = parse(r"a\\b\n\tc", r"x").unwrap();
        assert_eq!(t.pieces, [Piece::Literal("a\\b\n\tc".into())]);
    }

    #[test]
    fn test_two_digit_reference() {
        let groups = "(a)".repeat(12);
        let t = parse(r"\12", &groups).unwrap();
        assert_eq!(t.pieces, [Piece::Index(12)]);
        // Only two digits are consumed.
        let t = parse(r"\123", &groups).unwrap();
        assert_eq!(t.pieces, [Piece::Index(12), Piece::Literal("3".into())]);
    }

    #[test]
    fn test_undeclared_group_rejected() {
        let err = parse(r"\3", r"(a)(b)").unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate { .. }));
        assert!(parse(r"\g<host>", r"(?P<domain>a)").is_err());
        assert!(parse(r"\g<domain>", r"(?P<domain>a)").is_ok());
    }

    #[test]
    fn test_malformed_escapes_rejected() {
        assert!(parse("\\", r"a").is_err());
        assert!(parse(r"\q", r"a").is_err());
        assert!(parse(r"\g1", r"(a)").is_err());
        assert!(parse(r"\g<1", r"(a)").is_err());
        assert!(parse(r"\g<>", r"(a)").is_err());
    }

    #[test]
    fn test_substitute_all() {
        let out = substitute_str(r"(\w+)@(\w+)", r"\2 at \1", "me@home you@work").unwrap();
        assert_eq!(out, "home at me work at you");
    }

    #[test]
    fn test_substitute_limit() {
        let p = Pattern::new(r"o").unwrap();
        let t = SubstitutionTemplate::parse("0", &p).unwrap();
        assert_eq!(substitute_n(&p, &t, "foo boo", 2).unwrap(), "f00 boo");
        assert_eq!(substitute_n(&p, &t, "foo boo", 0).unwrap(), "f00 b00");
    }

    #[test]
    fn test_absent_group_expands_empty() {
        let out = substitute_str(r"(a)|(b)", r"<\1\2>", "ab").unwrap();
        assert_eq!(out, "<a><b>");
    }

    #[test]
    fn test_no_match_returns_input() {
        let out = substitute_str(r"\d+", r"#", "no digits here").unwrap();
        assert_eq!(out, "no digits here");
    }

    #[test]
    fn test_comment_block_split() {
        let out = substitute_str(r"(/\*+)(.*)(\*+/)", r"\1\n\2\n\3", "a { } /* note */").unwrap();
        assert_eq!(out, "a { } /*\n note \n*/");
    }

    #[test]
    fn test_whole_match_reference() {
        let out = substitute_str(r"\d+", r"[\g<0>]", "a1b22").unwrap();
        assert_eq!(out, "a[1]b[22]");
    }

    #[test]
    fn test_backslash_zero_rejected() {
        let err = parse(r"\0", r"(a)").unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate { .. }));
        assert!(err.to_string().contains(r"\g<0>"));
        assert!(parse(r"\01", r"(a)").is_err());
        // A zero in second position is still part of a group number.
        let groups = "(a)".repeat(10);
        assert_eq!(parse(r"\10", &groups).unwrap().pieces, [Piece::Index(10)]);
    }

    #[test]
    fn test_empty_matches_around_replacements() {
        assert_eq!(substitute_str(r"x*", "-", "abxd").unwrap(), "-a-b--d-");
        assert_eq!(substitute_str(r"a*", "<\\g<0>>", "baaa").unwrap(), "<>b<aaa><>");
    }
}
