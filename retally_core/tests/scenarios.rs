//! End-to-end checks of the extraction, ranking and substitution primitives.
//!
//! These tests verify that:
//! - matches come back left to right and never overlap
//! - ranking preserves the number of values and is deterministic
//! - the year, date and domain workflows produce the expected output

use retally_core::{
    GroupId, Pattern, Ranked, SubstitutionTemplate, extract, extract_values, rank, substitute,
    substitute_str,
};

const YEAR_PATTERN: &str = r"\b(?:19|20)\d{2}\b";
const DATE_PATTERN: &str = r"(0?[1-9]|[12]\d|3[01])([ /\-])(0?[1-9]|1[012])\2(\d{4})";
const DOMAIN_PATTERN: &str = r"(https?://)(www\.)?(?P<domain>[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6})(?P<path>/[-a-zA-Z0-9@:%_/+.~#?&=]*)?";

fn spans(pattern: &Pattern, text: &str) -> Vec<(usize, usize)> {
    extract(pattern, text)
        .map(|m| m.map(|m| (m.start(), m.end())))
        .collect::<Result<Vec<_>, _>>()
        .expect("extraction should not fail")
}

#[test]
fn test_years_are_extracted_and_ranked() {
    let pattern = Pattern::new(YEAR_PATTERN).expect("year pattern should compile");
    let values = extract_values(
        &pattern,
        "In 1999 and 2000, then 1999 again.",
        GroupId::Index(0),
    )
    .expect("group 0 always exists");
    assert_eq!(values, ["1999", "2000", "1999"]);

    let ranked = rank(&values);
    assert_eq!(
        ranked.into_vec(),
        [
            Ranked {
                value: "1999".to_string(),
                count: 2
            },
            Ranked {
                value: "2000".to_string(),
                count: 1
            },
        ]
    );
}

#[test]
fn test_years_ignore_longer_numbers() {
    let pattern = Pattern::new(YEAR_PATTERN).expect("year pattern should compile");
    let values = extract_values(&pattern, "19999 1850 2024 20x1", GroupId::Index(0))
        .expect("group 0 always exists");
    assert_eq!(values, ["2024"]);
}

#[test]
fn test_international_date_becomes_us_date() {
    let out = substitute_str(DATE_PATTERN, r"\3\2\1\2\4", "Today's date is 18/09/2017")
        .expect("date substitution should succeed");
    assert_eq!(out, "Today's date is 09/18/2017");
}

#[test]
fn test_date_separator_must_repeat() {
    let out = substitute_str(DATE_PATTERN, r"\3\2\1\2\4", "mixed 18/09-2017, spaced 1 2 2020")
        .expect("date substitution should succeed");
    assert_eq!(out, "mixed 18/09-2017, spaced 2 1 2020");
}

#[test]
fn test_domains_by_named_group() {
    let pattern = Pattern::new(DOMAIN_PATTERN).expect("domain pattern should compile");
    let domains = extract_values(
        &pattern,
        "Visit https://example.com/path and http://foo.org",
        GroupId::Name("domain"),
    )
    .expect("domain group is declared");
    assert_eq!(domains, ["example.com", "foo.org"]);
}

#[test]
fn test_domain_match_exposes_optional_groups() {
    let pattern = Pattern::new(DOMAIN_PATTERN).expect("domain pattern should compile");
    let matches = extract(&pattern, "https://www.rust-lang.org/learn http://foo.org")
        .collect::<Result<Vec<_>, _>>()
        .expect("extraction should not fail");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].get(2), Some("www."));
    assert_eq!(matches[0].name("domain"), Some("rust-lang.org"));
    assert_eq!(matches[0].name("path"), Some("/learn"));
    assert_eq!(matches[1].get(2), None);
    assert_eq!(matches[1].name("path"), None);
}

#[test]
fn test_matches_are_ordered_and_disjoint() {
    let inputs = [
        "aaa bbb aaa",
        "",
        "1999-2000-2001 19 99",
        "ααα aaa βaβ",
        "overlapping: aaaa",
    ];
    for source in [r"a+", r"aa", r"\w*", r"\b", r"a|aa", YEAR_PATTERN] {
        let pattern = Pattern::new(source).expect("test pattern should compile");
        for text in inputs {
            let found = spans(&pattern, text);
            for pair in found.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!(a.0 <= b.0, "{source} on {text:?}: {found:?}");
                assert!(a.1 <= b.0, "{source} on {text:?}: {found:?}");
            }
        }
    }
}

#[test]
fn test_zero_length_matches_terminate() {
    let pattern = Pattern::new(r"a*").expect("pattern should compile");
    let text = "baaac".repeat(100);
    let found = spans(&pattern, &text);
    assert!(!found.is_empty());
    assert!(found.len() <= text.len() + 1);
}

#[test]
fn test_zero_length_matches_on_multibyte_text() {
    let pattern = Pattern::new(r"x*").expect("pattern should compile");
    let found = spans(&pattern, "日本語");
    assert_eq!(found.len(), 4);
}

#[test]
fn test_empty_input() {
    let pattern = Pattern::new(YEAR_PATTERN).expect("year pattern should compile");
    assert_eq!(extract(&pattern, "").count(), 0);
    let values = extract_values(&pattern, "", GroupId::Index(0)).expect("no failure");
    assert!(rank(values).is_empty());
}

#[test]
fn test_rank_invariants() {
    let samples: [&[&str]; 4] = [
        &[],
        &["a"],
        &["x", "y", "x", "z", "y", "x"],
        &["tie", "other", "other", "tie", "last"],
    ];
    for values in samples {
        let ranked = rank(values);
        let mut distinct = values.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        assert_eq!(ranked.len(), distinct.len());
        assert_eq!(ranked.total(), values.len());
        assert_eq!(ranked, rank(values));
        for pair in ranked.as_slice().windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }
}

#[test]
fn test_identity_template_is_noop() {
    let pattern = Pattern::new("needle").expect("pattern should compile");
    let template = SubstitutionTemplate::parse("needle", &pattern).expect("template is valid");
    for text in ["", "hay", "needle", "hay needle hay needleneedle"] {
        assert_eq!(
            substitute(&pattern, &template, text).expect("substitution should succeed"),
            text
        );
    }
}

#[test]
fn test_same_source_compiles_to_same_behaviour() {
    let a = Pattern::new(DOMAIN_PATTERN).expect("pattern should compile");
    let b = Pattern::new(DOMAIN_PATTERN).expect("pattern should compile");
    let text = "see http://a.io/x, https://www.b.com and ftp://c.net";
    assert_eq!(spans(&a, text), spans(&b, text));
}

#[test]
fn test_pattern_shared_across_threads() {
    let pattern = Pattern::new(YEAR_PATTERN).expect("year pattern should compile");
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    extract_values(&pattern, "1914 1918 1939 1945", GroupId::Index(0))
                        .map(|v| v.len())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().ok().and_then(Result::ok), Some(4));
        }
    });
}

#[test]
fn test_ranked_list_serializes_as_pairs() {
    let json = serde_json::to_string(&rank(["b", "a", "b"])).expect("serializable");
    assert_eq!(json, r#"[{"value":"b","count":2},{"value":"a","count":1}]"#);
}
