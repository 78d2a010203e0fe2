// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rust source text of step texts, names and configuration.
//!
//! Every text gets embedded so that evaluating the generated expression
//! reproduces it byte-for-byte. Outline placeholders become inline `format!`
//! arguments named `_0`, `_1`, etc., in which case literal braces are
//! doubled.

use std::collections::HashSet;

use inflector::cases::snakecase::to_snake_case;
use lazy_regex::regex;

/// Words that cannot be used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const",
    "continue", "crate", "do", "dyn", "else", "enum", "extern", "false",
    "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "macro",
    "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
    "while", "yield",
];

/// Piece of a text which may contain outline placeholders.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Segment<'t> {
    /// Text taken as is.
    Literal(&'t str),

    /// Placeholder referring the column with the given index.
    Placeholder(usize),
}

/// Splits the `text` on `<name>` placeholders naming one of the `columns`.
///
/// Anything in angle brackets not naming a column stays literal.
pub(crate) fn segments<'t>(text: &'t str, columns: &[String]) -> Vec<Segment<'t>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in regex!(r"<([^<>]+)>").captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(idx) = columns.iter().position(|c| c == name.as_str()) else {
            continue;
        };
        if last < whole.start() {
            out.push(Segment::Literal(&text[last..whole.start()]));
        }
        out.push(Segment::Placeholder(idx));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Literal(&text[last..]));
    }
    out
}

/// Escapes the `text` for a string literal body, doubling braces if it's
/// going to be a format string.
fn escape(text: &str, format: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' if format => out.push_str("{{"),
            '}' if format => out.push_str("}}"),
            c => out.extend(c.escape_debug()),
        }
    }
    out
}

/// Renders a string literal of the `text`.
pub(crate) fn str_literal(text: &str) -> String {
    format!("\"{}\"", escape(text, false))
}

/// Renders a raw string literal of the `text`, with as many `#`s as needed.
pub(crate) fn raw_literal(text: &str) -> String {
    // Every `"` followed by `n` hashes requires at least `n + 1` of them.
    let hashes = regex!(r##""#*"##)
        .find_iter(text)
        .map(|m| m.len())
        .max()
        .unwrap_or_default();
    let fence = "#".repeat(hashes);
    format!("r{fence}\"{text}\"{fence}")
}

/// Renders a `String` expression of the `text`, substituting placeholders
/// naming any of the `columns`.
pub(crate) fn string_expr(text: &str, columns: &[String]) -> String {
    match format_string(text, columns) {
        Some(body) => format!("format!(\"{body}\")"),
        None => format!("String::from({})", str_literal(text)),
    }
}

/// Renders a `&str` expression of the `text`, substituting placeholders
/// naming any of the `columns`.
pub(crate) fn str_expr(text: &str, columns: &[String]) -> String {
    match format_string(text, columns) {
        Some(body) => format!("&format!(\"{body}\")"),
        None => str_literal(text),
    }
}

/// Renders the body of a format string for the `text`, unless it has no
/// placeholders at all.
fn format_string(text: &str, columns: &[String]) -> Option<String> {
    let segments = segments(text, columns);
    if !segments.iter().any(|s| matches!(s, Segment::Placeholder(_))) {
        return None;
    }
    Some(
        segments
            .iter()
            .map(|s| match s {
                Segment::Literal(lit) => escape(lit, true),
                Segment::Placeholder(i) => format!("{{_{i}}}"),
            })
            .collect(),
    )
}

/// Converts a free-text `name` into a `snake_case` identifier, using the
/// `fallback` for names without any usable characters.
pub(crate) fn ident(name: &str, fallback: &str) -> String {
    let snake = to_snake_case(name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>();
    let mut id = snake
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if id.is_empty() {
        id = fallback.to_owned();
    } else if id.starts_with(|c: char| c.is_ascii_digit()) {
        id = format!("{fallback}_{id}");
    }
    if KEYWORDS.contains(&id.as_str()) {
        id.push('_');
    }
    id
}

/// Identifiers already taken in a single module.
#[derive(Clone, Debug, Default)]
pub(crate) struct Names(HashSet<String>);

impl Names {
    /// Creates [`Names`] with the given identifiers already taken.
    pub(crate) fn reserved(taken: &[&str]) -> Self {
        Self(taken.iter().map(|s| (*s).to_owned()).collect())
    }

    /// Takes the `base` identifier, suffixing it with a number if it's taken
    /// already.
    pub(crate) fn claim(&mut self, base: &str) -> String {
        let mut name = base.to_owned();
        let mut n = 1;
        while self.0.contains(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        _ = self.0.insert(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    /// Evaluates a rendered `format!` expression with the given `values`.
    fn eval_format(expr: &str, values: &[&str]) -> String {
        let mac = syn::parse_str::<syn::ExprMacro>(expr).unwrap();
        assert!(mac.mac.path.is_ident("format"));
        let fmt = syn::parse2::<syn::LitStr>(mac.mac.tokens).unwrap().value();

        let mut out = String::new();
        let mut chars = fmt.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    _ = chars.next();
                    out.push('{');
                }
                '}' => {
                    assert_eq!(chars.next(), Some('}'), "lone `}}` in {fmt}");
                    out.push('}');
                }
                '{' => {
                    let name = chars.by_ref().take_while(|c| *c != '}').collect::<String>();
                    let idx: usize = name.trim_start_matches('_').parse().unwrap();
                    out.push_str(values[idx]);
                }
                c => out.push(c),
            }
        }
        out
    }

    fn eval_literal(expr: &str) -> String {
        syn::parse_str::<syn::LitStr>(expr).unwrap().value()
    }

    #[test]
    fn splits_known_placeholders_only() {
        let cols = columns(&["count", "fruit name"]);
        assert_eq!(
            segments("eat <count> <fruit name> in <div>", &cols),
            [
                Segment::Literal("eat "),
                Segment::Placeholder(0),
                Segment::Literal(" "),
                Segment::Placeholder(1),
                Segment::Literal(" in <div>"),
            ],
        );
        assert_eq!(segments("<count>", &cols), [Segment::Placeholder(0)]);
    }

    #[test]
    fn plain_text_round_trips() {
        for text in [
            r"a \n backslash \ and \\ double",
            "quotes \" and ' and `backticks`",
            "${interpolation} and {braces} and #{ruby}",
            "tab\there, newline\nthere, emoji 🥒, accent é",
        ] {
            let expr = string_expr(text, &[]);
            let lit = expr.strip_prefix("String::from(").unwrap().strip_suffix(')').unwrap();
            assert_eq!(eval_literal(lit), text);
            assert_eq!(eval_literal(&str_expr(text, &[])), text);
        }
    }

    #[test]
    fn outline_text_round_trips() {
        let cols = columns(&["a", "b"]);
        let text = r"say <a> then `${x}` and {<b>} with \<a>\";
        let values = ["1`${y}", r"\{}\"];

        let expr = string_expr(text, &cols);
        assert_eq!(
            eval_format(&expr, &values),
            r"say 1`${y} then `${x}` and {\{}\} with \1`${y}\",
        );
        assert!(str_expr(text, &cols).starts_with("&format!("));
    }

    #[test]
    fn raw_literals_never_close_early() {
        let json = r###"{"a": "b\"#", "c": "\"##"}"###;
        let lit = raw_literal(json);
        assert!(lit.starts_with("r###\""));
        assert_eq!(eval_literal(&lit), json);
        assert_eq!(raw_literal("{}"), "r\"{}\"");
    }

    #[test]
    fn derives_identifiers() {
        assert_eq!(ident("Eating cucumbers!", "scenario"), "eating_cucumbers");
        assert_eq!(ident("Not found / 404 page", "scenario"), "not_found_404_page");
        assert_eq!(ident("42 jars", "scenario"), "scenario_42_jars");
        assert_eq!(ident("¿?", "scenario"), "scenario");
        assert_eq!(ident("Match", "scenario"), "match_");
    }

    #[test]
    fn claims_unique_names() {
        let mut names = Names::reserved(&["feature"]);
        assert_eq!(names.claim("feature"), "feature_2");
        assert_eq!(names.claim("eat"), "eat");
        assert_eq!(names.claim("eat"), "eat_2");
        assert_eq!(names.claim("eat"), "eat_3");
    }
}
