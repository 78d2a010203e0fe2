//! Registration snippets suggested for undefined steps.
//!
//! Literal runs of the step text that look like values get replaced with
//! parameter placeholders. When several kinds match at the same position,
//! the longest match wins, and ties are broken in the order: `{int}`,
//! `{float}`, `{string}`, `{word}`.

use gherkin::StepType;
use inflector::cases::snakecase::to_snake_case;
use itertools::Itertools as _;
use lazy_regex::regex;
use regex::Regex;

use super::context::StepData;

/// Kind of a placeholder inferred from a literal run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Inferred {
    Int,
    Float,
    String,
    Word,
}

impl Inferred {
    const fn placeholder(self) -> &'static str {
        match self {
            Self::Int => "{int}",
            Self::Float => "{float}",
            Self::String => "{string}",
            Self::Word => "{word}",
        }
    }

    /// Returns the anchored [`Regex`] matching a literal of this kind.
    fn regex(self) -> &'static Regex {
        match self {
            Self::Int => regex!(r"^-?\d+"),
            Self::Float => regex!(r"^-?\d*\.\d+"),
            Self::String => {
                regex!(r#"^(?:"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')"#)
            }
            Self::Word => regex!(r"^[^\s]*(?:\d[^\s\d]|[^\s\d]\d)[^\s]*"),
        }
    }
}

/// Piece of a step text.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Part<'t> {
    Literal(&'t str),
    Param(Inferred),
}

/// Generates a registration snippet implementing the given step.
#[must_use]
pub fn generate(step_type: StepType, text: &str, data: Option<&StepData>) -> String {
    let parts = split(text);
    let expression = render(&parts, false);
    let method = match step_type {
        StepType::Given => "given",
        StepType::When => "when",
        StepType::Then => "then",
    };
    let name = fn_name(&parts);

    let mut out = format!(
        "fn {name}(state: &mut State<World>, ctx: Context) \
         -> LocalBoxFuture<'_, anyhow::Result<()>> {{\n    \
         Box::pin(async move {{\n",
    );
    if let Some(data) = data {
        let accessor = match data {
            StepData::Table(_) => "ctx.data_table()",
            StepData::DocString(_) => "ctx.doc_string()",
        };
        out.push_str(&format!(
            "        // `{accessor}` holds the attached {}\n",
            data.describe(),
        ));
    }
    out.push_str(&format!(
        "        todo!({:?})\n    }})\n}}\n\nregistry.{method}({expression:?}, {name})?;",
        format!("implement `{text}`"),
    ));

    if parts.contains(&Part::Param(Inferred::Int)) {
        out.push_str(&format!(
            "\n// or: registry.{method}({:?}, {name})?;",
            render(&parts, true),
        ));
    }
    out
}

/// Splits the `text` into literal runs and inferred parameters.
fn split(text: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        if let Some((kind, len)) = infer_at(text, pos) {
            if literal_start < pos {
                parts.push(Part::Literal(&text[literal_start..pos]));
            }
            parts.push(Part::Param(kind));
            pos += len;
            literal_start = pos;
        } else {
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }
    if literal_start < text.len() {
        parts.push(Part::Literal(&text[literal_start..]));
    }
    parts
}

/// Infers a parameter starting exactly at `pos`, returning its kind and
/// length.
fn infer_at(text: &str, pos: usize) -> Option<(Inferred, usize)> {
    let before = text[..pos].chars().next_back();
    let rest = &text[pos..];

    [Inferred::Int, Inferred::Float, Inferred::String, Inferred::Word]
        .into_iter()
        .filter_map(|kind| {
            let len = kind.regex().find(rest)?.end();
            let after = rest[len..].chars().next();
            let bounded = match kind {
                Inferred::Int | Inferred::Float => {
                    !before.is_some_and(is_word_char)
                        && !after.is_some_and(|c| is_word_char(c) || c == '.')
                }
                Inferred::String => true,
                Inferred::Word => {
                    !before.is_some_and(|c| !c.is_whitespace())
                        && !after.is_some_and(|c| !c.is_whitespace())
                }
            };
            bounded.then_some((kind, len))
        })
        // `max_by_key` keeps the last maximum, so iterate in reverse to
        // prefer the earlier kinds on ties.
        .rev()
        .max_by_key(|(_, len)| *len)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Renders the `parts` back as a Cucumber Expression, optionally using
/// `{float}` for integers.
fn render(parts: &[Part<'_>], ints_as_floats: bool) -> String {
    parts
        .iter()
        .map(|part| match part {
            Part::Literal(s) => escape(s),
            Part::Param(Inferred::Int) if ints_as_floats => "{float}".to_owned(),
            Part::Param(kind) => kind.placeholder().to_owned(),
        })
        .collect()
}

/// Escapes characters meaningful in Cucumber Expressions.
fn escape(literal: &str) -> String {
    literal
        .chars()
        .fold(String::with_capacity(literal.len()), |mut out, c| {
            if matches!(c, '\\' | '(' | ')' | '{' | '}' | '/') {
                out.push('\\');
            }
            out.push(c);
            out
        })
}

/// Derives a handler function name from the literal runs.
fn fn_name(parts: &[Part<'_>]) -> String {
    let words = parts
        .iter()
        .filter_map(|p| match p {
            Part::Literal(s) => Some(*s),
            Part::Param(_) => None,
        })
        .join(" ");
    let name = to_snake_case(&words);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("step_{name}").trim_end_matches('_').to_owned()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression(text: &str) -> String {
        render(&split(text), false)
    }

    #[test]
    fn infers_placeholders_by_kind() {
        assert_eq!(expression("I have 5 cucumbers"), "I have {int} cucumbers");
        assert_eq!(expression("it costs -1.50 now"), "it costs {float} now");
        assert_eq!(
            expression(r#"I type "hello world" and 'x'"#),
            "I type {string} and {string}",
        );
        assert_eq!(expression("user abc123 logs in"), "user {word} logs in");
        assert_eq!(expression("I see nothing"), "I see nothing");
    }

    #[test]
    fn leaves_numbers_inside_words() {
        assert_eq!(expression("step2 runs"), "{word} runs");
        assert_eq!(expression("v1.2.3 released"), "{word} released");
    }

    #[test]
    fn escapes_expression_syntax() {
        assert_eq!(
            expression("I open (the) {menu} a/b"),
            r"I open \(the\) \{menu\} a\/b",
        );
    }

    #[test]
    fn snippet_suggests_registration_and_alternatives() {
        let snippet = generate(StepType::Given, "I have 5 cucumbers", None);

        assert!(snippet.starts_with("fn i_have_cucumbers(state: &mut State<World>"));
        assert!(snippet.contains(
            "registry.given(\"I have {int} cucumbers\", i_have_cucumbers)?;"
        ));
        assert!(snippet.contains(
            "// or: registry.given(\"I have {float} cucumbers\", i_have_cucumbers)?;"
        ));
    }

    #[test]
    fn snippet_mentions_attached_data() {
        let data = StepData::table(vec![vec!["a".into()]]);
        let snippet = generate(StepType::Then, "I see:", Some(&data));

        assert!(snippet.contains("`ctx.data_table()` holds the attached data table"));
        assert!(snippet.contains("registry.then(\"I see:\", i_see)?;"));
        assert!(!snippet.contains("// or:"));
    }

    #[test]
    fn escapes_rust_string_literal() {
        let snippet = generate(StepType::When, r#"I type "a\b""#, None);
        assert!(snippet.contains(r#"registry.when("I type {string}", i_type)?;"#));
    }
}
