use picklejar::{
    gherkin::{Feature, GherkinEnv},
    render::{render_feature, render_features},
    Config,
};
use syn::{
    punctuated::Punctuated,
    visit::{self, Visit},
    Expr, ExprLit, ItemFn, ItemMod, Lit, LitStr, Meta, Stmt, Token,
};

const TAGGED: &str = r#"@f
Feature: Tagged jar

  Background:
    Given step Z passes
    And step Y passes

  @s
  Scenario: plain
    Given step A passes

  @r
  Rule: brine rule

    Background:
      Given step R passes
      And step Q passes

    @s2
    Scenario: nested
      When step B passes
      And step C passes
"#;

const MODIFIED: &str = r#"Feature: Modified

  @todo @skip
  Scenario: unfinished
    Given step A passes

  @skip
  Scenario: skipped
    Given step A passes

  @failing @sequential @concurrent
  Scenario: expected failure
    Given step A passes

  @concurrent
  Scenario: parallel
    Given step A passes
"#;

const OUTLINE: &str = r#"Feature: Outlines

  Scenario Outline: typing <word>
    Given I type "<word>" into `${jar}` \ {lid}
    Then the <missing> stays
    And the jar holds:
      | pickle | note |
      | <word> | {x}  |

    Examples:
      | word          |
      | dill          |
      | a`b${c}\\d{e} |

    @brine
    Examples:
      | word | extra |
      | salt | x     |
"#;

const BROWSERS: &str = r#"Feature: Browsers

  @chromium @firefox @mobile @desktop @fast
  Scenario: loads
    Given step A passes
"#;

fn parse(src: &str) -> Feature {
    Feature::parse(src, GherkinEnv::default()).unwrap()
}

/// Step text expression of a generated runner.
enum StepText {
    Literal(String),
    Format(String),
}

/// Generated test function.
struct Test {
    path: String,
    attrs: Vec<String>,
    runner: String,
    args: Vec<Expr>,
}

impl Test {
    fn tags(&self) -> Vec<String> {
        let Expr::Reference(r) = &self.args[0] else { panic!("tags are not a reference") };
        let Expr::Array(a) = &*r.expr else { panic!("tags are not an array") };
        a.elems.iter().map(string).collect()
    }

    fn explode(&self) -> Option<u64> {
        match &self.args[1] {
            Expr::Path(p) if p.path.is_ident("None") => None,
            Expr::Call(c) => match c.args.first() {
                Some(Expr::Lit(ExprLit { lit: Lit::Int(i), .. })) => i.base10_parse().ok(),
                _ => panic!("unexpected explode index"),
            },
            _ => panic!("unexpected explode index"),
        }
    }

    fn values(&self) -> Vec<String> {
        self.args[2..].iter().map(string).collect()
    }
}

/// Generated runner function.
struct Runner {
    name: String,
    steps: Vec<StepText>,
}

#[derive(Default)]
struct Generated {
    modules: Vec<String>,
    tests: Vec<Test>,
    runners: Vec<Runner>,
}

impl Generated {
    fn parse(code: &str) -> Self {
        let file = syn::parse_file(code).unwrap_or_else(|e| panic!("{e}\n\n{code}"));
        let mut generated = Self::default();
        generated.visit_file(&file);
        generated
    }

    fn test(&self, path: &str) -> &Test {
        self.tests
            .iter()
            .find(|t| t.path == path)
            .unwrap_or_else(|| panic!("no test `{path}`"))
    }

    fn runner(&self, name: &str) -> &Runner {
        self.runners.iter().find(|r| r.name == name).unwrap()
    }
}

impl<'ast> Visit<'ast> for Generated {
    fn visit_item_mod(&mut self, m: &'ast ItemMod) {
        self.modules.push(m.ident.to_string());
        visit::visit_item_mod(self, m);
        _ = self.modules.pop();
    }

    fn visit_item_fn(&mut self, f: &'ast ItemFn) {
        let name = f.sig.ident.to_string();
        let mut path = self.modules.clone();
        path.push(name.clone());

        if name.starts_with("run_") {
            self.runners.push(Runner { name, steps: runner_steps(f) });
        } else if f
            .attrs
            .iter()
            .any(|a| a.path().segments.last().is_some_and(|s| s.ident == "test"))
        {
            let (runner, args) = runner_call(f);
            self.tests.push(Test {
                path: path.join("::"),
                attrs: f.attrs.iter().map(attribute).collect(),
                runner,
                args,
            });
        }
    }
}

fn string(expr: &Expr) -> String {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => s.value(),
        _ => panic!("not a string literal"),
    }
}

fn attribute(attr: &syn::Attribute) -> String {
    let path = attr
        .path()
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    match &attr.meta {
        Meta::NameValue(nv) => format!("{path} = {}", string(&nv.value)),
        _ => path,
    }
}

fn runner_call(f: &ItemFn) -> (String, Vec<Expr>) {
    let Some(Stmt::Expr(Expr::Call(outer), _)) = f.block.stmts.first() else {
        panic!("unexpected test body");
    };
    let Some(Expr::Await(awaited)) = outer.args.first() else {
        panic!("runner is not awaited");
    };
    let Expr::Call(inner) = &*awaited.base else { panic!("runner is not called") };
    let Expr::Path(p) = &*inner.func else { panic!("runner is not a path") };
    let name = p.path.segments.last().unwrap().ident.to_string();
    (name, inner.args.iter().cloned().collect())
}

fn runner_steps(f: &ItemFn) -> Vec<StepText> {
    let Some(Stmt::Local(local)) = f.block.stmts.first() else {
        panic!("runner doesn't start with its steps");
    };
    let Expr::Macro(m) = &*local.init.as_ref().unwrap().expr else {
        return Vec::new();
    };
    m.mac
        .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
        .unwrap()
        .into_iter()
        .map(|e| match e {
            Expr::Macro(m) => StepText::Format(m.mac.parse_body::<LitStr>().unwrap().value()),
            Expr::Call(c) => StepText::Literal(string(&c.args[0])),
            _ => panic!("unexpected step expression"),
        })
        .collect()
}

/// Evaluates a format string using `_N` arguments.
fn eval_format(fmt: &str, values: &[String]) -> String {
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
                out.push_str(&values[idx]);
            }
            c => out.push(c),
        }
    }
    out
}

#[test]
fn tags_are_inherited_through_rules() {
    let code = render_feature(&parse(TAGGED), &Config::default()).unwrap();
    let generated = Generated::parse(&code);

    assert_eq!(generated.tests.len(), 2);
    assert_eq!(generated.test("plain").tags(), ["@f", "@s"]);
    assert_eq!(generated.test("brine_rule::nested").tags(), ["@f", "@r", "@s2"]);
    assert_eq!(generated.test("plain").explode(), None);
    assert!(code.contains(
        r#"FeatureRun::load(crate::steps::registry(), CONFIG, "Tagged jar", &["@f"], 2)"#
    ));
}

#[test]
fn backgrounds_run_with_negative_indices() {
    let code = render_feature(&parse(TAGGED), &Config::default()).unwrap();

    assert!(code.contains(
        r#"state.execute_step(StepType::Given, "step Z passes", 5, -1, explode, None).await?;"#
    ));
    assert!(code.contains(
        r#"state.execute_step(StepType::Given, "step Y passes", 6, -2, explode, None).await?;"#
    ));
    assert!(code.contains(r#"init_scenario(Some("brine rule"), scenario, tags, steps, explode)"#));
    assert!(code.contains(
        "state.execute_step(StepType::When, &steps[1], 22, 2, explode, None).await?;"
    ));
}

#[test]
fn rule_backgrounds_continue_feature_background_indices() {
    let code = render_feature(&parse(TAGGED), &Config::default()).unwrap();

    assert!(code.contains(
        r#"state.execute_step(StepType::Given, "step R passes", 16, -3, explode, None).await?;"#
    ));
    assert!(code.contains(
        r#"state.execute_step(StepType::Given, "step Q passes", 17, -4, explode, None).await?;"#
    ));
    assert_eq!(code.matches(", -1, explode").count(), 1);
}

#[test]
fn tags_map_to_test_attributes() {
    let code = render_feature(&parse(MODIFIED), &Config::default()).unwrap();
    let generated = Generated::parse(&code);

    assert_eq!(generated.test("unfinished").attrs, ["tokio::test", "ignore = todo"]);
    assert_eq!(generated.test("skipped").attrs, ["tokio::test", "ignore = skip"]);
    assert_eq!(
        generated.test("expected_failure").attrs,
        ["tokio::test", "should_panic", "serial_test::serial"],
    );
    assert_eq!(generated.test("parallel").attrs, ["tokio::test", "serial_test::parallel"]);
    assert!(code.contains(r#"CONFIG, "Modified", &[], 2)"#));
}

#[test]
fn outline_rows_become_tests() {
    let feature = parse(OUTLINE);
    let code = render_feature(&feature, &Config::default()).unwrap();
    let generated = Generated::parse(&code);

    assert_eq!(generated.tests.len(), 3);
    for (k, test) in generated.tests.iter().enumerate() {
        assert!(test.path.ends_with(&format!("_example_{}", k + 1)), "{}", test.path);
    }

    let [dill, odd, salt] = &generated.tests[..] else { unreachable!() };
    assert_eq!(dill.values(), ["dill", "<extra>"]);
    assert_eq!(salt.values(), ["salt", "x"]);
    assert_eq!(salt.tags(), ["@brine"]);
    assert!(dill.tags().is_empty());
    assert!(odd.values()[0].contains('`'));
    assert!(odd.values()[0].contains("${c}"));

    assert!(code.contains(r#"vec![format!("{_0}"), String::from("{x}")]"#));
}

#[test]
fn outline_text_round_trips() {
    let feature = parse(OUTLINE);
    let code = render_feature(&feature, &Config::default()).unwrap();
    let generated = Generated::parse(&code);
    let steps = &feature.scenarios[0].steps;

    for test in &generated.tests {
        let runner = generated.runner(&test.runner);
        let values = test.values();

        let StepText::Format(fmt) = &runner.steps[0] else { panic!("expected format") };
        let typed = eval_format(fmt, &values);
        assert_eq!(typed, steps[0].value.replace("<word>", &values[0]));
        assert!(typed.ends_with(r"into `${jar}` \ {lid}"), "{typed}");

        let StepText::Literal(stays) = &runner.steps[1] else { panic!("expected literal") };
        assert_eq!(stays, "the <missing> stays");
    }
}

#[test]
fn explode_tags_multiply_tests() {
    let config = Config::from_json(
        r#"{"explodeTags": [["@chromium", "@firefox"], ["@mobile", "@desktop"]]}"#,
    )
    .unwrap();
    let code = render_feature(&parse(BROWSERS), &config).unwrap();
    let generated = Generated::parse(&code);

    assert_eq!(generated.tests.len(), 4);
    for (v, test) in generated.tests.iter().enumerate() {
        assert_eq!(test.path, format!("loads_v{}", v + 1));
        assert_eq!(test.explode(), Some(v as u64 + 1));
    }
    assert_eq!(generated.test("loads_v2").tags(), ["@fast", "@chromium", "@desktop"]);
    assert_eq!(generated.test("loads_v3").tags(), ["@fast", "@firefox", "@mobile"]);
    assert!(code.contains(r#"&[], 4)"#));
}

#[test]
fn modifiers_apply_per_exploded_variant() {
    let config = Config::from_json(r#"{"explodeTags": "@chromium, @todo"}"#).unwrap();
    let feature = parse(
        "Feature: Variants\n\n  @chromium @todo\n  Scenario: opens\n    Given step A passes\n",
    );
    let code = render_feature(&feature, &config).unwrap();
    let generated = Generated::parse(&code);

    assert_eq!(generated.test("opens_v1").attrs, ["tokio::test"]);
    assert_eq!(generated.test("opens_v2").attrs, ["tokio::test", "ignore = todo"]);
    assert!(code.contains(r#"&[], 1)"#));
}

#[test]
fn features_without_scenarios_render_nothing() {
    let empty = parse("Feature: Empty\n");
    assert_eq!(render_feature(&empty, &Config::default()).unwrap(), "");

    let code = render_features(&[empty, parse(TAGGED)], &Config::default()).unwrap();
    let generated = Generated::parse(&code);

    assert_eq!(code.matches("pub mod ").count(), 1);
    assert_eq!(generated.test("tagged_jar::brine_rule::nested").tags(), ["@f", "@r", "@s2"]);
}

#[test]
fn custom_render_options_are_used() {
    let config = Config::from_json(
        r#"{
            "render": {
                "runtime": "::jar",
                "world": "crate::Brine",
                "registry": "crate::registry",
                "test_attribute": "::async_std::test"
            }
        }"#,
    )
    .unwrap();
    let code = render_feature(&parse(MODIFIED), &config).unwrap();
    let generated = Generated::parse(&code);

    assert!(code.contains("use ::jar::codegen::{"));
    assert!(code.contains("type World = crate::Brine;"));
    assert!(code.contains("FeatureRun::load(crate::registry(), CONFIG"));
    assert_eq!(generated.test("parallel").attrs, ["async_std::test", "serial_test::parallel"]);
}
