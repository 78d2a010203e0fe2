// Generated by picklejar from `Feature: Pickle jar`. Do not edit.

use ::picklejar::codegen::{
    fail_on_error, Arc, ConfigError, Error, FeatureRun, Lazy, State, StepData, StepType,
};

type World = ::picklejar::JsonWorld;

const CONFIG: &str = r#"{"todo_tags":["@todo","@wip"],"skip_tags":["@skip"],"fail_tags":["@fails","@failing"],"soft_fail_tags":["@soft"],"concurrent_tags":["@concurrent"],"sequential_tags":["@sequential"],"explode_tags":[],"world_config":{},"render":{"runtime":"::picklejar","world":"::picklejar::JsonWorld","registry":"crate::steps::registry","test_attribute":"::tokio::test","serial_attribute":"::serial_test::serial","parallel_attribute":"::serial_test::parallel"}}"#;

static FEATURE: Lazy<Result<Arc<FeatureRun<World>>, ConfigError>> = Lazy::new(|| {
    FeatureRun::load(crate::steps::registry(), CONFIG, "Pickle jar", &["@jar"], 4)
});

fn feature() -> Result<Arc<FeatureRun<World>>, Error> {
    FEATURE.as_ref().map(Arc::clone).map_err(|e| Error::Config(e.clone()))
}

async fn init_scenario(
    rule: Option<&str>,
    scenario: &str,
    tags: &[&str],
    steps: Vec<String>,
    explode: Option<usize>,
) -> Result<State<World>, Error> {
    let mut state = State::start(feature()?, rule, scenario, tags, steps, explode).await?;
    state.execute_step(StepType::Given, "the jar holds \"brine\"", 5, -1, explode, None).await?;
    Ok(state)
}

/// Scenario: filling
async fn run_filling(tags: &[&str], explode: Option<usize>) -> Result<(), Error> {
    let steps = vec![
        String::from("I add 3 cucumbers"),
        String::from("the jar has 3 cucumbers"),
        String::from("the note says C:\\brine {salt}"),
    ];
    let mut state = init_scenario(None, "filling", tags, steps.clone(), explode).await?;
    state.execute_step(StepType::When, &steps[0], 8, 1, explode, None).await?;
    state.execute_step(StepType::Then, &steps[1], 9, 2, explode, None).await?;
    state.execute_step(StepType::Then, &steps[2], 10, 3, explode, None).await?;
    state.finish().await
}

#[::tokio::test]
async fn filling() {
    fail_on_error(run_filling(&["@jar"], None).await);
}

/// Scenario Outline: labelling <label>
async fn run_labelling_label(tags: &[&str], explode: Option<usize>, _0: &str) -> Result<(), Error> {
    let steps = vec![
        format!("I label the jar \"{_0}\""),
        String::from("the label is one of the examples"),
    ];
    let mut state = init_scenario(None, &format!("labelling {_0}"), tags, steps.clone(), explode).await?;
    state.execute_step(StepType::When, &steps[0], 13, 1, explode, None).await?;
    state.execute_step(StepType::Then, &steps[1], 14, 2, explode, None).await?;
    state.finish().await
}

#[::tokio::test]
async fn labelling_label_example_1() {
    fail_on_error(run_labelling_label(&["@jar"], None, "a`b${c}\\d{e}").await);
}

#[::tokio::test]
async fn labelling_label_example_2() {
    fail_on_error(run_labelling_label(&["@jar"], None, "{braces} <x>").await);
}

mod sealing {
    use super::*;

    async fn init_rule_scenario(
        scenario: &str,
        tags: &[&str],
        steps: Vec<String>,
        explode: Option<usize>,
    ) -> Result<State<World>, Error> {
        let mut state = init_scenario(Some("sealing"), scenario, tags, steps, explode).await?;
        state.execute_step(StepType::Given, "the lid is \"tight\"", 24, -2, explode, None).await?;
        Ok(state)
    }

    /// Scenario: leaking
    async fn run_leaking(tags: &[&str], explode: Option<usize>) -> Result<(), Error> {
        let steps = vec![
            String::from("the label reads \"nothing\""),
            String::from("the label reads \"still nothing\""),
        ];
        let mut state = init_rule_scenario("leaking", tags, steps.clone(), explode).await?;
        state.execute_step(StepType::Then, &steps[0], 28, 1, explode, None).await?;
        state.execute_step(StepType::Then, &steps[1], 29, 2, explode, None).await?;
        state.finish().await
    }

    #[::tokio::test]
    #[should_panic]
    async fn leaking() {
        fail_on_error(run_leaking(&["@jar", "@soft", "@fails"], None).await);
    }
}
