use cord_miner::data::templates::{MatchMode, Task};
use cord_miner::extract::pattern::{
    compile_oie_pattern, compile_text_pattern, virus_alternation, CompileOptions,
};

fn task(text_source: &str, oie_source: &str, mode: MatchMode) -> Task {
    Task {
        id: "0".into(),
        query: "test query".into(),
        title: "Test task".into(),
        oie_source: oie_source.into(),
        text_source: text_source.into(),
        suffix: "suffix".into(),
        mode,
    }
}

#[test]
fn virus_alternation_matches_every_synonym() {
    let regex = regex::Regex::new(&virus_alternation()).unwrap();
    for name in ["COVID-19", "SARS-CoV-2", "2019-nCoV", "Wuhan coronavirus"] {
        assert!(regex.is_match(name), "{name} should match");
    }
    assert!(!regex.is_match("influenza"));
}

#[test]
fn text_pattern_substitutes_placeholders() {
    let task = task("[X] causes [Y].", "", MatchMode::Yonly);
    let compiled = compile_text_pattern(&task, CompileOptions::default())
        .unwrap()
        .expect("pattern compiles");
    assert_eq!(compiled.wildcard_groups, vec!["y0".to_string()]);
    assert!(compiled.regex.is_match("SARS-CoV-2 causes severe fatigue."));
    assert!(!compiled.regex.is_match("influenza causes fatigue."));
}

#[test]
fn boundary_violating_lines_are_dropped() {
    let task = task("[Y] is caused by [X]", "", MatchMode::Yonly);
    let compiled = compile_text_pattern(&task, CompileOptions::default()).unwrap();
    assert!(compiled.is_none(), "only line starts with [Y], task has no pattern");
}

#[test]
fn surviving_lines_still_compile_when_one_is_dropped() {
    let task = task("[X] causes [Y].\nthe result of [X] is [Y]", "", MatchMode::Yonly);
    let compiled = compile_text_pattern(&task, CompileOptions::default())
        .unwrap()
        .expect("one valid line remains");
    assert_eq!(compiled.wildcard_groups.len(), 1);
}

#[test]
fn empty_source_compiles_to_none() {
    let task = task("", "", MatchMode::First);
    assert!(compile_text_pattern(&task, CompileOptions::default())
        .unwrap()
        .is_none());
    assert!(compile_oie_pattern(&task).unwrap().is_none());
}

#[test]
fn wildcard_names_are_unique_across_lines() {
    let task = task(
        "[X] causes [Y].\n[X] induces [Y].\n[X] leads to [Y].",
        "",
        MatchMode::Yonly,
    );
    let compiled = compile_text_pattern(&task, CompileOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        compiled.wildcard_groups,
        vec!["y0".to_string(), "y1".to_string(), "y2".to_string()]
    );
}

#[test]
fn oie_pattern_expands_separator() {
    let task = task("", "[X][B]causes", MatchMode::First);
    let compiled = compile_oie_pattern(&task).unwrap().expect("compiles");
    assert!(compiled.regex.is_match("COVID-19|||causes|||fatigue"));
    assert!(!compiled.regex.is_match("COVID-19 causes fatigue"));
}

#[test]
fn anchoring_adds_virus_variants() {
    let task = task("incubation period of [Y] days", "", MatchMode::Yonly);
    let opts = CompileOptions { anchor_virus: true };
    let compiled = compile_text_pattern(&task, opts).unwrap().expect("compiles");
    assert_eq!(compiled.wildcard_groups.len(), 2);
    assert!(compiled
        .regex
        .is_match("COVID-19 has an incubation period of 14 days"));
    assert!(compiled
        .regex
        .is_match("an incubation period of 14 days was reported for SARS-CoV-2"));
    assert!(!compiled.regex.is_match("an incubation period of 14 days"));
}
