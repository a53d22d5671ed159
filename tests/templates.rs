use std::io::Write;

use cord_miner::data::templates::{load_tasks, MatchMode};
use tempfile::NamedTempFile;

const HEADER: &str = "id,query,title,oie,text,suffix,mode\n";

fn write_template(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(HEADER.as_bytes()).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_tasks_in_table_order() {
    let file = write_template(
        "0,q0,First question,,[X] causes [Y].,suffix a,yonly\n\
         1,q1,Second question,[X][B]causes,,suffix b,\n",
    );
    let tasks = load_tasks(file.path(), None).unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "First question");
    assert_eq!(tasks[0].mode, MatchMode::Yonly);
    assert_eq!(tasks[1].oie_source, "[X][B]causes");
    assert_eq!(tasks[1].mode, MatchMode::First);
}

#[test]
fn multi_line_pattern_cells_survive_loading() {
    let file = write_template("0,q,Question,,\"[X] causes [Y].\n[X] induces [Y].\",s,yonly\n");
    let tasks = load_tasks(file.path(), None).unwrap();
    assert_eq!(tasks[0].text_source, "[X] causes [Y].\n[X] induces [Y].");
}

#[test]
fn subset_selection_restricts_and_reorders() {
    let file = write_template(
        "0,q0,First,,p,s,\n\
         1,q1,Second,,p,s,\n\
         2,q2,Third,,p,s,\n",
    );
    let tasks = load_tasks(file.path(), Some(&[2, 0])).unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Third", "First"]);
}

#[test]
fn short_rows_fail_the_load() {
    let file = write_template("0,q0,Only three columns\n");
    let err = load_tasks(file.path(), None).expect_err("row is malformed");
    assert!(err.to_string().contains("malformed"), "unexpected error: {err}");
}

#[test]
fn out_of_range_subset_index_is_fatal() {
    let file = write_template("0,q0,First,,p,s,\n");
    assert!(load_tasks(file.path(), Some(&[3])).is_err());
}
