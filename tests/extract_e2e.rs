use std::fs;

use cord_miner::cli::IndexOrder;
use cord_miner::extract::{self, ExtractJob};
use tempfile::TempDir;

const TEMPLATE: &str = "\
id,query,title,oie,text,suffix,mode
0,what does the virus cause,What does COVID-19 cause?,[X][B]causes,\"[X] causes [Y].
[X] induces [Y].\",is caused,yonly
";

const TEXT_LINES: &str = "\
docs/abc123.txt\tCOVID-19 causes fatigue and fever.
docs/zzz999.txt\tCOVID-19 causes cough.
docs/zzz999.txt\tInfluenza is unrelated here.
";

const OIE_LINES: &str = "\
docs/abc123.txt\tCOVID-19#0,8|||causes#9,15|||fatigue#16,23
docs/zzz999.txt\t
docs/zzz999.txt\t
";

const METADATA: &str = "\
sha,title,doi,journal,publish_time
abc123,Viral fatigue study,10.1000/xyz,J Virol,2020-03-01
";

fn run_job(dir: &TempDir, order: IndexOrder) -> std::path::PathBuf {
    let template_file = dir.path().join("templates.csv");
    let text_file = dir.path().join("sentences.txt");
    let oie_file = dir.path().join("sentences.oie");
    let metadata_file = dir.path().join("metadata.csv");
    let out_dir = dir.path().join("report");
    fs::write(&template_file, TEMPLATE).unwrap();
    fs::write(&text_file, TEXT_LINES).unwrap();
    fs::write(&oie_file, OIE_LINES).unwrap();
    fs::write(&metadata_file, METADATA).unwrap();

    let job = ExtractJob {
        template_file,
        text_files: vec![text_file],
        oie_files: vec![oie_file],
        tasks: None,
        metadata: Some(metadata_file),
        out_dir: out_dir.clone(),
        order,
        anchor_virus: false,
    };
    extract::run(&job).expect("extraction succeeds");
    out_dir
}

#[test]
fn end_to_end_report_contains_ranked_matches() {
    let dir = TempDir::new().unwrap();
    let out_dir = run_job(&dir, IndexOrder::Template);

    let index = fs::read_to_string(out_dir.join("index.html")).unwrap();
    assert!(index.contains("What does COVID-19 cause?"));
    assert!(index.contains("(3 results)"), "2 text keys + 1 OIE key");
    assert!(out_dir.join("main.css").exists());
    assert!(out_dir.join("logo.svg").exists());

    let report = fs::read_to_string(out_dir.join("report-0.html")).unwrap();
    assert!(report.contains("Textual Template Results"));
    assert!(report.contains("Information Extraction Results"));
    assert!(report.contains("fatigue and fever is caused (count: 1)"));
    assert!(report.contains("cough is caused (count: 1)"));
    assert!(report.contains("COVID-19 causes fatigue is caused (count: 1)"));
    assert!(report.contains("COVID-19 causes fatigue and fever."));
}

#[test]
fn citations_render_with_a_missing_reference_fallback() {
    let dir = TempDir::new().unwrap();
    let out_dir = run_job(&dir, IndexOrder::Template);

    let report = fs::read_to_string(out_dir.join("report-0.html")).unwrap();
    assert!(report.contains("Viral fatigue study"));
    assert!(report.contains("https://doi.org/10.1000/xyz"));
    assert!(report.contains("J Virol"));
    assert!(report.contains("reference not found"), "zzz999 has no metadata row");
}

#[test]
fn results_ordering_is_accepted() {
    let dir = TempDir::new().unwrap();
    let out_dir = run_job(&dir, IndexOrder::Results);
    assert!(out_dir.join("index.html").exists());
}

#[test]
fn misaligned_oie_files_are_fatal() {
    let dir = TempDir::new().unwrap();
    let template_file = dir.path().join("templates.csv");
    let text_file = dir.path().join("sentences.txt");
    let oie_file = dir.path().join("sentences.oie");
    fs::write(&template_file, TEMPLATE).unwrap();
    fs::write(&text_file, TEXT_LINES).unwrap();
    fs::write(&oie_file, OIE_LINES).unwrap();

    let job = ExtractJob {
        template_file,
        text_files: vec![text_file.clone(), text_file],
        oie_files: vec![oie_file],
        tasks: None,
        metadata: None,
        out_dir: dir.path().join("report"),
        order: IndexOrder::Template,
        anchor_virus: false,
    };
    assert!(extract::run(&job).is_err());
}
