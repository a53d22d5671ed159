use cord_miner::nlp::segment::segment;

#[test]
fn splits_on_terminal_punctuation() {
    let sentences = segment("First sentence. Second one! A third?");
    assert_eq!(
        sentences,
        vec!["First sentence.", "Second one!", "A third?"]
    );
}

#[test]
fn single_sentence_stays_whole() {
    assert_eq!(segment("No boundary here"), vec!["No boundary here"]);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(segment("").is_empty());
    assert!(segment("   ").is_empty());
}

#[test]
fn bibliographic_abbreviations_do_not_split() {
    let sentences = segment("Spread was shown by Smith et al. in Wuhan. Later work agreed.");
    assert_eq!(
        sentences,
        vec![
            "Spread was shown by Smith et al. in Wuhan.",
            "Later work agreed."
        ]
    );
}

#[test]
fn initials_do_not_split() {
    let sentences = segment("J. Smith reported cases. More followed.");
    assert_eq!(
        sentences,
        vec!["J. Smith reported cases.", "More followed."]
    );
}

#[test]
fn closing_quotes_stay_with_the_sentence() {
    let sentences = segment("They called it \"unprecedented.\" Numbers rose.");
    assert_eq!(
        sentences,
        vec!["They called it \"unprecedented.\"", "Numbers rose."]
    );
}
