use uk_ner_highlight::{
    highlight::{highlight, summarize},
    ner::{EntitySpan, GazetteerNer},
};

#[test]
fn rome_sentence_matches_reference_output() {
    let text = "Я відвідав Рим.";
    let spans = vec![EntitySpan::from_char_range(text, 11, 14, "LOC").unwrap()];

    insta::assert_snapshot!(
        highlight(text, &spans),
        @"Я відвідав <span style='color:blue; font-weight:bold;'>Рим</span>."
    );
    assert_eq!(summarize(&spans), "Рим (LOC)");
}

#[test]
fn festival_example_lists_entities_in_order() {
    let ner = GazetteerNer::builtin().build().unwrap();
    let text = uk_ner_highlight::ui::EXAMPLES[1];
    let result = uk_ner_highlight::highlight::analyze(&ner, text).unwrap();
    assert_eq!(
        result.entity_summary,
        vec![
            "Atlas Weekend (MISC)",
            "Океан Ельзи (ORG)",
            "Джамала (PER)",
            "Євробаченні (MISC)",
        ]
    );
    assert_eq!(
        result.highlighted_text.matches("<span style=").count(),
        4
    );
}
