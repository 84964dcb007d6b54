use proptest::prelude::*;
use uk_ner_highlight::{
    highlight::{highlight, summarize, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, NONE_FOUND},
    ner::EntitySpan,
};

const LABELS: [&str; 7] = ["LOC", "ORG", "PER", "GPE", "MISC", "DATE", "PRODUCT"];

/// Text assembled from segments; entity segments become spans.
fn segmented() -> impl Strategy<Value = Vec<(String, Option<usize>)>> {
    prop::collection::vec(
        (
            "[a-zа-яіїєґ ,.'!]{1,6}",
            prop::option::of(0..LABELS.len()),
        ),
        0..10,
    )
}

fn build(segments: &[(String, Option<usize>)]) -> (String, Vec<EntitySpan>) {
    let mut text = String::new();
    let mut spans = Vec::new();
    for (segment, label) in segments {
        let start = text.len();
        text.push_str(segment);
        if let Some(label) = label {
            spans.push(EntitySpan::new(&text, start, text.len(), LABELS[*label]).unwrap());
        }
    }
    (text, spans)
}

fn qualifies(label: usize) -> bool {
    label < 5
}

proptest! {
    #[test]
    fn no_spans_is_identity(text in "\\PC{0,40}") {
        prop_assert_eq!(highlight(&text, &[]), text);
    }

    #[test]
    fn matches_forward_reference(segments in segmented()) {
        let (text, spans) = build(&segments);
        let mut expected = String::new();
        for (segment, label) in &segments {
            match label {
                Some(label) if qualifies(*label) => {
                    expected.push_str(HIGHLIGHT_OPEN);
                    expected.push_str(segment);
                    expected.push_str(HIGHLIGHT_CLOSE);
                }
                _ => expected.push_str(segment),
            }
        }
        prop_assert_eq!(highlight(&text, &spans), expected);
    }

    #[test]
    fn stripping_markup_recovers_input(segments in segmented()) {
        let (text, spans) = build(&segments);
        let highlighted = highlight(&text, &spans);
        prop_assert!(highlighted.len() >= text.len());
        let stripped = highlighted.replace(HIGHLIGHT_OPEN, "").replace(HIGHLIGHT_CLOSE, "");
        prop_assert_eq!(stripped, text);
    }

    #[test]
    fn only_qualifying_categories_are_marked(segments in segmented()) {
        let (text, spans) = build(&segments);
        let qualifying = segments
            .iter()
            .filter(|(_, label)| label.map(qualifies).unwrap_or(false))
            .count();
        prop_assert_eq!(highlight(&text, &spans).matches(HIGHLIGHT_OPEN).count(), qualifying);

        let summary = summarize(&spans);
        if qualifying == 0 {
            prop_assert_eq!(summary, NONE_FOUND);
        } else {
            prop_assert_eq!(summary.lines().count(), qualifying);
            prop_assert!(!summary.contains("(DATE)"));
            prop_assert!(!summary.contains("(PRODUCT)"));
        }
    }

    #[test]
    fn input_order_of_spans_does_not_matter(segments in segmented()) {
        let (text, spans) = build(&segments);
        let mut reversed = spans.clone();
        reversed.reverse();
        prop_assert_eq!(highlight(&text, &reversed), highlight(&text, &spans));
    }
}
