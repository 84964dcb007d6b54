use std::io::Write;

use uk_ner_highlight::{
    config::{NerBackend, Settings},
    highlight::summarize,
    ner::{self, GazetteerNer, Ner},
};

#[test]
fn file_entries_extend_builtin_list() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"text": "Карпати", "label": "LOC"}}, {{"text": "Укрзалізниця", "label": "ORG"}}]"#
    )
    .unwrap();

    let ner = GazetteerNer::builtin()
        .extend_from_file(file.path())
        .unwrap()
        .build()
        .unwrap();
    let spans = ner.extract("Укрзалізниця везе туристів з Києва в Карпати.").unwrap();
    assert_eq!(
        summarize(&spans),
        "Укрзалізниця (ORG)\nКиєва (LOC)\nКарпати (LOC)"
    );
}

#[test]
fn malformed_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(GazetteerNer::builtin().extend_from_file(file.path()).is_err());
}

#[tokio::test]
async fn load_model_uses_configured_gazetteer() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"text": "Говерла", "label": "LOC"}}]"#).unwrap();
    let settings = Settings {
        ner_backend: NerBackend::Gazetteer,
        gazetteer_path: Some(file.path().to_path_buf()),
        ..Settings::default()
    };
    let model = ner::load_model(&settings).await.unwrap();
    assert_eq!(model.name(), "gazetteer");
    let spans = model.extract("Ми піднялися на Говерла.").unwrap();
    assert_eq!(spans.len(), 1);
}
