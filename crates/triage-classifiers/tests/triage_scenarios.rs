//! End-to-end triage with the default engine

use triage_classifiers::{TriageConfig, TriageEngine};
use triage_core::Category;

fn engine() -> TriageEngine {
    TriageEngine::from_config(&TriageConfig::default()).unwrap()
}

fn comments(items: &[&str]) -> Vec<String> {
    items.iter().map(|c| c.to_string()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mixed_batch() {
    let engine = engine();
    let batch = comments(&[
        "Buy cheap stuff now!!",
        "Great video, thanks!",
        "meh",
        "http://spam.example/promo",
    ]);

    let result = engine.triage(&batch).await;
    let counts = result.counts();

    assert_eq!(counts.total, 4);
    assert_eq!(counts.spam, 2);
    assert_eq!(counts.positive, 1);
    assert_eq!(counts.neutral, 1);
    assert_eq!(counts.negative, 0);

    assert_eq!(
        result.get(Category::Spam),
        ["Buy cheap stuff now!!", "http://spam.example/promo"]
    );
    assert_eq!(result.get(Category::Positive), ["Great video, thanks!"]);
    assert_eq!(result.get(Category::Neutral), ["meh"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_urls_always_spam() {
    let engine = engine();
    let batch = comments(&[
        "check this out http://example.com/x",
        "Great video! see https://example.org/more",
        "thanks, mirror at ftp://files.example.net/video",
    ]);

    let result = engine.triage(&batch).await;

    assert_eq!(result.len_of(Category::Spam), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blank_comments_are_neutral() {
    let engine = engine();
    let batch = comments(&["", "   "]);

    let result = engine.triage(&batch).await;

    assert_eq!(result.len_of(Category::Neutral), 2);
    assert!(!engine.spam_classifier().classify("   "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_json_shape() {
    let engine = engine();
    let result = engine.triage(&comments(&["meh"])).await;

    let json = serde_json::to_value(&result).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object.len(), 4);
    for key in ["positive", "negative", "neutral", "spam"] {
        assert!(object[key].is_array(), "missing {key}");
    }
    assert_eq!(object["neutral"][0], "meh");
}

#[test]
fn test_detect_spam_over_corpus() {
    let engine = engine();
    let spam = engine.spam_classifier();

    let examples = spam.corpus().spam().to_vec();
    let detected = spam.detect_spam(&examples);

    assert!(detected.len() * 2 > examples.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_vocabulary_is_not_spam() {
    let engine = engine();

    let result = engine.triage(&comments(&["zzz qqq xyzzy"])).await;

    assert_eq!(result.len_of(Category::Neutral), 1);
}
