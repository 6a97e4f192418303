mod common;

use std::time::Duration;

use http::StatusCode;
use serde_json::json;

use ::common::prelude::{FileKey, Selection, SiteKey};
use crate::common::{page, Harness};
use sitepad::scrape::{ScrapeError, ScrapeOutcome};
use sitepad::FailureKind;

#[tokio::test]
async fn test_two_sites_end_to_end() {
    let (harness, auth) = Harness::signed_in().await;
    harness.remote.page(
        "http://a.example/",
        json!({"file_tree": {"index": "a/index"}, "content": {"a/index": "<p>A</p>"}}),
    );
    harness.remote.page(
        "http://b.example/",
        json!({"file_tree": {"index": "b/index"}, "content": {"b/index": "<p>B</p>"}}),
    );
    let scrape = harness.session.scrape();

    let a = scrape.submit(&auth, "http://a.example").await.unwrap();
    let b = scrape.submit(&auth, "http://b.example").await.unwrap();
    assert!(matches!(a, ScrapeOutcome::Merged(_)));
    assert!(matches!(b, ScrapeOutcome::Merged(_)));

    let mut workspace = harness.session.workspace();
    let sites: Vec<String> = workspace.tree().sites().map(|s| s.to_string()).collect();
    assert_eq!(sites, vec!["a.example", "b.example"]);
    assert!(workspace.content().contains(&FileKey::from("a/index")));
    assert!(workspace.content().contains(&FileKey::from("b/index")));

    workspace.select(FileKey::from("a/index")).unwrap();
    let (surface, body) = workspace.open_document().unwrap();
    assert_eq!(surface.key().as_str(), "a/index");
    assert_eq!(body, "<p>A</p>");
}

#[tokio::test]
async fn test_duplicate_submission_sends_nothing() {
    let (harness, auth) = Harness::signed_in().await;
    harness
        .remote
        .page("http://a.example/", page(&[("index", "a/index", "A")]));
    let scrape = harness.session.scrape();

    scrape.submit(&auth, "http://a.example").await.unwrap();
    let again = scrape.submit(&auth, "http://a.example/").await.unwrap();
    assert_eq!(again, ScrapeOutcome::Duplicate);
    assert_eq!(harness.remote.scrape_calls(), 1);

    let workspace = harness.session.workspace();
    assert_eq!(workspace.submitted().len(), 1);
    assert_eq!(workspace.tree().len(), 1);
}

#[tokio::test]
async fn test_rescrape_replaces_site() {
    let (harness, auth) = Harness::signed_in().await;
    harness.remote.page(
        "http://site.com/old",
        page(&[("body/h1", "h1_old", "Old"), ("body/p", "p_old", "gone")]),
    );
    harness
        .remote
        .page("http://site.com/new", page(&[("main/h1", "h1_new", "New")]));
    let scrape = harness.session.scrape();

    scrape.submit(&auth, "http://site.com/old").await.unwrap();
    harness.session.workspace().select(FileKey::from("p_old")).unwrap();

    let outcome = scrape.submit(&auth, "http://site.com/new").await.unwrap();
    let report = match outcome {
        ScrapeOutcome::Merged(report) => report,
        other => panic!("expected a merge, got {:?}", other),
    };
    assert!(report.selection_cleared);
    assert_eq!(report.dropped.len(), 2);

    let workspace = harness.session.workspace();
    let site = SiteKey::parse("http://site.com").unwrap();
    let tree = workspace.tree().get(&site).unwrap();
    assert!(tree.get(["main", "h1"]).is_some());
    assert!(tree.get(["body"]).is_none());
    assert_eq!(workspace.selection(), &Selection::None);
    assert!(workspace.orphaned_leaves().is_empty());
}

#[tokio::test]
async fn test_scraper_error_leaves_state_untouched() {
    let (harness, auth) = Harness::signed_in().await;
    harness
        .remote
        .page("http://a.example/", page(&[("index", "a/index", "A")]));
    let scrape = harness.session.scrape();
    scrape.submit(&auth, "http://a.example").await.unwrap();

    // no canned page: the scraper answers {error}
    let err = scrape.submit(&auth, "http://down.example").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Scraper(_)));
    assert_eq!(err.kind(), FailureKind::RemoteRejection);
    assert_eq!(
        scrape.last_error().as_deref(),
        Some("Failed to scrape http://down.example/. Please try again.")
    );

    let workspace = harness.session.workspace();
    assert_eq!(workspace.tree().len(), 1);
    assert_eq!(workspace.submitted().len(), 1);
    assert_eq!(workspace.pending().count(), 0);
}

#[tokio::test]
async fn test_failed_url_can_be_retried() {
    let (harness, auth) = Harness::signed_in().await;
    *harness.remote.scrape_status.lock() = Some(StatusCode::BAD_GATEWAY);
    let scrape = harness.session.scrape();

    let err = scrape.submit(&auth, "http://a.example").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);
    assert!(scrape.last_error().is_some());

    *harness.remote.scrape_status.lock() = None;
    harness
        .remote
        .page("http://a.example/", page(&[("index", "a/index", "A")]));
    let outcome = scrape.submit(&auth, "http://a.example").await.unwrap();
    assert!(matches!(outcome, ScrapeOutcome::Merged(_)));
    assert!(scrape.last_error().is_none());
    assert_eq!(harness.remote.scrape_calls(), 2);
}

#[tokio::test]
async fn test_malformed_fragment_is_rejected_whole() {
    let (harness, auth) = Harness::signed_in().await;
    // a leaf as root is not a site tree
    harness.remote.page(
        "http://a.example/",
        json!({"file_tree": "lonely", "content": {"lonely": "x"}}),
    );
    let scrape = harness.session.scrape();

    let err = scrape.submit(&auth, "http://a.example").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Workspace(_)));
    assert_eq!(err.kind(), FailureKind::Network);
    let workspace = harness.session.workspace();
    assert!(workspace.tree().is_empty());
    assert!(workspace.content().is_empty());
}

#[tokio::test]
async fn test_invalid_url_is_a_validation_failure() {
    let (harness, auth) = Harness::signed_in().await;
    let err = harness
        .session
        .scrape()
        .submit(&auth, "not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(harness.remote.scrape_calls(), 0);
}

#[tokio::test]
async fn test_concurrent_scrapes_complete_out_of_order() {
    let (harness, auth) = Harness::signed_in().await;
    harness
        .remote
        .page("http://slow.example/", page(&[("index", "slow", "S")]));
    harness
        .remote
        .page("http://fast.example/", page(&[("index", "fast", "F")]));
    harness
        .remote
        .delay("http://slow.example/", Duration::from_millis(200));

    let results = harness
        .session
        .scrape()
        .submit_all(
            &auth,
            ["http://slow.example", "http://broken.example", "http://fast.example"],
        )
        .await;

    assert!(matches!(results[0].1, Ok(ScrapeOutcome::Merged(_))));
    assert!(results[1].1.is_err());
    assert!(matches!(results[2].1, Ok(ScrapeOutcome::Merged(_))));

    // fast finished first; slow landed later and did not disturb it
    let workspace = harness.session.workspace();
    assert_eq!(workspace.submitted()[0].as_str(), "http://fast.example/");
    assert_eq!(workspace.tree().len(), 2);
    assert_eq!(workspace.read(&FileKey::from("fast")), "F");
    assert_eq!(workspace.read(&FileKey::from("slow")), "S");
}

#[tokio::test]
async fn test_response_after_logout_is_discarded() {
    let (harness, auth) = Harness::signed_in().await;
    harness
        .remote
        .page("http://a.example/", page(&[("index", "a/index", "A")]));
    harness
        .remote
        .delay("http://a.example/", Duration::from_millis(200));

    let scrape = harness.session.scrape();
    let (outcome, _) = tokio::join!(scrape.submit(&auth, "http://a.example"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        harness.session.logout().unwrap();
    });

    assert_eq!(outcome.unwrap(), ScrapeOutcome::Discarded);
    let workspace = harness.session.workspace();
    assert!(workspace.tree().is_empty());
    assert!(workspace.submitted().is_empty());
}

#[tokio::test]
async fn test_stale_authorization_is_refused() {
    let (harness, auth) = Harness::signed_in().await;
    harness.session.logout().unwrap();

    let err = harness
        .session
        .scrape()
        .submit(&auth, "http://a.example")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Auth);
    assert_eq!(harness.remote.scrape_calls(), 0);
}
