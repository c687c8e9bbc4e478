use crate::helpers::{record, sweep};
use claims::assert_err;
use reqwest::Url;
use secrecy::Secret;
use serde_json::json;
use skysweep::domain::Category;
use skysweep::store::XrpcRecordStore;
use skysweep::xrpc_client::XrpcClient;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DID: &str = "did:plc:tester";

async fn logged_in_store(mock_server: &MockServer) -> XrpcRecordStore {
    Mock::given(path("/xrpc/com.atproto.server.createSession"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessJwt": "jwt",
            "did": DID,
        })))
        .expect(1)
        .mount(mock_server)
        .await;

    let base_url = Url::parse(&format!("{}/xrpc/", mock_server.uri())).unwrap();
    let client = XrpcClient::new(base_url, None).unwrap();
    let session = client
        .create_session("tester.bsky.social", &Secret::new("app-password".to_string()))
        .await
        .expect("Failed to log in against the mock server");

    let store = XrpcRecordStore::new(client, session);
    assert_eq!(store.session().did, DID);
    store
}

#[tokio::test]
async fn sweep_follows_the_cursor_and_deletes_expired_posts() {
    let mock_server = MockServer::start().await;
    let store = logged_in_store(&mock_server).await;

    let old = record(Category::Post, "3kold", 45);
    let recent = record(Category::Post, "3knew", 2);
    let older = record(Category::Post, "3kolder", 400);

    Mock::given(path("/xrpc/com.atproto.repo.listRecords"))
        .and(query_param("repo", DID))
        .and(query_param("collection", "app.bsky.feed.post"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [old, recent],
            "cursor": "page2",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/xrpc/com.atproto.repo.listRecords"))
        .and(query_param("cursor", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [older],
            "cursor": "",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/xrpc/com.atproto.repo.deleteRecord"))
        .and(method("POST"))
        .and(body_partial_json(json!({
            "repo": DID,
            "collection": "app.bsky.feed.post",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let output = sweep(&store, &[Category::Post], 30).await;

    let summary = output.result.unwrap();
    assert_eq!(summary.categories[0].pages, 2);
    assert_eq!(summary.categories[0].deleted, 2);
    assert!(output.report.contains(&format!("Deleted post: {}", old.uri)));
    assert!(output.report.contains(&format!("Deleted post: {}", older.uri)));
    assert!(output.report.contains("Total posts skipped (newer than 30 days): 1\n"));
}

#[tokio::test]
async fn rejected_delete_is_reported_and_the_sweep_continues() {
    let mock_server = MockServer::start().await;
    let store = logged_in_store(&mock_server).await;

    let first = record(Category::Like, "1", 60);
    let second = record(Category::Like, "2", 60);

    Mock::given(path("/xrpc/com.atproto.repo.listRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [first, second],
        })))
        .mount(&mock_server)
        .await;

    Mock::given(path("/xrpc/com.atproto.repo.deleteRecord"))
        .and(body_partial_json(json!({ "rkey": "1" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("RecordNotFound"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/xrpc/com.atproto.repo.deleteRecord"))
        .and(body_partial_json(json!({ "rkey": "2" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = sweep(&store, &[Category::Like], 30).await;

    let summary = output.result.unwrap();
    assert_eq!(summary.categories[0].deleted, 1);
    assert_eq!(summary.categories[0].failed, 1);
    assert!(output.report.contains("RecordNotFound"));
    assert!(output.report.contains(&format!("Deleted like: {}", second.uri)));
}

#[tokio::test]
async fn non_200_listing_aborts_without_deleting_anything() {
    let mock_server = MockServer::start().await;
    let store = logged_in_store(&mock_server).await;

    Mock::given(path("/xrpc/com.atproto.repo.listRecords"))
        .respond_with(ResponseTemplate::new(401).set_body_string("ExpiredToken"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(path("/xrpc/com.atproto.repo.deleteRecord"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output = sweep(&store, &[Category::Post, Category::Repost], 30).await;

    assert_err!(&output.result);
    let message = format!("{:?}", output.result.unwrap_err());
    assert!(message.contains("Failed to list posts."));
    assert!(message.contains("ExpiredToken"));
}
