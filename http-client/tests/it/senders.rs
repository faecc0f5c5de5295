use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use futures::TryStreamExt;
use http_client::{ClientSettings, HttpClientBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use super::helper::TestHelper;

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: u32,
    name: String,
}

#[tokio::test]
async fn typed_senders_decode_into_domain_types() {
    let helper = TestHelper::new().await;

    Mock::given(method("GET"))
        .and(path("/items/7"))
        .and(query_param("expand", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "net"})))
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/items/7")).unwrap();
    let item: Item = helper
        .client
        .get(url)
        .query(&[("expand", "true")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        item,
        Item {
            id: 7,
            name: "net".to_string()
        }
    );
}

#[tokio::test]
async fn patch_sender_sends_a_json_body() {
    let helper = TestHelper::new().await;

    Mock::given(method("PATCH"))
        .and(path("/items/7"))
        .and(body_json(json!({"name": "mended"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "mended"})))
        .expect(1)
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/items/7")).unwrap();
    let response = helper
        .client
        .patch(url)
        .json(&json!({"name": "mended"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_sender_exposes_the_raw_status() {
    let helper = TestHelper::new().await;

    Mock::given(method("DELETE"))
        .and(path("/items/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/items/7")).unwrap();
    let response = helper.client.delete(url).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn response_exposes_raw_body_accessors() {
    let helper = TestHelper::new().await;

    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string("raw body"))
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/raw")).unwrap();

    let text = helper
        .client
        .get(url.clone())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "raw body");

    let bytes = helper
        .client
        .get(url.clone())
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(bytes, Bytes::from_static(b"raw body"));

    let chunks: Vec<Bytes> = helper
        .client
        .get(url)
        .send()
        .await
        .unwrap()
        .bytes_stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(chunks.concat(), b"raw body");
}

#[tokio::test]
async fn raw_bodies_are_sent_unencoded() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/raw"))
        .and(body_string("raw payload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/raw")).unwrap();
    let response = helper
        .client
        .post(url)
        .header("content-type", "text/plain")
        .body("raw payload")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn disabled_redirects_surface_the_redirect_status() {
    let helper = TestHelper::with_builder(HttpClientBuilder::new().redirects(false)).await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/target"))
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/moved")).unwrap();
    let response = helper.client.get(url).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn clients_built_from_settings_carry_token_and_extra_headers() {
    let settings = ClientSettings {
        timeout: Duration::from_secs(5),
        max_connections: 4,
        bearer_token: Some("sesame".to_string()),
        headers: HashMap::from([("x-env".to_string(), "test".to_string())]),
    };
    let helper =
        TestHelper::with_builder(HttpClientBuilder::from_settings(settings).unwrap()).await;

    Mock::given(method("GET"))
        .and(path("/configured"))
        .and(header("authorization", "Bearer sesame"))
        .and(header("x-env", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&helper.server)
        .await;

    let url = Url::parse(&helper.url("/configured")).unwrap();
    let response = helper.client.get(url).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
