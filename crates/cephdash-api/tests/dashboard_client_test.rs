#![allow(clippy::unwrap_used)]
// Integration tests for `DashboardClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cephdash_api::{DashboardClient, Error, RawRankId};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DashboardClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DashboardClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({
                "token": "tok-123",
                "username": "admin",
                "permissions": {}
            })),
        )
        .mount(server)
        .await;
}

fn tabs_body() -> serde_json::Value {
    json!({
        "standbys": "b",
        "pools": [
            { "pool": "cephfs_meta", "type": "metadata", "used": 1024, "avail": 4096 },
            { "pool": "cephfs_data", "type": "data", "used": 2048, "avail": 4096 }
        ],
        "ranks": [
            { "rank": 0, "state": "active", "mds": "a", "activity": 1.5, "dns": 10, "inos": 12, "dirs": 3, "caps": 7 }
        ],
        "mds_counters": {
            "a": { "mds_server.handle_client_request": [[1.0, 3.0], [2.0, 4.0]] }
        },
        "name": "cephfs",
        "clients": {
            "status": 0,
            "data": [ { "id": 4305, "type": "kernel", "state": "open", "hostname": "node1" } ]
        }
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    let secret: secrecy::SecretString = "secret".to_string().into();
    tokio_test::assert_ok!(client.login("admin", &secret).await);
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Invalid credentials",
            "code": "invalid_credentials"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/cephfs"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header("accept", "application/vnd.ceph.api.v1.0+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // The Accept header comes from TransportConfig, so build through it.
    let transport = cephdash_api::TransportConfig::default();
    let client = DashboardClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    let secret: secrecy::SecretString = "secret".to_string().into();
    client.login("admin", &secret).await.unwrap();
    let list = client.list_filesystems().await.unwrap();
    assert!(list.is_empty());
}

// ── Filesystem tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_filesystems() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/cephfs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{
                "id": 1,
                "mdsmap": {
                    "fs_name": "cephfs",
                    "max_mds": 1,
                    "info": {
                        "gid_4200": { "name": "a", "state": "up:active", "rank": 0 },
                        "gid_4100": { "name": "b", "state": "up:standby-replay", "rank": 0 }
                    }
                }
            }]"#,
        ))
        .mount(&server)
        .await;

    let list = client.list_filesystems().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, Some(1));
    assert_eq!(list[0].mdsmap.fs_name, "cephfs");
    let first = list[0].mdsmap.info.values().next().unwrap();
    assert_eq!(first.name.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_get_tabs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ui-api/cephfs/1/tabs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tabs_body()))
        .mount(&server)
        .await;

    let tabs = client.get_tabs(1).await.unwrap();
    assert_eq!(tabs.standbys, "b");
    assert_eq!(tabs.pools.len(), 2);
    assert_eq!(tabs.pools[0].pool_type, "metadata");
    assert_eq!(tabs.ranks[0].rank, RawRankId::Number(0));
    assert_eq!(tabs.clients.status, 0);
    assert_eq!(tabs.clients.data[0].hostname, "node1");
    assert!(tabs.mds_counters.contains_key("a"));
}

#[tokio::test]
async fn test_get_tabs_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ui-api/cephfs/9/tabs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.get_tabs(9).await;
    assert!(
        matches!(result, Err(ref e) if e.is_not_found()),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ui-api/cephfs/1/tabs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_tabs(1).await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_server_error_carries_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ui-api/cephfs/1/tabs"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "mgr module crashed" })),
        )
        .mount(&server)
        .await;

    match client.get_tabs(1).await {
        Err(Error::Api { message, status }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "mgr module crashed");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ui-api/cephfs/1/tabs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.get_tabs(1).await;
    assert!(matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "not json"));
}

#[tokio::test]
async fn test_preissued_token_skips_login() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/cephfs"))
        .and(header("authorization", "Bearer out-of-band"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client.is_authenticated());
    client.set_token("out-of-band".to_string().into());
    assert!(client.is_authenticated());
    assert!(client.list_filesystems().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_forgets_token() {
    let (server, client) = setup().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "secret".to_string().into();
    client.login("admin", &secret).await.unwrap();
    tokio_test::assert_ok!(client.logout().await);
    assert!(!client.is_authenticated());
}
