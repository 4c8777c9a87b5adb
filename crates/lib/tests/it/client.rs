use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, Uri, header};
use axum::routing::get;
use directus_client::{ApiVersion, Client, FieldMap, Method, Query, client::ClientError};
use uuid::Uuid;

use crate::helpers::{
    MockTransport, PLANT_FIELDS, PlantR, PlantW, TEST_BASE_URL, envelope, plant_body,
    plant_list_body, test_client,
};

#[tokio::test]
async fn test_insert_posts_full_record() {
    let mock = MockTransport::new().respond(200, plant_body(7));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let stored = plants.insert(&PlantW::fern()).await.unwrap();
    assert_eq!(stored.id, 7);
    assert_eq!(stored.name, "fern");
    assert_eq!(stored.grower.region, "pnw");

    let request = mock.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants"));
    assert_eq!(request.expected_status, 200);
    assert_eq!(request.params.get("fields").unwrap(), PLANT_FIELDS);

    // The body keeps declaration order; the untouched tri-state field
    // encodes as null.
    let body = serde_json::to_string(&request.body.unwrap()).unwrap();
    assert_eq!(
        body,
        r#"{"name":"fern","status":"live","price":12.5,"notes":null}"#
    );
}

#[tokio::test]
async fn test_create_posts_only_named_fields() {
    let mock = MockTransport::new().respond(200, plant_body(8));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let fields = FieldMap::new().set("name", "ivy").set("price", 3.25);
    let stored = plants.create(fields).await.unwrap();
    assert_eq!(stored.id, 8);

    let request = mock.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants"));
    let body = serde_json::to_string(&request.body.unwrap()).unwrap();
    assert_eq!(body, r#"{"name":"ivy","price":3.25}"#);
}

#[tokio::test]
async fn test_get_fetches_one_record_by_pk() {
    let mock = MockTransport::new().respond(200, plant_body(7));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let plant = plants.get(&7).await.unwrap();
    assert_eq!(plant.id, 7);

    let request = mock.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants/7"));
    assert_eq!(request.params.get("fields").unwrap(), PLANT_FIELDS);
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_uuid_primary_keys_format_into_item_urls() {
    let mock = MockTransport::new().respond(200, plant_body(1));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, Uuid>("plants");

    let pk = Uuid::new_v4();
    plants.get(&pk).await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants/{pk}"));
}

#[tokio::test]
async fn test_update_patches_partial_fields() {
    let mock = MockTransport::new().respond(200, plant_body(7));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let fields = FieldMap::new().set("status", "archived");
    plants.update(&7, fields).await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants/7"));
    assert_eq!(request.params.get("fields").unwrap(), PLANT_FIELDS);
    let body = serde_json::to_string(&request.body.unwrap()).unwrap();
    assert_eq!(body, r#"{"status":"archived"}"#);
}

#[tokio::test]
async fn test_replace_patches_full_record() {
    let mock = MockTransport::new().respond(200, plant_body(7));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    plants.replace(&7, &PlantW::fern()).await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants/7"));
    let body = serde_json::to_string(&request.body.unwrap()).unwrap();
    assert_eq!(
        body,
        r#"{"name":"fern","status":"live","price":12.5,"notes":null}"#
    );
}

#[tokio::test]
async fn test_delete_expects_no_content() {
    let mock = MockTransport::new().respond(204, Vec::new());
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    plants.delete(&7).await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants/7"));
    assert_eq!(request.expected_status, 204);
    assert!(request.body.is_none());
    // Deletes return nothing, so the fields parameter is not sent
    assert!(request.params.is_empty());
}

#[tokio::test]
async fn test_delete_discards_stray_response_body() {
    let mock = MockTransport::new().respond(204, b"gone".to_vec());
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    // A body on a 204 is unexpected but not an error
    plants.delete(&7).await.unwrap();
}

#[tokio::test]
async fn test_list_decodes_enveloped_records() {
    let mock = MockTransport::new().respond(200, plant_list_body());
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let all = plants.list(&Query::none()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "fern");
    assert_eq!(all[1].name, "cactus");

    let request = mock.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/items/plants"));
    assert_eq!(request.params.get("fields").unwrap(), PLANT_FIELDS);
}

#[tokio::test]
async fn test_collection_name_is_exposed() {
    let client = Client::new(TEST_BASE_URL);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");
    assert_eq!(plants.name(), "plants");
}

#[tokio::test]
async fn test_trailing_slash_on_base_url_is_trimmed() {
    let mock = MockTransport::new().respond(200, plant_body(7));
    let client = Client::new(format!("{TEST_BASE_URL}/")).with_transport(mock.clone());
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    assert_eq!(client.base_url(), TEST_BASE_URL);
    plants.get(&7).await.unwrap();
    assert_eq!(
        mock.last_request().url,
        format!("{TEST_BASE_URL}/items/plants/7")
    );
}

#[tokio::test]
async fn test_requests_carry_the_shared_token() {
    let mock = MockTransport::new()
        .respond(200, plant_body(7))
        .respond(200, plant_body(7));
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    // No token configured yet
    plants.get(&7).await.unwrap();
    assert_eq!(mock.last_request().token, None);

    // Setting the token on the client reaches the already-created facade
    client.set_token("sesame");
    plants.get(&7).await.unwrap();
    assert_eq!(mock.last_request().token.as_deref(), Some("sesame"));
}

#[tokio::test]
async fn test_client_clones_share_the_token() {
    let mock = MockTransport::new().respond(200, plant_body(7));
    let client = test_client(&mock);
    let clone = client.clone();

    clone.set_token("sesame");
    assert_eq!(client.token().as_deref(), Some("sesame"));

    let plants = client.collection::<PlantR, PlantW, i64>("plants");
    plants.get(&7).await.unwrap();
    assert_eq!(mock.last_request().token.as_deref(), Some("sesame"));
}

#[tokio::test]
async fn test_create_token_posts_credentials_unauthenticated() {
    let mock = MockTransport::new().respond(200, envelope(serde_json::json!({"token": "abc123"})));
    let client = test_client(&mock);

    let token = client.create_token("fred@example.com", "hunter2").await.unwrap();
    assert_eq!(token, "abc123");
    // The token is returned, not stored
    assert_eq!(client.token(), None);

    let request = mock.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, format!("{TEST_BASE_URL}/auth/authenticate"));
    assert_eq!(request.token, None);
    assert!(request.params.is_empty());
    let body = serde_json::to_string(&request.body.unwrap()).unwrap();
    assert_eq!(
        body,
        r#"{"email":"fred@example.com","password":"hunter2"}"#
    );
}

#[tokio::test]
async fn test_unexpected_status_surfaces_status_and_body() {
    let mock = MockTransport::new().respond(500, b"server is on fire".to_vec());
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let err = plants.get(&7).await.unwrap_err();
    assert!(err.is_unexpected_status());
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.module(), "client");
    assert!(err.to_string().contains("server is on fire"));
}

#[tokio::test]
async fn test_undecodable_response_reports_the_collection() {
    let mock = MockTransport::new().respond(200, b"<html>not json</html>".to_vec());
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let err = plants.get(&7).await.unwrap_err();
    assert!(err.is_decode_error());
    assert!(err.to_string().contains("plants"));
}

#[tokio::test]
async fn test_encode_failure_is_reported_before_any_request() {
    #[derive(serde::Serialize)]
    struct BadW {
        // Option is rejected in write shapes
        notes: Option<String>,
    }

    let mock = MockTransport::new();
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, BadW, i64>("plants");

    let err = plants.insert(&BadW { notes: None }).await.unwrap_err();
    assert!(err.is_encode_error());
    assert!(mock.requests().is_empty());
}

// ==========================
// REAL HTTP ROUND TRIPS
// ==========================

struct SeenRequest {
    params: Vec<(String, String)>,
    authorization: Option<String>,
}

type Seen = Arc<Mutex<Option<SeenRequest>>>;

async fn list_plants(State(seen): State<Seen>, uri: Uri, headers: HeaderMap) -> String {
    let params = uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    *seen.lock().unwrap() = Some(SeenRequest {
        params,
        authorization,
    });
    String::from_utf8(crate::helpers::plant_list_body()).unwrap()
}

/// Serve the test router on an ephemeral local port.
async fn spawn_server(seen: Seen) -> String {
    let app = axum::Router::new()
        .route("/items/plants", get(list_plants))
        .with_state(seen);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_http_transport_round_trip() {
    let seen: Seen = Arc::new(Mutex::new(None));
    let base = spawn_server(seen.clone()).await;

    let client = Client::new(base).with_token("sesame");
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let all = plants
        .list(&Query::none().eq("status", "live"))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let request = seen.lock().unwrap().take().expect("server saw no request");
    assert!(
        request
            .params
            .contains(&("fields".to_string(), PLANT_FIELDS.to_string()))
    );
    assert!(
        request
            .params
            .contains(&("filter[status][_eq]".to_string(), "live".to_string()))
    );
    assert!(
        request
            .params
            .contains(&("limit".to_string(), "-1".to_string()))
    );
    assert_eq!(request.authorization.as_deref(), Some("Bearer sesame"));
}

#[tokio::test]
async fn test_http_transport_unexpected_status() {
    let seen: Seen = Arc::new(Mutex::new(None));
    let base = spawn_server(seen).await;

    let client = Client::new(base);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    // No route for single items is registered, so the server returns 404
    let err = plants.get(&99).await.unwrap_err();
    assert!(err.is_unexpected_status());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_http_transport_connection_refused() {
    // A high port that's unlikely to be in use
    let client = Client::new("http://127.0.0.1:59999");
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let err = plants.list(&Query::none()).await.unwrap_err();
    assert!(err.is_transport_error());
}

#[tokio::test]
async fn test_invalid_base_url_is_rejected() {
    let client = Client::new("not a url");
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    let err = plants.get(&7).await.unwrap_err();
    match err {
        directus_client::Error::Client(ClientError::InvalidUrl { .. }) => {}
        other => panic!("Expected InvalidUrl error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_v8_dialect_reaches_the_transport() {
    let mock = MockTransport::new().respond(200, plant_list_body());
    let client = Client::new(TEST_BASE_URL)
        .with_version(ApiVersion::V8)
        .with_transport(mock.clone());
    assert_eq!(client.version(), ApiVersion::V8);

    let plants = client.collection::<PlantR, PlantW, i64>("plants");
    plants
        .list(&Query::none().eq("status", "live"))
        .await
        .unwrap();

    let request = mock.last_request();
    assert_eq!(request.params.get("filter[status][eq]").unwrap(), "live");
    // The older dialect has no implicit limit
    assert!(!request.params.contains_key("limit"));
}
