use directus_client::{
    Query, Tristate,
    schema::{FieldKind, Model, Schema, field_paths, field_paths_for},
};
use serde::Deserialize;

use crate::helpers::{MockTransport, PlantR, PlantW, plant_body, plant_list_body, test_client};

#[derive(Deserialize)]
#[allow(dead_code)]
struct NurseryR {
    id: i64,
    owner: OwnerR,
    opened_on: Tristate<String>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct OwnerR {
    id: i64,
    address: AddressR,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct AddressR {
    city: String,
    country: String,
}

impl Model for NurseryR {
    fn schema() -> Schema {
        let address = Schema::new()
            .field("city", FieldKind::Text)
            .field("country", FieldKind::Text);
        let owner = Schema::new()
            .field("id", FieldKind::Int)
            .field("address", FieldKind::record(address));
        Schema::new()
            .field("id", FieldKind::Int)
            .field("owner", FieldKind::record(owner))
            .field("opened_on", FieldKind::tristate(FieldKind::Text))
    }
}

#[tokio::test]
async fn test_nested_models_flatten_to_dotted_paths() {
    let mock = MockTransport::new().respond(200, plant_body(1));
    let client = test_client(&mock);
    let nurseries = client.collection::<NurseryR, PlantW, i64>("nurseries");

    // The canned body doesn't match NurseryR; only the request matters here
    let _ = nurseries.get(&1).await;

    assert_eq!(
        mock.last_request().params.get("fields").unwrap(),
        "id,owner.id,owner.address.city,owner.address.country,opened_on"
    );
}

#[test]
fn test_tristate_wrappers_are_transparent_in_paths() {
    let paths = field_paths(&NurseryR::schema());
    assert!(paths.contains(&"opened_on".to_string()));
    // A tri-state leaf contributes a single path, not a subtree
    assert_eq!(paths.iter().filter(|p| p.starts_with("opened_on")).count(), 1);
}

#[test]
fn test_cached_paths_are_shared_per_model() {
    let first = field_paths_for::<NurseryR>();
    let second = field_paths_for::<NurseryR>();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_every_read_operation_sends_the_same_fields() {
    let mock = MockTransport::new()
        .respond(200, plant_body(1))
        .respond(200, plant_list_body());
    let client = test_client(&mock);
    let plants = client.collection::<PlantR, PlantW, i64>("plants");

    plants.get(&1).await.unwrap();
    plants.list(&Query::none()).await.unwrap();

    let requests = mock.requests();
    let fields: Vec<_> = requests
        .iter()
        .map(|r| r.params.get("fields").unwrap().clone())
        .collect();
    assert_eq!(fields[0], fields[1]);
}
