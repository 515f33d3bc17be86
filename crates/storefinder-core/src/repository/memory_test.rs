use super::*;
use crate::error::ErrorKind;
use crate::geo::Haversine;
use crate::model::Location;
use crate::test_support::{nyc_scenario, store_at, NYC};

fn repo_with(stores: Vec<Store>) -> InMemoryStoreRepository {
    InMemoryStoreRepository::from_stores(SearchDefaults::default(), stores)
}

#[tokio::test]
async fn add_then_get_returns_the_same_store() {
    let repo = InMemoryStoreRepository::new(SearchDefaults::default());
    let store = store_at("Corner Market", 40.0, -74.0);

    repo.add_store(store.clone()).await.expect("add");

    let id = store.store_id();
    assert!(repo.contains_store(id).await.expect("contains"));
    assert_eq!(repo.get_store(id).await.expect("get"), store);
    assert!(repo.get_all_stores(0).await.expect("all").contains(&store));
    assert_eq!(repo.count_stores().await.expect("count"), 1);
}

#[tokio::test]
async fn add_rejects_duplicate_id() {
    let store = store_at("Corner Market", 40.0, -74.0);
    let repo = repo_with(vec![store.clone()]);

    let err = repo.add_store(store.clone()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(repo.count_stores().await.expect("count"), 1);
}

#[tokio::test]
async fn update_inserts_then_overwrites() {
    let repo = InMemoryStoreRepository::new(SearchDefaults::default());
    let original = store_at("Corner Market", 40.0, -74.0);

    assert!(repo.update_store(original.clone()).await.expect("insert"));

    let renamed = original
        .to_builder()
        .name("Corner Market & Deli")
        .expect("name")
        .build()
        .expect("build");
    assert!(!repo.update_store(renamed.clone()).await.expect("overwrite"));

    assert_eq!(repo.count_stores().await.expect("count"), 1);
    let stored = repo.get_store(original.store_id()).await.expect("get");
    assert_eq!(stored.name(), "Corner Market & Deli");
}

#[tokio::test]
async fn delete_missing_store_is_does_not_exist() {
    let repo = InMemoryStoreRepository::new(SearchDefaults::default());
    let err = repo.delete_store(StoreId::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DoesNotExist);
}

#[tokio::test]
async fn remove_store_deletes_by_id() {
    let stores = nyc_scenario();
    let victim = stores[1].clone();
    let repo = repo_with(stores);

    repo.remove_store(&victim).await.expect("remove");

    let id = victim.store_id();
    assert!(!repo.contains_store(id).await.expect("contains"));
    assert_eq!(repo.count_stores().await.expect("count"), 2);
}

#[tokio::test]
async fn get_missing_store_is_does_not_exist() {
    let repo = repo_with(nyc_scenario());
    let err = repo.get_store(StoreId::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DoesNotExist);
}

#[tokio::test]
async fn get_all_respects_limit() {
    let repo = repo_with(nyc_scenario());
    assert_eq!(repo.get_all_stores(0).await.expect("all").len(), 3);
    assert_eq!(repo.get_all_stores(2).await.expect("two").len(), 2);

    let err = repo.get_all_stores(-1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn search_combines_radius_and_name() {
    let repo = repo_with(nyc_scenario());
    let mut request = SearchRequest::new();
    request
        .set_center(Location::new(NYC.0, NYC.1).expect("nyc"))
        .set_radius_in_meters(30_000.0)
        .expect("radius");

    let nearby = repo.search_for_stores(&request).await.expect("search");
    assert_eq!(nearby.len(), 2);

    request.set_search_term("FRESH");
    let named = repo.search_for_stores(&request).await.expect("search");
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name(), "Manhattan Fresh");
}

#[tokio::test]
async fn from_stores_keeps_last_duplicate() {
    let first = store_at("First", 1.0, 1.0);
    let second = first
        .to_builder()
        .name("Second")
        .expect("name")
        .build()
        .expect("build");
    let repo = repo_with(vec![first.clone(), second]);

    assert_eq!(repo.count_stores().await.expect("count"), 1);
    assert_eq!(
        repo.get_store(first.store_id()).await.expect("get").name(),
        "Second"
    );
}

#[tokio::test]
async fn clones_share_the_same_collection() {
    let repo = InMemoryStoreRepository::new(SearchDefaults::default());
    let handle = repo.clone();
    handle
        .add_store(store_at("Shared", 0.0, 0.0))
        .await
        .expect("add");
    assert_eq!(repo.count_stores().await.expect("count"), 1);
}

#[tokio::test]
async fn with_calculator_uses_the_given_defaults() {
    let defaults = SearchDefaults {
        radius_in_meters: 25_000.0,
    };
    let repo = InMemoryStoreRepository::with_calculator(defaults, Haversine);
    for store in nyc_scenario() {
        repo.add_store(store).await.expect("add");
    }
    assert_eq!(repo.defaults(), &defaults);

    let mut request = SearchRequest::new();
    request.set_center(Location::new(NYC.0, NYC.1).expect("nyc"));
    let found = repo.search_for_stores(&request).await.expect("search");
    let names: Vec<&str> = found.iter().map(Store::name).collect();
    assert_eq!(names, vec!["Manhattan Fresh", "Bronx Corner Deli"]);
}
