//! Live integration tests for storefinder-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/storefinder-db/`).
//!
//! These tests are `#[ignore]`d so a plain `cargo test` passes without a
//! database. Point `DATABASE_URL` at a server the harness may create databases
//! on and run them with:
//!
//! ```text
//! cargo test -p storefinder-db --test live -- --include-ignored
//! ```

use storefinder_core::{
    Address, ErrorKind, GeoCalculator, InMemoryStoreRepository, Location, SearchDefaults,
    SearchRequest, Store, StoreId, StoreRepository, HAVERSINE,
};
use storefinder_db::PgStoreRepository;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NYC: (f64, f64) = (40.7128, -74.0060);

fn address(zip: &str) -> Address {
    Address::builder()
        .address_line1("1 Main St")
        .and_then(|b| b.city("New York"))
        .and_then(|b| b.state("NY"))
        .and_then(|b| b.county("New York"))
        .and_then(|b| b.zip_code(zip))
        .and_then(|b| b.build())
        .expect("test address")
}

fn store(name: &str, location: Location, zip: &str) -> Store {
    Store::builder()
        .store_id(StoreId::new())
        .name(name)
        .expect("name")
        .location(location)
        .address(address(zip))
        .build()
        .expect("test store")
}

fn nyc() -> Location {
    Location::new(NYC.0, NYC.1).expect("nyc")
}

fn repo(pool: sqlx::PgPool) -> PgStoreRepository {
    PgStoreRepository::new(pool, SearchDefaults::default())
}

// ---------------------------------------------------------------------------
// Section 1: CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn add_then_get_round_trips(pool: sqlx::PgPool) {
    let repo = repo(pool);
    let original = store("Manhattan Fresh", nyc(), "10007")
        .to_builder()
        .store_code("MF-1")
        .main_image_url("https://example.com/mf.jpg")
        .expect("url")
        .build()
        .expect("store");

    repo.add_store(original.clone()).await.expect("add");
    let id = original.store_id();
    let fetched = repo.get_store(id).await.expect("get");

    assert_eq!(fetched, original);
    assert!(repo.contains_store(id).await.expect("contains"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn add_duplicate_is_conflict(pool: sqlx::PgPool) {
    let repo = repo(pool);
    let s = store("Manhattan Fresh", nyc(), "10007");
    repo.add_store(s.clone()).await.expect("first add");

    let err = repo.add_store(s).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(repo.count_stores().await.expect("count"), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn update_inserts_then_overwrites(pool: sqlx::PgPool) {
    let repo = repo(pool);
    let s = store("Manhattan Fresh", nyc(), "10007");

    assert!(repo.update_store(s.clone()).await.expect("insert"));

    let moved = s
        .to_builder()
        .address(address("10013"))
        .build()
        .expect("moved");
    assert!(!repo.update_store(moved).await.expect("overwrite"));

    let fetched = repo.get_store(s.store_id()).await.expect("get");
    assert_eq!(fetched.address().zip_code(), "10013");
    assert_eq!(repo.count_stores().await.expect("count"), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn delete_missing_is_does_not_exist(pool: sqlx::PgPool) {
    let repo = repo(pool);
    let err = repo.delete_store(StoreId::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DoesNotExist);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn get_all_respects_limit_and_insertion_order(pool: sqlx::PgPool) {
    let repo = repo(pool);
    for i in 0..4 {
        repo.add_store(store(&format!("Store {i}"), nyc(), "10007"))
            .await
            .expect("add");
    }

    let all = repo.get_all_stores(0).await.expect("all");
    let names: Vec<&str> = all.iter().map(Store::name).collect();
    assert_eq!(names, vec!["Store 0", "Store 1", "Store 2", "Store 3"]);
    assert_eq!(repo.get_all_stores(2).await.expect("two").len(), 2);
    assert_eq!(
        repo.get_all_stores(-3).await.unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

// ---------------------------------------------------------------------------
// Section 2: Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn radius_search_filters_bbox_corners(pool: sqlx::PgPool) {
    let repo = repo(pool);
    let center = nyc();
    let near = HAVERSINE
        .destination_from(center, 9_000.0, 90.0)
        .expect("near");
    // Inside the 10 km bounding box, outside the circle.
    let corner = HAVERSINE
        .destination_from(center, 13_000.0, 45.0)
        .expect("corner");
    let la = Location::new(34.0522, -118.2437).expect("la");

    for s in [
        store("Manhattan Fresh", center, "10007"),
        store("Queens Market", near, "11101"),
        store("Corner Deli", corner, "11222"),
        store("Sunset Grocery", la, "90028"),
    ] {
        repo.add_store(s).await.expect("add");
    }

    let mut request = SearchRequest::new();
    request
        .set_center(center)
        .set_radius_in_meters(10_000.0)
        .expect("radius");
    let found = repo.search_for_stores(&request).await.expect("search");
    let names: Vec<&str> = found.iter().map(Store::name).collect();
    assert_eq!(names, vec!["Manhattan Fresh", "Queens Market"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn name_search_is_case_insensitive_and_literal(pool: sqlx::PgPool) {
    let repo = repo(pool);
    for name in ["100% Organic", "100 Organic", "Fresh MARKET", "Deli"] {
        repo.add_store(store(name, nyc(), "10007"))
            .await
            .expect("add");
    }

    let mut request = SearchRequest::new();
    request.set_search_term("100%");
    let found = repo.search_for_stores(&request).await.expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "100% Organic");

    request.set_search_term("market");
    let found = repo.search_for_stores(&request).await.expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Fresh MARKET");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn non_ascii_name_search_matches_in_memory_backend(pool: sqlx::PgPool) {
    let pg = repo(pool);
    let memory = InMemoryStoreRepository::new(SearchDefaults::default());
    for name in ["PANADERÍA ÉLITE", "Panaderia Sol", "ÉLITE Market"] {
        let s = store(name, nyc(), "10007");
        pg.add_store(s.clone()).await.expect("add pg");
        memory.add_store(s).await.expect("add memory");
    }

    let mut request = SearchRequest::new();
    request.set_search_term("panadería");
    let from_pg = pg.search_for_stores(&request).await.expect("pg search");
    let from_memory = memory.search_for_stores(&request).await.expect("search");
    assert_eq!(from_pg, from_memory);
    assert_eq!(from_pg.len(), 1);
    assert_eq!(from_pg[0].name(), "PANADERÍA ÉLITE");

    // No center, so the limit is applied in SQL after the name filter.
    request.set_search_term("élite");
    request.set_limit(1).expect("limit");
    let from_pg = pg.search_for_stores(&request).await.expect("pg search");
    let from_memory = memory.search_for_stores(&request).await.expect("search");
    assert_eq!(from_pg, from_memory);
    assert_eq!(from_pg.len(), 1);
    assert_eq!(from_pg[0].name(), "PANADERÍA ÉLITE");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn antimeridian_search_finds_both_sides(pool: sqlx::PgPool) {
    let repo = repo(pool);
    let center = Location::new(-17.7134, 179.95).expect("fiji");
    let west_side = Location::new(-17.7134, -179.9).expect("west");
    let far = Location::new(-17.7134, 170.0).expect("far");
    for (name, loc) in [("East Side", center), ("West Side", west_side), ("Far", far)] {
        repo.add_store(store(name, loc, "96799"))
            .await
            .expect("add");
    }

    let mut request = SearchRequest::new();
    request
        .set_center(center)
        .set_radius_in_meters(50_000.0)
        .expect("radius");
    let found = repo.search_for_stores(&request).await.expect("search");
    let names: Vec<&str> = found.iter().map(Store::name).collect();
    assert_eq!(names, vec!["East Side", "West Side"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn zip_and_limit_combine(pool: sqlx::PgPool) {
    let repo = repo(pool);
    for i in 0..5 {
        repo.add_store(store(&format!("Zip A {i}"), nyc(), "10001"))
            .await
            .expect("add");
        repo.add_store(store(&format!("Zip B {i}"), nyc(), "10002"))
            .await
            .expect("add");
    }

    let mut request = SearchRequest::new();
    request.set_zip_code("10002").expect("zip");
    request.set_limit(3).expect("limit");
    let found = repo.search_for_stores(&request).await.expect("search");
    let names: Vec<&str> = found.iter().map(Store::name).collect();
    assert_eq!(names, vec!["Zip B 0", "Zip B 1", "Zip B 2"]);
}
