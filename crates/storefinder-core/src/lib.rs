pub mod app_config;
pub mod bounding_box;
pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod search;
pub mod seed;

pub use app_config::{AppConfig, Backend, Environment};
pub use bounding_box::BoundingBox;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ErrorKind, StoreError, ValidationError};
pub use geo::{GeoCalculator, GeoError, Haversine, HAVERSINE};
pub use model::{Address, AddressBuilder, Location, Store, StoreBuilder, StoreChanges, StoreId};
pub use pipeline::{filter_stores, fold_name, StoreFilter};
pub use repository::{normalize_limit, InMemoryStoreRepository, StoreRepository};
pub use search::{SearchDefaults, SearchParams, SearchRequest, DEFAULT_SEARCH_RADIUS_METERS};
pub use seed::load_stores;
