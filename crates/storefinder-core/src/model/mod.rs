//! Immutable value records for stores and where they are.

mod address;
mod location;
mod store;

pub use address::{validate_zip_code, Address, AddressBuilder};
pub use location::Location;
pub use store::{Store, StoreBuilder, StoreChanges, StoreId};
