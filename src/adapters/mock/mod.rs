pub mod catalog_store;
pub mod clock;

#[allow(unused_imports)]
pub use catalog_store::CatalogStore;
#[allow(unused_imports)]
pub use clock::Clock;
