pub mod catalog_store;
pub mod codec;

// パブリックに型を再エクスポート
pub use catalog_store::CatalogStore as JsonFileCatalogStore;
pub use codec::{decode_snapshot, encode_snapshot};
