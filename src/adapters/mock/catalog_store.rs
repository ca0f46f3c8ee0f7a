use crate::ports::catalog_store::{
    CatalogSnapshot, CatalogStore as CatalogStoreTrait, PersistenceError, Result,
};
use std::sync::Mutex;

/// CatalogStoreのモック実装
///
/// スナップショットをメモリ上に保持する。
/// 何も保存していない状態での読み込みは`SourceMissing`になる。
pub struct CatalogStore {
    snapshot: Mutex<Option<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(None),
        }
    }

    /// テスト用に保存済みのスナップショットを用意する
    pub fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    /// 最後に保存されたスナップショット
    pub fn saved(&self) -> Option<CatalogSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStoreTrait for CatalogStore {
    fn load(&self) -> Result<CatalogSnapshot> {
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PersistenceError::SourceMissing {
                location: self.location(),
            })
    }

    fn save(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
