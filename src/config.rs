use std::path::{Component, Path, PathBuf};

/// デフォルトの保存ファイル名
pub const DEFAULT_DATA_FILE: &str = "library.json";

/// デフォルトの待ち受けポート
pub const DEFAULT_PORT: u16 = 3000;

/// アプリケーション設定
///
/// 環境変数から読み込む：
/// - `PORT`: 待ち受けポート（既定 3000）
/// - `LIBRARY_DATA_FILE`: 保存・読み込みの既定ファイル（既定 `library.json`）
/// - `LIBRARY_SEED_SAMPLE`: 起動時にサンプルデータを登録するか（既定 false）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub data_file: PathBuf,
    pub seed_sample: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            seed_sample: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から設定を組み立てる
    ///
    /// 解釈できない値は既定値に戻し、警告を出す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT {:?}, using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let data_file = lookup("LIBRARY_DATA_FILE")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let seed_sample = lookup("LIBRARY_SEED_SAMPLE")
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.seed_sample);

        Self {
            port,
            data_file,
            seed_sample,
        }
    }

    /// 既定ファイルと同じディレクトリ配下でファイル名を解決する
    ///
    /// 絶対パスや`..`を含む名前は受け付けない（`None`）。
    pub fn resolve_data_file(&self, filename: &str) -> Option<PathBuf> {
        let relative = Path::new(filename);
        let plain = relative.components().next().is_some()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return None;
        }

        let base = self.data_file.parent().unwrap_or(Path::new(""));
        Some(base.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_file, PathBuf::from("library.json"));
    }

    #[test]
    fn test_reads_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("LIBRARY_DATA_FILE", "/tmp/catalog.json"),
            ("LIBRARY_SEED_SAMPLE", "TRUE"),
        ]));

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_file, PathBuf::from("/tmp/catalog.json"));
        assert!(config.seed_sample);
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_resolve_data_file_stays_in_data_directory() {
        let config = AppConfig {
            data_file: PathBuf::from("/srv/library/library.json"),
            ..AppConfig::default()
        };

        assert_eq!(
            config.resolve_data_file("backup.json"),
            Some(PathBuf::from("/srv/library/backup.json"))
        );
        assert_eq!(
            config.resolve_data_file("old/2024.json"),
            Some(PathBuf::from("/srv/library/old/2024.json"))
        );
        assert_eq!(config.resolve_data_file("/etc/passwd"), None);
        assert_eq!(config.resolve_data_file("../outside.json"), None);
        assert_eq!(config.resolve_data_file("old/../../outside.json"), None);
        assert_eq!(config.resolve_data_file(""), None);
    }

    #[test]
    fn test_resolve_data_file_with_bare_default() {
        let config = AppConfig::default();
        assert_eq!(
            config.resolve_data_file("backup.json"),
            Some(PathBuf::from("backup.json"))
        );
    }

    #[test]
    fn test_blank_data_file_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup_from(&[("LIBRARY_DATA_FILE", "  ")]));
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
