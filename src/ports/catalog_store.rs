use crate::domain::{BookId, LoanId, LoanStatus, MemberId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 永続化層のエラー
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 読み込み元が存在しない（初回起動時など。空の状態で続行できる）
    #[error("Data source not found: {location}")]
    SourceMissing { location: String },

    /// 読み書きに失敗した
    #[error("I/O error on {location}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// 構造化データとして解釈できない（必須フィールドの欠落を含む）
    #[error("Malformed catalog data in {location}")]
    Parse {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 形式は正しいが不変条件を満たさない
    #[error("Invalid catalog data: {0}")]
    Invalid(String),
}

impl PersistenceError {
    /// 読み込み元がないだけの回復可能な状態か
    pub fn is_source_missing(&self) -> bool {
        matches!(self, PersistenceError::SourceMissing { .. })
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// カタログ保存先ポート
///
/// カタログ全体のスナップショットを丸ごと読み書きする。
/// 部分更新は行わない。
pub trait CatalogStore: Send + Sync {
    /// スナップショットを読み込む
    ///
    /// 読み込み元が存在しない場合は`PersistenceError::SourceMissing`を返す。
    fn load(&self) -> Result<CatalogSnapshot>;

    /// スナップショットを書き込む
    fn save(&self, snapshot: &CatalogSnapshot) -> Result<()>;

    /// 保存先の表示名（ログ・エラーメッセージ用）
    fn location(&self) -> String;
}

/// 識別子をキーとするマップに格納されるレコード
pub trait Keyed {
    fn key(&self) -> &str;
}

/// カタログのスナップショット（永続化形式）
///
/// `books`, `members`, `loans` は識別子 → レコードのマップとして表現され、
/// 登録順を保持したまま読み書きされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default, with = "keyed")]
    pub books: Vec<BookRecord>,
    #[serde(default, with = "keyed")]
    pub members: Vec<MemberRecord>,
    #[serde(default, with = "keyed")]
    pub loans: Vec<LoanRecord>,
    /// 次に採番する貸出連番
    #[serde(default = "default_loan_counter")]
    pub loan_counter: u32,
}

fn default_loan_counter() -> u32 {
    1
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            members: Vec::new(),
            loans: Vec::new(),
            loan_counter: default_loan_counter(),
        }
    }
}

/// 書籍レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub stock: u32,
    pub available: u32,
}

impl Keyed for BookRecord {
    fn key(&self) -> &str {
        self.book_id.value()
    }
}

/// 会員レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub member_id: MemberId,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub borrowed_books: Vec<BookId>,
}

impl Keyed for MemberRecord {
    fn key(&self) -> &str {
        self.member_id.value()
    }
}

/// 貸出レコード
///
/// `status`は省略可能。省略時は`return_date`の有無から決まる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    pub member_id: MemberId,
    pub book_id: BookId,
    pub loan_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<LoanStatus>,
}

impl Keyed for LoanRecord {
    fn key(&self) -> &str {
        self.loan_id.value()
    }
}

/// 識別子キーのマップ ⇔ 登録順のレコード列
mod keyed {
    use super::Keyed;
    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(records: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize + Keyed,
    {
        serializer.collect_map(records.iter().map(|record| (record.key(), record)))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Keyed,
    {
        struct KeyedVisitor<T>(PhantomData<T>);

        impl<'de, T> Visitor<'de> for KeyedVisitor<T>
        where
            T: Deserialize<'de> + Keyed,
        {
            type Value = Vec<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of records keyed by their identifier")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, record)) = map.next_entry::<String, T>()? {
                    if record.key() != key {
                        return Err(de::Error::custom(format!(
                            "key {:?} does not match record identifier {:?}",
                            key,
                            record.key()
                        )));
                    }
                    records.push(record);
                }
                Ok(records)
            }
        }

        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }
}
