use chrono::NaiveDate;

/// 時計ポート
///
/// 貸出日・返却日の「今日」を外部から注入するための境界。
/// テストでは固定日付の実装を差し込む。
pub trait Clock: Send + Sync {
    /// 今日の日付
    fn today(&self) -> NaiveDate;
}
