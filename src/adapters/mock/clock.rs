use crate::ports::clock::Clock as ClockTrait;
use chrono::{Days, NaiveDate};
use std::sync::Mutex;

/// Clockのモック実装
///
/// 固定の日付を返す。テストから日付を進められる。
pub struct Clock {
    today: Mutex<NaiveDate>,
}

impl Clock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// テスト用に日付を進める
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap();
        *today = *today + Days::new(days);
    }
}

impl ClockTrait for Clock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
