//! 固定タイムゾーンでの「いま」と暦の情報を扱う。

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

/// 1 回の実行で共有する現在時刻のコンテキスト。
///
/// 日付の比較はすべてこのタイムゾーンの暦日で行う。UTC の瞬間同士を直接比べてはいけない。
#[derive(Debug, Clone)]
pub struct TimeContext {
    now: DateTime<Tz>,
}

impl TimeContext {
    /// 任意の時刻からコンテキストを作成する。
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    /// 壁時計の現在時刻からコンテキストを作成する。
    pub fn now(tz: Tz) -> Self {
        Self::from_utc(Utc::now(), tz)
    }

    /// UTC の瞬間を指定タイムゾーンに変換してコンテキストを作成する。
    pub fn from_utc(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self::new(instant.with_timezone(&tz))
    }

    pub fn timezone(&self) -> Tz {
        self.now.timezone()
    }

    pub fn now_local(&self) -> &DateTime<Tz> {
        &self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn hour(&self) -> u32 {
        self.now.hour()
    }

    pub fn year(&self) -> i32 {
        self.now.year()
    }

    pub fn month(&self) -> u32 {
        self.now.month()
    }

    /// 1 始まりの年内通算日。
    pub fn day_of_year(&self) -> u32 {
        self.now.ordinal()
    }

    pub fn days_in_year(&self) -> u32 {
        if is_leap_year(self.year()) { 366 } else { 365 }
    }

    pub fn month_start(&self) -> NaiveDate {
        let today = self.today();
        today - Days::new(u64::from(today.day0()))
    }

    pub fn month_end(&self) -> NaiveDate {
        self.month_start() + Months::new(1) - Days::new(1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.month_end().day()
    }

    /// 月初の曜日（月曜 = 0 .. 日曜 = 6）。
    pub fn first_weekday_of_month(&self) -> u32 {
        self.month_start().weekday().num_days_from_monday()
    }

    /// UTC の瞬間をこのコンテキストのタイムゾーンの暦日に変換する。
    pub fn civil_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone()).date_naive()
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
