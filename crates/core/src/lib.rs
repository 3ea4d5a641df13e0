//! 起床打卡の集計エンジン。
//!
//! Issue コメントの一覧から打卡記録を分類し、連続日数・月間/年間の集計・
//! カレンダーを組み立てて、統計コメントの本文を生成する。
//! I/O は一切行わず、現在時刻も [`TimeContext`] として外から受け取る。

mod calendar;
mod error;
mod message;
mod record;
mod stats;
mod streak;
mod summary;
mod time;

pub use calendar::{Cell, Mark, MonthCalendar, render_calendar};
pub use error::{Error, Result};
pub use message::{
    CHECK_IN_TITLE, DEFAULT_SENTENCE, EarlyWindow, LATE_GLYPH, format_check_in,
    has_checked_in_today, wake_glyph,
};
pub use record::{
    CHECK_IN_MARKERS, CheckIn, EARLY_GLYPHS, Partition, Record, RecordKind, SUMMARY_MARKER,
    classify, partition,
};
pub use stats::{Stats, aggregate};
pub use streak::streak;
pub use summary::format_summary;
pub use time::TimeContext;
