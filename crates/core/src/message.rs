//! 打卡コメントの本文を組み立てる。

use crate::error::{Error, Result};
use crate::record::{CheckIn, EARLY_GLYPHS, SUMMARY_MARKER};
use crate::time::TimeContext;

/// 打卡コメントの見出し。
pub const CHECK_IN_TITLE: &str = "今天的起床时间是";

/// 詩の取得に失敗したときに使う一句。
pub const DEFAULT_SENTENCE: &str =
    "赏花归去马如飞\r\n去马如飞酒力微\r\n酒力微醒时已暮\r\n醒时已暮赏花归\r\n";

/// 早起き時間帯の外で打卡したときのグリフ。
pub const LATE_GLYPH: &str = "🌙";

const EXHORTATION: &str = "起床啦，喝杯咖啡，背个单词，去跑步。";

/// 早起きとみなす時間帯（両端を含む時）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarlyWindow {
    start_hour: u32,
    end_hour: u32,
}

impl EarlyWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(Error::InvalidEarlyWindow {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }
}

impl Default for EarlyWindow {
    fn default() -> Self {
        Self {
            start_hour: 4,
            end_hour: 20,
        }
    }
}

/// 起床時刻に応じたグリフを返す。時間帯の外なら [`LATE_GLYPH`]。
pub fn wake_glyph(hour: u32, window: &EarlyWindow) -> &'static str {
    if !window.contains(hour) {
        LATE_GLYPH
    } else if hour < 6 {
        "★"
    } else if hour < 9 {
        "☀"
    } else {
        "🌤"
    }
}

/// 打卡コメントの本文を生成する。
///
/// 詩と天気の文面から早起きグリフと統計マーカーを取り除いてから埋め込む。
/// 本文のグリフが早起き判定そのものなので、外部の文面に左右されないようにする。
pub fn format_check_in(
    ctx: &TimeContext,
    sentence: &str,
    weather: Option<&str>,
    window: &EarlyWindow,
) -> String {
    let glyph = wake_glyph(ctx.hour(), window);
    let time = ctx.now_local().format("%Y-%m-%d %H:%M:%S");

    let mut body = String::new();
    if let Some(weather) = weather.map(strip_reserved)
        && !weather.trim().is_empty()
    {
        body.push_str(&format!("现在的天气是{}\n", weather.trim()));
    }
    body.push_str(&format!(
        "{glyph} {CHECK_IN_TITLE}--{time}.\r\n\r\n {EXHORTATION}\r\n\r\n 今天的一句诗:\r\n {}",
        strip_reserved(sentence)
    ));
    body
}

/// 今日（固定タイムゾーンの暦日）すでに打卡しているか。
pub fn has_checked_in_today(checkins: &[CheckIn], ctx: &TimeContext) -> bool {
    let today = ctx.today();
    checkins.iter().any(|c| c.date == today)
}

/// 分類に使う記号（早起きグリフと統計マーカー）を取り除く。
fn strip_reserved(text: &str) -> String {
    EARLY_GLYPHS
        .iter()
        .chain(std::iter::once(&SUMMARY_MARKER))
        .fold(text.to_string(), |acc, token| acc.replace(token, ""))
}
