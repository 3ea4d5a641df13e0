//! 今月の打卡状況を週単位のカレンダーに並べる。

use chrono::{Datelike, Days};

use crate::record::CheckIn;
use crate::stats::collapse_by_date;
use crate::time::TimeContext;

/// 空白セルと未来の日に使うグリフ。
pub const PLACEHOLDER_GLYPH: &str = "⬜";

/// カレンダーの見出し（月曜始まり）。
const WEEKDAY_HEADER: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

/// 1 日分の状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// 早起きで打卡した日
    Early,
    /// 打卡した日
    Checked,
    /// 今日までで打卡のない日
    Missed,
    /// まだ来ていない日
    Upcoming,
}

impl Mark {
    pub fn glyph(self) -> &'static str {
        match self {
            Mark::Early => "🌟",
            Mark::Checked => "✅",
            Mark::Missed => "❌",
            Mark::Upcoming => PLACEHOLDER_GLYPH,
        }
    }
}

/// カレンダーの 1 マス。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// 月初の前・月末の後の埋め草
    Padding,
    Day { day: u32, mark: Mark },
}

impl Cell {
    pub fn glyph(self) -> &'static str {
        match self {
            Cell::Padding => PLACEHOLDER_GLYPH,
            Cell::Day { mark, .. } => mark.glyph(),
        }
    }
}

/// 1 か月分のカレンダー。各行は月曜から日曜の 7 マス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Cell; 7]>,
}

impl MonthCalendar {
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.weeks.iter().flatten()
    }

    /// Markdown の表として描画する。
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&table_row(WEEKDAY_HEADER.iter().copied()));
        out.push_str(&table_row(std::iter::repeat_n(":-:", 7)));
        for week in &self.weeks {
            out.push_str(&table_row(week.iter().map(|c| c.glyph())));
        }
        out
    }
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell);
        row.push_str(" |");
    }
    row.push('\n');
    row
}

/// 今月のカレンダーを組み立てる。今月以外の記録は無視する。
pub fn render_calendar(checkins: &[CheckIn], ctx: &TimeContext) -> MonthCalendar {
    let days = collapse_by_date(checkins);
    let month_start = ctx.month_start();
    let days_in_month = ctx.days_in_month();
    let today = ctx.today().day();
    let lead = ctx.first_weekday_of_month() as usize;

    let rows = (lead + days_in_month as usize).div_ceil(7);
    let mut weeks = vec![[Cell::Padding; 7]; rows];

    for day in 1..=days_in_month {
        let date = month_start + Days::new(u64::from(day - 1));
        let mark = match days.get(&date) {
            Some(true) => Mark::Early,
            Some(false) => Mark::Checked,
            None if day <= today => Mark::Missed,
            None => Mark::Upcoming,
        };
        let slot = lead + (day - 1) as usize;
        weeks[slot / 7][slot % 7] = Cell::Day { day, mark };
    }

    MonthCalendar {
        year: ctx.year(),
        month: ctx.month(),
        weeks,
    }
}
