use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::record::CheckIn;
use crate::streak::streak;
use crate::time::TimeContext;

/// 打卡の集計結果。各件数は暦日単位で数える。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// 累計打卡日数
    pub total: u32,
    /// 連続打卡日数
    pub consecutive: u32,
    /// 今月の打卡日数
    pub month_count: u32,
    /// 今月の早起き日数
    pub month_early_count: u32,
    /// 今年の打卡日数
    pub year_count: u32,
}

impl Stats {
    /// 今月の早起き率（%）。今月の打卡がなければ 0。
    pub fn early_rate(&self) -> f64 {
        if self.month_count == 0 {
            return 0.0;
        }
        f64::from(self.month_early_count) / f64::from(self.month_count) * 100.0
    }
}

/// 打卡記録を集計する。
pub fn aggregate(checkins: &[CheckIn], ctx: &TimeContext) -> Stats {
    let days = collapse_by_date(checkins);
    let (year, month) = (ctx.year(), ctx.month());

    let mut stats = Stats {
        total: days.len() as u32,
        consecutive: streak(checkins, ctx.today()),
        ..Default::default()
    };

    for (date, &is_early) in &days {
        if date.year() != year {
            continue;
        }
        stats.year_count += 1;
        if date.month() == month {
            stats.month_count += 1;
            if is_early {
                stats.month_early_count += 1;
            }
        }
    }

    stats
}

/// 暦日ごとにまとめる。同じ日に 1 件でも早起きがあれば早起き扱い。
pub(crate) fn collapse_by_date(checkins: &[CheckIn]) -> BTreeMap<NaiveDate, bool> {
    let mut days = BTreeMap::new();
    for c in checkins {
        let early = days.entry(c.date).or_insert(false);
        *early |= c.is_early;
    }
    days
}
