use crate::calendar::MonthCalendar;
use crate::record::SUMMARY_MARKER;
use crate::stats::Stats;
use crate::time::TimeContext;

/// 統計コメントの本文を生成する。
///
/// 出力は入力だけで決まる。同じ日に何度実行しても本文は変わらない。
pub fn format_summary(stats: &Stats, calendar: &MonthCalendar, ctx: &TimeContext) -> String {
    format!(
        "{SUMMARY_MARKER}\n\
         ## 📊 起床打卡统计\n\
         \n\
         - 累计打卡：{total} 天\n\
         - 连续打卡：{consecutive} 天\n\
         - 本月打卡：{month_count} 天（早起 {month_early} 天，早起率 {rate:.1}%）\n\
         - 今年打卡：{year_count} 天（今年已过 {day_of_year}/{days_in_year} 天）\n\
         \n\
         ### {year}年{month}月\n\
         \n\
         {table}\n\
         🌟 早起 ✅ 已打卡 ❌ 未打卡 ⬜ 未到\n\
         \n\
         _更新于 {today}_\n",
        total = stats.total,
        consecutive = stats.consecutive,
        month_count = stats.month_count,
        month_early = stats.month_early_count,
        rate = stats.early_rate(),
        year_count = stats.year_count,
        day_of_year = ctx.day_of_year(),
        days_in_year = ctx.days_in_year(),
        year = calendar.year,
        month = calendar.month,
        table = calendar.to_markdown(),
        today = ctx.today().format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::render_calendar;
    use crate::record::{RecordKind, classify};
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    fn ctx(hour: u32) -> TimeContext {
        TimeContext::new(Shanghai.with_ymd_and_hms(2024, 2, 10, hour, 0, 0).single().unwrap())
    }

    #[test]
    fn summary_is_recognized_as_summary() {
        let ctx = ctx(7);
        let body = format_summary(&Stats::default(), &render_calendar(&[], &ctx), &ctx);
        assert!(body.starts_with(SUMMARY_MARKER));
        assert_eq!(classify(&body), RecordKind::Summary);
    }

    #[test]
    fn summary_contents() {
        let ctx = ctx(7);
        let stats = Stats {
            total: 12,
            consecutive: 3,
            month_count: 3,
            month_early_count: 2,
            year_count: 8,
        };
        let body = format_summary(&stats, &render_calendar(&[], &ctx), &ctx);

        assert!(body.contains("- 累计打卡：12 天\n"));
        assert!(body.contains("- 连续打卡：3 天\n"));
        assert!(body.contains("早起 2 天，早起率 66.7%"));
        assert!(body.contains("今年已过 41/366 天"));
        assert!(body.contains("### 2024年2月\n\n| 一 | 二 | 三 | 四 | 五 | 六 | 日 |\n"));
        assert!(body.contains("_更新于 2024-02-10_"));
    }

    #[test]
    fn summary_is_idempotent_within_a_day() {
        let morning = ctx(7);
        let evening = ctx(22);
        let stats = Stats {
            total: 1,
            consecutive: 1,
            month_count: 1,
            month_early_count: 1,
            year_count: 1,
        };
        let a = format_summary(&stats, &render_calendar(&[], &morning), &morning);
        let b = format_summary(&stats, &render_calendar(&[], &morning), &morning);
        let c = format_summary(&stats, &render_calendar(&[], &evening), &evening);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}
