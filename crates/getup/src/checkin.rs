//! 1 回分の起床打卡を実行する。
//!
//! コメント一覧を取得し、今日まだ打卡していなければ打卡コメントを投稿し、
//! 統計コメントを作り直して更新（なければ作成）する。

use std::fmt;

use anyhow::{Context as _, Result};
use getup_core::{
    EarlyWindow, Stats, TimeContext, aggregate, format_check_in, format_summary,
    has_checked_in_today, partition, render_calendar,
};
use tracing::{info, warn};

use crate::quote::QuoteProvider;
use crate::store::RecordStore;

/// 打卡の設定。
pub struct CheckInOptions<'a> {
    /// 天気の文面（空なら付けない）
    pub weather: Option<&'a str>,
    pub window: EarlyWindow,
    /// 早起き時間帯の外でも投稿するか
    pub record_late: bool,
}

/// 打卡コメントの投稿結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// 今日はすでに打卡済み
    AlreadyCheckedIn,
    /// 早起き時間帯の外なので投稿しなかった
    TooLate { hour: u32 },
    Posted { record_id: u64 },
}

/// 統計コメントの更新結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    Created { record_id: u64 },
    Updated { record_id: u64 },
    /// 本文に変化がないので更新しなかった
    Unchanged { record_id: u64 },
}

impl fmt::Display for CheckInOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCheckedIn => write!(f, "already checked in"),
            Self::TooLate { hour } => write!(f, "skipped (hour {hour} is outside the early window)"),
            Self::Posted { record_id } => write!(f, "posted #{record_id}"),
        }
    }
}

impl fmt::Display for SummaryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { record_id } => write!(f, "created #{record_id}"),
            Self::Updated { record_id } => write!(f, "updated #{record_id}"),
            Self::Unchanged { record_id } => write!(f, "unchanged #{record_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub check_in: CheckInOutcome,
    pub summary: SummaryOutcome,
    pub stats: Stats,
}

/// 打卡と統計コメントの更新を順に行う。
///
/// 統計コメントは打卡コメントの投稿が成功した後にだけ書き込む。
pub async fn run<S, Q>(
    store: &S,
    quotes: &Q,
    ctx: &TimeContext,
    options: &CheckInOptions<'_>,
) -> Result<RunReport>
where
    S: RecordStore + ?Sized,
    Q: QuoteProvider + ?Sized,
{
    let mut records = store
        .list_records()
        .await
        .context("Failed to list issue comments")?;
    info!(count = records.len(), today = %ctx.today(), "Fetched issue comments");

    let checked_in = has_checked_in_today(&partition(&records, ctx).checkins, ctx);
    let hour = ctx.hour();

    let check_in = if checked_in {
        info!("Already checked in today");
        CheckInOutcome::AlreadyCheckedIn
    } else if !options.window.contains(hour) && !options.record_late {
        warn!(
            hour,
            start = options.window.start_hour(),
            end = options.window.end_hour(),
            "Woke up outside the early window, check-in not recorded"
        );
        CheckInOutcome::TooLate { hour }
    } else {
        let sentence = quotes.get_quote().await;
        let body = format_check_in(ctx, &sentence, options.weather, &options.window);
        let record = store
            .create_record(&body)
            .await
            .context("Failed to create check-in comment")?;
        info!(record_id = record.id, hour, "Check-in comment created");
        let record_id = record.id;
        records.push(record);
        CheckInOutcome::Posted { record_id }
    };

    let part = partition(&records, ctx);
    for extra in &part.extra_summaries {
        warn!(record_id = extra.id, "Duplicate summary comment found, leaving it untouched");
    }

    let stats = aggregate(&part.checkins, ctx);
    let calendar = render_calendar(&part.checkins, ctx);
    let body = format_summary(&stats, &calendar, ctx);

    let summary = match part.summary {
        Some(existing) if existing.body == body => {
            info!(record_id = existing.id, "Summary comment is up to date");
            SummaryOutcome::Unchanged {
                record_id: existing.id,
            }
        }
        Some(existing) => {
            store
                .update_record(existing.id, &body)
                .await
                .context("Failed to update summary comment")?;
            info!(record_id = existing.id, "Summary comment updated");
            SummaryOutcome::Updated {
                record_id: existing.id,
            }
        }
        None => {
            let record = store
                .create_record(&body)
                .await
                .context("Failed to create summary comment")?;
            info!(record_id = record.id, "Summary comment created");
            SummaryOutcome::Created {
                record_id: record.id,
            }
        }
    };

    info!(
        total = stats.total,
        consecutive = stats.consecutive,
        month = stats.month_count,
        month_early = stats.month_early_count,
        year = stats.year_count,
        "Statistics refreshed"
    );

    Ok(RunReport {
        check_in,
        summary,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Asia::Shanghai;
    use getup_core::{Record, RecordKind, SUMMARY_MARKER, classify};

    struct FixedQuote;

    #[async_trait]
    impl QuoteProvider for FixedQuote {
        async fn get_quote(&self) -> String {
            "春眠不觉晓".to_string()
        }
    }

    /// 作成が必ず失敗し、更新の呼び出し回数を数えるストア。
    struct RejectingStore {
        inner: MemoryStore,
        updates: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for RejectingStore {
        async fn list_records(&self) -> Result<Vec<Record>> {
            self.inner.list_records().await
        }

        async fn create_record(&self, _body: &str) -> Result<Record> {
            anyhow::bail!("503 Service Unavailable")
        }

        async fn update_record(&self, record_id: u64, body: &str) -> Result<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update_record(record_id, body).await
        }
    }

    fn shanghai(d: u32, h: u32) -> DateTime<Utc> {
        Shanghai
            .with_ymd_and_hms(2024, 2, d, h, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn options() -> CheckInOptions<'static> {
        CheckInOptions {
            weather: Some("晴"),
            window: EarlyWindow::new(4, 10).unwrap(),
            record_late: false,
        }
    }

    fn checkin_record(id: u64, d: u32) -> Record {
        Record {
            id,
            created_at: shanghai(d, 7),
            body: format!("☀ 今天的起床时间是--2024-02-{d:02} 07:00:00."),
        }
    }

    #[tokio::test]
    async fn first_run_posts_check_in_and_creates_summary() {
        let now = shanghai(10, 7);
        let store = MemoryStore::new(vec![checkin_record(1, 9)], now);
        let ctx = TimeContext::from_utc(now, Shanghai);

        let report = run(&store, &FixedQuote, &ctx, &options()).await.unwrap();

        assert_eq!(report.check_in, CheckInOutcome::Posted { record_id: 2 });
        assert_eq!(report.summary, SummaryOutcome::Created { record_id: 3 });
        assert_eq!(report.stats.consecutive, 2);
        assert_eq!(report.stats.month_early_count, 2);

        let records = store.records();
        assert_eq!(records.len(), 3);
        assert!(records[1].body.starts_with("现在的天气是晴\n☀ 今天的起床时间是"));
        assert!(records[1].body.ends_with("春眠不觉晓"));
        assert_eq!(classify(&records[2].body), RecordKind::Summary);
    }

    #[tokio::test]
    async fn second_run_same_day_does_not_post_again() {
        let store = MemoryStore::new(vec![checkin_record(1, 9)], shanghai(10, 7));
        let morning = TimeContext::from_utc(shanghai(10, 7), Shanghai);
        run(&store, &FixedQuote, &morning, &options()).await.unwrap();

        let later = TimeContext::from_utc(shanghai(10, 9), Shanghai);
        let report = run(&store, &FixedQuote, &later, &options()).await.unwrap();

        assert_eq!(report.check_in, CheckInOutcome::AlreadyCheckedIn);
        assert_eq!(report.summary, SummaryOutcome::Unchanged { record_id: 3 });
        assert_eq!(store.records().len(), 3);
    }

    #[tokio::test]
    async fn late_run_skips_check_in_but_refreshes_summary() {
        let summary = Record {
            id: 5,
            created_at: shanghai(1, 7),
            body: format!("{SUMMARY_MARKER}\nstale"),
        };
        let store = MemoryStore::new(vec![summary, checkin_record(1, 9)], shanghai(10, 13));
        let ctx = TimeContext::from_utc(shanghai(10, 13), Shanghai);

        let report = run(&store, &FixedQuote, &ctx, &options()).await.unwrap();

        assert_eq!(report.check_in, CheckInOutcome::TooLate { hour: 13 });
        assert_eq!(report.summary, SummaryOutcome::Updated { record_id: 5 });
        assert_eq!(report.stats.consecutive, 1);

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].body.contains("- 连续打卡：1 天\n"));
    }

    #[tokio::test]
    async fn late_run_records_when_enabled() {
        let store = MemoryStore::new(vec![], shanghai(10, 22));
        let ctx = TimeContext::from_utc(shanghai(10, 22), Shanghai);
        let options = CheckInOptions {
            record_late: true,
            ..options()
        };

        let report = run(&store, &FixedQuote, &ctx, &options).await.unwrap();

        assert_eq!(report.check_in, CheckInOutcome::Posted { record_id: 1 });
        assert_eq!(report.stats.month_count, 1);
        assert_eq!(report.stats.month_early_count, 0);
        assert_eq!(
            classify(&store.records()[0].body),
            RecordKind::CheckIn { is_early: false }
        );
    }

    #[tokio::test]
    async fn check_in_after_utc_midnight_counts_for_civil_day() {
        // 上海 2/10 07:00（UTC では 2/9 23:00）に投稿済み、同日 23:00 に再実行
        let store = MemoryStore::new(vec![checkin_record(1, 10)], shanghai(10, 23));
        let ctx = TimeContext::from_utc(shanghai(10, 23), Shanghai);

        let report = run(&store, &FixedQuote, &ctx, &options()).await.unwrap();
        assert_eq!(report.check_in, CheckInOutcome::AlreadyCheckedIn);
    }

    #[tokio::test]
    async fn failed_check_in_leaves_summary_untouched() {
        let summary = Record {
            id: 5,
            created_at: shanghai(1, 7),
            body: format!("{SUMMARY_MARKER}\nstale"),
        };
        let store = RejectingStore {
            inner: MemoryStore::new(vec![summary.clone(), checkin_record(1, 9)], shanghai(10, 7)),
            updates: AtomicUsize::new(0),
        };
        let ctx = TimeContext::from_utc(shanghai(10, 7), Shanghai);

        let err = run(&store, &FixedQuote, &ctx, &options()).await.unwrap_err();

        assert!(err.to_string().contains("check-in"));
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
        assert_eq!(store.inner.records()[0], summary);
    }

    #[tokio::test]
    async fn oldest_summary_is_updated_and_duplicates_are_left_alone() {
        let oldest = Record {
            id: 6,
            created_at: shanghai(1, 7),
            body: format!("{SUMMARY_MARKER}\nold"),
        };
        let duplicate = Record {
            id: 4,
            created_at: shanghai(2, 7),
            body: format!("{SUMMARY_MARKER}\nduplicate"),
        };
        let store = MemoryStore::new(
            vec![duplicate.clone(), checkin_record(1, 9), oldest],
            shanghai(10, 7),
        );
        let ctx = TimeContext::from_utc(shanghai(10, 7), Shanghai);

        let report = run(&store, &FixedQuote, &ctx, &options()).await.unwrap();

        assert_eq!(report.check_in, CheckInOutcome::Posted { record_id: 7 });
        assert_eq!(report.summary, SummaryOutcome::Updated { record_id: 6 });

        let records = store.records();
        assert_eq!(records[0], duplicate);
        assert!(records[2].body.contains("- 连续打卡：2 天\n"));
    }

    #[test]
    fn outcomes_display_their_ids() {
        assert_eq!(CheckInOutcome::Posted { record_id: 3 }.to_string(), "posted #3");
        assert_eq!(
            CheckInOutcome::TooLate { hour: 13 }.to_string(),
            "skipped (hour 13 is outside the early window)"
        );
        assert_eq!(SummaryOutcome::Unchanged { record_id: 5 }.to_string(), "unchanged #5");
    }
}
