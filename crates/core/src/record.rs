//! Issue コメントを打卡記録・統計コメント・無関係なコメントに分類する。

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::time::TimeContext;

/// 統計コメントの先頭に付けるマーカー。
pub const SUMMARY_MARKER: &str = "<!-- getup:summary -->";

/// 打卡記録とみなすための文言。いずれかを含めば打卡記録。
pub const CHECK_IN_MARKERS: &[&str] = &["今天的起床时间是", "起床时间"];

/// 早起きを表すグリフ。本文にいずれかが含まれていれば早起き。
pub const EARLY_GLYPHS: &[&str] = &["★", "☀", "🌤"];

/// Issue コメント 1 件。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// コメント ID
    pub id: u64,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 本文
    #[serde(default)]
    pub body: String,
}

/// 分類結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// 統計コメント
    Summary,
    /// 打卡記録
    CheckIn { is_early: bool },
    /// 無関係なコメント
    Ignored,
}

/// 打卡記録として確定したコメント。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckIn {
    pub record_id: u64,
    /// 固定タイムゾーンでの暦日
    pub date: NaiveDate,
    pub is_early: bool,
}

/// コメント本文を分類する。
///
/// 早起きかどうかはタイムスタンプではなく本文のグリフで判定する。
/// 投稿時点の判定結果がそのまま残るので、後で時間帯の設定を変えても過去の記録は変わらない。
pub fn classify(body: &str) -> RecordKind {
    if body.trim_start().starts_with(SUMMARY_MARKER) {
        return RecordKind::Summary;
    }

    if CHECK_IN_MARKERS.iter().any(|m| body.contains(m)) {
        let is_early = EARLY_GLYPHS.iter().any(|g| body.contains(g));
        return RecordKind::CheckIn { is_early };
    }

    RecordKind::Ignored
}

/// 分類済みのコメント一覧。
#[derive(Debug, Default)]
pub struct Partition<'a> {
    /// 更新対象の統計コメント（最も古いもの）
    pub summary: Option<&'a Record>,
    /// 重複して存在する統計コメント
    pub extra_summaries: Vec<&'a Record>,
    /// 暦日の昇順に並んだ打卡記録
    pub checkins: Vec<CheckIn>,
    /// 無視したコメント数
    pub ignored: usize,
}

/// コメント一覧を分類する。入力の並び順には依存しない。
pub fn partition<'a>(records: &'a [Record], ctx: &TimeContext) -> Partition<'a> {
    let mut summaries: Vec<&Record> = Vec::new();
    let mut checkins = Vec::new();
    let mut ignored = 0;

    for record in records {
        match classify(&record.body) {
            RecordKind::Summary => summaries.push(record),
            RecordKind::CheckIn { is_early } => checkins.push(CheckIn {
                record_id: record.id,
                date: ctx.civil_date(&record.created_at),
                is_early,
            }),
            RecordKind::Ignored => ignored += 1,
        }
    }

    summaries.sort_by_key(|r| (r.created_at, r.id));
    checkins.sort_by_key(|c| (c.date, c.record_id));

    let mut summaries = summaries.into_iter();
    Partition {
        summary: summaries.next(),
        extra_summaries: summaries.collect(),
        checkins,
        ignored,
    }
}
