//! 打卡コメントを保持する外部ストアの抽象。

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use getup_core::Record;
use tracing::info;

/// 1 つの Issue スレッドのコメントを読み書きするストア。
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// すべてのコメントを取得する。並び順は保証しない。
    async fn list_records(&self) -> Result<Vec<Record>>;

    /// コメントを新規作成し、作成されたコメントを返す。
    async fn create_record(&self, body: &str) -> Result<Record>;

    /// コメント本文を置き換える。
    async fn update_record(&self, record_id: u64, body: &str) -> Result<()>;
}

/// 読み取りだけ実ストアに委譲し、書き込みは標準出力に出して捨てるストア。
pub struct DryRunStore<S> {
    inner: S,
    /// 作成扱いにしたコメントの作成日時
    now: DateTime<Utc>,
}

impl<S> DryRunStore<S> {
    pub fn new(inner: S, now: DateTime<Utc>) -> Self {
        Self { inner, now }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for DryRunStore<S> {
    async fn list_records(&self) -> Result<Vec<Record>> {
        self.inner.list_records().await
    }

    async fn create_record(&self, body: &str) -> Result<Record> {
        info!("Dry run: skipping comment creation");
        println!("--- create comment ---\n{body}\n");
        Ok(Record {
            id: 0,
            created_at: self.now,
            body: body.to_string(),
        })
    }

    async fn update_record(&self, record_id: u64, body: &str) -> Result<()> {
        info!(record_id, "Dry run: skipping comment update");
        println!("--- update comment {record_id} ---\n{body}\n");
        Ok(())
    }
}
