//! GitHub Issues API との連携機能を提供する。

use std::time::Duration;

use async_trait::async_trait;
use getup_core::Record;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use thiserror::Error;

use crate::store::RecordStore;
use crate::version::user_agent;

/// 1 ページあたりの取得件数（API の上限）。
const PER_PAGE: usize = 100;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid repository name: {0} (expected owner/name)")]
    InvalidRepo(String),
    #[error("Invalid GitHub token")]
    InvalidToken,
}

pub type Result<T> = std::result::Result<T, GithubError>;

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// 打卡用 Issue のコメントを読み書きするクライアント。
pub struct GithubClient {
    http_client: reqwest::Client,
    /// API のベース URL（末尾のスラッシュなし）
    api_base: String,
    /// `owner/name`
    repo: String,
    issue_number: u64,
}

impl GithubClient {
    /// 新しい GithubClient を作成する。
    ///
    /// # Arguments
    /// * `token` - 個人アクセストークン
    /// * `repo` - `owner/name` 形式のリポジトリ名
    /// * `issue_number` - 打卡を記録する Issue 番号
    /// * `api_base` - API のベース URL
    /// * `timeout` - リクエストのタイムアウト
    pub fn new(
        token: &str,
        repo: &str,
        issue_number: u64,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self> {
        if !is_valid_repo(repo) {
            return Err(GithubError::InvalidRepo(repo.to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GithubError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            issue_number,
        })
    }

    fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, self.repo, self.issue_number
        )
    }

    fn comment_url(&self, comment_id: u64) -> String {
        format!(
            "{}/repos/{}/issues/comments/{}",
            self.api_base, self.repo, comment_id
        )
    }

    /// Issue のコメントをすべて取得する。
    ///
    /// 件数が PER_PAGE に満たないページが来るまでページを進める。
    pub async fn list_comments(&self) -> Result<Vec<Record>> {
        let url = self.comments_url();
        let mut comments = Vec::new();

        for page in 1.. {
            let response = self
                .http_client
                .get(&url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;
            let batch: Vec<Record> = ensure_success(response).await?.json().await?;

            tracing::debug!(page, count = batch.len(), "Fetched comment page");
            let done = batch.len() < PER_PAGE;
            comments.extend(batch);
            if done {
                break;
            }
        }

        Ok(comments)
    }

    /// コメントを作成する。
    pub async fn create_comment(&self, body: &str) -> Result<Record> {
        let response = self
            .http_client
            .post(self.comments_url())
            .json(&CommentBody { body })
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// コメント本文を置き換える。
    pub async fn update_comment(&self, comment_id: u64, body: &str) -> Result<()> {
        let response = self
            .http_client
            .patch(self.comment_url(comment_id))
            .json(&CommentBody { body })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for GithubClient {
    async fn list_records(&self) -> anyhow::Result<Vec<Record>> {
        Ok(self.list_comments().await?)
    }

    async fn create_record(&self, body: &str) -> anyhow::Result<Record> {
        Ok(self.create_comment(body).await?)
    }

    async fn update_record(&self, record_id: u64, body: &str) -> anyhow::Result<()> {
        Ok(self.update_comment(record_id, body).await?)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GithubError::Status { status, body })
}

fn is_valid_repo(repo: &str) -> bool {
    match repo.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}
