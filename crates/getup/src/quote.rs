//! 今日の一句（古詩）の取得機能を提供する。

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::QuoteConfig;
use crate::version::user_agent;

/// 打卡コメントに添える一句を返すプロバイダ。失敗しても必ず何かを返す。
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn get_quote(&self) -> String;
}

#[derive(Deserialize)]
struct QuoteResponse {
    content: Option<String>,
}

/// 今日詩詞 API から一句を取得するクライアント。
pub struct QuoteFetcher {
    http_client: reqwest::Client,
    endpoint: String,
    /// 取得に失敗したときに返す一句
    fallback: String,
}

impl QuoteFetcher {
    /// 新しい QuoteFetcher を作成する。
    pub fn new(config: &QuoteConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .context("Failed to create HTTP client for quote fetcher")?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            fallback: config.fallback.clone(),
        })
    }

    /// 一句を取得する。
    ///
    /// 取得に失敗した場合は固定の一句を返す（エラーはログに記録）。
    pub async fn fetch(&self) -> String {
        match self.fetch_inner().await {
            Ok(sentence) => sentence,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Failed to fetch quote, using fallback");
                self.fallback.clone()
            }
        }
    }

    async fn fetch_inner(&self) -> Result<String> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await
            .context("HTTP request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP status: {}", response.status());
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .context("Failed to parse quote response")?;

        quote
            .content
            .filter(|c| !c.trim().is_empty())
            .context("Quote response has no content")
    }
}

#[async_trait]
impl QuoteProvider for QuoteFetcher {
    async fn get_quote(&self) -> String {
        self.fetch().await
    }
}
