mod checkin;
mod config;
mod github;
mod quote;
mod store;
mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Parser;
use getup_core::TimeContext;
use tracing::info;

use crate::{
    checkin::{CheckInOptions, run},
    config::{Config, DEFAULT_CONFIG_PATH, open_config, write_default_config},
    github::GithubClient,
    quote::QuoteFetcher,
    store::{DryRunStore, RecordStore},
    version::short_version,
};

#[derive(Parser)]
#[command(version = short_version())]
struct Args {
    /// GitHub のアクセストークン
    #[arg(env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// `owner/name` 形式のリポジトリ名（設定ファイルより優先）
    #[arg(env = "GITHUB_REPOSITORY")]
    repo_name: Option<String>,

    /// 打卡コメントの先頭に付ける天気
    #[arg(long)]
    weather_message: Option<String>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    init: bool,

    /// コメントを書き込まずに本文を表示する
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if args.init {
        let path = args
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        write_default_config(&path)?;
        info!(path = ?path, "Created default configuration");
        return Ok(());
    }

    tracing::info!(version = short_version(), "getup version");

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let token = args
        .github_token
        .or_else(|| config.github.token.clone())
        .filter(|t| !t.is_empty())
        .context("GitHub token is not set (pass it as an argument or via GITHUB_TOKEN)")?;
    let repo = args
        .repo_name
        .unwrap_or_else(|| config.github.repo.clone());
    anyhow::ensure!(!repo.is_empty(), "Repository is not set (pass owner/name or set github.repo)");

    let window = config.checkin.early_window()?;
    let ctx = TimeContext::now(config.checkin.timezone);
    info!(
        repo = %repo,
        issue = config.github.issue_number,
        timezone = %config.checkin.timezone,
        now = %ctx.now_local(),
        "Configuration loaded"
    );

    let github = GithubClient::new(
        &token,
        &repo,
        config.github.issue_number,
        &config.github.api_base,
        config.github.timeout,
    )
    .context("Failed to create GitHub client")?;
    let quotes = QuoteFetcher::new(&config.quote)?;

    let store: Box<dyn RecordStore> = if args.dry_run {
        Box::new(DryRunStore::new(github, Utc::now()))
    } else {
        Box::new(github)
    };

    let options = CheckInOptions {
        weather: args.weather_message.as_deref(),
        window,
        record_late: config.checkin.record_late,
    };

    let report = run(store.as_ref(), &quotes, &ctx, &options).await?;
    info!(
        check_in = %report.check_in,
        summary = %report.summary,
        consecutive = report.stats.consecutive,
        early_rate = report.stats.early_rate(),
        "Run finished"
    );

    Ok(())
}

/// 設定ファイルを読み込む。
///
/// パスの指定がなく `config.toml` もなければ既定値を使う。
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => open_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => open_config(DEFAULT_CONFIG_PATH),
        None => Ok(Config::default()),
    }
}
