use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use getup_core::{DEFAULT_SENTENCE, EarlyWindow};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub checkin: CheckInConfig,
    #[serde(default)]
    pub quote: QuoteConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GithubConfig {
    /// コマンドライン引数か `GITHUB_TOKEN` があればそちらを優先する
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// `owner/name` 形式のリポジトリ名
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_issue_number")]
    pub issue_number: u64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_github_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            repo: String::new(),
            issue_number: default_issue_number(),
            api_base: default_api_base(),
            timeout: default_github_timeout(),
        }
    }
}

fn default_issue_number() -> u64 {
    1
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_github_timeout() -> Duration {
    Duration::from_secs(30)
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckInConfig {
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(default = "default_early_start_hour")]
    pub early_start_hour: u32,
    #[serde(default = "default_early_end_hour")]
    pub early_end_hour: u32,
    /// 早起き時間帯の外でも打卡コメントを投稿するか
    #[serde(default)]
    pub record_late: bool,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            early_start_hour: default_early_start_hour(),
            early_end_hour: default_early_end_hour(),
            record_late: false,
        }
    }
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Shanghai
}

fn default_early_start_hour() -> u32 {
    4
}

fn default_early_end_hour() -> u32 {
    20
}

impl CheckInConfig {
    pub fn early_window(&self) -> Result<EarlyWindow> {
        EarlyWindow::new(self.early_start_hour, self.early_end_hour)
            .context("Invalid [checkin] early hours")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuoteConfig {
    #[serde(default = "default_quote_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_quote_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_quote_endpoint(),
            timeout: default_quote_timeout(),
            fallback: default_fallback(),
        }
    }
}

fn default_quote_endpoint() -> String {
    "https://v1.jinrishici.com/all".to_string()
}

fn default_quote_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_fallback() -> String {
    DEFAULT_SENTENCE.to_string()
}

pub fn open_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
    let config: Config = toml::from_str(&content).context("Failed to parse configuration file")?;
    Ok(config)
}

pub fn write_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = Config {
        github: GithubConfig {
            repo: "owner/repo".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let content = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
    Ok(())
}
