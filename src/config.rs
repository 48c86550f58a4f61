use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "eduagent.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 根地址（包含 `/api` 前缀）
    pub api_base_url: String,
    /// 单次请求超时（秒），只由传输层执行
    pub request_timeout_secs: u64,
    /// 成绩报告输出目录
    pub report_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 本次运行的输入 ---
    /// 试卷文件，未设置时使用内置示例试卷
    pub paper_file: Option<String>,
    /// 答题照片
    pub answer_files: Vec<String>,
    /// 手动输入的答案文本
    pub answer_text: Option<String>,
    /// 学习目标
    pub learn_goal: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 300,
            report_dir: "reports".to_string(),
            verbose_logging: false,
            paper_file: None,
            answer_files: Vec::new(),
            answer_text: None,
            learn_goal: None,
        }
    }
}

impl Config {
    /// 默认配置 + 配置文件 + 环境变量
    ///
    /// 配置文件路径取 `EDUAGENT_CONFIG`，否则为当前目录下的 `eduagent.toml`，不存在时跳过。
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("EDUAGENT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            Self::from_toml_file(&path)?
        } else {
            debug!("未找到配置文件 {}，使用默认配置", path.display());
            Self::default()
        };

        Ok(base.with_env())
    }

    /// 仅使用默认配置 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖已有配置，解析失败的值保持原样
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: var("EDUAGENT_API_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            report_dir: var("REPORT_DIR").unwrap_or(self.report_dir),
            verbose_logging: var("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            paper_file: var("PAPER_FILE").or(self.paper_file),
            answer_files: var("ANSWER_FILES")
                .map(|v| split_list(&v))
                .unwrap_or(self.answer_files),
            answer_text: var("ANSWER_TEXT").or(self.answer_text),
            learn_goal: var("LEARN_GOAL").or(self.learn_goal),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_toml_overrides_only_given_fields() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "http://exam.local/api"
            answer_files = ["p1.jpg", "p2.jpg"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://exam.local/api");
        assert_eq!(config.answer_files, vec!["p1.jpg", "p2.jpg"]);
        assert_eq!(config.request_timeout_secs, 300);
        assert!(config.paper_file.is_none());
    }

    #[test]
    fn test_env_overlay_and_bad_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("REQUEST_TIMEOUT_SECS", "not-a-number"),
            ("VERBOSE_LOGGING", "true"),
            ("ANSWER_FILES", "a.jpg, ,b.png"),
            ("LEARN_GOAL", "Operating Systems"),
        ]);
        let config = Config::default().with_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.request_timeout_secs, 300);
        assert!(config.verbose_logging);
        assert_eq!(config.answer_files, vec!["a.jpg", "b.png"]);
        assert_eq!(config.learn_goal.as_deref(), Some("Operating Systems"));
    }
}
