use crate::adapters::http::DEFAULT_TIMEOUT;
use crate::core::templates::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
use crate::domain::model::{ClaimValue, ContextData};
use crate::utils::error::{PcaError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub client: ClientConfig,
    pub context: Option<ContextConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// 覆寫內建查詢模板的目錄
    pub templates_dir: Option<String>,
    pub bearer_token: Option<String>,
    pub headers: Option<HashMap<String, String>>,
}

/// 每個內容請求都會附加的全域 claims
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub claims: Vec<ClaimValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PcaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PcaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CD_TOKEN})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.client.endpoint {
            crate::utils::validation::validate_url("client.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.client.timeout_seconds {
            crate::utils::validation::validate_range("client.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(dir) = &self.client.templates_dir {
            crate::utils::validation::validate_path("client.templates_dir", dir)?;
        }

        if let Some(token) = &self.client.bearer_token {
            crate::utils::validation::validate_non_empty_string("client.bearer_token", token)?;
        }

        if let Some(context) = &self.context {
            for (index, claim) in context.claims.iter().enumerate() {
                crate::utils::validation::validate_non_empty_string(
                    &format!("context.claims[{}].uri", index),
                    &claim.uri,
                )?;
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(PcaError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Unsupported level. Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    /// 取得 GraphQL 端點
    pub fn endpoint(&self) -> Result<&str> {
        crate::utils::validation::validate_required_field("client.endpoint", &self.client.endpoint)
            .map(String::as_str)
    }

    pub fn timeout(&self) -> Duration {
        self.client
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn global_context_data(&self) -> ContextData {
        self.context
            .as_ref()
            .map(|c| ContextData::from(c.claims.clone()))
            .unwrap_or_default()
    }

    /// 有設定 templates_dir 時優先讀取該目錄
    pub fn template_source(&self) -> Arc<dyn TemplateSource> {
        match &self.client.templates_dir {
            Some(dir) => Arc::new(DirectoryTemplates::new(dir)),
            None => Arc::new(EmbeddedTemplates),
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    /// 日誌 filter：`[logging] level` 為主，`verbose` 至少開到 debug
    pub fn log_directive(&self, verbose: bool) -> String {
        crate::utils::logger::filter_directive(verbose, self.log_level())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
