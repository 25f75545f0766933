use crate::core::ranker::DedupPolicy;
use crate::utils::error::{GazetteerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub data: DataConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory the reducers read from and write to.
    pub data_dir: Option<String>,
    pub zips: Option<String>,
    pub reject_duplicate_zips: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub top_n: Option<usize>,
    /// "city_state" or "city"
    pub dedup: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// "compact" or "json"
    pub format: Option<String>,
}

const DEDUP_VALUES: [&str; 2] = ["city_state", "city"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| GazetteerError::ConfigError {
                message: format!("Cannot read config file '{}': {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GazetteerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ZIP_DATA})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GazetteerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn dedup_policy(&self) -> Option<DedupPolicy> {
        match self.query.dedup.as_deref() {
            Some("city") => Some(DedupPolicy::CityName),
            Some("city_state") => Some(DedupPolicy::CityAndState),
            _ => None,
        }
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(zips) = &self.data.zips {
            validation::validate_path("data.zips", zips)?;
            validation::validate_file_extension("data.zips", zips, &["csv", "json"])?;
        }

        if let Some(data_dir) = &self.data.data_dir {
            validation::validate_path("data.data_dir", data_dir)?;
        }

        if let Some(top_n) = self.query.top_n {
            validation::validate_positive_number("query.top_n", top_n, 1)?;
        }

        if let Some(dedup) = &self.query.dedup {
            validation::validate_one_of("query.dedup", dedup, &DEDUP_VALUES)?;
        }

        if let Some(format) = &self.logging.format {
            validation::validate_one_of("logging.format", format, &LOG_FORMATS)?;
        }

        Ok(())
    }
}
