use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 表单 TOML 文件存放目录
    pub fixtures_folder: String,
    /// 发布后的表单快照输出目录
    pub form_document_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixtures_folder: "fixtures".to_string(),
            form_document_dir: "form_documents".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取，未设置的项使用默认值
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取，未填写的项使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        toml::from_str(&content).map_err(|source| {
            FileError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            fixtures_folder: lookup("FIXTURES_FOLDER").unwrap_or(default.fixtures_folder),
            form_document_dir: lookup("FORM_DOCUMENT_DIR").unwrap_or(default.form_document_dir),
            verbose_logging: match lookup("VERBOSE_LOGGING") {
                Some(value) => parse_bool("VERBOSE_LOGGING", &value)?,
                None => default.verbose_logging,
            },
        })
    }
}

fn parse_bool(var_name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: "bool",
        }),
    }
}
