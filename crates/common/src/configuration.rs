//! 容器配置
//!
//! 配置按以下顺序叠加，后者覆盖前者：
//! 默认值 -> TOML 文件/字符串 -> 环境变量

use crate::errors::{ConfigError, ConfigResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "IOC";

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 构建时是否立即创建所有单例
    pub eager_initialization: bool,
    /// 覆盖已解析组件的注册时是否输出警告
    pub warn_on_override: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
            eager_initialization: false,
            warn_on_override: true,
        }
    }
}

impl ContainerConfig {
    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        ContainerConfigLoader::new().with_toml_str(content).load()
    }
}

/// 容器配置加载器
#[derive(Debug, Default, Clone)]
pub struct ContainerConfigLoader {
    file: Option<PathBuf>,
    toml: Option<String>,
    env_prefix: Option<String>,
    env_source: Option<HashMap<String, String>>,
}

impl ContainerConfigLoader {
    /// 创建新的加载器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加 TOML 配置文件
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// 添加 TOML 配置字符串
    pub fn with_toml_str(mut self, content: impl Into<String>) -> Self {
        self.toml = Some(content.into());
        self
    }

    /// 从带前缀的环境变量读取覆盖值，如 `IOC_MAX_RESOLUTION_DEPTH`
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 用给定的键值表代替进程环境变量
    pub fn with_env_source(mut self, source: HashMap<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    /// 加载并校验配置
    pub fn load(self) -> ConfigResult<ContainerConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&ContainerConfig::default())?);

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载 TOML 配置文件: {}", path.display());
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        if let Some(content) = &self.toml {
            builder = builder.add_source(File::from_str(content, FileFormat::Toml));
        }

        if self.env_prefix.is_some() || self.env_source.is_some() {
            let prefix = self.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
            debug!("读取环境变量配置，前缀: {}", prefix);
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .try_parsing(true)
                    .source(self.env_source),
            );
        }

        let config: ContainerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
