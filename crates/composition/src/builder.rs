//! 应用上下文构建器

use crate::context::ApplicationContext;
use crate::module::ComponentModule;
use di_abstractions::DiContainer;
use di_impl::DiContainerImpl;
use ioc_common::{ContainerConfig, ContainerConfigLoader, InfrastructureError};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// 应用上下文构建器
///
/// 使用建造者模式构建完整的应用上下文
pub struct ApplicationContextBuilder {
    /// 显式指定的容器配置，优先于配置加载器
    config: Option<ContainerConfig>,
    /// 配置加载器
    config_loader: ContainerConfigLoader,
    /// 组件模块列表
    modules: Vec<Box<dyn ComponentModule>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ApplicationContextBuilder {
    /// 创建新的应用上下文构建器
    pub fn new() -> Self {
        Self {
            config: None,
            config_loader: ContainerConfigLoader::new(),
            modules: Vec::new(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 直接指定容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 添加 TOML 配置文件
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        info!("添加 TOML 配置文件: {}", path.as_ref().display());
        self.config_loader = self.config_loader.with_file(path);
        self
    }

    /// 添加环境变量配置源
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_loader = self.config_loader.with_env_prefix(prefix);
        self
    }

    /// 用给定的键值表代替进程环境变量
    pub fn with_env_source(mut self, source: HashMap<String, String>) -> Self {
        self.config_loader = self.config_loader.with_env_source(source);
        self
    }

    /// 添加组件模块
    pub fn add_module<M: ComponentModule + 'static>(mut self, module: M) -> Self {
        debug!("添加组件模块: {}", module.name());
        self.modules.push(Box::new(module));
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建应用上下文
    pub async fn build(self) -> Result<ApplicationContext, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始构建应用上下文");

        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => self.config_loader.load()?,
        };
        debug!(?config, "容器配置");

        let container = DiContainerImpl::with_config(config.clone());

        for module in &self.modules {
            info!("应用组件模块: {}", module.name());
            module.configure(&container)?;
        }

        if config.eager_initialization {
            info!("预创建单例组件");
            container
                .validate()
                .map_err(|errors| InfrastructureError::ValidationFailed { errors })?;
        }

        container.start().await?;

        let context = ApplicationContext::new(container);
        info!(modules = self.modules.len(), "应用上下文构建完成");
        Ok(context)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        let result = if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        };
        result.map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ApplicationContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContextBuilder")
            .field("config", &self.config)
            .field("config_loader", &self.config_loader)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("logging_enabled", &self.logging_enabled)
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
