//! # Car/Engine 示例
//!
//! 演示如何用显式注册装配对象图：`Engine` 没有依赖，`Car` 依赖 `Engine`

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use di_abstractions::ComponentRegistry;
use di_impl::DiContainerImpl;
use ioc_common::{DependencyError, InfrastructureError, Lifecycle, LifecycleResult};
use ioc_composition::{ApplicationContextBuilder, FnModule, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "car-engine-demo")]
#[command(about = "Lorn IoC Car/Engine 示例")]
struct Args {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 演示场景
    #[arg(long, value_enum, default_value_t = Scenario::Wired)]
    scenario: Scenario,

    /// 日志格式
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

/// 演示场景
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// 正常装配 Car 和 Engine
    Wired,
    /// 不注册 Engine
    MissingEngine,
    /// Engine 反过来依赖 Car
    Cycle,
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug)]
struct Engine {
    cylinders: u8,
}

#[async_trait]
impl Lifecycle for Engine {
    async fn on_start(&self) -> LifecycleResult<()> {
        info!(cylinders = self.cylinders, "发动机启动");
        Ok(())
    }

    async fn on_stop(&self) -> LifecycleResult<()> {
        info!("发动机熄火");
        Ok(())
    }
}

#[derive(Debug)]
struct Car {
    engine: Arc<Engine>,
}

impl Car {
    fn drive(&self) {
        info!(cylinders = self.engine.cylinders, "汽车行驶中");
    }
}

fn register_components(container: &DiContainerImpl, scenario: Scenario) {
    match scenario {
        Scenario::Wired => {
            container.register_with_lifecycle(|_| Ok(Engine { cylinders: 6 }));
        }
        Scenario::MissingEngine => {}
        Scenario::Cycle => {
            // 循环在首次解析 Car 时才暴露
            container.register(|ctx| {
                ctx.resolve::<Car>()?;
                Ok(Engine { cylinders: 6 })
            });
        }
    }
    container.register(|ctx| Ok(Car { engine: ctx.resolve::<Engine>()? }));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = match args.log_format {
        LogFormat::Pretty => LoggingConfig::default(),
        LogFormat::Json => LoggingConfig::production(),
    };

    let scenario = args.scenario;
    let mut builder = ApplicationContextBuilder::new()
        .with_logging(logging)
        .with_env_prefix("IOC")
        .add_module(FnModule::new("garage", move |container: &DiContainerImpl| {
            register_components(container, scenario);
            Ok(())
        }));

    if let Some(path) = &args.config {
        builder = builder.with_config_file(path);
    }

    let context = match builder.build().await {
        Ok(context) => context,
        Err(InfrastructureError::ValidationFailed { errors }) => {
            for e in &errors {
                error!("组件创建失败: {}", e);
            }
            anyhow::bail!("容器验证失败，共 {} 个错误", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    match context.resolve::<Car>() {
        Ok(car) => car.drive(),
        Err(e @ DependencyError::ComponentNotRegistered { .. }) => {
            error!("缺少组件: {}", e.type_name());
        }
        Err(e @ DependencyError::CircularDependency { .. }) => {
            error!("{}", e);
        }
        Err(e) => return Err(e.into()),
    }

    let stats = context.stats();
    info!(
        registered = stats.registered_components,
        singletons = stats.active_singletons,
        errors = stats.resolution_errors,
        "容器统计"
    );

    context.shutdown().await?;
    Ok(())
}
