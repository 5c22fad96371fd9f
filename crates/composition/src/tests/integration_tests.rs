//! 应用上下文构建集成测试

use crate::{ApplicationContextBuilder, ComponentModule, ContextStatus, FnModule};
use async_trait::async_trait;
use di_abstractions::{ComponentRegistry, DiContainer};
use di_impl::DiContainerImpl;
use ioc_common::{
    ContainerConfig, DependencyError, InfrastructureError, Lifecycle, LifecycleError,
    LifecycleResult, LifecycleState,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[derive(Debug)]
struct Engine;

#[derive(Debug)]
struct Car {
    engine: Arc<Engine>,
}

fn car_module() -> impl ComponentModule {
    FnModule::new("car", |container: &DiContainerImpl| {
        container.register(|ctx| Ok(Car { engine: ctx.resolve::<Engine>()? }));
        Ok(())
    })
}

fn engine_module() -> impl ComponentModule {
    FnModule::new("engine", |container: &DiContainerImpl| {
        container.register(|_| Ok(Engine));
        Ok(())
    })
}

/// 模块按顺序应用，解析时依赖已注入
#[tokio::test]
async fn test_build_applies_modules() {
    let context = ApplicationContextBuilder::new()
        .add_module(car_module())
        .add_module(engine_module())
        .build()
        .await
        .expect("构建应该成功");

    assert_eq!(context.status(), ContextStatus::Running);

    let car = context.resolve::<Car>().unwrap();
    let engine = context.resolve::<Engine>().unwrap();
    assert!(Arc::ptr_eq(&car.engine, &engine));

    context.shutdown().await.unwrap();
}

/// 预创建模式下缺失的依赖在构建时报告
#[tokio::test]
async fn test_eager_initialization_reports_missing_dependency() {
    let result = ApplicationContextBuilder::new()
        .with_config(ContainerConfig {
            eager_initialization: true,
            ..ContainerConfig::default()
        })
        .add_module(car_module())
        .build()
        .await;

    match result {
        Err(InfrastructureError::ValidationFailed { errors }) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(
                &errors[0],
                DependencyError::ComponentNotRegistered { type_name } if type_name == "Engine"
            ));
        }
        other => panic!("期望验证失败，实际: {:?}", other.map(|_| ())),
    }
}

/// 延迟模式下缺失的依赖在解析时才报告
#[tokio::test]
async fn test_lazy_initialization_defers_errors() {
    let context = ApplicationContextBuilder::new()
        .add_module(car_module())
        .build()
        .await
        .unwrap();

    assert!(context.resolve::<Car>().is_err());
    assert_eq!(context.stats().resolution_errors, 1);
}

/// 配置文件和环境变量叠加
#[tokio::test]
async fn test_config_file_and_env_layering() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "max_resolution_depth = 4\neager_initialization = true").unwrap();

    let mut env = HashMap::new();
    env.insert("APP_MAX_RESOLUTION_DEPTH".to_string(), "12".to_string());

    let context = ApplicationContextBuilder::new()
        .with_config_file(file.path())
        .with_env_prefix("APP")
        .with_env_source(env)
        .add_module(engine_module())
        .build()
        .await
        .unwrap();

    let config = context.container().config();
    assert_eq!(config.max_resolution_depth, 12);
    assert!(config.eager_initialization);
    // 预创建后 Engine 已在缓存中
    assert!(context.container().is_resolved::<Engine>());
}

/// 缺失的配置文件导致构建失败
#[tokio::test]
async fn test_missing_config_file_fails_build() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().with_extension("missing.toml");

    let result = ApplicationContextBuilder::new()
        .with_config_file(&path)
        .build()
        .await;

    assert!(matches!(result, Err(InfrastructureError::ConfigError { .. })));
}

#[derive(Debug)]
struct Database {
    events: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Lifecycle for Database {
    async fn on_start(&self) -> LifecycleResult<()> {
        self.events.lock().push("database started");
        Ok(())
    }

    async fn on_stop(&self) -> LifecycleResult<()> {
        self.events.lock().push("database stopped");
        Ok(())
    }
}

/// 预创建的单例在构建时启动，关闭时停止
#[tokio::test]
async fn test_lifecycle_hooks_run_on_build_and_shutdown() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let module_events = events.clone();

    let context = ApplicationContextBuilder::new()
        .with_config(ContainerConfig {
            eager_initialization: true,
            ..ContainerConfig::default()
        })
        .add_module(FnModule::new("database", move |container: &DiContainerImpl| {
            let events = module_events.clone();
            container.register_with_lifecycle(move |_| {
                Ok(Database {
                    events: events.clone(),
                })
            });
            Ok(())
        }))
        .build()
        .await
        .unwrap();

    assert_eq!(context.container().lifecycle_state(), LifecycleState::Running);
    assert_eq!(*events.lock(), vec!["database started"]);

    context.shutdown().await.unwrap();
    assert_eq!(*events.lock(), vec!["database started", "database stopped"]);
}

#[derive(Debug)]
struct Migrator {
    _database: Arc<Database>,
}

#[async_trait]
impl Lifecycle for Migrator {
    async fn on_start(&self) -> LifecycleResult<()> {
        Err(LifecycleError::StartFailed {
            component: "Migrator".to_string(),
            message: "迁移失败".to_string(),
        })
    }
}

/// 启动失败时已启动的组件会被停止
#[tokio::test]
async fn test_start_failure_stops_started_components() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let module_events = events.clone();

    let result = ApplicationContextBuilder::new()
        .add_module(FnModule::new("storage", move |container: &DiContainerImpl| {
            let events = module_events.clone();
            container.register_with_lifecycle(move |_| {
                Ok(Database {
                    events: events.clone(),
                })
            });
            container.register_with_lifecycle(|ctx| {
                Ok(Migrator {
                    _database: ctx.resolve::<Database>()?,
                })
            });
            Ok(())
        }))
        .build()
        .await;

    assert!(matches!(result, Err(InfrastructureError::LifecycleError { .. })));
    assert_eq!(*events.lock(), vec!["database started", "database stopped"]);
}

/// 可选组件通过 try_resolve 获取
#[tokio::test]
async fn test_try_resolve_through_context() {
    let context = ApplicationContextBuilder::new()
        .add_module(engine_module())
        .build()
        .await
        .unwrap();

    assert!(context.try_resolve::<Engine>().unwrap().is_some());
    assert!(context.try_resolve::<Car>().unwrap().is_none());
    context.shutdown().await.unwrap();
}

/// 模块返回的错误会中止构建
#[tokio::test]
async fn test_module_error_aborts_build() {
    let result = ApplicationContextBuilder::new()
        .add_module(FnModule::new("broken", |_: &DiContainerImpl| {
            Err(InfrastructureError::BootstrapFailed {
                message: "模块配置失败".to_string(),
            })
        }))
        .build()
        .await;

    assert!(matches!(result, Err(InfrastructureError::BootstrapFailed { .. })));
}
