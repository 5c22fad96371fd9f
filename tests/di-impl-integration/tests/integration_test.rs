//! 依赖注入实现的集成测试

use di_abstractions::{ComponentRegistry, ComponentResolver, DiContainer};
use di_impl::DiContainerImpl;
use ioc_common::DependencyError;
use std::sync::Arc;

/// 测试组件
#[derive(Debug)]
struct Engine {
    model: String,
}

impl Engine {
    fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[derive(Debug)]
struct Car {
    engine: Arc<Engine>,
}

impl Car {
    fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

fn register_car(container: &DiContainerImpl) {
    container.register(|ctx| Ok(Car::new(ctx.resolve::<Engine>()?)));
}

#[test]
fn test_resolve_component_without_dependencies() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V6")));

    let engine = container.resolve::<Engine>()?;
    assert_eq!(engine.model, "V6");
    Ok(())
}

#[test]
fn test_resolve_twice_returns_same_instance() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V6")));

    let first = container.resolve::<Engine>()?;
    let second = container.resolve::<Engine>()?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_registered_instance_is_returned_as_is() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register_instance(Engine::new("electric"));

    let first = container.resolve::<Engine>()?;
    let second = container.resolve::<Engine>()?;
    assert_eq!(first.model, "electric");
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_car_receives_resolved_engine() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V8")));
    register_car(&container);

    let car = container.resolve::<Car>()?;
    let engine = container.resolve::<Engine>()?;
    assert!(Arc::ptr_eq(&car.engine, &engine));
    Ok(())
}

#[test]
fn test_missing_dependency_reports_not_registered() {
    let container = DiContainerImpl::new();
    register_car(&container);

    let error = container.resolve::<Car>().unwrap_err();
    match error {
        DependencyError::ComponentNotRegistered { type_name } => assert_eq!(type_name, "Engine"),
        other => panic!("期望组件未注册错误，实际: {other}"),
    }
    assert!(!container.is_resolved::<Car>());
}

#[derive(Debug)]
struct A {
    _b: Arc<B>,
}

#[derive(Debug)]
struct B {
    _a: Arc<A>,
}

#[test]
fn test_circular_dependency_is_detected() {
    let container = DiContainerImpl::new();
    container.register(|ctx| Ok(A { _b: ctx.resolve::<B>()? }));
    container.register(|ctx| Ok(B { _a: ctx.resolve::<A>()? }));

    let error = container.resolve::<A>().unwrap_err();
    match error {
        DependencyError::CircularDependency { path } => {
            assert_eq!(path, vec!["A", "B", "A"]);
        }
        other => panic!("期望循环依赖错误，实际: {other}"),
    }

    // 失败不会留下半成品
    assert!(!container.is_resolved::<A>());
    assert!(!container.is_resolved::<B>());
}

#[derive(Debug)]
struct Selfish {
    _me: Arc<Selfish>,
}

#[test]
fn test_self_dependency_is_detected() {
    let container = DiContainerImpl::new();
    container.register(|ctx| Ok(Selfish { _me: ctx.resolve::<Selfish>()? }));

    let error = container.resolve::<Selfish>().unwrap_err();
    assert_eq!(error.to_string(), "循环依赖检测到: Selfish -> Selfish");
}

#[test]
fn test_reregistering_engine_does_not_change_resolved_car() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V6")));
    register_car(&container);

    let car = container.resolve::<Car>()?;
    let original_engine = container.resolve::<Engine>()?;

    container.register(|_| Ok(Engine::new("V12")));

    // 已解析的实例保持不变
    assert_eq!(car.engine.model, "V6");
    let engine_after = container.resolve::<Engine>()?;
    assert!(Arc::ptr_eq(&engine_after, &original_engine));
    let car_again = container.resolve::<Car>()?;
    assert!(Arc::ptr_eq(&car_again, &car));
    Ok(())
}

#[test]
fn test_reregistration_before_resolution_replaces_rule() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V6")));
    container.register(|_| Ok(Engine::new("V12")));

    assert_eq!(container.resolve::<Engine>()?.model, "V12");
    assert_eq!(container.registered_components().len(), 1);
    Ok(())
}

#[test]
fn test_try_resolve_unregistered_is_none() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    assert!(container.try_resolve::<Engine>()?.is_none());

    container.register(|_| Ok(Engine::new("V6")));
    assert!(container.try_resolve::<Engine>()?.is_some());
    Ok(())
}

#[derive(Debug)]
struct Garage {
    spare: Option<Arc<Engine>>,
}

#[test]
fn test_optional_dependency() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|ctx| Ok(Garage { spare: ctx.try_resolve::<Engine>()? }));

    let garage = container.resolve::<Garage>()?;
    assert!(garage.spare.is_none());
    Ok(())
}

#[derive(Debug)]
struct Fleet {
    racing: Arc<Engine>,
    city: Arc<Engine>,
}

#[test]
fn test_named_dependencies() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register_named("racing", |_| Ok(Engine::new("V12")));
    container.register_named("city", |_| Ok(Engine::new("I3")));
    container.register(|ctx| {
        Ok(Fleet {
            racing: ctx.resolve_named::<Engine>("racing")?,
            city: ctx.resolve_named::<Engine>("city")?,
        })
    });

    let fleet = container.resolve::<Fleet>()?;
    assert_eq!(fleet.racing.model, "V12");
    assert_eq!(fleet.city.model, "I3");
    assert!(Arc::ptr_eq(&fleet.racing, &container.resolve_named::<Engine>("racing")?));
    Ok(())
}

#[test]
fn test_validate_creates_all_singletons() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V6")));
    register_car(&container);

    let created = container.validate().map_err(|errors| {
        anyhow::anyhow!("验证失败: {} 个错误", errors.len())
    })?;
    assert_eq!(created, 2);
    assert!(container.is_resolved::<Engine>());
    assert!(container.is_resolved::<Car>());
    Ok(())
}

#[tokio::test]
async fn test_shutdown_without_lifecycle_components() -> anyhow::Result<()> {
    let container = DiContainerImpl::new();
    container.register(|_| Ok(Engine::new("V6")));
    container.resolve::<Engine>()?;

    container.start().await?;
    container.shutdown().await?;
    Ok(())
}
