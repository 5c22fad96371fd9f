//! 组件工厂抽象接口
//!
//! 提供组件实例创建的工厂模式支持

use crate::resolver::{ResolveContext, SharedInstance};
use ioc_common::{DependencyResult, Lifecycle};
use std::sync::Arc;

/// 工厂创建出的组件
#[derive(Clone)]
pub struct CreatedComponent {
    /// 组件实例
    pub instance: SharedInstance,
    /// 同一实例的生命周期钩子视图
    pub lifecycle: Option<Arc<dyn Lifecycle>>,
}

impl CreatedComponent {
    /// 包装不带生命周期钩子的实例
    pub fn plain<T>(instance: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            instance,
            lifecycle: None,
        }
    }

    /// 包装带生命周期钩子的实例
    pub fn with_lifecycle<T>(instance: Arc<T>) -> Self
    where
        T: Lifecycle + Send + Sync + 'static,
    {
        let lifecycle: Arc<dyn Lifecycle> = instance.clone();
        Self {
            instance,
            lifecycle: Some(lifecycle),
        }
    }
}

impl std::fmt::Debug for CreatedComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedComponent")
            .field("instance", &"<instance>")
            .field("has_lifecycle", &self.lifecycle.is_some())
            .finish()
    }
}

/// 组件工厂函数类型
///
/// 工厂通过上下文解析自己的依赖
pub type ComponentFactoryFn =
    Arc<dyn Fn(&mut ResolveContext<'_>) -> DependencyResult<CreatedComponent> + Send + Sync>;

/// 组件构造规则
#[derive(Clone)]
pub enum ConstructionRule {
    /// 预先构造好的实例
    Instance(CreatedComponent),
    /// 首次解析时调用的工厂
    Factory(ComponentFactoryFn),
}

impl ConstructionRule {
    /// 执行构造规则
    pub fn create(&self, context: &mut ResolveContext<'_>) -> DependencyResult<CreatedComponent> {
        match self {
            Self::Instance(component) => Ok(component.clone()),
            Self::Factory(factory) => factory(context),
        }
    }
}

impl std::fmt::Debug for ConstructionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(component) => f.debug_tuple("Instance").field(component).finish(),
            Self::Factory(_) => f.write_str("Factory(<function>)"),
        }
    }
}

/// 包装返回具体类型的工厂
pub fn factory_fn<T, F>(factory: F) -> ComponentFactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
{
    Arc::new(move |context: &mut ResolveContext<'_>| {
        factory(context).map(|value| CreatedComponent::plain(Arc::new(value)))
    })
}

/// 包装返回带生命周期钩子类型的工厂
pub fn lifecycle_factory_fn<T, F>(factory: F) -> ComponentFactoryFn
where
    T: Lifecycle + Send + Sync + 'static,
    F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
{
    Arc::new(move |context: &mut ResolveContext<'_>| {
        factory(context).map(|value| CreatedComponent::with_lifecycle(Arc::new(value)))
    })
}
