//! 组件注册表抽象接口

use crate::factory::{
    factory_fn, lifecycle_factory_fn, ConstructionRule, CreatedComponent,
};
use crate::resolver::ResolveContext;
use ioc_common::{ComponentDescriptor, ComponentKey, DependencyResult, Lifecycle, Lifetime};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 同一组件键只保留一条注册，后注册的覆盖先注册的
pub trait ComponentRegistry: Send + Sync {
    /// 写入一条注册信息
    fn add_registration(&self, registration: ComponentRegistration);

    /// 检查组件键是否已注册
    fn is_registered_key(&self, key: &ComponentKey) -> bool;

    /// 获取所有已注册的组件描述符
    fn registered_components(&self) -> Vec<ComponentDescriptor>;

    /// 注册单例工厂
    fn register<T, F>(&self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
        Self: Sized,
    {
        self.add_registration(ComponentRegistration::factory::<T, F>(
            ComponentKey::of::<T>(),
            Lifetime::Singleton,
            factory,
        ));
    }

    /// 注册带限定名的单例工厂
    fn register_named<T, F>(&self, name: &str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
        Self: Sized,
    {
        self.add_registration(ComponentRegistration::factory::<T, F>(
            ComponentKey::named::<T>(name),
            Lifetime::Singleton,
            factory,
        ));
    }

    /// 注册瞬时工厂
    fn register_transient<T, F>(&self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
        Self: Sized,
    {
        self.add_registration(ComponentRegistration::factory::<T, F>(
            ComponentKey::of::<T>(),
            Lifetime::Transient,
            factory,
        ));
    }

    /// 注册带生命周期钩子的单例工厂
    fn register_with_lifecycle<T, F>(&self, factory: F)
    where
        T: Lifecycle + Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
        Self: Sized,
    {
        let key = ComponentKey::of::<T>();
        self.add_registration(ComponentRegistration {
            descriptor: ComponentDescriptor::new(key, Lifetime::Singleton).with_lifecycle(),
            rule: ConstructionRule::Factory(lifecycle_factory_fn(factory)),
        });
    }

    /// 注册组件实例
    fn register_instance<T>(&self, instance: T)
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        self.add_registration(ComponentRegistration {
            descriptor: ComponentDescriptor::new(ComponentKey::of::<T>(), Lifetime::Singleton),
            rule: ConstructionRule::Instance(CreatedComponent::plain(Arc::new(instance))),
        });
    }

    /// 检查组件是否已注册
    fn is_registered<T>(&self) -> bool
    where
        T: 'static,
        Self: Sized,
    {
        self.is_registered_key(&ComponentKey::of::<T>())
    }
}

/// 组件注册信息
#[derive(Debug, Clone)]
pub struct ComponentRegistration {
    /// 组件描述符
    pub descriptor: ComponentDescriptor,
    /// 构造规则
    pub rule: ConstructionRule,
}

impl ComponentRegistration {
    /// 由工厂创建注册信息
    pub fn factory<T, F>(key: ComponentKey, lifetime: Lifetime, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> DependencyResult<T> + Send + Sync + 'static,
    {
        Self {
            descriptor: ComponentDescriptor::new(key, lifetime),
            rule: ConstructionRule::Factory(factory_fn(factory)),
        }
    }

    /// 组件键
    pub fn key(&self) -> &ComponentKey {
        &self.descriptor.key
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.descriptor.lifetime
    }
}
