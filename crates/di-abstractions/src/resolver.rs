//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use ioc_common::{ComponentKey, DependencyError, DependencyResult};
use std::any::Any;
use std::sync::Arc;
use tracing::trace;

/// 容器中共享的组件实例
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例
pub trait ComponentResolver: Send + Sync {
    /// 在给定上下文中解析组件
    ///
    /// 实现需要在调用工厂前把 `key` 压入上下文的解析链，返回前弹出
    fn resolve_key(
        &self,
        key: &ComponentKey,
        context: &mut ResolveContext<'_>,
    ) -> DependencyResult<SharedInstance>;

    /// 检查是否可以解析指定的组件键
    fn can_resolve(&self, key: &ComponentKey) -> bool;

    /// 新解析上下文使用的选项
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::default()
    }

    /// 解析指定类型的组件
    fn resolve<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        ResolveContext::new(self, self.resolve_options()).resolve::<T>()
    }

    /// 解析指定限定名的组件
    fn resolve_named<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        ResolveContext::new(self, self.resolve_options()).resolve_named::<T>(name)
    }

    /// 尝试解析组件，未注册时返回 `None`
    fn try_resolve<T>(&self) -> DependencyResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        ResolveContext::new(self, self.resolve_options()).try_resolve::<T>()
    }
}

/// 解析上下文
///
/// 每次顶层解析创建一个，工厂通过它解析自己的依赖
pub struct ResolveContext<'a> {
    resolver: &'a dyn ComponentResolver,
    /// 当前解析链，用于检测循环依赖
    resolution_chain: Vec<ComponentKey>,
    /// 解析选项
    options: ResolveOptions,
}

impl<'a> ResolveContext<'a> {
    /// 创建新的解析上下文
    pub fn new(resolver: &'a dyn ComponentResolver, options: ResolveOptions) -> Self {
        Self {
            resolver,
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加组件键到解析链
    pub fn push_key(&mut self, key: &ComponentKey) -> DependencyResult<()> {
        if self.resolution_chain.contains(key) {
            let mut path: Vec<String> = self
                .resolution_chain
                .iter()
                .skip_while(|k| *k != key)
                .map(ComponentKey::display_name)
                .collect();
            path.push(key.display_name());
            return Err(DependencyError::CircularDependency { path });
        }

        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::DependencyResolutionFailed {
                type_name: key.display_name(),
                message: format!("超过最大解析深度 {}", self.options.max_depth),
            });
        }

        trace!(component = %key, depth = self.resolution_chain.len(), "进入解析链");
        self.resolution_chain.push(key.clone());
        Ok(())
    }

    /// 从解析链中移除最后一个组件键
    pub fn pop_key(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析链
    pub fn resolution_chain(&self) -> &[ComponentKey] {
        &self.resolution_chain
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 解析选项
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// 解析指定类型的依赖
    pub fn resolve<T>(&mut self) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.resolve_key_as(&ComponentKey::of::<T>())
    }

    /// 解析指定限定名的依赖
    pub fn resolve_named<T>(&mut self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.resolve_key_as(&ComponentKey::named::<T>(name))
    }

    /// 尝试解析可选依赖，未注册时返回 `None`
    pub fn try_resolve<T>(&mut self) -> DependencyResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        let key = ComponentKey::of::<T>();
        if !self.resolver.can_resolve(&key) {
            return Ok(None);
        }
        self.resolve_key_as(&key).map(Some)
    }

    fn resolve_key_as<T>(&mut self, key: &ComponentKey) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let resolver = self.resolver;
        let instance = resolver.resolve_key(key, self)?;
        downcast_instance(key, instance)
    }
}

/// 把共享实例转换为具体类型
pub fn downcast_instance<T>(key: &ComponentKey, instance: SharedInstance) -> DependencyResult<Arc<T>>
where
    T: Send + Sync + 'static,
{
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::DependencyResolutionFailed {
            type_name: key.display_name(),
            message: format!("类型转换失败，期望 {}", std::any::type_name::<T>()),
        })
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}
