//! 组件模块
//!
//! 模块是一组显式注册，构建应用上下文时按添加顺序依次应用

use di_impl::DiContainerImpl;
use ioc_common::InfrastructureError;

/// 组件模块 trait
pub trait ComponentModule: Send + Sync {
    /// 模块名称
    fn name(&self) -> &str;

    /// 向容器写入注册
    fn configure(&self, container: &DiContainerImpl) -> Result<(), InfrastructureError>;
}

/// 由闭包实现的组件模块
pub struct FnModule<F>
where
    F: Fn(&DiContainerImpl) -> Result<(), InfrastructureError> + Send + Sync,
{
    name: String,
    configure: F,
}

impl<F> FnModule<F>
where
    F: Fn(&DiContainerImpl) -> Result<(), InfrastructureError> + Send + Sync,
{
    /// 创建闭包模块
    pub fn new(name: impl Into<String>, configure: F) -> Self {
        Self {
            name: name.into(),
            configure,
        }
    }
}

impl<F> ComponentModule for FnModule<F>
where
    F: Fn(&DiContainerImpl) -> Result<(), InfrastructureError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&self, container: &DiContainerImpl) -> Result<(), InfrastructureError> {
        (self.configure)(container)
    }
}

impl<F> std::fmt::Debug for FnModule<F>
where
    F: Fn(&DiContainerImpl) -> Result<(), InfrastructureError> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnModule").field("name", &self.name).finish()
    }
}
