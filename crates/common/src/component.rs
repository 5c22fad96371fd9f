//! 组件描述符定义

use crate::lifecycle::Lifetime;
use crate::metadata::ComponentKey;

/// 组件描述符
///
/// 描述一条注册信息，不包含构造规则本身
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 组件键
    pub key: ComponentKey,
    /// 组件生命周期
    pub lifetime: Lifetime,
    /// 组件优先级，数值越高优先级越高
    pub priority: i32,
    /// 是否带生命周期钩子
    pub has_lifecycle: bool,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符
    pub fn new(key: ComponentKey, lifetime: Lifetime) -> Self {
        Self {
            key,
            lifetime,
            priority: 0,
            has_lifecycle: false,
        }
    }

    /// 组件名称
    pub fn name(&self) -> String {
        self.key.display_name()
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 标记带生命周期钩子
    pub fn with_lifecycle(mut self) -> Self {
        self.has_lifecycle = true;
        self
    }
}
