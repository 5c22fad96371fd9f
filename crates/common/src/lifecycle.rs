//! 组件生命周期管理

use crate::errors::LifecycleError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 容器生命周期内只创建一个实例
    #[default]
    Singleton,
    /// 瞬时模式 - 每次解析都创建新实例，不进入缓存
    Transient,
}

impl Lifetime {
    /// 是否缓存解析结果
    pub fn is_cached(self) -> bool {
        matches!(self, Self::Singleton)
    }
}

/// 组件生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// 未初始化
    #[default]
    Uninitialized,
    /// 运行中
    Running,
    /// 已停止
    Stopped,
}

/// 组件生命周期钩子
///
/// 单例组件在容器 `start` 时按创建顺序调用 `on_start`，
/// 在容器 `shutdown` 时按相反顺序调用 `on_stop`。
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// 组件启动
    async fn on_start(&self) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// 组件停止
    async fn on_stop(&self) -> Result<(), LifecycleError> {
        Ok(())
    }
}
