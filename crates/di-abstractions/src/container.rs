//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::registry::ComponentRegistry;
use crate::resolver::ComponentResolver;
use async_trait::async_trait;
use ioc_common::{DependencyError, LifecycleResult, LifecycleState};

/// 依赖注入容器 trait
///
/// 注册、解析之外，负责单例的预创建和生命周期钩子
#[async_trait]
pub trait DiContainer: ComponentRegistry + ComponentResolver {
    /// 创建所有单例注册，返回成功创建的数量
    ///
    /// 不会在第一个错误处停止，所有失败一起返回
    fn validate(&self) -> Result<usize, Vec<DependencyError>>;

    /// 获取容器统计信息
    fn stats(&self) -> ContainerStats;

    /// 当前生命周期状态
    fn lifecycle_state(&self) -> LifecycleState;

    /// 按创建顺序调用单例的 `on_start`
    async fn start(&self) -> LifecycleResult<()>;

    /// 按创建顺序的逆序调用单例的 `on_stop`
    async fn shutdown(&self) -> LifecycleResult<()>;
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册组件数量
    pub registered_components: usize,
    /// 解析请求次数（包括嵌套解析）
    pub resolution_requests: u64,
    /// 活跃单例数量
    pub active_singletons: usize,
    /// 并发首次解析中被丢弃的实例数量
    pub discarded_instances: u64,
    /// 解析错误数量
    pub resolution_errors: u64,
}
