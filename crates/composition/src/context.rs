//! 应用上下文

use crate::builder::ApplicationContextBuilder;
use di_abstractions::{ComponentResolver, ContainerStats, DiContainer};
use di_impl::DiContainerImpl;
use ioc_common::{DependencyResult, InfrastructureError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

/// 应用上下文
///
/// 拥有容器的显式生命周期边界：构建时创建容器并启动组件，
/// `shutdown` 时停止组件并释放容器
pub struct ApplicationContext {
    /// 依赖注入容器
    container: Arc<DiContainerImpl>,
    /// 运行状态
    status: RwLock<ContextStatus>,
    /// 启动时间
    started_at: chrono::DateTime<chrono::Utc>,
}

impl ApplicationContext {
    /// 创建应用上下文构建器
    pub fn builder() -> ApplicationContextBuilder {
        ApplicationContextBuilder::new()
    }

    /// 内部构造函数，容器已经启动
    pub(crate) fn new(container: DiContainerImpl) -> Self {
        Self {
            container: Arc::new(container),
            status: RwLock::new(ContextStatus::Running),
            started_at: chrono::Utc::now(),
        }
    }

    /// 获取容器
    pub fn container(&self) -> &Arc<DiContainerImpl> {
        &self.container
    }

    /// 解析组件
    pub fn resolve<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.container.resolve::<T>()
    }

    /// 解析指定限定名的组件
    pub fn resolve_named<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.container.resolve_named::<T>(name)
    }

    /// 尝试解析组件，未注册时返回 `None`
    pub fn try_resolve<T>(&self) -> DependencyResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        self.container.try_resolve::<T>()
    }

    /// 获取运行状态
    pub fn status(&self) -> ContextStatus {
        *self.status.read()
    }

    /// 启动时间
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        self.container.stats()
    }

    /// 停止所有组件并释放容器
    pub async fn shutdown(self) -> Result<(), InfrastructureError> {
        info!("关闭应用上下文");
        *self.status.write() = ContextStatus::Stopping;

        let result = self.container.shutdown().await;
        match &result {
            Ok(()) => *self.status.write() = ContextStatus::Stopped,
            Err(e) => {
                error!("组件停止失败: {}", e);
                *self.status.write() = ContextStatus::Failed;
            }
        }

        let uptime = chrono::Utc::now() - self.started_at;
        info!(uptime_ms = uptime.num_milliseconds(), "应用上下文已关闭");
        result.map_err(InfrastructureError::from)
    }
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("container", &self.container)
            .field("status", &self.status())
            .field("started_at", &self.started_at)
            .finish()
    }
}

/// 应用上下文状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStatus {
    /// 运行中
    Running,
    /// 停止中
    Stopping,
    /// 已停止
    Stopped,
    /// 失败
    Failed,
}
