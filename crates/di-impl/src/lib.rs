//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器 [`DiContainerImpl`] 和构建器 [`DiContainerBuilder`]
//!
//! ## 并发策略
//!
//! 工厂执行期间不持有任何锁。两个线程同时首次解析同一组件时，
//! 工厂可能执行两次，先写入缓存的实例生效，后完成的实例被丢弃，
//! 所有调用方拿到的都是缓存中的同一个实例。

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use di_abstractions::{
    ComponentRegistration, ComponentRegistry, ComponentResolver, ContainerStats,
    CreatedComponent, DiContainer, ResolveContext, ResolveOptions, SharedInstance,
};
use ioc_common::{
    ComponentDescriptor, ComponentKey, ContainerConfig, DependencyError, DependencyResult,
    Lifecycle, LifecycleError, LifecycleResult, LifecycleState,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 具体的依赖注入容器实现
pub struct DiContainerImpl {
    /// 容器标识，用于日志
    id: Uuid,
    /// 容器配置
    config: ContainerConfig,
    /// 组件注册信息
    registrations: RwLock<HashMap<ComponentKey, ComponentRegistration>>,
    /// 单例实例缓存
    singletons: DashMap<ComponentKey, SharedInstance>,
    /// 带生命周期钩子的单例，按创建顺序
    creation_order: Mutex<Vec<(ComponentKey, Arc<dyn Lifecycle>)>>,
    /// 生命周期状态
    state: Mutex<LifecycleState>,
    resolution_requests: AtomicU64,
    discarded_instances: AtomicU64,
    resolution_errors: AtomicU64,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        let id = Uuid::new_v4();
        debug!(container = %id, ?config, "创建容器");
        Self {
            id,
            config,
            registrations: RwLock::new(HashMap::new()),
            singletons: DashMap::new(),
            creation_order: Mutex::new(Vec::new()),
            state: Mutex::new(LifecycleState::Uninitialized),
            resolution_requests: AtomicU64::new(0),
            discarded_instances: AtomicU64::new(0),
            resolution_errors: AtomicU64::new(0),
        }
    }

    /// 创建构建器
    pub fn builder() -> DiContainerBuilder {
        DiContainerBuilder::new()
    }

    /// 容器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 组件是否已经创建并缓存
    pub fn is_resolved<T: 'static>(&self) -> bool {
        self.is_resolved_key(&ComponentKey::of::<T>())
    }

    /// 指定组件键是否已经创建并缓存，可用于命名注册
    pub fn is_resolved_key(&self, key: &ComponentKey) -> bool {
        self.singletons.contains_key(key)
    }

    fn resolve_uncounted(
        &self,
        key: &ComponentKey,
        context: &mut ResolveContext<'_>,
    ) -> DependencyResult<SharedInstance> {
        if let Some(instance) = self.singletons.get(key) {
            return Ok(instance.value().clone());
        }

        // 读锁在调用工厂前释放，工厂可以递归解析甚至注册
        let registration = self
            .registrations
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| DependencyError::not_registered(key.display_name()))?;

        context.push_key(key)?;
        debug!(container = %self.id, component = %key, depth = context.depth(), "创建组件");
        let created = registration.rule.create(context);
        context.pop_key();
        let created = created?;

        if registration.lifetime().is_cached() {
            Ok(self.cache_singleton(key, created))
        } else {
            Ok(created.instance)
        }
    }

    fn cache_singleton(&self, key: &ComponentKey, created: CreatedComponent) -> SharedInstance {
        match self.singletons.entry(key.clone()) {
            Entry::Occupied(entry) => {
                self.discarded_instances.fetch_add(1, Ordering::Relaxed);
                debug!(container = %self.id, component = %key, "并发创建的实例已丢弃");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                if let Some(lifecycle) = created.lifecycle {
                    self.creation_order.lock().push((key.clone(), lifecycle));
                }
                entry.insert(created.instance.clone());
                created.instance
            }
        }
    }

    fn lifecycle_hooks(&self) -> Vec<(ComponentKey, Arc<dyn Lifecycle>)> {
        self.creation_order.lock().clone()
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("registrations", &self.registrations.read().len())
            .field("singletons", &self.singletons.len())
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl ComponentRegistry for DiContainerImpl {
    fn add_registration(&self, registration: ComponentRegistration) {
        let key = registration.key().clone();
        info!(
            container = %self.id,
            component = %key,
            lifetime = ?registration.lifetime(),
            "注册组件"
        );

        if self.config.warn_on_override && self.singletons.contains_key(&key) {
            warn!(container = %self.id, component = %key, "组件已解析，新注册不影响已缓存的实例");
        }

        self.registrations.write().insert(key, registration);
    }

    fn is_registered_key(&self, key: &ComponentKey) -> bool {
        self.registrations.read().contains_key(key)
    }

    fn registered_components(&self) -> Vec<ComponentDescriptor> {
        let mut descriptors: Vec<ComponentDescriptor> = self
            .registrations
            .read()
            .values()
            .map(|registration| registration.descriptor.clone())
            .collect();
        descriptors.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name().cmp(&b.name())));
        descriptors
    }
}

impl ComponentResolver for DiContainerImpl {
    fn resolve_key(
        &self,
        key: &ComponentKey,
        context: &mut ResolveContext<'_>,
    ) -> DependencyResult<SharedInstance> {
        self.resolution_requests.fetch_add(1, Ordering::Relaxed);
        let top_level = context.depth() == 0;

        let result = self.resolve_uncounted(key, context);
        if let Err(error) = &result {
            if top_level {
                self.resolution_errors.fetch_add(1, Ordering::Relaxed);
                debug!(container = %self.id, component = %key, %error, "组件解析失败");
            }
        }
        result
    }

    fn can_resolve(&self, key: &ComponentKey) -> bool {
        self.is_resolved_key(key) || self.is_registered_key(key)
    }

    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.config.max_resolution_depth,
        }
    }
}

#[async_trait]
impl DiContainer for DiContainerImpl {
    fn validate(&self) -> Result<usize, Vec<DependencyError>> {
        info!(container = %self.id, "验证容器状态");

        let keys: Vec<ComponentKey> = self
            .registered_components()
            .into_iter()
            .filter(|descriptor| descriptor.lifetime.is_cached())
            .map(|descriptor| descriptor.key)
            .collect();

        let mut created = 0;
        let mut errors = Vec::new();
        for key in keys {
            let mut context = ResolveContext::new(self, self.resolve_options());
            match self.resolve_key(&key, &mut context) {
                Ok(_) => created += 1,
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            info!(container = %self.id, created, "容器验证通过");
            Ok(created)
        } else {
            warn!(container = %self.id, failed = errors.len(), "容器验证失败");
            Err(errors)
        }
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_components: self.registrations.read().len(),
            resolution_requests: self.resolution_requests.load(Ordering::Relaxed),
            active_singletons: self.singletons.len(),
            discarded_instances: self.discarded_instances.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
        }
    }

    fn lifecycle_state(&self) -> LifecycleState {
        *self.state.lock()
    }

    async fn start(&self) -> LifecycleResult<()> {
        if self.lifecycle_state() == LifecycleState::Running {
            return Ok(());
        }

        // 带生命周期钩子的单例在启动时创建，保证每个都收到 on_start
        let pending: Vec<ComponentKey> = self
            .registered_components()
            .into_iter()
            .filter(|descriptor| descriptor.has_lifecycle && descriptor.lifetime.is_cached())
            .map(|descriptor| descriptor.key)
            .filter(|key| !self.singletons.contains_key(key))
            .collect();
        for key in pending {
            let mut context = ResolveContext::new(self, self.resolve_options());
            self.resolve_key(&key, &mut context)
                .map_err(|error| LifecycleError::StartFailed {
                    component: key.display_name(),
                    message: error.to_string(),
                })?;
        }

        let hooks = self.lifecycle_hooks();
        info!(container = %self.id, components = hooks.len(), "启动组件");
        for (index, (key, lifecycle)) in hooks.iter().enumerate() {
            debug!(container = %self.id, component = %key, "on_start");
            if let Err(error) = lifecycle.on_start().await {
                warn!(container = %self.id, component = %key, %error, "组件启动失败，停止已启动的组件");
                // 已启动的组件逆序停止，停止错误只记录日志
                for (started_key, started) in hooks[..index].iter().rev() {
                    if let Err(stop_error) = started.on_stop().await {
                        warn!(container = %self.id, component = %started_key, error = %stop_error, "组件停止失败");
                    }
                }
                *self.state.lock() = LifecycleState::Stopped;
                return Err(error);
            }
        }

        *self.state.lock() = LifecycleState::Running;
        Ok(())
    }

    async fn shutdown(&self) -> LifecycleResult<()> {
        if self.lifecycle_state() == LifecycleState::Stopped {
            return Ok(());
        }

        let hooks = self.lifecycle_hooks();
        info!(container = %self.id, components = hooks.len(), "停止组件");

        // 单个组件停止失败不影响其余组件，返回第一个错误
        let mut first_error = None;
        for (key, lifecycle) in hooks.iter().rev() {
            debug!(container = %self.id, component = %key, "on_stop");
            if let Err(error) = lifecycle.on_stop().await {
                warn!(container = %self.id, component = %key, %error, "组件停止失败");
                first_error.get_or_insert(error);
            }
        }

        *self.state.lock() = LifecycleState::Stopped;
        first_error.map_or(Ok(()), Err)
    }
}

/// 容器构建器
#[derive(Debug, Default)]
pub struct DiContainerBuilder {
    config: ContainerConfig,
    registrations: Vec<ComponentRegistration>,
}

impl DiContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 添加注册信息，按添加顺序写入容器
    pub fn with_registration(mut self, registration: ComponentRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    /// 构建容器
    pub fn build(self) -> DiContainerImpl {
        let container = DiContainerImpl::with_config(self.config);
        let registration_count = self.registrations.len();
        for registration in self.registrations {
            container.add_registration(registration);
        }

        info!(container = %container.id(), registration_count, "构建容器完成");
        container
    }
}
