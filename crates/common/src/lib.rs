//! # IoC Common
//!
//! 这个 crate 提供了 Lorn IoC 容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`ComponentKey`] - 组件的类型标识（类型 + 可选限定名）
//! - [`ComponentDescriptor`] - 注册信息的描述符
//! - [`Lifetime`] - 组件生命周期（单例/瞬时）
//! - [`Lifecycle`] - 组件启动/停止钩子
//! - [`ContainerConfig`] - 容器配置
//! - [`DependencyError`] - 依赖解析错误
//!
//! ## 设计原则
//!
//! - 显式注册，不依赖运行时反射
//! - 容器是显式拥有的对象，没有全局状态

pub mod component;
pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
