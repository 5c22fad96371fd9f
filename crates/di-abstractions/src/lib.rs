//! # Dependency Injection Abstractions
//! 
//! 依赖注入抽象层，定义组件注册和依赖解析的核心接口。
//! 
//! ## 核心接口
//! 
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentResolver`] - 组件解析器接口
//! - [`ResolveContext`] - 解析上下文，记录当前解析路径
//! - [`ComponentFactoryFn`] - 组件工厂函数
//! - [`DiContainer`] - 完整的容器接口

pub mod registry;
pub mod resolver;
pub mod factory;
pub mod container;

pub use registry::*;
pub use resolver::*;
pub use factory::*;
pub use container::*;
