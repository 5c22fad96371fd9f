//! # 组合层
//!
//! 负责把容器配置、日志和显式注册的组件模块组合成一个可运行的应用上下文。
//!
//! ## 主要功能
//!
//! - **应用上下文构建器**: 使用构建者模式组装容器
//! - **组件模块**: 以模块为单位显式注册组件，代替运行时扫描
//! - **生命周期管理**: 管理单例组件的启动和关闭
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use ioc_composition::{ApplicationContextBuilder, FnModule};
//! use di_abstractions::ComponentRegistry;
//! use di_impl::DiContainerImpl;
//!
//! #[derive(Debug)]
//! struct Engine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationContextBuilder::new()
//!         .add_module(FnModule::new("engine", |container: &DiContainerImpl| {
//!             container.register(|_| Ok(Engine));
//!             Ok(())
//!         }))
//!         .build()
//!         .await?;
//!
//!     let engine = context.resolve::<Engine>()?;
//!     println!("{engine:?}");
//!
//!     context.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod module;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use builder::{ApplicationContextBuilder, LoggingConfig};
pub use context::{ApplicationContext, ContextStatus};
pub use module::{ComponentModule, FnModule};

// 重新导出错误类型
pub use ioc_common::InfrastructureError;
