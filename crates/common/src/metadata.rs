//! 元数据定义
//!
//! 提供组件类型信息和组件键

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

/// 去掉类型路径中的模块前缀，泛型参数同样处理
///
/// `alloc::vec::Vec<demo::Engine>` -> `Vec<Engine>`
fn short_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();

    for ch in full_name.chars() {
        match ch {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '&' | '[' | ']' | ';' | '(' | ')' => {
                result.push_str(&segment);
                segment.clear();
                result.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    result.push_str(&segment);
    result
}

/// 组件键
///
/// 容器中的类型标识：类型 + 可选的限定名。
/// 相等性只比较 `TypeId` 和限定名。
#[derive(Debug, Clone)]
pub struct ComponentKey {
    type_info: TypeInfo,
    qualifier: Option<String>,
}

impl ComponentKey {
    /// 类型 `T` 的默认键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    /// 带限定名的键，同一类型可以注册多个命名实例
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<String>) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_info.id
    }

    /// 限定名
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// 用于日志和错误信息的名称
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for ComponentKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_info.id == other.type_info.id && self.qualifier == other.qualifier
    }
}

impl Eq for ComponentKey {}

impl Hash for ComponentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_info.id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}#{}", self.type_info.name, qualifier),
            None => f.write_str(&self.type_info.name),
        }
    }
}
