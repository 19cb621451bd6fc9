//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，
//! 并通过 `SessionStorage` trait 与会话存储解耦（测试中使用内存实现）。

/// 会话快照的持久化后端
///
/// 所有操作都是同步的，失败时静默降级（返回 `None` / `false`），从不 panic。
pub trait SessionStorage: Send + Sync {
    /// 读取原始字符串值
    fn load(&self, key: &str) -> Option<String>;
    /// 写入原始字符串值，返回是否成功
    fn save(&self, key: &str, value: &str) -> bool;
}

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }
}

impl SessionStorage for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        Self::get(key)
    }

    fn save(&self, key: &str, value: &str) -> bool {
        Self::set(key, value)
    }
}

// =========================================================
// 测试工具: MemoryStorage
// =========================================================

#[cfg(test)]
pub use memory::MemoryStorage;
