//! 会话存储模块
//!
//! 进程（标签页）内唯一的认证状态持有者：
//! - `get` / `set` 是读写会话的唯一入口
//! - 每次 `set` 同步写入持久化存储，然后通知所有订阅者
//! - 启动时从持久化存储恢复，数据缺失或损坏时降级为未登录
//!
//! 持久化存储只是缓存，内存中的值才是权威来源。

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use clubhouse_shared::{MemberType, Session};
use leptos::logging::warn;

use crate::web::SessionStorage;

pub type SubscriptionId = u64;

type Subscriber = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

#[derive(Debug)]
pub enum SessionError {
    /// 当前没有登录会话
    NotAuthenticated,
    /// 合并后的用户资料不完整
    InvalidProfile(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotAuthenticated => write!(f, "no active session"),
            SessionError::InvalidProfile(e) => write!(f, "invalid profile update: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

struct Inner {
    current: RwLock<Option<Session>>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
    storage: Box<dyn SessionStorage>,
    key: String,
}

/// 会话存储
///
/// 克隆开销很小，所有克隆共享同一份状态。
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// 从持久化存储恢复会话
    ///
    /// 永不失败：键不存在、JSON 损坏、字段不完整或 token 为空都视为未登录。
    pub fn restore(storage: impl SessionStorage + 'static, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = Self::read_snapshot(&storage, &key);
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(current),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                storage: Box::new(storage),
                key,
            }),
        }
    }

    fn read_snapshot(storage: &dyn SessionStorage, key: &str) -> Option<Session> {
        let raw = storage.load(key)?;
        match serde_json::from_str::<Option<Session>>(&raw) {
            Ok(session) => session.filter(Session::is_valid),
            Err(e) => {
                warn!("[Session] Discarding unreadable snapshot under '{}': {}", key, e);
                None
            }
        }
    }

    /// 当前会话快照
    pub fn get(&self) -> Option<Session> {
        match self.inner.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 整体替换会话；`None` 即登出
    ///
    /// token 为空的会话按 `None` 处理，保证内存中的值与重载后恢复的值一致。
    pub fn set(&self, session: Option<Session>) {
        let session = match session {
            Some(s) if !s.is_valid() => {
                warn!("[Session] Refusing session with empty token, treating as logged out");
                None
            }
            other => other,
        };
        {
            let mut guard = match self.inner.current.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard = session.clone();
        }
        self.persist(&session);
        self.notify(session.as_ref());
    }

    /// 登出
    pub fn clear(&self) {
        self.set(None);
    }

    /// 将服务端返回的部分用户资料合并进当前会话，token 保持不变
    pub fn update_user(&self, patch: &serde_json::Value) -> Result<Session, SessionError> {
        let current = self.get().ok_or(SessionError::NotAuthenticated)?;
        let user = current
            .user
            .merged_with(patch)
            .map_err(SessionError::InvalidProfile)?;
        let updated = Session::new(current.token, user);
        self.set(Some(updated.clone()));
        Ok(updated)
    }

    pub fn token(&self) -> Option<String> {
        self.get().map(|s| s.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    pub fn member_type(&self) -> Option<MemberType> {
        self.get().map(|s| s.user.member_type)
    }

    /// 注册变更回调，每次 `set` 后以新值调用
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.push((id, Arc::new(callback)));
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    fn persist(&self, session: &Option<Session>) {
        match serde_json::to_string(session) {
            Ok(raw) => {
                if !self.inner.storage.save(&self.inner.key, &raw) {
                    warn!("[Session] Failed to write snapshot to storage");
                }
            }
            Err(e) => warn!("[Session] Failed to serialize snapshot: {}", e),
        }
    }

    fn notify(&self, session: Option<&Session>) {
        // 先复制订阅者列表再回调，回调中可以安全地再次读写 store
        let subscribers: Vec<Subscriber> = match self.inner.subscribers.lock() {
            Ok(subs) => subs.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(_) => return,
        };
        for callback in subscribers {
            callback(session);
        }
    }
}

#[cfg(test)]
mod tests;
