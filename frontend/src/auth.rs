//! 认证模块
//!
//! 管理登录 / 注册 / 资料更新 / 登出，与路由系统解耦。
//! 会话本身由 `SessionStore` 持有，这里的 `AuthContext` 只是把它的变更
//! 接入 Leptos 的响应式系统，路由服务通过注入的认证信号检查状态。

use clubhouse_shared::protocol::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use clubhouse_shared::{MemberType, Session};
use leptos::logging::log;
use leptos::prelude::*;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::session::{SessionError, SessionStore};
use crate::web::{LocalStorage, Transport};

/// 认证上下文
///
/// `Copy`，可以直接传入闭包；通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: StoredValue<SessionStore>,
    /// 每次 store.set 之后触发
    changed: Trigger,
}

impl AuthContext {
    /// 创建认证上下文并订阅会话变更，所属 Owner 销毁时取消订阅
    pub fn new(store: SessionStore) -> Self {
        let changed = Trigger::new();
        let id = store.subscribe(move |_| changed.notify());
        let handle = store.clone();
        on_cleanup(move || handle.unsubscribe(id));
        Self {
            store: StoredValue::new(store),
            changed,
        }
    }

    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }

    /// 当前会话（响应式读取）
    pub fn session(&self) -> Option<Session> {
        self.changed.track();
        self.store.with_value(SessionStore::get)
    }

    pub fn member_type(&self) -> Option<MemberType> {
        self.changed.track();
        self.store.with_value(SessionStore::member_type)
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let ctx = *self;
        Signal::derive(move || ctx.session().is_some())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 从 LocalStorage 恢复会话
pub fn init_session(storage_key: &str) -> SessionStore {
    let store = SessionStore::restore(LocalStorage, storage_key);
    if store.is_authenticated() {
        log!("[Session] Restored session from storage.");
    }
    store
}

fn require_token(session: Session) -> ApiResult<Session> {
    if session.is_valid() {
        Ok(session)
    } else {
        Err(ApiError::decode("server returned an empty token"))
    }
}

/// 登录并保存会话
pub async fn login<T: Transport>(api: &ApiClient<T>, req: LoginRequest) -> ApiResult<Session> {
    let session = require_token(api.call(&req).await?)?;
    api.session().set(Some(session.clone()));
    Ok(session)
}

/// 注册；后端注册成功后直接返回登录会话
pub async fn register<T: Transport>(api: &ApiClient<T>, req: RegisterRequest) -> ApiResult<Session> {
    let session = require_token(api.call(&req).await?)?;
    api.session().set(Some(session.clone()));
    Ok(session)
}

/// 更新个人资料，并把服务端返回的字段合并进当前会话
pub async fn update_profile<T: Transport>(
    api: &ApiClient<T>,
    req: UpdateProfileRequest,
) -> ApiResult<Session> {
    let patch = api.call(&req).await?;
    api.session().update_user(&patch).map_err(|e| match e {
        SessionError::NotAuthenticated => {
            ApiError::new(ApiErrorKind::Unauthenticated, e.to_string())
        }
        SessionError::InvalidProfile(_) => ApiError::decode(e.to_string()),
    })
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(store: &SessionStore) {
    store.clear();
}
