//! Clubhouse 管理后台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储（唯一的认证状态来源，持久化到 LocalStorage）
//! - `api`: API 网关（附加 Bearer Token，拦截 401/403）
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证上下文与登录/注册/资料更新动作
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod forms;
    pub mod header;
    pub mod home;
    pub mod profile;
    pub mod section;
    pub mod signin;
    pub mod signup;
}
mod config;
mod error;
mod notify;
mod session;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{AuthContext, init_session};
use crate::components::header::Header;
use crate::components::home::HomePage;
use crate::components::profile::ProfilePage;
use crate::components::section::SectionPage;
use crate::components::signin::SignInPage;
use crate::components::signup::SignUpPage;
use crate::config::AppConfig;
use crate::notify::{ToastContext, Toaster};

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{FetchTransport, HttpRequest, HttpResponse, Transport, TransportError};
    pub use storage::{LocalStorage, SessionStorage};

    #[cfg(test)]
    pub use http::MockTransport;
    #[cfg(test)]
    pub use storage::MemoryStorage;
}

use web::FetchTransport;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::SignIn => view! { <SignInPage /> }.into_any(),
        AppRoute::SignUp => view! { <SignUpPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Teams
        | AppRoute::Players
        | AppRoute::Trainings
        | AppRoute::Tournaments
        | AppRoute::ConsentForms
        | AppRoute::Notifications => view! { <SectionPage route=route /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();

    // 1. 从 LocalStorage 恢复会话
    let store = init_session(&config.storage_key);

    // 2. 通知与 API 客户端（共享同一个会话存储）
    let toasts = ToastContext::new();
    provide_context(toasts);
    let api = ApiClient::new(
        config.api_base_url.clone(),
        store.clone(),
        FetchTransport,
        Arc::new(toasts),
    );
    provide_context(api);

    // 3. 认证上下文，把会话变更接入响应式系统
    let auth_ctx = AuthContext::new(store);
    provide_context(auth_ctx);

    // 4. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <Header />
            <RouterOutlet matcher=route_matcher />
        </Router>
        <Toaster />
    }
}
