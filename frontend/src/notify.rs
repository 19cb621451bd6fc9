//! 用户可见的通知（Toast）
//!
//! `Notifier` 是 API 客户端向用户报告鉴权问题的唯一出口，
//! 浏览器中由 `ToastContext` 实现，测试中由 `RecordingNotifier` 实现。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use leptos::prelude::*;

/// 通知自动消失时间
const TOAST_LIFETIME: Duration = Duration::from_secs(3);

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    fn alert_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "alert alert-success shadow-lg",
            NoticeLevel::Info => "alert alert-info shadow-lg",
            NoticeLevel::Warning => "alert alert-warning shadow-lg",
            NoticeLevel::Error => "alert alert-error shadow-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

// =========================================================
// Toast 实现
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    id: u64,
    notice: Notice,
}

/// Toast 上下文
///
/// 通过 Context 共享；`RwSignal` 是 `Copy` 的，可以随意传入闭包。
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
        }
    }

    pub fn push(&self, notice: Notice) {
        let id = NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed);
        self.toasts.update(|list| list.push(Toast { id, notice }));

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|list| list.retain(|t| t.id != id)),
            TOAST_LIFETIME,
        );
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastContext {
    fn notify(&self, notice: Notice) {
        self.push(notice);
    }
}

/// 从 Context 获取 Toast 上下文
pub fn use_toasts() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// Toast 容器组件，放在应用根部
#[component]
pub fn Toaster() -> impl IntoView {
    let ctx = use_toasts();

    view! {
        <div class="toast toast-top toast-center z-50">
            <For
                each=move || ctx.toasts.get()
                key=|t| t.id
                children=move |toast| {
                    view! {
                        <div class=toast.notice.level.alert_class()>
                            <span>{toast.notice.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

// =========================================================
// 测试工具: RecordingNotifier
// =========================================================

#[cfg(test)]
pub use recording::RecordingNotifier;
