//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、白名单以及路由守卫。

use std::fmt::Display;

use clubhouse_shared::Capability;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 首页
    #[default]
    Home,
    /// 登录页面
    SignIn,
    /// 注册页面
    SignUp,
    /// 个人资料
    Profile,
    Teams,
    Players,
    Trainings,
    Tournaments,
    ConsentForms,
    Notifications,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 导航栏中展示的管理板块（按显示顺序）
    pub const SECTIONS: [AppRoute; 6] = [
        AppRoute::Teams,
        AppRoute::Players,
        AppRoute::Trainings,
        AppRoute::Tournaments,
        AppRoute::ConsentForms,
        AppRoute::Notifications,
    ];

    /// 将 URL path 解析为路由枚举（忽略末尾的 `/`）
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/signin" => Self::SignIn,
            "/signup" => Self::SignUp,
            "/profile" => Self::Profile,
            "/teams" => Self::Teams,
            "/player-manage" => Self::Players,
            "/training-management" => Self::Trainings,
            "/tournament-management" => Self::Tournaments,
            "/consent-form" => Self::ConsentForms,
            "/notify" => Self::Notifications,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::Profile => "/profile",
            Self::Teams => "/teams",
            Self::Players => "/player-manage",
            Self::Trainings => "/training-management",
            Self::Tournaments => "/tournament-management",
            Self::ConsentForms => "/consent-form",
            Self::Notifications => "/notify",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::Profile => "Profile",
            Self::Teams => "Teams",
            Self::Players => "Players",
            Self::Trainings => "Trainings",
            Self::Tournaments => "Tournaments",
            Self::ConsentForms => "Consent Forms",
            Self::Notifications => "Notifications",
            Self::NotFound => "Not Found",
        }
    }

    /// **白名单：无需会话即可访问的路由**
    pub fn is_public(&self) -> bool {
        matches!(self, Self::SignIn | Self::SignUp)
    }

    /// 该板块中的增删改操作所需的权限
    pub fn manage_capability(&self) -> Option<Capability> {
        match self {
            Self::Teams => Some(Capability::ManageTeams),
            Self::Players => Some(Capability::ManagePlayers),
            Self::Trainings => Some(Capability::ManageTrainings),
            Self::Tournaments => Some(Capability::ManageTournaments),
            Self::ConsentForms => Some(Capability::ReviewConsents),
            Self::Notifications => Some(Capability::SendNotifications),
            _ => None,
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::SignIn
    }

    /// 登录/注册成功后的落地页
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 路由守卫
// =========================================================

/// 守卫判定结果
///
/// 只有两种状态；每次导航都重新计算，不保留任何历史。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed(AppRoute),
    Redirecting(AppRoute),
}

impl GuardDecision {
    /// 最终要渲染的路由
    pub fn target(&self) -> AppRoute {
        match self {
            GuardDecision::Allowed(route) | GuardDecision::Redirecting(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirecting(_))
    }
}

/// **核心守卫逻辑**
///
/// 有会话时一律放行；无会话时仅放行白名单，其余重定向到登录页。
pub fn guard(route: AppRoute, authenticated: bool) -> GuardDecision {
    if authenticated || route.is_public() {
        GuardDecision::Allowed(route)
    } else {
        GuardDecision::Redirecting(AppRoute::auth_failure_redirect())
    }
}
