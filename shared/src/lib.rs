use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中会话快照的固定键
pub const SESSION_STORAGE_KEY: &str = "user-store";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 会员类型（角色）
///
/// 封闭枚举，仅用于只读的权限判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Admin,
    Chairman,
    Coach,
    EventAssistant,
    Member,
    Player,
}

impl MemberType {
    pub const ALL: [MemberType; 6] = [
        MemberType::Admin,
        MemberType::Chairman,
        MemberType::Coach,
        MemberType::EventAssistant,
        MemberType::Member,
        MemberType::Player,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Admin => "admin",
            MemberType::Chairman => "chairman",
            MemberType::Coach => "coach",
            MemberType::EventAssistant => "event_assistant",
            MemberType::Member => "member",
            MemberType::Player => "player",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// 用于界面显示的名称
    pub fn label(&self) -> &'static str {
        match self {
            MemberType::Admin => "Admin",
            MemberType::Chairman => "Chairman",
            MemberType::Coach => "Coach",
            MemberType::EventAssistant => "Event Assistant",
            MemberType::Member => "Member",
            MemberType::Player => "Player",
        }
    }

    /// 普通会员与球员不能执行管理类操作
    pub fn is_restricted(&self) -> bool {
        matches!(self, MemberType::Member | MemberType::Player)
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageTeams
            | Capability::ManagePlayers
            | Capability::ManageTournaments
            | Capability::ManageTrainings
            | Capability::SendNotifications => !self.is_restricted(),
            Capability::ReviewConsents => matches!(self, MemberType::Admin | MemberType::Coach),
            Capability::SignConsents => self.is_restricted(),
        }
    }
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 界面层的操作权限
///
/// 这只是展示层的检查，真正的鉴权在服务端完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageTeams,
    ManagePlayers,
    ManageTournaments,
    ManageTrainings,
    SendNotifications,
    ReviewConsents,
    SignConsents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachProfile {
    pub coach_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(alias = "role")]
    pub member_type: MemberType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<CoachProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_form_url: Option<String>,
}

impl User {
    /// 将服务端返回的部分用户对象合并到当前用户上
    ///
    /// 与 `{ ...user, ...patch }` 语义一致：patch 中出现的字段覆盖原值，
    /// 其余字段保持不变。合并结果必须仍是一个完整的 `User`。
    pub fn merged_with(&self, patch: &serde_json::Value) -> Result<User, serde_json::Error> {
        let mut base = serde_json::to_value(self)?;
        if let (Some(target), Some(fields)) = (base.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                // `role` 是 `member_type` 的别名，避免合并后出现重复字段
                let key = if key == "role" { "member_type" } else { key.as_str() };
                target.insert(key.to_string(), value.clone());
            }
        }
        serde_json::from_value(base)
    }
}

/// 当前的认证会话
///
/// 要么完整存在（token 与 user 都有值），要么整体缺失（`Option::None`），
/// 不存在中间状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn bearer(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.token)
    }
}
