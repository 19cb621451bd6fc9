use std::fmt;

// =========================================================
// 错误类型枚举
// =========================================================

/// API 调用失败的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: 会话无效或过期（客户端已自动登出）
    Unauthenticated,
    /// 403: 已登录但无权执行该操作（会话保持不变）
    Forbidden,
    /// 其他非 2xx 响应，原样交给调用方处理
    Rejected,
    /// 网络层失败，没有收到任何响应
    Network,
    /// 响应体无法解析为期望的类型
    Decode,
    /// 请求构建失败（序列化、URL 等）
    Request,
}

impl ApiErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ApiErrorKind::Forbidden => "FORBIDDEN",
            ApiErrorKind::Rejected => "REQUEST_REJECTED",
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Decode => "DECODE_ERROR",
            ApiErrorKind::Request => "REQUEST_BUILD_FAILED",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 客户端返回给调用方的错误
///
/// - kind: 错误语义
/// - message: 面向用户的消息（优先使用服务端给出的 message）
/// - status / code: HTTP 状态码与应用层 code（若有响应）
/// - body: 原始响应体，供表单级错误处理使用
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<i64>,
    pub body: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
            body: None,
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Request, message)
    }

    /// 由一个非 2xx 响应构造错误
    pub fn from_response(kind: ApiErrorKind, status: u16, code: i64, message: String, body: String) -> Self {
        Self {
            kind,
            message,
            status: Some(status),
            code: Some(code),
            body: if body.is_empty() { None } else { Some(body) },
        }
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if let Some(code) = self.code {
            write!(f, " (code {})", code)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
