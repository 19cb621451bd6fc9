use crate::{MemberType, Session};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET / DELETE 的参数放在 query string 中，其余放在 JSON body 中
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or prefix for parameterised routes).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The concrete path for this request. Override for routes with path parameters.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

// =========================================================
// Envelopes
// =========================================================

/// Error body returned by the backend for any non-2xx response.
///
/// `code` is the application-level code; it usually mirrors the HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationResponse<T> {
    pub data: T,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

impl PageQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

// =========================================================
// Auth Requests
// =========================================================

/// Sign in with email and password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = Session;
    const PATH: &'static str = "/api/v1/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Create an account; the backend signs the new user in immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub member_type: MemberType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

impl ApiRequest for RegisterRequest {
    type Response = Session;
    const PATH: &'static str = "/api/v1/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Update the signed-in member's profile.
///
/// The backend answers with the changed user fields only, which the caller
/// merges into the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip)]
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub consent_form_url: String,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/v1/members";
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}
