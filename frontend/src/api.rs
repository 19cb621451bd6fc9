//! API 网关
//!
//! 所有后端调用的唯一出口，统一执行两条横切策略：
//! - 出站：存在会话时附加 `Authorization: Bearer <token>`
//! - 入站：2xx 只返回响应体；401 清除会话并提示；403 只提示；
//!   其余错误原样交给调用方
//!
//! 不做自动重试，也不设置超时（由浏览器 fetch 默认行为决定）。

use std::sync::Arc;

use clubhouse_shared::protocol::{ApiRequest, ErrorBody, HttpMethod};
use clubhouse_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};
use leptos::logging::warn;
use leptos::prelude::use_context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::notify::{Notice, Notifier};
use crate::session::SessionStore;
use crate::web::{FetchTransport, HttpRequest, HttpResponse, Transport};

pub const UNAUTHORIZED_MESSAGE: &str = "Session expired, please sign in again";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

const CODE_UNAUTHORIZED: i64 = 401;
const CODE_FORBIDDEN: i64 = 403;

/// 浏览器中使用的客户端类型
pub type AppApi = ApiClient<FetchTransport>;

#[derive(Clone)]
pub struct ApiClient<T: Transport> {
    base_url: String,
    session: SessionStore,
    transport: T,
    notifier: Arc<dyn Notifier>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        transport: T,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            session,
            transport,
            notifier,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str, params: &[(String, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        if !params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }

    /// 发送请求
    ///
    /// 成功时只返回 JSON 响应体（空响应体返回 `Value::Null`），
    /// 失败时返回已经过 401/403 拦截处理的 `ApiError`。
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        params: &[(String, String)],
    ) -> ApiResult<Value> {
        let mut req =
            HttpRequest::new(self.url(path, params), method).with_header("Accept", "application/json");

        // 出站拦截：每次发送前重新读取会话
        if let Some(token) = self.session.token() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token));
        }

        if let Some(body) = body {
            let raw = serde_json::to_string(body).map_err(|e| ApiError::request(e.to_string()))?;
            req = req
                .with_header("Content-Type", "application/json")
                .with_body(raw);
        }

        let resp = self
            .transport
            .send(req)
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        if resp.ok() {
            return parse_body(&resp.body);
        }

        Err(self.intercept(method, path, resp))
    }

    /// 入站拦截：根据应用层 code 区分 401 / 403 / 其他
    fn intercept(&self, method: HttpMethod, path: &str, resp: HttpResponse) -> ApiError {
        let error_body: ErrorBody = serde_json::from_str(&resp.body).unwrap_or_default();
        let code = error_body.code.unwrap_or(i64::from(resp.status));
        let message = error_body
            .message
            .unwrap_or_else(|| format!("Request failed with status {}", resp.status));

        let kind = match code {
            CODE_UNAUTHORIZED => {
                warn!("[Api] {} {} -> 401, clearing session", method.as_str(), path);
                self.session.clear();
                self.notifier.notify(Notice::error(UNAUTHORIZED_MESSAGE));
                ApiErrorKind::Unauthenticated
            }
            CODE_FORBIDDEN => {
                warn!("[Api] {} {} -> 403", method.as_str(), path);
                self.notifier.notify(Notice::warning(FORBIDDEN_MESSAGE));
                ApiErrorKind::Forbidden
            }
            _ => ApiErrorKind::Rejected,
        };

        ApiError::from_response(kind, resp.status, code, message, resp.body)
    }

    /// 发送一个类型化的请求
    ///
    /// GET / DELETE 的字段作为 query 参数，其余方法作为 JSON body。
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let value = serde_json::to_value(req).map_err(|e| ApiError::request(e.to_string()))?;
        let payload = if R::METHOD.carries_body() {
            self.request(R::METHOD, &req.path(), Some(&value), &[]).await?
        } else {
            self.request(R::METHOD, &req.path(), None, &query_params(&value))
                .await?
        };
        decode_payload(payload)
    }
}

fn parse_body(body: &str) -> ApiResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(ApiError::from)
}

/// 将对象字段展开为 query 参数（`null` 字段跳过）
fn query_params(value: &Value) -> Vec<(String, String)> {
    let Some(fields) = value.as_object() else {
        return Vec::new();
    };
    fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), v)
        })
        .collect()
}

/// 从响应体中取出业务数据
///
/// 后端通常返回 `{ code, data, message }` 信封，此时取 `data`；
/// 否则整个响应体即为数据。
fn decode_payload<P: DeserializeOwned>(body: Value) -> ApiResult<P> {
    if let Some(inner) = body.get("data") {
        if let Ok(payload) = P::deserialize(inner) {
            return Ok(payload);
        }
    }
    serde_json::from_value(body).map_err(ApiError::from)
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> AppApi {
    use_context::<AppApi>().expect("ApiClient should be provided")
}

#[cfg(test)]
mod tests;
