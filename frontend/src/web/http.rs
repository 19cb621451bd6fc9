//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现 `Transport`，不做任何业务判断：
//! 只负责把 `HttpRequest` 发出去并把状态码和响应体原样带回。
//! 鉴权与错误拦截在 `api` 模块中完成。

use std::collections::BTreeMap;

use clubhouse_shared::protocol::HttpMethod;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 传输层错误（没有拿到任何响应）
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应读取失败
    ResponseReadFailed(String),
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::RequestBuildFailed(msg) => write!(f, "request build failed: {}", msg),
            TransportError::NetworkError(msg) => write!(f, "network error: {}", msg),
            TransportError::ResponseReadFailed(msg) => write!(f, "response read failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输特性
///
/// 浏览器环境下的 future 不是 `Send` 的，因此使用 `?Send`。
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 实现层: Fetch 客户端 (Production)
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = Headers::new().map_err(|e| {
            TransportError::RequestBuildFailed(format!("create Headers: {:?}", e))
        })?;

        for (key, value) in &req.headers {
            headers.set(key, value).map_err(|e| {
                TransportError::RequestBuildFailed(format!("set header {}: {:?}", key, e))
            })?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| TransportError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| TransportError::NetworkError("window is not available".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| TransportError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            TransportError::ResponseReadFailed(format!("not a Response: {:?}", e))
        })?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| TransportError::ResponseReadFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| TransportError::ResponseReadFailed(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub use mock::MockTransport;
