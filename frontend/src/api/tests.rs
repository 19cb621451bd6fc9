use super::*;
use crate::notify::{NoticeLevel, RecordingNotifier};
use crate::web::{MemoryStorage, MockTransport, TransportError};
use clubhouse_shared::protocol::{LoginRequest, PageQuery, PaginationResponse, UpdateProfileRequest};
use clubhouse_shared::{MemberType, Session, User};
use serde::Serialize;
use serde_json::json;

const BASE: &str = "https://api.club.org";

// =========================================================
// 辅助函数
// =========================================================

struct Harness {
    api: ApiClient<MockTransport>,
    notifier: RecordingNotifier,
}

fn harness() -> Harness {
    let store = SessionStore::restore(MemoryStorage::new(), "user-store");
    let notifier = RecordingNotifier::new();
    let api = ApiClient::new(
        format!("{}/", BASE),
        store,
        MockTransport::new(),
        Arc::new(notifier.clone()),
    );
    Harness { api, notifier }
}

fn signed_in(token: &str) -> Session {
    Session::new(
        token,
        User {
            id: 1,
            name: "Ari".to_string(),
            email: "a@x.com".to_string(),
            phone: None,
            member_type: MemberType::Member,
            coach: None,
            consent_form_url: None,
        },
    )
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

// =========================================================
// 出站拦截
// =========================================================

#[tokio::test]
async fn test_bearer_header_attached_when_signed_in() {
    let h = harness();
    h.api.session().set(Some(signed_in("T")));
    h.api.transport().mock_response(&url("/api/v1/teams"), 200, json!([]));

    h.api
        .request(HttpMethod::Get, "/api/v1/teams", None, &[])
        .await
        .unwrap();

    let req = h.api.transport().last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer T"));
}

#[tokio::test]
async fn test_no_auth_header_without_session() {
    let h = harness();
    h.api.transport().mock_response(&url("/api/v1/auth/login"), 200, json!({}));

    h.api
        .request(HttpMethod::Post, "/api/v1/auth/login", Some(&json!({})), &[])
        .await
        .unwrap();

    let req = h.api.transport().last_request().unwrap();
    assert_eq!(req.header("Authorization"), None);
    assert_eq!(req.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_token_read_fresh_for_each_request() {
    let h = harness();
    h.api.transport().mock_response(&url("/a"), 200, json!(1));

    h.api.session().set(Some(signed_in("first")));
    h.api.request(HttpMethod::Get, "/a", None, &[]).await.unwrap();
    h.api.session().clear();
    h.api.request(HttpMethod::Get, "a", None, &[]).await.unwrap();

    let requests = h.api.transport().requests.borrow();
    assert_eq!(requests[0].header("Authorization"), Some("Bearer first"));
    assert_eq!(requests[1].header("Authorization"), None);
}

#[tokio::test]
async fn test_query_params_are_encoded() {
    let h = harness();
    let expected = url("/api/v1/players?page=2&size=10&q=a+b%26c");
    h.api.transport().mock_response(&expected, 200, json!([]));

    let mut params = PageQuery { page: 2, size: 10 }.to_params();
    params.push(("q".to_string(), "a b&c".to_string()));
    h.api
        .request(HttpMethod::Get, "/api/v1/players", None, &params)
        .await
        .unwrap();

    assert_eq!(h.api.transport().last_request().unwrap().url, expected);
}

// =========================================================
// 入站拦截
// =========================================================

#[tokio::test]
async fn test_success_returns_body_only() {
    let h = harness();
    h.api
        .transport()
        .mock_response(&url("/api/v1/teams"), 200, json!([{ "team_id": 1 }]));

    let body = h
        .api
        .request(HttpMethod::Get, "/api/v1/teams", None, &[])
        .await
        .unwrap();
    assert_eq!(body, json!([{ "team_id": 1 }]));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let h = harness();
    h.api.transport().mock_raw(&url("/api/v1/teams/3"), 204, "");

    let body = h
        .api
        .request(HttpMethod::Delete, "/api/v1/teams/3", None, &[])
        .await
        .unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_401_clears_session_and_rejects() {
    let h = harness();
    h.api.session().set(Some(signed_in("tok123")));
    h.api.transport().mock_response(
        &url("/api/v1/teams"),
        401,
        json!({ "code": 401, "message": "token expired" }),
    );

    let err = h
        .api
        .request(HttpMethod::Get, "/api/v1/teams", None, &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
    assert_eq!(err.message(), "token expired");
    assert_eq!(h.api.session().get(), None);
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, UNAUTHORIZED_MESSAGE);
}

#[tokio::test]
async fn test_401_without_prior_session_still_rejects() {
    let h = harness();
    h.api
        .transport()
        .mock_response(&url("/x"), 401, json!({ "code": 401 }));

    let err = h.api.request(HttpMethod::Get, "/x", None, &[]).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
    assert_eq!(h.api.session().get(), None);
}

#[tokio::test]
async fn test_application_code_wins_over_status() {
    let h = harness();
    h.api.session().set(Some(signed_in("t")));
    h.api
        .transport()
        .mock_response(&url("/x"), 400, json!({ "code": 401, "msg": "relogin" }));

    let err = h.api.request(HttpMethod::Get, "/x", None, &[]).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.code, Some(401));
    assert_eq!(h.api.session().get(), None);
}

#[tokio::test]
async fn test_status_used_when_body_has_no_code() {
    let h = harness();
    h.api.session().set(Some(signed_in("t")));
    h.api.transport().mock_raw(&url("/x"), 401, "Unauthorized");

    let err = h.api.request(HttpMethod::Get, "/x", None, &[]).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
    assert_eq!(err.body.as_deref(), Some("Unauthorized"));
    assert_eq!(h.api.session().get(), None);
}

#[tokio::test]
async fn test_403_keeps_session_and_rejects() {
    let h = harness();
    let before = signed_in("tok123");
    h.api.session().set(Some(before.clone()));
    h.api.transport().mock_response(
        &url("/api/v1/notify"),
        403,
        json!({ "code": 403, "message": "coaches only" }),
    );

    let err = h
        .api
        .request(HttpMethod::Post, "/api/v1/notify", Some(&json!({})), &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Forbidden);
    assert_eq!(h.api.session().get(), Some(before));
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(notices[0].message, FORBIDDEN_MESSAGE);
}

#[tokio::test]
async fn test_other_errors_pass_through_untouched() {
    let h = harness();
    let before = signed_in("t");
    h.api.session().set(Some(before.clone()));
    let body = json!({ "code": 422, "message": "email already registered" });
    h.api
        .transport()
        .mock_response(&url("/api/v1/teams"), 422, body.clone());

    let err = h
        .api
        .request(HttpMethod::Post, "/api/v1/teams", Some(&json!({})), &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Rejected);
    assert_eq!(err.status, Some(422));
    assert_eq!(err.message(), "email already registered");
    assert_eq!(err.body, Some(body.to_string()));
    assert_eq!(h.api.session().get(), Some(before));
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_network_failure_is_distinct_and_side_effect_free() {
    let h = harness();
    h.api.session().set(Some(signed_in("t")));
    h.api.transport().mock_failure(
        &url("/x"),
        TransportError::NetworkError("connection refused".to_string()),
    );

    let err = h.api.request(HttpMethod::Get, "/x", None, &[]).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert_eq!(err.status, None);
    assert!(h.api.session().is_authenticated());
    assert!(h.notifier.notices().is_empty());
    assert_eq!(h.api.transport().requests.borrow().len(), 1);
}

#[tokio::test]
async fn test_invalid_success_json_is_decode_error() {
    let h = harness();
    h.api.transport().mock_raw(&url("/x"), 200, "<html>");

    let err = h.api.request(HttpMethod::Get, "/x", None, &[]).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

// =========================================================
// 类型化请求
// =========================================================

#[tokio::test]
async fn test_login_payload_from_envelope() {
    let h = harness();
    h.api.transport().mock_response(
        &url("/api/v1/auth/login"),
        200,
        json!({
            "code": 200,
            "data": { "token": "tok123", "user": { "id": 1, "name": "Ari", "email": "a@x.com", "role": "member" } },
            "message": "ok"
        }),
    );

    let req = LoginRequest {
        email: "a@x.com".to_string(),
        password: "secret1".to_string(),
    };
    let session = h.api.call(&req).await.unwrap();

    assert_eq!(session.token, "tok123");
    assert_eq!(session.user.member_type, MemberType::Member);
    let sent = h.api.transport().last_request().unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(sent.body.as_deref().unwrap()).unwrap(),
        json!({ "email": "a@x.com", "password": "secret1" })
    );
}

#[tokio::test]
async fn test_login_payload_without_envelope() {
    let h = harness();
    h.api.transport().mock_response(
        &url("/api/v1/auth/login"),
        200,
        json!({ "token": "tok123", "user": { "id": 1, "name": "Ari", "email": "a@x.com", "member_type": "member" } }),
    );

    let req = LoginRequest {
        email: "a@x.com".to_string(),
        password: "secret1".to_string(),
    };
    assert_eq!(h.api.call(&req).await.unwrap().token, "tok123");
}

#[tokio::test]
async fn test_pagination_response_keeps_outer_data() {
    #[derive(Serialize)]
    struct ListPlayers {
        page: u32,
        size: u32,
    }

    impl ApiRequest for ListPlayers {
        type Response = PaginationResponse<Vec<Value>>;
        const PATH: &'static str = "/api/v1/players";
        const METHOD: HttpMethod = HttpMethod::Get;
    }

    let h = harness();
    h.api.transport().mock_response(
        &url("/api/v1/players?page=1&size=2"),
        200,
        json!({ "data": [{ "player_id": 1 }], "page": 1, "size": 2, "total": 1 }),
    );

    let page = h.api.call(&ListPlayers { page: 1, size: 2 }).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data.len(), 1);
    assert!(h.api.transport().last_request().unwrap().body.is_none());
}

#[tokio::test]
async fn test_update_profile_uses_member_path() {
    let h = harness();
    h.api.session().set(Some(signed_in("t")));
    h.api
        .transport()
        .mock_response(&url("/api/v1/members/1"), 200, json!({ "data": { "name": "Ari B" } }));

    let req = UpdateProfileRequest {
        id: 1,
        name: "Ari B".to_string(),
        email: "a@x.com".to_string(),
        phone: String::new(),
        consent_form_url: String::new(),
    };
    let patch = h.api.call(&req).await.unwrap();

    assert_eq!(patch, json!({ "name": "Ari B" }));
    let sent = h.api.transport().last_request().unwrap();
    assert_eq!(sent.method, HttpMethod::Patch);
}

// =========================================================
// 端到端场景
// =========================================================

#[tokio::test]
async fn test_login_then_expired_session() {
    let h = harness();
    h.api.transport().mock_response(
        &url("/api/v1/auth/login"),
        200,
        json!({ "token": "tok123", "user": { "id": 1, "name": "Ari", "email": "a@x.com", "role": "member" } }),
    );
    h.api
        .transport()
        .mock_response(&url("/api/v1/teams"), 401, json!({ "code": 401 }));

    let session = h
        .api
        .call(&LoginRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    h.api.session().set(Some(session));
    assert_eq!(h.api.session().token().as_deref(), Some("tok123"));

    let result = h.api.request(HttpMethod::Get, "/api/v1/teams", None, &[]).await;
    assert!(result.is_err());
    assert_eq!(h.api.session().get(), None);
}
