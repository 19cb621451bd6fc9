use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::error::{ApiError, ApiErrorKind};
use crate::components::forms::SignInInput;
use crate::notify::{Notice, use_toasts};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// 表单内展示的登录失败原因
///
/// 只有 401 视为凭据错误；403 等其他错误展示服务端返回的信息。
fn sign_in_error_message(err: &ApiError) -> String {
    match err.kind {
        ApiErrorKind::Unauthenticated => INVALID_CREDENTIALS.to_string(),
        _ => err.message().to_string(),
    }
}

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toasts = use_toasts();
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 已登录（包括刚刚登录成功）则进入首页
    Effect::new(move |_| {
        if auth.session().is_some() {
            router.navigate_to(AppRoute::auth_success_redirect());
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = SignInInput {
            email: email.get(),
            password: password.get(),
        };
        let req = match input.into_request() {
            Ok(req) => req,
            Err(msg) => {
                set_error_msg.set(Some(msg.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match login(&api, req).await {
                Ok(session) => {
                    toasts.push(Notice::success(format!("Welcome back, {}", session.user.name)));
                }
                Err(e) => set_error_msg.set(Some(sign_in_error_message(&e))),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Clubhouse"</h1>
                    <p class="text-base-content/70">"Sign in to manage your club"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@club.org"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign In".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to=AppRoute::SignUp class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
