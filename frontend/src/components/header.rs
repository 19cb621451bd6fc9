use crate::auth::{logout, use_auth};
use crate::notify::{Notice, use_toasts};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

/// 顶部导航栏，仅在有会话时显示
#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();

    let user_name = move || auth.session().map(|s| s.user.name).unwrap_or_default();

    // 跳转到登录页由路由服务的会话监听完成
    let on_logout = move |_| {
        logout(&auth.store());
        toasts.push(Notice::info("Signed out"));
    };

    view! {
        <Show when=move || auth.session().is_some()>
            <div class="navbar bg-base-100 shadow-sm px-4">
                <div class="flex-1 gap-2">
                    <Link to=AppRoute::Home class="btn btn-ghost text-xl">"Clubhouse"</Link>
                    <ul class="menu menu-horizontal px-1 hidden lg:flex">
                        {AppRoute::SECTIONS
                            .into_iter()
                            .map(|route| view! {
                                <li><Link to=route>{route.title()}</Link></li>
                            })
                            .collect_view()}
                    </ul>
                </div>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::Profile class="btn btn-ghost btn-sm">{user_name}</Link>
                    <button class="btn btn-outline btn-sm" on:click=on_logout>"Sign out"</button>
                </div>
            </div>
        </Show>
    }
}
