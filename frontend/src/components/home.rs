use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    let greeting = move || {
        auth.session()
            .map(|s| format!("Welcome, {}", s.user.name))
            .unwrap_or_default()
    };
    let role = move || auth.member_type().map(|t| t.label()).unwrap_or_default();

    view! {
        <div class="max-w-5xl mx-auto p-6">
            <h1 class="text-3xl font-bold">{greeting}</h1>
            <p class="text-base-content/70 mb-6">"Signed in as " {role}</p>

            <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                {AppRoute::SECTIONS
                    .into_iter()
                    .map(|route| view! {
                        <Link to=route class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                            <div class="card-body">
                                <h2 class="card-title">{route.title()}</h2>
                            </div>
                        </Link>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
