//! 受保护的管理板块外壳
//!
//! 具体的增删改查页面由其他模块提供，这里只负责标题和按角色给出的权限提示。

use crate::auth::use_auth;
use crate::web::route::AppRoute;
use clubhouse_shared::{Capability, MemberType};
use leptos::prelude::*;

fn description(route: AppRoute) -> &'static str {
    match route {
        AppRoute::Teams => "Teams, coaches and rosters.",
        AppRoute::Players => "Registered players and their details.",
        AppRoute::Trainings => "Training sessions and attendance.",
        AppRoute::Tournaments => "Tournaments, fixtures and results.",
        AppRoute::ConsentForms => "Parental consent forms.",
        AppRoute::Notifications => "Announcements sent to members.",
        _ => "",
    }
}

/// 当前角色在某个板块中的权限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SectionAccess {
    manage: bool,
    sign_consents: bool,
}

fn section_access(route: AppRoute, member_type: Option<MemberType>) -> SectionAccess {
    let Some(member_type) = member_type else {
        return SectionAccess::default();
    };
    SectionAccess {
        manage: route
            .manage_capability()
            .is_some_and(|c| member_type.allows(c)),
        sign_consents: route == AppRoute::ConsentForms
            && member_type.allows(Capability::SignConsents),
    }
}

/// 板块外壳：标题与权限说明，没有可点击的操作
#[component]
pub fn SectionPage(route: AppRoute) -> impl IntoView {
    let auth = use_auth();

    let access = move || section_access(route, auth.member_type());

    view! {
        <div class="max-w-5xl mx-auto p-6">
            <div class="flex items-center justify-between mb-2">
                <h1 class="text-2xl font-bold">{route.title()}</h1>
                <div class="flex gap-2">
                    <Show when=move || access().sign_consents>
                        <span class="badge badge-secondary">"You can sign consent forms"</span>
                    </Show>
                    {move || if access().manage {
                        view! { <span class="badge badge-primary">"Can manage"</span> }.into_any()
                    } else {
                        view! { <span class="badge badge-ghost">"Read only"</span> }.into_any()
                    }}
                </div>
            </div>
            <p class="text-base-content/70 mb-4">{description(route)}</p>

            <Show when=move || !access().manage>
                <div role="alert" class="alert alert-info text-sm">
                    <span>"Your role has read-only access to this section."</span>
                </div>
            </Show>
        </div>
    }
}
