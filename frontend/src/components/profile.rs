use crate::api::use_api;
use crate::auth::{update_profile, use_auth};
use crate::components::forms::ProfileInput;
use crate::notify::{Notice, use_toasts};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let api = use_api();

    // 守卫保证此处有会话；会话消失时路由会立即跳走
    let initial = auth
        .store()
        .get()
        .map(|s| ProfileInput::from_user(&s.user))
        .unwrap_or_default();

    let name = RwSignal::new(initial.name);
    let email = RwSignal::new(initial.email);
    let phone = RwSignal::new(initial.phone);
    let consent_form_url = RwSignal::new(initial.consent_form_url);
    let (is_saving, set_is_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = auth.store().get().map(|s| s.user.id) else {
            return;
        };
        let input = ProfileInput {
            name: name.get(),
            email: email.get(),
            phone: phone.get(),
            consent_form_url: consent_form_url.get(),
        };
        let req = match input.into_request(user_id) {
            Ok(req) => req,
            Err(msg) => {
                set_error_msg.set(Some(msg.to_string()));
                return;
            }
        };

        set_is_saving.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match update_profile(&api, req).await {
                Ok(_) => toasts.push(Notice::success("Profile updated")),
                Err(e) => set_error_msg.set(Some(e.message().to_string())),
            }
            set_is_saving.set(false);
        });
    };

    let role_label = move || {
        auth.member_type()
            .map(|t| t.label())
            .unwrap_or_default()
    };
    let needs_consent = move || auth.member_type().is_some_and(|t| t.is_restricted());

    view! {
        <div class="max-w-2xl mx-auto p-6">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"My Profile"</h1>
                <span class="badge badge-outline">{role_label}</span>
            </div>

            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_submit>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label" for="profile-name">
                            <span class="label-text">"Name"</span>
                        </label>
                        <input
                            id="profile-name"
                            type="text"
                            on:input=move |ev| name.set(event_target_value(&ev))
                            prop:value=name
                            class="input input-bordered"
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="profile-email">
                            <span class="label-text">"Email"</span>
                        </label>
                        <input
                            id="profile-email"
                            type="email"
                            on:input=move |ev| email.set(event_target_value(&ev))
                            prop:value=email
                            class="input input-bordered"
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="profile-phone">
                            <span class="label-text">"Phone"</span>
                        </label>
                        <input
                            id="profile-phone"
                            type="tel"
                            on:input=move |ev| phone.set(event_target_value(&ev))
                            prop:value=phone
                            class="input input-bordered"
                        />
                    </div>
                    <Show when=needs_consent>
                        <div class="form-control">
                            <label class="label" for="profile-consent">
                                <span class="label-text">"Signed consent form (URL)"</span>
                            </label>
                            <input
                                id="profile-consent"
                                type="url"
                                on:input=move |ev| consent_form_url.set(event_target_value(&ev))
                                prop:value=consent_form_url
                                class="input input-bordered"
                            />
                        </div>
                    </Show>

                    <div class="card-actions justify-end mt-4">
                        <button class="btn btn-primary" disabled=move || is_saving.get()>
                            {move || if is_saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
