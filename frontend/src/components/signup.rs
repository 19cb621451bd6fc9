use crate::api::use_api;
use crate::auth::{register, use_auth};
use crate::components::forms::SignUpInput;
use crate::notify::{Notice, use_toasts};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use clubhouse_shared::MemberType;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 注册表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，可以直接传入各个闭包。
#[derive(Clone, Copy)]
struct SignUpForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    confirm_password: RwSignal<String>,
    member_type: RwSignal<MemberType>,
    phone: RwSignal<String>,
    date_of_birth: RwSignal<String>,
    // 教练
    contact_info: RwSignal<String>,
    team_name: RwSignal<String>,
    // 球员
    position: RwSignal<String>,
    skill_level: RwSignal<String>,
}

impl SignUpForm {
    fn new() -> Self {
        let defaults = SignUpInput::default();
        Self {
            name: RwSignal::new(defaults.name),
            email: RwSignal::new(defaults.email),
            password: RwSignal::new(defaults.password),
            confirm_password: RwSignal::new(defaults.confirm_password),
            member_type: RwSignal::new(defaults.member_type),
            phone: RwSignal::new(defaults.phone),
            date_of_birth: RwSignal::new(defaults.date_of_birth),
            contact_info: RwSignal::new(defaults.contact_info),
            team_name: RwSignal::new(defaults.team_name),
            position: RwSignal::new(defaults.position),
            skill_level: RwSignal::new(defaults.skill_level),
        }
    }

    fn snapshot(&self) -> SignUpInput {
        SignUpInput {
            name: self.name.get(),
            email: self.email.get(),
            password: self.password.get(),
            confirm_password: self.confirm_password.get(),
            member_type: self.member_type.get(),
            phone: self.phone.get(),
            date_of_birth: self.date_of_birth.get(),
            contact_info: self.contact_info.get(),
            team_name: self.team_name.get(),
            position: self.position.get(),
            skill_level: self.skill_level.get(),
        }
    }
}

/// 带标签的文本输入框
#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
            />
        </div>
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toasts = use_toasts();
    let api = use_api();

    let form = SignUpForm::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    Effect::new(move |_| {
        if auth.session().is_some() {
            router.navigate_to(AppRoute::auth_success_redirect());
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = match form.snapshot().into_request() {
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
            match register(&api, req).await {
                Ok(_) => toasts.push(Notice::success("Account created")),
                Err(e) => set_error_msg.set(Some(e.message().to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let is_coach = move || form.member_type.get() == MemberType::Coach;
    let is_player = move || form.member_type.get() == MemberType::Player;

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create an account"</h1>
                    <p class="text-base-content/70">"Join your club on Clubhouse"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <TextField id="name" label="Full name" value=form.name />
                        <TextField id="email" label="Email" value=form.email input_type="email" placeholder="you@club.org" />
                        <TextField id="password" label="Password" value=form.password input_type="password" />
                        <TextField id="confirm" label="Confirm password" value=form.confirm_password input_type="password" />

                        <div class="form-control">
                            <label class="label" for="member-type">
                                <span class="label-text">"I am a"</span>
                            </label>
                            <select
                                id="member-type"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    if let Some(t) = MemberType::parse(&event_target_value(&ev)) {
                                        form.member_type.set(t);
                                    }
                                }
                            >
                                {MemberType::ALL
                                    .into_iter()
                                    .map(|t| view! {
                                        <option value=t.as_str() selected=move || form.member_type.get() == t>
                                            {t.label()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <TextField id="phone" label="Phone (optional)" value=form.phone />
                        <TextField id="dob" label="Date of birth (optional)" value=form.date_of_birth input_type="date" placeholder="YYYY-MM-DD" />

                        <Show when=is_coach>
                            <TextField id="contact" label="Contact info" value=form.contact_info />
                            <TextField id="team" label="Team name" value=form.team_name />
                        </Show>
                        <Show when=is_player>
                            <TextField id="position" label="Position" value=form.position />
                            <TextField id="skill" label="Skill level" value=form.skill_level />
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Sign Up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to=AppRoute::SignIn class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
