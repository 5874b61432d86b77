//! Register Page

use aithentica::api::{auth, FieldErrors, GENERAL_FIELD};
use aithentica::forms::{registration_errors, RegisterForm};
use aithentica::AppRoute;
use leptos::*;
use leptos_router::*;
use std::rc::Rc;

use crate::state::use_auth;

#[component]
pub fn Register() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let form = create_rw_signal(RegisterForm::default());
    let errors = create_rw_signal(FieldErrors::default());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        errors.set(FieldErrors::default());

        let request = match form.with(RegisterForm::validate) {
            Ok(request) => request,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };

        set_submitting.set(true);
        let session = Rc::clone(&auth.session);
        let navigate = navigate.clone();
        spawn_local(async move {
            match auth::register(session.backend(), &request).await {
                Ok(user) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&auth::welcome_message(&user));
                    }
                    navigate(AppRoute::Login.path(), Default::default());
                }
                Err(e) => errors.set(registration_errors(&e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-black">
            <form
                on:submit=on_submit
                class="flex flex-col gap-4 bg-gray-900 border border-amber-400 rounded-2xl p-10 shadow-xl w-80 md:w-96"
            >
                <h2 class="text-3xl font-extrabold text-center text-amber-400">"Register"</h2>

                <FieldError errors=errors field=GENERAL_FIELD />

                <input
                    type="text"
                    placeholder="Username"
                    on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <FieldError errors=errors field="username" />

                <input
                    type="email"
                    placeholder="Email"
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <FieldError errors=errors field="email" />

                <input
                    type="password"
                    placeholder="Password"
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <FieldError errors=errors field="password" />

                <input
                    type="password"
                    placeholder="Confirm Password"
                    on:input=move |ev| form.update(|f| f.password2 = event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <FieldError errors=errors field="password2" />

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="bg-amber-400 text-black font-bold p-3 rounded-lg hover:bg-amber-500
                           disabled:opacity-50 transition"
                >
                    "Register"
                </button>

                <p class="text-gray-400 text-center">
                    "Already have an account? "
                    <A href="/login" class="text-amber-400 hover:underline">"Login"</A>
                </p>
            </form>
        </div>
    }
}

const INPUT_CLASS: &str = "border border-gray-600 bg-transparent p-3 rounded-lg text-white \
                           placeholder-gray-400 focus:outline-none focus:border-amber-400";

#[component]
fn FieldError(errors: RwSignal<FieldErrors>, field: &'static str) -> impl IntoView {
    move || {
        errors
            .with(|errors| errors.get(field).map(str::to_string))
            .map(|message| view! { <p class="text-red-500">{message}</p> })
    }
}
