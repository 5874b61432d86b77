//! Login Page

use aithentica::forms::{login_error_message, LoginForm};
use aithentica::AppRoute;
use leptos::*;
use leptos_router::*;
use std::rc::Rc;

use crate::state::use_auth;

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);

        let form = LoginForm {
            username: username.get(),
            password: password.get(),
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(message) => {
                set_error.set(Some(message));
                return;
            }
        };

        set_submitting.set(true);
        let session = Rc::clone(&auth.session);
        let navigate = navigate.clone();
        spawn_local(async move {
            match session.login(&request).await {
                Ok(_) => navigate(AppRoute::Dashboard.path(), Default::default()),
                Err(e) => set_error.set(Some(login_error_message(&e))),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-black">
            <form
                on:submit=on_submit
                class="flex flex-col gap-6 bg-gray-900 border border-cyan-400 rounded-2xl p-10 shadow-xl w-80 md:w-96"
            >
                <h2 class="text-3xl font-extrabold text-center text-cyan-400">"Login"</h2>

                {move || error.get().map(|message| view! {
                    <p class="text-red-500 text-center font-semibold">{message}</p>
                })}

                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                    class="border border-gray-600 bg-transparent p-3 rounded-lg text-white
                           placeholder-gray-400 focus:outline-none focus:border-cyan-400"
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    class="border border-gray-600 bg-transparent p-3 rounded-lg text-white
                           placeholder-gray-400 focus:outline-none focus:border-amber-400"
                />

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="bg-cyan-400 text-black font-bold p-3 rounded-lg hover:bg-amber-500
                           disabled:opacity-50 transition"
                >
                    "Login"
                </button>

                <p class="text-gray-400 text-center">
                    "Don't have an account? "
                    <A href="/register" class="text-amber-400 hover:underline">"Register"</A>
                </p>
            </form>
        </div>
    }
}
