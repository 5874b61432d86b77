//! Dashboard Page
//!
//! Chat and image generation. Panel state lives in the `aithentica` crate;
//! this page splits each send into `begin`/`finish` around the request so no
//! signal is borrowed while it is in flight.

use aithentica::api;
use aithentica::dashboard::{
    ChatPanel, Tab, VisionPanel, EMPTY_GALLERY, EMPTY_TRANSCRIPT, PROVIDERS, VISION_MODELS,
    VISION_PROVIDER,
};
use aithentica::AppRoute;
use leptos::*;
use leptos_router::*;
use std::rc::Rc;

use crate::components::InlineLoading;
use crate::state::use_auth;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();

    let tab = create_rw_signal(Tab::Chat);
    let chat = create_rw_signal(ChatPanel::default());
    let vision = create_rw_signal(VisionPanel::default());

    // Seed the transcript on mount
    let session = Rc::clone(&auth.session);
    create_effect(move |_| {
        let session = Rc::clone(&session);
        spawn_local(async move {
            let transcript = api::chat::load_history(&session).await;
            chat.update(|c| c.transcript = transcript);
        });
    });

    let busy = Signal::derive(move || chat.with(ChatPanel::is_loading) || vision.with(VisionPanel::is_loading));

    view! {
        <div class="flex h-screen bg-gray-900 text-white">
            <Sidebar tab=tab chat=chat vision=vision />

            <div class="flex-1 flex flex-col p-4">
                {move || match tab.get() {
                    Tab::Chat => view! { <ChatView chat=chat busy=busy /> }.into_view(),
                    Tab::Vision => view! { <VisionView vision=vision busy=busy /> }.into_view(),
                }}
            </div>
        </div>
    }
}

#[component]
fn Sidebar(tab: RwSignal<Tab>, chat: RwSignal<ChatPanel>, vision: RwSignal<VisionPanel>) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let on_logout = move |_| {
        auth.logout();
        navigate(AppRoute::Login.path(), Default::default());
    };

    view! {
        <div class="w-64 bg-gray-800 p-4 flex flex-col gap-4">
            <h2 class="text-lg font-bold mb-2">"Options"</h2>

            <div class="flex gap-2 mb-4">
                <TabButton tab=tab target=Tab::Chat />
                <TabButton tab=tab target=Tab::Vision />
            </div>

            {move || match tab.get() {
                Tab::Chat => view! { <ChatOptions chat=chat /> }.into_view(),
                Tab::Vision => view! { <VisionOptions vision=vision /> }.into_view(),
            }}

            <div class="mt-auto space-y-3">
                <UsageSummary />
                <button
                    on:click=on_logout
                    class="w-full bg-red-600 hover:bg-red-700 text-white p-2 rounded"
                >
                    "Logout"
                </button>
            </div>
        </div>
    }
}

#[component]
fn TabButton(tab: RwSignal<Tab>, target: Tab) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=move |_| tab.set(target)
            class=move || {
                if tab.get() == target {
                    "flex-1 p-2 rounded bg-blue-600"
                } else {
                    "flex-1 p-2 rounded bg-gray-700"
                }
            }
        >
            {target.label()}
        </button>
    }
}

#[component]
fn ChatOptions(chat: RwSignal<ChatPanel>) -> impl IntoView {
    let on_provider = move |ev: web_sys::Event| {
        let provider = event_target_value(&ev);
        chat.update(|c| {
            if let Err(e) = c.selection.select_provider(&provider) {
                web_sys::console::error_1(&e.to_string().into());
            }
        });
    };

    let on_model = move |ev: web_sys::Event| {
        let model = event_target_value(&ev);
        chat.update(|c| {
            if let Err(e) = c.selection.select_model(&model) {
                web_sys::console::error_1(&e.to_string().into());
            }
        });
    };

    view! {
        <label>
            "Provider"
            <select
                on:change=on_provider
                prop:value=move || chat.with(|c| c.selection.provider())
                class=SELECT_CLASS
            >
                {PROVIDERS
                    .iter()
                    .map(|(name, _)| view! { <option value=*name>{*name}</option> })
                    .collect_view()}
            </select>
        </label>

        <label>
            "Model"
            <select
                on:change=on_model
                prop:value=move || chat.with(|c| c.selection.model())
                class=SELECT_CLASS
            >
                {move || {
                    chat.with(|c| c.selection.models())
                        .iter()
                        .map(|model| {
                            let selected = chat.with(|c| c.selection.model() == *model);
                            view! { <option value=*model selected=selected>{*model}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </label>
    }
}

#[component]
fn VisionOptions(vision: RwSignal<VisionPanel>) -> impl IntoView {
    let on_model = move |ev: web_sys::Event| {
        let model = event_target_value(&ev);
        vision.update(|v| {
            if let Err(e) = v.select_model(&model) {
                web_sys::console::error_1(&e.to_string().into());
            }
        });
    };

    view! {
        <label class="block">
            "Provider"
            <select class=SELECT_CLASS>
                <option value=VISION_PROVIDER>{VISION_PROVIDER}</option>
            </select>
        </label>

        <label class="block">
            "Model"
            <select
                on:change=on_model
                prop:value=move || vision.with(|v| v.model())
                class=SELECT_CLASS
            >
                {VISION_MODELS
                    .iter()
                    .map(|model| view! { <option value=*model>{*model}</option> })
                    .collect_view()}
            </select>
        </label>
    }
}

const SELECT_CLASS: &str = "w-full mt-1 p-1 rounded bg-gray-700 text-white";

/// Signed-in user and cumulative token usage
#[component]
fn UsageSummary() -> impl IntoView {
    let auth = use_auth();

    move || {
        auth.user.get().map(|user| {
            let usage = user.token_usage;
            view! {
                <div class="text-sm text-gray-400 space-y-1">
                    <p class="text-white font-semibold">{user.username}</p>
                    <p>{format!("Tokens used: {}", usage.total_tokens)}</p>
                    <p class="text-xs">
                        {format!("prompt {} / completion {}", usage.prompt_tokens, usage.completion_tokens)}
                    </p>
                </div>
            }
        })
    }
}

#[component]
fn ChatView(chat: RwSignal<ChatPanel>, busy: Signal<bool>) -> impl IntoView {
    let auth = use_auth();
    let chat_end = create_node_ref::<html::Div>();

    // Keep the newest entry in view
    create_effect(move |_| {
        chat.track();
        if let Some(end) = chat_end.get() {
            end.scroll_into_view();
        }
    });

    let on_send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(message) = chat.try_update(ChatPanel::begin).flatten() else {
            return;
        };
        let selection = chat.with_untracked(|c| c.selection);
        let session = Rc::clone(&auth.session);
        spawn_local(async move {
            let result = api::chat::ask(&session, &selection, &message).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Chat request failed: {}", e).into());
            }
            chat.update(|c| c.finish(&result));
        });
    };

    view! {
        <h1 class="text-2xl mb-4">"Chat with AI"</h1>
        <div class="flex-1 border border-gray-700 rounded p-4 overflow-y-auto mb-4 bg-gray-950">
            {move || chat.with(|c| {
                if c.transcript.is_empty() {
                    return view! { <p class="text-gray-400">{EMPTY_TRANSCRIPT}</p> }.into_view();
                }
                c.transcript
                    .messages()
                    .iter()
                    .enumerate()
                    .map(|(i, message)| {
                        let response = c.transcript.response_text(i, c.is_loading()).to_string();
                        view! {
                            <div class="mb-4 flex flex-col w-full">
                                <div class="flex justify-end w-full">
                                    <div class="bg-blue-600 p-2 rounded-l-lg rounded-br-lg max-w-[70%] break-words">
                                        {message.user_message.clone()}
                                    </div>
                                </div>
                                <div class="flex justify-start w-full mt-1">
                                    <div class="bg-gray-700 p-2 rounded-r-lg rounded-bl-lg max-w-[70%] break-words whitespace-pre-wrap">
                                        {response}
                                    </div>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()
            })}
            <div node_ref=chat_end />
        </div>

        <form on:submit=on_send class="flex gap-2">
            <input
                class=INPUT_CLASS
                placeholder="Type a message..."
                prop:value=move || chat.with(|c| c.input.clone())
                on:input=move |ev| chat.update(|c| c.input = event_target_value(&ev))
            />
            <button
                type="submit"
                disabled=move || busy.get()
                class="bg-blue-600 px-4 rounded disabled:opacity-50 flex items-center gap-2"
            >
                {move || busy.get().then(|| view! { <InlineLoading /> })}
                "Send"
            </button>
        </form>
    }
}

#[component]
fn VisionView(vision: RwSignal<VisionPanel>, busy: Signal<bool>) -> impl IntoView {
    let auth = use_auth();

    let on_generate = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(request) = vision.try_update(|v| v.begin(None)).flatten() else {
            return;
        };
        let session = Rc::clone(&auth.session);
        spawn_local(async move {
            let result = api::vision::generate(&session, &request).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Vision error: {}", e).into());
            }
            vision.update(|v| v.finish(&result));
        });
    };

    view! {
        <h1 class="text-2xl mb-4">"Generate Images"</h1>
        <div class="flex-1 border border-gray-700 rounded p-4 overflow-y-auto mb-4 bg-gray-950">
            {move || vision.with(|v| v.gallery.is_empty().then(|| view! {
                <p class="text-gray-400">{EMPTY_GALLERY}</p>
            }))}
            <div class="grid grid-cols-2 gap-4">
                {move || vision.with(|v| {
                    v.gallery
                        .images()
                        .iter()
                        .map(|url| view! {
                            <img src=url.clone() alt="Generated" class="rounded-lg border border-gray-700" />
                        })
                        .collect_view()
                })}
            </div>
        </div>

        <form on:submit=on_generate class="flex gap-2">
            <input
                class=INPUT_CLASS
                placeholder="Describe the image you want..."
                prop:value=move || vision.with(|v| v.prompt.clone())
                on:input=move |ev| vision.update(|v| v.prompt = event_target_value(&ev))
            />
            <button
                type="submit"
                disabled=move || busy.get()
                class="bg-green-600 px-4 rounded disabled:opacity-50 flex items-center gap-2"
            >
                {move || busy.get().then(|| view! { <InlineLoading /> })}
                "Generate"
            </button>
        </form>
    }
}

const INPUT_CLASS: &str = "flex-1 p-2 rounded bg-gray-800 border border-gray-600 \
                           focus:outline-none focus:border-blue-500";
