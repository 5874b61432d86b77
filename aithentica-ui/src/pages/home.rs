//! Home Page

use leptos::*;
use leptos_router::*;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen bg-black px-6 text-center">
            <h1 class="text-5xl md:text-6xl font-extrabold text-transparent bg-clip-text
                       bg-gradient-to-r from-amber-400 via-indigo-400 to-cyan-400 mb-6">
                "Welcome to Aithentica"
            </h1>

            <p class="text-lg md:text-xl mb-6 text-gray-300 max-w-3xl">
                "Chat with leading language models and turn prompts into images, all from one place."
            </p>
            <p class="text-md md:text-lg mb-12 text-gray-400 max-w-3xl">
                "Login or register to get started."
            </p>

            <div class="flex flex-col md:flex-row gap-6">
                <A
                    href="/login"
                    class="px-8 py-4 border-2 border-cyan-400 text-cyan-400 font-bold rounded-lg
                           hover:bg-cyan-400 hover:text-black transition"
                >
                    "Login"
                </A>
                <A
                    href="/register"
                    class="px-8 py-4 border-2 border-amber-400 text-amber-400 font-bold rounded-lg
                           hover:bg-amber-400 hover:text-black transition"
                >
                    "Register"
                </A>
            </div>
        </div>
    }
}
