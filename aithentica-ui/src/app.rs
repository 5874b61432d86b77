//! App Root Component
//!
//! Main application component with routing and the session provider.

use aithentica::{resolve, AppRoute, RouteDecision};
use leptos::*;
use leptos_router::*;

use crate::components::Loading;
use crate::pages::{Dashboard, Home, Login, Register};
use crate::state::{provide_auth, use_auth};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Starts the silent refresh; guarded routes wait for it
    provide_auth();

    view! {
        <Router>
            <main class="min-h-screen bg-gray-900 text-white">
                <Routes>
                    <Route path="/" view=Home />
                    <Route
                        path="/login"
                        view=|| view! { <Guarded route=AppRoute::Login><Login /></Guarded> }
                    />
                    <Route path="/register" view=Register />
                    <Route
                        path="/dashboard"
                        view=|| view! { <Guarded route=AppRoute::Dashboard><Dashboard /></Guarded> }
                    />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
        </Router>
    }
}

/// Renders `children` only when the session phase allows `route`
#[component]
fn Guarded(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || match resolve(route, auth.phase.get()) {
        RouteDecision::Loading => view! { <Loading /> }.into_view(),
        RouteDecision::Redirect(target) => view! { <Redirect path=target.path() /> }.into_view(),
        RouteDecision::Render(_) => children().into_view(),
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-cyan-500 hover:bg-cyan-600 text-black rounded-lg font-medium transition-colors"
            >
                "Go Home"
            </A>
        </div>
    }
}
