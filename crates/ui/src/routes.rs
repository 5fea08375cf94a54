use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AboutView, HomeView, LeaderboardView, PlaygroundView, ToolsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/leaderboard", LeaderboardView)] Leaderboard {},
        #[route("/tools", ToolsView)] Tools {},
        #[route("/playground", PlaygroundView)] Playground {},
        #[route("/about", AboutView)] About {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Base Detective" }
            ul {
                li { Link { to: Route::Home {}, "Case File" } }
                li { Link { to: Route::Leaderboard {}, "Leaderboard" } }
                li { Link { to: Route::Tools {}, "Tools" } }
                li { Link { to: Route::Playground {}, "Playground" } }
                li { Link { to: Route::About {}, "About" } }
            }
        }
    }
}
