use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LeaderboardRowVm, map_leaderboard_rows};

#[component]
pub fn LeaderboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let leaderboard = ctx.leaderboard();

    let resource = use_resource(move || {
        let leaderboard = leaderboard.clone();
        async move {
            let entries = leaderboard
                .load()
                .await
                .map_err(|err| ViewError::from_chain(&err))?;
            Ok::<_, ViewError>(map_leaderboard_rows(&entries))
        }
    });

    let state = view_state_from_resource(&resource);
    let on_refresh = {
        let mut resource = resource;
        use_callback(move |()| resource.restart())
    };

    rsx! {
        div { class: "page",
            header { class: "page-header",
                h2 { "Leaderboard" }
                button { class: "btn", onclick: move |_| on_refresh.call(()), "Refresh" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading detectives..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No cases closed yet. Be the first detective on the board." }
                    } else {
                        ol { class: "leaderboard",
                            for row in rows {
                                LeaderboardRow { key: "{row.rank}", row }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn LeaderboardRow(row: LeaderboardRowVm) -> Element {
    let name_class = if row.has_handle { "name handle" } else { "name" };
    rsx! {
        li { class: "leaderboard-row",
            span { class: "rank", "#{row.rank}" }
            span { class: name_class, title: "{row.address}", "{row.name}" }
            span { class: "cases", "{row.cases_label}" }
        }
    }
}
