use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PlaygroundVm, next_practice};

#[component]
pub fn PlaygroundView() -> Element {
    let ctx = use_context::<AppContext>();
    let playground = ctx.playground();

    let vm = use_signal(|| None::<PlaygroundVm>);
    let error = use_signal(|| None::<ViewError>);

    let playground_for_resource = playground.clone();
    let resource = use_resource(move || {
        let playground = playground_for_resource.clone();
        let mut vm = vm;
        async move {
            let round = next_practice(&playground, None).await?;
            vm.set(Some(round));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let on_select = use_callback(move |index: usize| {
        let mut vm = vm;
        let mut error = error;
        let result = vm
            .write()
            .as_mut()
            .map_or(Err(ViewError::Unknown), |vm| vm.select(index));
        error.set(result.err());
    });

    let on_next = use_callback(move |()| {
        let playground = playground.clone();
        let mut vm = vm;
        let mut error = error;
        let current = vm.read().as_ref().map(PlaygroundVm::challenge_id);
        spawn(async move {
            match next_practice(&playground, current).await {
                Ok(round) => {
                    vm.set(Some(round));
                    error.set(None);
                }
                Err(err) => error.set(Some(err)),
            }
        });
    });

    let round = vm.read().clone();
    let action_error = *error.read();

    rsx! {
        div { class: "page playground",
            h2 { "Security Playground" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading a challenge..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(()) => match round {
                    None => rsx! {
                        p { "Loading a challenge..." }
                    },
                    Some(round) => rsx! {
                        section { class: "challenge",
                            header {
                                h3 { "{round.title()}" }
                                span { class: "badge", "{round.difficulty_label()}" }
                            }
                            p { "{round.description()}" }
                            h4 { "{round.question()}" }
                            div { class: "options",
                                for (index, option) in round.options().iter().enumerate() {
                                    button {
                                        key: "{index}",
                                        class: option_class(round.selected(), index),
                                        disabled: round.is_solved(),
                                        onclick: move |_| on_select.call(index),
                                        "{option}"
                                    }
                                }
                            }
                            if let Some(feedback) = round.feedback() {
                                p { class: "feedback", "{feedback}" }
                            }
                            if let Some(explanation) = round.explanation() {
                                p { class: "explanation", "{explanation}" }
                            }
                            button { class: "btn primary", onclick: move |_| on_next.call(()), "Next challenge" }
                        }
                    },
                },
            }

            if let Some(err) = action_error {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}

fn option_class(selected: Option<usize>, index: usize) -> &'static str {
    if selected == Some(index) {
        "btn option selected"
    } else {
        "btn option"
    }
}
