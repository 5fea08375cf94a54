use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Render-ready copy of the quiz state, so the signal guard is not held in `rsx!`.
#[derive(Clone, Debug, PartialEq)]
struct QuizSnapshot {
    title: String,
    summary: String,
    question: Option<String>,
    options: Vec<String>,
    progress: String,
    misses: String,
    feedback: Option<&'static str>,
    finished: bool,
    recorded: bool,
    verdict: Option<&'static str>,
    record_message: Option<String>,
}

impl QuizSnapshot {
    fn from_vm(vm: &QuizVm) -> Self {
        Self {
            title: vm.case_title().to_string(),
            summary: vm.case_summary().to_string(),
            question: vm.question_text().map(str::to_string),
            options: vm.options().to_vec(),
            progress: vm.progress_label(),
            misses: vm.misses_label(),
            feedback: vm.feedback().map(|feedback| feedback.message()),
            finished: vm.is_finished(),
            recorded: vm.is_recorded(),
            verdict: vm.verdict_label(),
            record_message: vm.record_message(),
        }
    }
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let case_id = ctx.case_id();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);
    let recording = use_signal(|| false);
    // Shown while the vm is out of its signal for an on-chain write.
    let held = use_signal(|| None::<QuizSnapshot>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut error = error;
        let mut vm = vm;

        async move {
            let started = start_quiz(&quiz_loop, case_id).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let mut error = error;
            let mut vm = vm;
            let mut recording = recording;
            let mut held = held;

            match intent {
                QuizIntent::Select(index) => {
                    let result = vm
                        .write()
                        .as_mut()
                        .map_or(Err(ViewError::Unknown), |vm| vm.select(&quiz_loop, index));
                    error.set(result.err());
                }
                QuizIntent::Restart => {
                    let result = vm
                        .write()
                        .as_mut()
                        .map_or(Err(ViewError::Unknown), |vm| vm.restart(&quiz_loop));
                    error.set(result.err());
                }
                QuizIntent::Record => {
                    if recording() {
                        return;
                    }
                    let quiz_loop = quiz_loop.clone();
                    spawn(async move {
                        recording.set(true);
                        let local_vm = {
                            let mut guard = vm.write();
                            guard.take()
                        };
                        let Some(mut vm_value) = local_vm else {
                            recording.set(false);
                            error.set(Some(ViewError::Unknown));
                            return;
                        };
                        held.set(Some(QuizSnapshot::from_vm(&vm_value)));

                        // The failure is kept on the vm and shown as its record message.
                        let _ = vm_value.record(&quiz_loop).await;

                        {
                            let mut guard = vm.write();
                            *guard = Some(vm_value);
                        }
                        held.set(None);
                        recording.set(false);
                    });
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let on_retry = {
        let mut resource = resource;
        use_callback(move |()| resource.restart())
    };

    let snapshot = vm
        .read()
        .as_ref()
        .map(QuizSnapshot::from_vm)
        .or_else(|| held.read().clone());
    let is_recording = recording();
    let action_error = *error.read();

    rsx! {
        div { class: "page quiz",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Opening the case file..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error",
                        p { "{err.message()}" }
                        button { class: "btn", onclick: move |_| on_retry.call(()), "Retry" }
                    }
                },
                ViewState::Ready(()) => match snapshot {
                    None => rsx! {
                        p { "Opening the case file..." }
                    },
                    Some(quiz) => rsx! {
                        header { class: "case-header",
                            h2 { "{quiz.title}" }
                            if !quiz.summary.is_empty() {
                                p { class: "case-summary", "{quiz.summary}" }
                            }
                            div { class: "case-meta",
                                span { class: "progress", "{quiz.progress}" }
                                span { class: "misses", "{quiz.misses}" }
                            }
                        }

                        if quiz.finished {
                            ResultCard {
                                verdict: quiz.verdict.unwrap_or("Case Closed"),
                                misses: quiz.misses.clone(),
                                recorded: quiz.recorded,
                                recording: is_recording,
                                record_message: quiz.record_message.clone().unwrap_or_default(),
                                on_intent: dispatch_intent,
                            }
                        } else {
                            section { class: "question",
                                if let Some(question) = quiz.question.as_ref() {
                                    h3 { "{question}" }
                                }
                                div { class: "options",
                                    for (index, option) in quiz.options.iter().enumerate() {
                                        button {
                                            key: "{index}",
                                            class: "btn option",
                                            id: "quiz-option-{index}",
                                            onclick: move |_| dispatch_intent.call(QuizIntent::Select(index)),
                                            "{option}"
                                        }
                                    }
                                }
                                if let Some(feedback) = quiz.feedback {
                                    p { class: "feedback", "{feedback}" }
                                }
                            }
                        }

                        if let Some(err) = action_error {
                            p { class: "error", "{err.message()}" }
                        }
                    },
                },
            }
        }
    }
}

#[component]
fn ResultCard(
    verdict: &'static str,
    misses: String,
    recorded: bool,
    recording: bool,
    record_message: String,
    on_intent: Callback<QuizIntent>,
) -> Element {
    let record_label = if recording {
        "Recording..."
    } else {
        "Record on-chain"
    };

    rsx! {
        section { class: "result-card",
            h3 { "{verdict}" }
            p { "{misses}" }
            div { class: "result-actions",
                if !recorded {
                    button {
                        class: "btn primary",
                        id: "quiz-record",
                        disabled: recording,
                        onclick: move |_| on_intent.call(QuizIntent::Record),
                        "{record_label}"
                    }
                }
                button {
                    class: "btn",
                    id: "quiz-restart",
                    disabled: recording,
                    onclick: move |_| on_intent.call(QuizIntent::Restart),
                    "Try again"
                }
            }
            if recording {
                p { class: "record-message pending", "⏳ Recording result on-chain..." }
            } else if !record_message.is_empty() {
                p { class: "record-message", "{record_message}" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
