use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{AnalysisVm, TxRowVm};

#[component]
pub fn ToolsView() -> Element {
    let ctx = use_context::<AppContext>();
    let analyzer = ctx.analyzer();

    let mut input = use_signal(String::new);
    let report = use_signal(|| None::<Result<AnalysisVm, ViewError>>);
    let analyzing = use_signal(|| false);

    let run_analysis = use_callback(move |()| {
        let mut report = report;
        let mut analyzing = analyzing;
        if analyzing() {
            return;
        }
        let analyzer = analyzer.clone();
        let address = input.read().trim().to_string();
        spawn(async move {
            analyzing.set(true);
            let result = analyzer
                .analyze(&address)
                .await
                .map(|report| AnalysisVm::from(&report))
                .map_err(|err| ViewError::from_analysis(&err));
            report.set(Some(result));
            analyzing.set(false);
        });
    });

    let button_label = if analyzing() { "Analyzing..." } else { "Analyze" };
    let current = report.read().clone();

    rsx! {
        div { class: "page tools",
            h2 { "Address Analyzer" }
            p { "Paste a contract or wallet address on Base to inspect it." }
            div { class: "analyzer-form",
                input {
                    class: "input",
                    id: "analyzer-input",
                    placeholder: "0x...",
                    value: "{input}",
                    oninput: move |evt| input.set(evt.value()),
                }
                button {
                    class: "btn primary",
                    id: "analyzer-submit",
                    disabled: analyzing() || input.read().trim().is_empty(),
                    onclick: move |_| run_analysis.call(()),
                    "{button_label}"
                }
            }

            match current {
                None => rsx! {},
                Some(Err(err)) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                Some(Ok(vm)) => rsx! {
                    ReportCard { vm }
                },
            }
        }
    }
}

#[component]
fn ReportCard(vm: AnalysisVm) -> Element {
    let ctx = use_context::<AppContext>();
    let explorer_url = vm.explorer_url.clone();

    rsx! {
        section { class: "report",
            h3 { class: "mono", "{vm.address}" }
            dl {
                dt { "Type" }
                dd { "{vm.kind_label}" }
                dt { "Bytecode" }
                dd { "{vm.bytecode_label}" }
                dt { "Balance" }
                dd { "{vm.balance_label}" }
                if let Some(source) = vm.source_label.as_ref() {
                    dt { "Source" }
                    dd { "{source}" }
                }
            }

            if !vm.transactions.is_empty() {
                h4 { "Recent transactions" }
                ul { class: "tx-list",
                    for tx in vm.transactions.iter().cloned() {
                        TxRow { key: "{tx.hash}", tx }
                    }
                }
            }
            if let Some(note) = vm.transactions_note.as_ref() {
                p { class: "note", "{note}" }
            }

            button {
                class: "btn",
                onclick: move |_| ctx.open_url(&explorer_url),
                "View on BaseScan"
            }
        }
    }
}

#[component]
fn TxRow(tx: TxRowVm) -> Element {
    let status = if tx.failed { "failed" } else { "ok" };
    rsx! {
        li { class: "tx-row {status}",
            span { class: "mono", "{tx.hash}" }
            span { "{tx.direction}" }
            span { "{tx.value}" }
            span { class: "muted", "{tx.when}" }
        }
    }
}
