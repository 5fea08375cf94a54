use dioxus::prelude::*;

use crate::context::AppContext;

#[component]
pub fn AboutView() -> Element {
    let ctx = use_context::<AppContext>();
    let case_id = ctx.case_id();

    rsx! {
        div { class: "page about",
            h2 { "About Base Detective" }
            p {
                "Base Detective is an onchain investigation game. Work through a case file, "
                "answer each question about the evidence, and close the case."
            }
            p {
                "Answers are shuffled from a per-run seed. A wrong guess never moves you "
                "forward; it only adds to your tally, and your verdict depends on that tally."
            }
            p {
                "When the case is closed you can record the result on Base. If the contract "
                "has no record of you starting the case, the app opens it for you and records again."
            }
            p { class: "case-meta", "Active case: #{case_id}" }
            ul {
                li { "Leaderboard: detectives ranked by cases closed onchain." }
                li { "Tools: inspect any address for bytecode, balance and explorer data." }
                li { "Playground: practice security scenarios without touching the chain." }
            }
        }
    }
}
