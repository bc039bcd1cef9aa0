use dioxus::prelude::*;
use linkdeck::config::Profile;
use std::time::Duration;

use crate::components::browser;

/// Name and bio. After `vanish_after` the heading spins away for good.
#[component]
pub fn ProfileHeader(profile: Profile, vanish_after: Duration) -> Element {
    let mut vanishing = use_signal(|| false);

    use_effect(move || {
        spawn(async move {
            browser::sleep(vanish_after).await;
            vanishing.set(true);
        });
    });

    let motion = if vanishing() { "animate-rotate-and-fade" } else { "" };

    rsx! {
        div { style: "perspective: 1000px;",
            h1 { class: "text-4xl md:text-5xl font-bold text-center mb-2 {motion}", "{profile.name}" }
            p { class: "text-lg text-gray-300 text-center mb-8 {motion}", "{profile.bio}" }
        }
    }
}
