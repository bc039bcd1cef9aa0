use dioxus::prelude::*;
use linkdeck::config::SiteConfig;

use crate::components::{AmbientBackdrop, GestureSignal, LinkList, ProfileHeader, StreamToggle};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const PAGE_CSS: &str = r#"
.backdrop-video {
    position: absolute;
    inset: 0;
    width: 100%;
    height: 100%;
    object-fit: cover;
    transition: opacity 1000ms ease-in-out;
}
@keyframes spin-vinyl {
    from { transform: rotate(0deg); }
    to { transform: rotate(360deg); }
}
.animate-spin-vinyl { animation: spin-vinyl 4s linear infinite; }
@keyframes pulse-bounce {
    0%, 100% { transform: translateX(0); opacity: 1; }
    50% { transform: translateX(6px); opacity: 0.8; }
}
.animate-pulse-bounce { animation: pulse-bounce 1.6s ease-in-out infinite; }
@keyframes rotate-and-fade {
    from { transform: rotateY(0deg); opacity: 1; }
    to { transform: rotateY(90deg); opacity: 0; }
}
.animate-rotate-and-fade { animation: rotate-and-fade 1.2s ease-in forwards; }
"#;

#[component]
pub fn App() -> Element {
    let config = use_context_provider(SiteConfig::load);
    let gestures = use_context_provider(|| GestureSignal(Signal::new(0)));

    let pool = use_hook(|| match config.media.pool() {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::warn!(%err, "backdrop disabled");
            None
        }
    });

    rsx! {
        document::Title { "{config.profile.name}" }
        document::Meta { name: "theme-color", content: "#000000" }
        document::Script { src: TAILWIND_CDN }
        style { {PAGE_CSS} }

        div {
            class: "min-h-screen text-white selection:bg-red-500/30 relative overflow-hidden",
            onclick: move |_| gestures.bump(),
            ontouchstart: move |_| gestures.bump(),
            onkeydown: move |_| gestures.bump(),

            if let Some(pool) = pool {
                AmbientBackdrop { pool, settings: config.timings.crossfade() }
            }
            StreamToggle {
                profile: config.profile.clone(),
                stream_url: config.stream_url.clone(),
                prompt_duration: config.timings.prompt_duration(),
            }
            div { class: "container mx-auto px-4 py-8 md:py-16 relative z-10",
                main { class: "max-w-xl mx-auto flex flex-col items-center pt-32",
                    ProfileHeader {
                        profile: config.profile.clone(),
                        vanish_after: config.timings.prompt_duration(),
                    }
                    LinkList {
                        links: config.links.clone(),
                        fallback_delay: config.timings.fallback_delay(),
                    }
                }
            }
        }
    }
}
