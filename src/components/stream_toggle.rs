//! Live stream toggle. The avatar doubles as the play button, with a short
//! lived hint next to it until the visitor either plays or the hint expires.

use dioxus::prelude::*;
use linkdeck::config::Profile;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

use crate::components::browser;

const STREAM_ELEMENT_ID: &str = "linkdeck-stream";

#[cfg(target_arch = "wasm32")]
fn stream_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;
    document
        .get_element_by_id(STREAM_ELEMENT_ID)?
        .dyn_into::<HtmlAudioElement>()
        .ok()
}

#[cfg(target_arch = "wasm32")]
async fn play_stream() -> Result<(), String> {
    let audio = stream_element().ok_or_else(|| "stream element missing".to_string())?;
    let promise = audio.play().map_err(|err| format!("{err:?}"))?;
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|err| format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
fn pause_stream() {
    if let Some(audio) = stream_element() {
        let _ = audio.pause();
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn play_stream() -> Result<(), String> {
    let script = format!(
        r#"return (async function () {{
            const audio = document.getElementById("{STREAM_ELEMENT_ID}");
            if (!audio) return "stream element missing";
            try {{
                await audio.play();
                return "";
            }} catch (err) {{
                return String((err && err.name) || err);
            }}
        }})();"#
    );
    match document::eval(&script).join::<String>().await {
        Ok(error) if error.is_empty() => Ok(()),
        Ok(error) => Err(error),
        Err(err) => Err(format!("{err:?}")),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn pause_stream() {
    let script = format!(
        r#"(function () {{
            const audio = document.getElementById("{STREAM_ELEMENT_ID}");
            if (audio) audio.pause();
            return true;
        }})();"#
    );
    let _ = document::eval(&script);
}

#[component]
pub fn StreamToggle(profile: Profile, stream_url: String, prompt_duration: Duration) -> Element {
    let mut playing = use_signal(|| false);
    let mut prompt_visible = use_signal(|| true);

    use_effect(move || {
        spawn(async move {
            browser::sleep(prompt_duration).await;
            prompt_visible.set(false);
        });
    });

    use_drop(pause_stream);

    let toggle = move |_: MouseEvent| {
        if playing() {
            pause_stream();
            playing.set(false);
            return;
        }
        spawn(async move {
            match play_stream().await {
                Ok(()) => playing.set(true),
                Err(err) => {
                    tracing::warn!(%err, "live stream playback failed");
                    playing.set(false);
                }
            }
        });
    };

    let is_playing = playing();
    let label = if is_playing { "Pause music" } else { "Play music" };
    let avatar_class = if is_playing {
        "w-full h-full rounded-full object-cover transition-opacity duration-300 animate-spin-vinyl opacity-50"
    } else {
        "w-full h-full rounded-full object-cover transition-opacity duration-300 opacity-100"
    };

    rsx! {
        div { class: "absolute top-4 left-4 sm:top-6 sm:left-6 z-50 flex items-center",
            audio { id: STREAM_ELEMENT_ID, src: "{stream_url}", preload: "none" }
            button {
                class: "w-16 h-16 sm:w-20 sm:h-20 rounded-full shadow-lg p-0 border-0 bg-transparent focus:outline-none transition-transform duration-300 hover:scale-105 active:scale-100 shrink-0",
                aria_label: label,
                onclick: toggle,
                img {
                    src: "{profile.avatar_url}",
                    alt: "Logo for {profile.name}",
                    class: avatar_class,
                }
            }
            if !is_playing && prompt_visible() {
                div { class: "ml-3 flex items-center bg-gray-900/50 backdrop-blur-sm rounded-lg p-2 px-4 animate-pulse-bounce shadow-lg",
                    div {
                        p { class: "text-white text-sm font-bold hidden sm:block", "Click the logo to play music" }
                        p { class: "text-white text-sm font-bold sm:hidden", "Tap the logo to play music" }
                    }
                }
            }
        }
    }
}
