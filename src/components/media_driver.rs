// Executes backdrop effects against the two `<video>` elements.
// Browsers go through web-sys directly; native webviews get small eval scripts.
use linkdeck::backdrop::{PlayOutcome, SlotId};

#[cfg(not(target_arch = "wasm32"))]
use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, DomException, HtmlVideoElement};

pub fn element_id(slot: SlotId) -> String {
    format!("linkdeck-backdrop-{}", slot.label())
}

#[cfg(target_arch = "wasm32")]
fn video_element(slot: SlotId) -> Option<HtmlVideoElement> {
    let document = window()?.document()?;
    document
        .get_element_by_id(&element_id(slot))?
        .dyn_into::<HtmlVideoElement>()
        .ok()
}

#[cfg(target_arch = "wasm32")]
pub fn load(slot: SlotId, url: &str) {
    let Some(video) = video_element(slot) else {
        tracing::warn!(slot = slot.label(), "backdrop element missing");
        return;
    };
    // Autoplay policies look at the property, not the attribute.
    video.set_muted(true);
    video.set_src(url);
    video.load();
}

#[cfg(target_arch = "wasm32")]
pub fn pause(slot: SlotId) {
    if let Some(video) = video_element(slot) {
        let _ = video.pause();
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn play(slot: SlotId) -> PlayOutcome {
    let Some(video) = video_element(slot) else {
        return PlayOutcome::Rejected("NotFoundError".to_string());
    };
    match video.play() {
        Ok(promise) => match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => PlayOutcome::Started,
            Err(err) => classify_play_error(&err),
        },
        Err(err) => classify_play_error(&err),
    }
}

#[cfg(target_arch = "wasm32")]
fn classify_play_error(err: &JsValue) -> PlayOutcome {
    let name = err
        .dyn_ref::<DomException>()
        .map(|exception| exception.name())
        .unwrap_or_else(|| "Error".to_string());
    play_outcome_from_name(&name)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load(slot: SlotId, url: &str) {
    let id = element_id(slot);
    let src = serde_json::to_string(url).unwrap_or_else(|_| "\"\"".to_string());
    let script = format!(
        r#"(function () {{
            const video = document.getElementById("{id}");
            if (!video) return false;
            video.muted = true;
            video.src = {src};
            video.load();
            return true;
        }})();"#
    );
    let _ = document::eval(&script);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pause(slot: SlotId) {
    let id = element_id(slot);
    let script = format!(
        r#"(function () {{
            const video = document.getElementById("{id}");
            if (video) video.pause();
            return true;
        }})();"#
    );
    let _ = document::eval(&script);
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn play(slot: SlotId) -> PlayOutcome {
    let id = element_id(slot);
    let script = format!(
        r#"return (async function () {{
            const video = document.getElementById("{id}");
            if (!video) return "NotFoundError";
            try {{
                await video.play();
                return "started";
            }} catch (err) {{
                return (err && err.name) || "Error";
            }}
        }})();"#
    );
    match document::eval(&script).join::<String>().await {
        Ok(result) if result == "started" => PlayOutcome::Started,
        Ok(name) => play_outcome_from_name(&name),
        Err(err) => PlayOutcome::Rejected(format!("{err:?}")),
    }
}

/// A play request superseded by a newer load or play is churn, not failure.
fn play_outcome_from_name(name: &str) -> PlayOutcome {
    if name == "AbortError" {
        PlayOutcome::Aborted
    } else {
        PlayOutcome::Rejected(name.to_string())
    }
}
