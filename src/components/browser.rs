// Page-level browser capabilities: the deep link host, the per-click
// fallback guard, and timers. Native webviews never hand off to apps, so
// they only get stand-ins.
use linkdeck::deep_link::{FallbackWatch, Host};
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use linkdeck::deep_link::{Detach, FallbackScope, WatchState};
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc, rc::Weak};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::window;

#[cfg(not(target_arch = "wasm32"))]
use dioxus::prelude::*;

/// The current page.
pub struct WebHost;

#[cfg(target_arch = "wasm32")]
impl Host for WebHost {
    fn is_hidden(&self) -> bool {
        window()
            .and_then(|window| window.document())
            .map(|document| document.hidden())
            .unwrap_or(false)
    }

    fn navigate(&mut self, url: &str) {
        let Some(window) = window() else {
            return;
        };
        if let Err(err) = window.location().set_href(url) {
            tracing::warn!(?err, url, "navigation failed");
        }
    }

    fn open_new_context(&mut self, url: &str) {
        let Some(window) = window() else {
            return;
        };
        if let Err(err) =
            window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
        {
            tracing::warn!(?err, url, "could not open fallback tab");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Host for WebHost {
    fn is_hidden(&self) -> bool {
        false
    }

    fn navigate(&mut self, url: &str) {
        let target = serde_json::to_string(url).unwrap_or_else(|_| "\"\"".to_string());
        let _ = document::eval(&format!("window.location.href = {target}; return true;"));
    }

    fn open_new_context(&mut self, url: &str) {
        let target = serde_json::to_string(url).unwrap_or_else(|_| "\"\"".to_string());
        let _ = document::eval(&format!(
            r#"window.open({target}, "_blank", "noopener,noreferrer"); return true;"#
        ));
    }
}

#[cfg(target_arch = "wasm32")]
pub fn user_agent() -> String {
    window()
        .and_then(|window| window.navigator().user_agent().ok())
        .unwrap_or_default()
}

/// Desktop and mobile shells open links in the system browser.
#[cfg(not(target_arch = "wasm32"))]
pub fn user_agent() -> String {
    String::new()
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(delay: Duration) {
    let ms = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(delay: Duration) {
    let ms = delay.as_millis();
    let script = format!(
        r#"return (async function () {{
            await new Promise(resolve => setTimeout(resolve, {ms}));
            return true;
        }})();"#
    );
    let _ = document::eval(&script).await;
}

#[cfg(target_arch = "wasm32")]
struct VisibilityListener(js_sys::Function);

#[cfg(target_arch = "wasm32")]
impl Detach for VisibilityListener {
    fn detach(self) {
        if let Some(document) = window().and_then(|window| window.document()) {
            let _ = document.remove_event_listener_with_callback("visibilitychange", &self.0);
        }
    }
}

#[cfg(target_arch = "wasm32")]
type WebScope = FallbackScope<VisibilityListener, gloo_timers::callback::Timeout>;

/// Holds one click's visibility listener and fallback timer. The scope
/// releases both as the watch resolves; dropping the guard releases whatever
/// is left and abandons an unresolved watch.
#[cfg(target_arch = "wasm32")]
pub struct FallbackGuard {
    scope: Rc<RefCell<WebScope>>,
    _on_visibility: Closure<dyn FnMut()>,
}

#[cfg(target_arch = "wasm32")]
impl FallbackGuard {
    /// Starts the deadline timer. Without a visibility listener the deadline
    /// still decides, it just cannot end early.
    pub fn arm(watch: FallbackWatch) -> Option<Self> {
        let document = window()?.document()?;
        let ms = u32::try_from(watch.deadline().as_millis()).unwrap_or(u32::MAX);
        let scope = Rc::new(RefCell::new(WebScope::new(watch)));

        let weak: Weak<RefCell<WebScope>> = Rc::downgrade(&scope);
        let on_visibility = Closure::wrap(Box::new(move || {
            let Some(scope) = weak.upgrade() else {
                return;
            };
            let Ok(mut inner) = scope.try_borrow_mut() else {
                return;
            };
            let state = inner.on_visibility_change(&WebHost);
            if state != WatchState::Armed {
                tracing::debug!(?state, "deep link resolved by visibility");
            }
        }) as Box<dyn FnMut()>);

        let listener: js_sys::Function = on_visibility
            .as_ref()
            .unchecked_ref::<js_sys::Function>()
            .clone();
        match document.add_event_listener_with_callback("visibilitychange", &listener) {
            Ok(()) => scope
                .borrow_mut()
                .attach_listener(VisibilityListener(listener)),
            Err(err) => tracing::warn!(?err, "visibility listener unavailable, relying on deadline"),
        }

        let weak = Rc::downgrade(&scope);
        let timer = gloo_timers::callback::Timeout::new(ms, move || {
            let Some(scope) = weak.upgrade() else {
                return;
            };
            let Ok(mut inner) = scope.try_borrow_mut() else {
                return;
            };
            let state = inner.on_deadline(&mut WebHost);
            tracing::debug!(?state, "deep link fallback window closed");
        });
        scope.borrow_mut().attach_timer(timer);

        Some(Self {
            scope,
            _on_visibility: on_visibility,
        })
    }

    pub fn is_armed(&self) -> bool {
        self.scope
            .try_borrow()
            .map(|scope| scope.is_armed())
            .unwrap_or(true)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct FallbackGuard;

#[cfg(not(target_arch = "wasm32"))]
impl FallbackGuard {
    pub fn arm(_watch: FallbackWatch) -> Option<Self> {
        None
    }

    pub fn is_armed(&self) -> bool {
        false
    }
}
