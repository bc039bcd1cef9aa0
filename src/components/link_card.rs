use dioxus::prelude::*;
use linkdeck::config::Link;
use linkdeck::deep_link::{ClickDecision, DeepLinkLauncher, Host};
use std::time::Duration;

use crate::components::browser::{self, FallbackGuard, WebHost};

#[component]
pub fn LinkList(links: Vec<Link>, fallback_delay: Duration) -> Element {
    rsx! {
        div { class: "w-full flex flex-col items-center space-y-5",
            for link in links {
                LinkCard { key: "{link.id}", link: link.clone(), fallback_delay }
            }
        }
    }
}

/// An outbound link. On mobile, links with an app URI try the app first and
/// open the web URL in a new tab if the page never goes hidden.
#[component]
pub fn LinkCard(link: Link, fallback_delay: Duration) -> Element {
    let launcher =
        use_hook(move || DeepLinkLauncher::for_user_agent(&browser::user_agent(), fallback_delay));
    // Overlapping clicks each keep their own guard until they resolve.
    let mut guards = use_signal(Vec::<FallbackGuard>::new);

    use_drop(move || {
        if let Ok(mut guards) = guards.try_write() {
            guards.clear();
        }
    });

    let target = link.target();
    let title = link.title.clone();

    rsx! {
        div { class: "relative flex items-center group w-full",
            a {
                href: "{link.url}",
                target: "_blank",
                rel: "noopener noreferrer",
                class: "w-full text-center bg-gray-800/50 backdrop-blur-sm text-white font-semibold py-4 px-6 rounded-lg transition-all duration-300 hover:bg-red-500/20 transform hover:-translate-y-1 shadow-lg",
                onclick: move |evt: MouseEvent| {
                    let ClickDecision::NativeHandoff(watch) = launcher.click(&target, &mut WebHost)
                    else {
                        return;
                    };
                    evt.prevent_default();
                    match FallbackGuard::arm(watch) {
                        Some(guard) => {
                            let mut guards = guards.write();
                            guards.retain(FallbackGuard::is_armed);
                            guards.push(guard);
                        }
                        None => {
                            tracing::warn!("could not watch for the app opening, opening web url");
                            WebHost.open_new_context(target.primary_url());
                        }
                    }
                },
                "{title}"
            }
        }
    }
}
