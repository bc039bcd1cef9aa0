//! Deep links - hand a click off to a native app and fall back to the web
//! URL when the page never loses visibility.

mod launcher;
mod platform;
mod scope;

pub use launcher::{
    ClickDecision, DeepLinkLauncher, FallbackWatch, Host, LinkTarget, WatchState,
    DEFAULT_FALLBACK_DELAY,
};
pub use platform::PlatformClass;
pub use scope::{Detach, FallbackScope};

#[cfg(test)]
mod tests;
