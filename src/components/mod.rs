//! The components module contains the landing page's components.

mod app;
mod backdrop;
mod browser;
mod link_card;
mod media_driver;
mod profile;
mod stream_toggle;

pub use app::*;
pub use backdrop::*;
pub use link_card::*;
pub use profile::*;
pub use stream_toggle::*;

use dioxus::prelude::*;

/// Counts user gestures on the page. Media that was refused autoplay gets
/// another chance after each one.
#[derive(Clone, Copy)]
pub struct GestureSignal(pub Signal<u32>);

impl GestureSignal {
    pub fn bump(self) {
        let mut counter = self.0;
        *counter.write() += 1;
    }
}
