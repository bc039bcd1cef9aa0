//! Ambient Backdrop - two stacked muted videos crossfading over each other.
//! The scheduling lives in `linkdeck::backdrop`; this component only forwards
//! media events into it and runs the effects it hands back.

use dioxus::prelude::*;
use linkdeck::backdrop::{CrossfadePlayer, CrossfadeSettings, Effect, MediaPool, SlotId};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{browser, media_driver, GestureSignal};

type Session = CrossfadePlayer<StdRng>;

/// Applies one event to the session and runs whatever it asks for. Events
/// arriving after the component is gone are dropped.
fn dispatch<F>(mut player: Signal<Session>, event: F)
where
    F: FnOnce(&mut Session) -> Vec<Effect>,
{
    let effects = match player.try_write() {
        Ok(mut session) => event(&mut session),
        Err(_) => return,
    };
    run_effects(player, effects);
}

fn run_effects(player: Signal<Session>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Load { slot, source } => media_driver::load(slot, source.url()),
            Effect::Pause { slot } => media_driver::pause(slot),
            Effect::Play(ticket) => {
                spawn(async move {
                    let outcome = media_driver::play(ticket.slot).await;
                    dispatch(player, move |session| {
                        session.on_play_resolved(ticket, outcome)
                    });
                });
            }
            Effect::Settle { token, delay } => {
                spawn(async move {
                    browser::sleep(delay).await;
                    dispatch(player, move |session| session.on_settle_elapsed(token));
                });
            }
        }
    }
}

#[component]
pub fn AmbientBackdrop(pool: MediaPool, settings: CrossfadeSettings) -> Element {
    let player = use_signal(move || CrossfadePlayer::new(pool, settings, StdRng::from_entropy()));
    let gestures = use_context::<GestureSignal>().0;

    // Elements exist once the first render is committed.
    use_effect(move || dispatch(player, |session| session.start()));

    // A user gesture lifts autoplay restrictions; retry if nothing plays.
    use_effect(move || {
        if gestures() > 0 {
            dispatch(player, |session| session.resume());
        }
    });

    use_drop(move || dispatch(player, |session| session.shutdown()));

    let active = player.read().active_slot();

    // Events are resolved against the slot's current source: once a new src
    // is loaded the element no longer reports on the old one.
    rsx! {
        div { class: "fixed inset-0 -z-10 bg-black", aria_hidden: "true",
            for slot in [SlotId::A, SlotId::B] {
                video {
                    key: "{slot.label()}",
                    id: media_driver::element_id(slot),
                    class: video_class(slot == active),
                    muted: true,
                    playsinline: true,
                    preload: "auto",
                    oncanplaythrough: move |_| {
                        dispatch(player, move |session| session.on_ready(session.slot(slot).tag()))
                    },
                    onended: move |_| {
                        dispatch(player, move |session| session.on_ended(session.slot(slot).tag()))
                    },
                    onerror: move |_| {
                        dispatch(player, move |session| session.on_error(session.slot(slot).tag()))
                    },
                }
            }
            div { class: "absolute inset-0 bg-black/60 backdrop-blur-sm" }
        }
    }
}

fn video_class(visible: bool) -> &'static str {
    if visible {
        "backdrop-video opacity-100"
    } else {
        "backdrop-video opacity-0"
    }
}
