use rand::Rng;
use std::time::Duration;

use super::pool::{pick_distinct, MediaPool, MediaSource};
use super::slot::{BufferSlot, PlaybackState, SlotId, SlotTag};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_PLAY_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossfadeSettings {
    /// Wait after a handover before the slot that went dark gets a new clip.
    pub settle_delay: Duration,
    /// Consecutive play rejections tolerated before waiting for `resume`.
    pub max_play_failures: u32,
}

impl Default for CrossfadeSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            max_play_failures: DEFAULT_MAX_PLAY_FAILURES,
        }
    }
}

/// Generation-tagged play request. Only the resolution whose ticket matches
/// the transition currently in flight is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket {
    pub slot: SlotId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The request was cancelled by a newer one against the same element.
    Aborted,
    /// Autoplay policy, decode failure, or anything else that is not churn.
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleToken {
    pub slot: SlotId,
    pub serial: u64,
}

/// Side effects the rendering layer executes on the media elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Point the slot's element at `source` and start buffering.
    Load { slot: SlotId, source: MediaSource },
    /// Call play on the slot and report back through `on_play_resolved`.
    Play(PlayTicket),
    /// Report back through `on_settle_elapsed` after `delay`.
    Settle { token: SettleToken, delay: Duration },
    Pause { slot: SlotId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingReady,
    AwaitingPlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    target: SlotId,
    generation: u64,
    stage: Stage,
}

impl Transition {
    fn ticket(&self) -> PlayTicket {
        PlayTicket {
            slot: self.target,
            generation: self.generation,
        }
    }
}

/// Dual-buffer crossfade scheduler.
///
/// Keeps two distinct clips loaded, promotes the hidden one when the visible
/// one ends or fails, and refills the hidden one in the background. All
/// methods are event handlers: they update the session and return the
/// effects to run. `active_slot` is written only when a play request
/// resolves successfully.
pub struct CrossfadePlayer<R: Rng> {
    pool: MediaPool,
    settings: CrossfadeSettings,
    rng: R,
    slots: [BufferSlot; 2],
    active: SlotId,
    transition: Option<Transition>,
    generation: u64,
    settle_serial: u64,
    pending_settle: [Option<u64>; 2],
    failures: u32,
    stalled: bool,
    started: bool,
    stopped: bool,
}

impl<R: Rng> CrossfadePlayer<R> {
    pub fn new(pool: MediaPool, settings: CrossfadeSettings, mut rng: R) -> Self {
        // A validated pool always has a spare, so both picks succeed.
        let first = pick_distinct(&pool, &[], &mut rng)
            .unwrap_or_else(|| pool.sources()[0].clone());
        let second = pick_distinct(&pool, &[&first], &mut rng)
            .unwrap_or_else(|| pool.sources()[1].clone());

        Self {
            pool,
            settings,
            rng,
            slots: [
                BufferSlot::new(SlotId::A, first),
                BufferSlot::new(SlotId::B, second),
            ],
            active: SlotId::A,
            transition: None,
            generation: 0,
            settle_serial: 0,
            pending_settle: [None, None],
            failures: 0,
            stalled: false,
            started: false,
            stopped: false,
        }
    }

    pub fn active_slot(&self) -> SlotId {
        self.active
    }

    pub fn slot(&self, id: SlotId) -> &BufferSlot {
        &self.slots[id.index()]
    }

    pub fn source(&self, id: SlotId) -> &MediaSource {
        self.slot(id).source()
    }

    /// The slot whose play request last succeeded and has not ended since.
    pub fn playing_slot(&self) -> Option<SlotId> {
        self.slots
            .iter()
            .find(|slot| slot.state() == PlaybackState::Playing)
            .map(BufferSlot::id)
    }

    pub fn pool(&self) -> &MediaPool {
        &self.pool
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// True after repeated play rejections; only `resume` restarts playback.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Loads both slots and waits for A to become playable.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started || self.stopped {
            return Vec::new();
        }
        self.started = true;

        let mut effects = Vec::with_capacity(2);
        for slot in self.slots.iter_mut() {
            slot.set_state(PlaybackState::Loading);
            effects.push(Effect::Load {
                slot: slot.id(),
                source: slot.source().clone(),
            });
        }

        self.generation += 1;
        self.transition = Some(Transition {
            target: SlotId::A,
            generation: self.generation,
            stage: Stage::AwaitingReady,
        });
        tracing::debug!(a = %self.source(SlotId::A), b = %self.source(SlotId::B), "backdrop started");
        effects
    }

    /// The slot buffered enough to play through.
    pub fn on_ready(&mut self, tag: SlotTag) -> Vec<Effect> {
        if !self.accepts(tag) {
            return Vec::new();
        }

        let slot = &mut self.slots[tag.slot.index()];
        if matches!(
            slot.state(),
            PlaybackState::NotLoaded | PlaybackState::Loading
        ) {
            slot.set_state(PlaybackState::Ready);
        }

        match self.transition.as_mut() {
            Some(transition)
                if transition.target == tag.slot && transition.stage == Stage::AwaitingReady =>
            {
                transition.stage = Stage::AwaitingPlay;
                vec![Effect::Play(transition.ticket())]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_ended(&mut self, tag: SlotTag) -> Vec<Effect> {
        if !self.accepts(tag) {
            return Vec::new();
        }

        let slot = &mut self.slots[tag.slot.index()];
        if slot.state() != PlaybackState::Playing {
            return Vec::new();
        }
        slot.set_state(PlaybackState::Ready);
        if tag.slot == self.active {
            self.request_transition()
        } else {
            Vec::new()
        }
    }

    /// Hard media error on either slot. The slot gets a fresh clip; if it was
    /// the visible one the hidden slot is promoted right away.
    pub fn on_error(&mut self, tag: SlotTag) -> Vec<Effect> {
        if !self.accepts(tag) {
            return Vec::new();
        }

        tracing::warn!(slot = tag.slot.label(), source = %self.source(tag.slot), "backdrop video error, scheduling new source");
        let mut effects = self.replace_source(tag.slot);

        if self.transition.map(|t| t.target) == Some(tag.slot) {
            self.rearm(tag.slot);
        }
        if tag.slot == self.active {
            effects.extend(self.request_transition());
        }
        effects
    }

    pub fn on_play_resolved(&mut self, ticket: PlayTicket, outcome: PlayOutcome) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }
        let Some(transition) = self.transition else {
            tracing::debug!(slot = ticket.slot.label(), "discarding play result, no transition in flight");
            return Vec::new();
        };
        if transition.ticket() != ticket || transition.stage != Stage::AwaitingPlay {
            tracing::debug!(
                slot = ticket.slot.label(),
                generation = ticket.generation,
                current = transition.generation,
                "discarding superseded play result"
            );
            return Vec::new();
        }

        let target = transition.target;
        match outcome {
            PlayOutcome::Started => {
                self.transition = None;
                self.failures = 0;
                self.stalled = false;
                self.slots[target.index()].set_state(PlaybackState::Playing);

                let previous = self.active;
                self.active = target;
                if previous == target {
                    return Vec::new();
                }
                tracing::debug!(active = target.label(), "backdrop crossfade");
                vec![self.schedule_settle(previous)]
            }
            PlayOutcome::Aborted => {
                // Churn, not failure: ask again once the element settles.
                tracing::debug!(slot = target.label(), "play request aborted, retrying");
                self.transition = None;
                self.arm(target)
            }
            PlayOutcome::Rejected(reason) => {
                self.failures += 1;
                if target == self.active {
                    // Autoplay was refused for the visible slot; try the hidden one.
                    tracing::warn!(slot = target.label(), %reason, "autoplay prevented, trying other slot");
                    self.transition = None;
                    return self.request_transition();
                }

                tracing::warn!(slot = target.label(), %reason, "video failed to play, scheduling new source");
                let effects = self.replace_source(target);
                if self.failures >= self.settings.max_play_failures {
                    tracing::warn!(failures = self.failures, "backdrop stalled until next user gesture");
                    self.transition = None;
                    self.stalled = true;
                } else {
                    self.rearm(target);
                }
                effects
            }
        }
    }

    pub fn on_settle_elapsed(&mut self, token: SettleToken) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }
        let index = token.slot.index();
        if self.pending_settle[index] != Some(token.serial) {
            return Vec::new();
        }
        self.pending_settle[index] = None;

        if token.slot == self.active || self.transition.map(|t| t.target) == Some(token.slot) {
            tracing::debug!(slot = token.slot.label(), "slot is visible again, keeping its source");
            return Vec::new();
        }
        self.replace_source(token.slot)
    }

    /// Retry after a user gesture lifts autoplay restrictions.
    pub fn resume(&mut self) -> Vec<Effect> {
        if !self.started || self.stopped {
            return Vec::new();
        }
        self.failures = 0;
        self.stalled = false;

        if self.transition.is_some() || self.playing_slot().is_some() {
            return Vec::new();
        }
        tracing::debug!(slot = self.active.label(), "resuming backdrop");
        self.arm(self.active)
    }

    /// Stops both buffers. Every later event is ignored.
    pub fn shutdown(&mut self) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }
        self.stopped = true;
        self.transition = None;
        self.pending_settle = [None, None];
        vec![
            Effect::Pause { slot: SlotId::A },
            Effect::Pause { slot: SlotId::B },
        ]
    }

    fn accepts(&self, tag: SlotTag) -> bool {
        if self.stopped || !self.started {
            return false;
        }
        if !self.slot(tag.slot).is_current(tag) {
            tracing::trace!(slot = tag.slot.label(), epoch = tag.epoch, "stale media event");
            return false;
        }
        true
    }

    /// Promote the hidden slot. A request while one is already heading for
    /// the same slot is absorbed into it.
    fn request_transition(&mut self) -> Vec<Effect> {
        if self.stopped {
            return Vec::new();
        }
        let target = self.active.other();
        if let Some(transition) = self.transition {
            if transition.target == target {
                tracing::debug!(slot = target.label(), "transition already in flight");
                return Vec::new();
            }
        }
        self.arm(target)
    }

    fn arm(&mut self, target: SlotId) -> Vec<Effect> {
        self.generation += 1;
        let mut transition = Transition {
            target,
            generation: self.generation,
            stage: Stage::AwaitingReady,
        };

        let mut effects = Vec::new();
        let slot = &mut self.slots[target.index()];
        match slot.state() {
            PlaybackState::Ready | PlaybackState::Playing => {
                transition.stage = Stage::AwaitingPlay;
                effects.push(Effect::Play(transition.ticket()));
            }
            PlaybackState::Loading => {}
            PlaybackState::NotLoaded => {
                slot.set_state(PlaybackState::Loading);
                effects.push(Effect::Load {
                    slot: target,
                    source: slot.source().clone(),
                });
            }
            PlaybackState::Errored => effects.extend(self.replace_source(target)),
        }

        self.transition = Some(transition);
        effects
    }

    /// Keep the transition pointed at `target` but wait for its new source.
    /// Bumping the generation drops any play result still in flight.
    fn rearm(&mut self, target: SlotId) {
        self.generation += 1;
        self.transition = Some(Transition {
            target,
            generation: self.generation,
            stage: Stage::AwaitingReady,
        });
    }

    fn schedule_settle(&mut self, slot: SlotId) -> Effect {
        self.settle_serial += 1;
        self.pending_settle[slot.index()] = Some(self.settle_serial);
        Effect::Settle {
            token: SettleToken {
                slot,
                serial: self.settle_serial,
            },
            delay: self.settings.settle_delay,
        }
    }

    /// Assigns a clip that neither buffer currently holds.
    fn replace_source(&mut self, slot: SlotId) -> Vec<Effect> {
        let other = slot.other();
        let picked = pick_distinct(
            &self.pool,
            &[self.slots[0].source(), self.slots[1].source()],
            &mut self.rng,
        )
        .or_else(|| pick_distinct(&self.pool, &[self.slots[other.index()].source()], &mut self.rng));

        let target = &mut self.slots[slot.index()];
        self.pending_settle[slot.index()] = None;
        match picked {
            Some(source) => {
                target.assign(source.clone());
                vec![Effect::Load { slot, source }]
            }
            None => {
                target.set_state(PlaybackState::Errored);
                Vec::new()
            }
        }
    }
}
