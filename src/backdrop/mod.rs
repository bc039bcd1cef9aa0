//! Ambient backdrop - dual-buffer crossfade scheduling.
//! Two video buffers alternate so that loading and failures happen off
//! screen; the rendering layer only fades between them.

mod player;
mod pool;
mod slot;

pub use player::{
    CrossfadePlayer, CrossfadeSettings, Effect, PlayOutcome, PlayTicket, SettleToken,
    DEFAULT_MAX_PLAY_FAILURES, DEFAULT_SETTLE_DELAY,
};
pub use pool::{pick_distinct, MediaPool, MediaSource, MIN_POOL_SIZE};
pub use slot::{BufferSlot, PlaybackState, SlotId, SlotTag};
