use super::pool::MediaSource;

/// One of the two alternating playback buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    pub fn other(self) -> Self {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            SlotId::A => 0,
            SlotId::B => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SlotId::A => "a",
            SlotId::B => "b",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotLoaded,
    Loading,
    Ready,
    Playing,
    Errored,
}

/// Identifies the source a media event belongs to. The epoch changes every
/// time the slot is handed a new source, so callbacks still in flight for the
/// previous clip can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotTag {
    pub slot: SlotId,
    pub epoch: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferSlot {
    id: SlotId,
    source: MediaSource,
    state: PlaybackState,
    epoch: u32,
}

impl BufferSlot {
    pub(crate) fn new(id: SlotId, source: MediaSource) -> Self {
        Self {
            id,
            source,
            state: PlaybackState::NotLoaded,
            epoch: 0,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn tag(&self) -> SlotTag {
        SlotTag {
            slot: self.id,
            epoch: self.epoch,
        }
    }

    pub(crate) fn is_current(&self, tag: SlotTag) -> bool {
        tag.slot == self.id && tag.epoch == self.epoch
    }

    /// Hands the slot a new clip and starts loading it.
    pub(crate) fn assign(&mut self, source: MediaSource) {
        self.source = source;
        self.epoch = self.epoch.wrapping_add(1);
        self.state = PlaybackState::Loading;
    }

    pub(crate) fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
    }
}
