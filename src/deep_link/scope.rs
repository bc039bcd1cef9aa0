use super::launcher::{FallbackWatch, Host, WatchState};

/// A registered visibility subscription that can be unregistered.
pub trait Detach {
    fn detach(self);
}

/// Owns one click's watch together with its visibility subscription `L` and
/// fallback timer `T`. Dropping `T` cancels it.
///
/// Release order:
/// - visibility resolves the watch: detach `L`, drop `T`
/// - deadline: detach `L`; `T` is the running callback and is kept until the
///   scope goes away
/// - teardown or drop: abandon the watch, detach `L`, drop `T`
///
/// A scope without a subscription still falls back on its deadline.
pub struct FallbackScope<L: Detach, T> {
    watch: FallbackWatch,
    listener: Option<L>,
    timer: Option<T>,
}

impl<L: Detach, T> FallbackScope<L, T> {
    pub fn new(watch: FallbackWatch) -> Self {
        Self {
            watch,
            listener: None,
            timer: None,
        }
    }

    pub fn watch(&self) -> &FallbackWatch {
        &self.watch
    }

    pub fn is_armed(&self) -> bool {
        self.watch.is_armed()
    }

    pub fn holds_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn holds_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Ignored once the watch has resolved.
    pub fn attach_listener(&mut self, listener: L) {
        if self.is_armed() {
            self.listener = Some(listener);
        } else {
            listener.detach();
        }
    }

    pub fn attach_timer(&mut self, timer: T) {
        if self.is_armed() {
            self.timer = Some(timer);
        }
    }

    pub fn on_visibility_change<H: Host + ?Sized>(&mut self, host: &H) -> WatchState {
        let state = self.watch.on_visibility_change(host);
        if state != WatchState::Armed {
            self.detach_listener();
            self.timer.take();
        }
        state
    }

    pub fn on_deadline<H: Host + ?Sized>(&mut self, host: &mut H) -> WatchState {
        self.detach_listener();
        self.watch.on_deadline(host)
    }

    pub fn teardown(&mut self) {
        self.watch.abandon();
        self.detach_listener();
        self.timer.take();
    }

    fn detach_listener(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.detach();
        }
    }
}

impl<L: Detach, T> Drop for FallbackScope<L, T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
