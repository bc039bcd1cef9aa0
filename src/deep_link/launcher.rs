use std::time::Duration;

use super::platform::PlatformClass;

/// How long the page must stay visible after a handoff before we assume the
/// app is missing.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(2500);

/// Where a link goes: always a web URL, optionally a native app URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    primary_url: String,
    native_url: Option<String>,
}

impl LinkTarget {
    pub fn new(primary_url: impl Into<String>, native_url: Option<String>) -> Self {
        Self {
            primary_url: primary_url.into(),
            native_url: native_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn primary_url(&self) -> &str {
        &self.primary_url
    }

    pub fn native_url(&self) -> Option<&str> {
        self.native_url.as_deref()
    }
}

/// Browser capabilities the launcher needs.
pub trait Host {
    fn is_hidden(&self) -> bool;
    /// Same-context location change.
    fn navigate(&mut self, url: &str);
    /// New browsing context without opener or referrer.
    fn open_new_context(&mut self, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Waiting on visibility or the deadline.
    Armed,
    /// The page went hidden before the deadline.
    AppOpened,
    /// Still visible at the deadline; the web URL was opened.
    FellBack,
    /// Hidden by the time the deadline was checked.
    LateSuccess,
    /// Torn down before resolving.
    Abandoned,
}

/// Per-click fallback state. While it is armed the caller holds a visibility
/// subscription and a timer for it; once it leaves `Armed` both must go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackWatch {
    primary_url: String,
    deadline: Duration,
    state: WatchState,
}

impl FallbackWatch {
    fn new(primary_url: String, deadline: Duration) -> Self {
        Self {
            primary_url,
            deadline,
            state: WatchState::Armed,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == WatchState::Armed
    }

    /// Visibility changed. Returns the state after handling.
    pub fn on_visibility_change<H: Host + ?Sized>(&mut self, host: &H) -> WatchState {
        if self.is_armed() && host.is_hidden() {
            tracing::debug!("page hidden after deep link, native app opened");
            self.state = WatchState::AppOpened;
        }
        self.state
    }

    /// The deadline elapsed. Fires at most once.
    pub fn on_deadline<H: Host + ?Sized>(&mut self, host: &mut H) -> WatchState {
        if !self.is_armed() {
            return self.state;
        }

        if host.is_hidden() {
            self.state = WatchState::LateSuccess;
        } else {
            tracing::debug!(url = %self.primary_url, "native app did not open, falling back");
            host.open_new_context(&self.primary_url);
            self.state = WatchState::FellBack;
        }
        self.state
    }

    pub fn abandon(&mut self) {
        if self.is_armed() {
            self.state = WatchState::Abandoned;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDecision {
    /// Let the anchor's own navigation to the primary URL happen.
    DefaultNavigation,
    /// Default navigation must be suppressed; the native URI was requested
    /// and the watch decides on the fallback.
    NativeHandoff(FallbackWatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepLinkLauncher {
    platform: PlatformClass,
    fallback_delay: Duration,
}

impl DeepLinkLauncher {
    pub fn new(platform: PlatformClass, fallback_delay: Duration) -> Self {
        Self {
            platform,
            fallback_delay,
        }
    }

    pub fn for_user_agent(user_agent: &str, fallback_delay: Duration) -> Self {
        Self::new(PlatformClass::from_user_agent(user_agent), fallback_delay)
    }

    pub fn click<H: Host + ?Sized>(&self, target: &LinkTarget, host: &mut H) -> ClickDecision {
        let native_url = match target.native_url() {
            Some(url) if self.platform.is_mobile() => url,
            _ => return ClickDecision::DefaultNavigation,
        };

        tracing::debug!(native = %native_url, "attempting native app handoff");
        host.navigate(native_url);
        ClickDecision::NativeHandoff(FallbackWatch::new(
            target.primary_url.clone(),
            self.fallback_delay,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        hidden: bool,
        navigated: Vec<String>,
        opened: Vec<String>,
    }

    impl Host for RecordingHost {
        fn is_hidden(&self) -> bool {
            self.hidden
        }

        fn navigate(&mut self, url: &str) {
            self.navigated.push(url.to_string());
        }

        fn open_new_context(&mut self, url: &str) {
            self.opened.push(url.to_string());
        }
    }

    fn youtube() -> LinkTarget {
        LinkTarget::new(
            "https://www.youtube.com/@channel",
            Some("youtube://www.youtube.com/@channel".to_string()),
        )
    }

    fn handoff(host: &mut RecordingHost) -> FallbackWatch {
        let launcher = DeepLinkLauncher::new(PlatformClass::Mobile, DEFAULT_FALLBACK_DELAY);
        match launcher.click(&youtube(), host) {
            ClickDecision::NativeHandoff(watch) => watch,
            ClickDecision::DefaultNavigation => panic!("expected handoff"),
        }
    }

    #[test]
    fn blank_native_url_counts_as_missing() {
        let target = LinkTarget::new("https://example.com", Some("  ".to_string()));
        assert_eq!(target.native_url(), None);
    }

    #[test]
    fn mobile_click_navigates_to_native_uri() {
        let mut host = RecordingHost::default();
        let watch = handoff(&mut host);
        assert_eq!(host.navigated, vec!["youtube://www.youtube.com/@channel"]);
        assert!(watch.is_armed());
        assert_eq!(watch.deadline(), Duration::from_millis(2500));
    }

    #[test]
    fn visible_change_does_not_cancel() {
        let mut host = RecordingHost::default();
        let mut watch = handoff(&mut host);
        assert_eq!(watch.on_visibility_change(&host), WatchState::Armed);
    }

    #[test]
    fn deadline_fires_only_once() {
        let mut host = RecordingHost::default();
        let mut watch = handoff(&mut host);
        assert_eq!(watch.on_deadline(&mut host), WatchState::FellBack);
        assert_eq!(watch.on_deadline(&mut host), WatchState::FellBack);
        assert_eq!(host.opened.len(), 1);
    }

    #[test]
    fn hidden_at_deadline_is_a_late_success() {
        let mut host = RecordingHost::default();
        let mut watch = handoff(&mut host);
        host.hidden = true;
        assert_eq!(watch.on_deadline(&mut host), WatchState::LateSuccess);
        assert!(host.opened.is_empty());
    }

    #[test]
    fn abandoned_watch_never_falls_back() {
        let mut host = RecordingHost::default();
        let mut watch = handoff(&mut host);
        watch.abandon();
        assert_eq!(watch.on_deadline(&mut host), WatchState::Abandoned);
        assert!(host.opened.is_empty());
    }
}
