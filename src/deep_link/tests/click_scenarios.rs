//! Click-to-resolution scenarios for the deep link launcher on a virtual
//! clock: visibility changes and the fallback deadline are delivered in
//! timestamp order, the way the browser event loop would.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::Link;
use crate::deep_link::{
    ClickDecision, DeepLinkLauncher, Detach, FallbackScope, FallbackWatch, Host, LinkTarget,
    WatchState, DEFAULT_FALLBACK_DELAY,
};

const IPHONE: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
const DESKTOP: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/124.0 Safari/537.36";

#[derive(Default)]
struct FakeBrowser {
    hidden: bool,
    navigations: Vec<String>,
    new_tabs: Vec<String>,
}

impl Host for FakeBrowser {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn open_new_context(&mut self, url: &str) {
        self.new_tabs.push(url.to_string());
    }
}

/// Registration counts for one page, shared by every click's listener and
/// timer.
#[derive(Default)]
struct Registrations {
    listeners: usize,
    timers: usize,
}

struct PageListener(Rc<RefCell<Registrations>>);

impl PageListener {
    fn register(page: &Rc<RefCell<Registrations>>) -> Self {
        page.borrow_mut().listeners += 1;
        Self(Rc::clone(page))
    }
}

impl Detach for PageListener {
    fn detach(self) {
        self.0.borrow_mut().listeners -= 1;
    }
}

struct PageTimer(Rc<RefCell<Registrations>>);

impl PageTimer {
    fn register(page: &Rc<RefCell<Registrations>>) -> Self {
        page.borrow_mut().timers += 1;
        Self(Rc::clone(page))
    }
}

impl Drop for PageTimer {
    fn drop(&mut self) {
        self.0.borrow_mut().timers -= 1;
    }
}

/// One click's lifetime on the virtual clock.
struct ClickSession {
    scope: FallbackScope<PageListener, PageTimer>,
    fired: bool,
}

impl ClickSession {
    fn new(watch: FallbackWatch, page: &Rc<RefCell<Registrations>>) -> Self {
        let mut scope = FallbackScope::new(watch);
        scope.attach_listener(PageListener::register(page));
        scope.attach_timer(PageTimer::register(page));
        Self {
            scope,
            fired: false,
        }
    }

    /// Advances the virtual clock to `at`, delivering a visibility change
    /// there if `hidden` is given and firing the deadline if it is due first.
    fn advance(&mut self, browser: &mut FakeBrowser, at: Duration, hidden: Option<bool>) {
        if self.scope.holds_timer() && !self.fired && at >= self.scope.watch().deadline() {
            self.fire_deadline(browser);
        }
        if let Some(hidden) = hidden {
            browser.hidden = hidden;
            if self.scope.holds_listener() {
                self.scope.on_visibility_change(&*browser);
            }
        }
    }

    fn fire_deadline(&mut self, browser: &mut FakeBrowser) {
        self.fired = true;
        self.scope.on_deadline(browser);
    }

    fn state(&self) -> WatchState {
        self.scope.watch().state()
    }
}

fn link() -> LinkTarget {
    LinkTarget::new(
        "https://www.tiktok.com/@radiomore.love",
        Some("tiktok://user?username=radiomore.love".to_string()),
    )
}

fn handoff(
    launcher: &DeepLinkLauncher,
    browser: &mut FakeBrowser,
    page: &Rc<RefCell<Registrations>>,
) -> ClickSession {
    match launcher.click(&link(), browser) {
        ClickDecision::NativeHandoff(watch) => ClickSession::new(watch, page),
        ClickDecision::DefaultNavigation => panic!("expected a native handoff"),
    }
}

fn registered(page: &Rc<RefCell<Registrations>>) -> (usize, usize) {
    let page = page.borrow();
    (page.listeners, page.timers)
}

#[test]
fn hidden_at_500ms_cancels_the_fallback() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, DEFAULT_FALLBACK_DELAY);
    let mut browser = FakeBrowser::default();
    let page = Rc::default();
    let mut session = handoff(&launcher, &mut browser, &page);
    assert_eq!(browser.navigations, vec!["tiktok://user?username=radiomore.love"]);
    assert_eq!(registered(&page), (1, 1));

    session.advance(&mut browser, Duration::from_millis(500), Some(true));
    assert_eq!(session.state(), WatchState::AppOpened);
    assert_eq!(registered(&page), (0, 0));

    // The user comes back later; nothing else happens.
    session.advance(&mut browser, Duration::from_millis(4000), Some(false));
    assert!(browser.new_tabs.is_empty());
}

#[test]
fn staying_visible_opens_primary_url_once() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, DEFAULT_FALLBACK_DELAY);
    let mut browser = FakeBrowser::default();
    let page = Rc::default();
    let mut session = handoff(&launcher, &mut browser, &page);

    session.advance(&mut browser, Duration::from_millis(1200), Some(false));
    assert!(session.scope.is_armed());
    assert_eq!(registered(&page), (1, 1));
    session.advance(&mut browser, Duration::from_millis(2500), None);

    assert_eq!(session.state(), WatchState::FellBack);
    assert_eq!(browser.new_tabs, vec!["https://www.tiktok.com/@radiomore.love"]);
    assert_eq!(registered(&page).0, 0);

    // A late visibility change or a second timer tick cannot fire again.
    session.advance(&mut browser, Duration::from_millis(3000), Some(true));
    session.scope.on_deadline(&mut browser);
    assert_eq!(browser.new_tabs.len(), 1);

    drop(session);
    assert_eq!(registered(&page), (0, 0));
}

#[test]
fn desktop_click_uses_default_navigation() {
    let launcher = DeepLinkLauncher::for_user_agent(DESKTOP, DEFAULT_FALLBACK_DELAY);
    let mut browser = FakeBrowser::default();
    assert_eq!(launcher.click(&link(), &mut browser), ClickDecision::DefaultNavigation);
    assert!(browser.navigations.is_empty());
    assert!(browser.new_tabs.is_empty());
}

#[test]
fn mobile_click_without_native_url_uses_default_navigation() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, DEFAULT_FALLBACK_DELAY);
    let mut browser = FakeBrowser::default();
    let plain = LinkTarget::new("https://radio.example", None);
    assert_eq!(launcher.click(&plain, &mut browser), ClickDecision::DefaultNavigation);
    assert!(browser.navigations.is_empty());
}

#[test]
fn app_opening_after_the_window_is_a_late_success() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, DEFAULT_FALLBACK_DELAY);
    let mut browser = FakeBrowser::default();
    let page = Rc::default();
    let mut session = handoff(&launcher, &mut browser, &page);

    // Hidden without a visibility event reaching the watch (e.g. listener
    // throttled), then the deadline re-checks.
    browser.hidden = true;
    session.advance(&mut browser, Duration::from_millis(2600), None);
    assert_eq!(session.state(), WatchState::LateSuccess);
    assert!(browser.new_tabs.is_empty());
}

#[test]
fn overlapping_clicks_are_independent() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, Duration::from_millis(2500));
    let mut browser = FakeBrowser::default();
    let page = Rc::default();

    let links: Vec<Link> = crate::config::SiteConfig::default().links;
    let mut first = match launcher.click(&links[0].target(), &mut browser) {
        ClickDecision::NativeHandoff(watch) => ClickSession::new(watch, &page),
        ClickDecision::DefaultNavigation => panic!("expected handoff"),
    };
    let mut second = match launcher.click(&links[1].target(), &mut browser) {
        ClickDecision::NativeHandoff(watch) => ClickSession::new(watch, &page),
        ClickDecision::DefaultNavigation => panic!("expected handoff"),
    };
    assert_eq!(registered(&page), (2, 2));

    first.fire_deadline(&mut browser);
    assert_eq!(first.state(), WatchState::FellBack);
    assert!(second.scope.is_armed());
    assert_eq!(registered(&page).0, 1);

    second.advance(&mut browser, Duration::from_millis(300), Some(true));
    assert_eq!(second.state(), WatchState::AppOpened);
    assert_eq!(browser.new_tabs, vec![links[0].url.clone()]);

    drop(first);
    assert_eq!(registered(&page), (0, 0));
}

#[test]
fn unmounting_mid_window_abandons_and_unregisters() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, DEFAULT_FALLBACK_DELAY);
    let mut browser = FakeBrowser::default();
    let page = Rc::default();
    let mut session = handoff(&launcher, &mut browser, &page);
    session.advance(&mut browser, Duration::from_millis(1000), Some(false));

    session.scope.teardown();
    assert_eq!(session.state(), WatchState::Abandoned);
    assert_eq!(registered(&page), (0, 0));

    session.advance(&mut browser, Duration::from_millis(3000), None);
    assert!(browser.new_tabs.is_empty());
}

#[test]
fn fallback_delay_is_the_tuning_knob() {
    let launcher = DeepLinkLauncher::for_user_agent(IPHONE, Duration::from_millis(800));
    let mut browser = FakeBrowser::default();
    let page = Rc::default();
    let mut session = handoff(&launcher, &mut browser, &page);

    session.advance(&mut browser, Duration::from_millis(900), Some(true));
    assert_eq!(session.state(), WatchState::FellBack);
    assert_eq!(browser.new_tabs.len(), 1);
}
