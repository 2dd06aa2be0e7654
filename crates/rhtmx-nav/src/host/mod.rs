//! The seam between the router and whatever owns the real history stack
//!
//! A [`NavigationHost`] is the embedding environment: a browser window, a
//! webview, or [`MemoryHost`] in tests. The router only ever talks to it
//! through this trait.

use url::Url;

mod memory;

pub use memory::MemoryHost;

/// Events the router can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A link was activated somewhere in the document
    LinkActivation,
    /// The history entry changed without the router asking (back/forward)
    HistoryChange,
}

/// An event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    LinkActivated(LinkActivation),
    HistoryChanged,
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::LinkActivated(_) => EventKind::LinkActivation,
            HostEvent::HistoryChanged => EventKind::HistoryChange,
        }
    }
}

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

/// A click on an anchor
///
/// # Examples
///
/// ```
/// use rhtmx_nav::LinkActivation;
///
/// assert!(LinkActivation::new("/users/7").is_plain());
/// assert!(!LinkActivation::new("/users/7").with_button(1).is_plain());
/// assert!(!LinkActivation::new("/report.pdf").with_download().is_plain());
/// assert!(LinkActivation::new("/x").with_target("_self").is_plain());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkActivation {
    /// The anchor's `href`, as written
    pub href: String,
    /// Mouse button; 0 is the primary button
    pub button: u16,
    pub modifiers: Modifiers,
    /// The anchor's `target` attribute
    pub target: Option<String>,
    /// Whether the anchor carries `download`
    pub download: bool,
    /// Whether another handler already took the event
    pub default_prevented: bool,
}

impl LinkActivation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            button: 0,
            modifiers: Modifiers::default(),
            target: None,
            download: false,
            default_prevented: false,
        }
    }

    pub fn with_button(mut self, button: u16) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }

    pub fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }

    /// A primary click with no modifiers that would open in the same
    /// browsing context
    ///
    /// Whether the href stays on the current origin is checked separately
    /// by the router, since that needs the current URL.
    pub fn is_plain(&self) -> bool {
        self.button == 0
            && !self.modifiers.any()
            && self.target.as_deref().map_or(true, |t| t.is_empty() || t == "_self")
            && !self.download
            && !self.default_prevented
    }
}

/// Whether the router took over an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The router navigated; the host must suppress its default action
    Handled,
    /// The host should carry on as if the router did not exist
    PassThrough,
}

/// History stack and event source of the embedding environment
pub trait NavigationHost {
    /// URL of the current history entry
    fn current_url(&self) -> Url;

    /// Number of entries in the session history
    fn history_length(&self) -> usize;

    /// Adds a new entry after the current one
    fn push_state(&mut self, url: &Url);

    /// Replaces the current entry
    fn replace_state(&mut self, url: &Url);

    /// Moves one entry back; the host later reports
    /// [`HostEvent::HistoryChanged`]
    fn back(&mut self);

    fn subscribe(&mut self, kind: EventKind);

    fn unsubscribe(&mut self, kind: EventKind);

    /// Next queued event, for hosts that are polled rather than pushing
    /// events into [`Router::dispatch`](crate::Router::dispatch)
    fn poll_event(&mut self) -> Option<HostEvent> {
        None
    }
}
