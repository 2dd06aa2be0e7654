use std::collections::{HashSet, VecDeque};

use url::Url;

use super::{EventKind, HostEvent, LinkActivation, NavigationHost};

/// Session history kept in memory
///
/// Behaves like a browser tab without a document: `push_state` drops any
/// forward entries, `back`/`forward` move the cursor and queue a
/// [`HostEvent::HistoryChanged`], and [`click`](MemoryHost::click) queues a
/// link activation. Events are only queued for kinds someone subscribed to.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{EventKind, HostEvent, MemoryHost, NavigationHost};
///
/// let mut host = MemoryHost::parse("https://app.test/").unwrap();
/// host.subscribe(EventKind::HistoryChange);
///
/// host.push_state(&"https://app.test/users".parse().unwrap());
/// assert_eq!(host.history_length(), 2);
///
/// host.back();
/// assert_eq!(host.current_url().path(), "/");
/// assert_eq!(host.poll_event(), Some(HostEvent::HistoryChanged));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHost {
    entries: Vec<Url>,
    index: usize,
    subscriptions: HashSet<EventKind>,
    pending: VecDeque<HostEvent>,
}

impl MemoryHost {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            subscriptions: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn parse(initial: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(initial)?))
    }

    /// Simulates a link activation
    pub fn click(&mut self, link: LinkActivation) {
        self.emit(HostEvent::LinkActivated(link));
    }

    /// Moves `delta` entries through history, clamped to its ends
    pub fn go(&mut self, delta: isize) {
        let last = self.entries.len() as isize - 1;
        let target = (self.index as isize + delta).clamp(0, last) as usize;
        if target != self.index {
            self.index = target;
            self.emit(HostEvent::HistoryChanged);
        }
    }

    pub fn forward(&mut self) {
        self.go(1);
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    /// Position of the current entry in [`entries`](MemoryHost::entries)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    fn emit(&mut self, event: HostEvent) {
        if self.is_subscribed(event.kind()) {
            self.pending.push_back(event);
        }
    }
}

impl NavigationHost for MemoryHost {
    fn current_url(&self) -> Url {
        self.entries[self.index].clone()
    }

    fn history_length(&self) -> usize {
        self.entries.len()
    }

    fn push_state(&mut self, url: &Url) {
        self.entries.truncate(self.index + 1);
        self.entries.push(url.clone());
        self.index += 1;
    }

    fn replace_state(&mut self, url: &Url) {
        self.entries[self.index] = url.clone();
    }

    fn back(&mut self) {
        self.go(-1);
    }

    fn subscribe(&mut self, kind: EventKind) {
        self.subscriptions.insert(kind);
    }

    fn unsubscribe(&mut self, kind: EventKind) {
        self.subscriptions.remove(&kind);
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.pending.pop_front()
    }
}
