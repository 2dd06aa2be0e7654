//! Navigation host integration
//!
//! The [`Router`] owns the current [`Location`] and [`Route`], keeps the
//! host's history in step with them and hands the selected views to a
//! [`Presenter`]. Every transition runs to completion inside one `&mut self`
//! call, so the state is never observed half-updated.
//!
//! ```
//! use std::sync::Arc;
//! use rhtmx_nav::{
//!     builtin, MemoryHost, NavigateOptions, ParamRegistry, ParamValue, RenderError,
//!     RouteDefinition, RouteTree, Router, ViewChain,
//! };
//!
//! let mut registry = ParamRegistry::new();
//! registry.add_path_validator("uid", builtin::int()).unwrap();
//!
//! let mut tree = RouteTree::new(Arc::new(registry));
//! tree.add("/", RouteDefinition::component("Home")).unwrap();
//! tree.add("/users/:uid", RouteDefinition::component("User")).unwrap();
//!
//! let host = MemoryHost::parse("https://app.test/").unwrap();
//! let mut rendered = Vec::new();
//! let presenter = |view: &ViewChain<'_, &'static str>| -> Result<(), RenderError> {
//!     rendered.push(*view.component);
//!     Ok(())
//! };
//!
//! let mut router = Router::new(tree, host, presenter);
//! router.start().unwrap();
//! router.navigate("users/7", NavigateOptions::default()).unwrap();
//!
//! assert_eq!(router.location().unwrap().path_param("uid"), Some(&ParamValue::Int(7)));
//! drop(router);
//! assert_eq!(rendered, vec!["Home", "User"]);
//! ```

use std::sync::Arc;

use tracing::{debug, error, warn};
use url::Url;

use crate::error::{NavError, RenderError};
use crate::host::{Disposition, EventKind, HostEvent, LinkActivation, NavigationHost};
use crate::location::Location;
use crate::param::Params;
use crate::target::Target;
use crate::tree::{Route, RouteTree};

/// Which of the route's views is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    /// The matched component, wrapped in its layout
    #[default]
    Default,
    /// The layout on its own
    Layout,
    /// The inherited not-found view, wrapped in the layout
    NotFound,
    /// The inherited error view, wrapped in the layout
    Error,
}

/// What the presenter is asked to render
#[derive(Debug)]
pub struct ViewChain<'a, V> {
    pub route: &'a Route<V>,
    pub location: &'a Location,
    /// The view actually selected; falls back to `Default` when the route
    /// lacks the requested one
    pub active: ActiveView,
    /// Wrapper around `component`, if any
    pub layout: Option<&'a V>,
    pub component: &'a V,
    /// Failure shown by an error view
    pub failure: Option<&'a RenderError>,
}

impl<'a, V> ViewChain<'a, V> {
    fn select(
        route: &'a Route<V>,
        location: &'a Location,
        active: ActiveView,
        failure: Option<&'a RenderError>,
    ) -> Self {
        let wrapped = |active: ActiveView, component: &'a V| ViewChain {
            route,
            location,
            active,
            layout: route.layout.as_ref(),
            component,
            failure: None,
        };

        match active {
            ActiveView::Layout => match &route.layout {
                Some(layout) => ViewChain {
                    layout: None,
                    ..wrapped(ActiveView::Layout, layout)
                },
                None => wrapped(ActiveView::Default, &route.component),
            },
            ActiveView::NotFound => match &route.not_found {
                Some(not_found) => wrapped(ActiveView::NotFound, not_found),
                None => wrapped(ActiveView::Default, &route.component),
            },
            ActiveView::Error => match &route.error {
                Some(error) => ViewChain {
                    failure,
                    ..wrapped(ActiveView::Error, error)
                },
                None => wrapped(ActiveView::Default, &route.component),
            },
            ActiveView::Default => wrapped(ActiveView::Default, &route.component),
        }
    }
}

/// The rendering side of the router
pub trait Presenter<V> {
    fn present(&mut self, view: &ViewChain<'_, V>) -> Result<(), RenderError>;
}

impl<V, F> Presenter<V> for F
where
    F: FnMut(&ViewChain<'_, V>) -> Result<(), RenderError>,
{
    fn present(&mut self, view: &ViewChain<'_, V>) -> Result<(), RenderError> {
        self(view)
    }
}

/// How a navigation touches the host's history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current entry instead of pushing a new one
    pub replace: bool,
    /// Leave history alone entirely
    pub no_history: bool,
}

impl NavigateOptions {
    pub fn replacing() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }

    pub fn without_history() -> Self {
        Self {
            no_history: true,
            ..Self::default()
        }
    }
}

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// A route matched and is now current
    Completed,
    /// Nothing matched
    ///
    /// Programmatic navigation keeps the current state. A reload or history
    /// move clears it, since the host URL no longer shows that location.
    NoMatch,
}

/// A navigation request by route alias
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{params, AliasLink};
///
/// let link = AliasLink::new("user")
///     .with_params(params([("uid", 7)]))
///     .with_search(params([("tab", "billing")]))
///     .with_hash("top");
/// assert_eq!(link.alias, "user");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasLink {
    pub alias: String,
    pub params: Params,
    pub search: Params,
    pub hash: String,
}

impl AliasLink {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_search(mut self, search: Params) -> Self {
        self.search = search;
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }
}

#[derive(Debug)]
struct Current<V> {
    location: Location,
    route: Route<V>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryWrite {
    Push,
    Replace,
    Skip,
}

/// Browser-style navigation over a [`RouteTree`]
pub struct Router<V, H, P> {
    tree: Arc<RouteTree<V>>,
    host: H,
    presenter: P,
    current: Option<Current<V>>,
    active: ActiveView,
    failure: Option<RenderError>,
    started: bool,
}

impl<V, H, P> Router<V, H, P>
where
    V: Clone,
    H: NavigationHost,
    P: Presenter<V>,
{
    pub fn new(tree: impl Into<Arc<RouteTree<V>>>, host: H, presenter: P) -> Self {
        Self {
            tree: tree.into(),
            host,
            presenter,
            current: None,
            active: ActiveView::Default,
            failure: None,
            started: false,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Subscribes to host events and loads the host's current URL
    pub fn start(&mut self) -> Result<Navigation, NavError> {
        if !self.started {
            self.host.subscribe(EventKind::LinkActivation);
            self.host.subscribe(EventKind::HistoryChange);
            self.started = true;
        }
        self.reload()
    }

    pub fn stop(&mut self) {
        if self.started {
            self.host.unsubscribe(EventKind::LinkActivation);
            self.host.unsubscribe(EventKind::HistoryChange);
            self.started = false;
        }
    }

    /// Re-resolves the host's current URL without writing history
    ///
    /// When the URL has no route the router is left without a location.
    pub fn reload(&mut self) -> Result<Navigation, NavError> {
        let url = self.host.current_url();
        let target = Target::from_url(&url, self.tree.registry());
        let outcome = self.go(target, HistoryWrite::Skip)?;

        if outcome == Navigation::NoMatch && self.current.take().is_some() {
            debug!(url = %url, "host moved to a URL with no route");
            self.active = ActiveView::Default;
            self.failure = None;
        }
        Ok(outcome)
    }

    // ========================================================================
    // Programmatic navigation
    // ========================================================================

    /// Navigates to `raw`, resolved against the current location
    pub fn navigate(&mut self, raw: &str, options: NavigateOptions) -> Result<Navigation, NavError> {
        let origin = self.host.current_url();
        let base = match &self.current {
            Some(current) => current.location.target().clone(),
            None => Target::from_url(&origin, self.tree.registry()),
        };

        let url = base.join(raw, &origin)?;
        let target = Target::from_url(&url, self.tree.registry());
        let write = self.history_write(&target, options);
        self.go(target, write)
    }

    /// Navigates to the nearest route above the current one
    pub fn navigate_up(&mut self, options: NavigateOptions) -> Result<Navigation, NavError> {
        let current = self.current.as_ref().ok_or(NavError::NotStarted)?;

        let Some(route) = self.tree.get_nearest_route(current.location.path()) else {
            debug!(from = %current.location, "no route above the current one");
            return Ok(Navigation::NoMatch);
        };
        let Some(path) = route.path.as_deref() else {
            return Ok(Navigation::NoMatch);
        };

        let target = Target::new(path, "", "");
        let write = self.history_write(&target, options);
        self.commit(target, route, write)
    }

    /// Navigates to `raw`, always replacing the current history entry
    pub fn redirect(&mut self, raw: &str) -> Result<Navigation, NavError> {
        self.navigate(raw, NavigateOptions::replacing())
    }

    /// Navigates to the route registered under `link.alias`
    pub fn navigate_to_alias(
        &mut self,
        link: &AliasLink,
        options: NavigateOptions,
    ) -> Result<Navigation, NavError> {
        let Some(route) = self.tree.get_route_by_alias(&link.alias, &link.params) else {
            debug!(alias = %link.alias, "unknown alias");
            return Ok(Navigation::NoMatch);
        };
        let Some(path) = route.path.as_deref() else {
            debug!(alias = %link.alias, params = ?link.params, "alias params do not fit its pattern");
            return Ok(Navigation::NoMatch);
        };

        let registry = self.tree.registry();
        let search = registry.canonical_search(&registry.serialize_search(&link.search));
        let target = Target::new(path, &search, &link.hash);
        let write = self.history_write(&target, options);
        self.commit(target, route, write)
    }

    /// Goes back one history entry, or up one level when there is none
    ///
    /// The host reports the history move as [`HostEvent::HistoryChanged`];
    /// events a polling host queued are handled before returning. A host
    /// that queued nothing is reloaded directly.
    pub fn back(&mut self) -> Result<Navigation, NavError> {
        if self.host.history_length() <= 1 {
            return self.navigate_up(NavigateOptions::default());
        }

        self.host.back();
        if self.pump()? == 0 {
            return self.reload();
        }
        Ok(match self.current {
            Some(_) => Navigation::Completed,
            None => Navigation::NoMatch,
        })
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Handles one event from the host
    pub fn dispatch(&mut self, event: HostEvent) -> Result<Disposition, NavError> {
        match event {
            HostEvent::LinkActivated(link) => self.follow_link(&link),
            HostEvent::HistoryChanged => {
                self.reload()?;
                Ok(Disposition::Handled)
            }
        }
    }

    /// Handles every event the host has queued, returning how many there were
    pub fn pump(&mut self) -> Result<usize, NavError> {
        let mut handled = 0;
        while let Some(event) = self.host.poll_event() {
            self.dispatch(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    fn follow_link(&mut self, link: &LinkActivation) -> Result<Disposition, NavError> {
        if !link.is_plain() {
            return Ok(Disposition::PassThrough);
        }

        let origin = self.host.current_url();
        let Some(url) = same_origin(&origin, &link.href) else {
            debug!(href = %link.href, "leaving link to the host");
            return Ok(Disposition::PassThrough);
        };

        let target = Target::from_url(&url, self.tree.registry());
        let write = self.history_write(&target, NavigateOptions::default());
        self.go(target, write)?;
        Ok(Disposition::Handled)
    }

    // ========================================================================
    // Active view
    // ========================================================================

    pub fn show_default(&mut self) -> Result<(), NavError> {
        self.show(ActiveView::Default, None).map(|_| ())
    }

    /// Shows the layout alone; `false` when the route has none
    pub fn show_layout(&mut self) -> Result<bool, NavError> {
        self.show(ActiveView::Layout, None)
    }

    /// Shows the inherited not-found view; `false` when there is none
    pub fn show_not_found(&mut self) -> Result<bool, NavError> {
        self.show(ActiveView::NotFound, None)
    }

    /// Shows the inherited error view for `failure`; `false` when there is none
    pub fn show_error(&mut self, failure: RenderError) -> Result<bool, NavError> {
        self.show(ActiveView::Error, Some(failure))
    }

    fn show(&mut self, active: ActiveView, failure: Option<RenderError>) -> Result<bool, NavError> {
        let current = self.current.as_ref().ok_or(NavError::NotStarted)?;
        let available = match active {
            ActiveView::Default => true,
            ActiveView::Layout => current.route.layout.is_some(),
            ActiveView::NotFound => current.route.not_found.is_some(),
            ActiveView::Error => current.route.error.is_some(),
        };
        if !available {
            return Ok(false);
        }

        self.active = active;
        self.failure = failure;
        self.render()?;
        Ok(true)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn location(&self) -> Option<&Location> {
        self.current.as_ref().map(|current| &current.location)
    }

    pub fn route(&self) -> Option<&Route<V>> {
        self.current.as_ref().map(|current| &current.route)
    }

    pub fn active_view(&self) -> ActiveView {
        self.active
    }

    /// The render failure the error view is showing, if any
    pub fn failure(&self) -> Option<&RenderError> {
        self.failure.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn tree(&self) -> &Arc<RouteTree<V>> {
        &self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn history_write(&self, target: &Target, options: NavigateOptions) -> HistoryWrite {
        let unchanged = self
            .current
            .as_ref()
            .map_or(false, |current| current.location.target() == target);

        if options.no_history {
            HistoryWrite::Skip
        } else if options.replace || unchanged {
            HistoryWrite::Replace
        } else {
            HistoryWrite::Push
        }
    }

    fn go(&mut self, target: Target, write: HistoryWrite) -> Result<Navigation, NavError> {
        match self.tree.get_route(target.path()) {
            Some(route) => self.commit(target, route, write),
            None => {
                debug!(target = %target, "no route matches");
                Ok(Navigation::NoMatch)
            }
        }
    }

    fn commit(
        &mut self,
        target: Target,
        route: Route<V>,
        write: HistoryWrite,
    ) -> Result<Navigation, NavError> {
        if write != HistoryWrite::Skip {
            let url = self.url_of(&target)?;
            match write {
                HistoryWrite::Push => self.host.push_state(&url),
                HistoryWrite::Replace => self.host.replace_state(&url),
                HistoryWrite::Skip => {}
            }
        }

        debug!(
            target = %target,
            pattern = %route.pattern_path,
            history = ?write,
            "navigated"
        );

        let location = Location::new(target, &route, self.tree.registry());
        self.current = Some(Current { location, route });
        self.active = ActiveView::Default;
        self.failure = None;
        self.render()?;
        Ok(Navigation::Completed)
    }

    fn url_of(&self, target: &Target) -> Result<Url, NavError> {
        target
            .to_url(&self.host.current_url())
            .map_err(|source| NavError::InvalidTarget {
                raw: target.to_string(),
                source,
            })
    }

    /// Presents the active view, switching to the error view once if
    /// rendering fails
    fn render(&mut self) -> Result<(), NavError> {
        let current = self.current.as_ref().ok_or(NavError::NotStarted)?;
        let chain = ViewChain::select(
            &current.route,
            &current.location,
            self.active,
            self.failure.as_ref(),
        );
        let active = chain.active;

        let Err(failure) = self.presenter.present(&chain) else {
            return Ok(());
        };

        if active == ActiveView::Error || current.route.error.is_none() {
            error!(location = %current.location, error = %failure, "render failed");
            return Err(NavError::Render(failure));
        }

        warn!(
            location = %current.location,
            error = %failure,
            "render failed, switching to the error view"
        );
        self.active = ActiveView::Error;
        self.failure = Some(failure);
        self.render()
    }
}

/// Resolves `href` against `current` when it stays on the same origin
fn same_origin(current: &Url, href: &str) -> Option<Url> {
    let url = current.join(href).ok()?;
    (url.origin() == current.origin()).then_some(url)
}
