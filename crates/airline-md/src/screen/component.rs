//! The app component: shared state of all screens.

use std::sync::Arc;

use airline_md_core::SharedTaskQueue;
use airline_md_core::logging::targets;
use parking_lot::Mutex;

use super::detail::DetailScreen;
use super::flight::FlightDetailScreen;
use super::list::ListScreen;
use super::router::{Layout, Navigator, Route, Target};
use crate::config::AppConfig;
use crate::selector::ListSelector;
use crate::service::SharedService;

/// Owns everything the screens share.
///
/// Screens hold an `Arc<AppComponent>`; the component never holds its
/// screens. The single [`ListSelector`] lives here so the list and detail
/// screens coordinate through it.
pub struct AppComponent {
    config: AppConfig,
    service: SharedService,
    queue: SharedTaskQueue,
    navigator: Arc<dyn Navigator>,
    selector: Arc<ListSelector>,
    layout: Mutex<Layout>,
}

impl AppComponent {
    pub fn new(
        config: AppConfig,
        service: SharedService,
        queue: SharedTaskQueue,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        queue.set_batch_size(config.list.batch_size);
        Arc::new(Self {
            config,
            service,
            queue,
            navigator,
            selector: Arc::new(ListSelector::new()),
            layout: Mutex::new(Layout::default()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn service(&self) -> &SharedService {
        &self.service
    }

    pub fn queue(&self) -> &SharedTaskQueue {
        &self.queue
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn selector(&self) -> &Arc<ListSelector> {
        &self.selector
    }

    pub fn layout(&self) -> Layout {
        *self.layout.lock()
    }

    pub fn set_layout(&self, layout: Layout) {
        *self.layout.lock() = layout;
    }

    pub fn create_list_screen(self: &Arc<Self>) -> Arc<ListScreen> {
        ListScreen::new(self.clone())
    }

    pub fn create_detail_screen(self: &Arc<Self>) -> Arc<DetailScreen> {
        DetailScreen::new(self.clone())
    }

    pub fn create_flight_detail_screen(self: &Arc<Self>) -> Arc<FlightDetailScreen> {
        FlightDetailScreen::new(self.clone())
    }

    /// Resolves a location hash. Unmatched hashes display
    /// [`Target::NotFound`] and return `None`; the caller then reports the
    /// bypass to the list screen.
    pub fn navigate(&self, hash: &str) -> Option<Route> {
        match Route::parse(hash) {
            Some(route) => {
                self.navigator.nav_to(route.clone());
                Some(route)
            }
            None => {
                tracing::debug!(target: targets::SCREEN, hash, "no route matched");
                self.navigator.display(Target::NotFound);
                None
            }
        }
    }

    /// Runs queued service responses until the queue is empty.
    pub fn process_events(&self) -> usize {
        self.queue.process_all()
    }
}

static_assertions::assert_impl_all!(AppComponent: Send, Sync);
