//! The explorer session: manifest → coordinator → view model → surface.
//!
//! An [`Explorer`] owns everything a session needs. Ingestion events are consumed on the
//! caller's thread through [`Explorer::pump`], so user actions can be interleaved with loading
//! by pumping with [`Wait::Poll`] or [`Wait::Timeout`]. Row batches repaint through the
//! [`RenderThrottle`]; file completions and user actions always repaint.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::error::IngestionResult;
use crate::ingestion::{
    Coordinator, CoordinatorOptions, IngestionObserver, LoadingStatus, Manifest, SessionEvent,
    Source, Wait,
};
use crate::processing::{FilterCriteria, SortKey, ViewModel, ViewOptions};
use crate::render::{Frame, RenderOptions, RenderThrottle, Surface, TextSurface};

/// Manifest name resolved against the source when none is configured.
pub const DEFAULT_MANIFEST: &str = "index.json";

/// Session configuration.
///
/// ```
/// use ewas_explorer::explorer::ExplorerOptions;
///
/// let opts = ExplorerOptions::from_json_str(
///     r#"{ "view": { "page_size": 25 }, "render": { "throttle_ms": 100 } }"#,
/// ).unwrap();
/// assert_eq!(opts.view.page_size, 25);
/// assert_eq!(opts.manifest, "index.json");
/// assert_eq!(opts.coordinator.worker.batch_size, 4000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExplorerOptions {
    /// Manifest entry name, resolved against the source.
    pub manifest: String,
    pub coordinator: CoordinatorOptions,
    pub view: ViewOptions,
    pub render: RenderOptions,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST.to_string(),
            coordinator: CoordinatorOptions::default(),
            view: ViewOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

impl ExplorerOptions {
    /// Read options from JSON. Missing keys keep their defaults.
    pub fn from_json_str(input: &str) -> IngestionResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// One loading session and the state shown to the user.
pub struct Explorer<S: Surface = TextSurface> {
    coordinator: Option<Coordinator>,
    view: ViewModel,
    status: LoadingStatus,
    throttle: RenderThrottle,
    surface: S,
    frame: Frame,
}

impl Explorer<TextSurface> {
    /// Start a session painting onto a [`TextSurface`].
    pub fn start(source: Arc<dyn Source>, options: ExplorerOptions) -> Self {
        Self::start_with_surface(source, TextSurface::new(), options)
    }
}

impl<S: Surface> Explorer<S> {
    /// Load the manifest and prepare the coordinator. Nothing is ingested until the first
    /// [`Explorer::pump`].
    ///
    /// A manifest that cannot be loaded leaves the session in its fatal state: the status
    /// carries the error, no files are loaded and the surface shows a diagnostic frame.
    pub fn start_with_surface(
        source: Arc<dyn Source>,
        surface: S,
        options: ExplorerOptions,
    ) -> Self {
        let location = source.resolve(&options.manifest);
        let view = ViewModel::new(options.view);

        let (coordinator, status) = match Manifest::load(source.as_ref(), &location) {
            Ok(manifest) => {
                let files = manifest.file_refs(source.as_ref());
                tracing::info!(manifest = %location, files = files.len(), "session started");
                let coordinator = Coordinator::new(source, files, options.coordinator);
                let status = coordinator.status().clone();
                (Some(coordinator), status)
            }
            Err(e) => {
                tracing::error!(manifest = %location, error = %e, "manifest could not be loaded");
                (None, LoadingStatus::failed(e.to_string()))
            }
        };

        let frame = Frame::project(&view, &status);
        let mut explorer = Self {
            coordinator,
            view,
            status,
            throttle: options.render.throttle(),
            surface,
            frame,
        };
        explorer.refresh(true);
        explorer
    }

    /// Attach an ingestion observer. Has no effect on a session that failed to start.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.coordinator = self.coordinator.take().map(|c| c.with_observer(observer));
        self
    }

    /// Process at most one session event, waiting according to `wait`.
    ///
    /// Returns `true` while ingestion is still running.
    pub fn pump(&mut self, wait: Wait) -> bool {
        let Some(coordinator) = self.coordinator.as_mut() else {
            return false;
        };
        let event = coordinator.next_event(wait);
        self.status.clone_from(coordinator.status());
        let running = !coordinator.is_finished();

        match event {
            Some(SessionEvent::Rows { rows, .. }) => {
                self.view.append_rows(rows);
                self.refresh(false);
            }
            Some(SessionEvent::FileCompleted { .. } | SessionEvent::FileFailed { .. }) => {
                self.view.refresh_filter_options();
                self.refresh(true);
            }
            None => {
                if self.throttle.flush_due(Instant::now()) {
                    self.paint();
                }
            }
        }

        if !running {
            tracing::info!(
                files = self.status.files_total,
                failed = self.status.errors.len(),
                rows = self.status.rows_loaded,
                "session finished"
            );
            self.coordinator = None;
            if self.throttle.has_pending() {
                self.refresh(true);
            }
        }
        running
    }

    /// Block until every file has reached its terminal event.
    pub fn run_to_completion(&mut self) {
        while self.pump(Wait::Block) {}
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_some()
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn status(&self) -> &LoadingStatus {
        &self.status
    }

    /// The last painted frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.view.set_criteria(criteria);
        self.refresh(true);
    }

    pub fn reset_filters(&mut self) {
        self.view.reset_filters();
        self.refresh(true);
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.view.toggle_sort(key);
        self.refresh(true);
    }

    /// Go to page `n` (clamped). Returns the resulting page.
    pub fn set_page(&mut self, n: usize) -> usize {
        let page = self.view.set_page(n);
        self.refresh(true);
        page
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.view.next_page();
        self.refresh(true);
        moved
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.view.prev_page();
        self.refresh(true);
        moved
    }

    fn refresh(&mut self, force: bool) {
        if self.throttle.request(Instant::now(), force) {
            self.paint();
        }
    }

    fn paint(&mut self) {
        self.frame = Frame::project(&self.view, &self.status);
        self.surface.paint(&self.frame);
    }
}
