//! View-state controller: owns the hero list, the draft form and the UI
//! status, and reconciles remote results into them.
//!
//! The controller is shared as `Arc<HeroViewController>`. State sits behind a
//! mutex that is only held for synchronous transitions, never across a
//! request, so a refresh can start while a submission is still waiting on the
//! network. Refusing input while busy is left to the caller.

use std::sync::Arc;

use shared::domain::{is_valid_humility_score, HeroRecord};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::{
    draft::{DraftField, DraftForm},
    error::HeroError,
    remote::HeroCollectionClient,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiStatus {
    pub form_visible: bool,
    pub error_message: Option<String>,
    creates_in_flight: u32,
    refreshes_in_flight: u32,
}

impl UiStatus {
    pub fn is_creating(&self) -> bool {
        self.creates_in_flight > 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    /// True while any network-bound operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.is_creating() || self.is_refreshing()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub heroes: Vec<HeroRecord>,
    pub draft: DraftForm,
    pub status: UiStatus,
}

#[derive(Default)]
struct ControllerState {
    view: ViewState,
    /// Generation of the most recently issued refresh; only that one may
    /// write its outcome.
    latest_refresh: u64,
}

/// A submission whose busy marker is already set; hand it to
/// [`HeroViewController::finish_submit`] to send the request.
#[must_use = "the create stays marked in flight until finished"]
#[derive(Debug)]
pub struct PendingSubmit {
    draft: DraftForm,
}

#[must_use = "the refresh stays marked in flight until finished"]
#[derive(Debug)]
pub struct PendingRefresh {
    generation: u64,
}

pub struct HeroViewController {
    client: Arc<dyn HeroCollectionClient>,
    inner: Mutex<ControllerState>,
}

impl HeroViewController {
    pub fn new(client: Arc<dyn HeroCollectionClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            inner: Mutex::new(ControllerState::default()),
        })
    }

    /// Builds the controller and performs the initial list fetch. A failed
    /// fetch is left on the error banner rather than returned.
    pub async fn start(client: Arc<dyn HeroCollectionClient>) -> Arc<Self> {
        let controller = Self::new(client);
        let _ = controller.refresh_collection().await;
        controller
    }

    pub async fn snapshot(&self) -> ViewState {
        self.inner.lock().await.view.clone()
    }

    pub async fn update_draft_field(&self, field: DraftField, raw: &str) {
        let mut guard = self.inner.lock().await;
        guard.view.draft.apply(field, raw);
    }

    /// Shows or hides the form. Hiding keeps whatever was typed.
    pub async fn toggle_form_visibility(&self) {
        let mut guard = self.inner.lock().await;
        guard.view.status.form_visible = !guard.view.status.form_visible;
    }

    /// Validates and posts the draft, then re-fetches the list.
    ///
    /// On failure the draft and form visibility are left as they were and
    /// the error text is put on the banner. The new hero only shows up once
    /// the trailing refresh succeeds.
    pub async fn submit_draft(&self) -> Result<(), HeroError> {
        let pending = self.begin_submit().await;
        self.finish_submit(pending).await
    }

    /// First half of [`submit_draft`](Self::submit_draft): clears the banner,
    /// marks a create in flight and captures the draft. Runs no request, so
    /// callers can mark the view busy before handing the rest to a task.
    pub async fn begin_submit(&self) -> PendingSubmit {
        let mut guard = self.inner.lock().await;
        guard.view.status.error_message = None;
        guard.view.status.creates_in_flight += 1;
        PendingSubmit {
            draft: guard.view.draft.clone(),
        }
    }

    pub async fn finish_submit(&self, pending: PendingSubmit) -> Result<(), HeroError> {
        let draft = pending.draft;
        let created = self.create(&draft).await;
        {
            let mut guard = self.inner.lock().await;
            match &created {
                Ok(()) => {
                    guard.view.status.form_visible = false;
                    guard.view.draft = DraftForm::default();
                }
                Err(err) => {
                    error!(%err, name = %draft.name, "failed to create hero");
                    guard.view.status.error_message = Some(err.user_message());
                }
            }
        }

        // Refresh failures reach the banner through refresh_collection itself.
        let result = match created {
            Ok(()) => self.refresh_collection().await,
            Err(err) => Err(err),
        };

        let mut guard = self.inner.lock().await;
        guard.view.status.creates_in_flight =
            guard.view.status.creates_in_flight.saturating_sub(1);
        result
    }

    async fn create(&self, draft: &DraftForm) -> Result<(), HeroError> {
        if !is_valid_humility_score(draft.humility_score) {
            return Err(HeroError::Validation);
        }
        self.client.create_hero(&draft.to_request()).await
    }

    /// Replaces the list wholesale with a fresh fetch.
    ///
    /// When a newer refresh has been issued in the meantime this one's
    /// outcome is dropped: neither the list nor the banner change, though the
    /// caller still gets the result.
    pub async fn refresh_collection(&self) -> Result<(), HeroError> {
        let pending = self.begin_refresh().await;
        self.finish_refresh(pending).await
    }

    /// First half of [`refresh_collection`](Self::refresh_collection): takes
    /// a generation, marks a refresh in flight and clears the banner.
    pub async fn begin_refresh(&self) -> PendingRefresh {
        let mut guard = self.inner.lock().await;
        guard.latest_refresh += 1;
        guard.view.status.refreshes_in_flight += 1;
        guard.view.status.error_message = None;
        PendingRefresh {
            generation: guard.latest_refresh,
        }
    }

    pub async fn finish_refresh(&self, pending: PendingRefresh) -> Result<(), HeroError> {
        let generation = pending.generation;
        let fetched = self.client.list_heroes().await;

        let mut guard = self.inner.lock().await;
        guard.view.status.refreshes_in_flight =
            guard.view.status.refreshes_in_flight.saturating_sub(1);

        if generation != guard.latest_refresh {
            debug!(
                generation,
                latest = guard.latest_refresh,
                "discarding superseded hero list result"
            );
            return fetched.map(|_| ());
        }

        match fetched {
            Ok(heroes) => {
                guard.view.heroes = heroes;
                guard.view.status.error_message = None;
                Ok(())
            }
            Err(err) => {
                error!(%err, "failed to refresh hero list");
                guard.view.status.error_message = Some(err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
