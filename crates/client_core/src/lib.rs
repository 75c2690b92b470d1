//! Client side of the hero roster: the HTTP client for the hero API, the
//! view-state controller that drives the page, and its render-ready view.

pub mod controller;
pub mod draft;
pub mod error;
pub mod remote;
pub mod view;

pub use controller::{HeroViewController, PendingRefresh, PendingSubmit, UiStatus, ViewState};
pub use draft::{parse_humility_score, DraftField, DraftForm};
pub use error::HeroError;
pub use remote::{HeroCollectionClient, HttpClientOptions, HttpHeroClient};
pub use view::HeroesView;
