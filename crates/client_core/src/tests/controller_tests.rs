use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use shared::{domain::HeroId, protocol::CreateHeroRequest};
use tokio::sync::{oneshot, Mutex};

use super::*;
use crate::{error::VALIDATION_MESSAGE, view::HeroesView};

type ListResult = Result<Vec<HeroRecord>, HeroError>;

enum ListReply {
    Ready(ListResult),
    Held(oneshot::Receiver<ListResult>),
}

enum CreateReply {
    Ready(Result<(), HeroError>),
    Held(oneshot::Receiver<Result<(), HeroError>>),
}

/// Scripted hero API. Unscripted calls succeed with an empty list / `Ok(())`.
#[derive(Default)]
struct FakeHeroClient {
    list_replies: Mutex<VecDeque<ListReply>>,
    create_replies: Mutex<VecDeque<CreateReply>>,
    created: Mutex<Vec<CreateHeroRequest>>,
    list_calls: AtomicUsize,
}

impl FakeHeroClient {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn reply_list(&self, result: ListResult) {
        self.list_replies
            .lock()
            .await
            .push_back(ListReply::Ready(result));
    }

    async fn hold_list(&self) -> oneshot::Sender<ListResult> {
        let (tx, rx) = oneshot::channel();
        self.list_replies.lock().await.push_back(ListReply::Held(rx));
        tx
    }

    async fn reply_create(&self, result: Result<(), HeroError>) {
        self.create_replies
            .lock()
            .await
            .push_back(CreateReply::Ready(result));
    }

    async fn hold_create(&self) -> oneshot::Sender<Result<(), HeroError>> {
        let (tx, rx) = oneshot::channel();
        self.create_replies
            .lock()
            .await
            .push_back(CreateReply::Held(rx));
        tx
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn created(&self) -> Vec<CreateHeroRequest> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl HeroCollectionClient for FakeHeroClient {
    async fn list_heroes(&self) -> Result<Vec<HeroRecord>, HeroError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.list_replies.lock().await.pop_front();
        match reply {
            Some(ListReply::Ready(result)) => result,
            Some(ListReply::Held(rx)) => rx.await.unwrap_or(Err(HeroError::Unknown)),
            None => Ok(Vec::new()),
        }
    }

    async fn create_hero(&self, request: &CreateHeroRequest) -> Result<(), HeroError> {
        self.created.lock().await.push(request.clone());
        let reply = self.create_replies.lock().await.pop_front();
        match reply {
            Some(CreateReply::Ready(result)) => result,
            Some(CreateReply::Held(rx)) => rx.await.unwrap_or(Err(HeroError::Unknown)),
            None => Ok(()),
        }
    }
}

fn hero(id: &str, name: &str, score: f64) -> HeroRecord {
    HeroRecord {
        id: HeroId(id.into()),
        name: name.into(),
        superpower: "Fixes bugs".into(),
        humility_score: score,
    }
}

async fn fill_draft(controller: &HeroViewController, name: &str, power: &str, score: &str) {
    controller.update_draft_field(DraftField::Name, name).await;
    controller
        .update_draft_field(DraftField::Superpower, power)
        .await;
    controller
        .update_draft_field(DraftField::HumilityScore, score)
        .await;
}

/// Yields until `check` holds for the controller state.
async fn wait_for(controller: &HeroViewController, check: impl Fn(&ViewState) -> bool) {
    for _ in 0..1000 {
        if check(&controller.snapshot().await) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("controller never reached expected state");
}

#[tokio::test]
async fn start_fetches_the_collection_once() {
    let fake = FakeHeroClient::new();
    fake.reply_list(Ok(vec![hero("1", "Debugger Man", 5.0)]))
        .await;

    let controller = HeroViewController::start(fake.clone()).await;
    let state = controller.snapshot().await;

    assert_eq!(fake.list_calls(), 1);
    assert_eq!(state.heroes, vec![hero("1", "Debugger Man", 5.0)]);
    assert_eq!(state.draft, DraftForm::default());
    assert!(!state.status.form_visible);
    assert!(!state.status.is_busy());
    assert!(state.status.error_message.is_none());
}

#[tokio::test]
async fn first_load_failure_keeps_the_empty_list() {
    let fake = FakeHeroClient::new();
    fake.reply_list(Err(HeroError::remote(500, "Error al obtener superhéroes")))
        .await;

    let controller = HeroViewController::start(fake.clone()).await;
    let state = controller.snapshot().await;

    assert!(state.heroes.is_empty());
    assert_eq!(
        state.status.error_message.as_deref(),
        Some("Error al obtener superhéroes")
    );
    assert!(!state.status.is_busy());
}

#[tokio::test]
async fn failed_refresh_leaves_prior_list_untouched() {
    let fake = FakeHeroClient::new();
    fake.reply_list(Ok(vec![hero("1", "Debugger Man", 5.0)]))
        .await;
    let controller = HeroViewController::start(fake.clone()).await;

    fake.reply_list(Err(HeroError::remote(503, "Error al obtener superhéroes")))
        .await;
    let err = controller.refresh_collection().await.expect_err("must fail");

    assert_eq!(err, HeroError::remote(503, "Error al obtener superhéroes"));
    let state = controller.snapshot().await;
    assert_eq!(state.heroes, vec![hero("1", "Debugger Man", 5.0)]);
    assert_eq!(
        state.status.error_message.as_deref(),
        Some("Error al obtener superhéroes")
    );
}

#[tokio::test]
async fn successful_refresh_replaces_list_and_clears_error() {
    let fake = FakeHeroClient::new();
    fake.reply_list(Err(HeroError::remote(500, "Error al obtener superhéroes")))
        .await;
    let controller = HeroViewController::start(fake.clone()).await;

    fake.reply_list(Ok(vec![hero("2", "Null Pointer", 8.0)]))
        .await;
    controller.refresh_collection().await.expect("refresh");

    let state = controller.snapshot().await;
    assert_eq!(state.heroes, vec![hero("2", "Null Pointer", 8.0)]);
    assert!(state.status.error_message.is_none());
}

#[tokio::test]
async fn draft_updates_are_structural() {
    let controller = HeroViewController::new(FakeHeroClient::new());

    fill_draft(&controller, "Debugger Man", "Fixes bugs", "7.5").await;
    controller
        .update_draft_field(DraftField::Name, "Stack Overflow")
        .await;

    let draft = controller.snapshot().await.draft;
    assert_eq!(draft.name, "Stack Overflow");
    assert_eq!(draft.superpower, "Fixes bugs");
    assert_eq!(draft.humility_score, 7.5);
}

#[tokio::test]
async fn unparsable_score_text_is_stored_as_zero() {
    let controller = HeroViewController::new(FakeHeroClient::new());

    for raw in ["", "abc", "NaN", "--"] {
        controller
            .update_draft_field(DraftField::HumilityScore, "9")
            .await;
        controller
            .update_draft_field(DraftField::HumilityScore, raw)
            .await;
        assert_eq!(
            controller.snapshot().await.draft.humility_score,
            0.0,
            "input {raw:?}"
        );
    }
}

#[tokio::test]
async fn out_of_range_scores_never_reach_the_network() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    controller.toggle_form_visibility().await;

    for raw in ["0", "0.99", "10.01", "11", "-3", "Infinity", "junk"] {
        fill_draft(&controller, "Debugger Man", "Fixes bugs", raw).await;
        let before = controller.snapshot().await;

        let err = controller.submit_draft().await.expect_err("must fail");
        assert_eq!(err, HeroError::Validation);

        let after = controller.snapshot().await;
        assert_eq!(after.status.error_message.as_deref(), Some(VALIDATION_MESSAGE));
        assert_eq!(after.draft, before.draft, "draft kept for {raw:?}");
        assert!(after.status.form_visible);
        assert!(!after.status.is_busy());
    }

    assert!(fake.created().await.is_empty());
    assert_eq!(fake.list_calls(), 0);
}

#[tokio::test]
async fn score_of_eleven_reports_range_message() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    fill_draft(&controller, "Debugger Man", "Fixes bugs", "11").await;

    let _ = controller.submit_draft().await;

    assert_eq!(
        controller.snapshot().await.status.error_message.as_deref(),
        Some("La puntuación debe estar entre 1 y 10")
    );
    assert!(fake.created().await.is_empty());
}

#[tokio::test]
async fn boundary_scores_are_accepted() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());

    for raw in ["1", "10"] {
        fill_draft(&controller, "Edge Case", "Boundaries", raw).await;
        controller.submit_draft().await.expect("submit");
    }

    let created = fake.created().await;
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].humility_score, 1.0);
    assert_eq!(created[1].humility_score, 10.0);
}

#[tokio::test]
async fn successful_submit_closes_form_resets_draft_and_refetches() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::start(fake.clone()).await;
    controller.toggle_form_visibility().await;
    fill_draft(&controller, "Debugger Man", "Fixes bugs", "5").await;

    fake.reply_create(Ok(())).await;
    fake.reply_list(Ok(vec![hero("65f1c0ffee", "Debugger Man", 5.0)]))
        .await;
    controller.submit_draft().await.expect("submit");

    assert_eq!(
        fake.created().await,
        vec![CreateHeroRequest {
            name: "Debugger Man".into(),
            superpower: "Fixes bugs".into(),
            humility_score: 5.0,
        }]
    );
    assert_eq!(fake.list_calls(), 2);

    let state = controller.snapshot().await;
    assert!(!state.status.form_visible);
    assert_eq!(state.draft, DraftForm::default());
    assert_eq!(state.heroes, vec![hero("65f1c0ffee", "Debugger Man", 5.0)]);
    assert!(state.status.error_message.is_none());
    assert!(!state.status.is_busy());
}

#[tokio::test]
async fn remote_rejection_keeps_the_users_input() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::start(fake.clone()).await;
    controller.toggle_form_visibility().await;
    fill_draft(&controller, "Debugger Man", "Fixes bugs", "5").await;

    fake.reply_create(Err(HeroError::remote(400, "Nombre duplicado")))
        .await;
    let err = controller.submit_draft().await.expect_err("must fail");

    assert_eq!(err, HeroError::remote(400, "Nombre duplicado"));
    let state = controller.snapshot().await;
    assert_eq!(state.status.error_message.as_deref(), Some("Nombre duplicado"));
    assert_eq!(state.draft.name, "Debugger Man");
    assert_eq!(state.draft.superpower, "Fixes bugs");
    assert_eq!(state.draft.humility_score, 5.0);
    assert!(state.status.form_visible);
    assert_eq!(fake.list_calls(), 1, "no refresh after a failed create");
    assert!(!state.status.is_busy());
}

#[tokio::test]
async fn refresh_failure_after_create_becomes_the_visible_error() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    controller.toggle_form_visibility().await;
    fill_draft(&controller, "Debugger Man", "Fixes bugs", "5").await;

    fake.reply_create(Ok(())).await;
    fake.reply_list(Err(HeroError::remote(500, "Error al obtener superhéroes")))
        .await;
    let err = controller.submit_draft().await.expect_err("refresh fails");

    assert_eq!(err, HeroError::remote(500, "Error al obtener superhéroes"));
    let state = controller.snapshot().await;
    assert_eq!(
        state.status.error_message.as_deref(),
        Some("Error al obtener superhéroes")
    );
    assert!(!state.status.form_visible);
    assert_eq!(state.draft, DraftForm::default());
}

#[tokio::test]
async fn submit_clears_a_previous_error_first() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    fill_draft(&controller, "Debugger Man", "Fixes bugs", "42").await;
    let _ = controller.submit_draft().await;

    controller
        .update_draft_field(DraftField::HumilityScore, "4")
        .await;
    let held = fake.hold_create().await;
    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_draft().await }
    });

    wait_for(&controller, |state| state.status.is_creating()).await;
    assert!(controller.snapshot().await.status.error_message.is_none());

    held.send(Ok(())).expect("release create");
    task.await.expect("join").expect("submit");
}

#[tokio::test]
async fn toggle_touches_neither_draft_nor_error() {
    let fake = FakeHeroClient::new();
    fake.reply_list(Err(HeroError::remote(500, "Error al obtener superhéroes")))
        .await;
    let controller = HeroViewController::start(fake.clone()).await;

    controller.toggle_form_visibility().await;
    fill_draft(&controller, "Half Typed", "Procrastination", "3").await;
    controller.toggle_form_visibility().await;

    let state = controller.snapshot().await;
    assert!(!state.status.form_visible);
    assert_eq!(state.draft.name, "Half Typed");
    assert_eq!(state.draft.humility_score, 3.0);
    assert_eq!(
        state.status.error_message.as_deref(),
        Some("Error al obtener superhéroes")
    );

    controller.toggle_form_visibility().await;
    let state = controller.snapshot().await;
    assert!(state.status.form_visible);
    assert_eq!(state.draft.superpower, "Procrastination");
}

#[tokio::test]
async fn busy_only_while_a_request_is_outstanding() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    assert!(!controller.snapshot().await.status.is_busy());

    let held = fake.hold_list().await;
    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh_collection().await }
    });

    wait_for(&controller, |state| state.status.is_busy()).await;
    let view = HeroesView::from_state(&controller.snapshot().await);
    assert_eq!(view.refresh.label, "Sincronizando...");
    assert!(view.refresh.disabled);
    assert!(view.toggle_form.disabled);

    held.send(Ok(vec![hero("1", "Debugger Man", 5.0)]))
        .expect("release list");
    task.await.expect("join").expect("refresh");

    let state = controller.snapshot().await;
    assert!(!state.status.is_busy());
    assert_eq!(state.heroes.len(), 1);
    let view = HeroesView::from_state(&state);
    assert_eq!(view.refresh.label, "Actualizar Sistema");
    assert!(!view.refresh.disabled);
}

#[tokio::test]
async fn begin_marks_busy_without_touching_the_network() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    fill_draft(&controller, "Ghost", "Invisible", "4").await;
    controller.toggle_form_visibility().await;

    let submit = controller.begin_submit().await;
    let refresh = controller.begin_refresh().await;
    let status = controller.snapshot().await.status;
    assert!(status.is_creating());
    assert!(status.is_refreshing());
    assert!(fake.created().await.is_empty());
    assert_eq!(fake.list_calls(), 0);

    // Later edits do not change what the begun submit sends.
    controller
        .update_draft_field(DraftField::Name, "Renamed")
        .await;
    controller.finish_submit(submit).await.expect("submit");
    controller.finish_refresh(refresh).await.expect("refresh");

    assert_eq!(fake.created().await[0].name, "Ghost");
    assert!(!controller.snapshot().await.status.is_busy());
}

#[tokio::test]
async fn submit_stays_busy_through_its_trailing_refresh() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());
    controller.toggle_form_visibility().await;
    fill_draft(&controller, "Debugger Man", "Fixes bugs", "5").await;

    let held_create = fake.hold_create().await;
    let held_list = fake.hold_list().await;
    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_draft().await }
    });

    wait_for(&controller, |state| state.status.is_creating()).await;
    let form = HeroesView::from_state(&controller.snapshot().await)
        .form
        .expect("form open");
    assert_eq!(form.submit.label, "Compilando Heroe...");
    assert!(form.inputs_disabled);

    held_create.send(Ok(())).expect("release create");
    wait_for(&controller, |state| state.status.is_refreshing()).await;
    let state = controller.snapshot().await;
    assert!(state.status.is_creating());
    assert!(!state.status.form_visible);

    held_list.send(Ok(Vec::new())).expect("release list");
    task.await.expect("join").expect("submit");
    assert!(!controller.snapshot().await.status.is_busy());
}

#[tokio::test]
async fn overlapping_operations_stay_busy_until_the_last_finishes() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());

    let first = fake.hold_list().await;
    let second = fake.hold_list().await;
    let first_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh_collection().await }
    });
    wait_for(&controller, |_| fake.list_calls() == 1).await;
    let second_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh_collection().await }
    });
    wait_for(&controller, |_| fake.list_calls() == 2).await;

    second.send(Ok(Vec::new())).expect("release second");
    second_task.await.expect("join").expect("second refresh");
    assert!(controller.snapshot().await.status.is_busy());

    first.send(Ok(Vec::new())).expect("release first");
    first_task.await.expect("join").expect("first refresh");
    assert!(!controller.snapshot().await.status.is_busy());
}

#[tokio::test]
async fn superseded_refresh_results_are_discarded() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());

    let stale = fake.hold_list().await;
    let stale_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh_collection().await }
    });
    wait_for(&controller, |_| fake.list_calls() == 1).await;

    fake.reply_list(Ok(vec![hero("new", "Fresh Hero", 6.0)]))
        .await;
    controller.refresh_collection().await.expect("latest refresh");

    stale
        .send(Ok(vec![hero("old", "Stale Hero", 2.0)]))
        .expect("release stale");
    stale_task.await.expect("join").expect("stale refresh");

    let state = controller.snapshot().await;
    assert_eq!(state.heroes, vec![hero("new", "Fresh Hero", 6.0)]);
    assert!(!state.status.is_busy());
}

#[tokio::test]
async fn superseded_refresh_failure_does_not_reach_the_banner() {
    let fake = FakeHeroClient::new();
    let controller = HeroViewController::new(fake.clone());

    let stale = fake.hold_list().await;
    let stale_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh_collection().await }
    });
    wait_for(&controller, |_| fake.list_calls() == 1).await;

    fake.reply_list(Ok(vec![hero("new", "Fresh Hero", 6.0)]))
        .await;
    controller.refresh_collection().await.expect("latest refresh");

    stale
        .send(Err(HeroError::remote(500, "Error al obtener superhéroes")))
        .expect("release stale");
    let stale_result = stale_task.await.expect("join");

    assert!(stale_result.is_err());
    let state = controller.snapshot().await;
    assert!(state.status.error_message.is_none());
    assert_eq!(state.heroes.len(), 1);
}
