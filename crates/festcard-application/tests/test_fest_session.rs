use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use festcard_application::FestSession;
use festcard_core::connection::{FAILED_NAME, INTERRUPTED_REASON, PENDING_BIO, PENDING_NAME};
use festcard_core::{
    Connection, ConnectionId, FestcardError, Persona, Profile, ProfileGenerator, Result,
    SessionStore, User,
};
use festcard_infrastructure::{FileSessionStore, InMemorySessionStore};
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio::time::timeout;

/// Generator whose persona calls can be held until the test releases them.
struct ScriptedGenerator {
    gated: AtomicBool,
    failing: AtomicBool,
    started: Notify,
    release: Notify,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gated: AtomicBool::new(false),
            failing: AtomicBool::new(false),
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    fn gate(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    async fn wait_started(&self) {
        timeout(Duration::from_secs(5), self.started.notified())
            .await
            .expect("generator call never started");
    }

    fn open(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl ProfileGenerator for ScriptedGenerator {
    async fn generate_persona_profile(&self, persona: Persona) -> Result<Profile> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        if self.gated.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(FestcardError::Generation {
                message: "HTTP 503: overloaded".into(),
                status_code: Some(503),
                retryable: true,
            });
        }
        Ok(Profile::new(
            format!("Guest {n}"),
            format!("Generated {persona} bio #{n}"),
            persona,
        )
        .with_socials("@guest", "in/guest"))
    }

    async fn search_public_profile(&self, query: &str) -> Result<Option<Profile>> {
        if "dj nova".contains(&query.to_lowercase()) {
            Ok(Some(Profile::new(
                "DJ Nova",
                "Headlining DJ.",
                Persona::Celebrity,
            )))
        } else {
            Ok(None)
        }
    }
}

async fn logged_in_session(
    generator: Arc<ScriptedGenerator>,
) -> (Arc<FestSession>, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let session = FestSession::with_store(store.clone(), generator).unwrap();
    session.register("alice", Some("pw")).await.unwrap();
    (Arc::new(session), store)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tap_shows_placeholder_then_resolves_in_place() {
    let generator = ScriptedGenerator::new();
    generator.gate();
    let (session, store) = logged_in_session(generator.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.add_simulated_connection().await })
    };
    generator.wait_started().await;

    assert!(session.is_adding_connection());
    let user = session.current_user().await.unwrap();
    assert_eq!(user.connections.len(), 1);
    let pending = user.connections.first().unwrap().clone();
    assert!(pending.is_loading());
    assert!(pending.id().as_str().starts_with("temp_"));
    let shown = pending.display_profile();
    assert_eq!(shown.name, PENDING_NAME);
    assert_eq!(shown.bio, PENDING_BIO);
    assert!(shown.is_loading);
    // placeholder is persisted before the generator answers
    assert_eq!(store.get_current_user().unwrap().unwrap(), user);

    generator.open();
    let settled = task.await.unwrap().unwrap();

    assert!(!session.is_adding_connection());
    assert_eq!(settled.id(), pending.id());
    let user = session.current_user().await.unwrap();
    assert_eq!(user.connections.len(), 1);
    let card = user.connections.first().unwrap();
    assert_eq!(card.id(), pending.id());
    assert!(!card.is_loading());
    let profile = card.profile().unwrap();
    assert_ne!(profile.bio, PENDING_BIO);
    assert_eq!(profile.id.as_deref(), Some(pending.id().as_str()));
    assert!(Persona::SELECTABLE.contains(&profile.persona));
    assert_eq!(store.get_current_user().unwrap().unwrap(), user);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_tap_while_pending_is_busy() {
    let generator = ScriptedGenerator::new();
    generator.gate();
    let (session, _store) = logged_in_session(generator.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.add_simulated_connection().await })
    };
    generator.wait_started().await;

    let err = session.add_simulated_connection().await.unwrap_err();
    assert!(err.is_busy());

    generator.open();
    task.await.unwrap().unwrap();
    assert_eq!(session.current_user().await.unwrap().connections.len(), 1);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_during_tap_is_not_lost() {
    let generator = ScriptedGenerator::new();
    generator.gate();
    let (session, _store) = logged_in_session(generator.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.add_simulated_connection().await })
    };
    generator.wait_started().await;

    assert!(session.search_and_add_connection("DJ Nova").await.unwrap());

    generator.open();
    let settled = task.await.unwrap().unwrap();

    let user = session.current_user().await.unwrap();
    let cards: Vec<&Connection> = user.connections.iter().collect();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].profile().unwrap().name, "DJ Nova");
    assert!(cards[0].id().as_str().starts_with("search_"));
    assert_eq!(cards[1].id(), settled.id());
    assert!(!cards[1].is_loading());
}

#[tokio::test]
async fn test_generator_failure_marks_slot_failed() {
    let generator = ScriptedGenerator::new();
    generator.fail();
    let (session, store) = logged_in_session(generator.clone()).await;

    let settled = session.add_simulated_connection().await.unwrap();
    assert!(settled.is_failed());

    let user = session.current_user().await.unwrap();
    assert_eq!(user.connections.len(), 1);
    let card = user.connections.first().unwrap();
    assert_eq!(card.id(), settled.id());
    assert!(card.is_failed());
    assert!(!card.is_loading());
    assert_eq!(card.display_profile().name, FAILED_NAME);
    assert!(!session.is_adding_connection());
    assert_eq!(store.get_current_user().unwrap().unwrap(), user);
}

#[tokio::test]
async fn test_search_hit_is_prepended() {
    let (session, _store) = logged_in_session(ScriptedGenerator::new()).await;
    session.add_simulated_connection().await.unwrap();

    assert!(session.search_and_add_connection("DJ Nova").await.unwrap());

    let user = session.current_user().await.unwrap();
    assert_eq!(user.connections.len(), 2);
    let first = user.connections.first().unwrap();
    assert_eq!(first.display_profile().name, "DJ Nova");
    assert_eq!(first.profile().unwrap().persona, Persona::Celebrity);
}

#[tokio::test]
async fn test_search_miss_and_empty_query_leave_user_untouched() {
    let (session, _store) = logged_in_session(ScriptedGenerator::new()).await;
    let before = session.current_user().await.unwrap();

    assert!(!session.search_and_add_connection("nonexistent").await.unwrap());
    assert!(!session.search_and_add_connection("   ").await.unwrap());

    assert_eq!(session.current_user().await.unwrap(), before);
}

#[tokio::test]
async fn test_select_persona_fetches_each_persona() {
    let generator = ScriptedGenerator::new();
    let (session, store) = logged_in_session(generator).await;

    for persona in Persona::SELECTABLE {
        let profile = session.select_persona(persona).await.unwrap();
        assert_eq!(profile.persona, persona);

        let user = session.current_user().await.unwrap();
        assert_eq!(user.selected_persona(), persona);
        assert_eq!(user.profile.as_ref(), Some(&profile));
        assert_eq!(store.get_current_user().unwrap().unwrap(), user);
    }
    assert!(!session.is_profile_loading());
}

#[tokio::test]
async fn test_select_celebrity_is_rejected() {
    let generator = ScriptedGenerator::new();
    let (session, _store) = logged_in_session(generator.clone()).await;

    let err = session.select_persona(Persona::Celebrity).await.unwrap_err();
    assert!(matches!(err, FestcardError::InvalidPersona(_)));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        session.current_user().await.unwrap().selected_persona(),
        Persona::Socialite
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_persona_selection_is_visible_before_fetch_completes() {
    let generator = ScriptedGenerator::new();
    generator.gate();
    let (session, store) = logged_in_session(generator.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.select_persona(Persona::Techie).await })
    };
    generator.wait_started().await;

    assert!(session.is_profile_loading());
    let user = session.current_user().await.unwrap();
    assert_eq!(user.selected_persona(), Persona::Techie);
    assert!(user.profile.is_none());
    assert_eq!(
        store.get_current_user().unwrap().unwrap().selected_persona(),
        Persona::Techie
    );
    assert!(session.select_persona(Persona::Artist).await.unwrap_err().is_busy());

    generator.open();
    task.await.unwrap().unwrap();
    assert!(!session.is_profile_loading());
    assert_eq!(
        session.current_user().await.unwrap().profile.unwrap().persona,
        Persona::Techie
    );
}

#[tokio::test]
async fn test_failed_persona_fetch_keeps_previous_profile() {
    let generator = ScriptedGenerator::new();
    let (session, _store) = logged_in_session(generator.clone()).await;
    let first = session.select_persona(Persona::Artist).await.unwrap();

    generator.fail();
    let err = session.select_persona(Persona::Organizer).await.unwrap_err();
    assert!(err.is_generation());

    let user = session.current_user().await.unwrap();
    assert_eq!(user.selected_persona(), Persona::Organizer);
    assert_eq!(user.profile, Some(first));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tap_result_dropped_after_logout() {
    let generator = ScriptedGenerator::new();
    generator.gate();
    let (session, store) = logged_in_session(generator.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.add_simulated_connection().await })
    };
    generator.wait_started().await;
    session.logout().await.unwrap();

    generator.open();
    task.await.unwrap().unwrap();

    assert!(session.current_user().await.is_none());
    assert!(store.get_current_user().unwrap().is_none());
}

#[tokio::test]
async fn test_operations_require_login() {
    let store = Arc::new(InMemorySessionStore::new());
    let session = FestSession::with_store(store, ScriptedGenerator::new()).unwrap();

    assert!(matches!(
        session.add_simulated_connection().await,
        Err(FestcardError::NotLoggedIn)
    ));
    assert!(matches!(
        session.select_persona(Persona::Artist).await,
        Err(FestcardError::NotLoggedIn)
    ));
    assert!(matches!(
        session.search_and_add_connection("DJ Nova").await,
        Err(FestcardError::NotLoggedIn)
    ));
    assert!(!session.is_adding_connection());
    assert!(!session.is_profile_loading());
}

#[tokio::test]
async fn test_register_and_login_rules() {
    let (session, _store) = logged_in_session(ScriptedGenerator::new()).await;

    assert!(matches!(
        session.register("alice", None).await,
        Err(FestcardError::Security(_))
    ));
    assert!(matches!(
        session.register("  ", None).await,
        Err(FestcardError::Security(_))
    ));
    assert!(matches!(
        session.login("alice", Some("wrong")).await,
        Err(FestcardError::Security(_))
    ));
    assert!(matches!(
        session.login("bob", None).await,
        Err(FestcardError::Security(_))
    ));
    assert_eq!(session.login("alice", Some("pw")).await.unwrap().username, "alice");
}

#[tokio::test]
async fn test_session_survives_restart_and_logout_clears_it() {
    let temp_dir = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new();

    {
        let store = Arc::new(FileSessionStore::new(Some(temp_dir.path())).unwrap());
        let session = FestSession::with_store(store, generator.clone()).unwrap();
        session.register("alice", Some("pw")).await.unwrap();
        session.add_simulated_connection().await.unwrap();
        assert!(session.search_and_add_connection("DJ Nova").await.unwrap());
    }

    let store = Arc::new(FileSessionStore::new(Some(temp_dir.path())).unwrap());
    let session = FestSession::with_store(store, generator.clone()).unwrap();
    let user = session.current_user().await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.connections.len(), 2);
    assert_eq!(user.connections.first().unwrap().display_profile().name, "DJ Nova");

    session.logout().await.unwrap();
    assert!(session.current_user().await.is_none());

    let store = Arc::new(FileSessionStore::new(Some(temp_dir.path())).unwrap());
    let session = FestSession::with_store(store, generator).unwrap();
    assert!(session.current_user().await.is_none());

    let user = session.login("alice", Some("pw")).await.unwrap();
    assert_eq!(user.connections.len(), 2);
}

fn user_with_stale_tap() -> User {
    let mut user = User::new("alice", Some("pw".to_string()));
    user.connections
        .push_front(Connection::resolved(
            ConnectionId::new("search_1"),
            Profile::new("DJ Nova", "Headliner.", Persona::Celebrity),
        ))
        .unwrap();
    user.connections
        .push_front(Connection::pending(ConnectionId::new("temp_1"), Utc::now()))
        .unwrap();
    user
}

#[tokio::test]
async fn test_restart_fails_taps_left_pending_by_earlier_run() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = FileSessionStore::new(Some(temp_dir.path())).unwrap();
        store.update_current_user(&user_with_stale_tap()).unwrap();
    }

    let generator = ScriptedGenerator::new();
    let store = Arc::new(FileSessionStore::new(Some(temp_dir.path())).unwrap());
    let session = FestSession::with_store(store, generator).unwrap();

    let user = session.current_user().await.unwrap();
    let stale = user.connections.get(&ConnectionId::new("temp_1")).unwrap();
    assert!(stale.is_failed());
    assert_eq!(stale.display_profile().name, FAILED_NAME);
    assert_eq!(stale.display_profile().bio, INTERRUPTED_REASON);
    assert_eq!(user.afterparty().pending, 0);
    assert_eq!(user.afterparty().failed, 1);

    // written back, not only fixed in memory
    let reread = FileSessionStore::new(Some(temp_dir.path()))
        .unwrap()
        .get_current_user()
        .unwrap()
        .unwrap();
    assert_eq!(reread, user);

    session.add_simulated_connection().await.unwrap();
    let user = session.current_user().await.unwrap();
    assert_eq!(user.connections.len(), 3);
    assert!(user.connections.iter().all(|c| !c.is_loading()));
    assert_eq!(user.afterparty().cards.len(), 2);
}

#[tokio::test]
async fn test_login_fails_taps_left_pending_in_stored_record() {
    let store = Arc::new(InMemorySessionStore::new());
    store.update_current_user(&user_with_stale_tap()).unwrap();
    store.logout().unwrap();

    let session = FestSession::with_store(store.clone(), ScriptedGenerator::new()).unwrap();
    assert!(session.current_user().await.is_none());

    let user = session.login("alice", Some("pw")).await.unwrap();
    assert!(user.connections.iter().all(|c| !c.is_loading()));
    assert_eq!(
        user.connections.first().unwrap().display_profile().bio,
        INTERRUPTED_REASON
    );
    assert_eq!(store.get_current_user().unwrap().unwrap(), user);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_registrations_of_one_name_admit_one() {
    let store = Arc::new(InMemorySessionStore::new());
    let session = Arc::new(FestSession::with_store(store, ScriptedGenerator::new()).unwrap());

    let attempts: Vec<_> = ["one", "two"]
        .into_iter()
        .map(|password| {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .register("bob", Some(password))
                    .await
                    .map(|_| password)
            })
        })
        .collect();

    let mut winners = Vec::new();
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(password) => winners.push(password),
            Err(e) => assert!(matches!(e, FestcardError::Security(_))),
        }
    }
    assert_eq!(winners.len(), 1);

    let winner = winners[0];
    let loser = if winner == "one" { "two" } else { "one" };
    session.logout().await.unwrap();
    assert!(session.login("bob", Some(loser)).await.is_err());
    assert!(session.login("bob", Some(winner)).await.is_ok());
}
