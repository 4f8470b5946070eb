// Chunk: docs/chunks/render_suppression - Token-validated input suppression

//! Integration tests for input handling around renders.

use twin_edit::{InputOrigin, RenderState, Session, SessionConfig, SessionEvent, Side};
use twin_edit_engine::{DocHandle, DocumentEngine, EngineError, LocalEngine, UpdateRecord};

/// Routes `log` output to the test harness; set `RUST_LOG=debug` to see it.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(seed: &str) -> SessionConfig {
    init_logging();
    SessionConfig {
        seed_text: seed.to_string(),
        ..SessionConfig::default()
    }
}

#[test]
fn test_input_ignored_until_deferred_turn() {
    let mut session = Session::new(LocalEngine::new(), &config("abc"));
    assert!(session.replica(Side::A).suppresses_input());
    assert_eq!(session.replica(Side::A).render_state(), RenderState::Idle);

    session.surface_mut(Side::A).replace_range(3, 3, "d");
    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.plain_text(Side::A), "abc");
    assert_eq!(session.replica(Side::A).last_text(), "abc");

    session.run_deferred();
    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.plain_text(Side::A), "abcd");
    assert_eq!(session.plain_text(Side::B), "abcd");
}

#[test]
fn test_render_resuppresses_until_next_turn() {
    let mut session = Session::new(LocalEngine::new(), &config("abc"));
    session.run_deferred();
    assert!(session.replica(Side::B).accepts_input());

    session.surface_mut(Side::A).replace_range(0, 0, "z");
    session.dispatch(SessionEvent::user_input(Side::A));
    // B was re-rendered by the sync and ignores its echo.
    assert!(!session.replica(Side::B).accepts_input());
    session.dispatch(SessionEvent::user_input(Side::B));
    assert_eq!(session.plain_text(Side::B), "zabc");

    session.run_deferred();
    assert!(session.replica(Side::B).accepts_input());
    // The sender was not re-rendered.
    assert!(session.replica(Side::A).accepts_input());
}

#[test]
fn test_back_to_back_renders_settle_in_one_turn() {
    let mut session = Session::new(LocalEngine::new(), &config("abc"));
    session.run_deferred();

    session.render_replica(Side::A, false);
    let first = session.replica(Side::A).render_token();
    session.render_replica(Side::A, false);
    let second = session.replica(Side::A).render_token();
    assert_eq!(second, first + 1);
    assert_eq!(session.pending_deferred(), 2);
    assert!(session.replica(Side::A).suppresses_input());

    // Input between the renders and their release is still ignored.
    session.surface_mut(Side::A).replace_range(0, 0, "z");
    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.plain_text(Side::A), "abc");

    session.run_deferred();
    assert_eq!(session.pending_deferred(), 0);
    assert!(session.replica(Side::A).accepts_input());
}

#[test]
fn test_synthetic_input_is_ignored() {
    let mut session = Session::new(LocalEngine::new(), &config("abc"));
    session.run_deferred();

    session.surface_mut(Side::A).replace_range(0, 3, "xyz");
    session.dispatch(SessionEvent::Input {
        side: Side::A,
        origin: InputOrigin::Synthetic,
    });
    assert_eq!(session.plain_text(Side::A), "abc");
    assert_eq!(session.plain_text(Side::B), "abc");
}

#[test]
fn test_unchanged_text_submits_nothing() {
    let mut session = Session::new(LocalEngine::new(), &config("abc"));
    session.run_deferred();
    let token_b = session.replica(Side::B).render_token();

    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.replica(Side::B).render_token(), token_b);
    assert_eq!(session.engine().pending_count(session.replica(Side::A).doc()), 0);
}

#[test]
fn test_nbsp_reads_as_space() {
    let mut session = Session::new(LocalEngine::new(), &config("a b"));
    session.run_deferred();

    let leaf = session.replica(Side::A).surface().text_leaves()[0];
    session.surface_mut(Side::A).set_leaf_text(leaf, "a\u{a0}b");
    let token_b = session.replica(Side::B).render_token();
    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.plain_text(Side::A), "a b");
    assert_eq!(session.replica(Side::B).render_token(), token_b);
}

/// Wraps a `LocalEngine` and rejects every edit while `reject` is set, and
/// every incoming batch while `reject_updates` is set.
struct RejectingEngine {
    inner: LocalEngine,
    reject: bool,
    reject_updates: bool,
}

impl DocumentEngine for RejectingEngine {
    fn create(&mut self, replica_tag: u32) -> DocHandle {
        self.inner.create(replica_tag)
    }

    fn apply_edit(
        &mut self,
        doc: DocHandle,
        start: usize,
        delete_count: usize,
        insert: &str,
    ) -> Result<(), EngineError> {
        if self.reject {
            let len = self.inner.plain_text(doc).encode_utf16().count();
            return Err(EngineError::OutOfRange {
                start,
                end: start + delete_count,
                len,
            });
        }
        self.inner.apply_edit(doc, start, delete_count, insert)
    }

    fn add_mark(&mut self, doc: DocHandle, start: usize, len: usize, mark: &str) -> Result<(), EngineError> {
        self.inner.add_mark(doc, start, len, mark)
    }

    fn remove_mark(&mut self, doc: DocHandle, start: usize, len: usize, mark: &str) -> Result<(), EngineError> {
        self.inner.remove_mark(doc, start, len, mark)
    }

    fn render_markup(&self, doc: DocHandle) -> String {
        self.inner.render_markup(doc)
    }

    fn plain_text(&self, doc: DocHandle) -> String {
        self.inner.plain_text(doc)
    }

    fn drain_updates(&mut self, doc: DocHandle) -> Vec<UpdateRecord> {
        self.inner.drain_updates(doc)
    }

    fn apply_updates(&mut self, doc: DocHandle, records: &[UpdateRecord]) -> Result<(), EngineError> {
        if self.reject_updates {
            return Err(EngineError::MalformedUpdate("link down".to_string()));
        }
        self.inner.apply_updates(doc, records)
    }
}

#[test]
fn test_rejected_edit_rerenders_from_engine() {
    let engine = RejectingEngine {
        inner: LocalEngine::new(),
        reject: false,
        reject_updates: false,
    };
    let mut session = Session::new(engine, &config("keep me"));
    session.run_deferred();
    session.engine_mut().reject = true;
    let token_a = session.replica(Side::A).render_token();
    let token_b = session.replica(Side::B).render_token();

    session.surface_mut(Side::A).replace_range(0, 4, "lose");
    assert_eq!(session.replica(Side::A).surface().text_content(), "lose me");

    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.replica(Side::A).surface().text_content(), "keep me");
    assert_eq!(session.replica(Side::A).last_text(), "keep me");
    assert_eq!(session.replica(Side::A).render_token(), token_a + 1);
    assert_eq!(session.replica(Side::B).render_token(), token_b);
    assert_eq!(session.plain_text(Side::B), "keep me");
    assert_eq!(session.queue_depths(), (0, 0));
}

#[test]
fn test_rejected_delivery_stays_queued() {
    let engine = RejectingEngine {
        inner: LocalEngine::new(),
        reject: false,
        reject_updates: false,
    };
    let mut session = Session::new(engine, &config("keep me"));
    session.run_deferred();
    session.toggle_online(false);

    session.surface_mut(Side::A).replace_range(0, 0, "1");
    session.dispatch(SessionEvent::user_input(Side::A));
    session.run_deferred();
    session.surface_mut(Side::A).replace_range(1, 1, "2");
    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.queue_depths(), (2, 0));

    session.engine_mut().reject_updates = true;
    session.toggle_online(true);
    assert_eq!(session.queue_depths(), (2, 0));
    assert_eq!(session.plain_text(Side::B), "keep me");

    // Online edits queue behind the rejected ones.
    session.run_deferred();
    session.surface_mut(Side::A).replace_range(2, 2, "3");
    session.dispatch(SessionEvent::user_input(Side::A));
    assert_eq!(session.queue_depths(), (3, 0));

    session.engine_mut().reject_updates = false;
    session.flush_outbox(Side::A, Side::B);
    assert_eq!(session.queue_depths(), (0, 0));
    assert_eq!(session.plain_text(Side::B), "123keep me");
}
