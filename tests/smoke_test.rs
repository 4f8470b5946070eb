// Chunk: docs/chunks/session_runner - Two-pane replica session runner
//!
//! Smoke test for the scripted demo session.

use twin_edit::{Session, SessionConfig, SessionEvent, Side};
use twin_edit_demo::{demo_script, run, Step};
use twin_edit_engine::{LocalEngine, MarkKind};

fn session() -> Session<LocalEngine> {
    Session::new(LocalEngine::new(), &SessionConfig::default())
}

#[test]
fn test_demo_script_runs_and_reconnects() {
    let mut session = session();
    let mut out = Vec::new();
    run(&mut session, &demo_script(), &mut out).unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("link: Offline  A→B: 1  B→A: 0"));
    assert!(transcript.ends_with("link: Online  A→B: 0  B→A: 0\n"));

    assert!(session.is_online());
    assert_eq!(session.queue_depths(), (0, 0));
    for side in Side::BOTH {
        let text = session.plain_text(side);
        assert!(text.starts_with("XOffline mode"), "{side}: {text}");
        assert!(text.contains("Edited on B."), "{side}: {text}");
    }
    assert_eq!(session.plain_text(Side::A), session.plain_text(Side::B));
    assert_eq!(session.render_markup(Side::A), session.render_markup(Side::B));
}

#[test]
fn test_offline_steps_queue_on_each_side() {
    let mut session = session();
    let steps = vec![
        Step::Event(SessionEvent::LinkToggle(false)),
        Step::Append {
            side: Side::A,
            text: "!".into(),
        },
        Step::Select {
            side: Side::B,
            start: 0,
            end: 7,
        },
        Step::mark(Side::B, MarkKind::Code),
    ];
    let mut out = Vec::new();
    run(&mut session, &steps, &mut out).unwrap();

    assert_eq!(session.queue_depths(), (1, 1));
    assert!(session.plain_text(Side::A).ends_with('!'));
    assert!(!session.plain_text(Side::B).ends_with('!'));
    assert!(!session.render_markup(Side::A).contains("<code>"));
    assert!(session.render_markup(Side::B).contains("<code>Offline</code>"));
}

#[test]
fn test_snapshot_shows_both_panes() {
    let config = SessionConfig {
        seed_text: "a<b".into(),
        ..SessionConfig::default()
    };
    let mut session = Session::new(LocalEngine::new(), &config);
    let mut out = Vec::new();
    run(&mut session, &[], &mut out).unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert_eq!(
        transcript,
        "== start\n  [A] <p>a&lt;b</p>\n  [B] <p>a&lt;b</p>\n  link: Online  A→B: 0  B→A: 0\n"
    );
}
