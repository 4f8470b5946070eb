// Chunk: docs/chunks/session_runner - Two-pane replica session runner

//! twin-edit-demo: drives a two-replica session through a script.
//!
//! Stands in for the page that hosts the two panes. A [`Step`] is one thing
//! that page would see: a user edit, a selection drag, a toolbar click or a
//! flip of the link switch. After every step one scheduling turn runs, and
//! the runner writes a snapshot of both replicas and the queue counters.
//!
//! # Example
//!
//! ```
//! use twin_edit::{Session, SessionConfig, Side};
//! use twin_edit_demo::{run, Step};
//! use twin_edit_engine::LocalEngine;
//!
//! let config = SessionConfig { seed_text: "abc".into(), ..SessionConfig::default() };
//! let mut session = Session::new(LocalEngine::new(), &config);
//! let mut out = Vec::new();
//! run(&mut session, &[Step::Append { side: Side::A, text: "d".into() }], &mut out).unwrap();
//! assert_eq!(session.plain_text(Side::B), "abcd");
//! ```

use std::io::{self, Write};

use twin_edit::projector;
use twin_edit::{Session, SessionEvent, Side, ToolbarAction};
use twin_edit_engine::{DocumentEngine, MarkKind};
use twin_edit_text::{utf16, Offsets};

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Replace `[start, end)` of `side`'s surface with `text`, as typing would.
    Edit {
        side: Side,
        start: usize,
        end: usize,
        text: String,
    },
    /// Type `text` at the end of `side`'s surface.
    Append { side: Side, text: String },
    /// Drag-select `[start, end)` on `side` and release the pointer.
    Select { side: Side, start: usize, end: usize },
    /// Anything else the page would forward.
    Event(SessionEvent),
}

impl Step {
    pub fn mark(side: Side, kind: MarkKind) -> Self {
        Step::Event(SessionEvent::Toolbar {
            side,
            action: ToolbarAction::Mark(kind),
        })
    }

    pub fn clear(side: Side) -> Self {
        Step::Event(SessionEvent::Toolbar {
            side,
            action: ToolbarAction::Clear,
        })
    }
}

/// The scenario the demo runs: mark some text, go offline, edit both
/// sides, reconnect.
pub fn demo_script() -> Vec<Step> {
    vec![
        Step::Event(SessionEvent::Focus(Side::A)),
        Step::Select { side: Side::A, start: 0, end: 7 },
        Step::mark(Side::A, MarkKind::Bold),
        Step::Event(SessionEvent::LinkToggle(false)),
        Step::Edit {
            side: Side::A,
            start: 0,
            end: 0,
            text: "X".to_string(),
        },
        Step::Event(SessionEvent::Focus(Side::B)),
        Step::Append {
            side: Side::B,
            text: " Edited on B.".to_string(),
        },
        Step::Select { side: Side::B, start: 8, end: 12 },
        Step::mark(Side::B, MarkKind::Italic),
        Step::Event(SessionEvent::LinkToggle(true)),
        Step::Select { side: Side::A, start: 0, end: 8 },
        Step::clear(Side::A),
    ]
}

/// Runs `steps` against `session`, writing a snapshot after each.
pub fn run<E: DocumentEngine>(
    session: &mut Session<E>,
    steps: &[Step],
    out: &mut impl Write,
) -> io::Result<()> {
    // Let the startup renders settle before anything is typed.
    session.run_deferred();
    write_snapshot(session, "start", out)?;

    for (i, step) in steps.iter().enumerate() {
        apply(session, step);
        session.run_deferred();
        write_snapshot(session, &format!("step {}: {}", i + 1, describe(step)), out)?;
    }
    Ok(())
}

fn apply<E: DocumentEngine>(session: &mut Session<E>, step: &Step) {
    match step {
        Step::Edit {
            side,
            start,
            end,
            text,
        } => {
            session.surface_mut(*side).replace_range(*start, *end, text);
            session.dispatch(SessionEvent::user_input(*side));
        }
        Step::Append { side, text } => {
            let surface = session.surface_mut(*side);
            let end = utf16::len(&surface.flattened_text());
            surface.replace_range(end, end, text);
            session.dispatch(SessionEvent::user_input(*side));
        }
        Step::Select { side, start, end } => {
            projector::restore(session.surface_mut(*side), Some(Offsets::new(*start, *end)));
            session.dispatch(SessionEvent::PointerUp(*side));
        }
        Step::Event(event) => session.dispatch(event.clone()),
    }
}

fn describe(step: &Step) -> String {
    match step {
        Step::Edit {
            side,
            start,
            end,
            text,
        } => format!("{side} edits {start}..{end} -> {text:?}"),
        Step::Append { side, text } => format!("{side} types {text:?}"),
        Step::Select { side, start, end } => format!("{side} selects {start}..{end}"),
        Step::Event(event) => format!("{event:?}"),
    }
}

/// Writes both replicas' markup and the link status line.
pub fn write_snapshot<E: DocumentEngine>(
    session: &Session<E>,
    label: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    let (a_to_b, b_to_a) = session.queue_depths();
    writeln!(out, "== {label}")?;
    for side in Side::BOTH {
        writeln!(out, "  [{side}] {}", session.replica(side).surface().markup())?;
    }
    writeln!(
        out,
        "  link: {}  A→B: {}  B→A: {}",
        session.link_label(),
        a_to_b,
        b_to_a
    )?;
    Ok(())
}
