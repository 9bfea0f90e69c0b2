// SPDX-License-Identifier: MIT
//
// n-exline — drive the command-line overlay from a script of keys.
//
// This is the main binary that wires together all the crates:
//
//   n-surface → in-memory scene, key notation
//   n-editor  → buffer, options, search, the in-memory editor
//   n-exentry → the overlay itself
//
// A file is loaded into a `TextEditor` shown inside a scroll pane of a
// `Scene`. The overlay is opened with the requested label and every key
// of the script is fed to it. After each key one line reports the entry
// text, the caret, the preview match and where the overlay sits:
//
//   key    entry        caret        match     overlay
//   o      /fo          1:9 (8)      8..10     800x18+0+558
//
// Enter or Escape closes the overlay, and the final caret and scroll
// offsets are printed.
//
// Layout of the scene:
//
//   ┌──────────────────────────────┐ root (+ overlay layer)
//   │ scroll pane                  │
//   │   content view               │
//   │ ┌──────────────────────────┐ │
//   │ │ /pattern                 │ │ ← overlay, bottom of the scroll pane
//   └─┴──────────────────────────┴─┘

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use n_editor::{Buffer, EditorId, HostEditor, Options, TextEditor};
use n_exentry::{EntryKey, ExEntryPanel, Host, Label, SingleEditorHost};
use n_surface::{parse_keys, KeyCode, KeyEvent, Modifiers, Rect, Scene, Surface};

// ─── Constants ──────────────────────────────────────────────────────────────

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter when neither `NEX_LOG` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "warn,n_exentry=info,n_exline=info";

/// Crates a bare `NEX_LOG=<level>` applies to.
const CRATES: [&str; 4] = ["n_exline", "n_exentry", "n_editor", "n_surface"];

const WINDOW_WIDTH: i32 = 800;
const WINDOW_HEIGHT: i32 = 600;
/// Width of one character cell, for sizing the editor viewport.
const CELL_WIDTH: i32 = 8;

const EDITOR: EditorId = EditorId::new(1);

const USAGE: &str = "\
usage: n-exline [OPTIONS] FILE KEYS

Open the command-line overlay over FILE and replay KEYS (Vim notation,
e.g. 'foo<BS>o<CR>').

options:
  --rc FILE       load options from an rc file of `set` lines
  --set ARGS      apply `:set ARGS` (repeatable, after --rc)
  --label L       overlay label: ':', '/' or '?' (default '/')
  --count N       count handed to the overlay (default 1)
  --caret N       caret offset before opening (default 0)
  --headless      run without a UI surface
  -h, --help      print this help
  -V, --version   print version

environment:
  NEX_LOG         log level or filter (overrides RUST_LOG)";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    rc: Option<PathBuf>,
    sets: Vec<String>,
    label: Label,
    count: u32,
    caret: usize,
    headless: bool,
    file: PathBuf,
    keys: String,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Run(Args),
    Help,
    Version,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Invocation> {
    let mut rc = None;
    let mut sets = Vec::new();
    let mut label = Label::SearchForward;
    let mut count = 1;
    let mut caret = 0;
    let mut headless = false;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{flag} needs a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            "--rc" => rc = Some(PathBuf::from(value("--rc")?)),
            "--set" => sets.push(value("--set")?),
            "--label" => label = value("--label")?.parse()?,
            "--count" => {
                count = value("--count")?
                    .parse()
                    .context("--count expects a non-negative number")?;
            }
            "--caret" => {
                caret = value("--caret")?
                    .parse()
                    .context("--caret expects a char offset")?;
            }
            "--headless" => headless = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }

    let [file, keys]: [String; 2] = positional
        .try_into()
        .map_err(|_| anyhow!("expected FILE and KEYS\n\n{USAGE}"))?;
    Ok(Invocation::Run(Args {
        rc,
        sets,
        label,
        count,
        caret,
        headless,
        file: PathBuf::from(file),
        keys,
    }))
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install the stderr subscriber. `NEX_LOG` wins over `RUST_LOG`; a bare
/// level in `NEX_LOG` (`debug`) applies to this workspace's crates only.
fn init_logging() -> anyhow::Result<()> {
    let filter = match (env::var("NEX_LOG"), env::var("RUST_LOG")) {
        (Ok(nex), _) => EnvFilter::try_new(expand_nex_log(&nex))?,
        (_, Ok(rust)) => EnvFilter::try_new(rust)?,
        _ => EnvFilter::new(DEFAULT_FILTER),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn expand_nex_log(value: &str) -> String {
    if value.contains(['=', ',', ':']) {
        return value.to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={value}")));
    directives.join(",")
}

// ─── Session ────────────────────────────────────────────────────────────────

fn load_options(args: &Args) -> anyhow::Result<Options> {
    let mut options = match &args.rc {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    for set in &args.sets {
        if let Some(shown) = options.apply_set(set)? {
            info!(%shown, "set");
        }
    }
    Ok(options)
}

/// A window with a scroll pane showing `line_count` lines. Returns the
/// scene and the content view.
fn build_scene(line_count: usize) -> (Scene, n_surface::NodeId) {
    let mut scene = Scene::new(Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT));
    let root = scene.root();
    scene.install_overlay_layer(root);
    let scroll = scene.add_scroll_pane(root, Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT - 24));
    let line_height = scene.line_height();
    let rows = i32::try_from(line_count).unwrap_or(i32::MAX);
    let content = scene.add_node(
        scroll,
        Rect::new(0, 0, WINDOW_WIDTH, rows.saturating_mul(line_height)),
    );
    (scene, content)
}

/// Everything `replay` needs besides the buffer.
struct Script<'a> {
    label: Label,
    count: u32,
    caret: usize,
    headless: bool,
    keys: &'a str,
}

/// Open the overlay over `buffer`, replay the keys and report to `out`.
/// Returns the final entry text and the key that closed the overlay, if
/// any.
fn replay<W: Write>(
    buffer: Buffer,
    options: Options,
    script: &Script<'_>,
    out: &mut W,
) -> anyhow::Result<(String, Option<EntryKey>)> {
    let keys = parse_keys(script.keys)?;
    let (scene, content) = build_scene(buffer.line_count());
    let line_height = scene.line_height();
    let rows = usize::try_from((WINDOW_HEIGHT - 24) / line_height).unwrap_or(1);
    let cols = usize::try_from(WINDOW_WIDTH / CELL_WIDTH).unwrap_or(1);

    let mut editor = TextEditor::new(EDITOR, buffer).with_viewport(rows, cols);
    editor.move_caret(script.caret);
    let mut host = if script.headless {
        SingleEditorHost::headless(editor, options)
    } else {
        editor.set_content_view(Some(content));
        SingleEditorHost::new(editor, Some(scene), options)
    };

    let mut panel = ExEntryPanel::new();
    panel.activate(&mut host, EDITOR, script.label, "", script.count)?;
    writeln!(out, "{:<8} {:<16} {:<14} {:<9} overlay", "key", "entry", "caret", "match")?;
    report(out, "", &panel, &mut host)?;

    let mut closed_by = None;
    for key in &keys {
        let outcome = panel.handle_key(&mut host, key);
        report(out, &describe_key(key), &panel, &mut host)?;
        if matches!(outcome, EntryKey::Submit | EntryKey::Cancel) {
            closed_by = Some(outcome);
            panel.deactivate(&mut host, true);
            break;
        }
    }

    let ed = &host.editor;
    let caret = ed.caret_position();
    writeln!(
        out,
        "{} {}{} caret {} ({}) scroll {},{}",
        match closed_by {
            Some(EntryKey::Submit) => "submitted",
            Some(EntryKey::Cancel) => "cancelled",
            _ => "open",
        },
        script.label,
        panel.text(),
        caret,
        ed.caret_offset(),
        ed.vertical_scroll_offset(),
        ed.horizontal_scroll_offset(),
    )?;
    Ok((panel.text().to_string(), closed_by))
}

/// One line of the per-key report.
fn report<W: Write, H: Host<Editor = TextEditor>>(
    out: &mut W,
    key: &str,
    panel: &ExEntryPanel,
    host: &mut H,
) -> anyhow::Result<()> {
    let entry = format!("{}{}", panel.label().map_or(' ', Label::glyph), panel.text());
    let overlay = match (panel.attachment(), host.surface_mut()) {
        (Some(a), Some(surface)) => surface.bounds(a.overlay).to_string(),
        _ => "-".to_string(),
    };
    let (caret, matched) = match host.editor_mut(EDITOR) {
        Some(ed) => {
            let caret = format!("{} ({})", ed.caret_position(), ed.caret_offset());
            let matched = panel
                .incsearch()
                .preview_highlight()
                .and_then(|id| ed.highlights().get(id))
                .map_or_else(|| "-".to_string(), |r| format!("{r:?}"));
            (caret, matched)
        }
        None => ("-".to_string(), "-".to_string()),
    };
    writeln!(out, "{key:<8} {entry:<16} {caret:<14} {matched:<9} {overlay}")?;
    Ok(())
}

/// Vim notation for a key, for the report.
fn describe_key(key: &KeyEvent) -> String {
    let name = match key.code {
        KeyCode::Char('<') => "lt".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT => {
            return ch.to_string();
        }
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "CR".to_string(),
        KeyCode::Escape => "Esc".to_string(),
        KeyCode::Backspace => "BS".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    };
    let mut prefix = String::new();
    for (flag, letter) in [
        (Modifiers::CTRL, "C-"),
        (Modifiers::SHIFT, "S-"),
        (Modifiers::ALT, "A-"),
        (Modifiers::SUPER, "D-"),
    ] {
        if key.modifiers.contains(flag) {
            prefix.push_str(letter);
        }
    }
    format!("<{prefix}{name}>")
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = load_options(args)?;
    let buffer = Buffer::from_file(&args.file)
        .with_context(|| format!("{}", args.file.display()))?;
    let script = Script {
        label: args.label,
        count: args.count,
        caret: args.caret,
        headless: args.headless,
        keys: &args.keys,
    };
    let mut out = io::stdout().lock();
    let (text, closed_by) = replay(buffer, options, &script, &mut out)?;
    info!(%text, ?closed_by, "script finished");
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let invocation = parse_args(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("{NAME}: {e}");
        process::exit(2);
    });

    let args = match invocation {
        Invocation::Help => {
            println!("{USAGE}");
            return;
        }
        Invocation::Version => {
            println!("{NAME} {VERSION}");
            return;
        }
        Invocation::Run(args) => args,
    };

    if let Err(e) = init_logging() {
        eprintln!("{NAME}: failed to initialize logging: {e}");
    }

    if let Err(e) = run(&args) {
        eprintln!("{NAME}: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> anyhow::Result<Invocation> {
        parse_args(list.iter().map(|s| (*s).to_string()))
    }

    fn script(label: Label, keys: &str) -> Script<'_> {
        Script {
            label,
            count: 1,
            caret: 0,
            headless: false,
            keys,
        }
    }

    fn run_script(text: &str, script: &Script<'_>) -> (String, Option<EntryKey>, String) {
        let mut out = Vec::new();
        let (entry, closed) =
            replay(Buffer::from_text(text), Options::default(), script, &mut out).unwrap();
        (entry, closed, String::from_utf8(out).unwrap())
    }

    // ── Arguments ─────────────────────────────────────────────────────────

    #[test]
    fn parse_defaults() {
        let Invocation::Run(a) = args(&["notes.txt", "foo"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(a.file, PathBuf::from("notes.txt"));
        assert_eq!(a.keys, "foo");
        assert_eq!(a.label, Label::SearchForward);
        assert_eq!(a.count, 1);
        assert_eq!(a.caret, 0);
        assert!(!a.headless);
        assert!(a.rc.is_none());
    }

    #[test]
    fn parse_all_options() {
        let Invocation::Run(a) = args(&[
            "--rc", "x.rc", "--set", "ic", "--set", "nows", "--label", "?", "--count", "3",
            "--caret", "12", "--headless", "f", "k",
        ])
        .unwrap() else {
            panic!("expected run");
        };
        assert_eq!(a.rc, Some(PathBuf::from("x.rc")));
        assert_eq!(a.sets, vec!["ic".to_string(), "nows".to_string()]);
        assert_eq!(a.label, Label::SearchBackward);
        assert_eq!(a.count, 3);
        assert_eq!(a.caret, 12);
        assert!(a.headless);
    }

    #[test]
    fn parse_help_and_version() {
        assert_eq!(args(&["--help"]).unwrap(), Invocation::Help);
        assert_eq!(args(&["x", "-V"]).unwrap(), Invocation::Version);
    }

    #[test]
    fn parse_errors() {
        assert!(args(&["only-file"]).is_err());
        assert!(args(&["a", "b", "c"]).is_err());
        assert!(args(&["--label", "!", "f", "k"]).is_err());
        assert!(args(&["--count"]).is_err());
        assert!(args(&["--bogus", "f", "k"]).is_err());
    }

    #[test]
    fn nex_log_expansion() {
        assert_eq!(
            expand_nex_log("debug"),
            "warn,n_exline=debug,n_exentry=debug,n_editor=debug,n_surface=debug"
        );
        assert_eq!(expand_nex_log("n_editor=trace"), "n_editor=trace");
    }

    // ── Replay ────────────────────────────────────────────────────────────

    #[test]
    fn submit_restores_caret_and_keeps_text() {
        let (entry, closed, out) = run_script("foo bar foo", &script(Label::SearchForward, "foo<CR>"));
        assert_eq!(entry, "foo");
        assert_eq!(closed, Some(EntryKey::Submit));
        assert!(out.contains("8..11"));
        assert!(out.ends_with("submitted /foo caret 1:1 (0) scroll 0,0\n"));
    }

    #[test]
    fn cancel_on_escape() {
        let (_, closed, out) = run_script("abc", &script(Label::Command, "w<Esc>"));
        assert_eq!(closed, Some(EntryKey::Cancel));
        assert!(out.ends_with("cancelled :w caret 1:1 (0) scroll 0,0\n"));
    }

    #[test]
    fn unfinished_script_stays_open() {
        let (_, closed, out) = run_script("foo bar", &script(Label::SearchForward, "bar"));
        assert_eq!(closed, None);
        assert!(out.ends_with("open /bar caret 1:5 (4) scroll 0,0\n"));
    }

    #[test]
    fn overlay_hugs_scroll_pane_bottom() {
        let (_, _, out) = run_script("abc", &script(Label::Command, "x"));
        // Scroll pane is 800x576 at the origin; the overlay is 18 tall.
        assert!(out.contains("800x18+0+558"));
    }

    #[test]
    fn headless_neither_attaches_nor_previews() {
        let mut s = script(Label::SearchForward, "c");
        s.headless = true;
        let (entry, _, out) = run_script("abc", &s);
        assert_eq!(entry, "c");
        assert!(!out.contains("800x18"));
        assert!(!out.contains("2..3"));
        assert!(out.ends_with("open /c caret 1:1 (0) scroll 0,0\n"));
    }

    #[test]
    fn set_nomagic_reaches_search() {
        let mut out = Vec::new();
        let mut options = Options::default();
        options.apply_set("nomagic").unwrap();
        replay(
            Buffer::from_text("a.c axc"),
            options,
            &script(Label::SearchForward, "a.c"),
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("open /a.c caret 1:1 (0) scroll 0,0\n"));
        assert!(out.contains("0..3"));
    }

    #[test]
    fn bad_key_notation_is_error() {
        let mut out = Vec::new();
        let result = replay(
            Buffer::from_text("x"),
            Options::default(),
            &script(Label::Command, "<Nope>"),
            &mut out,
        );
        assert!(result.is_err());
    }

    #[test]
    fn describe_keys() {
        assert_eq!(describe_key(&KeyEvent::char('a')), "a");
        assert_eq!(describe_key(&KeyEvent::char('<')), "<lt>");
        assert_eq!(describe_key(&KeyEvent::ctrl('u')), "<C-u>");
        assert_eq!(describe_key(&KeyEvent::plain(KeyCode::Enter)), "<CR>");
        assert_eq!(describe_key(&KeyEvent::plain(KeyCode::Left)), "<Left>");
    }
}
