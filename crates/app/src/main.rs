use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use services::{AnnotationSession, CurrentView, SessionProgress, StepOutcome};
use storage::index::DEFAULT_EXTENSIONS;
use storage::{AnnotationRepository, CsvAnnotationStore, FileIndex};
use tirads_core::{Assessment, Composition, EchogenicFocus, Echogenicity, Margin, NoduleShape};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    root: PathBuf,
    store: PathBuf,
    index: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--root <dir>] [--store <csv>] [--index <csv>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --root  images");
    eprintln!("  --store thyroid_nodules_annotations.csv");
    eprintln!("  --index file_names.csv");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TIRADS_ROOT, TIRADS_STORE, TIRADS_INDEX");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut root = std::env::var("TIRADS_ROOT")
            .map_or_else(|_| PathBuf::from("images"), PathBuf::from);
        let mut store = std::env::var("TIRADS_STORE")
            .map_or_else(|_| PathBuf::from("thyroid_nodules_annotations.csv"), PathBuf::from);
        let mut index = std::env::var("TIRADS_INDEX")
            .map_or_else(|_| PathBuf::from("file_names.csv"), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => root = PathBuf::from(require_value(args, "--root")?),
                "--store" => store = PathBuf::from(require_value(args, "--store")?),
                "--index" => index = PathBuf::from(require_value(args, "--index")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { root, store, index })
    }
}

// ─── Form rendering ────────────────────────────────────────────────────────────

fn option_line<T: Copy + PartialEq + fmt::Display>(
    name: &str,
    options: &[T],
    selected: impl Fn(T) -> bool,
) -> String {
    let rendered: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = if selected(*option) { "*" } else { " " };
            format!("  [{}]{marker}{option}", i + 1)
        })
        .collect();
    format!("{name}:\n{}", rendered.join("\n"))
}

fn print_form(identity: &str, assessment: &Assessment, progress: SessionProgress) {
    println!();
    println!("Image: {identity}");
    println!("Progress: {progress}");
    println!(
        "{}",
        option_line("Composition (c <n>)", &Composition::ALL, |o| {
            o == assessment.composition
        })
    );
    println!(
        "{}",
        option_line("Echogenicity (e <n>)", &Echogenicity::ALL, |o| {
            o == assessment.echogenicity
        })
    );
    println!(
        "{}",
        option_line("Shape (s <n>)", &NoduleShape::ALL, |o| o == assessment.shape)
    );
    println!(
        "{}",
        option_line("Margin (m <n>)", &Margin::ALL, |o| o == assessment.margin)
    );
    println!(
        "{}",
        option_line("Echogenic foci (f <n> toggles)", &EchogenicFocus::ALL, |o| {
            assessment.foci.contains(o)
        })
    );
    println!("Total points: {}", assessment.points);
    println!("Level: {}", assessment.level);
}

fn print_help() {
    println!("Commands:");
    println!("  c/e/s/m <n>  select option n for that field");
    println!("  f <n>        toggle echogenic focus n");
    println!("  n            save and go to the next image");
    println!("  p            save and go to the previous image");
    println!("  h            this help");
    println!("  q            quit (the current edits are saved on n/p only)");
}

fn pick<T: Copy>(options: &[T], raw: Option<&str>) -> Option<T> {
    let n: usize = raw?.parse().ok()?;
    options.get(n.checked_sub(1)?).copied()
}

/// Re-derive points and level after an edit, like the live score shown while
/// filling the form.
fn rescored(assessment: &Assessment) -> Assessment {
    Assessment::new(
        assessment.composition,
        assessment.echogenicity,
        assessment.shape,
        assessment.margin,
        assessment.foci.clone(),
    )
}

// ─── Session loop ──────────────────────────────────────────────────────────────

fn apply_step(outcome: StepOutcome, identity: &mut String, assessment: &mut Assessment) {
    if let Some(notice) = outcome.notice {
        println!("{notice}");
    }
    *identity = outcome.identity;
    *assessment = outcome.assessment;
    print_form(identity, assessment, outcome.progress);
}

fn session_loop(
    mut session: AnnotationSession<CsvAnnotationStore>,
    view: CurrentView,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut identity = view.identity;
    let mut assessment = view.assessment;
    print_form(&identity, &assessment, view.progress);
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let value = parts.next();

        match command {
            "" => {}
            "q" => break,
            "h" | "help" => print_help(),
            "c" => {
                if let Some(choice) = pick(&Composition::ALL, value) {
                    assessment.composition = choice;
                    assessment = rescored(&assessment);
                    print_form(&identity, &assessment, session_progress(&session));
                } else {
                    println!("pick 1..{}", Composition::ALL.len());
                }
            }
            "e" => {
                if let Some(choice) = pick(&Echogenicity::ALL, value) {
                    assessment.echogenicity = choice;
                    assessment = rescored(&assessment);
                    print_form(&identity, &assessment, session_progress(&session));
                } else {
                    println!("pick 1..{}", Echogenicity::ALL.len());
                }
            }
            "s" => {
                if let Some(choice) = pick(&NoduleShape::ALL, value) {
                    assessment.shape = choice;
                    assessment = rescored(&assessment);
                    print_form(&identity, &assessment, session_progress(&session));
                } else {
                    println!("pick 1..{}", NoduleShape::ALL.len());
                }
            }
            "m" => {
                if let Some(choice) = pick(&Margin::ALL, value) {
                    assessment.margin = choice;
                    assessment = rescored(&assessment);
                    print_form(&identity, &assessment, session_progress(&session));
                } else {
                    println!("pick 1..{}", Margin::ALL.len());
                }
            }
            "f" => {
                if let Some(choice) = pick(&EchogenicFocus::ALL, value) {
                    assessment.foci.toggle(choice);
                    assessment = rescored(&assessment);
                    print_form(&identity, &assessment, session_progress(&session));
                } else {
                    println!("pick 1..{}", EchogenicFocus::ALL.len());
                }
            }
            "n" => match session.advance(assessment.clone(), &identity) {
                Ok(outcome) => apply_step(outcome, &mut identity, &mut assessment),
                Err(err) => eprintln!("cannot advance: {err}"),
            },
            "p" => match session.retreat(assessment.clone(), &identity) {
                Ok(outcome) => apply_step(outcome, &mut identity, &mut assessment),
                Err(err) => eprintln!("cannot go back: {err}"),
            },
            other => println!("unknown command: {other} (h for help)"),
        }
    }
    Ok(())
}

fn session_progress<S: AnnotationRepository>(session: &AnnotationSession<S>) -> SessionProgress {
    SessionProgress {
        done: session
            .store()
            .first_unset()
            .unwrap_or_else(|| session.store().len()),
        total: session.index().len(),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let index = FileIndex::load_or_create(&args.index, &args.root, &DEFAULT_EXTENSIONS)?;
    let store = CsvAnnotationStore::load_or_init(&args.store, &index)?;
    info!(
        images = index.len(),
        store = %args.store.display(),
        "session opened"
    );
    let session = AnnotationSession::start(index, store);

    match session.current()? {
        Some(view) => session_loop(session, view),
        None => {
            println!(
                "No images found under {} and no cached index at {}.",
                args.root.display(),
                args.index.display()
            );
            Ok(())
        }
    }
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
