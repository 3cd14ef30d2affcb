mod answers;
mod error;
mod report;

use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use core_types::{ItemSet, LikertScale, QuizKind, Session};
use data_loader::{DirSource, load_items, load_type_catalog, load_weights};
use log::{LevelFilter, debug, info};
use scoring_engine::{ScoringConfig, TiePolicy, score};
use serde_json::{Value, json};
use session_store::{FileSessionStore, SessionRecord, SessionStore};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::answers::{random_answers, read_answers};
use crate::error::{CliError, EXIT_OK};

const CLI_VERSION: &str = "1.0";

/// Score eight-function personality quizzes and review stored sessions.
#[derive(Parser, Debug)]
#[command(name = "quiz", version, propagate_version = true)]
struct Cli {
    /// Emit the JSON envelope instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,
    /// Suppress text output and warnings
    #[arg(long, global = true)]
    quiet: bool,
    /// Data root holding item banks, weights and mapping/
    #[arg(long, global = true, env = "QUIZ_DATA_DIR", default_value = "data")]
    data: PathBuf,
    /// Directory for saved sessions
    #[arg(long, global = true, env = "QUIZ_STORE_DIR", default_value = ".quiz_store")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a quiz from an answers file or seeded random answers
    Score(ScoreArgs),
    /// List stored sessions, most recent first
    Review,
    /// Print a stored session
    Show { id: String },
    /// Delete a stored session
    Remove { id: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Score(_) => "score",
            Command::Review => "review",
            Command::Show { .. } => "show",
            Command::Remove { .. } => "remove",
        }
    }
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[arg(long, default_value = "basic")]
    kind: QuizKind,
    /// Item set for advanced quizzes (A, B or C)
    #[arg(long)]
    set: Option<ItemSet>,
    /// JSON array of {id, value} answers
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Seeds random answers and the presentation order
    #[arg(long, default_value_t = 1)]
    seed: u32,
    /// Store the scored session
    #[arg(long)]
    save: bool,
    #[arg(long)]
    note: Option<String>,
    /// How a zero dichotomy score becomes a letter: left, right or x
    #[arg(long, default_value = "left")]
    tie_policy: TiePolicy,
    /// Read answers on MIN,MAX instead of the weight table's scale
    #[arg(long, value_parser = parse_scale, allow_hyphen_values = true)]
    scale: Option<LikertScale>,
}

fn main() {
    let json_mode = std::env::args().any(|a| a == "--json");
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(EXIT_OK);
        }
        Err(e) => print_error(json_mode, CliError::invalid("unknown", e.to_string().trim())),
    };

    init_logging(&cli);

    let name = cli.command.name();
    match dispatch(&cli) {
        Ok((data, text)) => {
            if cli.quiet && !cli.json {
                std::process::exit(EXIT_OK);
            }
            print_success(cli.json, name, data, &text);
            std::process::exit(EXIT_OK);
        }
        Err(err) => print_error(cli.json, err),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet || cli.json {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn dispatch(cli: &Cli) -> Result<(Value, String), CliError> {
    match &cli.command {
        Command::Score(args) => run_score(cli, args),
        Command::Review => run_review(&cli.store),
        Command::Show { id } => run_show(cli, id),
        Command::Remove { id } => run_remove(&cli.store, id),
    }
}

fn run_score(cli: &Cli, args: &ScoreArgs) -> Result<(Value, String), CliError> {
    let cmd = "score";
    let source = DirSource::new(&cli.data);
    let items = load_items(&source, args.kind, args.set).map_err(|e| CliError::load(cmd, e))?;
    let table = load_weights(&source, args.kind, args.set).map_err(|e| CliError::load(cmd, e))?;
    let catalog = load_type_catalog(&source).map_err(|e| CliError::load(cmd, e))?;
    info!(
        "loaded {} items and {} weight entries from {}",
        items.len(),
        table.len(),
        cli.data.display()
    );

    let mut session = Session::start(args.kind, args.set, items, args.seed)
        .map_err(|e| CliError::core(cmd, e))?;
    let config = ScoringConfig {
        tie_policy: args.tie_policy,
        scale_override: args.scale,
    };
    let answers = match &args.answers {
        Some(path) => read_answers(path, &session)?,
        None => random_answers(
            &session,
            config.scale_override.unwrap_or(table.scale()),
            u64::from(args.seed),
        ),
    };
    for answer in answers {
        session
            .answer(&answer.id, answer.value)
            .map_err(|e| CliError::core(cmd, e))?;
    }
    debug!(
        "session {} answered {}/{}",
        session.id,
        session.answers.len(),
        session.items.len()
    );

    let result = score(&session, &table, &config).map_err(|e| CliError::scoring(cmd, e))?;
    let description = catalog.describe(&result.code.to_string()).map(str::to_string);
    let text = report::render_result(&result, description.as_deref());

    let saved = if args.save {
        let store = open_store(cmd, &cli.store)?;
        let mut record = SessionRecord::new(session.clone(), Some(result.clone()));
        if let Some(note) = &args.note {
            record = record.with_note(note.clone());
        }
        let record = store.save(record).map_err(|e| CliError::store(cmd, e))?;
        info!("saved session {}", record.id());
        true
    } else {
        false
    };

    let data = json!({
        "session_id": session.id,
        "kind": session.kind,
        "set": session.set,
        "saved": saved,
        "answered": session.answers.len(),
        "total_items": session.items.len(),
        "code": result.code.to_string(),
        "diagnostic": result.code.diagnostic(),
        "ties": result.code.ties(),
        "functions": result.functions,
        "dims": result.dims,
        "order": result.order,
        "projection": result.projection,
        "degraded_items": result.meta.degraded_items,
        "weights_digest": result.meta.weights_digest,
        "description": description,
    });
    let text = if saved {
        format!("{text}\n\nSaved session {}", session.id)
    } else {
        text
    };
    Ok((data, text))
}

fn run_review(store_dir: &Path) -> Result<(Value, String), CliError> {
    let store = open_store("review", store_dir)?;
    let summaries = store.list().map_err(|e| CliError::store("review", e))?;
    let text = report::render_summaries(&summaries);
    Ok((json!({ "sessions": summaries }), text))
}

fn run_show(cli: &Cli, id: &str) -> Result<(Value, String), CliError> {
    let store = open_store("show", &cli.store)?;
    let record = store
        .load(id)
        .map_err(|e| CliError::store("show", e))?
        .ok_or_else(|| CliError::session_missing("show", id))?;
    let description = match &record.result {
        Some(result) => load_type_catalog(&DirSource::new(&cli.data))
            .ok()
            .and_then(|c| c.describe(&result.code.to_string()).map(str::to_string)),
        None => None,
    };
    let text = report::render_record(&record, description.as_deref());
    Ok((json!({ "record": record, "description": description }), text))
}

fn run_remove(store_dir: &Path, id: &str) -> Result<(Value, String), CliError> {
    let store = open_store("remove", store_dir)?;
    if !store.remove(id).map_err(|e| CliError::store("remove", e))? {
        return Err(CliError::session_missing("remove", id));
    }
    Ok((json!({ "id": id, "removed": true }), format!("Removed session {id}")))
}

fn open_store(cmd: &str, dir: &Path) -> Result<FileSessionStore, CliError> {
    FileSessionStore::open(dir).map_err(|e| CliError::store(cmd, e))
}

fn parse_scale(raw: &str) -> Result<LikertScale, String> {
    let (min, max) = raw
        .split_once(',')
        .or_else(|| raw.split_once(".."))
        .ok_or_else(|| format!("expected MIN,MAX, got {raw:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| format!("not a number: {s:?}"))
    };
    LikertScale::new(parse(min)?, parse(max)?).map_err(|e| e.to_string())
}

fn print_success(json_mode: bool, command: &str, data: Value, text: &str) {
    if json_mode {
        let response = json!({
            "status": "ok",
            "version": CLI_VERSION,
            "command": command,
            "data": data,
            "error": null
        });
        println!("{response:#}");
    } else {
        println!("{text}");
    }
}

fn print_error(json_mode: bool, err: CliError) -> ! {
    if json_mode {
        let response = json!({
            "status": "error",
            "version": CLI_VERSION,
            "command": err.command,
            "data": null,
            "error": {
                "code": err.code,
                "type": err.kind,
                "message": err.message
            }
        });
        eprintln!("{response:#}");
    } else {
        eprintln!("Error: {}", err.message);
    }
    std::process::exit(err.code);
}
