//! chantview main entry point
//!
//! The main loop monitors three sources:
//! 1. stdin (typed commands) - parsed and applied to the session
//! 2. The reading tick - advances the cursor one word
//! 3. Signals (SIGINT) - cuts speech short and stops reading

use anyhow::{bail, Context};
use chantview::input::{execute, parse_command, Flow, LineBuffer};
use chantview::presentation::TerminalPresentation;
use chantview::speech::{self, create_narrator};
use chantview::state::config::Config;
use chantview::state::State;
use chantview::ChantError;
use log::{debug, error, info, warn};
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

/// Longest the loop sleeps without checking signals
const MAX_WAIT: Duration = Duration::from_millis(100);

const USAGE: &str = "Usage: chantview [--debug] [--wpm N] [--page N] [--config PATH] <document>";

/// SIGINT handler - cuts the current word short
extern "C" fn handle_sigint(_: libc::c_int) {
    speech::interrupt();
}

/// Command line options
#[derive(Debug, Default)]
struct Options {
    debug: bool,
    wpm: Option<u32>,
    /// 1-based, as typed
    page: Option<usize>,
    config: Option<PathBuf>,
    document: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" | "-d" => options.debug = true,
            "--wpm" => {
                let value = iter.next().context("--wpm needs a value")?;
                options.wpm = Some(value.parse().with_context(|| format!("bad --wpm {}", value))?);
            }
            "--page" => {
                let value = iter.next().context("--page needs a value")?;
                let page: usize = value.parse().with_context(|| format!("bad --page {}", value))?;
                if page == 0 {
                    bail!("pages are numbered from 1");
                }
                options.page = Some(page);
            }
            "--config" => {
                let value = iter.next().context("--config needs a path")?;
                options.config = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option {}", other),
            other => {
                if options.document.is_some() {
                    bail!("only one document can be read at a time");
                }
                options.document = Some(PathBuf::from(other));
            }
        }
    }
    Ok(options)
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        // Debug mode: write to chantview.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("chantview.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open chantview.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "chantview version {} starting (debug mode, logging to chantview.log)",
            chantview::VERSION
        );
    } else {
        // Normal mode: minimal logging to stderr, only errors
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    init_logging(options.debug);

    if let Err(e) = run(options) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    let Some(path) = options.document else {
        bail!("no document given\n{}", USAGE);
    };

    let mut config = match options.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;
    info!("Config loaded from {:?}", config.path());

    if let Some(wpm) = options.wpm {
        config.set("reading", "wpm", &wpm.to_string());
    }

    let document = chantview::document::open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let narrator = create_narrator(config.backend()).context("starting speech synthesis")?;
    let presentation = TerminalPresentation::new(config.display_scale(), config.highlight_style());

    let mut state = State::new(config, Box::new(document), narrator, Box::new(presentation));
    state.select_default_voice();
    if state.total_pages() == 0 {
        warn!("{} has no pages", path.display());
    }

    // Set up signal handler for Ctrl+C
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_sigint))
            .context("installing SIGINT handler")?;
    }

    let stdin_fd = io::stdin().as_raw_fd();
    let mut poll = Poll::new()?;
    let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
    poll.registry()
        .register(&mut stdin_source, STDIN, Interest::READABLE)
        .context("stdin must be a terminal or a pipe")?;
    let mut events = Events::with_capacity(16);

    println!("chantview {} - {}", chantview::VERSION, path.display());
    println!("Type 'help' for commands, Enter to start or stop.");

    match options.page {
        Some(page) => state.go_to_page(page - 1),
        None => state.show_current_page(),
    }

    let mut lines = LineBuffer::new();
    let mut stdin_open = true;
    info!("Entering event loop");

    loop {
        // Ctrl+C stops reading; a second one while stopped exits
        if speech::take_interrupt() {
            if state.is_playing() {
                debug!("Interrupted while reading");
                state.stop_reading();
            } else {
                info!("Interrupted while stopped, exiting");
                break;
            }
        }

        // Advance the cursor if a tick is due
        if let Err(e) = state.run_due(Instant::now()) {
            error!("Reading stopped: {}", e);
            state.report(&format!("Reading stopped: {}", e));
        }

        // Input closed and nothing left to read
        if !stdin_open && !state.is_playing() {
            info!("Input closed, exiting");
            break;
        }

        let timeout = state
            .time_until_next_tick(Instant::now())
            .map(|d| d.min(MAX_WAIT))
            .unwrap_or(MAX_WAIT);

        if let Err(e) = poll.poll(&mut events, Some(timeout)) {
            if e.kind() == io::ErrorKind::Interrupted {
                debug!("poll interrupted by signal");
                continue;
            }
            return Err(e).context("waiting for input");
        }

        for event in events.iter() {
            if event.token() != STDIN {
                continue;
            }
            match handle_stdin(&mut lines, &mut state)? {
                Input::Open => {}
                Input::Closed => {
                    debug!("stdin closed");
                    poll.registry().deregister(&mut stdin_source)?;
                    stdin_open = false;
                }
                Input::Quit => return finish(&mut state),
            }
        }
    }

    finish(&mut state)
}

/// What reading stdin left us with
enum Input {
    Open,
    Closed,
    Quit,
}

/// Read what is available on stdin and run every complete command
fn handle_stdin(lines: &mut LineBuffer, state: &mut State) -> anyhow::Result<Input> {
    let mut buf = [0u8; 4096];

    let n = match io::stdin().read(&mut buf) {
        Ok(n) => n,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(Input::Open),
        Err(e) => return Err(e).context("reading stdin"),
    };

    let (pending, status): (Vec<String>, Input) = if n == 0 {
        (lines.finish().into_iter().collect(), Input::Closed)
    } else {
        (lines.push(&buf[..n]), Input::Open)
    };

    for line in pending {
        if run_line(&line, state)? == Flow::Quit {
            return Ok(Input::Quit);
        }
    }
    Ok(status)
}

/// Parse and execute one command line
///
/// Bad input is reported and otherwise ignored.
fn run_line(line: &str, state: &mut State) -> anyhow::Result<Flow> {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(ChantError::MalformedInput(msg)) => {
            state.report(&msg);
            return Ok(Flow::Continue);
        }
        Err(e) => return Err(e.into()),
    };

    match execute(&command, state) {
        Ok(flow) => Ok(flow),
        Err(e) => {
            error!("Command {:?} failed: {}", command, e);
            state.report(&e.to_string());
            Ok(Flow::Continue)
        }
    }
}

fn finish(state: &mut State) -> anyhow::Result<()> {
    state.stop_reading();
    if let Err(e) = state.save_config() {
        warn!("Could not save config: {}", e);
    }
    info!("chantview exiting");
    Ok(())
}
