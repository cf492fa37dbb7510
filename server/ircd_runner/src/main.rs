use clap::{App, Arg};
use ircd_core::config::{ServerConfig, ServerOptions};
use ircd_support::logging::{self, error, info};
use signal_hook::consts::{SIGHUP, SIGINT};
use signal_hook::iterator::Signals;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn main() {
    let matches = App::new("ircserv")
        .version("0.1.0")
        .author("Bush Hammer Industries")
        .about("A single-threaded, non-blocking IRC server.")
        .arg(Arg::with_name("PORT").help("Listening port (1-65535)").required(true).index(1))
        .arg(Arg::with_name("PASSWORD").help("Shared connection password").required(true).index(2))
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("Optional TOML file with server tuning options")
                .takes_value(true),
        )
        .arg(Arg::with_name("verbose").short("v").long("verbose").help("Enable trace-level logging"))
        .get_matches();

    let log = logging::init(matches.is_present("verbose"));

    let port: u16 = match matches.value_of("PORT").unwrap().parse() {
        Ok(p) if p > 0 => p,
        _ => {
            eprintln!("error: port must be an integer between 1 and 65535");
            process::exit(1);
        }
    };

    let password = matches.value_of("PASSWORD").unwrap().to_string();
    if password.is_empty() {
        eprintln!("error: password must not be empty");
        process::exit(1);
    }

    let mut config = ServerConfig::new(port, password);
    if let Some(path) = matches.value_of("config") {
        match ServerOptions::load(path) {
            Ok(options) => config.options = options,
            Err(e) => {
                error!(log, "failed to load config file"; "path" => path, "error" => %e);
                process::exit(1);
            }
        }
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_thread(Arc::clone(&shutdown), log.clone());

    info!(log, "starting ircd"; "port" => config.port);

    match ircd_core::run(config, shutdown, log.clone()) {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!(log, "reactor exited with error"; "error" => %e);
            process::exit(1);
        }
    }
}

/// Watches SIGINT/SIGHUP on a background thread and flips the shared
/// shutdown flag the reactor polls once per loop iteration — the one piece
/// of process-wide mutable state, since everything else lives behind the
/// reactor's single-threaded ownership of connection state.
fn spawn_signal_thread(shutdown: Arc<AtomicBool>, log: logging::Logger) {
    let mut signals = Signals::new([SIGINT, SIGHUP]).expect("failed to register signal handlers");
    thread::spawn(move || {
        for signal in signals.forever() {
            info!(log, "received shutdown signal"; "signal" => signal);
            shutdown.store(true, Ordering::Relaxed);
            break;
        }
    });
}
