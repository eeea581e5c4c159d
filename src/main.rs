use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;

use worksafe_service::config::{Config, DEFAULT_CONFIG_PATH};
use worksafe_service::dashboard;
use worksafe_service::dev_mode::DevMode;
use worksafe_service::ingest::thingspeak;
use worksafe_service::logging::{self, Source};
use worksafe_service::monitor::{self, Monitor};
use worksafe_service::verify;

const USAGE: &str = "usage: worksafe_service [--verify] [CONFIG]";

fn main() {
    if let Err(e) = run() {
        eprintln!("worksafe_service: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut verify_only = false;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--verify" => verify_only = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag {}\n{}", flag, USAGE).into()),
            path => config_path = PathBuf::from(path),
        }
    }

    let config = Config::load_with_env(&config_path)?;
    logging::init_logger(
        config.logging.min_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );

    if verify_only {
        let report = verify::run_verification(&config.feed)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    poll_loop(&config)
}

fn poll_loop(config: &Config) -> Result<(), Box<dyn Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.feed.timeout_secs.max(1)))
        .build()?;
    let url = config.feed.url();

    let mut replay = match &config.replay.path {
        Some(path) => {
            let dev = DevMode::from_file(path)?;
            logging::info(
                Source::Replay,
                None,
                &format!("Replaying {} recorded entries from {}", dev.len(), path.display()),
            );
            Some(dev)
        }
        None => {
            logging::info(
                Source::System,
                None,
                &format!("Polling channel {} every {}s", config.feed.channel_id, config.poll.interval_secs),
            );
            None
        }
    };

    let interval = Duration::from_secs(config.poll.interval_secs);
    let mut monitor = Monitor::new(config);
    let mut due = Instant::now();

    loop {
        let now = Utc::now();
        let report = match replay.as_mut() {
            Some(dev) => monitor.replay_tick(dev, now),
            None => monitor.tick(thingspeak::fetch_reading(&client, &url, now), now),
        };
        print!("{}", dashboard::render(&report, monitor.history()));

        if config.poll.max_polls > 0 && monitor.polls() >= config.poll.max_polls {
            break;
        }

        let (next, skipped) = monitor::next_deadline(due, interval, Instant::now());
        if skipped > 0 {
            logging::warn(
                Source::System,
                None,
                &format!("Poll overran its interval, skipped {} tick(s)", skipped),
            );
        }
        due = next;
        if let Some(wait) = due.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    logging::log_session_summary(
        monitor.polls(),
        monitor.fresh_polls(),
        monitor.polls() - monitor.fresh_polls(),
    );
    Ok(())
}
