use anyhow::{Context, Result};
use argh::FromArgs;
use nomenclator_lib::export::PairLog;
use nomenclator_lib::names::{NameSource, RemoteNames, WordNames};
use nomenclator_lib::runner::{stop_signal, Outcome, RunConfig, RunReport, Runner, StopSignal};
use nomenclator_lib::store::PairStore;
use std::time::Duration;
use tracing::{error, info};

mod util;

#[derive(FromArgs)]
/// Generate unique names, each paired with a fresh secret key
struct Args {
    #[argh(option, default = "String::from(\"nomenclator.db\")")]
    /// database file
    db: String,
    #[argh(option, default = "String::from(\"nomenclator.log\")")]
    /// log file
    log: String,
    #[argh(option, default = "100")]
    /// number of keys to generate
    keycount: usize,
    #[argh(switch)]
    /// also write the pairs to a json file
    jsonout: bool,
    #[argh(option, default = "String::from(\"nomenclator.json\")")]
    /// json file
    json: String,
    #[argh(option)]
    /// fetch names from this url instead of the word lists
    source_url: Option<String>,
    #[argh(option)]
    /// seconds allowed for each name request, key generation and store write
    timeout_secs: Option<u64>,
    #[argh(option)]
    /// adjectives word list replacing the embedded one
    adjectives: Option<String>,
    #[argh(option)]
    /// nouns word list replacing the embedded one
    nouns: Option<String>,
}

async fn drive<N: NameSource>(
    names: N,
    store: PairStore,
    config: RunConfig,
    log: PairLog,
    stop: &StopSignal,
) -> RunReport {
    let mut runner = Runner::new(names, store, config).with_pair_log(log);
    runner.run(stop).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    util::init_logging(&args.log)?;
    let store =
        PairStore::open(&args.db).with_context(|| format!("failed to open database {}", args.db))?;

    let mut config = RunConfig::new(args.keycount);
    if let Some(secs) = args.timeout_secs.filter(|secs| *secs > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let (handle, stop) = stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });

    let log = PairLog::new();
    let report = match &args.source_url {
        Some(url) => {
            info!("Starting nomenclator (remote mode, {})", url);
            drive(RemoteNames::new(url), store, config, log.clone(), &stop).await
        }
        None => {
            info!("Starting nomenclator (embedded local mode)");
            let adjectives = util::load_words(args.adjectives.as_deref(), util::ADJECTIVES)?;
            let nouns = util::load_words(args.nouns.as_deref(), util::NOUNS)?;
            let names = WordNames::new(adjectives, nouns).context("failed to load word lists")?;
            drive(names, store, config, log.clone(), &stop).await
        }
    };
    info!("Stopping nomenclator");

    if args.jsonout {
        println!("Saving JSON to {}", args.json);
        log.save_json(&args.json)
            .await
            .with_context(|| format!("failed to write {}", args.json))?;
    }

    if let Outcome::Aborted(e) = report.outcome {
        error!(
            "stopped after {} of {} pairings",
            report.state.completed, report.state.requested
        );
        return Err(e).context("generation stopped");
    }

    println!("Complete");
    Ok(())
}
