use std::env;
use std::process;

use chrono::Local;
use log::{error, info, LevelFilter};

use bicluster_reconcile::config::Config;
use bicluster_reconcile::io;
use bicluster_reconcile::pipeline::Reconciler;
use bicluster_reconcile::reconcile::{ReconcileConfig, ReconcileError};

fn setup_logger() {
    // Initialize the logger
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();
}

fn timestamp() -> String {
    // Get the current time
    Local::now().format("%H:%M:%S").to_string()
}

fn run(config: &Config) -> Result<(), ReconcileError> {
    let set = io::load_bicluster_set(config.get_biclusters_path())?;
    let table = io::load_table(config.get_data_path())?;

    let reconciler = Reconciler::new(ReconcileConfig {
        policy: config.get_policy(),
        seed: config.get_seed(),
    });
    let outcome = reconciler.run(table, set)?;

    let paths = io::output_paths(config.get_data_path());
    io::write_description(&paths.translated, &outcome.description)?;
    io::write_table(&paths.data, &outcome.table)?;
    io::write_column_types(&paths.types, &outcome.table)?;
    info!(
        "[{}] Wrote {}, {} and {}",
        timestamp(),
        paths.translated.display(),
        paths.data.display(),
        paths.types.display()
    );

    // Statistics line for the caller, final classification
    println!("{}", outcome.stats.after);
    Ok(())
}

fn main() {
    setup_logger();

    let config = match Config::new(env::args()) {
        Ok(config) => config,
        Err(err) => {
            error!("[{}] {}", timestamp(), err);
            eprintln!(
                "usage: bicluster_reconcile <biclusters.json> <data.tsv> <replace|remove|nothing> [seed]"
            );
            process::exit(1);
        }
    };

    if let Err(err) = run(&config) {
        error!("[{}] {}", timestamp(), err);
        process::exit(1);
    }
}
