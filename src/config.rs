//! Command-line configuration.
//!
//! Parsing only captures paths and run options; the files themselves are
//! opened later, at the I/O boundary. The policy selector is validated
//! here so a bad value fails before anything is read.

use std::path::{Path, PathBuf};

use crate::reconcile::UngroupedPolicy;

#[derive(Debug)]
pub struct Config {
    biclusters_path: PathBuf,
    data_path: PathBuf,
    policy: UngroupedPolicy,
    seed: Option<u64>,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- biclusters.json data.tsv replace 42
    /// ```
    pub fn new(
        mut args: impl Iterator<Item = String>,
    ) -> Result<Config, Box<dyn std::error::Error>> {
        // args:
        // 0: program name
        // 1: biclusters specification (json)
        // 2: dataset (tsv)
        // 3: ungrouped policy: replace | remove | nothing
        // 4: optional rng seed
        args.next();
        let biclusters_path = args
            .next()
            .map(PathBuf::from)
            .ok_or("missing biclusters file argument")?;
        let data_path = args
            .next()
            .map(PathBuf::from)
            .ok_or("missing data file argument")?;
        let policy: UngroupedPolicy = args.next().ok_or("missing policy argument")?.parse()?;
        let seed = match args.next() {
            Some(raw) => Some(raw.parse::<u64>()?),
            None => None,
        };

        Ok(Config {
            biclusters_path,
            data_path,
            policy,
            seed,
        })
    }

    pub fn get_biclusters_path(&self) -> &Path {
        &self.biclusters_path
    }

    pub fn get_data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn get_policy(&self) -> UngroupedPolicy {
        self.policy
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }
}
