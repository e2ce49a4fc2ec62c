use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use navclust_cli::train::input::TrainConfig;
use navclust_cli::train::trainer;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("NAVCLUST_LOG", "error,navclust=info"))
        .init();

    let matches = Command::new("navclust")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("navclust - Behavioral clustering of click-stream navigation sessions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Pick a cluster count, fit the clusters and write centers, labels and a report")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data_file")
                        .short('d')
                        .long("data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to the session file (one session per line). \
                             Overrides the data file specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Directory that centers, labels and the report are written to. \
                             Overrides the directory specified in the configuration file.",
                        )
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("n_clusters")
                        .short('k')
                        .long("n_clusters")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of clusters to fit when the sweep is disabled."),
                )
                .arg(
                    Arg::new("no_sweep")
                        .long("no-sweep")
                        .help("Skip the silhouette sweep and fit the configured cluster count.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path: &PathBuf = matches
        .get_one("config")
        .ok_or_else(|| anyhow::anyhow!("Missing config argument"))?;
    log::info!("[navclust::train] Training from config: {:?}", config_path);

    let params = match TrainConfig::from_arguments(config_path, matches) {
        Ok(params) => params,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1)
        }
    };

    match trainer::run_training(&params) {
        Ok(summary) => {
            println!(
                "Clustered {} of {} sessions into {} clusters",
                summary.n_kept, summary.n_sessions, summary.n_clusters
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
