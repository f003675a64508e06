// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pool_config::{Config, ConfigParser};
use pool_types::community;
use slog::{Drain, Logger};
use std::io::{stdout, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tabwriter::TabWriter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, infer_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit bunyan JSON logs instead of terminal logs.
    #[arg(long, global = true)]
    bunyan: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a configuration document and summarize it.
    Check {
        /// Path to a YAML configuration document.
        file: PathBuf,

        /// Print the validated configuration as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show which pool an address belongs to.
    Lookup {
        /// Path to a YAML configuration document.
        file: PathBuf,

        addr: IpAddr,
    },

    /// Print the JSON schema of a validated configuration.
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = if cli.bunyan {
        pool_config::log::init_logger()
    } else {
        term_logger()
    };

    match cli.command {
        Commands::Check { file, json } => {
            let config = load(&log, &file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                summarize(&config)?;
            }
        }
        Commands::Lookup { file, addr } => {
            let config = load(&log, &file)?;
            match config.pool_for(addr) {
                Some(pool) => println!("{}", pool.name),
                None => anyhow::bail!("{addr} is not in any pool"),
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(Config);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}

fn load(log: &Logger, file: &Path) -> Result<Config> {
    let raw = std::fs::read(file)
        .with_context(|| format!("read {}", file.display()))?;
    ConfigParser::new(log.clone())
        .parse(&raw)
        .with_context(|| format!("invalid configuration {}", file.display()))
}

fn summarize(config: &Config) -> Result<()> {
    let mut tw = TabWriter::new(stdout());
    writeln!(
        &mut tw,
        "{}\t{}\t{}\t{}\t{}",
        "Peer Address".dimmed(),
        "Port".dimmed(),
        "Peer ASN".dimmed(),
        "Local ASN".dimmed(),
        "Hold Time".dimmed(),
    )?;
    for p in &config.peers {
        writeln!(
            &mut tw,
            "{}\t{}\t{}\t{}\t{}",
            p.addr,
            p.port,
            p.asn,
            p.my_asn,
            humantime::format_duration(p.hold_time),
        )?;
    }
    tw.flush()?;
    println!();

    let mut tw = TabWriter::new(stdout());
    writeln!(
        &mut tw,
        "{}\t{}\t{}\t{}\t{}",
        "Pool".dimmed(),
        "CIDR".dimmed(),
        "Aggregation".dimmed(),
        "Local Pref".dimmed(),
        "Communities".dimmed(),
    )?;
    for (name, pool) in &config.pools {
        let cidr = pool
            .cidr
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let name = if pool.avoid_buggy_ips {
            format!("{name} (avoid buggy ips)")
        } else {
            name.clone()
        };
        if pool.advertisements.is_empty() {
            writeln!(&mut tw, "{name}\t{cidr}\t-\t-\t-")?;
        }
        for a in &pool.advertisements {
            let communities = a
                .communities
                .iter()
                .map(|c| community::format(*c))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(
                &mut tw,
                "{name}\t{cidr}\t/{}\t{}\t{}",
                a.aggregation_length, a.local_pref, communities,
            )?;
        }
    }
    tw.flush()?;
    Ok(())
}

fn term_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain).fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x2000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}
