// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::path::PathBuf;

use clap::Parser;

use broker::config::Config;
use broker::error::Error;
use broker::log::init_log;
use broker::server::run_server;

#[derive(Parser, Debug)]
#[command(name = "solbroker", version, about = "MQTT v3.1.1 broker")]
struct Cli {
    /// Listen address, overriding the config file's hostname.
    #[arg(short = 'a', long)]
    addr: Option<String>,

    /// Listen port, overriding the config file's port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a config file. Defaults to built-in config.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raise the effective log level to debug.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(addr) = cli.addr {
        config.hostname = addr;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.verbose {
        config.loglevel = broker::config::LogLevel::Debug;
    }

    init_log(&config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(config))
}
