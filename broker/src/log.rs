// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! A small `log::Log` sink writing `<epoch_seconds> <mark> <message>`
//! lines to stderr and, when configured, to a log file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, Log, Metadata, Record};

use crate::config::Config;
use crate::error::Error;

struct BrokerLog {
    file: Option<Mutex<File>>,
}

const fn mark(level: Level) -> char {
    match level {
        Level::Debug | Level::Trace => '#',
        Level::Info => 'i',
        Level::Warn => '*',
        Level::Error => '!',
    }
}

impl Log for BrokerLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let line = format!("{epoch} {} {}\n", mark(record.level()), record.args());
        eprint!("{line}");
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Installs the broker's log sink and raises the max level to match
/// `config.loglevel`.
///
/// # Errors
/// Returns `Error` if the configured log file can't be opened, or if a
/// logger has already been installed in this process.
pub fn init_log(config: &Config) -> Result<(), Error> {
    let file = match &config.log_file {
        Some(path) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };
    log::set_max_level(config.loglevel.to_level_filter());
    log::set_boxed_logger(Box::new(BrokerLog { file })).map_err(Error::from)
}
