// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Wires the dispatcher actor, the periodic stats publisher and the
//! listener accept loop together and runs them to completion.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::commands::DispatcherCmd;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::listener;

/// Runs the broker until the listener task exits (normally only on a
/// bind failure, since the accept loop itself never returns).
///
/// # Errors
/// Returns `Error` if the listening socket can't be bound.
pub async fn run_server(config: Config) -> Result<(), Error> {
    let (dispatcher_tx, dispatcher_rx) = mpsc::channel::<DispatcherCmd>(256);
    let dispatcher = Dispatcher::new(dispatcher_rx, config.max_memory);
    tokio::spawn(dispatcher.run());

    let stats_tx = dispatcher_tx.clone();
    let interval = Duration::from_secs(config.stats_pub_interval.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if stats_tx.send(DispatcherCmd::PublishStats).await.is_err() {
                break;
            }
        }
    });

    listener::run(config, dispatcher_tx).await
}
