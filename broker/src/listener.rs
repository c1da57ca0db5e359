// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Accept loop: binds the listening socket and spawns one connection task
//! per accepted client.

use std::net::SocketAddr;

use tokio::net::{TcpSocket, UnixListener};
use tokio::sync::mpsc;

use crate::commands::DispatcherCmd;
use crate::config::{Config, SocketFamily};
use crate::connection::handle_connection;
use crate::error::Error;

/// Binds according to `config.socket_family` and accepts connections until
/// the process is killed. Each accepted socket is handed to its own
/// `handle_connection` task; a per-accept failure is logged and does not
/// stop the loop.
///
/// # Errors
/// Returns `Error` if the listening socket can't be bound.
pub async fn run(config: Config, dispatcher: mpsc::Sender<DispatcherCmd>) -> Result<(), Error> {
    match config.socket_family {
        SocketFamily::Inet => run_inet(config, dispatcher).await,
        SocketFamily::Unix => run_unix(config, dispatcher).await,
    }
}

/// TCP_NODELAY disables Nagle's algorithm on every accepted connection and
/// SO_REUSEADDR lets the listening port be rebound right after a restart.
async fn run_inet(config: Config, dispatcher: mpsc::Sender<DispatcherCmd>) -> Result<(), Error> {
    let addr: SocketAddr = format!("{}:{}", config.hostname, config.port)
        .parse()
        .map_err(|err| {
            Error::new(
                crate::error::ErrorKind::Config,
                format!("invalid hostname/port: {err}"),
            )
        })?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(config.tcp_backlog)?;
    log::info!("listening on {addr}");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                log::warn!("accept failed: {err}");
                continue;
            }
        };
        if let Err(err) = stream.set_nodelay(true) {
            log::warn!("connection {peer}: failed to set TCP_NODELAY: {err}");
        }
        log::debug!("accepted connection from {peer}");
        let dispatcher = dispatcher.clone();
        let max_request_size = config.max_request_size;
        tokio::spawn(async move {
            handle_connection(stream, peer.to_string(), dispatcher, max_request_size).await;
        });
    }
}

async fn run_unix(config: Config, dispatcher: mpsc::Sender<DispatcherCmd>) -> Result<(), Error> {
    let _ = std::fs::remove_file(&config.hostname);
    let listener = UnixListener::bind(&config.hostname)?;
    log::info!("listening on unix:{}", config.hostname);

    loop {
        let (stream, _peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                log::warn!("accept failed: {err}");
                continue;
            }
        };
        log::debug!("accepted connection on unix:{}", config.hostname);
        let dispatcher = dispatcher.clone();
        let max_request_size = config.max_request_size;
        let label = format!("unix:{}", config.hostname);
        tokio::spawn(async move {
            handle_connection(stream, label, dispatcher, max_request_size).await;
        });
    }
}
