// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Per-client connection task: the read -> decode -> dispatch -> write
//! loop. Collapses the one-shot re-armed read/write state machine into a
//! single `async fn` driven by `tokio::select!` — the only suspension
//! points are its `.await`s, matching the one-fd-at-a-time ordering a
//! one-shot event loop would also give.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot, watch};

use codec::{Packet, PublishAckPacket, PublishCompletePacket, PublishReceivedPacket, QoS};

use crate::commands::{
    ConnectRequest, DisconnectRequest, DispatcherCmd, PublishRequest, SubscribeRequest,
    UnsubscribeRequest,
};
use crate::error::{Error, ErrorKind};
use crate::types::ClientId;

enum Next {
    Continue,
    Disconnect,
}

/// Reads exactly one framed packet: fixed header byte, remaining-length
/// varint, then that many body bytes. Returns `Ok(None)` on a clean EOF
/// at a frame boundary.
async fn read_frame<R>(reader: &mut R, max_request_size: usize) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncReadExt + Unpin,
{
    let mut header_byte = [0u8; 1];
    match reader.read_exact(&mut header_byte).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }

    let mut frame = vec![header_byte[0]];
    let mut value: usize = 0;
    let mut multiplier: usize = 1;
    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).await?;
        frame.push(byte[0]);
        value += usize::from(byte[0] & 0x7f) * multiplier;
        if byte[0] & 0x80 == 0 {
            break;
        }
        multiplier *= 128;
        if frame.len() > 5 {
            return Err(Error::new(
                ErrorKind::Protocol,
                "malformed remaining length",
            ));
        }
    }

    if value > max_request_size {
        return Err(Error::new(
            ErrorKind::Protocol,
            format!("packet body of {value} bytes exceeds max_request_size"),
        ));
    }

    let mut body = vec![0u8; value];
    reader.read_exact(&mut body).await?;
    frame.extend_from_slice(&body);
    Ok(Some(frame))
}

async fn write_packet<W>(writer: &mut W, packet: &Packet) -> Result<(), Error>
where
    W: AsyncWriteExt + Unpin,
{
    let mut buf = Vec::new();
    packet.encode(&mut buf)?;
    writer.write_all(&buf).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_packet<W>(
    packet: Packet,
    client_id: &mut Option<ClientId>,
    dispatcher: &mpsc::Sender<DispatcherCmd>,
    outbound_tx: &mpsc::Sender<Vec<u8>>,
    displace_tx: &mut Option<watch::Sender<bool>>,
    writer: &mut W,
    addr: &str,
) -> Result<Next, Error>
where
    W: AsyncWriteExt + Unpin,
{
    match packet {
        Packet::Connect(connect) => {
            let (reply_tx, reply_rx) = oneshot::channel();
            let Some(displace) = displace_tx.take() else {
                log::warn!("connection {addr}: duplicate CONNECT on the same socket, dropping");
                return Ok(Next::Disconnect);
            };
            dispatcher
                .send(DispatcherCmd::Connect(ConnectRequest {
                    client_id: connect.client_id.clone(),
                    clean_session: connect.flags.clean_session,
                    outbound: outbound_tx.clone(),
                    displace,
                    reply: reply_tx,
                }))
                .await?;
            let ack = reply_rx
                .await
                .map_err(|err| Error::new(ErrorKind::Channel, err.to_string()))?;
            let rejected = ack.return_code != codec::ConnectReturnCode::Accepted;
            write_packet(writer, &Packet::ConnectAck(ack)).await?;
            if rejected {
                return Ok(Next::Disconnect);
            }
            *client_id = Some(connect.client_id);
            Ok(Next::Continue)
        }
        Packet::Subscribe(subscribe) => {
            let Some(id) = client_id.clone() else {
                return Ok(Next::Disconnect);
            };
            let (reply_tx, reply_rx) = oneshot::channel();
            dispatcher
                .send(DispatcherCmd::Subscribe(SubscribeRequest {
                    client_id: id,
                    packet_id: subscribe.packet_id,
                    topics: subscribe.topics,
                    reply: reply_tx,
                }))
                .await?;
            let ack = reply_rx
                .await
                .map_err(|err| Error::new(ErrorKind::Channel, err.to_string()))?;
            write_packet(writer, &Packet::SubscribeAck(ack)).await?;
            Ok(Next::Continue)
        }
        Packet::Unsubscribe(unsubscribe) => {
            let Some(id) = client_id.clone() else {
                return Ok(Next::Disconnect);
            };
            let (reply_tx, reply_rx) = oneshot::channel();
            dispatcher
                .send(DispatcherCmd::Unsubscribe(UnsubscribeRequest {
                    client_id: id,
                    packet_id: unsubscribe.packet_id,
                    topics: unsubscribe.topics,
                    reply: reply_tx,
                }))
                .await?;
            let ack = reply_rx
                .await
                .map_err(|err| Error::new(ErrorKind::Channel, err.to_string()))?;
            write_packet(writer, &Packet::UnsubscribeAck(ack)).await?;
            Ok(Next::Continue)
        }
        Packet::Publish(publish) => {
            let qos = publish.qos;
            let packet_id = publish.packet_id;
            dispatcher
                .send(DispatcherCmd::Publish(PublishRequest { packet: publish }))
                .await?;
            match qos {
                QoS::AtMostOnce => {}
                QoS::AtLeastOnce => {
                    write_packet(
                        writer,
                        &Packet::PublishAck(PublishAckPacket::new(packet_id)),
                    )
                    .await?;
                }
                QoS::ExactlyOnce => {
                    write_packet(
                        writer,
                        &Packet::PublishReceived(PublishReceivedPacket::new(packet_id)),
                    )
                    .await?;
                }
            }
            Ok(Next::Continue)
        }
        Packet::PublishRelease(release) => {
            write_packet(
                writer,
                &Packet::PublishComplete(PublishCompletePacket::new(release.packet_id)),
            )
            .await?;
            Ok(Next::Continue)
        }
        Packet::PublishAck(_) | Packet::PublishReceived(_) | Packet::PublishComplete(_) => {
            Ok(Next::Continue)
        }
        Packet::PingRequest(_) => {
            write_packet(writer, &Packet::PingResponse(codec::PingResponsePacket)).await?;
            Ok(Next::Continue)
        }
        Packet::Disconnect(_) => Ok(Next::Disconnect),
        Packet::ConnectAck(_)
        | Packet::SubscribeAck(_)
        | Packet::UnsubscribeAck(_)
        | Packet::PingResponse(_) => {
            log::warn!("connection {addr}: received a server-to-client packet type, dropping");
            Ok(Next::Disconnect)
        }
    }
}

pub async fn handle_connection<S>(
    socket: S,
    addr: String,
    dispatcher: mpsc::Sender<DispatcherCmd>,
    max_request_size: usize,
) where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (mut reader, mut writer) = tokio::io::split(socket);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Vec<u8>>(32);
    let (displace_tx, mut displace_rx) = watch::channel(false);
    let mut displace_tx = Some(displace_tx);
    let mut client_id: Option<ClientId> = None;
    let mut displaced = false;

    loop {
        tokio::select! {
            changed = displace_rx.changed() => {
                if changed.is_ok() && *displace_rx.borrow() {
                    log::info!("connection {addr}: displaced by a newer CONNECT for this client id");
                    displaced = true;
                    break;
                }
            }
            Some(bytes) = outbound_rx.recv() => {
                if let Err(err) = writer.write_all(&bytes).await {
                    log::warn!("connection {addr}: fan-out write failed: {err}");
                    break;
                }
            }
            frame = read_frame(&mut reader, max_request_size) => {
                let frame = match frame {
                    Ok(Some(frame)) => frame,
                    Ok(None) => {
                        log::debug!("connection {addr}: peer closed");
                        break;
                    }
                    Err(err) => {
                        log::warn!("connection {addr}: {err}");
                        break;
                    }
                };
                let packet = match Packet::decode(&frame) {
                    Ok(Some((packet, _consumed))) => packet,
                    Ok(None) => {
                        log::warn!("connection {addr}: frame shorter than its own header claimed");
                        break;
                    }
                    Err(err) => {
                        log::warn!("connection {addr}: decode error: {err:?}");
                        break;
                    }
                };
                match handle_packet(
                    packet,
                    &mut client_id,
                    &dispatcher,
                    &outbound_tx,
                    &mut displace_tx,
                    &mut writer,
                    &addr,
                )
                .await
                {
                    Ok(Next::Continue) => {}
                    Ok(Next::Disconnect) => break,
                    Err(err) => {
                        log::warn!("connection {addr}: {err}");
                        break;
                    }
                }
            }
        }
    }

    // A displaced connection's client id was already reassigned to the new
    // session by the dispatcher before the displace signal fired; sending
    // Disconnect here would evict that live session instead of this dead one.
    if !displaced {
        if let Some(id) = client_id {
            let _ = dispatcher
                .send(DispatcherCmd::Disconnect(DisconnectRequest {
                    client_id: id,
                }))
                .await;
        }
    }
}
