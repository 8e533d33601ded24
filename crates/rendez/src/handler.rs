//! Per-connection handler: the read loop, event dispatch, and the
//! outbound writer task.

use std::sync::Arc;

use rendez_protocol::{ClientEvent, Codec, ServerEvent};
use rendez_registry::JoinRequest;
use rendez_transport::Connection;
use tokio::sync::mpsc;

use crate::RendezError;
use crate::server::ServerState;

/// Drives one client connection from accept to disconnect.
///
/// Spawns a writer task that drains the client's outbox onto the
/// socket, then reads inbound frames until the connection closes and
/// dispatches each decoded event to the registry. Whatever way the
/// loop ends, the client is removed from the registry before the
/// function returns.
pub(crate) async fn handle_connection<C>(
    conn: C,
    state: Arc<ServerState>,
) -> Result<(), RendezError>
where
    C: Connection,
    RendezError: From<C::Error>,
{
    let client_id = conn.id();
    tracing::info!(%client_id, "client connected");

    let (outbox, mut events) = mpsc::unbounded_channel::<ServerEvent>();
    state.registry.lock().await.register(client_id, outbox);

    // Writer task: serialize and push outbound events. The registry
    // only enqueues, so it never waits on a slow socket.
    let writer = {
        let conn = conn.clone();
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let frame = match state.codec.encode(&event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!(%client_id, error = %e, "encode failed");
                        continue;
                    }
                };
                if conn.send(&frame).await.is_err() {
                    break;
                }
            }
        })
    };

    let result = read_loop(&conn, client_id, &state).await;

    state.registry.lock().await.disconnect(client_id);
    writer.abort();
    tracing::info!(%client_id, "client disconnected");

    result
}

async fn read_loop<C>(
    conn: &C,
    client_id: rendez_protocol::ClientId,
    state: &ServerState,
) -> Result<(), RendezError>
where
    C: Connection,
    RendezError: From<C::Error>,
{
    loop {
        let Some(frame) = conn.recv().await? else {
            return Ok(());
        };

        let event = match state.codec.decode::<ClientEvent>(&frame) {
            Ok(event) => event,
            Err(e) => {
                // Malformed frames are the client's problem, not a
                // reason to drop the connection.
                tracing::debug!(%client_id, error = %e, "discarding bad frame");
                continue;
            }
        };

        dispatch(client_id, event, state).await;
    }
}

/// Applies one inbound event to the registry.
///
/// The registry lock is held for the whole mutation, so each event
/// runs to completion before the next one (from any connection) is
/// handled.
async fn dispatch(
    client_id: rendez_protocol::ClientId,
    event: ClientEvent,
    state: &ServerState,
) {
    let mut registry = state.registry.lock().await;

    match event {
        ClientEvent::CreateOrJoin {
            room_code,
            role,
            name,
        } => {
            let req = JoinRequest {
                room_code,
                role,
                name,
            };
            if let Err(e) = registry.join(client_id, req) {
                tracing::debug!(%client_id, error = %e, "join rejected");
                registry.send_error(client_id, e.to_string());
            }
        }
        ClientEvent::Cmd {
            room_code,
            name,
            payload,
        } => {
            registry.relay_cmd(client_id, &room_code, name, payload);
        }
        ClientEvent::Action {
            room_code,
            game,
            payload,
        } => {
            registry.relay_action(client_id, &room_code, game, payload);
        }
        ClientEvent::UpdateName { room_code, name } => {
            registry.update_name(client_id, &room_code, &name);
        }
    }
}
