use std::collections::HashMap;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc::error::SendTimeoutError;
use uuid::Uuid;

use crate::ws::{ClientHandle, ServerFrame};

/// Connection registry mapping chat room ids to their live subscriber sets.
///
/// All membership changes go through the outer map, so join and leave for
/// the same room serialize on its shard lock and an emptied channel is
/// removed in the same operation that empties it. Broadcast snapshots the
/// subscriber set and never holds a lock across a send.
pub struct ChannelRegistry {
    channels: DashMap<i64, Channel>,
    delivery_timeout: Duration,
}

#[derive(Default)]
struct Channel {
    subscribers: HashMap<Uuid, ClientHandle>,
}

impl ChannelRegistry {
    pub fn new(delivery_timeout: Duration) -> Self {
        Self {
            channels: DashMap::new(),
            delivery_timeout,
        }
    }

    /// Subscribe a connection to a room channel, creating the channel on
    /// first join
    pub fn join(&self, chat_room_id: i64, handle: ClientHandle) {
        self.channels
            .entry(chat_room_id)
            .or_default()
            .subscribers
            .insert(handle.conn_id, handle);
    }

    /// Remove a connection from a room channel. A channel left without
    /// subscribers is dropped from the registry entirely.
    pub fn leave(&self, chat_room_id: i64, conn_id: Uuid) {
        self.channels.remove_if_mut(&chat_room_id, |_, channel| {
            channel.subscribers.remove(&conn_id);
            channel.subscribers.is_empty()
        });
    }

    /// Deliver a frame to every current subscriber of the room.
    ///
    /// Each delivery waits at most the registry's timeout for queue space;
    /// a full or closed subscriber queue skips that subscriber without
    /// affecting the others. Returns the number of successful deliveries.
    pub async fn broadcast(&self, chat_room_id: i64, frame: ServerFrame) -> usize {
        let targets: Vec<ClientHandle> = match self.channels.get(&chat_room_id) {
            Some(channel) => channel.subscribers.values().cloned().collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for client in targets {
            match client
                .sender
                .send_timeout(frame.clone(), self.delivery_timeout)
                .await
            {
                Ok(()) => delivered += 1,
                Err(SendTimeoutError::Timeout(_)) => {
                    tracing::warn!(
                        conn_id = %client.conn_id,
                        chat_room_id,
                        "Subscriber queue full, delivery skipped"
                    );
                }
                Err(SendTimeoutError::Closed(_)) => {
                    tracing::debug!(
                        conn_id = %client.conn_id,
                        chat_room_id,
                        "Subscriber gone, delivery skipped"
                    );
                }
            }
        }

        delivered
    }

    pub fn subscriber_count(&self, chat_room_id: i64) -> usize {
        self.channels
            .get(&chat_room_id)
            .map(|channel| channel.subscribers.len())
            .unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
