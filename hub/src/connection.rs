use crate::event::{BroadcastScope, EventView};
use dashmap::DashMap;
use log::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

// Type alias for user IDs (callers convert events::Id to String)
pub type UserId = String;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One live client connection of a recipient.
///
/// The registry owns the routing entry; the paired [`SessionReceiver`] is owned
/// by the connection's writer. Once every `Arc<Session>` is gone the queue is
/// closed and the writer drains what is left and stops.
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,
    user_id: UserId,
    locale: String,
    sender: mpsc::Sender<EventView>,
    alive: AtomicBool,
}

impl Session {
    /// Creates a session with a bounded outbound queue of `capacity` views.
    pub fn new(
        user_id: impl Into<UserId>,
        locale: impl Into<String>,
        capacity: usize,
    ) -> (Arc<Session>, SessionReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let id = ConnectionId::new();

        let session = Arc::new(Session {
            id: id.clone(),
            user_id: user_id.into(),
            locale: locale.into(),
            sender,
            alive: AtomicBool::new(true),
        });
        let receiver = SessionReceiver {
            id,
            receiver,
            next_seq: 0,
        };

        (session, receiver)
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the session dead. Returns true for the caller that closed it.
    pub(crate) fn close(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    /// Never waits: a full queue is reported back to the dispatcher.
    pub(crate) fn try_send(&self, view: EventView) -> Result<(), TrySendError<EventView>> {
        self.sender.try_send(view)
    }
}

/// Receiving end of a session's queue. Stamps every view with the session's
/// next sequence number, starting at 0.
#[derive(Debug)]
pub struct SessionReceiver {
    id: ConnectionId,
    receiver: mpsc::Receiver<EventView>,
    next_seq: u64,
}

impl SessionReceiver {
    pub fn connection_id(&self) -> &ConnectionId {
        &self.id
    }

    /// Waits for the next view. `None` once the session was unregistered and
    /// its queue drained.
    pub async fn recv(&mut self) -> Option<EventView> {
        let view = self.receiver.recv().await?;
        Some(self.stamp(view))
    }

    pub fn try_recv(&mut self) -> Option<EventView> {
        let view = self.receiver.try_recv().ok()?;
        Some(self.stamp(view))
    }

    fn stamp(&mut self, mut view: EventView) -> EventView {
        view.set_seq(self.next_seq);
        self.next_seq += 1;
        view
    }
}

/// Connection registry with a primary index by connection and secondary
/// indexes by user, channel and team.
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection_id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, Arc<Session>>,

    /// Secondary index: fast lookup by user_id for message routing - O(1)
    user_index: DashMap<UserId, HashSet<ConnectionId>>,

    /// Membership indexes used to resolve channel and team scopes
    channel_members: DashMap<String, HashSet<UserId>>,
    team_members: DashMap<String, HashSet<UserId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_index: DashMap::new(),
            channel_members: DashMap::new(),
            team_members: DashMap::new(),
        }
    }

    /// Register a new session - O(1)
    pub fn register(
        &self,
        user_id: impl Into<UserId>,
        locale: impl Into<String>,
        capacity: usize,
    ) -> (Arc<Session>, SessionReceiver) {
        let (session, receiver) = Session::new(user_id, locale, capacity);

        // Insert into primary storage
        self.connections
            .insert(session.id().clone(), session.clone());

        // Update secondary index
        self.user_index
            .entry(session.user_id().to_string())
            .or_default()
            .insert(session.id().clone());

        (session, receiver)
    }

    /// Unregister a session - O(1). Returns the session if it was still registered.
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<Arc<Session>> {
        // Remove from primary storage
        let (_, session) = self.connections.remove(connection_id)?;
        session.close();

        // Update secondary index
        let user_id = session.user_id();
        if let Some(mut entry) = self.user_index.get_mut(user_id) {
            entry.remove(connection_id);

            // Clean up empty user entries
            if entry.is_empty() {
                drop(entry); // Release lock before removal
                self.user_index
                    .remove_if(user_id, |_, connections| connections.is_empty());
            }
        }

        Some(session)
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<Arc<Session>> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn sessions_for_user(&self, user_id: &str) -> Vec<Arc<Session>> {
        // Copy the ids out so no user_index guard is held while reading connections
        let connection_ids: Vec<ConnectionId> = match self.user_index.get(user_id) {
            Some(ids) => ids.iter().cloned().collect(),
            None => return Vec::new(),
        };

        connection_ids
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Replaces the member set of a channel.
    pub fn set_channel_members<I, U>(&self, channel_id: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        let members: HashSet<UserId> = members.into_iter().map(Into::into).collect();
        self.channel_members.insert(channel_id.into(), members);
    }

    pub fn add_channel_member(&self, channel_id: impl Into<String>, user_id: impl Into<UserId>) {
        self.channel_members
            .entry(channel_id.into())
            .or_default()
            .insert(user_id.into());
    }

    pub fn remove_channel_member(&self, channel_id: &str, user_id: &str) {
        if let Some(mut members) = self.channel_members.get_mut(channel_id) {
            members.remove(user_id);
        }
    }

    pub fn channel_members(&self, channel_id: &str) -> HashSet<UserId> {
        self.channel_members
            .get(channel_id)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    /// Replaces the member set of a team.
    pub fn set_team_members<I, U>(&self, team_id: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        let members: HashSet<UserId> = members.into_iter().map(Into::into).collect();
        self.team_members.insert(team_id.into(), members);
    }

    pub fn add_team_member(&self, team_id: impl Into<String>, user_id: impl Into<UserId>) {
        self.team_members
            .entry(team_id.into())
            .or_default()
            .insert(user_id.into());
    }

    /// Snapshot of the live sessions a scope selects.
    ///
    /// No registry guard is held once this returns, so callers can run hooks
    /// and enqueue without serializing other broadcasts or registrations.
    pub fn candidates(&self, scope: &BroadcastScope) -> Vec<Arc<Session>> {
        let users: Option<HashSet<UserId>> = if let Some(user_id) = &scope.user_id {
            Some(HashSet::from([user_id.clone()]))
        } else if let Some(channel_id) = &scope.channel_id {
            Some(self.channel_members(channel_id))
        } else if let Some(team_id) = &scope.team_id {
            Some(
                self.team_members
                    .get(team_id)
                    .map(|members| members.clone())
                    .unwrap_or_default(),
            )
        } else {
            None
        };

        let sessions: Vec<Arc<Session>> = match users {
            Some(users) => users
                .iter()
                .filter(|user_id| scope.admits(user_id))
                .flat_map(|user_id| self.sessions_for_user(user_id))
                .collect(),
            None => self
                .connections
                .iter()
                .filter(|entry| scope.admits(entry.value().user_id()))
                .map(|entry| entry.value().clone())
                .collect(),
        };

        trace!("Scope {scope:?} selected {} session(s)", sessions.len());
        sessions
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
