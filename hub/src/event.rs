use crate::connection::UserId;
use crate::hooks::HookArgs;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

// Event types understood by clients
pub const POSTED: &str = "posted";
pub const USER_ADDED: &str = "user_added";
pub const USER_REMOVED: &str = "user_removed";
pub const EPHEMERAL_MESSAGE: &str = "ephemeral_message";

/// Version of the live event wire format.
pub const PROTOCOL_VERSION: u32 = 1;

/// Who an [`OutboundEvent`] is for.
///
/// The first targeting hint that is set picks the candidates: a single user,
/// then the members of a channel, then the members of a team, else everyone.
/// `contains_users` narrows the candidates further and `omit_users` removes
/// recipients; a user named in both is omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BroadcastScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    // Routing only: recipients never see who else was targeted.
    #[serde(skip)]
    pub contains_users: Option<HashSet<UserId>>,
    #[serde(skip)]
    pub omit_users: HashSet<UserId>,
}

impl BroadcastScope {
    /// Every connected session.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn channel(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            ..Self::default()
        }
    }

    pub fn team(team_id: impl Into<String>) -> Self {
        Self {
            team_id: Some(team_id.into()),
            ..Self::default()
        }
    }

    /// Restricts delivery to the given users.
    pub fn only<I, U>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        self.contains_users = Some(users.into_iter().map(Into::into).collect());
        self
    }

    pub fn omit(mut self, user_id: impl Into<UserId>) -> Self {
        self.omit_users.insert(user_id.into());
        self
    }

    /// Applies the allow-list and deny-list to one recipient.
    pub fn admits(&self, user_id: &str) -> bool {
        if self.omit_users.contains(user_id) {
            return false;
        }
        match &self.contains_users {
            Some(allowed) => allowed.contains(user_id),
            None => true,
        }
    }
}

/// A hook to run for every recipient of an event, with its arguments.
#[derive(Debug, Clone)]
pub struct HookInvocation {
    pub hook_id: String,
    pub args: HookArgs,
}

/// An event to broadcast. Immutable once handed to the dispatcher and shared
/// by every recipient's [`EventView`].
#[derive(Debug, Clone)]
pub struct OutboundEvent {
    event_type: String,
    version: u32,
    data: Map<String, Value>,
    scope: BroadcastScope,
    hooks: Vec<HookInvocation>,
}

impl OutboundEvent {
    pub fn new(event_type: impl Into<String>, scope: BroadcastScope) -> Self {
        Self {
            event_type: event_type.into(),
            version: PROTOCOL_VERSION,
            data: Map::new(),
            scope,
            hooks: Vec::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attaches a hook. Hooks run in the order they were attached.
    pub fn with_hook(mut self, hook_id: impl Into<String>, args: HookArgs) -> Self {
        self.hooks.push(HookInvocation {
            hook_id: hook_id.into(),
            args,
        });
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn scope(&self) -> &BroadcastScope {
        &self.scope
    }

    pub fn hooks(&self) -> &[HookInvocation] {
        &self.hooks
    }
}

/// What one session receives: the shared event plus whatever hooks added for
/// that session's recipient. Overlay keys shadow base keys.
#[derive(Debug, Clone)]
pub struct EventView {
    base: Arc<OutboundEvent>,
    overlay: Map<String, Value>,
    seq: Option<u64>,
}

#[derive(Serialize)]
struct WireEvent<'a> {
    event: &'a str,
    version: u32,
    data: Map<String, Value>,
    broadcast: &'a BroadcastScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    seq: Option<u64>,
}

impl EventView {
    pub fn new(base: Arc<OutboundEvent>) -> Self {
        Self {
            base,
            overlay: Map::new(),
            seq: None,
        }
    }

    pub fn event(&self) -> &OutboundEvent {
        &self.base
    }

    pub(crate) fn base(&self) -> &Arc<OutboundEvent> {
        &self.base
    }

    pub fn event_type(&self) -> &str {
        self.base.event_type()
    }

    /// Looks a key up in the overlay, then in the shared data.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.overlay.get(key).or_else(|| self.base.data.get(key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.overlay.insert(key.into(), value.into());
    }

    /// Shared data merged with this view's overlay.
    pub fn data(&self) -> Map<String, Value> {
        let mut data = self.base.data.clone();
        for (key, value) in &self.overlay {
            data.insert(key.clone(), value.clone());
        }
        data
    }

    /// Position of this view in its session's stream, set when it is received.
    pub fn seq(&self) -> Option<u64> {
        self.seq
    }

    pub(crate) fn set_seq(&mut self, seq: u64) {
        self.seq = Some(seq);
    }

    pub(crate) fn overlay(&self) -> &Map<String, Value> {
        &self.overlay
    }

    pub(crate) fn restore_overlay(&mut self, overlay: Map<String, Value>) {
        self.overlay = overlay;
    }

    /// Renders `{"event", "version", "data", "broadcast", "seq"}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&WireEvent {
            event: self.event_type(),
            version: self.base.version,
            data: self.data(),
            broadcast: &self.base.scope,
            seq: self.seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_list_wins_over_allow_list() {
        let scope = BroadcastScope::channel("c1")
            .only(["alice", "bob"])
            .omit("bob");

        assert!(scope.admits("alice"));
        assert!(!scope.admits("bob"));
        assert!(!scope.admits("carol"));
    }

    #[test]
    fn test_scope_without_lists_admits_everyone() {
        let scope = BroadcastScope::team("t1");
        assert!(scope.admits("anyone"));
    }

    #[test]
    fn test_overlay_shadows_base_without_touching_it() {
        let event = Arc::new(
            OutboundEvent::new(POSTED, BroadcastScope::channel("c1"))
                .with_data("post", "{}")
                .with_data("mentions", "base"),
        );
        let mut view = EventView::new(event.clone());
        view.insert("mentions", "[\"u1\"]");

        assert_eq!(view.get("mentions"), Some(&Value::from("[\"u1\"]")));
        assert_eq!(view.get("post"), Some(&Value::from("{}")));
        assert_eq!(event.data().get("mentions"), Some(&Value::from("base")));
        assert_eq!(EventView::new(event).get("mentions"), Some(&Value::from("base")));
    }

    #[test]
    fn test_to_json_renders_wire_shape() {
        let event = Arc::new(
            OutboundEvent::new(USER_ADDED, BroadcastScope::channel("c1")).with_data("user_id", "u1"),
        );
        let mut view = EventView::new(event);
        view.insert("extra", true);
        view.set_seq(7);

        let json: Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();

        assert_eq!(json["event"], "user_added");
        assert_eq!(json["version"], PROTOCOL_VERSION);
        assert_eq!(json["data"]["user_id"], "u1");
        assert_eq!(json["data"]["extra"], true);
        assert_eq!(json["broadcast"]["channel_id"], "c1");
        assert_eq!(json["seq"], 7);
    }

    #[test]
    fn test_to_json_keeps_recipient_lists_private() {
        let scope = BroadcastScope::channel("c1").only(["alice", "bob"]).omit("carol");
        let view = EventView::new(Arc::new(OutboundEvent::new(POSTED, scope)));

        let text = view.to_json().unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["broadcast"], serde_json::json!({"channel_id": "c1"}));
        assert!(!text.contains("bob"));
        assert!(!text.contains("carol"));
    }
}
