//! Per-recipient broadcast hooks.
//!
//! An [`OutboundEvent`] can carry hook invocations. For every session the
//! dispatcher delivers to, each attached hook decides whether it applies and
//! may then add keys to that session's [`EventView`]. The shared event data is
//! never touched, so hooks cannot leak one recipient's data to another.

use crate::connection::Session;
use crate::event::{EventView, OutboundEvent, POSTED};
use log::*;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const ADD_MENTIONS: &str = "add_mentions";
pub const ADD_FOLLOWERS: &str = "add_followers";

/// Argument names, also the keys the built-in hooks write.
pub const MENTIONS: &str = "mentions";
pub const FOLLOWERS: &str = "followers";

pub type HookArgs = HashMap<String, HookArg>;

/// A hook argument as attached by the producer.
///
/// Producers either hand over a typed id list or a loosely-typed JSON value;
/// hooks accept both as long as the value is a list of strings.
#[derive(Debug, Clone, PartialEq)]
pub enum HookArg {
    Ids(Vec<String>),
    Value(Value),
}

impl HookArg {
    pub fn as_ids(&self) -> Result<Vec<String>, HookError> {
        match self {
            HookArg::Ids(ids) => Ok(ids.clone()),
            HookArg::Value(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(id) => Ok(id.clone()),
                    other => Err(HookError::IncompatibleArgument(format!(
                        "expected a string id, found {other}"
                    ))),
                })
                .collect(),
            HookArg::Value(other) => Err(HookError::IncompatibleArgument(format!(
                "expected a list of ids, found {other}"
            ))),
        }
    }
}

impl From<Vec<String>> for HookArg {
    fn from(ids: Vec<String>) -> Self {
        HookArg::Ids(ids)
    }
}

impl From<Value> for HookArg {
    fn from(value: Value) -> Self {
        HookArg::Value(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HookError {
    /// A required argument was not attached to the event.
    MissingArgument(String),

    /// The argument is there but has a shape the hook cannot use.
    IncompatibleArgument(String),

    /// The event names a hook nobody registered.
    UnknownHook(String),

    Serialization(String),
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::MissingArgument(name) => write!(f, "Missing hook argument: {}", name),
            HookError::IncompatibleArgument(msg) => {
                write!(f, "Incompatible hook argument: {}", msg)
            }
            HookError::UnknownHook(id) => write!(f, "Unknown hook: {}", id),
            HookError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for HookError {}

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        HookError::Serialization(err.to_string())
    }
}

/// Policy applied to one event for one session.
pub trait BroadcastHook: Send + Sync {
    fn id(&self) -> &'static str;

    /// `Ok(false)` when the hook does not apply to this event or recipient.
    fn should_process(
        &self,
        event: &OutboundEvent,
        session: &Session,
        args: &HookArgs,
    ) -> Result<bool, HookError>;

    fn process(
        &self,
        view: &mut EventView,
        session: &Session,
        args: &HookArgs,
    ) -> Result<(), HookError>;
}

fn required_ids(args: &HookArgs, name: &str) -> Result<Vec<String>, HookError> {
    args.get(name)
        .ok_or_else(|| HookError::MissingArgument(name.to_string()))?
        .as_ids()
}

fn posted_to_listed_recipient(
    event: &OutboundEvent,
    session: &Session,
    args: &HookArgs,
    name: &str,
) -> Result<bool, HookError> {
    if event.event_type() != POSTED {
        return Ok(false);
    }
    let ids = required_ids(args, name)?;
    Ok(ids.iter().any(|id| id == session.user_id()))
}

/// Writes a JSON-encoded list holding only this session's recipient, so nobody
/// learns who else is on the list.
fn mark_recipient(view: &mut EventView, session: &Session, key: &str) -> Result<(), HookError> {
    let encoded = serde_json::to_string(&[session.user_id()])?;
    view.insert(key, encoded);
    Ok(())
}

/// Tells a recipient of a `posted` event that they were mentioned.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddMentionsHook;

impl BroadcastHook for AddMentionsHook {
    fn id(&self) -> &'static str {
        ADD_MENTIONS
    }

    fn should_process(
        &self,
        event: &OutboundEvent,
        session: &Session,
        args: &HookArgs,
    ) -> Result<bool, HookError> {
        posted_to_listed_recipient(event, session, args, MENTIONS)
    }

    fn process(
        &self,
        view: &mut EventView,
        session: &Session,
        _args: &HookArgs,
    ) -> Result<(), HookError> {
        mark_recipient(view, session, MENTIONS)
    }
}

/// Tells a recipient of a `posted` event that they follow its thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddFollowersHook;

impl BroadcastHook for AddFollowersHook {
    fn id(&self) -> &'static str {
        ADD_FOLLOWERS
    }

    fn should_process(
        &self,
        event: &OutboundEvent,
        session: &Session,
        args: &HookArgs,
    ) -> Result<bool, HookError> {
        posted_to_listed_recipient(event, session, args, FOLLOWERS)
    }

    fn process(
        &self,
        view: &mut EventView,
        session: &Session,
        _args: &HookArgs,
    ) -> Result<(), HookError> {
        mark_recipient(view, session, FOLLOWERS)
    }
}

/// Hooks known to the dispatcher, in registration order.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn BroadcastHook>>,
}

impl HookRegistry {
    /// An empty registry. See [`HookRegistry::with_default_hooks`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_hooks() -> Self {
        Self::new()
            .with_hook(Arc::new(AddMentionsHook))
            .with_hook(Arc::new(AddFollowersHook))
    }

    /// Registers a hook, replacing any hook with the same id.
    pub fn with_hook(mut self, hook: Arc<dyn BroadcastHook>) -> Self {
        self.hooks.retain(|existing| existing.id() != hook.id());
        self.hooks.push(hook);
        self
    }

    pub fn get(&self, hook_id: &str) -> Option<&Arc<dyn BroadcastHook>> {
        self.hooks.iter().find(|hook| hook.id() == hook_id)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.id()).collect()
    }

    /// Runs the hooks attached to the view's event for one session.
    ///
    /// A failing hook contributes nothing: whatever it wrote is rolled back and
    /// the remaining hooks still run. Returns the number of hooks that applied.
    pub fn apply(&self, view: &mut EventView, session: &Session) -> usize {
        let event = Arc::clone(view.base());
        let mut applied = 0;

        for invocation in event.hooks() {
            match self.run(&event, invocation.hook_id.as_str(), view, session, &invocation.args) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => warn!(
                    "Hook {} failed for connection {} on {} event: {e}",
                    invocation.hook_id,
                    session.id().as_str(),
                    event.event_type()
                ),
            }
        }

        applied
    }

    fn run(
        &self,
        event: &OutboundEvent,
        hook_id: &str,
        view: &mut EventView,
        session: &Session,
        args: &HookArgs,
    ) -> Result<bool, HookError> {
        let hook = self
            .get(hook_id)
            .ok_or_else(|| HookError::UnknownHook(hook_id.to_string()))?;

        if !hook.should_process(event, session, args)? {
            return Ok(false);
        }

        let checkpoint = view.overlay().clone();
        if let Err(e) = hook.process(view, session, args) {
            view.restore_overlay(checkpoint);
            return Err(e);
        }
        Ok(true)
    }
}
