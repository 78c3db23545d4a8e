#![allow(dead_code)]

use chatty::{
    Chat, ChatEvent, EventExecutor, PlayerId, PrefixProvider, Sender,
    config::ChattyConfig,
    testing::{RecordingAudience, StaticPermissions},
};
use std::{collections::HashSet, sync::Arc};

// ============================================================================
// Players
// ============================================================================

pub const STEVE: PlayerId = PlayerId(1);
pub const ALEX: PlayerId = PlayerId(2);
pub const HEROBRINE: PlayerId = PlayerId(3);

pub fn sender(id: PlayerId) -> Arc<Sender> {
    let name = match id {
        STEVE => "Steve",
        ALEX => "Alex",
        _ => "Herobrine",
    };
    Arc::new(Sender::new(id, name))
}

/// A fresh event from `id`, addressed to Steve and Alex.
pub fn event(id: PlayerId, message: &str) -> ChatEvent {
    ChatEvent::new(sender(id), message, HashSet::from([STEVE, ALEX]))
}

// ============================================================================
// Prefixes
// ============================================================================

/// Gives Steve a red `[Admin] ` prefix and nobody a suffix.
pub struct AdminPrefix;

impl PrefixProvider for AdminPrefix {
    fn prefix(&self, sender: &Sender) -> Option<String> {
        (sender.id == STEVE).then(|| "&c[Admin] ".to_owned())
    }

    fn suffix(&self, _sender: &Sender) -> Option<String> {
        None
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub executor: Arc<EventExecutor>,
    pub audience: RecordingAudience,
    pub permissions: StaticPermissions,
}

impl Harness {
    pub fn from_toml(raw: &str) -> Self {
        Self::from_toml_with(raw, Arc::new(chatty::NullPrefixProvider))
    }

    pub fn from_toml_with(raw: &str, prefixes: Arc<dyn PrefixProvider>) -> Self {
        let config = ChattyConfig::from_toml_str(raw).unwrap();
        let audience = RecordingAudience::with_online([STEVE, ALEX, HEROBRINE]);
        let permissions = StaticPermissions::new();
        let executor = EventExecutor::from_config(
            &config,
            Arc::new(audience.clone()),
            Arc::new(permissions.clone()),
            prefixes,
        )
        .unwrap();

        Self {
            executor: Arc::new(executor),
            audience,
            permissions,
        }
    }

    pub fn grant(&self, player: PlayerId, chat: &str) {
        self.permissions
            .grant(player, Chat::new(chat, "{message}").permission());
    }
}

/// Two chats: `global` behind `!` and a permission, `local` as catch-all.
pub const TWO_CHATS: &str = r#"
[[chats]]
name = "global"
symbol = "!"
permission_required = true
format = "[G] {player}: {message}"

[[chats]]
name = "local"
format = "{player}: {message}"
"#;
