use serde::Serialize;
use serde_json::{Value, json};

/// Authorization level an action is signed under.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

impl PermissionLevel {
    pub fn new(actor: &str, permission: &str) -> Self {
        Self {
            actor: actor.to_string(),
            permission: permission.to_string(),
        }
    }
}

/// A single named operation targeting one contract account.
///
/// Ephemeral wire record: constructed, handed to the submit layer,
/// discarded. The `data` payload is the action's typed input as the node
/// expects it in JSON form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Action {
    pub account: String,
    pub name: String,
    pub authorization: Vec<PermissionLevel>,
    pub data: Value,
}

impl Action {
    /// Action with a single authorization entry, the common case.
    pub fn new(account: &str, name: &str, actor: &str, permission: &str, data: Value) -> Self {
        Self {
            account: account.to_string(),
            name: name.to_string(),
            authorization: vec![PermissionLevel::new(actor, permission)],
            data,
        }
    }

    /// Token `transfer` action. Most contract entry points in this system
    /// are memo-routed transfers to the contract account.
    pub fn transfer(
        token_account: &str,
        from: &str,
        to: &str,
        quantity: &str,
        memo: &str,
        permission: &str,
    ) -> Self {
        Self::new(
            token_account,
            "transfer",
            from,
            permission,
            json!({
                "from": from,
                "to": to,
                "quantity": quantity,
                "memo": memo,
            }),
        )
    }
}

/// Fully resolved transaction submission parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxOptions {
    pub permission: String,
    pub blocks_behind: u16,
    pub expire_seconds: u32,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            permission: "active".to_string(),
            blocks_behind: 3,
            expire_seconds: 60,
        }
    }
}

/// Caller-supplied partial transaction parameters.
///
/// Merged with the defaults by presence: a field left `None` falls back,
/// an explicit value is honored, including zero.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TxOverrides {
    pub permission: Option<String>,
    pub blocks_behind: Option<u16>,
    pub expire_seconds: Option<u32>,
}

impl TxOptions {
    pub fn resolve(overrides: &TxOverrides) -> Self {
        let defaults = Self::default();
        Self {
            permission: overrides
                .permission
                .clone()
                .unwrap_or(defaults.permission),
            blocks_behind: overrides.blocks_behind.unwrap_or(defaults.blocks_behind),
            expire_seconds: overrides.expire_seconds.unwrap_or(defaults.expire_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let options = TxOptions::resolve(&TxOverrides::default());
        assert_eq!(options.permission, "active");
        assert_eq!(options.blocks_behind, 3);
        assert_eq!(options.expire_seconds, 60);
    }

    #[test]
    fn test_resolve_partial_overrides() {
        let options = TxOptions::resolve(&TxOverrides {
            permission: Some("owner".to_string()),
            blocks_behind: None,
            expire_seconds: Some(120),
        });
        assert_eq!(options.permission, "owner");
        assert_eq!(options.blocks_behind, 3);
        assert_eq!(options.expire_seconds, 120);
    }

    #[test]
    fn test_resolve_explicit_zero_is_honored() {
        let options = TxOptions::resolve(&TxOverrides {
            permission: None,
            blocks_behind: Some(0),
            expire_seconds: Some(0),
        });
        assert_eq!(options.blocks_behind, 0);
        assert_eq!(options.expire_seconds, 0);
    }

    #[test]
    fn test_transfer_action_payload() {
        let action = Action::transfer(
            "eosio.token",
            "alice",
            "eosdtcntract",
            "2.0000 EOS",
            "position_id:7",
            "active",
        );
        assert_eq!(action.account, "eosio.token");
        assert_eq!(action.name, "transfer");
        assert_eq!(
            action.authorization,
            vec![PermissionLevel::new("alice", "active")]
        );
        assert_eq!(action.data["quantity"], "2.0000 EOS");
        assert_eq!(action.data["memo"], "position_id:7");
    }
}
