// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection compatibility rules.
//!
//! The table is directional: a rule `data -> instruction` says nothing about
//! `instruction -> data`. `nft` has no outgoing rule at all.

use crate::connection::ConnectionType;
use crate::node::NodeKind;

/// One row of the compatibility table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityRule {
    /// Source type
    pub from: ConnectionType,
    /// Types the source may feed
    pub to: &'static [ConnectionType],
    /// Human-readable explanation
    pub description: &'static str,
}

/// The fixed compatibility table
pub const COMPATIBILITY_RULES: &[CompatibilityRule] = &[
    CompatibilityRule {
        from: ConnectionType::Data,
        to: &[ConnectionType::Instruction, ConnectionType::Account],
        description: "Data can feed into instructions and account operations",
    },
    CompatibilityRule {
        from: ConnectionType::Instruction,
        to: &[ConnectionType::Data, ConnectionType::Token, ConnectionType::Nft],
        description: "Instructions can output data, tokens, or NFTs",
    },
    CompatibilityRule {
        from: ConnectionType::Token,
        to: &[ConnectionType::Instruction, ConnectionType::Account],
        description: "Tokens can be used in instructions or account operations",
    },
    CompatibilityRule {
        from: ConnectionType::Account,
        to: &[ConnectionType::Instruction, ConnectionType::Data],
        description: "Accounts provide data and enable instructions",
    },
    CompatibilityRule {
        from: ConnectionType::Flow,
        to: &[ConnectionType::Instruction, ConnectionType::Data, ConnectionType::Account],
        description: "Control flow can trigger any operation type",
    },
];

/// Look up the rule for a source type
pub fn rule_for(from: ConnectionType) -> Option<&'static CompatibilityRule> {
    COMPATIBILITY_RULES.iter().find(|rule| rule.from == from)
}

/// Check whether `from` may be linked to `to`, in that direction only
pub fn is_compatible(from: ConnectionType, to: ConnectionType) -> bool {
    rule_for(from).is_some_and(|rule| rule.to.contains(&to))
}

/// Check whether a link of `connection_type` from a `source` node to a
/// `target` node is allowed.
///
/// The link is accepted when the source kind may emit the declared type, or
/// when the declared type may feed the target kind. A custom kind has no type
/// of its own and speaks the declared type, so its side passes whenever that
/// type has an outgoing rule. `nft` has none and stays terminal.
pub fn accepts_link(source: &NodeKind, connection_type: ConnectionType, target: &NodeKind) -> bool {
    let declared_has_rule = rule_for(connection_type).is_some();
    let emitted = source
        .connection_type()
        .map_or(declared_has_rule, |from| is_compatible(from, connection_type));
    let accepted = target
        .connection_type()
        .map_or(declared_has_rule, |to| is_compatible(connection_type, to));
    emitted || accepted
}
