// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in module templates.

use crate::catalog::ModuleTemplate;
use crate::schema::ParameterField;

fn builtin(id: &str, name: &str, category: &str, description: &str) -> ModuleTemplate {
    ModuleTemplate {
        is_built_in: true,
        ..ModuleTemplate::custom(id, name, category, description)
    }
}

/// Templates that ship with the editor
pub fn builtin_templates() -> Vec<ModuleTemplate> {
    vec![
        builtin(
            "program_entry",
            "Program Entry",
            "Core",
            "Instruction dispatcher that routes calls into the program",
        )
        .with_parameter(ParameterField::text("programName", "Program Name")),
        builtin(
            "pda_account",
            "PDA Account",
            "Core",
            "Program derived address with seeds and bump",
        )
        .with_parameter(ParameterField::text("seeds", "Seeds").with_placeholder("b\"vault\", user"))
        .with_parameter(ParameterField::number("space", "Space (bytes)").with_default(8i64)),
        builtin(
            "spl_token",
            "SPL Token",
            "Token",
            "Create and mint a fungible SPL token",
        )
        .with_parameter(ParameterField::text("tokenName", "Token Name"))
        .with_parameter(ParameterField::text("tokenSymbol", "Token Symbol"))
        .with_parameter(
            ParameterField::choice("decimals", "Decimals", &["6", "8", "9"]).with_default(9i64),
        ),
        builtin(
            "token_transfer",
            "Token Transfer",
            "Token",
            "Move tokens between two token accounts",
        )
        .with_parameter(ParameterField::number("amount", "Amount")),
        builtin(
            "nft_collection",
            "NFT Collection",
            "NFT",
            "Metaplex collection with verified items and royalties",
        )
        .with_parameter(ParameterField::text("collectionName", "Collection Name"))
        .with_parameter(
            ParameterField::number("royalty", "Royalty (%)")
                .with_range(0.0, 100.0)
                .with_default(5i64),
        ),
        builtin(
            "liquidity_pool",
            "Liquidity Pool",
            "DeFi",
            "Constant product pool with a swap fee",
        )
        .with_parameter(
            ParameterField::choice("poolType", "Pool Type", &["liquidity", "staking", "lending"])
                .with_default("liquidity"),
        )
        .with_parameter(ParameterField::number("feeRate", "Fee Rate (%)").with_default(0.3)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let templates = builtin_templates();
        let ids: HashSet<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), templates.len());
        assert!(templates.iter().all(|t| t.is_built_in));
    }
}
