//! Category vocabulary
//!
//! The string form of every category is part of the external contract:
//! filters stored by users and program-table entries in the config file
//! match on these exact tags.

use crate::errors::TrackerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Swap,
    SwapBuy,
    SwapSell,
    Transfer,
    Lending,
    NftMint,
    NftTrade,
    NftTransfer,
    NftLending,
    Bridge,
    Reward,
    Approvals,
    Perpetual,
    Option,
    Wrap,
    NftLiquidation,
    ContractCreation,
    Send,
    Receive,
    Other,
    Unknown,
}

/// Categories a wallet wants to be notified about
pub type CategoryFilter = BTreeSet<Category>;

impl Category {
    pub const ALL: [Category; 21] = [
        Category::Swap,
        Category::SwapBuy,
        Category::SwapSell,
        Category::Transfer,
        Category::Lending,
        Category::NftMint,
        Category::NftTrade,
        Category::NftTransfer,
        Category::NftLending,
        Category::Bridge,
        Category::Reward,
        Category::Approvals,
        Category::Perpetual,
        Category::Option,
        Category::Wrap,
        Category::NftLiquidation,
        Category::ContractCreation,
        Category::Send,
        Category::Receive,
        Category::Other,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Swap => "swap",
            Category::SwapBuy => "swap_buy",
            Category::SwapSell => "swap_sell",
            Category::Transfer => "transfer",
            Category::Lending => "lending",
            Category::NftMint => "nft_mint",
            Category::NftTrade => "nft_trade",
            Category::NftTransfer => "nft_transfer",
            Category::NftLending => "nft_lending",
            Category::Bridge => "bridge",
            Category::Reward => "reward",
            Category::Approvals => "approvals",
            Category::Perpetual => "perpetual",
            Category::Option => "option",
            Category::Wrap => "wrap",
            Category::NftLiquidation => "nft_liquidation",
            Category::ContractCreation => "contract_creation",
            Category::Send => "send",
            Category::Receive => "receive",
            Category::Other => "other",
            Category::Unknown => "unknown",
        }
    }

    /// Menu label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Category::Swap => "Swap",
            Category::SwapBuy => "Swap Buy",
            Category::SwapSell => "Swap Sell",
            Category::Transfer => "Transfer",
            Category::Lending => "Lending",
            Category::NftMint => "NFT Mint",
            Category::NftTrade => "NFT Trade",
            Category::NftTransfer => "NFT Transfer",
            Category::NftLending => "NFT Lending",
            Category::Bridge => "Bridge",
            Category::Reward => "Reward",
            Category::Approvals => "Approvals",
            Category::Perpetual => "Perpetual",
            Category::Option => "Option",
            Category::Wrap => "Wrap",
            Category::NftLiquidation => "NFT liquidation",
            Category::ContractCreation => "Contract creation",
            Category::Send => "Send",
            Category::Receive => "Receive",
            Category::Other => "Other",
            Category::Unknown => "Unknown",
        }
    }

    /// Categories offered in the selection menu, in menu order
    pub fn selectable() -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| !matches!(c, Category::Send | Category::Receive | Category::Unknown))
            .collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TrackerError::UnknownCategory { tag: s.to_string() })
    }
}

/// Parse user-supplied tags into a filter; empty input is rejected
pub fn parse_filter<S: AsRef<str>>(tags: &[S]) -> Result<CategoryFilter, TrackerError> {
    let filter = tags
        .iter()
        .map(|tag| Category::from_str(tag.as_ref().trim()))
        .collect::<Result<CategoryFilter, _>>()?;

    if filter.is_empty() {
        return Err(TrackerError::EmptyFilter);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_vocabulary_exactly() {
        let tags: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "swap",
                "swap_buy",
                "swap_sell",
                "transfer",
                "lending",
                "nft_mint",
                "nft_trade",
                "nft_transfer",
                "nft_lending",
                "bridge",
                "reward",
                "approvals",
                "perpetual",
                "option",
                "wrap",
                "nft_liquidation",
                "contract_creation",
                "send",
                "receive",
                "other",
                "unknown",
            ]
        );
    }

    #[test]
    fn test_serde_uses_same_tags() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!(Category::from_str("nft_mint").unwrap(), Category::NftMint);
        assert!(Category::from_str("Swap").is_err());
        assert!(Category::from_str("buy").is_err());
    }

    #[test]
    fn test_selectable_menu() {
        let menu = Category::selectable();
        assert_eq!(menu.len(), 18);
        assert_eq!(menu.first(), Some(&Category::Swap));
        assert_eq!(menu.last(), Some(&Category::Other));
        assert!(!menu.contains(&Category::Unknown));
    }

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter(&["swap", " transfer ", "swap"]).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.contains(&Category::Transfer));

        let empty: [&str; 0] = [];
        assert_eq!(parse_filter(&empty), Err(TrackerError::EmptyFilter));
        assert_eq!(
            parse_filter(&["swap", "teleport"]),
            Err(TrackerError::UnknownCategory {
                tag: "teleport".to_string()
            })
        );
    }
}
