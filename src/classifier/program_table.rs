//! Program table: program id -> category rule
//!
//! Classification looks programs up by exact id, never by substring, and the
//! table is data: operators add programs in the config file without touching
//! the classifier.

use super::categories::Category;
use crate::config::ProgramConfig;
use crate::constants::*;
use crate::errors::TrackerError;
use std::collections::HashMap;
use std::str::FromStr;

/// How a program's instructions map to categories
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramRule {
    /// Every instruction of the program means this category (DEX, NFT market, bridge...)
    Program(Category),
    /// Only listed parsed instruction types map to a category (token programs, loaders)
    Instructions(HashMap<String, Category>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramEntry {
    pub program_id: String,
    pub label: String,
    pub rule: ProgramRule,
}

#[derive(Debug, Clone, Default)]
pub struct ProgramTable {
    entries: HashMap<String, ProgramEntry>,
}

impl ProgramTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ProgramEntry) {
        self.entries.insert(entry.program_id.clone(), entry);
    }

    pub fn with_program(mut self, program_id: &str, label: &str, category: Category) -> Self {
        self.insert(ProgramEntry {
            program_id: program_id.to_string(),
            label: label.to_string(),
            rule: ProgramRule::Program(category),
        });
        self
    }

    pub fn with_instructions(
        mut self,
        program_id: &str,
        label: &str,
        instructions: &[(&str, Category)],
    ) -> Self {
        self.insert(ProgramEntry {
            program_id: program_id.to_string(),
            label: label.to_string(),
            rule: ProgramRule::Instructions(
                instructions
                    .iter()
                    .map(|(ix, category)| (ix.to_string(), *category))
                    .collect(),
            ),
        });
        self
    }

    /// Table shipped with the binary
    pub fn builtin() -> Self {
        let token_instructions = [
            ("transfer", Category::Transfer),
            ("transferChecked", Category::Transfer),
            ("approve", Category::Approvals),
            ("approveChecked", Category::Approvals),
            ("revoke", Category::Approvals),
            ("syncNative", Category::Wrap),
            ("initializeMint", Category::ContractCreation),
            ("initializeMint2", Category::ContractCreation),
        ];

        ProgramTable::new()
            // Token programs
            .with_instructions(SPL_TOKEN_PROGRAM_ID, "spl-token", &token_instructions)
            .with_instructions(SPL_TOKEN_2022_PROGRAM_ID, "spl-token-2022", &token_instructions)
            .with_instructions(
                BPF_UPGRADEABLE_LOADER_ID,
                "bpf-upgradeable-loader",
                &[("deployWithMaxDataLen", Category::ContractCreation)],
            )
            // DEX / aggregators
            .with_program(JUPITER_V6_PROGRAM_ID, "jupiter", Category::Swap)
            .with_program(JUPITER_V4_PROGRAM_ID, "jupiter", Category::Swap)
            .with_program(RAYDIUM_AMM_V4_PROGRAM_ID, "raydium", Category::Swap)
            .with_program(RAYDIUM_CPMM_PROGRAM_ID, "raydium", Category::Swap)
            .with_program(RAYDIUM_CLMM_PROGRAM_ID, "raydium", Category::Swap)
            .with_program(ORCA_WHIRLPOOL_PROGRAM_ID, "orca", Category::Swap)
            .with_program(METEORA_DLMM_PROGRAM_ID, "meteora", Category::Swap)
            .with_program(PUMP_FUN_PROGRAM_ID, "pumpfun", Category::Swap)
            .with_program(PUMP_SWAP_AMM_PROGRAM_ID, "pumpswap", Category::Swap)
            // NFT
            .with_program(METAPLEX_CANDY_MACHINE_V3_ID, "candy-machine", Category::NftMint)
            .with_program(METAPLEX_BUBBLEGUM_ID, "bubblegum", Category::NftMint)
            .with_program(MAGIC_EDEN_V2_PROGRAM_ID, "magic-eden", Category::NftTrade)
            .with_program(TENSOR_SWAP_PROGRAM_ID, "tensor", Category::NftTrade)
            .with_program(SHARKY_PROGRAM_ID, "sharky", Category::NftLending)
            // Bridges / DeFi
            .with_program(WORMHOLE_TOKEN_BRIDGE_ID, "wormhole", Category::Bridge)
            .with_program(DEBRIDGE_DLN_SOURCE_ID, "debridge", Category::Bridge)
            .with_program(DRIFT_V2_PROGRAM_ID, "drift", Category::Perpetual)
            .with_program(SOLEND_PROGRAM_ID, "solend", Category::Lending)
            .with_program(KAMINO_LEND_PROGRAM_ID, "kamino", Category::Lending)
            .with_program(MARGINFI_V2_PROGRAM_ID, "marginfi", Category::Lending)
    }

    /// Build from config entries; an empty list yields the built-in table
    pub fn from_config(programs: &[ProgramConfig]) -> Result<Self, TrackerError> {
        if programs.is_empty() {
            return Ok(Self::builtin());
        }

        let mut table = ProgramTable::new();
        for program in programs {
            if program.program_id.is_empty() {
                return Err(TrackerError::Configuration(
                    "programs[].program_id must not be empty".to_string(),
                ));
            }

            let rule = match (program.category.is_empty(), program.instructions.is_empty()) {
                (false, true) => ProgramRule::Program(Category::from_str(&program.category)?),
                (true, false) => ProgramRule::Instructions(
                    program
                        .instructions
                        .iter()
                        .map(|(ix, tag)| Category::from_str(tag).map(|category| (ix.clone(), category)))
                        .collect::<Result<HashMap<_, _>, TrackerError>>()?,
                ),
                _ => {
                    return Err(TrackerError::Configuration(format!(
                        "program {} needs exactly one of `category` or `instructions`",
                        program.program_id
                    )))
                }
            };

            table.insert(ProgramEntry {
                program_id: program.program_id.clone(),
                label: program.label.clone(),
                rule,
            });
        }
        Ok(table)
    }

    pub fn get(&self, program_id: &str) -> Option<&ProgramEntry> {
        self.entries.get(program_id)
    }

    /// Category for a program-level rule
    pub fn program_category(&self, program_id: &str) -> Option<Category> {
        match self.get(program_id)?.rule {
            ProgramRule::Program(category) => Some(category),
            ProgramRule::Instructions(_) => None,
        }
    }

    /// Category for an instruction-level rule and this parsed instruction type
    pub fn instruction_category(&self, program_id: &str, parsed_type: Option<&str>) -> Option<Category> {
        match &self.get(program_id)?.rule {
            ProgramRule::Instructions(map) => map.get(parsed_type?).copied(),
            ProgramRule::Program(_) => None,
        }
    }

    pub fn label(&self, program_id: &str) -> Option<&str> {
        self.get(program_id).map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_builtin_lookups() {
        let table = ProgramTable::builtin();

        assert_eq!(table.program_category(JUPITER_V6_PROGRAM_ID), Some(Category::Swap));
        assert_eq!(
            table.instruction_category(SPL_TOKEN_PROGRAM_ID, Some("transfer")),
            Some(Category::Transfer)
        );
        assert_eq!(table.instruction_category(SPL_TOKEN_PROGRAM_ID, Some("initializeAccount")), None);
        assert_eq!(table.instruction_category(SPL_TOKEN_PROGRAM_ID, None), None);
        assert_eq!(table.program_category(SPL_TOKEN_PROGRAM_ID), None);
        assert_eq!(table.program_category(SYSTEM_PROGRAM_ID), None);
    }

    #[test]
    fn test_lookup_is_exact_not_substring() {
        let table = ProgramTable::builtin();
        let prefix = &JUPITER_V6_PROGRAM_ID[..20];
        assert_eq!(table.program_category(prefix), None);
        assert_eq!(table.label(JUPITER_V6_PROGRAM_ID), Some("jupiter"));
    }

    #[test]
    fn test_from_config() {
        let mut instructions = BTreeMap::new();
        instructions.insert("claim".to_string(), "reward".to_string());

        let programs = vec![
            ProgramConfig {
                program_id: "Dex111".to_string(),
                label: "my-dex".to_string(),
                category: "swap_buy".to_string(),
                instructions: BTreeMap::new(),
            },
            ProgramConfig {
                program_id: "Drop111".to_string(),
                label: "airdrop".to_string(),
                category: String::new(),
                instructions,
            },
        ];

        let table = ProgramTable::from_config(&programs).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.program_category("Dex111"), Some(Category::SwapBuy));
        assert_eq!(table.instruction_category("Drop111", Some("claim")), Some(Category::Reward));
    }

    #[test]
    fn test_from_config_rejects_ambiguous_entries() {
        let programs = vec![ProgramConfig {
            program_id: "Both111".to_string(),
            label: String::new(),
            category: "swap".to_string(),
            instructions: [("x".to_string(), "swap".to_string())].into_iter().collect(),
        }];
        assert!(matches!(
            ProgramTable::from_config(&programs),
            Err(TrackerError::Configuration(_))
        ));

        let programs = vec![ProgramConfig {
            program_id: "Bad111".to_string(),
            label: String::new(),
            category: "teleport".to_string(),
            instructions: BTreeMap::new(),
        }];
        assert!(matches!(
            ProgramTable::from_config(&programs),
            Err(TrackerError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_empty_config_uses_builtin() {
        let table = ProgramTable::from_config(&[]).unwrap();
        assert_eq!(table.len(), ProgramTable::builtin().len());
    }
}
