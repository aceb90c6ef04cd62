//! Transaction classification
//!
//! `classify` maps a resolved transaction to exactly one [`Category`]. It is
//! pure and total: any shape it does not recognise yields `Category::Unknown`.
//!
//! Precedence:
//! 1. program-level rules (DEX, NFT, bridge, lending...) over outer then inner instructions
//! 2. instruction-level rules (token programs, loaders) over outer then inner instructions
//! 3. native balance delta of the primary account (`receive` / `send`)
//! 4. `unknown`

pub mod categories;
pub mod program_table;

pub use categories::{parse_filter, Category, CategoryFilter};
pub use program_table::{ProgramEntry, ProgramRule, ProgramTable};

use crate::transactions::TransactionDetail;

pub fn classify(detail: &TransactionDetail, table: &ProgramTable) -> Category {
    if let Some(category) = detail
        .all_instructions()
        .find_map(|ix| table.program_category(&ix.program_id))
    {
        return category;
    }

    if let Some(category) = detail
        .all_instructions()
        .find_map(|ix| table.instruction_category(&ix.program_id, ix.parsed_type.as_deref()))
    {
        return category;
    }

    match detail.native_delta() {
        Some(delta) if delta > 0 => Category::Receive,
        Some(delta) if delta < 0 => Category::Send,
        _ => Category::Unknown,
    }
}
