//! Address block: fold the six address columns into display lines.
//!
//! Extraction is pure. The entry is never modified; instead the caller gets
//! the set of column indices the block consumed and filters them out of
//! the generic field loop.

use crate::fields::{AddressPart, FieldPlan};
use crate::pipeline::input::Entry;
use serde::Serialize;
use std::collections::BTreeSet;

/// The locality line produced when city, state and zip are all empty.
const DEGENERATE_LOCALITY: &str = ",  ";

/// Postal address of one entry. Every present field is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressBlock {
    pub street: Option<String>,
    pub line2: Option<String>,
    /// `"{city}, {state} {zip}"`.
    pub locality: Option<String>,
    pub visa_note: Option<String>,
}

impl AddressBlock {
    /// Display lines in fixed order: street, line 2, locality, visa note.
    pub fn lines(&self) -> Vec<&str> {
        [&self.street, &self.line2, &self.locality, &self.visa_note]
            .into_iter()
            .filter_map(|l| l.as_deref())
            .collect()
    }

    /// The only line shown in blind mode; `""` when there is no locality.
    pub fn blind_line(&self) -> &str {
        self.locality.as_deref().unwrap_or("")
    }
}

/// Result of [`extract_address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressExtraction {
    pub block: AddressBlock,
    /// Column indices the generic renderer must skip.
    pub consumed: BTreeSet<usize>,
}

/// Build the address block of `entry`.
///
/// All six address columns are reported as consumed, whether or not they
/// contributed a line.
pub fn extract_address(plan: &FieldPlan, entry: &Entry) -> AddressExtraction {
    let cell = |part: AddressPart| entry.value(plan.address(part));
    let non_empty = |part: AddressPart| {
        let v = cell(part);
        (!v.is_empty()).then(|| v.to_string())
    };

    let locality = format!(
        "{}, {} {}",
        cell(AddressPart::City),
        cell(AddressPart::State),
        cell(AddressPart::Zip)
    );

    let block = AddressBlock {
        street: non_empty(AddressPart::Street),
        line2: non_empty(AddressPart::Line2),
        locality: (locality != DEGENERATE_LOCALITY).then_some(locality),
        visa_note: non_empty(AddressPart::VisaNote),
    };

    AddressExtraction {
        block,
        consumed: plan.address_columns().into_iter().collect(),
    }
}
