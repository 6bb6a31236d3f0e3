//! Column classification.
//!
//! The CSV export names its columns after the form fields of the submission
//! site. Instead of matching substrings against every cell of every row,
//! the header is classified once into a [`FieldPlan`]: each column gets a
//! [`FieldKind`] and the handful of columns the renderer looks up by role
//! (entry id, address parts, contact fields) get their indices cached.

use crate::error::CfpError;
use crate::pipeline::input::Header;
use serde::Serialize;

/// Column holding the submission id, rendered as each entry's heading.
pub const ENTRY_ID: &str = "Entry Id";
/// Heading text used when the header has no [`ENTRY_ID`] column.
pub const MISSING_ENTRY_ID: &str = "No Entry ID";
/// Substring identifying every speaker/author related column.
pub const SPEAKER_MARKER: &str = "Speaker(s)/ Author(s)";
/// Substring identifying the repeated `first|last|org|email` speaker slots.
pub const SPEAKER_SLOT_MARKER: &str = "Speaker(s)/ Author(s) Info";
pub const PRIMARY_EMAIL: &str = "Primary/Preferred Email to contact (Enter Email)";
pub const PHONE: &str = "Phone";
pub const JOB_TITLE: &str = "Job Title";
/// Substring identifying the extended-abstract link column.
pub const ABSTRACT_MARKER: &str = "Extended Abstract";

/// One of the six columns that make up the postal address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressPart {
    Street,
    Line2,
    City,
    State,
    Zip,
    VisaNote,
}

impl AddressPart {
    /// All parts, in display order.
    pub const ALL: [AddressPart; 6] = [
        AddressPart::Street,
        AddressPart::Line2,
        AddressPart::City,
        AddressPart::State,
        AddressPart::Zip,
        AddressPart::VisaNote,
    ];

    /// Exact column name of this part in the export.
    pub fn column(self) -> &'static str {
        match self {
            AddressPart::Street => "Address (Street Address)",
            AddressPart::Line2 => "Address (Address Line 2)",
            AddressPart::City => "Address (City)",
            AddressPart::State => "Address (State / Province)",
            AddressPart::Zip => "Address (ZIP / Postal Code)",
            AddressPart::VisaNote => "Address (Note: We are unable to sponsor or provide visas.)",
        }
    }

    fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.column() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// How the renderer treats a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Rendered as the entry heading, never as a field.
    EntryId,
    /// Consumed by the address block.
    Address(AddressPart),
    /// A `first|last|org|email` speaker slot.
    SpeakerSlot,
    /// Any other speaker/author column; triggers the speaker block.
    SpeakerRelated,
    /// Rendered inside the speaker block only.
    PrimaryEmail,
    /// Rendered inside the speaker block only.
    Phone,
    /// Rendered with the address block appended.
    JobTitle,
    /// Rendered as a hyperlink.
    AbstractLink,
    /// Rendered as `label: value`.
    Generic,
}

impl FieldKind {
    /// Classify a column name. Exact names win over substring markers.
    pub fn classify(column: &str) -> Self {
        if column == ENTRY_ID {
            return FieldKind::EntryId;
        }
        if let Some(part) = AddressPart::from_column(column) {
            return FieldKind::Address(part);
        }
        if column.contains(SPEAKER_SLOT_MARKER) {
            return FieldKind::SpeakerSlot;
        }
        if column.contains(SPEAKER_MARKER) {
            return FieldKind::SpeakerRelated;
        }
        match column {
            PRIMARY_EMAIL => FieldKind::PrimaryEmail,
            PHONE => FieldKind::Phone,
            JOB_TITLE => FieldKind::JobTitle,
            _ if column.contains(ABSTRACT_MARKER) => FieldKind::AbstractLink,
            _ => FieldKind::Generic,
        }
    }

    /// Whether a non-empty cell of this kind brings in the speaker block.
    pub fn is_speaker(self) -> bool {
        matches!(self, FieldKind::SpeakerSlot | FieldKind::SpeakerRelated)
    }
}

/// A header column with its position and classification.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub index: usize,
    pub name: String,
    pub kind: FieldKind,
}

/// Classification of a whole header, computed once per file.
#[derive(Debug, Clone, Serialize)]
pub struct FieldPlan {
    columns: Vec<Column>,
    entry_id: Option<usize>,
    address: [usize; 6],
    speaker_slots: Vec<usize>,
    primary_email: Option<usize>,
    phone: Option<usize>,
    job_title: Option<usize>,
}

impl FieldPlan {
    /// Classify `header`.
    ///
    /// # Errors
    /// [`CfpError::MissingColumn`] when any of the six address columns is
    /// absent; every entry's address block depends on all of them.
    pub fn new(header: &Header) -> Result<Self, CfpError> {
        let columns: Vec<Column> = header
            .columns()
            .iter()
            .enumerate()
            .map(|(index, name)| Column {
                index,
                name: name.clone(),
                kind: FieldKind::classify(name),
            })
            .collect();

        let first = |kind: FieldKind| columns.iter().find(|c| c.kind == kind).map(|c| c.index);

        let mut address = [0usize; 6];
        for part in AddressPart::ALL {
            address[part.slot()] =
                first(FieldKind::Address(part)).ok_or_else(|| CfpError::MissingColumn {
                    column: part.column().to_string(),
                })?;
        }

        let entry_id = first(FieldKind::EntryId);
        let primary_email = first(FieldKind::PrimaryEmail);
        let phone = first(FieldKind::Phone);
        let job_title = first(FieldKind::JobTitle);
        let speaker_slots = columns
            .iter()
            .filter(|c| c.kind == FieldKind::SpeakerSlot)
            .map(|c| c.index)
            .collect();

        Ok(Self {
            columns,
            entry_id,
            address,
            speaker_slots,
            primary_email,
            phone,
            job_title,
        })
    }

    /// Every column in header order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn entry_id(&self) -> Option<usize> {
        self.entry_id
    }

    /// Index of an address column. Always present once the plan is built.
    pub fn address(&self, part: AddressPart) -> usize {
        self.address[part.slot()]
    }

    /// Indices of every address column, in [`AddressPart::ALL`] order.
    pub fn address_columns(&self) -> [usize; 6] {
        self.address
    }

    /// Speaker slot columns in header order.
    pub fn speaker_slots(&self) -> &[usize] {
        &self.speaker_slots
    }

    pub fn primary_email(&self) -> Option<usize> {
        self.primary_email
    }

    pub fn phone(&self) -> Option<usize> {
        self.phone
    }

    pub fn job_title(&self) -> Option<usize> {
        self.job_title
    }

    /// Name of the column at `index`.
    pub fn name(&self, index: usize) -> &str {
        self.columns
            .get(index)
            .map(|c| c.name.as_str())
            .unwrap_or_default()
    }
}
