//! Lineage notes: the designation list of current and withdrawn lineages.

use crate::error::Result;
use std::io::Read;

/// Marker starting a withdrawn record.
const WITHDRAWN_MARKER: char = '*';

/// A withdrawn lineage with the free-text note explaining its withdrawal.
///
/// The note often names the lineage it was merged into or reclassified as,
/// e.g. `"Withdrawn: reclassified as B.1.1.1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawnLineage {
    /// Lineage name, without the withdrawn marker
    pub name: String,
    /// Free-text description; empty if the record has none
    pub note: String,
}

impl WithdrawnLineage {
    pub fn new(name: &str, note: &str) -> Self {
        WithdrawnLineage {
            name: name.to_string(),
            note: note.to_string(),
        }
    }
}

// =#========================================================================#=
// LINEAGE NOTES
// =#========================================================================€=
/// Parsed lineage notes.
///
/// The text starts with a header line. Each following line is one record:
/// * Current lineage: `name<TAB>description` or `name Alias of ...`;
///   only the name is kept
/// * Withdrawn lineage: `*name<TAB>note` or `*name Withdrawn...`;
///   fields after the note are ignored
///
/// Records keep their order of appearance.
///
/// # Example
/// ```
/// use sublineage::io::LineageNotes;
///
/// let notes = LineageNotes::parse(
///     "Lineage\tDescription\n\
///      B\tRoot lineage\n\
///      BA.1 Alias of B.1.1.529.1\n\
///      *C.15\tReclassified as B.1.1.1 descendant\n",
/// );
/// assert_eq!(notes.lineages(), ["B", "BA.1"]);
/// assert_eq!(notes.withdrawn()[0].name, "C.15");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageNotes {
    lineages: Vec<String>,
    withdrawn: Vec<WithdrawnLineage>,
}

impl LineageNotes {
    /// Parses lineage notes text; the first line is treated as header.
    pub fn parse(text: &str) -> Self {
        let mut notes = LineageNotes::default();

        for line in text.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.strip_prefix(WITHDRAWN_MARKER) {
                Some(record) => {
                    let record = record.replace(" Withdrawn", "\tWithdrawn");
                    let mut fields = record.split('\t');
                    let name = fields.next().unwrap_or_default();
                    let note = fields.next().unwrap_or_default();
                    notes
                        .withdrawn
                        .push(WithdrawnLineage::new(&name.replace(WITHDRAWN_MARKER, ""), note));
                }
                None => {
                    let record = line.replace(" Alias", "\tAlias");
                    if let Some(name) = record.split('\t').next() {
                        notes.lineages.push(name.to_string());
                    }
                }
            }
        }

        notes
    }

    /// Reads and parses lineage notes from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse(&text))
    }

    /// Current lineage names in file order.
    pub fn lineages(&self) -> &[String] {
        &self.lineages
    }

    /// Withdrawn records in file order.
    pub fn withdrawn(&self) -> &[WithdrawnLineage] {
        &self.withdrawn
    }
}
