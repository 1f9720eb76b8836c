//! Tab-separated representation of collapse maps.

use crate::collapse::CollapseMap;
use crate::error::{Error, Result};
use std::io::{self, Write};

/// Header row of a collapse map table.
pub const COLLAPSE_MAP_HEADER: &str = "Group\tSublineages";

impl CollapseMap {
    /// Returns the map as table: a header row, then one row per non-empty
    /// group in map order.
    ///
    /// # Example
    /// ```
    /// use sublineage::collapse::CollapseMap;
    ///
    /// let mut map = CollapseMap::new();
    /// map.insert_group("Omicron", ["BA.1", "BA.1.1"]);
    /// map.insert_group("Unknown", Vec::<&str>::new());
    ///
    /// assert_eq!(map.to_tsv(), "Group\tSublineages\nOmicron\tBA.1,BA.1.1\n");
    /// ```
    pub fn to_tsv(&self) -> String {
        let mut tsv = String::with_capacity(COLLAPSE_MAP_HEADER.len() + 1);
        tsv.push_str(COLLAPSE_MAP_HEADER);
        tsv.push('\n');
        for group in self.iter().filter(|group| !group.is_empty()) {
            tsv.push_str(group.label());
            tsv.push('\t');
            tsv.push_str(&group.members().join(","));
            tsv.push('\n');
        }
        tsv
    }

    /// Writes the table representation (see [CollapseMap::to_tsv]) to `writer`.
    ///
    /// # Errors
    /// Returns an I/O error if writing fails.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_tsv().as_bytes())?;
        writer.flush()
    }

    /// Reads a map from its table representation; the first line is the header.
    ///
    /// # Returns
    /// * The map with groups in row order
    /// * [Error::MalformedCollapseMap] for a non-blank row without tab
    pub fn from_tsv(text: &str) -> Result<Self> {
        let mut map = CollapseMap::new();

        for (line_number, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let (label, members) = line.split_once('\t').ok_or_else(|| Error::MalformedCollapseMap {
                line: line_number + 1,
                content: line.to_string(),
            })?;
            let members = members.trim().split(',').filter(|member| !member.is_empty());
            map.insert_group(label, members);
        }

        Ok(map)
    }
}
