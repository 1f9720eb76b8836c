//! Group definitions: which seed lineages collapse into which group.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Ordered mapping from group label to its seed lineages.
///
/// Groups keep the order in which they were first defined; defining a label
/// again replaces its seeds but keeps its position. The order determines the
/// order of the collapse map built from these definitions.
///
/// # Text format
/// One group per line, label and comma-separated seeds separated by a tab:
/// ```text
/// Group	Lineages
/// Omicron	BA.1,BA.3
/// Omicron (BA.2)	BA.2
/// Delta	B.1.617.2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDefinitions {
    groups: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl GroupDefinitions {
    /// Creates empty group definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or redefines) a group, builder style.
    ///
    /// # Example
    /// ```
    /// use sublineage::io::GroupDefinitions;
    ///
    /// let definitions = GroupDefinitions::new()
    ///     .with_group("Omicron", ["BA.1", "BA.3"])
    ///     .with_group("Delta", ["B.1.617.2"]);
    /// assert_eq!(definitions.labels(), vec!["Omicron", "Delta"]);
    /// ```
    pub fn with_group<I, S>(mut self, label: &str, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(label, seeds);
        self
    }

    /// Adds (or redefines) a group.
    pub fn insert<I, S>(&mut self, label: &str, seeds: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds: Vec<String> = seeds.into_iter().map(|s| s.as_ref().to_string()).collect();
        match self.positions.get(label) {
            Some(&position) => self.groups[position].1 = seeds,
            None => {
                self.positions.insert(label.to_string(), self.groups.len());
                self.groups.push((label.to_string(), seeds));
            }
        }
    }

    /// Parses group definitions; the first line is treated as header.
    ///
    /// # Returns
    /// * The definitions in file order
    /// * [Error::MalformedGroupDefinition] for a non-blank line without tab
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_lines(text, 1)
    }

    /// Parses group definitions without header line.
    pub fn parse_headerless(text: &str) -> Result<Self> {
        Self::parse_lines(text, 0)
    }

    fn parse_lines(text: &str, skip: usize) -> Result<Self> {
        let mut definitions = GroupDefinitions::new();

        for (line_number, line) in text.lines().enumerate().skip(skip) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (label, seeds) = line.split_once('\t').ok_or_else(|| Error::MalformedGroupDefinition {
                line: line_number + 1,
                content: line.to_string(),
            })?;
            let seeds = seeds.split(',').map(str::trim).filter(|seed| !seed.is_empty());
            definitions.insert(label.trim(), seeds);
        }

        Ok(definitions)
    }

    /// Returns the seeds of `label`, or `None` if the group is not defined.
    pub fn seeds(&self, label: &str) -> Option<&[String]> {
        self.positions
            .get(label)
            .map(|&position| self.groups[position].1.as_slice())
    }

    /// Returns the group labels in definition order.
    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Iterates over `(label, seeds)` in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(label, seeds)| (label.as_str(), seeds.as_slice()))
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no group is defined.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
