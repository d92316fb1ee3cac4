use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::schema::{csv_reader, parse_real, parse_year, scan_rows};
use super::{open_input, ParseOptions, RowIssue};
use crate::error::SimError;
use crate::models::{ParameterRecord, ScenarioTable};

/// Header names of a region-labelled scenario file.
///
/// `growth_rate0` and `alpha` are global fit results: they are read from the
/// first data row and applied to every region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalSchema {
    pub region: String,
    pub year: String,
    pub forcing: String,
    pub carrying_capacity: String,
    pub initial_state: String,
    pub growth_rate0: String,
    pub alpha: String,
}

impl Default for RegionalSchema {
    fn default() -> Self {
        Self {
            region: "Region".to_string(),
            year: "Year".to_string(),
            forcing: "NO2".to_string(),
            carrying_capacity: "K_estimated".to_string(),
            initial_state: "B0_estimated".to_string(),
            growth_rate0: "r0_global".to_string(),
            alpha: "alpha_global".to_string(),
        }
    }
}

impl RegionalSchema {
    fn names(&self) -> [&str; 7] {
        [
            &self.region,
            &self.year,
            &self.forcing,
            &self.carrying_capacity,
            &self.initial_state,
            &self.growth_rate0,
            &self.alpha,
        ]
    }
}

/// All rows of one region, as a year-sorted table.
#[derive(Debug, Clone)]
pub struct RegionGroup {
    pub region: String,
    pub table: ScenarioTable,
}

/// A region-labelled scenario file, grouped by region.
#[derive(Debug, Clone)]
pub struct RegionalTable {
    pub name: String,
    /// Global baseline growth rate shared by all regions
    pub growth_rate0: f64,
    /// Global forcing sensitivity shared by all regions
    pub alpha: f64,
    /// Regions in order of first appearance
    pub groups: Vec<RegionGroup>,
}

impl RegionalTable {
    pub fn num_regions(&self) -> usize {
        self.groups.len()
    }

    pub fn num_rows(&self) -> usize {
        self.groups.iter().map(|g| g.table.len()).sum()
    }

    pub fn region(&self, label: &str) -> Option<&ScenarioTable> {
        self.groups.iter().find(|g| g.region == label).map(|g| &g.table)
    }
}

struct RegionalRow {
    region: String,
    record: ParameterRecord,
    alpha: f64,
}

/// Parse a region-labelled file from any reader, returning the skipped rows as well.
pub fn parse_regional_with_issues<R: Read>(
    reader: R,
    name: &str,
    schema: &RegionalSchema,
    options: &ParseOptions,
) -> Result<(RegionalTable, Vec<RowIssue>), SimError> {
    let mut rdr = csv_reader(reader);
    let names = schema.names();
    let mode = options.numeric;

    let (rows, issues) = scan_rows(&mut rdr, name, &names, options, |record, pos, line| {
        Ok(RegionalRow {
            region: record[pos[0]].to_string(),
            record: ParameterRecord {
                year: parse_year(&record[pos[1]], mode, names[1], line)?,
                forcing: parse_real(&record[pos[2]], mode, names[2], line)?,
                carrying_capacity: parse_real(&record[pos[3]], mode, names[3], line)?,
                initial_state: parse_real(&record[pos[4]], mode, names[4], line)?,
                growth_rate0: parse_real(&record[pos[5]], mode, names[5], line)?,
            },
            alpha: parse_real(&record[pos[6]], mode, names[6], line)?,
        })
    })?;

    let (growth_rate0, alpha) = rows
        .first()
        .map(|r| (r.record.growth_rate0, r.alpha))
        .unwrap_or((0.0, 0.0));

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<(String, Vec<ParameterRecord>)> = Vec::new();
    let mut previous: Option<usize> = None;

    for mut row in rows {
        if row.record.growth_rate0 != growth_rate0 || row.alpha != alpha {
            tracing::warn!(
                source = name,
                region = %row.region,
                year = row.record.year,
                "global r0/alpha differ from the first row; using the first row's values"
            );
        }
        row.record.growth_rate0 = growth_rate0;

        let slot = match index.get(&row.region) {
            Some(&slot) => {
                if previous != Some(slot) {
                    tracing::debug!(source = name, region = %row.region, "region rows are not contiguous");
                }
                slot
            }
            None => {
                index.insert(row.region.clone(), grouped.len());
                grouped.push((row.region.clone(), Vec::new()));
                grouped.len() - 1
            }
        };
        grouped[slot].1.push(row.record);
        previous = Some(slot);
    }

    let groups = grouped
        .into_iter()
        .map(|(region, records)| RegionGroup {
            table: ScenarioTable::new(format!("{name}:{region}"), records),
            region,
        })
        .collect();

    Ok((
        RegionalTable {
            name: name.to_string(),
            growth_rate0,
            alpha,
            groups,
        },
        issues,
    ))
}

/// Read a region-labelled scenario file.
pub fn read_regional(
    path: impl AsRef<Path>,
    schema: &RegionalSchema,
    options: &ParseOptions,
) -> Result<RegionalTable, SimError> {
    let path = path.as_ref();
    let file = open_input(path)?;
    parse_regional_with_issues(file, &path.display().to_string(), schema, options)
        .map(|(table, _)| table)
}
