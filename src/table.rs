//! Thin tabular glue: delimited input tables in, result tables out
use crate::parameters::ShuffleParameters;
use crate::shuffler::{InputRecord, ShuffleOutput};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A small in-memory table: header row plus string cells
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Table {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn read<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .context("Error reading the input table headers")?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.context("Error reading an input table row")?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { headers, rows })
    }

    pub fn read_file(path: &Path) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Unable to open input table {}", path.display()))?;
        Table::read(file, delimiter_for(path))
    }

    /// Index of a named column; a missing column is a batch-level error
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("Missing required column {:?} in the input table", name))
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn write<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Unable to create output table {}", path.display()))?;
        self.write(file, delimiter_for(path))
    }
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => b',',
        _ => b'\t',
    }
}

/// Pull the caller-named V/CDR3/J columns out of the table, preserving the
/// original row index of each record.
pub fn records_from_table(table: &Table, params: &ShuffleParameters) -> Result<Vec<InputRecord>> {
    let v_col = table.column(&params.v_col)?;
    let cdr3_col = table.column(&params.cdr3_col)?;
    let j_col = table.column(&params.j_col)?;
    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| InputRecord {
            row,
            v_name: cells.get(v_col).cloned().unwrap_or_default(),
            cdr3: cells.get(cdr3_col).cloned().unwrap_or_default(),
            j_name: cells.get(j_col).cloned().unwrap_or_default(),
        })
        .collect())
}

/// Render a shuffle result back into a table. The shape depends on the
/// output mode.
pub fn output_table(output: &ShuffleOutput, params: &ShuffleParameters) -> Result<Table> {
    match output {
        ShuffleOutput::Shuffled(records) => {
            let mut table = Table::new(vec![
                params.v_col.clone(),
                params.cdr3_col.clone(),
                params.j_col.clone(),
                "left_row".to_string(),
                "right_row".to_string(),
                "length".to_string(),
                "components".to_string(),
            ]);
            for r in records {
                let components =
                    serde_json::to_string(&(&r.left_fragment, &r.right_fragment))?;
                table.push_row(vec![
                    r.v_name.clone(),
                    r.cdr3.clone(),
                    r.j_name.clone(),
                    r.left_row.to_string(),
                    r.right_row.to_string(),
                    r.length.to_string(),
                    components,
                ]);
            }
            Ok(table)
        }
        ShuffleOutput::Preshuffled(records) => {
            let mut table = Table::new(
                [
                    "row",
                    "v",
                    "j",
                    "germline_v",
                    "germline_j",
                    "cdr3",
                    "labels",
                    "cut_left",
                    "cut_right",
                    "cut_cdr3",
                    "left_part",
                    "right_part",
                    "d_gene",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            );
            for r in records {
                table.push_row(vec![
                    r.row.to_string(),
                    r.v_name.clone(),
                    r.j_name.clone(),
                    r.germline_v.clone(),
                    r.germline_j.clone(),
                    r.labeled.cdr3.clone(),
                    r.labeled.label_string(),
                    r.cut_left.to_string(),
                    r.cut_right.to_string(),
                    r.annotated(),
                    r.left_fragment().to_string(),
                    r.right_fragment().to_string(),
                    r.d_gene.clone().unwrap_or_default(),
                ]);
            }
            Ok(table)
        }
        ShuffleOutput::Errors(failures) => {
            let mut table = Table::new(
                ["row", "v", "cdr3", "j", "error", "detail"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            );
            for f in failures {
                table.push_row(vec![
                    f.row.to_string(),
                    f.v_name.clone(),
                    f.cdr3.clone(),
                    f.j_name.clone(),
                    f.error.kind().to_string(),
                    f.error.to_string(),
                ]);
            }
            Ok(table)
        }
    }
}
