use super::normalizer::normalize_cell;
use calamine::{Reader, Xlsx, XlsxError};
use std::io::{Read, Seek};

/// A table with normalised cells. Rows keep their own width.
#[derive(Debug)]
pub(crate) struct RawTable {
    pub(crate) header: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let header = csv_reader
        .headers()?
        .iter()
        .map(normalize_cell)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable { header, rows })
}

/// Reads the first worksheet of an `.xlsx` workbook into the same shape as
/// [`parse_table`]. A workbook without sheets yields an empty table.
pub(crate) fn parse_workbook<R: Read + Seek>(reader: R) -> Result<RawTable, XlsxError> {
    let mut workbook: Xlsx<R> = Xlsx::new(reader)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Ok(RawTable {
                header: Vec::new(),
                rows: Vec::new(),
            })
        }
    };

    // The used range starts at the first filled cell; keep column positions.
    let leading = range.start().map_or(0, |(_, column)| column as usize);
    let mut records = range.rows().map(|cells| {
        std::iter::repeat(String::new())
            .take(leading)
            .chain(cells.iter().map(|cell| normalize_cell(&cell.to_string())))
            .collect::<Vec<String>>()
    });

    let header = records.next().unwrap_or_default();
    let rows = records
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(RawTable { header, rows })
}
