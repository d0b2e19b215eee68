use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{Cell, ExportError, ExportTable, SHEET_NAME};

/// Writes the table to an xlsx workbook with a single sheet and a bold
/// header row.
pub fn write_xlsx(table: &ExportTable, path: &Path) -> Result<(), ExportError> {
    build_workbook(table)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|source| ExportError::Xlsx {
            path: path.display().to_string(),
            source,
        })
}

fn build_workbook(table: &ExportTable) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (c, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, *header, &header_format)?;
        worksheet.set_column_width(c as u16, 16.0)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Blank => {}
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
            }
        }
    }

    Ok(workbook)
}
