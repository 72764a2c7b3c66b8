/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Spreadsheet rendering of a compiled timetable.
//!
//! Both formats share one [`SheetLayout`]: a header row (`Day`, then one
//! heading per column in display order) and one row per day.  A lead cell
//! covers its whole span; break columns repeat the break name on every day.
//!
//! * xlsx: a lead spanning several columns is one merged range, filled with
//!   a pastel of the course colour; break columns are shaded grey.
//! * CSV: the lead text sits in its first column and each covered column
//!   holds [`OCCUPIED_MARKER`], so a span never reads as free time.

use anyhow::{anyhow, Context, Result};
use csv::WriterBuilder;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use chronosync_core::grid::{GridCell, LeadCell};
use chronosync_core::timeline::Column;
use chronosync_core::CompiledTimetable;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLSX_DISPOSITION: &str = "attachment; filename=timetable.xlsx";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const CSV_DISPOSITION: &str = "attachment; filename=timetable.csv";

/// CSV text for a column covered by the lead to its left.
pub const OCCUPIED_MARKER: &str = "occupied";

const SHEET_NAME: &str = "Weekly Schedule";
const HEADER_FILL: u32 = 0x343A40;
const BREAK_FILL: u32 = 0xF0F0F0;
/// Lead fill when the course colour is not `#rrggbb`.
const FALLBACK_FILL: u32 = 0xE3F2FD;
const DAY_COLUMN_WIDTH: f64 = 15.0;
const GRID_COLUMN_WIDTH: f64 = 20.0;

// ── Layout ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// First column of a course; `fill` is the pastel RGB.
    Lead { fill: u32 },
    Break,
    Gap,
}

/// One written cell.  Columns are sheet columns: 0 is the day name, the
/// timeline starts at 1.  `first_col == last_col` unless a lead spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCell {
    pub first_col: usize,
    pub last_col: usize,
    pub text: String,
    pub kind: CellKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub day: String,
    pub cells: Vec<SheetCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub header: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl SheetLayout {
    pub fn from_compiled(compiled: &CompiledTimetable) -> Self {
        let columns = compiled.timeline.columns();

        let mut header = Vec::with_capacity(columns.len() + 1);
        header.push(String::from("Day"));
        header.extend(columns.iter().map(heading));

        let rows = compiled
            .days
            .iter()
            .map(|day| {
                let mut cells = Vec::with_capacity(columns.len());
                for (index, column) in columns.iter().enumerate() {
                    let col = index + 1;
                    let cell = match column {
                        Column::Break { name, .. } => SheetCell {
                            first_col: col,
                            last_col: col,
                            text: name.clone(),
                            kind: CellKind::Break,
                        },
                        Column::Slot { .. } => match compiled.grid.cell(*day, column.key()) {
                            Some(GridCell::Lead(lead)) => SheetCell {
                                first_col: col,
                                // Continuations are the columns right after the lead.
                                last_col: col + lead.colspan.max(1) as usize - 1,
                                text: lead_text(lead),
                                kind: CellKind::Lead {
                                    fill: pastel_fill(&lead.color),
                                },
                            },
                            Some(GridCell::Continuation) => continue,
                            Some(GridCell::Gap) | None => SheetCell {
                                first_col: col,
                                last_col: col,
                                text: String::new(),
                                kind: CellKind::Gap,
                            },
                        },
                    };
                    cells.push(cell);
                }
                SheetRow {
                    day: day.to_string(),
                    cells,
                }
            })
            .collect();

        SheetLayout { header, rows }
    }
}

fn heading(column: &Column) -> String {
    match column {
        Column::Slot { number, start, end } => format!("SLOT {number} ({start} - {end})"),
        Column::Break {
            name, start, end, ..
        } => format!("{name} ({start} - {end})"),
    }
}

fn lead_text(lead: &LeadCell) -> String {
    let mut text = format!("{}\n{} - {}", lead.subject, lead.start, lead.end);
    if !lead.info.is_empty() {
        text.push('\n');
        text.push_str(&lead.info);
    }
    text
}

/// Blend `#rrggbb` a quarter of the way from white.
pub fn pastel_fill(color: &str) -> u32 {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return FALLBACK_FILL;
    }
    let Ok(rgb) = u32::from_str_radix(hex, 16) else {
        return FALLBACK_FILL;
    };
    let blend = |shift: u32| ((((rgb >> shift) & 0xFF) + 3 * 0xFF) / 4) << shift;
    blend(16) | blend(8) | blend(0)
}

// ── xlsx ──────────────────────────────────────────────────────────────────────

pub fn render_xlsx(compiled: &CompiledTimetable) -> Result<Vec<u8>> {
    let layout = SheetLayout::from_compiled(compiled);
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), &layout)?;
    workbook
        .save_to_buffer()
        .context("serializing xlsx workbook")
}

fn write_sheet(sheet: &mut Worksheet, layout: &SheetLayout) -> Result<()> {
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let day_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let break_format = Format::new()
        .set_background_color(Color::RGB(BREAK_FILL))
        .set_rotation(90)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let gap_format = Format::new().set_border(FormatBorder::Thin);
    let lead_base = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);

    for (col, text) in layout.header.iter().enumerate() {
        sheet.write_string_with_format(0, sheet_col(col)?, text, &header_format)?;
    }

    for (index, row) in layout.rows.iter().enumerate() {
        let r = u32::try_from(index + 1).context("too many rows for a worksheet")?;
        sheet.write_string_with_format(r, 0, &row.day, &day_format)?;
        for cell in &row.cells {
            let first = sheet_col(cell.first_col)?;
            let last = sheet_col(cell.last_col)?;
            match cell.kind {
                CellKind::Lead { fill } => {
                    let format = lead_base.clone().set_background_color(Color::RGB(fill));
                    if last > first {
                        sheet.merge_range(r, first, r, last, &cell.text, &format)?;
                    } else {
                        sheet.write_string_with_format(r, first, &cell.text, &format)?;
                    }
                }
                CellKind::Break => {
                    sheet.write_string_with_format(r, first, &cell.text, &break_format)?;
                }
                CellKind::Gap => {
                    sheet.write_blank(r, first, &gap_format)?;
                }
            }
        }
    }

    sheet.set_column_width(0, DAY_COLUMN_WIDTH)?;
    for col in 1..layout.header.len() {
        sheet.set_column_width(sheet_col(col)?, GRID_COLUMN_WIDTH)?;
    }
    Ok(())
}

fn sheet_col(col: usize) -> Result<u16> {
    u16::try_from(col).with_context(|| format!("column {col} does not fit a worksheet"))
}

// ── CSV ───────────────────────────────────────────────────────────────────────

pub fn render_csv(compiled: &CompiledTimetable) -> Result<Vec<u8>> {
    let layout = SheetLayout::from_compiled(compiled);
    let width = layout.header.len();
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    wtr.write_record(&layout.header)
        .context("writing CSV header")?;

    for row in &layout.rows {
        let mut record = vec![String::new(); width];
        record[0] = row.day.clone();
        for cell in &row.cells {
            record[cell.first_col] = cell.text.clone();
            for covered in &mut record[cell.first_col + 1..=cell.last_col] {
                *covered = OCCUPIED_MARKER.to_owned();
            }
        }
        wtr.write_record(&record)
            .with_context(|| format!("writing CSV row for {}", row.day))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow!("flushing CSV output: {}", e.error()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
