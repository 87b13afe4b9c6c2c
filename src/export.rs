//! Tabular export of a result list.

use std::io;
use std::str::FromStr;

use rust_xlsxwriter::Workbook;

use crate::error::EvalError;
use crate::evaluator::EvaluationRecord;

/// Column headers shared by both export formats.
pub const EXPORT_HEADERS: [&str; 3] = ["soubor", "hodnocení (1–5)", "zpětná vazba"];

/// Default download file names, one per format.
pub const CSV_EXPORT_FILE: &str = "eduasistent_vysledky.csv";
pub const XLSX_EXPORT_FILE: &str = "eduasistent_vysledky.xlsx";

/// User-selectable export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Default file name for a download in this format.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_EXPORT_FILE,
            ExportFormat::Xlsx => XLSX_EXPORT_FILE,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(EvalError::InvalidRequest(format!(
                "Unknown export format: {other}"
            ))),
        }
    }
}

/// Serializes the records as UTF-8 comma-separated text with a header row.
pub fn write_csv<W: io::Write>(records: &[EvaluationRecord], writer: W) -> Result<(), EvalError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serde-driven header emission needs at least one record.
        wtr.write_record(EXPORT_HEADERS)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| EvalError::ExportError(e.to_string()))?;
    Ok(())
}

/// CSV export as an in-memory byte buffer.
pub fn csv_bytes(records: &[EvaluationRecord]) -> Result<Vec<u8>, EvalError> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(buf)
}

/// XLSX export as an in-memory byte buffer: one worksheet, same three
/// columns as the CSV format.
pub fn xlsx_bytes(records: &[EvaluationRecord]) -> Result<Vec<u8>, EvalError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (row, record) in records.iter().enumerate() {
        let row = (row + 1) as u32;
        worksheet.write_string(row, 0, record.file.as_str())?;
        worksheet.write_string(row, 1, record.score.to_string())?;
        worksheet.write_string(row, 2, record.feedback.as_str())?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Serializes the records in the selected format.
pub fn export_bytes(
    records: &[EvaluationRecord],
    format: ExportFormat,
) -> Result<Vec<u8>, EvalError> {
    match format {
        ExportFormat::Csv => csv_bytes(records),
        ExportFormat::Xlsx => xlsx_bytes(records),
    }
}

#[cfg(test)]
mod tests {
    use crate::score::Score;

    use super::*;

    fn sample_records() -> Vec<EvaluationRecord> {
        vec![
            EvaluationRecord {
                file: "A.txt".to_string(),
                score: Score::Rated(5),
                feedback: "Hodnocení: 5. Dobrá práce.".to_string(),
            },
            EvaluationRecord {
                file: "B.txt".to_string(),
                score: Score::Unknown,
                feedback: "Bez známky.".to_string(),
            },
            EvaluationRecord {
                file: "C.txt".to_string(),
                score: Score::Error,
                feedback: "Chyba: connection reset".to_string(),
            },
        ]
    }

    #[test]
    fn csv_starts_with_czech_header() {
        let bytes = csv_bytes(&sample_records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("soubor,hodnocení (1–5),zpětná vazba\n"));
    }

    #[test]
    fn csv_of_empty_run_still_has_header() {
        let bytes = csv_bytes(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "soubor,hodnocení (1–5),zpětná vazba\n");
    }

    #[test]
    fn csv_round_trips_identifiers_and_scores() {
        let records = sample_records();
        let bytes = csv_bytes(&records).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let parsed: Vec<(String, Score)> = reader
            .records()
            .map(|row| {
                let row = row.unwrap();
                (row[0].to_string(), row[1].parse::<Score>().unwrap())
            })
            .collect();

        let expected: Vec<(String, Score)> = records
            .iter()
            .map(|r| (r.file.clone(), r.score))
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn csv_quotes_feedback_containing_commas() {
        let records = vec![EvaluationRecord {
            file: "A.txt".to_string(),
            score: Score::Rated(3),
            feedback: "Dobré, ale krátké.".to_string(),
        }];
        let text = String::from_utf8(csv_bytes(&records).unwrap()).unwrap();
        assert!(text.contains("\"Dobré, ale krátké.\""));
    }

    #[test]
    fn xlsx_bytes_form_a_zip_container() {
        let bytes = xlsx_bytes(&sample_records()).unwrap();
        // XLSX is a zip archive; PK is the local file header magic.
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn format_parses_from_user_selection() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("Excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn default_file_names_match_format() {
        assert_eq!(ExportFormat::Csv.default_file_name(), CSV_EXPORT_FILE);
        assert_eq!(ExportFormat::Xlsx.default_file_name(), XLSX_EXPORT_FILE);
    }
}
