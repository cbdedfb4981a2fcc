use price_master_upload::ingestion::{IngestionFormat, IngestionOptions, UploadedFile};
use price_master_upload::session::{CompletionOrdering, SessionOptions, UploadSession};
use price_master_upload::types::Value;
use rust_xlsxwriter::Workbook;

fn csv_upload(name: &str, rows: usize) -> UploadedFile {
    let mut text = String::from("Client_Code,Product_Code,Fixed_Price\n");
    for i in 0..rows {
        text.push_str(&format!("CLI-{i:04},PRD-{i:04},{}\n", 100 + i));
    }
    UploadedFile::new(name, text)
}

fn xlsx_upload(name: &str, rows: u32) -> UploadedFile {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Client_Code").unwrap();
    ws.write_string(0, 1, "Fixed_Price").unwrap();
    for r in 1..=rows {
        ws.write_string(r, 0, format!("CLI-{r:04}")).unwrap();
        ws.write_number(r, 1, r * 10).unwrap();
    }
    UploadedFile::new(name, wb.save_to_buffer().unwrap())
}

#[test]
fn single_csv_row_example() {
    let mut session = UploadSession::default();
    session.ingest(Some(UploadedFile::new(
        "prices.csv",
        "Client_Code,Product_Code\nCLI-0001,PRD-0001\n",
    )));

    assert_eq!(session.status().as_str(), "Loaded 1 rows from CSV file.");
    let rows = &session.dataset().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].iter().collect::<Vec<_>>(),
        vec![
            ("Client_Code", &Value::from("CLI-0001")),
            ("Product_Code", &Value::from("PRD-0001")),
        ]
    );
}

#[test]
fn csv_row_count_matches_status() {
    for n in [0usize, 1, 7, 10, 11, 250] {
        let mut session = UploadSession::default();
        session.ingest(Some(csv_upload("prices.csv", n)));

        assert_eq!(session.dataset().row_count(), n);
        assert_eq!(session.status().as_str(), format!("Loaded {n} rows from CSV file."));
    }
}

#[test]
fn xlsx_row_count_matches_status() {
    for n in [0u32, 1, 12] {
        let mut session = UploadSession::default();
        session.ingest(Some(xlsx_upload("prices.xlsx", n)));

        assert_eq!(session.dataset().row_count(), n as usize);
        assert_eq!(session.status().as_str(), format!("Loaded {n} rows from Excel file."));
    }
}

#[test]
fn corrupt_spreadsheet_leaves_dataset_empty() {
    let mut session = UploadSession::default();
    session.ingest(Some(UploadedFile::new("prices.xlsx", b"PK\x03\x04garbage".to_vec())));

    assert!(session.dataset().is_empty());
    assert_eq!(session.status().as_str(), "Failed to read Excel file.");
    assert!(session.preview().is_none());
}

#[test]
fn unparsable_csv_leaves_dataset_empty() {
    let mut session = UploadSession::default();
    session.ingest(Some(UploadedFile::new("prices.csv", b"a,b\n\xff,1\n".to_vec())));

    assert!(session.dataset().is_empty());
    assert_eq!(session.status().as_str(), "Failed to parse CSV file.");
}

#[test]
fn misnamed_spreadsheet_is_parsed_as_text() {
    let mut session = UploadSession::default();
    session.ingest(Some(xlsx_upload("prices.XLSX", 2)));

    // Content is never sniffed: an upper-case extension goes down the delimited-text path.
    assert!(session.status().as_str().contains("CSV"));
    assert!(!session.status().as_str().contains("Excel"));
}

#[test]
fn forced_format_overrides_name() {
    let upload = xlsx_upload("download.bin", 3);
    let mut session = UploadSession::new(SessionOptions {
        ingestion: IngestionOptions {
            format: Some(IngestionFormat::Excel),
            ..Default::default()
        },
        ..Default::default()
    });
    session.ingest(Some(upload));

    assert_eq!(session.status().as_str(), "Loaded 3 rows from Excel file.");
}

#[test]
fn new_upload_replaces_rows_without_merging() {
    let mut session = UploadSession::default();
    session.ingest(Some(csv_upload("a.csv", 5)));
    session.ingest(Some(xlsx_upload("b.xlsx", 2)));

    assert_eq!(session.dataset().row_count(), 2);
    assert_eq!(session.dataset().columns(), vec!["Client_Code", "Fixed_Price"]);
}

#[test]
fn preview_shows_first_ten_rows() {
    let mut session = UploadSession::default();
    session.ingest(Some(csv_upload("prices.csv", 25)));

    let preview = session.preview().unwrap();
    assert_eq!(preview.columns, vec!["Client_Code", "Product_Code", "Fixed_Price"]);
    assert_eq!(preview.rows.len(), 10);
    assert_eq!(preview.rows[0], vec!["CLI-0000", "PRD-0000", "100"]);
}

#[test]
fn preview_limit_is_configurable() {
    let mut session = UploadSession::new(SessionOptions {
        preview_limit: 3,
        ..Default::default()
    });
    session.ingest(Some(csv_upload("prices.csv", 25)));
    assert_eq!(session.preview().unwrap().rows.len(), 3);
}

#[test]
fn background_uploads_are_all_applied() {
    let mut session = UploadSession::default();
    let tickets: Vec<_> = (1..=4)
        .map(|n| session.submit(Some(csv_upload("bg.csv", n))).unwrap())
        .collect();
    assert_eq!(session.pending(), 4);

    let done = session.wait_all();
    assert_eq!(done.len(), 4);
    assert!(done.iter().all(|c| c.applied));
    assert_eq!(session.pending(), 0);

    // Whatever finished last is what the session shows.
    let last = done.last().unwrap().ticket;
    assert_eq!(session.last_applied(), Some(last));
    let expected_rows = tickets.iter().position(|t| *t == last).unwrap() + 1;
    assert_eq!(session.dataset().row_count(), expected_rows);
}

#[test]
fn latest_submission_ordering_ends_on_newest_upload() {
    let mut session = UploadSession::new(SessionOptions {
        ordering: CompletionOrdering::LatestSubmission,
        ..Default::default()
    });
    // A slow spreadsheet first, then a small CSV.
    session.submit(Some(xlsx_upload("slow.xlsx", 2_000)));
    let newest = session.submit(Some(csv_upload("fast.csv", 1))).unwrap();

    session.wait_all();
    assert_eq!(session.last_applied(), Some(newest));
    assert_eq!(session.status().as_str(), "Loaded 1 rows from CSV file.");
}

#[test]
fn poll_without_uploads_is_empty() {
    let mut session = UploadSession::default();
    assert!(session.poll().is_empty());
}
