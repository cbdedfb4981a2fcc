use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use price_master_upload::ingestion::{ingest_upload, IngestionOptions, UploadedFile};
use rust_xlsxwriter::Workbook;

fn csv_upload(rows: usize) -> UploadedFile {
    let mut text = String::from("Client_Code,Product_Code,Fixed_Price,Currency,UoM,Valid_From,Valid_To,Notes\n");
    for i in 0..rows {
        text.push_str(&format!(
            "CLI-{i:05},PRD-{i:05},{},INR,PCS,2025-01-01,,row {i}\n",
            100 + i % 50
        ));
    }
    UploadedFile::new("bench.csv", text)
}

fn xlsx_upload(rows: u32) -> UploadedFile {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (col, name) in ["Client_Code", "Product_Code", "Fixed_Price"].iter().enumerate() {
        ws.write_string(0, col as u16, *name).unwrap();
    }
    for r in 1..=rows {
        ws.write_string(r, 0, format!("CLI-{r:05}")).unwrap();
        ws.write_string(r, 1, format!("PRD-{r:05}")).unwrap();
        ws.write_number(r, 2, 100 + r % 50).unwrap();
    }
    UploadedFile::new("bench.xlsx", wb.save_to_buffer().unwrap())
}

fn bench_ingestion(c: &mut Criterion) {
    let opts = IngestionOptions::default();
    let mut group = c.benchmark_group("ingest_upload");

    for rows in [1_000usize, 10_000] {
        let csv = csv_upload(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("csv", rows), &csv, |b, file| {
            b.iter(|| ingest_upload(black_box(file), &opts).unwrap())
        });

        let xlsx = xlsx_upload(rows as u32);
        group.bench_with_input(BenchmarkId::new("xlsx", rows), &xlsx, |b, file| {
            b.iter(|| ingest_upload(black_box(file), &opts).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ingestion);
criterion_main!(benches);
