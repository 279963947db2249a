use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet_slice::testing::{
    TempFilePath, expected_fields, mock_parquet_file, score_rows, write_parquet_rows,
};
use parquet_slice::{
    ColumnSource, ExportOptions, ParquetColumnSource, SliceError, Value, export_file, qualify,
    show_schema_file,
};
use serde::{Deserialize, Serialize};

fn csv_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out).lines().map(str::to_string).collect()
}

#[test]
fn source_exposes_qualified_leaves_and_row_count() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), Some(10))?;
    let source = ParquetColumnSource::open(file.path())?;
    assert_eq!(
        source.schema(),
        vec![qualify("id"), qualify("name"), qualify("score")]
    );
    assert_eq!(source.num_rows(), 25);
    Ok(())
}

#[test]
fn column_cursors_are_independent_and_cross_row_groups() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), Some(10))?;
    let mut source = ParquetColumnSource::open(file.path())?;

    source.skip_rows(8)?;
    let ids = source.read_column(&qualify("id"), 4)?;
    assert_eq!(ids, (8..12_i64).map(Value::Int).collect::<Vec<_>>());

    // `name` has not moved since the skip.
    let names = source.read_column(&qualify("name"), 1)?;
    assert_eq!(names, vec![Value::Text("user-8".into())]);

    let ids = source.read_column(&qualify("id"), 100)?;
    assert_eq!(ids.len(), 13, "reads stop at the end of the file");
    Ok(())
}

#[test]
fn writer_splits_rows_into_requested_row_groups() -> anyhow::Result<()> {
    for (rows, per_group, groups) in [(25, Some(10), 3), (25, None, 1), (10, Some(10), 1)] {
        let temp = TempFilePath::with_extension("parquet")?;
        assert_eq!(write_parquet_rows(temp.path(), &score_rows(rows), per_group)?, rows as usize);

        let reader = SerializedFileReader::new(std::fs::File::open(temp.path())?)?;
        let meta = reader.metadata();
        assert_eq!(meta.num_row_groups(), groups, "{rows} rows by {per_group:?}");
        assert_eq!(meta.file_metadata().num_rows(), rows as i64);
    }

    let empty = mock_parquet_file(&score_rows(0), Some(4))?;
    let source = ParquetColumnSource::open(empty.path())?;
    assert_eq!(source.num_rows(), 0);
    assert_eq!(source.schema().len(), 3);
    Ok(())
}

#[test]
fn uneven_reads_continue_where_the_last_one_stopped() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), Some(10))?;
    let mut source = ParquetColumnSource::open(file.path())?;

    let mut ids = Vec::new();
    let mut names = Vec::new();
    for count in [3, 7, 1, 9, 100] {
        ids.extend(source.read_column(&qualify("id"), count)?);
        names.extend(source.read_column(&qualify("name"), count.min(4))?);
    }
    assert_eq!(ids, (0..25_i64).map(Value::Int).collect::<Vec<_>>());
    let expected: Vec<Value> = (0..16).map(|i| Value::Text(format!("user-{i}"))).collect();
    assert_eq!(names, expected);
    assert!(source.read_column(&qualify("id"), 1)?.is_empty());
    Ok(())
}

#[test]
fn skip_discards_buffered_values() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), Some(10))?;
    let mut source = ParquetColumnSource::open(file.path())?;

    // The reader decodes three rows at a time, so two `id` values stay buffered.
    assert_eq!(source.read_column(&qualify("id"), 3)?.len(), 3);
    assert_eq!(source.read_column(&qualify("id"), 1)?, vec![Value::Int(3)]);

    source.skip_rows(5)?;
    assert_eq!(
        source.read_column(&qualify("id"), 2)?,
        vec![Value::Int(9), Value::Int(10)]
    );
    assert_eq!(
        source.read_column(&qualify("name"), 1)?,
        vec![Value::Text("user-5".into())]
    );
    Ok(())
}

#[test]
fn unknown_path_and_overlong_skip_fail() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(5), None)?;
    let mut source = ParquetColumnSource::open(file.path())?;
    assert!(matches!(
        source.read_column("id", 1),
        Err(SliceError::UnknownPath(_))
    ));
    assert!(matches!(
        source.skip_rows(6),
        Err(SliceError::SeekFailure { rows: 6, .. })
    ));
    Ok(())
}

#[test]
fn schema_listing_is_stable() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), None)?;
    let mut first: Vec<u8> = Vec::new();
    let mut second: Vec<u8> = Vec::new();
    show_schema_file(file.path(), &mut first)?;
    show_schema_file(file.path(), &mut second)?;
    assert_eq!(csv_lines(&first), vec!["- id", "- name", "- score"]);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn export_window_spanning_row_groups_and_batches() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(300), Some(64))?;
    let options = ExportOptions::default()
        .window(37, 210)
        .columns(["score", "id"])
        .batch_size(50);

    let mut out: Vec<u8> = Vec::new();
    let summary = export_file(file.path(), &options, &mut out)?;
    assert_eq!(summary.rows_written, 210);
    assert_eq!(summary.batches, 5);

    let lines = csv_lines(&out);
    assert_eq!(lines[0], "score,id");
    assert_eq!(lines.len(), 211);
    for (i, line) in lines[1..].iter().enumerate() {
        assert_eq!(line, &expected_fields(37 + i as u64, &["score", "id"]).join(","));
    }
    Ok(())
}

#[test]
fn export_clamps_and_supports_custom_delimiter() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), None)?;
    let options = ExportOptions {
        delimiter: b'\t',
        ..ExportOptions::default().window(20, 10).columns(["id", "name"])
    };
    let mut out: Vec<u8> = Vec::new();
    let summary = export_file(file.path(), &options, &mut out)?;
    assert_eq!(summary.rows_written, 5);
    assert_eq!(
        csv_lines(&out),
        vec!["id\tname", "20\tuser-20", "21\tuser-21", "22\tuser-22", "23\tuser-23", "24\tuser-24"]
    );
    Ok(())
}

#[test]
fn zero_size_writes_header_only() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), None)?;
    let mut out: Vec<u8> = Vec::new();
    export_file(file.path(), &ExportOptions::default().window(3, 0), &mut out)?;
    assert_eq!(csv_lines(&out), vec!["id,name,score"]);
    Ok(())
}

#[test]
fn rejected_requests_write_nothing() -> anyhow::Result<()> {
    let file = mock_parquet_file(&score_rows(25), None)?;

    let mut out: Vec<u8> = Vec::new();
    let err = export_file(file.path(), &ExportOptions::default().window(25, 10), &mut out)
        .unwrap_err();
    assert!(matches!(err, SliceError::OffsetOutOfRange { offset: 25, total_rows: 25 }));
    assert!(out.is_empty());

    let mut out: Vec<u8> = Vec::new();
    let err = export_file(
        file.path(),
        &ExportOptions::default().columns(["id", "bogus"]),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, SliceError::UnknownColumn { ref name, .. } if name == "bogus"));
    assert!(out.is_empty());
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct Mixed {
    flag: bool,
    maybe: Option<i32>,
    ratio: f32,
    label: Option<String>,
}

#[test]
fn heterogeneous_values_render_uniformly() -> anyhow::Result<()> {
    let rows = vec![
        Mixed { flag: true, maybe: Some(-4), ratio: 0.5, label: Some("a,b".into()) },
        Mixed { flag: false, maybe: None, ratio: 2.0, label: None },
    ];
    let file = mock_parquet_file(&rows, None)?;
    let mut out: Vec<u8> = Vec::new();
    export_file(file.path(), &ExportOptions::default(), &mut out)?;
    assert_eq!(
        csv_lines(&out),
        vec!["flag,maybe,ratio,label", "true,-4,0.5,\"a,b\"", "false,,2,"]
    );
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = ParquetColumnSource::open("/definitely/not/here.parquet").err().unwrap();
    assert!(matches!(err, SliceError::Io(_)));
}

#[derive(Serialize, Deserialize)]
struct Inner {
    b: i64,
}

#[derive(Serialize, Deserialize)]
struct Outer {
    a: Option<Inner>,
    c: i64,
}

#[test]
fn nested_leaves_export_their_own_values() -> anyhow::Result<()> {
    let rows = vec![
        Outer { a: Some(Inner { b: 0 }), c: 0 },
        Outer { a: None, c: 10 },
        Outer { a: Some(Inner { b: 2 }), c: 20 },
    ];
    let file = mock_parquet_file(&rows, None)?;

    let source = ParquetColumnSource::open(file.path())?;
    assert_eq!(source.schema(), vec![qualify("a.b"), qualify("c")]);

    let mut out: Vec<u8> = Vec::new();
    export_file(file.path(), &ExportOptions::default(), &mut out)?;
    assert_eq!(csv_lines(&out), vec!["a.b,c", "0,0", ",10", "2,20"]);

    let mut out: Vec<u8> = Vec::new();
    export_file(
        file.path(),
        &ExportOptions::default().window(1, 2).columns(["a.b"]),
        &mut out,
    )?;
    assert_eq!(csv_lines(&out), vec!["a.b", "", "2"]);
    Ok(())
}
