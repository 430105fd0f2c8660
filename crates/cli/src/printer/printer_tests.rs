use super::*;
use statwalk_fs::FileMode;

fn file(path: &str, size: u64) -> StatRecord {
    let mut record = StatRecord::new(path.to_owned(), FileMode::from_bits_retain(0o644));
    record.size = size;
    record
}

fn stats() -> WalkStats {
    WalkStats {
        visited: 5,
        emitted: 3,
        skipped: 1,
        pruned: 1,
        rejected: 0,
        vanished: 0,
        invalid_names: 0,
    }
}

#[test]
fn format_record_renders_mode_size_time_and_path() {
    let mut record = file("a/b.txt", 11);
    record.mod_time = 1_700_000_000 * 1_000_000_000;

    assert_eq!(
        format_record(&record),
        "-rw-r--r--           11 2023-11-14 22:13:20 a/b.txt"
    );
}

#[test]
fn format_record_appends_link_target() {
    let mut record = StatRecord::new(
        "link".to_owned(),
        FileMode::SYMLINK | FileMode::from_bits_retain(0o777),
    );
    record.linkname = Some("../target".to_owned());

    let line = format_record(&record);
    assert!(line.starts_with("lrwxrwxrwx "), "unexpected line {line:?}");
    assert!(line.ends_with(" link -> ../target"), "unexpected line {line:?}");
}

#[test]
fn format_record_handles_pre_epoch_times() {
    let mut record = file("old", 0);
    record.mod_time = -1_000_000_000;

    assert!(format_record(&record).contains("1969-12-31 23:59:59"));
}

#[test]
fn human_printer_writes_one_line_per_record_and_summary_to_err() {
    let mut printer = HumanPrinter::new(Vec::new(), Vec::new(), PrinterConfig::default());
    printer.print_record(&file("a", 1)).unwrap();
    printer.print_record(&file("a/b", 2)).unwrap();
    printer.finish(&stats()).unwrap();

    let (out, err) = printer.into_inner();
    let out = String::from_utf8(out).unwrap();
    let err = String::from_utf8(err).unwrap();

    let paths: Vec<&str> = out
        .lines()
        .map(|line| line.rsplit(' ').next().unwrap())
        .collect();
    assert_eq!(paths, vec!["a", "a/b"]);
    assert!(err.contains("3 records (5 visited, 1 skipped, 1 pruned"), "{err}");
}

#[test]
fn quiet_printer_skips_summary() {
    let cfg = PrinterConfig {
        show_summary: false,
        ..PrinterConfig::default()
    };
    let mut printer = HumanPrinter::new(Vec::new(), Vec::new(), cfg);
    printer.print_record(&file("a", 1)).unwrap();
    printer.finish(&stats()).unwrap();

    let (out, err) = printer.into_inner();
    assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 1);
    assert!(err.is_empty());
}

#[test]
fn json_printer_emits_ndjson_records() {
    let cfg = PrinterConfig {
        format: OutputFormat::Json,
        show_summary: true,
    };
    let mut printer = JsonPrinter::new(Vec::new(), Vec::new(), cfg);

    let mut linked = file("dir/hard", 0);
    linked.linkname = Some("dir/first".to_owned());
    printer.print_record(&file("dir/first", 42)).unwrap();
    printer.print_record(&linked).unwrap();
    printer.finish(&stats()).unwrap();

    let (out, err) = printer.into_inner();
    let out = String::from_utf8(out).unwrap();
    let rows: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["path"], "dir/first");
    assert_eq!(rows[0]["size"], 42);
    assert_eq!(rows[0]["mode"], 0o644);
    assert!(rows[0].get("linkname").is_none());
    assert_eq!(rows[1]["linkname"], "dir/first");

    let summary: serde_json::Value =
        serde_json::from_str(String::from_utf8(err).unwrap().trim()).unwrap();
    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["emitted"], 3);
}
