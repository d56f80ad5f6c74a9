use blocksieve_core::{OutputFormat, PhoneNormalizer, ProcessingOptions};
use blocksieve_pipeline::{ErrorKind, JobRequest, Pipeline};
use blocksieve_source::{BlocklistSource, FileBlocklistSource, SourceError, StaticBlocklist};
use blocksieve_store::OutputWriter;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct DownSource;

impl BlocklistSource for DownSource {
    fn source_name(&self) -> &'static str {
        "down"
    }

    fn fetch_entries(&self) -> blocksieve_source::Result<Vec<String>> {
        Err(SourceError::Unavailable("connection refused".to_string()))
    }
}

struct SlowSource(Duration);

impl BlocklistSource for SlowSource {
    fn source_name(&self) -> &'static str {
        "slow"
    }

    fn fetch_entries(&self) -> blocksieve_source::Result<Vec<String>> {
        thread::sleep(self.0);
        Ok(vec!["40723456789".to_string()])
    }
}

fn pipeline(source: impl BlocklistSource + 'static, out: &Path, max_rows: usize) -> Pipeline {
    Pipeline::new(
        Box::new(source),
        PhoneNormalizer::default(),
        OutputWriter::new(out, max_rows),
    )
}

fn request(input: PathBuf, column: &str, format: OutputFormat) -> JobRequest {
    JobRequest {
        input,
        options: ProcessingOptions::new(column),
        format,
    }
}

fn entries(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn duplicates_and_blocked_numbers_are_removed() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.csv");
    fs::write(&input, "phone\n+40723456789\n0723456789\n723456789\nabc\n").expect("write");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");

    let outcome = pipeline(StaticBlocklist::new(["40723456789"]), &out, 50_000)
        .run(&request(input, "phone", OutputFormat::Csv))
        .expect("run");

    let stats = outcome.stats;
    assert_eq!(stats.total_rows, 4);
    assert_eq!(stats.valid_numbers, 3);
    assert_eq!(stats.duplicates_removed, 2);
    assert_eq!(stats.blocked_numbers, 1);
    assert_eq!(stats.final_rows, 1);
    assert_eq!(stats.blocklist_size, 1);
    assert!(stats.is_consistent());

    assert_eq!(outcome.artifact.file_name, format!("{}_processed.csv", outcome.job_id));
    let text = fs::read_to_string(&outcome.artifact.path).expect("read output");
    assert_eq!(text, "phone\nabc\n");
}

#[test]
fn blocklist_entries_are_compared_canonically_and_order_is_kept() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.csv");
    fs::write(
        &input,
        "Name;Telefon\nAna;0744111222\nIon;+40723456789\nDan;0755 333 444\nEva;\n",
    )
    .expect("write");

    let outcome = pipeline(StaticBlocklist::new(["0723456789"]), temp.path(), 50_000)
        .run(&request(input, "telefon", OutputFormat::Csv))
        .expect("run");

    let text = fs::read_to_string(&outcome.artifact.path).expect("read output");
    assert_eq!(
        text,
        "Name,Telefon\nAna,+40744111222\nDan,+40755333444\nEva,\n"
    );
    assert_eq!(outcome.stats.blocked_numbers, 1);
    assert_eq!(outcome.stats.final_rows, 3);
}

#[test]
fn unavailable_blocklist_fails_without_artifact() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.csv");
    fs::write(&input, "phone\n0723456789\n").expect("write");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");

    let err = pipeline(DownSource, &out, 50_000)
        .run(&request(input, "phone", OutputFormat::Xlsx))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BlocklistUnavailable);
    assert!(err.to_string().contains("connection refused"));
    assert!(entries(&out).is_empty());
}

#[test]
fn empty_blocklist_file_fails_without_artifact() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.csv");
    fs::write(&input, "phone\n0723456789\n").expect("write");
    let blocklist = temp.path().join("blocklist.txt");
    fs::write(&blocklist, "").expect("write");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");

    let err = pipeline(FileBlocklistSource::new(blocklist), &out, 50_000)
        .run(&request(input, "phone", OutputFormat::Csv))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BlocklistUnavailable);
    assert!(entries(&out).is_empty());
}

#[test]
fn unreadable_input_does_not_wait_for_the_blocklist() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.pdf");
    fs::write(&input, "%PDF").expect("write");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");

    let started = Instant::now();
    let err = pipeline(SlowSource(Duration::from_secs(10)), &out, 50_000)
        .run(&request(input, "phone", OutputFormat::Csv))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InputUnreadable);
    assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
    assert!(entries(&out).is_empty());
}

#[test]
fn missing_input_is_unreadable() {
    let temp = TempDir::new().expect("temp dir");
    let err = pipeline(StaticBlocklist::default(), temp.path(), 50_000)
        .run(&request(temp.path().join("missing.csv"), "phone", OutputFormat::Csv))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputUnreadable);
}

#[test]
fn unknown_column_lists_available_headers() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.csv");
    fs::write(&input, "name,mobile\nAna,0723456789\n").expect("write");

    let err = pipeline(StaticBlocklist::default(), temp.path(), 50_000)
        .run(&request(input, "phone", OutputFormat::Csv))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
    assert!(err.to_string().contains("name, mobile"));
}

#[test]
fn unwritable_output_is_a_write_failure() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input.csv");
    fs::write(&input, "phone\n0723456789\n").expect("write");
    let not_a_dir = temp.path().join("occupied");
    fs::write(&not_a_dir, "").expect("write");

    let err = pipeline(StaticBlocklist::default(), &not_a_dir, 50_000)
        .run(&request(input, "phone", OutputFormat::Csv))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailure);
}

fn large_input(dir: &Path, rows: usize) -> PathBuf {
    let mut body = String::from("id,phone\n");
    for i in 0..rows {
        writeln!(body, "{i},07{i:08}").expect("format");
    }
    let path = dir.join("large.csv");
    fs::write(&path, body).expect("write");
    path
}

#[test]
fn large_outputs_are_split_into_bounded_parts() {
    let temp = TempDir::new().expect("temp dir");
    let input = large_input(temp.path(), 120_000);
    let out = temp.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");

    let mut job = request(input, "phone", OutputFormat::Csv);
    job.options.split_files = true;
    let outcome = pipeline(StaticBlocklist::default(), &out, 50_000)
        .run(&job)
        .expect("run");

    assert_eq!(outcome.stats.final_rows, 120_000);
    assert!(outcome.artifact.archived);
    assert_eq!(outcome.artifact.parts, 3);
    assert_eq!(outcome.artifact.file_name, format!("{}_csv.zip", outcome.job_id));
    let archive = zip_entries(&outcome.artifact.path);
    assert_eq!(archive.len(), 3);
}

#[test]
fn large_outputs_stay_whole_without_split() {
    let temp = TempDir::new().expect("temp dir");
    let input = large_input(temp.path(), 120_000);

    let outcome = pipeline(StaticBlocklist::default(), temp.path(), 50_000)
        .run(&request(input, "phone", OutputFormat::Csv))
        .expect("run");

    assert!(!outcome.artifact.archived);
    let text = fs::read_to_string(&outcome.artifact.path).expect("read output");
    assert_eq!(text.lines().count(), 120_001);
}

fn zip_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).expect("open")).expect("zip");
    archive.file_names().map(str::to_string).collect()
}
