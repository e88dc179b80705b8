use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_squeeze::paths::compressed_output_path;
use pdf_squeeze::{
    find_ghostscript, CompressError, CompressionEngine, Ghostscript, Method, PdfAnalyzer,
    Settings,
};

/// Write a small valid PDF with `pages` pages of text and one gray image
/// per page. `padding` bytes of incompressible image data inflate the file.
fn write_fixture(path: &Path, pages: usize, padding: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let side = ((padding.max(1)) as f64).sqrt().ceil() as i64;
    let mut kids: Vec<Object> = Vec::new();
    for page in 0..pages {
        let pixels: Vec<u8> = (0..(side * side) as usize)
            .map(|i| ((i * 31 + page * 7) % 251) as u8)
            .collect();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => side,
                "Height" => side,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            pixels,
        ));
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal("Quarterly report")]),
                Operation::new("ET", vec![]),
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![200.into(), 0.into(), 0.into(), 200.into(), 72.into(), 400.into()],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => dictionary! { "Im0" => image_id },
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("Failed to write fixture PDF");
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn engine_with(gs: Ghostscript, target_size: u64) -> CompressionEngine {
    let settings = Settings::default().with_target_size(target_size);
    CompressionEngine::new(settings, gs, PdfAnalyzer::new()).expect("Invalid settings")
}

#[test]
fn test_small_pdf_copied_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("small.pdf");
    write_fixture(&input, 2, 64);

    let output = dir.path().join("small-out.pdf");
    // Backend is never started on this path
    let engine = engine_with(Ghostscript::new("no-such-gs"), 25 * 1024 * 1024);
    let result = engine.compress(&input, &output).unwrap();

    assert_eq!(result.method, Method::None);
    assert_eq!(result.reduction_percentage, 0.0);
    assert_eq!(fs::read(&input).unwrap(), fs::read(&output).unwrap());
}

#[test]
fn test_corrupt_pdf_rejected_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("corrupt.pdf");
    fs::write(&input, vec![b'z'; 4096]).unwrap();
    let output = dir.path().join("corrupt-out.pdf");

    let engine = engine_with(Ghostscript::new("no-such-gs"), 1024);
    let err = engine.compress(&input, &output).unwrap_err();

    assert!(matches!(err, CompressError::UnreadableDocument { .. }));
    assert_eq!(dir_entries(dir.path()), vec!["corrupt.pdf"]);
}

#[test]
fn test_missing_backend_fails_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("big.pdf");
    write_fixture(&input, 2, 8192);
    let output = dir.path().join("big-out.pdf");

    let engine = engine_with(Ghostscript::new("no-such-gs"), 1024);
    let err = engine.compress(&input, &output).unwrap_err();

    assert!(matches!(err, CompressError::BackendExecutionFailed { .. }));
    assert_eq!(dir_entries(dir.path()), vec!["big.pdf"]);
}

#[test]
fn test_real_ghostscript_when_available() {
    let Some(gs) = find_ghostscript() else {
        eprintln!("Ghostscript not installed, skipping");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    write_fixture(&input, 3, 200_000);
    let output = dir.path().join("report-out.pdf");

    let engine = engine_with(Ghostscript::new(gs), 1024);
    let result = engine.compress(&input, &output).unwrap();

    assert!(result.success);
    assert_ne!(result.method, Method::None);
    assert_eq!(fs::metadata(&output).unwrap().len(), result.compressed_size);
    assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
    assert_eq!(dir_entries(dir.path()), vec!["report-out.pdf", "report.pdf"]);
}

#[cfg(unix)]
mod fake_backend {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Ghostscript stand-in writing `standard` bytes for /ebook and
    /// `aggressive` bytes for /screen; exits 1 for a negative size
    fn fake_gs(dir: &Path, standard: i64, aggressive: i64) -> String {
        let script = format!(
            r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${{arg#-sOutputFile=}}" ;;
    -dPDFSETTINGS=/ebook) size={standard} ;;
    -dPDFSETTINGS=/screen) size={aggressive} ;;
  esac
done
if [ "$size" -lt 0 ]; then
  echo "Unrecoverable error" >&2
  exit 1
fi
head -c "$size" /dev/zero > "$out"
"#
        );
        let path = dir.join("fake-gs.sh");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_smaller_variant_promoted() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        write_fixture(&input, 4, 16_384);
        let output = dir.path().join("scan-out.pdf");

        let engine = engine_with(Ghostscript::new(fake_gs(tools.path(), 3000, 2000)), 1024);
        let result = engine.compress(&input, &output).unwrap();

        assert_eq!(result.method, Method::Aggressive);
        assert_eq!(result.compressed_size, 2000);
        assert_eq!(fs::metadata(&output).unwrap().len(), 2000);
        assert_eq!(dir_entries(dir.path()), vec!["scan-out.pdf", "scan.pdf"]);
    }

    #[test]
    fn test_equal_sizes_pick_standard() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        write_fixture(&input, 1, 16_384);
        let output = dir.path().join("scan-out.pdf");

        let engine = engine_with(Ghostscript::new(fake_gs(tools.path(), 1500, 1500)), 1024);
        let result = engine.compress(&input, &output).unwrap();

        assert_eq!(result.method, Method::Standard);
    }

    #[test]
    fn test_aggressive_failure_removes_standard_candidate() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        write_fixture(&input, 2, 16_384);
        let output = dir.path().join("scan-out.pdf");

        let engine = engine_with(Ghostscript::new(fake_gs(tools.path(), 3000, -1)), 1024);
        let err = engine.compress(&input, &output).unwrap_err();

        match err {
            CompressError::BackendExecutionFailed { preset, message } => {
                assert_eq!(preset, pdf_squeeze::Preset::Aggressive);
                assert!(message.contains("Unrecoverable error"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
        assert_eq!(dir_entries(dir.path()), vec!["scan.pdf"]);
    }

    #[test]
    fn test_input_named_like_a_variant_is_untouched() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.std.pdf");
        write_fixture(&input, 2, 16_384);
        let original = fs::read(&input).unwrap();
        let output = dir.path().join("doc.pdf");

        let engine = engine_with(Ghostscript::new(fake_gs(tools.path(), 900, 600)), 1024);
        let result = engine.compress(&input, &output).unwrap();

        assert_eq!(result.method, Method::Aggressive);
        assert_eq!(fs::read(&input).unwrap(), original);
        assert_eq!(dir_entries(dir.path()), vec!["doc.pdf", "doc.std.pdf"]);
    }

    #[test]
    fn test_unrelated_siblings_survive() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.pdf");
        write_fixture(&input, 2, 16_384);
        fs::write(dir.path().join("report.std.pdf"), b"quarterly").unwrap();
        fs::write(dir.path().join("report.agg.pdf"), b"annual").unwrap();
        let output = dir.path().join("report.pdf");

        let engine = engine_with(Ghostscript::new(fake_gs(tools.path(), 900, 600)), 1024);
        engine.compress(&input, &output).unwrap();

        assert_eq!(fs::read(dir.path().join("report.std.pdf")).unwrap(), b"quarterly");
        assert_eq!(fs::read(dir.path().join("report.agg.pdf")).unwrap(), b"annual");
        assert_eq!(
            dir_entries(dir.path()),
            vec!["input.pdf", "report.agg.pdf", "report.pdf", "report.std.pdf"]
        );
    }

    #[test]
    fn test_concurrent_jobs_do_not_collide() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("shared.pdf");
        write_fixture(&input, 2, 16_384);

        let engine = engine_with(Ghostscript::new(fake_gs(tools.path(), 2500, 2600)), 1024);
        let outputs: Vec<PathBuf> = (0..4)
            .map(|i| compressed_output_path(&input, None, &format!("job{}", i)))
            .collect();

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = outputs
                .iter()
                .map(|output| {
                    let engine = &engine;
                    let input = &input;
                    scope.spawn(move || engine.compress(input, output))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in results {
            let result = result.unwrap();
            assert_eq!(result.method, Method::Standard);
            assert_eq!(result.compressed_size, 2500);
        }
        assert_eq!(dir_entries(dir.path()).len(), 1 + outputs.len());
        for output in &outputs {
            assert_eq!(fs::metadata(output).unwrap().len(), 2500);
        }
    }

    #[test]
    fn test_cli_reports_and_writes_output() {
        let tools = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        write_fixture(&input, 2, 16_384);
        let output = dir.path().join("scan-small.pdf");
        let gs = fake_gs(tools.path(), 3000, 2000);

        let out = Command::new(env!("CARGO_BIN_EXE_pdf-squeeze"))
            .args(["--gs", gs.as_str(), "-t", "1K", "--dpi", "150", "-o"])
            .arg(&output)
            .arg(&input)
            .output()
            .expect("Failed to run pdf-squeeze");

        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("Method:          aggressive"));
        assert!(stdout.contains("bytes saved"));
        assert_eq!(fs::metadata(&output).unwrap().len(), 2000);
    }
}

#[test]
fn test_cli_copies_small_file_into_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let processed = tempfile::tempdir().unwrap();
    let input = dir.path().join("memo.pdf");
    write_fixture(&input, 1, 64);

    let status = Command::new(env!("CARGO_BIN_EXE_pdf-squeeze"))
        .args(["--gs", "no-such-gs", "-d"])
        .arg(processed.path())
        .arg(&input)
        .status()
        .expect("Failed to run pdf-squeeze");
    assert!(status.success());

    let produced = dir_entries(processed.path());
    assert_eq!(produced.len(), 1);
    assert!(produced[0].starts_with("compressed_"));
    assert!(produced[0].ends_with("_memo.pdf"));
    assert_eq!(
        fs::read(processed.path().join(&produced[0])).unwrap(),
        fs::read(&input).unwrap()
    );
}

#[test]
fn test_cli_rejects_non_pdf() {
    let status = Command::new(env!("CARGO_BIN_EXE_pdf-squeeze"))
        .arg("notes.txt")
        .status()
        .expect("Failed to run pdf-squeeze");
    assert!(!status.success());
}
