//! End-to-end extraction against a stand-in exiftool binary.
//!
//! A shell script that prints a canned `-xmlFormat` response stands in for
//! the real tool, so the full pipeline — batching, invocation, XML decoding,
//! normalization, assembly, cleaning — runs without exiftool installed.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use photo_meta::config::Config;
use photo_meta::exiftool::ExifTool;
use photo_meta::pipeline::{ExtractOptions, MediaPaths};
use photo_meta::value::TagValue;
use tempfile::TempDir;

const RESPONSE_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'>
 <rdf:Description rdf:about='/photos/a.jpg'
   xmlns:File='http://ns.exiftool.org/File/1.0/'
   xmlns:EXIF='http://ns.exiftool.org/EXIF/1.0/'
   xmlns:XMP='http://ns.exiftool.org/XMP/1.0/'>
  <File:FileName>a.jpg</File:FileName>
  <File:Directory>/photos</File:Directory>
  <EXIF:ISO>400</EXIF:ISO>
  <EXIF:FNumber>2.8</EXIF:FNumber>
  <EXIF:DateTimeOriginal>2018:02:20 01:28:10</EXIF:DateTimeOriginal>
  <XMP:Subject>
   <rdf:Bag>
    <rdf:li>sunset</rdf:li>
    <rdf:li>beach</rdf:li>
   </rdf:Bag>
  </XMP:Subject>
 </rdf:Description>
 <rdf:Description rdf:about='/photos/b.jpg'
   xmlns:File='http://ns.exiftool.org/File/1.0/'
   xmlns:EXIF='http://ns.exiftool.org/EXIF/1.0/'>
  <File:FileName>b.jpg</File:FileName>
  <File:Directory>/photos</File:Directory>
  <EXIF:ISO>100</EXIF:ISO>
  <EXIF:LensID>Nikkor 50mm</EXIF:LensID>
 </rdf:Description>
</rdf:RDF>
"#;

struct Fixture {
    _dir: TempDir,
    tool: ExifTool,
    files: MediaPaths,
}

/// Install the fake binary and two dummy media files into a temp dir.
fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();

    let bin = dir.path().join("exiftool");
    let script = format!("#!/bin/sh\ncat <<'EOF'\n{RESPONSE_XML}\nEOF\n");
    std::fs::write(&bin, script).unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

    let a = dir.path().join("a.jpg");
    let b = dir.path().join("b.jpg");
    std::fs::write(&a, b"fake").unwrap();
    std::fs::write(&b, b"fake").unwrap();

    let mut config = Config::default();
    config.exiftool_bin = Some(bin);
    let tool = ExifTool::locate(&config).unwrap();
    let files = MediaPaths::new([a, b]).unwrap();

    Fixture { _dir: dir, tool, files }
}

#[test]
fn extract_raw_keys_and_values() {
    let fx = fixture();
    let metadata = fx.tool.extract(&fx.files, &ExtractOptions::default()).unwrap();

    // Keyed by the records' own Directory/FileName, not the caller paths.
    assert_eq!(metadata.len(), 2);
    let record = &metadata["/photos/a.jpg"];

    assert_eq!(record.get("FileName"), Some(&TagValue::Str("a.jpg".into())));
    assert_eq!(record.get("ISO"), Some(&TagValue::Str("400".into())));
    assert_eq!(
        record.get("DateTimeOriginal"),
        Some(&TagValue::Str("2018:02:20 01:28:10".into()))
    );
    // The rdf:Bag wrapper unnests to a plain list even without cleaning.
    assert_eq!(
        record.get("Subject"),
        Some(&TagValue::List(vec![
            TagValue::Str("sunset".into()),
            TagValue::Str("beach".into()),
        ]))
    );
}

#[test]
fn extract_with_cleaning_passes() {
    let fx = fixture();
    let opts = ExtractOptions {
        clean_keys: true,
        clean_values: true,
    };
    let metadata = fx.tool.extract(&fx.files, &opts).unwrap();

    let a = &metadata["/photos/a.jpg"];
    assert_eq!(a.get("iso"), Some(&TagValue::Int(400)));
    assert_eq!(a.get("f_number"), Some(&TagValue::Float(2.8)));
    assert_eq!(
        a.get("date_time_original"),
        Some(&TagValue::DateTime("2018-02-20 01:28:10".into()))
    );

    // LensID is absent from the column map — heuristic fallback applies.
    let b = &metadata["/photos/b.jpg"];
    assert_eq!(b.get("lens_id"), Some(&TagValue::Str("Nikkor 50mm".into())));
    assert!(!b.contains_key("LensID"));
}

#[test]
fn extract_empty_input_yields_empty_map() {
    let fx = fixture();
    let none = MediaPaths::new(Vec::<PathBuf>::new()).unwrap();
    let metadata = fx.tool.extract(&none, &ExtractOptions::default()).unwrap();
    assert!(metadata.is_empty());
}

#[test]
fn failing_tool_aborts_extraction() {
    let dir = TempDir::new().unwrap();
    let bin = dir.path().join("exiftool");
    std::fs::write(&bin, "#!/bin/sh\nexit 1\n").unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

    let file = dir.path().join("a.jpg");
    std::fs::write(&file, b"fake").unwrap();

    let mut config = Config::default();
    config.exiftool_bin = Some(bin);
    let tool = ExifTool::locate(&config).unwrap();
    let files = MediaPaths::new([file]).unwrap();

    let err = tool.extract(&files, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, photo_meta::Error::ToolExecution(_)));
}

#[test]
fn garbage_tool_output_is_malformed_xml() {
    let dir = TempDir::new().unwrap();
    let bin = dir.path().join("exiftool");
    std::fs::write(&bin, "#!/bin/sh\necho 'not xml at all'\n").unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

    let file = dir.path().join("a.jpg");
    std::fs::write(&file, b"fake").unwrap();

    let mut config = Config::default();
    config.exiftool_bin = Some(bin);
    let tool = ExifTool::locate(&config).unwrap();
    let files = MediaPaths::new([file]).unwrap();

    let err = tool.extract(&files, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, photo_meta::Error::MalformedXml(_)));
}

#[test]
fn write_reports_nothing_to_do_as_failure() {
    let dir = TempDir::new().unwrap();
    let bin = dir.path().join("exiftool");
    std::fs::write(&bin, "#!/bin/sh\necho 'Nothing to do.'\n").unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

    let file = dir.path().join("a.jpg");
    std::fs::write(&file, b"fake").unwrap();

    let mut config = Config::default();
    config.exiftool_bin = Some(bin);
    let tool = ExifTool::locate(&config).unwrap();
    let files = MediaPaths::new([file.clone()]).unwrap();

    let mut attrs = std::collections::BTreeMap::new();
    attrs.insert("Artist".to_string(), TagValue::from("nobody"));
    let results = tool.write(&files, &attrs).unwrap();

    let key = std::path::absolute(&file).unwrap();
    assert_eq!(results.get(&key.to_string_lossy().into_owned()), Some(&false));
}
