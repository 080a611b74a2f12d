use pdfsweep::discovery;
use std::fs;

fn exts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn matches_extensions_case_insensitively_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.PPTX"), b"x").unwrap();
    fs::write(dir.path().join("a.pptx"), b"x").unwrap();
    fs::write(dir.path().join("c.docx"), b"x").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let files = discovery::scan(dir.path(), &exts(&["pptx", "pptm", "ppt"])).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.pptx", "b.PPTX"]);
}

#[test]
fn empty_folder_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let files = discovery::scan(dir.path(), &exts(&["xlsx", "xls"])).unwrap();
    assert!(files.is_empty());
}

#[test]
fn subdirectories_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("done")).unwrap();
    fs::write(dir.path().join("done").join("old.docx"), b"x").unwrap();
    fs::write(dir.path().join("new.docx"), b"x").unwrap();

    let files = discovery::scan(dir.path(), &exts(&["docx"])).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("new.docx"));
}

#[test]
fn office_lock_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("~$report.xlsx"), b"x").unwrap();
    fs::write(dir.path().join("report.xlsx"), b"x").unwrap();

    let files = discovery::scan(dir.path(), &exts(&["xlsx"])).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("report.xlsx"));
}

#[test]
fn missing_folder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("nope");
    assert!(discovery::scan(&gone, &exts(&["docx"])).is_err());
}
