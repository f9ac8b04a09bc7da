use std::path::Path;

use warden::error::ServeError;
use warden::http::mime::{MimePolicy, OCTET_STREAM};

#[test]
fn test_fixed_table_known_extensions() {
    let policy = MimePolicy::FixedTable;
    let cases = [
        ("index.html", "text/html"),
        ("style.css", "text/css"),
        ("app.js", "application/javascript"),
        ("photo.jpg", "image/jpeg"),
        ("photo.jpeg", "image/jpeg"),
        ("logo.png", "image/png"),
        ("anim.gif", "image/gif"),
        ("pic.webp", "image/webp"),
        ("notes.txt", "text/plain"),
    ];

    for (name, expected) in cases {
        assert_eq!(policy.resolve(Path::new(name)).unwrap(), expected, "{name}");
    }
}

#[test]
fn test_fixed_table_is_case_insensitive() {
    let policy = MimePolicy::FixedTable;
    assert_eq!(policy.resolve(Path::new("./site/PHOTO.JPG")).unwrap(), "image/jpeg");
}

#[test]
fn test_fixed_table_unknown_extension_fails() {
    let err = MimePolicy::FixedTable
        .resolve(Path::new("./data.xyz"))
        .unwrap_err();

    assert!(matches!(err, ServeError::UnknownMimeType(ref ext) if ext == "xyz"));
}

#[test]
fn test_fixed_table_no_extension_fails() {
    let err = MimePolicy::FixedTable
        .resolve(Path::new("./LICENSE"))
        .unwrap_err();

    assert!(matches!(err, ServeError::UnknownMimeType(ref ext) if ext.is_empty()));
}

#[test]
fn test_guess_known_extension() {
    assert_eq!(
        MimePolicy::Guess.resolve(Path::new("index.html")).unwrap(),
        "text/html"
    );
    assert_eq!(
        MimePolicy::Guess.resolve(Path::new("image.PNG")).unwrap(),
        "image/png"
    );
}

#[test]
fn test_guess_falls_back_to_octet_stream() {
    assert_eq!(
        MimePolicy::Guess.resolve(Path::new("blob.notarealext")).unwrap(),
        OCTET_STREAM
    );
    assert_eq!(
        MimePolicy::Guess.resolve(Path::new("Makefile")).unwrap(),
        OCTET_STREAM
    );
}
