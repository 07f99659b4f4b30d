//! Fuzz target: contact directory loader
//!
//! Feeds arbitrary bytes to `ContactDirectory::load` and verifies:
//! - No panics on any input
//! - Every loaded record has non-empty primary and backup lists
//! - Every loaded record can be looked up by its own address
//!
//! cargo fuzz run fuzz_directory_load

#![no_main]

use freezer_monitor::directory::{ContactDirectory, REQUIRED_COLUMNS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw bytes.
    check(data);

    // Same bytes behind a valid header, to reach the row validation path.
    let mut framed = REQUIRED_COLUMNS.join(",").into_bytes();
    framed.push(b'\n');
    framed.extend_from_slice(data);
    check(&framed);
});

fn check(input: &[u8]) {
    let Ok(directory) = ContactDirectory::load(input) else {
        return;
    };
    assert!(!directory.is_empty());
    for record in directory.records() {
        assert!(!record.primary_emails.is_empty());
        assert!(!record.backup_emails.is_empty());
        assert_eq!(directory.lookup(&record.address), Ok(record));
    }
}
