#![no_main]
use libfuzzer_sys::fuzz_target;

use jsontree::Pointer;

fuzz_target!(|data: &str| {
    if let Ok(pointer) = Pointer::new(data) {
        // Display and fragment forms must re-parse to the same tokens.
        let display = pointer.to_string();
        if let Ok(reparsed) = Pointer::new(&display) {
            assert_eq!(reparsed, pointer);
        }
        let _ = Pointer::new(&pointer.to_uri_fragment());
    }
});
