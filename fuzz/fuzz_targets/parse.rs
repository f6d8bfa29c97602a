#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tree) = jsontree::parse(text) {
            // Whatever parses must render and re-parse to the same tree.
            let rendered = jsontree::render(&tree, 0);
            let reparsed = jsontree::parse(&rendered).expect("rendered output must parse");
            assert_eq!(reparsed, tree);
        }
    }
});
