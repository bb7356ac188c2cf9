#![no_main]
use libfuzzer_sys::fuzz_target;

const SAMPLE: &str = "<root><a><b/><c>1</c></a><b><a/></b><c/></root>";

fuzz_target!(|data: &[u8]| {
    let Ok(expr) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(doc) = simplexml::from_str(SAMPLE) {
        let _ = doc.children_by_path(expr);
    }
});
