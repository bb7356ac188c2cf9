#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = simplexml::from_bytes(data) else {
        return;
    };
    // every node read from XML has a tag, so writing cannot fail
    let xml = match doc.to_xml_string() {
        Ok(xml) => xml,
        Err(err) => panic!("write failed after successful read: {err}"),
    };
    if let Err(err) = simplexml::from_str(&xml) {
        panic!("re-read failed: {err}\n{xml}");
    }
});
