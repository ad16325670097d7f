#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(u) = gophtml::GopherUrl::parse(s) else {
        return;
    };
    let _ = u.host();
    let _ = u.port();
    let _ = u.pathname();
    let _ = u.path();
    let _ = u.query();
    let _ = u.fragment();
    let _ = u.item_type();
    let _ = u.selector();
});
