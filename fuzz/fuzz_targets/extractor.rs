#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use webmark::config::ReadabilitySettings;
use webmark::{convert, extractor::extract};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // conversion must be deterministic for any input
    assert_eq!(convert(&html), convert(&html));

    let Ok(url) = Url::parse("https://example.com/") else {
        return;
    };
    let _ = extract(&html, &url, &ReadabilitySettings::default());
});
