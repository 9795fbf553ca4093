#![no_main]
use libfuzzer_sys::fuzz_target;
use urikit::{encoding::Utf8, Uri, UriData};

fuzz_target!(|input: (&[u8], bool)| {
    let (data, percent_encoded) = input;
    let d = UriData::from_bytes(data, None, &[], percent_encoded).unwrap();
    assert_eq!(d.content_as_bytes().unwrap(), data);

    let u = Uri::parse(d.as_str()).unwrap();
    assert_eq!(u.data().unwrap().content_as_bytes().unwrap(), data);

    if let Ok(s) = std::str::from_utf8(data) {
        let d = UriData::from_string(s, None, Some(&Utf8), &[], percent_encoded).unwrap();
        assert_eq!(d.content_as_string(None).unwrap(), s);
    }
});
