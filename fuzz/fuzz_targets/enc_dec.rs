#![no_main]
use libfuzzer_sys::fuzz_target;
use urikit::pct_enc;

fuzz_target!(|data: &str| {
    let encoded = pct_enc::encode_component(data);
    assert_eq!(pct_enc::decode_component(&encoded).unwrap(), data);
    let encoded = pct_enc::encode_query_component(data);
    assert_eq!(pct_enc::decode_query_component(&encoded).unwrap(), data);
    let encoded = pct_enc::encode_full(data);
    assert_eq!(pct_enc::decode_full(&encoded).unwrap(), data);
});
