#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dnsdb;

fuzz_target!(|data: &[u8]| {
    // Every item after an error must be absent.
    let mut records = dnsdb::Records::new(data.to_vec());
    while let Some(r) = records.next() {
        if r.is_err() {
            assert!(records.next().is_none());
            break;
        }
    }
});
