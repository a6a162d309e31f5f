#![no_main]

use ert_rs::scmplus::ScmPlus;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must never panic; short buffers yield a typed error.
    let _ = ScmPlus::from_bytes(data);

    // Force the discriminator so extraction runs on full-length inputs.
    if data.len() >= 17 {
        let mut frame = data[..17].to_vec();
        frame[3] = 0x1E;
        let scm = ScmPlus::from_bytes(&frame).expect("17-byte frame must decode");

        // Renderings are total over the field domain.
        let _ = scm.to_string();
        let _ = ert_rs::Message::record(&scm);
    }
});
