#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; errors are fine.
        if let Ok(mut tree) = verifactu::verifactu::Element::parse(s) {
            tree.mark_pending(verifactu::verifactu::PLACEHOLDER);
            let _ = tree.find_pending();
            tree.prune_empty(verifactu::verifactu::PRUNED_LEAVES);
        }
    }
});
