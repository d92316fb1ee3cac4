#![no_main]

use libfuzzer_sys::fuzz_target;
use ndvi_scenario_simulator::io::{parse_regional_with_issues, ParseOptions, RegionalSchema};

fuzz_target!(|data: &[u8]| {
    if let Ok((table, _)) =
        parse_regional_with_issues(data, "fuzz", &RegionalSchema::default(), &ParseOptions::lenient())
    {
        assert!(table.num_rows() >= table.num_regions());
    }
});
