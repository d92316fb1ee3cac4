#![no_main]

use libfuzzer_sys::fuzz_target;
use ndvi_scenario_simulator::analysis::{simulate_series, Integrator};
use ndvi_scenario_simulator::io::{read_table_from_bytes, ColumnSchema, ParseOptions};

fuzz_target!(|data: &[u8]| {
    for options in [ParseOptions::default(), ParseOptions::lenient()] {
        if let Ok(table) = read_table_from_bytes(data, "fuzz", &ColumnSchema::default(), &options) {
            let years = table.years();
            assert!(years.windows(2).all(|w| w[0] < w[1]));
            let series = simulate_series(&table, &Integrator::Analytic, None);
            assert_eq!(series.len(), table.len());
        }
    }
});
