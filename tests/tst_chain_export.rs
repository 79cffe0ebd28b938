mod helpers;

use helpers::{contract, exp};
use options_dashboard::chain::export::{
    CHAIN_HEADER, DERIVED_HEADER, chain_to_csv, derived_to_csv, export_chain,
};
use options_dashboard::chain::{ChainTable, Ticker, normalize, with_change_in_oi};

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ChainTable {
        normalize(
            vec![contract(100.0, 30.0, 5.0)],
            vec![contract(100.0, 50.0, 0.0)],
            &exp("2025-01-17"),
        )
    }

    #[test]
    fn test_chain_csv_header_and_rows() {
        let csv = chain_to_csv(&table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CHAIN_HEADER.join(","));
        assert!(lines[1].ends_with(",Call,2025-01-17"));
        assert!(lines[2].ends_with(",Put,2025-01-17"));
        assert!(lines[1].contains(",False,"));
    }

    #[test]
    fn test_empty_chain_still_has_header() {
        let csv = chain_to_csv(&ChainTable::default()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_derived_csv_appends_change_columns() {
        let csv = derived_to_csv(&with_change_in_oi(&table())).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert!(lines[0].ends_with(&DERIVED_HEADER.join(",")));
        assert!(lines[1].ends_with(",0,30"));
        assert!(lines[2].ends_with(",30,20"));
    }

    #[test]
    fn test_export_writes_ticker_named_file() {
        let dir = std::env::temp_dir()
            .join(format!("options-dashboard-export-{}", std::process::id()));
        let ticker = Ticker::parse("msft").unwrap();

        let path = export_chain(&table(), &ticker, &dir).unwrap();

        assert_eq!(path.file_name().unwrap(), "MSFT_options.csv");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, chain_to_csv(&table()).unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
