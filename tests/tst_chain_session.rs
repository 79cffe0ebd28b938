mod helpers;

use helpers::{StubProvider, contract, exp};
use options_dashboard::chain::{DashboardSession, PlotKind, SessionState};
use options_dashboard::DashboardError;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> Arc<StubProvider> {
        Arc::new(
            StubProvider::new()
                .with_chain("2025-01-10", vec![contract(100.0, 0.0, 0.0)], vec![])
                .with_chain(
                    "2025-01-17",
                    vec![contract(100.0, 30.0, 5.0), contract(105.0, 10.0, 0.0)],
                    vec![contract(100.0, 50.0, 2.0)],
                )
                .with_chain("2025-02-21", vec![contract(110.0, 7.0, 1.0)], vec![]),
        )
    }

    #[tokio::test]
    async fn test_enter_ticker_selects_first_valid_expiration() {
        let mut session = DashboardSession::new(provider());

        let valid = session.enter_ticker(" aapl ").await.unwrap().to_vec();

        assert_eq!(valid, vec![exp("2025-01-17"), exp("2025-02-21")]);
        assert_eq!(session.ticker().unwrap().as_str(), "AAPL");
        assert_eq!(session.selected_expiration(), Some(&exp("2025-01-17")));
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_no_valid_expirations_is_a_warning() {
        let stub = Arc::new(StubProvider::new().with_chain(
            "2025-01-17",
            vec![contract(100.0, 0.0, 0.0)],
            vec![],
        ));
        let mut session = DashboardSession::new(stub);

        let err = session.enter_ticker("ZZZZ").await.unwrap_err();

        assert!(matches!(err, DashboardError::NoValidExpirations { .. }));
        assert!(err.is_warning());
        assert_eq!(err.to_string(), "No valid expiration dates found for ZZZZ");
        assert!(session.valid_expirations().is_empty());
        assert!(session.selected_expiration().is_none());
    }

    #[tokio::test]
    async fn test_provider_outage_means_no_valid_expirations() {
        let mut session = DashboardSession::new(StubProvider::failing());
        let err = session.enter_ticker("AAPL").await.unwrap_err();
        assert!(err.is_warning());
    }

    #[tokio::test]
    async fn test_invalid_ticker_moves_to_error() {
        let stub = provider();
        let mut session = DashboardSession::new(Arc::clone(&stub));

        let err = session.enter_ticker("$$$").await.unwrap_err();

        assert!(matches!(err, DashboardError::InvalidTicker(_)));
        assert!(matches!(session.state(), SessionState::Error { .. }));
        assert_eq!(stub.expiration_calls(), 0);
    }

    #[tokio::test]
    async fn test_select_requires_ticker_and_valid_expiration() {
        let mut session = DashboardSession::new(provider());
        assert!(matches!(
            session.select_expiration(exp("2025-01-17")),
            Err(DashboardError::NoTicker)
        ));

        session.enter_ticker("AAPL").await.unwrap();
        assert!(matches!(
            session.select_expiration(exp("2025-01-10")),
            Err(DashboardError::ExpirationNotValid { .. })
        ));
        assert!(session.select_expiration(exp("2025-02-21")).is_ok());
        assert_eq!(session.selected_expiration(), Some(&exp("2025-02-21")));
    }

    #[tokio::test]
    async fn test_fetch_is_served_from_validation_cache() {
        let stub = provider();
        let mut session = DashboardSession::new(Arc::clone(&stub));
        session.enter_ticker("AAPL").await.unwrap();
        let calls_after_validation = stub.chain_calls();

        let table = session.fetch().await.unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.total_open_interest(), 90);
        assert_eq!(stub.chain_calls(), calls_after_validation);
        assert_eq!(session.state().name(), "ready");
    }

    #[tokio::test]
    async fn test_selection_change_discards_fetched_data() {
        let mut session = DashboardSession::new(provider());
        session.enter_ticker("AAPL").await.unwrap();
        session.fetch().await.unwrap();

        session.select_expiration(exp("2025-02-21")).unwrap();

        assert_eq!(session.state(), &SessionState::Idle);
        assert!(matches!(session.table(), Err(DashboardError::NotReady)));
        assert!(matches!(session.plot(PlotKind::Volume), Err(DashboardError::NotReady)));
    }

    #[tokio::test]
    async fn test_reentering_same_ticker_keeps_selection() {
        let mut session = DashboardSession::new(provider());
        session.enter_ticker("AAPL").await.unwrap();
        session.select_expiration(exp("2025-02-21")).unwrap();
        session.fetch().await.unwrap();

        session.enter_ticker("aapl").await.unwrap();

        assert_eq!(session.selected_expiration(), Some(&exp("2025-02-21")));
        assert_eq!(session.state().name(), "ready");
    }

    #[tokio::test]
    async fn test_reentering_ticker_clears_rejection() {
        let mut session = DashboardSession::new(provider());
        session.enter_ticker("AAPL").await.unwrap();
        assert!(session.enter_ticker("$$$").await.is_err());
        assert!(matches!(session.state(), SessionState::Error { .. }));

        session.enter_ticker("AAPL").await.unwrap();

        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.selected_expiration(), Some(&exp("2025-01-17")));
        assert!(session.summary().error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_without_ticker_is_an_error() {
        let mut session = DashboardSession::new(provider());

        assert!(matches!(session.fetch().await, Err(DashboardError::NoTicker)));
        assert!(matches!(session.state(), SessionState::Error { .. }));
    }

    #[tokio::test]
    async fn test_derived_plot_and_export_after_fetch() {
        let mut session = DashboardSession::new(provider());
        session.enter_ticker("AAPL").await.unwrap();
        session.fetch().await.unwrap();

        let derived = session.derived().unwrap();
        assert_eq!(derived.rows[2].prev_open_interest, 30);
        assert_eq!(derived.rows[2].change_in_oi, 20);

        let plot = session.plot(PlotKind::OpenInterestByExpiry).unwrap();
        assert_eq!(plot.points.len(), 3);

        let (file_name, csv) = session.export_csv().unwrap();
        assert_eq!(file_name, "AAPL_options.csv");
        assert_eq!(csv.lines().count(), 4);

        let summary = session.summary();
        assert_eq!(summary.state, "ready");
        assert_eq!(summary.rows, Some(3));
        assert_eq!(summary.selected_expiration.as_deref(), Some("2025-01-17"));
        assert_eq!(summary.cache.chains, 3);
    }
}
