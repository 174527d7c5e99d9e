/// Wallet session tests: connect outcomes and session state

mod common;

use std::sync::Arc;

use common::{addr, init_logs, MockProvider, ALICE, BOB};
use findearn_client::{ChainSession, FindEarnError};

#[tokio::test]
async fn test_connect_without_provider_fails_before_any_chain_call() {
    init_logs();
    let mut session = ChainSession::new(None);

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, FindEarnError::WalletUnavailable(_)));
    assert!(!session.is_connected());
    assert!(session.account().is_none());
}

#[tokio::test]
async fn test_connect_activates_first_granted_account() {
    init_logs();
    let provider = Arc::new(MockProvider::new().with_accounts(&[ALICE, BOB]));
    let mut session = ChainSession::with_provider(provider.clone());

    let account = session.connect().await.unwrap();

    assert_eq!(account, addr(ALICE));
    assert!(session.is_connected());
    assert_eq!(session.account(), Some(&addr(ALICE)));
    assert_eq!(provider.calls(), vec!["requestAccounts"]);
}

#[tokio::test]
async fn test_declined_prompt_surfaces_user_rejected() {
    init_logs();
    let provider = Arc::new(MockProvider::new().rejecting_accounts());
    let mut session = ChainSession::with_provider(provider);

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, FindEarnError::UserRejected(_)));
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_zero_account_grant_is_wallet_unavailable() {
    init_logs();
    let provider = Arc::new(MockProvider::new().with_accounts(&[]));
    let mut session = ChainSession::with_provider(provider);

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, FindEarnError::WalletUnavailable(_)));
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_disconnect_keeps_provider_for_reconnect() {
    init_logs();
    let provider = Arc::new(MockProvider::new());
    let mut session = ChainSession::with_provider(provider.clone());

    session.connect().await.unwrap();
    session.disconnect();
    assert!(!session.is_connected());
    assert!(session.account().is_none());

    // Reconnecting re-prompts the wallet instead of reusing anything
    session.connect().await.unwrap();
    assert!(session.is_connected());
    assert_eq!(provider.calls(), vec!["requestAccounts", "requestAccounts"]);
}
