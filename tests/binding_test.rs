/// Contract binding tests: read/write modes and local method gating

mod common;

use std::sync::Arc;

use common::{init_logs, test_config, MockProvider};
use findearn_client::{ChainSession, ContractBinding, ContractInterface, FindEarnError};

#[tokio::test]
async fn test_write_binding_requires_connected_session() {
    init_logs();
    let provider = Arc::new(MockProvider::new());
    let session = ChainSession::with_provider(provider);

    // Provider present, but no account activated
    let err = ContractBinding::write(
        &test_config(),
        ContractInterface::lost_and_found(),
        &session,
    )
    .unwrap_err();

    assert!(matches!(err, FindEarnError::Binding(_)));
}

#[tokio::test]
async fn test_write_binding_requires_a_provider() {
    init_logs();
    let session = ChainSession::new(None);

    let err = ContractBinding::write(
        &test_config(),
        ContractInterface::lost_and_found(),
        &session,
    )
    .unwrap_err();

    assert!(matches!(err, FindEarnError::Binding(_)));
}

#[tokio::test]
async fn test_read_only_binding_cannot_write() {
    init_logs();
    let provider = Arc::new(MockProvider::new());
    let binding = ContractBinding::read(
        &test_config(),
        ContractInterface::lost_and_found(),
        provider.clone(),
    );

    let err = binding.send("reportLostItem", vec![]).await.unwrap_err();

    assert!(matches!(err, FindEarnError::SessionRequired(_)));
    assert!(provider.sends().is_empty());
}

#[tokio::test]
async fn test_undeclared_read_never_leaves_the_process() {
    init_logs();
    let provider = Arc::new(MockProvider::new());
    let binding = ContractBinding::read(
        &test_config(),
        ContractInterface::lost_and_found(),
        provider.clone(),
    );

    let err = binding.call("getOwner", vec![]).await.unwrap_err();

    assert!(matches!(err, FindEarnError::UnknownMethod(_)));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_undeclared_write_never_leaves_the_process() {
    init_logs();
    let provider = Arc::new(MockProvider::new());
    let mut session = ChainSession::with_provider(provider.clone());
    session.connect().await.unwrap();

    let binding = ContractBinding::write(
        &test_config(),
        ContractInterface::lost_and_found(),
        &session,
    )
    .unwrap();

    // A read method is not a write method either
    let err = binding.send("getItemCount", vec![]).await.unwrap_err();

    assert!(matches!(err, FindEarnError::UnknownMethod(_)));
    assert!(provider.sends().is_empty());
}

#[tokio::test]
async fn test_declared_read_passes_through() {
    init_logs();
    let provider = Arc::new(MockProvider::new());
    let binding = ContractBinding::read(
        &test_config(),
        ContractInterface::lost_and_found(),
        provider.clone(),
    );

    let result = binding.call("getItemCount", vec![]).await.unwrap();

    assert_eq!(result.as_u64(), Some(0));
    assert_eq!(provider.calls(), vec!["call getItemCount"]);
}
