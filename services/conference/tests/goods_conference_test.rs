//! 收货核验流程测试

use std::sync::Arc;

use async_trait::async_trait;
use conference::{GoodsConference, GoodsReleaseOutcome};
use estoque_common::Operator;
use estoque_errors::{AppError, AppResult};
use estoque_ports::{
    DeliveryRelease, GoodsRelease, InventoryGateway, LoginCredentials, PendingSale,
    ReleaseReceipt,
};
use mockall::mock;

mock! {
    pub Gateway {}

    #[async_trait]
    impl InventoryGateway for Gateway {
        async fn login(&self, credentials: &LoginCredentials) -> AppResult<Operator>;
        async fn pending_sales(&self) -> AppResult<Vec<PendingSale>>;
        async fn release_delivery(&self, request: &DeliveryRelease) -> AppResult<ReleaseReceipt>;
        async fn release_goods(&self, request: &GoodsRelease) -> AppResult<String>;
    }
}

fn operator() -> Operator {
    Operator::new(7, "Carlos")
}

#[tokio::test]
async fn test_release_posts_barcode_with_operator() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_release_goods()
        .withf(|request| {
            request.barcode == "7891234567890"
                && request.operator_id == 7
                && request.operator_name == "Carlos"
        })
        .times(1)
        .returning(|_| Ok("Mercadoria liberada".to_string()));

    let mut conference = GoodsConference::new(Arc::new(gateway));
    conference.open_scanner();

    let outcome = conference.submit_scan("7891234567890", &operator()).await.unwrap();
    assert_eq!(
        outcome,
        GoodsReleaseOutcome::Released {
            barcode: "7891234567890".to_string(),
            message: "Mercadoria liberada".to_string(),
        }
    );
    assert_eq!(conference.last_scanned(), Some("7891234567890"));
}

#[tokio::test]
async fn test_latched_scanner_ignores_until_resumed() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_release_goods()
        .times(2)
        .returning(|_| Ok("ok".to_string()));

    let mut conference = GoodsConference::new(Arc::new(gateway));
    conference.open_scanner();

    assert!(conference.submit_scan("111", &operator()).await.unwrap().is_released());
    assert!(conference.is_latched());
    assert_eq!(
        conference.submit_scan("222", &operator()).await.unwrap(),
        GoodsReleaseOutcome::Ignored
    );

    conference.resume_scanning();
    assert!(conference.last_scanned().is_none());
    assert!(conference.submit_scan("222", &operator()).await.unwrap().is_released());
}

#[tokio::test]
async fn test_closed_scanner_ignores_decodes() {
    let mut conference = GoodsConference::new(Arc::new(MockGateway::new()));

    assert_eq!(
        conference.submit_scan("111", &operator()).await.unwrap(),
        GoodsReleaseOutcome::Ignored
    );

    conference.open_scanner();
    conference.close_scanner();
    assert!(!conference.is_scanner_open());
    assert_eq!(
        conference.submit_scan("111", &operator()).await.unwrap(),
        GoodsReleaseOutcome::Ignored
    );
}

#[tokio::test]
async fn test_remote_refusal_and_network_failure_are_outcomes() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_release_goods()
        .withf(|request| request.barcode == "0000")
        .returning(|_| Err(AppError::rejected("Codigo nao encontrado")));
    gateway
        .expect_release_goods()
        .withf(|request| request.barcode == "1111")
        .returning(|_| Err(AppError::network("Release goods: connection refused")));

    let mut conference = GoodsConference::new(Arc::new(gateway));
    conference.open_scanner();

    assert_eq!(
        conference.submit_scan("0000", &operator()).await.unwrap(),
        GoodsReleaseOutcome::Rejected {
            barcode: "0000".to_string(),
            reason: "Codigo nao encontrado".to_string(),
        }
    );

    conference.resume_scanning();
    match conference.submit_scan("1111", &operator()).await.unwrap() {
        GoodsReleaseOutcome::Rejected { reason, .. } => assert!(reason.contains("connection refused")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_configuration_is_an_error() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_release_goods()
        .returning(|_| Err(AppError::configuration("Server not configured")));

    let mut conference = GoodsConference::new(Arc::new(gateway));
    conference.open_scanner();

    let err = conference.submit_scan("111", &operator()).await.unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
}
