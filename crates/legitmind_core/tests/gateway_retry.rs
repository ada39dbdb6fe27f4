//! Exercises the retry wrapper through a mocked analysis service, the same
//! shape the OpenAI adapters use: validate input, then run one model call
//! per attempt under `call_with_retry`.

use async_trait::async_trait;
use legitmind_core::domain::{AnalysisReport, Obligation};
use legitmind_core::ports::{DocumentAnalysisService, GatewayError, GatewayResult};
use legitmind_core::retry::{call_with_retry, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// An analysis backend that fails a fixed number of times before producing
/// the given report.
struct FlakyAnalysisService {
    failures_before_success: u32,
    calls: AtomicU32,
    report: AnalysisReport,
    retry: RetryPolicy,
}

impl FlakyAnalysisService {
    fn new(failures_before_success: u32, report: AnalysisReport) -> Self {
        Self {
            failures_before_success,
            calls: AtomicU32::new(0),
            report,
            retry: RetryPolicy::default(),
        }
    }

    async fn attempt(&self) -> GatewayResult<AnalysisReport> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures_before_success {
            Err(GatewayError::InvocationFailed("upstream 503".to_string()))
        } else {
            Ok(self.report.clone())
        }
    }
}

#[async_trait]
impl DocumentAnalysisService for FlakyAnalysisService {
    async fn analyze(&self, document_text: &str) -> GatewayResult<AnalysisReport> {
        if document_text.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }
        call_with_retry(&self.retry, || self.attempt()).await
    }
}

#[tokio::test(start_paused = true)]
async fn analyze_recovers_when_the_model_fails_twice() {
    let service = FlakyAnalysisService::new(
        2,
        AnalysisReport {
            obligations: vec![Obligation {
                party: "Tenant".to_string(),
                description: "Pay rent monthly".to_string(),
                due_date: Some("First of each month".to_string()),
            }],
            ..Default::default()
        },
    );

    let report = service.analyze("a lease agreement").await.unwrap();
    assert_eq!(report.obligations.len(), 1);
    assert_eq!(service.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn analyze_reports_overloaded_after_the_budget_is_spent() {
    let service = FlakyAnalysisService::new(u32::MAX, AnalysisReport::default());
    let start = Instant::now();

    let err = service.analyze("a lease agreement").await.unwrap_err();

    assert!(matches!(err, GatewayError::Overloaded));
    assert_eq!(service.calls.load(Ordering::SeqCst), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn empty_extraction_is_a_valid_result() {
    let service = FlakyAnalysisService::new(0, AnalysisReport::default());

    let report = service.analyze("nothing of note here").await.unwrap();
    assert!(report.clauses.is_empty());
    assert!(report.obligations.is_empty());
    assert!(report.risks.is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_document_text_fails_fast() {
    let service = FlakyAnalysisService::new(0, AnalysisReport::default());

    let err = service.analyze("   ").await.unwrap_err();
    assert!(matches!(err, GatewayError::EmptyInput));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}
