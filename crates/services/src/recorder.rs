use std::sync::Arc;

use detective_core::model::CaseId;
use tracing::{info, warn};

use crate::contract::CaseContract;
use crate::error::RecordError;
use crate::wallet::TxHash;

/// Transactions submitted while recording a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReceipt {
    pub complete_tx: TxHash,
    /// Set when the case had to be started before it could be completed.
    pub start_tx: Option<TxHash>,
}

impl RecordReceipt {
    #[must_use]
    pub fn remediated(&self) -> bool {
        self.start_tx.is_some()
    }
}

/// Writes a finished session's result to the case contract.
#[derive(Clone)]
pub struct ResultRecorder {
    contract: Arc<dyn CaseContract>,
}

impl ResultRecorder {
    #[must_use]
    pub fn new(contract: Arc<dyn CaseContract>) -> Self {
        Self { contract }
    }

    #[must_use]
    pub fn contract(&self) -> Arc<dyn CaseContract> {
        Arc::clone(&self.contract)
    }

    /// Submit `completeCase(case_id, result)`.
    ///
    /// If the contract refuses because the case was never started, one
    /// `startCase` is sent followed by one more `completeCase`. Nothing else
    /// is retried.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Chain` when the first attempt fails for any other
    /// reason, and `RecordError::AfterRemediation` when the retry fails.
    pub async fn record(&self, case_id: CaseId, result: u8) -> Result<RecordReceipt, RecordError> {
        let first = match self.contract.complete_case(case_id, result).await {
            Ok(complete_tx) => {
                info!(case_id = case_id.value(), result, tx = %complete_tx, "case recorded");
                return Ok(RecordReceipt {
                    complete_tx,
                    start_tx: None,
                });
            }
            Err(err) => err,
        };

        if !first.is_case_not_started() {
            return Err(RecordError::Chain(first));
        }

        warn!(
            case_id = case_id.value(),
            error = %first,
            "case not started on chain; starting it before retrying"
        );
        let (start_tx, start_err) = match self.contract.start_case(case_id).await {
            Ok(tx) => (Some(tx), None),
            Err(err) => {
                warn!(case_id = case_id.value(), error = %err, "startCase failed");
                (None, Some(err))
            }
        };

        match self.contract.complete_case(case_id, result).await {
            Ok(complete_tx) => {
                info!(case_id = case_id.value(), result, tx = %complete_tx, "case recorded after start");
                Ok(RecordReceipt {
                    complete_tx,
                    start_tx,
                })
            }
            Err(complete) => Err(RecordError::AfterRemediation {
                complete,
                start: start_err,
            }),
        }
    }
}

