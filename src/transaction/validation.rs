/// Caller-side checks for transfers.
///
/// The ledger itself accepts any well-typed payload; these checks belong to
/// whoever collects input before calling `append`.
use crate::error::ChainError;
use crate::transaction::types::Transfer;

impl Transfer {
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.sender.trim().is_empty() {
            return Err(ChainError::InvalidInput("Sender must not be empty".to_string()));
        }
        if self.receiver.trim().is_empty() {
            return Err(ChainError::InvalidInput("Receiver must not be empty".to_string()));
        }
        if !self.amount.is_finite() {
            return Err(ChainError::InvalidInput(format!(
                "Amount must be a finite number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}
