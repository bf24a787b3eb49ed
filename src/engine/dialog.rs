use crate::engine::errors::SubmitError;
use crate::engine::reassignment_engine::{validate_batch, DialogData, GeneratedFile, ReassignmentEngine};
use crate::models::CardAdjustmentRecord;
use crate::storage::{CardLimitGateway, ConsecutiveCounterStore};
use tracing::debug;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        group_number: String,
        client_number: String
    }
}

/// Operator-facing flow around a submit: the dialog only opens for a batch
/// that passes validation, and only closes by itself after a successful file.
#[derive(Debug, Default)]
pub struct ReassignmentDialog {
    state: DialogState
}

impl ReassignmentDialog {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &DialogState {
        &self.state
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    pub fn open(&mut self, batch: &[CardAdjustmentRecord]) -> Result<(), SubmitError> {
        validate_batch(batch)?;

        debug!("Reassignment dialog opened for {} records", batch.len());

        self.state = DialogState::Open {
            group_number: String::new(),
            client_number: String::new()
        };

        Ok(())
    }

    pub fn enter(&mut self, group_number: &str, client_number: &str) -> Result<(), SubmitError> {
        let DialogState::Open { group_number: group, client_number: client } = &mut self.state else {
            return Err(SubmitError::DialogClosed)
        };

        *group = group_number.to_string();
        *client = client_number.to_string();

        Ok(())
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
    }

    pub async fn submit<G, S>(&mut self, engine: &ReassignmentEngine<G, S>, batch: &[CardAdjustmentRecord]) -> Result<GeneratedFile, SubmitError>
    where
        G: CardLimitGateway,
        S: ConsecutiveCounterStore
    {
        let DialogState::Open { group_number, client_number } = &self.state else {
            return Err(SubmitError::DialogClosed)
        };

        let dialog = DialogData {
            group_number: group_number.parse()?,
            client_number: client_number.parse()?
        };

        let file = engine.submit(batch, &dialog).await?;
        self.close();

        Ok(file)
    }
}
