//! Interactive confirmation for removing unwanted events.

use medalcal_core::filter::Confirm;
use medalcal_core::{CoreError, CoreResult, Event};

pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm_delete(&self, event: &Event) -> CoreResult<bool> {
        dialoguer::Confirm::new()
            .with_prompt(format!("Remove \"{}\" ({})?", event.summary, event.start))
            .default(false)
            .interact()
            .map_err(|e| CoreError::Prompt(e.to_string()))
    }
}
