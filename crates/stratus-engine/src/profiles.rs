//! Risk profile administration

use stratus_common::{ensure_text, InputError, Result};
use stratus_pricing::NewRiskProfile;

use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::uow::UnitOfWork;

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    pub(crate) fn create_profile(&mut self, request: NewRiskProfile) -> Result<()> {
        self.require_owner()?;

        let config = self.config();
        ensure_text("name", &request.name, config.max_name_len)?;
        if request.description.chars().count() > config.max_description_len {
            return Err(InputError::FieldTooLong {
                field: "description",
                max: config.max_description_len,
            }
            .into());
        }

        let height = self.height();
        let profile_id = self.state.profiles.create(request, height)?.profile_id;

        self.emit(EngineEvent::ProfileCreated { profile_id });
        Ok(())
    }
}
