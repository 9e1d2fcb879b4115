use super::types::{Incompatibility, SwapIncompatibility};
use crate::model::{NurseId, ShiftCode, ShiftSwapRequest, SwapDetail};
use crate::rules::{Constraint, RuleTable};
use crate::schedule::{resolve_shift, ScheduleSnapshot};
use chrono::NaiveDate;

impl RuleTable {
    /// Vérifie que `nurse` peut prendre `new_shift` le jour `date`, compte tenu
    /// des gardes de la veille et du lendemain.
    ///
    /// La veille est contrôlée en premier et court-circuite le lendemain. Un
    /// repos (`O`) sur un jour adjacent neutralise ce côté.
    pub fn check(
        &self,
        snapshot: &ScheduleSnapshot,
        date: NaiveDate,
        new_shift: ShiftCode,
        nurse: &NurseId,
        overrides: &ScheduleSnapshot,
    ) -> Result<(), Incompatibility> {
        let prev = date
            .pred_opt()
            .and_then(|d| resolve_shift(snapshot, overrides, d, nurse));
        let next = date
            .succ_opt()
            .and_then(|d| resolve_shift(snapshot, overrides, d, nurse));

        if let Some(prev) = prev.filter(|code| !code.is_rest()) {
            self.check_pair(prev, new_shift)?;
        }
        if let Some(next) = next.filter(|code| !code.is_rest()) {
            self.check_pair(new_shift, next)?;
        }

        #[cfg(feature = "logging")]
        tracing::debug!(%nurse, %date, %new_shift, ?prev, ?next, "shift change compatible");

        Ok(())
    }

    fn check_pair(&self, before: ShiftCode, after: ShiftCode) -> Result<(), Incompatibility> {
        match self.constraint(before, after) {
            None => Ok(()),
            Some(Constraint::Forbidden) => Err(Incompatibility::Forbidden { before, after }),
            Some(Constraint::MinRest(hours)) => Err(Incompatibility::InsufficientRest {
                before,
                after,
                hours,
            }),
        }
    }
}

pub(super) fn check_swap(
    rules: &RuleTable,
    snapshot: &ScheduleSnapshot,
    request: &ShiftSwapRequest,
    acceptor: &NurseId,
    overrides: &ScheduleSnapshot,
) -> Result<(), SwapIncompatibility> {
    let SwapDetail::Shift {
        from_shift,
        to_shift,
    } = request.detail
    else {
        return Ok(());
    };

    let fail = |nurse: &NurseId, reason| SwapIncompatibility {
        nurse: nurse.clone(),
        reason,
    };

    let date = request
        .from_date
        .ok_or_else(|| fail(&request.requestor_id, Incompatibility::MissingDate))?;
    let (Some(from_shift), Some(to_shift)) = (from_shift, to_shift) else {
        return Err(fail(&request.requestor_id, Incompatibility::MissingShift));
    };

    // Les deux côtés voient le même état provisoire.
    let overrides = overrides
        .clone()
        .with(date, request.requestor_id.clone(), to_shift)
        .with(date, acceptor.clone(), from_shift);

    rules
        .check(snapshot, date, to_shift, &request.requestor_id, &overrides)
        .map_err(|reason| fail(&request.requestor_id, reason))?;
    rules
        .check(snapshot, date, from_shift, acceptor, &overrides)
        .map_err(|reason| fail(acceptor, reason))?;

    #[cfg(feature = "logging")]
    tracing::debug!(request = %request.id, %acceptor, "swap compatible for both nurses");

    Ok(())
}
