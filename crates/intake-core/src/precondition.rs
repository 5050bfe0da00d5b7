//! The two required answers. Nothing else in the form is mandatory.

use crate::error::PreconditionError;
use crate::models::record::FormRecord;

/// Full name must be non-blank and the declaration accepted before the
/// record may be exported or submitted. The name is checked first.
pub fn check_required(record: &FormRecord) -> Result<(), PreconditionError> {
    if record.identification.full_name.trim().is_empty() {
        return Err(PreconditionError::MissingFullName);
    }
    if !record.declaration {
        return Err(PreconditionError::DeclarationNotAccepted);
    }
    Ok(())
}
