use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("field '{0}' is not a slot field")]
    NotASlotField(String),

    #[error("slot index {index} out of range for '{field}' (capacity {capacity})")]
    SlotOutOfRange {
        field: &'static str,
        index: usize,
        capacity: usize,
    },

    #[error("form record did not serialize to an object")]
    NotAnObject,
}

/// Failures of the derived value calculators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("birth date is empty")]
    EmptyBirthDate,

    #[error("invalid birth date '{0}'")]
    InvalidBirthDate(String),

    #[error("birth date {birth} is after {today}")]
    BirthDateInFuture {
        birth: jiff::civil::Date,
        today: jiff::civil::Date,
    },
}

/// Required-field failures checked before export or submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("full name is required")]
    MissingFullName,

    #[error("declaration must be accepted")]
    DeclarationNotAccepted,
}

impl PreconditionError {
    /// Message shown to the person filling in the form.
    pub fn user_message(self) -> &'static str {
        match self {
            PreconditionError::MissingFullName => "Por favor, preencha o nome completo.",
            PreconditionError::DeclarationNotAccepted => {
                "Por favor, aceite a declaração de veracidade das informações."
            }
        }
    }
}
