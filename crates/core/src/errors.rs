use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("no dialog handler registered for intent `{intent_name}`")]
    UnsupportedIntent { intent_name: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Unauthorized { .. } => "The request is missing valid credentials.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Unauthorized { correlation_id, .. } => {
                correlation_id
            }
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::Unauthorized { .. } => "unauthorized",
        }
    }

    /// Caller-facing detail; unlike [`Self::user_message`] this names the offending input.
    pub fn detail(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Unauthorized { message, .. } => message,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        match self {
            Self::Domain(error @ DomainError::UnsupportedIntent { .. }) => {
                InterfaceError::BadRequest {
                    message: error.to_string(),
                    correlation_id: correlation_id.into(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn unsupported_intent_maps_to_bad_request_with_intent_name() {
        let interface = ApplicationError::from(DomainError::UnsupportedIntent {
            intent_name: "BookHotel".to_owned(),
        })
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref message,
                ref correlation_id,
            } if correlation_id == "req-1" && message.contains("BookHotel")
        ));
        assert_eq!(interface.error_class(), "bad_request");
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert!(interface.detail().contains("BookHotel"));
    }

    #[test]
    fn unauthorized_keeps_its_correlation_id() {
        let interface = InterfaceError::Unauthorized {
            message: "missing or invalid bearer token".to_owned(),
            correlation_id: "req-2".to_owned(),
        };

        assert_eq!(interface.error_class(), "unauthorized");
        assert_eq!(interface.correlation_id(), "req-2");
        assert_eq!(interface.user_message(), "The request is missing valid credentials.");
    }
}
