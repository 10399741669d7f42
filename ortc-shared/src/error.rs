use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    //Device errors
    #[error("device not loaded")]
    ErrNotLoaded,
    #[error("device already loaded")]
    ErrAlreadyLoaded,
    #[error("invalid kind: {0}")]
    ErrInvalidKind(String),
    #[error("invalid capabilities: {0}")]
    ErrInvalidCapabilities(String),

    //Lifecycle errors
    #[error("invalid state")]
    ErrInvalidState,

    //Produce errors
    #[error("invalid track: {0}")]
    ErrInvalidTrack(String),
    #[error("invalid simulcast: {0}")]
    ErrInvalidSimulcast(String),
    #[error("unsupported operation: {0}")]
    ErrUnsupportedOperation(String),

    //Consume errors
    #[error("invalid parameters: {0}")]
    ErrInvalidParameters(String),
    #[error("unsupported: {0}")]
    ErrUnsupported(String),
    #[error("duplicate id: {0}")]
    ErrDuplicateId(String),

    //Collaborator errors
    #[error("{0}")]
    ErrSignalingRejected(String),
    #[error("native transport: {0}")]
    ErrNative(String),

    #[error("mutex poison: {0}")]
    PoisonError(String),
    #[error("{0}")]
    Other(String),
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Error::PoisonError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ErrInvalidParameters(e.to_string())
    }
}

impl Error {
    /// Converts an error returned by a signaling listener into the error
    /// surfaced to the caller. Rejections keep the listener's text verbatim.
    pub fn into_signaling_rejected(self) -> Self {
        match self {
            Error::ErrSignalingRejected(_) => self,
            Error::Other(reason) => Error::ErrSignalingRejected(reason),
            other => Error::ErrSignalingRejected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_into_signaling_rejected() {
        let tests = vec![
            (
                Error::ErrSignalingRejected("room is full".to_owned()),
                Error::ErrSignalingRejected("room is full".to_owned()),
            ),
            (
                Error::Other("producer limit reached".to_owned()),
                Error::ErrSignalingRejected("producer limit reached".to_owned()),
            ),
            (
                Error::ErrInvalidState,
                Error::ErrSignalingRejected("invalid state".to_owned()),
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(input.into_signaling_rejected(), expected);
        }
    }

    #[test]
    fn test_poison_error_conversion() {
        let lock = std::sync::Arc::new(std::sync::Mutex::new(0u8));
        let cloned = std::sync::Arc::clone(&lock);
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poison");
        })
        .join();

        let err: Error = lock.lock().unwrap_err().into();
        assert!(matches!(err, Error::PoisonError(_)));
    }
}
