use crate::errors::SmugglerError;
use super::models::{JsonRpcError, INTERNAL_ERROR, INVALID_PARAMS};

impl From<SmugglerError> for JsonRpcError {
    fn from(err: SmugglerError) -> Self {
        let code = match &err {
            SmugglerError::InvalidArguments(_) | SmugglerError::InvalidTarget(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        };
        JsonRpcError::new(code, err.to_string())
    }
}
