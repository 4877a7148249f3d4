use bull_scaler_core::ScalerError;
use tonic::Status;

pub trait IntoStatus {
    fn into_status(self) -> Status;
}

impl IntoStatus for ScalerError {
    fn into_status(self) -> Status {
        let message = self.to_string();
        match self {
            ScalerError::MissingMetadata(_) | ScalerError::InvalidCeiling(_) => {
                Status::invalid_argument(message)
            }
            ScalerError::StoreUnavailable(_) => Status::unavailable(message),
        }
    }
}
