//! Generated types for the KEDA `externalscaler.ExternalScaler` gRPC service.

tonic::include_proto!("externalscaler");
