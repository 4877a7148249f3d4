use bull_scaler_core::{ScaleTarget, Scaler};
use bull_scaler_proto::external_scaler_server::ExternalScaler;
use bull_scaler_proto::{
    GetMetricSpecResponse, GetMetricsRequest, GetMetricsResponse, IsActiveResponse, MetricSpec,
    MetricValue, ScaledObjectRef,
};
use tonic::{Request, Response, Status};
use tracing::{debug, instrument};

use crate::error::IntoStatus;

/// gRPC front for the scaler: the KEDA `ExternalScaler` service.
pub struct ExternalScalerService {
    scaler: Scaler,
}

impl ExternalScalerService {
    pub fn new(scaler: Scaler) -> Self {
        Self { scaler }
    }
}

fn scale_target(object: &ScaledObjectRef) -> ScaleTarget {
    ScaleTarget::new(object.namespace.clone(), object.name.clone())
}

#[tonic::async_trait]
impl ExternalScaler for ExternalScalerService {
    #[instrument(skip_all, fields(namespace = %request.get_ref().namespace, name = %request.get_ref().name))]
    async fn is_active(
        &self,
        request: Request<ScaledObjectRef>,
    ) -> Result<Response<IsActiveResponse>, Status> {
        let object = request.into_inner();

        let result = self
            .scaler
            .is_active(&scale_target(&object), &object.scaler_metadata)
            .await
            .map_err(IntoStatus::into_status)?;

        Ok(Response::new(IsActiveResponse { result }))
    }

    type StreamIsActiveStream =
        tokio_stream::wrappers::ReceiverStream<Result<IsActiveResponse, Status>>;

    // Pull-based scaler: the orchestrator polls IsActive instead.
    #[instrument(skip_all, fields(namespace = %_request.get_ref().namespace, name = %_request.get_ref().name))]
    async fn stream_is_active(
        &self,
        _request: Request<ScaledObjectRef>,
    ) -> Result<Response<Self::StreamIsActiveStream>, Status> {
        debug!("push-based activity stream requested");
        Err(Status::unimplemented(
            "StreamIsActive is not supported, poll IsActive instead",
        ))
    }

    #[instrument(skip_all, fields(namespace = %_request.get_ref().namespace, name = %_request.get_ref().name))]
    async fn get_metric_spec(
        &self,
        _request: Request<ScaledObjectRef>,
    ) -> Result<Response<GetMetricSpecResponse>, Status> {
        let spec = self.scaler.metric_spec();
        debug!(
            metric_name = spec.metric_name,
            target_size = spec.target_size,
            "returning metric spec"
        );

        Ok(Response::new(GetMetricSpecResponse {
            metric_specs: vec![MetricSpec {
                metric_name: spec.metric_name.to_string(),
                target_size: spec.target_size,
                target_size_float: spec.target_size as f64,
            }],
        }))
    }

    #[instrument(skip_all, fields(
        namespace = request.get_ref().scaled_object_ref.as_ref().map(|o| o.namespace.as_str()).unwrap_or_default(),
        name = request.get_ref().scaled_object_ref.as_ref().map(|o| o.name.as_str()).unwrap_or_default(),
    ))]
    async fn get_metrics(
        &self,
        request: Request<GetMetricsRequest>,
    ) -> Result<Response<GetMetricsResponse>, Status> {
        let req = request.into_inner();
        debug!(requested = %req.metric_name, "metric values requested");

        let object = req.scaled_object_ref.unwrap_or_default();
        let sample = self
            .scaler
            .metrics(&scale_target(&object), &object.scaler_metadata)
            .await
            .map_err(IntoStatus::into_status)?;

        Ok(Response::new(GetMetricsResponse {
            metric_values: vec![MetricValue {
                metric_name: sample.metric_name.to_string(),
                metric_value: sample.value,
                metric_value_float: sample.value as f64,
            }],
        }))
    }
}
