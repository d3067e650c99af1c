//! Request ID middleware
//!
//! 读取客户端传入的 `x-request-id`，注入到 tracing span 和响应头中，方便日志关联追踪。
//! 配置要求时缺失 request id 的请求直接返回 400（健康检查除外）。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        StatusCode,
        header::{HeaderName, HeaderValue},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::api::constants::{HEALTH_PATH, REQUEST_ID_HEADER};
use crate::api::services::{ErrorCode, error_response};

/// 请求 ID 类型，可从 request extensions 中提取
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request ID 中间件工厂
#[derive(Clone, Debug)]
pub struct RequestIdMiddleware {
    required: bool,
}

impl RequestIdMiddleware {
    pub fn new(required: bool) -> Self {
        Self { required }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

pub struct RequestIdService<S> {
    service: Rc<S>,
    required: bool,
}

fn incoming_request_id(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        let request_id = match incoming_request_id(&req) {
            Some(id) => id,
            None if self.required && req.path() != HEALTH_PATH => {
                warn!(
                    "Rejected {} {}: missing {} header",
                    req.method(),
                    req.path(),
                    REQUEST_ID_HEADER
                );
                let response = error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::MissingRequestId,
                    &format!("Missing required header '{}'", REQUEST_ID_HEADER),
                );
                return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
            }
            None => Uuid::new_v4().to_string(),
        };

        // 存入 request extensions，handler 可以通过 req.extensions().get::<RequestId>() 获取
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;

                if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
                }

                Ok(response.map_into_left_body())
            }
            .instrument(span),
        )
    }
}
