use tonic::{Request, Response, Status};
use tracing::info;

use crate::proto::greeter_service_server::GreeterService;
use crate::proto::{HelloRequest, HelloResponse};

/// 问候服务实现，无状态
#[derive(Debug, Default)]
pub struct GreeterServiceImpl;

pub fn greeting(name: &str) -> String {
    format!("Hello, {}!", name)
}

#[tonic::async_trait]
impl GreeterService for GreeterServiceImpl {
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloResponse>, Status> {
        let name = request.into_inner().name;
        info!("Received request for greeting: {}", name);

        Ok(Response::new(HelloResponse {
            message: greeting(&name),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greets_by_name() {
        let response = GreeterServiceImpl
            .say_hello(Request::new(HelloRequest {
                name: "World".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(response.into_inner().message, "Hello, World!");
    }

    #[test]
    fn empty_name_still_formats() {
        assert_eq!(greeting(""), "Hello, !");
    }
}
