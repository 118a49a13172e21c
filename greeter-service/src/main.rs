use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tonic::transport::Server;
use tracing::info;

mod proto;
mod service;

use proto::greeter_service_server::GreeterServiceServer;
use service::GreeterServiceImpl;

#[derive(Parser, Debug)]
#[command(name = "greeter-service", about = "gRPC 问候服务")]
struct Args {
    /// 监听端口，空的 PORT 环境变量视为未设置
    #[arg(short, long, env = "PORT", default_value_t = 50051)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("PORT").is_ok_and(|port| port.trim().is_empty()) {
        std::env::remove_var("PORT");
    }
    let args = Args::parse();

    common::logging::init()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Greeter service listening at {}", addr);

    Server::builder()
        .add_service(GreeterServiceServer::new(GreeterServiceImpl))
        .serve_with_shutdown(addr, common::service::shutdown_signal())
        .await?;

    info!("gRPC服务已关闭");
    Ok(())
}
