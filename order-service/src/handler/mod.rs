use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::Result;
use sqlx::PgPool;
use tracing::info;

use crate::model::order::{CreateOrderData, Order};
use crate::repository::order_repository::OrderRepository;

/// 订单业务路由
pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .with_state(OrderRepository::new(pool))
}

async fn create_order(
    State(repository): State<OrderRepository>,
    Json(data): Json<CreateOrderData>,
) -> Result<(StatusCode, Json<Order>)> {
    let data = data.validate()?;
    let order = repository.create_order(data).await?;
    info!("创建订单: {} (用户 {})", order.id, order.user_id);
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(State(repository): State<OrderRepository>) -> Result<Json<Vec<Order>>> {
    Ok(Json(repository.list_orders().await?))
}
