use crate::model::order::{CreateOrderData, Order};
use common::{Error, Result};
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

/// 建表，服务启动获取依赖时执行
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL,
            product TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// 订单仓库实现
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建订单
    pub async fn create_order(&self, data: CreateOrderData) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, user_id, product, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, product, quantity, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.product)
        .bind(data.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            error!("创建订单失败: {}", err);
            Error::Database(err)
        })?;

        debug!("订单创建成功: {}", order.id);
        Ok(order)
    }

    /// 按创建时间倒序列出订单
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, product, quantity, created_at FROM orders ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }
}
