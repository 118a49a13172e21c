use chrono::{DateTime, Utc};
use common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 订单数据库模型
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// 创建订单请求数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderData {
    pub user_id: Uuid,
    pub product: String,
    pub quantity: i32,
}

impl CreateOrderData {
    pub fn validate(self) -> Result<Self> {
        let product = self.product.trim().to_string();
        if product.is_empty() {
            return Err(Error::BadRequest("商品名称不能为空".to_string()));
        }
        if self.quantity <= 0 {
            return Err(Error::BadRequest(format!(
                "商品数量必须大于 0: {}",
                self.quantity
            )));
        }

        Ok(Self { product, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(product: &str, quantity: i32) -> CreateOrderData {
        CreateOrderData {
            user_id: Uuid::new_v4(),
            product: product.to_string(),
            quantity,
        }
    }

    #[test]
    fn valid_order_passes() {
        let order = data(" book ", 2).validate().unwrap();
        assert_eq!(order.product, "book");
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn empty_product_or_bad_quantity_fails() {
        assert!(matches!(data("", 1).validate(), Err(Error::BadRequest(_))));
        assert!(matches!(data("book", 0).validate(), Err(Error::BadRequest(_))));
    }
}
