use chrono::{DateTime, Utc};
use common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 用户数据库模型
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// 创建用户请求数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserData {
    pub name: String,
    pub email: String,
}

impl CreateUserData {
    /// 去掉首尾空白并校验必填字段
    pub fn validate(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();

        if name.is_empty() {
            return Err(Error::BadRequest("用户名不能为空".to_string()));
        }
        if !email.contains('@') {
            return Err(Error::BadRequest(format!("邮箱格式不正确: {}", email)));
        }

        Ok(Self { name, email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_trims_input() {
        let data = CreateUserData {
            name: "  alice ".to_string(),
            email: " alice@example.com".to_string(),
        }
        .validate()
        .unwrap();

        assert_eq!(data.name, "alice");
        assert_eq!(data.email, "alice@example.com");
    }

    #[test]
    fn validation_rejects_missing_fields() {
        let empty_name = CreateUserData {
            name: " ".to_string(),
            email: "a@b.c".to_string(),
        };
        assert!(matches!(empty_name.validate(), Err(Error::BadRequest(_))));

        let bad_email = CreateUserData {
            name: "bob".to_string(),
            email: "bob".to_string(),
        };
        assert!(matches!(bad_email.validate(), Err(Error::BadRequest(_))));
    }
}
