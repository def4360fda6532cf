//! 登入身分解析

use std::sync::Arc;

use mrp_core::document::collections;
use mrp_core::{FieldReader, Result, Role, Session};
use mrp_store::{CollectionPath, DocumentStore, WriteMode};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// 由使用者資料解析登入身分
pub struct SessionResolver {
    store: Arc<dyn DocumentStore>,
}

impl SessionResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 讀取 `users/{uid}` 建立登入身分
    ///
    /// 沒有使用者資料或沒有角色時視為管理員；無法辨識的角色視為一般員工。
    pub fn resolve(&self, uid: &str, email: Option<String>) -> Result<Session> {
        let profile = self.store.get(&CollectionPath::users(), uid)?;

        let mut session = Session::new(uid.to_string(), Role::Admin);
        if let Some(email) = email {
            session = session.with_email(email);
        }

        let Some(doc) = profile else {
            info!("使用者 {} 沒有資料，以管理員身分登入", uid);
            return Ok(session);
        };

        let reader = FieldReader::new(collections::USERS, &doc);
        if session.email.is_none() {
            if let Some(email) = reader.optional_str("email")? {
                session = session.with_email(email);
            }
        }
        if let Some(name) = reader.optional_str("displayName")? {
            session = session.with_display_name(name);
        }

        session.role = match reader.optional_str("role")? {
            None => Role::Admin,
            Some(role) => role.parse().unwrap_or_else(|_| {
                warn!("使用者 {} 的角色 `{}` 無法辨識，視為一般員工", uid, role);
                Role::Employee
            }),
        };

        info!("使用者 {} 登入，角色 {}", uid, session.role);
        Ok(session)
    }

    /// 寫入（合併）使用者資料
    pub fn save_profile(&self, session: &Session) -> Result<()> {
        let mut fields = Map::new();
        fields.insert("role".to_string(), Value::String(session.role.as_str().to_string()));
        if let Some(email) = &session.email {
            fields.insert("email".to_string(), Value::String(email.clone()));
        }
        if let Some(name) = &session.display_name {
            fields.insert("displayName".to_string(), Value::String(name.clone()));
        }

        self.store
            .set(&CollectionPath::users(), &session.uid, fields, WriteMode::Merge)?;
        Ok(())
    }
}
