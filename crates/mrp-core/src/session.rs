//! 登入身分（明確傳遞，不使用全域單例）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MrpError, Result};

/// 使用者角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MrpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(MrpError::Validation(format!("未知的角色: {other}"))),
        }
    }
}

/// 目前登入的身分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 使用者 uid（同時作為租戶範圍）
    pub uid: String,

    /// Email
    pub email: Option<String>,

    /// 顯示名稱
    pub display_name: Option<String>,

    /// 角色
    pub role: Role,
}

impl Session {
    pub fn new(uid: String, role: Role) -> Self {
        Self {
            uid,
            email: None,
            display_name: None,
            role,
        }
    }

    /// 建構器模式：設置 Email
    pub fn with_email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    /// 建構器模式：設置顯示名稱
    pub fn with_display_name(mut self, name: String) -> Self {
        self.display_name = Some(name);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 異動記錄上的操作人員（Email，無則用 uid）
    pub fn actor(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.uid)
    }
}
