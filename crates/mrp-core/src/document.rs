//! 文件庫記錄與型別轉換邊界
//!
//! 文件庫中的記錄是無型別的 JSON 物件；所有記錄在進入計算之前
//! 都必須經過 [`FromDocument`] 轉換成強型別實體。

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// 集合名稱
pub mod collections {
    pub const STOCKS: &str = "stocks";
    pub const MOVEMENTS: &str = "movements";
    pub const SUPPLIERS: &str = "suppliers";
    pub const BOMS: &str = "boms";
    pub const MANUFACTURING_ORDERS: &str = "manufacturing_orders";
    pub const REORDERS: &str = "reorders";
    pub const USERS: &str = "users";
}

/// 文件庫中的一筆記錄
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// 文件ID
    pub id: String,

    /// 欄位
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: String, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// 取得原始欄位值
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// 文件轉換錯誤
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("{collection}/{id}: 缺少欄位 `{field}`")]
    MissingField {
        collection: String,
        id: String,
        field: String,
    },

    #[error("{collection}/{id}: 欄位 `{field}` 無效: {reason}")]
    InvalidField {
        collection: String,
        id: String,
        field: String,
        reason: String,
    },
}

/// 從文件轉換為實體
pub trait FromDocument: Sized {
    /// 所屬集合（用於錯誤訊息）
    const COLLECTION: &'static str;

    fn from_document(doc: &Document) -> Result<Self, DocumentError>;
}

/// 將實體轉換為文件欄位
pub trait ToDocument {
    fn to_fields(&self) -> Map<String, Value>;
}

/// 批次轉換結果：有效記錄與被拒絕的文件
#[derive(Debug, Clone)]
pub struct DecodedSet<T> {
    pub items: Vec<T>,
    pub rejected: Vec<DocumentError>,
}

impl<T> DecodedSet<T> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// 批次轉換；無效文件不會中斷整批轉換
pub fn decode_all<T: FromDocument>(docs: &[Document]) -> DecodedSet<T> {
    let mut items = Vec::with_capacity(docs.len());
    let mut rejected = Vec::new();

    for doc in docs {
        match T::from_document(doc) {
            Ok(item) => items.push(item),
            Err(err) => rejected.push(err),
        }
    }

    DecodedSet { items, rejected }
}

/// 將 JSON 值解析為數值（接受數字或數字字串，空字串視為未填）
pub fn decimal_from_value(value: &Value) -> Result<Option<Decimal>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => parse_decimal(&number.to_string()).map(Some),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => parse_decimal(text.trim()).map(Some),
        other => Err(format!("預期數值，實際為 {other}")),
    }
}

/// 數值寫入文件時的表示（字串，保留精度）
pub fn decimal_value(value: Decimal) -> Value {
    Value::String(value.normalize().to_string())
}

/// 時間寫入文件時的表示（RFC 3339）
pub fn timestamp_value(value: DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339())
}

fn parse_decimal(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("無法解析數值 `{text}`: {e}"))
}

/// 帶錯誤上下文的欄位讀取器
pub struct FieldReader<'a> {
    collection: &'static str,
    doc: &'a Document,
}

impl<'a> FieldReader<'a> {
    pub fn new(collection: &'static str, doc: &'a Document) -> Self {
        Self { collection, doc }
    }

    /// 文件ID
    pub fn id(&self) -> &'a str {
        &self.doc.id
    }

    pub fn missing(&self, field: &str) -> DocumentError {
        DocumentError::MissingField {
            collection: self.collection.to_string(),
            id: self.doc.id.clone(),
            field: field.to_string(),
        }
    }

    pub fn invalid(&self, field: &str, reason: impl Into<String>) -> DocumentError {
        DocumentError::InvalidField {
            collection: self.collection.to_string(),
            id: self.doc.id.clone(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// 選填字串（空白視為未填）
    pub fn optional_str(&self, field: &str) -> Result<Option<String>, DocumentError> {
        match self.doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(self.invalid(field, format!("預期字串，實際為 {other}"))),
        }
    }

    /// 必填字串
    pub fn required_str(&self, field: &str) -> Result<String, DocumentError> {
        self.optional_str(field)?
            .ok_or_else(|| self.missing(field))
    }

    /// 選填數值
    pub fn optional_decimal(&self, field: &str) -> Result<Option<Decimal>, DocumentError> {
        match self.doc.get(field) {
            None => Ok(None),
            Some(value) => decimal_from_value(value).map_err(|reason| self.invalid(field, reason)),
        }
    }

    /// 必填數值
    pub fn required_decimal(&self, field: &str) -> Result<Decimal, DocumentError> {
        self.optional_decimal(field)?
            .ok_or_else(|| self.missing(field))
    }

    /// 非負數值（未填為 0）
    pub fn non_negative_decimal(&self, field: &str) -> Result<Decimal, DocumentError> {
        let value = self.optional_decimal(field)?.unwrap_or(Decimal::ZERO);
        if value < Decimal::ZERO {
            return Err(self.invalid(field, format!("不可為負數: {value}")));
        }
        Ok(value)
    }

    /// 必填正數
    pub fn positive_decimal(&self, field: &str) -> Result<Decimal, DocumentError> {
        let value = self.required_decimal(field)?;
        if value <= Decimal::ZERO {
            return Err(self.invalid(field, format!("必須大於 0: {value}")));
        }
        Ok(value)
    }

    /// 選填日期（YYYY-MM-DD）
    pub fn optional_date(&self, field: &str) -> Result<Option<NaiveDate>, DocumentError> {
        match self.optional_str(field)? {
            None => Ok(None),
            Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| self.invalid(field, format!("無效的日期 `{text}`: {e}"))),
        }
    }

    /// 選填時間（RFC 3339）
    pub fn optional_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, DocumentError> {
        match self.optional_str(field)? {
            None => Ok(None),
            Some(text) => DateTime::parse_from_rfc3339(&text)
                .map(|ts| Some(ts.with_timezone(&Utc)))
                .map_err(|e| self.invalid(field, format!("無效的時間 `{text}`: {e}"))),
        }
    }

    /// 選填陣列
    pub fn optional_array(&self, field: &str) -> Result<Option<&'a Vec<Value>>, DocumentError> {
        match self.doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(self.invalid(field, format!("預期陣列，實際為 {other}"))),
        }
    }

    /// 解析列舉字串
    pub fn parse_enum<T: FromStr>(&self, field: &str) -> Result<Option<T>, DocumentError> {
        match self.optional_str(field)? {
            None => Ok(None),
            Some(text) => text
                .parse::<T>()
                .map(Some)
                .map_err(|_| self.invalid(field, format!("未知的值 `{text}`"))),
        }
    }
}
