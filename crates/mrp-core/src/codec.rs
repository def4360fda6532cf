//! 實體與文件欄位之間的對應
//!
//! 欄位名稱沿用文件庫既有的 camelCase 命名（`itemid`、`actualPrice`、
//! `ingredients` 等）。

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::bom::{BomLine, BomRecipe};
use crate::document::{
    collections, decimal_from_value, decimal_value, timestamp_value, Document, DocumentError,
    FieldReader, FromDocument, ToDocument,
};
use crate::movement::{MovementKind, StockMovement};
use crate::order::{OrderStatus, ProductionOrder};
use crate::reorder::{Reorder, ReorderStatus};
use crate::stock::MaterialStock;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(fields) => fields,
        _ => Map::new(),
    }
}

fn insert_opt(fields: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value);
    }
}

impl FromDocument for MaterialStock {
    const COLLECTION: &'static str = collections::STOCKS;

    fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        let reader = FieldReader::new(Self::COLLECTION, doc);
        let material_id = reader.required_str("itemid")?;
        let name = reader
            .optional_str("name")?
            .unwrap_or_else(|| material_id.clone());

        Ok(Self {
            doc_id: Some(doc.id.clone()),
            material_id,
            name,
            quantity: reader.non_negative_decimal("quantity")?,
            unit_cost: reader.non_negative_decimal("actualPrice")?,
            category: reader.optional_str("groupName")?,
            selling_price: reader.optional_decimal("sellingPrice")?,
        })
    }
}

impl ToDocument for MaterialStock {
    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = object(json!({
            "itemid": self.material_id,
            "name": self.name,
            "quantity": decimal_value(self.quantity),
            "actualPrice": decimal_value(self.unit_cost),
        }));
        insert_opt(&mut fields, "groupName", self.category.clone().map(Value::String));
        insert_opt(&mut fields, "sellingPrice", self.selling_price.map(decimal_value));
        fields
    }
}

impl FromDocument for BomRecipe {
    const COLLECTION: &'static str = collections::BOMS;

    fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        let reader = FieldReader::new(Self::COLLECTION, doc);
        let product_id = reader.required_str("productId")?;

        let mut lines = Vec::new();
        for (index, item) in reader
            .optional_array("ingredients")?
            .into_iter()
            .flatten()
            .enumerate()
        {
            let field = format!("ingredients[{index}]");
            let Value::Object(entry) = item else {
                return Err(reader.invalid(&field, "預期物件"));
            };

            let material_id = match entry.get("materialId") {
                Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
                _ => return Err(reader.missing(&format!("{field}.materialId"))),
            };

            let quantity = entry
                .get("quantity")
                .map(decimal_from_value)
                .transpose()
                .map_err(|reason| reader.invalid(&format!("{field}.quantity"), reason))?
                .flatten()
                .ok_or_else(|| reader.missing(&format!("{field}.quantity")))?;
            if quantity <= Decimal::ZERO {
                return Err(reader.invalid(
                    &format!("{field}.quantity"),
                    format!("必須大於 0: {quantity}"),
                ));
            }

            let mut line = BomLine::new(material_id, quantity);
            if let Some(Value::String(name)) = entry.get("name") {
                if !name.trim().is_empty() {
                    line = line.with_name(name.trim().to_string());
                }
            }
            lines.push(line);
        }

        Ok(Self {
            doc_id: Some(doc.id.clone()),
            product_id,
            product_name: reader.optional_str("productName")?,
            lines,
            created_by: reader.optional_str("createdBy")?,
        })
    }
}

impl ToDocument for BomRecipe {
    fn to_fields(&self) -> Map<String, Value> {
        let ingredients: Vec<Value> = self
            .lines
            .iter()
            .map(|line| {
                let mut entry = object(json!({
                    "materialId": line.material_id,
                    "quantity": decimal_value(line.quantity_per_unit),
                }));
                insert_opt(&mut entry, "name", line.name.clone().map(Value::String));
                Value::Object(entry)
            })
            .collect();

        let mut fields = object(json!({
            "productId": self.product_id,
            "ingredients": ingredients,
        }));
        insert_opt(&mut fields, "productName", self.product_name.clone().map(Value::String));
        insert_opt(&mut fields, "createdBy", self.created_by.clone().map(Value::String));
        fields
    }
}

impl FromDocument for ProductionOrder {
    const COLLECTION: &'static str = collections::MANUFACTURING_ORDERS;

    fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        let reader = FieldReader::new(Self::COLLECTION, doc);

        let quantity = reader.required_decimal("quantity")?;
        if quantity < Decimal::ZERO {
            return Err(reader.invalid("quantity", format!("不可為負數: {quantity}")));
        }

        Ok(Self {
            doc_id: Some(doc.id.clone()),
            product_id: reader.required_str("productId")?,
            product_name: reader.optional_str("productName")?,
            quantity,
            deadline: reader.optional_date("deadline")?,
            status: reader
                .parse_enum::<OrderStatus>("status")?
                .unwrap_or(OrderStatus::Planned),
            created_at: reader.optional_timestamp("createdAt")?,
        })
    }
}

impl ToDocument for ProductionOrder {
    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = object(json!({
            "productId": self.product_id,
            "quantity": decimal_value(self.quantity),
            "status": self.status.as_str(),
        }));
        insert_opt(&mut fields, "productName", self.product_name.clone().map(Value::String));
        insert_opt(
            &mut fields,
            "deadline",
            self.deadline
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string())),
        );
        insert_opt(&mut fields, "createdAt", self.created_at.map(timestamp_value));
        fields
    }
}

impl FromDocument for StockMovement {
    const COLLECTION: &'static str = collections::MOVEMENTS;

    fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        let reader = FieldReader::new(Self::COLLECTION, doc);
        let material_id = reader.required_str("itemid")?;

        Ok(Self {
            name: reader
                .optional_str("name")?
                .unwrap_or_else(|| material_id.clone()),
            material_id,
            kind: reader
                .parse_enum::<MovementKind>("type")?
                .ok_or_else(|| reader.missing("type"))?,
            quantity: reader.non_negative_decimal("quantity")?,
            reason: reader.optional_str("reason")?.unwrap_or_default(),
            timestamp: reader.optional_timestamp("timestamp")?,
            user: reader.optional_str("user")?,
        })
    }
}

impl ToDocument for StockMovement {
    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = object(json!({
            "itemid": self.material_id,
            "name": self.name,
            "type": self.kind.as_str(),
            "quantity": decimal_value(self.quantity),
            "reason": self.reason,
        }));
        insert_opt(&mut fields, "timestamp", self.timestamp.map(timestamp_value));
        insert_opt(&mut fields, "user", self.user.clone().map(Value::String));
        fields
    }
}

impl FromDocument for Reorder {
    const COLLECTION: &'static str = collections::REORDERS;

    fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        let reader = FieldReader::new(Self::COLLECTION, doc);

        Ok(Self {
            doc_id: Some(doc.id.clone()),
            owner_uid: reader.required_str("adminUID")?,
            supplier_name: reader.required_str("supplierName")?,
            name: reader.required_str("name")?,
            material_id: reader.optional_str("itemid")?,
            requested_qty: reader.positive_decimal("requestedQty")?,
            status: reader
                .parse_enum::<ReorderStatus>("status")?
                .unwrap_or(ReorderStatus::Pending),
            created_at: reader.optional_timestamp("createdAt")?,
        })
    }
}

impl ToDocument for Reorder {
    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = object(json!({
            "adminUID": self.owner_uid,
            "supplierName": self.supplier_name,
            "name": self.name,
            "requestedQty": decimal_value(self.requested_qty),
            "status": self.status.as_str(),
        }));
        insert_opt(&mut fields, "itemid", self.material_id.clone().map(Value::String));
        insert_opt(&mut fields, "createdAt", self.created_at.map(timestamp_value));
        fields
    }
}
