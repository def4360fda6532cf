//! 生產作業：BOM 建立、工單建立與狀態推進

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use mrp_core::{
    BomRecipe, FromDocument, MrpError, OrderStatus, ProductionOrder, Result, Session, ToDocument,
};
use mrp_store::{CollectionPath, DocumentStore, WriteMode};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::info;

use crate::repository::Repository;

/// 生產作業
pub struct ManufacturingService {
    repo: Repository,
}

impl ManufacturingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// 建立 BOM，回傳文件ID
    ///
    /// BOM 建立後不可修改，同一成品只能有一份。
    pub fn define_recipe(&self, session: &Session, recipe: BomRecipe) -> Result<String> {
        recipe.validate()?;

        if self.repo.recipe_for(&recipe.product_id)?.is_some() {
            return Err(MrpError::RecipeExists(recipe.product_id));
        }

        let recipe = recipe.with_created_by(session.actor().to_string());
        let id = self
            .repo
            .store()
            .add(&CollectionPath::boms(), recipe.to_fields())?;

        info!(
            "建立 BOM: 成品 {}, {} 項物料",
            recipe.product_id,
            recipe.lines.len()
        );
        Ok(id)
    }

    /// 建立生產工單（狀態為 Planned），回傳文件ID
    pub fn create_order(
        &self,
        product_id: &str,
        quantity: Decimal,
        deadline: Option<NaiveDate>,
    ) -> Result<String> {
        if quantity <= Decimal::ZERO {
            return Err(MrpError::Validation(format!("生產數量必須大於 0：{}", quantity)));
        }

        let recipe = self
            .repo
            .recipe_for(product_id)?
            .ok_or_else(|| MrpError::RecipeNotFound(product_id.to_string()))?;

        let mut order = ProductionOrder::new(recipe.product_id.clone(), quantity)
            .with_created_at(Utc::now());
        if let Some(name) = recipe.product_name {
            order = order.with_product_name(name);
        }
        if let Some(deadline) = deadline {
            order = order.with_deadline(deadline);
        }

        let id = self
            .repo
            .store()
            .add(&CollectionPath::manufacturing_orders(), order.to_fields())?;

        info!("建立生產工單 {}: {} × {}", id, order.display_name(), quantity);
        Ok(id)
    }

    /// 推進工單狀態（只能往前）
    pub fn advance_order(&self, order_id: &str, next: OrderStatus) -> Result<ProductionOrder> {
        let path = CollectionPath::manufacturing_orders();
        let doc = self
            .repo
            .store()
            .get(&path, order_id)?
            .ok_or_else(|| MrpError::OrderNotFound(order_id.to_string()))?;

        let mut order = ProductionOrder::from_document(&doc)?;
        let previous = order.status;
        order.advance(next)?;

        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::String(next.as_str().to_string()));
        self.repo.store().set(&path, order_id, fields, WriteMode::Merge)?;

        info!("工單 {} 狀態: {} → {}", order_id, previous, next);
        Ok(order)
    }
}
