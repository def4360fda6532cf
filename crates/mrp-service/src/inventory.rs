//! 庫存作業：入庫、出庫與資料調整

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use mrp_core::document::decimal_value;
use mrp_core::movement::{CONSUMPTION_REASON, INTAKE_REASON};
use mrp_core::{MaterialStock, MrpError, Result, Session, StockMovement, ToDocument};
use mrp_store::{CollectionPath, DocumentStore, WriteMode};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::repository::Repository;

/// 入庫單的一行
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeItem {
    pub material_id: String,
    pub name: String,
    pub quantity: Decimal,

    /// 單位成本（未填時新物料以 0 計）
    pub unit_cost: Option<Decimal>,

    pub category: Option<String>,
}

impl IntakeItem {
    pub fn new(material_id: String, name: String, quantity: Decimal) -> Self {
        Self {
            material_id,
            name,
            quantity,
            unit_cost: None,
            category: None,
        }
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    /// 建構器模式：設置分類
    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    fn is_blank(&self) -> bool {
        self.material_id.trim().is_empty() || self.quantity <= Decimal::ZERO
    }
}

/// 物料資料調整（只寫入有提供的欄位）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockUpdate {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub category: Option<String>,
}

impl StockUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    fn to_fields(&self) -> Result<Map<String, Value>> {
        let mut fields = Map::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(MrpError::Validation("物料名稱不可為空".to_string()));
            }
            fields.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(quantity) = self.quantity {
            if quantity < Decimal::ZERO {
                return Err(MrpError::Validation(format!("庫存數量不可為負：{}", quantity)));
            }
            fields.insert("quantity".to_string(), decimal_value(quantity));
        }
        if let Some(unit_cost) = self.unit_cost {
            if unit_cost < Decimal::ZERO {
                return Err(MrpError::Validation(format!("單位成本不可為負：{}", unit_cost)));
            }
            fields.insert("actualPrice".to_string(), decimal_value(unit_cost));
        }
        if let Some(category) = &self.category {
            fields.insert("groupName".to_string(), Value::String(category.clone()));
        }

        Ok(fields)
    }
}

/// 庫存作業
pub struct InventoryService {
    repo: Repository,
}

impl InventoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// 原料入庫
    ///
    /// 物料ID為空或數量不大於 0 的行會被略過；同一張單內物料ID重複或單位成本為負
    /// 則整張拒絕。
    /// 回傳實際入庫的行數。
    pub fn receive_intake(&self, session: &Session, items: &[IntakeItem]) -> Result<usize> {
        let rows: Vec<&IntakeItem> = items.iter().filter(|item| !item.is_blank()).collect();
        if rows.len() < items.len() {
            debug!("略過 {} 行空白入庫資料", items.len() - rows.len());
        }
        if rows.is_empty() {
            return Err(MrpError::Validation("入庫單沒有有效的資料".to_string()));
        }

        let mut seen = HashSet::new();
        for item in &rows {
            if !seen.insert(item.material_id.trim()) {
                return Err(MrpError::Validation(format!(
                    "入庫單中物料 {} 重複",
                    item.material_id.trim()
                )));
            }
            if let Some(unit_cost) = item.unit_cost.filter(|cost| *cost < Decimal::ZERO) {
                return Err(MrpError::Validation(format!(
                    "物料 {} 的單位成本不可為負：{}",
                    item.material_id.trim(),
                    unit_cost
                )));
            }
        }

        let stocks = CollectionPath::stocks(session);
        let store = self.repo.store();

        for item in &rows {
            let material_id = item.material_id.trim().to_string();
            let name = if item.name.trim().is_empty() {
                material_id.clone()
            } else {
                item.name.trim().to_string()
            };

            match self.repo.find_stock(session, &material_id)? {
                Some(MaterialStock {
                    doc_id: Some(doc_id),
                    ..
                }) => {
                    store.increment(&stocks, &doc_id, "quantity", item.quantity)?;

                    let mut fields = Map::new();
                    if let Some(unit_cost) = item.unit_cost {
                        fields.insert("actualPrice".to_string(), decimal_value(unit_cost));
                    }
                    if let Some(category) = &item.category {
                        fields.insert("groupName".to_string(), Value::String(category.clone()));
                    }
                    if !fields.is_empty() {
                        store.set(&stocks, &doc_id, fields, WriteMode::Merge)?;
                    }
                }
                _ => {
                    let mut stock = MaterialStock::new(
                        material_id.clone(),
                        name.clone(),
                        item.quantity,
                        item.unit_cost.unwrap_or(Decimal::ZERO),
                    );
                    if let Some(category) = &item.category {
                        stock = stock.with_category(category.clone());
                    }
                    store.add(&stocks, stock.to_fields())?;
                }
            }

            self.record_movement(
                session,
                StockMovement::inbound(material_id, name, item.quantity, INTAKE_REASON),
            )?;
        }

        info!("入庫完成: {} 行, 操作人員 {}", rows.len(), session.actor());
        Ok(rows.len())
    }

    /// 生產領料出庫，回傳剩餘數量
    pub fn consume(&self, session: &Session, material_id: &str, quantity: Decimal) -> Result<Decimal> {
        if quantity <= Decimal::ZERO {
            return Err(MrpError::Validation(format!("出庫數量必須大於 0：{}", quantity)));
        }

        let stock = self.require_stock(session, material_id)?;
        if !stock.can_consume(quantity) {
            return Err(MrpError::InsufficientStock {
                material_id: stock.material_id,
                requested: quantity,
                on_hand: stock.quantity,
            });
        }

        let doc_id = stock_doc_id(&stock)?;
        let remaining = self.repo.store().increment(
            &CollectionPath::stocks(session),
            doc_id,
            "quantity",
            -quantity,
        )?;

        self.record_movement(
            session,
            StockMovement::outbound(
                stock.material_id.clone(),
                stock.name.clone(),
                quantity,
                CONSUMPTION_REASON,
            ),
        )?;

        info!("物料 {} 出庫 {}，剩餘 {}", stock.material_id, quantity, remaining);
        Ok(remaining)
    }

    /// 調整物料資料
    pub fn update_details(
        &self,
        session: &Session,
        material_id: &str,
        update: &StockUpdate,
    ) -> Result<()> {
        let fields = update.to_fields()?;
        let stock = self.require_stock(session, material_id)?;
        if fields.is_empty() {
            return Ok(());
        }

        self.repo.store().set(
            &CollectionPath::stocks(session),
            stock_doc_id(&stock)?,
            fields,
            WriteMode::Merge,
        )?;
        info!("更新物料 {} 資料", stock.material_id);
        Ok(())
    }

    fn require_stock(&self, session: &Session, material_id: &str) -> Result<MaterialStock> {
        self.repo
            .find_stock(session, material_id)?
            .ok_or_else(|| MrpError::StockNotFound(material_id.to_string()))
    }

    fn record_movement(&self, session: &Session, movement: StockMovement) -> Result<()> {
        let movement = movement
            .with_timestamp(Utc::now())
            .with_user(session.actor().to_string());
        self.repo
            .store()
            .add(&CollectionPath::movements(session), movement.to_fields())?;
        Ok(())
    }
}

fn stock_doc_id(stock: &MaterialStock) -> Result<&str> {
    stock
        .doc_id
        .as_deref()
        .ok_or_else(|| MrpError::StockNotFound(stock.material_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::{MovementKind, Role};
    use mrp_store::MemoryStore;
    use rstest::rstest;

    fn setup() -> (InventoryService, Session) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let session = Session::new("u-1".to_string(), Role::Admin).with_email("ops@example.com".to_string());
        (InventoryService::new(store), session)
    }

    fn wood(qty: i64) -> IntakeItem {
        IntakeItem::new("Wood".to_string(), "Pine Wood".to_string(), Decimal::from(qty))
            .with_unit_cost(Decimal::from(12))
    }

    #[test]
    fn test_intake_creates_then_increments() {
        let (service, session) = setup();

        assert_eq!(service.receive_intake(&session, &[wood(30)]).unwrap(), 1);
        assert_eq!(
            service
                .receive_intake(
                    &session,
                    &[IntakeItem::new("Wood".to_string(), "Pine Wood".to_string(), Decimal::from(20))
                        .with_category("Timber".to_string())]
                )
                .unwrap(),
            1
        );

        let stocks = service.repository().stocks(&session).unwrap();
        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].quantity, Decimal::from(50));
        assert_eq!(stocks[0].unit_cost, Decimal::from(12));
        assert_eq!(stocks[0].category_or_default(), "Timber");

        let movements = service.repository().movements(&session).unwrap();
        assert_eq!(movements.len(), 2);
        assert!(movements.iter().all(|m| m.kind == MovementKind::In));
        assert!(movements.iter().all(|m| m.reason == INTAKE_REASON));
        assert!(movements.iter().all(|m| m.user.as_deref() == Some("ops@example.com")));
    }

    #[test]
    fn test_intake_skips_blank_rows() {
        let (service, session) = setup();
        let items = vec![
            wood(30),
            IntakeItem::new(" ".to_string(), "Nothing".to_string(), Decimal::from(5)),
            IntakeItem::new("Glue".to_string(), "Glue".to_string(), Decimal::ZERO),
        ];

        assert_eq!(service.receive_intake(&session, &items).unwrap(), 1);
        assert_eq!(service.repository().stocks(&session).unwrap().len(), 1);
    }

    #[test]
    fn test_intake_rejects_duplicates_before_writing() {
        let (service, session) = setup();
        let result = service.receive_intake(&session, &[wood(30), wood(10)]);

        assert!(matches!(result, Err(MrpError::Validation(_))));
        assert!(service.repository().stocks(&session).unwrap().is_empty());
        assert!(service.repository().movements(&session).unwrap().is_empty());
    }

    #[test]
    fn test_intake_rejects_negative_unit_cost() {
        let (service, session) = setup();
        let bad = IntakeItem::new("Glue".to_string(), "Wood Glue".to_string(), Decimal::from(30))
            .with_unit_cost(Decimal::from(-5));

        for _ in 0..2 {
            assert!(matches!(
                service.receive_intake(&session, &[wood(10), bad.clone()]),
                Err(MrpError::Validation(_))
            ));
        }
        let raw = service
            .repository()
            .store()
            .fetch_all(&CollectionPath::stocks(&session), None)
            .unwrap();
        assert!(raw.is_empty());
        assert!(service.repository().movements(&session).unwrap().is_empty());

        // 既有物料也不可寫入負成本
        service.receive_intake(&session, &[wood(30)]).unwrap();
        let bad = IntakeItem::new("Wood".to_string(), String::new(), Decimal::from(5))
            .with_unit_cost(Decimal::from(-1));
        assert!(service.receive_intake(&session, &[bad]).is_err());

        let stock = service.repository().find_stock(&session, "Wood").unwrap().unwrap();
        assert_eq!(stock.quantity, Decimal::from(30));
        assert_eq!(stock.unit_cost, Decimal::from(12));
        assert_eq!(service.consume(&session, "Wood", Decimal::from(30)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_intake_requires_a_row() {
        let (service, session) = setup();
        assert!(matches!(
            service.receive_intake(&session, &[]),
            Err(MrpError::Validation(_))
        ));
    }

    #[rstest]
    #[case(10, Ok(20))]
    #[case(30, Ok(0))]
    #[case(31, Err("insufficient"))]
    #[case(0, Err("validation"))]
    fn test_consume(#[case] qty: i64, #[case] expected: std::result::Result<i64, &str>) {
        let (service, session) = setup();
        service.receive_intake(&session, &[wood(30)]).unwrap();

        let result = service.consume(&session, "Wood", Decimal::from(qty));
        match (result, expected) {
            (Ok(remaining), Ok(expected)) => assert_eq!(remaining, Decimal::from(expected)),
            (Err(MrpError::InsufficientStock { on_hand, .. }), Err("insufficient")) => {
                assert_eq!(on_hand, Decimal::from(30))
            }
            (Err(MrpError::Validation(_)), Err("validation")) => {}
            (other, expected) => panic!("預期 {:?}，實際 {:?}", expected, other),
        }
    }

    #[test]
    fn test_consume_records_outbound_movement() {
        let (service, session) = setup();
        service.receive_intake(&session, &[wood(30)]).unwrap();
        service.consume(&session, "Wood", Decimal::from(12)).unwrap();

        let movements = service.repository().movements(&session).unwrap();
        let out: Vec<_> = movements
            .iter()
            .filter(|m| m.kind == MovementKind::Out)
            .collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].quantity, Decimal::from(12));
        assert_eq!(out[0].reason, CONSUMPTION_REASON);
    }

    #[test]
    fn test_consume_unknown_material() {
        let (service, session) = setup();
        assert!(matches!(
            service.consume(&session, "Nope", Decimal::ONE),
            Err(MrpError::StockNotFound(_))
        ));
    }

    #[test]
    fn test_update_details() {
        let (service, session) = setup();
        service.receive_intake(&session, &[wood(30)]).unwrap();

        let update = StockUpdate::new()
            .with_name("Oak".to_string())
            .with_quantity(Decimal::from(45));
        service.update_details(&session, "Wood", &update).unwrap();

        let stock = service.repository().find_stock(&session, "Wood").unwrap().unwrap();
        assert_eq!(stock.name, "Oak");
        assert_eq!(stock.quantity, Decimal::from(45));
        assert_eq!(stock.unit_cost, Decimal::from(12));

        let negative = StockUpdate::new().with_quantity(Decimal::from(-1));
        assert!(matches!(
            service.update_details(&session, "Wood", &negative),
            Err(MrpError::Validation(_))
        ));
    }
}
