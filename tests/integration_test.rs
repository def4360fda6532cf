//! 集成測試

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mrp_console::calc::MovementTotals;
use mrp_console::model::{
    MovementKind, MrpError, OrderStatus, PlanningConfig, RequirementStatus, Role, Session,
};
use mrp_console::service::{IntakeItem, ReorderLine};
use mrp_console::{LiveRequirementFeed, MemoryStore, MrpConsole, RequirementReport};
use mrp_console::model::{BomLine, BomRecipe};
use rust_decimal::Decimal;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn console() -> MrpConsole {
    init_tracing();
    MrpConsole::new(Arc::new(MemoryStore::new()))
}

fn chair_recipe() -> BomRecipe {
    BomRecipe::new(
        "Chair".to_string(),
        vec![
            BomLine::new("Wood".to_string(), Decimal::from(4)).with_name("Pine Wood".to_string()),
            BomLine::new("Screw".to_string(), Decimal::from(20)),
        ],
    )
}

/// 庫存 Wood 30、Screw 150，Chair BOM = 4 Wood + 20 Screw
fn seed(console: &MrpConsole, session: &Session) -> anyhow::Result<()> {
    console.inventory().receive_intake(
        session,
        &[
            IntakeItem::new("Wood".to_string(), "Pine Wood".to_string(), Decimal::from(30))
                .with_unit_cost(Decimal::from(12)),
            IntakeItem::new("Screw".to_string(), "Screw".to_string(), Decimal::from(150))
                .with_unit_cost(Decimal::new(5, 2)),
        ],
    )?;
    console.manufacturing().define_recipe(session, chair_recipe())?;
    Ok(())
}

async fn wait_for(
    feed: &mut LiveRequirementFeed,
    predicate: impl Fn(&RequirementReport) -> bool,
) -> anyhow::Result<Arc<RequirementReport>> {
    if let Some(report) = feed.latest().filter(|r| predicate(r.as_ref())) {
        return Ok(report);
    }
    let report = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(report) = feed.next_report().await {
            if predicate(report.as_ref()) {
                return Some(report);
            }
        }
        None
    })
    .await?;
    report.ok_or_else(|| anyhow::anyhow!("即時彙總已停止"))
}

#[test]
fn test_chair_requirement_report() -> anyhow::Result<()> {
    // 場景：10 張 Chair 需要 40 Wood、200 Screw
    let console = console();
    let session = Session::new("u-1".to_string(), Role::Admin);
    seed(&console, &session)?;

    console
        .manufacturing()
        .create_order("Chair", Decimal::from(10), NaiveDate::from_ymd_opt(2025, 12, 1))?;

    let report = console.repository().requirement_report(&session)?;
    assert_eq!(report.lines.len(), 2);

    let screw = &report.lines[0];
    assert_eq!(screw.material_id, "Screw");
    assert_eq!(screw.gross_demand, Decimal::from(200));
    assert_eq!(screw.on_hand, Decimal::from(150));
    assert_eq!(screw.net_shortfall, Decimal::from(50));
    assert_eq!(screw.status, RequirementStatus::Shortage);

    let wood = &report.lines[1];
    assert_eq!(wood.material_id, "Wood");
    assert_eq!(wood.material_name.as_deref(), Some("Pine Wood"));
    assert_eq!(wood.gross_demand, Decimal::from(40));
    assert_eq!(wood.net_shortfall, Decimal::from(10));

    assert_eq!(report.total_shortfall(), Decimal::from(60));
    Ok(())
}

#[test]
fn test_only_planned_orders_create_demand() -> anyhow::Result<()> {
    let console = console();
    let session = Session::new("u-1".to_string(), Role::Admin);
    seed(&console, &session)?;

    let started = console
        .manufacturing()
        .create_order("Chair", Decimal::from(10), None)?;
    console
        .manufacturing()
        .create_order("Chair", Decimal::from(2), None)?;
    console
        .manufacturing()
        .advance_order(&started, OrderStatus::InProgress)?;

    let report = console.repository().requirement_report(&session)?;
    let wood = report.line("Wood").ok_or_else(|| anyhow::anyhow!("缺少 Wood"))?;
    assert_eq!(wood.gross_demand, Decimal::from(8));
    assert_eq!(wood.status, RequirementStatus::Available);
    assert_eq!(report.shortage_count(), 0);
    Ok(())
}

#[test]
fn test_order_for_product_without_recipe_is_rejected() -> anyhow::Result<()> {
    let console = console();
    let session = Session::new("u-1".to_string(), Role::Admin);
    seed(&console, &session)?;

    let result = console
        .manufacturing()
        .create_order("Table", Decimal::from(5), None);
    assert!(matches!(result, Err(MrpError::RecipeNotFound(_))));
    assert!(console.repository().requirement_report(&session)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_live_feed_follows_procurement_cycle() -> anyhow::Result<()> {
    let console = console();
    let session = Session::new("u-1".to_string(), Role::Admin)
        .with_email("planner@example.com".to_string());
    seed(&console, &session)?;

    let mut feed = console.live_requirements(&session)?;

    console
        .manufacturing()
        .create_order("Chair", Decimal::from(10), None)?;
    let report = wait_for(&mut feed, |r| r.shortage_count() == 2).await?;
    let wood_shortfall = report
        .line("Wood")
        .map(|l| l.net_shortfall)
        .unwrap_or_default();
    assert_eq!(wood_shortfall, Decimal::from(10));

    // 依缺料下單並收貨
    let lines: Vec<ReorderLine> = report
        .shortages()
        .map(|l| {
            ReorderLine::new(l.material_id.clone(), l.net_shortfall)
                .with_material_id(l.material_id.clone())
        })
        .collect();
    let ids = console
        .procurement()
        .place_reorders(&session, "Acme Supplies", &lines)?;
    assert_eq!(ids.len(), 2);

    for id in &ids {
        console.procurement().receive_reorder(&session, id)?;
    }

    let report = wait_for(&mut feed, |r| !r.is_empty() && r.shortage_count() == 0).await?;
    for line in &report.lines {
        assert_eq!(line.net_shortfall, Decimal::ZERO);
        assert_eq!(line.on_hand, line.gross_demand);
    }

    // 開工後不再計入需求
    let orders = console.repository().orders()?;
    let order_id = orders[0]
        .doc_id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("工單缺少文件ID"))?;
    console
        .manufacturing()
        .advance_order(&order_id, OrderStatus::InProgress)?;
    wait_for(&mut feed, |r| r.is_empty()).await?;

    let movements = console.repository().movements(&session)?;
    let totals = MovementTotals::from_movements(&movements);
    assert_eq!(totals.stock_in, Decimal::from(30 + 150 + 10 + 50));
    assert!(movements.iter().all(|m| m.kind == MovementKind::In));
    Ok(())
}

#[test]
fn test_inventory_summary_and_alerts() -> anyhow::Result<()> {
    let console = console();
    let session = Session::new("u-1".to_string(), Role::Admin);
    seed(&console, &session)?;
    console.inventory().consume(&session, "Wood", Decimal::from(25))?;

    let config = PlanningConfig::default();
    let summary = console.repository().inventory_summary(&session, &config)?;
    assert_eq!(summary.total_value, Decimal::from(5 * 12) + Decimal::new(750, 2));
    assert_eq!(summary.low_stock_count, 1);
    assert_eq!(summary.stock_in, Decimal::from(180));
    assert_eq!(summary.stock_out, Decimal::from(25));
    assert_eq!(summary.top_items[0].material_id, "Screw");

    let notices = console.repository().shortage_notices(&session, &config)?;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].subject, "Urgent: Material Shortage for Pine Wood");
    Ok(())
}
