//! 庫存異動統計

use mrp_core::{MovementKind, StockMovement};
use rust_decimal::Decimal;
use serde::Serialize;

/// 入庫 / 出庫總量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovementTotals {
    pub stock_in: Decimal,
    pub stock_out: Decimal,
}

impl MovementTotals {
    pub fn from_movements(movements: &[StockMovement]) -> Self {
        movements.iter().fold(Self::default(), |mut totals, m| {
            match m.kind {
                MovementKind::In => totals.stock_in = totals.stock_in.saturating_add(m.quantity),
                MovementKind::Out => {
                    totals.stock_out = totals.stock_out.saturating_add(m.quantity)
                }
            }
            totals
        })
    }

    /// 淨異動 = 入庫 - 出庫
    pub fn net(&self) -> Decimal {
        self.stock_in.saturating_sub(self.stock_out)
    }
}

/// 異動篩選條件
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// 方向（None 表示全部）
    pub kind: Option<MovementKind>,

    /// 搜尋物料名稱或料號（不分大小寫）
    pub search: Option<String>,
}

impl MovementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置方向
    pub fn with_kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// 建構器模式：設置搜尋字串
    pub fn with_search(mut self, search: String) -> Self {
        self.search = Some(search);
        self
    }

    pub fn matches(&self, movement: &StockMovement) -> bool {
        if let Some(kind) = self.kind {
            if movement.kind != kind {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                movement.name.to_lowercase().contains(&term)
                    || movement.material_id.to_lowercase().contains(&term)
            }
        }
    }

    pub fn apply<'a>(&self, movements: &'a [StockMovement]) -> Vec<&'a StockMovement> {
        movements.iter().filter(|m| self.matches(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::movement::{CONSUMPTION_REASON, INTAKE_REASON};

    fn movements() -> Vec<StockMovement> {
        vec![
            StockMovement::inbound(
                "WOOD-1".to_string(),
                "Pine Wood".to_string(),
                Decimal::from(100),
                INTAKE_REASON,
            ),
            StockMovement::inbound(
                "SCREW-1".to_string(),
                "Screw".to_string(),
                Decimal::from(500),
                INTAKE_REASON,
            ),
            StockMovement::outbound(
                "WOOD-1".to_string(),
                "Pine Wood".to_string(),
                Decimal::from(40),
                CONSUMPTION_REASON,
            ),
        ]
    }

    #[test]
    fn test_totals() {
        let totals = MovementTotals::from_movements(&movements());
        assert_eq!(totals.stock_in, Decimal::from(600));
        assert_eq!(totals.stock_out, Decimal::from(40));
        assert_eq!(totals.net(), Decimal::from(560));
    }

    #[test]
    fn test_filter() {
        let movements = movements();

        assert_eq!(MovementFilter::new().apply(&movements).len(), 3);
        assert_eq!(
            MovementFilter::new()
                .with_kind(MovementKind::Out)
                .apply(&movements)
                .len(),
            1
        );
        assert_eq!(
            MovementFilter::new()
                .with_search("wood".to_string())
                .apply(&movements)
                .len(),
            2
        );
        assert_eq!(
            MovementFilter::new()
                .with_kind(MovementKind::In)
                .with_search("screw-1".to_string())
                .apply(&movements)
                .len(),
            1
        );
    }
}
