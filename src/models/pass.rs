//! Modelo de Pass
//!
//! Pase mensual ligado a un usuario externo y a una ruta.
//! Un pase está activo mientras `now <= expiry_date`.

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub id: Uuid,
    pub user_id: String,
    pub route_id: Uuid,
    /// Tarifa congelada en el momento de la compra
    pub fare: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPass {
    pub user_id: String,
    pub route_id: Uuid,
    pub fare: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}

impl NewPass {
    /// Pase comprado en `purchase_date`, válido un mes calendario.
    ///
    /// Devuelve `None` solo si la fecha de vencimiento no es representable.
    pub fn purchased_at(
        user_id: String,
        route_id: Uuid,
        fare: Decimal,
        purchase_date: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            user_id,
            route_id,
            fare,
            purchase_date,
            expiry_date: Pass::expiry_for(purchase_date)?,
        })
    }
}

impl Pass {
    /// Vencimiento = compra + 1 mes calendario.
    ///
    /// Si el día no existe en el mes siguiente se usa el último día de ese mes
    /// (31 ene → 29 feb en bisiesto, 28 feb si no). La hora se conserva.
    pub fn expiry_for(purchase_date: DateTime<Utc>) -> Option<DateTime<Utc>> {
        purchase_date.checked_add_months(Months::new(1))
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expiry_date
    }

    pub fn from_new(id: Uuid, new: NewPass) -> Self {
        Self {
            id,
            user_id: new.user_id,
            route_id: new.route_id,
            fare: new.fare,
            purchase_date: new.purchase_date,
            expiry_date: new.expiry_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn test_expiry_is_one_calendar_month() {
        assert_eq!(Pass::expiry_for(at(2024, 3, 15, 9)), Some(at(2024, 4, 15, 9)));
        assert_eq!(Pass::expiry_for(at(2024, 12, 20, 23)), Some(at(2025, 1, 20, 23)));
    }

    #[test]
    fn test_expiry_clamps_to_end_of_short_month() {
        assert_eq!(Pass::expiry_for(at(2024, 1, 31, 8)), Some(at(2024, 2, 29, 8)));
        assert_eq!(Pass::expiry_for(at(2023, 1, 31, 8)), Some(at(2023, 2, 28, 8)));
        assert_eq!(Pass::expiry_for(at(2024, 5, 31, 8)), Some(at(2024, 6, 30, 8)));
    }

    #[test]
    fn test_is_active_until_expiry_inclusive() {
        let purchase = at(2024, 3, 15, 9);
        let new = NewPass::purchased_at("u1".into(), Uuid::new_v4(), Decimal::new(50, 0), purchase)
            .unwrap();
        let pass = Pass::from_new(Uuid::new_v4(), new);

        assert!(pass.is_active_at(purchase));
        assert!(pass.is_active_at(pass.expiry_date));
        assert!(!pass.is_active_at(pass.expiry_date + chrono::Duration::seconds(1)));
    }
}
