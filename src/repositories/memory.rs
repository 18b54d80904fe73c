//! Almacenamiento en memoria
//!
//! Implementa todos los repositorios sobre un único estado protegido por
//! `RwLock`, con la misma semántica que PostgreSQL (cascadas, orden de
//! listados, atomicidad de la creación de pases, un ticket por pago). Lo
//! usan los tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BusRepository, PassRepository, PassUsageRepository, PaymentRepository, RouteRepository,
    StationRepository, TicketRepository,
};
use crate::models::{
    Bus, NewBus, NewPass, NewPassUsage, NewPaymentRecord, NewRoute, NewStation, NewTicket, Pass,
    PassUsage, PaymentRecord, PaymentStatus, Route, Station, StationFilter, Ticket,
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    routes: Vec<Route>,
    buses: Vec<Bus>,
    stations: Vec<Station>,
    passes: Vec<Pass>,
    tickets: Vec<Ticket>,
    usages: Vec<PassUsage>,
    payments: Vec<PaymentRecord>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un pase tal cual, sin la comprobación de pase activo.
    /// Útil para preparar datos históricos (pases vencidos, etc.).
    pub async fn insert_pass(&self, pass: Pass) {
        self.tables.write().await.passes.push(pass);
    }
}

/// Orden "más reciente primero" estable: a igual marca temporal gana el último insertado
fn newest_first<T: Clone>(rows: impl DoubleEndedIterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn create(&self, route: NewRoute) -> AppResult<Route> {
        let route = Route::from_new(Uuid::new_v4(), route, Utc::now());
        self.tables.write().await.routes.push(route.clone());
        Ok(route)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        Ok(self.tables.read().await.routes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        Ok(tables.routes.iter().filter(|r| ids.contains(&r.id)).cloned().collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Route>> {
        Ok(self.tables.read().await.routes.clone())
    }

    async fn update(&self, id: Uuid, route: NewRoute) -> AppResult<Option<Route>> {
        let mut tables = self.tables.write().await;
        Ok(tables.routes.iter_mut().find(|r| r.id == id).map(|existing| {
            existing.start = route.start;
            existing.end = route.end;
            existing.fare = route.fare;
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.routes.len();
        tables.routes.retain(|r| r.id != id);
        if tables.routes.len() == before {
            return Ok(false);
        }
        tables.buses.retain(|b| b.route_id != id);
        tables.stations.retain(|s| s.route_id != id);
        Ok(true)
    }

    async fn is_referenced(&self, id: Uuid) -> AppResult<bool> {
        let tables = self.tables.read().await;
        let route_buses: Vec<Uuid> = tables
            .buses
            .iter()
            .filter(|b| b.route_id == id)
            .map(|b| b.id)
            .collect();
        Ok(tables.passes.iter().any(|p| p.route_id == id)
            || tables
                .tickets
                .iter()
                .any(|t| t.route_id == id || route_buses.contains(&t.bus_id))
            || tables.payments.iter().any(|p| p.route_id == id))
    }
}

#[async_trait]
impl BusRepository for InMemoryStore {
    async fn create(&self, bus: NewBus) -> AppResult<Bus> {
        let mut tables = self.tables.write().await;
        if !tables.routes.iter().any(|r| r.id == bus.route_id) {
            return Err(AppError::Database("bus references a missing route".to_string()));
        }
        let bus = Bus::from_new(Uuid::new_v4(), bus, Utc::now());
        tables.buses.push(bus.clone());
        Ok(bus)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bus>> {
        Ok(self.tables.read().await.buses.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Bus>> {
        let tables = self.tables.read().await;
        Ok(tables.buses.iter().filter(|b| ids.contains(&b.id)).cloned().collect())
    }

    async fn find_all(&self, route_id: Option<Uuid>) -> AppResult<Vec<Bus>> {
        let tables = self.tables.read().await;
        Ok(tables
            .buses
            .iter()
            .filter(|b| route_id.map_or(true, |id| b.route_id == id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, bus: NewBus) -> AppResult<Option<Bus>> {
        let mut tables = self.tables.write().await;
        Ok(tables.buses.iter_mut().find(|b| b.id == id).map(|existing| {
            existing.name = bus.name;
            existing.route_id = bus.route_id;
            existing.capacity = bus.capacity;
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.buses.len();
        tables.buses.retain(|b| b.id != id);
        if tables.buses.len() == before {
            return Ok(false);
        }
        for station in tables.stations.iter_mut().filter(|s| s.bus_id == Some(id)) {
            station.bus_id = None;
        }
        Ok(true)
    }

    async fn is_referenced(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.read().await.tickets.iter().any(|t| t.bus_id == id))
    }
}

#[async_trait]
impl StationRepository for InMemoryStore {
    async fn create(&self, station: NewStation) -> AppResult<Station> {
        let station = Station::from_new(Uuid::new_v4(), station, Utc::now());
        self.tables.write().await.stations.push(station.clone());
        Ok(station)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Station>> {
        Ok(self.tables.read().await.stations.iter().find(|s| s.id == id).cloned())
    }

    async fn find_all(&self, filter: StationFilter) -> AppResult<Vec<Station>> {
        let tables = self.tables.read().await;
        Ok(tables.stations.iter().filter(|s| filter.matches(s)).cloned().collect())
    }

    async fn update(&self, id: Uuid, station: NewStation) -> AppResult<Option<Station>> {
        let mut tables = self.tables.write().await;
        Ok(tables.stations.iter_mut().find(|s| s.id == id).map(|existing| {
            existing.route_id = station.route_id;
            existing.bus_id = station.bus_id;
            existing.name = station.name;
            existing.latitude = station.latitude;
            existing.longitude = station.longitude;
            existing.fare = station.fare;
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.stations.len();
        tables.stations.retain(|s| s.id != id);
        Ok(tables.stations.len() != before)
    }
}

#[async_trait]
impl PassRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pass>> {
        Ok(self.tables.read().await.passes.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Pass>> {
        let tables = self.tables.read().await;
        Ok(tables.passes.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn find_active_for_user(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<Option<Pass>> {
        let tables = self.tables.read().await;
        Ok(tables
            .passes
            .iter()
            .filter(|p| p.user_id == user_id && p.is_active_at(now))
            .max_by_key(|p| p.expiry_date)
            .cloned())
    }

    async fn create_if_none_active(&self, new: NewPass) -> AppResult<Option<Pass>> {
        // Un solo write lock cubre comprobación e inserción
        let mut tables = self.tables.write().await;
        let now = new.purchase_date;
        if tables.passes.iter().any(|p| p.user_id == new.user_id && p.is_active_at(now)) {
            return Ok(None);
        }
        let pass = Pass::from_new(Uuid::new_v4(), new);
        tables.passes.push(pass.clone());
        Ok(Some(pass))
    }

    async fn find_expiring_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Pass>> {
        let tables = self.tables.read().await;
        let mut passes: Vec<Pass> = tables
            .passes
            .iter()
            .filter(|p| p.expiry_date >= from && p.expiry_date <= to)
            .cloned()
            .collect();
        passes.sort_by_key(|p| p.expiry_date);
        Ok(passes)
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn create(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let mut tables = self.tables.write().await;
        if tables
            .tickets
            .iter()
            .any(|t| t.payment_intent_id == ticket.payment_intent_id)
        {
            return Err(AppError::Conflict(
                "Payment session has already been used".to_string(),
            ));
        }
        let ticket = Ticket::from_new(Uuid::new_v4(), ticket);
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn find_by_payment_intent(&self, payment_intent_id: &str) -> AppResult<Option<Ticket>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .iter()
            .find(|t| t.payment_intent_id == payment_intent_id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Ticket>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.tickets.iter().filter(|t| t.user_id == user_id).cloned(),
            |t| t.created_at,
        ))
    }
}

#[async_trait]
impl PassUsageRepository for InMemoryStore {
    async fn append(&self, usage: NewPassUsage) -> AppResult<PassUsage> {
        let usage = PassUsage::from_new(Uuid::new_v4(), usage);
        self.tables.write().await.usages.push(usage.clone());
        Ok(usage)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<PassUsage>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.usages.iter().filter(|u| u.user_id == user_id).cloned(),
            |u| u.scanned_at,
        ))
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn create(&self, record: NewPaymentRecord) -> AppResult<PaymentRecord> {
        let mut tables = self.tables.write().await;
        if tables
            .payments
            .iter()
            .any(|p| p.external_session_id == record.external_session_id)
        {
            return Err(AppError::Database(format!(
                "duplicate key value for session '{}'",
                record.external_session_id
            )));
        }
        let record = PaymentRecord::from_new(Uuid::new_v4(), record, Utc::now());
        tables.payments.push(record.clone());
        Ok(record)
    }

    async fn find_by_session_id(&self, session_id: &str) -> AppResult<Option<PaymentRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .find(|p| p.external_session_id == session_id)
            .cloned())
    }

    async fn mark_completed(&self, session_id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .payments
            .iter_mut()
            .find(|p| p.external_session_id == session_id && p.status == PaymentStatus::Pending)
        {
            Some(record) => {
                record.status = PaymentStatus::Completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
