use poolservice_shared::Money;
use serde::Serialize;
use time::Date;

use crate::{DueAlert, due_alerts, expense_total, profit, realized_revenue, revenue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: Date,
    pub end: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: Period,
    pub revenue: Money,
    pub realized_revenue: Money,
    pub expenses: Money,
    pub profit: Money,
    pub active_clients: usize,
    pub due_alerts: Vec<DueAlert>,
}

impl crate::Query {
    /// Monthly figures for `start..=end`; `today` drives the due-date alerts.
    #[tracing::instrument(skip(self))]
    pub async fn dashboard(&self, start: Date, end: Date, today: Date) -> anyhow::Result<Dashboard> {
        let clients = poolservice_client::Query(self.0.clone());
        let schedule = poolservice_schedule::Query(self.0.clone());

        let (clients, instances, expenses) = futures::try_join!(
            clients.list(),
            schedule.list_instances(start, end),
            self.list(Some((start, end))),
        )?;

        let revenue = revenue(&instances);
        let expenses = expense_total(&expenses, start, end);

        Ok(Dashboard {
            period: Period { start, end },
            revenue,
            realized_revenue: realized_revenue(&instances),
            expenses,
            profit: profit(revenue, expenses),
            active_clients: clients.iter().filter(|c| c.active).count(),
            due_alerts: due_alerts(&clients, today),
        })
    }
}
