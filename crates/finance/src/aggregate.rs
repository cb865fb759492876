//! Figures derived from already fetched rows. Nothing here touches the
//! database.

use poolservice_client::ClientRow;
use poolservice_schedule::InstanceRow;
use poolservice_shared::{Money, Status};
use serde::Serialize;
use strum::{AsRefStr, Display};
use time::Date;

use crate::ExpenseRow;

/// Priced visits that were not cancelled.
pub fn revenue(instances: &[InstanceRow]) -> Money {
    instances
        .iter()
        .filter(|i| i.status.is_active())
        .filter_map(|i| i.price)
        .sum()
}

/// Priced visits that were completed.
pub fn realized_revenue(instances: &[InstanceRow]) -> Money {
    instances
        .iter()
        .filter(|i| i.status == Status::Completed)
        .filter_map(|i| i.price)
        .sum()
}

/// Expenses dated within `start..=end`.
pub fn expense_total(expenses: &[ExpenseRow], start: Date, end: Date) -> Money {
    expenses
        .iter()
        .filter(|e| e.expense_date >= start && e.expense_date <= end)
        .map(|e| e.amount)
        .sum()
}

pub fn profit(revenue: Money, expenses: Money) -> Money {
    revenue - expenses
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DueStatus {
    Late,
    Soon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueAlert {
    pub client_id: i64,
    pub name: String,
    pub payment_due_day: i32,
    pub fixed_price: Option<Money>,
    pub days_diff: i32,
    pub status: DueStatus,
}

/// Clients whose payment day has passed this month (`late`) or comes within
/// the next 7 days (`soon`), most overdue first.
pub fn due_alerts(clients: &[ClientRow], today: Date) -> Vec<DueAlert> {
    let current_day = today.day() as i32;

    let mut alerts = clients
        .iter()
        .filter_map(|c| {
            let due_day = c.payment_due_day?;
            let days_diff = due_day - current_day;
            let status = match days_diff {
                d if d < 0 => DueStatus::Late,
                0..=7 => DueStatus::Soon,
                _ => return None,
            };

            Some(DueAlert {
                client_id: c.id,
                name: c.name.to_owned(),
                payment_due_day: due_day,
                fixed_price: c.fixed_price,
                days_diff,
                status,
            })
        })
        .collect::<Vec<_>>();

    alerts.sort_by_key(|a| a.days_diff);

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolservice_shared::Slot;
    use time::macros::date;

    fn instance(status: Status, price: Option<i64>) -> InstanceRow {
        InstanceRow {
            id: 1,
            template_id: None,
            client_id: 1,
            scheduled_date: Slot::Day(date!(2026 - 02 - 18)),
            status,
            visit_start: None,
            price: price.map(|p| Money::new(p, 0)),
            service_type: None,
            client_name: "Maria".to_owned(),
            address: None,
            created_at: 0,
        }
    }

    fn client(id: i64, due_day: Option<i32>) -> ClientRow {
        ClientRow {
            id,
            name: format!("client {id}"),
            phone: None,
            address: None,
            neighborhood: None,
            geo_lat: None,
            geo_lng: None,
            fixed_price: Some(Money::new(150, 0)),
            payment_due_day: due_day,
            last_sand_change: None,
            active: true,
            created_at: 0,
        }
    }

    fn expense(date: Date, amount: i64) -> ExpenseRow {
        ExpenseRow {
            id: 1,
            service_instance_id: None,
            description: "Cloro".to_owned(),
            amount: Money::new(amount, 0),
            expense_date: date,
            category: Some("Material".to_owned()),
            created_at: 0,
        }
    }

    #[test]
    fn test_cancelled_excluded_from_revenue() {
        let instances = vec![
            instance(Status::Cancelled, Some(100)),
            instance(Status::Pending, Some(150)),
            instance(Status::Completed, Some(120)),
            instance(Status::Completed, None),
        ];

        assert_eq!(revenue(&instances), Money::new(270, 0));
        assert_eq!(realized_revenue(&instances), Money::new(120, 0));

        let cancelled = vec![instance(Status::Cancelled, Some(100))];
        assert_eq!(revenue(&cancelled), Money::ZERO);
        assert_eq!(realized_revenue(&cancelled), Money::ZERO);
    }

    #[test]
    fn test_expense_total_is_inclusive() {
        let expenses = vec![
            expense(date!(2026 - 01 - 31), 10),
            expense(date!(2026 - 02 - 01), 20),
            expense(date!(2026 - 02 - 28), 30),
            expense(date!(2026 - 03 - 01), 40),
        ];

        let total = expense_total(&expenses, date!(2026 - 02 - 01), date!(2026 - 02 - 28));
        assert_eq!(total, Money::new(50, 0));
        assert_eq!(profit(Money::new(270, 0), total), Money::new(220, 0));
        assert_eq!(profit(Money::ZERO, total), Money::new(-50, 0));
    }

    #[test]
    fn test_due_alerts() {
        let clients = vec![client(1, Some(5)), client(2, None), client(3, Some(30))];

        let alerts = due_alerts(&clients, date!(2026 - 02 - 28));
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].client_id, 1);
        assert_eq!(alerts[0].days_diff, -23);
        assert_eq!(alerts[0].status, DueStatus::Late);
        assert_eq!(alerts[1].client_id, 3);
        assert_eq!(alerts[1].days_diff, 2);
        assert_eq!(alerts[1].status, DueStatus::Soon);

        let alerts = due_alerts(&clients, date!(2026 - 02 - 01));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].days_diff, 4);
        assert_eq!(alerts[0].status, DueStatus::Soon);
    }

    #[test]
    fn test_due_today_is_soon() {
        let alerts = due_alerts(&[client(1, Some(15))], date!(2026 - 02 - 15));

        assert_eq!(alerts[0].days_diff, 0);
        assert_eq!(alerts[0].status, DueStatus::Soon);
        assert_eq!(serde_json::to_value(&alerts[0]).unwrap()["status"], "soon");
    }
}
