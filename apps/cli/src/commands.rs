use std::fmt::Write;

use chrono::{Datelike, NaiveDate};
use dairy_core::expenses::ExpenseRepositoryTrait;
use dairy_core::livestock::{
    AnimalEventRepositoryTrait, AnimalRepositoryTrait, LivestockService, LivestockServiceTrait,
};
use dairy_core::production::DailyYieldRepositoryTrait;
use dairy_core::reports::{LedgerService, LedgerServiceTrait};
use dairy_core::sales::{BuyerRepositoryTrait, MilkSaleRepositoryTrait, PaymentRepositoryTrait};
use dairy_core::Collection;

use crate::main_lib::SelectedBackend;

pub const USAGE: &str = "usage: dairy-cli <command>

commands:
  status              storage backend and record counts
  summary [YYYY-MM]   monthly figures (default: current month)
  balances            amount owed per buyer
  yields              milk produced per day
  reminders           recurring expenses and animal events now due
  events <animal>     events of one animal, newest first";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Summary { month: Option<(i32, u32)> },
    Balances,
    Yields,
    Reminders,
    Events { animal: String },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            [] | ["status"] => Ok(Command::Status),
            ["summary"] => Ok(Command::Summary { month: None }),
            ["summary", month] => parse_month(month)
                .map(|m| Command::Summary { month: Some(m) })
                .ok_or_else(|| format!("invalid month '{}', expected YYYY-MM", month)),
            ["balances"] => Ok(Command::Balances),
            ["yields"] => Ok(Command::Yields),
            ["reminders"] => Ok(Command::Reminders),
            ["events", animal] => Ok(Command::Events {
                animal: animal.to_string(),
            }),
            _ => Err(format!("unknown command '{}'", args.join(" "))),
        }
    }
}

fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

pub async fn run(
    command: Command,
    backend: &SelectedBackend,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let store = backend.store.clone();
    let ledger = LedgerService::new(store.clone());
    let mut out = String::new();

    match command {
        Command::Status => {
            writeln!(out, "backend: {} ({})", store.backend_name(), backend.mode)?;
            let counts = [
                (Collection::Expenses, store.get_expenses().await?.len()),
                (Collection::Buyers, store.get_buyers().await?.len()),
                (Collection::MilkSales, store.get_milk_sales().await?.len()),
                (Collection::DailyYields, store.get_daily_yields().await?.len()),
                (Collection::Payments, store.get_payments().await?.len()),
                (Collection::Animals, store.get_animals().await?.len()),
                (Collection::AnimalEvents, store.get_animal_events().await?.len()),
            ];
            for (collection, count) in counts {
                writeln!(out, "{:<14}{:>6}", collection.name(), count)?;
            }
        }
        Command::Summary { month } => {
            let (year, month) = month.unwrap_or((today.year(), today.month()));
            let summary = ledger.monthly_summary(year, month).await?;
            writeln!(out, "{}-{:02}", summary.year, summary.month)?;
            writeln!(out, "operating expenses {:>12.2}", summary.operating_expenses)?;
            writeln!(out, "milk produced      {:>12.2}", summary.milk_produced)?;
            writeln!(out, "milk sold          {:>12.2}", summary.milk_sold)?;
            writeln!(out, "revenue            {:>12.2}", summary.revenue)?;
            writeln!(out, "net                {:>12.2}", summary.net)?;
        }
        Command::Balances => {
            for balance in ledger.buyer_balances().await? {
                writeln!(
                    out,
                    "{:<20} sales {:>10.2}  paid {:>10.2}  due {:>10.2}",
                    balance.buyer_name, balance.total_sales, balance.total_paid, balance.balance
                )?;
            }
        }
        Command::Yields => {
            for total in ledger.daily_yield_totals().await? {
                writeln!(
                    out,
                    "{}  {:>8.2}  ({} record(s))",
                    total.date, total.quantity, total.records
                )?;
            }
        }
        Command::Reminders => {
            let reminders = ledger.due_reminders(today).await?;
            if reminders.is_empty() {
                writeln!(out, "nothing due")?;
            }
            for reminder in reminders {
                writeln!(out, "{}", reminder.message)?;
            }
        }
        Command::Events { animal } => {
            let livestock = LivestockService::new(store.clone());
            for event in livestock.events_for_animal(&animal).await? {
                writeln!(
                    out,
                    "{}  {:<12} {:<20} {:>8.2}",
                    event.date,
                    event.event_type.as_str(),
                    event.value,
                    event.cost
                )?;
            }
        }
    }

    Ok(out.trim_end().to_string())
}
