//! Command execution. Every edit is saved right away, and every save
//! reloads the saved days, so each invocation ends in a consistent state.

use crate::cli::{Command, DayCommand, HistoryCommand};
use crate::render;
use anyhow::{Context, Result};
use catchbook_client_core::{
    export::write_csv, parse_amount, ExpensePatch, HistoryKey, LineId, SalePatch, SaveOutcome,
    Session,
};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub async fn run(session: &mut Session, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Day(cmd) => run_day(session, cmd, out).await,
        Command::History(cmd) => run_history(session, cmd, out).await,
        Command::Export { out: path } => export(session, path.as_deref(), out).await,
        Command::Period => {
            reload(session).await?;
            write!(out, "{}", render::period(session.all_days().len(), &session.period_totals()))?;
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn amount(text: Option<String>) -> Option<f64> {
    text.as_deref().map(parse_amount)
}

fn line_index(line: usize) -> Result<usize> {
    line.checked_sub(1).context("Lines are numbered from 1")
}

async fn run_day(session: &mut Session, cmd: DayCommand, out: &mut dyn Write) -> Result<()> {
    match cmd {
        DayCommand::Show { date } => {
            open(session, date.unwrap_or_else(today)).await?;
            write!(out, "{}", render::day(&session.current_record()))?;
            Ok(())
        }
        DayCommand::AddSale { date, kg, price } => {
            open(session, date.unwrap_or_else(today)).await?;
            session.add_sale(parse_amount(&kg), parse_amount(&price));
            save(session, out).await
        }
        DayCommand::AddExpense {
            date,
            category,
            amount,
        } => {
            open(session, date.unwrap_or_else(today)).await?;
            session.add_expense(&category, parse_amount(&amount));
            save(session, out).await
        }
        DayCommand::UpdateSale {
            date,
            line,
            kg,
            price,
        } => {
            open(session, date).await?;
            let id = sale_id(session, line)?;
            session.update_sale(
                &id,
                SalePatch {
                    kg: amount(kg),
                    price: amount(price),
                },
            );
            save(session, out).await
        }
        DayCommand::UpdateExpense {
            date,
            line,
            category,
            amount: value,
        } => {
            open(session, date).await?;
            let id = expense_id(session, line)?;
            session.update_expense(
                &id,
                ExpensePatch {
                    category,
                    amount: amount(value),
                },
            );
            save(session, out).await
        }
        DayCommand::RemoveSale { date, line } => {
            open(session, date).await?;
            let id = sale_id(session, line)?;
            session.delete_sale(&id);
            save(session, out).await
        }
        DayCommand::RemoveExpense { date, line } => {
            open(session, date).await?;
            let id = expense_id(session, line)?;
            session.delete_expense(&id);
            save(session, out).await
        }
        DayCommand::Clear { date } => {
            open(session, date).await?;
            let sales: Vec<LineId> = session.sales().iter().map(|s| s.id.clone()).collect();
            let expenses: Vec<LineId> = session.expenses().iter().map(|e| e.id.clone()).collect();
            for id in &sales {
                session.delete_sale(id);
            }
            for id in &expenses {
                session.delete_expense(id);
            }
            save(session, out).await
        }
        DayCommand::Delete { date } => {
            reload(session).await?;
            let key = HistoryKey::first(date);
            if session.history().get(&key).is_none() {
                writeln!(out, "Nothing saved for {}", key)?;
                return Ok(());
            }
            session
                .delete_history_entry(&key)
                .await
                .with_context(|| format!("Failed to delete {}", date))?;
            writeln!(out, "Deleted {}", key)?;
            Ok(())
        }
    }
}

async fn run_history(session: &mut Session, cmd: HistoryCommand, out: &mut dyn Write) -> Result<()> {
    reload(session).await?;
    match cmd {
        HistoryCommand::List => {
            write!(out, "{}", render::history(session.history()))?;
            Ok(())
        }
        HistoryCommand::Delete { key } => {
            session
                .delete_history_entry(&key)
                .await
                .with_context(|| format!("Failed to delete {}", key))?;
            writeln!(out, "Deleted {}", key)?;
            Ok(())
        }
        HistoryCommand::AddSale { key } => {
            session.history_mut().add_sale_row(&key)?;
            save_entry(session, &key, out).await
        }
        HistoryCommand::AddExpense { key } => {
            session.history_mut().add_expense_row(&key)?;
            save_entry(session, &key, out).await
        }
        HistoryCommand::UpdateSale {
            key,
            line,
            kg,
            price,
        } => {
            let index = line_index(line)?;
            session.history_mut().update_sale_row(
                &key,
                index,
                SalePatch {
                    kg: amount(kg),
                    price: amount(price),
                },
            )?;
            save_entry(session, &key, out).await
        }
        HistoryCommand::UpdateExpense {
            key,
            line,
            category,
            amount: value,
        } => {
            let index = line_index(line)?;
            session.history_mut().update_expense_row(
                &key,
                index,
                ExpensePatch {
                    category,
                    amount: amount(value),
                },
            )?;
            save_entry(session, &key, out).await
        }
        HistoryCommand::RemoveSale { key, line } => {
            let index = line_index(line)?;
            session.history_mut().delete_sale_row(&key, index)?;
            save_entry(session, &key, out).await
        }
        HistoryCommand::RemoveExpense { key, line } => {
            let index = line_index(line)?;
            session.history_mut().delete_expense_row(&key, index)?;
            save_entry(session, &key, out).await
        }
    }
}

async fn export(session: &mut Session, path: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    reload(session).await?;
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(session.all_days(), BufWriter::new(file))?;
            tracing::info!("Exported {} days to {}", session.all_days().len(), path.display());
            writeln!(out, "Exported {} days to {}", session.all_days().len(), path.display())?;
        }
        None => write_csv(session.all_days(), out)?,
    }
    Ok(())
}

async fn open(session: &mut Session, date: NaiveDate) -> Result<()> {
    session
        .load_day(date)
        .await
        .with_context(|| format!("Failed to load {}", date))
}

async fn reload(session: &mut Session) -> Result<()> {
    session
        .load_all_days()
        .await
        .context("Failed to load saved days")
}

async fn save(session: &mut Session, out: &mut dyn Write) -> Result<()> {
    let date = session.date();
    let outcome = session
        .save()
        .await
        .with_context(|| format!("Failed to save {}", date))?;
    report(out, &date.to_string(), outcome)?;
    write!(out, "{}", render::day(&session.current_record()))?;
    Ok(())
}

async fn save_entry(session: &mut Session, key: &HistoryKey, out: &mut dyn Write) -> Result<()> {
    let record = session.history().prepared(key)?;
    let outcome = session
        .save_history_entry(key)
        .await
        .with_context(|| format!("Failed to save {}", key))?;
    report(out, &key.to_string(), outcome)?;
    if outcome == SaveOutcome::Saved {
        write!(out, "{}", render::day(&record))?;
    }
    Ok(())
}

fn report(out: &mut dyn Write, what: &str, outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Saved => writeln!(out, "Saved {}", what)?,
        SaveOutcome::Deleted => writeln!(out, "{} has no lines left, removed it", what)?,
    }
    Ok(())
}

fn sale_id(session: &Session, line: usize) -> Result<LineId> {
    let index = line_index(line)?;
    session
        .sales()
        .get(index)
        .map(|s| s.id.clone())
        .with_context(|| format!("No sale line {} on {}", line, session.date()))
}

fn expense_id(session: &Session, line: usize) -> Result<LineId> {
    let index = line_index(line)?;
    session
        .expenses()
        .get(index)
        .map(|e| e.id.clone())
        .with_context(|| format!("No expense line {} on {}", line, session.date()))
}
