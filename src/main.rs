//! dailyverse - Show today's inspirational quote and bible verse
//!
//! Prints the day's content, and optionally sends it as notifications, enables
//! the daily reminders, or manages favorite quotes.

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use dailyverse::app::{render_content, render_favorites, DailyApp, PERMISSION_DENIED_MESSAGE};
use dailyverse::cli::{Cli, RunConfig};
use dailyverse::clock::SystemClock;
use dailyverse::notify::{NotifyError, ReminderMessage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let run = match RunConfig::from_cli(&cli) {
        Ok(run) => run,
        Err(e) => Cli::command().error(ErrorKind::InvalidValue, e).exit(),
    };

    let app = DailyApp::new(run.service.clone(), Arc::new(SystemClock));

    if run.list_favorites {
        println!("{}", render_favorites(&app.favorites()));
        return Ok(());
    }

    let content = if run.refresh {
        app.refresh().await
    } else {
        app.resolve().await
    };
    println!("{}", render_content(&content));

    if run.favorite {
        app.add_favorite(&content.quote);
        println!("\nSaved to favorites.");
    }

    if run.notify {
        match app.send_now(&content).await {
            Ok(()) => println!("\nSent! Check your notifications for today's inspiration."),
            Err(NotifyError::PermissionDenied) => eprintln!("{}", PERMISSION_DENIED_MESSAGE),
            Err(e) => log::error!("Failed to send notifications: {}", e),
        }
    }

    if run.schedule {
        match app.enable_daily_notifications().await {
            Ok(_) => {
                let times: Vec<String> = app
                    .config()
                    .reminder_times
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
                println!("\nDaily notifications enabled at {}.", times.join(", "));
            }
            Err(NotifyError::PermissionDenied) => {
                eprintln!("{}", PERMISSION_DENIED_MESSAGE);
                return Ok(());
            }
            Err(e) => {
                log::error!("Failed to schedule reminders: {}", e);
                return Ok(());
            }
        }
    }

    if run.watch {
        let mut handle = app.watch();
        log::info!("Waiting for reminders; press Ctrl-C to stop");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                message = handle.receiver.recv() => match message {
                    Some(ReminderMessage::Delivered(notification)) => {
                        log::info!("Reminder delivered: {}", notification.title);
                    }
                    None => break,
                },
            }
        }

        handle.shutdown().await;
    }

    Ok(())
}
