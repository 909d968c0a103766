use anyhow::Context;
use chrono::Utc;
use exam_portal_admin::{
    config::{get_config, init_config},
    models::file::FilePayload,
    models::question::OPTION_LETTERS,
    pages::{admin_directory::DeleteOutcome, admin_directory::StatusFilter, Redirect},
    storage::Counter,
    Portal,
};
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: exam-portal-admin <command>

Commands:
  login <username> <passkey>
  logout
  admins [--filter all|active|expired|no-expiry|has-creator|root] [--search <term>]
  delete-admin <admin-id> <reason> [--yes]
  extract <image> [--pdf-id <id>] [--evaluate] [--submit]
  counters [--reset]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let portal = Portal::new(get_config()?)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((cmd, rest)) = args.split_first() else {
        anyhow::bail!(USAGE);
    };

    match cmd.as_str() {
        "login" => login(&portal, rest).await,
        "logout" => {
            portal.login().logout()?;
            println!("Logged out");
            Ok(())
        }
        "admins" => admins(&portal, rest).await,
        "delete-admin" => delete_admin(&portal, rest).await,
        "extract" => extract(&portal, rest).await,
        "counters" => counters(&portal, rest),
        other => anyhow::bail!("Unknown command: {other}\n\n{USAGE}"),
    }
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn no_session(redirect: Redirect) -> anyhow::Error {
    anyhow::anyhow!(
        "No admin session (would redirect to {}); run `login` first",
        redirect.to
    )
}

async fn login(portal: &Portal, args: &[String]) -> anyhow::Result<()> {
    let [username, passkey, ..] = args else {
        anyhow::bail!("login needs <username> <passkey>");
    };
    let mut page = portal.login();
    page.update_field("username", username)?;
    page.update_field("passkey", passkey)?;
    page.login().await.context("login failed")?;
    println!("Logged in as {username}");
    Ok(())
}

async fn admins(portal: &Portal, args: &[String]) -> anyhow::Result<()> {
    let mut page = portal.admin_directory().map_err(no_session)?;
    if let Some(filter) = flag_value(args, "--filter") {
        page.set_filter(filter.parse::<StatusFilter>().map_err(anyhow::Error::msg)?);
    }
    if let Some(term) = flag_value(args, "--search") {
        page.set_search(term);
    }
    page.refresh().await?;

    let now = Utc::now();
    for admin in page.visible(now) {
        let creator = page
            .creator_of(admin)
            .map(|c| c.admin_id.as_str())
            .unwrap_or("-");
        println!(
            "{:<16} {:<32} {:<10} {:>6} creator={}",
            admin.admin_id,
            admin.email.as_deref().unwrap_or("-"),
            page.status_of(admin, now).label(),
            admin
                .days_left(now)
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            creator
        );
    }
    Ok(())
}

fn prompt_yes_no(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

async fn delete_admin(portal: &Portal, args: &[String]) -> anyhow::Result<()> {
    let [admin_id, reason, ..] = args else {
        anyhow::bail!("delete-admin needs <admin-id> <reason>");
    };
    let assume_yes = has_flag(args, "--yes");
    let mut page = portal.admin_directory().map_err(no_session)?;
    page.update_delete_field("AdminId", admin_id)?;
    page.update_delete_field("reason", reason)?;

    let confirm = |prompt: &str| assume_yes || prompt_yes_no(prompt);
    match page.delete_admin(&confirm).await? {
        DeleteOutcome::Deleted => println!("Deleted {admin_id}"),
        DeleteOutcome::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

async fn extract(portal: &Portal, args: &[String]) -> anyhow::Result<()> {
    let path = args.first().context("extract needs <image>")?;
    let page = portal.extractor();
    page.set_image(FilePayload::from_path(path).await?)?;
    if let Some(pdf_id) = flag_value(args, "--pdf-id") {
        page.set_pdf_id(pdf_id);
    }

    let count = page.extract().await?;
    info!(count, "Extraction finished");

    for index in 0..count {
        if has_flag(args, "--evaluate") {
            // Failures are already reported per question; keep going.
            let _ = page.evaluate(index).await;
        }
        if has_flag(args, "--submit") {
            let _ = page.submit(index).await;
        }
    }

    for (index, candidate) in page.candidates().iter().enumerate() {
        println!("{}. {} [{}]", index + 1, candidate.question, candidate.status.label());
        if let Some(reason) = candidate.status.failure_reason() {
            println!("   last attempt failed: {reason}");
        }
        for (letter, option) in OPTION_LETTERS.iter().zip(&candidate.options) {
            let mark = if option.is_correct { "*" } else { " " };
            println!("   {mark}{letter}. {}", option.option_text);
        }
    }
    Ok(())
}

fn counters(portal: &Portal, args: &[String]) -> anyhow::Result<()> {
    let reset = has_flag(args, "--reset");
    for counter in Counter::ALL {
        if reset {
            portal.session.reset_count(counter)?;
        }
        println!("{:<28} {}", counter.key(), portal.session.submitted_count(counter));
    }
    Ok(())
}
